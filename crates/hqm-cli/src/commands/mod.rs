//! Command handler modules for hqm-cli.
//!
//! Shared helpers live here; the pipeline lives in [`run`].

pub mod run;

use anyhow::{Context, Result};
use hqm_config::LoadedConfig;

/// Load layered YAML config. No paths means built-in defaults.
pub fn load_config(paths: &[String]) -> Result<LoadedConfig> {
    let path_refs: Vec<&str> = paths.iter().map(|s| s.as_str()).collect();
    hqm_config::load_layered_yaml(&path_refs).context("loading config failed")
}
