//! hqm-config
//!
//! Layered YAML configuration for the HQM screener.
//!
//! - YAML documents are merged in order: earlier docs are base, later docs override.
//! - The merged document is canonicalized and hashed (SHA-256) for run attribution.
//! - Leaf strings that look like credentials are rejected; YAML stores env var
//!   NAMES only (see [`secrets`]).
//! - The merged document deserializes into the typed [`HqmConfig`]; every field
//!   has a default so an empty layer set is a valid configuration.

pub mod secrets;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::fmt;
use std::fs;

/// Known secret-like prefixes. A leaf string value starting with one of these
/// aborts loading with [`ConfigError::SecretLiteral`].
const SECRET_PREFIXES: &[&str] = &[
    "pk_",        // IEX Cloud publishable token
    "sk_",        // IEX Cloud secret token
    "Tpk_",       // IEX Cloud sandbox publishable token
    "Tsk_",       // IEX Cloud sandbox secret token
    "sk-",        // OpenAI style
    "AKIA",       // AWS access key ID
    "-----BEGIN", // PEM private keys
    "ghp_",       // GitHub PAT
];

/// Largest batch the quote endpoint accepts per request.
pub const MAX_BATCH_SIZE: usize = 100;

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// Configuration failures. All of them are fatal before any network I/O.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A config layer could not be read from disk.
    Read { path: String, message: String },
    /// A layer is not valid YAML, or the merged document does not match [`HqmConfig`].
    Parse(String),
    /// A leaf value looks like a literal credential.
    SecretLiteral { pointer: String },
    /// A value is syntactically valid but out of range.
    Invalid(String),
    /// A required environment variable is unset or blank. Carries the NAME only.
    MissingSecret { var: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Read { path, message } => {
                write!(f, "failed to read config path '{path}': {message}")
            }
            ConfigError::Parse(msg) => write!(f, "invalid config: {msg}"),
            ConfigError::SecretLiteral { pointer } => {
                write!(f, "CONFIG_SECRET_DETECTED leaf={pointer} value=REDACTED")
            }
            ConfigError::Invalid(msg) => write!(f, "invalid config value: {msg}"),
            ConfigError::MissingSecret { var } => write!(
                f,
                "SECRETS_MISSING: required env var '{var}' (api token) is not set or empty"
            ),
        }
    }
}

impl std::error::Error for ConfigError {}

// ---------------------------------------------------------------------------
// Typed settings
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct UniverseConfig {
    /// CSV file with one ticker per row.
    pub path: String,
}

impl Default for UniverseConfig {
    fn default() -> Self {
        Self {
            path: "sp_500_stocks.csv".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ApiConfig {
    pub base_url: String,
    /// Name of the env var holding the API token. Never the token itself.
    pub token_env: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://sandbox.iexapis.com/stable".to_string(),
            token_env: "IEX_TOKEN".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FetchConfig {
    /// Symbols per request, 1..=100.
    pub batch_size: usize,
    /// Max in-flight batch requests. 1 = strictly sequential in chunk order.
    pub concurrency: usize,
    /// Optional per-request timeout. `None` waits indefinitely.
    pub timeout_secs: Option<u64>,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            batch_size: MAX_BATCH_SIZE,
            concurrency: 1,
            timeout_secs: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SelectionConfig {
    pub top_n: usize,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self { top_n: 50 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PortfolioConfig {
    /// Total budget in account currency, split evenly over the selection.
    pub budget: f64,
}

impl Default for PortfolioConfig {
    fn default() -> Self {
        Self {
            budget: 1_000_000.00,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReportConfig {
    pub path: String,
    pub sheet_name: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            path: "recommended_trades.xlsx".to_string(),
            sheet_name: "Recommended Trades".to_string(),
        }
    }
}

/// Effective configuration for one screener run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HqmConfig {
    pub universe: UniverseConfig,
    pub api: ApiConfig,
    pub fetch: FetchConfig,
    pub selection: SelectionConfig,
    pub portfolio: PortfolioConfig,
    pub report: ReportConfig,
}

impl HqmConfig {
    /// Range checks that serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.fetch.batch_size == 0 || self.fetch.batch_size > MAX_BATCH_SIZE {
            return Err(ConfigError::Invalid(format!(
                "fetch.batch_size must be in 1..={MAX_BATCH_SIZE}, got {}",
                self.fetch.batch_size
            )));
        }
        if self.fetch.concurrency == 0 {
            return Err(ConfigError::Invalid(
                "fetch.concurrency must be >= 1".to_string(),
            ));
        }
        if !self.portfolio.budget.is_finite() || self.portfolio.budget <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "portfolio.budget must be a positive amount, got {}",
                self.portfolio.budget
            )));
        }
        if self.api.token_env.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "api.token_env must name an environment variable".to_string(),
            ));
        }
        if self.report.sheet_name.trim().is_empty() || self.report.sheet_name.len() > 31 {
            return Err(ConfigError::Invalid(format!(
                "report.sheet_name must be 1..=31 characters, got '{}'",
                self.report.sheet_name
            )));
        }
        Ok(())
    }

    /// Sorted-key JSON of the effective settings, defaults included.
    pub fn canonical_json(&self) -> Result<String, ConfigError> {
        let value = serde_json::to_value(self)
            .map_err(|e| ConfigError::Parse(format!("canonical json serialize failed: {e}")))?;
        serde_json::to_string(&value)
            .map_err(|e| ConfigError::Parse(format!("canonical json serialize failed: {e}")))
    }

    /// SHA-256 of [`HqmConfig::canonical_json`]. Two runs share a hash exactly
    /// when they run with the same effective settings.
    pub fn config_hash(&self) -> Result<String, ConfigError> {
        Ok(sha256_hex(self.canonical_json()?.as_bytes()))
    }
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// Merged layers. `config_hash` and `canonical_json` describe the effective
/// settings, so a layer restating a default does not change the hash.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config_hash: String,
    pub canonical_json: String,
    pub settings: HqmConfig,
}

pub fn load_layered_yaml(paths: &[&str]) -> Result<LoadedConfig, ConfigError> {
    let mut docs: Vec<String> = Vec::new();
    for p in paths {
        let raw = fs::read_to_string(p).map_err(|e| ConfigError::Read {
            path: p.to_string(),
            message: e.to_string(),
        })?;
        docs.push(raw);
    }

    let doc_refs: Vec<&str> = docs.iter().map(|s| s.as_str()).collect();
    load_layered_yaml_from_strings(&doc_refs)
}

pub fn load_layered_yaml_from_strings(yaml_docs: &[&str]) -> Result<LoadedConfig, ConfigError> {
    let mut merged = serde_json::json!({});
    for raw in yaml_docs {
        let v_yaml: serde_yaml::Value =
            serde_yaml::from_str(raw).map_err(|e| ConfigError::Parse(e.to_string()))?;
        let v_json = serde_json::to_value(v_yaml)
            .map_err(|e| ConfigError::Parse(format!("yaml->json conversion failed: {e}")))?;
        // An empty document parses as null; it contributes nothing.
        if v_json.is_null() {
            continue;
        }
        merged = deep_merge(merged, v_json);
    }

    enforce_no_secret_literals(&merged)?;

    let settings: HqmConfig =
        serde_json::from_value(merged).map_err(|e| ConfigError::Parse(e.to_string()))?;
    settings.validate()?;

    let canonical_json = settings.canonical_json()?;
    let config_hash = sha256_hex(canonical_json.as_bytes());

    tracing::debug!(config_hash = %config_hash, layers = yaml_docs.len(), "config loaded");

    Ok(LoadedConfig {
        config_hash,
        canonical_json,
        settings,
    })
}

fn deep_merge(a: Value, b: Value) -> Value {
    match (a, b) {
        (Value::Object(mut a_map), Value::Object(b_map)) => {
            for (k, b_val) in b_map {
                let a_val = a_map.remove(&k).unwrap_or(Value::Null);
                a_map.insert(k, deep_merge(a_val, b_val));
            }
            Value::Object(a_map)
        }
        (_, b_other) => b_other,
    }
}

fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

fn collect_leaf_pointers(v: &Value, prefix: &str, out: &mut Vec<String>) {
    match v {
        Value::Object(map) => {
            for (k, vv) in map.iter() {
                let next = format!("{}/{}", prefix, escape_pointer_token(k));
                collect_leaf_pointers(vv, &next, out);
            }
        }
        Value::Array(arr) => {
            for (i, vv) in arr.iter().enumerate() {
                let next = format!("{}/{}", prefix, i);
                collect_leaf_pointers(vv, &next, out);
            }
        }
        _ => {
            let p = if prefix.is_empty() {
                "/".to_string()
            } else {
                prefix.to_string()
            };
            out.push(p);
        }
    }
}

fn escape_pointer_token(s: &str) -> String {
    s.replace('~', "~0").replace('/', "~1")
}

fn enforce_no_secret_literals(v: &Value) -> Result<(), ConfigError> {
    let mut leaves = Vec::new();
    collect_leaf_pointers(v, "", &mut leaves);

    for ptr in leaves {
        if let Some(s) = v.pointer(&ptr).and_then(Value::as_str) {
            if looks_like_secret(s) {
                return Err(ConfigError::SecretLiteral { pointer: ptr });
            }
        }
    }
    Ok(())
}

fn looks_like_secret(s: &str) -> bool {
    let t = s.trim();
    if t.len() < 8 {
        return false;
    }
    SECRET_PREFIXES.iter().any(|p| t.starts_with(p))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_layer_set_yields_defaults() {
        let loaded = load_layered_yaml_from_strings(&[]).unwrap();
        assert_eq!(loaded.settings, HqmConfig::default());
        assert_eq!(loaded.settings.selection.top_n, 50);
        assert_eq!(loaded.settings.fetch.batch_size, 100);
        assert_eq!(loaded.settings.portfolio.budget, 1_000_000.0);
    }

    #[test]
    fn empty_document_is_ignored() {
        let loaded = load_layered_yaml_from_strings(&["", "---\n"]).unwrap();
        assert_eq!(loaded.settings, HqmConfig::default());
    }

    #[test]
    fn hash_covers_effective_settings() {
        let empty = load_layered_yaml_from_strings(&[]).unwrap();
        let restated = load_layered_yaml_from_strings(&["selection:\n  top_n: 50\n"]).unwrap();
        assert_eq!(empty.config_hash, restated.config_hash);
        assert_eq!(empty.config_hash, HqmConfig::default().config_hash().unwrap());

        let mut overridden = empty.settings.clone();
        overridden.portfolio.budget = 5_000.0;
        assert_ne!(overridden.config_hash().unwrap(), empty.config_hash);
    }

    #[test]
    fn short_strings_never_flagged_as_secret() {
        assert!(!looks_like_secret("pk_1"));
        assert!(looks_like_secret("Tpk_0123456789abcdef"));
        assert!(!looks_like_secret("IEX_TOKEN"));
    }

    #[test]
    fn pointer_tokens_are_escaped() {
        assert_eq!(escape_pointer_token("a/b~c"), "a~1b~0c");
    }
}
