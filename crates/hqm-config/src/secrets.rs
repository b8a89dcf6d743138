//! Runtime secret resolution.
//!
//! # Contract
//! - Config YAML stores only the env var NAME (`api.token_env`, e.g. `"IEX_TOKEN"`).
//! - Callers invoke [`resolve_api_token`] once at startup and pass the result
//!   into the provider constructor; no other code reads the environment.
//! - `Debug` output redacts the value.
//! - Errors reference the env var NAME, never the value.

use crate::{ConfigError, HqmConfig};

/// Bearer token for the market-data API. **Redacted in `Debug` output.**
#[derive(Clone, PartialEq, Eq)]
pub struct ApiToken(String);

impl ApiToken {
    pub fn new<S: Into<String>>(token: S) -> Self {
        Self(token.into())
    }

    /// Raw token, for building the request. Do not log.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for ApiToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("ApiToken").field(&"<REDACTED>").finish()
    }
}

/// Resolve a named environment variable.
/// Returns `None` if the variable is unset or its value is blank.
fn resolve_env(var_name: &str) -> Option<String> {
    match std::env::var(var_name) {
        Ok(v) if !v.trim().is_empty() => Some(v),
        _ => None,
    }
}

/// Resolve the API token named by `config.api.token_env`.
///
/// # Errors
/// [`ConfigError::MissingSecret`] carrying the variable NAME when it is unset
/// or blank. Fails before any request is built, so no unauthenticated call
/// is ever sent.
pub fn resolve_api_token(config: &HqmConfig) -> Result<ApiToken, ConfigError> {
    resolve_api_token_with(&config.api.token_env, resolve_env)
}

fn resolve_api_token_with<F>(var_name: &str, lookup: F) -> Result<ApiToken, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let var = var_name.trim();
    lookup(var)
        .map(|v| ApiToken::new(v.trim()))
        .ok_or_else(|| ConfigError::MissingSecret {
            var: var.to_string(),
        })
}
