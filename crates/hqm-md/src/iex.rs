//! IEX Cloud batch provider.
//!
//! One request per batch:
//! `GET {base_url}/stock/market/batch?symbols=A,B,C&types=price,stats&token=...`
//!
//! Response shape (per requested symbol):
//! ```json
//! { "AAPL": { "price": 182.5,
//!             "stats": { "year1ChangePercent": 0.31, "month6ChangePercent": 0.12,
//!                        "month3ChangePercent": 0.05, "month1ChangePercent": -0.01 } } }
//! ```

use std::collections::HashMap;
use std::time::Duration;

use serde::Deserialize;

use crate::provider::{FetchError, QuoteProvider};
use crate::{Quote, Window, WindowReturns};

/// IEX Cloud-backed batch quote provider.
///
/// The token is resolved by the caller and passed in; it is never logged and
/// is stripped from transport error messages.
#[derive(Clone)]
pub struct IexCloudProvider {
    token: String,
    http: reqwest::Client,
    base_url: String,
}

impl std::fmt::Debug for IexCloudProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IexCloudProvider")
            .field("base_url", &self.base_url)
            .field("token", &"<REDACTED>")
            .finish()
    }
}

impl IexCloudProvider {
    pub fn new(token: String, base_url: String) -> Self {
        Self {
            token,
            http: reqwest::Client::new(),
            base_url,
        }
    }

    /// Build with a per-request timeout.
    pub fn with_timeout(
        token: String,
        base_url: String,
        timeout: Duration,
    ) -> Result<Self, FetchError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| FetchError::Transport(e.to_string()))?;
        Ok(Self {
            token,
            http,
            base_url,
        })
    }

    fn build_batch_url(&self) -> String {
        format!("{}/stock/market/batch", self.base_url.trim_end_matches('/'))
    }
}

#[async_trait::async_trait]
impl QuoteProvider for IexCloudProvider {
    fn source_name(&self) -> &'static str {
        "iexcloud"
    }

    async fn fetch_batch(&self, symbols: &[String]) -> Result<Vec<Quote>, FetchError> {
        let symbol_string = symbols.join(",");

        let resp = self
            .http
            .get(self.build_batch_url())
            .query(&[
                ("symbols", symbol_string.as_str()),
                ("types", "price,stats"),
                ("token", self.token.as_str()),
            ])
            .send()
            .await
            .map_err(|e| FetchError::Transport(e.without_url().to_string()))?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| FetchError::Transport(e.without_url().to_string()))?;

        if !status.is_success() {
            return Err(FetchError::Api {
                status: status.as_u16(),
                message: truncate(body.trim(), 200),
            });
        }

        let batch: HashMap<String, IexSymbolEntry> =
            serde_json::from_str(&body).map_err(|e| FetchError::Decode(e.to_string()))?;

        normalize_batch(symbols, batch)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
struct IexSymbolEntry {
    #[serde(default)]
    price: Option<f64>,
    #[serde(default)]
    stats: Option<IexStats>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IexStats {
    #[serde(default)]
    year1_change_percent: Option<f64>,
    #[serde(default)]
    month6_change_percent: Option<f64>,
    #[serde(default)]
    month3_change_percent: Option<f64>,
    #[serde(default)]
    month1_change_percent: Option<f64>,
}

impl IexStats {
    fn field(&self, window: Window) -> Option<f64> {
        match window {
            Window::OneYear => self.year1_change_percent,
            Window::SixMonth => self.month6_change_percent,
            Window::ThreeMonth => self.month3_change_percent,
            Window::OneMonth => self.month1_change_percent,
        }
    }
}

/// Turn a decoded batch into one [`Quote`] per requested symbol, in request order.
///
/// - symbol absent from the response: [`FetchError::MissingSymbol`]
/// - price absent/null: [`FetchError::MissingPrice`]
/// - price <= 0 or non-finite: [`FetchError::InvalidPrice`]
/// - any change field (or the whole `stats` block) absent/null: 0.0
fn normalize_batch(
    symbols: &[String],
    batch: HashMap<String, IexSymbolEntry>,
) -> Result<Vec<Quote>, FetchError> {
    let mut out = Vec::with_capacity(symbols.len());

    for sym in symbols {
        // IEX upper-cases keys; accept that spelling for lower-case input.
        let entry = batch
            .get(sym)
            .or_else(|| batch.get(&sym.to_ascii_uppercase()))
            .ok_or_else(|| FetchError::MissingSymbol {
                symbol: sym.clone(),
            })?;

        let price = entry.price.ok_or_else(|| FetchError::MissingPrice {
            symbol: sym.clone(),
        })?;
        if !price.is_finite() || price <= 0.0 {
            return Err(FetchError::InvalidPrice {
                symbol: sym.clone(),
                price,
            });
        }

        let stats = entry.stats.clone().unwrap_or_default();
        let mut zero_filled = 0u8;
        let mut ret = |w: Window| match stats.field(w) {
            Some(v) if v.is_finite() => v,
            _ => {
                zero_filled += 1;
                0.0
            }
        };
        let returns = WindowReturns::new(
            ret(Window::OneYear),
            ret(Window::SixMonth),
            ret(Window::ThreeMonth),
            ret(Window::OneMonth),
        );

        if zero_filled > 0 {
            tracing::debug!(symbol = %sym, zero_filled, "missing change fields treated as zero return");
        }

        out.push(Quote {
            symbol: sym.clone(),
            price,
            returns,
            zero_filled,
        });
    }

    Ok(out)
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let mut t: String = s.chars().take(max).collect();
        t.push('…');
        t
    }
}
