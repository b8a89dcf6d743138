//! Provider boundary for batch quote retrieval.
//!
//! This module defines only the provider trait and its error type. Chunking
//! lives in [`crate::fetcher`]; the concrete HTTP provider in [`crate::iex`].

use std::fmt;

use crate::Quote;

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// Errors a [`QuoteProvider`] may return. Every variant is fatal for the run.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchError {
    /// Network or transport failure (connect, TLS, timeout).
    Transport(String),
    /// The upstream API answered with a non-success status.
    Api { status: u16, message: String },
    /// The response payload could not be decoded.
    Decode(String),
    /// A requested symbol has no entry in the response.
    MissingSymbol { symbol: String },
    /// A symbol's entry has no price (absent or null).
    MissingPrice { symbol: String },
    /// A symbol's price is not a positive finite number.
    InvalidPrice { symbol: String, price: f64 },
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchError::Transport(msg) => write!(f, "transport error: {msg}"),
            FetchError::Api { status, message } => {
                write!(f, "provider api error status={status}: {message}")
            }
            FetchError::Decode(msg) => write!(f, "decode error: {msg}"),
            FetchError::MissingSymbol { symbol } => {
                write!(f, "response has no entry for symbol '{symbol}'")
            }
            FetchError::MissingPrice { symbol } => {
                write!(f, "response has no price for symbol '{symbol}'")
            }
            FetchError::InvalidPrice { symbol, price } => {
                write!(f, "non-positive price {price} for symbol '{symbol}'")
            }
        }
    }
}

impl std::error::Error for FetchError {}

// ---------------------------------------------------------------------------
// Provider trait
// ---------------------------------------------------------------------------

/// Upstream batch quote provider.
///
/// Object-safe, so callers can hold a `Box<dyn QuoteProvider>`.
#[async_trait::async_trait]
pub trait QuoteProvider: Send + Sync {
    /// Human-readable name identifying this provider (e.g. `"iexcloud"`).
    fn source_name(&self) -> &'static str;

    /// Fetch one batch of symbols.
    ///
    /// Must return exactly one [`Quote`] per requested symbol, in request
    /// order, or an error. A symbol absent from the upstream response is an
    /// error, never a silent omission.
    async fn fetch_batch(&self, symbols: &[String]) -> Result<Vec<Quote>, FetchError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_display() {
        let err = FetchError::Api {
            status: 403,
            message: "forbidden".to_string(),
        };
        assert_eq!(err.to_string(), "provider api error status=403: forbidden");
    }

    #[test]
    fn missing_symbol_display() {
        let err = FetchError::MissingSymbol {
            symbol: "ZZZZ".to_string(),
        };
        assert_eq!(err.to_string(), "response has no entry for symbol 'ZZZZ'");
    }

    #[test]
    fn transport_display() {
        let err = FetchError::Transport("connection refused".to_string());
        assert_eq!(err.to_string(), "transport error: connection refused");
    }
}
