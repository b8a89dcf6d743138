//! hqm-md
//!
//! Market-data boundary for the HQM screener:
//! - [`universe`]: read the ticker universe from CSV.
//! - [`provider`]: the quote provider trait and its error type.
//! - [`iex`]: IEX Cloud batch `price,stats` provider.
//! - [`fetcher`]: chunk the universe and drive a provider, one request per chunk.
//!
//! Nothing here ranks, sizes or writes reports; callers hand the resulting
//! `Vec<Quote>` to `hqm-rank`.

pub mod fetcher;
pub mod iex;
pub mod provider;
pub mod universe;

pub use fetcher::{chunk_symbols, dedupe_symbols, BatchFetcher, FetchOutcome};
pub use iex::IexCloudProvider;
pub use provider::{FetchError, QuoteProvider};
pub use universe::{load_universe, parse_universe_reader, UniverseError};

use serde::{Deserialize, Serialize};

/// Lookback window over which a return is measured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Window {
    OneYear,
    SixMonth,
    ThreeMonth,
    OneMonth,
}

impl Window {
    /// All windows in report order (longest first).
    pub const ALL: [Window; 4] = [
        Window::OneYear,
        Window::SixMonth,
        Window::ThreeMonth,
        Window::OneMonth,
    ];

    /// Human label used in report headers.
    pub fn label(&self) -> &'static str {
        match self {
            Window::OneYear => "One Year",
            Window::SixMonth => "Six Month",
            Window::ThreeMonth => "Three Month",
            Window::OneMonth => "One Month",
        }
    }
}

/// Fractional returns per window (0.10 = +10 %).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct WindowReturns {
    pub one_year: f64,
    pub six_month: f64,
    pub three_month: f64,
    pub one_month: f64,
}

impl WindowReturns {
    pub fn new(one_year: f64, six_month: f64, three_month: f64, one_month: f64) -> Self {
        Self {
            one_year,
            six_month,
            three_month,
            one_month,
        }
    }

    pub fn get(&self, window: Window) -> f64 {
        match window {
            Window::OneYear => self.one_year,
            Window::SixMonth => self.six_month,
            Window::ThreeMonth => self.three_month,
            Window::OneMonth => self.one_month,
        }
    }
}

/// One fetched instrument: price plus the four window returns.
///
/// Invariant: `price` is finite and > 0 (the provider rejects anything else).
/// Missing returns have already been normalized to 0; `zero_filled` counts how
/// many of the four were missing so callers can report the data gap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub symbol: String,
    pub price: f64,
    pub returns: WindowReturns,
    pub zero_filled: u8,
}

impl Quote {
    pub fn new<S: Into<String>>(symbol: S, price: f64, returns: WindowReturns) -> Self {
        Self {
            symbol: symbol.into(),
            price,
            returns,
            zero_filled: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_order_is_longest_first() {
        let labels: Vec<&str> = Window::ALL.iter().map(|w| w.label()).collect();
        assert_eq!(labels, ["One Year", "Six Month", "Three Month", "One Month"]);
    }

    #[test]
    fn window_returns_get_matches_fields() {
        let r = WindowReturns::new(0.4, 0.3, 0.2, 0.1);
        assert_eq!(r.get(Window::OneYear), 0.4);
        assert_eq!(r.get(Window::SixMonth), 0.3);
        assert_eq!(r.get(Window::ThreeMonth), 0.2);
        assert_eq!(r.get(Window::OneMonth), 0.1);
    }
}
