use hqm_md::{Quote, Window};
use serde::{Deserialize, Serialize};

use crate::fixedpoint::Micros;

/// Percentile rank per lookback window, each in [0, 100].
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct WindowPercentiles {
    pub one_year: f64,
    pub six_month: f64,
    pub three_month: f64,
    pub one_month: f64,
}

impl WindowPercentiles {
    pub fn get(&self, window: Window) -> f64 {
        match window {
            Window::OneYear => self.one_year,
            Window::SixMonth => self.six_month,
            Window::ThreeMonth => self.three_month,
            Window::OneMonth => self.one_month,
        }
    }

    pub fn set(&mut self, window: Window, value: f64) {
        match window {
            Window::OneYear => self.one_year = value,
            Window::SixMonth => self.six_month = value,
            Window::ThreeMonth => self.three_month = value,
            Window::OneMonth => self.one_month = value,
        }
    }

    /// Unweighted mean of the four windows.
    pub fn mean(&self) -> f64 {
        (self.one_year + self.six_month + self.three_month + self.one_month) / 4.0
    }
}

/// A fetched instrument with its percentiles and composite (HQM) score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredInstrument {
    pub quote: Quote,
    pub percentiles: WindowPercentiles,
    pub composite_score: f64,
}

impl ScoredInstrument {
    pub fn symbol(&self) -> &str {
        &self.quote.symbol
    }
}

/// A retained instrument with its suggested share count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SizedPosition {
    pub instrument: ScoredInstrument,
    /// Fetched price rounded up to the next micro; sizing divides by this.
    pub price: Micros,
    pub shares_to_buy: u64,
    /// `price * shares_to_buy`.
    pub cost: Micros,
}

/// The final table: retained instruments in rank order plus sizing totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SizedPortfolio {
    pub positions: Vec<SizedPosition>,
    pub total_budget: Micros,
    pub per_instrument_budget: Micros,
    /// Sum of all position costs; never exceeds `total_budget`.
    pub invested: Micros,
}

impl SizedPortfolio {
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}
