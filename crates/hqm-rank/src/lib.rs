//! hqm-rank
//!
//! High-quality momentum ranking over a fetched universe:
//! - percentile of score per lookback window over the whole universe
//! - composite (HQM) score = mean of the four window percentiles
//! - stable descending selection of the top N
//! - equal-budget position sizing in whole shares
//!
//! Pure deterministic logic: no IO, no clock, no randomness.

mod error;
mod types;

pub mod fixedpoint;
pub mod score;
pub mod select;
pub mod sizing;

pub use error::RankError;
pub use fixedpoint::{Micros, MICROS_SCALE};
pub use score::{percentile_of_score, score_universe};
pub use select::{select_top, DEFAULT_TOP_N};
pub use sizing::size_positions;
pub use types::{ScoredInstrument, SizedPortfolio, SizedPosition, WindowPercentiles};

use hqm_md::Quote;

/// Score, select and size in one pass.
///
/// Percentiles are computed over all of `quotes` before selection; the
/// per-instrument budget is computed after selection. An empty universe
/// fails with [`RankError::EmptySelection`] at the selection step.
pub fn rank_and_size(
    quotes: Vec<Quote>,
    top_n: usize,
    total_budget: Micros,
) -> Result<SizedPortfolio, RankError> {
    let universe = quotes.len();
    let scored = score_universe(quotes);
    let selection = select_top(scored, top_n)?;

    tracing::info!(
        universe,
        selected = selection.len(),
        top_n,
        "instruments ranked"
    );

    size_positions(selection, total_budget)
}
