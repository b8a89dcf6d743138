//! Scorer: percentile of score per window, then the composite.
//!
//! Percentile semantics: the percentage of the universe whose return is
//! less than or equal to the instrument's return. Ties share a percentile;
//! the maximum always scores 100. Each window column is sorted once and
//! queried with a binary search, O(n log n) per window.

use hqm_md::{Quote, Window};

use crate::types::{ScoredInstrument, WindowPercentiles};

/// Percentage of `sorted` values that are `<= value`.
///
/// `sorted` must be ascending. Returns 0.0 for an empty slice.
pub fn percentile_of_score(sorted: &[f64], value: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    let at_or_below = sorted.partition_point(|x| *x <= value);
    at_or_below as f64 * 100.0 / sorted.len() as f64
}

/// Score every quote against the whole universe. Output order = input order.
pub fn score_universe(quotes: Vec<Quote>) -> Vec<ScoredInstrument> {
    let mut percentiles = vec![WindowPercentiles::default(); quotes.len()];

    for window in Window::ALL {
        let mut column: Vec<f64> = quotes.iter().map(|q| q.returns.get(window)).collect();
        column.sort_by(f64::total_cmp);

        for (q, p) in quotes.iter().zip(percentiles.iter_mut()) {
            p.set(window, percentile_of_score(&column, q.returns.get(window)));
        }
    }

    quotes
        .into_iter()
        .zip(percentiles)
        .map(|(quote, percentiles)| ScoredInstrument {
            quote,
            composite_score: percentiles.mean(),
            percentiles,
        })
        .collect()
}
