//! Selector: rank by composite score and keep the top N.

use crate::error::RankError;
use crate::types::ScoredInstrument;

/// Default number of retained instruments.
pub const DEFAULT_TOP_N: usize = 50;

/// Sort by composite score descending and keep the first `top_n`.
///
/// The sort is stable: equal scores keep their input (universe) order. Fewer
/// than `top_n` instruments are returned as-is, never padded. An empty result
/// is [`RankError::EmptySelection`].
pub fn select_top(
    mut scored: Vec<ScoredInstrument>,
    top_n: usize,
) -> Result<Vec<ScoredInstrument>, RankError> {
    scored.sort_by(|a, b| b.composite_score.total_cmp(&a.composite_score));
    scored.truncate(top_n);

    if scored.is_empty() {
        return Err(RankError::EmptySelection);
    }
    Ok(scored)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::WindowPercentiles;
    use hqm_md::{Quote, WindowReturns};

    fn scored(sym: &str, score: f64) -> ScoredInstrument {
        ScoredInstrument {
            quote: Quote::new(sym, 1.0, WindowReturns::default()),
            percentiles: WindowPercentiles::default(),
            composite_score: score,
        }
    }

    fn symbols(v: &[ScoredInstrument]) -> Vec<&str> {
        v.iter().map(|s| s.symbol()).collect()
    }

    #[test]
    fn sorts_descending_and_truncates() {
        let input = vec![scored("A", 10.0), scored("B", 90.0), scored("C", 50.0)];
        let top = select_top(input, 2).unwrap();
        assert_eq!(symbols(&top), ["B", "C"]);
    }

    #[test]
    fn ties_keep_input_order() {
        let input = vec![
            scored("X", 50.0),
            scored("Y", 75.0),
            scored("Z", 50.0),
            scored("W", 50.0),
        ];
        let top = select_top(input, 10).unwrap();
        assert_eq!(symbols(&top), ["Y", "X", "Z", "W"]);
    }

    #[test]
    fn small_universe_is_not_padded() {
        let top = select_top(vec![scored("A", 1.0)], DEFAULT_TOP_N).unwrap();
        assert_eq!(top.len(), 1);
    }

    #[test]
    fn empty_input_is_empty_selection() {
        assert_eq!(select_top(Vec::new(), 50), Err(RankError::EmptySelection));
    }

    #[test]
    fn zero_top_n_is_empty_selection() {
        assert_eq!(
            select_top(vec![scored("A", 1.0)], 0),
            Err(RankError::EmptySelection)
        );
    }
}
