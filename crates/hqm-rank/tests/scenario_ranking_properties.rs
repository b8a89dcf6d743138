//! Ranking invariants over a synthetic 120-instrument universe.
//!
//! GREEN when:
//! - every percentile is in [0, 100] and each window's max return scores 100
//! - composite == mean of the four window percentiles, reproducible from returns
//! - retained size == min(top_n, universe), composite non-increasing
//! - percentiles are computed over the full universe, not the selection

use hqm_md::{Quote, Window, WindowReturns};
use hqm_rank::{percentile_of_score, score_universe, select_top, DEFAULT_TOP_N};

/// Deterministic pseudo-random returns (LCG), no external RNG.
fn universe(n: usize) -> Vec<Quote> {
    let mut state: u64 = 0x2545_F491_4F6C_DD1D;
    let mut next = move || {
        state = state.wrapping_mul(6_364_136_223_846_793_005).wrapping_add(1);
        // [-0.5, 1.5) in steps of 0.01 so ties actually happen
        ((state >> 33) % 200) as f64 / 100.0 - 0.5
    };
    (0..n)
        .map(|i| {
            Quote::new(
                format!("S{i:03}"),
                10.0 + i as f64,
                WindowReturns::new(next(), next(), next(), next()),
            )
        })
        .collect()
}

#[test]
fn percentiles_bounded_and_max_scores_100() {
    let quotes = universe(120);
    let scored = score_universe(quotes.clone());

    for window in Window::ALL {
        let max = quotes
            .iter()
            .map(|q| q.returns.get(window))
            .fold(f64::NEG_INFINITY, f64::max);
        for s in &scored {
            let p = s.percentiles.get(window);
            assert!((0.0..=100.0).contains(&p), "{} {:?} = {p}", s.symbol(), window);
            if s.quote.returns.get(window) == max {
                assert_eq!(p, 100.0);
            }
        }
    }
}

#[test]
fn composite_is_reproducible_from_returns() {
    let quotes = universe(120);
    let scored = score_universe(quotes.clone());

    for s in &scored {
        let mut sum = 0.0;
        for window in Window::ALL {
            let mut col: Vec<f64> = quotes.iter().map(|q| q.returns.get(window)).collect();
            col.sort_by(f64::total_cmp);
            let p = percentile_of_score(&col, s.quote.returns.get(window));
            assert_eq!(p, s.percentiles.get(window));
            sum += p;
        }
        assert_eq!(s.composite_score, sum / 4.0);
    }
}

#[test]
fn naive_scan_matches_binary_search() {
    let quotes = universe(120);
    let scored = score_universe(quotes.clone());

    for s in &scored {
        let v = s.quote.returns.one_month;
        let at_or_below = quotes.iter().filter(|q| q.returns.one_month <= v).count();
        let naive = at_or_below as f64 * 100.0 / quotes.len() as f64;
        assert_eq!(naive, s.percentiles.one_month);
    }
}

#[test]
fn selection_size_and_order() {
    let scored = score_universe(universe(120));
    let top = select_top(scored, DEFAULT_TOP_N).unwrap();

    assert_eq!(top.len(), 50);
    for pair in top.windows(2) {
        assert!(pair[0].composite_score >= pair[1].composite_score);
    }

    let small = select_top(score_universe(universe(7)), DEFAULT_TOP_N).unwrap();
    assert_eq!(small.len(), 7);
}

#[test]
fn selection_does_not_rescore() {
    let scored = score_universe(universe(120));
    let before: Vec<(String, f64)> = scored
        .iter()
        .map(|s| (s.symbol().to_string(), s.composite_score))
        .collect();

    let top = select_top(scored, 10).unwrap();
    for s in &top {
        let (_, score) = before.iter().find(|(sym, _)| sym == s.symbol()).unwrap();
        assert_eq!(*score, s.composite_score);
    }
}
