//! Position sizer: equal-budget split, whole shares only.
//!
//! `per_instrument_budget = floor(total_budget / retained_count)` and
//! `shares = floor(per_instrument_budget / price)`, both in micros. The price
//! is rounded up to the next micro first, so the invested total at the exact
//! fetched prices can never exceed the budget.

use crate::error::RankError;
use crate::fixedpoint::Micros;
use crate::types::{ScoredInstrument, SizedPortfolio, SizedPosition};

pub fn size_positions(
    selection: Vec<ScoredInstrument>,
    total_budget: Micros,
) -> Result<SizedPortfolio, RankError> {
    if selection.is_empty() {
        return Err(RankError::EmptySelection);
    }
    if !total_budget.is_positive() {
        return Err(RankError::NonPositiveBudget);
    }

    let per_instrument_budget = total_budget
        .split_floor(selection.len())
        .ok_or(RankError::EmptySelection)?;

    let mut invested = Micros::ZERO;
    let mut positions = Vec::with_capacity(selection.len());

    for instrument in selection {
        let price = Micros::from_decimal_ceil(instrument.quote.price)
            .filter(|p| p.is_positive())
            .ok_or_else(|| RankError::NonPositivePrice {
                symbol: instrument.quote.symbol.clone(),
            })?;

        let shares_to_buy = per_instrument_budget
            .units_affordable(price)
            .ok_or_else(|| RankError::NonPositivePrice {
                symbol: instrument.quote.symbol.clone(),
            })?;

        let cost = price
            .checked_mul_qty(shares_to_buy)
            .ok_or_else(|| RankError::Overflow {
                symbol: instrument.quote.symbol.clone(),
            })?;
        invested = invested
            .checked_add(cost)
            .ok_or_else(|| RankError::Overflow {
                symbol: instrument.quote.symbol.clone(),
            })?;

        positions.push(SizedPosition {
            instrument,
            price,
            shares_to_buy,
            cost,
        });
    }

    tracing::debug!(
        positions = positions.len(),
        per_instrument_budget = %per_instrument_budget,
        invested = %invested,
        "positions sized"
    );

    Ok(SizedPortfolio {
        positions,
        total_budget,
        per_instrument_budget,
        invested,
    })
}
