use rust_decimal::Decimal;

use crate::error::BimFinanceError;
use crate::types::{Money, Rate, SensitivityCurve, SensitivityPoint};
use crate::BimFinanceResult;

use super::investment::npv;

/// Evaluate NPV once per sample rate, preserving caller order.
///
/// Pure pointwise evaluation with no aggregation or smoothing, intended for
/// charting the curve and overlaying the IRR crossing point.
pub fn sweep(
    periodic_income: Money,
    cost: Money,
    years: u32,
    rates: &[Rate],
) -> SensitivityCurve {
    let points = rates
        .iter()
        .map(|&rate| SensitivityPoint {
            rate,
            npv: npv(periodic_income, cost, years, rate),
        })
        .collect();
    SensitivityCurve { points }
}

/// Ascending rate grid from `min` to `max` in `step` increments. The max is
/// appended when the step does not land on it exactly.
pub fn rate_range(min: Rate, max: Rate, step: Rate) -> BimFinanceResult<Vec<Rate>> {
    if min < Decimal::ZERO {
        return Err(BimFinanceError::InvalidInput {
            field: "min".into(),
            reason: "Rates are fractions, not percentages; min must be >= 0".into(),
        });
    }
    if min > max {
        return Err(BimFinanceError::InvalidInput {
            field: "min".into(),
            reason: "Min must be <= max".into(),
        });
    }
    if step <= Decimal::ZERO {
        return Err(BimFinanceError::InvalidInput {
            field: "step".into(),
            reason: "Step must be positive".into(),
        });
    }

    let mut values = Vec::new();
    let mut current = min;
    while current <= max {
        values.push(current);
        current += step;
    }
    if let Some(&last) = values.last() {
        if last < max {
            values.push(max);
        }
    }

    Ok(values)
}
