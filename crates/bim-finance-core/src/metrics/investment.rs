use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::types::{CashFlowSeries, Money, Rate};

/// Bracket width below which the bisection is considered converged.
pub const DEFAULT_IRR_PRECISION: Decimal = dec!(0.0001);
/// Upper bound of the IRR search bracket.
pub const DEFAULT_IRR_MAX_RATE: Decimal = dec!(1.0);

/// Return on investment: (revenue - cost) / cost.
///
/// Zero cost saturates to zero instead of dividing by zero.
pub fn roi(revenue: Money, cost: Money) -> Rate {
    if cost.is_zero() {
        return Decimal::ZERO;
    }
    (revenue - cost) / cost
}

/// Net present value of a uniform annuity against an upfront cost:
/// -cost + Σ income / (1+r)^t for t in 1..=years.
///
/// `periodic_income` is a single per-period equivalent figure; callers with
/// a heterogeneous series average it first (see
/// `CashFlowSeries::average_annual_flow`). Callers validate
/// `discount_rate >= 0` upstream.
pub fn npv(periodic_income: Money, cost: Money, years: u32, discount_rate: Rate) -> Money {
    let one_plus_r = Decimal::ONE + discount_rate;
    let mut result = -cost;
    let mut discount = Decimal::ONE;
    for _ in 1..=years {
        discount *= one_plus_r;
        result += periodic_income / discount;
    }
    result
}

/// Exact discounted value of a full series, index 0 undiscounted.
///
/// Enhancement over the annuity approximation; the default scenario path
/// does not use it.
pub fn series_npv(discount_rate: Rate, series: &CashFlowSeries) -> Money {
    let one_plus_r = Decimal::ONE + discount_rate;
    let mut result = Decimal::ZERO;
    let mut discount = Decimal::ONE;
    for (t, cf) in series.flows.iter().enumerate() {
        if t > 0 {
            discount *= one_plus_r;
        }
        result += cf / discount;
    }
    result
}

/// Outcome of the bounded IRR search.
///
/// The bisection always terminates; when the true root lies outside the
/// bracket the result says so instead of reporting a pinned rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "rate", rename_all = "snake_case")]
pub enum IrrOutcome {
    /// Bracket narrowed below the precision; the midpoint is the root.
    Converged(Rate),
    /// NPV is already non-positive at a zero rate: no positive root.
    BelowBracket,
    /// NPV is still positive at the bracket ceiling: the root lies beyond it.
    AboveBracket,
}

impl IrrOutcome {
    /// The converged rate, if any.
    pub fn rate(&self) -> Option<Rate> {
        match self {
            IrrOutcome::Converged(r) => Some(*r),
            _ => None,
        }
    }

    pub fn is_converged(&self) -> bool {
        matches!(self, IrrOutcome::Converged(_))
    }
}

/// Internal rate of return with the default precision and bracket.
pub fn irr(periodic_income: Money, cost: Money, years: u32) -> IrrOutcome {
    irr_with(
        periodic_income,
        cost,
        years,
        DEFAULT_IRR_PRECISION,
        DEFAULT_IRR_MAX_RATE,
    )
}

/// Bisection on [0, max_rate] for the rate where `npv` crosses zero.
///
/// NPV is monotonically non-increasing in the rate for non-negative income,
/// so the bracket halves each step: `low` rises while NPV(mid) is positive,
/// `high` falls otherwise. Iteration count is bounded by
/// log2(max_rate / precision).
pub fn irr_with(
    periodic_income: Money,
    cost: Money,
    years: u32,
    precision: Decimal,
    max_rate: Rate,
) -> IrrOutcome {
    if npv(periodic_income, cost, years, Decimal::ZERO) <= Decimal::ZERO {
        return IrrOutcome::BelowBracket;
    }
    if npv(periodic_income, cost, years, max_rate) > Decimal::ZERO {
        return IrrOutcome::AboveBracket;
    }

    let two = dec!(2);
    let mut low = Decimal::ZERO;
    let mut high = max_rate;
    while high - low > precision {
        let mid = (low + high) / two;
        if npv(periodic_income, cost, years, mid) > Decimal::ZERO {
            low = mid;
        } else {
            high = mid;
        }
    }

    IrrOutcome::Converged((low + high) / two)
}
