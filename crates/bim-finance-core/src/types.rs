use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// All monetary values. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Rates expressed as decimals (0.05 = 5%). Never as percentages.
pub type Rate = Decimal;

/// Measured areas in a single implied unit (m²).
pub type Area = Decimal;

/// Building totals derived once from the measured rows. Consumed by the
/// engine, never mutated.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BuildingMetrics {
    pub total_area: Area,
    pub total_cost: Money,
}

/// Year-indexed signed cash flows. Index 0 carries the initial outlay as a
/// negative value; indices 1..=years are the periodic net flows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CashFlowSeries {
    pub flows: Vec<Money>,
}

impl CashFlowSeries {
    pub fn new(flows: Vec<Money>) -> Self {
        CashFlowSeries { flows }
    }

    /// Number of operating years covered by the series.
    pub fn years(&self) -> usize {
        self.flows.len().saturating_sub(1)
    }

    /// The year-0 outlay (negative by construction).
    pub fn initial_outlay(&self) -> Money {
        self.flows.first().copied().unwrap_or(Decimal::ZERO)
    }

    /// The periodic flows, indices 1..=years.
    pub fn operating_flows(&self) -> &[Money] {
        if self.flows.is_empty() {
            &[]
        } else {
            &self.flows[1..]
        }
    }

    /// Sum of strictly positive entries. The outlay is excluded by sign,
    /// and so is any zero-or-negative operating year: realized inflows
    /// only, not net-of-negative-years.
    pub fn positive_income(&self) -> Money {
        self.flows
            .iter()
            .filter(|cf| **cf > Decimal::ZERO)
            .sum()
    }

    /// Mean of the operating flows: the uniform-annuity stand-in fed to
    /// the NPV/IRR recurrences. Discards the timing shape of the series.
    pub fn average_annual_flow(&self) -> Money {
        let operating = self.operating_flows();
        if operating.is_empty() {
            return Decimal::ZERO;
        }
        let total: Money = operating.iter().sum();
        total / Decimal::from(operating.len() as u64)
    }
}

/// One sampled point of an NPV-versus-rate curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SensitivityPoint {
    pub rate: Rate,
    pub npv: Money,
}

/// Pointwise NPV curve in caller-supplied rate order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensitivityCurve {
    pub points: Vec<SensitivityPoint>,
}

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "rust_decimal_128bit".to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_positive_income_skips_outlay_and_zero_years() {
        let series = CashFlowSeries::new(vec![dec!(-500), dec!(0), dec!(1000), dec!(-20)]);
        assert_eq!(series.positive_income(), dec!(1000));
    }

    #[test]
    fn test_average_annual_flow() {
        let series = CashFlowSeries::new(vec![dec!(-500), dec!(0), dec!(1000), dec!(1000)]);
        // (0 + 1000 + 1000) / 3
        assert_eq!(series.average_annual_flow(), dec!(2000) / dec!(3));
    }

    #[test]
    fn test_average_annual_flow_empty() {
        let series = CashFlowSeries::new(vec![dec!(-500)]);
        assert_eq!(series.average_annual_flow(), Decimal::ZERO);
        assert_eq!(series.years(), 0);
    }

    #[test]
    fn test_initial_outlay() {
        let series = CashFlowSeries::new(vec![dec!(-500), dec!(100)]);
        assert_eq!(series.initial_outlay(), dec!(-500));
        assert_eq!(series.operating_flows(), &[dec!(100)]);
    }
}
