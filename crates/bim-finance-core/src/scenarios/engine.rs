use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::error::BimFinanceError;
use crate::metrics::investment::{self, IrrOutcome};
use crate::projection::cash_flow;
use crate::types::{with_metadata, BuildingMetrics, CashFlowSeries, ComputationOutput, Money, Rate};
use crate::BimFinanceResult;

/// Discount rate applied when a scenario does not specify one.
pub const DEFAULT_DISCOUNT_RATE: Decimal = dec!(0.1);

/// A named exploitation strategy evaluated against the building totals.
/// One immutable instance per evaluation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioParameters {
    /// Display name, also the key of the resulting report
    pub name: String,
    /// Fraction of the total area let out
    pub rent_share: Rate,
    /// Fraction of the total area sold at project exit
    pub sale_share: Rate,
    /// Price per unit of area (annual rent, and sale price)
    pub price_per_area: Money,
    /// Projection horizon in years
    pub years: u32,
    /// Fraction of the rented area actually generating income
    pub occupancy: Rate,
    /// Year-on-year rent escalation from the start year onward
    pub growth_rate: Rate,
    /// First operating year with rent income (1-based)
    pub start_year: u32,
    /// Discount rate for NPV; 10% when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount_rate: Option<Rate>,
}

impl ScenarioParameters {
    pub fn discount_rate_or_default(&self) -> Rate {
        self.discount_rate.unwrap_or(DEFAULT_DISCOUNT_RATE)
    }
}

/// Raw evaluation result for one scenario. All fields are unformatted
/// numerics for programmatic comparison; see `report` for display
/// rendering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioReport {
    pub name: String,
    pub roi: Rate,
    pub npv: Money,
    pub irr: IrrOutcome,
    /// Sum of strictly positive series entries
    pub total_income: Money,
    /// Uniform-annuity stand-in fed to the NPV/IRR recurrences
    pub yearly_income_equivalent: Money,
    pub series: CashFlowSeries,
}

/// Evaluate one scenario against the building totals.
pub fn evaluate_scenario(
    params: &ScenarioParameters,
    building: &BuildingMetrics,
) -> BimFinanceResult<ComputationOutput<ScenarioReport>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    validate_parameters(params, &mut warnings)?;
    validate_building(building)?;

    let (report, mut eval_warnings) = evaluate_unchecked(params, building);
    warnings.append(&mut eval_warnings);

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Exploitation Scenario Evaluation (annuity-equivalent NPV/IRR)",
        params,
        warnings,
        elapsed,
        report,
    ))
}

/// Evaluate a batch of scenarios independently, preserving input order.
///
/// Any invalid scenario fails the whole batch before evaluation starts;
/// degenerate IRRs do not, so partial results stay reportable.
pub fn compare_scenarios(
    scenarios: &[ScenarioParameters],
    building: &BuildingMetrics,
) -> BimFinanceResult<ComputationOutput<Vec<ScenarioReport>>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    if scenarios.is_empty() {
        return Err(BimFinanceError::InsufficientData(
            "At least one scenario required".into(),
        ));
    }

    for params in scenarios {
        let mut scenario_warnings = Vec::new();
        validate_parameters(params, &mut scenario_warnings)?;
        for w in scenario_warnings {
            warnings.push(format!("[{}] {w}", params.name));
        }
    }
    validate_building(building)?;

    #[cfg(feature = "parallel")]
    let evaluated: Vec<(ScenarioReport, Vec<String>)> = scenarios
        .par_iter()
        .map(|params| evaluate_unchecked(params, building))
        .collect();

    #[cfg(not(feature = "parallel"))]
    let evaluated: Vec<(ScenarioReport, Vec<String>)> = scenarios
        .iter()
        .map(|params| evaluate_unchecked(params, building))
        .collect();

    let mut reports = Vec::with_capacity(evaluated.len());
    for (report, eval_warnings) in evaluated {
        for w in eval_warnings {
            warnings.push(format!("[{}] {w}", report.name));
        }
        reports.push(report);
    }

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Exploitation Scenario Comparison",
        &serde_json::json!({
            "num_scenarios": scenarios.len(),
            "total_area": building.total_area.to_string(),
            "total_cost": building.total_cost.to_string(),
        }),
        warnings,
        elapsed,
        reports,
    ))
}

/// Rank reports by descending NPV. Pure: the input sequence keeps its
/// order; ties keep it too (stable sort).
pub fn rank_by_npv(reports: &[ScenarioReport]) -> Vec<ScenarioReport> {
    let mut ranked = reports.to_vec();
    ranked.sort_by(|a, b| b.npv.cmp(&a.npv));
    ranked
}

/// Core evaluation, inputs already validated. Shared by the single and
/// batch paths; returns its own warnings so batch evaluation needs no
/// shared state.
fn evaluate_unchecked(
    params: &ScenarioParameters,
    building: &BuildingMetrics,
) -> (ScenarioReport, Vec<String>) {
    let mut warnings: Vec<String> = Vec::new();

    let rent_area = building.total_area * params.rent_share;
    let sale_area = building.total_area * params.sale_share;

    let series = cash_flow::project(
        rent_area,
        sale_area,
        params.price_per_area,
        building.total_cost,
        params.years,
        params.occupancy,
        params.growth_rate,
        params.start_year,
    );

    let total_income = series.positive_income();
    let yearly_income_equivalent = series.average_annual_flow();

    let roi = investment::roi(total_income, building.total_cost);
    let npv = investment::npv(
        yearly_income_equivalent,
        building.total_cost,
        params.years,
        params.discount_rate_or_default(),
    );
    let irr = investment::irr(yearly_income_equivalent, building.total_cost, params.years);

    match irr {
        IrrOutcome::BelowBracket => warnings.push(
            "Cash flows never break even within the IRR bracket; IRR reported as out of bracket"
                .into(),
        ),
        IrrOutcome::AboveBracket => warnings.push(format!(
            "IRR exceeds the {} search ceiling; reported as out of bracket",
            investment::DEFAULT_IRR_MAX_RATE
        )),
        IrrOutcome::Converged(_) => {}
    }

    let report = ScenarioReport {
        name: params.name.clone(),
        roi,
        npv,
        irr,
        total_income,
        yearly_income_equivalent,
        series,
    };

    (report, warnings)
}

fn validate_parameters(
    params: &ScenarioParameters,
    warnings: &mut Vec<String>,
) -> BimFinanceResult<()> {
    if params.years < 1 {
        return Err(BimFinanceError::InvalidInput {
            field: "years".into(),
            reason: "Projection horizon must be at least 1 year".into(),
        });
    }

    if params.start_year < 1 || params.start_year > params.years {
        return Err(BimFinanceError::InvalidInput {
            field: "start_year".into(),
            reason: format!("Start year must be within [1, {}]", params.years),
        });
    }

    check_fraction("rent_share", params.rent_share)?;
    check_fraction("sale_share", params.sale_share)?;
    check_fraction("occupancy", params.occupancy)?;

    if params.growth_rate < dec!(-1) {
        return Err(BimFinanceError::InvalidInput {
            field: "growth_rate".into(),
            reason: "Growth rate cannot decay below -100%".into(),
        });
    }

    if params.price_per_area < Decimal::ZERO {
        return Err(BimFinanceError::InvalidInput {
            field: "price_per_area".into(),
            reason: "Price per unit of area must be non-negative".into(),
        });
    }

    if let Some(rate) = params.discount_rate {
        if rate < Decimal::ZERO {
            return Err(BimFinanceError::InvalidInput {
                field: "discount_rate".into(),
                reason: "Discount rate must be non-negative".into(),
            });
        }
    }

    // Shares are independent fractions of the same total area; a held-back
    // remainder is fine, allocating more than the building is suspicious.
    let allocated = params.rent_share + params.sale_share;
    if allocated > Decimal::ONE {
        warnings.push(format!(
            "rent_share + sale_share = {allocated} allocates more than the measured area"
        ));
    }

    Ok(())
}

fn check_fraction(field: &str, value: Rate) -> BimFinanceResult<()> {
    if value < Decimal::ZERO || value > Decimal::ONE {
        return Err(BimFinanceError::InvalidInput {
            field: field.into(),
            reason: "Must be a fraction between 0 and 1".into(),
        });
    }
    Ok(())
}

fn validate_building(building: &BuildingMetrics) -> BimFinanceResult<()> {
    if building.total_area < Decimal::ZERO {
        return Err(BimFinanceError::InvalidInput {
            field: "total_area".into(),
            reason: "Total area must be non-negative".into(),
        });
    }
    if building.total_cost < Decimal::ZERO {
        return Err(BimFinanceError::InvalidInput {
            field: "total_cost".into(),
            reason: "Total cost must be non-negative".into(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn building() -> BuildingMetrics {
        BuildingMetrics {
            total_area: dec!(1000),
            total_cost: dec!(500000),
        }
    }

    fn mixed_scenario() -> ScenarioParameters {
        ScenarioParameters {
            name: "Mixed".into(),
            rent_share: dec!(0.6),
            sale_share: dec!(0.4),
            price_per_area: dec!(2500),
            years: 5,
            occupancy: dec!(0.9),
            growth_rate: Decimal::ZERO,
            start_year: 1,
            discount_rate: Some(dec!(0.1)),
        }
    }

    #[test]
    fn test_evaluate_mixed_scenario() {
        let result = evaluate_scenario(&mixed_scenario(), &building()).unwrap();
        let report = &result.result;

        // Rent 600 m² at 2500/yr and 90% occupancy: 1,350,000/yr.
        // Sale of 400 m² at 2500 adds 1,000,000 to year 5.
        assert_eq!(report.series.flows.len(), 6);
        assert_eq!(report.series.flows[0], dec!(-500000));
        assert_eq!(report.series.flows[1], dec!(1350000.0));
        assert_eq!(report.series.flows[5], dec!(2350000.0));

        // Positive income: 4 * 1.35M + 2.35M = 7.75M
        assert_eq!(report.total_income, dec!(7750000.0));
        // ROI = (7.75M - 0.5M) / 0.5M = 14.5
        assert_eq!(report.roi, dec!(14.5));
        // Annuity equivalent: 7.75M / 5 = 1.55M
        assert_eq!(report.yearly_income_equivalent, dec!(1550000.0));
        assert!(report.npv > dec!(5000000));
    }

    #[test]
    fn test_high_return_irr_is_above_bracket() {
        let result = evaluate_scenario(&mixed_scenario(), &building()).unwrap();
        assert_eq!(result.result.irr, IrrOutcome::AboveBracket);
        assert_eq!(result.result.irr.rate(), None);
        assert!(result
            .warnings
            .iter()
            .any(|w| w.contains("out of bracket")));
    }

    #[test]
    fn test_converged_irr_round_trip() {
        // Annuity equivalent of 1000/yr against a 3791 outlay roots at ~10%.
        let params = ScenarioParameters {
            name: "Annuity".into(),
            rent_share: Decimal::ONE,
            sale_share: Decimal::ZERO,
            price_per_area: dec!(1000),
            years: 5,
            occupancy: Decimal::ONE,
            growth_rate: Decimal::ZERO,
            start_year: 1,
            discount_rate: None,
        };
        let building = BuildingMetrics {
            total_area: Decimal::ONE,
            total_cost: dec!(3791),
        };
        let result = evaluate_scenario(&params, &building).unwrap();
        let rate = result.result.irr.rate().expect("should converge");
        assert!((rate - dec!(0.10)).abs() < dec!(0.001), "got {rate}");
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_default_discount_rate_applied() {
        let mut params = mixed_scenario();
        params.discount_rate = None;
        let defaulted = evaluate_scenario(&params, &building()).unwrap();
        let explicit = evaluate_scenario(&mixed_scenario(), &building()).unwrap();
        assert_eq!(defaulted.result.npv, explicit.result.npv);
    }

    #[test]
    fn test_years_zero_rejected() {
        let mut params = mixed_scenario();
        params.years = 0;
        let err = evaluate_scenario(&params, &building()).unwrap_err();
        match err {
            BimFinanceError::InvalidInput { field, .. } => assert_eq!(field, "years"),
            other => panic!("Expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn test_start_year_bounds_rejected() {
        let mut params = mixed_scenario();
        params.start_year = 0;
        assert!(evaluate_scenario(&params, &building()).is_err());

        params.start_year = 6;
        assert!(evaluate_scenario(&params, &building()).is_err());
    }

    #[test]
    fn test_share_and_occupancy_ranges_rejected() {
        let mut params = mixed_scenario();
        params.rent_share = dec!(1.5);
        assert!(evaluate_scenario(&params, &building()).is_err());

        let mut params = mixed_scenario();
        params.sale_share = dec!(-0.1);
        assert!(evaluate_scenario(&params, &building()).is_err());

        let mut params = mixed_scenario();
        params.occupancy = dec!(1.01);
        assert!(evaluate_scenario(&params, &building()).is_err());
    }

    #[test]
    fn test_growth_below_full_decay_rejected() {
        let mut params = mixed_scenario();
        params.growth_rate = dec!(-1.5);
        assert!(evaluate_scenario(&params, &building()).is_err());
    }

    #[test]
    fn test_negative_discount_rate_rejected() {
        let mut params = mixed_scenario();
        params.discount_rate = Some(dec!(-0.05));
        assert!(evaluate_scenario(&params, &building()).is_err());
    }

    #[test]
    fn test_overallocation_warns_but_succeeds() {
        let mut params = mixed_scenario();
        params.rent_share = dec!(0.8);
        params.sale_share = dec!(0.5);
        let result = evaluate_scenario(&params, &building()).unwrap();
        assert!(result
            .warnings
            .iter()
            .any(|w| w.contains("more than the measured area")));
    }

    #[test]
    fn test_zero_cost_building_saturates_roi() {
        let free_building = BuildingMetrics {
            total_area: dec!(100),
            total_cost: Decimal::ZERO,
        };
        let result = evaluate_scenario(&mixed_scenario(), &free_building).unwrap();
        assert_eq!(result.result.roi, Decimal::ZERO);
    }

    #[test]
    fn test_compare_preserves_order_and_names() {
        let mut second = mixed_scenario();
        second.name = "Rent only".into();
        second.rent_share = Decimal::ONE;
        second.sale_share = Decimal::ZERO;

        let scenarios = vec![mixed_scenario(), second];
        let result = compare_scenarios(&scenarios, &building()).unwrap();
        let reports = &result.result;

        assert_eq!(reports.len(), 2);
        assert_eq!(reports[0].name, "Mixed");
        assert_eq!(reports[1].name, "Rent only");
    }

    #[test]
    fn test_compare_matches_individual_evaluation() {
        let scenarios = vec![mixed_scenario()];
        let batch = compare_scenarios(&scenarios, &building()).unwrap();
        let single = evaluate_scenario(&mixed_scenario(), &building()).unwrap();
        assert_eq!(batch.result[0].npv, single.result.npv);
        assert_eq!(batch.result[0].roi, single.result.roi);
        assert_eq!(batch.result[0].irr, single.result.irr);
    }

    #[test]
    fn test_rank_by_npv_leaves_input_untouched() {
        let mut cheap = mixed_scenario();
        cheap.name = "Low rent".into();
        cheap.price_per_area = dec!(600);

        let scenarios = vec![cheap, mixed_scenario()];
        let result = compare_scenarios(&scenarios, &building()).unwrap();

        let ranked = rank_by_npv(&result.result);
        assert_eq!(ranked[0].name, "Mixed");
        assert_eq!(ranked[1].name, "Low rent");
        // Input sequence still in evaluation order.
        assert_eq!(result.result[0].name, "Low rent");
    }

    #[test]
    fn test_compare_empty_batch_rejected() {
        assert!(compare_scenarios(&[], &building()).is_err());
    }

    #[test]
    fn test_compare_prefixes_warnings_with_scenario_name() {
        let mut params = mixed_scenario();
        params.rent_share = dec!(0.9);
        params.sale_share = dec!(0.9);
        let result = compare_scenarios(&[params], &building()).unwrap();
        assert!(result.warnings.iter().any(|w| w.starts_with("[Mixed]")));
    }
}
