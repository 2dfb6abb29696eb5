use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use bim_finance_core::metrics::sensitivity::{rate_range, sweep};
use bim_finance_core::scenarios::engine::{self, ScenarioParameters};
use bim_finance_core::types::BuildingMetrics;

use crate::input;

/// Arguments for single-scenario evaluation
#[derive(Args)]
pub struct ScenarioArgs {
    /// Path to a JSON or YAML scenario file
    #[arg(long)]
    pub input: Option<String>,

    /// Total measured building area
    #[arg(long)]
    pub total_area: Decimal,

    /// Total construction cost
    #[arg(long)]
    pub total_cost: Decimal,

    /// Emit formatted display rows instead of raw numerics
    #[arg(long)]
    pub display: bool,
}

/// Arguments for batch scenario comparison
#[derive(Args)]
pub struct CompareArgs {
    /// Path to a JSON or YAML file holding an array of scenarios
    #[arg(long)]
    pub input: Option<String>,

    /// Total measured building area
    #[arg(long)]
    pub total_area: Decimal,

    /// Total construction cost
    #[arg(long)]
    pub total_cost: Decimal,

    /// Emit formatted display rows instead of raw numerics
    #[arg(long)]
    pub display: bool,

    /// Order the reports by descending NPV instead of input order
    #[arg(long)]
    pub rank: bool,
}

/// Arguments for NPV sensitivity sweeps
#[derive(Args)]
pub struct SensitivityArgs {
    /// Path to a JSON or YAML scenario file
    #[arg(long)]
    pub input: Option<String>,

    /// Total measured building area
    #[arg(long)]
    pub total_area: Decimal,

    /// Total construction cost
    #[arg(long)]
    pub total_cost: Decimal,

    /// Discount-rate sweep in the form min:max:step
    /// (e.g. "0.01:0.25:0.01")
    #[arg(long, default_value = "0.01:0.25:0.01")]
    pub rates: String,
}

pub fn run_scenario(args: ScenarioArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let params: ScenarioParameters = load_params(&args.input, "scenario")?;
    let building = BuildingMetrics {
        total_area: args.total_area,
        total_cost: args.total_cost,
    };

    let result = engine::evaluate_scenario(&params, &building)?;
    if args.display {
        Ok(serde_json::to_value(result.result.to_display())?)
    } else {
        Ok(serde_json::to_value(result)?)
    }
}

pub fn run_compare(args: CompareArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let scenarios: Vec<ScenarioParameters> = load_params(&args.input, "compare")?;
    let building = BuildingMetrics {
        total_area: args.total_area,
        total_cost: args.total_cost,
    };

    let mut result = engine::compare_scenarios(&scenarios, &building)?;
    if args.rank {
        result.result = engine::rank_by_npv(&result.result);
    }

    if args.display {
        let rows: Vec<_> = result.result.iter().map(|r| r.to_display()).collect();
        Ok(serde_json::to_value(rows)?)
    } else {
        Ok(serde_json::to_value(result)?)
    }
}

pub fn run_sensitivity(args: SensitivityArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let params: ScenarioParameters = load_params(&args.input, "sensitivity")?;
    let building = BuildingMetrics {
        total_area: args.total_area,
        total_cost: args.total_cost,
    };

    let (min, max, step) = parse_rate_sweep(&args.rates)?;
    let rates = rate_range(min, max, step)?;

    // Evaluate once for the annuity equivalent and the IRR marker, then
    // sweep NPV pointwise over the requested rates.
    let report = engine::evaluate_scenario(&params, &building)?;
    let curve = sweep(
        report.result.yearly_income_equivalent,
        building.total_cost,
        params.years,
        &rates,
    );

    Ok(serde_json::json!({
        "scenario": report.result.name,
        "curve": curve,
        "irr": report.result.irr,
    }))
}

fn load_params<T: serde::de::DeserializeOwned>(
    input: &Option<String>,
    command: &str,
) -> Result<T, Box<dyn std::error::Error>> {
    if let Some(path) = input {
        input::file::read_params(path)
    } else if let Some(data) = input::stdin::read_piped()? {
        Ok(serde_json::from_value(data)?)
    } else {
        Err(format!("--input <file> or piped stdin required for {command}").into())
    }
}

/// Parse "min:max:step" into three rate fractions.
fn parse_rate_sweep(spec: &str) -> Result<(Decimal, Decimal, Decimal), Box<dyn std::error::Error>> {
    let parts: Vec<&str> = spec.split(':').collect();
    if parts.len() != 3 {
        return Err(format!("Rate sweep must be min:max:step, got '{spec}'").into());
    }
    Ok((parts[0].parse()?, parts[1].parse()?, parts[2].parse()?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse_rate_sweep() {
        let (min, max, step) = parse_rate_sweep("0.01:0.25:0.01").unwrap();
        assert_eq!(min, dec!(0.01));
        assert_eq!(max, dec!(0.25));
        assert_eq!(step, dec!(0.01));
    }

    #[test]
    fn test_parse_rate_sweep_rejects_malformed() {
        assert!(parse_rate_sweep("0.01:0.25").is_err());
        assert!(parse_rate_sweep("a:b:c").is_err());
    }
}
