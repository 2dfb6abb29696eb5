use std::collections::HashMap;

use clap::Args;
use serde_json::Value;

use bim_finance_core::ingest::building::{
    aggregate_by_category, apply_strategies, summarize, Strategy,
};

use crate::input;

/// Arguments for the measured-category summary
#[derive(Args)]
pub struct SummaryArgs {
    /// Path to a CSV file with category,area,cost_per_area rows
    #[arg(long)]
    pub data: String,

    /// Strategy assignment per category, repeatable:
    /// --strategy "Offices=Rent" --strategy "Parking=Exclude"
    #[arg(long = "strategy")]
    pub strategies: Vec<String>,
}

pub fn run_summary(args: SummaryArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let rows = input::file::read_category_csv(&args.data)?;

    let building = summarize(&rows)?;
    let categories = aggregate_by_category(&rows)?;

    let mut output = serde_json::json!({
        "building": building,
        "categories": categories,
    });

    if !args.strategies.is_empty() {
        let assignments = parse_strategies(&args.strategies)?;
        let breakdown = apply_strategies(&rows, &assignments)?;
        output["breakdown"] = serde_json::to_value(breakdown)?;
    }

    Ok(output)
}

/// Parse repeated "Category=Strategy" assignments.
fn parse_strategies(
    specs: &[String],
) -> Result<HashMap<String, Strategy>, Box<dyn std::error::Error>> {
    let mut assignments = HashMap::new();
    for spec in specs {
        let (category, strategy) = spec
            .split_once('=')
            .ok_or_else(|| format!("Strategy must be Category=Rent|Sale|Exclude, got '{spec}'"))?;
        assignments.insert(category.trim().to_string(), strategy.trim().parse()?);
    }
    Ok(assignments)
}
