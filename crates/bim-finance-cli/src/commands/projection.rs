use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use bim_finance_core::projection::cash_flow;

/// Arguments for cash-flow projection
#[derive(Args)]
pub struct ProjectArgs {
    /// Area let out, in the same unit the price is quoted per
    #[arg(long, default_value = "0")]
    pub rent_area: Decimal,

    /// Area sold at project exit
    #[arg(long, default_value = "0")]
    pub sale_area: Decimal,

    /// Price per unit of area (annual rent, and sale price)
    #[arg(long)]
    pub price_per_area: Decimal,

    /// Construction cost (initial outlay)
    #[arg(long)]
    pub cost: Decimal,

    /// Projection horizon in years
    #[arg(long)]
    pub years: u32,

    /// Occupancy fraction of the rented area
    #[arg(long, default_value = "1.0")]
    pub occupancy: Decimal,

    /// Year-on-year rent growth from the start year
    #[arg(long, default_value = "0.0")]
    pub growth_rate: Decimal,

    /// First year with rent income (1-based)
    #[arg(long, default_value = "1")]
    pub start_year: u32,
}

pub fn run_project(args: ProjectArgs) -> Result<Value, Box<dyn std::error::Error>> {
    if args.years < 1 {
        return Err("--years must be at least 1".into());
    }
    if args.start_year < 1 || args.start_year > args.years {
        return Err(format!("--start-year must be within [1, {}]", args.years).into());
    }

    let series = cash_flow::project(
        args.rent_area,
        args.sale_area,
        args.price_per_area,
        args.cost,
        args.years,
        args.occupancy,
        args.growth_rate,
        args.start_year,
    );

    Ok(serde_json::to_value(series)?)
}
