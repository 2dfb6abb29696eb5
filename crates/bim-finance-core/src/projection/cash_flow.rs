use rust_decimal::Decimal;

use crate::types::{Area, CashFlowSeries, Money, Rate};

/// Project the year-indexed cash flows of a rent/sale exploitation mix.
///
/// Index 0 carries the construction cost as a negative outlay. Rent income
/// starts at `start_year` and escalates by `growth_rate` from there, so the
/// first occupied year compounds zero growth. Sale proceeds are a single
/// liquidity event folded into the final year's flow.
///
/// Pure arithmetic with no error paths; callers guarantee `years >= 1` and
/// `1 <= start_year <= years` at the engine boundary.
#[allow(clippy::too_many_arguments)]
pub fn project(
    rent_area: Area,
    sale_area: Area,
    price_per_area: Money,
    cost: Money,
    years: u32,
    occupancy: Rate,
    growth_rate: Rate,
    start_year: u32,
) -> CashFlowSeries {
    let base_rent = rent_area * price_per_area * occupancy;
    let sale_proceeds = sale_area * price_per_area;
    let growth = Decimal::ONE + growth_rate;

    let mut flows = Vec::with_capacity(years as usize + 1);
    flows.push(-cost);

    let mut rent = base_rent;
    for t in 1..=years {
        let mut flow = Decimal::ZERO;
        if t >= start_year {
            if t > start_year {
                rent *= growth;
            }
            flow = rent;
        }
        if t == years {
            flow += sale_proceeds;
        }
        flows.push(flow);
    }

    CashFlowSeries::new(flows)
}

/// Uniform-income variant for callers with no rent/sale/timing breakdown.
pub fn project_flat(periodic_income: Money, cost: Money, years: u32) -> CashFlowSeries {
    let mut flows = Vec::with_capacity(years as usize + 1);
    flows.push(-cost);
    flows.resize(years as usize + 1, periodic_income);
    CashFlowSeries::new(flows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_deferred_start_year() {
        // No income before the start year, full income after, no growth.
        let series = project(
            dec!(100),
            Decimal::ZERO,
            dec!(10),
            dec!(500),
            3,
            Decimal::ONE,
            Decimal::ZERO,
            2,
        );
        assert_eq!(
            series.flows,
            vec![dec!(-500), dec!(0), dec!(1000), dec!(1000)]
        );
    }

    #[test]
    fn test_sale_proceeds_on_final_year_only() {
        let series = project(
            Decimal::ZERO,
            dec!(50),
            dec!(20),
            dec!(100),
            2,
            Decimal::ONE,
            Decimal::ZERO,
            1,
        );
        assert_eq!(series.flows, vec![dec!(-100), dec!(0), dec!(1000)]);
    }

    #[test]
    fn test_growth_compounds_from_start_year() {
        // Exponent is t - start_year: year 2 carries no growth, year 3 one
        // compounding step, year 4 two.
        let series = project(
            dec!(100),
            Decimal::ZERO,
            dec!(10),
            Decimal::ZERO,
            4,
            Decimal::ONE,
            dec!(0.1),
            2,
        );
        assert_eq!(
            series.flows,
            vec![dec!(0), dec!(0), dec!(1000), dec!(1100.0), dec!(1210.00)]
        );
    }

    #[test]
    fn test_negative_growth_decays() {
        let series = project(
            dec!(10),
            Decimal::ZERO,
            dec!(100),
            Decimal::ZERO,
            3,
            Decimal::ONE,
            dec!(-0.5),
            1,
        );
        assert_eq!(
            series.flows,
            vec![dec!(0), dec!(1000), dec!(500.0), dec!(250.00)]
        );
    }

    #[test]
    fn test_occupancy_scales_rent() {
        let series = project(
            dec!(100),
            Decimal::ZERO,
            dec!(10),
            dec!(100),
            1,
            dec!(0.9),
            Decimal::ZERO,
            1,
        );
        assert_eq!(series.flows, vec![dec!(-100), dec!(900.0)]);
    }

    #[test]
    fn test_project_flat() {
        let series = project_flat(dec!(250), dec!(1000), 4);
        assert_eq!(
            series.flows,
            vec![dec!(-1000), dec!(250), dec!(250), dec!(250), dec!(250)]
        );
    }
}
