use std::collections::HashMap;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::BimFinanceError;
use crate::types::{Area, BuildingMetrics, Money};
use crate::BimFinanceResult;

/// One measured row: a building element with its category label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryRow {
    pub category: String,
    pub area: Area,
    pub cost_per_area: Money,
}

/// Per-category aggregate of the measured rows, in first-appearance order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryAggregate {
    pub category: String,
    pub total_area: Area,
    /// Unweighted mean of the per-row unit costs
    pub avg_cost_per_area: Money,
    pub total_cost: Money,
}

/// Exploitation strategy assigned to a category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Strategy {
    Rent,
    Sale,
    Exclude,
}

impl FromStr for Strategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "rent" => Ok(Strategy::Rent),
            "sale" => Ok(Strategy::Sale),
            "exclude" => Ok(Strategy::Exclude),
            other => Err(format!(
                "Unknown strategy '{other}' (expected rent, sale or exclude)"
            )),
        }
    }
}

/// Area and cost split after strategy assignment. Excluded categories
/// contribute to neither the areas nor the cost.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StrategyBreakdown {
    pub rent_area: Area,
    pub sale_area: Area,
    pub total_cost: Money,
}

/// Building totals over all measured rows.
pub fn summarize(rows: &[CategoryRow]) -> BimFinanceResult<BuildingMetrics> {
    validate_rows(rows)?;

    let mut total_area = Decimal::ZERO;
    let mut total_cost = Decimal::ZERO;
    for row in rows {
        total_area += row.area;
        total_cost += row.area * row.cost_per_area;
    }

    Ok(BuildingMetrics {
        total_area,
        total_cost,
    })
}

/// Group the rows by category label, summing areas and costs.
pub fn aggregate_by_category(rows: &[CategoryRow]) -> BimFinanceResult<Vec<CategoryAggregate>> {
    validate_rows(rows)?;

    let mut order: Vec<String> = Vec::new();
    let mut sums: HashMap<String, (Area, Money, Money, u64)> = HashMap::new();

    for row in rows {
        let entry = sums.entry(row.category.clone()).or_insert_with(|| {
            order.push(row.category.clone());
            (Decimal::ZERO, Decimal::ZERO, Decimal::ZERO, 0)
        });
        entry.0 += row.area;
        entry.1 += row.cost_per_area;
        entry.2 += row.area * row.cost_per_area;
        entry.3 += 1;
    }

    Ok(order
        .into_iter()
        .map(|category| {
            let (total_area, unit_cost_sum, total_cost, count) = sums[&category];
            CategoryAggregate {
                category,
                total_area,
                avg_cost_per_area: unit_cost_sum / Decimal::from(count),
                total_cost,
            }
        })
        .collect())
}

/// Recompute the rent/sale areas and the cost base after applying the
/// category strategies. Every category present in the rows must be
/// assigned; a missing assignment is an error, never a silent default.
pub fn apply_strategies(
    rows: &[CategoryRow],
    assignments: &HashMap<String, Strategy>,
) -> BimFinanceResult<StrategyBreakdown> {
    validate_rows(rows)?;

    let mut rent_area = Decimal::ZERO;
    let mut sale_area = Decimal::ZERO;
    let mut total_cost = Decimal::ZERO;

    for row in rows {
        let strategy = assignments.get(&row.category).ok_or_else(|| {
            BimFinanceError::InvalidInput {
                field: format!("strategy:{}", row.category),
                reason: "No strategy assigned to category".into(),
            }
        })?;

        match strategy {
            Strategy::Rent => rent_area += row.area,
            Strategy::Sale => sale_area += row.area,
            Strategy::Exclude => continue,
        }
        total_cost += row.area * row.cost_per_area;
    }

    Ok(StrategyBreakdown {
        rent_area,
        sale_area,
        total_cost,
    })
}

fn validate_rows(rows: &[CategoryRow]) -> BimFinanceResult<()> {
    if rows.is_empty() {
        return Err(BimFinanceError::InsufficientData(
            "At least one measured row required".into(),
        ));
    }
    for row in rows {
        if row.area < Decimal::ZERO {
            return Err(BimFinanceError::InvalidInput {
                field: format!("area:{}", row.category),
                reason: "Measured area must be non-negative".into(),
            });
        }
        if row.cost_per_area < Decimal::ZERO {
            return Err(BimFinanceError::InvalidInput {
                field: format!("cost_per_area:{}", row.category),
                reason: "Unit cost must be non-negative".into(),
            });
        }
    }
    Ok(())
}
