use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::metrics::investment::IrrOutcome;
use crate::types::{Money, Rate};

use super::engine::ScenarioReport;

/// One formatted table row, keyed by scenario name. Display only; the
/// numeric fields live on `ScenarioReport`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioDisplayRow {
    pub scenario: String,
    pub roi: String,
    pub npv: String,
    pub irr: String,
}

impl ScenarioReport {
    /// Render the report for tabular display.
    pub fn to_display(&self) -> ScenarioDisplayRow {
        ScenarioDisplayRow {
            scenario: self.name.clone(),
            roi: format_percent(self.roi),
            npv: format_currency(self.npv),
            irr: match self.irr {
                IrrOutcome::Converged(rate) => format_percent(rate),
                IrrOutcome::BelowBracket => "n/a (below bracket)".into(),
                IrrOutcome::AboveBracket => "n/a (above bracket)".into(),
            },
        }
    }
}

/// Fraction to percentage string with two decimals: 0.1234 -> "12.34%".
pub fn format_percent(rate: Rate) -> String {
    let pct = (rate * dec!(100)).round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("{pct:.2}%")
}

/// Whole-currency string with thousands separators: 1234567.4 -> "$1,234,567".
pub fn format_currency(amount: Money) -> String {
    let rounded = amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    let negative = rounded < Decimal::ZERO;
    let grouped = group_thousands(&rounded.abs().trunc().to_string());
    if negative {
        format!("-${grouped}")
    } else {
        format!("${grouped}")
    }
}

fn group_thousands(digits: &str) -> String {
    let bytes = digits.as_bytes();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, b) in bytes.iter().enumerate() {
        if i > 0 && (bytes.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(*b as char);
    }
    out
}
