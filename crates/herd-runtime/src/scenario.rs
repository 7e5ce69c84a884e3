//! Named scenarios run side by side over the same horizon.

use chrono::NaiveDate;
use herd_core::Params;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{simulate, MonthRecord, SimError, SimSummary};

fn default_months() -> u32 {
    120
}

/// A parameter set with a display name.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub name: String,
    #[serde(flatten)]
    pub params: Params,
}

/// A batch of scenarios sharing a horizon, as loaded from a scenario file.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScenarioSet {
    #[serde(default = "default_months")]
    pub months: u32,
    /// Calendar month of trace month 1, for labelling.
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    pub scenarios: Vec<Scenario>,
}

/// Output of one scenario run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScenarioOutcome {
    pub name: String,
    pub summary: SimSummary,
    pub trace: Vec<MonthRecord>,
}

/// Differences of a scenario against a baseline (`other - baseline`).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SummaryDelta {
    pub extra_replacements: i64,
    pub revenue: Decimal,
    pub maintenance_cost: Decimal,
    pub net_profit: Decimal,
}

fn signed_diff(other: u64, baseline: u64) -> i64 {
    let d = i128::from(other) - i128::from(baseline);
    i64::try_from(d).unwrap_or(if d < 0 { i64::MIN } else { i64::MAX })
}

/// Compare `other` against `baseline`.
pub fn compare(baseline: &SimSummary, other: &SimSummary) -> SummaryDelta {
    SummaryDelta {
        extra_replacements: signed_diff(
            other.heads.replacements_entered,
            baseline.heads.replacements_entered,
        ),
        revenue: other.revenue.total.saturating_sub(baseline.revenue.total),
        maintenance_cost: other
            .maintenance_cost
            .saturating_sub(baseline.maintenance_cost),
        net_profit: other.net_profit.saturating_sub(baseline.net_profit),
    }
}

fn run_one(s: &Scenario, months: u32) -> Result<ScenarioOutcome, SimError> {
    let (summary, trace) = simulate(months, s.params.clone())?;
    Ok(ScenarioOutcome {
        name: s.name.clone(),
        summary,
        trace,
    })
}

/// Run every scenario for `months` months on the rayon pool, preserving
/// input order. Each run owns its own state.
#[cfg(feature = "parallel")]
pub fn run_scenarios(
    scenarios: &[Scenario],
    months: u32,
) -> Result<Vec<ScenarioOutcome>, SimError> {
    use rayon::prelude::*;
    scenarios.par_iter().map(|s| run_one(s, months)).collect()
}

/// Run every scenario for `months` months, preserving input order.
#[cfg(not(feature = "parallel"))]
pub fn run_scenarios(
    scenarios: &[Scenario],
    months: u32,
) -> Result<Vec<ScenarioOutcome>, SimError> {
    scenarios.iter().map(|s| run_one(s, months)).collect()
}
