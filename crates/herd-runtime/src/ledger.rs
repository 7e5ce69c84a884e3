//! Running totals of a run and its monthly trace.

use chrono::{Months, NaiveDate};
use herd_econ::SalesTally;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::breeding::BreedingPhase;

/// Sex of a calf or finished animal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sex {
    Female,
    Male,
}

/// Cumulative head counts by exit category, plus maintenance cost.
///
/// Every counter only grows over a run.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HerdLedger {
    /// Matured heifers swapped into the breeding herd.
    pub replacements_entered: u64,
    /// Breeding cows retired to make room for replacements.
    pub cows_culled_for_replacement: u64,
    /// Breeding cows retired at the parity ceiling.
    pub cows_aged_out: u64,
    pub females_finished: u64,
    pub males_finished: u64,
    pub males_consigned: u64,
    pub calves_sold_female: u64,
    pub calves_sold_male: u64,
    pub calves_born: u64,
    pub maintenance_cost: Decimal,
}

impl HerdLedger {
    pub fn accrue_cost(&mut self, cost: Decimal) {
        self.maintenance_cost = self.maintenance_cost.saturating_add(cost);
    }

    pub fn record_intake(&mut self, entered: u64, retired: u64) {
        self.replacements_entered += entered;
        self.cows_culled_for_replacement += retired;
    }

    pub fn record_calving(&mut self, births: u64, aged_out: u64) {
        self.calves_born += births;
        self.cows_aged_out += aged_out;
    }

    pub fn record_calf_sale(&mut self, sex: Sex, heads: u64) {
        match sex {
            Sex::Female => self.calves_sold_female += heads,
            Sex::Male => self.calves_sold_male += heads,
        }
    }

    pub fn record_finished(&mut self, sex: Sex, heads: u64) {
        match sex {
            Sex::Female => self.females_finished += heads,
            Sex::Male => self.males_finished += heads,
        }
    }

    pub fn record_consigned(&mut self, heads: u64) {
        self.males_consigned += heads;
    }

    /// Heads shipped for slaughter: retired cows plus finished animals.
    pub fn total_shipped(&self) -> u64 {
        self.cows_culled_for_replacement
            + self.cows_aged_out
            + self.females_finished
            + self.males_finished
    }

    /// Every head that has left the farm, by any route.
    pub fn total_exited(&self) -> u64 {
        self.total_shipped()
            + self.males_consigned
            + self.calves_sold_female
            + self.calves_sold_male
    }

    /// Priced sales for valuation.
    pub fn sales(&self) -> SalesTally {
        SalesTally {
            cull_cows: self.cows_culled_for_replacement + self.cows_aged_out,
            finished_females: self.females_finished,
            finished_males: self.males_finished,
            calves_sold: self.calves_sold_female + self.calves_sold_male,
        }
    }
}

/// State at the end of one simulated month.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthRecord {
    /// 1-based month number.
    pub month: u32,
    pub total_head_count: u64,
    pub breeding_herd: u64,
    pub phase: BreedingPhase,
    pub cumulative_cost: Decimal,
}

/// Calendar month of trace month `month` (1-based) for a run starting at
/// `start`. Days past the end of a shorter month clamp to its last day.
pub fn month_date(start: NaiveDate, month: u32) -> NaiveDate {
    start
        .checked_add_months(Months::new(month.saturating_sub(1)))
        .unwrap_or(start)
}
