#![deny(warnings)]

//! Core domain models and invariants for the herd simulator.
//!
//! This crate defines the serializable parameter set for a breeding and
//! fattening run, the cohort queues animals move through, and the parity
//! ledger that tracks the breeding herd, with validation helpers to guarantee
//! basic invariants before a run starts.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

mod cohort;
mod parity;

pub use cohort::{Cohort, CohortQueue};
pub use parity::{CalvingOutcome, ParityLedger};

/// Immutable configuration for one simulation run.
///
/// Durations are whole months. Prices and costs are per head in the
/// caller's currency unit.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Params {
    /// Initial breeding herd, all placed at parity 0.
    pub herd_size: u64,
    /// Share of the breeding herd that conceives each cycle, in [0,1].
    pub conception_rate: Decimal,
    /// Share of births that are female, in [0,1].
    pub female_ratio: Decimal,
    /// Number of tracked parities; cows leaving the last bucket age out.
    pub max_parity: usize,
    /// Open phase length (months).
    pub open_months: u32,
    /// Mating phase length (months).
    pub mating_months: u32,
    /// Gestation phase length (months).
    pub gestation_months: u32,
    /// Heifers selected at evaluation, and swapped in at each mating start.
    pub replacement_n_each_mating: u64,
    /// Male calves reserved for consignment at each calving.
    pub consignment_per_calving: u64,
    /// Common rearing stage for female calves (months).
    pub female_common_rearing_months: u32,
    /// Evaluation stage following common rearing (months).
    pub female_eval_months: u32,
    /// Age at which finished females ship (months).
    pub female_total_fatten_months: u32,
    /// Age at which selected heifers join the replacement pool (months).
    pub female_replacement_age_months: u32,
    /// Time a consigned male spends before leaving the farm (months).
    pub male_consignment_age_months: u32,
    /// Finishing time for males kept on the farm (months).
    pub beef_ship_age_months: u32,
    /// Farm-wide ceiling on animals present.
    pub max_total_capacity: u64,
    /// Price of a calf sold at weaning or birth.
    pub price_calf_sale: Decimal,
    /// Price of a finished female.
    pub price_beef_female: Decimal,
    /// Price of a finished male.
    pub price_beef_male: Decimal,
    /// Price of a culled or aged-out breeding cow.
    pub price_old_cow: Decimal,
    /// Maintenance cost per head per month.
    pub cost_monthly_per_head: Decimal,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            herd_size: 100,
            conception_rate: Decimal::new(70, 2),
            female_ratio: Decimal::new(50, 2),
            max_parity: 10,
            open_months: 2,
            mating_months: 2,
            gestation_months: 10,
            replacement_n_each_mating: 3,
            consignment_per_calving: 5,
            female_common_rearing_months: 6,
            female_eval_months: 2,
            female_total_fatten_months: 30,
            female_replacement_age_months: 18,
            male_consignment_age_months: 6,
            beef_ship_age_months: 30,
            max_total_capacity: 250,
            price_calf_sale: Decimal::ZERO,
            price_beef_female: Decimal::ZERO,
            price_beef_male: Decimal::ZERO,
            price_old_cow: Decimal::ZERO,
            cost_monthly_per_head: Decimal::ZERO,
        }
    }
}

impl Params {
    /// Age at which a female leaves evaluation.
    pub fn female_weaning_age_months(&self) -> u32 {
        self.female_common_rearing_months
            .saturating_add(self.female_eval_months)
    }

    /// Time a non-selected female spends in on-farm finishing.
    pub fn female_finishing_months(&self) -> u32 {
        self.female_total_fatten_months
            .saturating_sub(self.female_weaning_age_months())
    }

    /// Time a selected heifer spends maturing before joining the pool.
    pub fn replacement_maturation_months(&self) -> u32 {
        self.female_replacement_age_months
            .saturating_sub(self.female_weaning_age_months())
    }

    /// Length of one full breeding cycle.
    pub fn cycle_months(&self) -> u32 {
        self.open_months
            .saturating_add(self.mating_months)
            .saturating_add(self.gestation_months)
    }
}

/// Validation errors for parameter invariants.
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    /// A ratio field lies outside [0, 1].
    #[error("{field} must be within [0,1], got {value}")]
    RateOutOfRange { field: &'static str, value: Decimal },
    /// Breeding-cycle phases need at least one month each.
    #[error("{0} must be at least one month")]
    ZeroPhaseDuration(&'static str),
    /// At least one parity bucket is required.
    #[error("max_parity must be > 0")]
    ZeroMaxParity,
    /// Price or cost must be non-negative.
    #[error("{0} must not be negative")]
    NegativeMoney(&'static str),
    /// A run needs at least one month.
    #[error("simulation horizon must be at least one month")]
    ZeroHorizon,
}

fn check_rate(field: &'static str, value: Decimal) -> Result<(), ValidationError> {
    if value < Decimal::ZERO || value > Decimal::ONE {
        return Err(ValidationError::RateOutOfRange { field, value });
    }
    Ok(())
}

/// Validate a parameter set before it is handed to a run.
pub fn validate_params(p: &Params) -> Result<(), ValidationError> {
    check_rate("conception_rate", p.conception_rate)?;
    check_rate("female_ratio", p.female_ratio)?;
    if p.max_parity == 0 {
        return Err(ValidationError::ZeroMaxParity);
    }
    for (field, months) in [
        ("open_months", p.open_months),
        ("mating_months", p.mating_months),
        ("gestation_months", p.gestation_months),
    ] {
        if months == 0 {
            return Err(ValidationError::ZeroPhaseDuration(field));
        }
    }
    for (field, money) in [
        ("price_calf_sale", p.price_calf_sale),
        ("price_beef_female", p.price_beef_female),
        ("price_beef_male", p.price_beef_male),
        ("price_old_cow", p.price_old_cow),
        ("cost_monthly_per_head", p.cost_monthly_per_head),
    ] {
        if money < Decimal::ZERO {
            return Err(ValidationError::NegativeMoney(field));
        }
    }
    Ok(())
}

/// Validate the requested number of simulated months.
pub fn validate_horizon(months: u32) -> Result<(), ValidationError> {
    if months == 0 {
        return Err(ValidationError::ZeroHorizon);
    }
    Ok(())
}
