//! Breeding cycle state machine: Open -> Mating -> Gestation -> Open.

use herd_core::Params;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Phase of the herd-wide breeding cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BreedingPhase {
    /// Cows recovering after calving; ends with replacement intake.
    Open,
    /// Cows being bred; ends with the conception snapshot.
    Mating,
    /// Pregnancies running; ends with calving.
    Gestation,
}

impl BreedingPhase {
    /// The phase entered when this one expires.
    pub fn next(self) -> Self {
        match self {
            BreedingPhase::Open => BreedingPhase::Mating,
            BreedingPhase::Mating => BreedingPhase::Gestation,
            BreedingPhase::Gestation => BreedingPhase::Open,
        }
    }

    /// Configured length of this phase, never less than one month.
    pub fn duration(self, p: &Params) -> u32 {
        let months = match self {
            BreedingPhase::Open => p.open_months,
            BreedingPhase::Mating => p.mating_months,
            BreedingPhase::Gestation => p.gestation_months,
        };
        months.max(1)
    }
}

/// Current phase, months left in it, and pregnancies awaiting calving.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreedingCycle {
    phase: BreedingPhase,
    months_left: u32,
    pregnant_this_cycle: u64,
}

impl BreedingCycle {
    /// A cycle starting at the beginning of the Open phase.
    pub fn new(p: &Params) -> Self {
        Self {
            phase: BreedingPhase::Open,
            months_left: BreedingPhase::Open.duration(p),
            pregnant_this_cycle: 0,
        }
    }

    pub fn phase(&self) -> BreedingPhase {
        self.phase
    }

    pub fn months_left(&self) -> u32 {
        self.months_left
    }

    pub fn pregnant_this_cycle(&self) -> u64 {
        self.pregnant_this_cycle
    }

    /// Count one month down. When the phase expires, enter the next one,
    /// reset the counter to its duration and return it.
    pub fn tick(&mut self, p: &Params) -> Option<BreedingPhase> {
        self.months_left = self.months_left.saturating_sub(1);
        if self.months_left > 0 {
            return None;
        }
        self.phase = self.phase.next();
        self.months_left = self.phase.duration(p);
        Some(self.phase)
    }

    /// Snapshot the pregnancies of a `herd`-sized breeding herd.
    pub fn conceive(&mut self, herd: u64, conception_rate: Decimal) -> u64 {
        self.pregnant_this_cycle = round_heads(herd, conception_rate);
        self.pregnant_this_cycle
    }

    /// Hand over this cycle's pregnancies as births and clear the count.
    pub fn deliver(&mut self) -> u64 {
        std::mem::take(&mut self.pregnant_this_cycle)
    }
}

/// `heads * share` rounded half away from zero, with `share` clamped to
/// [0, 1].
pub fn round_heads(heads: u64, share: Decimal) -> u64 {
    let share = share.clamp(Decimal::ZERO, Decimal::ONE);
    Decimal::from(heads)
        .checked_mul(share)
        .map(|v| v.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero))
        .and_then(|v| v.to_u64())
        .unwrap_or(0)
}
