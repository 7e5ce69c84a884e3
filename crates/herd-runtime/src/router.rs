//! Capacity routing between on-farm finishing and immediate sale.

use serde::{Deserialize, Serialize};

/// Split of a newly eligible group.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Routing {
    pub to_fatten: u64,
    pub to_sell: u64,
}

/// Sends animals to finishing while the farm has room, and sells the rest.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapacityRouter {
    max_total_capacity: u64,
}

impl CapacityRouter {
    pub fn new(max_total_capacity: u64) -> Self {
        Self { max_total_capacity }
    }

    pub fn max_total_capacity(&self) -> u64 {
        self.max_total_capacity
    }

    /// Route `remains` animals given the head count at decision time.
    ///
    /// The split always sums to `remains`. The decision is final: animals
    /// routed to sale are never reconsidered.
    pub fn route(&self, remains: u64, current_total: u64) -> Routing {
        let space = self.max_total_capacity.saturating_sub(current_total);
        let to_fatten = remains.min(space);
        Routing {
            to_fatten,
            to_sell: remains - to_fatten,
        }
    }
}
