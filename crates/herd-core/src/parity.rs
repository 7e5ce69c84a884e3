use serde::{Deserialize, Serialize};
use tracing::trace;

/// Result of resolving one calving across the ledger.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CalvingOutcome {
    /// Single-parity moves made; a cow can move more than once.
    pub advanced: u64,
    /// Cows leaving the last parity bucket, retired instead of moved.
    pub aged_out: u64,
}

/// Breeding herd broken down by number of prior calvings.
///
/// The sum of all buckets is the breeding-herd size; heifers still maturing
/// and animals in any rearing or finishing stage are not part of it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParityLedger {
    cows_by_parity: Vec<u64>,
}

impl ParityLedger {
    /// A ledger with `max_parity` buckets (at least one) and the whole herd
    /// at parity 0.
    pub fn new(max_parity: usize, herd_size: u64) -> Self {
        let mut cows_by_parity = vec![0; max_parity.max(1)];
        cows_by_parity[0] = herd_size;
        Self { cows_by_parity }
    }

    pub fn total(&self) -> u64 {
        self.cows_by_parity
            .iter()
            .fold(0u64, |acc, &n| acc.saturating_add(n))
    }

    pub fn by_parity(&self) -> &[u64] {
        &self.cows_by_parity
    }

    /// Remove up to `n` cows, oldest parity first, spilling into younger
    /// buckets. Returns the number actually removed.
    pub fn retire_oldest(&mut self, n: u64) -> u64 {
        let mut left = n;
        for bucket in self.cows_by_parity.iter_mut().rev() {
            if left == 0 {
                break;
            }
            let take = (*bucket).min(left);
            *bucket -= take;
            left -= take;
        }
        n - left
    }

    /// Swap `enter` replacement heifers into the herd: the same number of the
    /// oldest cows are retired and the heifers join at parity 0. Returns the
    /// number of cows retired.
    pub fn replace(&mut self, enter: u64) -> u64 {
        if enter == 0 {
            return 0;
        }
        let retired = self.retire_oldest(enter);
        self.cows_by_parity[0] = self.cows_by_parity[0].saturating_add(enter);
        trace!(enter, retired, "replacement heifers entered herd");
        retired
    }

    /// Resolve `births` calvings. Calvings are assigned from parity 0
    /// upward, each bucket capped by its running stock, so cows that just
    /// moved up count toward the next bucket. Calvings assigned to the last
    /// bucket age those cows out.
    pub fn calve(&mut self, births: u64) -> CalvingOutcome {
        let last = self.cows_by_parity.len().saturating_sub(1);
        let mut out = CalvingOutcome::default();
        let mut left = births;
        for parity in 0..self.cows_by_parity.len() {
            if left == 0 {
                break;
            }
            let can = self.cows_by_parity[parity].min(left);
            self.cows_by_parity[parity] -= can;
            if parity == last {
                out.aged_out += can;
            } else {
                self.cows_by_parity[parity + 1] += can;
                out.advanced += can;
            }
            left -= can;
        }
        out
    }
}
