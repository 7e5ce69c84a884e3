use serde::{Deserialize, Serialize};

/// A group of same-kind animals that entered a stage together.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cohort {
    /// Heads in the group (> 0 while queued).
    pub count: u64,
    /// Months until the group completes the stage (> 0 while queued).
    pub months_remaining: u32,
}

/// Cohorts progressing through one pipeline stage.
///
/// Every held cohort has `count > 0` and `months_remaining > 0`; a cohort
/// whose time runs out during [`CohortQueue::advance`] is removed and
/// reported as completed in the same call.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CohortQueue {
    cohorts: Vec<Cohort>,
}

impl CohortQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enqueue `count` animals for `duration` months.
    ///
    /// Zero-count pushes are ignored. A zero duration is stored as one month,
    /// so the animals complete on the next advance.
    pub fn push(&mut self, count: u64, duration: u32) {
        if count == 0 {
            return;
        }
        self.cohorts.push(Cohort {
            count,
            months_remaining: duration.max(1),
        });
    }

    /// Age every cohort by one month and return the number of animals that
    /// completed the stage.
    pub fn advance(&mut self) -> u64 {
        let mut completed = 0u64;
        self.cohorts.retain_mut(|c| {
            c.months_remaining = c.months_remaining.saturating_sub(1);
            if c.months_remaining == 0 {
                completed = completed.saturating_add(c.count);
                false
            } else {
                true
            }
        });
        completed
    }

    /// Total heads currently in the stage.
    pub fn head_count(&self) -> u64 {
        self.cohorts
            .iter()
            .fold(0u64, |acc, c| acc.saturating_add(c.count))
    }

    pub fn len(&self) -> usize {
        self.cohorts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cohorts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Cohort> {
        self.cohorts.iter()
    }
}
