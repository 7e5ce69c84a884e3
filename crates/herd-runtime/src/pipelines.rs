//! The fixed set of stage pipelines animals move through.

use herd_core::CohortQueue;
use serde::{Deserialize, Serialize};

/// One named life-path stage.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Stage {
    /// Female calves from birth to the end of common rearing.
    FemaleRearing,
    /// Females under evaluation for replacement selection.
    FemaleEvaluation,
    /// Non-selected females finishing on the farm.
    FemaleFinishing,
    /// Selected heifers maturing to breeding age.
    ReplacementMaturation,
    /// Males reserved for third-party consignment.
    MaleConsignment,
    /// Males finishing on the farm.
    MaleFinishing,
}

impl Stage {
    /// All stages, youngest first within each sex path.
    pub const ALL: [Stage; 6] = [
        Stage::FemaleRearing,
        Stage::FemaleEvaluation,
        Stage::ReplacementMaturation,
        Stage::FemaleFinishing,
        Stage::MaleConsignment,
        Stage::MaleFinishing,
    ];
}

/// One cohort queue per [`Stage`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StagePipelines {
    pub female_rearing: CohortQueue,
    pub female_evaluation: CohortQueue,
    pub female_finishing: CohortQueue,
    pub replacement_maturation: CohortQueue,
    pub male_consignment: CohortQueue,
    pub male_finishing: CohortQueue,
}

impl StagePipelines {
    pub fn queue(&self, stage: Stage) -> &CohortQueue {
        match stage {
            Stage::FemaleRearing => &self.female_rearing,
            Stage::FemaleEvaluation => &self.female_evaluation,
            Stage::FemaleFinishing => &self.female_finishing,
            Stage::ReplacementMaturation => &self.replacement_maturation,
            Stage::MaleConsignment => &self.male_consignment,
            Stage::MaleFinishing => &self.male_finishing,
        }
    }

    /// Heads held in each stage, in [`Stage::ALL`] order.
    pub fn breakdown(&self) -> Vec<(Stage, u64)> {
        Stage::ALL
            .iter()
            .map(|&s| (s, self.queue(s).head_count()))
            .collect()
    }

    /// Heads held across every stage.
    pub fn head_count(&self) -> u64 {
        Stage::ALL
            .iter()
            .fold(0u64, |acc, &s| acc.saturating_add(self.queue(s).head_count()))
    }
}
