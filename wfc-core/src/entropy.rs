use crate::grid::{EntropyGrid, WaveGrid};
use rand::RngCore;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

mod domain_size;

pub use domain_size::DomainSizeEntropyCalculator;

/// How to break ties between slots of equal lowest entropy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum SelectionStrategy {
    /// The first slot in row-major order.
    #[default]
    FirstMinimum,
    /// A uniformly random slot among the minima, drawn from the run's RNG.
    RandomLowest,
}

pub trait EntropyCalculator: Send + Sync + Debug {
    /// Snapshot of every slot's entropy; collapsed slots are `None`.
    #[must_use]
    fn calculate_entropy(&self, grid: &WaveGrid) -> EntropyGrid;

    /// Picks the uncollapsed slot with the lowest entropy, or `None` once
    /// every slot is collapsed.
    fn select_lowest_entropy_cell(
        &self,
        entropy_grid: &EntropyGrid,
        rng: &mut dyn RngCore,
    ) -> Option<(usize, usize)>;
}
