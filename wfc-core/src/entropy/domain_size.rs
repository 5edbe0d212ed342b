use crate::entropy::{EntropyCalculator, SelectionStrategy};
use crate::grid::{EntropyGrid, Slot, WaveGrid};
use rand::seq::SliceRandom;
use rand::RngCore;
use rayon::prelude::*;

/// Entropy is the number of states left in a slot's domain.
#[derive(Debug, Clone, Default)]
pub struct DomainSizeEntropyCalculator {
    strategy: SelectionStrategy,
}

impl DomainSizeEntropyCalculator {
    pub const fn new(strategy: SelectionStrategy) -> Self {
        Self { strategy }
    }

    pub const fn strategy(&self) -> SelectionStrategy {
        self.strategy
    }
}

impl EntropyCalculator for DomainSizeEntropyCalculator {
    fn calculate_entropy(&self, grid: &WaveGrid) -> EntropyGrid {
        let slots = grid.slots();
        let mut entropy_grid = EntropyGrid::new(slots.width, slots.height);
        entropy_grid
            .data
            .par_iter_mut()
            .zip(slots.data.par_iter())
            .for_each(|(entropy, slot): (&mut Option<usize>, &Slot)| {
                *entropy = (!slot.is_collapsed()).then(|| slot.entropy());
            });
        entropy_grid
    }

    fn select_lowest_entropy_cell(
        &self,
        entropy_grid: &EntropyGrid,
        rng: &mut dyn RngCore,
    ) -> Option<(usize, usize)> {
        let min_entropy = entropy_grid.iter().flatten().copied().min()?;
        let mut lowest = entropy_grid
            .iter()
            .enumerate()
            .filter(|&(_, entropy)| *entropy == Some(min_entropy))
            .map(|(index, _)| entropy_grid.coords(index));

        match self.strategy {
            SelectionStrategy::FirstMinimum => lowest.next(),
            SelectionStrategy::RandomLowest => {
                let candidates: Vec<_> = lowest.collect();
                candidates.choose(rng).copied()
            }
        }
    }
}
