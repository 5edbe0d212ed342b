use crate::{
    grid::WaveGrid,
    propagator::{ConstraintPropagator, PropagationError},
    BoundaryMode,
};
use wfc_rules::{Direction, ModuleState, Rotation};

/// One-hop propagator: intersects a slot's domain with what each collapsed
/// neighbor (or the void outside the grid) allows. Uncollapsed neighbors
/// contribute nothing.
#[derive(Debug, Clone)]
pub struct LocalPropagator {
    boundary_mode: BoundaryMode,
}

impl LocalPropagator {
    pub const fn new(boundary_mode: BoundaryMode) -> Self {
        Self { boundary_mode }
    }

    pub const fn boundary_mode(&self) -> BoundaryMode {
        self.boundary_mode
    }

    // The state known to sit behind a neighbor link; `None` links are outside the grid.
    fn neighbor_state(
        &self,
        grid: &WaveGrid,
        neighbor: Option<usize>,
    ) -> Option<ModuleState> {
        match neighbor {
            Some(index) => grid.slot_at(index).and_then(|slot| slot.state()),
            None => match self.boundary_mode {
                BoundaryMode::Void(void) => Some(ModuleState::new(void, Rotation::Up)),
                BoundaryMode::Open => None,
            },
        }
    }
}

impl ConstraintPropagator for LocalPropagator {
    fn propagate(
        &self,
        grid: &mut WaveGrid,
        x: usize,
        y: usize,
    ) -> Result<usize, PropagationError> {
        let binding = grid.binding().cloned().ok_or(PropagationError::NotBound)?;
        let index = grid.index(x, y).ok_or(PropagationError::OutOfBounds(x, y))?;
        let mut removed = 0;

        for direction in Direction::ALL {
            let link = grid.slot_at(index).and_then(|slot| slot.neighbor(direction));
            let Some(neighbor) = self.neighbor_state(grid, link) else {
                continue;
            };

            // Rules are keyed by the neighbor's unrotated frame; states
            // allowed there turn with the neighbor.
            let rule_direction = direction.in_neighbor_frame(neighbor.rotation);
            let allowed = binding
                .rules
                .get(neighbor.module, rule_direction)
                .ok_or(PropagationError::MissingRule {
                    x,
                    y,
                    direction,
                    neighbor,
                    rule_direction,
                })?;
            let undo = neighbor.rotation.inverse();

            let slot = grid
                .slot_at_mut(index)
                .ok_or(PropagationError::OutOfBounds(x, y))?;
            removed += slot.retain(|i| {
                binding
                    .states
                    .state_at(i)
                    .is_some_and(|state| allowed.contains(&state.rotated(undo)))
            });

            if slot.entropy() == 0 {
                log::error!("Contradiction at ({x}, {y}) from the {direction} neighbor {neighbor}");
                return Err(PropagationError::Contradiction { x, y, direction });
            }
        }

        log::trace!("Propagated into ({x}, {y}), removed {removed} states");
        Ok(removed)
    }
}
