use crate::grid::WaveGrid;
use std::fmt::Debug;
use thiserror::Error;
use wfc_rules::{Direction, ModuleState};

mod local;

pub use local::LocalPropagator;

/// Errors that can occur while narrowing a slot against its neighbors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PropagationError {
    /// The constraint from the neighbor in `direction` left the slot with
    /// no possible state.
    #[error("Contradiction at ({x}, {y}): no state survives the {direction} neighbor")]
    Contradiction {
        x: usize,
        y: usize,
        direction: Direction,
    },
    /// The neighbor in `direction` is collapsed to a module with no rules
    /// facing back at the slot.
    #[error("Missing rule at ({x}, {y}): {neighbor} has no rules toward its {rule_direction} (neighbor to the {direction})")]
    MissingRule {
        x: usize,
        y: usize,
        direction: Direction,
        neighbor: ModuleState,
        rule_direction: Direction,
    },
    /// The slot coordinates are outside the grid.
    #[error("Slot ({0}, {1}) is out of bounds")]
    OutOfBounds(usize, usize),
    /// The grid has no catalog or rules yet.
    #[error("Grid has not been bound to a module catalog")]
    NotBound,
}

impl PropagationError {
    /// Both an empty intersection and a missing rule leave the slot
    /// without a legal state.
    pub const fn is_contradiction(&self) -> bool {
        matches!(self, Self::Contradiction { .. } | Self::MissingRule { .. })
    }

    /// The slot the error refers to, if any.
    pub const fn location(&self) -> Option<(usize, usize)> {
        match *self {
            Self::Contradiction { x, y, .. } | Self::MissingRule { x, y, .. } => Some((x, y)),
            Self::OutOfBounds(x, y) => Some((x, y)),
            Self::NotBound => None,
        }
    }
}

/// Trait defining the interface for a constraint propagation algorithm.
///
/// Implementors narrow the domain of one slot right before it collapses,
/// using whatever its surroundings already determine.
pub trait ConstraintPropagator: Send + Sync + Debug {
    /// Narrows the domain of the slot at `(x, y)` in place.
    ///
    /// # Returns
    ///
    /// * `Ok(removed)` with the number of states eliminated.
    /// * `Err(PropagationError)` if the slot is left without a legal state.
    fn propagate(&self, grid: &mut WaveGrid, x: usize, y: usize)
        -> Result<usize, PropagationError>;
}
