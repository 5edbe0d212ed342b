//! Core library for the Wave Function Collapse algorithm implementation.
//! Defines the slot grid, entropy selection, neighbor propagation and the
//! collapse loop. Rules and rotation algebra come from `wfc-rules`.

pub use propagator::PropagationError;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use wfc_rules::{ModuleCatalog, ModuleId, ModuleState, RuleError};

/// Entropy calculation logic and traits.
pub mod entropy;
/// 2D grids: the generic container and the slot grid.
pub mod grid;
/// Constraint propagation logic and traits.
pub mod propagator;
/// The core WFC algorithm runner.
pub mod runner;
/// The scene collaborator receiving collapsed slots.
pub mod scene;

/// Trait defining the interface for entropy calculation strategies.
pub use crate::entropy::{DomainSizeEntropyCalculator, EntropyCalculator, SelectionStrategy};
pub use crate::grid::{EntropyGrid, Grid, Slot, WaveGrid};
pub use crate::propagator::{ConstraintPropagator, LocalPropagator};
/// The main function to execute the Wave Function Collapse algorithm.
pub use crate::runner::{fill, run, RunSummary, WfcConfig};
pub use crate::scene::{NullScene, Placement, SceneSink};

/// Errors that can occur during the Wave Function Collapse algorithm.
#[derive(Error, Debug)]
pub enum WfcError {
    /// A slot had no possible state before the fill started.
    /// Includes the (x, y) coordinates of the contradictory slot.
    #[error("Contradiction found at ({0}, {1}) before collapsing")]
    Contradiction(usize, usize),
    /// Propagation into a slot failed; see [`PropagationError`].
    #[error("Propagation error: {0}")]
    Propagation(#[from] PropagationError),
    /// An error related to grid dimensions or accessing grid data.
    #[error("Grid error: {0}")]
    GridError(String),
    /// An error related to invalid configuration (e.g., a boundary module missing from the catalog).
    #[error("Configuration error: {0}")]
    ConfigurationError(String),
    /// The grid was used before `WaveGrid::bind` supplied a catalog and rules.
    #[error("Grid has not been bound to a module catalog")]
    NotBound,
    /// An error from the module catalog or rule compilation.
    #[error("Rule error: {0}")]
    Rules(#[from] RuleError),
    /// WFC run was interrupted by an external signal (e.g., Ctrl+C).
    #[error("WFC run interrupted by signal")]
    Interrupted,
}

impl WfcError {
    /// Checks if the error is a contradiction, i.e. a failure a fresh
    /// seed might avoid.
    pub fn is_contradiction(&self) -> bool {
        match self {
            Self::Contradiction(..) => true,
            Self::Propagation(e) => e.is_contradiction(),
            _ => false,
        }
    }
}

/// Information about the current state of the WFC algorithm execution.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ProgressInfo {
    /// The total number of slots that have been collapsed.
    pub collapsed_cells: usize,
    /// The total number of slots in the grid.
    pub total_cells: usize,
    /// Time elapsed since the WFC run started.
    pub elapsed_time: Duration,
    /// The number of iterations completed so far.
    pub iterations: u64,
    /// The slot collapsed by the latest iteration and its state.
    pub last_collapsed: Option<(usize, usize, ModuleState)>,
}

/// Defines how slots on the grid edge see the outside.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoundaryMode {
    /// Outside the grid is a permanently collapsed void module at `Rotation::Up`.
    Void(ModuleId),
    /// Outside the grid imposes no constraint.
    Open,
}

impl BoundaryMode {
    /// `Void` with the catalog's void module, or `Open` if it has none.
    pub fn for_catalog(catalog: &ModuleCatalog) -> Self {
        catalog.void_module().map_or(Self::Open, Self::Void)
    }

    /// `Void` with the module called `name`.
    ///
    /// # Errors
    ///
    /// `WfcError::ConfigurationError` if the catalog has no such module.
    pub fn void_named(catalog: &ModuleCatalog, name: &str) -> Result<Self, WfcError> {
        catalog.find(name).map(Self::Void).ok_or_else(|| {
            WfcError::ConfigurationError(format!(
                "Boundary module '{name}' is not in the catalog"
            ))
        })
    }
}
