#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use wfc_rules::ModuleState;

/// Receives every slot as it collapses, including slots fixed before the run.
pub trait SceneSink {
    fn instantiate(&mut self, state: ModuleState, x: usize, y: usize);
}

/// A collapsed slot as handed to a [`SceneSink`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Placement {
    pub state: ModuleState,
    pub x: usize,
    pub y: usize,
}

/// Records placements in collapse order.
impl SceneSink for Vec<Placement> {
    fn instantiate(&mut self, state: ModuleState, x: usize, y: usize) {
        self.push(Placement { state, x, y });
    }
}

/// Discards every placement.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullScene;

impl SceneSink for NullScene {
    fn instantiate(&mut self, _state: ModuleState, _x: usize, _y: usize) {}
}
