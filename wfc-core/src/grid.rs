use crate::WfcError;
use bitvec::prelude::*;
use std::sync::Arc;
use wfc_rules::{AdjacencyRuleSet, Direction, ModuleCatalog, ModuleState, StateSpace};

/// A row-major 2D grid.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid<T> {
    pub width: usize,
    pub height: usize,
    pub(crate) data: Vec<T>,
}

impl<T: Clone + Default> Grid<T> {
    /// Creates a new grid with the given dimensions, initialized with default values.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![T::default(); width * height],
        }
    }
}

impl<T> Grid<T> {
    /// Creates a grid whose cells are produced by `f(x, y)` in row-major order.
    pub fn from_fn(width: usize, height: usize, mut f: impl FnMut(usize, usize) -> T) -> Self {
        let data = (0..height)
            .flat_map(|y| (0..width).map(move |x| (x, y)))
            .map(|(x, y)| f(x, y))
            .collect();
        Self {
            width,
            height,
            data,
        }
    }

    /// Returns an immutable reference to the element at the given coordinates,
    /// or None if the coordinates are out of bounds.
    pub fn get(&self, x: usize, y: usize) -> Option<&T> {
        self.index(x, y).and_then(|idx| self.data.get(idx))
    }

    /// Returns a mutable reference to the element at the given coordinates,
    /// or None if the coordinates are out of bounds.
    pub fn get_mut(&mut self, x: usize, y: usize) -> Option<&mut T> {
        self.index(x, y).and_then(move |idx| self.data.get_mut(idx))
    }

    /// Calculates the 1D index for the given coordinates.
    /// Returns None if the coordinates are out of bounds.
    pub fn index(&self, x: usize, y: usize) -> Option<usize> {
        (x < self.width && y < self.height).then_some(y * self.width + x)
    }

    /// Converts a 1D index back to `(x, y)`.
    pub fn coords(&self, index: usize) -> (usize, usize) {
        (index % self.width, index / self.width)
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Cells in row-major order.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.data.iter()
    }
}

/// Grid of per-slot entropies; `None` marks collapsed slots.
pub type EntropyGrid = Grid<Option<usize>>;

/// One cell of the wave: its remaining states and, once collapsed, its state.
#[derive(Debug, Clone, PartialEq)]
pub struct Slot {
    pub x: usize,
    pub y: usize,
    /// Grid indices of the neighbors, in `Direction::ALL` order. `None` is outside the grid.
    neighbors: [Option<usize>; 4],
    /// Bit `i` is set while `StateSpace::state_at(i)` is still possible.
    domain: BitVec,
    state: Option<ModuleState>,
}

impl Slot {
    fn new(x: usize, y: usize, neighbors: [Option<usize>; 4]) -> Self {
        Self {
            x,
            y,
            neighbors,
            domain: BitVec::new(),
            state: None,
        }
    }

    pub fn is_collapsed(&self) -> bool {
        self.state.is_some()
    }

    /// Number of states still possible.
    pub fn entropy(&self) -> usize {
        self.domain.count_ones()
    }

    pub fn domain(&self) -> &BitSlice {
        &self.domain
    }

    pub fn state(&self) -> Option<ModuleState> {
        self.state
    }

    /// Grid index of the neighbor in `direction`, or `None` at the edge.
    pub fn neighbor(&self, direction: Direction) -> Option<usize> {
        self.neighbors[direction.index()]
    }

    /// Clears every domain bit `keep` rejects; returns how many were cleared.
    pub(crate) fn retain(&mut self, mut keep: impl FnMut(usize) -> bool) -> usize {
        let rejected: Vec<usize> = self.domain.iter_ones().filter(|&i| !keep(i)).collect();
        for &index in &rejected {
            self.domain.set(index, false);
        }
        rejected.len()
    }

    fn collapse_to(&mut self, index: usize, state: ModuleState) {
        self.domain.fill(false);
        self.domain.set(index, true);
        self.state = Some(state);
    }
}

/// Shared, read-only data a grid is bound to before collapsing.
#[derive(Debug, Clone)]
pub struct Binding {
    pub catalog: Arc<ModuleCatalog>,
    pub rules: Arc<AdjacencyRuleSet>,
    pub states: Arc<StateSpace>,
}

/// The wave: a width x height grid of slots linked to their neighbors.
#[derive(Debug, Clone)]
pub struct WaveGrid {
    slots: Grid<Slot>,
    binding: Option<Binding>,
}

impl WaveGrid {
    /// Creates the slots and links each to its four neighbors.
    ///
    /// Domains stay empty until [`WaveGrid::bind`] seeds them.
    pub fn new(width: usize, height: usize) -> Self {
        let neighbor = |x: usize, y: usize, direction: Direction| {
            let (dx, dy) = direction.offset();
            let nx = x.checked_add_signed(dx)?;
            let ny = y.checked_add_signed(dy)?;
            (nx < width && ny < height).then_some(ny * width + nx)
        };
        let slots = Grid::from_fn(width, height, |x, y| {
            Slot::new(x, y, Direction::ALL.map(|d| neighbor(x, y, d)))
        });
        Self {
            slots,
            binding: None,
        }
    }

    pub fn width(&self) -> usize {
        self.slots.width
    }

    pub fn height(&self) -> usize {
        self.slots.height
    }

    /// Total number of slots.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Seeds every slot with the full state space of `catalog` and attaches
    /// the catalog and rules. Any earlier collapse is discarded.
    pub fn bind(&mut self, catalog: Arc<ModuleCatalog>, rules: Arc<AdjacencyRuleSet>) {
        let states = Arc::new(StateSpace::new(&catalog));
        let full = BitVec::repeat(true, states.len());
        for slot in &mut self.slots.data {
            slot.domain = full.clone();
            slot.state = None;
        }
        log::debug!(
            "Bound {}x{} grid to {} modules ({} states per slot)",
            self.width(),
            self.height(),
            catalog.len(),
            states.len()
        );
        self.binding = Some(Binding {
            catalog,
            rules,
            states,
        });
    }

    pub fn binding(&self) -> Option<&Binding> {
        self.binding.as_ref()
    }

    pub fn is_bound(&self) -> bool {
        self.binding.is_some()
    }

    /// The binding, or `WfcError::NotBound`.
    pub fn require_binding(&self) -> Result<&Binding, WfcError> {
        self.binding.as_ref().ok_or(WfcError::NotBound)
    }

    pub fn slot(&self, x: usize, y: usize) -> Option<&Slot> {
        self.slots.get(x, y)
    }

    pub fn slot_at(&self, index: usize) -> Option<&Slot> {
        self.slots.data.get(index)
    }

    pub(crate) fn slot_at_mut(&mut self, index: usize) -> Option<&mut Slot> {
        self.slots.data.get_mut(index)
    }

    pub fn index(&self, x: usize, y: usize) -> Option<usize> {
        self.slots.index(x, y)
    }

    pub fn slots(&self) -> &Grid<Slot> {
        &self.slots
    }

    pub fn collapsed_state(&self, x: usize, y: usize) -> Option<ModuleState> {
        self.slot(x, y).and_then(Slot::state)
    }

    /// Still-possible states of the slot at `(x, y)`, in state-space order.
    pub fn possible_states(&self, x: usize, y: usize) -> Result<Vec<ModuleState>, WfcError> {
        let binding = self.require_binding()?;
        let slot = self.slot(x, y).ok_or_else(|| out_of_bounds(x, y))?;
        Ok(slot
            .domain
            .iter_ones()
            .filter_map(|i| binding.states.state_at(i))
            .collect())
    }

    /// Coordinates of slots not yet collapsed, in row-major order.
    pub fn uncollapsed(&self) -> Vec<(usize, usize)> {
        self.slots
            .iter()
            .filter(|s| !s.is_collapsed())
            .map(|s| (s.x, s.y))
            .collect()
    }

    pub fn collapsed_count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_collapsed()).count()
    }

    pub fn is_fully_collapsed(&self) -> bool {
        self.slots.iter().all(Slot::is_collapsed)
    }

    /// Collapses a slot to `state` ahead of the fill.
    ///
    /// # Errors
    ///
    /// `NotBound` before binding, `GridError` for out-of-range coordinates,
    /// `ConfigurationError` if `state` is not in the slot's domain.
    pub fn fix(&mut self, x: usize, y: usize, state: ModuleState) -> Result<(), WfcError> {
        let index = self.state_index(state)?;
        let slot = self.slots.get_mut(x, y).ok_or_else(|| out_of_bounds(x, y))?;
        if !slot.domain[index] {
            return Err(WfcError::ConfigurationError(format!(
                "State {state} is not possible at ({x}, {y})"
            )));
        }
        slot.collapse_to(index, state);
        Ok(())
    }

    /// Narrows a slot's domain to `allowed` ahead of the fill.
    ///
    /// An empty result is not an error here; the fill reports it as a
    /// contradiction. Returns the remaining entropy.
    pub fn restrict<I>(&mut self, x: usize, y: usize, allowed: I) -> Result<usize, WfcError>
    where
        I: IntoIterator<Item = ModuleState>,
    {
        let mut mask = bitvec![0; self.require_binding()?.states.len()];
        for state in allowed {
            mask.set(self.state_index(state)?, true);
        }
        let slot = self.slots.get_mut(x, y).ok_or_else(|| out_of_bounds(x, y))?;
        slot.retain(|i| mask[i]);
        Ok(slot.entropy())
    }

    /// Marks the slot at `index` collapsed to `state`.
    pub(crate) fn collapse(&mut self, index: usize, state: ModuleState) -> Result<(), WfcError> {
        let state_index = self.state_index(state)?;
        let slot = self
            .slot_at_mut(index)
            .ok_or_else(|| WfcError::GridError(format!("Slot index {index} out of bounds")))?;
        slot.collapse_to(state_index, state);
        Ok(())
    }

    fn state_index(&self, state: ModuleState) -> Result<usize, WfcError> {
        self.require_binding()?
            .states
            .index_of(state)
            .ok_or_else(|| {
                WfcError::ConfigurationError(format!("State {state} is not in the catalog"))
            })
    }
}

fn out_of_bounds(x: usize, y: usize) -> WfcError {
    WfcError::GridError(format!("Slot ({x}, {y}) is out of bounds"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use wfc_rules::{ModuleId, Rotation};

    fn bound_grid(width: usize, height: usize, modules: &[&str]) -> WaveGrid {
        let mut grid = WaveGrid::new(width, height);
        let catalog = Arc::new(ModuleCatalog::new(modules.iter().copied()).unwrap());
        grid.bind(catalog, Arc::new(AdjacencyRuleSet::new()));
        grid
    }

    #[test]
    fn links_neighbors_and_edges() {
        let grid = WaveGrid::new(3, 2);
        let corner = grid.slot(0, 0).unwrap();
        assert_eq!(corner.neighbor(Direction::Left), None);
        assert_eq!(corner.neighbor(Direction::Down), None);
        assert_eq!(corner.neighbor(Direction::Right), grid.index(1, 0));
        assert_eq!(corner.neighbor(Direction::Up), grid.index(0, 1));

        let far = grid.slot(2, 1).unwrap();
        assert_eq!(far.neighbor(Direction::Right), None);
        assert_eq!(far.neighbor(Direction::Up), None);
        assert_eq!(far.neighbor(Direction::Left), grid.index(1, 1));
    }

    #[test]
    fn unbound_grid_has_empty_domains() {
        let mut grid = WaveGrid::new(2, 2);
        assert!(!grid.is_bound());
        assert_eq!(grid.slot(1, 1).unwrap().entropy(), 0);
        let state = ModuleState::new(ModuleId(0), Rotation::Up);
        assert!(matches!(grid.fix(0, 0, state), Err(WfcError::NotBound)));
    }

    #[test]
    fn bind_seeds_full_state_space() {
        let grid = bound_grid(2, 2, &["a", "b"]);
        for slot in grid.slots().iter() {
            assert_eq!(slot.entropy(), 8);
            assert!(!slot.is_collapsed());
        }
        assert_eq!(grid.uncollapsed().len(), 4);
    }

    #[test]
    fn fix_and_restrict() {
        let mut grid = bound_grid(2, 1, &["a", "b"]);
        let b_left = ModuleState::new(ModuleId(1), Rotation::Left);
        grid.fix(0, 0, b_left).unwrap();
        assert_eq!(grid.collapsed_state(0, 0), Some(b_left));
        assert_eq!(grid.slot(0, 0).unwrap().entropy(), 1);
        assert_eq!(grid.uncollapsed(), vec![(1, 0)]);

        let remaining = grid
            .restrict(1, 0, Rotation::ALL.map(|r| ModuleState::new(ModuleId(0), r)))
            .unwrap();
        assert_eq!(remaining, 4);
        assert!(grid
            .possible_states(1, 0)
            .unwrap()
            .iter()
            .all(|s| s.module == ModuleId(0)));

        // b is no longer possible there.
        assert!(matches!(
            grid.fix(1, 0, b_left),
            Err(WfcError::ConfigurationError(_))
        ));
        assert!(matches!(
            grid.fix(5, 0, b_left),
            Err(WfcError::GridError(_))
        ));
    }

    #[test]
    fn rebinding_resets_collapse() {
        let mut grid = bound_grid(1, 1, &["a"]);
        grid.fix(0, 0, ModuleState::new(ModuleId(0), Rotation::Down))
            .unwrap();
        let binding = grid.binding().unwrap().clone();
        grid.bind(binding.catalog, binding.rules);
        assert!(!grid.is_fully_collapsed());
        assert_eq!(grid.slot(0, 0).unwrap().entropy(), 4);
    }
}
