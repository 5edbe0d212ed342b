// wfc-core/tests/grid_tests.rs
use std::sync::Arc;
use wfc_core::grid::{Grid, WaveGrid};
use wfc_core::WfcError;
use wfc_rules::{AdjacencyRuleSet, Direction, ModuleCatalog, ModuleId, ModuleState, Rotation};

#[test]
fn test_grid_new() {
    let grid: Grid<usize> = Grid::new(3, 4);
    assert_eq!(grid.width, 3);
    assert_eq!(grid.height, 4);
    assert_eq!(grid.len(), 12);
    assert_eq!(*grid.get(0, 0).expect("Cell (0,0) should exist"), 0);
    assert_eq!(*grid.get(2, 3).expect("Cell (2,3) should exist"), 0);
}

#[test]
fn test_grid_get() {
    let mut grid: Grid<usize> = Grid::new(2, 2);
    *grid.get_mut(1, 0).unwrap() = 42;

    assert_eq!(*grid.get(1, 0).unwrap(), 42);
    assert_eq!(*grid.get(0, 0).unwrap(), 0);

    // Out of bounds checks
    assert!(grid.get(2, 0).is_none());
    assert!(grid.get(0, 2).is_none());
    assert!(grid.get_mut(5, 5).is_none());
}

#[test]
fn test_grid_index_and_coords_are_row_major() {
    let grid: Grid<u8> = Grid::new(3, 2);
    assert_eq!(grid.index(2, 0), Some(2));
    assert_eq!(grid.index(0, 1), Some(3));
    assert_eq!(grid.index(3, 0), None);
    assert_eq!(grid.coords(5), (2, 1));
}

#[test]
fn test_grid_from_fn() {
    let grid = Grid::from_fn(2, 2, |x, y| x * 10 + y);
    assert_eq!(grid.get(1, 1), Some(&11));
    assert_eq!(grid.iter().copied().collect::<Vec<_>>(), vec![0, 10, 1, 11]);
}

#[test]
fn test_wave_grid_interior_slot_has_four_neighbors() {
    let grid = WaveGrid::new(3, 3);
    let center = grid.slot(1, 1).unwrap();
    for direction in Direction::ALL {
        let (dx, dy) = direction.offset();
        let expected = grid.index((1 + dx) as usize, (1 + dy) as usize);
        assert_eq!(center.neighbor(direction), expected, "{direction}");
    }
}

#[test]
fn test_wave_grid_bind_and_fix() {
    let catalog = Arc::new(ModuleCatalog::new(["void", "wall"]).unwrap());
    let mut grid = WaveGrid::new(2, 2);
    grid.bind(catalog, Arc::new(AdjacencyRuleSet::new()));

    assert_eq!(grid.len(), 4);
    assert_eq!(grid.possible_states(0, 0).unwrap().len(), 8);

    let wall = ModuleState::new(ModuleId(1), Rotation::Left);
    grid.fix(0, 1, wall).unwrap();
    assert_eq!(grid.collapsed_state(0, 1), Some(wall));
    assert_eq!(grid.collapsed_count(), 1);
    assert!(!grid.is_fully_collapsed());

    let unknown = ModuleState::new(ModuleId(9), Rotation::Up);
    assert!(matches!(
        grid.fix(1, 1, unknown),
        Err(WfcError::ConfigurationError(_))
    ));
    assert!(matches!(
        grid.restrict(2, 2, [wall]),
        Err(WfcError::GridError(_))
    ));
}
