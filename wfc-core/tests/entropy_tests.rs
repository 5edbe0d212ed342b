// wfc-core/tests/entropy_tests.rs
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;
use wfc_core::entropy::{DomainSizeEntropyCalculator, EntropyCalculator, SelectionStrategy};
use wfc_core::WaveGrid;
use wfc_rules::{AdjacencyRuleSet, ModuleCatalog, ModuleId, ModuleState, Rotation};

fn bound_grid(width: usize, height: usize) -> WaveGrid {
    let catalog = ModuleCatalog::new(["a", "b", "c"]).unwrap();
    let mut grid = WaveGrid::new(width, height);
    grid.bind(Arc::new(catalog), Arc::new(AdjacencyRuleSet::new()));
    grid
}

#[test]
fn test_entropy_is_domain_size() {
    let mut grid = bound_grid(2, 2);
    grid.restrict(1, 0, [ModuleState::new(ModuleId(2), Rotation::Up), ModuleState::new(ModuleId(0), Rotation::Down)])
        .unwrap();
    grid.fix(0, 1, ModuleState::new(ModuleId(1), Rotation::Left))
        .unwrap();

    let entropy = DomainSizeEntropyCalculator::default().calculate_entropy(&grid);
    assert_eq!(entropy.get(0, 0), Some(&Some(12)));
    assert_eq!(entropy.get(1, 0), Some(&Some(2)));
    assert_eq!(entropy.get(0, 1), Some(&None), "collapsed slots carry no entropy");
}

#[test]
fn test_most_constrained_slot_is_selected() {
    let mut grid = bound_grid(3, 3);
    grid.restrict(2, 2, Rotation::ALL.map(|r| ModuleState::new(ModuleId(1), r)))
        .unwrap();

    for strategy in [SelectionStrategy::FirstMinimum, SelectionStrategy::RandomLowest] {
        let calculator = DomainSizeEntropyCalculator::new(strategy);
        let entropy = calculator.calculate_entropy(&grid);
        let mut rng = StdRng::seed_from_u64(11);
        assert_eq!(
            calculator.select_lowest_entropy_cell(&entropy, &mut rng),
            Some((2, 2))
        );
    }
}

#[test]
fn test_fully_collapsed_grid_selects_nothing() {
    let mut grid = bound_grid(1, 2);
    grid.fix(0, 0, ModuleState::new(ModuleId(0), Rotation::Up)).unwrap();
    grid.fix(0, 1, ModuleState::new(ModuleId(0), Rotation::Up)).unwrap();

    let calculator = DomainSizeEntropyCalculator::default();
    let entropy = calculator.calculate_entropy(&grid);
    let mut rng = StdRng::seed_from_u64(0);
    assert_eq!(calculator.select_lowest_entropy_cell(&entropy, &mut rng), None);
}
