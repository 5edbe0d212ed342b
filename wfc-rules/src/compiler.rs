use crate::boundary::{BoundaryCategory, BoundarySource, PointKey, Transform};
use crate::rotation::{Direction, Rotation};
use crate::types::{ModuleCatalog, ModuleId, ModuleState, RuleError};
use log::{debug, info};
use nalgebra::Vector3;
use rayon::prelude::*;
use std::collections::{HashMap, HashSet};

type DirectionRules = HashMap<Direction, HashSet<ModuleState>>;

/// Which module states may sit next to each module, per direction.
///
/// Rules are stored for an unrotated instance of the module: the set under
/// `(A, D)` lists the states that may occupy the cell one step in direction
/// `D` from an `A` placed with `Rotation::Up`. Entries exist only for
/// `(module, direction)` pairs with at least one legal neighbor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdjacencyRuleSet {
    rules: HashMap<ModuleId, DirectionRules>,
}

impl AdjacencyRuleSet {
    /// Creates an empty rule set. Mostly useful for hand-written rules.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a rule set from `(module, direction, neighbor state)` triples.
    pub fn from_allowed_tuples<I>(allowed: I) -> Self
    where
        I: IntoIterator<Item = (ModuleId, Direction, ModuleState)>,
    {
        let mut rules = Self::new();
        for (module, direction, state) in allowed {
            rules.allow(module, direction, state);
        }
        rules
    }

    /// Marks `state` as legal in `direction` of an unrotated `module`.
    pub fn allow(&mut self, module: ModuleId, direction: Direction, state: ModuleState) {
        self.rules
            .entry(module)
            .or_default()
            .entry(direction)
            .or_default()
            .insert(state);
    }

    /// The legal neighbor states for `(module, direction)`, if any compiled.
    pub fn get(&self, module: ModuleId, direction: Direction) -> Option<&HashSet<ModuleState>> {
        self.rules.get(&module).and_then(|dirs| dirs.get(&direction))
    }

    /// Checks if `state` may sit in `direction` of an unrotated `module`.
    #[inline]
    pub fn check(&self, module: ModuleId, direction: Direction, state: ModuleState) -> bool {
        self.get(module, direction)
            .is_some_and(|allowed| allowed.contains(&state))
    }

    /// Checks if any rule at all was compiled for `module`.
    pub fn has_rules_for(&self, module: ModuleId) -> bool {
        self.rules.contains_key(&module)
    }

    /// Total number of `(module, direction, state)` entries.
    pub fn num_rules(&self) -> usize {
        self.rules
            .values()
            .flat_map(HashMap::values)
            .map(HashSet::len)
            .sum()
    }
}

/// Tests whether `neighbor`, placed with `transform`, matches an unrotated
/// `module` at the origin.
///
/// Categories are tried in [`BoundaryCategory::PRIORITY`] order. A category
/// missing on either side is skipped. The first category whose shared point
/// count equals its required count is returned.
pub fn matching_category<G>(
    geometry: &G,
    module: ModuleId,
    neighbor: ModuleId,
    transform: &Transform,
) -> Option<BoundaryCategory>
where
    G: BoundarySource + ?Sized,
{
    let origin = Transform::default();
    BoundaryCategory::PRIORITY.into_iter().find(|&category| {
        let Some(own) = geometry.boundary_points(module, category, &origin) else {
            return false;
        };
        let Some(other) = geometry.boundary_points(neighbor, category, transform) else {
            return false;
        };
        shared_points(&own, &other) == category.required_matches()
    })
}

fn shared_points(a: &HashSet<PointKey>, b: &HashSet<PointKey>) -> usize {
    a.intersection(b).count()
}

/// Transform placing a neighbor rotated by `rotation` one cell in `direction`.
fn neighbor_transform(direction: Direction, rotation: Rotation) -> Transform {
    let (dx, dy) = direction.offset();
    Transform {
        rotation,
        translation: Vector3::new(dx as f64, dy as f64, 0.0),
    }
}

/// Compiles the rules of a single module against every module in `ids`.
fn compile_module<G>(geometry: &G, module: ModuleId, ids: &[ModuleId]) -> DirectionRules
where
    G: BoundarySource + ?Sized,
{
    // The module's own points never move; fetch them once per category.
    let origin = Transform::default();
    let own: Vec<(BoundaryCategory, HashSet<PointKey>)> = BoundaryCategory::PRIORITY
        .into_iter()
        .filter_map(|c| geometry.boundary_points(module, c, &origin).map(|p| (c, p)))
        .collect();

    let mut rules = DirectionRules::new();
    if own.is_empty() {
        debug!("Module {:?} has no boundary categories; no rules compiled", module);
        return rules;
    }

    for &neighbor in ids {
        for direction in Direction::ALL {
            for rotation in Rotation::ALL {
                let transform = neighbor_transform(direction, rotation);
                let matched = own.iter().find(|(category, points)| {
                    geometry
                        .boundary_points(neighbor, *category, &transform)
                        .is_some_and(|other| {
                            shared_points(points, &other) == category.required_matches()
                        })
                });
                if let Some((category, _)) = matched {
                    debug!(
                        "Rule derived: {:?} allows ({:?}, {}) to the {} via {}",
                        module, neighbor, rotation, direction, category
                    );
                    rules
                        .entry(direction)
                        .or_default()
                        .insert(ModuleState::new(neighbor, rotation));
                }
            }
        }
    }
    rules
}

/// Derives the adjacency rules of a catalog from boundary geometry.
///
/// Every ordered module pair is tested in all four directions and all four
/// rotations of the neighbor, including each module against itself. No
/// symmetry is assumed.
///
/// # Errors
///
/// Returns `RuleError::EmptyCatalog` if the catalog has no modules.
pub fn compile_rules<G>(catalog: &ModuleCatalog, geometry: &G) -> Result<AdjacencyRuleSet, RuleError>
where
    G: BoundarySource + ?Sized,
{
    if catalog.is_empty() {
        return Err(RuleError::EmptyCatalog);
    }
    let ids: Vec<ModuleId> = catalog.ids().collect();
    debug!(
        "Compiling adjacency rules: num_modules={}, pair_tests={}",
        ids.len(),
        ids.len() * ids.len() * Direction::ALL.len() * Rotation::ALL.len()
    );

    let rules: HashMap<ModuleId, DirectionRules> = ids
        .par_iter()
        .map(|&module| (module, compile_module(geometry, module, &ids)))
        .filter(|(_, dirs)| !dirs.is_empty())
        .collect();

    let rule_set = AdjacencyRuleSet { rules };
    info!(
        "Compiled {} adjacency rules for {}/{} modules",
        rule_set.num_rules(),
        rule_set.rules.len(),
        ids.len()
    );
    Ok(rule_set)
}
