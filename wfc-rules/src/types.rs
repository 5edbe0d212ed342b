use crate::rotation::Rotation;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

/// Name of the module used for cells outside the grid.
pub const VOID_MODULE_NAME: &str = "void";

/// Represents a unique identifier for a module.
///
/// The id is the module's position in its [`ModuleCatalog`], which keeps it
/// stable for the lifetime of the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ModuleId(pub usize);

/// A module in a particular orientation; the unit a slot collapses to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ModuleState {
    pub module: ModuleId,
    pub rotation: Rotation,
}

impl ModuleState {
    pub const fn new(module: ModuleId, rotation: Rotation) -> Self {
        Self { module, rotation }
    }

    /// The same module with `rotation` applied on top of its own.
    #[inline]
    #[must_use]
    pub fn rotated(self, rotation: Rotation) -> Self {
        Self::new(self.module, self.rotation + rotation)
    }
}

impl fmt::Display for ModuleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}@{}", self.module.0, self.rotation)
    }
}

/// Errors that can occur while building a catalog or compiling its rules.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RuleError {
    /// Rule compilation needs at least one module to seed any domain.
    #[error("Module catalog is empty.")]
    EmptyCatalog,
    /// Module names are the catalog's keys and must be distinct.
    #[error("Duplicate module name in catalog: {0}")]
    DuplicateModule(String),
}

/// The ordered, distinct set of module names a generator works with.
#[derive(Debug, Clone, Default)]
pub struct ModuleCatalog {
    names: Vec<String>,
    by_name: HashMap<String, ModuleId>,
}

impl ModuleCatalog {
    /// Creates a catalog from module names in their listing order.
    ///
    /// # Errors
    ///
    /// Returns `RuleError::DuplicateModule` if a name appears twice.
    pub fn new<I, S>(names: I) -> Result<Self, RuleError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut catalog = Self::default();
        for name in names {
            let name = name.into();
            let id = ModuleId(catalog.names.len());
            if catalog.by_name.insert(name.clone(), id).is_some() {
                return Err(RuleError::DuplicateModule(name));
            }
            catalog.names.push(name);
        }
        Ok(catalog)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Looks up a module by name.
    pub fn find(&self, name: &str) -> Option<ModuleId> {
        self.by_name.get(name).copied()
    }

    /// The module named [`VOID_MODULE_NAME`], if the catalog has one.
    pub fn void_module(&self) -> Option<ModuleId> {
        self.find(VOID_MODULE_NAME)
    }

    pub fn name(&self, id: ModuleId) -> Option<&str> {
        self.names.get(id.0).map(String::as_str)
    }

    /// Module ids in listing order.
    pub fn ids(&self) -> impl ExactSizeIterator<Item = ModuleId> + '_ {
        (0..self.names.len()).map(ModuleId)
    }

    /// Human-readable `name@Rotation` label for a state.
    pub fn label(&self, state: ModuleState) -> String {
        match self.name(state.module) {
            Some(name) => format!("{name}@{}", state.rotation),
            None => state.to_string(),
        }
    }
}

/// Every module state of a catalog, each with a dense index.
///
/// Computed once per catalog and handed to the grid explicitly. The index of
/// `(module, rotation)` is `rotation.index() * num_modules + module.0`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateSpace {
    num_modules: usize,
}

impl StateSpace {
    pub fn new(catalog: &ModuleCatalog) -> Self {
        Self {
            num_modules: catalog.len(),
        }
    }

    pub fn num_modules(&self) -> usize {
        self.num_modules
    }

    /// Total number of states (modules x rotations).
    pub fn len(&self) -> usize {
        self.num_modules * Rotation::ALL.len()
    }

    pub fn is_empty(&self) -> bool {
        self.num_modules == 0
    }

    /// Dense index of `state`, or `None` if its module is not in the catalog.
    #[inline]
    pub fn index_of(&self, state: ModuleState) -> Option<usize> {
        (state.module.0 < self.num_modules)
            .then(|| state.rotation.index() * self.num_modules + state.module.0)
    }

    /// The state stored at a dense index.
    #[inline]
    pub fn state_at(&self, index: usize) -> Option<ModuleState> {
        (index < self.len()).then(|| {
            ModuleState::new(
                ModuleId(index % self.num_modules),
                Rotation::from_index(index / self.num_modules),
            )
        })
    }

    /// All states in index order.
    pub fn iter(&self) -> impl Iterator<Item = ModuleState> + '_ {
        (0..self.len()).filter_map(|index| self.state_at(index))
    }
}
