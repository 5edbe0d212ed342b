//! Module catalogs and the adjacency rules derived from their geometry.
//!
//! Holds the cardinal rotation algebra, module states, the boundary geometry
//! interface, the rule compiler and the catalog file loaders.

use thiserror::Error;

pub mod boundary;
pub mod catalog;
pub mod compiler;
pub mod formats;
pub mod loader;
pub mod rotation;
pub mod types;

pub use boundary::{BoundaryCategory, BoundarySource, PointKey, Transform, TransformError};
pub use catalog::{ModuleDefinition, PointCloudCatalog};
pub use compiler::{compile_rules, matching_category, AdjacencyRuleSet};
pub use rotation::{Direction, Rotation};
pub use types::{ModuleCatalog, ModuleId, ModuleState, RuleError, StateSpace, VOID_MODULE_NAME};

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("I/O error reading file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse catalog format (e.g., RON/JSON): {0}")]
    ParseError(String),
    #[error("Invalid catalog data: {0}")]
    InvalidData(String),
    #[error("Unsupported catalog format: {0}")]
    UnsupportedFormat(String),
    #[error("Feature not enabled: {0}")]
    FeatureNotEnabled(String),
}

impl From<RuleError> for LoadError {
    fn from(error: RuleError) -> Self {
        Self::InvalidData(format!("Catalog error: {error}"))
    }
}

impl From<TransformError> for LoadError {
    fn from(error: TransformError) -> Self {
        Self::InvalidData(error.to_string())
    }
}
