use crate::boundary::BoundaryCategory;
use crate::catalog::{ModuleDefinition, PointCloudCatalog};
use crate::LoadError;
use nalgebra::Point3;
use serde::Deserialize;
use std::collections::BTreeMap;

/// A single module entry as written in a catalog file.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ModuleEntry {
    /// The unique name of the module; `"void"` marks the outside of the grid.
    pub name: String,
    /// Boundary points keyed by category name (`wall`, `floor`, `void`).
    #[serde(default)]
    pub boundaries: BTreeMap<String, Vec<(f64, f64, f64)>>,
}

/// Represents the top-level structure of a catalog file.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct CatalogFile {
    /// Modules in listing order.
    pub modules: Vec<ModuleEntry>,
}

impl CatalogFile {
    /// Validates category names and builds the in-memory catalog.
    pub fn into_catalog(self) -> Result<PointCloudCatalog, LoadError> {
        if self.modules.is_empty() {
            return Err(LoadError::InvalidData("No modules defined.".to_owned()));
        }
        let mut definitions = Vec::with_capacity(self.modules.len());
        for entry in self.modules {
            let mut definition = ModuleDefinition::new(entry.name.clone());
            for (category_name, points) in entry.boundaries {
                let category: BoundaryCategory = category_name.parse().map_err(|e| {
                    LoadError::InvalidData(format!("Module '{}': {e}", entry.name))
                })?;
                let points = points
                    .into_iter()
                    .map(|(x, y, z)| Point3::new(x, y, z))
                    .collect();
                definition = definition.with(category, points);
            }
            definitions.push(definition);
        }
        PointCloudCatalog::new(definitions)
    }
}
