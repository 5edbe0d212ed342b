use crate::boundary::{BoundaryCategory, BoundarySource, TransformError};
use crate::types::{ModuleCatalog, ModuleId};
use crate::LoadError;
use nalgebra::Point3;
use std::collections::HashMap;

/// Boundary points of one module, grouped by category.
#[derive(Debug, Clone, Default)]
pub struct ModuleDefinition {
    pub name: String,
    pub boundaries: Vec<(BoundaryCategory, Vec<Point3<f64>>)>,
}

impl ModuleDefinition {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            boundaries: Vec::new(),
        }
    }

    /// Adds a boundary category with its points.
    #[must_use]
    pub fn with(mut self, category: BoundaryCategory, points: Vec<Point3<f64>>) -> Self {
        self.boundaries.push((category, points));
        self
    }
}

/// A module catalog whose geometry is stored as plain point lists.
///
/// This is the file-backed stand-in for a mesh-based geometry source: it
/// knows each module's boundary points directly instead of extracting them.
#[derive(Debug, Clone, Default)]
pub struct PointCloudCatalog {
    catalog: ModuleCatalog,
    points: HashMap<(ModuleId, BoundaryCategory), Vec<Point3<f64>>>,
}

impl PointCloudCatalog {
    /// Builds a catalog from module definitions in listing order.
    ///
    /// Points of a category given twice for the same module are merged.
    ///
    /// # Errors
    ///
    /// Returns `LoadError::InvalidData` for duplicate module names or
    /// non-finite coordinates.
    pub fn new(modules: Vec<ModuleDefinition>) -> Result<Self, LoadError> {
        let catalog = ModuleCatalog::new(modules.iter().map(|m| m.name.clone()))?;
        let mut points: HashMap<(ModuleId, BoundaryCategory), Vec<Point3<f64>>> = HashMap::new();

        for (id, module) in catalog.ids().zip(modules) {
            for (category, category_points) in module.boundaries {
                for p in &category_points {
                    if let Some(bad) = p.iter().find(|v| !v.is_finite()) {
                        return Err(LoadError::from(TransformError::NonFinite(*bad)));
                    }
                }
                points
                    .entry((id, category))
                    .or_default()
                    .extend(category_points);
            }
        }
        Ok(Self { catalog, points })
    }

    pub fn catalog(&self) -> &ModuleCatalog {
        &self.catalog
    }

    /// Splits into the name catalog and the geometry.
    pub fn into_catalog(self) -> ModuleCatalog {
        self.catalog
    }

    /// Categories defined for `module`, in priority order.
    pub fn categories(&self, module: ModuleId) -> Vec<BoundaryCategory> {
        BoundaryCategory::PRIORITY
            .into_iter()
            .filter(|c| self.points.contains_key(&(module, *c)))
            .collect()
    }
}

impl BoundarySource for PointCloudCatalog {
    fn local_points(
        &self,
        module: ModuleId,
        category: BoundaryCategory,
    ) -> Option<&[Point3<f64>]> {
        self.points.get(&(module, category)).map(Vec::as_slice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merges_repeated_categories() {
        let catalog = PointCloudCatalog::new(vec![ModuleDefinition::new("floor")
            .with(BoundaryCategory::Floor, vec![Point3::new(0.5, 0.5, 0.0)])
            .with(BoundaryCategory::Floor, vec![Point3::new(-0.5, 0.5, 0.0)])])
        .unwrap();
        let pts = catalog
            .local_points(ModuleId(0), BoundaryCategory::Floor)
            .unwrap();
        assert_eq!(pts.len(), 2);
        assert_eq!(catalog.categories(ModuleId(0)), vec![BoundaryCategory::Floor]);
        assert!(catalog
            .local_points(ModuleId(0), BoundaryCategory::Wall)
            .is_none());
    }

    #[test]
    fn rejects_non_finite_points() {
        let result = PointCloudCatalog::new(vec![ModuleDefinition::new("bad")
            .with(BoundaryCategory::Void, vec![Point3::new(f64::INFINITY, 0.0, 0.0)])]);
        assert!(matches!(result, Err(LoadError::InvalidData(_))));
    }

    #[test]
    fn rejects_duplicate_names() {
        let result = PointCloudCatalog::new(vec![
            ModuleDefinition::new("a"),
            ModuleDefinition::new("a"),
        ]);
        assert!(matches!(result, Err(LoadError::InvalidData(_))));
    }
}
