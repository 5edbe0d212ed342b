//! Boundary geometry: the interface the rule compiler uses to ask where a
//! module's edges are, and the rigid transforms applied before comparing them.

use crate::rotation::Rotation;
use crate::types::ModuleId;
use nalgebra::{Point3, Vector3};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Rejected input to transform construction or application.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TransformError {
    /// A rotation value that is not one of the four cardinal rotations.
    #[error("Invalid transform input: rotation '{0}' is not a cardinal rotation")]
    InvalidRotation(String),
    /// A location that is not a 3-component vector.
    #[error("Invalid transform input: location must have 3 components, got {0}")]
    WrongArity(usize),
    /// A location or point component that is NaN or infinite.
    #[error("Invalid transform input: non-finite component {0}")]
    NonFinite(f64),
}

/// A labelled class of boundary points used to match neighboring modules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum BoundaryCategory {
    Wall,
    Floor,
    Void,
}

impl BoundaryCategory {
    /// Categories in the order the compatibility test tries them.
    pub const PRIORITY: [Self; 3] = [Self::Wall, Self::Floor, Self::Void];

    /// Number of shared points two modules need for this category to match.
    pub const fn required_matches(self) -> usize {
        match self {
            Self::Wall => 3,
            Self::Floor | Self::Void => 2,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Wall => "wall",
            Self::Floor => "floor",
            Self::Void => "void",
        }
    }
}

impl fmt::Display for BoundaryCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BoundaryCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::PRIORITY
            .into_iter()
            .find(|category| category.name() == s)
            .ok_or_else(|| format!("unknown boundary category '{s}'"))
    }
}

/// Exact, hashable identity of a transformed point.
///
/// Built from the bit patterns of the coordinates with negative zero folded
/// into positive zero, so `-0.0` produced by a rotation still matches `0.0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PointKey([u64; 3]);

impl PointKey {
    pub fn new(point: &Point3<f64>) -> Self {
        let bits = |v: f64| if v == 0.0 { 0.0f64.to_bits() } else { v.to_bits() };
        Self([bits(point.x), bits(point.y), bits(point.z)])
    }
}

/// A cardinal rotation about the z axis followed by a translation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub rotation: Rotation,
    pub translation: Vector3<f64>,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            rotation: Rotation::IDENTITY,
            translation: Vector3::zeros(),
        }
    }
}

impl Transform {
    /// Creates a transform, rejecting non-finite translations.
    ///
    /// # Errors
    ///
    /// Returns `TransformError::NonFinite` if any component is NaN or infinite.
    pub fn new(rotation: Rotation, translation: Vector3<f64>) -> Result<Self, TransformError> {
        if let Some(bad) = translation.iter().find(|v| !v.is_finite()) {
            return Err(TransformError::NonFinite(*bad));
        }
        Ok(Self {
            rotation,
            translation,
        })
    }

    /// Creates a transform from a loosely typed location such as one read
    /// from a file.
    ///
    /// # Errors
    ///
    /// Returns `TransformError::WrongArity` unless `location` has exactly
    /// three components, or `TransformError::NonFinite` for NaN/inf values.
    pub fn from_slice(rotation: Rotation, location: &[f64]) -> Result<Self, TransformError> {
        match *location {
            [x, y, z] => Self::new(rotation, Vector3::new(x, y, z)),
            _ => Err(TransformError::WrongArity(location.len())),
        }
    }

    /// Rotation only, no translation.
    pub fn from_rotation(rotation: Rotation) -> Self {
        Self {
            rotation,
            translation: Vector3::zeros(),
        }
    }

    /// Applies the transform to a single point.
    #[inline]
    pub fn apply(&self, point: &Point3<f64>) -> Point3<f64> {
        Point3::from(self.rotation.matrix() * point.coords + self.translation)
    }

    /// Applies the transform to every point and returns their exact keys.
    pub fn apply_all(&self, points: &[Point3<f64>]) -> HashSet<PointKey> {
        let matrix = self.rotation.matrix();
        points
            .iter()
            .map(|p| PointKey::new(&Point3::from(matrix * p.coords + self.translation)))
            .collect()
    }
}

/// Geometry collaborator: where each module's boundary points are.
///
/// Points are given in the module's own frame, centred on its cell. A module
/// without a category returns `None`; the compiler skips that category.
pub trait BoundarySource: Sync {
    /// Boundary points of `module` for `category` before any transform.
    fn local_points(&self, module: ModuleId, category: BoundaryCategory)
        -> Option<&[Point3<f64>]>;

    /// Boundary points of `module` for `category` after applying `transform`.
    fn boundary_points(
        &self,
        module: ModuleId,
        category: BoundaryCategory,
        transform: &Transform,
    ) -> Option<HashSet<PointKey>> {
        self.local_points(module, category)
            .map(|points| transform.apply_all(points))
    }
}
