//! The cardinal rotation group and the matching grid directions.
//!
//! Both types are plain four-valued enums. Their group structure lives in
//! index arithmetic (`index()` / `from_index`) rather than in attached data,
//! so composition, inversion and the rotation/direction bijection are all
//! total functions.

use crate::boundary::TransformError;
use nalgebra::Matrix3;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Neg};
use std::str::FromStr;

/// One of the four cardinal orientations of a module.
///
/// Indices follow declaration order and each step is a quarter turn
/// counter-clockwise, so `Up` is the identity and `Down` is a half turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Rotation {
    Up,
    Left,
    Down,
    Right,
}

/// One of the four cardinal neighbor directions on the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Direction {
    Up,
    Left,
    Down,
    Right,
}

/// Lookup table used to carry a direction into a rotated neighbor's frame.
///
/// Entry `r` equals `Rotation::Down + r.inverse()`.
pub const BASE_ROTATIONS: [Rotation; 4] = [
    Rotation::Down,
    Rotation::Left,
    Rotation::Up,
    Rotation::Right,
];

impl Rotation {
    /// All rotations in group-index order.
    pub const ALL: [Self; 4] = [Self::Up, Self::Left, Self::Down, Self::Right];

    /// The identity element of the group.
    pub const IDENTITY: Self = Self::Up;

    /// Position of this rotation in the cyclic group (quarter turns, CCW).
    #[inline]
    pub const fn index(self) -> usize {
        match self {
            Self::Up => 0,
            Self::Left => 1,
            Self::Down => 2,
            Self::Right => 3,
        }
    }

    /// Rotation with the given group index, reduced modulo 4.
    #[inline]
    pub const fn from_index(index: usize) -> Self {
        Self::ALL[index % 4]
    }

    /// Group composition. Equivalent to the `+` operator.
    #[inline]
    pub const fn compose(self, other: Self) -> Self {
        Self::from_index(self.index() + other.index())
    }

    /// The rotation that undoes this one.
    #[inline]
    pub const fn inverse(self) -> Self {
        Self::from_index(4 - self.index())
    }

    /// The direction sharing this rotation's name.
    #[inline]
    pub const fn to_direction(self) -> Direction {
        Direction::from_index(self.index())
    }

    /// Row-major `(m00, m01, m10, m11)` entries of the 2D rotation matrix.
    pub const fn matrix_entries(self) -> (i8, i8, i8, i8) {
        match self {
            Self::Up => (1, 0, 0, 1),
            Self::Left => (0, -1, 1, 0),
            Self::Down => (-1, 0, 0, -1),
            Self::Right => (0, 1, -1, 0),
        }
    }

    /// The rotation as a 3x3 matrix about the z axis.
    pub fn matrix(self) -> Matrix3<f64> {
        let (m00, m01, m10, m11) = self.matrix_entries();
        Matrix3::new(
            f64::from(m00),
            f64::from(m01),
            0.0,
            f64::from(m10),
            f64::from(m11),
            0.0,
            0.0,
            0.0,
            1.0,
        )
    }
}

impl Add for Rotation {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        self.compose(rhs)
    }
}

impl Neg for Rotation {
    type Output = Self;

    fn neg(self) -> Self {
        self.inverse()
    }
}

impl Default for Rotation {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl fmt::Display for Rotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Up => "Up",
            Self::Left => "Left",
            Self::Down => "Down",
            Self::Right => "Right",
        };
        f.write_str(name)
    }
}

impl FromStr for Rotation {
    type Err = TransformError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "up" | "0" => Ok(Self::Up),
            "left" | "90" => Ok(Self::Left),
            "down" | "180" => Ok(Self::Down),
            "right" | "270" => Ok(Self::Right),
            _ => Err(TransformError::InvalidRotation(s.to_owned())),
        }
    }
}

impl TryFrom<u8> for Rotation {
    type Error = TransformError;

    /// Accepts raw group indices `0..4`; anything else is outside the group.
    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if value < 4 {
            Ok(Self::from_index(usize::from(value)))
        } else {
            Err(TransformError::InvalidRotation(value.to_string()))
        }
    }
}

impl Direction {
    /// All directions in the same order as [`Rotation::ALL`].
    pub const ALL: [Self; 4] = [Self::Up, Self::Left, Self::Down, Self::Right];

    #[inline]
    pub const fn index(self) -> usize {
        match self {
            Self::Up => 0,
            Self::Left => 1,
            Self::Down => 2,
            Self::Right => 3,
        }
    }

    #[inline]
    pub const fn from_index(index: usize) -> Self {
        Self::ALL[index % 4]
    }

    /// The rotation sharing this direction's name.
    #[inline]
    pub const fn to_rotation(self) -> Rotation {
        Rotation::from_index(self.index())
    }

    /// Unit grid offset `(dx, dy)`; `Up` is +y.
    pub const fn offset(self) -> (isize, isize) {
        match self {
            Self::Up => (0, 1),
            Self::Left => (-1, 0),
            Self::Down => (0, -1),
            Self::Right => (1, 0),
        }
    }

    /// The direction pointing back the other way.
    #[inline]
    pub const fn opposite(self) -> Self {
        Self::from_index(self.index() + 2)
    }

    /// This direction after applying `rotation` to the frame it lives in.
    #[inline]
    pub const fn rotated(self, rotation: Rotation) -> Self {
        Self::from_index(self.index() + rotation.index())
    }

    /// Maps a direction seen from a slot to the direction, in the unrotated
    /// frame of a neighbor rotated by `neighbor_rotation`, that points back at
    /// the slot. Rules are stored for unrotated modules, so this is the key
    /// under which the neighbor's rules constrain the slot.
    #[inline]
    pub const fn in_neighbor_frame(self, neighbor_rotation: Rotation) -> Self {
        self.to_rotation()
            .compose(BASE_ROTATIONS[neighbor_rotation.index()])
            .to_direction()
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.to_rotation(), f)
    }
}
