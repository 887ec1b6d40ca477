//! Folded beam paths: ray reflection through chains of tilted planar mirrors,
//! and the pointing/position error of the outgoing beam at a target frame.

pub use nalgebra;

use nalgebra::Vector3;

mod beam;
mod chain;
mod deviation;
mod error;
mod fit;
mod frame;
mod mirror;
mod plane;
pub mod precision;

pub use beam::*;
pub use chain::*;
pub use deviation::*;
pub use error::*;
pub use fit::*;
pub use frame::*;
pub use mirror::*;
pub use plane::*;

pub type Float = f64;

/// A point, or a free vector, in world coordinates.
pub type Vector = Vector3<Float>;

/// A light ray, represented as a half-line.
///
/// `dir` is not required to be of unit length, only non-zero. Reflections
/// preserve its magnitude.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ray {
    /// The starting point of the half-line
    pub pos: Vector,
    /// the direction of the half-line
    pub dir: Vector,
}

impl Ray {
    #[inline]
    #[must_use]
    pub fn new(pos: impl Into<Vector>, dir: impl Into<Vector>) -> Self {
        Self {
            pos: pos.into(),
            dir: dir.into(),
        }
    }

    /// Get the point at parameter `t` (can be negative) along the ray
    #[inline]
    #[must_use]
    pub fn at(&self, t: Float) -> Vector {
        self.pos + self.dir * t
    }

    /// Move the ray's position forward (or backward if t < 0.0) by `t`
    #[inline]
    pub fn advance(&mut self, t: Float) {
        self.pos = self.at(t);
    }

    /// The same half-line origin, pointing the other way.
    #[inline]
    #[must_use]
    pub fn reversed(&self) -> Self {
        Self {
            pos: self.pos,
            dir: -self.dir,
        }
    }
}
