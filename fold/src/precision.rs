//! Tolerances used for geometric comparisons.

use crate::Float;

/// Angular tolerance (radians).
///
/// A ray whose direction makes an angle smaller than this with a plane is
/// considered parallel to it.
pub const ANGULAR: Float = 1.0e-12;

/// Smallest vector norm that can still be normalised.
pub const RESOLUTION: Float = Float::MIN_POSITIVE;
