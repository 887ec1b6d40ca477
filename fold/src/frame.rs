use nalgebra::{Rotation3, Unit};

use super::*;

pub type Direction = Unit<Vector>;

/// Rotation angles, in degrees, about a frame's X, Y and Z axes.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Tilt {
    pub x: Float,
    pub y: Float,
    pub z: Float,
}

impl Tilt {
    #[inline]
    #[must_use]
    pub const fn new(x: Float, y: Float, z: Float) -> Self {
        Self { x, y, z }
    }

    #[inline]
    #[must_use]
    pub const fn about_x(deg: Float) -> Self {
        Self::new(deg, 0., 0.)
    }

    #[inline]
    #[must_use]
    pub const fn about_y(deg: Float) -> Self {
        Self::new(0., deg, 0.)
    }

    #[inline]
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    /// The angles in application order, paired with the axis each one rotates about.
    #[inline]
    pub fn steps(&self) -> [(Axis, Float); 3] {
        [(Axis::X, self.x), (Axis::Y, self.y), (Axis::Z, self.z)]
    }
}

impl From<[Float; 3]> for Tilt {
    #[inline]
    fn from([x, y, z]: [Float; 3]) -> Self {
        Self { x, y, z }
    }
}

impl From<Tilt> for [Float; 3] {
    #[inline]
    fn from(Tilt { x, y, z }: Tilt) -> Self {
        [x, y, z]
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
    Z,
}

/// An oriented, right-handed, orthonormal coordinate system: an origin and
/// three unit directions, `Z` being the normal (boresight).
///
/// Frames are immutable: rotations return new frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Frame {
    origin: Vector,
    x: Direction,
    y: Direction,
    z: Direction,
}

#[inline]
fn is_finite(v: &Vector) -> bool {
    v.iter().all(|c| c.is_finite())
}

impl Frame {
    /// The frame at `origin` whose axes are the world axes.
    #[inline]
    #[must_use]
    pub fn world(origin: impl Into<Vector>) -> Self {
        Self {
            origin: origin.into(),
            x: Vector::x_axis(),
            y: Vector::y_axis(),
            z: Vector::z_axis(),
        }
    }

    /// Builds a frame from its normal and an X direction.
    ///
    /// `x_dir` need not be perpendicular to `normal`: only its component
    /// orthogonal to `normal` is kept. `Y` is then `Z × X`.
    ///
    /// Fails if either vector has zero length, if they are parallel,
    /// or if any coordinate isn't finite.
    pub fn try_from_axes(
        origin: impl Into<Vector>,
        normal: impl Into<Vector>,
        x_dir: impl Into<Vector>,
    ) -> Result<Self> {
        let (origin, normal, x_dir) = (origin.into(), normal.into(), x_dir.into());

        if !(is_finite(&origin) && is_finite(&normal) && is_finite(&x_dir)) {
            return Err(Error::InvalidFrame("coordinates must be finite"));
        }

        let z = Unit::try_new(normal, precision::RESOLUTION)
            .ok_or(Error::InvalidFrame("normal has zero length"))?;

        let x_len = x_dir.norm();
        let x = Unit::try_new(
            x_dir - z.as_ref() * x_dir.dot(z.as_ref()),
            precision::ANGULAR * x_len,
        )
        .filter(|_| x_len > precision::RESOLUTION)
        .ok_or(Error::InvalidFrame("x direction is null or parallel to the normal"))?;

        let y = Unit::new_normalize(z.cross(x.as_ref()));

        Ok(Self { origin, x, y, z })
    }

    /// Starts from the world-aligned frame at `origin`, then rotates it about
    /// its own X axis by `tilt.x`, then about its (already rotated) Y axis by
    /// `tilt.y`, then about its (rotated twice) Z axis by `tilt.z`.
    ///
    /// All rotations go through `origin`.
    pub fn new(origin: impl Into<Vector>, tilt: impl Into<Tilt>) -> Result<Self> {
        let (origin, tilt) = (origin.into(), tilt.into());
        Self::check_placement(&origin, &tilt)?;

        let frame = tilt
            .steps()
            .into_iter()
            .fold(Self::world(origin), |frame, (axis, deg)| frame.rotated(axis, deg));

        log::debug!("frame at {origin:?} tilted by {tilt:?} about its own axes");

        Ok(frame)
    }

    /// Like [`Self::new`], but every rotation is done about a world axis
    /// through `origin` (the axes as they were before any rotation) instead
    /// of the frame's updated ones.
    pub fn with_fixed_axes(origin: impl Into<Vector>, tilt: impl Into<Tilt>) -> Result<Self> {
        let (origin, tilt) = (origin.into(), tilt.into());
        Self::check_placement(&origin, &tilt)?;

        let world = Self::world(origin);

        let frame = tilt
            .steps()
            .into_iter()
            .fold(world, |frame, (axis, deg)| {
                frame.rotated_about(world.axis(axis), deg)
            });

        log::debug!("frame at {origin:?} tilted by {tilt:?} about the world axes");

        Ok(frame)
    }

    fn check_placement(origin: &Vector, tilt: &Tilt) -> Result<()> {
        if !is_finite(origin) {
            return Err(Error::InvalidFrame("origin must be finite"));
        }
        if !tilt.is_finite() {
            return Err(Error::InvalidFrame("tilt angles must be finite"));
        }
        Ok(())
    }

    /// Rotate this frame by `deg` degrees about one of its own axes, through its origin.
    #[inline]
    #[must_use]
    pub fn rotated(&self, axis: Axis, deg: Float) -> Self {
        self.rotated_about(self.axis(axis), deg)
    }

    #[must_use]
    fn rotated_about(&self, axis: &Direction, deg: Float) -> Self {
        let rot = Rotation3::from_axis_angle(axis, deg.to_radians());

        let x = Unit::new_normalize(rot * self.x.into_inner());
        let z = Unit::new_normalize(rot * self.z.into_inner());
        // re-derived rather than rotated, so that roundoff can't skew the frame
        let y = Unit::new_normalize(z.cross(x.as_ref()));

        Self {
            origin: self.origin,
            x,
            y,
            z,
        }
    }

    #[inline]
    pub const fn origin(&self) -> &Vector {
        &self.origin
    }

    #[inline]
    pub const fn x_dir(&self) -> &Direction {
        &self.x
    }

    #[inline]
    pub const fn y_dir(&self) -> &Direction {
        &self.y
    }

    /// The `Z` direction, also called the boresight
    #[inline]
    pub const fn normal(&self) -> &Direction {
        &self.z
    }

    #[inline]
    pub const fn axis(&self, axis: Axis) -> &Direction {
        match axis {
            Axis::X => &self.x,
            Axis::Y => &self.y,
            Axis::Z => &self.z,
        }
    }

    /// The infinite plane through the origin, spanned by `X` and `Y`.
    #[inline]
    #[must_use]
    pub fn plane(&self) -> Plane {
        Plane::from(self)
    }

    /// The ray leaving the origin along the boresight.
    #[inline]
    #[must_use]
    pub fn boresight_ray(&self) -> Ray {
        Ray::new(self.origin, self.z.into_inner())
    }

    /// Coordinates of `p` in this frame.
    #[inline]
    #[must_use]
    pub fn to_local(&self, p: &Vector) -> Vector {
        let d = p - self.origin;
        Vector::new(
            d.dot(self.x.as_ref()),
            d.dot(self.y.as_ref()),
            d.dot(self.z.as_ref()),
        )
    }
}
