use nalgebra::Unit;

use super::*;

/// An infinite affine plane, given by a point on it and its unit normal.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Plane {
    origin: Vector,
    normal: Direction,
}

impl Plane {
    /// Fails if `normal` is zero.
    #[inline]
    pub fn new(origin: impl Into<Vector>, normal: impl Into<Vector>) -> Result<Self> {
        Unit::try_new(normal.into(), precision::RESOLUTION)
            .map(|normal| Self::from_unit(origin, normal))
            .ok_or(Error::DegenerateGeometry(Degeneracy::ZeroDirection))
    }

    #[inline]
    #[must_use]
    pub fn from_unit(origin: impl Into<Vector>, normal: Direction) -> Self {
        Self {
            origin: origin.into(),
            normal,
        }
    }

    #[inline]
    pub const fn origin(&self) -> &Vector {
        &self.origin
    }

    #[inline]
    pub const fn normal(&self) -> &Direction {
        &self.normal
    }

    /// Returns `t` such that `ray.at(t)` lies on this plane.
    ///
    /// `t` may be negative: the ray is treated as a full line.
    ///
    /// Fails if the ray's direction is zero, or makes an angle smaller than
    /// [`precision::ANGULAR`] with the plane.
    pub fn ray_parameter(&self, ray: &Ray) -> Result<Float> {
        let n = self.normal.as_ref();

        let len = ray.dir.norm();
        // also catches NaNs
        if !(len > precision::RESOLUTION) {
            return Err(Error::DegenerateGeometry(Degeneracy::ZeroDirection));
        }

        let u = ray.dir.dot(n);
        let cos = u / len;

        if cos.abs() <= precision::ANGULAR {
            log::warn!("ray {ray:?} is parallel to the plane through {:?}", self.origin);
            return Err(Error::DegenerateGeometry(Degeneracy::ParallelRay(cos)));
        }

        Ok((self.origin - ray.pos).dot(n) / u)
    }

    /// The point where the line carrying `ray` meets this plane.
    #[inline]
    pub fn intersection(&self, ray: &Ray) -> Result<Vector> {
        self.ray_parameter(ray).map(|t| ray.at(t))
    }

    #[inline]
    #[must_use]
    pub fn signed_distance(&self, p: &Vector) -> Float {
        (p - self.origin).dot(self.normal.as_ref())
    }

    /// Orthogonal projection of the point `p` onto this plane.
    #[inline]
    #[must_use]
    pub fn project_point(&self, p: &Vector) -> Vector {
        p - self.normal.as_ref() * self.signed_distance(p)
    }

    /// Orthogonal projection of the free vector `v` onto this plane's direction space.
    #[inline]
    #[must_use]
    pub fn project_vector(&self, v: &Vector) -> Vector {
        v - self.normal.as_ref() * v.dot(self.normal.as_ref())
    }

    /// Mirror image of the free vector `v` w.r.t. this plane. Preserves norms.
    #[inline]
    #[must_use]
    pub fn mirror(&self, v: &Vector) -> Vector {
        let n = self.normal.as_ref();
        let p = v.dot(n);

        v - n * (p + p)
    }
}

impl From<&Frame> for Plane {
    /// The plane spanned by the frame's `X` and `Y` axes, through its origin.
    #[inline]
    fn from(frame: &Frame) -> Self {
        Self::from_unit(
            *frame.origin(),
            Unit::new_normalize(frame.x_dir().cross(frame.y_dir().as_ref())),
        )
    }
}

/// The point where the line carrying `ray` crosses the plane of `frame`.
#[inline]
pub fn intersect_ray_plane(ray: &Ray, frame: &Frame) -> Result<Vector> {
    frame.plane().intersection(ray)
}
