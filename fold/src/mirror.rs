use std::{rc::Rc, sync::Arc};

use super::*;

/// Rectangular bounds of a mirror surface, centered on its frame's origin.
///
/// Only used to draw the mirror: reflections treat every mirror as an infinite plane.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Extent {
    /// Full width along the frame's `X` axis
    pub lx: Float,
    /// Full width along the frame's `Y` axis
    pub ly: Float,
}

impl Extent {
    #[inline]
    #[must_use]
    pub const fn new(lx: Float, ly: Float) -> Self {
        Self { lx, ly }
    }
}

impl Default for Extent {
    #[inline]
    fn default() -> Self {
        Self::new(150., 200.)
    }
}

/// A flat mirror: a frame, and the size of its reflective face.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Mirror {
    pub frame: Frame,
    pub extent: Extent,
}

impl Mirror {
    #[inline]
    #[must_use]
    pub const fn new(frame: Frame, extent: Extent) -> Self {
        Self { frame, extent }
    }

    /// The corners of the mirror's face, going around it counterclockwise
    /// when looking down its normal.
    #[must_use]
    pub fn corners(&self) -> [Vector; 4] {
        let o = self.frame.origin();
        let hx = self.frame.x_dir().as_ref() * (self.extent.lx / 2.);
        let hy = self.frame.y_dir().as_ref() * (self.extent.ly / 2.);

        [o - hx - hy, o + hx - hy, o + hx + hy, o - hx + hy]
    }
}

impl From<Frame> for Mirror {
    #[inline]
    fn from(frame: Frame) -> Self {
        Self::new(frame, Extent::default())
    }
}

/// Mirror `ray` off the plane of `frame`.
///
/// Returns the outgoing ray: it starts at the reflection point, and its
/// direction has the same norm as `ray.dir`.
pub fn reflect(ray: &Ray, frame: &Frame) -> Result<Ray> {
    frame.plane().reflect(ray)
}

/// Something a ray can bounce off.
pub trait Reflect {
    /// Moves `ray` to the point where it meets this surface, and reflects its direction there.
    ///
    /// This method is deterministic: for some `ray`, it always has the same result.
    fn reflect(&self, ray: &Ray) -> Result<Ray>;
}

impl Reflect for Plane {
    #[inline]
    fn reflect(&self, ray: &Ray) -> Result<Ray> {
        let pos = self.intersection(ray)?;
        let dir = self.mirror(&ray.dir);

        log::trace!("bounced off {:?} at {pos:?}, leaving along {dir:?}", self.origin());

        Ok(Ray { pos, dir })
    }
}

impl Reflect for Frame {
    #[inline]
    fn reflect(&self, ray: &Ray) -> Result<Ray> {
        reflect(ray, self)
    }
}

impl Reflect for Mirror {
    #[inline]
    fn reflect(&self, ray: &Ray) -> Result<Ray> {
        reflect(ray, &self.frame)
    }
}

// Spelled out for each pointer type: a blanket impl over `Deref`
// would forbid downstream impls.

impl<T: Reflect + ?Sized> Reflect for &T {
    #[inline]
    fn reflect(&self, ray: &Ray) -> Result<Ray> {
        (**self).reflect(ray)
    }
}

impl<T: Reflect + ?Sized> Reflect for Box<T> {
    #[inline]
    fn reflect(&self, ray: &Ray) -> Result<Ray> {
        self.as_ref().reflect(ray)
    }
}

impl<T: Reflect + ?Sized> Reflect for Arc<T> {
    #[inline]
    fn reflect(&self, ray: &Ray) -> Result<Ray> {
        self.as_ref().reflect(ray)
    }
}

impl<T: Reflect + ?Sized> Reflect for Rc<T> {
    #[inline]
    fn reflect(&self, ray: &Ray) -> Result<Ray> {
        self.as_ref().reflect(ray)
    }
}
