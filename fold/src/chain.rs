use core::{iter::Enumerate, ops::Deref, slice};

use super::*;

/// Lazily bounces a ray off a sequence of mirrors, in order.
///
/// Yields the outgoing ray after each mirror. The first failure is yielded
/// (tagged with the index of the mirror that caused it) and ends the path.
pub struct RayPath<'a, M> {
    mirrors: Enumerate<slice::Iter<'a, M>>,
    ray: Ray,
    failed: bool,
}

impl<'a, M: Reflect> RayPath<'a, M> {
    #[inline]
    pub fn new(mirrors: &'a [M], ray: Ray) -> Self {
        Self {
            mirrors: mirrors.iter().enumerate(),
            ray,
            failed: false,
        }
    }
}

impl<'a, M: Reflect> Iterator for RayPath<'a, M> {
    type Item = Result<Ray>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }

        let (index, mirror) = self.mirrors.next()?;

        Some(match mirror.reflect(&self.ray) {
            Ok(ray) => {
                log::trace!("mirror {index}: {ray:?}");
                self.ray = ray;
                Ok(ray)
            }
            Err(e) => {
                log::warn!("tracing stopped at mirror {index}: {e}");
                self.failed = true;
                Err(e.at_mirror(index))
            }
        })
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.failed {
            (0, Some(0))
        } else {
            (0, self.mirrors.size_hint().1)
        }
    }
}

/// The rays leaving each mirror of a chain, in traversal order.
#[derive(Clone, Debug, PartialEq)]
pub struct TracedPath {
    input: Ray,
    bounces: Vec<Ray>,
}

impl TracedPath {
    #[inline]
    pub const fn input(&self) -> &Ray {
        &self.input
    }

    /// One ray per mirror: the reflection point and the outgoing direction.
    #[inline]
    pub fn bounces(&self) -> &[Ray] {
        &self.bounces
    }

    /// The ray leaving the last mirror. Fails if there was no mirror.
    #[inline]
    pub fn last_bounce(&self) -> Result<&Ray> {
        self.bounces.last().ok_or(Error::EmptyChain)
    }

    /// The ray leaving the last mirror, or the input ray if there was none.
    #[inline]
    pub fn final_ray(&self) -> Ray {
        self.bounces.last().copied().unwrap_or(self.input)
    }

    /// The input ray's origin, followed by every reflection point.
    pub fn points(&self) -> impl Iterator<Item = Vector> + '_ {
        core::iter::once(self.input.pos).chain(self.bounces.iter().map(|ray| ray.pos))
    }
}

impl Deref for TracedPath {
    type Target = [Ray];

    #[inline]
    fn deref(&self) -> &Self::Target {
        &self.bounces
    }
}

/// Bounce `ray` off every mirror in `mirrors`, in order, skipping none.
pub fn trace<M: Reflect>(mirrors: &[M], ray: &Ray) -> Result<TracedPath> {
    let bounces = RayPath::new(mirrors, *ray).collect::<Result<Vec<_>>>()?;

    Ok(TracedPath {
        input: *ray,
        bounces,
    })
}

/// An ordered, immutable sequence of flat mirrors.
///
/// Tracing is a pure function of the chain and the input ray, so a chain
/// can be shared between threads and traced concurrently.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MirrorChain {
    mirrors: Vec<Mirror>,
}

impl MirrorChain {
    pub fn new(mirrors: impl IntoIterator<Item = Mirror>) -> Self {
        let mirrors: Vec<_> = mirrors.into_iter().collect();
        log::debug!("built a chain of {} mirrors", mirrors.len());
        Self { mirrors }
    }

    /// A chain of mirrors with default extents.
    #[inline]
    pub fn from_frames(frames: impl IntoIterator<Item = Frame>) -> Self {
        Self::new(frames.into_iter().map(Mirror::from))
    }

    #[inline]
    pub fn mirrors(&self) -> &[Mirror] {
        &self.mirrors
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.mirrors.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.mirrors.is_empty()
    }

    #[inline]
    pub fn path(&self, ray: Ray) -> RayPath<'_, Mirror> {
        RayPath::new(&self.mirrors, ray)
    }

    #[inline]
    pub fn trace(&self, ray: &Ray) -> Result<TracedPath> {
        trace(&self.mirrors, ray)
    }

    /// The ray leaving the last mirror. An empty chain returns `ray` unchanged.
    #[inline]
    pub fn final_ray(&self, ray: &Ray) -> Result<Ray> {
        self.path(*ray).try_fold(*ray, |_, bounce| bounce)
    }

    /// Trace `ray` and measure how the beam lands on `target`. See [`evaluate`].
    #[inline]
    pub fn evaluate(&self, ray: &Ray, target: &Frame) -> Result<Alignment> {
        evaluate(&self.mirrors, ray, target)
    }
}

impl FromIterator<Mirror> for MirrorChain {
    #[inline]
    fn from_iter<T: IntoIterator<Item = Mirror>>(iter: T) -> Self {
        Self::new(iter)
    }
}
