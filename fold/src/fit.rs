use nalgebra::{Matrix2, Vector2};

use super::*;

/// A least-squares straight line through `(position, reading)` samples,
/// e.g. beam centroids recorded along a rail.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LineFit {
    pub slope: Float,
    pub intercept: Float,
}

impl LineFit {
    /// Fails with fewer than two distinct positions, or with non-finite samples.
    pub fn fit(samples: impl IntoIterator<Item = (Float, Float)>) -> Result<Self> {
        let mut n = 0.;
        let (mut sx, mut sy, mut sxx, mut sxy) = (0., 0., 0., 0.);

        for (x, y) in samples {
            if !(x.is_finite() && y.is_finite()) {
                return Err(Error::InvalidParameter("samples must be finite"));
            }
            n += 1.;
            sx += x;
            sy += y;
            sxx += x * x;
            sxy += x * y;
        }

        let normal = Matrix2::new(sxx, sx, sx, n);

        // n * var(x), up to roundoff
        let spread = n * sxx - sx * sx;
        if !(spread > Float::EPSILON * n * sxx) {
            return Err(Error::InvalidParameter(
                "at least two distinct positions are required",
            ));
        }

        let [slope, intercept]: [Float; 2] = normal
            .try_inverse()
            .map(|inv| inv * Vector2::new(sxy, sy))
            .ok_or(Error::InvalidParameter(
                "at least two distinct positions are required",
            ))?
            .into();

        log::debug!("fitted {n} samples: slope {slope:e}, intercept {intercept}");

        Ok(Self { slope, intercept })
    }

    /// Inclination of the line, in degrees.
    #[inline]
    pub fn tilt(&self) -> Float {
        self.slope.atan().to_degrees()
    }

    /// Reading at position `0`.
    #[inline]
    pub fn offset(&self) -> Float {
        self.intercept
    }

    #[inline]
    pub fn at(&self, x: Float) -> Float {
        self.slope.mul_add(x, self.intercept)
    }
}
