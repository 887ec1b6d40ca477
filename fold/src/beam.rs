use core::f64::consts::{PI, TAU};

use super::*;

/// A fundamental-mode Gaussian beam, propagating along `z` from its waist at `z = 0`.
///
/// Lengths can be in any unit, as long as it is the same for every argument.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GaussianBeam {
    wavelength: Float,
    waist: Float,
}

/// The beam's envelope at some distance from the waist.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnvelopeSample {
    pub z: Float,
    pub width: Float,
    pub radius_of_curvature: Float,
}

impl GaussianBeam {
    /// `waist` is the 1/e² field radius at the waist.
    pub fn new(wavelength: Float, waist: Float) -> Result<Self> {
        if !(wavelength.is_finite() && wavelength > 0.) {
            return Err(Error::InvalidParameter("wavelength must be positive and finite"));
        }
        if !(waist.is_finite() && waist > 0.) {
            return Err(Error::InvalidParameter("waist must be positive and finite"));
        }
        Ok(Self { wavelength, waist })
    }

    #[inline]
    pub const fn wavelength(&self) -> Float {
        self.wavelength
    }

    #[inline]
    pub const fn waist(&self) -> Float {
        self.waist
    }

    #[inline]
    pub fn wavenumber(&self) -> Float {
        TAU / self.wavelength
    }

    /// Distance from the waist at which the beam's area has doubled.
    #[inline]
    pub fn rayleigh_range(&self) -> Float {
        PI * self.waist * self.waist / self.wavelength
    }

    /// Far-field half-angle divergence, in radians.
    #[inline]
    pub fn divergence(&self) -> Float {
        self.wavelength / (PI * self.waist)
    }

    /// Beam radius at `z`.
    #[inline]
    pub fn width(&self, z: Float) -> Float {
        let r = z / self.rayleigh_range();
        self.waist * r.mul_add(r, 1.).sqrt()
    }

    /// Wavefront radius of curvature at `z`. Infinite (flat wavefront) at the waist.
    #[inline]
    pub fn radius_of_curvature(&self, z: Float) -> Float {
        if z == 0. {
            return Float::INFINITY;
        }
        let zr = self.rayleigh_range();
        z + zr * zr / z
    }

    /// Radius of the far-field cone at `z`.
    #[inline]
    pub fn asymptote(&self, z: Float) -> Float {
        self.divergence().tan() * z
    }

    /// Paraxial sag of the wavefront at `z`, at transverse position `(x, y)`.
    #[inline]
    pub fn wavefront_sag(&self, z: Float, x: Float, y: Float) -> Float {
        let r = self.radius_of_curvature(z);
        if r.is_infinite() {
            return 0.;
        }
        -x.mul_add(x, y * y) / (2. * r)
    }

    pub fn envelope(&self, zs: impl IntoIterator<Item = Float>) -> Vec<EnvelopeSample> {
        zs.into_iter()
            .map(|z| EnvelopeSample {
                z,
                width: self.width(z),
                radius_of_curvature: self.radius_of_curvature(z),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Float, b: Float) -> bool {
        (a - b).abs() <= 1e-9 * a.abs().max(b.abs()).max(1.)
    }

    #[test]
    fn rejects_nonsense() {
        assert!(matches!(
            GaussianBeam::new(0., 10.),
            Err(Error::InvalidParameter(_))
        ));
        assert!(matches!(
            GaussianBeam::new(1.765, -1.),
            Err(Error::InvalidParameter(_))
        ));
        assert!(GaussianBeam::new(Float::NAN, 1.).is_err());
    }

    #[test]
    fn width_doubles_area_at_rayleigh_range() {
        let beam = GaussianBeam::new(1.765, 10.).unwrap();
        let zr = beam.rayleigh_range();

        assert!(close(beam.width(0.), 10.));
        assert!(close(beam.width(zr), 10. * 2f64.sqrt()));
        assert!(close(beam.width(-zr), beam.width(zr)));
    }

    #[test]
    fn curvature_is_smallest_at_rayleigh_range() {
        let beam = GaussianBeam::new(1.765, 10.).unwrap();
        let zr = beam.rayleigh_range();

        assert!(beam.radius_of_curvature(0.).is_infinite());
        assert!(close(beam.radius_of_curvature(zr), 2. * zr));
        assert!(beam.radius_of_curvature(0.5 * zr) > 2. * zr);
        assert!(beam.radius_of_curvature(2. * zr) > 2. * zr);
    }

    #[test]
    fn far_field_approaches_the_asymptote() {
        let beam = GaussianBeam::new(1.765, 10.).unwrap();
        let z = 1e6;

        assert!((beam.width(z) / beam.asymptote(z) - 1.).abs() < 1e-2);
        assert!(close(beam.wavenumber() * beam.wavelength(), TAU));
    }

    #[test]
    fn sag_is_flat_at_the_waist_and_concave_beyond() {
        let beam = GaussianBeam::new(1.765, 10.).unwrap();

        assert_eq!(beam.wavefront_sag(0., 30., 40.), 0.);

        let r = beam.radius_of_curvature(500.);
        assert!(close(beam.wavefront_sag(500., 30., 40.), -2500. / (2. * r)));
    }

    #[test]
    fn envelope_samples() {
        let beam = GaussianBeam::new(1.765, 10.).unwrap();
        let samples = beam.envelope([0., 250., 500.]);

        assert_eq!(samples.len(), 3);
        assert_eq!(samples[1].z, 250.);
        assert!(close(samples[2].width, beam.width(500.)));
        assert!(samples[0].radius_of_curvature.is_infinite());
    }
}
