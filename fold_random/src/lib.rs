use fold::*;

use core::iter;
pub use rand;

pub trait Random: Sized {
    /// Generate a random instance of `Self` using the provided `rng`
    ///
    /// This method must not fail. If creating an instance is faillible, keep trying until success
    fn random(rng: &mut (impl rand::Rng + ?Sized)) -> Self;
}

impl Random for Tilt {
    /// Angles uniformly drawn in `[-180, 180)` degrees
    fn random(rng: &mut (impl rand::Rng + ?Sized)) -> Self {
        let [x, y, z] = [(); 3].map(|()| rng.gen_range(-180.0..180.0));
        Self { x, y, z }
    }
}

impl Random for Frame {
    fn random(rng: &mut (impl rand::Rng + ?Sized)) -> Self {
        loop {
            if let Ok(frame) = Frame::new(rand_vect(rng, 500.0), Tilt::random(rng)) {
                break frame;
            }
        }
    }
}

impl Random for Extent {
    fn random(rng: &mut (impl rand::Rng + ?Sized)) -> Self {
        Self::new(rng.gen_range(10.0..300.0), rng.gen_range(10.0..300.0))
    }
}

impl Random for Mirror {
    fn random(rng: &mut (impl rand::Rng + ?Sized)) -> Self {
        Self::new(Frame::random(rng), Extent::random(rng))
    }
}

impl Random for Ray {
    fn random(rng: &mut (impl rand::Rng + ?Sized)) -> Self {
        let pos = rand_vect(rng, 100.0);

        let dir = loop {
            let v = rand_vect(rng, 1.0);
            if v.norm() > Float::EPSILON * 8.0 {
                break v;
            }
        };
        Self { pos, dir }
    }
}

/// A chain of `num_mirrors` random mirrors, and a random ray.
///
/// Random configurations may still be degenerate (a ray parallel to a mirror).
pub fn random_setup(
    rng: &mut (impl rand::Rng + ?Sized),
    num_mirrors: usize,
) -> (MirrorChain, Ray, Frame) {
    (
        iter::repeat_with(|| Mirror::random(rng))
            .take(num_mirrors)
            .collect(),
        Ray::random(rng),
        Frame::random(rng),
    )
}

pub fn rand_vect(rng: &mut (impl rand::Rng + ?Sized), max_coord_mag: Float) -> Vector {
    // the rng generates floats in 0.0..1.0, scale and translate the range accordingly
    Vector::from_fn(|_, _| (rng.gen::<Float>() - 0.5) * (max_coord_mag.abs() * 2.0))
}

/// Readings of a slightly tilted and offset straight line, sampled at `xs`.
///
/// Each reading gets its own jitter: up to `0.01` degree added to `tilt`
/// (degrees), and up to `0.1` added to `offset`.
pub fn noisy_line_samples(
    rng: &mut (impl rand::Rng + ?Sized),
    xs: impl IntoIterator<Item = Float>,
    tilt: Float,
    offset: Float,
) -> Vec<(Float, Float)> {
    xs.into_iter()
        .map(|x| {
            let tilt = tilt + rng.gen_range(0.0..0.1) / 10.0;
            let offset = offset + rng.gen_range(0.0..1.0) / 10.0;
            (x, tilt.to_radians().tan() * x + offset)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn random_rays_have_a_direction() {
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..100 {
            let ray = Ray::random(&mut rng);
            assert!(ray.dir.norm() > 0.0);
            assert!(ray.pos.iter().all(|c| c.abs() <= 100.0));
        }
    }

    #[test]
    fn setup_sizes() {
        let mut rng = StdRng::seed_from_u64(11);
        let (chain, _, _) = random_setup(&mut rng, 5);

        assert_eq!(chain.len(), 5);
    }

    #[test]
    fn noisy_samples_stay_above_the_nominal_line() {
        let mut rng = StdRng::seed_from_u64(3);
        let xs = (0..=10).map(|i| i as Float * 100.0);

        let samples = noisy_line_samples(&mut rng, xs, 0.1, 1.0);

        assert_eq!(samples.len(), 11);
        for (x, y) in samples {
            let nominal = 0.1f64.to_radians().tan() * x + 1.0;
            let worst = 0.11f64.to_radians().tan() * x + 1.1;
            assert!(y >= nominal && y <= worst);
        }
    }
}
