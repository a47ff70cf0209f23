// pbrt
use crate::core::geometry::{Point3f, Ray};
use crate::core::medium::{Medium, MediumSample, MediumState, PhaseFunction};
use crate::core::pbrt::{Float, Spectrum};
use crate::core::sampler::Sampler;

/// Per-channel transmittance over a distance; a zero coefficient is
/// fully transparent even over an unbounded segment.
fn channel_transmittance(sigma: Float, t: Float) -> Float {
    if sigma == 0.0 as Float {
        1.0 as Float
    } else {
        (-sigma * t).exp()
    }
}

pub struct HomogeneousMedium {
    pub sigma_a: Spectrum,
    pub sigma_s: Spectrum,
    sigma_t: Spectrum,
    phase: PhaseFunction,
    max_bounce: i32,
}

impl HomogeneousMedium {
    pub fn new(sigma_a: &Spectrum, sigma_s: &Spectrum, g: Float) -> Self {
        let phase: PhaseFunction = if g == 0.0 as Float {
            PhaseFunction::Isotropic
        } else {
            PhaseFunction::HenyeyGreenstein { g }
        };
        HomogeneousMedium {
            sigma_a: *sigma_a,
            sigma_s: *sigma_s,
            sigma_t: *sigma_s + *sigma_a,
            phase,
            max_bounce: 1024_i32,
        }
    }
    fn segment_transmittance(&self, t: Float) -> Spectrum {
        Spectrum::rgb(
            channel_transmittance(self.sigma_t.c[0], t),
            channel_transmittance(self.sigma_t.c[1], t),
            channel_transmittance(self.sigma_t.c[2], t),
        )
    }
}

impl Medium for HomogeneousMedium {
    fn sample_distance(
        &self,
        sampler: &mut dyn Sampler,
        ray: &Ray,
        state: &mut MediumState,
        sample: &mut MediumSample,
    ) -> bool {
        state.advance();
        if state.bounce > self.max_bounce {
            return false;
        }
        // sample a channel and a free-flight distance along the ray
        let channel: usize = ((sampler.get_1d() * 3.0 as Float) as usize).min(2_usize);
        let sigma_tc: Float = self.sigma_t.c[channel];
        let t: Float = if sigma_tc > 0.0 as Float {
            -(1.0 as Float - sampler.get_1d()).ln() / sigma_tc
        } else {
            std::f32::INFINITY
        };
        sample.exited = t >= ray.t_max;
        if sample.exited {
            sample.t = ray.t_max;
            // average the per-channel exit probabilities
            let mut pdf: Float = 0.0;
            for i in 0..3 {
                pdf += channel_transmittance(self.sigma_t.c[i], ray.t_max);
            }
            pdf /= 3.0 as Float;
            if pdf <= 0.0 as Float {
                return false;
            }
            sample.pdf = pdf;
            sample.weight = self.segment_transmittance(ray.t_max) / pdf;
        } else {
            sample.t = t;
            sample.p = ray.position(t);
            let mut pdf: Float = 0.0;
            for i in 0..3 {
                pdf += self.sigma_t.c[i] * channel_transmittance(self.sigma_t.c[i], t);
            }
            pdf /= 3.0 as Float;
            if pdf <= 0.0 as Float {
                return false;
            }
            sample.pdf = pdf;
            sample.weight = self.sigma_s * self.segment_transmittance(t) / pdf;
        }
        sample.weight.is_finite()
    }
    fn transmittance(&self, _sampler: &mut dyn Sampler, ray: &Ray) -> Spectrum {
        self.segment_transmittance(ray.t_max - ray.t_min)
    }
    fn phase_function(&self, _p: &Point3f) -> PhaseFunction {
        self.phase
    }
    fn sigma_t(&self, _p: &Point3f) -> Spectrum {
        self.sigma_t
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::core::geometry::{Point3f, Vector3f};
    use crate::samplers::random::RandomSampler;

    #[test]
    fn transmittance_is_closed_form() {
        let medium = HomogeneousMedium::new(&Spectrum::new(0.5), &Spectrum::new(0.25), 0.0);
        let mut sampler = RandomSampler::new(0);
        let mut ray = Ray::new(
            Point3f::default(),
            Vector3f {
                x: 0.0,
                y: 0.0,
                z: 1.0,
            },
        );
        ray.t_max = 2.0;
        let tr = medium.transmittance(&mut sampler, &ray);
        let expected: Float = (-0.75_f32 * 2.0).exp();
        assert!((tr.c[0] - expected).abs() < 1e-6);
    }

    #[test]
    fn distance_samples_are_unbiased_in_expectation() {
        // E[weight * f(x)] over the sampled distances must match the
        // analytic scattering albedo integral for f = 1 restricted to
        // in-medium events: int_0^tmax sigma_s e^{-sigma_t t} dt
        let sigma_a = Spectrum::new(0.3);
        let sigma_s = Spectrum::new(0.7);
        let medium = HomogeneousMedium::new(&sigma_a, &sigma_s, 0.0);
        let mut sampler = RandomSampler::new(7);
        let mut ray = Ray::new(
            Point3f::default(),
            Vector3f {
                x: 0.0,
                y: 0.0,
                z: 1.0,
            },
        );
        ray.t_max = 3.0;
        let n: usize = 100_000;
        let mut sum: Float = 0.0;
        for _ in 0..n {
            let mut state = MediumState::default();
            let mut sample = MediumSample::default();
            assert!(medium.sample_distance(&mut sampler, &ray, &mut state, &mut sample));
            if !sample.exited {
                sum += sample.weight.c[0];
            }
        }
        let expected: Float = 0.7 / 1.0 * (1.0 - (-1.0_f32 * 3.0).exp());
        let mean: Float = sum / n as Float;
        assert!(
            (mean - expected).abs() < 0.01,
            "mean {} expected {}",
            mean,
            expected
        );
    }
}
