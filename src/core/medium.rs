//! Participating media. A **Medium** answers four questions along a
//! ray segment: sample a free-flight distance, evaluate
//! transmittance, hand out the local phase function, and report the
//! local extinction coefficient.

// std
use std::f32::consts::PI;
// pbrt
use crate::core::geometry::{vec3_coordinate_system, vec3_dot_vec3f};
use crate::core::geometry::{Point3f, Ray, Vector3f};
use crate::core::pbrt::{Float, Spectrum, INV_4_PI};
use crate::core::sampler::Sampler;
use crate::core::sampling::{uniform_sample_sphere, uniform_sphere_pdf};

/// Result of sampling a free-flight distance along a ray. If the
/// sample `exited` the medium, `weight` carries the transmittance
/// estimate to the boundary; otherwise `p` is an in-medium scatter
/// point.
#[derive(Debug, Default, Copy, Clone)]
pub struct MediumSample {
    pub p: Point3f,
    pub t: Float,
    pub weight: Spectrum,
    pub pdf: Float,
    pub exited: bool,
}

/// Transient per-path state threaded through medium sampling; owned
/// by the active path and reset at path start.
#[derive(Debug, Default, Copy, Clone)]
pub struct MediumState {
    pub bounce: i32,
}

impl MediumState {
    pub fn reset(&mut self) {
        self.bounce = 0_i32;
    }
    pub fn advance(&mut self) {
        self.bounce += 1_i32;
    }
}

/// Result of sampling a scattered direction from a phase function.
#[derive(Debug, Default, Copy, Clone)]
pub struct PhaseSample {
    pub w: Vector3f,
    pub weight: Spectrum,
    pub pdf: Float,
}

/// The Henyey-Greenstein phase function value for a given angle
/// cosine; both argument directions point away from the scattering
/// point.
pub fn phase_hg(cos_theta: Float, g: Float) -> Float {
    let denom: Float = 1.0 as Float + g * g + 2.0 as Float * g * cos_theta;
    INV_4_PI * (1.0 as Float - g * g) / (denom * denom.sqrt())
}

#[derive(Debug, Copy, Clone)]
pub enum PhaseFunction {
    Isotropic,
    HenyeyGreenstein { g: Float },
}

impl PhaseFunction {
    pub fn eval(&self, wi: &Vector3f, wo: &Vector3f) -> Float {
        match self {
            PhaseFunction::Isotropic => INV_4_PI,
            PhaseFunction::HenyeyGreenstein { g } => phase_hg(vec3_dot_vec3f(wi, wo), *g),
        }
    }
    /// Sample an outgoing propagation direction given the incoming
    /// propagation direction `d_in`.
    pub fn sample(
        &self,
        sampler: &mut dyn Sampler,
        d_in: &Vector3f,
        sample: &mut PhaseSample,
    ) -> bool {
        match self {
            PhaseFunction::Isotropic => {
                sample.w = uniform_sample_sphere(&sampler.get_2d());
                sample.weight = Spectrum::new(1.0 as Float);
                sample.pdf = uniform_sphere_pdf();
                true
            }
            PhaseFunction::HenyeyGreenstein { g } => {
                let u = sampler.get_2d();
                let cos_theta: Float = if g.abs() < 1e-3 as Float {
                    1.0 as Float - 2.0 as Float * u.x
                } else {
                    let sqr_term: Float =
                        (1.0 as Float - g * g) / (1.0 as Float - g + 2.0 as Float * g * u.x);
                    (1.0 as Float + g * g - sqr_term * sqr_term) / (2.0 as Float * g)
                };
                let sin_theta: Float =
                    (0.0 as Float).max(1.0 as Float - cos_theta * cos_theta).sqrt();
                let phi: Float = 2.0 as Float * PI * u.y;
                let mut v2: Vector3f = Vector3f::default();
                let mut v3: Vector3f = Vector3f::default();
                vec3_coordinate_system(d_in, &mut v2, &mut v3);
                sample.w =
                    v2 * (sin_theta * phi.cos()) + v3 * (sin_theta * phi.sin()) + *d_in * cos_theta;
                sample.weight = Spectrum::new(1.0 as Float);
                sample.pdf = phase_hg(-cos_theta, *g);
                sample.pdf > 0.0 as Float
            }
        }
    }
}

pub trait Medium {
    /// Sample a free-flight distance along the ray segment
    /// `[t_min, t_max]`. Returns false when the path should terminate
    /// (a sampling rejection, not an error).
    fn sample_distance(
        &self,
        sampler: &mut dyn Sampler,
        ray: &Ray,
        state: &mut MediumState,
        sample: &mut MediumSample,
    ) -> bool;
    /// Transmittance over the ray segment `[t_min, t_max]`.
    fn transmittance(&self, sampler: &mut dyn Sampler, ray: &Ray) -> Spectrum;
    fn phase_function(&self, p: &Point3f) -> PhaseFunction;
    fn sigma_t(&self, p: &Point3f) -> Spectrum;
}
