// std
use std::sync::Arc;
// pbrt
use crate::core::interaction::{DirectionSample, PositionSample};
use crate::core::light::Light;
use crate::core::medium::Medium;
use crate::core::pbrt::{Float, Spectrum};
use crate::core::sampler::Sampler;
use crate::core::sampling::{uniform_sample_sphere, uniform_sphere_pdf};
use crate::core::geometry::{Normal3f, Point3f};

pub struct PointLight {
    pub p_light: Point3f,
    /// Total emitted power.
    pub power: Spectrum,
    pub medium: Option<Arc<dyn Medium + Send + Sync>>,
}

impl PointLight {
    pub fn new(p_light: Point3f, power: Spectrum) -> Self {
        PointLight {
            p_light,
            power,
            medium: None,
        }
    }
}

impl Light for PointLight {
    fn sample_position(&self, _sampler: &mut dyn Sampler, sample: &mut PositionSample) -> bool {
        sample.p = self.p_light;
        sample.n = Normal3f::default();
        // the position carries the full power; direction sampling is
        // perfectly importance sampled and weighs one
        sample.weight = self.power;
        sample.pdf = 1.0 as Float;
        true
    }
    fn sample_direction(
        &self,
        sampler: &mut dyn Sampler,
        _point: &PositionSample,
        sample: &mut DirectionSample,
    ) -> bool {
        sample.d = uniform_sample_sphere(&sampler.get_2d());
        sample.weight = Spectrum::new(1.0 as Float);
        sample.pdf = uniform_sphere_pdf();
        true
    }
    fn power(&self) -> Spectrum {
        self.power
    }
    fn ext_medium(&self) -> Option<Arc<dyn Medium + Send + Sync>> {
        self.medium.clone()
    }
}
