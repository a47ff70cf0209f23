// std
use std::sync::Arc;
// pbrt
use crate::core::camera::Camera;
use crate::core::geometry::{vec3_cross_vec3, Normal3f, Point2i, Point3f, Vector3f};
use crate::core::interaction::{DirectionSample, PositionSample};
use crate::core::medium::Medium;
use crate::core::pbrt::{radians, Float, Spectrum};
use crate::core::sampler::Sampler;

pub struct PinholeCamera {
    pub pos: Point3f,
    forward: Vector3f,
    right: Vector3f,
    up: Vector3f,
    tan_half_fov: Float,
    aspect: Float,
    resolution: Point2i,
    pub medium: Option<Arc<dyn Medium + Send + Sync>>,
}

impl PinholeCamera {
    pub fn look_at(
        pos: Point3f,
        target: Point3f,
        up_hint: Vector3f,
        fov_deg: Float,
        resolution: Point2i,
    ) -> Self {
        let forward: Vector3f = (target - pos).normalize();
        let right: Vector3f = vec3_cross_vec3(&forward, &up_hint).normalize();
        let up: Vector3f = vec3_cross_vec3(&right, &forward);
        PinholeCamera {
            pos,
            forward,
            right,
            up,
            tan_half_fov: (radians(fov_deg) * 0.5 as Float).tan(),
            aspect: resolution.x as Float / resolution.y as Float,
            resolution,
            medium: None,
        }
    }
}

impl Camera for PinholeCamera {
    fn sample_position(&self, _sampler: &mut dyn Sampler, sample: &mut PositionSample) -> bool {
        sample.p = self.pos;
        sample.n = Normal3f::from(self.forward);
        sample.weight = Spectrum::new(1.0 as Float);
        sample.pdf = 1.0 as Float;
        true
    }
    fn sample_direction(
        &self,
        sampler: &mut dyn Sampler,
        _point: &PositionSample,
        pixel: Point2i,
        sample: &mut DirectionSample,
    ) -> bool {
        if pixel.x < 0
            || pixel.y < 0
            || pixel.x >= self.resolution.x
            || pixel.y >= self.resolution.y
        {
            return false;
        }
        // jitter within the pixel
        let u = sampler.get_2d();
        let ndc_x: Float =
            2.0 as Float * ((pixel.x as Float + u.x) / self.resolution.x as Float) - 1.0 as Float;
        let ndc_y: Float =
            1.0 as Float - 2.0 as Float * ((pixel.y as Float + u.y) / self.resolution.y as Float);
        sample.d = (self.forward
            + self.right * (ndc_x * self.tan_half_fov * self.aspect)
            + self.up * (ndc_y * self.tan_half_fov))
            .normalize();
        sample.weight = Spectrum::new(1.0 as Float);
        sample.pdf = 1.0 as Float;
        true
    }
    fn medium(&self) -> Option<Arc<dyn Medium + Send + Sync>> {
        self.medium.clone()
    }
    fn resolution(&self) -> Point2i {
        self.resolution
    }
}
