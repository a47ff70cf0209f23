//! The **Scene** object stores the primitives, the lights, and the
//! camera, and answers the two intersection queries the photon tracer
//! needs: closest finite hit, and unbounded ("infinite") emitters for
//! escaped rays.

// std
use std::sync::Arc;
// pbrt
use crate::core::camera::Camera;
use crate::core::geometry::{Normal3f, Ray};
use crate::core::interaction::SurfaceInteraction;
use crate::core::light::Light;
use crate::core::pbrt::Float;
use crate::core::primitive::Primitive;
use crate::core::sampling::Distribution1D;

pub struct Scene {
    pub primitives: Vec<Primitive>,
    pub lights: Vec<Arc<dyn Light + Send + Sync>>,
    pub camera: Arc<dyn Camera + Send + Sync>,
    light_distr: Distribution1D,
}

impl Scene {
    pub fn new(
        primitives: Vec<Primitive>,
        lights: Vec<Arc<dyn Light + Send + Sync>>,
        camera: Arc<dyn Camera + Send + Sync>,
    ) -> Self {
        // sample lights proportional to power
        let light_power: Vec<Float> = lights.iter().map(|l| l.power().y().max(0.0)).collect();
        Scene {
            primitives,
            lights,
            camera,
            light_distr: Distribution1D::new(light_power),
        }
    }
    /// Pick a light for photon emission by adjoint importance
    /// weighting. Returns None (a zero-length sample) when the scene
    /// has no lights.
    pub fn choose_light_adjoint(
        &self,
        u: Float,
        pdf: &mut Float,
    ) -> Option<&Arc<dyn Light + Send + Sync>> {
        if self.lights.is_empty() {
            return None;
        }
        let index: usize = self.light_distr.sample_discrete(u, Some(pdf));
        if *pdf <= 0.0 as Float {
            return None;
        }
        Some(&self.lights[index])
    }
    /// Closest finite intersection; clips `ray.t_max` on every hit so
    /// the nearest primitive wins.
    pub fn intersect(&self, ray: &mut Ray, isect: &mut SurfaceInteraction) -> bool {
        let mut hit: bool = false;
        for (index, primitive) in self.primitives.iter().enumerate() {
            if primitive.shape.intersect(ray, isect) {
                isect.primitive = index;
                hit = true;
            }
        }
        hit
    }
    /// A "hit" against the unbounded emitters (environment spheres)
    /// for rays that escaped every finite primitive.
    pub fn intersect_infinites(&self, ray: &Ray, isect: &mut SurfaceInteraction) -> bool {
        for (index, primitive) in self.primitives.iter().enumerate() {
            if primitive.shape.unbounded() && primitive.is_emissive() {
                isect.p = ray.position(1.0e30 as Float);
                let n: Normal3f = Normal3f::from(-ray.d);
                isect.n_g = n;
                isect.n_s = n;
                isect.epsilon = 0.0 as Float;
                isect.primitive = index;
                return true;
            }
        }
        false
    }
}
