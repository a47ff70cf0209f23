// pbrt
use crate::core::geometry::Ray;
use crate::core::interaction::SurfaceInteraction;
use crate::shapes::Shape;

/// The unbounded environment sphere. It never produces a finite
/// intersection; escaped rays resolve against it through
/// `Scene::intersect_infinites`.
#[derive(Debug, Default, Copy, Clone)]
pub struct InfiniteSphere;

impl Shape for InfiniteSphere {
    fn intersect(&self, _ray: &mut Ray, _isect: &mut SurfaceInteraction) -> bool {
        false
    }
    fn unbounded(&self) -> bool {
        true
    }
}
