//! A **Primitive** couples a shape with its surface scattering model,
//! optional emission, and the media on either side of its boundary.

// std
use std::sync::Arc;
// pbrt
use crate::core::geometry::Vector3f;
use crate::core::interaction::SurfaceInteraction;
use crate::core::medium::Medium;
use crate::core::pbrt::Spectrum;
use crate::core::reflection::Bsdf;
use crate::shapes::Shape;

pub struct Primitive {
    pub shape: Arc<dyn Shape + Send + Sync>,
    pub bsdf: Bsdf,
    pub emission: Option<Spectrum>,
    /// Medium on the inside of the boundary (where the geometric
    /// normal points away from).
    pub int_medium: Option<Arc<dyn Medium + Send + Sync>>,
    /// Medium on the outside of the boundary.
    pub ext_medium: Option<Arc<dyn Medium + Send + Sync>>,
}

impl Primitive {
    pub fn new(shape: Arc<dyn Shape + Send + Sync>, bsdf: Bsdf) -> Self {
        Primitive {
            shape,
            bsdf,
            emission: None,
            int_medium: None,
            ext_medium: None,
        }
    }
    pub fn is_emissive(&self) -> bool {
        self.emission.is_some()
    }
    /// Radiance emitted towards the viewer for a ray that hit (or
    /// escaped to) this primitive.
    pub fn eval_direct(&self, _isect: &SurfaceInteraction, _d: &Vector3f) -> Spectrum {
        self.emission.unwrap_or_default()
    }
    /// The medium the path continues in, decided by which geometric
    /// side of the surface the outgoing direction points to. A
    /// primitive with no medium assignments leaves the current medium
    /// untouched.
    pub fn select_medium(
        &self,
        current: &Option<Arc<dyn Medium + Send + Sync>>,
        geometric_backside: bool,
    ) -> Option<Arc<dyn Medium + Send + Sync>> {
        if self.int_medium.is_none() && self.ext_medium.is_none() {
            current.clone()
        } else if geometric_backside {
            self.int_medium.clone()
        } else {
            self.ext_medium.clone()
        }
    }
}
