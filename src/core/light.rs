//! In order for objects in a scene to be visible, there must be a
//! source of illumination so that some light is reflected from them
//! to the camera sensor. Photon paths start on one of these.

// std
use std::sync::Arc;
// pbrt
use crate::core::interaction::{DirectionSample, PositionSample};
use crate::core::medium::Medium;
use crate::core::pbrt::Spectrum;
use crate::core::sampler::Sampler;

pub trait Light {
    /// Sample a point on the light. The product of the position and
    /// direction weights divided by the light-selection probability
    /// is the power carried by one emitted photon.
    fn sample_position(&self, sampler: &mut dyn Sampler, sample: &mut PositionSample) -> bool;
    fn sample_direction(
        &self,
        sampler: &mut dyn Sampler,
        point: &PositionSample,
        sample: &mut DirectionSample,
    ) -> bool;
    /// Total emitted power, used for adjoint importance weighting of
    /// light selection.
    fn power(&self) -> Spectrum;
    /// The medium on the outside of the light, seeding the photon
    /// path's medium state.
    fn ext_medium(&self) -> Option<Arc<dyn Medium + Send + Sync>> {
        None
    }
}
