//! The abstract **Camera** trait defines the interface the camera
//! path tracer consumes: a sampled position and a sampled direction
//! through a given pixel.

// std
use std::sync::Arc;
// pbrt
use crate::core::geometry::Point2i;
use crate::core::interaction::{DirectionSample, PositionSample};
use crate::core::medium::Medium;
use crate::core::sampler::Sampler;

pub trait Camera {
    fn sample_position(&self, sampler: &mut dyn Sampler, sample: &mut PositionSample) -> bool;
    fn sample_direction(
        &self,
        sampler: &mut dyn Sampler,
        point: &PositionSample,
        pixel: Point2i,
        sample: &mut DirectionSample,
    ) -> bool;
    /// The medium the camera sits in; the start of every eye path.
    fn medium(&self) -> Option<Arc<dyn Medium + Send + Sync>> {
        None
    }
    fn resolution(&self) -> Point2i;
}
