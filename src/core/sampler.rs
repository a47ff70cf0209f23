//! The **Sampler** trait is the bridge between stochastic path
//! construction and the underlying random number source. Everything
//! the tracer ever asks for is a 1D value, a 2D value, or a weighted
//! coin flip.

// pbrt
use crate::core::geometry::Point2f;
use crate::core::pbrt::Float;

pub trait Sampler {
    fn get_1d(&mut self) -> Float;
    fn get_2d(&mut self) -> Point2f;
    /// Stochastic branch decision; returns true with the given
    /// probability. The transparency split in the camera tracer
    /// divides its throughput by this probability to stay unbiased.
    fn next_bool(&mut self, probability: Float) -> bool {
        self.get_1d() < probability
    }
}
