//! Implementations of the **Sampler** trait.
//!
//! - RandomSampler

pub mod random;
