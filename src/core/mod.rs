//! Foundation types shared by every other module: geometry, spectra,
//! random number generation, sampling distributions, scattering and
//! medium interfaces, photon records, and the scene container.

pub mod camera;
pub mod geometry;
pub mod interaction;
pub mod light;
pub mod medium;
pub mod pbrt;
pub mod photon;
pub mod primitive;
pub mod reflection;
pub mod rng;
pub mod sampler;
pub mod sampling;
pub mod scene;
pub mod spectrum;
