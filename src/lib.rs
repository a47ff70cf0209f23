//! # rs_photon
//!
//! [Rust][rust] crate implementing the photon mapping half of a
//! physically based renderer: photon emission from scene lights into
//! bounded particle buffers, and camera-side radiance reconstruction
//! by kernel density estimation over the stored photons.
//!
//! The emission side is driven through
//! [trace_photon][trace_photon], which records one light path into
//! three capacity-bounded photon buffers. The camera side is driven
//! through [trace_sample][trace_sample], which answers one pixel's
//! radiance query against the frozen buffers via spatial indices.
//!
//! [rust]: https://www.rust-lang.org
//! [trace_photon]: integrators/photon_map/struct.PhotonTracer.html#method.trace_photon
//! [trace_sample]: integrators/photon_map/struct.PhotonTracer.html#method.trace_sample

#[macro_use]
extern crate impl_ops;

pub mod accelerators;
pub mod cameras;
pub mod core;
pub mod integrators;
pub mod lights;
pub mod media;
pub mod samplers;
pub mod shapes;
