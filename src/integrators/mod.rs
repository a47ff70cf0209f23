//! The photon mapping integrator core: a per-thread unit of work that
//! either records one photon path into the bounded buffers (emission
//! phase) or answers one pixel's radiance query against the frozen
//! buffers (gather phase). The surrounding render loop decides how
//! many photons to trace, builds the spatial indices between the two
//! phases, and distributes work across threads.

// pbrt
use crate::core::pbrt::Float;

pub mod photon_map;

/// Configuration consumed by the photon tracer. Buffer capacities are
/// not part of it; they are fixed by the slices the caller hands to
/// the photon ranges. The bounce window `[min_bounces, max_bounces)`
/// keeps separately computed techniques from double counting path
/// lengths.
#[derive(Debug, Copy, Clone)]
pub struct PhotonMapSettings {
    pub max_bounces: i32,
    pub min_bounces: i32,
    pub gather_count: usize,
    pub gather_radius: Float,
    pub volume_gather_radius: Float,
}

impl Default for PhotonMapSettings {
    fn default() -> Self {
        PhotonMapSettings {
            max_bounces: 64_i32,
            min_bounces: 0_i32,
            gather_count: 20_usize,
            gather_radius: 1.0e30 as Float,
            volume_gather_radius: 0.1 as Float,
        }
    }
}
