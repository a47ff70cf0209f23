//! The geometry of a particular point on a surface is represented by
//! a **SurfaceInteraction**. Having this abstraction lets the photon
//! tracer work with points on surfaces without needing to consider
//! the particular type of geometric shape the points lie on.

// pbrt
use crate::core::geometry::{Normal3f, Point3f, Vector3f};
use crate::core::pbrt::{Float, Spectrum};

/// A hit record. Both the geometric and the shading normal are
/// carried because stored photon power is corrected by their cosine
/// ratio, and medium selection keys on the geometric side of the
/// outgoing direction.
#[derive(Debug, Default, Copy, Clone)]
pub struct SurfaceInteraction {
    pub p: Point3f,
    pub n_g: Normal3f,
    pub n_s: Normal3f,
    /// Offset applied when respawning rays off this surface.
    pub epsilon: Float,
    /// Index of the intersected primitive within the scene.
    pub primitive: usize,
}

/// Result of sampling a position on a light or camera.
#[derive(Debug, Default, Copy, Clone)]
pub struct PositionSample {
    pub p: Point3f,
    pub n: Normal3f,
    pub weight: Spectrum,
    pub pdf: Float,
}

/// Result of sampling an outgoing direction from a previously sampled
/// position.
#[derive(Debug, Default, Copy, Clone)]
pub struct DirectionSample {
    pub d: Vector3f,
    pub weight: Spectrum,
    pub pdf: Float,
}
