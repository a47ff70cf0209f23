//! Spatial indices over the frozen photon buffers. They are built
//! once per pass between the emission and gather phases and are
//! read-only afterwards, so any number of camera paths may query them
//! concurrently.
//!
//! - PhotonKdTree (bounded k-nearest-neighbour and beam queries over
//!   photon points)
//! - BeamBvh (ray traversal over photon path segments)

pub mod beam_bvh;
pub mod photon_kdtree;
