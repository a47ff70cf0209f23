//! Implementations of the **Medium** trait provide various
//! representations of volumetric scattering properties in a region of
//! space.
//!
//! - HomogeneousMedium

pub mod homogeneous;
