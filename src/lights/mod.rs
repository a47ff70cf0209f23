//! In order for objects in a scene to be visible, there must be a
//! source of illumination so that some light is reflected from them
//! to the camera sensor.
//!
//! - PointLight
//!
//! ## Point Lights
//!
//! Isotropic point light source that emits the same amount of light
//! in all directions.

pub mod point;
