//! Camera models turn pixel coordinates into eye rays.
//!
//! - PinholeCamera

pub mod pinhole;
