//! Common utilities for the simulation front-ends
//!
//! This crate provides shared graphics setup, the pan/zoom camera, and GPU
//! buffer helpers used by the collision simulation binary.

pub mod graphics;
pub mod camera;

pub use graphics::*;
pub use camera::*;

/// Colours shared by the renderers
pub mod palette {
    /// Clear colour behind the simulation
    pub const BACKGROUND: [f32; 4] = [0.0, 0.0, 0.0, 1.0];

    /// World border outline
    pub const BORDER: [f32; 4] = [0.47, 0.0, 0.0, 1.0];
}
