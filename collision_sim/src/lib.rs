//! 2D Circle Collision Simulation
//!
//! Physics core for a real-time simulation of many circular bodies under
//! gravity, bouncing off each other and off the world boundary:
//!
//! - **Broad phase**: uniform grid rebuilt every sub-step ([`grid`])
//! - **Narrow phase**: circle-circle and circle-boundary tests ([`collision`])
//! - **Response**: impulses plus positional correction ([`resolver`])
//! - **Integration**: semi-implicit Euler on a fixed timestep ([`integrator`])
//! - **World**: owns the bodies and runs the pipeline ([`world`])
//!
//! The core has no graphics dependency; the `collision_sim` binary renders it
//! with wgpu.

pub mod math;
pub mod error;
pub mod body;
pub mod bounds;
pub mod grid;
pub mod collision;
pub mod resolver;
pub mod integrator;
pub mod config;
pub mod world;
pub mod scenario;

pub use body::{Body, BodyId, Shape};
pub use bounds::Bounds;
pub use config::SimConfig;
pub use error::{Diagnostic, SimError};
pub use resolver::{ResolverSettings, RestitutionRule};
pub use world::{StepReport, World};
