//! Evacuation planning core.
//!
//! Turns drawn obstacles into avoidance polygons, samples fetched routes for
//! traffic queries, classifies congestion, and animates crowd agents along
//! route geometry one logical tick at a time. Rendering and transport are
//! collaborators; see the `routing` crate for the latter.

pub mod config;
pub mod density;
pub mod format;
pub mod geometry;
pub mod mode;
pub mod overlay;
pub mod planner;
pub mod route;
pub mod sampler;
pub mod simulation;

pub use config::*;
pub use density::*;
pub use geometry::*;
pub use mode::*;
pub use overlay::*;
pub use planner::*;
pub use route::*;
pub use sampler::*;
pub use simulation::*;
