pub mod coord;
pub mod ids;
pub mod math;
pub mod time;

// Foundation crate: small, well-tested primitives only.
pub use coord::*;
pub use ids::*;
pub use time::*;
