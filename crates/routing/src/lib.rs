//! Client side of the routing/traffic collaborator.
//!
//! - `protocol`: wire types for geocoding, directions, traffic density and route analysis
//! - `service`: the `RoutingService` trait and its error type
//! - `http`: the REST implementation
//! - `mock`: deterministic offline payloads
//! - `fallback`: primary service with mock fallback on failure

pub mod fallback;
pub mod http;
pub mod mock;
pub mod protocol;
pub mod service;

pub use fallback::*;
pub use http::*;
pub use mock::*;
pub use protocol::*;
pub use service::*;
