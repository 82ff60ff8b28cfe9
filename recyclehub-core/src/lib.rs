//! Core types and service wiring for the RecycleHub client.

/// Shopping cart state and its derived read model.
pub mod cart;
/// Haversine distances and nearest recycle-point search.
pub mod geo;
/// Domain models and identifiers shared by all crates.
pub mod model;
/// Pickup requests and their validation.
pub mod pickup;
/// Bundle type plugging a backend implementation into the service.
pub mod plugin;
/// Traits describing the backend interfaces.
pub mod ports;
/// High-level service facade used by clients.
pub mod service;

pub use cart::*;
pub use geo::*;
pub use model::*;
pub use pickup::*;
pub use plugin::*;
pub use ports::*;
pub use service::*;
