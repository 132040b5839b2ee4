//! HTTP API for the zoning lookup

pub mod lookup_routes;

pub use lookup_routes::create_lookup_router;
