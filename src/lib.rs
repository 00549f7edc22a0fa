//! ClientTrack API server.
//!
//! HTTP transport over the `clienttrack-core` models and database: bearer
//! token auth, lead and project CRUD, and the dashboard aggregation
//! endpoint.

pub mod api;
pub mod jwt;

// Re-export the core crate so binaries and tests reach models through one path
pub use clienttrack_core::{dashboard, db, models};
