//! Core library for ClientTrack.
//!
//! This crate provides the domain models, database operations and dashboard
//! aggregation for ClientTrack, independent of any transport layer (HTTP,
//! terminal client, etc.).
//!
//! # Usage
//!
//! ```no_run
//! use clienttrack_core::db::Database;
//!
//! let db = Database::open_default()?;
//! db.migrate()?;
//!
//! let user = db.get_user_by_email("dev@example.com")?;
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod dashboard;
pub mod db;
pub mod models;

// Re-export commonly used types at crate root
pub use db::Database;
