//! Storage layer for partdb
//!
//! SQLite is the single source of truth for locations and parts. The
//! foreign key from `parts.location` to `locations.name` is what enforces
//! referential integrity; this layer only translates the store's verdicts
//! into typed errors.

pub mod migrations;
pub mod sqlite;

pub use sqlite::{Database, decode_embedding, encode_embedding, is_foreign_key_violation};
