//! Storage abstractions for service layer
//!
//! Reusable file-backed stores for small maps persisted as JSON, kept apart
//! from the SQLite content database.

pub mod json_map_store;
