//! Persistence layer: sea-orm entities for the three content tables, the
//! connection setup, and the [`store::Store`] that owns schema creation and
//! first-run seeding.

pub mod errors;
pub mod db;
pub mod content_block;
pub mod service_entry;
pub mod setting;
pub mod seed;
pub mod store;

#[cfg(test)]
mod tests;
