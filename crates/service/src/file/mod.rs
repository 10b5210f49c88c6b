//! File-backed implementations of service-layer persistence traits.

pub mod session_store;

pub use session_store::FileSessionStore;
