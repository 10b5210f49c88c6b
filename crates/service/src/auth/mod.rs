//! Auth module: domain, session persistence abstraction and service.
//!
//! A single administrator credential pair comes from configuration; a
//! successful login creates a server-side session referenced by an opaque
//! token that the HTTP layer carries in a cookie.

pub mod domain;
pub mod errors;
pub mod session_store;
pub mod service;

pub use service::AuthService;
