//! Content module: the public snapshot and the authenticated mutations over
//! text blocks, services and settings.

pub mod domain;
pub mod repository;
pub mod service;

pub use repository::{ContentRepository, SeaOrmContentRepository};
pub use service::ContentService;
