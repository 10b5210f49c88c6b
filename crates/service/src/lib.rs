//! Service layer for the content console.
//! - `auth`: single-administrator login over server-side sessions.
//! - `content`: public snapshot and authenticated mutations over the content tables.
//! - `file` / `storage`: JSON-file persistence used by the session store.

pub mod errors;
pub mod auth;
pub mod content;
pub mod runtime;
pub mod storage;
pub mod file;
#[cfg(test)]
pub mod test_support;
