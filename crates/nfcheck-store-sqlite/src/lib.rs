//! SQLite backend for nfcheck.
//!
//! One [`SqliteStore`] serves both collaborators the engine needs: the
//! reference table ([`ReferenceSource`](nfcheck_core::store::ReferenceSource))
//! and the append-only audit log
//! ([`AuditLog`](nfcheck_core::store::AuditLog)). Wraps [`tokio_rusqlite`] so
//! all database access runs on a dedicated thread without blocking the async
//! runtime; that thread also serialises concurrent appends.

mod encode;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteStore;
