//! Collaborator traits for the reference data source and the audit log.
//!
//! Implemented by storage backends (e.g. `nfcheck-store-sqlite`). The engine
//! treats both as plain request/response collaborators: no session or
//! transaction state is held between calls, and any serialisation needed for
//! concurrent callers is the backend's business.

use std::future::Future;

use crate::model::{AuditEntry, ReferenceRow, ValidationRecord};

/// Tabular source of [`ReferenceRow`]s.
pub trait ReferenceSource: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Read every row, in stable table order. Called fresh on every lookup.
  fn read_all(
    &self,
  ) -> impl Future<Output = Result<Vec<ReferenceRow>, Self::Error>> + Send + '_;

  /// Atomically replace the whole table with `rows`, preserving their order.
  /// Returns the number of rows stored.
  fn replace_all(
    &self,
    rows: Vec<ReferenceRow>,
  ) -> impl Future<Output = Result<usize, Self::Error>> + Send + '_;
}

/// Append-only store of [`ValidationRecord`]s.
pub trait AuditLog: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Durably store one record. One call stores exactly one record; the store
  /// assigns `entry_id` and `recorded_at`.
  fn append(
    &self,
    record: ValidationRecord,
  ) -> impl Future<Output = Result<AuditEntry, Self::Error>> + Send + '_;

  /// Every stored entry, in insertion order.
  fn read_all(
    &self,
  ) -> impl Future<Output = Result<Vec<AuditEntry>, Self::Error>> + Send + '_;

  /// Number of stored entries.
  fn count(&self) -> impl Future<Output = Result<u64, Self::Error>> + Send + '_;
}
