//! The audit recorder: one durable entry per validation attempt.

use crate::{
  Error, Result,
  model::{AuditEntry, ValidationRecord},
  store::AuditLog,
  tabular,
};

/// Thin wrapper over an [`AuditLog`] that maps backend failures into the
/// core error taxonomy.
pub struct AuditRecorder<'a, L> {
  log: &'a L,
}

impl<'a, L: AuditLog> AuditRecorder<'a, L> {
  pub fn new(log: &'a L) -> Self { Self { log } }

  /// Store one record.
  ///
  /// A failure is returned as [`Error::WriteUnavailable`]; the record itself
  /// stays valid and usable by the caller.
  pub async fn append(&self, record: ValidationRecord) -> Result<AuditEntry> {
    self.log.append(record).await.map_err(|e| {
      tracing::warn!(error = %e, "failed to append validation record");
      Error::WriteUnavailable(Box::new(e))
    })
  }

  /// Every entry, in insertion order.
  pub async fn entries(&self) -> Result<Vec<AuditEntry>> {
    self
      .log
      .read_all()
      .await
      .map_err(|e| Error::LogUnavailable(Box::new(e)))
  }

  pub async fn count(&self) -> Result<u64> {
    self
      .log
      .count()
      .await
      .map_err(|e| Error::LogUnavailable(Box::new(e)))
  }

  /// A full CSV snapshot of the log, in insertion order.
  pub async fn export(&self) -> Result<Vec<u8>> {
    let entries = self.entries().await?;
    tracing::info!(records = entries.len(), "exporting audit log");
    tabular::export_records_csv(&entries)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{
    model::{Rejection, ValidationRequest},
    testing::{FailingSource, MemoryStore},
  };

  fn record(nfe: &str) -> ValidationRecord {
    ValidationRecord::rejected(
      &ValidationRequest::new("RN", nfe, "1", "2025-05-15"),
      Rejection::NotFound,
    )
  }

  #[tokio::test]
  async fn append_then_export_preserves_insertion_order() {
    let store = MemoryStore::default();
    let recorder = AuditRecorder::new(&store);

    for nfe in ["3", "1", "2"] {
      recorder.append(record(nfe)).await.unwrap();
    }
    assert_eq!(recorder.count().await.unwrap(), 3);

    let csv = String::from_utf8(recorder.export().await.unwrap()).unwrap();
    let nfes: Vec<&str> = csv
      .lines()
      .skip(1)
      .map(|l| l.split(',').nth(2).unwrap())
      .collect();
    assert_eq!(nfes, ["3", "1", "2"]);
  }

  #[tokio::test]
  async fn append_failure_is_write_unavailable() {
    let recorder = AuditRecorder::new(&FailingSource);
    let err = recorder.append(record("1")).await.unwrap_err();
    assert!(matches!(err, Error::WriteUnavailable(_)));
  }

  #[tokio::test]
  async fn export_failure_is_log_unavailable() {
    let recorder = AuditRecorder::new(&FailingSource);
    assert!(matches!(recorder.export().await, Err(Error::LogUnavailable(_))));
  }
}
