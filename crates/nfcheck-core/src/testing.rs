//! In-memory collaborators shared by the unit tests.

use std::{io, sync::Mutex};

use chrono::Utc;
use uuid::Uuid;

use crate::{
  model::{AuditEntry, ReferenceRow, ValidationRecord},
  store::{AuditLog, ReferenceSource},
};

pub fn row(region: &str, invoice: u64, order: u64, planning: &str) -> ReferenceRow {
  ReferenceRow {
    region:          region.to_owned(),
    invoice_number:  invoice,
    order_number:    order,
    planning_period: planning.to_owned(),
  }
}

#[derive(Default)]
pub struct MemoryStore {
  rows:    Mutex<Vec<ReferenceRow>>,
  entries: Mutex<Vec<AuditEntry>>,
}

impl MemoryStore {
  pub fn with_rows(rows: Vec<ReferenceRow>) -> Self {
    Self { rows: Mutex::new(rows), entries: Mutex::default() }
  }

  pub fn entries(&self) -> Vec<AuditEntry> { self.entries.lock().unwrap().clone() }
}

impl ReferenceSource for MemoryStore {
  type Error = io::Error;

  async fn read_all(&self) -> io::Result<Vec<ReferenceRow>> {
    Ok(self.rows.lock().unwrap().clone())
  }

  async fn replace_all(&self, rows: Vec<ReferenceRow>) -> io::Result<usize> {
    let n = rows.len();
    *self.rows.lock().unwrap() = rows;
    Ok(n)
  }
}

impl AuditLog for MemoryStore {
  type Error = io::Error;

  async fn append(&self, record: ValidationRecord) -> io::Result<AuditEntry> {
    let entry = AuditEntry {
      entry_id: Uuid::new_v4(),
      recorded_at: Utc::now(),
      record,
    };
    self.entries.lock().unwrap().push(entry.clone());
    Ok(entry)
  }

  async fn read_all(&self) -> io::Result<Vec<AuditEntry>> { Ok(self.entries()) }

  async fn count(&self) -> io::Result<u64> {
    Ok(self.entries.lock().unwrap().len() as u64)
  }
}

fn offline() -> io::Error { io::Error::new(io::ErrorKind::NotConnected, "offline") }

/// A reference source and audit log that always fail.
pub struct FailingSource;

impl ReferenceSource for FailingSource {
  type Error = io::Error;

  async fn read_all(&self) -> io::Result<Vec<ReferenceRow>> { Err(offline()) }

  async fn replace_all(&self, _rows: Vec<ReferenceRow>) -> io::Result<usize> {
    Err(offline())
  }
}

impl AuditLog for FailingSource {
  type Error = io::Error;

  async fn append(&self, _record: ValidationRecord) -> io::Result<AuditEntry> {
    Err(offline())
  }

  async fn read_all(&self) -> io::Result<Vec<AuditEntry>> { Err(offline()) }

  async fn count(&self) -> io::Result<u64> { Err(offline()) }
}
