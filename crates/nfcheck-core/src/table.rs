//! In-memory projection of the reference table.

use crate::{Error, Result, model::ReferenceRow, store::ReferenceSource};

/// A snapshot of the reference data, loaded fully from the source.
///
/// Not cached: every lookup calls
/// [`ReferenceTable::load`] so an administrative replace is visible to the
/// very next validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReferenceTable {
  rows: Vec<ReferenceRow>,
}

impl ReferenceTable {
  pub fn new(rows: Vec<ReferenceRow>) -> Self { Self { rows } }

  /// Read the full table from `source`.
  ///
  /// A read failure becomes [`Error::SourceUnavailable`]; callers treat it as
  /// "no row can be found".
  pub async fn load<S: ReferenceSource>(source: &S) -> Result<Self> {
    match source.read_all().await {
      Ok(rows) => {
        tracing::debug!(rows = rows.len(), "reference table loaded");
        Ok(Self::new(rows))
      }
      Err(e) => {
        tracing::error!(error = %e, "failed to load reference table");
        Err(Error::SourceUnavailable(Box::new(e)))
      }
    }
  }

  /// Exact, case-sensitive match on all three key fields.
  ///
  /// When the table holds duplicate keys the first row in table order wins.
  pub fn find(
    &self,
    region: &str,
    invoice_number: u64,
    order_number: u64,
  ) -> Option<&ReferenceRow> {
    self.rows.iter().find(|row| {
      row.region == region
        && row.invoice_number == invoice_number
        && row.order_number == order_number
    })
  }

  pub fn rows(&self) -> &[ReferenceRow] { &self.rows }

  pub fn len(&self) -> usize { self.rows.len() }

  pub fn is_empty(&self) -> bool { self.rows.is_empty() }
}
