//! The decision engine: key lookup plus the month/year comparison rule.
//!
//! One invocation moves through
//! `received → coerced → looked up → dates parsed → decided`, and may stop
//! early at any step with a [`Rejection`]. Either way it produces exactly one
//! [`ValidationRecord`]; nothing escapes as an error, so every attempt can be
//! audited.

use crate::{
  Error,
  dates::{DateNormalizer, YearMonth},
  model::{Decision, Rejection, ValidationRecord, ValidationRequest},
  table::ReferenceTable,
};

/// Placeholder value left in test data. Rejected for NFe or Pedido no matter
/// what the reference table says.
pub const SENTINEL_VALUE: u64 = 999_999;

/// Stateless between calls; holds only the date normaliser.
#[derive(Debug, Clone, Default)]
pub struct DecisionEngine {
  dates: DateNormalizer,
}

impl DecisionEngine {
  pub fn new(dates: DateNormalizer) -> Self { Self { dates } }

  pub fn dates(&self) -> &DateNormalizer { &self.dates }

  /// Evaluate `request` against an already-loaded table.
  ///
  /// `table` is the result of [`ReferenceTable::load`]; a load failure is
  /// passed through so that it can be recorded like any other outcome. The
  /// region is matched exactly as given; normalising it is the caller's job.
  pub fn evaluate(
    &self,
    request: &ValidationRequest,
    table: Result<&ReferenceTable, &Error>,
  ) -> ValidationRecord {
    let reject = |reason: Rejection| ValidationRecord::rejected(request, reason);

    let (Some(invoice), Some(order)) =
      (coerce_positive(&request.invoice), coerce_positive(&request.order))
    else {
      return reject(Rejection::NotInteger);
    };

    if invoice == SENTINEL_VALUE || order == SENTINEL_VALUE {
      return reject(Rejection::SentinelValue);
    }

    let Ok(table) = table else {
      return reject(Rejection::SourceUnavailable);
    };

    let Some(row) = table.find(&request.region, invoice, order) else {
      return reject(Rejection::NotFound);
    };

    let planning = row.planning_period.trim();
    if planning.is_empty() {
      return reject(Rejection::MissingPlanningDate);
    }

    let decision = match self.parse_both(planning, &request.receipt_date) {
      Ok((planned, received)) => decide(planned, received),
      Err(e) => {
        tracing::warn!(error = %e, "date validation failed");
        Decision::DateError
      }
    };

    ValidationRecord::decided(request, &row.planning_period, decision)
  }

  fn parse_both(
    &self,
    planning: &str,
    receipt: &str,
  ) -> crate::Result<(YearMonth, YearMonth)> {
    let planned = self.dates.parse_planning_period(planning)?;
    let received = self.dates.parse_receipt_date(receipt)?;
    Ok((planned, received))
  }
}

/// The ticket may be filed once the receipt month has reached the planning
/// month: an earlier planning year, or the same year and a month not later
/// than the receipt month.
pub fn decide(planned: YearMonth, received: YearMonth) -> Decision {
  if planned <= received {
    Decision::OpenTicket
  } else {
    Decision::AfterMonthClose
  }
}

fn coerce_positive(raw: &str) -> Option<u64> {
  raw.trim().parse::<u64>().ok().filter(|n| *n > 0)
}
