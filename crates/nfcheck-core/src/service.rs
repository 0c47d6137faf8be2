//! One full validation: load, evaluate, record.

use crate::{
  Result,
  audit::AuditRecorder,
  engine::DecisionEngine,
  model::{AuditEntry, ValidationRecord, ValidationRequest},
  store::{AuditLog, ReferenceSource},
  table::ReferenceTable,
};

/// The result of [`Validator::validate`].
///
/// `audit` is reported separately: a failed append never invalidates the
/// decision already carried by `record`.
#[derive(Debug)]
pub struct Outcome {
  pub record: ValidationRecord,
  pub audit:  Result<AuditEntry>,
}

#[derive(Debug, Clone, Default)]
pub struct Validator {
  engine: DecisionEngine,
}

impl Validator {
  pub fn new(engine: DecisionEngine) -> Self { Self { engine } }

  pub fn engine(&self) -> &DecisionEngine { &self.engine }

  /// Reload the reference table, evaluate `request` against it and append
  /// the resulting record to `log`. Every attempt is recorded, valid or not.
  pub async fn validate<R, L>(
    &self,
    source: &R,
    log: &L,
    request: &ValidationRequest,
  ) -> Outcome
  where
    R: ReferenceSource,
    L: AuditLog,
  {
    tracing::info!(
      region = %request.region,
      nfe = %request.invoice,
      pedido = %request.order,
      data_recebimento = %request.receipt_date,
      "validation requested"
    );

    let table = ReferenceTable::load(source).await;
    let record = self.engine.evaluate(request, table.as_ref());

    tracing::info!(
      valid = record.is_valid,
      decision = record.decision_text(),
      message = %record.message,
      "validation evaluated"
    );

    let audit = AuditRecorder::new(log).append(record.clone()).await;
    Outcome { record, audit }
  }
}
