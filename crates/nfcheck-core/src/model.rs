//! Fixed-shape records exchanged between the engine, its callers and the
//! storage collaborators.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ─── Reference data ──────────────────────────────────────────────────────────

/// One valid key combination in the reference table.
///
/// The triple `(region, invoice_number, order_number)` is the lookup key.
/// Uniqueness is not enforced anywhere; see [`crate::ReferenceTable::find`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceRow {
  /// Free-form region code, e.g. `"SP"` or `"SP-ITV"`.
  pub region:          String,
  pub invoice_number:  u64,
  pub order_number:    u64,
  /// `"<year>/<month name>"`, e.g. `"2025/maio"`. May be empty.
  pub planning_period: String,
}

// ─── Caller input ────────────────────────────────────────────────────────────

/// The four raw fields a caller submits for validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationRequest {
  pub region:       String,
  pub invoice:      String,
  pub order:        String,
  pub receipt_date: String,
}

impl ValidationRequest {
  pub fn new(
    region: impl Into<String>,
    invoice: impl Into<String>,
    order: impl Into<String>,
    receipt_date: impl Into<String>,
  ) -> Self {
    Self {
      region:       region.into(),
      invoice:      invoice.into(),
      order:        order.into(),
      receipt_date: receipt_date.into(),
    }
  }
}

// ─── Decision taxonomy ───────────────────────────────────────────────────────

/// The decision text carried by a record whose key was found.
///
/// Serialised as the user-facing Portuguese text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Decision {
  /// The planning month has been reached: the ticket may be filed now.
  OpenTicket,
  /// The planning month is still ahead: file after month-end close.
  AfterMonthClose,
  /// The key was found but one of the two dates could not be parsed.
  DateError,
}

impl Decision {
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::OpenTicket => "Pode abrir JIRA",
      Self::AfterMonthClose => "Abrir JIRA após o fechamento do mês",
      Self::DateError => "Erro na validação das datas",
    }
  }

  pub fn from_text(text: &str) -> Option<Self> {
    [Self::OpenTicket, Self::AfterMonthClose, Self::DateError]
      .into_iter()
      .find(|d| d.as_str() == text)
  }
}

impl std::fmt::Display for Decision {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.as_str())
  }
}

impl From<Decision> for String {
  fn from(d: Decision) -> Self { d.as_str().to_owned() }
}

impl TryFrom<String> for Decision {
  type Error = String;

  fn try_from(s: String) -> Result<Self, Self::Error> {
    Self::from_text(&s).ok_or_else(|| format!("unknown decision: {s:?}"))
  }
}

/// Why an invocation ended before a decision could be reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
  NotInteger,
  /// The placeholder value `999999` was submitted for NFe or Pedido.
  SentinelValue,
  SourceUnavailable,
  NotFound,
  MissingPlanningDate,
}

impl Rejection {
  pub fn message(&self) -> &'static str {
    match self {
      Self::NotInteger => "NFe e Pedido devem ser números inteiros",
      Self::SentinelValue => {
        "NFe ou Pedido com valor de teste (999999) não é permitido"
      }
      Self::SourceUnavailable => "Erro ao carregar a base de dados",
      Self::NotFound => {
        "Combinação de UF, NFe e Pedido não encontrada na base de dados"
      }
      Self::MissingPlanningDate => "Data de planejamento não encontrada",
    }
  }
}

// ─── Validation record ───────────────────────────────────────────────────────

/// Message carried by every record that reached a month/year decision.
pub const SUCCESS_MESSAGE: &str = "Validação concluída com sucesso";

/// Message carried by a found key whose dates could not be parsed.
pub const DATE_ERROR_MESSAGE: &str = "Formato de data inválido";

/// The outcome of one validation attempt. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationRecord {
  pub region:             String,
  pub invoice_number_raw: String,
  pub order_number_raw:   String,
  pub receipt_date_raw:   String,
  pub is_valid:           bool,
  /// Empty when the lookup failed.
  pub planning_period:    String,
  pub decision:           Option<Decision>,
  /// Human-readable outcome; never empty.
  pub message:            String,
}

impl ValidationRecord {
  /// A record for an invocation that stopped at `reason`.
  pub fn rejected(request: &ValidationRequest, reason: Rejection) -> Self {
    Self {
      region:             request.region.clone(),
      invoice_number_raw: request.invoice.clone(),
      order_number_raw:   request.order.clone(),
      receipt_date_raw:   request.receipt_date.clone(),
      is_valid:           false,
      planning_period:    String::new(),
      decision:           None,
      message:            reason.message().to_owned(),
    }
  }

  /// A record for a found key, with the decision reached for it.
  pub fn decided(
    request: &ValidationRequest,
    planning_period: &str,
    decision: Decision,
  ) -> Self {
    let message = match decision {
      Decision::DateError => DATE_ERROR_MESSAGE,
      _ => SUCCESS_MESSAGE,
    };
    Self {
      region:             request.region.clone(),
      invoice_number_raw: request.invoice.clone(),
      order_number_raw:   request.order.clone(),
      receipt_date_raw:   request.receipt_date.clone(),
      is_valid:           true,
      planning_period:    planning_period.to_owned(),
      decision:           Some(decision),
      message:            message.to_owned(),
    }
  }

  /// The decision text, or `""` for rejected records.
  pub fn decision_text(&self) -> &'static str {
    self.decision.as_ref().map(Decision::as_str).unwrap_or("")
  }
}

// ─── Audit entry ─────────────────────────────────────────────────────────────

/// A [`ValidationRecord`] as persisted by an [`crate::store::AuditLog`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEntry {
  pub entry_id:    Uuid,
  /// Assigned by the audit layer at append time.
  pub recorded_at: DateTime<Utc>,
  pub record:      ValidationRecord,
}
