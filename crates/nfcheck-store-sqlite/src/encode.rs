//! Encoding and decoding helpers between domain types and the plain values
//! stored in SQLite columns.
//!
//! Timestamps are RFC 3339 strings, UUIDs hyphenated lowercase strings,
//! decisions their display text (`''` for none), key numbers `INTEGER`.

use chrono::{DateTime, Utc};
use nfcheck_core::model::{AuditEntry, Decision, ReferenceRow, ValidationRecord};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Key numbers ─────────────────────────────────────────────────────────────

pub fn encode_key(n: u64) -> Result<i64> {
  i64::try_from(n).map_err(|_| Error::KeyOutOfRange(n.to_string()))
}

pub fn decode_key(n: i64) -> Result<u64> {
  u64::try_from(n).map_err(|_| Error::KeyOutOfRange(n.to_string()))
}

// ─── Decision ────────────────────────────────────────────────────────────────

pub fn encode_decision(d: Option<Decision>) -> &'static str {
  d.as_ref().map(Decision::as_str).unwrap_or("")
}

pub fn decode_decision(s: &str) -> Result<Option<Decision>> {
  if s.is_empty() {
    return Ok(None);
  }
  Decision::from_text(s)
    .map(Some)
    .ok_or_else(|| Error::UnknownDecision(s.to_owned()))
}

// ─── Raw rows ────────────────────────────────────────────────────────────────

/// A `reference_rows` row as read from SQLite.
pub struct RawReferenceRow {
  pub uf:           String,
  pub nfe:          i64,
  pub pedido:       i64,
  pub planejamento: String,
}

impl RawReferenceRow {
  pub fn into_row(self) -> Result<ReferenceRow> {
    Ok(ReferenceRow {
      region:          self.uf,
      invoice_number:  decode_key(self.nfe)?,
      order_number:    decode_key(self.pedido)?,
      planning_period: self.planejamento,
    })
  }
}

/// A `validation_records` row as read from SQLite.
pub struct RawEntry {
  pub entry_id:          String,
  pub recorded_at:       String,
  pub uf:                String,
  pub nfe:               String,
  pub pedido:            String,
  pub data_recebimento:  String,
  pub valido:            bool,
  pub data_planejamento: String,
  pub decisao:           String,
  pub mensagem:          String,
}

impl RawEntry {
  pub fn into_entry(self) -> Result<AuditEntry> {
    Ok(AuditEntry {
      entry_id:    decode_uuid(&self.entry_id)?,
      recorded_at: decode_dt(&self.recorded_at)?,
      record:      ValidationRecord {
        region:             self.uf,
        invoice_number_raw: self.nfe,
        order_number_raw:   self.pedido,
        receipt_date_raw:   self.data_recebimento,
        is_valid:           self.valido,
        planning_period:    self.data_planejamento,
        decision:           decode_decision(&self.decisao)?,
        message:            self.mensagem,
      },
    })
  }
}
