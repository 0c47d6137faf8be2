//! CSV codec for reference-table uploads and audit-log exports.

use std::io;

use crate::{
  Error, Result,
  model::{AuditEntry, ReferenceRow},
};

/// Column headers expected in a reference upload, in key order.
pub const REFERENCE_COLUMNS: [&str; 4] = ["UF", "Nfe", "Pedido", "Planejamento"];

/// Column headers written by [`write_records_csv`].
pub const EXPORT_COLUMNS: [&str; 9] = [
  "recorded_at",
  "uf",
  "nfe",
  "pedido",
  "data_recebimento",
  "valido",
  "data_planejamento",
  "decisao",
  "mensagem",
];

// ─── Reference upload ────────────────────────────────────────────────────────

/// Parse a reference table from CSV bytes.
///
/// The header must name `UF`, `Nfe`, `Pedido` and `Planejamento` (any case,
/// any order, extra columns ignored). Both `,` and `;` delimiters are
/// accepted; the one used in the header line wins. Cells are trimmed and the
/// region is upper-cased, matching how `/verify` normalises its input. Rows
/// with a blank key cell are skipped, while a key cell that is not a positive
/// integer rejects the whole upload.
pub fn parse_reference_csv(data: &[u8]) -> Result<Vec<ReferenceRow>> {
  let mut reader = csv::ReaderBuilder::new()
    .delimiter(sniff_delimiter(data))
    .flexible(true)
    .trim(csv::Trim::All)
    .from_reader(data);

  let headers = reader.headers()?.clone();
  let mut missing = Vec::new();
  let mut index = [0usize; 4];
  for (slot, name) in index.iter_mut().zip(REFERENCE_COLUMNS) {
    match headers.iter().position(|h| h.eq_ignore_ascii_case(name)) {
      Some(i) => *slot = i,
      None => missing.push(name.to_owned()),
    }
  }
  if !missing.is_empty() {
    return Err(Error::MissingColumns(missing));
  }
  let [uf, nfe, pedido, planejamento] = index;

  let mut rows = Vec::new();
  for result in reader.records() {
    let record = result?;
    let line = record.position().map_or(0, |p| p.line());
    let cell = |i: usize| record.get(i).unwrap_or("");

    if cell(uf).is_empty() || cell(nfe).is_empty() || cell(pedido).is_empty() {
      continue;
    }

    let number = |column: &str, i: usize| {
      parse_integer_cell(cell(i)).ok_or_else(|| Error::InvalidReferenceRow {
        line,
        reason: format!("{column} is not a positive integer: {:?}", cell(i)),
      })
    };

    rows.push(ReferenceRow {
      region:          cell(uf).to_uppercase(),
      invoice_number:  number("Nfe", nfe)?,
      order_number:    number("Pedido", pedido)?,
      planning_period: cell(planejamento).to_owned(),
    });
  }

  Ok(rows)
}

fn sniff_delimiter(data: &[u8]) -> u8 {
  let header = data.split(|b| *b == b'\n').next().unwrap_or_default();
  let count = |d: u8| header.iter().filter(|b| **b == d).count();
  if count(b';') > count(b',') { b';' } else { b',' }
}

/// Spreadsheets often export integer cells as `15733.0`; accept those too.
fn parse_integer_cell(cell: &str) -> Option<u64> {
  let n = match cell.parse::<u64>() {
    Ok(n) => n,
    Err(_) => {
      let (whole, fraction) = cell.split_once('.')?;
      if fraction.is_empty() || fraction.bytes().any(|b| b != b'0') {
        return None;
      }
      whole.parse::<u64>().ok()?
    }
  };
  (n > 0).then_some(n)
}

// ─── Audit export ────────────────────────────────────────────────────────────

/// Write `entries` as CSV, one line per entry in the given order.
///
/// `valido` is rendered as `Sim` / `Não`. An empty slice yields only the
/// header line.
pub fn write_records_csv<W: io::Write>(entries: &[AuditEntry], writer: W) -> Result<W> {
  let mut out = csv::Writer::from_writer(writer);
  out.write_record(EXPORT_COLUMNS)?;

  for entry in entries {
    let record = &entry.record;
    let recorded_at = entry.recorded_at.to_rfc3339();
    out.write_record([
      recorded_at.as_str(),
      record.region.as_str(),
      record.invoice_number_raw.as_str(),
      record.order_number_raw.as_str(),
      record.receipt_date_raw.as_str(),
      if record.is_valid { "Sim" } else { "Não" },
      record.planning_period.as_str(),
      record.decision_text(),
      record.message.as_str(),
    ])?;
  }

  out.into_inner().map_err(|e| Error::Io(e.into_error()))
}

/// [`write_records_csv`] into a fresh buffer.
pub fn export_records_csv(entries: &[AuditEntry]) -> Result<Vec<u8>> {
  write_records_csv(entries, Vec::new())
}
