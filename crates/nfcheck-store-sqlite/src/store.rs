//! [`SqliteStore`]: the SQLite implementation of [`ReferenceSource`] and
//! [`AuditLog`].

use std::path::Path;

use chrono::Utc;
use nfcheck_core::{
  model::{AuditEntry, ReferenceRow, ValidationRecord},
  store::{AuditLog, ReferenceSource},
};
use uuid::Uuid;

use crate::{
  Result,
  encode::{
    RawEntry, RawReferenceRow, encode_decision, encode_dt, encode_key,
    encode_uuid,
  },
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// Reference table and audit log backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── ReferenceSource impl ────────────────────────────────────────────────────

impl ReferenceSource for SqliteStore {
  type Error = crate::Error;

  async fn read_all(&self) -> Result<Vec<ReferenceRow>> {
    let raws: Vec<RawReferenceRow> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT uf, nfe, pedido, planejamento
           FROM reference_rows
           ORDER BY position",
        )?;
        let rows = stmt
          .query_map([], |row| {
            Ok(RawReferenceRow {
              uf:           row.get(0)?,
              nfe:          row.get(1)?,
              pedido:       row.get(2)?,
              planejamento: row.get(3)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawReferenceRow::into_row).collect()
  }

  async fn replace_all(&self, rows: Vec<ReferenceRow>) -> Result<usize> {
    let encoded = rows
      .into_iter()
      .map(|r| {
        Ok((
          r.region,
          encode_key(r.invoice_number)?,
          encode_key(r.order_number)?,
          r.planning_period,
        ))
      })
      .collect::<Result<Vec<_>>>()?;
    let count = encoded.len();

    // One transaction: readers see either the old table or the new one.
    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        tx.execute("DELETE FROM reference_rows", [])?;
        {
          let mut stmt = tx.prepare(
            "INSERT INTO reference_rows (position, uf, nfe, pedido, planejamento)
             VALUES (?1, ?2, ?3, ?4, ?5)",
          )?;
          for (position, (uf, nfe, pedido, planejamento)) in
            encoded.iter().enumerate()
          {
            stmt.execute(rusqlite::params![
              position as i64,
              uf,
              nfe,
              pedido,
              planejamento,
            ])?;
          }
        }
        tx.commit()?;
        Ok(())
      })
      .await?;

    tracing::info!(rows = count, "reference table replaced");
    Ok(count)
  }
}

// ─── AuditLog impl ───────────────────────────────────────────────────────────

impl AuditLog for SqliteStore {
  type Error = crate::Error;

  async fn append(&self, record: ValidationRecord) -> Result<AuditEntry> {
    let entry = AuditEntry {
      entry_id: Uuid::new_v4(),
      recorded_at: Utc::now(),
      record,
    };

    let id_str   = encode_uuid(entry.entry_id);
    let at_str   = encode_dt(entry.recorded_at);
    let decision = encode_decision(entry.record.decision);
    let r        = entry.record.clone();

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO validation_records (
             entry_id, recorded_at, uf, nfe, pedido, data_recebimento,
             valido, data_planejamento, decisao, mensagem
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
          rusqlite::params![
            id_str,
            at_str,
            r.region,
            r.invoice_number_raw,
            r.order_number_raw,
            r.receipt_date_raw,
            r.is_valid,
            r.planning_period,
            decision,
            r.message,
          ],
        )?;
        Ok(())
      })
      .await?;

    Ok(entry)
  }

  async fn read_all(&self) -> Result<Vec<AuditEntry>> {
    let raws: Vec<RawEntry> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT
             entry_id, recorded_at, uf, nfe, pedido, data_recebimento,
             valido, data_planejamento, decisao, mensagem
           FROM validation_records
           ORDER BY seq",
        )?;
        let rows = stmt
          .query_map([], |row| {
            Ok(RawEntry {
              entry_id:          row.get(0)?,
              recorded_at:       row.get(1)?,
              uf:                row.get(2)?,
              nfe:               row.get(3)?,
              pedido:            row.get(4)?,
              data_recebimento:  row.get(5)?,
              valido:            row.get(6)?,
              data_planejamento: row.get(7)?,
              decisao:           row.get(8)?,
              mensagem:          row.get(9)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawEntry::into_entry).collect()
  }

  async fn count(&self) -> Result<u64> {
    let n: i64 = self
      .conn
      .call(|conn| {
        Ok(conn.query_row(
          "SELECT COUNT(*) FROM validation_records",
          [],
          |row| row.get(0),
        )?)
      })
      .await?;
    Ok(n.max(0) as u64)
  }
}
