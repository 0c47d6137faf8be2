//! SQL schema for the nfcheck SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE ... IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

-- Replaced wholesale by the admin upload; never edited row by row.
-- No uniqueness on (uf, nfe, pedido): the lowest position wins on lookup.
CREATE TABLE IF NOT EXISTS reference_rows (
    position     INTEGER PRIMARY KEY,
    uf           TEXT    NOT NULL,
    nfe          INTEGER NOT NULL,
    pedido       INTEGER NOT NULL,
    planejamento TEXT    NOT NULL DEFAULT ''
);

-- Validation attempts are strictly append-only.
-- No UPDATE or DELETE is ever issued against this table.
CREATE TABLE IF NOT EXISTS validation_records (
    seq               INTEGER PRIMARY KEY AUTOINCREMENT,
    entry_id          TEXT    NOT NULL UNIQUE,
    recorded_at       TEXT    NOT NULL,   -- RFC 3339 UTC; store-assigned
    uf                TEXT    NOT NULL,
    nfe               TEXT    NOT NULL,   -- as submitted
    pedido            TEXT    NOT NULL,   -- as submitted
    data_recebimento  TEXT    NOT NULL,   -- as submitted
    valido            INTEGER NOT NULL,
    data_planejamento TEXT    NOT NULL DEFAULT '',
    decisao           TEXT    NOT NULL DEFAULT '',
    mensagem          TEXT    NOT NULL
);

CREATE INDEX IF NOT EXISTS reference_key_idx ON reference_rows(uf, nfe, pedido);

PRAGMA user_version = 1;
";
