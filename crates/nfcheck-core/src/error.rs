//! Error types for `nfcheck-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("reference source unavailable: {0}")]
  SourceUnavailable(#[source] Box<dyn std::error::Error + Send + Sync>),

  #[error("invalid planning period: {0:?}")]
  InvalidPlanningFormat(String),

  #[error("invalid receipt date: {0:?}")]
  InvalidDateFormat(String),

  #[error("audit log write failed: {0}")]
  WriteUnavailable(#[source] Box<dyn std::error::Error + Send + Sync>),

  #[error("audit log read failed: {0}")]
  LogUnavailable(#[source] Box<dyn std::error::Error + Send + Sync>),

  #[error("missing columns in reference data: {}", .0.join(", "))]
  MissingColumns(Vec<String>),

  #[error("invalid reference row on line {line}: {reason}")]
  InvalidReferenceRow { line: u64, reason: String },

  #[error("csv error: {0}")]
  Csv(#[from] csv::Error),

  #[error("io error: {0}")]
  Io(#[from] std::io::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
