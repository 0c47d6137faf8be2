//! Handlers for `/records`, the audit log.
//!
//! | Method | Path              | Notes |
//! |--------|-------------------|-------|
//! | `GET`  | `/records`        | JSON, insertion order |
//! | `GET`  | `/records/export` | CSV download |

use axum::{
  Json,
  extract::State,
  http::header,
  response::IntoResponse,
};
use nfcheck_core::{AuditRecorder, model::AuditEntry};

use crate::{ApiState, Backend, error::ApiError};

pub const EXPORT_FILENAME: &str = "registros.csv";

/// `GET /records`
pub async fn list<S>(
  State(state): State<ApiState<S>>,
) -> Result<Json<Vec<AuditEntry>>, ApiError>
where
  S: Backend,
{
  let entries = AuditRecorder::new(&*state.store).entries().await?;
  Ok(Json(entries))
}

/// `GET /records/export`
pub async fn export<S>(
  State(state): State<ApiState<S>>,
) -> Result<impl IntoResponse, ApiError>
where
  S: Backend,
{
  let csv = AuditRecorder::new(&*state.store).export().await?;
  Ok((
    [
      (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_owned()),
      (
        header::CONTENT_DISPOSITION,
        format!("attachment; filename=\"{EXPORT_FILENAME}\""),
      ),
    ],
    csv,
  ))
}
