//! Handler for `GET /health`.

use axum::{Json, extract::State};
use nfcheck_core::{AuditRecorder, store::ReferenceSource};
use serde::Serialize;

use crate::{ApiState, Backend, error::ApiError};

#[derive(Debug, Serialize)]
pub struct Health {
  pub status:         &'static str,
  pub reference_rows: usize,
  pub records:        u64,
}

/// `GET /health`: 503 when either collaborator cannot be read.
pub async fn handler<S>(
  State(state): State<ApiState<S>>,
) -> Result<Json<Health>, ApiError>
where
  S: Backend,
{
  let reference_rows = ReferenceSource::read_all(&*state.store)
    .await
    .map_err(|e| ApiError::Unavailable(e.to_string()))?
    .len();
  let records = AuditRecorder::new(&*state.store)
    .count()
    .await
    .map_err(|e| ApiError::Unavailable(e.to_string()))?;

  Ok(Json(Health { status: "ok", reference_rows, records }))
}
