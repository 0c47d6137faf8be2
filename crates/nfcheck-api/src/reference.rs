//! Handlers for `/reference`, the administrative reference-table surface.
//!
//! | Method       | Path         | Notes |
//! |--------------|--------------|-------|
//! | `GET`        | `/reference` | Current rows, in table order |
//! | `PUT`/`POST` | `/reference` | Body: CSV upload; replaces the whole table |

use axum::{Json, extract::State};
use bytes::Bytes;
use nfcheck_core::{
  model::ReferenceRow, store::ReferenceSource, tabular::parse_reference_csv,
};
use serde::Serialize;

use crate::{ApiState, Backend, error::ApiError};

#[derive(Debug, Serialize)]
pub struct ReplaceResponse {
  pub rows: usize,
}

/// `GET /reference`
pub async fn list<S>(
  State(state): State<ApiState<S>>,
) -> Result<Json<Vec<ReferenceRow>>, ApiError>
where
  S: Backend,
{
  let rows = ReferenceSource::read_all(&*state.store)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(rows))
}

/// `PUT /reference`: body is a CSV file with `UF,Nfe,Pedido,Planejamento`.
///
/// The upload is parsed completely before anything is written, so a
/// malformed file never touches the stored table.
pub async fn replace<S>(
  State(state): State<ApiState<S>>,
  body: Bytes,
) -> Result<Json<ReplaceResponse>, ApiError>
where
  S: Backend,
{
  let rows = parse_reference_csv(&body)?;
  if rows.is_empty() {
    return Err(ApiError::BadRequest(
      "upload contains no reference rows".to_owned(),
    ));
  }

  let rows = state
    .store
    .replace_all(rows)
    .await
    .map_err(ApiError::store)?;
  tracing::info!(rows, "reference table uploaded");
  Ok(Json(ReplaceResponse { rows }))
}
