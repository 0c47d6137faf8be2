//! Handler for `POST /verify`.
//!
//! Accepts either an HTML-form body (`application/x-www-form-urlencoded`) or
//! JSON with the fields `uf`, `nfe`, `pedido` and `data_recebimento`.

use axum::{
  Form, Json,
  extract::{FromRequest, Request, State},
  http::{StatusCode, header},
  response::IntoResponse,
};
use nfcheck_core::model::{ValidationRecord, ValidationRequest};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{ApiState, Backend, error::ApiError};

// ─── Input ───────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct VerifyBody {
  #[serde(default)]
  pub uf:               String,
  #[serde(default)]
  pub nfe:              String,
  #[serde(default)]
  pub pedido:           String,
  #[serde(default)]
  pub data_recebimento: String,
}

impl VerifyBody {
  /// Trim every field and upper-case the region before it reaches the
  /// engine, which matches regions exactly.
  pub fn into_request(self) -> ValidationRequest {
    ValidationRequest::new(
      self.uf.trim().to_uppercase(),
      self.nfe.trim(),
      self.pedido.trim(),
      self.data_recebimento.trim(),
    )
  }
}

impl<St> FromRequest<St> for VerifyBody
where
  St: Send + Sync,
{
  type Rejection = ApiError;

  async fn from_request(req: Request, state: &St) -> Result<Self, Self::Rejection> {
    let is_json = req
      .headers()
      .get(header::CONTENT_TYPE)
      .and_then(|v| v.to_str().ok())
      .is_some_and(|ct| ct.starts_with("application/json"));

    if is_json {
      let Json(body) = Json::<VerifyBody>::from_request(req, state)
        .await
        .map_err(|e| ApiError::BadRequest(e.body_text()))?;
      Ok(body)
    } else {
      let Form(body) = Form::<VerifyBody>::from_request(req, state)
        .await
        .map_err(|e| ApiError::BadRequest(e.body_text()))?;
      Ok(body)
    }
  }
}

// ─── Output ──────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct VerifyResponse {
  #[serde(flatten)]
  pub record:      ValidationRecord,
  /// Audit entry id, when the attempt was recorded.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub entry_id:    Option<Uuid>,
  /// Why the attempt could not be recorded; the decision still stands.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub audit_error: Option<String>,
}

// ─── Handler ─────────────────────────────────────────────────────────────────

/// `POST /verify`: 200 with the record when valid, 400 otherwise.
pub async fn handler<S>(
  State(state): State<ApiState<S>>,
  body: VerifyBody,
) -> impl IntoResponse
where
  S: Backend,
{
  let request = body.into_request();
  let outcome = state
    .validator
    .validate(&*state.store, &*state.store, &request)
    .await;

  let (entry_id, audit_error) = match outcome.audit {
    Ok(entry) => (Some(entry.entry_id), None),
    Err(e) => (None, Some(e.to_string())),
  };

  let status = if outcome.record.is_valid {
    StatusCode::OK
  } else {
    StatusCode::BAD_REQUEST
  };

  (status, Json(VerifyResponse { record: outcome.record, entry_id, audit_error }))
}
