//! HTTP API for nfcheck.
//!
//! Exposes an axum [`Router`] backed by any store implementing both
//! [`ReferenceSource`] and [`AuditLog`]. TLS and transport concerns are the
//! caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .merge(nfcheck_api::api_router(store.clone(), Validator::default()))
//! ```

pub mod error;
pub mod health;
pub mod records;
pub mod reference;
pub mod verify;

use std::sync::Arc;

use axum::{
  Router,
  extract::DefaultBodyLimit,
  routing::{get, post},
};
use nfcheck_core::{
  Validator,
  store::{AuditLog, ReferenceSource},
};

pub use error::ApiError;

/// Largest accepted request body (reference uploads included).
pub const MAX_BODY_BYTES: usize = 16 * 1024 * 1024;

/// A store that can serve as both collaborators of the engine.
pub trait Backend: ReferenceSource + AuditLog + 'static {}

impl<T> Backend for T where T: ReferenceSource + AuditLog + 'static {}

/// Shared state threaded through all handlers.
pub struct ApiState<S> {
  pub store:     Arc<S>,
  pub validator: Arc<Validator>,
}

impl<S> Clone for ApiState<S> {
  fn clone(&self) -> Self {
    Self {
      store:     Arc::clone(&self.store),
      validator: Arc::clone(&self.validator),
    }
  }
}

/// Build the API router for `store`.
///
/// The returned `Router<()>` can be merged into any parent router regardless
/// of its own state type.
pub fn api_router<S: Backend>(store: Arc<S>, validator: Validator) -> Router<()> {
  let state = ApiState { store, validator: Arc::new(validator) };

  Router::new()
    .route("/verify", post(verify::handler::<S>))
    .route(
      "/reference",
      get(reference::list::<S>)
        .put(reference::replace::<S>)
        .post(reference::replace::<S>),
    )
    .route("/records", get(records::list::<S>))
    .route("/records/export", get(records::export::<S>))
    .route("/health", get(health::handler::<S>))
    .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
    .with_state(state)
}

// ─── Integration tests ───────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  use axum::{
    body::Body,
    http::{Request, StatusCode, header},
    response::Response,
  };
  use nfcheck_store_sqlite::SqliteStore;
  use serde_json::Value;
  use tower::ServiceExt as _;

  const REFERENCE_CSV: &str = "UF,Nfe,Pedido,Planejamento\n\
                               RN,15733,75710,2025/maio\n\
                               SP-ITV,42,7,\n";

  async fn make_store() -> Arc<SqliteStore> {
    let store = SqliteStore::open_in_memory().await.unwrap();
    store
      .replace_all(nfcheck_core::tabular::parse_reference_csv(REFERENCE_CSV.as_bytes()).unwrap())
      .await
      .unwrap();
    Arc::new(store)
  }

  async fn oneshot(
    store:   Arc<SqliteStore>,
    method:  &str,
    uri:     &str,
    content: Option<&str>,
    body:    &str,
  ) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(ct) = content {
      builder = builder.header(header::CONTENT_TYPE, ct);
    }
    let req = builder.body(Body::from(body.to_string())).unwrap();
    api_router(store, Validator::default()).oneshot(req).await.unwrap()
  }

  async fn body_string(resp: Response) -> String {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
  }

  async fn body_json(resp: Response) -> Value {
    serde_json::from_str(&body_string(resp).await).unwrap()
  }

  const FORM: Option<&str> = Some("application/x-www-form-urlencoded");
  const JSON: Option<&str> = Some("application/json");

  // ── /verify ────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn verify_form_allows_ticket() {
    let store = make_store().await;
    let resp = oneshot(
      store,
      "POST",
      "/verify",
      FORM,
      "uf=RN&nfe=15733&pedido=75710&data_recebimento=2025-05-15",
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let json = body_json(resp).await;
    assert_eq!(json["is_valid"], true);
    assert_eq!(json["decision"], "Pode abrir JIRA");
    assert_eq!(json["planning_period"], "2025/maio");
    assert!(json["entry_id"].is_string());
  }

  #[tokio::test]
  async fn verify_json_waits_for_month_close() {
    let store = make_store().await;
    let resp = oneshot(
      store,
      "POST",
      "/verify",
      JSON,
      r#"{"uf":"RN","nfe":"15733","pedido":"75710","data_recebimento":"10/04/2025"}"#,
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let json = body_json(resp).await;
    assert_eq!(json["decision"], "Abrir JIRA após o fechamento do mês");
  }

  #[tokio::test]
  async fn verify_normalises_region_case_and_whitespace() {
    let store = make_store().await;
    let resp = oneshot(
      store,
      "POST",
      "/verify",
      JSON,
      r#"{"uf":" rn ","nfe":" 15733","pedido":"75710 ","data_recebimento":"2025-05-15"}"#,
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await["region"], "RN");
  }

  #[tokio::test]
  async fn verify_unknown_key_is_400_and_still_recorded() {
    let store = make_store().await;
    let resp = oneshot(
      store.clone(),
      "POST",
      "/verify",
      FORM,
      "uf=RN&nfe=1&pedido=2&data_recebimento=2025-05-15",
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let json = body_json(resp).await;
    assert_eq!(json["is_valid"], false);
    assert_eq!(
      json["message"],
      "Combinação de UF, NFe e Pedido não encontrada na base de dados"
    );
    assert_eq!(json["decision"], Value::Null);
    assert_eq!(store.count().await.unwrap(), 1);
  }

  #[tokio::test]
  async fn verify_sentinel_is_rejected() {
    let store = make_store().await;
    let resp = oneshot(
      store,
      "POST",
      "/verify",
      FORM,
      "uf=RN&nfe=999999&pedido=75710&data_recebimento=2025-05-15",
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  }

  #[tokio::test]
  async fn verify_missing_planning_date() {
    let store = make_store().await;
    let resp = oneshot(
      store,
      "POST",
      "/verify",
      FORM,
      "uf=SP-ITV&nfe=42&pedido=7&data_recebimento=2025-05-15",
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(resp).await["message"], "Data de planejamento não encontrada");
  }

  #[tokio::test]
  async fn verify_malformed_json_is_400() {
    let store = make_store().await;
    let resp = oneshot(store, "POST", "/verify", JSON, "{not json").await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert!(body_json(resp).await["error"].is_string());
  }

  // ── /reference ─────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn reference_upload_replaces_table_for_next_verify() {
    let store = make_store().await;
    let upload = "UF;Nfe;Pedido;Planejamento\nRN;15733;75710;2025/abril\n";
    let resp = oneshot(store.clone(), "PUT", "/reference", Some("text/csv"), upload).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await["rows"], 1);

    let list = body_json(oneshot(store.clone(), "GET", "/reference", None, "").await).await;
    assert_eq!(list.as_array().unwrap().len(), 1);
    assert_eq!(list[0]["planning_period"], "2025/abril");

    let resp = oneshot(
      store,
      "POST",
      "/verify",
      FORM,
      "uf=RN&nfe=15733&pedido=75710&data_recebimento=2025-04-10",
    )
    .await;
    assert_eq!(body_json(resp).await["decision"], "Pode abrir JIRA");
  }

  #[tokio::test]
  async fn lower_case_region_upload_matches_lower_case_verify() {
    let store = make_store().await;
    let upload = "UF,Nfe,Pedido,Planejamento\nrn,15733,75710,2025/maio\n";
    let resp = oneshot(store.clone(), "PUT", "/reference", Some("text/csv"), upload).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = oneshot(
      store,
      "POST",
      "/verify",
      FORM,
      "uf=rn&nfe=15733&pedido=75710&data_recebimento=2025-05-15",
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let json = body_json(resp).await;
    assert_eq!(json["region"], "RN");
    assert_eq!(json["decision"], "Pode abrir JIRA");
  }

  #[tokio::test]
  async fn reference_upload_with_missing_columns_is_400_and_keeps_table() {
    let store = make_store().await;
    let resp =
      oneshot(store.clone(), "POST", "/reference", Some("text/csv"), "UF,Nfe\nRN,1\n").await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let list = body_json(oneshot(store, "GET", "/reference", None, "").await).await;
    assert_eq!(list.as_array().unwrap().len(), 2);
  }

  #[tokio::test]
  async fn empty_reference_upload_is_rejected() {
    let store = make_store().await;
    let upload = "UF,Nfe,Pedido,Planejamento\n";
    let resp = oneshot(store, "PUT", "/reference", Some("text/csv"), upload).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  }

  // ── /records ───────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn records_export_is_csv_in_insertion_order() {
    let store = make_store().await;
    for nfe in ["15733", "1"] {
      oneshot(
        store.clone(),
        "POST",
        "/verify",
        FORM,
        &format!("uf=RN&nfe={nfe}&pedido=75710&data_recebimento=2025-05-15"),
      )
      .await;
    }

    let resp = oneshot(store.clone(), "GET", "/records/export", None, "").await;
    assert_eq!(resp.status(), StatusCode::OK);
    let ct = resp.headers().get(header::CONTENT_TYPE).unwrap().to_str().unwrap();
    assert!(ct.starts_with("text/csv"), "Content-Type: {ct}");
    let cd = resp.headers().get(header::CONTENT_DISPOSITION).unwrap().to_str().unwrap();
    assert!(cd.contains("registros.csv"), "Content-Disposition: {cd}");

    let csv = body_string(resp).await;
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with("recorded_at,uf,nfe"));
    assert!(lines[1].contains(",15733,75710,2025-05-15,Sim,"));
    assert!(lines[2].contains(",1,75710,2025-05-15,Não,"));

    let json = body_json(oneshot(store, "GET", "/records", None, "").await).await;
    assert_eq!(json.as_array().unwrap().len(), 2);
    assert_eq!(json[0]["record"]["invoice_number_raw"], "15733");
  }

  // ── /health ────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn health_reports_counts() {
    let store = make_store().await;
    let resp = oneshot(store, "GET", "/health", None, "").await;
    assert_eq!(resp.status(), StatusCode::OK);
    let json = body_json(resp).await;
    assert_eq!(json["status"], "ok");
    assert_eq!(json["reference_rows"], 2);
    assert_eq!(json["records"], 0);
  }
}
