//! Configuration and wiring for the `nfcheck` binary.

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use axum::Router;
use nfcheck_api::Backend;
use nfcheck_core::Validator;
use serde::Deserialize;
use tower_http::trace::TraceLayer;

/// Prefix for environment overrides, e.g. `NFCHECK_PORT=8080`.
pub const ENV_PREFIX: &str = "NFCHECK";

// ─── Configuration ───────────────────────────────────────────────────────────

/// Server settings, read from TOML and overridden by the environment.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
  pub host:       String,
  pub port:       u16,
  pub store_path: PathBuf,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:       "0.0.0.0".to_string(),
      port:       5000,
      store_path: PathBuf::from("data/registros.db"),
    }
  }
}

impl ServerConfig {
  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }

  /// `store_path` with a leading `~/` expanded.
  pub fn resolved_store_path(&self) -> PathBuf { expand_tilde(&self.store_path) }
}

/// Load configuration from `path` (optional) layered under `NFCHECK_*`
/// environment variables.
pub fn load_config(path: &Path) -> Result<ServerConfig, config::ConfigError> {
  config::Config::builder()
    .add_source(config::File::from(path.to_path_buf()).required(false))
    .add_source(config::Environment::with_prefix(ENV_PREFIX))
    .build()?
    .try_deserialize()
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}

// ─── Application ─────────────────────────────────────────────────────────────

/// The full HTTP application: the API router plus request tracing.
pub fn app<S: Backend>(store: Arc<S>) -> Router {
  nfcheck_api::api_router(store, Validator::default())
    .layer(TraceLayer::new_for_http())
}
