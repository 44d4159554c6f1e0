//! HTTP server wiring for Rolo.
//!
//! Mounts the JSON API from [`rolo_api`] behind request-id and tracing
//! middleware, and adds a liveness probe.

use std::path::{Path, PathBuf};

use axum::{
  Json,
  Router,
  body::Body,
  http::Request,
  routing::get,
};
use rolo_api::ApiState;
use rolo_core::{birthday::DEFAULT_WINDOW_DAYS, store::ContactStore};
use serde::Deserialize;
use serde_json::{Value, json};
use tower_http::{
  request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
  trace::TraceLayer,
};

/// Environment variables with this prefix override config file values,
/// e.g. `ROLO_PORT=9000`.
pub const ENV_PREFIX: &str = "ROLO";

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and the
/// environment. Every field has a default.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
  pub host:                 String,
  pub port:                 u16,
  pub store_path:           PathBuf,
  pub birthday_window_days: u32,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:                 "127.0.0.1".to_string(),
      port:                 8000,
      store_path:           PathBuf::from("rolo.sqlite3"),
      birthday_window_days: DEFAULT_WINDOW_DAYS,
    }
  }
}

impl ServerConfig {
  /// Layer the optional TOML file at `path` under `ROLO_*` variables.
  pub fn load(path: &Path) -> Result<Self, config::ConfigError> {
    config::Config::builder()
      .add_source(config::File::from(path).required(false))
      .add_source(config::Environment::with_prefix(ENV_PREFIX))
      .build()?
      .try_deserialize()
  }

  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the complete application: API routes, `/health`, and middleware.
///
/// Every response carries an `x-request-id` header (generated unless the
/// client sent one), and the id is recorded on the request's tracing span.
pub fn app<S>(state: ApiState<S>) -> Router
where
  S: ContactStore + 'static,
{
  Router::new()
    .route("/health", get(health))
    .merge(rolo_api::api_router(state))
    .layer(PropagateRequestIdLayer::x_request_id())
    .layer(TraceLayer::new_for_http().make_span_with(|req: &Request<Body>| {
      let request_id = req
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("-");
      tracing::info_span!(
        "request",
        method = %req.method(),
        uri = %req.uri(),
        request_id,
      )
    }))
    .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
}

async fn health() -> Json<Value> { Json(json!({ "status": "ok" })) }

// ─── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;
  use std::sync::Arc;

  use axum::http::StatusCode;
  use rolo_store_sqlite::SqliteStore;
  use tower::ServiceExt as _;

  async fn test_app() -> Router {
    let store = SqliteStore::open_in_memory().await.unwrap();
    app(ApiState::new(Arc::new(store)))
  }

  async fn get_uri(app: Router, uri: &str) -> axum::response::Response {
    let req = Request::builder().uri(uri).body(Body::empty()).unwrap();
    app.oneshot(req).await.unwrap()
  }

  #[tokio::test]
  async fn health_returns_ok_with_request_id() {
    let resp = get_uri(test_app().await, "/health").await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.headers().contains_key("x-request-id"));

    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body, json!({ "status": "ok" }));
  }

  #[tokio::test]
  async fn client_request_id_is_propagated() {
    let req = Request::builder()
      .uri("/contacts/")
      .header("x-request-id", "abc-123")
      .body(Body::empty())
      .unwrap();
    let resp = test_app().await.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers()["x-request-id"], "abc-123");
  }

  #[tokio::test]
  async fn unknown_route_is_404() {
    let resp = get_uri(test_app().await, "/nope").await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  }

  #[test]
  fn missing_config_file_yields_defaults() {
    let path = std::env::temp_dir().join("rolo-config-that-does-not-exist.toml");
    let cfg = ServerConfig::load(&path).unwrap();
    assert_eq!(cfg.birthday_window_days, DEFAULT_WINDOW_DAYS);
    assert_eq!(cfg.host, ServerConfig::default().host);
  }

  #[test]
  fn config_file_overrides_defaults() {
    let path = std::env::temp_dir()
      .join(format!("rolo-config-{}.toml", std::process::id()));
    std::fs::write(
      &path,
      "host = \"0.0.0.0\"\nstore_path = \"/tmp/contacts.db\"\nbirthday_window_days = 14\n",
    )
    .unwrap();

    let cfg = ServerConfig::load(&path).unwrap();
    std::fs::remove_file(&path).ok();

    assert_eq!(cfg.host, "0.0.0.0");
    assert_eq!(cfg.store_path, PathBuf::from("/tmp/contacts.db"));
    assert_eq!(cfg.birthday_window_days, 14);
    assert_eq!(cfg.address(), format!("0.0.0.0:{}", cfg.port));
  }
}
