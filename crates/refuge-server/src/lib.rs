//! Wiring for the Refuge HTTP server: configuration, store opening and the
//! top-level router.

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use anyhow::Context as _;
use axum::Router;
use refuge_core::store::ShelterStore;
use refuge_store_sqlite::SqliteStore;
use serde::Deserialize;
use tower_http::trace::TraceLayer;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `REFUGE_*` environment variables.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:       String,
  #[serde(default = "default_port")]
  pub port:       u16,
  /// `:memory:` selects a throwaway in-memory database.
  #[serde(default = "default_store_path")]
  pub store_path: PathBuf,
}

fn default_host() -> String { "127.0.0.1".to_string() }

fn default_port() -> u16 { 8000 }

fn default_store_path() -> PathBuf { PathBuf::from("refuge.db") }

impl ServerConfig {
  /// Layer the optional TOML file at `path` under the environment.
  pub fn load(path: &Path) -> anyhow::Result<Self> {
    config::Config::builder()
      .add_source(config::File::from(path).required(false))
      .add_source(config::Environment::with_prefix("REFUGE"))
      .build()
      .context("failed to read config file")?
      .try_deserialize()
      .context("failed to deserialise ServerConfig")
  }

  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }
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

/// Open the configured store, creating the schema if needed.
pub async fn open_store(path: &Path) -> anyhow::Result<SqliteStore> {
  if path == Path::new(":memory:") {
    tracing::warn!("using an in-memory store; nothing will be persisted");
    return SqliteStore::open_in_memory()
      .await
      .context("failed to open in-memory store");
  }

  let path = expand_tilde(path);
  SqliteStore::open(&path)
    .await
    .with_context(|| format!("failed to open store at {path:?}"))
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// The API mounted under `/api`, with request tracing.
pub fn app<S>(store: Arc<S>) -> Router
where
  S: ShelterStore + 'static,
{
  Router::new()
    .nest("/api", refuge_api::api_router(store))
    .layer(TraceLayer::new_for_http())
}
