//! HTTP shell for the Rolodex contact directory.
//!
//! Exposes an axum [`Router`] over any [`rolodex_core::store::ContactStore`].
//! Session establishment is the caller's responsibility: upstream middleware
//! inserts the resolved [`rolodex_core::policy::Identity`] as a request
//! extension, and requests without one are treated as guests.

pub mod contacts;
pub mod error;
pub mod identity;

pub use error::ApiError;

use std::{path::PathBuf, sync::Arc};

use axum::{
  Router,
  routing::get,
};
use rolodex_core::{Directory, store::ContactStore};
use serde::Deserialize;
use tower_http::trace::TraceLayer;

// ─── Configuration ───────────────────────────────────────────────────────────

fn default_login_path() -> String { "/login".to_owned() }

/// Runtime server configuration, deserialised from `config.toml`.
#[derive(Deserialize, Clone)]
pub struct ServerConfig {
  pub host:       String,
  pub port:       u16,
  pub store_path: PathBuf,
  /// Where policy denials redirect to.
  #[serde(default = "default_login_path")]
  pub login_path: String,
}

// ─── Application state ───────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
pub struct AppState<S> {
  pub directory: Arc<Directory<S>>,
  pub config:    Arc<ServerConfig>,
}

impl<S> Clone for AppState<S> {
  fn clone(&self) -> Self {
    Self {
      directory: Arc::clone(&self.directory),
      config:    Arc::clone(&self.config),
    }
  }
}

// ─── Router ──────────────────────────────────────────────────────────────────

/// Build an axum [`Router`] serving the seven contact actions.
pub fn router<S>(state: AppState<S>) -> Router
where
  S: ContactStore + Send + Sync + 'static,
{
  Router::new()
    .route(
      "/contacts",
      get(contacts::list::<S>).post(contacts::create::<S>),
    )
    .route("/contacts/new", get(contacts::new_form::<S>))
    .route(
      "/contacts/{id}",
      get(contacts::show::<S>)
        .put(contacts::update::<S>)
        .delete(contacts::destroy::<S>),
    )
    .route("/contacts/{id}/edit", get(contacts::edit::<S>))
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}
