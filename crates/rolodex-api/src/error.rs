//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  response::{IntoResponse, Redirect, Response},
  http::StatusCode,
};
use serde_json::json;
use thiserror::Error;
use uuid::Uuid;

use rolodex_core::ActionError;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  /// Policy denial — always resolved as a redirect to the login entry point.
  #[error("login required")]
  RequireLogin { login: String },

  #[error("contact not found: {0}")]
  NotFound(Uuid),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ApiError {
  /// Lift an orchestration failure, resolving the login redirect target.
  pub fn from_action<E>(err: ActionError<E>, login_path: &str) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    match err {
      ActionError::RequireLogin => {
        Self::RequireLogin { login: login_path.to_owned() }
      }
      ActionError::NotFound(id) => Self::NotFound(id),
      ActionError::Store(e) => Self::Store(Box::new(e)),
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    match self {
      ApiError::RequireLogin { login } => {
        Redirect::to(&login).into_response()
      }
      ApiError::NotFound(id) => (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": format!("contact {id} not found") })),
      )
        .into_response(),
      ApiError::Store(e) => (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": e.to_string() })),
      )
        .into_response(),
    }
  }
}
