//! Handlers for `/contacts` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/contacts` | Optional `?letter=<single char>` |
//! | `GET`    | `/contacts/new` | Unsaved draft with three phone slots |
//! | `POST`   | `/contacts` | 303 to show on success, 422 with errors |
//! | `GET`    | `/contacts/:id` | 404 if not found |
//! | `GET`    | `/contacts/:id/edit` | Current contact for the form |
//! | `PUT`    | `/contacts/:id` | Full replace; same outcomes as create |
//! | `DELETE` | `/contacts/:id` | 303 to the list |
//!
//! Guests get a 303 to the configured login path on every mutating route.

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use rolodex_core::{
  actions::Submission,
  contact::{Contact, ContactDraft},
  store::ContactStore,
};

use crate::{AppState, error::ApiError, identity::CallerIdentity};

fn show_path(id: Uuid) -> String { format!("/contacts/{id}") }

/// 422 with the accumulated field errors and the echoed draft, so the form
/// can be re-presented with prior input preserved.
fn rejection(draft: ContactDraft, errors: rolodex_core::validate::FieldErrors) -> Response {
  (
    StatusCode::UNPROCESSABLE_ENTITY,
    Json(json!({ "errors": errors, "contact": draft })),
  )
    .into_response()
}

// ─── List ────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ListParams {
  pub letter: Option<char>,
}

/// `GET /contacts[?letter=<char>]`
pub async fn list<S>(
  State(state): State<AppState<S>>,
  CallerIdentity(identity): CallerIdentity,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<Contact>>, ApiError>
where
  S: ContactStore + Send + Sync + 'static,
{
  let contacts = state
    .directory
    .list(identity, params.letter)
    .await
    .map_err(|e| ApiError::from_action(e, &state.config.login_path))?;
  Ok(Json(contacts))
}

// ─── Show ────────────────────────────────────────────────────────────────────

/// `GET /contacts/:id`
pub async fn show<S>(
  State(state): State<AppState<S>>,
  CallerIdentity(identity): CallerIdentity,
  Path(id): Path<Uuid>,
) -> Result<Json<Contact>, ApiError>
where
  S: ContactStore + Send + Sync + 'static,
{
  let contact = state
    .directory
    .show(identity, id)
    .await
    .map_err(|e| ApiError::from_action(e, &state.config.login_path))?;
  Ok(Json(contact))
}

// ─── New ─────────────────────────────────────────────────────────────────────

/// `GET /contacts/new`
pub async fn new_form<S>(
  State(state): State<AppState<S>>,
  CallerIdentity(identity): CallerIdentity,
) -> Result<Json<ContactDraft>, ApiError>
where
  S: ContactStore + Send + Sync + 'static,
{
  let draft = state
    .directory
    .new_contact(identity)
    .map_err(|e| ApiError::from_action(e, &state.config.login_path))?;
  Ok(Json(draft))
}

// ─── Create ──────────────────────────────────────────────────────────────────

/// `POST /contacts`
pub async fn create<S>(
  State(state): State<AppState<S>>,
  CallerIdentity(identity): CallerIdentity,
  Json(draft): Json<ContactDraft>,
) -> Result<Response, ApiError>
where
  S: ContactStore + Send + Sync + 'static,
{
  let submission = state
    .directory
    .create(identity, draft)
    .await
    .map_err(|e| ApiError::from_action(e, &state.config.login_path))?;

  Ok(match submission {
    Submission::Accepted(contact) => {
      tracing::info!(contact_id = %contact.contact_id, "contact created");
      Redirect::to(&show_path(contact.contact_id)).into_response()
    }
    Submission::Rejected { draft, errors } => rejection(draft, errors),
  })
}

// ─── Edit ────────────────────────────────────────────────────────────────────

/// `GET /contacts/:id/edit`
pub async fn edit<S>(
  State(state): State<AppState<S>>,
  CallerIdentity(identity): CallerIdentity,
  Path(id): Path<Uuid>,
) -> Result<Json<Contact>, ApiError>
where
  S: ContactStore + Send + Sync + 'static,
{
  let contact = state
    .directory
    .edit(identity, id)
    .await
    .map_err(|e| ApiError::from_action(e, &state.config.login_path))?;
  Ok(Json(contact))
}

// ─── Update ──────────────────────────────────────────────────────────────────

/// `PUT /contacts/:id` — full replacement, nested phones included.
pub async fn update<S>(
  State(state): State<AppState<S>>,
  CallerIdentity(identity): CallerIdentity,
  Path(id): Path<Uuid>,
  Json(draft): Json<ContactDraft>,
) -> Result<Response, ApiError>
where
  S: ContactStore + Send + Sync + 'static,
{
  let submission = state
    .directory
    .update(identity, id, draft)
    .await
    .map_err(|e| ApiError::from_action(e, &state.config.login_path))?;

  Ok(match submission {
    Submission::Accepted(contact) => {
      Redirect::to(&show_path(contact.contact_id)).into_response()
    }
    Submission::Rejected { draft, errors } => rejection(draft, errors),
  })
}

// ─── Destroy ─────────────────────────────────────────────────────────────────

/// `DELETE /contacts/:id`
pub async fn destroy<S>(
  State(state): State<AppState<S>>,
  CallerIdentity(identity): CallerIdentity,
  Path(id): Path<Uuid>,
) -> Result<Redirect, ApiError>
where
  S: ContactStore + Send + Sync + 'static,
{
  state
    .directory
    .destroy(identity, id)
    .await
    .map_err(|e| ApiError::from_action(e, &state.config.login_path))?;
  tracing::info!(contact_id = %id, "contact destroyed");
  Ok(Redirect::to("/contacts"))
}
