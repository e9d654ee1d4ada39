//! Caller-identity extractor.
//!
//! Session establishment is owned by an external collaborator: upstream
//! middleware resolves credentials and inserts an [`Identity`] request
//! extension. This extractor only reads the classification; a request with no
//! extension is a guest.

use std::convert::Infallible;

use axum::{extract::FromRequestParts, http::request::Parts};
use rolodex_core::policy::Identity;

/// The resolved identity of the current request.
#[derive(Debug, Clone, Copy)]
pub struct CallerIdentity(pub Identity);

impl<St> FromRequestParts<St> for CallerIdentity
where
  St: Send + Sync,
{
  type Rejection = Infallible;

  async fn from_request_parts(
    parts: &mut Parts,
    _state: &St,
  ) -> Result<Self, Self::Rejection> {
    Ok(Self(
      parts
        .extensions
        .get::<Identity>()
        .copied()
        .unwrap_or(Identity::Guest),
    ))
  }
}
