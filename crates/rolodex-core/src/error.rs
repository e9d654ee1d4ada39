//! Error types for `rolodex-core`.

use thiserror::Error;
use uuid::Uuid;

/// Failure of an orchestrated contact action. Validation rejections are not
/// errors — they are a successful outcome carrying field errors back to the
/// form (see [`crate::actions::Submission`]).
#[derive(Debug, Error)]
pub enum ActionError<E> {
  /// The policy denied the action; resolve by redirecting to login.
  #[error("login required")]
  RequireLogin,

  #[error("contact not found: {0}")]
  NotFound(Uuid),

  /// Persistence-layer failure, propagated unchanged; fatal to the request.
  #[error("store error: {0}")]
  Store(#[source] E),
}
