//! The `ContactStore` trait — the persistence collaborator contract.
//!
//! Implemented by storage backends (e.g. `rolodex-store-sqlite`). Higher
//! layers depend on this abstraction, not on any concrete backend.

use std::future::Future;

use uuid::Uuid;

use crate::contact::{Contact, ContactDraft};

// ─── Write outcome ───────────────────────────────────────────────────────────

/// Result of a contact write that may lose the email-uniqueness race.
///
/// Validation probes [`ContactStore::email_taken`] before writing, but two
/// concurrent submissions can both pass the probe; the store's own uniqueness
/// constraint is the arbiter, and exactly one writer observes `EmailTaken`.
#[derive(Debug, Clone)]
pub enum WriteOutcome {
  Written(Contact),
  EmailTaken,
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over contact persistence.
///
/// Contact and phone rows are written atomically: a contact's phones are
/// inserted, replaced, and deleted in the same transaction as the contact
/// itself, so phones never outlive their contact.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait ContactStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Persist a new contact and its phones; the store assigns the identifier.
  fn insert_contact(
    &self,
    draft: ContactDraft,
  ) -> impl Future<Output = Result<WriteOutcome, Self::Error>> + Send + '_;

  /// Retrieve a contact by identifier. Returns `None` if not found.
  fn get_contact(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Contact>, Self::Error>> + Send + '_;

  /// All persisted contacts, in no particular order. Filtering and ordering
  /// belong to [`crate::query`].
  fn list_contacts(
    &self,
  ) -> impl Future<Output = Result<Vec<Contact>, Self::Error>> + Send + '_;

  /// Whether `email` is held by a persisted contact other than `exclude`.
  fn email_taken<'a>(
    &'a self,
    email: &'a str,
    exclude: Option<Uuid>,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + 'a;

  /// Replace a contact's attributes and phone rows wholesale. Returns `None`
  /// if the contact does not exist. On `EmailTaken` the stored contact is
  /// left untouched.
  fn replace_contact(
    &self,
    id: Uuid,
    draft: ContactDraft,
  ) -> impl Future<Output = Result<Option<WriteOutcome>, Self::Error>> + Send + '_;

  /// Delete a contact and its phones in one transaction. Returns `false` if
  /// the contact does not exist.
  fn delete_contact(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;
}
