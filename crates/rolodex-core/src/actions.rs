//! Orchestration of the seven contact actions.
//!
//! Every action asks the access policy for a verdict first; only on `Allow`
//! does it touch the store or the directory query. Outcomes are handed to the
//! external rendering collaborator: an entity, a field-error set, or an
//! implied redirect target.

use uuid::Uuid;

use crate::{
  contact::{Contact, ContactDraft},
  error::ActionError,
  policy::{ContactAction, Identity, Verdict, verdict},
  query,
  store::{ContactStore, WriteOutcome},
  validate::{Field, FieldErrors, TAKEN, ValidationResult, validate},
};

// ─── Submission outcome ──────────────────────────────────────────────────────

/// Outcome of a create or update submission.
#[derive(Debug, Clone)]
pub enum Submission {
  /// Persisted; the shell redirects to the contact's show view.
  Accepted(Contact),
  /// Validation failed; re-present the form with the echoed draft and the
  /// accumulated errors. No write occurred.
  Rejected {
    draft:  ContactDraft,
    errors: FieldErrors,
  },
}

// ─── Directory ───────────────────────────────────────────────────────────────

/// The contact directory, bound to a persistence backend.
#[derive(Debug, Clone)]
pub struct Directory<S> {
  store: S,
}

impl<S: ContactStore> Directory<S> {
  pub fn new(store: S) -> Self { Self { store } }

  fn authorize(
    &self,
    identity: Identity,
    action: ContactAction,
  ) -> Result<(), ActionError<S::Error>> {
    match verdict(identity, action) {
      Verdict::Allow => Ok(()),
      Verdict::RequireLogin => Err(ActionError::RequireLogin),
    }
  }

  /// List contacts, optionally restricted to an initial letter, ordered by
  /// lastname then firstname.
  pub async fn list(
    &self,
    identity: Identity,
    letter: Option<char>,
  ) -> Result<Vec<Contact>, ActionError<S::Error>> {
    self.authorize(identity, ContactAction::List)?;
    let contacts =
      self.store.list_contacts().await.map_err(ActionError::Store)?;
    Ok(query::filtered(contacts, letter))
  }

  /// Look up one contact for display.
  pub async fn show(
    &self,
    identity: Identity,
    id: Uuid,
  ) -> Result<Contact, ActionError<S::Error>> {
    self.authorize(identity, ContactAction::Show)?;
    self
      .store
      .get_contact(id)
      .await
      .map_err(ActionError::Store)?
      .ok_or(ActionError::NotFound(id))
  }

  /// An unsaved draft pre-populated with home, office, and mobile slots.
  pub fn new_contact(
    &self,
    identity: Identity,
  ) -> Result<ContactDraft, ActionError<S::Error>> {
    self.authorize(identity, ContactAction::New)?;
    Ok(ContactDraft::template())
  }

  /// Validate and persist a new contact with its phones atomically.
  pub async fn create(
    &self,
    identity: Identity,
    draft: ContactDraft,
  ) -> Result<Submission, ActionError<S::Error>> {
    self.authorize(identity, ContactAction::Create)?;

    let email_taken = self
      .store
      .email_taken(&draft.email, None)
      .await
      .map_err(ActionError::Store)?;

    if let ValidationResult::Invalid(errors) = validate(&draft, email_taken) {
      return Ok(Submission::Rejected { draft, errors });
    }

    match self
      .store
      .insert_contact(draft.clone())
      .await
      .map_err(ActionError::Store)?
    {
      WriteOutcome::Written(contact) => Ok(Submission::Accepted(contact)),
      // Lost the uniqueness race after the probe passed.
      WriteOutcome::EmailTaken => Ok(Submission::Rejected {
        draft,
        errors: email_taken_errors(),
      }),
    }
  }

  /// Look up one contact for form display.
  pub async fn edit(
    &self,
    identity: Identity,
    id: Uuid,
  ) -> Result<Contact, ActionError<S::Error>> {
    self.authorize(identity, ContactAction::Edit)?;
    self
      .store
      .get_contact(id)
      .await
      .map_err(ActionError::Store)?
      .ok_or(ActionError::NotFound(id))
  }

  /// Full-replace update: validate the complete proposed post-update state,
  /// then swap atomically. On rejection the persisted contact is unchanged.
  pub async fn update(
    &self,
    identity: Identity,
    id: Uuid,
    draft: ContactDraft,
  ) -> Result<Submission, ActionError<S::Error>> {
    self.authorize(identity, ContactAction::Update)?;

    self
      .store
      .get_contact(id)
      .await
      .map_err(ActionError::Store)?
      .ok_or(ActionError::NotFound(id))?;

    let email_taken = self
      .store
      .email_taken(&draft.email, Some(id))
      .await
      .map_err(ActionError::Store)?;

    if let ValidationResult::Invalid(errors) = validate(&draft, email_taken) {
      return Ok(Submission::Rejected { draft, errors });
    }

    match self
      .store
      .replace_contact(id, draft.clone())
      .await
      .map_err(ActionError::Store)?
    {
      None => Err(ActionError::NotFound(id)),
      Some(WriteOutcome::Written(contact)) => Ok(Submission::Accepted(contact)),
      Some(WriteOutcome::EmailTaken) => Ok(Submission::Rejected {
        draft,
        errors: email_taken_errors(),
      }),
    }
  }

  /// Delete a contact and its phones. Destroying an already-destroyed
  /// identifier fails `NotFound`, never silently succeeds.
  pub async fn destroy(
    &self,
    identity: Identity,
    id: Uuid,
  ) -> Result<(), ActionError<S::Error>> {
    self.authorize(identity, ContactAction::Destroy)?;

    if self
      .store
      .delete_contact(id)
      .await
      .map_err(ActionError::Store)?
    {
      Ok(())
    } else {
      Err(ActionError::NotFound(id))
    }
  }
}

fn email_taken_errors() -> FieldErrors {
  let mut errors = FieldErrors::default();
  errors.add(Field::Email, TAKEN);
  errors
}

#[cfg(test)]
mod tests {
  use std::{convert::Infallible, sync::Mutex};

  use chrono::Utc;
  use uuid::Uuid;

  use super::*;
  use crate::contact::{Phone, PhoneType};

  /// In-memory store with the same atomicity contract as a real backend.
  #[derive(Default)]
  struct MemStore {
    contacts: Mutex<Vec<Contact>>,
  }

  fn materialize(draft: ContactDraft, id: Uuid) -> Contact {
    Contact {
      contact_id: id,
      firstname:  draft.firstname,
      lastname:   draft.lastname,
      email:      draft.email,
      phones:     draft.phones,
      created_at: Utc::now(),
    }
  }

  impl ContactStore for MemStore {
    type Error = Infallible;

    async fn insert_contact(
      &self,
      draft: ContactDraft,
    ) -> Result<WriteOutcome, Infallible> {
      let mut contacts = self.contacts.lock().unwrap();
      if contacts.iter().any(|c| c.email == draft.email) {
        return Ok(WriteOutcome::EmailTaken);
      }
      let contact = materialize(draft, Uuid::new_v4());
      contacts.push(contact.clone());
      Ok(WriteOutcome::Written(contact))
    }

    async fn get_contact(&self, id: Uuid) -> Result<Option<Contact>, Infallible> {
      let contacts = self.contacts.lock().unwrap();
      Ok(contacts.iter().find(|c| c.contact_id == id).cloned())
    }

    async fn list_contacts(&self) -> Result<Vec<Contact>, Infallible> {
      Ok(self.contacts.lock().unwrap().clone())
    }

    async fn email_taken(
      &self,
      email: &str,
      exclude: Option<Uuid>,
    ) -> Result<bool, Infallible> {
      let contacts = self.contacts.lock().unwrap();
      Ok(
        contacts
          .iter()
          .any(|c| c.email == email && Some(c.contact_id) != exclude),
      )
    }

    async fn replace_contact(
      &self,
      id: Uuid,
      draft: ContactDraft,
    ) -> Result<Option<WriteOutcome>, Infallible> {
      let mut contacts = self.contacts.lock().unwrap();
      if contacts
        .iter()
        .any(|c| c.email == draft.email && c.contact_id != id)
      {
        return Ok(Some(WriteOutcome::EmailTaken));
      }
      let Some(slot) =
        contacts.iter_mut().find(|c| c.contact_id == id)
      else {
        return Ok(None);
      };
      let created_at = slot.created_at;
      *slot = materialize(draft, id);
      slot.created_at = created_at;
      Ok(Some(WriteOutcome::Written(slot.clone())))
    }

    async fn delete_contact(&self, id: Uuid) -> Result<bool, Infallible> {
      let mut contacts = self.contacts.lock().unwrap();
      let before = contacts.len();
      contacts.retain(|c| c.contact_id != id);
      Ok(contacts.len() != before)
    }
  }

  fn directory() -> Directory<MemStore> { Directory::new(MemStore::default()) }

  fn draft(firstname: &str, lastname: &str, email: &str) -> ContactDraft {
    ContactDraft {
      firstname: firstname.into(),
      lastname:  lastname.into(),
      email:     email.into(),
      phones:    vec![
        Phone { number: "555-0100".into(), phone_type: PhoneType::Home },
        Phone { number: "555-0101".into(), phone_type: PhoneType::Office },
        Phone { number: "555-0102".into(), phone_type: PhoneType::Mobile },
      ],
    }
  }

  async fn seeded(dir: &Directory<MemStore>, lastname: &str) -> Contact {
    let email = format!("{}@example.com", lastname.to_lowercase());
    match dir
      .create(Identity::User, draft("Alex", lastname, &email))
      .await
      .unwrap()
    {
      Submission::Accepted(c) => c,
      Submission::Rejected { errors, .. } => panic!("seed rejected: {errors:?}"),
    }
  }

  // ── Policy gating ─────────────────────────────────────────────────────────

  #[tokio::test]
  async fn guest_mutations_require_login() {
    let dir = directory();
    let existing = seeded(&dir, "Smith").await;

    assert!(matches!(
      dir.new_contact(Identity::Guest),
      Err(ActionError::RequireLogin)
    ));
    assert!(matches!(
      dir.create(Identity::Guest, draft("A", "B", "a@b.c")).await,
      Err(ActionError::RequireLogin)
    ));
    assert!(matches!(
      dir.edit(Identity::Guest, existing.contact_id).await,
      Err(ActionError::RequireLogin)
    ));
    assert!(matches!(
      dir
        .update(Identity::Guest, existing.contact_id, draft("A", "B", "a@b.c"))
        .await,
      Err(ActionError::RequireLogin)
    ));
    assert!(matches!(
      dir.destroy(Identity::Guest, existing.contact_id).await,
      Err(ActionError::RequireLogin)
    ));
  }

  #[tokio::test]
  async fn guest_reads_are_public() {
    let dir = directory();
    let existing = seeded(&dir, "Smith").await;

    assert_eq!(dir.list(Identity::Guest, None).await.unwrap().len(), 1);
    let shown = dir.show(Identity::Guest, existing.contact_id).await.unwrap();
    assert_eq!(shown.contact_id, existing.contact_id);
  }

  // ── List ──────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn list_filters_and_orders_by_lastname() {
    let dir = directory();
    seeded(&dir, "Smith").await;
    seeded(&dir, "Jones").await;
    seeded(&dir, "Johnson").await;

    let js = dir.list(Identity::Guest, Some('J')).await.unwrap();
    let lastnames: Vec<&str> =
      js.iter().map(|c| c.lastname.as_str()).collect();
    assert_eq!(lastnames, ["Johnson", "Jones"]);

    let all = dir.list(Identity::Guest, None).await.unwrap();
    let lastnames: Vec<&str> =
      all.iter().map(|c| c.lastname.as_str()).collect();
    assert_eq!(lastnames, ["Johnson", "Jones", "Smith"]);
  }

  // ── New ───────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn new_contact_offers_three_typed_slots() {
    let dir = directory();
    let template = dir.new_contact(Identity::User).unwrap();

    let mut labels: Vec<&str> =
      template.phones.iter().map(|p| p.phone_type.label()).collect();
    labels.sort();
    assert_eq!(labels, ["home", "mobile", "office"]);
  }

  // ── Create ────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn create_persists_contact_and_phones() {
    let dir = directory();
    let contact = seeded(&dir, "Capucha").await;

    let stored = dir.show(Identity::User, contact.contact_id).await.unwrap();
    assert_eq!(stored.phones.len(), 3);
    assert_eq!(stored.name(), "Alex Capucha");
  }

  #[tokio::test]
  async fn create_with_blank_firstname_persists_nothing() {
    let dir = directory();
    let result = dir
      .create(Identity::User, draft("", "Doe", "doe@example.com"))
      .await
      .unwrap();

    let Submission::Rejected { errors, .. } = result else {
      panic!("expected rejection");
    };
    assert_eq!(errors.on(Field::Firstname), [crate::validate::BLANK]);
    assert!(dir.list(Identity::User, None).await.unwrap().is_empty());
  }

  #[tokio::test]
  async fn create_with_taken_email_is_rejected() {
    let dir = directory();
    seeded(&dir, "Smith").await;

    let result = dir
      .create(Identity::User, draft("Jane", "Doe", "smith@example.com"))
      .await
      .unwrap();
    let Submission::Rejected { errors, .. } = result else {
      panic!("expected rejection");
    };
    assert_eq!(errors.on(Field::Email), [TAKEN]);
    assert_eq!(dir.list(Identity::User, None).await.unwrap().len(), 1);
  }

  // ── Update ────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn update_replaces_attributes_and_phones_wholesale() {
    let dir = directory();
    let contact = seeded(&dir, "Smith").await;

    let mut replacement = draft("Larry", "Capucha", "larry@example.com");
    replacement.phones =
      vec![Phone { number: "555-0199".into(), phone_type: PhoneType::Mobile }];

    let result = dir
      .update(Identity::User, contact.contact_id, replacement)
      .await
      .unwrap();
    let Submission::Accepted(updated) = result else {
      panic!("expected acceptance");
    };
    assert_eq!(updated.name(), "Larry Capucha");

    let stored = dir.show(Identity::User, contact.contact_id).await.unwrap();
    assert_eq!(stored.phones.len(), 1);
    assert_eq!(stored.phones[0].number, "555-0199");
  }

  #[tokio::test]
  async fn rejected_update_leaves_persisted_state_untouched() {
    let dir = directory();
    let target = seeded(&dir, "Smith").await;
    seeded(&dir, "Jones").await;

    let before = dir.show(Identity::User, target.contact_id).await.unwrap();

    // Email collides with the Jones contact.
    let result = dir
      .update(
        Identity::User,
        target.contact_id,
        draft("Alex", "Smith", "jones@example.com"),
      )
      .await
      .unwrap();
    assert!(matches!(result, Submission::Rejected { .. }));

    let after = dir.show(Identity::User, target.contact_id).await.unwrap();
    assert_eq!(after, before);
  }

  #[tokio::test]
  async fn update_missing_contact_is_not_found() {
    let dir = directory();
    let err = dir
      .update(Identity::User, Uuid::new_v4(), draft("A", "B", "a@b.c"))
      .await
      .unwrap_err();
    assert!(matches!(err, ActionError::NotFound(_)));
  }

  // ── Destroy ───────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn destroy_removes_contact_then_lookup_fails() {
    let dir = directory();
    let contact = seeded(&dir, "Smith").await;

    dir.destroy(Identity::User, contact.contact_id).await.unwrap();

    assert!(matches!(
      dir.show(Identity::User, contact.contact_id).await,
      Err(ActionError::NotFound(_))
    ));

    // Destroying again is NotFound, not a silent success.
    assert!(matches!(
      dir.destroy(Identity::User, contact.contact_id).await,
      Err(ActionError::NotFound(_))
    ));
  }
}
