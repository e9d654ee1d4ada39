//! Contact validation — a pure predicate over the candidate draft plus the
//! persisted-state uniqueness answer.
//!
//! All rules are evaluated; errors accumulate per field rather than
//! short-circuiting. Phones are accepted as-is (permissive nested input).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::contact::ContactDraft;

/// Message attached to a missing required attribute.
pub const BLANK: &str = "can't be blank";
/// Message attached to an email already held by another contact.
pub const TAKEN: &str = "has already been taken";

// ─── Fields ──────────────────────────────────────────────────────────────────

/// The contact attributes validation can fault.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Field {
  Firstname,
  Lastname,
  Email,
}

// ─── FieldErrors ─────────────────────────────────────────────────────────────

/// Accumulated validation messages, keyed by field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<Field, Vec<String>>);

impl FieldErrors {
  pub fn add(&mut self, field: Field, message: &str) {
    self.0.entry(field).or_default().push(message.to_owned());
  }

  pub fn is_empty(&self) -> bool { self.0.is_empty() }

  /// Messages recorded against one field; empty slice if none.
  pub fn on(&self, field: Field) -> &[String] {
    self.0.get(&field).map(Vec::as_slice).unwrap_or(&[])
  }
}

// ─── ValidationResult ────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationResult {
  Valid,
  Invalid(FieldErrors),
}

/// Validate a candidate draft.
///
/// `email_taken` is the uniqueness answer for `draft.email` against currently
/// persisted contacts, excluding the contact being updated when updating. The
/// caller obtains it from the store; the check itself stays pure.
pub fn validate(draft: &ContactDraft, email_taken: bool) -> ValidationResult {
  let mut errors = FieldErrors::default();

  if draft.firstname.is_empty() {
    errors.add(Field::Firstname, BLANK);
  }
  if draft.lastname.is_empty() {
    errors.add(Field::Lastname, BLANK);
  }
  if draft.email.is_empty() {
    errors.add(Field::Email, BLANK);
  }
  if !draft.email.is_empty() && email_taken {
    errors.add(Field::Email, TAKEN);
  }

  if errors.is_empty() {
    ValidationResult::Valid
  } else {
    ValidationResult::Invalid(errors)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::contact::{Phone, PhoneType};

  fn draft() -> ContactDraft {
    ContactDraft {
      firstname: "Jane".into(),
      lastname:  "Doe".into(),
      email:     "jane@example.com".into(),
      phones:    vec![],
    }
  }

  #[test]
  fn accepts_a_complete_draft() {
    assert_eq!(validate(&draft(), false), ValidationResult::Valid);
  }

  #[test]
  fn rejects_blank_required_fields_accumulating_errors() {
    let empty = ContactDraft::default();
    let ValidationResult::Invalid(errors) = validate(&empty, false) else {
      panic!("expected Invalid");
    };
    assert_eq!(errors.on(Field::Firstname), [BLANK]);
    assert_eq!(errors.on(Field::Lastname), [BLANK]);
    assert_eq!(errors.on(Field::Email), [BLANK]);
  }

  #[test]
  fn rejects_a_taken_email() {
    let ValidationResult::Invalid(errors) = validate(&draft(), true) else {
      panic!("expected Invalid");
    };
    assert_eq!(errors.on(Field::Email), [TAKEN]);
    assert!(errors.on(Field::Firstname).is_empty());
  }

  #[test]
  fn blank_email_reports_blank_not_taken() {
    let mut d = draft();
    d.email.clear();
    let ValidationResult::Invalid(errors) = validate(&d, true) else {
      panic!("expected Invalid");
    };
    assert_eq!(errors.on(Field::Email), [BLANK]);
  }

  #[test]
  fn phones_are_not_validated() {
    let mut d = draft();
    d.phones = vec![Phone {
      number:     String::new(),
      phone_type: PhoneType::Other("carrier pigeon".into()),
    }];
    assert_eq!(validate(&d, false), ValidationResult::Valid);
  }
}
