//! Contact and phone types — the data model of the directory.
//!
//! A contact owns its phones exclusively: phone rows are submitted, persisted,
//! and destroyed together with the owning contact, never through a separate
//! channel.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ─── PhoneType ───────────────────────────────────────────────────────────────

/// The label of a phone number. The new-contact flow seeds the three closed
/// variants; anything else submitted by a caller is kept verbatim as `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PhoneType {
  Home,
  Office,
  Mobile,
  Other(String),
}

impl PhoneType {
  /// The label as stored and displayed.
  pub fn label(&self) -> &str {
    match self {
      Self::Home => "home",
      Self::Office => "office",
      Self::Mobile => "mobile",
      Self::Other(s) => s,
    }
  }
}

impl From<String> for PhoneType {
  fn from(s: String) -> Self {
    match s.as_str() {
      "home" => Self::Home,
      "office" => Self::Office,
      "mobile" => Self::Mobile,
      _ => Self::Other(s),
    }
  }
}

impl From<PhoneType> for String {
  fn from(t: PhoneType) -> Self { t.label().to_owned() }
}

// ─── Phone ───────────────────────────────────────────────────────────────────

/// A typed phone number. No validation beyond structural acceptance — a blank
/// number or a free-form label is stored as submitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Phone {
  pub number:     String,
  pub phone_type: PhoneType,
}

impl Phone {
  /// An empty slot with the given label, as offered by the new-contact form.
  pub fn blank(phone_type: PhoneType) -> Self {
    Self { number: String::new(), phone_type }
  }
}

// ─── Contact ─────────────────────────────────────────────────────────────────

/// A persisted directory entry and its phones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
  pub contact_id: Uuid,
  pub firstname:  String,
  pub lastname:   String,
  pub email:      String,
  pub phones:     Vec<Phone>,
  /// Server-assigned; never accepted from callers.
  pub created_at: DateTime<Utc>,
}

impl Contact {
  /// Display name, always derived — `"{firstname} {lastname}"`.
  pub fn name(&self) -> String {
    format!("{} {}", self.firstname, self.lastname)
  }
}

// ─── ContactDraft ────────────────────────────────────────────────────────────

/// The submitted attribute set for create and update. Update semantics are
/// full replacement: the draft's phones supersede the stored rows wholesale.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactDraft {
  #[serde(default)]
  pub firstname: String,
  #[serde(default)]
  pub lastname:  String,
  #[serde(default)]
  pub email:     String,
  #[serde(default)]
  pub phones:    Vec<Phone>,
}

impl ContactDraft {
  /// The unsaved contact offered by the new-contact flow: all attributes
  /// blank, with one empty slot each for home, office, and mobile.
  pub fn template() -> Self {
    Self {
      phones: vec![
        Phone::blank(PhoneType::Home),
        Phone::blank(PhoneType::Office),
        Phone::blank(PhoneType::Mobile),
      ],
      ..Self::default()
    }
  }
}
