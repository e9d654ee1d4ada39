//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! All timestamps are stored as RFC 3339 strings. Phone types are stored as
//! their plain label. UUIDs are stored as hyphenated lowercase strings.

use chrono::{DateTime, Utc};
use rolodex_core::contact::{Contact, Phone, PhoneType};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw strings read directly from a `contacts` row.
pub struct RawContact {
  pub contact_id: String,
  pub firstname:  String,
  pub lastname:   String,
  pub email:      String,
  pub created_at: String,
}

impl RawContact {
  pub fn into_contact(self, phones: Vec<RawPhone>) -> Result<Contact> {
    Ok(Contact {
      contact_id: decode_uuid(&self.contact_id)?,
      firstname:  self.firstname,
      lastname:   self.lastname,
      email:      self.email,
      phones:     phones.into_iter().map(RawPhone::into_phone).collect(),
      created_at: decode_dt(&self.created_at)?,
    })
  }
}

/// Raw strings read directly from a `phones` row.
pub struct RawPhone {
  pub phone_type: String,
  pub number:     String,
}

impl RawPhone {
  pub fn into_phone(self) -> Phone {
    Phone {
      number:     self.number,
      phone_type: PhoneType::from(self.phone_type),
    }
  }
}
