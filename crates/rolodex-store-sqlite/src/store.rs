//! [`SqliteStore`] — the SQLite implementation of [`ContactStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use rolodex_core::{
  contact::{Contact, ContactDraft},
  store::{ContactStore, WriteOutcome},
};

use crate::{
  Result,
  encode::{RawContact, RawPhone, decode_dt, encode_dt, encode_uuid},
  schema::SCHEMA,
};

/// `true` when an insert or update tripped the UNIQUE constraint on
/// `contacts.email` — the loser of a concurrent-submission race.
fn is_email_conflict(e: &rusqlite::Error) -> bool {
  matches!(e, rusqlite::Error::SqliteFailure(err, Some(msg))
    if err.code == rusqlite::ErrorCode::ConstraintViolation
      && msg.contains("contacts.email"))
}

/// Pre-encoded phone rows ready for insertion: (phone_id, phone_type, number).
fn encode_phones(contact: &Contact) -> Vec<(String, String, String)> {
  contact
    .phones
    .iter()
    .map(|p| {
      (
        encode_uuid(Uuid::new_v4()),
        p.phone_type.label().to_owned(),
        p.number.clone(),
      )
    })
    .collect()
}

/// Outcome of the replace transaction, carried out of the connection closure.
enum ReplaceRow {
  Written { created_at: String },
  EmailTaken,
  Missing,
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Rolodex contact store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Number of rows in the `phones` table; lets tests observe the cascade.
  #[cfg(test)]
  pub(crate) async fn phone_row_count(&self) -> Result<i64> {
    let count = self
      .conn
      .call(|conn| {
        Ok(conn.query_row("SELECT COUNT(*) FROM phones", [], |r| r.get(0))?)
      })
      .await?;
    Ok(count)
  }
}

// ─── ContactStore impl ───────────────────────────────────────────────────────

impl ContactStore for SqliteStore {
  type Error = crate::Error;

  async fn insert_contact(&self, draft: ContactDraft) -> Result<WriteOutcome> {
    let contact = Contact {
      contact_id: Uuid::new_v4(),
      firstname:  draft.firstname,
      lastname:   draft.lastname,
      email:      draft.email,
      phones:     draft.phones,
      created_at: Utc::now(),
    };

    let id_str     = encode_uuid(contact.contact_id);
    let at_str     = encode_dt(contact.created_at);
    let firstname  = contact.firstname.clone();
    let lastname   = contact.lastname.clone();
    let email      = contact.email.clone();
    let phone_rows = encode_phones(&contact);

    let written: bool = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        match tx.execute(
          "INSERT INTO contacts (contact_id, firstname, lastname, email, created_at)
           VALUES (?1, ?2, ?3, ?4, ?5)",
          rusqlite::params![id_str, firstname, lastname, email, at_str],
        ) {
          Ok(_) => {}
          // Rolls back via drop; the racing writer's row stands.
          Err(e) if is_email_conflict(&e) => return Ok(false),
          Err(e) => return Err(e.into()),
        }

        for (position, (phone_id, phone_type, number)) in
          phone_rows.iter().enumerate()
        {
          tx.execute(
            "INSERT INTO phones (phone_id, contact_id, phone_type, number, position)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            rusqlite::params![phone_id, id_str, phone_type, number, position as i64],
          )?;
        }

        tx.commit()?;
        Ok(true)
      })
      .await?;

    Ok(if written {
      WriteOutcome::Written(contact)
    } else {
      WriteOutcome::EmailTaken
    })
  }

  async fn get_contact(&self, id: Uuid) -> Result<Option<Contact>> {
    let id_str = encode_uuid(id);

    let raw: Option<(RawContact, Vec<RawPhone>)> = self
      .conn
      .call(move |conn| {
        let contact = conn
          .query_row(
            "SELECT contact_id, firstname, lastname, email, created_at
             FROM contacts WHERE contact_id = ?1",
            rusqlite::params![id_str],
            |row| {
              Ok(RawContact {
                contact_id: row.get(0)?,
                firstname:  row.get(1)?,
                lastname:   row.get(2)?,
                email:      row.get(3)?,
                created_at: row.get(4)?,
              })
            },
          )
          .optional()?;

        let Some(contact) = contact else { return Ok(None) };

        let mut stmt = conn.prepare(
          "SELECT phone_type, number FROM phones
           WHERE contact_id = ?1 ORDER BY position",
        )?;
        let phones = stmt
          .query_map(rusqlite::params![id_str], |row| {
            Ok(RawPhone { phone_type: row.get(0)?, number: row.get(1)? })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(Some((contact, phones)))
      })
      .await?;

    raw
      .map(|(contact, phones)| contact.into_contact(phones))
      .transpose()
  }

  async fn list_contacts(&self) -> Result<Vec<Contact>> {
    let raws: Vec<(RawContact, Vec<RawPhone>)> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT contact_id, firstname, lastname, email, created_at
           FROM contacts",
        )?;
        let contacts = stmt
          .query_map([], |row| {
            Ok(RawContact {
              contact_id: row.get(0)?,
              firstname:  row.get(1)?,
              lastname:   row.get(2)?,
              email:      row.get(3)?,
              created_at: row.get(4)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        let mut phone_stmt = conn.prepare(
          "SELECT phone_type, number FROM phones
           WHERE contact_id = ?1 ORDER BY position",
        )?;

        let mut rows = Vec::with_capacity(contacts.len());
        for contact in contacts {
          let phones = phone_stmt
            .query_map(rusqlite::params![contact.contact_id], |row| {
              Ok(RawPhone { phone_type: row.get(0)?, number: row.get(1)? })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
          rows.push((contact, phones));
        }

        Ok(rows)
      })
      .await?;

    raws
      .into_iter()
      .map(|(contact, phones)| contact.into_contact(phones))
      .collect()
  }

  async fn email_taken(&self, email: &str, exclude: Option<Uuid>) -> Result<bool> {
    let email       = email.to_owned();
    let exclude_str = exclude.map(encode_uuid);

    let taken: bool = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT 1 FROM contacts
               WHERE email = ?1 AND (?2 IS NULL OR contact_id != ?2)",
              rusqlite::params![email, exclude_str],
              |_| Ok(true),
            )
            .optional()?
            .unwrap_or(false),
        )
      })
      .await?;

    Ok(taken)
  }

  async fn replace_contact(
    &self,
    id: Uuid,
    draft: ContactDraft,
  ) -> Result<Option<WriteOutcome>> {
    // created_at is preserved from the stored row; everything else is
    // replaced wholesale, phones included.
    let replacement = Contact {
      contact_id: id,
      firstname:  draft.firstname,
      lastname:   draft.lastname,
      email:      draft.email,
      phones:     draft.phones,
      created_at: Utc::now(), // placeholder, overwritten below
    };

    let id_str     = encode_uuid(id);
    let firstname  = replacement.firstname.clone();
    let lastname   = replacement.lastname.clone();
    let email      = replacement.email.clone();
    let phone_rows = encode_phones(&replacement);

    let row: ReplaceRow = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        let created_at: Option<String> = tx
          .query_row(
            "SELECT created_at FROM contacts WHERE contact_id = ?1",
            rusqlite::params![id_str],
            |r| r.get(0),
          )
          .optional()?;
        let Some(created_at) = created_at else {
          return Ok(ReplaceRow::Missing);
        };

        match tx.execute(
          "UPDATE contacts SET firstname = ?2, lastname = ?3, email = ?4
           WHERE contact_id = ?1",
          rusqlite::params![id_str, firstname, lastname, email],
        ) {
          Ok(_) => {}
          // Rolls back via drop; the stored contact stays untouched.
          Err(e) if is_email_conflict(&e) => return Ok(ReplaceRow::EmailTaken),
          Err(e) => return Err(e.into()),
        }

        tx.execute(
          "DELETE FROM phones WHERE contact_id = ?1",
          rusqlite::params![id_str],
        )?;
        for (position, (phone_id, phone_type, number)) in
          phone_rows.iter().enumerate()
        {
          tx.execute(
            "INSERT INTO phones (phone_id, contact_id, phone_type, number, position)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            rusqlite::params![phone_id, id_str, phone_type, number, position as i64],
          )?;
        }

        tx.commit()?;
        Ok(ReplaceRow::Written { created_at })
      })
      .await?;

    match row {
      ReplaceRow::Missing => Ok(None),
      ReplaceRow::EmailTaken => Ok(Some(WriteOutcome::EmailTaken)),
      ReplaceRow::Written { created_at } => Ok(Some(WriteOutcome::Written(
        Contact { created_at: decode_dt(&created_at)?, ..replacement },
      ))),
    }
  }

  async fn delete_contact(&self, id: Uuid) -> Result<bool> {
    let id_str = encode_uuid(id);

    let deleted: bool = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        tx.execute(
          "DELETE FROM phones WHERE contact_id = ?1",
          rusqlite::params![id_str],
        )?;
        let rows = tx.execute(
          "DELETE FROM contacts WHERE contact_id = ?1",
          rusqlite::params![id_str],
        )?;
        tx.commit()?;
        Ok(rows > 0)
      })
      .await?;

    Ok(deleted)
  }
}
