//! Directory query — letter filtering and alphabetical ordering for listing.
//!
//! Read-only and side-effect free; safe to run repeatedly and concurrently.

use std::cmp::Ordering;

use crate::contact::Contact;

/// Case-insensitive comparison of the lastname's first character only — a
/// prefix-of-lastname test, not a substring search.
pub fn starts_with_letter(lastname: &str, letter: char) -> bool {
  lastname
    .chars()
    .next()
    .is_some_and(|c| c.to_lowercase().eq(letter.to_lowercase()))
}

/// Total order for directory listings: lastname, then firstname, then the
/// identifier as a deterministic tiebreak.
pub fn directory_order(a: &Contact, b: &Contact) -> Ordering {
  a.lastname
    .cmp(&b.lastname)
    .then_with(|| a.firstname.cmp(&b.firstname))
    .then_with(|| a.contact_id.cmp(&b.contact_id))
}

/// Restrict `contacts` to the given initial letter (if any) and sort them for
/// display. No matches yield an empty vec, never an error.
pub fn filtered(contacts: Vec<Contact>, letter: Option<char>) -> Vec<Contact> {
  let mut out: Vec<Contact> = match letter {
    Some(l) => contacts
      .into_iter()
      .filter(|c| starts_with_letter(&c.lastname, l))
      .collect(),
    None => contacts,
  };
  out.sort_by(directory_order);
  out
}
