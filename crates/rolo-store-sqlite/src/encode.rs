//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Birthdays are stored as ISO 8601 calendar dates (`YYYY-MM-DD`, with a sign
//! and more digits outside years 0000-9999), so the month and day are always
//! the last five characters. Email and phone number are stored verbatim and
//! re-validated on the way out.

use chrono::NaiveDate;
use rolo_core::{
  contact::{Contact, ContactId, NewContact},
  email::Email,
  phone::PhoneNumber,
};

use crate::{Error, Result};

/// Column list shared by every `SELECT` over `contacts`, in [`read_row`] order.
pub const COLUMNS: &str = "id, first_name, last_name, email, phone_number, birthday";

// ─── NaiveDate ────────────────────────────────────────────────────────────────

const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn encode_date(date: NaiveDate) -> String {
  date.format(DATE_FORMAT).to_string()
}

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, DATE_FORMAT)
    .map_err(|e| Error::DateParse(format!("{s:?}: {e}")))
}

// ─── Pagination ───────────────────────────────────────────────────────────────

/// SQLite binds integers as `i64`; anything larger means "no limit".
pub fn encode_count(n: u64) -> i64 { i64::try_from(n).unwrap_or(i64::MAX) }

// ─── Search ───────────────────────────────────────────────────────────────────

/// Build a `LIKE ... ESCAPE '\'` pattern matching `text` anywhere.
///
/// `%`, `_` and `\` in `text` match themselves.
pub fn like_pattern(text: &str) -> String {
  let mut pattern = String::with_capacity(text.len() + 2);
  pattern.push('%');
  for c in text.chars() {
    if matches!(c, '%' | '_' | '\\') {
      pattern.push('\\');
    }
    pattern.push(c);
  }
  pattern.push('%');
  pattern
}

// ─── Rows ─────────────────────────────────────────────────────────────────────

/// Column values of a new or updated row, ready to bind.
pub struct ContactColumns {
  pub first_name:   String,
  pub last_name:    String,
  pub email:        String,
  pub phone_number: String,
  pub birthday:     String,
}

impl From<&NewContact> for ContactColumns {
  fn from(c: &NewContact) -> Self {
    Self {
      first_name:   c.first_name.clone(),
      last_name:    c.last_name.clone(),
      email:        c.email.as_str().to_owned(),
      phone_number: c.phone_number.as_str().to_owned(),
      birthday:     encode_date(c.birthday),
    }
  }
}

/// A row of `contacts` as read from SQLite, before validation.
#[derive(Debug)]
pub struct RawContact {
  pub id:           ContactId,
  pub first_name:   String,
  pub last_name:    String,
  pub email:        String,
  pub phone_number: String,
  pub birthday:     String,
}

impl RawContact {
  pub fn into_contact(self) -> Result<Contact> {
    Ok(Contact {
      id:           self.id,
      first_name:   self.first_name,
      last_name:    self.last_name,
      email:        Email::new(self.email)?,
      phone_number: PhoneNumber::new(self.phone_number)?,
      birthday:     decode_date(&self.birthday)?,
    })
  }
}

/// Row mapper for queries selecting [`COLUMNS`].
pub fn read_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawContact> {
  Ok(RawContact {
    id:           row.get(0)?,
    first_name:   row.get(1)?,
    last_name:    row.get(2)?,
    email:        row.get(3)?,
    phone_number: row.get(4)?,
    birthday:     row.get(5)?,
  })
}

pub fn decode_all(raws: Vec<RawContact>) -> Result<Vec<Contact>> {
  raws.into_iter().map(RawContact::into_contact).collect()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn like_pattern_escapes_wildcards() {
    assert_eq!(like_pattern("ann"), "%ann%");
    assert_eq!(like_pattern("50%_off"), "%50\\%\\_off%");
    assert_eq!(like_pattern("a\\b"), "%a\\\\b%");
  }

  #[test]
  fn dates_roundtrip_through_text() {
    let date = NaiveDate::from_ymd_opt(1999, 1, 9).unwrap();
    assert_eq!(encode_date(date), "1999-01-09");
    assert_eq!(decode_date("1999-01-09").unwrap(), date);
    assert!(decode_date("09/01/1999").is_err());
  }

  #[test]
  fn oversized_counts_saturate() {
    assert_eq!(encode_count(25), 25);
    assert_eq!(encode_count(u64::MAX), i64::MAX);
  }
}
