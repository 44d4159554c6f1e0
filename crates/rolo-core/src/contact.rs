//! Contact — the sole stored entity.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{email::Email, phone::PhoneNumber};

/// Store-assigned identifier of a contact. Never changes after creation.
pub type ContactId = i64;

/// The client-supplied fields of a contact, used for both create and update.
///
/// Every field is required; an update replaces all of them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewContact {
  pub first_name:   String,
  pub last_name:    String,
  pub email:        Email,
  pub phone_number: PhoneNumber,
  pub birthday:     NaiveDate,
}

/// A persisted contact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
  pub id:           ContactId,
  pub first_name:   String,
  pub last_name:    String,
  pub email:        Email,
  pub phone_number: PhoneNumber,
  pub birthday:     NaiveDate,
}

impl Contact {
  /// Attach a store-assigned `id` to a set of contact fields.
  pub fn with_id(id: ContactId, fields: NewContact) -> Self {
    Self {
      id,
      first_name: fields.first_name,
      last_name: fields.last_name,
      email: fields.email,
      phone_number: fields.phone_number,
      birthday: fields.birthday,
    }
  }

  /// `"first last"`, for display.
  pub fn full_name(&self) -> String {
    format!("{} {}", self.first_name, self.last_name)
  }
}
