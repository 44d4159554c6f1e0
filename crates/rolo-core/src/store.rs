//! The `ContactStore` trait and supporting query types.
//!
//! The trait is implemented by storage backends (e.g. `rolo-store-sqlite`).
//! The HTTP layer depends on this abstraction, not on any concrete backend.

use std::future::Future;

use crate::{
  birthday::BirthdayWindow,
  contact::{Contact, ContactId, NewContact},
};

/// Number of records returned when the caller does not pass a `limit`.
pub const DEFAULT_PAGE_LIMIT: u64 = 10;

// ─── Query type ──────────────────────────────────────────────────────────────

/// Offset pagination. No upper bound is imposed on `limit`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
  pub skip:  u64,
  pub limit: u64,
}

impl Default for Page {
  fn default() -> Self { Self { skip: 0, limit: DEFAULT_PAGE_LIMIT } }
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a contact store backend.
///
/// Lists are ordered by id, i.e. insertion order.
///
/// Backends report domain failures ([`crate::Error::PhoneNumberTaken`],
/// [`crate::Error::ContactNotFound`]) either directly or as the `source()` of
/// their own error type, so callers can classify them.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait ContactStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Persist a new contact and return it with its assigned id.
  ///
  /// Fails with `PhoneNumberTaken` if any contact already uses the number.
  fn create_contact(
    &self,
    input: NewContact,
  ) -> impl Future<Output = Result<Contact, Self::Error>> + Send + '_;

  /// Retrieve a contact by id. Returns `None` if not found.
  fn get_contact(
    &self,
    id: ContactId,
  ) -> impl Future<Output = Result<Option<Contact>, Self::Error>> + Send + '_;

  /// One page of all contacts.
  fn list_contacts(
    &self,
    page: Page,
  ) -> impl Future<Output = Result<Vec<Contact>, Self::Error>> + Send + '_;

  /// One page of contacts whose first name, last name or email contains
  /// `text`, compared case-insensitively.
  fn search_contacts<'a>(
    &'a self,
    text: &'a str,
    page: Page,
  ) -> impl Future<Output = Result<Vec<Contact>, Self::Error>> + Send + 'a;

  /// Replace every field of contact `id`.
  ///
  /// Fails with `ContactNotFound` if `id` does not exist, or with
  /// `PhoneNumberTaken` if another contact already uses the new number.
  fn update_contact(
    &self,
    id: ContactId,
    input: NewContact,
  ) -> impl Future<Output = Result<Contact, Self::Error>> + Send + '_;

  /// Remove contact `id` and return its last stored values.
  ///
  /// Fails with `ContactNotFound` if `id` does not exist.
  fn delete_contact(
    &self,
    id: ContactId,
  ) -> impl Future<Output = Result<Contact, Self::Error>> + Send + '_;

  /// All contacts whose next birthday falls inside `window`, soonest first.
  fn upcoming_birthdays(
    &self,
    window: BirthdayWindow,
  ) -> impl Future<Output = Result<Vec<Contact>, Self::Error>> + Send + '_;
}
