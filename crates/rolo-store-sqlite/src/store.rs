//! [`SqliteStore`] — the SQLite implementation of [`ContactStore`].

use std::path::Path;

use rusqlite::{
  OptionalExtension as _,
  functions::{Context, FunctionFlags},
};

use rolo_core::{
  birthday::BirthdayWindow,
  contact::{Contact, ContactId, NewContact},
  store::{ContactStore, Page},
};

use crate::{
  encode::{
    decode_all, encode_count, like_pattern, read_row, ContactColumns, RawContact,
    COLUMNS,
  },
  schema::SCHEMA,
  Result,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A contact store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted, and all
/// clones share one database thread, so statements never interleave.
#[derive(Clone)]
pub struct SqliteStore {
  pub(crate) conn: tokio_rusqlite::Connection,
}

/// Result of a guarded write, decided inside the database transaction.
enum Outcome<T> {
  Done(T),
  PhoneTaken(String),
  Missing(ContactId),
}

impl<T> Outcome<T> {
  fn into_result(self) -> Result<T> {
    match self {
      Outcome::Done(v) => Ok(v),
      Outcome::PhoneTaken(phone) => {
        Err(rolo_core::Error::PhoneNumberTaken(phone).into())
      }
      Outcome::Missing(id) => Err(rolo_core::Error::ContactNotFound(id).into()),
    }
  }
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
        register_functions(conn)?;
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

/// `casefold(text)`: Unicode lowercase, so `LIKE` ignores case in every
/// alphabet and not only ASCII.
fn register_functions(conn: &rusqlite::Connection) -> rusqlite::Result<()> {
  conn.create_scalar_function(
    "casefold",
    1,
    FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
    |ctx: &Context<'_>| Ok(ctx.get::<String>(0)?.to_lowercase()),
  )
}

/// Id of the contact other than `except` that uses `phone`, if any.
fn phone_owner(
  conn: &rusqlite::Connection,
  phone: &str,
  except: Option<ContactId>,
) -> rusqlite::Result<Option<ContactId>> {
  conn
    .query_row(
      "SELECT id FROM contacts WHERE phone_number = ?1 AND id IS NOT ?2",
      rusqlite::params![phone, except],
      |r| r.get(0),
    )
    .optional()
}

/// Whether `e` is a `UNIQUE` constraint failure — the phone number raced
/// past the application-level check.
fn is_unique_violation(e: &rusqlite::Error) -> bool {
  matches!(
    e,
    rusqlite::Error::SqliteFailure(f, _)
      if f.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
  )
}

// ─── ContactStore impl ───────────────────────────────────────────────────────

impl ContactStore for SqliteStore {
  type Error = crate::Error;

  async fn create_contact(&self, input: NewContact) -> Result<Contact> {
    let cols = ContactColumns::from(&input);

    let outcome = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        if phone_owner(&tx, &cols.phone_number, None)?.is_some() {
          return Ok(Outcome::PhoneTaken(cols.phone_number));
        }
        let inserted = tx.execute(
          "INSERT INTO contacts (first_name, last_name, email, phone_number, birthday)
           VALUES (?1, ?2, ?3, ?4, ?5)",
          rusqlite::params![
            cols.first_name,
            cols.last_name,
            cols.email,
            cols.phone_number,
            cols.birthday,
          ],
        );
        match inserted {
          Ok(_) => {}
          Err(e) if is_unique_violation(&e) => {
            return Ok(Outcome::PhoneTaken(cols.phone_number));
          }
          Err(e) => return Err(e.into()),
        }
        let id = tx.last_insert_rowid();
        tx.commit()?;
        Ok(Outcome::Done(id))
      })
      .await?;

    let id = outcome.into_result()?;
    Ok(Contact::with_id(id, input))
  }

  async fn get_contact(&self, id: ContactId) -> Result<Option<Contact>> {
    let raw: Option<RawContact> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("SELECT {COLUMNS} FROM contacts WHERE id = ?1"),
            rusqlite::params![id],
            read_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawContact::into_contact).transpose()
  }

  async fn list_contacts(&self, page: Page) -> Result<Vec<Contact>> {
    let limit  = encode_count(page.limit);
    let offset = encode_count(page.skip);

    let raws: Vec<RawContact> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {COLUMNS} FROM contacts ORDER BY id LIMIT ?1 OFFSET ?2"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![limit, offset], read_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    decode_all(raws)
  }

  async fn search_contacts(&self, text: &str, page: Page) -> Result<Vec<Contact>> {
    let pattern = like_pattern(text);
    let limit   = encode_count(page.limit);
    let offset  = encode_count(page.skip);

    let raws: Vec<RawContact> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {COLUMNS} FROM contacts
           WHERE casefold(first_name) LIKE casefold(?1) ESCAPE '\\'
              OR casefold(last_name)  LIKE casefold(?1) ESCAPE '\\'
              OR casefold(email)      LIKE casefold(?1) ESCAPE '\\'
           ORDER BY id
           LIMIT ?2 OFFSET ?3"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![pattern, limit, offset], read_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    decode_all(raws)
  }

  async fn update_contact(&self, id: ContactId, input: NewContact) -> Result<Contact> {
    let cols = ContactColumns::from(&input);

    let outcome = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let exists = tx
          .query_row(
            "SELECT 1 FROM contacts WHERE id = ?1",
            rusqlite::params![id],
            |_| Ok(()),
          )
          .optional()?
          .is_some();
        if !exists {
          return Ok(Outcome::Missing(id));
        }
        if phone_owner(&tx, &cols.phone_number, Some(id))?.is_some() {
          return Ok(Outcome::PhoneTaken(cols.phone_number));
        }
        let updated = tx.execute(
          "UPDATE contacts
           SET first_name = ?1, last_name = ?2, email = ?3,
               phone_number = ?4, birthday = ?5
           WHERE id = ?6",
          rusqlite::params![
            cols.first_name,
            cols.last_name,
            cols.email,
            cols.phone_number,
            cols.birthday,
            id,
          ],
        );
        match updated {
          Ok(_) => {}
          Err(e) if is_unique_violation(&e) => {
            return Ok(Outcome::PhoneTaken(cols.phone_number));
          }
          Err(e) => return Err(e.into()),
        }
        tx.commit()?;
        Ok(Outcome::Done(()))
      })
      .await?;

    outcome.into_result()?;
    Ok(Contact::with_id(id, input))
  }

  async fn delete_contact(&self, id: ContactId) -> Result<Contact> {
    let outcome = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let raw = tx
          .query_row(
            &format!("SELECT {COLUMNS} FROM contacts WHERE id = ?1"),
            rusqlite::params![id],
            read_row,
          )
          .optional()?;
        let Some(raw) = raw else {
          return Ok(Outcome::Missing(id));
        };
        tx.execute("DELETE FROM contacts WHERE id = ?1", rusqlite::params![id])?;
        tx.commit()?;
        Ok(Outcome::Done(raw))
      })
      .await?;

    outcome.into_result()?.into_contact()
  }

  async fn upcoming_birthdays(&self, window: BirthdayWindow) -> Result<Vec<Contact>> {
    // Coarse month-day filter in SQL; exact window check in Rust. The key is
    // the text's last five characters, which also holds for years past 9999.
    let keys = serde_json::to_string(&window.month_day_keys())?;

    let raws: Vec<RawContact> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {COLUMNS} FROM contacts
           WHERE substr(birthday, -5) IN (SELECT value FROM json_each(?1))
           ORDER BY id"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![keys], read_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    let mut contacts: Vec<(u32, Contact)> = decode_all(raws)?
      .into_iter()
      .filter_map(|c| window.days_until(c.birthday).map(|d| (d, c)))
      .collect();
    contacts.sort_by_key(|(days, c)| (*days, c.id));

    Ok(contacts.into_iter().map(|(_, c)| c).collect())
  }
}
