//! Handlers for `/contacts` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/contacts/` | Optional `q` (search), `skip`, `limit` |
//! | `POST`   | `/contacts/` | Body: [`NewContact`]; returns 201 + stored contact |
//! | `GET`    | `/contacts/:id` | 404 if not found |
//! | `PUT`    | `/contacts/:id` | Body: [`NewContact`]; replaces every field |
//! | `DELETE` | `/contacts/:id` | Returns the deleted contact |
//! | `GET`    | `/contacts/birthdays/` | Optional `days` look-ahead |

use axum::{
  Json,
  extract::State,
  http::StatusCode,
  response::IntoResponse,
};
use rolo_core::{
  birthday::BirthdayWindow,
  contact::{Contact, ContactId, NewContact},
  store::{ContactStore, DEFAULT_PAGE_LIMIT, Page},
};
use serde::Deserialize;

use crate::{
  ApiState,
  error::ApiError,
  extract::{ValidJson, ValidPath, ValidQuery},
};

// ─── List / search ────────────────────────────────────────────────────────────

fn default_limit() -> u64 { DEFAULT_PAGE_LIMIT }

#[derive(Debug, Deserialize)]
pub struct ListParams {
  /// If set, only contacts whose first name, last name or email contains
  /// this text (case-insensitive).
  pub q:     Option<String>,
  #[serde(default)]
  pub skip:  u64,
  #[serde(default = "default_limit")]
  pub limit: u64,
}

impl ListParams {
  fn page(&self) -> Page { Page { skip: self.skip, limit: self.limit } }
}

/// `GET /contacts/[?q=...][&skip=...][&limit=...]`
pub async fn list<S>(
  State(state): State<ApiState<S>>,
  ValidQuery(params): ValidQuery<ListParams>,
) -> Result<Json<Vec<Contact>>, ApiError>
where
  S: ContactStore + 'static,
{
  let page = params.page();
  let contacts = match params.q.as_deref() {
    Some(text) => state.store.search_contacts(text, page).await,
    None => state.store.list_contacts(page).await,
  }
  .map_err(ApiError::store)?;
  Ok(Json(contacts))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /contacts/` — returns 201 + the stored [`Contact`].
pub async fn create<S>(
  State(state): State<ApiState<S>>,
  ValidJson(body): ValidJson<NewContact>,
) -> Result<impl IntoResponse, ApiError>
where
  S: ContactStore + 'static,
{
  let contact = state
    .store
    .create_contact(body)
    .await
    .map_err(ApiError::store)?;
  tracing::info!(id = contact.id, "contact created");
  Ok((StatusCode::CREATED, Json(contact)))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /contacts/:id`
pub async fn get_one<S>(
  State(state): State<ApiState<S>>,
  ValidPath(id): ValidPath<ContactId>,
) -> Result<Json<Contact>, ApiError>
where
  S: ContactStore + 'static,
{
  let contact = state
    .store
    .get_contact(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("contact {id} not found")))?;
  Ok(Json(contact))
}

// ─── Update ───────────────────────────────────────────────────────────────────

/// `PUT /contacts/:id` — body is the full replacement [`NewContact`].
pub async fn update_one<S>(
  State(state): State<ApiState<S>>,
  ValidPath(id): ValidPath<ContactId>,
  ValidJson(body): ValidJson<NewContact>,
) -> Result<Json<Contact>, ApiError>
where
  S: ContactStore + 'static,
{
  let contact = state
    .store
    .update_contact(id, body)
    .await
    .map_err(ApiError::store)?;
  tracing::info!(id, "contact updated");
  Ok(Json(contact))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /contacts/:id` — returns the contact as it was before deletion.
pub async fn delete_one<S>(
  State(state): State<ApiState<S>>,
  ValidPath(id): ValidPath<ContactId>,
) -> Result<Json<Contact>, ApiError>
where
  S: ContactStore + 'static,
{
  let contact = state
    .store
    .delete_contact(id)
    .await
    .map_err(ApiError::store)?;
  tracing::info!(id, "contact deleted");
  Ok(Json(contact))
}

// ─── Upcoming birthdays ───────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct BirthdayParams {
  /// Look-ahead in days; defaults to the configured window.
  pub days: Option<u32>,
}

/// `GET /contacts/birthdays/[?days=...]` — soonest birthday first.
pub async fn birthdays<S>(
  State(state): State<ApiState<S>>,
  ValidQuery(params): ValidQuery<BirthdayParams>,
) -> Result<Json<Vec<Contact>>, ApiError>
where
  S: ContactStore + 'static,
{
  let days   = params.days.unwrap_or(state.birthday_window_days);
  let window = BirthdayWindow::new(state.clock.today(), days);
  tracing::debug!(
    start = %window.start(),
    days = window.days(),
    "upcoming birthdays"
  );

  let contacts = state
    .store
    .upcoming_birthdays(window)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(contacts))
}
