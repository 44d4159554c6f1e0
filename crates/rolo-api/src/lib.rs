//! JSON REST API for Rolo.
//!
//! Exposes an axum [`Router`] backed by any [`rolo_core::store::ContactStore`].
//! Transport concerns (listening, tracing middleware) are the caller's
//! responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! let app = rolo_api::api_router(ApiState::new(Arc::new(store)));
//! ```

pub mod clock;
pub mod contacts;
pub mod error;
pub mod extract;

use std::sync::Arc;

use axum::{
  Router,
  routing::{MethodRouter, get},
};
use rolo_core::{birthday::DEFAULT_WINDOW_DAYS, store::ContactStore};

pub use clock::Clock;
pub use error::ApiError;

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all handlers.
pub struct ApiState<S> {
  pub store:                Arc<S>,
  pub clock:                Clock,
  /// Look-ahead of `/contacts/birthdays/` when the caller passes no `days`.
  pub birthday_window_days: u32,
}

impl<S> ApiState<S> {
  pub fn new(store: Arc<S>) -> Self {
    Self {
      store,
      clock: Clock::System,
      birthday_window_days: DEFAULT_WINDOW_DAYS,
    }
  }

  pub fn with_clock(mut self, clock: Clock) -> Self {
    self.clock = clock;
    self
  }

  pub fn with_birthday_window_days(mut self, days: u32) -> Self {
    self.birthday_window_days = days;
    self
  }
}

// Manual impl: cloning shares the store and must not require `S: Clone`.
impl<S> Clone for ApiState<S> {
  fn clone(&self) -> Self {
    Self {
      store:                Arc::clone(&self.store),
      clock:                self.clock,
      birthday_window_days: self.birthday_window_days,
    }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build a fully-materialised API router for `state`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type. Collection paths are served with and without a
/// trailing slash.
pub fn api_router<S>(state: ApiState<S>) -> Router<()>
where
  S: ContactStore + 'static,
{
  let collection: MethodRouter<ApiState<S>> =
    get(contacts::list::<S>).post(contacts::create::<S>);
  let birthdays: MethodRouter<ApiState<S>> = get(contacts::birthdays::<S>);
  let item: MethodRouter<ApiState<S>> = get(contacts::get_one::<S>)
    .put(contacts::update_one::<S>)
    .delete(contacts::delete_one::<S>);

  Router::new()
    .route("/contacts", collection.clone())
    .route("/contacts/", collection)
    .route("/contacts/birthdays", birthdays.clone())
    .route("/contacts/birthdays/", birthdays)
    .route("/contacts/{id}", item)
    .with_state(state)
}

// ─── Integration tests ────────────────────────────────────────────────────────
