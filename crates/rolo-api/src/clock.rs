//! Source of "today" for date-relative queries.

use chrono::{Local, NaiveDate};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Clock {
  /// The server's local calendar date.
  #[default]
  System,
  /// A pinned date, for tests and reproducible queries.
  Fixed(NaiveDate),
}

impl Clock {
  pub fn today(&self) -> NaiveDate {
    match self {
      Clock::System => Local::now().date_naive(),
      Clock::Fixed(date) => *date,
    }
  }
}
