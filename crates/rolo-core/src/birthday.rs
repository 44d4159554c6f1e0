//! Upcoming-birthday window.
//!
//! A [`BirthdayWindow`] is the inclusive date range `[start, start + days]`.
//! A birthday falls in the window when its next anniversary on or after
//! `start` is at most `days` days away. Anniversaries are computed with
//! calendar arithmetic, so windows that cross New Year behave like any other.
//! A 29 February birthday is celebrated on 28 February in non-leap years.

use chrono::{Datelike, Days, NaiveDate};

/// Default look-ahead of the upcoming-birthdays query.
pub const DEFAULT_WINDOW_DAYS: u32 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BirthdayWindow {
  start: NaiveDate,
  days:  u32,
}

impl BirthdayWindow {
  pub fn new(start: NaiveDate, days: u32) -> Self { Self { start, days } }

  /// A window of [`DEFAULT_WINDOW_DAYS`] starting at `today`.
  pub fn starting(today: NaiveDate) -> Self {
    Self::new(today, DEFAULT_WINDOW_DAYS)
  }

  pub fn start(&self) -> NaiveDate { self.start }

  pub fn days(&self) -> u32 { self.days }

  /// The first anniversary of `birthday` on or after the window start.
  pub fn next_occurrence(&self, birthday: NaiveDate) -> Option<NaiveDate> {
    let this_year = anniversary(birthday, self.start.year())?;
    if this_year >= self.start {
      Some(this_year)
    } else {
      anniversary(birthday, self.start.year() + 1)
    }
  }

  /// Days from the window start until the next anniversary of `birthday`,
  /// or `None` if it falls outside the window.
  pub fn days_until(&self, birthday: NaiveDate) -> Option<u32> {
    let next = self.next_occurrence(birthday)?;
    let delta = u32::try_from((next - self.start).num_days()).ok()?;
    (delta <= self.days).then_some(delta)
  }

  pub fn contains(&self, birthday: NaiveDate) -> bool {
    self.days_until(birthday).is_some()
  }

  /// `MM-DD` keys of every anniversary that can fall inside the window.
  ///
  /// Storage backends use these to pre-filter rows in SQL; the result is a
  /// superset of what [`contains`](Self::contains) accepts (at most one
  /// extra leap-day key), so callers still apply `contains` afterwards.
  pub fn month_day_keys(&self) -> Vec<String> {
    let span = self.days.min(366);
    let mut keys = Vec::with_capacity(span as usize + 2);
    for offset in 0..=span {
      let Some(date) = self.start.checked_add_days(Days::new(u64::from(offset)))
      else {
        break;
      };
      keys.push(month_day_key(date.month(), date.day()));
      if date.month() == 2 && date.day() == 28 && !is_leap_year(date.year()) {
        keys.push(month_day_key(2, 29));
      }
    }
    keys.sort();
    keys.dedup();
    keys
  }
}

/// Format a month/day pair as the `MM-DD` suffix of an ISO 8601 date.
pub fn month_day_key(month: u32, day: u32) -> String {
  format!("{month:02}-{day:02}")
}

fn anniversary(birthday: NaiveDate, year: i32) -> Option<NaiveDate> {
  NaiveDate::from_ymd_opt(year, birthday.month(), birthday.day())
    .or_else(|| NaiveDate::from_ymd_opt(year, 2, 28))
}

fn is_leap_year(year: i32) -> bool {
  NaiveDate::from_ymd_opt(year, 2, 29).is_some()
}

#[cfg(test)]
mod tests {
  use super::*;

  fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
  }

  #[test]
  fn seven_day_window_is_inclusive_at_day_seven() {
    let window = BirthdayWindow::starting(d(2024, 6, 1));

    assert!(window.contains(d(1990, 6, 1)), "day 0");
    assert!(window.contains(d(1990, 6, 5)), "day 4");
    assert!(window.contains(d(1990, 6, 8)), "day 7");
    assert!(!window.contains(d(1990, 6, 9)), "day 8");
    assert!(!window.contains(d(1990, 6, 10)), "day 9");
    assert!(!window.contains(d(1990, 5, 31)), "yesterday");
  }

  #[test]
  fn window_wraps_over_new_year() {
    let window = BirthdayWindow::starting(d(2024, 12, 28));

    assert!(window.contains(d(1980, 12, 31)));
    assert!(window.contains(d(1980, 1, 2)));
    assert!(window.contains(d(1980, 1, 4)));
    assert!(!window.contains(d(1980, 1, 5)));
    assert!(!window.contains(d(1980, 12, 27)));
    assert_eq!(window.days_until(d(1980, 1, 1)), Some(4));
  }

  #[test]
  fn leap_day_birthday_in_non_leap_year() {
    let window = BirthdayWindow::starting(d(2023, 2, 25));
    assert_eq!(window.next_occurrence(d(2000, 2, 29)), Some(d(2023, 2, 28)));
    assert!(window.contains(d(2000, 2, 29)));

    let after = BirthdayWindow::starting(d(2023, 3, 1));
    assert_eq!(after.next_occurrence(d(2000, 2, 29)), Some(d(2024, 2, 29)));
    assert!(!after.contains(d(2000, 2, 29)));
  }

  #[test]
  fn leap_day_birthday_in_leap_year() {
    let window = BirthdayWindow::starting(d(2024, 2, 25));
    assert_eq!(window.days_until(d(2000, 2, 29)), Some(4));
  }

  #[test]
  fn zero_day_window_only_matches_today() {
    let window = BirthdayWindow::new(d(2024, 6, 1), 0);
    assert!(window.contains(d(2001, 6, 1)));
    assert!(!window.contains(d(2001, 6, 2)));
  }

  #[test]
  fn month_day_keys_cover_the_window() {
    let window = BirthdayWindow::starting(d(2024, 12, 28));
    assert_eq!(window.month_day_keys(), vec![
      "01-01", "01-02", "01-03", "01-04", "12-28", "12-29", "12-30", "12-31",
    ]);
  }

  #[test]
  fn month_day_keys_add_leap_day_in_common_years() {
    let keys = BirthdayWindow::new(d(2023, 2, 27), 2).month_day_keys();
    assert_eq!(keys, vec!["02-27", "02-28", "02-29", "03-01"]);
  }

  #[test]
  fn month_day_keys_are_bounded_for_huge_windows() {
    let keys = BirthdayWindow::new(d(2024, 1, 1), u32::MAX).month_day_keys();
    assert_eq!(keys.len(), 366);
  }
}
