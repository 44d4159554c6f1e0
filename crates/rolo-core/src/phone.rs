//! [`PhoneNumber`] value type.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::Error;

/// Minimum number of digits in a phone number (local numbers without area code).
pub const MIN_DIGITS: usize = 7;
/// Maximum number of digits in a phone number (ITU-T E.164).
pub const MAX_DIGITS: usize = 15;

/// A phone number in a common human-entered format.
///
/// Accepted: an optional single leading `+`, then ASCII digits mixed with the
/// separators space, `-`, `.`, `(` and `)`, with between [`MIN_DIGITS`] and
/// [`MAX_DIGITS`] digits in total. The original formatting is preserved;
/// uniqueness is checked against the stored text as-is.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PhoneNumber(String);

impl PhoneNumber {
  pub fn new(number: impl Into<String>) -> Result<Self, Error> {
    let number = number.into();
    if !is_valid(&number) {
      return Err(Error::InvalidPhone(number));
    }
    Ok(Self(number))
  }

  pub fn as_str(&self) -> &str { &self.0 }
}

fn is_valid(number: &str) -> bool {
  let body = number.strip_prefix('+').unwrap_or(number);
  let mut digits = 0;
  for c in body.chars() {
    match c {
      '0'..='9' => digits += 1,
      ' ' | '-' | '.' | '(' | ')' => {}
      _ => return false,
    }
  }
  (MIN_DIGITS..=MAX_DIGITS).contains(&digits)
}

impl TryFrom<String> for PhoneNumber {
  type Error = Error;

  fn try_from(value: String) -> Result<Self, Self::Error> { Self::new(value) }
}

impl From<PhoneNumber> for String {
  fn from(value: PhoneNumber) -> Self { value.0 }
}

impl fmt::Display for PhoneNumber {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn accepts_international_formats() {
    for ok in [
      "5551234",
      "+14155551234",
      "+1 (415) 555-1234",
      "415.555.1234",
      "+44 20 7946 0958",
      "+380-67-123-45-67",
      "123456789012345",
    ] {
      assert!(PhoneNumber::new(ok).is_ok(), "{ok} should be valid");
    }
  }

  #[test]
  fn rejects_letters_and_symbols() {
    for bad in ["555-CALL-NOW", "12345x67", "+1 415 555 1234 ext 5", "555#1234"] {
      assert!(PhoneNumber::new(bad).is_err(), "{bad} should be invalid");
    }
  }

  #[test]
  fn enforces_digit_count_bounds() {
    assert!(PhoneNumber::new("123456").is_err());
    assert!(PhoneNumber::new("1234567").is_ok());
    assert!(PhoneNumber::new("123456789012345").is_ok());
    assert!(PhoneNumber::new("1234567890123456").is_err());
    // Separators do not count towards the limit.
    assert!(PhoneNumber::new("(12) 34-56").is_err());
  }

  #[test]
  fn plus_only_allowed_as_leading_character() {
    assert!(PhoneNumber::new("++14155551234").is_err());
    assert!(PhoneNumber::new("1415+5551234").is_err());
    assert!(PhoneNumber::new("+").is_err());
    assert!(PhoneNumber::new("").is_err());
  }

  #[test]
  fn formatting_is_preserved() {
    let phone = PhoneNumber::new("+1 (415) 555-1234").unwrap();
    assert_eq!(phone.as_str(), "+1 (415) 555-1234");
  }

  #[test]
  fn deserialisation_validates() {
    let err = serde_json::from_str::<PhoneNumber>("\"call me\"").unwrap_err();
    assert!(err.to_string().contains("invalid phone number"));
  }
}
