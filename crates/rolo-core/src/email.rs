//! [`Email`] value type.

use std::{fmt, sync::LazyLock};

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::Error;

/// Maximum length of a forward path, per RFC 5321 §4.5.3.1.3.
const MAX_LEN: usize = 254;
const MAX_LOCAL_LEN: usize = 64;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(
    r#"^[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+(?:\.[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+)*@(?:[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?\.)+[A-Za-z]{2,63}$"#,
  )
  .expect("email pattern is valid")
});

/// A syntactically valid email address.
///
/// Validation happens on construction and on deserialisation, so a value of
/// this type is always well-formed. The address is stored exactly as given.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

impl Email {
  pub fn new(address: impl Into<String>) -> Result<Self, Error> {
    let address = address.into();
    if !is_valid(&address) {
      return Err(Error::InvalidEmail(address));
    }
    Ok(Self(address))
  }

  pub fn as_str(&self) -> &str { &self.0 }
}

fn is_valid(address: &str) -> bool {
  if address.len() > MAX_LEN {
    return false;
  }
  match address.split_once('@') {
    Some((local, _)) if local.len() > MAX_LOCAL_LEN => false,
    Some(_) => EMAIL_RE.is_match(address),
    None => false,
  }
}

impl TryFrom<String> for Email {
  type Error = Error;

  fn try_from(value: String) -> Result<Self, Self::Error> { Self::new(value) }
}

impl From<Email> for String {
  fn from(value: Email) -> Self { value.0 }
}

impl fmt::Display for Email {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}
