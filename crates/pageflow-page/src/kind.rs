use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable identifier for the concrete shape of a page.
///
/// Kinds are compared by name. `PageKind::new` is `const`, so a page type can
/// carry its kind as an associated constant (see [`crate::TypedPage`]).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PageKind(Cow<'static, str>);

impl PageKind {
  pub const fn new(name: &'static str) -> Self {
    Self(Cow::Borrowed(name))
  }

  /// Create a kind from a name only known at runtime.
  pub fn owned(name: impl Into<String>) -> Self {
    Self(Cow::Owned(name.into()))
  }

  pub fn name(&self) -> &str {
    &self.0
  }
}

impl fmt::Display for PageKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

impl From<&'static str> for PageKind {
  fn from(name: &'static str) -> Self {
    Self::new(name)
  }
}

impl From<String> for PageKind {
  fn from(name: String) -> Self {
    Self::owned(name)
  }
}
