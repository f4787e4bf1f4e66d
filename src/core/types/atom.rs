use std::fmt::Debug;
use std::fmt::Display;
use std::fmt::Formatter;
use std::fmt::Result;
use std::ops::Deref;

/// Immutable symbolic constant.
///
/// Atoms name well-known values such as exit reasons. They are backed by a
/// `'static` string, so copying and comparing them never allocates.
///
/// # Examples
///
/// ```
/// use ertask::core::Atom;
///
/// let shutdown = Atom::new("shutdown");
///
/// assert_eq!(shutdown, Atom::new("shutdown"));
/// assert_eq!(shutdown.as_str(), "shutdown");
/// ```
#[derive(Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
#[repr(transparent)]
pub struct Atom {
  name: &'static str,
}

impl Atom {
  /// Atom representing the empty string.
  pub const EMPTY: Self = Self::new("");

  /// Atom representing the value `kill`.
  pub const KILL: Self = Self::new("kill");

  /// Atom representing the value `killed`.
  pub const KILLED: Self = Self::new("killed");

  /// Atom representing the value `normal`.
  pub const NORMAL: Self = Self::new("normal");

  /// Atom representing the value `noproc`.
  pub const NOPROC: Self = Self::new("noproc");

  /// Atom representing the value `undefined`.
  pub const UNDEFINED: Self = Self::new("undefined");

  /// Creates a new atom.
  #[inline]
  pub const fn new(name: &'static str) -> Self {
    Self { name }
  }

  /// Returns the string value of this atom.
  #[inline]
  pub const fn as_str(&self) -> &'static str {
    self.name
  }
}

impl Debug for Atom {
  fn fmt(&self, f: &mut Formatter<'_>) -> Result {
    f.write_str(self.name)
  }
}

impl Display for Atom {
  fn fmt(&self, f: &mut Formatter<'_>) -> Result {
    f.write_str(self.name)
  }
}

impl Default for Atom {
  #[inline]
  fn default() -> Self {
    Self::EMPTY
  }
}

impl Deref for Atom {
  type Target = str;

  #[inline]
  fn deref(&self) -> &Self::Target {
    self.name
  }
}

impl From<&'static str> for Atom {
  #[inline]
  fn from(other: &'static str) -> Self {
    Self::new(other)
  }
}

impl PartialEq<str> for Atom {
  #[inline]
  fn eq(&self, other: &str) -> bool {
    self.name == other
  }
}

impl PartialEq<&str> for Atom {
  #[inline]
  fn eq(&self, other: &&str) -> bool {
    self.name == *other
  }
}

// -----------------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------------
