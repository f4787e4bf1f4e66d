use std::fmt::Debug;
use std::fmt::Display;
use std::fmt::Formatter;
use std::fmt::Result;

use crate::core::Atom;
use crate::core::Term;

/// Reason describing why a unit stopped executing.
///
/// Exit reasons serve two primary purposes:
///
/// 1. **Diagnostic**: Explain what caused unit termination
/// 2. **Propagation**: Determine how linked units react
///
/// # Standard Exit Reasons
///
/// - [`Exit::NORMAL`]: Clean shutdown with no errors
/// - [`Exit::KILL`]: Untrappable termination request
/// - [`Exit::KILLED`]: The reason recorded for a unit that was killed
/// - [`Exit::NOPROC`]: The addressed unit does not exist
///
/// # Custom Exit Reasons
///
/// Applications can use custom exit reasons via the [`Exit::Term`] variant,
/// allowing structured error information to propagate through links.
///
/// # Examples
///
/// ```
/// use ertask::core::Exit;
///
/// let exit = Exit::NORMAL;
///
/// if exit.is_normal() {
///   println!("unit terminated cleanly");
/// } else {
///   println!("unit crashed: {}", exit);
/// }
/// ```
#[derive(Clone, PartialEq)]
pub enum Exit {
  /// Exit reason represented by a symbolic constant.
  Atom(Atom),
  /// Exit reason represented by an arbitrary runtime value.
  Term(Term),
}

impl Exit {
  /// Exit reason indicating normal unit termination.
  pub const NORMAL: Self = Self::Atom(Atom::NORMAL);

  /// Exit reason requesting untrappable termination.
  pub const KILL: Self = Self::Atom(Atom::KILL);

  /// Exit reason recorded for a unit terminated by [`Exit::KILL`].
  pub const KILLED: Self = Self::Atom(Atom::KILLED);

  /// Exit reason indicating a nonexistent unit.
  pub const NOPROC: Self = Self::Atom(Atom::NOPROC);

  /// Returns `true` if this exit reason represents normal termination.
  ///
  /// # Examples
  ///
  /// ```
  /// use ertask::core::{Atom, Exit};
  ///
  /// assert!(Exit::NORMAL.is_normal());
  /// assert!(!Exit::KILLED.is_normal());
  /// assert!(!Exit::from(Atom::new("custom")).is_normal());
  /// ```
  #[inline]
  pub fn is_normal(&self) -> bool {
    matches!(self, Self::Atom(atom) if *atom == Atom::NORMAL)
  }

  /// Returns `true` if this exit reason requests untrappable termination.
  #[inline]
  pub fn is_kill(&self) -> bool {
    matches!(self, Self::Atom(atom) if *atom == Atom::KILL)
  }

  /// Returns `true` if this exit reason represents forced termination.
  #[inline]
  pub fn is_killed(&self) -> bool {
    matches!(self, Self::Atom(atom) if *atom == Atom::KILLED)
  }

  /// Returns `true` if this exit reason represents a missing unit.
  #[inline]
  pub fn is_noproc(&self) -> bool {
    matches!(self, Self::Atom(atom) if *atom == Atom::NOPROC)
  }
}

impl Debug for Exit {
  fn fmt(&self, f: &mut Formatter<'_>) -> Result {
    match self {
      Self::Atom(inner) => Debug::fmt(inner, f),
      Self::Term(inner) => Debug::fmt(inner, f),
    }
  }
}

impl Display for Exit {
  fn fmt(&self, f: &mut Formatter<'_>) -> Result {
    match self {
      Self::Atom(inner) => Display::fmt(inner, f),
      Self::Term(inner) => Display::fmt(inner, f),
    }
  }
}

impl From<Atom> for Exit {
  #[inline]
  fn from(other: Atom) -> Self {
    Self::Atom(other)
  }
}

impl From<Term> for Exit {
  #[inline]
  fn from(other: Term) -> Self {
    Self::Term(other)
  }
}

// -----------------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------------
