use std::error::Error;
use std::fmt::Debug;
use std::fmt::Display;
use std::fmt::Formatter;
use std::fmt::Result;

use crate::core::Exit;
use crate::error::ExceptionClass;

/// Control-flow interruption of a unit's current operation.
///
/// An interrupt unwinds the unit body through `?` until it reaches the
/// driver, which turns [`reason`] into the unit's termination reason.
///
/// # Classes
///
/// - [`ExceptionClass::Error`]: An operation requested by the unit failed,
///   for example linking to a unit that does not exist (`error:noproc`).
/// - [`ExceptionClass::Exit`]: An exit signal was accepted and surfaced at a
///   checkpoint (`exit:Reason`).
///
/// # Examples
///
/// ```
/// use ertask::core::Exit;
/// use ertask::error::Interrupt;
///
/// let interrupt = Interrupt::exit(Exit::KILLED);
///
/// assert!(interrupt.is_exit());
/// assert_eq!(interrupt.to_string(), "exit:killed");
/// ```
///
/// [`reason`]: Self::reason
#[derive(Clone, PartialEq)]
pub struct Interrupt {
  class: ExceptionClass,
  reason: Exit,
}

impl Interrupt {
  /// Creates an `error` class interruption with the given reason.
  #[inline]
  pub const fn error(reason: Exit) -> Self {
    Self {
      class: ExceptionClass::Error,
      reason,
    }
  }

  /// Creates an `exit` class interruption with the given reason.
  #[inline]
  pub const fn exit(reason: Exit) -> Self {
    Self {
      class: ExceptionClass::Exit,
      reason,
    }
  }

  /// Creates the `error:noproc` interruption raised when a link target does
  /// not exist.
  #[inline]
  pub const fn noproc() -> Self {
    Self::error(Exit::NOPROC)
  }

  /// Returns the interruption class.
  #[inline]
  pub const fn class(&self) -> ExceptionClass {
    self.class
  }

  /// Returns the interruption reason.
  #[inline]
  pub const fn reason(&self) -> &Exit {
    &self.reason
  }

  /// Consumes the interruption, returning its reason.
  #[inline]
  pub fn into_reason(self) -> Exit {
    self.reason
  }

  /// Returns `true` if this interruption was raised by a failed operation.
  #[inline]
  pub const fn is_error(&self) -> bool {
    matches!(self.class, ExceptionClass::Error)
  }

  /// Returns `true` if this interruption surfaces an accepted exit signal.
  #[inline]
  pub const fn is_exit(&self) -> bool {
    matches!(self.class, ExceptionClass::Exit)
  }
}

impl Debug for Interrupt {
  fn fmt(&self, f: &mut Formatter<'_>) -> Result {
    Display::fmt(self, f)
  }
}

impl Display for Interrupt {
  fn fmt(&self, f: &mut Formatter<'_>) -> Result {
    write!(f, "{}:{}", self.class, self.reason)
  }
}

impl Error for Interrupt {}

// -----------------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------------
