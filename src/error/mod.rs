//! Exceptions and interruptions raised by the unit core.
//!
//! Two mechanisms carry failures, mirroring how an Erlang runtime separates
//! broken invariants from ordinary unit failures:
//!
//! - [`Interrupt`]: The `Err` side of every interruptible unit operation. It
//!   carries an [`ExceptionClass`] (`error` or `exit`) and an exit reason, and
//!   is propagated with `?` until it reaches the unit's top-level driver,
//!   where it becomes the unit's termination reason.
//! - [`Exception`]: A panic payload raised with [`raise!`] for system errors.
//!   A [`SysInv`] exception means a runtime invariant was broken (for example
//!   an exit signal delivered to a unit that never started) and the driver
//!   aborts the host process when one escapes a unit body.
//!
//! # Raising Exceptions
//!
//! ```
//! use ertask::raise;
//!
//! fn validate_input(value: i32) {
//!   if value < 0 {
//!     raise!(Error, BadArg, "value must be non-negative");
//!   }
//! }
//! ```
//!
//! # Exception Groups
//!
//! - [`BadArg`]: Invalid function arguments
//! - [`SysCap`]: System capacity exhausted
//! - [`SysInv`]: Invalid system state or operation
//!
//! [`BadArg`]: ExceptionGroup::BadArg
//! [`SysCap`]: ExceptionGroup::SysCap
//! [`SysInv`]: ExceptionGroup::SysInv
//!
//! [`raise!`]: crate::raise!

mod exception;
mod exception_class;
mod exception_group;
mod interrupt;

pub use self::exception::Exception;
pub use self::exception_class::ExceptionClass;
pub use self::exception_group::ExceptionGroup;
pub use self::interrupt::Interrupt;

// -----------------------------------------------------------------------------
// raise!
// -----------------------------------------------------------------------------

/// Raises an exception with the specified class, group, and message.
///
/// The [`Exception`] itself is the panic payload, so a driver catching the
/// unwind can recover the group with [`Exception::from_panic`].
///
/// # Examples
///
/// ```
/// # use ertask::raise;
/// fn register_name(name: &str) {
///   if name.is_empty() {
///     raise!(Error, BadArg, "name cannot be empty");
///   }
/// }
/// ```
#[macro_export]
macro_rules! raise {
  ($class:ident, $group:ident, $error:expr $(,)?) => {
    ::std::panic::panic_any($crate::error::Exception::new(
      $crate::error::ExceptionClass::$class,
      $crate::error::ExceptionGroup::$group,
      $error,
    ))
  };
}

// -----------------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------------
