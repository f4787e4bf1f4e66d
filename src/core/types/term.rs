//! Type-erased runtime value container used for unit communication.
//!
//! [`Term`] is the payload of mailbox messages and custom exit reasons. The
//! concrete type is erased at the [`Term`] boundary and recovered at runtime
//! with the downcasting methods.
//!
//! # Examples
//!
//! ```
//! use ertask::core::Term;
//!
//! let num = Term::new(42_i32);
//!
//! assert_eq!(num.downcast_ref::<i32>(), Some(&42));
//! assert_eq!(num.downcast_ref::<String>(), None);
//!
//! let cloned = num.clone();
//! assert_eq!(cloned, num);
//! ```

use dyn_clone::clone_box;
use std::any::Any;
use std::fmt::Debug;
use std::fmt::Display;
use std::fmt::Formatter;
use std::fmt::Result;

use crate::core::Payload;
use crate::error::Exception;

/// Dynamically typed value that can be sent between units.
///
/// Cloning a [`Term`] performs a deep clone of the contained value, so each
/// receiver owns its own copy of the data.
#[repr(transparent)]
pub struct Term {
  data: Box<dyn Payload>,
}

impl Term {
  /// Creates a new term wrapping the given value.
  #[inline]
  pub fn new<T>(data: T) -> Self
  where
    T: Payload,
  {
    Self {
      data: Box::new(data),
    }
  }

  /// Returns `true` if the contained value is of type `T`.
  #[inline]
  pub fn is<T>(&self) -> bool
  where
    T: 'static,
  {
    self.data.as_any().is::<T>()
  }

  /// Returns a shared reference to the contained value of type `T`.
  ///
  /// Returns [`None`] if the value has a different concrete type.
  #[inline]
  pub fn downcast_ref<T>(&self) -> Option<&T>
  where
    T: 'static,
  {
    self.data.as_any().downcast_ref()
  }

  /// Converts this term into a boxed value of type `T`.
  ///
  /// Returns the original term if the value has a different concrete type.
  ///
  /// # Examples
  ///
  /// ```
  /// use ertask::core::Term;
  ///
  /// let term = Term::new(String::from("hello"));
  /// let data = term.downcast::<String>().unwrap();
  ///
  /// assert_eq!(*data, "hello");
  /// ```
  #[inline]
  pub fn downcast<T>(self) -> std::result::Result<Box<T>, Self>
  where
    T: 'static,
  {
    if self.is::<T>() {
      match self.data.into_any().downcast::<T>() {
        Ok(data) => Ok(data),
        Err(_) => unreachable!("type checked above"),
      }
    } else {
      Err(self)
    }
  }

  /// Creates a term describing a caught panic payload.
  #[inline]
  pub(crate) fn from_panic(error: &(dyn Any + Send)) -> Self {
    if let Some(exception) = Exception::from_panic(error) {
      return Self::new(exception.to_string());
    }

    match error.downcast_ref::<&str>() {
      Some(error) => Self::new((*error).to_owned()),
      None => match error.downcast_ref::<String>() {
        Some(error) => Self::new(error.to_owned()),
        None => Self::new(String::from("unknown panic")),
      },
    }
  }
}

impl Clone for Term {
  #[inline]
  fn clone(&self) -> Self {
    Self {
      data: clone_box(&*self.data),
    }
  }
}

impl PartialEq for Term {
  #[inline]
  fn eq(&self, other: &Self) -> bool {
    *self.data == *other.data
  }
}

impl Debug for Term {
  fn fmt(&self, f: &mut Formatter<'_>) -> Result {
    Debug::fmt(&*self.data, f)
  }
}

impl Display for Term {
  fn fmt(&self, f: &mut Formatter<'_>) -> Result {
    Debug::fmt(&*self.data, f)
  }
}

// -----------------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use std::any::Any;

  use crate::core::Term;

  #[test]
  fn test_is() {
    let term: Term = Term::new(42_i32);

    assert!(term.is::<i32>());
    assert!(!term.is::<u32>());
  }

  #[test]
  fn test_downcast_wrong_type_returns_term() {
    let term: Term = Term::new(7_u8);
    let back: Term = term.downcast::<String>().unwrap_err();

    assert_eq!(back.downcast_ref::<u8>(), Some(&7));
  }

  #[test]
  fn test_clone_is_deep() {
    let src: Term = Term::new(vec![1]);
    let dst: Term = src.clone();

    let mut data: Box<Vec<i32>> = src.downcast::<Vec<i32>>().unwrap();
    data.push(2);

    assert_eq!(dst.downcast_ref::<Vec<i32>>(), Some(&vec![1]));
  }

  #[test]
  fn test_equality_requires_same_type() {
    assert_eq!(Term::new(1_u32), Term::new(1_u32));
    assert_ne!(Term::new(1_u32), Term::new(1_u64));
  }

  #[test]
  fn test_display_uses_debug() {
    assert_eq!(format!("{}", Term::new("hi")), "\"hi\"");
  }

  #[test]
  fn test_from_panic_str() {
    let payload: Box<dyn Any + Send> = Box::new("boom");
    let term: Term = Term::from_panic(&*payload);

    assert_eq!(term.downcast_ref::<String>().map(String::as_str), Some("boom"));
  }
}
