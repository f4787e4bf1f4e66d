use dyn_clone::DynClone;
use std::any::Any;
use std::fmt::Debug;

/// Value carried by a [`Term`]: a mailbox message or a custom exit reason.
///
/// Implemented for every `'static` type that is [`Debug`], [`Clone`],
/// [`PartialEq`], [`Send`] and [`Sync`]. Payloads are cloned when a term is
/// copied to another receiver and compared when exit reasons are matched.
///
/// [`Term`]: crate::core::Term
pub trait Payload: Any + Debug + DynClone + Send + Sync {
  /// Returns this payload as [`Any`] for downcasting by reference.
  fn as_any(&self) -> &dyn Any;

  /// Returns this payload as a boxed [`Any`] for downcasting by value.
  fn into_any(self: Box<Self>) -> Box<dyn Any>;

  /// Returns `true` if `other` has the same concrete type and compares equal.
  fn same_as(&self, other: &dyn Payload) -> bool;
}

impl PartialEq for dyn Payload {
  #[inline]
  fn eq(&self, other: &Self) -> bool {
    self.same_as(other)
  }
}

impl<T> Payload for T
where
  T: Any + Debug + Clone + PartialEq + Send + Sync,
{
  #[inline]
  fn as_any(&self) -> &dyn Any {
    self
  }

  #[inline]
  fn into_any(self: Box<Self>) -> Box<dyn Any> {
    self
  }

  #[inline]
  fn same_as(&self, other: &dyn Payload) -> bool {
    other.as_any().downcast_ref::<T>().is_some_and(|other| self == other)
  }
}
