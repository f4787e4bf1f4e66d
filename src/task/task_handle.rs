use std::cmp::Ordering;
use std::fmt::Debug;
use std::fmt::Display;
use std::fmt::Formatter;
use std::fmt::Result;
use std::hash::Hash;
use std::hash::Hasher;
use std::sync::Arc;
use std::sync::Weak;

use crate::core::Exit;
use crate::core::Handle;
use crate::core::HandleId;
use crate::core::HandleRef;
use crate::core::Term;
use crate::error::Interrupt;
use crate::task::Unit;

/// Concrete handle to a unit of kind `U`.
///
/// The handle holds a weak reference: it never keeps its unit alive, and
/// once the unit is dropped it behaves exactly like a handle to a `DONE`
/// unit.
pub struct TaskHandle<U> {
  id: HandleId,
  unit: Weak<U>,
}

impl<U> TaskHandle<U>
where
  U: Unit,
{
  /// Creates a handle from an identity and a weak unit reference.
  ///
  /// Usually called from inside [`Arc::new_cyclic`] while the unit is being
  /// constructed.
  #[inline]
  pub const fn new(id: HandleId, unit: Weak<U>) -> Self {
    Self { id, unit }
  }

  /// Returns the identity of the referenced unit.
  #[inline]
  pub const fn id(&self) -> HandleId {
    self.id
  }

  /// Returns the referenced unit if it is still allocated.
  #[inline]
  pub fn upgrade(&self) -> Option<Arc<U>> {
    self.unit.upgrade()
  }
}

impl<U> Handle for TaskHandle<U>
where
  U: Unit,
{
  #[inline]
  fn id(&self) -> HandleId {
    self.id
  }

  fn exists(&self) -> bool {
    self.upgrade().is_some_and(|unit| unit.task().exists())
  }

  fn send(&self, message: Term) {
    match self.upgrade() {
      Some(unit) => unit.task().mbox_send(message),
      None => tracing::trace!(to = %self.id, result = "dropped", reason = "gone"),
    }
  }

  fn exit_signal(&self, from: &HandleRef, reason: Exit) {
    match self.upgrade() {
      Some(unit) => unit.exit_signal(from, reason),
      None => tracing::trace!(to = %self.id, %from, result = "ignored", reason = "gone"),
    }
  }

  fn link_oneway(&self, peer: &HandleRef) -> std::result::Result<(), Interrupt> {
    match self.upgrade() {
      Some(unit) => unit.task().link_oneway(peer),
      None => Err(Interrupt::noproc()),
    }
  }
}

impl<U> From<TaskHandle<U>> for HandleRef
where
  U: Unit,
{
  #[inline]
  fn from(other: TaskHandle<U>) -> Self {
    HandleRef::new(other)
  }
}

impl<U> Clone for TaskHandle<U> {
  #[inline]
  fn clone(&self) -> Self {
    Self {
      id: self.id,
      unit: Weak::clone(&self.unit),
    }
  }
}

impl<U> Debug for TaskHandle<U> {
  fn fmt(&self, f: &mut Formatter<'_>) -> Result {
    Debug::fmt(&self.id, f)
  }
}

impl<U> Display for TaskHandle<U> {
  fn fmt(&self, f: &mut Formatter<'_>) -> Result {
    Display::fmt(&self.id, f)
  }
}

impl<U> PartialEq for TaskHandle<U> {
  #[inline]
  fn eq(&self, other: &Self) -> bool {
    self.id == other.id
  }
}

impl<U> Eq for TaskHandle<U> {}

impl<U> PartialOrd for TaskHandle<U> {
  #[inline]
  fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
    Some(self.cmp(other))
  }
}

impl<U> Ord for TaskHandle<U> {
  #[inline]
  fn cmp(&self, other: &Self) -> Ordering {
    self.id.cmp(&other.id)
  }
}

impl<U> Hash for TaskHandle<U> {
  #[inline]
  fn hash<H: Hasher>(&self, state: &mut H) {
    self.id.hash(state);
  }
}
