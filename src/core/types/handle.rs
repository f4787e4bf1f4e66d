//! Capabilities a unit exposes to its peers.

use std::borrow::Borrow;
use std::cmp::Ordering;
use std::fmt::Debug;
use std::fmt::Display;
use std::fmt::Formatter;
use std::fmt::Result;
use std::hash::Hash;
use std::hash::Hasher;
use std::ops::Deref;
use std::sync::Arc;

use crate::core::Exit;
use crate::core::HandleId;
use crate::core::Term;
use crate::error::Interrupt;

/// Opaque reference through which one unit interacts with another.
///
/// A handle never keeps its unit alive; every operation on a handle whose
/// unit has been dropped degrades to the behavior of a `DONE` unit.
pub trait Handle: Debug + Send + Sync + 'static {
  /// Returns the identity of the referenced unit.
  fn id(&self) -> HandleId;

  /// Returns `true` if the referenced unit is in state `INIT` or `RUNNING`.
  fn exists(&self) -> bool;

  /// Appends `message` to the referenced unit's mailbox.
  ///
  /// Messages to a finished unit are dropped silently.
  fn send(&self, message: Term);

  /// Delivers an exit signal from `from` to the referenced unit.
  fn exit_signal(&self, from: &HandleRef, reason: Exit);

  /// Records `peer` in the referenced unit's link set.
  ///
  /// Fails with `error:noproc` if the referenced unit is gone.
  fn link_oneway(&self, peer: &HandleRef) -> std::result::Result<(), Interrupt>;
}

// -----------------------------------------------------------------------------
// Handle Ref
// -----------------------------------------------------------------------------

/// Shared, type-erased [`Handle`].
///
/// Equality, ordering, and hashing are defined by [`HandleId`] alone, so a
/// set of references orders peers by allocation order.
#[derive(Clone)]
pub struct HandleRef {
  id: HandleId,
  inner: Arc<dyn Handle>,
}

impl HandleRef {
  /// Creates a new reference from a concrete handle.
  #[inline]
  pub fn new<H>(handle: H) -> Self
  where
    H: Handle,
  {
    Self {
      id: handle.id(),
      inner: Arc::new(handle),
    }
  }

  /// Returns the identity of the referenced unit.
  #[inline]
  pub const fn id(&self) -> HandleId {
    self.id
  }
}

impl Deref for HandleRef {
  type Target = dyn Handle;

  #[inline]
  fn deref(&self) -> &Self::Target {
    &*self.inner
  }
}

impl Borrow<HandleId> for HandleRef {
  #[inline]
  fn borrow(&self) -> &HandleId {
    &self.id
  }
}

impl Debug for HandleRef {
  fn fmt(&self, f: &mut Formatter<'_>) -> Result {
    Debug::fmt(&self.id, f)
  }
}

impl Display for HandleRef {
  fn fmt(&self, f: &mut Formatter<'_>) -> Result {
    Display::fmt(&self.id, f)
  }
}

impl PartialEq for HandleRef {
  #[inline]
  fn eq(&self, other: &Self) -> bool {
    self.id == other.id
  }
}

impl Eq for HandleRef {}

impl PartialOrd for HandleRef {
  #[inline]
  fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
    Some(self.cmp(other))
  }
}

impl Ord for HandleRef {
  #[inline]
  fn cmp(&self, other: &Self) -> Ordering {
    self.id.cmp(&other.id)
  }
}

impl Hash for HandleRef {
  #[inline]
  fn hash<H: Hasher>(&self, state: &mut H) {
    self.id.hash(state);
  }
}

// -----------------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------------
