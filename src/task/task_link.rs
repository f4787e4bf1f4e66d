use std::collections::BTreeSet;
use std::collections::btree_set::Iter;

use crate::core::HandleId;
use crate::core::HandleRef;

// -----------------------------------------------------------------------------
// Link Set
// -----------------------------------------------------------------------------

/// Ordered set of peers a unit is linked to.
///
/// Entries are keyed and ordered by [`HandleId`], so duplicate links collapse
/// and iteration follows peer creation order.
#[derive(Clone, Debug, Default)]
#[repr(transparent)]
pub struct LinkSet {
  inner: BTreeSet<HandleRef>,
}

impl LinkSet {
  /// Creates a new empty link set.
  #[inline]
  pub const fn new() -> Self {
    Self {
      inner: BTreeSet::new(),
    }
  }

  /// Adds `peer`, returning `true` if it was not already present.
  #[inline]
  pub fn insert(&mut self, peer: HandleRef) -> bool {
    self.inner.insert(peer)
  }

  /// Removes the peer named by `id`, returning `true` if it was present.
  #[inline]
  pub fn remove(&mut self, id: &HandleId) -> bool {
    self.inner.remove(id)
  }

  /// Returns `true` if the peer named by `id` is present.
  #[inline]
  pub fn contains(&self, id: &HandleId) -> bool {
    self.inner.contains(id)
  }

  /// Returns the number of linked peers.
  #[inline]
  pub fn len(&self) -> usize {
    self.inner.len()
  }

  /// Returns `true` if no peer is linked.
  #[inline]
  pub fn is_empty(&self) -> bool {
    self.inner.is_empty()
  }

  /// Returns an iterator over the linked peers in identity order.
  #[inline]
  pub fn iter(&self) -> Iter<'_, HandleRef> {
    self.inner.iter()
  }

  /// Removes every peer, returning them in identity order.
  #[inline]
  pub fn drain(&mut self) -> Vec<HandleRef> {
    std::mem::take(&mut self.inner).into_iter().collect()
  }
}
