//! Node-unique unit identity.
//!
//! # Bit Layout (64-bit)
//!
//! ```text
//! ┌─────────────────┬───────┐
//! │ Serial          │ Tag   │
//! │ 60 bits         │ 4 bits│
//! └─────────────────┴───────┘
//! ```
//!
//! - **Tag (4 bits)**: Unit kind discriminator (0x3 process, 0x7 port)
//! - **Serial (60 bits)**: Allocation counter, never reused

use std::fmt::Debug;
use std::fmt::Display;
use std::fmt::Formatter;
use std::fmt::Result;
use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;

use crate::consts::HANDLE_TAG_BITS;
use crate::raise;

/// Global serial counter shared by every unit kind.
///
/// Serials start at 1 so that no live unit ever has the all-zero identity.
static NEXT_SERIAL: AtomicU64 = AtomicU64::new(1);

/// The kind of unit a [`HandleId`] names.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub enum HandleKind {
  /// A lightweight process running user code.
  Process,
  /// An open port owned by a process.
  Port,
}

impl HandleKind {
  #[inline]
  const fn tag(self) -> u64 {
    match self {
      Self::Process => 0x3,
      Self::Port => 0x7,
    }
  }
}

/// Identifier uniquely naming a unit on the local node.
///
/// Identities are totally ordered. Because serials come from a single
/// monotonic counter, comparing two identities compares their allocation
/// order, which is what gives link sets a deterministic iteration order.
///
/// # Format
///
/// - Processes display as `#PID<0.Serial.0>`
/// - Ports display as `#Port<0.Serial>`
#[derive(Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
#[repr(transparent)]
pub struct HandleId {
  bits: u64,
}

impl HandleId {
  /// Bitmask for extracting the tag field.
  pub(crate) const TAG_MASK: u64 = (1 << HANDLE_TAG_BITS) - 1;

  /// Largest serial representable after reserving the tag bits.
  pub(crate) const MAX_SERIAL: u64 = u64::MAX >> HANDLE_TAG_BITS;

  /// Allocates a fresh identity of the given kind.
  ///
  /// # Panics
  ///
  /// Raises a `SysCap` exception if the serial space is exhausted.
  pub fn next(kind: HandleKind) -> Self {
    let serial: u64 = NEXT_SERIAL.fetch_add(1, Ordering::Relaxed);

    if serial > Self::MAX_SERIAL {
      raise!(Error, SysCap, "unit identity space exhausted");
    }

    Self::from_bits((serial << HANDLE_TAG_BITS) | kind.tag())
  }

  /// Creates an identity from its raw encoded bits.
  #[inline]
  pub const fn from_bits(bits: u64) -> Self {
    Self { bits }
  }

  /// Converts this identity into its raw encoded bits.
  #[inline]
  pub const fn into_bits(self) -> u64 {
    self.bits
  }

  /// Returns the allocation serial of this identity.
  #[inline]
  pub const fn serial(self) -> u64 {
    self.bits >> HANDLE_TAG_BITS
  }

  /// Returns the kind of unit this identity names.
  #[inline]
  pub const fn kind(self) -> HandleKind {
    if self.bits & Self::TAG_MASK == HandleKind::Port.tag() {
      HandleKind::Port
    } else {
      HandleKind::Process
    }
  }

  /// Returns `true` if this identity names a process.
  #[inline]
  pub const fn is_process(self) -> bool {
    matches!(self.kind(), HandleKind::Process)
  }

  /// Returns `true` if this identity names a port.
  #[inline]
  pub const fn is_port(self) -> bool {
    matches!(self.kind(), HandleKind::Port)
  }
}

impl Debug for HandleId {
  fn fmt(&self, f: &mut Formatter<'_>) -> Result {
    Display::fmt(self, f)
  }
}

impl Display for HandleId {
  fn fmt(&self, f: &mut Formatter<'_>) -> Result {
    match self.kind() {
      HandleKind::Process => write!(f, "#PID<0.{}.0>", self.serial()),
      HandleKind::Port => write!(f, "#Port<0.{}>", self.serial()),
    }
  }
}

// -----------------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use crate::core::HandleId;
  use crate::core::HandleKind;

  #[test]
  fn test_kind_roundtrip() {
    assert!(HandleId::next(HandleKind::Process).is_process());
    assert!(HandleId::next(HandleKind::Port).is_port());
  }

  #[test]
  fn test_unique_and_ordered() {
    let a: HandleId = HandleId::next(HandleKind::Process);
    let b: HandleId = HandleId::next(HandleKind::Port);
    let c: HandleId = HandleId::next(HandleKind::Process);

    assert!(a < b);
    assert!(b < c);
    assert_ne!(a, c);
  }

  #[test]
  fn test_display() {
    let pid: HandleId = HandleId::from_bits((12 << 4) | 0x3);
    let port: HandleId = HandleId::from_bits((5 << 4) | 0x7);

    assert_eq!(pid.to_string(), "#PID<0.12.0>");
    assert_eq!(port.to_string(), "#Port<0.5>");
    assert_eq!(format!("{pid:?}"), "#PID<0.12.0>");
  }
}
