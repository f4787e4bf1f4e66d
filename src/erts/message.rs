use crate::core::Exit;
use crate::core::HandleRef;

/// An EXIT message from a linked unit.
///
/// EXIT messages appear in the mailbox only when the receiving process has
/// the [`TRAP_EXIT`] flag set. Without this flag, EXIT signals interrupt the
/// receiving process instead.
///
/// [`TRAP_EXIT`]: crate::erts::ProcessFlags::TRAP_EXIT
#[derive(Clone, Debug, PartialEq)]
pub struct ExitMessage {
  from: HandleRef,
  exit: Exit,
}

impl ExitMessage {
  /// Creates a new EXIT message.
  #[inline]
  pub(crate) fn new(from: HandleRef, exit: Exit) -> Self {
    Self { from, exit }
  }

  /// Returns the handle of the unit that sent the EXIT signal.
  #[inline]
  pub const fn from(&self) -> &HandleRef {
    &self.from
  }

  /// Returns the exit reason.
  #[inline]
  pub const fn exit(&self) -> &Exit {
    &self.exit
  }
}
