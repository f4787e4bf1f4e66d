use bitflags::bitflags;
use std::sync::Arc;

use crate::consts::SPAWN_INIT_TRAP_EXIT;
use crate::core::Exit;
use crate::core::HandleKind;
use crate::core::HandleRef;
use crate::core::Term;
use crate::erts::ExitMessage;
use crate::loom::sync::atomic::AtomicU32;
use crate::loom::sync::atomic::Ordering;
use crate::task::Task;
use crate::task::TaskHandle;
use crate::task::Unit;

/// Handle to a [`Process`].
pub type Pid = TaskHandle<Process>;

// -----------------------------------------------------------------------------
// Process Flags
// -----------------------------------------------------------------------------

bitflags! {
  /// Per-process behavior flags.
  #[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
  pub struct ProcessFlags: u32 {
    /// Deliver incoming exit signals as [`ExitMessage`]s instead of
    /// interrupting the process. `kill` is never trapped.
    const TRAP_EXIT = 1 << 1;
  }
}

impl Default for ProcessFlags {
  #[inline]
  fn default() -> Self {
    if SPAWN_INIT_TRAP_EXIT {
      Self::TRAP_EXIT
    } else {
      Self::empty()
    }
  }
}

// -----------------------------------------------------------------------------
// Process
// -----------------------------------------------------------------------------

/// A lightweight process running user code.
#[derive(Debug)]
pub struct Process {
  task: Task,
  this: Pid,
  flags: AtomicU32,
}

impl Process {
  /// Creates a new process in state `INIT`.
  pub fn new(flags: ProcessFlags) -> Arc<Self> {
    Arc::new_cyclic(|unit| {
      let task: Task = Task::new(HandleKind::Process);
      let this: Pid = Pid::new(task.id(), unit.clone());

      Self {
        task,
        this,
        flags: AtomicU32::new(flags.bits()),
      }
    })
  }

  /// Returns the current process flags.
  #[inline]
  pub fn flags(&self) -> ProcessFlags {
    ProcessFlags::from_bits_retain(self.flags.load(Ordering::Acquire))
  }

  /// Replaces the process flags, returning the previous value.
  #[inline]
  pub fn set_flags(&self, flags: ProcessFlags) -> ProcessFlags {
    ProcessFlags::from_bits_retain(self.flags.swap(flags.bits(), Ordering::AcqRel))
  }

  /// Returns `true` if the process traps exit signals.
  #[inline]
  pub fn trap_exit(&self) -> bool {
    self.flags().contains(ProcessFlags::TRAP_EXIT)
  }

  /// Sets or clears [`TRAP_EXIT`], returning the previous value.
  ///
  /// [`TRAP_EXIT`]: ProcessFlags::TRAP_EXIT
  pub fn set_trap_exit(&self, value: bool) -> bool {
    let bits: u32 = ProcessFlags::TRAP_EXIT.bits();

    let prev: u32 = if value {
      self.flags.fetch_or(bits, Ordering::AcqRel)
    } else {
      self.flags.fetch_and(!bits, Ordering::AcqRel)
    };

    prev & bits != 0
  }
}

impl Unit for Process {
  type Handle = Pid;

  #[inline]
  fn task(&self) -> &Task {
    &self.task
  }

  #[inline]
  fn this(&self) -> Self::Handle {
    self.this.clone()
  }

  fn process_incoming_exit(&self, from: &HandleRef, reason: &Exit) {
    tracing::debug!(pid = %self.this, %from, %reason, "process exiting");
  }

  fn exit_signal(&self, from: &HandleRef, reason: Exit) {
    if from.id() == self.task.id() {
      tracing::trace!(to = %self.this, result = "ignored", reason = "self");
      return;
    }

    if reason.is_kill() {
      self.send_exit(from, Exit::KILLED);
    } else if self.trap_exit() {
      tracing::trace!(to = %self.this, %from, %reason, result = "trapped");
      self.task.mbox_send(Term::new(ExitMessage::new(from.clone(), reason)));
    } else if reason.is_normal() {
      tracing::trace!(to = %self.this, %from, result = "ignored", reason = "normal");
    } else {
      self.send_exit(from, reason);
    }
  }
}

// -----------------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------------
