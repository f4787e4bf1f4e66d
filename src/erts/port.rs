use std::sync::Arc;

use crate::core::Atom;
use crate::core::Exit;
use crate::core::HandleKind;
use crate::core::HandleRef;
use crate::task::Task;
use crate::task::TaskHandle;
use crate::task::Unit;

/// Handle to a [`Port`].
pub type PortId = TaskHandle<Port>;

/// An open port: a unit bridging an external resource, owned by a process.
///
/// A port never traps exits. It closes when its owner terminates for any
/// reason. `normal` from any other unit is ignored, and any other signal
/// closes the port.
#[derive(Debug)]
pub struct Port {
  task: Task,
  this: PortId,
  name: Atom,
  owner: HandleRef,
}

impl Port {
  /// Creates a new port in state `INIT`.
  pub fn new(name: Atom, owner: HandleRef) -> Arc<Self> {
    Arc::new_cyclic(|unit| {
      let task: Task = Task::new(HandleKind::Port);
      let this: PortId = PortId::new(task.id(), unit.clone());

      Self {
        task,
        this,
        name,
        owner,
      }
    })
  }

  /// Returns the name the port was opened with.
  #[inline]
  pub const fn name(&self) -> Atom {
    self.name
  }

  /// Returns the handle of the owning process.
  #[inline]
  pub const fn owner(&self) -> &HandleRef {
    &self.owner
  }
}

impl Unit for Port {
  type Handle = PortId;

  #[inline]
  fn task(&self) -> &Task {
    &self.task
  }

  #[inline]
  fn this(&self) -> Self::Handle {
    self.this.clone()
  }

  fn process_incoming_exit(&self, from: &HandleRef, reason: &Exit) {
    tracing::debug!(port = %self.this, name = %self.name, %from, %reason, "port closing");
  }

  fn exit_signal(&self, from: &HandleRef, reason: Exit) {
    if reason.is_kill() {
      self.send_exit(from, Exit::KILLED);
    } else if reason.is_normal() && from.id() != self.owner.id() {
      tracing::trace!(to = %self.this, %from, result = "ignored", reason = "normal");
    } else {
      self.send_exit(from, reason);
    }
  }
}

// -----------------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------------
