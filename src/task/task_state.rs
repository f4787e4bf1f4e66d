use std::fmt::Debug;
use std::fmt::Display;
use std::fmt::Formatter;
use std::fmt::Result;

use crate::core::Exit;
use crate::loom::sync::Mutex;
use crate::loom::sync::MutexGuard;
use crate::raise;

// -----------------------------------------------------------------------------
// Task State
// -----------------------------------------------------------------------------

/// Lifecycle phase of a unit.
///
/// Transitions are monotonic: `INIT → RUNNING → (EXIT_SIG →)? DONE`.
#[derive(Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub enum TaskState {
  /// Created but not yet started.
  Init,
  /// Executing its body.
  Running,
  /// An exit signal was accepted and is waiting to be surfaced.
  ExitSig,
  /// Terminated; links drained and mailbox cleared.
  Done,
}

impl TaskState {
  /// Returns `true` if a unit in this state is considered alive.
  #[inline]
  pub const fn exists(self) -> bool {
    matches!(self, Self::Init | Self::Running)
  }

  /// Returns the lowercase name of this state.
  #[inline]
  pub const fn as_str(self) -> &'static str {
    match self {
      Self::Init => "init",
      Self::Running => "running",
      Self::ExitSig => "exit_sig",
      Self::Done => "done",
    }
  }
}

impl Debug for TaskState {
  fn fmt(&self, f: &mut Formatter<'_>) -> Result {
    Display::fmt(self, f)
  }
}

impl Display for TaskState {
  fn fmt(&self, f: &mut Formatter<'_>) -> Result {
    f.write_str(self.as_str())
  }
}

// -----------------------------------------------------------------------------
// Accept
// -----------------------------------------------------------------------------

/// Outcome of offering an exit reason to a [`Lifecycle`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Accept {
  /// The reason was recorded and the state moved to `EXIT_SIG`.
  Accepted,
  /// An earlier reason is already pending; the offer was discarded.
  Pending,
  /// The unit already terminated; the offer was discarded.
  Done,
}

// -----------------------------------------------------------------------------
// Lifecycle
// -----------------------------------------------------------------------------

#[derive(Debug)]
struct Inner {
  state: TaskState,
  exit: Option<Exit>,
}

/// Synchronized state and exit reason of a unit.
///
/// The state and the recorded reason change together under one lock, so an
/// observer never sees `EXIT_SIG` without the reason that caused it.
#[derive(Debug)]
pub struct Lifecycle {
  inner: Mutex<Inner>,
}

impl Lifecycle {
  /// Creates a new lifecycle in state `INIT`.
  #[inline]
  pub fn new() -> Self {
    Self {
      inner: Mutex::new(Inner {
        state: TaskState::Init,
        exit: None,
      }),
    }
  }

  #[inline]
  fn lock(&self) -> MutexGuard<'_, Inner> {
    self.inner.lock()
  }

  /// Returns the current state.
  #[inline]
  pub fn state(&self) -> TaskState {
    self.lock().state
  }

  /// Returns the recorded exit reason, if any.
  #[inline]
  pub fn exit_reason(&self) -> Option<Exit> {
    self.lock().exit.clone()
  }

  /// Moves the lifecycle from `INIT` to `RUNNING`.
  ///
  /// # Panics
  ///
  /// Raises a `SysInv` exception if the lifecycle was already started.
  pub fn start(&self) {
    let mut guard: MutexGuard<'_, Inner> = self.lock();

    if guard.state != TaskState::Init {
      let state: TaskState = guard.state;
      drop(guard);
      raise!(Error, SysInv, format!("start from state {state}"));
    }

    guard.state = TaskState::Running;
  }

  /// Offers an exit reason.
  ///
  /// Only the first offer made while `RUNNING` is accepted.
  ///
  /// # Panics
  ///
  /// Raises a `SysInv` exception if the lifecycle was never started.
  pub fn accept(&self, reason: Exit) -> Accept {
    let mut guard: MutexGuard<'_, Inner> = self.lock();

    match guard.state {
      TaskState::Init => {
        drop(guard);
        raise!(Error, SysInv, "exit signal delivered before start");
      }
      TaskState::Running => {
        guard.state = TaskState::ExitSig;
        guard.exit = Some(reason);
        Accept::Accepted
      }
      TaskState::ExitSig => Accept::Pending,
      TaskState::Done => Accept::Done,
    }
  }

  /// Returns the pending exit reason if the state is `EXIT_SIG`.
  #[inline]
  pub fn pending(&self) -> Option<Exit> {
    let guard: MutexGuard<'_, Inner> = self.lock();

    match guard.state {
      TaskState::ExitSig => guard.exit.clone(),
      _ => None,
    }
  }

  /// Returns the recorded exit reason if the state is `EXIT_SIG` or `DONE`.
  ///
  /// State and reason are read under a single lock acquisition.
  #[inline]
  pub fn surfaced(&self) -> Option<Exit> {
    let guard: MutexGuard<'_, Inner> = self.lock();

    match guard.state {
      TaskState::ExitSig | TaskState::Done => guard.exit.clone(),
      TaskState::Init | TaskState::Running => None,
    }
  }

  /// Moves the lifecycle to `DONE`, returning the final exit reason.
  ///
  /// A reason accepted earlier takes precedence over `reason`. Returns
  /// [`None`] if the lifecycle had already finished.
  pub fn finish(&self, reason: Exit) -> Option<Exit> {
    let mut guard: MutexGuard<'_, Inner> = self.lock();

    let exit: Exit = match guard.state {
      TaskState::Done => return None,
      TaskState::ExitSig => match guard.exit.clone() {
        Some(exit) => exit,
        None => reason,
      },
      TaskState::Init | TaskState::Running => reason,
    };

    guard.state = TaskState::Done;
    guard.exit = Some(exit.clone());

    Some(exit)
  }
}

impl Default for Lifecycle {
  #[inline]
  fn default() -> Self {
    Self::new()
  }
}

// -----------------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------------
