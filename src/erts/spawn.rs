use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::Instrument;
use tracing::Span;

use crate::consts::SPAWN_INIT_TRAP_EXIT;
use crate::core::Atom;
use crate::core::Exit;
use crate::core::Term;
use crate::error::Exception;
use crate::error::ExceptionGroup;
use crate::error::Interrupt;
use crate::erts::Pid;
use crate::erts::Port;
use crate::erts::PortId;
use crate::erts::Process;
use crate::erts::ProcessFlags;
use crate::raise;
use crate::task::Unit;
use crate::utils::CatchUnwind;

// -----------------------------------------------------------------------------
// Spawn Config
// -----------------------------------------------------------------------------

/// Options used to configure a spawned process.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub struct SpawnConfig {
  /// Creates a link to the parent process.
  ///
  /// This is the same as calling [`spawn_link`].
  pub link: bool,
  /// Sets the [`TRAP_EXIT`] flag of the spawned process.
  ///
  /// [`TRAP_EXIT`]: crate::erts::ProcessFlags::TRAP_EXIT
  pub trap_exit: bool,
}

impl SpawnConfig {
  #[inline]
  pub const fn new() -> Self {
    Self {
      link: false,
      trap_exit: SPAWN_INIT_TRAP_EXIT,
    }
  }

  #[inline]
  pub const fn new_link() -> Self {
    let mut this: Self = Self::new();
    this.link = true;
    this
  }

  /// Returns the initial flags of a process spawned with these options.
  #[inline]
  pub const fn flags(&self) -> ProcessFlags {
    if self.trap_exit {
      ProcessFlags::TRAP_EXIT
    } else {
      ProcessFlags::empty()
    }
  }
}

impl Default for SpawnConfig {
  #[inline]
  fn default() -> Self {
    Self::new()
  }
}

// -----------------------------------------------------------------------------
// Spawn Handle
// -----------------------------------------------------------------------------

/// A handle to a running unit and its driver task.
#[derive(Debug)]
pub struct SpawnHandle<H> {
  handle: H,
  join: JoinHandle<Exit>,
}

impl<H> SpawnHandle<H> {
  /// Returns the handle of the spawned unit.
  #[inline]
  pub const fn handle(&self) -> &H {
    &self.handle
  }

  /// Returns `true` if the driver task has completed.
  #[inline]
  pub fn is_finished(&self) -> bool {
    self.join.is_finished()
  }

  /// Waits for the unit to terminate, returning its final exit reason.
  ///
  /// A driver cancelled by runtime shutdown is reported as `killed`.
  pub async fn join(self) -> Exit {
    match self.join.await {
      Ok(exit) => exit,
      Err(error) if error.is_cancelled() => Exit::KILLED,
      Err(error) => Exit::Term(Term::from_panic(&*error.into_panic())),
    }
  }
}

// -----------------------------------------------------------------------------
// Spawn API
// -----------------------------------------------------------------------------

/// Spawns a new unlinked process running `body`.
///
/// # Panics
///
/// Panics if called outside a tokio runtime.
pub fn spawn<F, T>(body: F) -> SpawnHandle<Pid>
where
  F: FnOnce(Arc<Process>) -> T,
  T: Future<Output = Result<(), Interrupt>> + Send + 'static,
{
  let process: Arc<Process> = Process::new(SpawnConfig::new().flags());

  process.task().start();

  tracing::debug!(pid = %process.this(), "spawn");

  launch(process, body)
}

/// Spawns a new process running `body`, linked to `parent`.
///
/// Fails with `error:noproc` if `parent` is no longer alive; the new
/// process is then terminated with `noproc` before it runs.
pub fn spawn_link<P, F, T>(parent: &Arc<P>, body: F) -> Result<SpawnHandle<Pid>, Interrupt>
where
  P: Unit,
  F: FnOnce(Arc<Process>) -> T,
  T: Future<Output = Result<(), Interrupt>> + Send + 'static,
{
  spawn_opt(Some(parent), body, SpawnConfig::new_link())
}

/// Spawns a new process running `body` with the given options.
///
/// # Panics
///
/// Raises a `SysInv` exception if `options.link` is set without a parent.
pub fn spawn_opt<P, F, T>(
  parent: Option<&Arc<P>>,
  body: F,
  options: SpawnConfig,
) -> Result<SpawnHandle<Pid>, Interrupt>
where
  P: Unit,
  F: FnOnce(Arc<Process>) -> T,
  T: Future<Output = Result<(), Interrupt>> + Send + 'static,
{
  // ---------------------------------------------------------------------------
  // 1. Create Process
  // ---------------------------------------------------------------------------

  let process: Arc<Process> = Process::new(options.flags());

  // ---------------------------------------------------------------------------
  // 2. Start
  // ---------------------------------------------------------------------------

  // A linked parent may signal the process as soon as the link exists.
  process.task().start();

  // ---------------------------------------------------------------------------
  // 3. Initialize Link
  // ---------------------------------------------------------------------------

  if options.link {
    let Some(root) = parent else {
      raise!(Error, SysInv, "link without parent");
    };

    if let Err(error) = root.link_to_unit(&*process) {
      process.terminate(error.reason().clone());
      return Err(error);
    }
  }

  // ---------------------------------------------------------------------------
  // 4. Spawn Task
  // ---------------------------------------------------------------------------

  if let Some(root) = parent {
    tracing::debug!(pid = %process.this(), from = %root.this_ref(), "spawn");
  } else {
    tracing::debug!(pid = %process.this(), "spawn");
  }

  Ok(launch(process, body))
}

/// Opens a port named `name` running `body`, linked to `owner`.
///
/// Fails with `error:noproc` if `owner` is no longer alive.
pub fn open_port<P, F, T>(owner: &Arc<P>, name: Atom, body: F) -> Result<SpawnHandle<PortId>, Interrupt>
where
  P: Unit,
  F: FnOnce(Arc<Port>) -> T,
  T: Future<Output = Result<(), Interrupt>> + Send + 'static,
{
  let port: Arc<Port> = Port::new(name, owner.this_ref());

  port.task().start();

  if let Err(error) = owner.link_to_unit(&*port) {
    port.terminate(error.reason().clone());
    return Err(error);
  }

  tracing::debug!(port = %port.this(), %name, owner = %owner.this_ref(), "open port");

  Ok(launch(port, body))
}

// -----------------------------------------------------------------------------
// Driver
// -----------------------------------------------------------------------------

fn launch<U, F, T>(unit: Arc<U>, body: F) -> SpawnHandle<U::Handle>
where
  U: Unit,
  F: FnOnce(Arc<U>) -> T,
  T: Future<Output = Result<(), Interrupt>> + Send + 'static,
{
  let handle: U::Handle = unit.this();
  let span: Span = tracing::debug_span!("Unit", id = %unit.task().id());
  let future: T = body(Arc::clone(&unit));
  let join: JoinHandle<Exit> = tokio::spawn(drive(unit, future).instrument(span));

  SpawnHandle { handle, join }
}

/// Runs a unit body until it returns or an exit signal is accepted, then
/// terminates the unit.
async fn drive<U, T>(unit: Arc<U>, future: T) -> Exit
where
  U: Unit,
  T: Future<Output = Result<(), Interrupt>> + Send,
{
  let safe_task: CatchUnwind<AssertUnwindSafe<T>> = CatchUnwind::new(AssertUnwindSafe(future));

  let exit: Exit = tokio::select! {
    biased;
    // Accepted exit signals preempt the body at its current await point
    reason = unit.task().exit_requested() => {
      tracing::trace!(result = "preempted", %reason);
      reason
    }
    result = safe_task => match result {
      Ok(Ok(())) => Exit::NORMAL,
      Ok(Err(interrupt)) => interrupt.into_reason(),
      Err(payload) => panic_reason(&*payload),
    }
  };

  match unit.terminate(exit.clone()) {
    Some(exit) => exit,
    None => unit.task().exit_reason().unwrap_or(exit),
  }
}

/// Converts a panic escaping a unit body into its exit reason.
///
/// Aborts the host process on a `SysInv` exception.
fn panic_reason(payload: &(dyn Any + Send)) -> Exit {
  if let Some(exception) = Exception::from_panic(payload) {
    if exception.group() == ExceptionGroup::SysInv {
      tracing::error!(%exception, "protocol violation");
      std::process::abort();
    }
  }

  Exit::Term(Term::from_panic(payload))
}
