use tracing::Span;
use tracing::span;

use crate::core::Exit;
use crate::core::Handle;
use crate::core::HandleRef;
use crate::error::Interrupt;
use crate::task::Task;

/// Capabilities of a schedulable, linkable, mailbox-owning unit.
///
/// Each concrete unit kind embeds a [`Task`] and chooses its own handle type,
/// so [`this`] is statically typed per kind. The provided methods implement
/// linking, the exit-signal protocol, and the termination broadcast on top
/// of the embedded task.
///
/// # Implementing
///
/// A unit must be constructed with [`Arc::new_cyclic`] so that its handle can
/// hold a weak reference to it:
///
/// ```
/// use std::sync::Arc;
/// use ertask::core::Exit;
/// use ertask::core::HandleKind;
/// use ertask::core::HandleRef;
/// use ertask::task::Task;
/// use ertask::task::TaskHandle;
/// use ertask::task::Unit;
///
/// struct Worker {
///   task: Task,
///   this: TaskHandle<Worker>,
/// }
///
/// impl Unit for Worker {
///   type Handle = TaskHandle<Worker>;
///
///   fn task(&self) -> &Task {
///     &self.task
///   }
///
///   fn this(&self) -> Self::Handle {
///     self.this.clone()
///   }
///
///   fn process_incoming_exit(&self, _from: &HandleRef, _reason: &Exit) {}
/// }
///
/// let worker: Arc<Worker> = Arc::new_cyclic(|unit| {
///   let task: Task = Task::new(HandleKind::Process);
///   let this: TaskHandle<Worker> = TaskHandle::new(task.id(), unit.clone());
///   Worker { task, this }
/// });
///
/// assert!(worker.exists());
/// ```
///
/// [`this`]: Self::this
/// [`Arc::new_cyclic`]: std::sync::Arc::new_cyclic
pub trait Unit: Send + Sync + Sized + 'static {
  /// Handle type identifying this kind of unit.
  type Handle: Handle + Clone;

  /// Returns the embedded task state.
  fn task(&self) -> &Task;

  /// Returns the canonical handle of this unit.
  fn this(&self) -> Self::Handle;

  /// Invoked exactly once, outside any lock, after an exit signal from
  /// `from` was accepted.
  ///
  /// The task is already in state `EXIT_SIG` and both the mailbox consumer
  /// and the driver have been woken; this hook decides only how the kind
  /// reacts (logging, releasing external resources).
  fn process_incoming_exit(&self, from: &HandleRef, reason: &Exit);

  /// Returns the canonical handle of this unit, type-erased.
  #[inline]
  fn this_ref(&self) -> HandleRef {
    HandleRef::new(self.this())
  }

  /// Returns `true` if this unit is in state `INIT` or `RUNNING`.
  #[inline]
  fn exists(&self) -> bool {
    self.task().exists()
  }

  /// Links this unit and `peer` in both directions.
  ///
  /// The local side is recorded first. If the peer disappears before it
  /// records the reverse link, the call fails with `error:noproc` and the
  /// local link is kept.
  fn link_to(&self, peer: &HandleRef) -> Result<(), Interrupt> {
    self.task().link_oneway(peer)?;
    peer.link_oneway(&self.this_ref())
  }

  /// Links this unit and `unit` in both directions.
  #[inline]
  fn link_to_unit<U>(&self, unit: &U) -> Result<(), Interrupt>
  where
    U: Unit,
  {
    self.link_to(&unit.this_ref())
  }

  /// Removes the local link to `peer`. Never fails.
  #[inline]
  fn unlink(&self, peer: &HandleRef) {
    self.task().unlink(peer.id());
  }

  /// Offers an exit signal to the core protocol.
  ///
  /// Signals from this unit to itself are ignored. The first signal accepted
  /// while `RUNNING` moves the task to `EXIT_SIG` and invokes
  /// [`process_incoming_exit`]; later signals are ignored.
  ///
  /// # Panics
  ///
  /// Raises a `SysInv` exception if the unit was never started.
  ///
  /// [`process_incoming_exit`]: Self::process_incoming_exit
  fn send_exit(&self, from: &HandleRef, reason: Exit) {
    if from.id() == self.task().id() {
      tracing::trace!(to = %from, result = "ignored", reason = "self");
      return;
    }

    if self.task().accept_exit(from, reason.clone()) {
      self.process_incoming_exit(from, &reason);
    }
  }

  /// Entry point for exit signals delivered through a [`Handle`].
  ///
  /// Unit kinds override this to filter or convert signals before they
  /// reach [`send_exit`]. The default forwards every signal.
  ///
  /// [`send_exit`]: Self::send_exit
  #[inline]
  fn exit_signal(&self, from: &HandleRef, reason: Exit) {
    self.send_exit(from, reason);
  }

  /// Moves this unit to `DONE` and notifies every linked peer.
  ///
  /// Returns the final exit reason, which is the accepted signal's reason if
  /// one is pending and `reason` otherwise. Returns [`None`] if the unit had
  /// already terminated.
  fn terminate(&self, reason: Exit) -> Option<Exit> {
    let this: HandleRef = self.this_ref();
    let span: Span = tracing::trace_span!("Unit Terminate", id = %this);
    let _enter: span::Entered<'_> = span.enter();

    let Some((exit, links)) = self.task().finish(reason) else {
      tracing::trace!(result = "ignored", reason = "done");
      return None;
    };

    tracing::debug!(reason = %exit, links = links.len(), "unit terminated");

    for peer in links.iter() {
      tracing::trace!(to = %peer, "send link exit");
      peer.exit_signal(&this, exit.clone());
    }

    Some(exit)
  }
}

// -----------------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------------

#[cfg(all(test, not(loom)))]
mod tests {
  use parking_lot::Mutex;
  use std::any::Any;
  use std::panic;
  use std::panic::AssertUnwindSafe;
  use std::sync::Arc;
  use std::thread;
  use std::time::Duration;

  use crate::core::Atom;
  use crate::core::Exit;
  use crate::core::Handle;
  use crate::core::HandleId;
  use crate::core::HandleKind;
  use crate::core::HandleRef;
  use crate::core::Term;
  use crate::error::Exception;
  use crate::error::ExceptionGroup;
  use crate::error::Interrupt;
  use crate::task::Task;
  use crate::task::TaskHandle;
  use crate::task::TaskState;
  use crate::task::Unit;

  type Log = Arc<Mutex<Vec<(HandleId, HandleId, Exit)>>>;

  /// Unit recording every hook call and every delivered exit signal.
  struct Probe {
    task: Task,
    this: TaskHandle<Probe>,
    hooks: Mutex<Vec<(HandleId, Exit)>>,
    log: Log,
  }

  impl Probe {
    fn new(log: &Log) -> Arc<Self> {
      Arc::new_cyclic(|unit| {
        let task: Task = Task::new(HandleKind::Process);
        let this: TaskHandle<Probe> = TaskHandle::new(task.id(), unit.clone());

        Self {
          task,
          this,
          hooks: Mutex::new(Vec::new()),
          log: Arc::clone(log),
        }
      })
    }

    fn running(log: &Log) -> Arc<Self> {
      let this: Arc<Self> = Self::new(log);
      this.task.start();
      this
    }

    fn hooks(&self) -> Vec<(HandleId, Exit)> {
      self.hooks.lock().clone()
    }
  }

  impl Unit for Probe {
    type Handle = TaskHandle<Probe>;

    fn task(&self) -> &Task {
      &self.task
    }

    fn this(&self) -> Self::Handle {
      self.this.clone()
    }

    fn process_incoming_exit(&self, from: &HandleRef, reason: &Exit) {
      self.hooks.lock().push((from.id(), reason.clone()));
    }

    fn exit_signal(&self, from: &HandleRef, reason: Exit) {
      self.log.lock().push((from.id(), self.task.id(), reason.clone()));
      self.send_exit(from, reason);
    }
  }

  fn log() -> Log {
    Arc::new(Mutex::new(Vec::new()))
  }

  fn atom(name: &'static str) -> Exit {
    Exit::from(Atom::new(name))
  }

  fn gone() -> HandleRef {
    let unit: Arc<Probe> = Probe::running(&log());
    let this: HandleRef = unit.this_ref();
    drop(unit);
    this
  }

  #[test]
  fn test_exists_follows_state() {
    let unit: Arc<Probe> = Probe::new(&log());
    let peer: Arc<Probe> = Probe::running(&log());

    assert!(unit.exists());
    unit.task().start();
    assert!(unit.exists());

    unit.send_exit(&peer.this_ref(), Exit::KILLED);
    assert_eq!(unit.task().state(), TaskState::ExitSig);
    assert!(!unit.exists());

    unit.terminate(Exit::NORMAL);
    assert_eq!(unit.task().state(), TaskState::Done);
    assert!(!unit.exists());
  }

  #[test]
  fn test_send_exit_from_self_is_noop() {
    let unit: Arc<Probe> = Probe::running(&log());

    unit.send_exit(&unit.this_ref(), Exit::KILLED);

    assert_eq!(unit.task().state(), TaskState::Running);
    assert_eq!(unit.task().exit_reason(), None);
    assert!(unit.hooks().is_empty());
  }

  #[test]
  fn test_send_exit_before_start_is_protocol_violation() {
    let unit: Arc<Probe> = Probe::new(&log());
    let peer: Arc<Probe> = Probe::running(&log());

    let payload: Box<dyn Any + Send> =
      panic::catch_unwind(AssertUnwindSafe(|| unit.send_exit(&peer.this_ref(), Exit::KILLED)))
        .unwrap_err();

    let exception: &Exception = Exception::from_panic(&*payload).unwrap();

    assert_eq!(exception.group(), ExceptionGroup::SysInv);
    assert!(unit.hooks().is_empty());
  }

  #[test]
  fn test_first_signal_wins() {
    let unit: Arc<Probe> = Probe::running(&log());
    let q: Arc<Probe> = Probe::running(&log());
    let r: Arc<Probe> = Probe::running(&log());

    unit.send_exit(&q.this_ref(), atom("reason1"));
    unit.send_exit(&r.this_ref(), atom("reason2"));

    assert_eq!(unit.task().exit_reason(), Some(atom("reason1")));
    assert_eq!(unit.hooks(), vec![(q.task().id(), atom("reason1"))]);
  }

  #[test]
  fn test_signal_after_done_is_ignored() {
    let unit: Arc<Probe> = Probe::running(&log());
    let peer: Arc<Probe> = Probe::running(&log());

    unit.terminate(Exit::NORMAL);
    unit.send_exit(&peer.this_ref(), Exit::KILLED);

    assert_eq!(unit.task().exit_reason(), Some(Exit::NORMAL));
    assert!(unit.hooks().is_empty());
  }

  #[test]
  fn test_mbox_peek_interrupts_with_queued_message() {
    let unit: Arc<Probe> = Probe::running(&log());
    let peer: Arc<Probe> = Probe::running(&log());

    unit.task().mbox_send(Term::new("m"));
    assert_eq!(unit.task().mbox_peek(), Ok(Some(Term::new("m"))));

    unit.send_exit(&peer.this_ref(), atom("stop"));

    assert_eq!(unit.task().mbox_peek(), Err(Interrupt::exit(atom("stop"))));
    assert_eq!(unit.task().check_exit(), Err(Interrupt::exit(atom("stop"))));
  }

  #[tokio::test]
  async fn test_mbox_remove_one_interrupts_with_queued_message() {
    let unit: Arc<Probe> = Probe::running(&log());
    let peer: Arc<Probe> = Probe::running(&log());

    unit.task().mbox_send(Term::new("m"));
    unit.send_exit(&peer.this_ref(), atom("stop"));

    assert_eq!(unit.task().mbox_remove_one().await, Err(Interrupt::exit(atom("stop"))));
    assert_eq!(unit.task().mbox_wait().await, Err(Interrupt::exit(atom("stop"))));
    assert_eq!(unit.task().mbox_len(), 1);
  }

  #[tokio::test]
  async fn test_mbox_receive_in_order() {
    let unit: Arc<Probe> = Probe::running(&log());

    unit.this().send(Term::new(1_u8));
    unit.this().send(Term::new(2_u8));

    assert_eq!(unit.task().mbox_receive().await, Ok(Term::new(1_u8)));
    unit.task().mbox_remove_one().await.unwrap();
    assert_eq!(unit.task().mbox_len(), 0);
  }

  #[tokio::test(start_paused = true)]
  async fn test_mbox_wait_timeout() {
    let unit: Arc<Probe> = Probe::running(&log());

    assert_eq!(unit.task().mbox_wait_timeout(Duration::from_millis(50)).await, Ok(false));

    unit.task().mbox_send(Term::new(()));

    assert_eq!(unit.task().mbox_wait_timeout(Duration::from_millis(50)).await, Ok(true));
  }

  #[tokio::test(start_paused = true)]
  async fn test_mbox_wait_timeout_with_pending_exit() {
    let unit: Arc<Probe> = Probe::running(&log());
    let peer: Arc<Probe> = Probe::running(&log());

    unit.task().mbox_send(Term::new(()));
    unit.send_exit(&peer.this_ref(), atom("stop"));

    assert_eq!(
      unit.task().mbox_wait_timeout(Duration::from_millis(50)).await,
      Err(Interrupt::exit(atom("stop")))
    );
  }

  #[tokio::test]
  async fn test_timed_wait_is_interrupted() {
    let unit: Arc<Probe> = Probe::running(&log());
    let peer: Arc<Probe> = Probe::running(&log());

    let waiter: tokio::task::JoinHandle<Result<bool, Interrupt>> = tokio::spawn({
      let unit: Arc<Probe> = Arc::clone(&unit);
      async move { unit.task().mbox_wait_timeout(Duration::from_secs(60)).await }
    });

    tokio::task::yield_now().await;
    unit.this().exit_signal(&peer.this_ref(), atom("stop"));

    assert_eq!(waiter.await.unwrap(), Err(Interrupt::exit(atom("stop"))));
  }

  #[tokio::test]
  async fn test_blocked_wait_is_interrupted() {
    let unit: Arc<Probe> = Probe::running(&log());
    let peer: Arc<Probe> = Probe::running(&log());

    let waiter: tokio::task::JoinHandle<Result<(), Interrupt>> = tokio::spawn({
      let unit: Arc<Probe> = Arc::clone(&unit);
      async move { unit.task().mbox_wait().await }
    });

    tokio::task::yield_now().await;
    unit.this().exit_signal(&peer.this_ref(), atom("stop"));

    assert_eq!(waiter.await.unwrap(), Err(Interrupt::exit(atom("stop"))));
  }

  #[test]
  fn test_mbox_send_to_done_is_dropped() {
    let unit: Arc<Probe> = Probe::running(&log());

    unit.task().mbox_send(Term::new(1_u8));
    unit.terminate(Exit::NORMAL);
    unit.task().mbox_send(Term::new(2_u8));

    assert_eq!(unit.task().mbox_len(), 0);
  }

  #[test]
  fn test_link_oneway() {
    let unit: Arc<Probe> = Probe::running(&log());
    let peer: Arc<Probe> = Probe::running(&log());

    assert_eq!(unit.task().link_oneway(&peer.this_ref()), Ok(()));
    assert!(unit.task().is_linked(peer.task().id()));
    assert!(!peer.task().is_linked(unit.task().id()));
  }

  #[test]
  fn test_link_oneway_to_self_is_ignored() {
    let unit: Arc<Probe> = Probe::running(&log());

    assert_eq!(unit.task().link_oneway(&unit.this_ref()), Ok(()));
    assert!(unit.task().links().is_empty());
  }

  #[test]
  fn test_link_oneway_to_missing_peer() {
    let unit: Arc<Probe> = Probe::running(&log());
    let done: Arc<Probe> = Probe::running(&log());
    done.terminate(Exit::NORMAL);

    assert_eq!(unit.task().link_oneway(&gone()), Err(Interrupt::noproc()));
    assert_eq!(unit.task().link_oneway(&done.this_ref()), Err(Interrupt::noproc()));
    assert!(unit.task().links().is_empty());
  }

  #[test]
  fn test_link_oneway_during_exit_sig() {
    let log: Log = log();
    let unit: Arc<Probe> = Probe::running(&log);
    let peer: Arc<Probe> = Probe::running(&log);
    let other: Arc<Probe> = Probe::running(&log);

    unit.send_exit(&other.this_ref(), atom("stop"));
    assert_eq!(unit.task().state(), TaskState::ExitSig);

    assert_eq!(unit.task().link_oneway(&peer.this_ref()), Ok(()));
    assert!(unit.task().is_linked(peer.task().id()));

    assert_eq!(unit.terminate(Exit::NORMAL), Some(atom("stop")));
    assert_eq!(*log.lock(), vec![(unit.task().id(), peer.task().id(), atom("stop"))]);
    assert_eq!(peer.hooks(), vec![(unit.task().id(), atom("stop"))]);
  }

  #[test]
  fn test_unlink() {
    let unit: Arc<Probe> = Probe::running(&log());
    let peer: Arc<Probe> = Probe::running(&log());
    let other: Arc<Probe> = Probe::running(&log());

    unit.link_to_unit(&*peer).unwrap();
    unit.unlink(&other.this_ref());
    assert_eq!(unit.task().links(), vec![peer.this_ref()]);

    unit.unlink(&peer.this_ref());
    assert!(unit.task().links().is_empty());
    assert!(peer.task().is_linked(unit.task().id()));
  }

  #[test]
  fn test_link_to_links_both_sides() {
    let log: Log = log();
    let p: Arc<Probe> = Probe::running(&log);
    let q: Arc<Probe> = Probe::running(&log);

    p.link_to(&q.this_ref()).unwrap();

    assert_eq!(p.task().links(), vec![q.this_ref()]);
    assert_eq!(q.task().links(), vec![p.this_ref()]);

    assert_eq!(p.terminate(atom("r")), Some(atom("r")));

    assert_eq!(*log.lock(), vec![(p.task().id(), q.task().id(), atom("r"))]);
    assert_eq!(q.hooks(), vec![(p.task().id(), atom("r"))]);
    assert_eq!(q.task().exit_reason(), Some(atom("r")));
  }

  #[test]
  fn test_link_to_missing_peer() {
    let unit: Arc<Probe> = Probe::running(&log());
    let missing: HandleRef = gone();

    assert_eq!(unit.link_to(&missing), Err(Interrupt::noproc()));
    assert!(!unit.task().is_linked(missing.id()));
  }

  #[test]
  fn test_terminate_broadcasts_in_identity_order() {
    let log: Log = log();
    let unit: Arc<Probe> = Probe::running(&log);
    let a: Arc<Probe> = Probe::running(&log);
    let b: Arc<Probe> = Probe::running(&log);
    let c: Arc<Probe> = Probe::running(&log);

    unit.link_to_unit(&*c).unwrap();
    unit.link_to_unit(&*a).unwrap();
    unit.link_to_unit(&*b).unwrap();
    unit.unlink(&b.this_ref());

    unit.terminate(atom("down"));

    let targets: Vec<HandleId> = log.lock().iter().map(|(_, to, _)| *to).collect();

    assert_eq!(targets, vec![a.task().id(), c.task().id()]);
    assert!(unit.task().links().is_empty());
  }

  #[test]
  fn test_terminate_keeps_accepted_reason() {
    let unit: Arc<Probe> = Probe::running(&log());
    let peer: Arc<Probe> = Probe::running(&log());

    unit.send_exit(&peer.this_ref(), atom("signal"));

    assert_eq!(unit.terminate(Exit::NORMAL), Some(atom("signal")));
    assert_eq!(unit.terminate(Exit::NORMAL), None);
  }

  #[test]
  fn test_concurrent_send_exit_calls_hook_once() {
    let unit: Arc<Probe> = Probe::running(&log());
    let peers: Vec<Arc<Probe>> = (0..8).map(|_| Probe::running(&log())).collect();

    thread::scope(|scope| {
      for peer in peers.iter() {
        let unit: &Probe = &unit;
        scope.spawn(move || unit.send_exit(&peer.this_ref(), Exit::from(Atom::new("stop"))));
      }
    });

    let hooks: Vec<(HandleId, Exit)> = unit.hooks();

    assert_eq!(hooks.len(), 1);
    assert_eq!(unit.task().exit_reason(), Some(hooks[0].1.clone()));
    assert!(peers.iter().any(|peer| peer.task().id() == hooks[0].0));
  }

  #[test]
  fn test_linked_units_terminate_concurrently() {
    for _ in 0..32 {
      let log: Log = log();
      let p: Arc<Probe> = Probe::running(&log);
      let q: Arc<Probe> = Probe::running(&log);

      p.link_to_unit(&*q).unwrap();

      let (p_exit, q_exit): (Option<Exit>, Option<Exit>) = thread::scope(|scope| {
        let p_exit = scope.spawn(|| p.terminate(atom("p")));
        let q_exit = scope.spawn(|| q.terminate(atom("q")));
        (p_exit.join().unwrap(), q_exit.join().unwrap())
      });

      assert!(matches!(p_exit, Some(ref exit) if *exit == atom("p") || *exit == atom("q")));
      assert!(matches!(q_exit, Some(ref exit) if *exit == atom("p") || *exit == atom("q")));
      assert_eq!(p.task().state(), TaskState::Done);
      assert_eq!(q.task().state(), TaskState::Done);
      assert!(p.task().links().is_empty());
      assert!(q.task().links().is_empty());
      assert_eq!(log.lock().len(), 2);
      assert!(p.hooks().len() <= 1);
      assert!(q.hooks().len() <= 1);
    }
  }

  #[test]
  fn test_done_unit_rejects_links() {
    let unit: Arc<Probe> = Probe::running(&log());
    let peer: Arc<Probe> = Probe::running(&log());

    unit.terminate(Exit::NORMAL);

    assert_eq!(unit.this().link_oneway(&peer.this_ref()), Err(Interrupt::noproc()));
    assert_eq!(peer.link_to_unit(&*unit), Err(Interrupt::noproc()));
    assert!(unit.task().links().is_empty());
  }

  #[test]
  fn test_signal_to_dropped_unit_is_ignored() {
    let unit: Arc<Probe> = Probe::running(&log());
    let missing: HandleRef = gone();

    missing.exit_signal(&unit.this_ref(), Exit::KILLED);
    missing.send(Term::new(()));

    assert!(!missing.exists());
  }
}
