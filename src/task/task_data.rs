use std::time::Duration;
use tokio::sync::Notify;
use tracing::Span;
use tracing::span;

use crate::core::Exit;
use crate::core::HandleId;
use crate::core::HandleKind;
use crate::core::HandleRef;
use crate::core::Term;
use crate::error::Interrupt;
use crate::loom::sync::Mutex;
use crate::loom::sync::MutexGuard;
use crate::task::Accept;
use crate::task::Lifecycle;
use crate::task::LinkSet;
use crate::task::Mailbox;
use crate::task::TaskState;

/// State shared by every unit kind: identity, lifecycle, mailbox, and links.
///
/// A [`Task`] is embedded in each concrete unit and reached through
/// [`Unit::task`]. Operations that need the unit's own handle, such as
/// linking or the termination broadcast, live on [`Unit`] instead.
///
/// # Lock Order
///
/// `links` is acquired before `state`. Termination moves the state to `DONE`
/// before draining the links, and [`link_oneway`] checks for `DONE` while
/// holding `links`, so no link can be added after the drain.
///
/// [`Unit`]: crate::task::Unit
/// [`Unit::task`]: crate::task::Unit::task
/// [`link_oneway`]: Self::link_oneway
#[derive(Debug)]
pub struct Task {
  id: HandleId,
  state: Lifecycle,
  mailbox: Mailbox,
  links: Mutex<LinkSet>,
  exit_notify: Notify,
}

impl Task {
  /// Creates a new task of the given kind in state `INIT`.
  pub fn new(kind: HandleKind) -> Self {
    Self {
      id: HandleId::next(kind),
      state: Lifecycle::new(),
      mailbox: Mailbox::new(),
      links: Mutex::new(LinkSet::new()),
      exit_notify: Notify::new(),
    }
  }

  /// Returns the identity of this task.
  #[inline]
  pub const fn id(&self) -> HandleId {
    self.id
  }

  /// Returns the current lifecycle state.
  #[inline]
  pub fn state(&self) -> TaskState {
    self.state.state()
  }

  /// Returns `true` if the task is in state `INIT` or `RUNNING`.
  #[inline]
  pub fn exists(&self) -> bool {
    self.state.state().exists()
  }

  /// Returns the recorded exit reason.
  ///
  /// This is [`None`] until an exit signal is accepted or the task finishes.
  #[inline]
  pub fn exit_reason(&self) -> Option<Exit> {
    self.state.exit_reason()
  }

  /// Moves the task from `INIT` to `RUNNING`.
  ///
  /// # Panics
  ///
  /// Raises a `SysInv` exception if the task was already started.
  #[inline]
  pub fn start(&self) {
    self.state.start();
  }

  /// Surfaces a pending exit signal.
  ///
  /// Fails with `exit:Reason` once a signal was accepted, and keeps failing
  /// with the same reason after the task is `DONE`.
  pub fn check_exit(&self) -> Result<(), Interrupt> {
    match self.state.surfaced() {
      Some(reason) => Err(Interrupt::exit(reason)),
      None => Ok(()),
    }
  }

  // ---------------------------------------------------------------------------
  // Exit Protocol
  // ---------------------------------------------------------------------------

  /// Records `reason` if the task is `RUNNING`.
  ///
  /// Returns `true` exactly once: for the signal that moved the task to
  /// `EXIT_SIG`. The mailbox consumer and the driver are woken so that both
  /// observe the new state.
  pub(crate) fn accept_exit(&self, from: &HandleRef, reason: Exit) -> bool {
    let span: Span = tracing::trace_span!("Exit Signal", to = %self.id, %from);
    let _enter: span::Entered<'_> = span.enter();

    match self.state.accept(reason) {
      Accept::Accepted => {
        tracing::trace!(result = "accepted");
        self.mailbox.wake();
        self.exit_notify.notify_one();
        true
      }
      Accept::Pending => {
        tracing::trace!(result = "ignored", reason = "pending");
        false
      }
      Accept::Done => {
        tracing::trace!(result = "ignored", reason = "done");
        false
      }
    }
  }

  /// Waits until an exit signal has been accepted, returning its reason.
  pub async fn exit_requested(&self) -> Exit {
    loop {
      if let Some(reason) = self.state.surfaced() {
        return reason;
      }

      self.exit_notify.notified().await;
    }
  }

  /// Moves the task to `DONE`.
  ///
  /// Returns the final reason and the drained link set, or [`None`] if the
  /// task had already finished.
  pub(crate) fn finish(&self, reason: Exit) -> Option<(Exit, Vec<HandleRef>)> {
    let exit: Exit = self.state.finish(reason)?;
    let links: Vec<HandleRef> = self.links.lock().drain();

    self.mailbox.clear();
    self.mailbox.wake();
    self.exit_notify.notify_one();

    Some((exit, links))
  }

  // ---------------------------------------------------------------------------
  // Mailbox
  // ---------------------------------------------------------------------------

  /// Appends `message` to the mailbox.
  ///
  /// Never fails. Messages sent to a finished task are dropped.
  pub fn mbox_send(&self, message: Term) {
    if self.state.state() == TaskState::Done {
      tracing::trace!(to = %self.id, result = "dropped", reason = "done");
      return;
    }

    self.mailbox.push(message);
  }

  /// Returns a copy of the oldest message without removing it.
  pub fn mbox_peek(&self) -> Result<Option<Term>, Interrupt> {
    self.check_exit()?;
    Ok(self.mailbox.peek())
  }

  /// Waits until the mailbox is not empty.
  ///
  /// Fails with `exit:Reason` if an exit signal is accepted before or while
  /// waiting.
  pub async fn mbox_wait(&self) -> Result<(), Interrupt> {
    loop {
      self.check_exit()?;

      if !self.mailbox.is_empty() {
        return Ok(());
      }

      self.mailbox.changed().await;
    }
  }

  /// Waits at most `timeout` for the mailbox to become non-empty.
  ///
  /// Returns whether a message is present.
  pub async fn mbox_wait_timeout(&self, timeout: Duration) -> Result<bool, Interrupt> {
    match tokio::time::timeout(timeout, self.mbox_wait()).await {
      Ok(result) => result.map(|()| true),
      Err(_) => {
        self.check_exit()?;
        Ok(!self.mailbox.is_empty())
      }
    }
  }

  /// Waits until the mailbox is not empty, then discards the oldest message.
  pub async fn mbox_remove_one(&self) -> Result<(), Interrupt> {
    self.mbox_receive().await.map(drop)
  }

  /// Waits until the mailbox is not empty, then removes and returns the
  /// oldest message.
  pub async fn mbox_receive(&self) -> Result<Term, Interrupt> {
    loop {
      self.mbox_wait().await?;

      if let Some(message) = self.mailbox.pop() {
        return Ok(message);
      }
    }
  }

  /// Returns the number of queued messages.
  #[inline]
  pub fn mbox_len(&self) -> usize {
    self.mailbox.len()
  }

  // ---------------------------------------------------------------------------
  // Links
  // ---------------------------------------------------------------------------

  /// Records `peer` in this task's link set.
  ///
  /// Linking to oneself is ignored. Fails with `error:noproc` if `peer` does
  /// not exist or if this task is `DONE`. A task in `EXIT_SIG` still accepts
  /// links; they are notified when it terminates.
  pub fn link_oneway(&self, peer: &HandleRef) -> Result<(), Interrupt> {
    if peer.id() == self.id {
      return Ok(());
    }

    if !peer.exists() {
      tracing::trace!(from = %self.id, to = %peer, result = "noproc");
      return Err(Interrupt::noproc());
    }

    let mut links: MutexGuard<'_, LinkSet> = self.links.lock();

    if self.state() == TaskState::Done {
      tracing::trace!(from = %peer, to = %self.id, result = "noproc");
      return Err(Interrupt::noproc());
    }

    links.insert(peer.clone());

    Ok(())
  }

  /// Removes the link to the peer named by `id`. Never fails.
  #[inline]
  pub fn unlink(&self, id: HandleId) {
    self.links.lock().remove(&id);
  }

  /// Returns `true` if this task is linked to the peer named by `id`.
  #[inline]
  pub fn is_linked(&self, id: HandleId) -> bool {
    self.links.lock().contains(&id)
  }

  /// Returns a snapshot of the link set in identity order.
  #[inline]
  pub fn links(&self) -> Vec<HandleRef> {
    self.links.lock().iter().cloned().collect()
  }
}
