use std::collections::VecDeque;
use std::fmt::Debug;
use std::fmt::Formatter;
use std::fmt::Result;
use tokio::sync::Notify;

use crate::consts::CAP_TASK_MSG_BUFFER;
use crate::core::Term;
use crate::loom::sync::Mutex;

// -----------------------------------------------------------------------------
// Mailbox
// -----------------------------------------------------------------------------

/// FIFO queue of messages delivered to a unit.
///
/// Producers never block. Consumers wait on [`changed`], which stores a
/// permit when nobody is waiting, so a push that races with a consumer
/// checking for emptiness is never lost.
///
/// [`changed`]: Self::changed
pub struct Mailbox {
  queue: Mutex<VecDeque<Term>>,
  notify: Notify,
}

impl Mailbox {
  /// Creates a new empty mailbox.
  #[inline]
  pub fn new() -> Self {
    Self {
      queue: Mutex::new(VecDeque::with_capacity(CAP_TASK_MSG_BUFFER)),
      notify: Notify::new(),
    }
  }

  /// Appends a message to the back of the queue and wakes the consumer.
  #[inline]
  pub fn push(&self, message: Term) {
    self.queue.lock().push_back(message);
    self.notify.notify_one();
  }

  /// Returns a copy of the oldest message without removing it.
  #[inline]
  pub fn peek(&self) -> Option<Term> {
    self.queue.lock().front().cloned()
  }

  /// Removes and returns the oldest message.
  #[inline]
  pub fn pop(&self) -> Option<Term> {
    self.queue.lock().pop_front()
  }

  /// Returns the number of queued messages.
  #[inline]
  pub fn len(&self) -> usize {
    self.queue.lock().len()
  }

  /// Returns `true` if no messages are queued.
  #[inline]
  pub fn is_empty(&self) -> bool {
    self.queue.lock().is_empty()
  }

  /// Drops every queued message.
  #[inline]
  pub fn clear(&self) {
    self.queue.lock().clear();
  }

  /// Wakes the consumer without enqueuing a message.
  ///
  /// Used to let a blocked receiver observe a state change.
  #[inline]
  pub fn wake(&self) {
    self.notify.notify_one();
  }

  /// Waits until the mailbox is pushed to or woken.
  #[inline]
  pub async fn changed(&self) {
    self.notify.notified().await;
  }
}

impl Default for Mailbox {
  #[inline]
  fn default() -> Self {
    Self::new()
  }
}

impl Debug for Mailbox {
  fn fmt(&self, f: &mut Formatter<'_>) -> Result {
    f.write_str("Mailbox ")?;
    f.debug_list().entries(self.queue.lock().iter()).finish()
  }
}

// -----------------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------------

#[cfg(all(test, not(loom)))]
mod tests {
  use std::time::Duration;

  use crate::core::Term;
  use crate::task::Mailbox;

  #[test]
  fn test_fifo() {
    let mailbox: Mailbox = Mailbox::new();

    mailbox.push(Term::new(1_i32));
    mailbox.push(Term::new(2_i32));

    assert_eq!(mailbox.len(), 2);
    assert_eq!(mailbox.peek(), Some(Term::new(1_i32)));
    assert_eq!(mailbox.pop(), Some(Term::new(1_i32)));
    assert_eq!(mailbox.pop(), Some(Term::new(2_i32)));
    assert_eq!(mailbox.pop(), None);
    assert!(mailbox.is_empty());
  }

  #[test]
  fn test_clear() {
    let mailbox: Mailbox = Mailbox::new();

    mailbox.push(Term::new("a"));
    mailbox.clear();

    assert!(mailbox.is_empty());
    assert_eq!(mailbox.peek(), None);
  }

  #[tokio::test]
  async fn test_push_before_wait_is_not_lost() {
    let mailbox: Mailbox = Mailbox::new();

    mailbox.push(Term::new(()));

    tokio::time::timeout(Duration::from_secs(1), mailbox.changed())
      .await
      .expect("stored permit");
  }

  #[tokio::test]
  async fn test_wake() {
    let mailbox: Mailbox = Mailbox::new();

    mailbox.wake();
    mailbox.changed().await;

    assert!(mailbox.is_empty());
  }
}
