//! The schedulable-unit core.
//!
//! Every unit, whatever its kind, embeds a [`Task`]:
//!
//! - [`Lifecycle`]: The `INIT → RUNNING → EXIT_SIG → DONE` state machine and
//!   the recorded exit reason, serialized by one lock
//! - [`Mailbox`]: Multi-producer, single-consumer FIFO of [`Term`] messages
//! - [`LinkSet`]: Peers notified when the unit terminates, ordered by
//!   identity
//!
//! The [`Unit`] trait layers linking, the exit-signal protocol, and the
//! termination broadcast on top, and [`TaskHandle`] is the weak handle
//! through which peers reach a unit.
//!
//! # Suspension
//!
//! A unit body only waits for input in [`Task::mbox_wait`] and the methods
//! built on it. Each of them checks for a pending exit signal before and
//! after every suspension, so a blocked receive is woken and fails with
//! `exit:Reason` once a signal is accepted.
//!
//! [`Term`]: crate::core::Term

mod task_data;
mod task_handle;
mod task_link;
mod task_mail;
mod task_state;
mod task_unit;

pub use self::task_data::Task;
pub use self::task_handle::TaskHandle;
pub use self::task_link::LinkSet;
pub use self::task_mail::Mailbox;
pub use self::task_state::Accept;
pub use self::task_state::Lifecycle;
pub use self::task_state::TaskState;
pub use self::task_unit::Unit;
