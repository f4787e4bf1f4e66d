//! Ertask - the schedulable-unit core of a BEAM-inspired runtime.
//!
//! A *unit* is one lightweight, independently-failing execution context:
//! either a process or an open port. Every unit owns a mailbox and a set of
//! links to peer units, and follows a small state machine deciding how an
//! asynchronous exit request interrupts its body.
//!
//! # Quick Start
//!
//! ```no_run
//! use ertask::core::Exit;
//! use ertask::core::Handle;
//! use ertask::core::Term;
//! use ertask::erts;
//! use ertask::erts::RuntimeConfig;
//! use ertask::init;
//! use ertask::task::Unit;
//!
//! let exit: Exit = init::block_on(RuntimeConfig::new(), |this| async move {
//!   let echo = erts::spawn_link(&this, |echo| async move {
//!     let message: Term = echo.task().mbox_receive().await?;
//!     println!("echo: {message}");
//!     Ok(())
//!   })?;
//!
//!   echo.handle().send(Term::new("hello"));
//!   Ok(())
//! });
//!
//! assert!(exit.is_normal());
//! ```
//!
//! # Core Modules
//!
//! - [`task`]: The unit state machine, mailbox, and link set
//! - [`core`]: Identity and value types (handles, atoms, terms, exits)
//! - [`erts`]: Concrete unit kinds and the tokio driver
//! - [`init`]: Runtime bootstrap
//! - [`error`]: Exceptions and interruptions
//! - [`consts`]: Runtime configuration constants

mod loom;
mod utils;

pub mod consts;
pub mod core;
pub mod error;
pub mod erts;
pub mod init;
pub mod task;
