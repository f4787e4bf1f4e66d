//! Concrete unit kinds and the tokio driver that runs them.
//!
//! # Unit Kinds
//!
//! - [`Process`]: Runs user code; may trap exit signals ([`ProcessFlags`])
//! - [`Port`]: Bridges an external resource; always linked to its owner
//!
//! # Spawning
//!
//! [`spawn`], [`spawn_link`], [`spawn_opt`], and [`open_port`] start a unit
//! and run its body on the current tokio runtime. The body receives the unit
//! itself and returns `Result<(), Interrupt>`; the driver turns the outcome
//! into the unit's exit reason:
//!
//! - `Ok(())` exits with `normal`
//! - `Err(interrupt)` exits with the interrupt's reason
//! - A panic exits with a term holding the panic message
//!
//! An accepted exit signal ends the body at its current await point.
//!
//! [`Interrupt`]: crate::error::Interrupt

mod message;
mod port;
mod process;
mod runtime;
mod spawn;

pub use self::message::ExitMessage;
pub use self::port::Port;
pub use self::port::PortId;
pub use self::process::Pid;
pub use self::process::Process;
pub use self::process::ProcessFlags;
pub use self::runtime::RuntimeConfig;
pub use self::spawn::SpawnConfig;
pub use self::spawn::SpawnHandle;
pub use self::spawn::open_port;
pub use self::spawn::spawn;
pub use self::spawn::spawn_link;
pub use self::spawn::spawn_opt;
