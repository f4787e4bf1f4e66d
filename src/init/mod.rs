//! Runtime bootstrap.
//!
//! [`block_on`] builds a multi-threaded tokio runtime from a
//! [`RuntimeConfig`], installs the tracing subscriber, and runs a root
//! process to completion.

use std::fmt::Display;
use std::sync::Arc;
use std::sync::atomic::AtomicU32;
use std::sync::atomic::Ordering;
use std::time::Duration;
use std::time::Instant;
use tokio::runtime::Builder;
use tokio::runtime::Runtime as TokioRuntime;
use tracing::Level;
use tracing::Span;
use tracing::debug;
use tracing::error;
use tracing::info;
use tracing::span;

use crate::core::Exit;
use crate::error::Exception;
use crate::error::ExceptionClass;
use crate::error::ExceptionGroup;
use crate::error::Interrupt;
use crate::erts;
use crate::erts::Process;
use crate::erts::RuntimeConfig;
use crate::raise;

/// Runs `body` as the root process on a new runtime and returns its final
/// exit reason.
///
/// The runtime is shut down after the root process terminates; units still
/// running at that point are dropped.
///
/// # Panics
///
/// Raises a `SysInv` exception if the tokio runtime cannot be built.
pub fn block_on<F, T>(config: RuntimeConfig, body: F) -> Exit
where
  F: FnOnce(Arc<Process>) -> T,
  T: Future<Output = Result<(), Interrupt>> + Send + 'static,
{
  if let Err(error) = init_tracing_subscriber(&config) {
    eprintln!("failed to set tracing subscriber:");
    eprintln!("    {}", error.error());
  }

  let span: Span = span!(target: "ertask", Level::DEBUG, "init::block_on");

  let runtime: TokioRuntime = match build_tokio_runtime(&config) {
    Ok(runtime) => runtime,
    Err(error) => {
      error!(target: "ertask", parent: &span, error = error.error(), "failed to build runtime");
      raise!(Error, SysInv, error.error());
    }
  };

  let exit: Exit = runtime.block_on(async {
    debug!(target: "ertask", parent: &span, "initializing");
    erts::spawn(body).join().await
  });

  info!(
    target: "ertask",
    parent: &span,
    reason = %exit,
    timeout = ?config.rt_shutdown_timeout,
    "system stopping",
  );

  let instant: Instant = Instant::now();
  runtime.shutdown_timeout(config.rt_shutdown_timeout);
  let elapsed: Duration = instant.elapsed();

  info!(target: "ertask", parent: &span, elapsed = ?elapsed, "system stopped");

  exit
}

/// Builds the global tracing subscriber configuration.
#[cfg(feature = "tracing")]
fn init_tracing_subscriber(config: &RuntimeConfig) -> Result<(), Exception> {
  use tracing_subscriber::FmtSubscriber;
  use tracing_subscriber::fmt::format;
  use tracing_subscriber::util::SubscriberInitExt;

  FmtSubscriber::builder()
    .event_format(format().compact())
    .log_internal_errors(true)
    .with_ansi(true)
    .with_file(config.tracing_source_file)
    .with_level(true)
    .with_line_number(config.tracing_source_line)
    .with_max_level(config.tracing_filter())
    .with_target(config.tracing_source_name)
    .with_thread_ids(config.tracing_thread_info)
    .with_thread_names(config.tracing_thread_info)
    .finish()
    .try_init()
    .map_err(error)
}

#[cfg(not(feature = "tracing"))]
fn init_tracing_subscriber(_config: &RuntimeConfig) -> Result<(), Exception> {
  Ok(())
}

/// Builds the tokio multi-threaded runtime with the given configuration.
fn build_tokio_runtime(config: &RuntimeConfig) -> Result<TokioRuntime, Exception> {
  Builder::new_multi_thread()
    .enable_time()
    .event_interval(config.rt_event_interval)
    .global_queue_interval(config.rt_global_queue_interval)
    .max_blocking_threads(config.rt_max_blocking_threads)
    .thread_keep_alive(config.rt_thread_keep_alive)
    .thread_name_fn(next_worker_name)
    .thread_stack_size(config.rt_thread_stack_size)
    .worker_threads(config.rt_worker_threads)
    .build()
    .map_err(error)
}

/// Generates a unique name for the next worker thread.
#[inline]
fn next_worker_name() -> String {
  format!("ertask-worker-{:0>2}", next_worker_id())
}

/// Atomically increments and returns the next worker thread ID.
#[inline]
fn next_worker_id() -> u32 {
  static ID: AtomicU32 = AtomicU32::new(1);
  ID.fetch_add(1, Ordering::Relaxed)
}

/// Returns a generic `SysInv` exception with the given error message.
#[cold]
fn error<E>(error: E) -> Exception
where
  E: Display,
{
  Exception::new(ExceptionClass::Error, ExceptionGroup::SysInv, error)
}
