use std::time::Duration;

// -----------------------------------------------------------------------------
// System - Unit Behavior
// -----------------------------------------------------------------------------

/// Whether the [`TRAP_EXIT`] flag is set by default.
///
/// [`TRAP_EXIT`]: crate::erts::ProcessFlags::TRAP_EXIT
pub const SPAWN_INIT_TRAP_EXIT: bool = false;

/// Number of low bits of a [`HandleId`] reserved for the unit kind tag.
///
/// [`HandleId`]: crate::core::HandleId
pub const HANDLE_TAG_BITS: u32 = 4;

// -----------------------------------------------------------------------------
// System - Scheduler Behavior
// -----------------------------------------------------------------------------

/// Default amount of parallelism the tokio runtime should use.
///
/// Note: This value is only used when a default value is not
///       retrievable from the host environment.
pub const DEFAULT_PARALLELISM: usize = 1;

/// Number of scheduler ticks before polling for external events.
pub const DEFAULT_EVENT_INTERVAL: u32 = 61;

/// Number of scheduler ticks before polling the global task queue.
pub const DEFAULT_GLOBAL_QUEUE_INTERVAL: u32 = 31;

/// Limit for additional threads spawned by the tokio runtime.
pub const DEFAULT_MAX_BLOCKING_THREADS: usize = 512;

/// How long to keep threads in the blocking pool alive.
pub const DEFAULT_THREAD_KEEP_ALIVE: Duration = Duration::from_millis(10 * 1000);

/// Stack size (in bytes) for worker threads.
pub const DEFAULT_THREAD_STACK_SIZE: usize = 2 * 1024 * 1024;

// -----------------------------------------------------------------------------
// System - Shutdown
// -----------------------------------------------------------------------------

/// How long to wait for a clean shutdown of the internal runtime.
pub const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(30);

// -----------------------------------------------------------------------------
// System - Memory Allocation
// -----------------------------------------------------------------------------

/// Number of pre-allocated slots in a unit mailbox.
pub const CAP_TASK_MSG_BUFFER: usize = 8;
