use std::fmt::Debug;
use std::io;
use std::thread::JoinHandle;

use crate::{ConsoleError, StopFlag};

/// The entry point of one worker thread.
pub(crate) type WorkerEntry = Box<dyn FnOnce() + Send + 'static>;

/// Operating system capabilities used by the supervisor.
///
/// All OS interaction must go through this trait, enabling it to be mocked.
#[cfg_attr(test, mockall::automock)]
pub(crate) trait Platform: Debug + Send + Sync + 'static {
    /// Makes sure the standard output and standard error streams are usable.
    ///
    /// On platforms where the streams need no acquisition, this always succeeds.
    fn acquire_console(&self) -> Result<(), ConsoleError>;

    /// Registers a handler for the platform's "user requested termination" signals that sets
    /// `flag` and reports the received signal on standard error.
    fn install_stop_handler(&self, flag: &'static StopFlag) -> io::Result<()>;

    /// The number of online logical processors, exactly as reported by the operating system.
    ///
    /// The value is not validated - zero or negative values are possible and signal failure.
    fn online_processor_count(&self) -> i64;

    /// Starts a new OS thread for the worker at `index` in the pool.
    fn spawn_worker(&self, index: usize, entry: WorkerEntry) -> io::Result<JoinHandle<()>>;
}
