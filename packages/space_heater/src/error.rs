use std::collections::TryReserveError;
use std::io;

use thiserror::Error;

/// Reasons why the heater could not get all of its workers running.
///
/// Every one of these is fatal. Workers that were already started before the failure are
/// abandoned to process teardown rather than stopped and joined.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StartupError {
    /// The standard output or standard error stream of the process is not usable.
    #[error("failed to initialize console: {0}")]
    ConsoleInit(#[from] ConsoleError),

    /// The handler that turns stop signals into a stop request could not be registered.
    #[error("failed to install stop signal handler: {0}")]
    SignalInstall(#[source] io::Error),

    /// The operating system did not report a usable number of online processors.
    #[error("failed to get the number of processors (operating system reported {reported})")]
    ProcessorCount {
        /// The raw value the operating system returned.
        reported: i64,
    },

    /// Memory for the worker handles could not be allocated.
    #[error("failed to allocate memory for {count} worker threads: {source}")]
    Allocation {
        /// How many worker handles we tried to make room for.
        count: usize,

        /// The underlying allocation failure.
        #[source]
        source: TryReserveError,
    },

    /// The operating system refused to create one of the worker threads.
    #[error("failed to create worker thread {index}: {source}")]
    Spawn {
        /// Zero-based position of the worker that could not be created.
        index: usize,

        /// The underlying OS error.
        #[source]
        source: io::Error,
    },
}

/// One of the standard streams of the process could not be acquired.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConsoleError {
    /// The standard output handle is missing or invalid.
    #[error("standard output is not available")]
    StandardOutput,

    /// The standard error handle is missing or invalid.
    #[error("standard error is not available")]
    StandardError,
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use std::fmt::Debug;

    use static_assertions::assert_impl_all;

    use super::*;

    assert_impl_all!(StartupError: Send, Sync, Debug);
    assert_impl_all!(ConsoleError: Send, Sync, Debug);

    #[test]
    fn processor_count_mentions_processors() {
        let message = StartupError::ProcessorCount { reported: 0 }.to_string();

        assert!(message.contains("processors"));
        assert!(message.contains('0'));
    }

    #[test]
    fn spawn_mentions_thread_index() {
        let error = StartupError::Spawn {
            index: 2,
            source: io::Error::new(io::ErrorKind::OutOfMemory, "no more threads"),
        };

        assert_eq!(
            error.to_string(),
            "failed to create worker thread 2: no more threads"
        );
    }

    #[test]
    fn console_error_names_the_stream() {
        let error = StartupError::from(ConsoleError::StandardError);

        assert_eq!(
            error.to_string(),
            "failed to initialize console: standard error is not available"
        );
    }
}
