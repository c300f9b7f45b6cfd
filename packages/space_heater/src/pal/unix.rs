use std::io;
use std::thread::{self, JoinHandle};

use libc::c_int;
use signal_hook::consts::{SIGHUP, SIGINT, SIGTERM};

use crate::pal::{ExitMessageBuffer, Platform, WorkerEntry, exit_message};
use crate::worker::worker_thread_name;
use crate::{ConsoleError, StopFlag};

/// Interactive interrupt, polite termination and terminal hangup all mean "stop heating".
const STOP_SIGNALS: [c_int; 3] = [SIGINT, SIGTERM, SIGHUP];

/// The platform that the build is targeting.
///
/// You would only use a different platform in unit tests that need to mock the OS.
#[derive(Debug, Default)]
pub(crate) struct BuildTargetPlatform;

pub(crate) static BUILD_TARGET_PLATFORM: BuildTargetPlatform = BuildTargetPlatform;

// Real OS bindings are excluded from coverage measurement because:
// 1. They are tested via integration tests running the real binary.
// 2. Error paths require OS-level failures that are impractical to trigger in tests.
#[cfg_attr(coverage_nightly, coverage(off))]
impl Platform for BuildTargetPlatform {
    fn acquire_console(&self) -> Result<(), ConsoleError> {
        // File descriptors 1 and 2 are inherited, there is nothing to acquire.
        Ok(())
    }

    fn install_stop_handler(&self, flag: &'static StopFlag) -> io::Result<()> {
        for signal in STOP_SIGNALS {
            // SAFETY: The action only formats into a stack buffer, calls write(2) and performs
            // an atomic store, all of which are async-signal-safe.
            unsafe {
                signal_hook::low_level::register(signal, move || on_stop_signal(signal, flag))?;
            }
        }

        Ok(())
    }

    #[allow(
        clippy::useless_conversion,
        reason = "c_long is only as wide as i64 on 64-bit targets"
    )]
    fn online_processor_count(&self) -> i64 {
        // SAFETY: No safety requirements.
        let count = unsafe { libc::sysconf(libc::_SC_NPROCESSORS_ONLN) };

        i64::from(count)
    }

    fn spawn_worker(&self, index: usize, entry: WorkerEntry) -> io::Result<JoinHandle<()>> {
        thread::Builder::new()
            .name(worker_thread_name(index))
            .spawn(entry)
    }
}

/// Runs in asynchronous signal context, so everything here must be async-signal-safe.
fn on_stop_signal(signal: c_int, flag: &StopFlag) {
    let mut buffer = ExitMessageBuffer::new();
    let message = exit_message(i64::from(signal), &mut buffer);

    // SAFETY: write(2) is async-signal-safe and the pointer is valid for `message.len()` bytes.
    // A failed write is of no consequence - the stop request below is what matters.
    unsafe {
        libc::write(libc::STDERR_FILENO, message.as_ptr().cast(), message.len());
    }

    flag.set_stop();
}
