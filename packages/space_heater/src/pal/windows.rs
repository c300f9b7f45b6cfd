use std::io::{self, Write};
use std::sync::OnceLock;
use std::thread::{self, JoinHandle};

use windows::Win32::System::Console::{
    CTRL_BREAK_EVENT, CTRL_C_EVENT, CTRL_CLOSE_EVENT, CTRL_LOGOFF_EVENT, CTRL_SHUTDOWN_EVENT,
    GetStdHandle, STD_ERROR_HANDLE, STD_HANDLE, STD_OUTPUT_HANDLE, SetConsoleCtrlHandler,
};
use windows::Win32::System::Diagnostics::Debug::OutputDebugStringA;
use windows::Win32::System::SystemInformation::{GetSystemInfo, SYSTEM_INFO};
use windows::core::{BOOL, s};

use crate::pal::{ExitMessageBuffer, Platform, WorkerEntry, exit_message};
use crate::worker::worker_thread_name;
use crate::{ConsoleError, StopFlag};

/// The console control handler is a plain function, so the flag it sets has to be reachable
/// from a static.
static CONSOLE_STOP_FLAG: OnceLock<&'static StopFlag> = OnceLock::new();

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
        if !is_usable_std_handle(STD_OUTPUT_HANDLE) {
            // SAFETY: No safety requirements beyond passing a valid string.
            unsafe { OutputDebugStringA(s!("ERROR: Failed to initialize standard output")) };
            return Err(ConsoleError::StandardOutput);
        }

        if !is_usable_std_handle(STD_ERROR_HANDLE) {
            // SAFETY: No safety requirements beyond passing a valid string.
            unsafe { OutputDebugStringA(s!("ERROR: Failed to initialize standard error output")) };
            return Err(ConsoleError::StandardError);
        }

        Ok(())
    }

    fn install_stop_handler(&self, flag: &'static StopFlag) -> io::Result<()> {
        CONSOLE_STOP_FLAG.get_or_init(|| flag);

        // SAFETY: The handler is a valid function for the lifetime of the process.
        unsafe { SetConsoleCtrlHandler(Some(on_console_control_event), true) }
            .map_err(io::Error::from)
    }

    fn online_processor_count(&self) -> i64 {
        let mut info = SYSTEM_INFO::default();

        // SAFETY: No safety requirements beyond passing a valid pointer.
        unsafe { GetSystemInfo(&raw mut info) };

        i64::from(info.dwNumberOfProcessors)
    }

    fn spawn_worker(&self, index: usize, entry: WorkerEntry) -> io::Result<JoinHandle<()>> {
        thread::Builder::new()
            .name(worker_thread_name(index))
            .spawn(entry)
    }
}

fn is_usable_std_handle(which: STD_HANDLE) -> bool {
    // SAFETY: No safety requirements.
    let handle = unsafe { GetStdHandle(which) };

    handle.is_ok_and(|handle| !handle.is_invalid())
}

/// Windows invokes console control handlers on a dedicated thread, so unlike a POSIX signal
/// handler this may use regular (locking) standard error output.
#[cfg_attr(coverage_nightly, coverage(off))]
unsafe extern "system" fn on_console_control_event(control_type: u32) -> BOOL {
    match control_type {
        CTRL_C_EVENT | CTRL_BREAK_EVENT | CTRL_CLOSE_EVENT | CTRL_LOGOFF_EVENT
        | CTRL_SHUTDOWN_EVENT => {
            let mut buffer = ExitMessageBuffer::new();

            // Nothing to do if this fails - the stop request below is what matters.
            drop(io::stderr().write_all(exit_message(i64::from(control_type), &mut buffer)));

            if let Some(flag) = CONSOLE_STOP_FLAG.get() {
                flag.set_stop();
            }

            if ends_process_on_return(control_type) {
                // Returning would let Windows terminate us before the workers are joined. The
                // process ends (with our exit code) once the supervisor returns from main.
                loop {
                    thread::park();
                }
            }

            true.into()
        }
        // Not ours - let the next handler in the chain decide.
        _ => false.into(),
    }
}

/// Whether Windows terminates the process as soon as the handler for this event returns.
fn ends_process_on_return(control_type: u32) -> bool {
    matches!(
        control_type,
        CTRL_CLOSE_EVENT | CTRL_LOGOFF_EVENT | CTRL_SHUTDOWN_EVENT
    )
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn session_ending_events_end_process_on_return() {
        assert!(ends_process_on_return(CTRL_CLOSE_EVENT));
        assert!(ends_process_on_return(CTRL_LOGOFF_EVENT));
        assert!(ends_process_on_return(CTRL_SHUTDOWN_EVENT));
    }

    #[test]
    fn keyboard_events_do_not_end_process_on_return() {
        assert!(!ends_process_on_return(CTRL_C_EVENT));
        assert!(!ends_process_on_return(CTRL_BREAK_EVENT));
    }
}
