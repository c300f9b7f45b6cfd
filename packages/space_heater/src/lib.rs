#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![cfg_attr(docsrs, feature(doc_cfg))]

//! Heats up the room by keeping every logical processor of the machine busy until interrupted.
//!
//! One worker thread is started per online logical processor. Each worker spins on a shared
//! [`StopFlag`] until a stop signal (Ctrl-C, `SIGTERM`, `SIGHUP` or a Windows console close,
//! logoff or shutdown event) sets the flag, after which every worker returns and the process
//! exits cleanly.
//!
//! The binary entry point is in `main.rs`; this crate exposes the pieces it is made of.
//!
//! # Example
//!
//! Spinning on a flag that has already been set returns immediately:
//!
//! ```
//! use space_heater::{StopFlag, spin_until_stopped};
//!
//! let flag = StopFlag::new();
//! flag.set_stop();
//!
//! assert_eq!(spin_until_stopped(&flag), 0);
//! ```

mod error;
mod pal;
mod stop;
mod supervisor;
mod worker;

use std::io;

pub use error::*;
use pal::PlatformFacade;
pub use stop::*;
pub use supervisor::RunSummary;
use supervisor::Supervisor;
pub use worker::spin_until_stopped;

/// Starts one worker per online logical processor and waits until a stop signal has made all of
/// them return.
///
/// Prints `Started <N> worker threads` to standard output once every worker is running. The
/// stop signal handler reports each received signal on standard error.
///
/// # Errors
///
/// Returns an error if any startup step fails: console acquisition, stop signal handler
/// registration, processor count detection, worker handle allocation or thread creation.
/// Workers started before a failure are abandoned and end with the process.
#[cfg_attr(test, mutants::skip)] // Real OS entry point, exercised by the integration tests.
pub fn run() -> Result<RunSummary, StartupError> {
    Supervisor::new(PlatformFacade::target(), &PROCESS_STOP_FLAG).run(&mut io::stdout())
}
