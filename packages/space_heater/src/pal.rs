//! Platform Abstraction Layer (PAL). Everything the heater needs from the operating system goes
//! through the [`Platform`] trait so the supervisor can be exercised against a mock.

mod abstractions;
pub(crate) use abstractions::*;

mod exit_message;
pub(crate) use exit_message::*;

mod facade;
pub(crate) use facade::*;

#[cfg(unix)]
mod unix;
#[cfg(unix)]
pub(crate) use unix::*;

#[cfg(windows)]
mod windows;
#[cfg(windows)]
pub(crate) use self::windows::*;

#[cfg(not(any(unix, windows)))]
compile_error!("space_heater supports only Unix-like and Windows hosts");
