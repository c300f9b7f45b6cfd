#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![cfg_attr(coverage_nightly, coverage(off))] // This is all test code, no need to test it.

//! Private helpers for testing the space heater.

use std::sync::mpsc;
use std::thread;
use std::time::Duration;

/// How long a test may run before the watchdog declares it hung.
const WATCHDOG_TIMEOUT: Duration = Duration::from_secs(10);

/// Runs a test on a separate thread and fails it if it does not finish within 10 seconds.
///
/// Tests that start spinning worker threads hang forever if a stop request is lost. The
/// watchdog turns such a hang into an ordinary test failure. The hung threads themselves
/// cannot be killed and are left to end with the test process.
///
/// When the `MUTATION_TESTING` environment variable is set to "1", the watchdog is disabled and
/// the test function is executed directly, so that mutation testing can detect hanging mutants
/// with its own timeout.
///
/// # Panics
///
/// Panics if the test exceeds the timeout (when not in mutation testing mode). If the test
/// itself panics, the panic is propagated.
///
/// # Example
///
/// ```rust
/// use testing::with_watchdog;
///
/// let answer = with_watchdog(|| 2 + 2);
/// assert_eq!(answer, 4);
/// ```
pub fn with_watchdog<F, R>(test_fn: F) -> R
where
    F: FnOnce() -> R + Send + 'static,
    R: Send + 'static,
{
    if std::env::var("MUTATION_TESTING").as_deref() == Ok("1") {
        return test_fn();
    }

    let (tx, rx) = mpsc::channel();

    let test_handle = thread::spawn(move || {
        // If this fails, the watchdog has already given up on us.
        drop(tx.send(test_fn()));
    });

    match rx.recv_timeout(WATCHDOG_TIMEOUT) {
        Ok(result) => {
            test_handle.join().expect("test thread already produced its result");
            result
        }
        Err(mpsc::RecvTimeoutError::Timeout) => {
            panic!("test did not finish within {WATCHDOG_TIMEOUT:?}, it is probably hung");
        }
        Err(mpsc::RecvTimeoutError::Disconnected) => match test_handle.join() {
            Ok(()) => panic!("test thread exited without producing a result"),
            Err(payload) => std::panic::resume_unwind(payload),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn returns_test_result() {
        assert_eq!(with_watchdog(|| 42), 42);
    }

    #[test]
    #[should_panic(expected = "inner failure")]
    fn propagates_test_panic() {
        with_watchdog(|| {
            let value: u32 = "not a number".parse().expect("inner failure");
            value
        });
    }
}
