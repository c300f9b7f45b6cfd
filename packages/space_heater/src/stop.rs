use std::sync::atomic::{AtomicBool, Ordering};

/// The flag that the signal bridge of the real process writes to.
///
/// Everything else (tests in particular) is free to create its own [`StopFlag`] instead.
pub static PROCESS_STOP_FLAG: StopFlag = StopFlag::new();

/// A one-way "stop requested" edge shared between whoever requests the stop and every worker.
///
/// The flag starts out clear and can only ever be set - there is no way to clear it again.
/// Setting the flag is a single atomic store, so it is safe to do from an asynchronous signal
/// handler.
#[derive(Debug, Default)]
pub struct StopFlag {
    requested: AtomicBool,
}

impl StopFlag {
    /// Creates a flag with no stop requested.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            requested: AtomicBool::new(false),
        }
    }

    /// Requests every observer of the flag to stop. Calling this more than once has no
    /// additional effect.
    ///
    /// This is async-signal-safe: it neither allocates nor takes any locks.
    pub fn set_stop(&self) {
        // Pairs with the Acquire in should_stop().
        self.requested.store(true, Ordering::Release);
    }

    /// Whether a stop has been requested.
    ///
    /// Once this returns `true` on any thread, it will return `true` forever after.
    #[must_use]
    #[inline]
    pub fn should_stop(&self) -> bool {
        self.requested.load(Ordering::Acquire)
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::AtomicUsize;
    use std::thread;

    use static_assertions::assert_impl_all;
    use testing::with_watchdog;

    use super::*;

    assert_impl_all!(StopFlag: Send, Sync);

    #[test]
    fn starts_clear() {
        let flag = StopFlag::new();
        assert!(!flag.should_stop());
    }

    #[test]
    fn set_is_observed() {
        let flag = StopFlag::new();
        flag.set_stop();
        assert!(flag.should_stop());
    }

    #[test]
    fn set_is_idempotent() {
        let flag = StopFlag::new();
        flag.set_stop();
        flag.set_stop();
        assert!(flag.should_stop());
    }

    #[test]
    fn default_is_clear() {
        assert!(!StopFlag::default().should_stop());
    }

    #[test]
    fn set_is_observed_by_other_threads() {
        with_watchdog(|| {
            let flag = Arc::new(StopFlag::new());
            let observers_started = Arc::new(AtomicUsize::new(0));

            let observers = (0..4)
                .map(|_| {
                    let flag = Arc::clone(&flag);
                    let observers_started = Arc::clone(&observers_started);

                    thread::spawn(move || {
                        observers_started.fetch_add(1, Ordering::Relaxed);

                        while !flag.should_stop() {}

                        // Monotonic: no later read may go back to false.
                        for _ in 0..1000 {
                            assert!(flag.should_stop());
                        }
                    })
                })
                .collect::<Vec<_>>();

            while observers_started.load(Ordering::Relaxed) < 4 {
                thread::yield_now();
            }

            flag.set_stop();

            for observer in observers {
                observer.join().unwrap();
            }
        });
    }
}
