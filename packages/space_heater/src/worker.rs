use crate::StopFlag;

/// Burns processor time on the current thread until `flag` requests a stop.
///
/// The loop body is nothing but a re-read of the flag and a counter bump. The atomic load cannot
/// be elided by the optimizer, so the loop keeps the processor busy with branch-and-load traffic
/// without touching any shared cache lines other than the flag itself.
///
/// Never sleeps, yields or blocks. Returns the number of completed iterations, which is zero if
/// the stop was already requested when the worker started.
#[must_use]
pub fn spin_until_stopped(flag: &StopFlag) -> u64 {
    let mut iterations: u64 = 0;

    while !flag.should_stop() {
        iterations = iterations.wrapping_add(1);
    }

    iterations
}

/// Name given to the OS thread that runs the worker at `index` in the pool.
pub(crate) fn worker_thread_name(index: usize) -> String {
    format!("space_heater-worker-{index}")
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use std::thread;
    use std::time::Duration;

    use testing::with_watchdog;

    use super::*;

    #[test]
    fn returns_immediately_when_already_stopped() {
        let flag = StopFlag::new();
        flag.set_stop();

        assert_eq!(spin_until_stopped(&flag), 0);
    }

    #[test]
    fn spins_until_stop_is_requested() {
        with_watchdog(|| {
            let flag: &'static StopFlag = Box::leak(Box::new(StopFlag::new()));

            let worker = thread::spawn(move || spin_until_stopped(flag));

            thread::sleep(Duration::from_millis(50));
            assert!(!worker.is_finished());

            flag.set_stop();

            worker.join().unwrap();
        });
    }

    #[test]
    fn many_workers_all_stop() {
        with_watchdog(|| {
            let flag: &'static StopFlag = Box::leak(Box::new(StopFlag::new()));

            let workers = (0..8)
                .map(|_| thread::spawn(move || spin_until_stopped(flag)))
                .collect::<Vec<_>>();

            flag.set_stop();

            for worker in workers {
                worker.join().unwrap();
            }
        });
    }

    #[test]
    fn thread_name_includes_index() {
        assert_eq!(worker_thread_name(0), "space_heater-worker-0");
        assert_eq!(worker_thread_name(17), "space_heater-worker-17");
    }
}
