use std::io::Write;
use std::num::NonZero;
use std::panic;
use std::thread::JoinHandle;

use crate::pal::{Platform, PlatformFacade};
use crate::{StartupError, StopFlag, spin_until_stopped};

/// What a completed heating session looked like.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct RunSummary {
    workers: NonZero<usize>,
}

impl RunSummary {
    /// How many worker threads were started and later joined.
    #[must_use]
    pub fn worker_count(&self) -> NonZero<usize> {
        self.workers
    }
}

/// Sizes the worker pool, wires up stop signals, starts one worker per logical processor and
/// waits for all of them to finish after a stop is requested.
#[derive(Debug)]
pub(crate) struct Supervisor {
    platform: PlatformFacade,
    flag: &'static StopFlag,
}

impl Supervisor {
    pub(crate) fn new(platform: PlatformFacade, flag: &'static StopFlag) -> Self {
        Self { platform, flag }
    }

    /// Runs until every worker has observed the stop request and returned.
    ///
    /// Returns an error without waiting for anything if startup fails at any step. Workers that
    /// were already running at that point are abandoned, not stopped.
    pub(crate) fn run(&self, stdout: &mut impl Write) -> Result<RunSummary, StartupError> {
        self.platform.acquire_console()?;

        self.platform
            .install_stop_handler(self.flag)
            .map_err(StartupError::SignalInstall)?;

        let worker_count = self.processor_count()?;

        let workers = self.spawn_workers(worker_count)?;

        // The pool is already running, a closed stdout is no reason to stop heating.
        drop(writeln!(stdout, "Started {worker_count} worker threads"));

        join_workers(workers);

        Ok(RunSummary {
            workers: worker_count,
        })
    }

    fn processor_count(&self) -> Result<NonZero<usize>, StartupError> {
        let reported = self.platform.online_processor_count();

        usize::try_from(reported)
            .ok()
            .and_then(NonZero::new)
            .ok_or(StartupError::ProcessorCount { reported })
    }

    fn spawn_workers(&self, count: NonZero<usize>) -> Result<Vec<JoinHandle<()>>, StartupError> {
        let count = count.get();

        let mut workers = Vec::new();
        workers
            .try_reserve_exact(count)
            .map_err(|source| StartupError::Allocation { count, source })?;

        for index in 0..count {
            let flag = self.flag;

            // On failure, dropping `workers` detaches the threads started so far. They keep
            // spinning until the process exits.
            let worker = self
                .platform
                .spawn_worker(
                    index,
                    Box::new(move || {
                        _ = spin_until_stopped(flag);
                    }),
                )
                .map_err(|source| StartupError::Spawn { index, source })?;

            workers.push(worker);
        }

        Ok(workers)
    }
}

fn join_workers(workers: Vec<JoinHandle<()>>) {
    for worker in workers {
        if let Err(payload) = worker.join() {
            panic::resume_unwind(payload);
        }
    }
}
