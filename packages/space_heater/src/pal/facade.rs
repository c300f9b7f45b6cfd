use std::fmt::Debug;
use std::io;
#[cfg(test)]
use std::sync::Arc;
use std::thread::JoinHandle;

#[cfg(test)]
use crate::pal::MockPlatform;
use crate::pal::{BUILD_TARGET_PLATFORM, BuildTargetPlatform, Platform, WorkerEntry};
use crate::{ConsoleError, StopFlag};

/// Hides the real/mock platform choice behind a single type.
#[derive(Clone)]
pub(crate) enum PlatformFacade {
    Target(&'static BuildTargetPlatform),

    #[cfg(test)]
    Mock(Arc<MockPlatform>),
}

impl PlatformFacade {
    pub(crate) const fn target() -> Self {
        Self::Target(&BUILD_TARGET_PLATFORM)
    }

    #[cfg(test)]
    pub(crate) fn from_mock(mock: MockPlatform) -> Self {
        Self::Mock(Arc::new(mock))
    }
}

// Facade types are trivial pass-through layers - not worth testing.
#[cfg_attr(coverage_nightly, coverage(off))]
#[cfg_attr(test, mutants::skip)]
impl Platform for PlatformFacade {
    fn acquire_console(&self) -> Result<(), ConsoleError> {
        match self {
            Self::Target(p) => p.acquire_console(),
            #[cfg(test)]
            Self::Mock(p) => p.acquire_console(),
        }
    }

    fn install_stop_handler(&self, flag: &'static StopFlag) -> io::Result<()> {
        match self {
            Self::Target(p) => p.install_stop_handler(flag),
            #[cfg(test)]
            Self::Mock(p) => p.install_stop_handler(flag),
        }
    }

    fn online_processor_count(&self) -> i64 {
        match self {
            Self::Target(p) => p.online_processor_count(),
            #[cfg(test)]
            Self::Mock(p) => p.online_processor_count(),
        }
    }

    fn spawn_worker(&self, index: usize, entry: WorkerEntry) -> io::Result<JoinHandle<()>> {
        match self {
            Self::Target(p) => p.spawn_worker(index, entry),
            #[cfg(test)]
            Self::Mock(p) => p.spawn_worker(index, entry),
        }
    }
}

#[cfg_attr(coverage_nightly, coverage(off))] // No API contract to test.
impl Debug for PlatformFacade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Target(inner) => inner.fmt(f),
            #[cfg(test)]
            Self::Mock(inner) => inner.fmt(f),
        }
    }
}

#[cfg(test)]
impl From<MockPlatform> for PlatformFacade {
    fn from(p: MockPlatform) -> Self {
        Self::from_mock(p)
    }
}
