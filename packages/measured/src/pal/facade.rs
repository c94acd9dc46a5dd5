use std::fmt::{self, Debug};
#[cfg(test)]
use std::sync::Arc;
use std::time::Instant;

#[cfg(test)]
use parking_lot::Mutex;

#[cfg(test)]
use crate::pal::MockTimeSource;
use crate::pal::{RealTimeSource, TimeSource};

#[derive(Clone)]
pub(crate) enum TimeSourceFacade {
    Real(RealTimeSource),

    #[cfg(test)]
    Mock(Arc<Mutex<MockTimeSource>>),
}

impl TimeSourceFacade {
    pub(crate) const fn real() -> Self {
        Self::Real(RealTimeSource)
    }
}

impl From<RealTimeSource> for TimeSourceFacade {
    fn from(source: RealTimeSource) -> Self {
        Self::Real(source)
    }
}

#[cfg(test)]
impl From<MockTimeSource> for TimeSourceFacade {
    fn from(source: MockTimeSource) -> Self {
        Self::Mock(Arc::new(Mutex::new(source)))
    }
}

impl TimeSource for TimeSourceFacade {
    fn now(&self) -> Instant {
        match self {
            Self::Real(source) => source.now(),
            #[cfg(test)]
            Self::Mock(source) => source.lock().now(),
        }
    }
}

impl Debug for TimeSourceFacade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Real(source) => source.fmt(f),
            #[cfg(test)]
            Self::Mock(source) => source.fmt(f),
        }
    }
}
