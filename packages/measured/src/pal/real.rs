use std::time::Instant;

use crate::pal::TimeSource;

/// Reads the monotonic clock via the Rust standard library.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct RealTimeSource;

impl TimeSource for RealTimeSource {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

#[cfg(test)]
#[cfg(not(miri))] // Miri cannot talk to the real platform.
mod tests {
    use super::*;

    #[test]
    fn real_time_does_not_go_backwards() {
        let source = RealTimeSource;

        let first = source.now();
        let second = source.now();

        assert!(second >= first);
    }
}
