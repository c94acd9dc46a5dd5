#![cfg_attr(coverage_nightly, coverage(off))]

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::{Duration, Instant};

use crate::pal::MockTimeSource;

/// Creates a mock time source where every call to `now()` advances the clock by `step`.
///
/// The first call returns the base instant, which the timeline uses as its origin. This makes
/// the N-th mark land at exactly `N * step` on the timeline.
pub(crate) fn stepping_time_source(step: Duration) -> MockTimeSource {
    let base = Instant::now();
    let calls = Arc::new(AtomicU32::new(0));

    let mut source = MockTimeSource::new();
    source.expect_now().returning(move || {
        let call = calls.fetch_add(1, Ordering::Relaxed);

        base.checked_add(step.saturating_mul(call))
            .expect("test clock stays within a realistic range")
    });

    source
}
