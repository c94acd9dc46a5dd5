use std::fmt::Debug;
use std::time::Instant;

/// Source of monotonically non-decreasing timestamps.
#[cfg_attr(test, mockall::automock)]
pub(crate) trait TimeSource: Debug + Send + Sync + 'static {
    fn now(&self) -> Instant;
}
