use std::fmt::{self, Display};
use std::time::Duration;

use crate::MeasureEntry;

/// A measurement of the execution time of one wrapped operation.
///
/// Exactly one measurement is produced per invocation of [`measured()`][crate::measured], after
/// the wrapped operation has settled. Every callback receives its own clone, so nothing one
/// callback does to its copy can be observed by another.
///
/// Timestamps are expressed as offsets from the origin of the [`Timeline`][crate::Timeline] that
/// produced them, which makes them comparable with each other and with [`Timeline::now()`].
///
/// [`Timeline::now()`]: crate::Timeline::now
///
/// # Example
///
/// ```
/// use std::sync::mpsc;
///
/// use futures::executor::block_on;
/// use measured::{Options, measured};
///
/// let (tx, rx) = mpsc::channel();
///
/// let result = block_on(measured(
///     || async { Ok::<_, ()>("X") },
///     Options::new().id("A").on_complete(move |measurement| {
///         tx.send(measurement).unwrap();
///     }),
/// ));
///
/// assert_eq!(result, Ok("X"));
///
/// let measurement = rx.recv().unwrap();
/// assert_eq!(measurement.id(), "A");
/// assert_eq!(
///     measurement.duration(),
///     measurement.end_time() - measurement.start_time()
/// );
/// ```
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Measurement {
    id: String,
    start_time: Duration,
    duration: Duration,
}

impl Measurement {
    #[must_use]
    pub(crate) fn new(id: String, start_time: Duration, duration: Duration) -> Self {
        Self {
            id,
            start_time,
            duration,
        }
    }

    /// The correlation identifier of the invocation that produced this measurement.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// When the wrapped operation started, relative to the timeline origin.
    #[must_use]
    pub fn start_time(&self) -> Duration {
        self.start_time
    }

    /// When the wrapped operation settled, relative to the timeline origin.
    #[must_use]
    pub fn end_time(&self) -> Duration {
        self.start_time.saturating_add(self.duration)
    }

    /// How long the wrapped operation took to settle, whether it succeeded or not.
    #[must_use]
    pub fn duration(&self) -> Duration {
        self.duration
    }
}

impl From<MeasureEntry> for Measurement {
    fn from(entry: MeasureEntry) -> Self {
        let start_time = entry.start_time();
        let duration = entry.duration();

        Self::new(entry.into_name(), start_time, duration)
    }
}

impl Display for Measurement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {:?}", self.id, self.duration)
    }
}
