use std::any::type_name;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, LazyLock};
use std::time::{Duration, Instant};

use foldhash::HashMap;
use parking_lot::Mutex;
use tracing::trace;

use crate::pal::{TimeSource, TimeSourceFacade};
use crate::{Error, MeasureObserver, Result};

static GLOBAL: LazyLock<Timeline> = LazyLock::new(Timeline::new);

/// A source of timestamps with a namespace of named marks and a channel of measure events.
///
/// A mark records "now" under a name. A measure computes the interval between two marks and
/// delivers the resulting [`MeasureEntry`] to whichever [`MeasureObserver`] is registered under
/// the measure's name. Entries are only ever routed to the observer with a matching name, so any
/// number of invocations may share one timeline as long as they namespace their names.
///
/// All timestamps are offsets from the origin of the timeline, captured when it was created. They
/// come from a monotonic clock, so they never decrease.
///
/// This type is a cheap handle; clones refer to the same marks and observers. Most code uses the
/// process-wide instance from [`Timeline::global()`].
///
/// # Example
///
/// ```
/// use measured::Timeline;
///
/// let timeline = Timeline::new();
///
/// timeline.mark("load:before");
/// timeline.mark("load:after");
///
/// let entry = timeline.measure("load", "load:before", "load:after").unwrap();
/// assert_eq!(entry.name(), "load");
///
/// timeline.clear_marks("load:before");
/// timeline.clear_marks("load:after");
/// assert_eq!(timeline.mark_count(), 0);
/// ```
#[derive(Clone)]
pub struct Timeline {
    inner: Arc<TimelineInner>,
}

struct TimelineInner {
    time_source: TimeSourceFacade,
    origin: Instant,

    marks: Mutex<HashMap<String, Duration>>,
    observers: Mutex<HashMap<String, Registration>>,

    next_token: AtomicU64,
}

struct Registration {
    token: u64,
    sender: oneshot::Sender<MeasureEntry>,
}

impl Timeline {
    /// Creates an independent timeline whose origin is the current instant.
    #[must_use]
    pub fn new() -> Self {
        Self::from_time_source(TimeSourceFacade::real())
    }

    #[must_use]
    pub(crate) fn from_time_source(time_source: TimeSourceFacade) -> Self {
        let origin = time_source.now();

        Self {
            inner: Arc::new(TimelineInner {
                time_source,
                origin,
                marks: Mutex::new(HashMap::default()),
                observers: Mutex::new(HashMap::default()),
                next_token: AtomicU64::new(0),
            }),
        }
    }

    /// The timeline shared by the whole process, used unless an invocation specifies otherwise.
    #[must_use]
    pub fn global() -> Self {
        GLOBAL.clone()
    }

    /// The current timestamp, as an offset from the origin of the timeline.
    #[must_use]
    pub fn now(&self) -> Duration {
        self.inner
            .time_source
            .now()
            .saturating_duration_since(self.inner.origin)
    }

    /// Records the current timestamp under `name`, replacing any earlier mark with that name.
    ///
    /// Returns the recorded timestamp.
    pub fn mark(&self, name: &str) -> Duration {
        let timestamp = self.now();

        self.inner.marks.lock().insert(name.to_owned(), timestamp);
        trace!(name, ?timestamp, "mark recorded");

        timestamp
    }

    /// Releases the mark recorded under `name`.
    ///
    /// Clearing a mark that does not exist is not an error.
    pub fn clear_marks(&self, name: &str) {
        if self.inner.marks.lock().remove(name).is_some() {
            trace!(name, "mark cleared");
        }
    }

    /// Computes the interval between two marks and delivers it as a measure entry named `name`.
    ///
    /// If an observer is registered for `name`, it receives the entry and is thereby consumed;
    /// any later measure with the same name is only seen by an observer registered afterwards.
    /// The entry is also returned to the caller.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MarkNotFound`] if either mark does not exist.
    pub fn measure(&self, name: &str, start_mark: &str, end_mark: &str) -> Result<MeasureEntry> {
        let (start_time, end_time) = {
            let marks = self.inner.marks.lock();

            let lookup = |mark: &str| {
                marks
                    .get(mark)
                    .copied()
                    .ok_or_else(|| Error::MarkNotFound {
                        name: mark.to_owned(),
                    })
            };

            (lookup(start_mark)?, lookup(end_mark)?)
        };

        let entry = MeasureEntry {
            name: name.to_owned(),
            start_time,
            duration: end_time.saturating_sub(start_time),
        };

        let registration = self.inner.observers.lock().remove(name);

        if let Some(registration) = registration {
            // The receiver may already be gone if its invocation was abandoned. Nobody to tell.
            drop(registration.sender.send(entry.clone()));
            trace!(name, duration = ?entry.duration, "measure delivered to observer");
        } else {
            trace!(name, duration = ?entry.duration, "measure has no observer");
        }

        Ok(entry)
    }

    /// Registers interest in the next measure entry named `name`.
    ///
    /// # Panics
    ///
    /// Panics if another observer for `name` is still registered. Two in-flight invocations
    /// sharing a correlation identifier would otherwise receive each other's measurements.
    #[must_use]
    pub fn observe(&self, name: &str) -> MeasureObserver {
        let (sender, receiver) = oneshot::channel();

        // Only uniqueness matters, not ordering relative to other memory operations.
        let token = self.inner.next_token.fetch_add(1, Ordering::Relaxed);

        {
            let mut observers = self.inner.observers.lock();

            assert!(
                !observers.contains_key(name),
                "an observer for measure '{name}' is already registered; concurrently \
                 in-flight invocations must use distinct identifiers"
            );

            observers.insert(name.to_owned(), Registration { token, sender });
        }

        trace!(name, token, "observer registered");

        MeasureObserver::new(self.clone(), name.to_owned(), token, receiver)
    }

    /// Removes the registration made by the observer holding `token`, if it is still present.
    pub(crate) fn deregister(&self, name: &str, token: u64) {
        let mut observers = self.inner.observers.lock();

        if observers
            .get(name)
            .is_some_and(|registration| registration.token == token)
        {
            observers.remove(name);
            trace!(name, token, "observer deregistered");
        }
    }

    /// The number of marks currently recorded.
    #[must_use]
    pub fn mark_count(&self) -> usize {
        self.inner.marks.lock().len()
    }

    /// The number of observers currently waiting for a measure entry.
    #[must_use]
    pub fn observer_count(&self) -> usize {
        self.inner.observers.lock().len()
    }
}

impl Default for Timeline {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Timeline {
    #[cfg_attr(test, mutants::skip)] // Debug output is not an API contract.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct(type_name::<Self>())
            .field("time_source", &self.inner.time_source)
            .field("origin", &self.inner.origin)
            .field("mark_count", &self.mark_count())
            .field("observer_count", &self.observer_count())
            .finish_non_exhaustive()
    }
}

/// The interval between two marks, as produced by [`Timeline::measure()`].
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct MeasureEntry {
    name: String,
    start_time: Duration,
    duration: Duration,
}

impl MeasureEntry {
    /// The name the measure was recorded under.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The timestamp of the start mark.
    #[must_use]
    pub fn start_time(&self) -> Duration {
        self.start_time
    }

    /// The time elapsed between the start mark and the end mark.
    ///
    /// Zero if the end mark was recorded before the start mark.
    #[must_use]
    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub(crate) fn into_name(self) -> String {
        self.name
    }
}
