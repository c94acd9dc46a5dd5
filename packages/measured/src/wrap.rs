use std::future::{Future, IntoFuture};
use std::panic::{self, AssertUnwindSafe};
use std::time::Duration;

use tracing::{debug, error, warn};

use crate::options::{Callback, ResolvedOptions};
use crate::outcome::{Outcome, format_panic_payload};
use crate::{MeasureObserver, Measurement, Options, Timeline};

/// Measures how long an asynchronous operation takes to settle.
///
/// The operation is started, awaited and timed on the configured [`Timeline`]. Once it has
/// settled, one [`Measurement`] is produced and handed to the callbacks in [`Options`]:
///
/// 1. `on_resolve` if the operation returned `Ok`, or `on_reject` if it returned `Err` or
///    panicked.
/// 2. `on_complete`, in every case.
///
/// The returned future then resolves to exactly what the operation produced. A panic in the
/// operation is resumed after the callbacks have run.
///
/// # Callback panics
///
/// A panicking callback is logged and otherwise ignored. It never changes the result handed back
/// to the caller and never stops the remaining callbacks from running.
///
/// # Cancellation
///
/// There is none. If the returned future is dropped before the operation settles, the operation is
/// dropped with it, no callbacks are invoked and the marks of the invocation are released.
///
/// # Panics
///
/// Panics if another invocation with the same identifier is in flight on the same timeline.
///
/// # Example
///
/// ```
/// use futures::executor::block_on;
/// use measured::{Options, measured};
///
/// async fn fetch_answer() -> Result<u32, String> {
///     Ok(42)
/// }
///
/// let answer = block_on(measured(
///     fetch_answer,
///     Options::new().on_complete(|m| println!("fetching took {:?}", m.duration())),
/// ));
///
/// assert_eq!(answer, Ok(42));
/// ```
pub async fn measured<F, Fut, T, E>(operation: F, options: Options) -> Result<T, E>
where
    F: FnOnce() -> Fut,
    Fut: IntoFuture<Output = Result<T, E>>,
{
    let ResolvedOptions {
        id,
        timeline,
        on_complete,
        on_resolve,
        on_reject,
    } = options.resolve();

    let mut invocation = Invocation::begin(timeline, id);

    let outcome = Outcome::capture(operation).await;

    let measurement = invocation.finish().await;

    debug!(
        id = measurement.id(),
        outcome = outcome.kind(),
        duration = ?measurement.duration(),
        "measured operation settled"
    );

    if outcome.is_resolved() {
        invoke("on_resolve", on_resolve, measurement.clone());
    } else {
        invoke("on_reject", on_reject, measurement.clone());
    }

    invoke("on_complete", on_complete, measurement);

    outcome.into_result()
}

/// Measures futures with a method call instead of wrapping them in [`measured()`].
///
/// # Example
///
/// ```
/// use futures::executor::block_on;
/// use measured::{MeasuredExt, Options};
///
/// let doubled = block_on(
///     async { Ok::<_, ()>(21 * 2) }.measured(Options::new().id("double")),
/// );
///
/// assert_eq!(doubled, Ok(42));
/// ```
pub trait MeasuredExt<T, E>: Future<Output = Result<T, E>> + Sized {
    /// Measures how long this future takes to settle.
    ///
    /// Behaves exactly like [`measured()`] with an operation that returns this future.
    fn measured(self, options: Options) -> impl Future<Output = Result<T, E>>;
}

impl<F, T, E> MeasuredExt<T, E> for F
where
    F: Future<Output = Result<T, E>>,
{
    fn measured(self, options: Options) -> impl Future<Output = Result<T, E>> {
        measured(move || self, options)
    }
}

/// The timeline bookkeeping of one invocation.
///
/// Owns the observer and the two marks of the invocation. They are released exactly once, either
/// when the measurement has been taken or when the invocation is dropped early.
struct Invocation {
    timeline: Timeline,
    id: String,
    before: String,
    after: String,
    observer: MeasureObserver,
    start_time: Duration,

    released: bool,
}

impl Invocation {
    fn begin(timeline: Timeline, id: String) -> Self {
        let observer = timeline.observe(&id);

        let before = format!("{id}:before");
        let after = format!("{id}:after");

        let start_time = timeline.mark(&before);

        Self {
            timeline,
            id,
            before,
            after,
            observer,
            start_time,
            released: false,
        }
    }

    /// Marks the end of the operation and waits for the timeline to report the interval.
    async fn finish(&mut self) -> Measurement {
        let end_time = self.timeline.mark(&self.after);

        let delivered = match self.timeline.measure(&self.id, &self.before, &self.after) {
            Ok(_) => (&mut self.observer).await,
            Err(e) => Err(e),
        };

        self.release();

        match delivered {
            Ok(entry) => entry.into(),
            Err(e) => {
                warn!(
                    id = %self.id,
                    error = %e,
                    "timeline did not deliver a measure entry, using locally recorded timestamps"
                );

                Measurement::new(
                    self.id.clone(),
                    self.start_time,
                    end_time.saturating_sub(self.start_time),
                )
            }
        }
    }

    fn release(&mut self) {
        if self.released {
            return;
        }

        self.released = true;

        self.timeline.clear_marks(&self.before);
        self.timeline.clear_marks(&self.after);
        self.observer.disconnect();
    }
}

impl Drop for Invocation {
    fn drop(&mut self) {
        self.release();
    }
}

fn invoke(hook: &'static str, callback: Callback, measurement: Measurement) {
    let id = measurement.id().to_owned();

    if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(move || callback(measurement))) {
        error!(
            hook,
            id = %id,
            panic_message = %format_panic_payload(&*payload),
            "measurement callback panicked"
        );
    }
}
