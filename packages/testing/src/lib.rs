#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![cfg_attr(coverage_nightly, coverage(off))] // This is all test code, no need to test it.

//! Private helpers for testing and examples in the measured workspace.

use std::fmt::{self, Debug};
use std::future::Future;
use std::sync::{Arc, mpsc};
use std::thread;
use std::time::Duration;

use futures::executor::block_on;
use parking_lot::Mutex;

/// Drives a future to completion on the current thread, failing the test if it hangs.
///
/// The future is polled with [`futures::executor::block_on`] on a dedicated thread. If it does
/// not complete within the timeout, the test panics instead of hanging the build.
///
/// The timeout is 10 seconds under normal conditions and 60 seconds under Miri, where thread
/// synchronization primitives are significantly slower.
///
/// When the `MUTATION_TESTING` environment variable is set to "1", the watchdog is disabled and
/// the future is driven directly. This allows mutation testing to detect hanging mutations.
///
/// # Panics
///
/// Panics if the future exceeds the timeout (when not in mutation testing mode). A panic inside
/// the future is resumed on the calling thread.
///
/// # Example
///
/// ```rust
/// use testing::block_on_with_watchdog;
///
/// let value = block_on_with_watchdog(async { 2 + 2 });
/// assert_eq!(value, 4);
/// ```
pub fn block_on_with_watchdog<F>(future: F) -> F::Output
where
    F: Future + Send + 'static,
    F::Output: Send + 'static,
{
    if std::env::var("MUTATION_TESTING").as_deref() == Ok("1") {
        return block_on(future);
    }

    let (tx, rx) = mpsc::channel();

    let test_handle = thread::spawn(move || {
        let output = block_on(future);
        // If this fails, the receiver has timed out and nobody is listening anymore.
        drop(tx.send(output));
    });

    let timeout = if cfg!(miri) {
        Duration::from_secs(60)
    } else {
        Duration::from_secs(10)
    };

    match rx.recv_timeout(timeout) {
        Ok(output) => {
            test_handle.join().expect("Test thread should not panic");
            output
        }
        Err(mpsc::RecvTimeoutError::Timeout) => {
            panic!("Test future exceeded {timeout:?} timeout");
        }
        Err(mpsc::RecvTimeoutError::Disconnected) => match test_handle.join() {
            Ok(()) => panic!("Test thread disconnected unexpectedly"),
            Err(e) => std::panic::resume_unwind(e),
        },
    }
}

/// Records calls to labeled callbacks, in the order they happen.
///
/// Hand out callbacks via [`hook()`][Self::hook]; every call is appended to a log shared by all
/// clones of the recorder, which can be inspected after the code under test has run.
///
/// # Example
///
/// ```rust
/// use testing::CallRecorder;
///
/// let recorder = CallRecorder::new();
///
/// let first = recorder.hook("first");
/// let second = recorder.hook("second");
///
/// second(2);
/// first(1);
///
/// assert_eq!(recorder.labels(), ["second", "first"]);
/// assert_eq!(recorder.count("first"), 1);
/// assert_eq!(recorder.args("second"), [2]);
/// ```
pub struct CallRecorder<T> {
    calls: Arc<Mutex<Vec<(&'static str, T)>>>,
}

impl<T> CallRecorder<T>
where
    T: Clone + Send + 'static,
{
    /// Creates a recorder with an empty call log.
    #[must_use]
    pub fn new() -> Self {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Creates a callback that records each call under `label`.
    pub fn hook(&self, label: &'static str) -> impl FnOnce(T) + Send + 'static {
        let calls = Arc::clone(&self.calls);

        move |arg| calls.lock().push((label, arg))
    }

    /// The labels of all recorded calls, in call order.
    #[must_use]
    pub fn labels(&self) -> Vec<&'static str> {
        self.calls.lock().iter().map(|(label, _)| *label).collect()
    }

    /// How many times the callbacks with `label` were called.
    #[must_use]
    pub fn count(&self, label: &str) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|(recorded, _)| *recorded == label)
            .count()
    }

    /// The arguments of all calls recorded under `label`, in call order.
    #[must_use]
    pub fn args(&self, label: &str) -> Vec<T> {
        self.calls
            .lock()
            .iter()
            .filter(|(recorded, _)| *recorded == label)
            .map(|(_, arg)| arg.clone())
            .collect()
    }

    /// The arguments of all recorded calls, in call order.
    #[must_use]
    pub fn all_args(&self) -> Vec<T> {
        self.calls.lock().iter().map(|(_, arg)| arg.clone()).collect()
    }
}

impl<T> Clone for CallRecorder<T> {
    fn clone(&self) -> Self {
        Self {
            calls: Arc::clone(&self.calls),
        }
    }
}

impl<T> Default for CallRecorder<T>
where
    T: Clone + Send + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Debug for CallRecorder<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallRecorder")
            .field("call_count", &self.calls.lock().len())
            .finish_non_exhaustive()
    }
}
