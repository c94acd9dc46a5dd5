use std::any::type_name;
use std::fmt;

use crate::{Measurement, Timeline, generate_id};

/// A callback that receives a snapshot of a [`Measurement`].
pub(crate) type Callback = Box<dyn FnOnce(Measurement) + Send + 'static>;

/// Configures one invocation of [`measured()`][crate::measured].
///
/// Every setting is optional. An empty `Options` times the operation on the
/// [global timeline][Timeline::global] under a freshly generated identifier and calls nothing.
///
/// # Example
///
/// ```
/// use measured::Options;
///
/// let options = Options::new()
///     .id("load_user_profile")
///     .on_resolve(|m| println!("loaded in {:?}", m.duration()))
///     .on_reject(|m| println!("failed after {:?}", m.duration()))
///     .on_complete(|m| println!("{m}"));
/// # drop(options);
/// ```
#[derive(Default)]
#[must_use]
pub struct Options {
    id: Option<String>,
    timeline: Option<Timeline>,

    on_complete: Option<Callback>,
    on_resolve: Option<Callback>,
    on_reject: Option<Callback>,
}

impl Options {
    /// Creates options with every setting at its default.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the correlation identifier of the invocation.
    ///
    /// The identifier namespaces the marks and the measure of the invocation on its timeline.
    /// It must not be in use by any other invocation that is in flight on the same timeline at the
    /// same time; doing so panics. Reusing an identifier sequentially is fine.
    ///
    /// Defaults to a [freshly generated identifier][crate::generate_id].
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Sets the timeline that records the marks of the invocation.
    ///
    /// Defaults to [`Timeline::global()`].
    pub fn timeline(mut self, timeline: Timeline) -> Self {
        self.timeline = Some(timeline);
        self
    }

    /// Sets a callback invoked after the operation has settled, whether it succeeded or not.
    ///
    /// This is always the last callback of an invocation.
    pub fn on_complete<F>(mut self, callback: F) -> Self
    where
        F: FnOnce(Measurement) + Send + 'static,
    {
        self.on_complete = Some(Box::new(callback));
        self
    }

    /// Sets a callback invoked only if the operation returned `Ok`.
    pub fn on_resolve<F>(mut self, callback: F) -> Self
    where
        F: FnOnce(Measurement) + Send + 'static,
    {
        self.on_resolve = Some(Box::new(callback));
        self
    }

    /// Sets a callback invoked only if the operation returned `Err` or panicked.
    pub fn on_reject<F>(mut self, callback: F) -> Self
    where
        F: FnOnce(Measurement) + Send + 'static,
    {
        self.on_reject = Some(Box::new(callback));
        self
    }

    /// Fills in every unset option with its default for one invocation.
    pub(crate) fn resolve(self) -> ResolvedOptions {
        ResolvedOptions {
            id: self.id.unwrap_or_else(generate_id),
            timeline: self.timeline.unwrap_or_else(Timeline::global),
            on_complete: self.on_complete.unwrap_or_else(no_op),
            on_resolve: self.on_resolve.unwrap_or_else(no_op),
            on_reject: self.on_reject.unwrap_or_else(no_op),
        }
    }
}

impl fmt::Debug for Options {
    #[cfg_attr(test, mutants::skip)] // Debug output is not an API contract.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct(type_name::<Self>())
            .field("id", &self.id)
            .field("timeline", &self.timeline)
            .field("on_complete", &self.on_complete.is_some())
            .field("on_resolve", &self.on_resolve.is_some())
            .field("on_reject", &self.on_reject.is_some())
            .finish()
    }
}

fn no_op() -> Callback {
    Box::new(|_| {})
}

/// The options of one invocation with all defaults applied.
pub(crate) struct ResolvedOptions {
    pub(crate) id: String,
    pub(crate) timeline: Timeline,

    pub(crate) on_complete: Callback,
    pub(crate) on_resolve: Callback,
    pub(crate) on_reject: Callback,
}
