use std::any::Any;
use std::future::IntoFuture;
use std::panic::{self, AssertUnwindSafe};

use futures::FutureExt;

/// How a wrapped operation settled.
///
/// Success and failure are an explicit tag, never inferred from the value carried, so an
/// operation that fails with a "falsy" error such as `Err(0)` or `Err(())` is still a failure.
pub(crate) enum Outcome<T, E> {
    Resolved(T),
    Rejected(E),
    Panicked(Box<dyn Any + Send>),
}

impl<T, E> Outcome<T, E> {
    /// Runs the operation to completion, capturing its result or its panic.
    ///
    /// A panic while creating the future counts the same as a panic while polling it.
    pub(crate) async fn capture<F, Fut>(operation: F) -> Self
    where
        F: FnOnce() -> Fut,
        Fut: IntoFuture<Output = Result<T, E>>,
    {
        let future = match panic::catch_unwind(AssertUnwindSafe(|| operation().into_future())) {
            Ok(future) => future,
            Err(payload) => return Self::Panicked(payload),
        };

        match AssertUnwindSafe(future).catch_unwind().await {
            Ok(Ok(value)) => Self::Resolved(value),
            Ok(Err(error)) => Self::Rejected(error),
            Err(payload) => Self::Panicked(payload),
        }
    }

    pub(crate) fn is_resolved(&self) -> bool {
        matches!(self, Self::Resolved(_))
    }

    pub(crate) fn kind(&self) -> &'static str {
        match self {
            Self::Resolved(_) => "resolved",
            Self::Rejected(_) => "rejected",
            Self::Panicked(_) => "panicked",
        }
    }

    /// Hands the original result back to the caller, resuming the original panic if there was one.
    pub(crate) fn into_result(self) -> Result<T, E> {
        match self {
            Self::Resolved(value) => Ok(value),
            Self::Rejected(error) => Err(error),
            Self::Panicked(payload) => panic::resume_unwind(payload),
        }
    }
}

/// Renders a panic payload for logging.
pub(crate) fn format_panic_payload(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
