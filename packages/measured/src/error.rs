use thiserror::Error;

/// Errors reported by a [`Timeline`][crate::Timeline].
///
/// The wrapped operation's own errors never appear here; those are handed back to the caller
/// unchanged as the operation's own error type.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// A measure referenced a mark that does not exist on the timeline, either because it was
    /// never recorded or because it has already been cleared.
    #[error("no mark named '{name}' exists on the timeline")]
    MarkNotFound {
        /// The name of the missing mark.
        name: String,
    },

    /// An observer stopped listening before the timeline delivered its measure entry.
    #[error("the observer for measure '{name}' was disconnected before an entry was delivered")]
    ObserverDisconnected {
        /// The measure name the observer was registered for.
        name: String,
    },
}

/// A specialized `Result` type for timeline operations, returning the crate's
/// [`Error`] type as the error value.
pub(crate) type Result<T> = std::result::Result<T, Error>;
