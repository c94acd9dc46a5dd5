#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Transparently measure how long asynchronous operations take.
//!
//! Wrap any operation that produces a `Result` in [`measured()`] and it behaves exactly as
//! before: same value, same error, same panic. In addition, once it has settled, a
//! [`Measurement`] of its wall-clock duration is handed to the callbacks you configure via
//! [`Options`].
//!
//! ```
//! use futures::executor::block_on;
//! use measured::{Options, measured};
//!
//! async fn transform(input: &str) -> Result<String, std::io::Error> {
//!     Ok(input.to_uppercase())
//! }
//!
//! let output = block_on(measured(
//!     || transform("crab salad"),
//!     Options::new()
//!         .id("transform")
//!         .on_resolve(|m| println!("transformed in {:?}", m.duration()))
//!         .on_reject(|m| println!("failed to transform after {:?}", m.duration()))
//!         .on_complete(|m| println!("{m}")),
//! ));
//!
//! assert_eq!(output.unwrap(), "CRAB SALAD");
//! ```
//!
//! # Callbacks
//!
//! Exactly one of `on_resolve` (the operation returned `Ok`) and `on_reject` (the operation
//! returned `Err` or panicked) is called, followed by `on_complete`. Each callback is called at
//! most once per invocation and receives its own copy of the measurement. Unset callbacks do
//! nothing.
//!
//! # Correlation identifiers
//!
//! Every invocation has an identifier, either supplied via [`Options::id()`] or generated by
//! [`generate_id()`]. It appears in the measurement and namespaces the marks that the invocation
//! records on its [`Timeline`], which is what keeps concurrent and nested invocations from
//! observing each other's timings:
//!
//! ```
//! use futures::executor::block_on;
//! use measured::{Options, measured};
//!
//! let result = block_on(measured(
//!     || async {
//!         let inner = measured(
//!             || async { Ok::<_, ()>(1) },
//!             Options::new().on_complete(|m| println!("inner: {m}")),
//!         )
//!         .await?;
//!
//!         Ok::<_, ()>(inner + 1)
//!     },
//!     Options::new().on_complete(|m| println!("outer: {m}")),
//! ));
//!
//! assert_eq!(result, Ok(2));
//! ```
//!
//! # Timelines
//!
//! Timestamps come from a [`Timeline`], a monotonic clock with a namespace of named marks. By
//! default the process-wide [`Timeline::global()`] is used. Supply your own via
//! [`Options::timeline()`] to isolate a group of measurements, for example in tests.
//!
//! # Logging
//!
//! The crate emits [`tracing`] events: `trace` for mark and observer bookkeeping, `debug` when an
//! operation settles, `warn` if a timeline loses track of an invocation's marks and `error` if a
//! callback panics. Install any `tracing` subscriber to see them.
//!
//! # Panic policy
//!
//! This crate panics if two invocations that are in flight at the same time on the same timeline
//! use the same identifier. It does not panic for any other reason; panics of the wrapped
//! operation are passed through and panics of callbacks are logged and discarded.

mod error;
mod id;
mod measurement;
mod observer;
mod options;
mod outcome;
mod pal;
mod timeline;
mod wrap;

pub use error::Error;
pub(crate) use error::Result;
pub use id::*;
pub use measurement::*;
pub use observer::*;
pub use options::Options;
pub use timeline::*;
pub use wrap::*;
