//! Example code for the `README.md` file.
//!
//! This contains the same code that appears in the `measured` package `README.md`.
//! Run with `cargo run --example measured_readme` to see the emitted log events.

use std::time::Duration;

use measured::{Options, measured};
use tracing::Level;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt().with_max_level(Level::DEBUG).init();

    // Time a successful operation.
    let greeting = measured(
        || async {
            tokio::time::sleep(Duration::from_millis(25)).await;
            Ok::<_, String>("hello")
        },
        Options::new()
            .id("greet")
            .on_resolve(|m| println!("resolved after {:?}", m.duration()))
            .on_complete(|m| println!("completed: {m}")),
    )
    .await;

    println!("greeting: {greeting:?}");

    // Failures are timed too, and the error comes back unchanged.
    let failure = measured(
        || async {
            tokio::time::sleep(Duration::from_millis(10)).await;
            Err::<(), _>("connection refused")
        },
        Options::new()
            .on_reject(|m| println!("rejected after {:?} (id {})", m.duration(), m.id()))
            .on_complete(|m| println!("completed: {m}")),
    )
    .await;

    println!("failure: {failure:?}");
}
