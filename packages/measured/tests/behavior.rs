//! Observable behavior of `measured()`: results pass through untouched and callbacks fire
//! exactly once, in order, with a sensible measurement.

use std::future;
use std::io;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use measured::{Measurement, Options, Timeline, measured};
use testing::{CallRecorder, block_on_with_watchdog};

fn recorded(recorder: &CallRecorder<Measurement>) -> Options {
    Options::new()
        .on_complete(recorder.hook("complete"))
        .on_resolve(recorder.hook("resolve"))
        .on_reject(recorder.hook("reject"))
}

#[test]
fn resolves_to_the_wrapped_resolution() {
    let result = block_on_with_watchdog(measured(
        || async { Ok::<_, ()>("the wrapped resolution") },
        Options::new(),
    ));

    assert_eq!(result, Ok("the wrapped resolution"));
}

#[test]
fn rejects_with_the_wrapped_rejection() {
    let error = Arc::new(io::Error::other("the wrapped rejection"));
    let expected = Arc::clone(&error);

    let result = block_on_with_watchdog(measured(
        move || future::ready(Err::<(), _>(error)),
        Options::new(),
    ));

    // Same error value, not merely an equal one.
    assert!(Arc::ptr_eq(&result.unwrap_err(), &expected));
}

#[test]
fn supplied_id_appears_in_measurement() {
    let recorder = CallRecorder::new();

    block_on_with_watchdog(measured(
        || async { Ok::<_, ()>(()) },
        recorded(&recorder).id("CrabSalad"),
    ))
    .unwrap();

    for measurement in recorder.all_args() {
        assert_eq!(measurement.id(), "CrabSalad");
    }
}

#[test]
fn generated_id_appears_in_measurement() {
    let recorder = CallRecorder::new();

    block_on_with_watchdog(measured(|| async { Ok::<_, ()>(()) }, recorded(&recorder))).unwrap();

    let measurement = recorder.args("complete").pop().unwrap();
    assert_eq!(measurement.id().len(), 44);
}

#[test]
fn resolution_calls_resolve_then_complete() {
    let recorder = CallRecorder::new();

    let result = block_on_with_watchdog(measured(
        || async { Ok::<_, ()>('X') },
        recorded(&recorder).id("A"),
    ));

    assert_eq!(result, Ok('X'));
    assert_eq!(recorder.labels(), ["resolve", "complete"]);

    let measurement = recorder.args("complete").pop().unwrap();
    assert_eq!(measurement.id(), "A");
    assert_eq!(
        measurement.duration(),
        measurement.end_time() - measurement.start_time()
    );
}

#[test]
fn rejection_calls_reject_then_complete() {
    let recorder = CallRecorder::new();

    let result = block_on_with_watchdog(measured(
        || future::ready(Err::<(), _>("E")),
        recorded(&recorder),
    ));

    assert_eq!(result, Err("E"));
    assert_eq!(recorder.labels(), ["reject", "complete"]);
    assert_eq!(recorder.count("resolve"), 0);
}

#[test]
fn falsy_rejection_is_still_a_rejection() {
    let recorder = CallRecorder::new();

    let result = block_on_with_watchdog(measured(
        || future::ready(Err::<u8, _>(0)),
        recorded(&recorder),
    ));

    assert_eq!(result, Err(0));
    assert_eq!(recorder.labels(), ["reject", "complete"]);
}

#[test]
fn rejection_with_unit_error_is_still_a_rejection() {
    let recorder = CallRecorder::new();

    let result = block_on_with_watchdog(measured(
        || future::ready(Err::<(), ()>(())),
        recorded(&recorder),
    ));

    assert!(result.is_err());
    assert_eq!(recorder.labels(), ["reject", "complete"]);
}

#[test]
fn resolution_with_falsy_value_is_still_a_resolution() {
    let recorder = CallRecorder::new();

    let result = block_on_with_watchdog(measured(
        || future::ready(Ok::<_, String>(0)),
        recorded(&recorder),
    ));

    assert_eq!(result, Ok(0));
    assert_eq!(recorder.labels(), ["resolve", "complete"]);
}

#[test]
fn every_callback_receives_all_fields() {
    let recorder = CallRecorder::new();

    block_on_with_watchdog(measured(
        || async { Ok::<_, ()>(()) },
        recorded(&recorder).id("fields"),
    ))
    .unwrap();

    let [first, second] = recorder.all_args().try_into().unwrap();

    assert_eq!(first, second);
    assert!(first.end_time() >= first.start_time());
}

#[cfg_attr(miri, ignore)] // Miri is too slow for meaningful wall-clock assertions.
#[test]
fn duration_covers_the_awaited_work() {
    let recorder = CallRecorder::new();

    let result = block_on_with_watchdog(measured(
        || async {
            block_polling_thread(Duration::from_millis(20));
            Ok::<_, ()>(())
        },
        recorded(&recorder),
    ));

    assert!(result.is_ok());

    let measurement = recorder.args("complete").pop().unwrap();
    assert!(measurement.duration() >= Duration::from_millis(20));
}

#[test]
fn panicking_operation_is_rejected_and_resumed() {
    let recorder = CallRecorder::new();
    let hooks = recorder.clone();

    let caught = panic::catch_unwind(AssertUnwindSafe(move || {
        block_on_with_watchdog(measured(
            || -> future::Ready<Result<(), ()>> { panic!("thrown synchronously") },
            recorded(&hooks),
        ))
    }));

    let payload = caught.unwrap_err();
    assert_eq!(
        payload.downcast_ref::<&str>().copied(),
        Some("thrown synchronously")
    );
    assert_eq!(recorder.labels(), ["reject", "complete"]);
}

#[test]
fn panicking_callbacks_are_isolated() {
    let recorder = CallRecorder::new();

    let result = block_on_with_watchdog(measured(
        || future::ready(Err::<(), _>("original")),
        Options::new()
            .on_reject(|_| panic!("reject callback failure"))
            .on_complete(recorder.hook("complete")),
    ));

    assert_eq!(result, Err("original"));
    assert_eq!(recorder.labels(), ["complete"]);
}

#[test]
fn callbacks_are_optional() {
    let result = block_on_with_watchdog(measured(
        || async { Ok::<_, ()>(5) },
        Options::new().on_reject(|_| unreachable!("operation resolves")),
    ));

    assert_eq!(result, Ok(5));
}

#[test]
fn own_timeline_is_left_clean() {
    let timeline = Timeline::new();

    block_on_with_watchdog({
        let timeline = timeline.clone();
        async move {
            measured(
                || async { Ok::<_, ()>(()) },
                Options::new().timeline(timeline.clone()),
            )
            .await
            .unwrap();

            measured(
                || async { Err::<(), _>(()) },
                Options::new().timeline(timeline),
            )
            .await
            .unwrap_err();
        }
    });

    assert_eq!(timeline.mark_count(), 0);
    assert_eq!(timeline.observer_count(), 0);
}

#[test]
fn same_id_may_be_reused_sequentially() {
    let recorder = CallRecorder::new();
    let timeline = Timeline::new();

    for _ in 0..3 {
        block_on_with_watchdog(measured(
            || async { Ok::<_, ()>(()) },
            Options::new()
                .id("again")
                .timeline(timeline.clone())
                .on_complete(recorder.hook("complete")),
        ))
        .unwrap();
    }

    assert_eq!(recorder.count("complete"), 3);
}

/// Blocks the polling thread, so the sleep lands between the start and end marks.
fn block_polling_thread(duration: Duration) {
    thread::sleep(duration);
}
