use std::any::type_name;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use crate::{Error, MeasureEntry, Result, Timeline};

/// Waits for the measure entry of one name on a [`Timeline`].
///
/// Created by [`Timeline::observe()`]. Awaiting the observer yields the first entry measured
/// under its name after registration. Entries for any other name are never delivered to it.
///
/// The registration is released when the entry is delivered, when [`disconnect()`] is called or
/// when the observer is dropped, whichever comes first. Releasing is idempotent.
///
/// [`disconnect()`]: Self::disconnect
pub struct MeasureObserver {
    timeline: Timeline,
    name: String,
    token: u64,
    receiver: oneshot::Receiver<MeasureEntry>,

    connected: bool,
}

impl MeasureObserver {
    pub(crate) fn new(
        timeline: Timeline,
        name: String,
        token: u64,
        receiver: oneshot::Receiver<MeasureEntry>,
    ) -> Self {
        Self {
            timeline,
            name,
            token,
            receiver,
            connected: true,
        }
    }

    /// The measure name this observer is waiting for.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Stops listening for the measure entry.
    ///
    /// Safe to call any number of times. Awaiting the observer after disconnecting it yields an
    /// entry only if one was delivered before the disconnect.
    pub fn disconnect(&mut self) {
        if self.connected {
            self.connected = false;
            self.timeline.deregister(&self.name, self.token);
        }
    }
}

impl Future for MeasureObserver {
    type Output = Result<MeasureEntry>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();

        match Pin::new(&mut this.receiver).poll(cx) {
            Poll::Pending => Poll::Pending,
            Poll::Ready(Ok(entry)) => {
                // The timeline already dropped the registration when it delivered the entry.
                this.connected = false;
                Poll::Ready(Ok(entry))
            }
            Poll::Ready(Err(_)) => {
                this.disconnect();
                Poll::Ready(Err(Error::ObserverDisconnected {
                    name: this.name.clone(),
                }))
            }
        }
    }
}

impl Drop for MeasureObserver {
    fn drop(&mut self) {
        self.disconnect();
    }
}

impl fmt::Debug for MeasureObserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct(type_name::<Self>())
            .field("name", &self.name)
            .field("token", &self.token)
            .field("connected", &self.connected)
            .finish_non_exhaustive()
    }
}
