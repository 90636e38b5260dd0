use futures::Stream;
use log::debug;
use serde_json::Value;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::sync::mpsc;
use uuid::Uuid;

use common::types::{PlatformError, SinkEvent};
use common::EventSink;

use crate::registry::ChannelRegistry;

/// Sink forwarding events into the receiving half of an `EventStream`.
pub(crate) struct ChannelSink {
    sender: mpsc::UnboundedSender<SinkEvent>,
}

impl ChannelSink {
    pub(crate) fn new(sender: mpsc::UnboundedSender<SinkEvent>) -> Self {
        Self { sender }
    }

    fn deliver(&self, event: SinkEvent) {
        if self.sender.send(event).is_err() {
            debug!("Event stream closed, dropping event");
        }
    }
}

impl EventSink for ChannelSink {
    fn success(&self, event: Value) {
        self.deliver(SinkEvent::Success(event));
    }

    fn error(&self, code: &str, message: &str, details: Option<Value>) {
        self.deliver(SinkEvent::Error(PlatformError::new(code, message, details)));
    }

    fn end_of_stream(&self) {
        self.deliver(SinkEvent::EndOfStream);
    }
}

/// Consumer side of a channel subscription.
///
/// Yields `Ok` for every event and `Err` for every error pushed by the handler, and
/// ends when the handler signals end of stream. Dropping the stream cancels the
/// subscription.
pub struct EventStream {
    registry: ChannelRegistry,
    channel_name: String,
    subscription_id: Uuid,
    receiver: mpsc::UnboundedReceiver<SinkEvent>,
    finished: bool,
}

impl EventStream {
    pub(crate) fn new(
        registry: ChannelRegistry,
        channel_name: &str,
        subscription_id: Uuid,
        receiver: mpsc::UnboundedReceiver<SinkEvent>,
    ) -> Self {
        Self {
            registry,
            channel_name: channel_name.to_string(),
            subscription_id,
            receiver,
            finished: false,
        }
    }

    pub fn subscription_id(&self) -> Uuid {
        self.subscription_id
    }

    pub fn channel_name(&self) -> &str {
        &self.channel_name
    }
}

impl Stream for EventStream {
    type Item = Result<Value, PlatformError>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        if self.finished {
            return Poll::Ready(None);
        }
        match self.receiver.poll_recv(cx) {
            Poll::Ready(Some(SinkEvent::Success(event))) => Poll::Ready(Some(Ok(event))),
            Poll::Ready(Some(SinkEvent::Error(error))) => Poll::Ready(Some(Err(error))),
            Poll::Ready(Some(SinkEvent::EndOfStream)) | Poll::Ready(None) => {
                self.finished = true;
                Poll::Ready(None)
            }
            Poll::Pending => Poll::Pending,
        }
    }
}

impl Drop for EventStream {
    fn drop(&mut self) {
        if let Err(e) = self
            .registry
            .cancel(&self.channel_name, self.subscription_id, None)
        {
            debug!("Event stream on {} dropped: {}", self.channel_name, e);
        }
    }
}
