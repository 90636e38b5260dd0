use dashmap::DashMap;
use log::{debug, info, warn};
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::mpsc;
use uuid::Uuid;

use common::{EventSink, StreamHandler};

use crate::errors::ChannelError;
use crate::stream::{ChannelSink, EventStream};

/// This module defines the `ChannelRegistry` struct, which maps channel names to the
/// stream handlers serving them and tracks the single active subscription of each channel.
/// Clones share the same underlying maps.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use event_channel::{ChannelRegistry, FnSink};
/// use common::{EventSink, StreamHandler};
/// use serde_json::{json, Value};
///
/// struct Ticker;
///
/// impl StreamHandler for Ticker {
///     fn on_listen(&self, _arguments: Option<Value>, sink: Arc<dyn EventSink>) {
///         sink.success(json!("tick"));
///     }
///     fn on_cancel(&self, _arguments: Option<Value>) {}
/// }
///
/// let registry = ChannelRegistry::new();
/// registry.set_stream_handler("ticker/events", Arc::new(Ticker));
///
/// let sink = Arc::new(FnSink::new(|event| println!("{:?}", event)));
/// let id = registry.listen("ticker/events", None, sink).unwrap();
/// assert!(registry.is_active("ticker/events"));
///
/// registry.cancel("ticker/events", id, None).unwrap();
/// assert!(!registry.is_active("ticker/events"));
/// ```
#[derive(Clone, Default)]
pub struct ChannelRegistry {
    handlers: Arc<DashMap<String, Arc<dyn StreamHandler>>>,
    control: Arc<DashMap<String, Subscription>>,
}

#[derive(Clone, Copy, Debug)]
struct Subscription {
    id: Uuid,
    // The handler signalled end of stream; the consumer has not cancelled yet.
    ended: bool,
}

/// Sink handed to the handler. Marks its subscription as ended on end of stream.
struct SubscriptionSink {
    inner: Arc<dyn EventSink>,
    control: Arc<DashMap<String, Subscription>>,
    channel_name: String,
    id: Uuid,
}

impl EventSink for SubscriptionSink {
    fn success(&self, event: Value) {
        self.inner.success(event);
    }

    fn error(&self, code: &str, message: &str, details: Option<Value>) {
        self.inner.error(code, message, details);
    }

    fn end_of_stream(&self) {
        if let Some(mut subscription) = self.control.get_mut(&self.channel_name) {
            if subscription.id == self.id {
                subscription.ended = true;
                debug!("Subscription {} on {} ended", self.id, self.channel_name);
            }
        }
        self.inner.end_of_stream();
    }
}

impl ChannelRegistry {
    pub fn new() -> Self {
        Self {
            handlers: Arc::new(DashMap::new()),
            control: Arc::new(DashMap::new()),
        }
    }

    /// Installs `handler` on `channel_name`. A handler already installed there is
    /// replaced, and its active subscription (if any) is cancelled first.
    pub fn set_stream_handler(&self, channel_name: &str, handler: Arc<dyn StreamHandler>) {
        if self.remove_stream_handler(channel_name).is_some() {
            info!("Replacing stream handler on {}", channel_name);
        }
        self.handlers.insert(channel_name.to_string(), handler);
    }

    /// Removes the handler from `channel_name`, cancelling its active subscription.
    pub fn remove_stream_handler(&self, channel_name: &str) -> Option<Arc<dyn StreamHandler>> {
        let (_, handler) = self.handlers.remove(channel_name)?;
        if let Some((_, subscription)) = self.control.remove(channel_name) {
            debug!(
                "Cancelling subscription {} on {}",
                subscription.id, channel_name
            );
            handler.on_cancel(None);
        }
        Some(handler)
    }

    pub fn get_channel_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .handlers
            .iter()
            .map(|entry| entry.key().clone())
            .collect();
        names.sort();
        names
    }

    /// Returns true if a consumer is subscribed to `channel_name` and its stream
    /// has not ended.
    pub fn is_active(&self, channel_name: &str) -> bool {
        self.control
            .get(channel_name)
            .is_some_and(|subscription| !subscription.ended)
    }

    /// Subscribes `sink` to `channel_name`. Only one subscription per channel is
    /// kept: a second listen replaces the first, whose id becomes stale.
    /// Returns ChannelError::ChannelNotFound if no handler is installed.
    pub fn listen(
        &self,
        channel_name: &str,
        arguments: Option<Value>,
        sink: Arc<dyn EventSink>,
    ) -> Result<Uuid, ChannelError> {
        let handler = self
            .handler(channel_name)
            .ok_or_else(|| ChannelError::ChannelNotFound(channel_name.to_string()))?;

        let id = Uuid::new_v4();
        let subscription = Subscription { id, ended: false };
        match self.control.insert(channel_name.to_string(), subscription) {
            Some(previous) if !previous.ended => warn!(
                "Subscription {} on {} replaced by {}",
                previous.id, channel_name, id
            ),
            _ => {}
        }
        let sink = Arc::new(SubscriptionSink {
            inner: sink,
            control: self.control.clone(),
            channel_name: channel_name.to_string(),
            id,
        });
        handler.on_listen(arguments, sink);
        Ok(id)
    }

    /// Cancels subscription `id` on `channel_name`, even after its stream ended.
    /// Returns ChannelError::SubscriptionNotFound if `id` is not the active subscription;
    /// the handler is not invoked in that case.
    pub fn cancel(
        &self,
        channel_name: &str,
        id: Uuid,
        arguments: Option<Value>,
    ) -> Result<(), ChannelError> {
        self.control
            .remove_if(channel_name, |_, active| active.id == id)
            .ok_or(ChannelError::SubscriptionNotFound(id))?;

        if let Some(handler) = self.handler(channel_name) {
            handler.on_cancel(arguments);
        }
        Ok(())
    }

    /// Subscribes to `channel_name` and returns the events as an async stream.
    /// Dropping the stream cancels the subscription.
    pub fn receive_stream(
        &self,
        channel_name: &str,
        arguments: Option<Value>,
    ) -> Result<EventStream, ChannelError> {
        let (sender, receiver) = mpsc::unbounded_channel();
        let sink = Arc::new(ChannelSink::new(sender));
        let id = self.listen(channel_name, arguments, sink)?;
        Ok(EventStream::new(self.clone(), channel_name, id, receiver))
    }

    fn handler(&self, channel_name: &str) -> Option<Arc<dyn StreamHandler>> {
        self.handlers
            .get(channel_name)
            .map(|entry| entry.value().clone())
    }
}
