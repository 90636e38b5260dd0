use serde_json::Value;
use std::sync::Arc;

/// Push side of an event channel, handed to a `StreamHandler` on subscribe.
pub trait EventSink: Send + Sync {
    fn success(&self, event: Value);
    fn error(&self, code: &str, message: &str, details: Option<Value>);
    fn end_of_stream(&self);
}

/// Platform side of a named event channel.
pub trait StreamHandler: Send + Sync {
    /// A consumer subscribed. Events for it go to `sink`.
    fn on_listen(&self, arguments: Option<Value>, sink: Arc<dyn EventSink>);
    /// The consumer unsubscribed.
    fn on_cancel(&self, arguments: Option<Value>);
}
