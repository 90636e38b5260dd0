use serde_json::Value;
use std::sync::Arc;

use common::types::{PlatformError, SinkEvent};
use common::EventSink;

pub type SinkCallback = Arc<dyn Fn(SinkEvent) + Send + Sync>;

/// Event sink backed by a closure receiving every `SinkEvent`.
#[derive(Clone)]
pub struct FnSink {
    callback: SinkCallback,
}

impl FnSink {
    pub fn new<F>(callback: F) -> Self
    where
        F: Fn(SinkEvent) + Send + Sync + 'static,
    {
        FnSink {
            callback: Arc::new(callback),
        }
    }
}

impl EventSink for FnSink {
    fn success(&self, event: Value) {
        (self.callback)(SinkEvent::Success(event));
    }

    fn error(&self, code: &str, message: &str, details: Option<Value>) {
        (self.callback)(SinkEvent::Error(PlatformError::new(code, message, details)));
    }

    fn end_of_stream(&self) {
        (self.callback)(SinkEvent::EndOfStream);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink;
    use serde_json::json;
    use std::sync::Mutex;

    struct TestHandler {
        events: Mutex<Vec<SinkEvent>>,
    }

    impl TestHandler {
        fn new() -> Self {
            Self {
                events: Mutex::new(Vec::new()),
            }
        }

        fn handle(&self, event: SinkEvent) {
            self.events.lock().unwrap().push(event);
        }
    }

    #[test]
    fn test_fn_sink_maps_calls_to_events() {
        let handler = Arc::new(TestHandler::new());
        let sink = FnSink::new({
            let handler = handler.clone();
            move |event| handler.handle(event)
        });

        sink.success(json!({"x": 1.0}));
        sink.error("CODE", "message", None);
        sink.end_of_stream();

        let events = handler.events.lock().unwrap();
        assert_eq!(
            *events,
            vec![
                SinkEvent::Success(json!({"x": 1.0})),
                SinkEvent::Error(PlatformError::new("CODE", "message", None)),
                SinkEvent::EndOfStream,
            ]
        );
    }

    #[test]
    fn test_fn_sink_with_macro() {
        let handler = Arc::new(TestHandler::new());
        let sink = sink!(handler.handle);

        sink.success(json!(42));

        let events = handler.events.lock().unwrap();
        assert_eq!(*events, vec![SinkEvent::Success(json!(42))]);
    }
}
