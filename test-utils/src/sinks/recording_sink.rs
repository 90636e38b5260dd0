use parking_lot::Mutex;
use serde_json::Value;
use std::sync::Arc;

use common::types::{PlatformError, SinkEvent};
use common::{EventSink, MagnetometerReading};

/// Event sink that records everything pushed to it.
#[derive(Clone, Default)]
pub struct RecordingSink {
    events: Arc<Mutex<Vec<SinkEvent>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self {
            events: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn events(&self) -> Vec<SinkEvent> {
        self.events.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }

    /// Successful events decoded back into readings.
    pub fn readings(&self) -> Vec<MagnetometerReading> {
        self.events
            .lock()
            .iter()
            .filter_map(|event| match event {
                SinkEvent::Success(value) => MagnetometerReading::try_from(value).ok(),
                _ => None,
            })
            .collect()
    }

    pub fn errors(&self) -> Vec<PlatformError> {
        self.events
            .lock()
            .iter()
            .filter_map(|event| match event {
                SinkEvent::Error(error) => Some(error.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn ended(&self) -> bool {
        self.events
            .lock()
            .iter()
            .any(|event| *event == SinkEvent::EndOfStream)
    }
}

impl EventSink for RecordingSink {
    fn success(&self, event: Value) {
        self.events.lock().push(SinkEvent::Success(event));
    }

    fn error(&self, code: &str, message: &str, details: Option<Value>) {
        self.events
            .lock()
            .push(SinkEvent::Error(PlatformError::new(code, message, details)));
    }

    fn end_of_stream(&self) {
        self.events.lock().push(SinkEvent::EndOfStream);
    }
}

impl std::fmt::Debug for RecordingSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordingSink")
            .field("events", &self.events.lock().len())
            .finish()
    }
}
