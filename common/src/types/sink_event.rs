use serde_json::Value;
use thiserror::Error;

/// Error event pushed to a consumer through an event sink.
#[derive(Clone, Debug, PartialEq, Error)]
#[error("{code}: {message}")]
pub struct PlatformError {
    pub code: String,
    pub message: String,
    pub details: Option<Value>,
}

impl PlatformError {
    pub fn new(code: &str, message: &str, details: Option<Value>) -> Self {
        Self {
            code: code.to_string(),
            message: message.to_string(),
            details,
        }
    }
}

/// Everything a sink can be asked to deliver.
#[derive(Clone, Debug, PartialEq)]
pub enum SinkEvent {
    Success(Value),
    Error(PlatformError),
    EndOfStream,
}

impl SinkEvent {
    pub fn is_success(&self) -> bool {
        matches!(self, SinkEvent::Success(_))
    }
}
