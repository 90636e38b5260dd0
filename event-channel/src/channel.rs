use serde_json::Value;
use std::sync::Arc;

use common::StreamHandler;

use crate::errors::ChannelError;
use crate::registry::ChannelRegistry;
use crate::stream::EventStream;

/// Named handle on a `ChannelRegistry`.
#[derive(Clone)]
pub struct EventChannel {
    registry: ChannelRegistry,
    name: String,
}

impl EventChannel {
    pub fn new(registry: &ChannelRegistry, name: &str) -> Self {
        Self {
            registry: registry.clone(),
            name: name.to_string(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Installs `handler` on this channel, or removes the current one if `None`.
    pub fn set_stream_handler(&self, handler: Option<Arc<dyn StreamHandler>>) {
        match handler {
            Some(handler) => self.registry.set_stream_handler(&self.name, handler),
            None => {
                self.registry.remove_stream_handler(&self.name);
            }
        }
    }

    pub fn receive_stream(&self, arguments: Option<Value>) -> Result<EventStream, ChannelError> {
        self.registry.receive_stream(&self.name, arguments)
    }
}
