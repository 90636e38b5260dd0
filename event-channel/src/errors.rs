//! Module errors

use thiserror::Error;
use uuid::Uuid;

/// Errors raised by the channel registry.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ChannelError {
    /// No stream handler is installed under this channel name.
    #[error("Channel doesnt exist: {0}")]
    ChannelNotFound(String),

    /// The subscription was cancelled or replaced already.
    #[error("Subscription Id not found: {0}")]
    SubscriptionNotFound(Uuid),
}
