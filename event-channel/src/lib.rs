//! # Crate event_channel
//!
//! ## event_channel
//!
//! The `event_channel` crate is the host side of push-style event channels. A platform
//! component installs a [`StreamHandler`](common::StreamHandler) under a channel name; a
//! consumer subscribes to that name and receives whatever the handler pushes into the
//! [`EventSink`](common::EventSink) it was given.
//!
//! Each channel carries at most one consumer at a time.
//!
//! ### Example
//!
//! ```ignore
//! #[tokio::main]
//! async fn main() {
//!     let registry = ChannelRegistry::new();
//!     let channel = EventChannel::new(&registry, "flutter_magnetometer/magnetometer-events");
//!     channel.set_stream_handler(Some(handler));
//!
//!     // Subscribe
//!     let mut events = channel.receive_stream(None).unwrap();
//!     while let Some(event) = events.next().await {
//!         println!("Received: {:?}", event);
//!     }
//!     // Dropping the stream unsubscribes
//! }
//! ```

mod channel;
pub mod errors;
mod macros;
mod registry;
mod sink;
mod stream;

pub use channel::EventChannel;
pub use errors::ChannelError;
pub use registry::ChannelRegistry;
pub use sink::{FnSink, SinkCallback};
pub use stream::EventStream;
