use log::info;
use std::sync::Arc;

use common::{MagnetometerReading, SensorManagerPort, StreamHandler};
use event_channel::{ChannelError, ChannelRegistry, EventChannel, EventStream};

use crate::config::MagnetometerConfig;
use crate::handler::MagnetometerStreamHandler;
use crate::listener::SensorListenerAdapter;

/// Magnetometer relay installed on an event channel.
pub struct MagnetometerPlugin<P> {
    channel: EventChannel,
    adapter: Arc<SensorListenerAdapter<P>>,
    handler: Arc<MagnetometerStreamHandler<SensorListenerAdapter<P>>>,
}

impl<P> MagnetometerPlugin<P>
where
    P: SensorManagerPort + 'static,
{
    /// Wires a listener adapter over `port` to a stream handler and installs it on
    /// `config.channel_name` in `registry`.
    pub fn register_with(
        registry: &ChannelRegistry,
        port: Arc<P>,
        config: &MagnetometerConfig,
    ) -> Arc<Self> {
        let adapter = Arc::new(SensorListenerAdapter::new(port, config.sampling_rate));
        let handler = Arc::new(MagnetometerStreamHandler::new(
            adapter.clone(),
            config.report_missing_sensor,
        ));

        let channel = EventChannel::new(registry, &config.channel_name);
        channel.set_stream_handler(Some(handler.clone() as Arc<dyn StreamHandler>));
        info!("Magnetometer plugin registered on {}", channel.name());

        Arc::new(Self {
            channel,
            adapter,
            handler,
        })
    }

    pub fn channel(&self) -> &EventChannel {
        &self.channel
    }

    /// Subscribes to the magnetometer channel.
    pub fn receive_stream(&self) -> Result<EventStream, ChannelError> {
        self.channel.receive_stream(None)
    }

    /// Last reading received from the hardware.
    pub fn latest(&self) -> Option<MagnetometerReading> {
        self.adapter.latest()
    }

    pub fn is_streaming(&self) -> bool {
        self.handler.is_streaming()
    }

    /// Removes the handler from its channel, stopping an active stream.
    pub fn unregister(&self) {
        self.channel.set_stream_handler(None);
        info!("Magnetometer plugin removed from {}", self.channel.name());
    }
}
