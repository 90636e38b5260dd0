use log::{debug, error, info, warn};
use parking_lot::{Mutex, ReentrantMutex};
use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use common::{
    EventSink, MagnetometerReading, MagnetometerSource, ReadingCallback, SensorError,
    StreamHandler,
};

use crate::constants::{
    MALFORMED_SENSOR_EVENT_CODE, REGISTRATION_FAILED_CODE, SENSOR_UNAVAILABLE_CODE,
};

/// Consumer side of the bridge.
///
/// Every subscription gets a new generation; readings and errors delivered through
/// the callback of an older generation are ignored.
enum StreamState {
    Idle,
    Streaming {
        sink: Arc<dyn EventSink>,
        generation: u64,
    },
}

struct HandlerInner<S> {
    source: Arc<S>,
    state: Mutex<StreamState>,
    // Held across a state change and the matching activate/deactivate, never across
    // sink calls. Reentrant so the platform may call back on the same thread.
    lifecycle: ReentrantMutex<()>,
    generation: AtomicU64,
    report_missing_sensor: bool,
}

impl<S> HandlerInner<S>
where
    S: MagnetometerSource,
{
    fn current_sink(&self, generation: u64) -> Option<Arc<dyn EventSink>> {
        match &*self.state.lock() {
            StreamState::Streaming {
                sink,
                generation: current,
            } if *current == generation => Some(sink.clone()),
            _ => None,
        }
    }

    fn forward(&self, generation: u64, result: Result<MagnetometerReading, SensorError>) {
        match result {
            Ok(reading) => match self.current_sink(generation) {
                Some(sink) => sink.success(Value::from(reading)),
                None => debug!("No consumer attached, dropping magnetometer reading"),
            },
            Err(e) => self.terminate(generation, e),
        }
    }

    // A malformed payload ends the stream: the consumer gets one error, then end of stream.
    fn terminate(&self, generation: u64, error: SensorError) {
        let sink = {
            let _lifecycle = self.lifecycle.lock();
            let mut state = self.state.lock();
            let is_current = matches!(
                &*state,
                StreamState::Streaming { generation: current, .. } if *current == generation
            );
            if !is_current {
                debug!("Ignoring error from a finished stream: {}", error);
                return;
            }
            let previous = std::mem::replace(&mut *state, StreamState::Idle);
            drop(state);
            let StreamState::Streaming { sink, .. } = previous else {
                return;
            };
            error!("Terminating magnetometer stream: {}", error);
            self.source.deactivate();
            sink
        };
        sink.error(MALFORMED_SENSOR_EVENT_CODE, &error.to_string(), None);
        sink.end_of_stream();
    }
}

/// Serves magnetometer readings on an event channel to a single consumer.
///
/// `Idle` until a consumer subscribes; `Streaming` from `on_listen` until `on_cancel`.
/// The sensor runs exactly while `Streaming`.
pub struct MagnetometerStreamHandler<S> {
    inner: Arc<HandlerInner<S>>,
}

impl<S> MagnetometerStreamHandler<S>
where
    S: MagnetometerSource + 'static,
{
    pub fn new(source: Arc<S>, report_missing_sensor: bool) -> Self {
        Self {
            inner: Arc::new(HandlerInner {
                source,
                state: Mutex::new(StreamState::Idle),
                lifecycle: ReentrantMutex::new(()),
                generation: AtomicU64::new(0),
                report_missing_sensor,
            }),
        }
    }

    pub fn is_streaming(&self) -> bool {
        matches!(*self.inner.state.lock(), StreamState::Streaming { .. })
    }

    pub fn source(&self) -> &Arc<S> {
        &self.inner.source
    }

    fn forwarder(&self, generation: u64) -> ReadingCallback {
        let inner: Weak<HandlerInner<S>> = Arc::downgrade(&self.inner);
        Arc::new(move |result| {
            if let Some(inner) = inner.upgrade() {
                inner.forward(generation, result);
            }
        })
    }
}

impl<S> StreamHandler for MagnetometerStreamHandler<S>
where
    S: MagnetometerSource + 'static,
{
    fn on_listen(&self, _arguments: Option<Value>, sink: Arc<dyn EventSink>) {
        let activated = {
            let _lifecycle = self.inner.lifecycle.lock();
            let generation = self.inner.generation.fetch_add(1, Ordering::SeqCst) + 1;
            let previous = std::mem::replace(
                &mut *self.inner.state.lock(),
                StreamState::Streaming {
                    sink: sink.clone(),
                    generation,
                },
            );
            if let StreamState::Streaming { .. } = previous {
                warn!("Magnetometer stream already has a consumer, replacing it");
            }
            self.inner.source.activate(self.forwarder(generation))
        };

        match activated {
            Ok(()) => info!("Magnetometer stream started"),
            Err(e @ SensorError::SensorUnavailable(_)) => {
                warn!("Magnetometer stream will stay idle: {}", e);
                if self.inner.report_missing_sensor {
                    sink.error(SENSOR_UNAVAILABLE_CODE, &e.to_string(), None);
                }
            }
            Err(e) => {
                error!("Magnetometer stream could not start: {}", e);
                sink.error(REGISTRATION_FAILED_CODE, &e.to_string(), None);
            }
        }
    }

    fn on_cancel(&self, _arguments: Option<Value>) {
        let _lifecycle = self.inner.lifecycle.lock();
        let previous = std::mem::replace(&mut *self.inner.state.lock(), StreamState::Idle);
        match previous {
            StreamState::Streaming { .. } => {
                self.inner.source.deactivate();
                info!("Magnetometer stream stopped");
            }
            StreamState::Idle => debug!("Magnetometer stream already idle"),
        }
    }
}
