mod recording_sink;

pub use recording_sink::RecordingSink;
