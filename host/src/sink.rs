//! Append-only observation log.

use crate::error::SinkError;
use crate::event::Event;
use std::io::Write;
use tracing::trace;

pub trait EventSink {
    fn emit(&mut self, event: &Event) -> Result<(), SinkError>;
}

/// Writes each event as one line of JSON.
pub struct JsonLinesSink<W: Write> {
    writer: W,
    written: u64,
}

impl<W: Write> JsonLinesSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, written: 0 }
    }

    /// Number of events written so far.
    pub fn written(&self) -> u64 {
        self.written
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> EventSink for JsonLinesSink<W> {
    fn emit(&mut self, event: &Event) -> Result<(), SinkError> {
        serde_json::to_writer(&mut self.writer, event)?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;
        self.written += 1;
        trace!(event = event.name(), written = self.written, "event written");
        Ok(())
    }
}
