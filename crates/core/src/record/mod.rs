use std::io::Write;

use crate::{Presenter, VisualEvent};

/// Writes every event as one JSON line to the wrapped writer.
///
/// Presentation is fire-and-forget, so the first write failure is logged
/// and kept for [`JsonLinesRecorder::take_error`]. Recording stops for good
/// after a failure; taking the error does not restart it.
#[derive(Debug)]
pub struct JsonLinesRecorder<W: Write> {
    writer: W,
    written: usize,
    error: Option<String>,
    stopped: bool,
}

impl<W: Write> JsonLinesRecorder<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            written: 0,
            error: None,
            stopped: false,
        }
    }

    pub fn written(&self) -> usize {
        self.written
    }

    /// Whether a write failure has ended recording.
    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    pub fn take_error(&mut self) -> Option<String> {
        self.error.take()
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    fn record(&mut self, event: &VisualEvent) -> crate::Result<()> {
        serde_json::to_writer(&mut self.writer, event)?;
        self.writer.write_all(b"\n")?;
        if matches!(
            event,
            VisualEvent::Sorted { .. } | VisualEvent::Aborted { .. }
        ) {
            self.writer.flush()?;
        }
        Ok(())
    }
}

impl<W: Write + Send> Presenter for JsonLinesRecorder<W> {
    fn present(&mut self, event: &VisualEvent) {
        if self.stopped {
            return;
        }
        match self.record(event) {
            Ok(()) => self.written += 1,
            Err(err) => {
                tracing::warn!(%err, "stopped recording events");
                self.error = Some(err.to_string());
                self.stopped = true;
            }
        }
    }
}
