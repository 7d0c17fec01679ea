//! Tracing layer that feeds the frontend's log panel.
//!
//! Events land in a [`LogBuffer`] guarded by its own mutex, so logging from
//! the export driver never waits on the render thread's [`UiState`] lock.
//! The frontend moves the lines over once per frame with
//! [`LogBuffer::flush_into`].

use std::fmt;
use std::sync::{Arc, Mutex};

use chrono::Local;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer};
use tracing_subscriber::registry::LookupSpan;

use super::{LOG_TRIM_TO, LogLevel, LogLine, MAX_LOG_LINES, UiState};

/// Pending log lines, shared between the layer and the frontend.
#[derive(Clone, Default)]
pub struct LogBuffer(Arc<Mutex<Vec<LogLine>>>);

impl LogBuffer {
    fn push(&self, line: LogLine) {
        if let Ok(mut buf) = self.0.lock() {
            buf.push(line);
            trim(&mut buf);
        }
    }

    /// Take every pending line.
    pub fn drain(&self) -> Vec<LogLine> {
        let mut buf = self.0.lock().unwrap_or_else(|e| e.into_inner());
        std::mem::take(&mut *buf)
    }

    /// Move pending lines into `UiState::logs`. Locks the state only when
    /// there is something to move.
    pub fn flush_into(&self, state: &Arc<Mutex<UiState>>) {
        let lines = self.drain();
        if lines.is_empty() {
            return;
        }
        if let Ok(mut s) = state.lock() {
            s.logs.extend(lines);
            trim(&mut s.logs);
        }
    }
}

fn trim(lines: &mut Vec<LogLine>) {
    if lines.len() > MAX_LOG_LINES {
        let excess = lines.len() - LOG_TRIM_TO;
        lines.drain(..excess);
    }
}

/// Captures events into a [`LogBuffer`].
pub struct UiTracingLayer {
    buffer: LogBuffer,
}

impl UiTracingLayer {
    /// Create the layer and the buffer the frontend drains.
    pub fn new() -> (Self, LogBuffer) {
        let buffer = LogBuffer::default();
        (
            Self {
                buffer: buffer.clone(),
            },
            buffer,
        )
    }
}

impl<S: Subscriber + for<'a> LookupSpan<'a>> Layer<S> for UiTracingLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);

        self.buffer.push(LogLine {
            time: Local::now().format("%H:%M:%S").to_string(),
            level: level_of(event.metadata().level()),
            message: visitor.finish(),
        });
    }
}

fn level_of(level: &Level) -> LogLevel {
    match *level {
        Level::TRACE => LogLevel::Trace,
        Level::DEBUG => LogLevel::Debug,
        Level::INFO => LogLevel::Info,
        Level::WARN => LogLevel::Warn,
        Level::ERROR => LogLevel::Error,
    }
}

/// Collects the message and any structured fields of an event.
#[derive(Default)]
struct MessageVisitor {
    message: String,
    fields: Vec<String>,
}

impl MessageVisitor {
    /// `message {k=v, ...}`, or just the fields when there is no message.
    fn finish(self) -> String {
        match (self.message.is_empty(), self.fields.is_empty()) {
            (_, true) => self.message,
            (true, false) => self.fields.join(" "),
            (false, false) => format!("{} {{{}}}", self.message, self.fields.join(", ")),
        }
    }
}

impl Visit for MessageVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message = value.to_string();
        } else {
            self.fields.push(format!("{}={value}", field.name()));
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            // format_args! messages arrive here and print without quotes.
            self.message = format!("{value:?}");
        } else {
            self.fields.push(format!("{}={value:?}", field.name()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifact::ArtifactStore;
    use tracing_subscriber::layer::SubscriberExt;

    #[test]
    fn events_are_captured_with_level_and_fields() {
        let (layer, buffer) = UiTracingLayer::new();
        let subscriber = tracing_subscriber::registry().with(layer);
        tracing::subscriber::with_default(subscriber, || {
            tracing::info!("PDF generated: {}", "file:///tmp/a.pdf");
            tracing::warn!(status = 500, "export failed");
        });

        let lines = buffer.drain();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].level, LogLevel::Info);
        assert_eq!(lines[0].message, "PDF generated: file:///tmp/a.pdf");
        assert_eq!(lines[1].level, LogLevel::Warn);
        assert_eq!(lines[1].message, "export failed {status=500}");
        assert!(buffer.drain().is_empty());
    }

    #[test]
    fn flush_moves_lines_into_state_and_trims() {
        let buffer = LogBuffer::default();
        for i in 0..(MAX_LOG_LINES + 1) {
            buffer.push(LogLine {
                time: "00:00:00".into(),
                level: LogLevel::Debug,
                message: format!("line {i}"),
            });
        }
        let state = Arc::new(Mutex::new(UiState::new(Arc::new(ArtifactStore::new(
            "unused",
        )))));
        buffer.flush_into(&state);

        let s = state.lock().unwrap();
        assert_eq!(s.logs.len(), LOG_TRIM_TO);
        assert_eq!(
            s.logs.last().unwrap().message,
            format!("line {MAX_LOG_LINES}")
        );
    }
}
