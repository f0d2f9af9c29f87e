//! Output sink for the Pushy runtime.
//!
//! Every output-producing command writes through one sink. The sink joins
//! the values of a single write with spaces, appends the configured
//! delimiter (newline unless a program changed it), and flushes immediately
//! so an interrupted run never loses emitted output.
//!
//! The sink also tracks whether the most recent write left the cursor on a
//! fresh line, letting the error channel prefix a newline only when one is
//! actually needed.

use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Delimiter-appending writer used by all output commands.
pub struct OutputSink<W: Write> {
    writer: W,
    delim: String,
    last_delim: Option<String>,
    fresh_line: Arc<AtomicBool>,
}

impl<W: Write> OutputSink<W> {
    /// Create a sink with the default newline delimiter.
    pub fn new(writer: W) -> Self {
        Self::with_delim(writer, "\n")
    }

    /// Create a sink with a custom delimiter.
    pub fn with_delim(writer: W, delim: &str) -> Self {
        Self {
            writer,
            delim: delim.to_string(),
            last_delim: None,
            fresh_line: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Replace the delimiter appended after each write.
    pub fn set_delim(&mut self, delim: impl Into<String>) {
        self.delim = delim.into();
    }

    /// The delimiter currently in force.
    pub fn delim(&self) -> &str {
        &self.delim
    }

    /// The delimiter used by the most recent write, if any write happened.
    pub fn last_delim(&self) -> Option<&str> {
        self.last_delim.as_deref()
    }

    /// Whether the most recent write ended on a fresh line.
    pub fn on_fresh_line(&self) -> bool {
        self.fresh_line.load(Ordering::SeqCst)
    }

    /// Shared handle to the fresh-line state, for signal handlers that
    /// cannot reach the sink itself.
    pub fn fresh_line_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.fresh_line)
    }

    /// Write one line of output: values space-joined, delimiter appended.
    ///
    /// Output is fire-and-forget: a failing writer never surfaces into the
    /// engine, which stays total over program text.
    pub fn write_values<I>(&mut self, values: I)
    where
        I: IntoIterator<Item = i64>,
    {
        let joined = values
            .into_iter()
            .map(|v| v.to_string())
            .collect::<Vec<_>>()
            .join(" ");
        self.write_text(&joined);
    }

    /// Write raw text followed by the delimiter.
    pub fn write_text(&mut self, text: &str) {
        if let Err(e) = write!(self.writer, "{}{}", text, self.delim) {
            tracing::debug!(error = %e, "output write failed");
        }
        if let Err(e) = self.writer.flush() {
            tracing::debug!(error = %e, "output flush failed");
        }
        self.last_delim = Some(self.delim.clone());
        let fresh = self.delim.ends_with('\n') || (self.delim.is_empty() && text.ends_with('\n'));
        self.fresh_line.store(fresh, Ordering::SeqCst);
    }

    /// Consume the sink and return the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
    }

    /// Borrow the underlying writer.
    pub fn get_ref(&self) -> &W {
        &self.writer
    }
}
