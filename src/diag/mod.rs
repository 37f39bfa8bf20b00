//! Diag: The diagnostic sink.
//!
//! The engine narrates what it is doing (run banners, pass counters,
//! trigger state) into a [`DebugSink`]. This is observability only; a
//! [`NullSink`] is the default and nothing in the animation depends on
//! the sink's behavior.

use std::cell::RefCell;
use std::io::Write;
use std::rc::Rc;

/// Append-line/clear surface for out-of-band status text.
pub trait DebugSink {
    /// Append one line of diagnostic text.
    fn push_line(&mut self, line: &str);

    /// Discard everything written so far.
    fn clear(&mut self);
}

/// Shared-handle sink: the engine owns one handle while the host (or a
/// test) keeps another to read what was written.
impl<S: DebugSink> DebugSink for Rc<RefCell<S>> {
    fn push_line(&mut self, line: &str) {
        self.borrow_mut().push_line(line);
    }

    fn clear(&mut self) {
        self.borrow_mut().clear();
    }
}

/// Sink that drops everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl DebugSink for NullSink {
    fn push_line(&mut self, _line: &str) {}

    fn clear(&mut self) {}
}

/// Sink that accumulates lines in memory, for tests.
#[derive(Debug, Default)]
pub struct MemorySink {
    lines: Vec<String>,
}

impl MemorySink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Lines pushed since the last clear.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }
}

impl DebugSink for MemorySink {
    fn push_line(&mut self, line: &str) {
        self.lines.push(line.to_owned());
    }

    fn clear(&mut self) {
        self.lines.clear();
    }
}

/// Sink that writes prefixed lines to any writer (typically stderr).
///
/// `clear` is a no-op: a stream cannot take lines back.
#[derive(Debug)]
pub struct WriterSink<W: Write> {
    writer: W,
}

impl<W: Write> WriterSink<W> {
    /// Wrap a writer.
    pub const fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> DebugSink for WriterSink<W> {
    fn push_line(&mut self, line: &str) {
        let _ = writeln!(self.writer, "[teletype] {line}");
    }

    fn clear(&mut self) {}
}
