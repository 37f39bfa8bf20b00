//! Terminal Canvas: Live crossterm rendering.
//!
//! Renders the typewriter inline at the current cursor row rather than on
//! an alternate screen, so the animation composes with whatever the host
//! program printed before it. Every mutation repaints the whole widget
//! region into a byte buffer that is flushed in a single `write()` call,
//! which keeps high-rate typing flicker-free.

use super::{Canvas, SegmentId};
use crate::color::Rgb;
use crossterm::{
    cursor::{self, MoveTo},
    queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self, Clear, ClearType, ScrollUp},
};
use std::io::{self, Stdout, Write};
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// Glyph drawn after the last segment.
const CURSOR_GLYPH: &str = "┃";

#[derive(Debug, Clone)]
struct TermSegment {
    id: SegmentId,
    color: Option<Rgb>,
    text: String,
}

/// A crossterm-backed canvas painting into the live terminal.
///
/// Construction enters raw mode and hides the hardware cursor; both are
/// restored on drop.
pub struct TermCanvas {
    out: Stdout,
    buf: Vec<u8>,
    segments: Vec<TermSegment>,
    next_id: u64,
    cursor_visible: bool,
    origin_row: u16,
    width: u16,
    height: u16,
}

impl TermCanvas {
    /// Create a canvas anchored at the terminal's current cursor row.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal cannot be queried or raw mode
    /// cannot be enabled (e.g. stdout is not a tty).
    pub fn new() -> io::Result<Self> {
        let (width, height) = terminal::size()?;
        terminal::enable_raw_mode()?;

        let mut out = io::stdout();
        crossterm::execute!(out, cursor::Hide)?;
        let (_, origin_row) = cursor::position()?;

        Ok(Self {
            out,
            buf: Vec::with_capacity(4096),
            segments: Vec::new(),
            next_id: 0,
            cursor_visible: true,
            origin_row,
            width,
            height,
        })
    }

    /// Full widget text in visual order.
    fn full_text(&self) -> String {
        self.segments.iter().map(|s| s.text.as_str()).collect()
    }

    /// Repaint the whole widget region with one buffered write.
    fn repaint(&mut self) -> io::Result<()> {
        self.buf.clear();

        let rows = rows_needed(&self.full_text(), self.width);
        // Scroll the screen when the widget outgrows the space below its
        // anchor row, then pin the anchor to keep the text fully visible.
        let excess = self.origin_row.saturating_add(rows).saturating_sub(self.height);
        if excess > 0 {
            queue!(self.buf, ScrollUp(excess))?;
            self.origin_row = self.origin_row.saturating_sub(excess);
        }

        queue!(
            self.buf,
            MoveTo(0, self.origin_row),
            Clear(ClearType::FromCursorDown)
        )?;

        for segment in &self.segments {
            match segment.color {
                Some(c) => queue!(self.buf, SetForegroundColor(Color::Rgb { r: c.r, g: c.g, b: c.b }))?,
                None => queue!(self.buf, ResetColor)?,
            }
            // Raw mode needs explicit carriage returns.
            queue!(self.buf, Print(segment.text.replace('\n', "\r\n")))?;
        }

        queue!(self.buf, ResetColor)?;
        if self.cursor_visible {
            queue!(self.buf, Print(CURSOR_GLYPH))?;
        }

        self.out.write_all(&self.buf)?;
        self.out.flush()
    }

    fn segment_mut(&mut self, id: SegmentId) -> io::Result<&mut TermSegment> {
        self.segments
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "unknown segment"))
    }
}

impl Canvas for TermCanvas {
    fn create_segment(&mut self, color: Option<Rgb>) -> io::Result<SegmentId> {
        let id = SegmentId(self.next_id);
        self.next_id += 1;
        self.segments.push(TermSegment {
            id,
            color,
            text: String::new(),
        });
        self.repaint()?;
        Ok(id)
    }

    fn remove_segment(&mut self, id: SegmentId) -> io::Result<()> {
        self.segments.retain(|s| s.id != id);
        self.repaint()
    }

    fn push_grapheme(&mut self, id: SegmentId, grapheme: &str) -> io::Result<()> {
        self.segment_mut(id)?.text.push_str(grapheme);
        self.repaint()
    }

    fn pop_grapheme(&mut self, id: SegmentId) -> io::Result<()> {
        let segment = self.segment_mut(id)?;
        if let Some((offset, _)) = segment.text.grapheme_indices(true).last() {
            segment.text.truncate(offset);
        }
        self.repaint()
    }

    fn clear_text(&mut self, id: SegmentId) -> io::Result<()> {
        self.segment_mut(id)?.text.clear();
        self.repaint()
    }

    fn set_cursor_visible(&mut self, visible: bool) -> io::Result<()> {
        self.cursor_visible = visible;
        self.repaint()
    }
}

impl Drop for TermCanvas {
    fn drop(&mut self) {
        let _ = crossterm::execute!(self.out, ResetColor, cursor::Show, Print("\r\n"));
        let _ = terminal::disable_raw_mode();
    }
}

/// Rows the widget occupies: one per text line, plus wrapping, plus the
/// cursor glyph's cell on the final line.
fn rows_needed(text: &str, term_width: u16) -> u16 {
    let term_width = u32::from(term_width.max(1));
    let lines: Vec<&str> = text.split('\n').collect();
    let last = lines.len().saturating_sub(1);

    let mut rows: u32 = 0;
    for (i, line) in lines.iter().enumerate() {
        let mut cells = line.width() as u32;
        if i == last {
            cells += CURSOR_GLYPH.width() as u32;
        }
        rows += cells.div_ceil(term_width).max(1);
    }
    u16::try_from(rows).unwrap_or(u16::MAX)
}
