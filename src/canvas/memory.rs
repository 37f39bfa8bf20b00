//! Memory Canvas: In-memory surface mirror for tests.

use super::{Canvas, SegmentId};
use crate::color::Rgb;
use std::io;
use unicode_segmentation::UnicodeSegmentation;

/// One mirrored segment.
#[derive(Debug, Clone)]
struct MemorySegment {
    id: SegmentId,
    color: Option<Rgb>,
    text: String,
}

/// A canvas that records every mutation instead of rendering.
///
/// Tests inspect the mirrored segments, the concatenated text, and the
/// cursor-visibility log to assert exactly what a run painted.
#[derive(Debug, Default)]
pub struct MemoryCanvas {
    segments: Vec<MemorySegment>,
    next_id: u64,
    cursor_visible: bool,
    cursor_log: Vec<bool>,
}

impl MemoryCanvas {
    /// Create an empty canvas.
    pub fn new() -> Self {
        Self {
            cursor_visible: true,
            ..Self::default()
        }
    }

    /// Number of live segments.
    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    /// Text of the segment at visual position `index`.
    pub fn segment_text(&self, index: usize) -> Option<&str> {
        self.segments.get(index).map(|s| s.text.as_str())
    }

    /// Color of the segment at visual position `index`.
    pub fn segment_color(&self, index: usize) -> Option<Option<Rgb>> {
        self.segments.get(index).map(|s| s.color)
    }

    /// All segment text concatenated in visual order.
    pub fn text(&self) -> String {
        self.segments.iter().map(|s| s.text.as_str()).collect()
    }

    /// Current cursor visibility.
    pub fn cursor_visible(&self) -> bool {
        self.cursor_visible
    }

    /// Every `set_cursor_visible` call, in order.
    pub fn cursor_log(&self) -> &[bool] {
        &self.cursor_log
    }

    fn segment_mut(&mut self, id: SegmentId) -> io::Result<&mut MemorySegment> {
        self.segments
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "unknown segment"))
    }
}

impl Canvas for MemoryCanvas {
    fn create_segment(&mut self, color: Option<Rgb>) -> io::Result<SegmentId> {
        let id = SegmentId(self.next_id);
        self.next_id += 1;
        self.segments.push(MemorySegment {
            id,
            color,
            text: String::new(),
        });
        Ok(id)
    }

    fn remove_segment(&mut self, id: SegmentId) -> io::Result<()> {
        let before = self.segments.len();
        self.segments.retain(|s| s.id != id);
        if self.segments.len() == before {
            return Err(io::Error::new(io::ErrorKind::NotFound, "unknown segment"));
        }
        Ok(())
    }

    fn push_grapheme(&mut self, id: SegmentId, grapheme: &str) -> io::Result<()> {
        self.segment_mut(id)?.text.push_str(grapheme);
        Ok(())
    }

    fn pop_grapheme(&mut self, id: SegmentId) -> io::Result<()> {
        let segment = self.segment_mut(id)?;
        if let Some((offset, _)) = segment.text.grapheme_indices(true).last() {
            segment.text.truncate(offset);
        }
        Ok(())
    }

    fn clear_text(&mut self, id: SegmentId) -> io::Result<()> {
        self.segment_mut(id)?.text.clear();
        Ok(())
    }

    fn set_cursor_visible(&mut self, visible: bool) -> io::Result<()> {
        self.cursor_visible = visible;
        self.cursor_log.push(visible);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_and_pop_graphemes() {
        let mut canvas = MemoryCanvas::new();
        let id = canvas.create_segment(None).unwrap();

        canvas.push_grapheme(id, "a").unwrap();
        canvas.push_grapheme(id, "é").unwrap();
        canvas.push_grapheme(id, "👍").unwrap();
        assert_eq!(canvas.segment_text(0), Some("aé👍"));

        canvas.pop_grapheme(id).unwrap();
        assert_eq!(canvas.segment_text(0), Some("aé"));
        canvas.pop_grapheme(id).unwrap();
        canvas.pop_grapheme(id).unwrap();
        assert_eq!(canvas.segment_text(0), Some(""));

        // Popping an empty segment is a no-op
        canvas.pop_grapheme(id).unwrap();
        assert_eq!(canvas.segment_text(0), Some(""));
    }

    #[test]
    fn test_remove_segment() {
        let mut canvas = MemoryCanvas::new();
        let a = canvas.create_segment(None).unwrap();
        let b = canvas.create_segment(Some(Rgb::RED)).unwrap();
        canvas.push_grapheme(a, "x").unwrap();
        canvas.push_grapheme(b, "y").unwrap();

        canvas.remove_segment(b).unwrap();
        assert_eq!(canvas.segment_count(), 1);
        assert_eq!(canvas.text(), "x");

        assert!(canvas.remove_segment(b).is_err());
    }

    #[test]
    fn test_cursor_log() {
        let mut canvas = MemoryCanvas::new();
        assert!(canvas.cursor_visible());

        canvas.set_cursor_visible(false).unwrap();
        canvas.set_cursor_visible(true).unwrap();

        assert_eq!(canvas.cursor_log(), &[false, true]);
        assert!(canvas.cursor_visible());
    }
}
