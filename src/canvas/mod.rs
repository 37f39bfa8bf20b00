//! Canvas: The rendering-surface seam.
//!
//! The engine never talks to a terminal (or anything else) directly; it
//! drives a small set of node primitives through the [`Canvas`] trait.
//! Segments are contiguous runs of same-colored text, ordered left to
//! right, with a single cursor glyph pinned after the last segment.
//!
//! Two implementations ship with the crate:
//! - [`TermCanvas`]: live terminal rendering via crossterm
//! - [`MemoryCanvas`]: in-memory mirror for tests

mod memory;
mod term;

pub use memory::MemoryCanvas;
pub use term::TermCanvas;

use crate::color::Rgb;
use std::io;

/// Opaque handle to one segment node on a canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SegmentId(pub(crate) u64);

/// Node primitives the engine requires from a rendering surface.
///
/// All text mutations work on grapheme clusters: `push_grapheme` appends
/// exactly one user-perceived character, `pop_grapheme` removes the last
/// one. The canvas owns visual state only; the engine tracks segment
/// order and lengths itself.
pub trait Canvas {
    /// Create a new segment in visual order before the cursor glyph.
    ///
    /// `None` inherits the surface's default foreground color.
    ///
    /// # Errors
    ///
    /// Returns an error if the surface fails to update.
    fn create_segment(&mut self, color: Option<Rgb>) -> io::Result<SegmentId>;

    /// Detach a segment and its text from the surface.
    ///
    /// # Errors
    ///
    /// Returns an error if the surface fails to update.
    fn remove_segment(&mut self, id: SegmentId) -> io::Result<()>;

    /// Append one grapheme cluster to a segment's text.
    ///
    /// # Errors
    ///
    /// Returns an error if the surface fails to update.
    fn push_grapheme(&mut self, id: SegmentId, grapheme: &str) -> io::Result<()>;

    /// Remove the last grapheme cluster from a segment's text.
    ///
    /// No-op on an empty segment.
    ///
    /// # Errors
    ///
    /// Returns an error if the surface fails to update.
    fn pop_grapheme(&mut self, id: SegmentId) -> io::Result<()>;

    /// Set a segment's text to empty.
    ///
    /// # Errors
    ///
    /// Returns an error if the surface fails to update.
    fn clear_text(&mut self, id: SegmentId) -> io::Result<()>;

    /// Show or hide the cursor glyph.
    ///
    /// # Errors
    ///
    /// Returns an error if the surface fails to update.
    fn set_cursor_visible(&mut self, visible: bool) -> io::Result<()>;
}
