//! # Teletype
//!
//! A queued typewriter animation engine for terminal text.
//!
//! Teletype simulates typing: characters appear one tick at a time,
//! colored runs open and close, text erases itself, and the whole
//! sequence can loop. Builder calls enqueue actions; a sequential runner
//! performs them one at a time, each to completion, with a blinking
//! cursor riding alongside on its own fixed-period timer.
//!
//! ## Core Concepts
//!
//! - **Action queue**: every builder call becomes one deferred action;
//!   insertion order is execution order
//! - **Sequential runner**: one action in flight at a time; looping
//!   replays the consumed snapshot verbatim
//! - **Canvas seam**: the engine drives segment/cursor primitives
//!   through a trait, so rendering is swappable (live terminal or
//!   in-memory for tests)
//! - **Injected clock**: all waits go through a tick-source trait; tests
//!   use a virtual clock and never touch the wall clock
//!
//! ## Example
//!
//! ```rust,ignore
//! use teletype::{Options, Rgb, TermCanvas, Typewriter};
//!
//! let mut tw = Typewriter::with_options(TermCanvas::new()?, Options::default())?;
//! tw.type_text("Hello, ", 0)
//!     .colour(Rgb::HOT_PINK, "world!")
//!     .delay(500)
//!     .erase();
//! tw.start()?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod action;
pub mod canvas;
pub mod clock;
pub mod color;
pub mod diag;
pub mod engine;
pub mod input;

// Re-exports for convenience
pub use action::{Action, ActionQueue};
pub use canvas::{Canvas, MemoryCanvas, SegmentId, TermCanvas};
pub use clock::{Clock, SystemClock, VirtualClock};
pub use color::Rgb;
pub use diag::{DebugSink, MemorySink, NullSink, WriterSink};
pub use engine::{LoopMode, Options, RunReport, RunState, Typewriter};
pub use input::{TriggerActor, TriggerEvent};
