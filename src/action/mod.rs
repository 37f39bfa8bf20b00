//! Action: Queued visual operations and the FIFO they live in.
//!
//! Every builder call on the engine becomes one [`Action`] value pushed
//! onto the [`ActionQueue`]. Nothing happens at enqueue time; the runner
//! snapshots the queue when a run starts and performs the snapshot in
//! order, so the same values (including dynamic-text closures) replay
//! verbatim on every loop pass.

use crate::color::Rgb;
use std::collections::VecDeque;
use std::fmt;
use std::time::Duration;

/// Closure that produces a message at execution time, not enqueue time.
///
/// Re-invoked fresh on every loop pass; never memoized.
pub type DynamicText = Box<dyn FnMut() -> String>;

/// One queued, deferred visual operation.
pub enum Action {
    /// Reveal a message one grapheme per tick at the typing rate.
    Type(String),
    /// Like [`Action::Type`], but the message is computed when the action
    /// runs.
    DynamicType(DynamicText),
    /// Open a new active segment with the given color (`None` inherits
    /// the default).
    Colour(Option<Rgb>),
    /// Remove the active segment's text one grapheme per tick at the
    /// deleting rate, then detach the segment unless it is the only one.
    Erase,
    /// Discard all segments except a single empty one.
    Clear,
    /// Wait without touching the canvas.
    Delay(Duration),
    /// Set the typing rate (graphemes per second) for later actions.
    SetTypingRate(u32),
    /// Set the deleting rate (graphemes per second) for later actions.
    SetDeletingRate(u32),
    /// Restore the typing rate captured at construction.
    ResetTypingRate,
    /// Restore the deleting rate captured at construction.
    ResetDeletingRate,
    /// Append a line to the diagnostic sink.
    Debug(String),
    /// Composite: open a colored segment and type the message three
    /// times with fixed pauses, all under one completion.
    Echo {
        /// Segment color (`None` inherits the default).
        colour: Option<Rgb>,
        /// Message typed on each repetition.
        message: String,
    },
}

impl fmt::Debug for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Type(msg) => f.debug_tuple("Type").field(msg).finish(),
            Self::DynamicType(_) => f.write_str("DynamicType(..)"),
            Self::Colour(c) => f.debug_tuple("Colour").field(c).finish(),
            Self::Erase => f.write_str("Erase"),
            Self::Clear => f.write_str("Clear"),
            Self::Delay(d) => f.debug_tuple("Delay").field(d).finish(),
            Self::SetTypingRate(r) => f.debug_tuple("SetTypingRate").field(r).finish(),
            Self::SetDeletingRate(r) => f.debug_tuple("SetDeletingRate").field(r).finish(),
            Self::ResetTypingRate => f.write_str("ResetTypingRate"),
            Self::ResetDeletingRate => f.write_str("ResetDeletingRate"),
            Self::Debug(msg) => f.debug_tuple("Debug").field(msg).finish(),
            Self::Echo { colour, message } => f
                .debug_struct("Echo")
                .field("colour", colour)
                .field("message", message)
                .finish(),
        }
    }
}

/// FIFO of pending actions; insertion order is execution order.
#[derive(Debug, Default)]
pub struct ActionQueue {
    items: VecDeque<Action>,
}

impl ActionQueue {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an action at the back.
    pub fn push(&mut self, action: Action) {
        self.items.push_back(action);
    }

    /// Take the front action, if any.
    pub fn pop(&mut self) -> Option<Action> {
        self.items.pop_front()
    }

    /// Put an action back at the front (loop refill at run end, ahead
    /// of anything enqueued while the run was active).
    pub fn push_front(&mut self, action: Action) {
        self.items.push_front(action);
    }

    /// Number of pending actions.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the queue is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(queue: &mut ActionQueue) -> Vec<String> {
        let mut out = Vec::new();
        while let Some(action) = queue.pop() {
            out.push(format!("{action:?}"));
        }
        out
    }

    #[test]
    fn test_fifo_order() {
        let mut queue = ActionQueue::new();
        queue.push(Action::Type("a".into()));
        queue.push(Action::Erase);
        queue.push(Action::Delay(Duration::from_millis(5)));

        assert_eq!(queue.len(), 3);
        assert_eq!(labels(&mut queue), vec!["Type(\"a\")", "Erase", "Delay(5ms)"]);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_push_front_goes_ahead_of_pending() {
        let mut queue = ActionQueue::new();
        queue.push(Action::Type("pending".into()));
        queue.push_front(Action::Type("refilled".into()));

        assert_eq!(
            labels(&mut queue),
            vec!["Type(\"refilled\")", "Type(\"pending\")"]
        );
    }

    #[test]
    fn test_dynamic_action_debug_is_opaque() {
        let action = Action::DynamicType(Box::new(|| "x".to_owned()));
        assert_eq!(format!("{action:?}"), "DynamicType(..)");
    }
}
