//! Engine: Fluent builder and sequential runner.
//!
//! The [`Typewriter`] is both halves of the widget: builder methods
//! enqueue [`Action`]s and return `&mut Self` for chaining, and the
//! runner drains the queue in FIFO order, performing one action at a
//! time until its completion before touching the next. Looping replays
//! the consumed snapshot verbatim and refills the queue when it stops.
//!
//! # Example
//!
//! ```rust,ignore
//! use teletype::{MemoryCanvas, Options, Rgb, Typewriter};
//!
//! let mut tw = Typewriter::new(MemoryCanvas::new())?;
//! tw.type_text("Hello, ", 0)
//!     .colour(Rgb::HOT_PINK, "world")
//!     .delay(500)
//!     .erase();
//! tw.start()?;
//! ```

use crate::action::{Action, ActionQueue};
use crate::canvas::{Canvas, SegmentId};
use crate::clock::{Clock, SystemClock};
use crate::color::Rgb;
use crate::diag::{DebugSink, NullSink};
use crate::input::TriggerEvent;
use crossbeam_channel::{Receiver, TryRecvError};
use std::fmt;
use std::io;
use std::time::Duration;
use unicode_segmentation::UnicodeSegmentation;

/// Fixed cursor-blink period, independent of the action pipeline.
const CURSOR_BLINK_PERIOD: Duration = Duration::from_millis(500);

/// Repetitions performed by the composite echo action.
const ECHO_REPEATS: u32 = 3;

/// Pause between echo repetitions.
const ECHO_PAUSE: Duration = Duration::from_millis(500);

/// Repeat policy for a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoopMode {
    /// Drain the queue once and stop.
    #[default]
    Off,
    /// Replay the queue forever.
    Infinite,
    /// Replay the queue this many times. `Count(0)` degrades to a
    /// single pass.
    Count(u32),
}

impl fmt::Display for LoopMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Off => f.write_str("off"),
            Self::Infinite => f.write_str("∞"),
            Self::Count(n) => write!(f, "{n}"),
        }
    }
}

/// Configuration captured at construction time.
///
/// Rates are in grapheme clusters per second; one character is revealed
/// or removed every `floor(1000 / rate)` milliseconds. Rates below 1 are
/// clamped to 1 at use time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Options {
    /// Repeat policy.
    pub loop_mode: LoopMode,
    /// Begin a run immediately when `ready` is called.
    pub auto_start: bool,
    /// Characters revealed per second.
    pub typing_rate: u32,
    /// Characters removed per second.
    pub deleting_rate: u32,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            loop_mode: LoopMode::Off,
            auto_start: false,
            typing_rate: 20,
            deleting_rate: 5,
        }
    }
}

/// Runner state, observable between staged pass executions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunState {
    /// No run active; builder calls accumulate for the next run.
    #[default]
    Idle,
    /// A run is draining (and possibly refilling) the queue.
    Running,
}

/// What a completed run did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunReport {
    /// Full passes over the action snapshot.
    pub passes: u64,
    /// Individual actions performed across all passes.
    pub actions_run: u64,
}

/// Tick interval for a rate in characters per second.
fn rate_to_interval(rate: u32) -> Duration {
    Duration::from_millis(1000 / u64::from(rate.max(1)))
}

/// Engine-side bookkeeping for one canvas segment.
#[derive(Debug, Clone, Copy)]
struct Segment {
    node: SegmentId,
    /// Grapheme count, so erase knows how many ticks to schedule.
    len: usize,
}

/// The typewriter engine.
///
/// Owns the canvas, the clock, the diagnostic sink, and the action
/// queue. The ordered segment list mirrors visual order; the last
/// segment is the active one that typing appends to.
pub struct Typewriter<C: Canvas> {
    canvas: C,
    clock: Box<dyn Clock>,
    debug: Box<dyn DebugSink>,
    initial_options: Options,
    options: Options,
    queue: ActionQueue,
    /// The action snapshot of the run in progress. Moved out of the
    /// queue at run start so actions enqueued mid-run stay out of it.
    run_list: Vec<Action>,
    segments: Vec<Segment>,
    state: RunState,
    armed: bool,
    cursor_on: bool,
    next_blink: Duration,
    num_actions: usize,
    passes_done: u64,
    actions_run: u64,
}

impl<C: Canvas> Typewriter<C> {
    /// Create an engine with default options and the system clock.
    ///
    /// # Errors
    ///
    /// Returns an error if the canvas fails to create the initial
    /// segment or cursor.
    pub fn new(canvas: C) -> io::Result<Self> {
        Self::with_options(canvas, Options::default())
    }

    /// Create an engine with explicit options and the system clock.
    ///
    /// # Errors
    ///
    /// Returns an error if the canvas fails to create the initial
    /// segment or cursor.
    pub fn with_options(canvas: C, options: Options) -> io::Result<Self> {
        Self::with_clock(canvas, options, Box::new(SystemClock::new()))
    }

    /// Create an engine with an injected clock (virtual in tests).
    ///
    /// # Errors
    ///
    /// Returns an error if the canvas fails to create the initial
    /// segment or cursor.
    pub fn with_clock(mut canvas: C, options: Options, clock: Box<dyn Clock>) -> io::Result<Self> {
        let node = canvas.create_segment(None)?;
        canvas.set_cursor_visible(true)?;

        Ok(Self {
            canvas,
            clock,
            debug: Box::new(NullSink),
            initial_options: options,
            options,
            queue: ActionQueue::new(),
            run_list: Vec::new(),
            segments: vec![Segment { node, len: 0 }],
            state: RunState::Idle,
            armed: false,
            cursor_on: true,
            next_blink: Duration::ZERO,
            num_actions: 0,
            passes_done: 0,
            actions_run: 0,
        })
    }

    /// Replace the diagnostic sink (default: [`NullSink`]).
    pub fn set_debug_sink(&mut self, sink: Box<dyn DebugSink>) {
        self.debug = sink;
    }

    /// Current runner state.
    pub const fn state(&self) -> RunState {
        self.state
    }

    /// Live options (reset from the initial snapshot at every run start).
    pub const fn options(&self) -> &Options {
        &self.options
    }

    /// Number of pending actions.
    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    /// Borrow the canvas (tests inspect painted state through this).
    pub const fn canvas(&self) -> &C {
        &self.canvas
    }

    // ------------------------------------------------------------------
    // Builder surface: every call enqueues and returns immediately.
    // ------------------------------------------------------------------

    /// Queue typing `message` one grapheme per tick, then a delay of
    /// `post_delay_ms` (queued even when zero, as a no-op wait).
    pub fn type_text(&mut self, message: impl Into<String>, post_delay_ms: u64) -> &mut Self {
        self.queue.push(Action::Type(message.into()));
        self.delay(post_delay_ms)
    }

    /// Queue typing a message computed when the action runs.
    ///
    /// The closure is re-invoked on every loop pass, so content such as
    /// a clock reading stays fresh across passes.
    pub fn dynamic_type(
        &mut self,
        message_fn: impl FnMut() -> String + 'static,
        post_delay_ms: u64,
    ) -> &mut Self {
        self.queue.push(Action::DynamicType(Box::new(message_fn)));
        self.delay(post_delay_ms)
    }

    /// Queue opening a new active segment in `colour`, then typing
    /// `message` into it.
    pub fn colour(&mut self, colour: impl Into<Option<Rgb>>, message: &str) -> &mut Self {
        self.queue.push(Action::Colour(colour.into()));
        self.type_text(message, 0)
    }

    /// Queue erasing the active segment one grapheme per tick.
    ///
    /// When the emptied segment is not the only one it is detached and
    /// the previous segment becomes active, so chained erases walk back
    /// through earlier-colored text.
    pub fn erase(&mut self) -> &mut Self {
        self.queue.push(Action::Erase);
        self
    }

    /// Queue discarding every segment except a single empty one.
    pub fn clear(&mut self) -> &mut Self {
        self.queue.push(Action::Clear);
        self
    }

    /// Queue a pure wait of `ms` milliseconds.
    pub fn delay(&mut self, ms: u64) -> &mut Self {
        self.queue.push(Action::Delay(Duration::from_millis(ms)));
        self
    }

    /// Queue a diagnostic line on the animation timeline.
    pub fn debug(&mut self, line: impl Into<String>) -> &mut Self {
        self.queue.push(Action::Debug(line.into()));
        self
    }

    /// Queue setting the typing rate (characters per second).
    pub fn set_typing_rate(&mut self, rate: u32) -> &mut Self {
        self.queue.push(Action::SetTypingRate(rate));
        self
    }

    /// Queue setting the deleting rate (characters per second).
    pub fn set_deleting_rate(&mut self, rate: u32) -> &mut Self {
        self.queue.push(Action::SetDeletingRate(rate));
        self
    }

    /// Queue restoring the construction-time typing rate.
    pub fn reset_typing_rate(&mut self) -> &mut Self {
        self.queue.push(Action::ResetTypingRate);
        self
    }

    /// Queue restoring the construction-time deleting rate.
    pub fn reset_deleting_rate(&mut self) -> &mut Self {
        self.queue.push(Action::ResetDeletingRate);
        self
    }

    /// Queue a rainbow using the default seven-color palette.
    pub fn rainbow(&mut self, message: &str) -> &mut Self {
        self.rainbow_with(message, &Rgb::RAINBOW)
    }

    /// Queue one single-grapheme colored segment per character of
    /// `message`, cycling through `colours` round-robin.
    ///
    /// Every character gets its own segment, so a later erase pops one
    /// segment per character. That is visually correct but costs one
    /// segment object per input character.
    pub fn rainbow_with(&mut self, message: &str, colours: &[Rgb]) -> &mut Self {
        let letters = message.graphemes(true).count();
        self.debug_now(&format!("Creating a rainbow with {letters} letters"));

        if letters == 0 || colours.is_empty() {
            return self;
        }

        let mut i = 0;
        for grapheme in message.graphemes(true) {
            self.colour(colours[i], grapheme);
            i = (i + 1) % colours.len();
        }
        self
    }

    /// Queue the type-pause-erase-pause convenience combination.
    pub fn all_in_one(&mut self, colour: impl Into<Option<Rgb>>, message: &str, ms: u64) -> &mut Self {
        self.colour(colour, message);
        self.delay(ms);
        self.erase();
        self.delay(ms)
    }

    /// Queue a composite action that opens a colored segment and types
    /// `message` three times with fixed pauses, all under a single
    /// queued completion.
    pub fn echo(&mut self, colour: impl Into<Option<Rgb>>, message: impl Into<String>) -> &mut Self {
        self.queue.push(Action::Echo {
            colour: colour.into(),
            message: message.into(),
        });
        self
    }

    // ------------------------------------------------------------------
    // Immediate diagnostics (out of band, not part of the timeline).
    // ------------------------------------------------------------------

    /// Append a diagnostic line right now.
    pub fn debug_now(&mut self, line: &str) {
        self.debug.push_line(line);
    }

    /// Clear the diagnostic pane right now.
    pub fn debug_clear_now(&mut self) {
        self.debug.clear();
    }

    // ------------------------------------------------------------------
    // Runner
    // ------------------------------------------------------------------

    /// Run the queued sequence to completion.
    ///
    /// The snapshot of actions present when the run begins is the loop
    /// unit; actions enqueued afterwards belong to the next run. A call
    /// while a run is already active is a no-op returning the empty
    /// report. With [`LoopMode::Infinite`] this only returns on error.
    ///
    /// # Errors
    ///
    /// Returns an error if the canvas fails to update.
    pub fn start(&mut self) -> io::Result<RunReport> {
        if !self.begin()? {
            return Ok(RunReport::default());
        }
        while self.run_pass()? {}
        self.finish()
    }

    /// Arm the manual start trigger, auto-starting when configured.
    ///
    /// # Errors
    ///
    /// Returns an error if an auto-started run fails.
    pub fn ready(&mut self) -> io::Result<&mut Self> {
        self.armed = true;
        self.debug_now("Start trigger enabled");
        if self.options.auto_start {
            self.start()?;
        }
        Ok(self)
    }

    /// Process trigger events until the channel closes or `Quit`.
    ///
    /// A `Start` begins a run only when the trigger is armed and no run
    /// is active; triggers that arrived while a run was executing are
    /// drained and discarded afterwards, so at most one run is ever
    /// active. Returns the number of completed runs.
    ///
    /// # Errors
    ///
    /// Returns an error if a run fails.
    pub fn serve(&mut self, events: &Receiver<TriggerEvent>) -> io::Result<u64> {
        let mut runs = 0;
        while let Ok(event) = events.recv() {
            match event {
                TriggerEvent::Start => {
                    if !self.armed || self.state == RunState::Running {
                        self.debug_now("Start trigger ignored");
                        continue;
                    }
                    self.start()?;
                    runs += 1;
                    // Discard triggers that piled up during the run.
                    loop {
                        match events.try_recv() {
                            Ok(TriggerEvent::Start) => {}
                            Ok(TriggerEvent::Quit) => return Ok(runs),
                            Err(TryRecvError::Empty | TryRecvError::Disconnected) => break,
                        }
                    }
                }
                TriggerEvent::Quit => break,
            }
        }
        Ok(runs)
    }

    /// Transition Idle → Running: reset live options, snapshot the
    /// queue, restart diagnostics and the blink timer.
    fn begin(&mut self) -> io::Result<bool> {
        if self.state == RunState::Running {
            self.debug_now("start ignored: run already active");
            return Ok(false);
        }

        self.options = self.initial_options;
        self.state = RunState::Running;
        self.num_actions = self.queue.len();
        self.passes_done = 0;
        self.actions_run = 0;

        self.run_list.clear();
        while let Some(action) = self.queue.pop() {
            self.run_list.push(action);
        }

        self.debug.clear();
        self.debug.push_line("Starting...");
        let line = format!(
            "Options: loop: {}, auto_start: {}, typing_rate: {}, deleting_rate: {}",
            self.options.loop_mode,
            self.options.auto_start,
            self.options.typing_rate,
            self.options.deleting_rate
        );
        self.debug.push_line(&line);

        self.cursor_on = true;
        self.canvas.set_cursor_visible(true)?;
        self.next_blink = self.clock.elapsed() + CURSOR_BLINK_PERIOD;

        Ok(true)
    }

    /// Execute one full pass over the action snapshot. Returns whether
    /// another pass is due.
    fn run_pass(&mut self) -> io::Result<bool> {
        self.passes_done += 1;

        // Bound diagnostic growth on long loops: wipe the pane at every
        // other pass boundary.
        if self.passes_done > 1 && self.passes_done % 2 == 1 {
            self.debug.clear();
        }
        let banner = format!(
            "Starting loop: {} of {} with {} actions",
            self.passes_done,
            self.loop_total(),
            self.num_actions
        );
        self.debug.push_line(&banner);

        for i in 0..self.run_list.len() {
            // Swap the action out so the runner can borrow the engine
            // mutably while it executes, then put the same value back.
            let mut action = std::mem::replace(&mut self.run_list[i], Action::Delay(Duration::ZERO));
            self.perform(&mut action)?;
            self.actions_run += 1;
            self.run_list[i] = action;
        }

        Ok(match self.options.loop_mode {
            LoopMode::Off => false,
            LoopMode::Infinite => true,
            LoopMode::Count(n) => self.passes_done < u64::from(n.max(1)),
        })
    }

    /// Transition Running → Idle: cursor forced visible, trigger
    /// re-enabled. When looping, the consumed snapshot is refilled in
    /// place ahead of anything enqueued mid-run; otherwise the run
    /// drained it.
    fn finish(&mut self) -> io::Result<RunReport> {
        if self.options.loop_mode == LoopMode::Off {
            self.run_list.clear();
        } else {
            for action in self.run_list.drain(..).rev() {
                self.queue.push_front(action);
            }
        }

        self.cursor_on = true;
        self.canvas.set_cursor_visible(true)?;
        self.state = RunState::Idle;
        self.debug.push_line("Start trigger enabled");

        Ok(RunReport {
            passes: self.passes_done,
            actions_run: self.actions_run,
        })
    }

    /// Loop total as shown in the pass banner.
    fn loop_total(&self) -> String {
        match self.options.loop_mode {
            LoopMode::Off | LoopMode::Count(0) => "1".to_owned(),
            LoopMode::Infinite => "∞".to_owned(),
            LoopMode::Count(n) => n.to_string(),
        }
    }

    /// Perform one action to completion.
    fn perform(&mut self, action: &mut Action) -> io::Result<()> {
        match action {
            Action::Type(message) => self.do_type(message)?,
            Action::DynamicType(message_fn) => {
                let message = message_fn();
                self.do_type(&message)?;
            }
            Action::Colour(colour) => self.open_segment(*colour)?,
            Action::Erase => self.do_erase()?,
            Action::Clear => self.do_clear()?,
            Action::Delay(duration) => self.wait(*duration)?,
            Action::SetTypingRate(rate) => self.options.typing_rate = *rate,
            Action::SetDeletingRate(rate) => self.options.deleting_rate = *rate,
            Action::ResetTypingRate => self.options.typing_rate = self.initial_options.typing_rate,
            Action::ResetDeletingRate => {
                self.options.deleting_rate = self.initial_options.deleting_rate;
            }
            Action::Debug(line) => self.debug.push_line(line),
            Action::Echo { colour, message } => {
                self.open_segment(*colour)?;
                for i in 0..ECHO_REPEATS {
                    if i > 0 {
                        self.wait(ECHO_PAUSE)?;
                    }
                    self.do_type(message.as_str())?;
                }
            }
        }
        Ok(())
    }

    /// The active segment (the list is never empty).
    fn active(&self) -> io::Result<Segment> {
        self.segments
            .last()
            .copied()
            .ok_or_else(|| io::Error::new(io::ErrorKind::Other, "no active segment"))
    }

    /// Open a new segment at the end of visual order; it becomes active.
    fn open_segment(&mut self, colour: Option<Rgb>) -> io::Result<()> {
        let node = self.canvas.create_segment(colour)?;
        self.segments.push(Segment { node, len: 0 });
        Ok(())
    }

    /// Reveal `message` one grapheme per tick at the current typing
    /// rate. Empty input completes immediately with no tick.
    fn do_type(&mut self, message: &str) -> io::Result<()> {
        for grapheme in message.graphemes(true) {
            // Rate re-read before every tick: queued rate changes apply
            // from the next character.
            let interval = rate_to_interval(self.options.typing_rate);
            self.wait(interval)?;

            let active = self.active()?;
            self.canvas.push_grapheme(active.node, grapheme)?;
            if let Some(segment) = self.segments.last_mut() {
                segment.len += 1;
            }
        }
        Ok(())
    }

    /// Remove the active segment's text one grapheme per tick at the
    /// current deleting rate, then detach the segment unless it is the
    /// only one.
    fn do_erase(&mut self) -> io::Result<()> {
        let count = self.active()?.len;
        for _ in 0..count {
            let interval = rate_to_interval(self.options.deleting_rate);
            self.wait(interval)?;

            let active = self.active()?;
            self.canvas.pop_grapheme(active.node)?;
            if let Some(segment) = self.segments.last_mut() {
                segment.len -= 1;
            }
        }

        // Detaching makes the previous segment active, so chained
        // erases continue into prior-colored text.
        if self.segments.len() > 1 {
            if let Some(segment) = self.segments.pop() {
                self.canvas.remove_segment(segment.node)?;
            }
        }
        Ok(())
    }

    /// Keep exactly one empty segment; the cursor node stays put.
    fn do_clear(&mut self) -> io::Result<()> {
        for segment in self.segments.split_off(1) {
            self.canvas.remove_segment(segment.node)?;
        }
        let first = self.active()?;
        self.canvas.clear_text(first.node)?;
        if let Some(segment) = self.segments.last_mut() {
            segment.len = 0;
        }
        Ok(())
    }

    /// Timed wait, cooperating with the cursor blink: sleeps are
    /// chunked at blink boundaries so the cursor keeps toggling every
    /// 500 ms while an action is in flight.
    fn wait(&mut self, duration: Duration) -> io::Result<()> {
        if duration.is_zero() {
            return Ok(());
        }
        let deadline = self.clock.elapsed() + duration;

        while self.next_blink <= deadline {
            let now = self.clock.elapsed();
            if self.next_blink > now {
                self.clock.sleep(self.next_blink - now);
            }
            self.cursor_on = !self.cursor_on;
            self.canvas.set_cursor_visible(self.cursor_on)?;
            self.next_blink += CURSOR_BLINK_PERIOD;
        }

        let now = self.clock.elapsed();
        if deadline > now {
            self.clock.sleep(deadline - now);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::MemoryCanvas;
    use crate::clock::VirtualClock;
    use crate::diag::MemorySink;
    use crossbeam_channel::bounded;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    type Sink = Rc<RefCell<MemorySink>>;

    fn harness(options: Options) -> (Typewriter<MemoryCanvas>, VirtualClock, Sink) {
        let clock = VirtualClock::new();
        let sink: Sink = Rc::new(RefCell::new(MemorySink::new()));
        let mut tw =
            Typewriter::with_clock(MemoryCanvas::new(), options, Box::new(clock.clone())).unwrap();
        tw.set_debug_sink(Box::new(sink.clone()));
        (tw, clock, sink)
    }

    fn ms(values: &[u64]) -> Vec<Duration> {
        values.iter().copied().map(Duration::from_millis).collect()
    }

    #[test]
    fn test_default_options() {
        let options = Options::default();
        assert_eq!(options.loop_mode, LoopMode::Off);
        assert!(!options.auto_start);
        assert_eq!(options.typing_rate, 20);
        assert_eq!(options.deleting_rate, 5);
    }

    #[test]
    fn test_type_ticks_at_rate_in_order() {
        let (mut tw, clock, _) = harness(Options::default());
        tw.type_text("abc", 0);

        let report = tw.start().unwrap();

        // rate 20 -> floor(1000/20) = 50ms per grapheme, three ticks
        assert_eq!(clock.sleeps(), ms(&[50, 50, 50]));
        assert_eq!(tw.canvas().text(), "abc");
        // Type plus its implicit zero delay
        assert_eq!(report, RunReport { passes: 1, actions_run: 2 });
        assert_eq!(tw.state(), RunState::Idle);
        assert_eq!(tw.queue_len(), 0);
    }

    #[test]
    fn test_empty_type_completes_without_ticks() {
        let (mut tw, clock, _) = harness(Options::default());
        tw.type_text("", 0);

        tw.start().unwrap();

        assert_eq!(clock.sleep_count(), 0);
        assert_eq!(tw.canvas().text(), "");
    }

    #[test]
    fn test_zero_delay_is_noop_wait() {
        let (mut tw, clock, _) = harness(Options::default());
        tw.delay(0).delay(0);

        let report = tw.start().unwrap();

        assert_eq!(clock.sleep_count(), 0);
        assert_eq!(report.actions_run, 2);
    }

    #[test]
    fn test_erase_ticks_and_leaves_sole_segment_empty() {
        let options = Options {
            typing_rate: 100,
            deleting_rate: 10,
            ..Options::default()
        };
        let (mut tw, clock, _) = harness(options);
        tw.type_text("xyz", 0).erase();

        tw.start().unwrap();

        // 10ms typing ticks, then 100ms deleting ticks
        assert_eq!(clock.sleeps(), ms(&[10, 10, 10, 100, 100, 100]));
        assert_eq!(tw.canvas().text(), "");
        assert_eq!(tw.canvas().segment_count(), 1);
    }

    #[test]
    fn test_erase_detaches_segment_and_previous_becomes_active() {
        let (mut tw, _, _) = harness(Options::default());
        tw.type_text("ab", 0)
            .colour(Rgb::RED, "cd")
            .erase()
            .type_text("!", 0);

        tw.start().unwrap();

        // The red segment was erased and detached; "!" landed in the
        // original uncolored segment.
        assert_eq!(tw.canvas().segment_count(), 1);
        assert_eq!(tw.canvas().segment_text(0), Some("ab!"));
        assert_eq!(tw.canvas().segment_color(0), Some(None));
    }

    #[test]
    fn test_erase_empty_colored_segment_detaches_immediately() {
        let (mut tw, clock, _) = harness(Options::default());
        tw.colour(Rgb::BLUE, "").erase();

        tw.start().unwrap();

        assert_eq!(clock.sleep_count(), 0);
        assert_eq!(tw.canvas().segment_count(), 1);
    }

    #[test]
    fn test_clear_leaves_single_empty_segment_and_cursor() {
        let (mut tw, _, _) = harness(Options::default());
        tw.rainbow_with("abc", &[Rgb::RED, Rgb::BLUE]).clear();

        tw.start().unwrap();

        assert_eq!(tw.canvas().segment_count(), 1);
        assert_eq!(tw.canvas().text(), "");
        assert!(tw.canvas().cursor_visible());
    }

    #[test]
    fn test_rainbow_cycles_colors_one_segment_per_grapheme() {
        let (mut tw, _, sink) = harness(Options::default());
        tw.rainbow_with("ab", &[Rgb::RED, Rgb::BLUE]);

        assert!(sink
            .borrow()
            .lines()
            .contains(&"Creating a rainbow with 2 letters".to_owned()));

        tw.start().unwrap();

        // Initial segment plus one per character
        assert_eq!(tw.canvas().segment_count(), 3);
        assert_eq!(tw.canvas().segment_color(1), Some(Some(Rgb::RED)));
        assert_eq!(tw.canvas().segment_text(1), Some("a"));
        assert_eq!(tw.canvas().segment_color(2), Some(Some(Rgb::BLUE)));
        assert_eq!(tw.canvas().segment_text(2), Some("b"));
    }

    #[test]
    fn test_rainbow_empty_message_queues_nothing() {
        let (mut tw, _, _) = harness(Options::default());
        tw.rainbow_with("", &[Rgb::RED]);
        assert_eq!(tw.queue_len(), 0);

        tw.rainbow_with("ab", &[]);
        assert_eq!(tw.queue_len(), 0);
    }

    #[test]
    fn test_loop_count_runs_exactly_n_passes() {
        let options = Options {
            loop_mode: LoopMode::Count(3),
            ..Options::default()
        };
        let (mut tw, _, sink) = harness(options);
        tw.type_text("a", 0);

        let report = tw.start().unwrap();

        assert_eq!(report.passes, 3);
        assert_eq!(report.actions_run, 6);
        assert_eq!(tw.canvas().text(), "aaa");
        // Looping refills the queue in place
        assert_eq!(tw.queue_len(), 2);
        assert_eq!(tw.state(), RunState::Idle);
        assert!(sink
            .borrow()
            .lines()
            .contains(&"Starting loop: 3 of 3 with 2 actions".to_owned()));
    }

    #[test]
    fn test_loop_count_zero_degrades_to_single_pass() {
        let options = Options {
            loop_mode: LoopMode::Count(0),
            ..Options::default()
        };
        let (mut tw, _, sink) = harness(options);
        tw.type_text("a", 0);

        let report = tw.start().unwrap();

        assert_eq!(report.passes, 1);
        assert!(sink
            .borrow()
            .lines()
            .contains(&"Starting loop: 1 of 1 with 2 actions".to_owned()));
    }

    #[test]
    fn test_banner_without_looping() {
        let (mut tw, _, sink) = harness(Options::default());
        tw.delay(0);

        tw.start().unwrap();

        assert!(sink
            .borrow()
            .lines()
            .contains(&"Starting loop: 1 of 1 with 1 actions".to_owned()));
    }

    #[test]
    fn test_dynamic_type_recomputed_each_pass() {
        let options = Options {
            loop_mode: LoopMode::Count(2),
            typing_rate: 100,
            ..Options::default()
        };
        let (mut tw, _, _) = harness(options);

        let counter = Rc::new(Cell::new(0u32));
        let handle = counter.clone();
        tw.dynamic_type(
            move || {
                handle.set(handle.get() + 1);
                handle.get().to_string()
            },
            0,
        );

        tw.start().unwrap();

        assert_eq!(counter.get(), 2);
        assert_eq!(tw.canvas().text(), "12");
    }

    #[test]
    fn test_infinite_loop_still_running_after_finite_passes() {
        let options = Options {
            loop_mode: LoopMode::Infinite,
            ..Options::default()
        };
        let (mut tw, _, _) = harness(options);
        tw.type_text("x", 0);

        assert!(tw.begin().unwrap());
        for _ in 0..5 {
            assert!(tw.run_pass().unwrap());
        }
        assert_eq!(tw.state(), RunState::Running);

        let report = tw.finish().unwrap();
        assert_eq!(report.passes, 5);
        assert_eq!(tw.state(), RunState::Idle);
        // Looping refilled the snapshot in place
        assert_eq!(tw.queue_len(), 2);
    }

    #[test]
    fn test_start_while_running_is_noop() {
        let (mut tw, _, _) = harness(Options::default());
        tw.type_text("x", 0);

        assert!(tw.begin().unwrap());
        let report = tw.start().unwrap();
        assert_eq!(report, RunReport::default());
        assert_eq!(tw.state(), RunState::Running);

        tw.finish().unwrap();
    }

    #[test]
    fn test_serve_second_trigger_during_run_has_no_effect() {
        let (mut tw, _, _) = harness(Options::default());
        tw.type_text("hi", 0);
        tw.ready().unwrap();

        let (tx, rx) = bounded(8);
        tx.send(TriggerEvent::Start).unwrap();
        tx.send(TriggerEvent::Start).unwrap();
        tx.send(TriggerEvent::Start).unwrap();
        drop(tx);

        let runs = tw.serve(&rx).unwrap();

        assert_eq!(runs, 1);
        assert_eq!(tw.canvas().text(), "hi");
    }

    #[test]
    fn test_serve_unarmed_ignores_start() {
        let (mut tw, _, _) = harness(Options::default());
        tw.type_text("hi", 0);

        let (tx, rx) = bounded(8);
        tx.send(TriggerEvent::Start).unwrap();
        tx.send(TriggerEvent::Quit).unwrap();

        let runs = tw.serve(&rx).unwrap();

        assert_eq!(runs, 0);
        assert_eq!(tw.canvas().text(), "");
        assert_eq!(tw.queue_len(), 2);
    }

    #[test]
    fn test_ready_auto_start_runs_immediately() {
        let options = Options {
            auto_start: true,
            ..Options::default()
        };
        let (mut tw, _, _) = harness(options);
        tw.type_text("go", 0);

        tw.ready().unwrap();

        assert_eq!(tw.canvas().text(), "go");
        assert_eq!(tw.state(), RunState::Idle);
    }

    #[test]
    fn test_rate_setters_apply_from_next_tick_and_reset_restores() {
        let (mut tw, clock, _) = harness(Options::default());
        tw.type_text("a", 0)
            .set_typing_rate(10)
            .type_text("b", 0)
            .reset_typing_rate()
            .type_text("c", 0);

        tw.start().unwrap();

        // 50ms at the default rate, 100ms after the setter, back to 50ms
        assert_eq!(clock.sleeps(), ms(&[50, 100, 50]));
    }

    #[test]
    fn test_start_resets_live_options_from_initial() {
        let (mut tw, _, _) = harness(Options::default());
        tw.set_typing_rate(10);

        tw.start().unwrap();
        assert_eq!(tw.options().typing_rate, 10);

        // Second run (queue drained) resets the live snapshot
        tw.start().unwrap();
        assert_eq!(tw.options().typing_rate, 20);
    }

    #[test]
    fn test_cursor_blinks_during_delay_and_ends_visible() {
        let (mut tw, clock, _) = harness(Options::default());
        tw.delay(1600);

        tw.start().unwrap();

        // Blink boundaries at 500/1000/1500ms chunk the wait
        assert_eq!(clock.sleeps(), ms(&[500, 500, 500, 100]));
        // ctor, run start, three toggles, forced visible at finish
        assert_eq!(
            tw.canvas().cursor_log(),
            &[true, true, false, true, false, true]
        );
        assert!(tw.canvas().cursor_visible());
    }

    #[test]
    fn test_all_in_one_queue_composition() {
        let (mut tw, _, _) = harness(Options::default());
        tw.all_in_one(Rgb::ORANGE, "hey", 500);

        // colour + type + implicit delay, then delay + erase + delay
        assert_eq!(tw.queue_len(), 6);
    }

    #[test]
    fn test_echo_types_message_three_times() {
        let options = Options {
            typing_rate: 100,
            ..Options::default()
        };
        let (mut tw, _, _) = harness(options);
        tw.echo(Rgb::ORANGE_RED, "ab");

        let report = tw.start().unwrap();

        assert_eq!(report.actions_run, 1);
        assert_eq!(tw.canvas().text(), "ababab");
        assert_eq!(tw.canvas().segment_count(), 2);
        assert_eq!(tw.canvas().segment_color(1), Some(Some(Rgb::ORANGE_RED)));
    }

    #[test]
    fn test_queued_debug_line_lands_on_timeline() {
        let (mut tw, _, sink) = harness(Options::default());
        tw.debug("checkpoint");

        tw.start().unwrap();

        assert!(sink.borrow().lines().contains(&"checkpoint".to_owned()));
    }

    #[test]
    fn test_actions_queued_after_start_snapshot_excluded() {
        let options = Options {
            loop_mode: LoopMode::Count(2),
            ..Options::default()
        };
        let (mut tw, _, _) = harness(options);
        tw.type_text("a", 0);

        assert!(tw.begin().unwrap());
        // Arrives after the snapshot was taken
        tw.type_text("z", 0);
        while tw.run_pass().unwrap() {}
        tw.finish().unwrap();

        assert_eq!(tw.canvas().text(), "aa");
        // Refilled snapshot sits ahead of the late arrival
        assert_eq!(tw.queue_len(), 4);
    }
}
