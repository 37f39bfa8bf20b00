//! Input: Dedicated thread turning key presses into trigger events.
//!
//! The terminal analog of a "Start!" button: a small actor polls
//! crossterm events on its own thread and forwards the two events the
//! engine cares about over a bounded channel. The engine's `serve` loop
//! consumes them, so keyboard handling never blocks the animation.

use crossbeam_channel::{bounded, Receiver, Sender};
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Events a host loop reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerEvent {
    /// Request a run (Enter or `s`).
    Start,
    /// Leave the serve loop (`q` or Escape).
    Quit,
}

/// Map a pressed key to a trigger event.
///
/// Unbound keys map to `None` and are ignored.
pub fn map_key(code: KeyCode) -> Option<TriggerEvent> {
    match code {
        KeyCode::Enter | KeyCode::Char('s') => Some(TriggerEvent::Start),
        KeyCode::Esc | KeyCode::Char('q') => Some(TriggerEvent::Quit),
        _ => None,
    }
}

/// Actor that polls terminal key events and emits [`TriggerEvent`]s.
pub struct TriggerActor {
    /// Handle to the input thread.
    handle: Option<JoinHandle<()>>,
    /// Flag to signal shutdown.
    shutdown: Arc<AtomicBool>,
    /// Receiver for trigger events.
    rx: Receiver<TriggerEvent>,
}

impl TriggerActor {
    /// Spawn the input thread.
    ///
    /// `poll_timeout` bounds how long the thread waits for an event
    /// before re-checking the shutdown flag.
    ///
    /// # Panics
    ///
    /// Panics if the OS fails to spawn the thread.
    pub fn spawn(poll_timeout: Duration) -> Self {
        let shutdown = Arc::new(AtomicBool::new(false));
        let shutdown_clone = shutdown.clone();

        let (tx, rx) = bounded(8);

        let handle = thread::Builder::new()
            .name("teletype-input".to_string())
            .spawn(move || {
                Self::run_loop(&tx, &shutdown_clone, poll_timeout);
            })
            .expect("Failed to spawn input thread");

        Self {
            handle: Some(handle),
            shutdown,
            rx,
        }
    }

    /// Get a reference to the trigger receiver.
    pub const fn receiver(&self) -> &Receiver<TriggerEvent> {
        &self.rx
    }

    /// Signal the input thread to shutdown.
    pub fn shutdown(&self) {
        self.shutdown.store(true, Ordering::Relaxed);
    }

    /// Wait for the input thread to finish.
    pub fn join(mut self) {
        self.shutdown();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }

    /// Main polling loop.
    fn run_loop(tx: &Sender<TriggerEvent>, shutdown: &Arc<AtomicBool>, poll_timeout: Duration) {
        loop {
            if shutdown.load(Ordering::Relaxed) {
                let _ = tx.send(TriggerEvent::Quit);
                break;
            }

            match event::poll(poll_timeout) {
                Ok(true) => {
                    if let Ok(Event::Key(key)) = event::read() {
                        if key.kind != KeyEventKind::Press {
                            continue;
                        }
                        if let Some(trigger) = map_key(key.code) {
                            if tx.send(trigger).is_err() {
                                // Receiver dropped, exit
                                break;
                            }
                        }
                    }
                }
                Ok(false) => {
                    // No event, loop around to re-check shutdown
                }
                Err(_) => break,
            }
        }
    }
}

impl Drop for TriggerActor {
    fn drop(&mut self) {
        self.shutdown();
    }
}
