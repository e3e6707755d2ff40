use std::time::Instant;

use tracing::debug;

use crate::event::{Command, Event, Key};
use crate::session::SessionState;
use crate::snapshot::Snapshot;

/// Source of "now" for the session timer.
pub trait Clock {
    fn now(&self) -> Instant;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Told about the session after every event that was actually applied.
pub trait Observer {
    fn notify(&mut self, state: &SessionState);
}

impl<F: FnMut(&SessionState)> Observer for F {
    fn notify(&mut self, state: &SessionState) {
        self(state)
    }
}

/// Records a snapshot per notification.
#[derive(Clone, Debug, Default)]
pub struct SnapshotLog {
    snapshots: Vec<Snapshot>,
}

impl SnapshotLog {
    pub fn snapshots(&self) -> &[Snapshot] {
        &self.snapshots
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn last(&self) -> Option<&Snapshot> {
        self.snapshots.last()
    }
}

impl Observer for SnapshotLog {
    fn notify(&mut self, state: &SessionState) {
        self.snapshots.push(state.snapshot());
    }
}

/// Owns a session and applies events to it.
///
/// Follow-up events produced by a transition are processed depth first: an
/// event and all of its descendants are applied before its next sibling.
/// Everything happens on the caller's stack, so the session is never seen
/// half-updated.
#[derive(Debug)]
pub struct Dispatcher<O: Observer, C: Clock = SystemClock> {
    state: SessionState,
    observer: O,
    clock: C,
}

impl<O: Observer> Dispatcher<O, SystemClock> {
    pub fn new(state: SessionState, observer: O) -> Self {
        Self::with_clock(state, observer, SystemClock)
    }
}

impl<O: Observer, C: Clock> Dispatcher<O, C> {
    pub fn with_clock(state: SessionState, observer: O, clock: C) -> Self {
        Self {
            state,
            observer,
            clock,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    pub fn observer_mut(&mut self) -> &mut O {
        &mut self.observer
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Give the session up, e.g. when the host shuts down.
    pub fn into_parts(self) -> (SessionState, O) {
        (self.state, self.observer)
    }

    /// Route a raw key by completion state: keystroke while typing, command
    /// once complete. Keys that are not commands are dropped after completion.
    pub fn handle_key(&mut self, key: Key) {
        if !self.state.is_complete() {
            self.dispatch(Event::Keystroke(key));
        } else if let Some(command) = Command::from_key(&key) {
            self.dispatch(Event::Command(command));
        } else {
            debug!(?key, "key ignored on complete session");
        }
    }

    /// Replace the target text, whatever the session is doing.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.dispatch(Event::SetText(text.into()));
    }

    /// Apply `event` and drain every follow-up it produces before returning.
    pub fn dispatch(&mut self, event: Event) {
        let mut pending = vec![event];
        while let Some(event) = pending.pop() {
            let Some(follow_ups) = self.apply(event) else {
                continue;
            };
            self.observer.notify(&self.state);
            // reversed so the first follow-up is popped next
            pending.extend(follow_ups.into_iter().rev());
        }
    }

    /// `None` when the event does not apply in the current completion state.
    fn apply(&mut self, event: Event) -> Option<Vec<Event>> {
        let kind = event.kind();
        let follow_ups = match event {
            Event::Keystroke(key) => {
                if self.state.is_complete() {
                    debug!(kind, "dropped: session complete");
                    return None;
                }
                self.state.apply_keystroke(&key)
            }
            Event::Command(command) => {
                if !self.state.is_complete() {
                    debug!(kind, %command, "dropped: session not complete");
                    return None;
                }
                debug!(%command, "applying command");
                self.state.apply_command(command)
            }
            Event::StartTimer => self.state.apply_start_timer(self.clock.now()),
            Event::End => {
                let follow_ups = self.state.apply_end(self.clock.now());
                if self.state.is_complete() {
                    debug!(
                        accuracy = ?self.state.accuracy(),
                        wpm = ?self.state.wpm(),
                        "session finished"
                    );
                }
                follow_ups
            }
            Event::SetText(text) => {
                debug!(chars = text.chars().count(), "new text");
                self.state.apply_set_text(text)
            }
            Event::Replaced => vec![],
        };
        Some(follow_ups)
    }
}
