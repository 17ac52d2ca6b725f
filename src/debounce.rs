use std::time::{Duration, Instant};

/// A restartable deadline. Every [`Debouncer::schedule`] pushes the deadline
/// out by the full delay; the event fires once the caller polls past it.
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    deadline: Option<Instant>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
        }
    }

    pub fn schedule(&mut self, now: Instant) {
        self.deadline = Some(now + self.delay);
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    /// Time left until the pending event is due, if any.
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.deadline.map(|x| x.saturating_duration_since(now))
    }

    /// Returns true exactly once per scheduled event, at or after its deadline.
    pub fn fire(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(x) if now >= x => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}
