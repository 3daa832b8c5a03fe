use std::time::{Duration, Instant};

/// Minimum-interval gate driven by caller-supplied timestamps
///
/// Nothing sleeps; callers poll with the current time and either proceed or
/// coalesce the request into a later tick.
#[derive(Debug, Clone, Copy)]
pub struct Throttle {
    interval: Duration,
    last: Option<Instant>,
}

impl Throttle {
    /// Create a gate that opens once per `interval`
    pub const fn new(interval: Duration) -> Self {
        Self {
            interval,
            last: None,
        }
    }

    /// Configured interval
    pub const fn interval(&self) -> Duration {
        self.interval
    }

    /// Whether enough time passed since the last accepted event
    pub fn ready(&self, now: Instant) -> bool {
        self.last
            .is_none_or(|last| now.saturating_duration_since(last) >= self.interval)
    }

    /// Record an accepted event
    pub fn mark(&mut self, now: Instant) {
        self.last = Some(now);
    }

    /// Accept and record the event if the gate is open
    pub fn try_acquire(&mut self, now: Instant) -> bool {
        let ready = self.ready(now);
        if ready {
            self.mark(now);
        }
        ready
    }

    /// Forget the last event so the next one passes
    pub fn reset(&mut self) {
        self.last = None;
    }
}
