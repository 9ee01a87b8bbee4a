/// One-shot tick timer that is re-armed after every tick.
///
/// The tick interval is part of the game state and shrinks as the snake
/// grows, so the loop never runs a fixed-period timer. Instead:
///
///   1. `fire(now)` reports a due deadline and disarms the timer
///   2. the engine steps the world
///   3. the loop calls `arm(now, world.interval_ms)` with the new interval
///
/// Pause = `disarm()`. Resume = `arm()` with the last known interval.

use std::time::{Duration, Instant};

#[derive(Clone, Debug, Default)]
pub struct TickTimer {
    deadline: Option<Instant>,
}

impl TickTimer {
    pub fn new() -> Self {
        TickTimer { deadline: None }
    }

    /// Schedule the next tick `interval_ms` after `now`, replacing any
    /// earlier deadline.
    pub fn arm(&mut self, now: Instant, interval_ms: u64) {
        self.deadline = Some(now + Duration::from_millis(interval_ms));
    }

    pub fn disarm(&mut self) {
        self.deadline = None;
    }

    /// True once per arming, when `now` has reached the deadline.
    pub fn fire(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(d) if now >= d => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    /// Time left until the deadline, if armed. Lets the loop sleep no
    /// longer than necessary.
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.deadline.map(|d| d.saturating_duration_since(now))
    }
}
