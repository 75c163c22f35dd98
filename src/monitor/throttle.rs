//! Escalating-interval throttle for progress lines.
//!
//! Polls happen every few seconds; printing on each one would flood the
//! terminal on long builds. The minimum gap between prints grows with the
//! age of the session.

use std::time::{Duration, Instant};

/// Minimum gap between progress prints for a session that has been running
/// for `elapsed`.
pub fn print_interval(elapsed: Duration) -> Duration {
    const MINUTE: u64 = 60;
    let secs = match elapsed {
        e if e > Duration::from_secs(25 * MINUTE) => 3 * MINUTE,
        e if e > Duration::from_secs(8 * MINUTE) => 2 * MINUTE,
        e if e > Duration::from_secs(5 * MINUTE) => 30,
        e if e > Duration::from_secs(3 * MINUTE) => 20,
        e if e > Duration::from_secs(MINUTE) => 15,
        _ => 10,
    };
    Duration::from_secs(secs)
}

/// Whether a progress line is due at `now`.
///
/// The interval is picked from `elapsed` (session age), not from the gap
/// since the last print. Nothing printed yet means a print is due.
pub fn should_print(last_printed: Option<Instant>, elapsed: Duration, now: Instant) -> bool {
    match last_printed {
        None => true,
        Some(at) => at + print_interval(elapsed) < now,
    }
}

/// Per-session throttle state.
#[derive(Debug, Clone)]
pub struct ProgressThrottle {
    started: Instant,
    last_printed: Option<Instant>,
}

impl ProgressThrottle {
    pub fn new(started: Instant) -> Self {
        Self {
            started,
            last_printed: None,
        }
    }

    /// Session age at `now`, rounded to whole seconds.
    pub fn elapsed(&self, now: Instant) -> Duration {
        crate::duration::round(
            now.saturating_duration_since(self.started),
            Duration::from_secs(1),
        )
    }

    pub fn is_due(&self, now: Instant) -> bool {
        should_print(self.last_printed, self.elapsed(now), now)
    }

    /// Record a print at `now`. The recorded time never moves backwards.
    pub fn mark_printed(&mut self, now: Instant) {
        self.last_printed = Some(match self.last_printed {
            Some(prev) if prev > now => prev,
            _ => now,
        });
    }
}
