//! Caller-owned vote countdown.
//!
//! The engine never looks at the clock. A UI that wants a timed vote keeps a
//! [`VoteCountdown`], polls it, and calls `Engine::end_vote` with
//! `VoteEnd::TimerExpired` when [`VoteCountdown::poll`] reports expiry.

use std::time::{Duration, Instant};

use crate::config::RulesConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoteCountdown {
    duration: Duration,
    min: Duration,
    ends_at: Option<Instant>,
}

impl VoteCountdown {
    /// Creates a stopped countdown. `secs` is raised to `min_secs` if shorter.
    pub fn new(secs: u64, min_secs: u64) -> Self {
        VoteCountdown {
            duration: Duration::from_secs(secs.max(min_secs)),
            min: Duration::from_secs(min_secs),
            ends_at: None,
        }
    }

    pub fn from_config(config: &RulesConfig) -> Self {
        VoteCountdown::new(config.vote_duration_secs, config.min_vote_secs)
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Changes the length used by the next `start`.
    pub fn set_duration_secs(&mut self, secs: u64) {
        self.duration = Duration::from_secs(secs).max(self.min);
    }

    /// (Re)starts the countdown from `now`.
    pub fn start(&mut self, now: Instant) {
        self.ends_at = Some(now + self.duration);
    }

    pub fn cancel(&mut self) {
        self.ends_at = None;
    }

    pub fn is_running(&self) -> bool {
        self.ends_at.is_some()
    }

    /// Whole seconds left, rounded up. Zero when stopped or expired.
    pub fn remaining_secs(&self, now: Instant) -> u64 {
        let Some(ends_at) = self.ends_at else {
            return 0;
        };
        let left = ends_at.saturating_duration_since(now);
        let secs = left.as_secs();
        if left.subsec_nanos() > 0 {
            secs + 1
        } else {
            secs
        }
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        self.is_running() && self.remaining_secs(now) == 0
    }

    /// Stops the countdown and returns true the first time it is seen expired.
    pub fn poll(&mut self, now: Instant) -> bool {
        if self.is_expired(now) {
            self.cancel();
            return true;
        }
        false
    }
}

/// Formats seconds as `MM:SS`.
pub fn format_mm_ss(secs: u64) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}
