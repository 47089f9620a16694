//! Process-wide rate limiter.
//!
//! Two fixed windows aligned to wall-clock minutes and hours. A call is
//! admitted only if neither enabled threshold is already reached; admitted
//! calls are counted in both windows. A threshold of 0 disables that check.

use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::{McpError, Result};

#[derive(Debug, Default)]
struct Window {
    /// Window index (epoch seconds / window length)
    index: i64,
    count: u32,
}

impl Window {
    fn roll(&mut self, index: i64) {
        if self.index != index {
            self.index = index;
            self.count = 0;
        }
    }
}

#[derive(Debug, Default)]
struct Counters {
    minute: Window,
    hour: Window,
}

impl Counters {
    fn roll(&mut self, now: DateTime<Utc>) {
        let ts = now.timestamp();
        self.minute.roll(ts.div_euclid(60));
        self.hour.roll(ts.div_euclid(3600));
    }
}

/// Current counter values, as reported by the health snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RateLimitSnapshot {
    /// Configured per-minute threshold (0 = disabled)
    pub per_minute: u32,
    /// Configured per-hour threshold (0 = disabled)
    pub per_hour: u32,
    /// Calls admitted in the current minute
    pub current_minute: u32,
    /// Calls admitted in the current hour
    pub current_hour: u32,
}

/// Shared minute/hour call counter.
#[derive(Debug)]
pub struct RateLimiter {
    per_minute: u32,
    per_hour: u32,
    counters: Mutex<Counters>,
}

impl RateLimiter {
    /// Create a limiter with the given thresholds.
    pub fn new(per_minute: u32, per_hour: u32) -> Self {
        Self {
            per_minute,
            per_hour,
            counters: Mutex::new(Counters::default()),
        }
    }

    /// A limiter that admits everything.
    pub fn unlimited() -> Self {
        Self::new(0, 0)
    }

    /// Admit one call now, or fail with [`McpError::RateLimited`].
    pub fn try_acquire(&self) -> Result<()> {
        self.try_acquire_at(Utc::now())
    }

    /// Admit one call at the given instant.
    pub fn try_acquire_at(&self, now: DateTime<Utc>) -> Result<()> {
        let mut counters = self
            .counters
            .lock()
            .map_err(|_| McpError::Internal("rate limiter lock poisoned".to_string()))?;
        counters.roll(now);

        if self.per_minute > 0 && counters.minute.count >= self.per_minute {
            return Err(McpError::RateLimited(format!(
                "Rate limit exceeded: {} requests per minute",
                self.per_minute
            )));
        }
        if self.per_hour > 0 && counters.hour.count >= self.per_hour {
            return Err(McpError::RateLimited(format!(
                "Rate limit exceeded: {} requests per hour",
                self.per_hour
            )));
        }

        counters.minute.count += 1;
        counters.hour.count += 1;
        Ok(())
    }

    /// Counter values as of now.
    pub fn snapshot(&self) -> RateLimitSnapshot {
        self.snapshot_at(Utc::now())
    }

    /// Counter values as of the given instant.
    pub fn snapshot_at(&self, now: DateTime<Utc>) -> RateLimitSnapshot {
        let (current_minute, current_hour) = match self.counters.lock() {
            Ok(mut counters) => {
                counters.roll(now);
                (counters.minute.count, counters.hour.count)
            }
            Err(_) => (0, 0),
        };
        RateLimitSnapshot {
            per_minute: self.per_minute,
            per_hour: self.per_hour,
            current_minute,
            current_hour,
        }
    }
}
