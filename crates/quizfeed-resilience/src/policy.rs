// SPDX-FileCopyrightText: 2026 Quizfeed Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Backoff math for the retry layer.

use std::time::Duration;

use rand::Rng;

/// Bounded exponential backoff with uniform jitter.
///
/// The delay before retry `i` (0-based) is `base_delay * 2^i`, capped at
/// `max_delay`, plus a uniform jitter in `[0, max_jitter]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first. Zero behaves like one.
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub max_jitter: Duration,
    /// Cap applied to the exponential part before jitter.
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(2000),
            max_jitter: Duration::from_millis(1000),
            max_delay: Duration::from_secs(30),
        }
    }
}

impl RetryPolicy {
    /// Builds a policy from millisecond settings (the config file's units).
    pub fn from_millis(max_attempts: u32, base_ms: u64, jitter_ms: u64, max_ms: u64) -> Self {
        Self {
            max_attempts,
            base_delay: Duration::from_millis(base_ms),
            max_jitter: Duration::from_millis(jitter_ms),
            max_delay: Duration::from_millis(max_ms),
        }
    }

    /// A policy with no waiting, for tests and offline tooling.
    pub fn immediate(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            base_delay: Duration::ZERO,
            max_jitter: Duration::ZERO,
            max_delay: Duration::ZERO,
        }
    }

    pub(crate) fn attempts(&self) -> u32 {
        self.max_attempts.max(1)
    }

    /// Deterministic part of the delay before retry `retry`.
    pub fn backoff(&self, retry: u32) -> Duration {
        let factor = 1u32.checked_shl(retry).unwrap_or(u32::MAX);
        self.base_delay
            .checked_mul(factor)
            .unwrap_or(Duration::MAX)
            .min(self.max_delay)
    }

    /// Full delay before retry `retry`, jitter included.
    pub fn delay_for(&self, retry: u32) -> Duration {
        let jitter_ms = u64::try_from(self.max_jitter.as_millis()).unwrap_or(u64::MAX);
        let jitter = if jitter_ms == 0 {
            0
        } else {
            rand::thread_rng().gen_range(0..=jitter_ms)
        };
        self.backoff(retry)
            .saturating_add(Duration::from_millis(jitter))
    }
}
