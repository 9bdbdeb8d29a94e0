// SPDX-FileCopyrightText: 2026 Quizfeed Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Higher-order retry wrapper around a single remote call.
//!
//! [`RetryableInvoker`] knows nothing about HTTP or any client type: it asks
//! its [`Classifier`] whether a failure is worth another attempt, and asks
//! its [`RetryPolicy`] how long to wait.

use std::fmt;
use std::future::Future;

use tracing::{debug, warn};

use crate::policy::RetryPolicy;

/// Retry verdict for one failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Likely to succeed after a delay (rate limit, server fault).
    Transient,
    /// Retrying will not help; propagate immediately.
    Terminal,
}

/// Decides whether an error is transient.
pub trait Classifier<E>: Send + Sync {
    fn classify(&self, err: &E) -> ErrorClass;
}

impl<E, F> Classifier<E> for F
where
    F: Fn(&E) -> ErrorClass + Send + Sync,
{
    fn classify(&self, err: &E) -> ErrorClass {
        self(err)
    }
}

/// Why [`RetryableInvoker::invoke`] gave up.
#[derive(Debug)]
pub enum InvokeError<E> {
    /// The operation failed with a terminal error, returned unchanged.
    Terminal(E),
    /// Every attempt failed transiently; `last` is the final failure.
    Exhausted { attempts: u32, last: E },
}

impl<E> InvokeError<E> {
    /// Returns the underlying error, dropping the exhaustion tag.
    pub fn into_inner(self) -> E {
        match self {
            InvokeError::Terminal(err) => err,
            InvokeError::Exhausted { last, .. } => last,
        }
    }

    pub fn is_exhausted(&self) -> bool {
        matches!(self, InvokeError::Exhausted { .. })
    }
}

impl<E: fmt::Display> fmt::Display for InvokeError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvokeError::Terminal(err) => write!(f, "{err}"),
            InvokeError::Exhausted { attempts, last } => {
                write!(f, "gave up after {attempts} attempts: {last}")
            }
        }
    }
}

impl<E> std::error::Error for InvokeError<E>
where
    E: std::error::Error + 'static,
{
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            InvokeError::Terminal(err) => Some(err),
            InvokeError::Exhausted { last, .. } => Some(last),
        }
    }
}

/// Runs an operation, retrying transient failures with backoff.
#[derive(Debug, Clone)]
pub struct RetryableInvoker<C> {
    policy: RetryPolicy,
    classifier: C,
}

impl<C> RetryableInvoker<C> {
    pub fn new(policy: RetryPolicy, classifier: C) -> Self {
        Self { policy, classifier }
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Executes `operation` until it succeeds, fails terminally, or runs out
    /// of attempts.
    ///
    /// The success path adds no delay. Backoff waits are `tokio::time::sleep`,
    /// so other tasks keep running while a retry is pending.
    pub async fn invoke<T, E, F, Fut>(&self, mut operation: F) -> Result<T, InvokeError<E>>
    where
        C: Classifier<E>,
        E: fmt::Display,
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let max_attempts = self.policy.attempts();
        let mut attempt = 0;

        loop {
            attempt += 1;
            let err = match operation().await {
                Ok(value) => {
                    if attempt > 1 {
                        debug!(attempt, "remote call succeeded after retry");
                    }
                    return Ok(value);
                }
                Err(err) => err,
            };

            if self.classifier.classify(&err) == ErrorClass::Terminal {
                debug!(attempt, error = %err, "terminal failure, not retrying");
                return Err(InvokeError::Terminal(err));
            }

            if attempt >= max_attempts {
                warn!(attempts = attempt, error = %err, "transient failures exhausted retries");
                return Err(InvokeError::Exhausted {
                    attempts: attempt,
                    last: err,
                });
            }

            let delay = self.policy.delay_for(attempt - 1);
            warn!(
                attempt,
                max_attempts,
                delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                error = %err,
                "transient failure, backing off"
            );
            drop(err);
            tokio::time::sleep(delay).await;
        }
    }
}
