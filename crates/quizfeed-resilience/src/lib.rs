// SPDX-FileCopyrightText: 2026 Quizfeed Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Resilience primitives for quizfeed remote calls.
//!
//! [`RetryableInvoker`] wraps any single async call, retries transient
//! failures with jittered exponential backoff, and hands terminal failures
//! back unchanged. Classification is pluggable; [`feed_invoker`] wires it to
//! [`FeedError`].

pub mod invoker;
pub mod policy;

pub use invoker::{Classifier, ErrorClass, InvokeError, RetryableInvoker};
pub use policy::RetryPolicy;

use quizfeed_core::FeedError;

/// Invoker specialized for collaborator calls that fail with [`FeedError`].
pub type FeedInvoker = RetryableInvoker<fn(&FeedError) -> ErrorClass>;

/// Only [`FeedError::TransientRemote`] is worth retrying.
///
/// Malformed payloads, auth failures, safety rejections and storage errors
/// all propagate on the first occurrence.
pub fn classify_feed_error(err: &FeedError) -> ErrorClass {
    if err.is_transient() {
        ErrorClass::Transient
    } else {
        ErrorClass::Terminal
    }
}

/// Builds a [`FeedInvoker`] for the given policy.
pub fn feed_invoker(policy: RetryPolicy) -> FeedInvoker {
    RetryableInvoker::new(policy, classify_feed_error as fn(&FeedError) -> ErrorClass)
}

impl From<InvokeError<FeedError>> for FeedError {
    fn from(err: InvokeError<FeedError>) -> Self {
        match err {
            InvokeError::Terminal(err) => err,
            InvokeError::Exhausted { attempts, last } => FeedError::RemoteExhausted {
                attempts,
                last: Box::new(last),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn rate_limited() -> FeedError {
        FeedError::TransientRemote {
            status: 429,
            message: "quota".into(),
        }
    }

    #[test]
    fn classifies_only_transient_remote_as_transient() {
        assert_eq!(classify_feed_error(&rate_limited()), ErrorClass::Transient);
        assert_eq!(
            classify_feed_error(&FeedError::MalformedResponse("x".into())),
            ErrorClass::Terminal
        );
        assert_eq!(
            classify_feed_error(&FeedError::TerminalRemote {
                status: Some(403),
                message: "denied".into(),
                source: None,
            }),
            ErrorClass::Terminal
        );
        assert_eq!(
            classify_feed_error(&FeedError::NoImageProduced("none".into())),
            ErrorClass::Terminal
        );
    }

    #[tokio::test(start_paused = true)]
    async fn exhausted_rate_limit_surfaces_as_remote_exhausted() {
        let calls = AtomicU32::new(0);
        let result: Result<(), FeedError> = feed_invoker(RetryPolicy::default())
            .invoke(|| {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err(rate_limited()) }
            })
            .await
            .map_err(FeedError::from);

        let err = result.unwrap_err();
        assert!(err.is_rate_limited(), "got: {err}");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn malformed_response_is_not_retried() {
        let calls = AtomicU32::new(0);
        let result: Result<(), FeedError> = feed_invoker(RetryPolicy::default())
            .invoke(|| {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err(FeedError::MalformedResponse("no json".into())) }
            })
            .await
            .map_err(FeedError::from);

        assert!(matches!(result, Err(FeedError::MalformedResponse(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
