// SPDX-FileCopyrightText: 2026 Quizfeed Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the quizfeed workspace.

use thiserror::Error;

use crate::types::ContentItem;

/// HTTP status the generation collaborator uses to signal rate limiting.
pub const STATUS_RATE_LIMITED: u16 = 429;

/// The primary error type used across all quizfeed adapter traits and core operations.
#[derive(Debug, Error)]
pub enum FeedError {
    /// Configuration errors (invalid TOML, missing API key, bad values).
    #[error("configuration error: {0}")]
    Config(String),

    /// Remote call failed with a rate-limit or server-fault signal.
    ///
    /// Absorbed by the retry layer; callers only see it wrapped in
    /// [`FeedError::RemoteExhausted`].
    #[error("transient remote failure (status {status}): {message}")]
    TransientRemote { status: u16, message: String },

    /// Remote call failed in a way that retrying will not fix (bad request,
    /// auth, safety filter, transport failure).
    #[error("remote call rejected: {message}")]
    TerminalRemote {
        status: Option<u16>,
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Transient failures persisted through every allowed attempt.
    #[error("remote still failing after {attempts} attempts: {last}")]
    RemoteExhausted {
        attempts: u32,
        #[source]
        last: Box<FeedError>,
    },

    /// Collaborator payload could not be sanitized or parsed.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// Image collaborator answered without a usable inline image.
    #[error("no image produced: {0}")]
    NoImageProduced(String),

    /// Persistence layer inaccessible (open, query, or commit failure).
    #[error("storage unavailable: {source}")]
    StorageUnavailable {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Backup blob failed validation; the store was left untouched.
    #[error("invalid backup: {0}")]
    InvalidBackup(String),

    /// A fetch succeeded but persisting its items failed.
    ///
    /// Carries the fetched items so the caller can retry the write instead of
    /// fetching again.
    #[error("fetched {} item(s) but could not store them: {source}", .items.len())]
    Unpersisted {
        items: Vec<ContentItem>,
        source: Box<FeedError>,
    },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl FeedError {
    /// Wraps any storage-layer error.
    pub fn storage<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        FeedError::StorageUnavailable {
            source: Box::new(err),
        }
    }

    /// Returns the HTTP-like status carried by a remote failure, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            FeedError::TransientRemote { status, .. } => Some(*status),
            FeedError::TerminalRemote { status, .. } => *status,
            FeedError::RemoteExhausted { last, .. } => last.status(),
            _ => None,
        }
    }

    /// True when retries were exhausted while the collaborator kept rate limiting.
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, FeedError::RemoteExhausted { .. })
            && self.status() == Some(STATUS_RATE_LIMITED)
    }

    /// True for failures the retry layer may absorb.
    pub fn is_transient(&self) -> bool {
        matches!(self, FeedError::TransientRemote { .. })
    }
}
