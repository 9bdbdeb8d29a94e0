// SPDX-FileCopyrightText: 2026 Quizfeed Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for quizfeed.
//!
//! Provides the content item model, the error taxonomy shared by every
//! layer, the adapter traits implemented by the collaborators and the local
//! store, and the backup envelope codec.

pub mod error;
pub mod snapshot;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::FeedError;
pub use types::{
    AdapterType, ContentItem, GenerationRequest, HealthStatus, ImageRequest, LifecycleStatus,
    ResponseShape, KNOWN_CATEGORIES,
};

pub use traits::{ContentStore, GenerationProvider, ImageProvider, PluginAdapter};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn feed_error_status_reaches_through_exhaustion() {
        let err = FeedError::RemoteExhausted {
            attempts: 3,
            last: Box::new(FeedError::TransientRemote {
                status: 429,
                message: "slow down".into(),
            }),
        };
        assert_eq!(err.status(), Some(429));
        assert!(err.is_rate_limited());
        assert!(err.to_string().contains("after 3 attempts"));
    }

    #[test]
    fn server_fault_exhaustion_is_not_rate_limited() {
        let err = FeedError::RemoteExhausted {
            attempts: 3,
            last: Box::new(FeedError::TransientRemote {
                status: 503,
                message: "overloaded".into(),
            }),
        };
        assert!(!err.is_rate_limited());
    }

    #[test]
    fn only_transient_remote_is_transient() {
        let transient = FeedError::TransientRemote {
            status: 500,
            message: "boom".into(),
        };
        let terminal = FeedError::TerminalRemote {
            status: Some(400),
            message: "bad".into(),
            source: None,
        };
        assert!(transient.is_transient());
        assert!(!terminal.is_transient());
        assert!(!FeedError::MalformedResponse("x".into()).is_transient());
    }

    #[test]
    fn unpersisted_reports_item_count() {
        let err = FeedError::Unpersisted {
            items: vec![],
            source: Box::new(FeedError::storage(std::io::Error::other("disk full"))),
        };
        let msg = err.to_string();
        assert!(msg.contains("0 item(s)"), "got: {msg}");
        assert!(msg.contains("disk full"), "got: {msg}");
    }

    #[test]
    fn all_traits_are_exported() {
        fn _assert_plugin_adapter<T: PluginAdapter>() {}
        fn _assert_generation_provider<T: GenerationProvider>() {}
        fn _assert_image_provider<T: ImageProvider>() {}
        fn _assert_content_store<T: ContentStore>() {}
    }
}
