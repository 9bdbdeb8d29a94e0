// SPDX-FileCopyrightText: 2026 Quizfeed Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Feed logic for quizfeed.
//!
//! - [`ContentFetcher`] obtains and normalizes items through the retrying
//!   invoker.
//! - [`project`] derives the displayed view from the full item set.
//! - [`FeedService`] exposes the UI operations over a fetcher and a store.

pub mod fetcher;
pub mod projector;
pub mod prompts;
pub mod sanitize;
pub mod service;

pub use fetcher::ContentFetcher;
pub use projector::{category_filter, project, ALL_CATEGORIES};
pub use sanitize::sanitize_json;
pub use service::FeedService;
