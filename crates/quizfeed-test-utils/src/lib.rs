// SPDX-FileCopyrightText: 2026 Quizfeed Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for quizfeed integration tests.
//!
//! Provides mock adapters for fast, deterministic, CI-runnable tests without
//! external services.
//!
//! # Components
//!
//! - [`MockGenerator`] - Generation collaborator with a scripted outcome queue
//! - [`MockImageProvider`] - Image collaborator with a scripted outcome queue
//! - [`MemoryStore`] - In-memory content store with injectable write failure

pub mod memory_store;
pub mod mock_generator;
pub mod mock_image;

pub use memory_store::MemoryStore;
pub use mock_generator::MockGenerator;
pub use mock_image::MockImageProvider;

use quizfeed_core::{ContentItem, FeedError, LifecycleStatus};

/// A valid active item with deterministic fields.
pub fn sample_item(id: &str, category: &str, created_at: i64) -> ContentItem {
    ContentItem {
        id: id.to_string(),
        prompt: format!("Riddle {id}?"),
        hook: Some("Can you solve it?".to_string()),
        explanation: "Think laterally.".to_string(),
        solution: "A shadow".to_string(),
        category: category.to_string(),
        style_hint: "Minimalist Slate".to_string(),
        generated_image: None,
        created_at,
        lifecycle_status: LifecycleStatus::Active,
    }
}

/// A rate-limit failure as the HTTP adapter reports it.
pub fn rate_limited() -> FeedError {
    FeedError::TransientRemote {
        status: 429,
        message: "Resource exhausted".to_string(),
    }
}
