// SPDX-FileCopyrightText: 2026 Quizfeed Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Image collaborator trait.

use async_trait::async_trait;

use crate::error::FeedError;
use crate::traits::adapter::PluginAdapter;
use crate::types::ImageRequest;

/// Adapter for the image generation collaborator.
#[async_trait]
pub trait ImageProvider: PluginAdapter {
    /// Produces a renderable image reference (a `data:` URI or URL).
    ///
    /// Fails with [`FeedError::NoImageProduced`] when the collaborator
    /// answers without an image.
    async fn generate_image(&self, request: &ImageRequest) -> Result<String, FeedError>;
}
