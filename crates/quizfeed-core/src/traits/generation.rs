// SPDX-FileCopyrightText: 2026 Quizfeed Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Generation collaborator trait.

use async_trait::async_trait;

use crate::error::FeedError;
use crate::traits::adapter::PluginAdapter;
use crate::types::GenerationRequest;

/// Adapter for the text generation collaborator.
///
/// Returns the collaborator's raw text. Sanitizing and parsing that text is
/// the fetcher's job. Implementations signal rate limiting and server faults
/// with [`FeedError::TransientRemote`] and everything else with
/// [`FeedError::TerminalRemote`]; they never retry on their own.
#[async_trait]
pub trait GenerationProvider: PluginAdapter {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, FeedError>;
}
