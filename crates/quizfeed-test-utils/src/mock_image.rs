// SPDX-FileCopyrightText: 2026 Quizfeed Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock image collaborator.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use quizfeed_core::{
    AdapterType, FeedError, HealthStatus, ImageProvider, ImageRequest, PluginAdapter,
};

/// Default image returned when no outcome is scripted.
pub const MOCK_IMAGE_URI: &str = "data:image/png;base64,aW1hZ2U=";

/// An image collaborator that replays scripted outcomes and records requests.
#[derive(Clone, Default)]
pub struct MockImageProvider {
    outcomes: Arc<Mutex<VecDeque<Result<String, FeedError>>>>,
    requests: Arc<Mutex<Vec<ImageRequest>>>,
}

impl MockImageProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn push_image(&self, uri: impl Into<String>) {
        self.outcomes.lock().await.push_back(Ok(uri.into()));
    }

    pub async fn push_error(&self, err: FeedError) {
        self.outcomes.lock().await.push_back(Err(err));
    }

    pub async fn call_count(&self) -> usize {
        self.requests.lock().await.len()
    }

    pub async fn requests(&self) -> Vec<ImageRequest> {
        self.requests.lock().await.clone()
    }
}

#[async_trait]
impl PluginAdapter for MockImageProvider {
    fn name(&self) -> &str {
        "mock-image"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Image
    }

    async fn health_check(&self) -> Result<HealthStatus, FeedError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), FeedError> {
        Ok(())
    }
}

#[async_trait]
impl ImageProvider for MockImageProvider {
    async fn generate_image(&self, request: &ImageRequest) -> Result<String, FeedError> {
        self.requests.lock().await.push(request.clone());
        self.outcomes
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| Ok(MOCK_IMAGE_URI.to_string()))
    }
}
