// SPDX-FileCopyrightText: 2026 Quizfeed Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock generation collaborator for deterministic testing.
//!
//! `MockGenerator` implements `GenerationProvider` with a FIFO queue of
//! scripted outcomes and records every request it receives.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;

use quizfeed_core::{
    AdapterType, FeedError, GenerationProvider, GenerationRequest, HealthStatus, PluginAdapter,
};

/// A generation collaborator that replays scripted outcomes.
///
/// Outcomes are popped in order. When the queue is empty an empty JSON
/// array is returned.
#[derive(Clone, Default)]
pub struct MockGenerator {
    outcomes: Arc<Mutex<VecDeque<Result<String, FeedError>>>>,
    requests: Arc<Mutex<Vec<GenerationRequest>>>,
    delay: Option<Duration>,
}

impl MockGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a generator pre-loaded with successful response texts.
    pub fn with_responses<I, S>(responses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            outcomes: Arc::new(Mutex::new(
                responses.into_iter().map(|r| Ok(r.into())).collect(),
            )),
            ..Self::default()
        }
    }

    /// Wait this long before answering each request.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub async fn push_response(&self, text: impl Into<String>) {
        self.outcomes.lock().await.push_back(Ok(text.into()));
    }

    pub async fn push_error(&self, err: FeedError) {
        self.outcomes.lock().await.push_back(Err(err));
    }

    /// Number of `generate` calls so far.
    pub async fn call_count(&self) -> usize {
        self.requests.lock().await.len()
    }

    /// Every request received, oldest first.
    pub async fn requests(&self) -> Vec<GenerationRequest> {
        self.requests.lock().await.clone()
    }
}

#[async_trait]
impl PluginAdapter for MockGenerator {
    fn name(&self) -> &str {
        "mock-generator"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Generation
    }

    async fn health_check(&self) -> Result<HealthStatus, FeedError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), FeedError> {
        Ok(())
    }
}

#[async_trait]
impl GenerationProvider for MockGenerator {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, FeedError> {
        self.requests.lock().await.push(request.clone());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.outcomes
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| Ok("[]".to_string()))
    }
}
