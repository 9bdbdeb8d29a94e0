// SPDX-FileCopyrightText: 2026 Quizfeed Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Wiring of configuration into adapters and the feed service.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use quizfeed_config::model::{QuizfeedConfig, RetryConfig};
use quizfeed_core::{
    AdapterType, ContentStore, FeedError, GenerationProvider, GenerationRequest, HealthStatus,
    ImageProvider, ImageRequest, PluginAdapter,
};
use quizfeed_feed::{ContentFetcher, FeedService};
use quizfeed_gemini::GeminiProvider;
use quizfeed_resilience::{feed_invoker, RetryPolicy};
use quizfeed_storage::SqliteContentStore;

/// Stand-in collaborator used when no API key is configured.
///
/// Lets the offline commands (list, archive, export, ...) run without a key;
/// any remote call fails with the same configuration error.
struct Unconfigured {
    reason: String,
}

#[async_trait]
impl PluginAdapter for Unconfigured {
    fn name(&self) -> &str {
        "unconfigured"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Generation
    }

    async fn health_check(&self) -> Result<HealthStatus, FeedError> {
        Ok(HealthStatus::Unhealthy(self.reason.clone()))
    }

    async fn shutdown(&self) -> Result<(), FeedError> {
        Ok(())
    }
}

#[async_trait]
impl GenerationProvider for Unconfigured {
    async fn generate(&self, _request: &GenerationRequest) -> Result<String, FeedError> {
        Err(FeedError::Config(self.reason.clone()))
    }
}

#[async_trait]
impl ImageProvider for Unconfigured {
    async fn generate_image(&self, _request: &ImageRequest) -> Result<String, FeedError> {
        Err(FeedError::Config(self.reason.clone()))
    }
}

/// Retry policy from the `[retry]` section.
pub fn retry_policy(config: &RetryConfig) -> RetryPolicy {
    RetryPolicy::from_millis(
        config.max_attempts,
        config.base_delay_ms,
        config.max_jitter_ms,
        config.max_delay_ms,
    )
}

/// Builds the fetcher from config, falling back to [`Unconfigured`] without a key.
///
/// Also returns the collaborator behind it so its health can be reported.
pub fn build_fetcher(
    config: &QuizfeedConfig,
) -> Result<(ContentFetcher, Arc<dyn PluginAdapter>), FeedError> {
    let invoker = feed_invoker(retry_policy(&config.retry));
    let (fetcher, collaborator) = match GeminiProvider::new(&config.gemini) {
        Ok(provider) => {
            let provider = Arc::new(provider);
            let collaborator: Arc<dyn PluginAdapter> = provider.clone();
            (
                ContentFetcher::new(provider.clone(), provider, invoker),
                collaborator,
            )
        }
        Err(FeedError::Config(reason)) => {
            debug!(reason = %reason, "remote collaborators unavailable");
            let stub = Arc::new(Unconfigured { reason });
            let collaborator: Arc<dyn PluginAdapter> = stub.clone();
            (ContentFetcher::new(stub.clone(), stub, invoker), collaborator)
        }
        Err(e) => return Err(e),
    };
    Ok((
        fetcher.with_aspect_ratio(config.gemini.image_aspect_ratio.clone()),
        collaborator,
    ))
}

/// An open store plus the service built over it.
pub struct App {
    pub store: Arc<SqliteContentStore>,
    pub service: FeedService,
    collaborator: Arc<dyn PluginAdapter>,
}

impl App {
    pub async fn open(config: &QuizfeedConfig) -> Result<Self, FeedError> {
        let store = Arc::new(SqliteContentStore::new(config.storage.clone()));
        store.initialize().await?;
        let (fetcher, collaborator) = build_fetcher(config)?;
        let service = FeedService::new(fetcher, store.clone() as Arc<dyn ContentStore>);
        Ok(Self {
            store,
            service,
            collaborator,
        })
    }

    /// The store and the remote collaborator, in that order.
    pub fn adapters(&self) -> Vec<Arc<dyn PluginAdapter>> {
        vec![
            self.store.clone() as Arc<dyn PluginAdapter>,
            self.collaborator.clone(),
        ]
    }

    /// Checkpoints and releases the store.
    pub async fn close(self) -> Result<(), FeedError> {
        self.store.shutdown().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;
    use quizfeed_core::LifecycleStatus;

    fn offline_config(db_path: &str) -> QuizfeedConfig {
        let mut config = quizfeed_config::load_and_validate_str("")
            .expect("default config should be valid");
        config.gemini.api_key = None;
        config.gemini.base_url = "http://127.0.0.1:9".to_string();
        config.storage.database_path = db_path.to_string();
        config
    }

    #[test]
    fn retry_policy_follows_config() {
        let config = quizfeed_config::load_and_validate_str("").unwrap();
        let policy = retry_policy(&config.retry);
        assert_eq!(policy, RetryPolicy::default());
    }

    /// Runs `body` on a fresh runtime with no API key in the environment.
    fn without_api_key<F, Fut>(body: F)
    where
        F: FnOnce() -> Fut,
        Fut: std::future::Future<Output = ()>,
    {
        Jail::expect_with(|jail| {
            jail.clear_env();
            tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .unwrap()
                .block_on(body());
            Ok(())
        });
    }

    #[test]
    fn offline_commands_work_without_api_key() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("app.db");
        let config = offline_config(path.to_str().unwrap());

        without_api_key(|| async move {
            let app = App::open(&config).await.unwrap();

            let view = app
                .service
                .list_view(LifecycleStatus::Active, None)
                .await
                .unwrap();
            assert!(view.is_empty());

            let err = app.service.request_fetch("prompt").await.unwrap_err();
            assert!(matches!(err, FeedError::Config(_)), "{err:?}");
            app.close().await.unwrap();
        });
    }

    #[test]
    fn adapters_report_store_and_unconfigured_collaborator() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("status.db");
        let config = offline_config(path.to_str().unwrap());

        without_api_key(|| async move {
            let app = App::open(&config).await.unwrap();
            let adapters = app.adapters();
            assert_eq!(adapters.len(), 2);
            assert_eq!(adapters[0].adapter_type(), AdapterType::Storage);
            assert_eq!(
                adapters[0].health_check().await.unwrap(),
                HealthStatus::Healthy
            );
            assert_eq!(adapters[1].name(), "unconfigured");
            assert!(matches!(
                adapters[1].health_check().await.unwrap(),
                HealthStatus::Unhealthy(_)
            ));
            app.close().await.unwrap();
        });
    }
}
