// SPDX-FileCopyrightText: 2026 Quizfeed Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for quizfeed.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level quizfeed configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable overrides.
/// All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct QuizfeedConfig {
    /// Process-level settings.
    #[serde(default)]
    pub app: AppConfig,

    /// Generation and image collaborator settings.
    #[serde(default)]
    pub gemini: GeminiConfig,

    /// Retry policy for collaborator calls.
    #[serde(default)]
    pub retry: RetryConfig,

    /// Local content store settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Feed request sizes.
    #[serde(default)]
    pub feed: FeedConfig,
}

/// Process-level configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Gemini API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GeminiConfig {
    /// API key. `None` falls back to the `GEMINI_API_KEY` environment variable.
    #[serde(default)]
    pub api_key: Option<String>,

    /// API root, without the `/v1beta` path.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Model used for quiz item generation.
    #[serde(default = "default_text_model")]
    pub text_model: String,

    /// Model used for background image generation.
    #[serde(default = "default_image_model")]
    pub image_model: String,

    /// Per-request HTTP timeout.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Aspect ratio requested for generated images.
    #[serde(default = "default_aspect_ratio")]
    pub image_aspect_ratio: String,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            text_model: default_text_model(),
            image_model: default_image_model(),
            timeout_secs: default_timeout_secs(),
            image_aspect_ratio: default_aspect_ratio(),
        }
    }
}

impl GeminiConfig {
    /// The configured key, or `GEMINI_API_KEY` from the environment.
    pub fn resolved_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .or_else(|| std::env::var("GEMINI_API_KEY").ok())
            .filter(|k| !k.trim().is_empty())
    }
}

fn default_base_url() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

fn default_text_model() -> String {
    "gemini-3-flash-preview".to_string()
}

fn default_image_model() -> String {
    "gemini-2.5-flash-image".to_string()
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_aspect_ratio() -> String {
    "1:1".to_string()
}

/// Retry policy configuration, in milliseconds.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RetryConfig {
    /// Total attempts per collaborator call, including the first.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Delay before the first retry; doubles for each further retry.
    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,

    /// Upper bound of the uniform jitter added to every delay.
    #[serde(default = "default_max_jitter_ms")]
    pub max_jitter_ms: u64,

    /// Cap on the exponential part of the delay.
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            base_delay_ms: default_base_delay_ms(),
            max_jitter_ms: default_max_jitter_ms(),
            max_delay_ms: default_max_delay_ms(),
        }
    }
}

fn default_max_attempts() -> u32 {
    3
}

fn default_base_delay_ms() -> u64 {
    2000
}

fn default_max_jitter_ms() -> u64 {
    1000
}

fn default_max_delay_ms() -> u64 {
    30_000
}

/// Storage backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Enable WAL (Write-Ahead Logging) mode for SQLite.
    #[serde(default = "default_wal_mode")]
    pub wal_mode: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            wal_mode: default_wal_mode(),
        }
    }
}

fn default_database_path() -> String {
    dirs::data_dir()
        .map(|p| p.join("quizfeed").join("quizfeed.db"))
        .unwrap_or_else(|| std::path::PathBuf::from("quizfeed.db"))
        .display()
        .to_string()
}

fn default_wal_mode() -> bool {
    true
}

/// How many items each feed request asks for.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct FeedConfig {
    /// Items per category or refresh request.
    #[serde(default = "default_batch_size")]
    pub batch_size: u32,

    /// Items in the daily mix.
    #[serde(default = "default_today_size")]
    pub today_size: u32,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            batch_size: default_batch_size(),
            today_size: default_today_size(),
        }
    }
}

fn default_batch_size() -> u32 {
    8
}

fn default_today_size() -> u32 {
    5
}
