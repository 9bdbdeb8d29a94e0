// SPDX-FileCopyrightText: 2026 Quizfeed Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.

use crate::diagnostic::ConfigError;
use crate::model::QuizfeedConfig;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Largest batch the feed will request in one call.
pub const MAX_BATCH_SIZE: u32 = 50;

/// Validate a deserialized configuration for semantic correctness.
///
/// Collects every failure rather than stopping at the first.
pub fn validate_config(config: &QuizfeedConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    let level = config.app.log_level.trim().to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ConfigError::Validation {
            message: format!(
                "app.log_level `{}` must be one of {}",
                config.app.log_level,
                LOG_LEVELS.join(", ")
            ),
        });
    }

    if config.retry.max_attempts < 1 {
        errors.push(ConfigError::Validation {
            message: "retry.max_attempts must be at least 1".to_string(),
        });
    }

    if config.retry.base_delay_ms > config.retry.max_delay_ms {
        errors.push(ConfigError::Validation {
            message: format!(
                "retry.base_delay_ms ({}) must not exceed retry.max_delay_ms ({})",
                config.retry.base_delay_ms, config.retry.max_delay_ms
            ),
        });
    }

    if config.storage.database_path.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "storage.database_path must not be empty".to_string(),
        });
    }

    for (key, value) in [
        ("feed.batch_size", config.feed.batch_size),
        ("feed.today_size", config.feed.today_size),
    ] {
        if !(1..=MAX_BATCH_SIZE).contains(&value) {
            errors.push(ConfigError::Validation {
                message: format!("{key} must be between 1 and {MAX_BATCH_SIZE}, got {value}"),
            });
        }
    }

    if config.gemini.base_url.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "gemini.base_url must not be empty".to_string(),
        });
    }

    if !is_aspect_ratio(&config.gemini.image_aspect_ratio) {
        errors.push(ConfigError::Validation {
            message: format!(
                "gemini.image_aspect_ratio `{}` must look like `W:H`",
                config.gemini.image_aspect_ratio
            ),
        });
    }

    if config.gemini.timeout_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "gemini.timeout_secs must be positive".to_string(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn is_aspect_ratio(value: &str) -> bool {
    match value.split_once(':') {
        Some((w, h)) => {
            let positive = |s: &str| s.parse::<u32>().is_ok_and(|n| n > 0);
            positive(w) && positive(h)
        }
        None => false,
    }
}
