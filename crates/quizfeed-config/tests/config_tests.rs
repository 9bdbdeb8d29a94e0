// SPDX-FileCopyrightText: 2026 Quizfeed Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the quizfeed configuration system.

use figment::Jail;
use quizfeed_config::diagnostic::ConfigError;
use quizfeed_config::model::QuizfeedConfig;
use quizfeed_config::{
    load_and_validate_path, load_and_validate_str, load_config_from_str, render_effective,
};

/// Valid TOML with all known fields deserializes successfully.
#[test]
fn valid_toml_deserializes_into_config() {
    let toml = r#"
[app]
log_level = "debug"

[gemini]
api_key = "AIza-test"
base_url = "http://localhost:9999"
text_model = "gemini-test"
image_model = "gemini-image-test"
timeout_secs = 5
image_aspect_ratio = "16:9"

[retry]
max_attempts = 5
base_delay_ms = 100
max_jitter_ms = 0
max_delay_ms = 1000

[storage]
database_path = "/tmp/quizfeed-test.db"
wal_mode = false

[feed]
batch_size = 4
today_size = 2
"#;

    let config = load_config_from_str(toml).expect("valid TOML should deserialize");
    assert_eq!(config.app.log_level, "debug");
    assert_eq!(config.gemini.api_key.as_deref(), Some("AIza-test"));
    assert_eq!(config.gemini.base_url, "http://localhost:9999");
    assert_eq!(config.gemini.text_model, "gemini-test");
    assert_eq!(config.gemini.image_aspect_ratio, "16:9");
    assert_eq!(config.retry.max_attempts, 5);
    assert_eq!(config.retry.max_jitter_ms, 0);
    assert_eq!(config.storage.database_path, "/tmp/quizfeed-test.db");
    assert!(!config.storage.wal_mode);
    assert_eq!(config.feed.batch_size, 4);
    assert_eq!(config.feed.today_size, 2);
}

#[test]
fn empty_toml_yields_defaults() {
    let config = load_and_validate_str("").expect("defaults should validate");
    assert_eq!(config.app.log_level, "info");
    assert_eq!(config.retry.max_attempts, 3);
    assert_eq!(config.retry.base_delay_ms, 2000);
    assert_eq!(config.retry.max_jitter_ms, 1000);
    assert_eq!(config.gemini.text_model, "gemini-3-flash-preview");
    assert_eq!(config.gemini.image_model, "gemini-2.5-flash-image");
    assert_eq!(config.feed.batch_size, 8);
    assert_eq!(config.feed.today_size, 5);
    assert!(config.storage.database_path.ends_with("quizfeed.db"));
}

#[test]
fn unknown_key_gets_suggestion() {
    let toml = r#"
[gemini]
api_kye = "abc"
"#;
    let errors = load_and_validate_str(toml).expect_err("unknown key should fail");
    match &errors[0] {
        ConfigError::UnknownKey {
            key, suggestion, ..
        } => {
            assert_eq!(key, "api_kye");
            assert_eq!(suggestion.as_deref(), Some("api_key"));
        }
        other => panic!("expected UnknownKey, got {other:?}"),
    }
}

#[test]
fn unknown_section_is_rejected() {
    let errors = load_and_validate_str("[telemetry]\nenabled = true\n")
        .expect_err("unknown section should fail");
    assert!(matches!(errors[0], ConfigError::UnknownKey { .. }));
}

#[test]
fn wrong_type_is_reported() {
    let errors = load_and_validate_str("[retry]\nmax_attempts = \"three\"\n")
        .expect_err("string for integer should fail");
    assert!(
        matches!(errors[0], ConfigError::InvalidType { .. }),
        "{errors:?}"
    );
}

#[test]
fn semantic_validation_runs_after_parsing() {
    let errors = load_and_validate_str("[retry]\nmax_attempts = 0\n")
        .expect_err("zero attempts should fail validation");
    assert!(matches!(errors[0], ConfigError::Validation { .. }));
}

#[test]
fn env_overrides_file_values() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "custom.toml",
            r#"
[gemini]
text_model = "from-file"

[retry]
max_attempts = 2
"#,
        )?;
        jail.set_env("QUIZFEED_GEMINI_TEXT_MODEL", "from-env");
        jail.set_env("QUIZFEED_STORAGE_DATABASE_PATH", "/tmp/env.db");

        let config = load_and_validate_path(std::path::Path::new("custom.toml"))
            .map_err(|errors| format!("{errors:?}"))?;
        assert_eq!(config.gemini.text_model, "from-env");
        assert_eq!(config.retry.max_attempts, 2);
        assert_eq!(config.storage.database_path, "/tmp/env.db");
        Ok(())
    });
}

#[test]
fn quizfeed_gemini_api_key_env_sets_api_key() {
    Jail::expect_with(|jail| {
        jail.create_file("quizfeed.toml", "[feed]\nbatch_size = 4\n")?;
        jail.set_env("QUIZFEED_GEMINI_API_KEY", "from-env");
        jail.set_env("QUIZFEED_FEED_TODAY_SIZE", "3");

        let config = load_and_validate_path(std::path::Path::new("quizfeed.toml"))
            .map_err(|errors| format!("{errors:?}"))?;
        assert_eq!(config.gemini.api_key.as_deref(), Some("from-env"));
        assert_eq!(config.feed.batch_size, 4);
        assert_eq!(config.feed.today_size, 3);
        Ok(())
    });
}

#[test]
fn api_key_falls_back_to_gemini_env_var() {
    Jail::expect_with(|jail| {
        jail.set_env("GEMINI_API_KEY", "from-gemini-env");
        let config = QuizfeedConfig::default();
        assert_eq!(
            config.gemini.resolved_api_key().as_deref(),
            Some("from-gemini-env")
        );
        Ok(())
    });
}

#[test]
fn effective_config_masks_api_key() {
    let config = load_config_from_str("[gemini]\napi_key = \"secret-key\"\n").unwrap();
    let rendered = render_effective(&config).unwrap();
    assert!(!rendered.contains("secret-key"));
    assert!(rendered.contains("********"));
    assert!(rendered.contains("[retry]"));
}
