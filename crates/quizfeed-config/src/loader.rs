// SPDX-FileCopyrightText: 2026 Quizfeed Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Layered config sources.
//!
//! Later layers win: compiled defaults, `/etc/quizfeed/quizfeed.toml`,
//! `~/.config/quizfeed/quizfeed.toml`, `./quizfeed.toml`, then `QUIZFEED_*`
//! environment variables.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::{Path, PathBuf};

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;

use crate::model::QuizfeedConfig;

/// System-wide config file.
pub const SYSTEM_CONFIG_PATH: &str = "/etc/quizfeed/quizfeed.toml";

/// Config file looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = "quizfeed.toml";

/// Top-level tables; an env key's first segment is split off only for these.
const SECTIONS: [&str; 5] = ["app", "gemini", "retry", "storage", "feed"];

/// User config file under the XDG config dir, if one exists.
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("quizfeed").join(LOCAL_CONFIG_FILE))
}

fn defaults() -> Figment {
    Figment::from(Serialized::defaults(QuizfeedConfig::default()))
}

/// Every file layer plus environment overrides.
pub fn load_config() -> Result<QuizfeedConfig, figment::Error> {
    let mut figment = defaults().merge(Toml::file(SYSTEM_CONFIG_PATH));
    if let Some(user) = user_config_path() {
        figment = figment.merge(Toml::file(user));
    }
    figment
        .merge(Toml::file(LOCAL_CONFIG_FILE))
        .merge(env_overrides())
        .extract()
}

/// Defaults plus the given TOML only. Ignores files and the environment.
pub fn load_config_from_str(toml_content: &str) -> Result<QuizfeedConfig, figment::Error> {
    defaults().merge(Toml::string(toml_content)).extract()
}

/// Defaults, one explicit file, then environment overrides.
pub fn load_config_from_path(path: &Path) -> Result<QuizfeedConfig, figment::Error> {
    defaults()
        .merge(Toml::file(path))
        .merge(env_overrides())
        .extract()
}

/// `QUIZFEED_GEMINI_API_KEY` becomes `gemini.api_key`.
///
/// Only the section prefix is turned into a dot, since key names themselves
/// contain underscores. Keys arrive in their original case.
pub(crate) fn env_overrides() -> Env {
    Env::prefixed("QUIZFEED_").map(|key| section_path(key.as_str()).into())
}

fn section_path(env_key: &str) -> String {
    let key = env_key.to_ascii_lowercase();
    SECTIONS
        .iter()
        .find_map(|section| {
            key.strip_prefix(section)
                .and_then(|rest| rest.strip_prefix('_'))
                .map(|rest| format!("{section}.{rest}"))
        })
        .unwrap_or(key)
}
