// SPDX-FileCopyrightText: 2026 Quizfeed Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain types shared across adapter traits.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Separator used by the generation collaborator between question and hook.
pub const HOOK_DELIMITER: char = '|';

/// Category labels the generation collaborator is asked to use.
///
/// The label set is open: any non-empty category is accepted and stored.
pub const KNOWN_CATEGORIES: [&str; 8] = [
    "Logic & Math",
    "Science & Tech",
    "General Knowledge",
    "Language & Literature",
    "Pop Culture",
    "The Arts",
    "Nature & Animals",
    "Psychology",
];

/// Whether an item is in the main feed or hidden in the archive.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Display,
    EnumString,
    Serialize,
    Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum LifecycleStatus {
    #[default]
    Active,
    Archived,
}

impl LifecycleStatus {
    /// The other status.
    pub fn toggled(self) -> Self {
        match self {
            LifecycleStatus::Active => LifecycleStatus::Archived,
            LifecycleStatus::Archived => LifecycleStatus::Active,
        }
    }
}

/// Identifies the type of adapter.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum AdapterType {
    Generation,
    Image,
    Storage,
}

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    Healthy,
    Degraded(String),
    Unhealthy(String),
}

/// One quiz or riddle record.
///
/// The collaborator's single `displayText` ("Question | Hook") is kept as two
/// explicit fields so both survive storage and backups unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentItem {
    pub id: String,
    pub prompt: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hook: Option<String>,
    #[serde(default)]
    pub explanation: String,
    #[serde(default)]
    pub solution: String,
    pub category: String,
    #[serde(default)]
    pub style_hint: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generated_image: Option<String>,
    /// Epoch milliseconds, assigned once at creation.
    pub created_at: i64,
    pub lifecycle_status: LifecycleStatus,
}

impl ContentItem {
    /// Rejoins prompt and hook in the collaborator's `"Question | Hook"` form.
    pub fn display_text(&self) -> String {
        match &self.hook {
            Some(hook) => format!("{} {HOOK_DELIMITER} {hook}", self.prompt),
            None => self.prompt.clone(),
        }
    }

    /// Checks the fields every persisted item must carry.
    pub fn validate(&self) -> Result<(), String> {
        if self.id.trim().is_empty() {
            return Err("id must not be empty".into());
        }
        if self.prompt.trim().is_empty() {
            return Err(format!("item {}: display text must not be empty", self.id));
        }
        if self.category.trim().is_empty() {
            return Err(format!("item {}: category must not be empty", self.id));
        }
        Ok(())
    }

    pub fn is_active(&self) -> bool {
        self.lifecycle_status == LifecycleStatus::Active
    }
}

/// Splits `"Question | Hook"` into its prompt and optional hook.
///
/// Only the first delimiter separates; an empty hook becomes `None`.
pub fn split_display_text(text: &str) -> (String, Option<String>) {
    match text.split_once(HOOK_DELIMITER) {
        Some((prompt, hook)) => {
            let hook = hook.trim();
            (
                prompt.trim().to_string(),
                (!hook.is_empty()).then(|| hook.to_string()),
            )
        }
        None => (text.trim().to_string(), None),
    }
}

/// Current wall-clock time in epoch milliseconds.
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Shape of the JSON document requested from the generation collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseShape {
    /// A JSON array of records.
    List,
    /// A single JSON record.
    Single,
}

/// A request to the generation collaborator.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    /// Opaque prompt text built by the prompt builders.
    pub prompt: String,
    pub system_instruction: Option<String>,
    pub shape: ResponseShape,
}

/// A request to the image collaborator.
#[derive(Debug, Clone)]
pub struct ImageRequest {
    pub description: String,
    /// Target aspect ratio such as `"1:1"`.
    pub aspect_ratio: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn item() -> ContentItem {
        ContentItem {
            id: "a".into(),
            prompt: "6 / 2(1 + 2) = ?".into(),
            hook: Some("90% fail this".into()),
            explanation: String::new(),
            solution: "9".into(),
            category: "Logic & Math".into(),
            style_hint: "Minimalist Slate".into(),
            generated_image: None,
            created_at: 100,
            lifecycle_status: LifecycleStatus::Active,
        }
    }

    #[test]
    fn split_display_text_separates_prompt_and_hook() {
        let (prompt, hook) = split_display_text("What has keys? | Only 1% know");
        assert_eq!(prompt, "What has keys?");
        assert_eq!(hook.as_deref(), Some("Only 1% know"));
    }

    #[test]
    fn split_display_text_without_hook() {
        let (prompt, hook) = split_display_text("  Plain riddle  ");
        assert_eq!(prompt, "Plain riddle");
        assert_eq!(hook, None);

        let (_, hook) = split_display_text("Riddle |   ");
        assert_eq!(hook, None);
    }

    #[test]
    fn split_display_text_keeps_later_delimiters_in_hook() {
        let (prompt, hook) = split_display_text("a | b | c");
        assert_eq!(prompt, "a");
        assert_eq!(hook.as_deref(), Some("b | c"));
    }

    #[test]
    fn display_text_rejoins_split_fields() {
        let it = item();
        let (prompt, hook) = split_display_text(&it.display_text());
        assert_eq!(prompt, it.prompt);
        assert_eq!(hook, it.hook);
    }

    #[test]
    fn validate_rejects_blank_required_fields() {
        assert!(item().validate().is_ok());

        let mut missing_id = item();
        missing_id.id = " ".into();
        assert!(missing_id.validate().is_err());

        let mut missing_prompt = item();
        missing_prompt.prompt.clear();
        assert!(missing_prompt.validate().is_err());

        let mut missing_category = item();
        missing_category.category.clear();
        assert!(missing_category.validate().is_err());
    }

    #[test]
    fn lifecycle_status_toggles_and_parses() {
        assert_eq!(LifecycleStatus::Active.toggled(), LifecycleStatus::Archived);
        assert_eq!(LifecycleStatus::Archived.toggled(), LifecycleStatus::Active);
        assert_eq!(LifecycleStatus::Archived.to_string(), "archived");
        assert_eq!(
            LifecycleStatus::from_str("active").unwrap(),
            LifecycleStatus::Active
        );
        assert!(LifecycleStatus::from_str("deleted").is_err());
    }

    #[test]
    fn content_item_serializes_camel_case() {
        let json = serde_json::to_value(item()).unwrap();
        assert_eq!(json["styleHint"], "Minimalist Slate");
        assert_eq!(json["createdAt"], 100);
        assert_eq!(json["lifecycleStatus"], "active");
        assert!(json.get("generatedImage").is_none());
    }
}
