// SPDX-FileCopyrightText: 2026 Quizfeed Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Fetching and normalizing content from the collaborators.
//!
//! Every collaborator call goes through the [`FeedInvoker`], so rate limits
//! and server faults are retried with backoff. Sanitization and parsing
//! happen after the invoker returns: a malformed payload is never retried.

use std::sync::Arc;

use rand::Rng;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use quizfeed_core::types::{now_millis, split_display_text};
use quizfeed_core::{
    ContentItem, FeedError, GenerationProvider, GenerationRequest, ImageProvider, ImageRequest,
    LifecycleStatus, ResponseShape,
};
use quizfeed_resilience::FeedInvoker;

use crate::prompts;
use crate::sanitize::sanitize_json;

const ID_SUFFIX_LEN: usize = 9;
const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// A record as the generation collaborator returns it.
///
/// Accepts the camelCase field names declared in the response schema and
/// the snake_case names used by older prompts.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawRecord {
    #[serde(default, alias = "visual_text")]
    display_text: Option<String>,
    #[serde(default, alias = "read_more_content")]
    explanation: Option<String>,
    #[serde(default, alias = "answer")]
    solution: Option<String>,
    #[serde(default)]
    category: Option<String>,
    #[serde(default, alias = "style_hint")]
    style_hint: Option<String>,
}

fn non_empty(field: Option<String>) -> Option<String> {
    field
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

impl RawRecord {
    fn from_value(value: Value) -> Result<Self, String> {
        serde_json::from_value(value).map_err(|e| format!("unreadable record: {e}"))
    }

    fn into_item(self, id: String, created_at: i64) -> Result<ContentItem, String> {
        let display_text = non_empty(self.display_text).ok_or("missing displayText")?;
        let category = non_empty(self.category).ok_or("missing category")?;
        let (prompt, hook) = split_display_text(&display_text);
        if prompt.is_empty() {
            return Err("displayText has no question before the hook".into());
        }

        Ok(ContentItem {
            id,
            prompt,
            hook,
            explanation: self.explanation.unwrap_or_default(),
            solution: self.solution.unwrap_or_default(),
            category,
            style_hint: self.style_hint.unwrap_or_default(),
            generated_image: None,
            created_at,
            lifecycle_status: LifecycleStatus::Active,
        })
    }
}

fn random_suffix() -> String {
    let mut rng = rand::thread_rng();
    (0..ID_SUFFIX_LEN)
        .map(|_| BASE36[rng.gen_range(0..BASE36.len())] as char)
        .collect()
}

/// Identity for the `index`-th record of a batch completed at `millis`.
pub fn batch_item_id(millis: i64, index: usize) -> String {
    format!("{millis}-{index}-{}", random_suffix())
}

/// Identity for a user-requested item.
pub fn custom_item_id(millis: i64) -> String {
    format!("custom-{millis}-{}", random_suffix())
}

fn parse_payload(text: &str) -> Result<Value, FeedError> {
    let payload = sanitize_json(text);
    if payload.is_empty() {
        return Err(FeedError::MalformedResponse("empty response".into()));
    }
    serde_json::from_str(payload)
        .map_err(|e| FeedError::MalformedResponse(format!("response is not valid JSON: {e}")))
}

/// Obtains new items from the generation collaborator and images from the
/// image collaborator.
pub struct ContentFetcher {
    generator: Arc<dyn GenerationProvider>,
    images: Arc<dyn ImageProvider>,
    invoker: FeedInvoker,
    aspect_ratio: String,
}

impl ContentFetcher {
    pub fn new(
        generator: Arc<dyn GenerationProvider>,
        images: Arc<dyn ImageProvider>,
        invoker: FeedInvoker,
    ) -> Self {
        Self {
            generator,
            images,
            invoker,
            aspect_ratio: "1:1".to_string(),
        }
    }

    /// Sets the aspect ratio requested for generated images.
    pub fn with_aspect_ratio(mut self, aspect_ratio: impl Into<String>) -> Self {
        self.aspect_ratio = aspect_ratio.into();
        self
    }

    async fn generate(&self, request: GenerationRequest) -> Result<String, FeedError> {
        let generator = &self.generator;
        let request = &request;
        let text = self
            .invoker
            .invoke(move || generator.generate(request))
            .await?;
        Ok(text)
    }

    /// Fetches a batch of items for an opaque prompt.
    ///
    /// Records missing `displayText` or `category` are dropped with a warning;
    /// the remaining records are returned in response order. A response that
    /// is not a JSON array is [`FeedError::MalformedResponse`].
    pub async fn fetch_batch(&self, prompt: &str) -> Result<Vec<ContentItem>, FeedError> {
        let text = self
            .generate(GenerationRequest {
                prompt: prompt.to_string(),
                system_instruction: Some(prompts::batch_instruction()),
                shape: ResponseShape::List,
            })
            .await?;

        let Value::Array(records) = parse_payload(&text)? else {
            return Err(FeedError::MalformedResponse(
                "expected a JSON array of records".into(),
            ));
        };

        let received = records.len();
        let created_at = now_millis();
        let mut items = Vec::with_capacity(received);
        for (index, record) in records.into_iter().enumerate() {
            match RawRecord::from_value(record)
                .and_then(|raw| raw.into_item(batch_item_id(created_at, index), created_at))
            {
                Ok(item) => items.push(item),
                Err(reason) => warn!(index, reason = %reason, "dropping invalid record"),
            }
        }

        debug!(received, kept = items.len(), "batch normalized");
        Ok(items)
    }

    /// Fetches a single item built around the user's request.
    ///
    /// An invalid record fails the whole call with
    /// [`FeedError::MalformedResponse`]. A one-element array is accepted in
    /// place of an object.
    pub async fn fetch_one(&self, user_request: &str) -> Result<ContentItem, FeedError> {
        let text = self
            .generate(GenerationRequest {
                prompt: prompts::custom(user_request),
                system_instruction: Some(prompts::SYSTEM_INSTRUCTION.to_string()),
                shape: ResponseShape::Single,
            })
            .await?;

        let record = match parse_payload(&text)? {
            record @ Value::Object(_) => record,
            Value::Array(mut records) if records.len() == 1 => records.remove(0),
            _ => {
                return Err(FeedError::MalformedResponse(
                    "expected a single JSON record".into(),
                ));
            }
        };

        let created_at = now_millis();
        RawRecord::from_value(record)
            .and_then(|raw| raw.into_item(custom_item_id(created_at), created_at))
            .map_err(FeedError::MalformedResponse)
    }

    /// Requests a background image for `item` and returns its data URI.
    ///
    /// Does not touch storage; the caller attaches the result.
    pub async fn enrich_with_image(&self, item: &ContentItem) -> Result<String, FeedError> {
        let request = ImageRequest {
            description: prompts::image_description(&item.category, &item.style_hint),
            aspect_ratio: self.aspect_ratio.clone(),
        };
        let images = &self.images;
        let request = &request;
        let uri = self
            .invoker
            .invoke(move || images.generate_image(request))
            .await?;
        debug!(id = %item.id, "image generated");
        Ok(uri)
    }
}
