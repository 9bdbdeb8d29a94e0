// SPDX-FileCopyrightText: 2026 Quizfeed Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Backup envelope codec.
//!
//! A snapshot is one JSON document: `{ "version": 1, "exportedAt": <ms>, "items": [...] }`.
//! Decoding validates the whole envelope before returning anything, so a store
//! can swap its contents only after the entire blob is known to be good.

use std::collections::HashSet;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::FeedError;
use crate::types::{now_millis, split_display_text, ContentItem};

/// Envelope format version written by [`encode_snapshot`].
pub const SNAPSHOT_VERSION: u64 = 1;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Envelope<'a> {
    version: u64,
    exported_at: i64,
    items: &'a [ContentItem],
}

/// Serializes the given items into a versioned backup envelope.
pub fn encode_snapshot(items: &[ContentItem]) -> Result<String, FeedError> {
    let envelope = Envelope {
        version: SNAPSHOT_VERSION,
        exported_at: now_millis(),
        items,
    };
    serde_json::to_string_pretty(&envelope)
        .map_err(|e| FeedError::Internal(format!("failed to serialize snapshot: {e}")))
}

/// Parses and validates a backup envelope.
///
/// Any problem rejects the whole blob: unknown or missing version, `items`
/// not an array, a record that fails to deserialize or validate, or two
/// records sharing an id.
pub fn decode_snapshot(blob: &str) -> Result<Vec<ContentItem>, FeedError> {
    let doc: Value = serde_json::from_str(blob)
        .map_err(|e| FeedError::InvalidBackup(format!("not valid JSON: {e}")))?;

    let Value::Object(envelope) = doc else {
        return Err(FeedError::InvalidBackup(
            "backup must be a JSON object".into(),
        ));
    };

    match envelope.get("version") {
        None => return Err(FeedError::InvalidBackup("missing version".into())),
        Some(v) if v.as_u64() == Some(SNAPSHOT_VERSION) => {}
        Some(v) => {
            return Err(FeedError::InvalidBackup(format!(
                "unsupported version {v} (expected {SNAPSHOT_VERSION})"
            )));
        }
    }

    let records = match envelope.get("items") {
        Some(Value::Array(records)) => records,
        Some(_) => return Err(FeedError::InvalidBackup("items must be an array".into())),
        None => return Err(FeedError::InvalidBackup("missing items".into())),
    };

    let mut seen = HashSet::with_capacity(records.len());
    let mut items = Vec::with_capacity(records.len());
    for (index, record) in records.iter().enumerate() {
        let item: ContentItem = serde_json::from_value(with_split_display_text(record))
            .map_err(|e| FeedError::InvalidBackup(format!("items[{index}]: {e}")))?;
        item.validate()
            .map_err(|reason| FeedError::InvalidBackup(format!("items[{index}]: {reason}")))?;
        if !seen.insert(item.id.clone()) {
            return Err(FeedError::InvalidBackup(format!(
                "items[{index}]: duplicate id {}",
                item.id
            )));
        }
        items.push(item);
    }

    Ok(items)
}

/// Records written as `displayText` ("Question | Hook") become `prompt` and `hook`.
///
/// An explicit `prompt` wins; `displayText` is then ignored.
fn with_split_display_text(record: &Value) -> Value {
    let Value::Object(fields) = record else {
        return record.clone();
    };
    let mut fields: Map<String, Value> = fields.clone();
    if let Some(Value::String(text)) = fields.remove("displayText")
        && !fields.contains_key("prompt")
    {
        let (prompt, hook) = split_display_text(&text);
        fields.insert("prompt".into(), Value::String(prompt));
        if let Some(hook) = hook
            && !fields.contains_key("hook")
        {
            fields.insert("hook".into(), Value::String(hook));
        }
    }
    Value::Object(fields)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::LifecycleStatus;

    fn item(id: &str, created_at: i64) -> ContentItem {
        ContentItem {
            id: id.into(),
            prompt: format!("riddle {id}"),
            hook: Some("hook".into()),
            explanation: "because".into(),
            solution: "answer".into(),
            category: "Psychology".into(),
            style_hint: "Vintage Paper".into(),
            generated_image: Some("data:image/png;base64,AAAA".into()),
            created_at,
            lifecycle_status: LifecycleStatus::Archived,
        }
    }

    fn assert_invalid(blob: &str, needle: &str) {
        match decode_snapshot(blob) {
            Err(FeedError::InvalidBackup(msg)) => {
                assert!(msg.contains(needle), "expected `{needle}` in: {msg}")
            }
            other => panic!("expected InvalidBackup, got {other:?}"),
        }
    }

    #[test]
    fn encoded_snapshot_decodes_to_same_items() {
        let items = vec![item("a", 1), item("b", 2)];
        let blob = encode_snapshot(&items).unwrap();
        assert_eq!(decode_snapshot(&blob).unwrap(), items);
    }

    #[test]
    fn encoded_snapshot_carries_version_marker() {
        let blob = encode_snapshot(&[]).unwrap();
        let doc: Value = serde_json::from_str(&blob).unwrap();
        assert_eq!(doc["version"], 1);
        assert!(doc["items"].as_array().unwrap().is_empty());
        assert!(doc["exportedAt"].is_i64());
    }

    #[test]
    fn rejects_missing_or_unknown_version() {
        assert_invalid(r#"{"items": []}"#, "missing version");
        assert_invalid(r#"{"version": 2, "items": []}"#, "unsupported version");
        assert_invalid(r#"{"version": "1", "items": []}"#, "unsupported version");
    }

    #[test]
    fn rejects_non_array_items() {
        assert_invalid(r#"{"version": 1, "items": {}}"#, "items must be an array");
        assert_invalid(r#"{"version": 1}"#, "missing items");
    }

    #[test]
    fn rejects_non_object_and_garbage() {
        assert_invalid("[]", "JSON object");
        assert_invalid("not json", "not valid JSON");
    }

    #[test]
    fn rejects_whole_backup_for_one_bad_record() {
        let blob = r#"{"version": 1, "items": [
            {"id": "a", "prompt": "p", "category": "c", "createdAt": 1, "lifecycleStatus": "active"},
            {"id": "b", "prompt": "p", "createdAt": 2, "lifecycleStatus": "active"}
        ]}"#;
        assert_invalid(blob, "items[1]");
    }

    #[test]
    fn rejects_blank_required_field() {
        let blob = r#"{"version": 1, "items": [
            {"id": "", "prompt": "p", "category": "c", "createdAt": 1, "lifecycleStatus": "active"}
        ]}"#;
        assert_invalid(blob, "id must not be empty");
    }

    #[test]
    fn rejects_unknown_status() {
        let blob = r#"{"version": 1, "items": [
            {"id": "a", "prompt": "p", "category": "c", "createdAt": 1, "lifecycleStatus": "deleted"}
        ]}"#;
        assert_invalid(blob, "items[0]");
    }

    #[test]
    fn rejects_duplicate_ids() {
        let blob = r#"{"version": 1, "items": [
            {"id": "a", "prompt": "p", "category": "c", "createdAt": 1, "lifecycleStatus": "active"},
            {"id": "a", "prompt": "q", "category": "c", "createdAt": 2, "lifecycleStatus": "active"}
        ]}"#;
        assert_invalid(blob, "duplicate id a");
    }

    #[test]
    fn optional_fields_default_when_absent() {
        let blob = r#"{"version": 1, "items": [
            {"id": "a", "prompt": "p", "category": "c", "createdAt": 7, "lifecycleStatus": "archived"}
        ]}"#;
        let items = decode_snapshot(blob).unwrap();
        assert_eq!(items[0].hook, None);
        assert_eq!(items[0].generated_image, None);
        assert_eq!(items[0].explanation, "");
        assert_eq!(items[0].lifecycle_status, LifecycleStatus::Archived);
    }

    #[test]
    fn display_text_records_split_into_prompt_and_hook() {
        let blob = r#"{"version": 1, "items": [
            {"id": "a", "displayText": "Which door? | Only one is safe", "category": "c",
             "createdAt": 1, "lifecycleStatus": "active"},
            {"id": "b", "displayText": "No hook here", "category": "c",
             "createdAt": 2, "lifecycleStatus": "active"}
        ]}"#;
        let items = decode_snapshot(blob).unwrap();
        assert_eq!(items[0].prompt, "Which door?");
        assert_eq!(items[0].hook.as_deref(), Some("Only one is safe"));
        assert_eq!(items[1].prompt, "No hook here");
        assert_eq!(items[1].hook, None);
    }

    #[test]
    fn explicit_prompt_wins_over_display_text() {
        let blob = r#"{"version": 1, "items": [
            {"id": "a", "prompt": "kept", "displayText": "ignored | too", "category": "c",
             "createdAt": 1, "lifecycleStatus": "active"}
        ]}"#;
        let items = decode_snapshot(blob).unwrap();
        assert_eq!(items[0].prompt, "kept");
        assert_eq!(items[0].hook, None);
    }
}
