// SPDX-FileCopyrightText: 2026 Quizfeed Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Extraction of the JSON payload from collaborator text.
//!
//! The generation collaborator sometimes wraps its JSON in prose or Markdown
//! code fences. [`sanitize_json`] slices from the earliest `[` or `{` to the
//! latest `]` or `}`; when no such pair exists it strips fence markers.

/// Returns the outermost JSON container found in `text`.
pub fn sanitize_json(text: &str) -> &str {
    let start = match (text.find('['), text.find('{')) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (a, b) => a.or(b),
    };
    let end = match (text.rfind(']'), text.rfind('}')) {
        (Some(a), Some(b)) => Some(a.max(b)),
        (a, b) => a.or(b),
    };

    if let (Some(start), Some(end)) = (start, end)
        && end > start
    {
        return &text[start..=end];
    }

    strip_fences(text)
}

fn strip_fences(text: &str) -> &str {
    let mut body = text.trim();
    for opener in ["```json", "```"] {
        if let Some(rest) = body.strip_prefix(opener) {
            body = rest;
            break;
        }
    }
    body.strip_suffix("```").unwrap_or(body).trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_json_is_unchanged() {
        assert_eq!(sanitize_json(r#"[{"a":1}]"#), r#"[{"a":1}]"#);
        assert_eq!(sanitize_json(r#"{"a":1}"#), r#"{"a":1}"#);
    }

    #[test]
    fn prose_around_array_is_removed() {
        let text = "Sure! Here are your riddles:\n[{\"a\":1},{\"b\":2}]\nEnjoy!";
        assert_eq!(sanitize_json(text), "[{\"a\":1},{\"b\":2}]");
    }

    #[test]
    fn code_fence_around_object_is_removed() {
        let text = "```json\n{\"displayText\": \"Q | H\"}\n```";
        assert_eq!(sanitize_json(text), "{\"displayText\": \"Q | H\"}");
    }

    #[test]
    fn outermost_container_wins_over_inner_brackets() {
        let text = "note {x} then [{\"a\":[1,2]}] end";
        assert_eq!(sanitize_json(text), "{x} then [{\"a\":[1,2]}]");
    }

    #[test]
    fn fences_without_brackets_are_stripped() {
        assert_eq!(sanitize_json("```json\nnull\n```"), "null");
        assert_eq!(sanitize_json("```\n42```"), "42");
    }

    #[test]
    fn empty_and_unbalanced_inputs() {
        assert_eq!(sanitize_json(""), "");
        assert_eq!(sanitize_json("] backwards ["), "] backwards [");
    }
}
