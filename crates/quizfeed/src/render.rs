// SPDX-FileCopyrightText: 2026 Quizfeed Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Terminal rendering of feed items.

use colored::Colorize;

use quizfeed_core::{ContentItem, LifecycleStatus};

/// One item as a multi-line block.
pub fn item_block(item: &ContentItem) -> String {
    let mut out = String::new();
    let marker = match item.lifecycle_status {
        LifecycleStatus::Active => String::new(),
        LifecycleStatus::Archived => format!(" {}", "[archived]".dimmed()),
    };
    out.push_str(&format!(
        "{} {}{}\n",
        item.id.dimmed(),
        format!("[{}]", item.category).cyan(),
        marker
    ));
    out.push_str(&format!("  {}\n", item.prompt.bold()));
    if let Some(hook) = &item.hook {
        out.push_str(&format!("  {}\n", hook.italic()));
    }
    if !item.explanation.is_empty() {
        out.push_str(&format!("  {}\n", item.explanation));
    }
    if !item.solution.is_empty() {
        out.push_str(&format!("  {} {}\n", "Answer:".green(), item.solution));
    }
    if item.generated_image.is_some() {
        out.push_str(&format!("  {}\n", "(image attached)".dimmed()));
    }
    out
}

/// The whole view, or a hint when it is empty.
pub fn feed(items: &[ContentItem]) -> String {
    if items.is_empty() {
        return "No items. Run `quizfeed fetch` to get some.\n".to_string();
    }
    items
        .iter()
        .map(item_block)
        .collect::<Vec<_>>()
        .join("\n")
}
