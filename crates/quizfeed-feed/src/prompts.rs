// SPDX-FileCopyrightText: 2026 Quizfeed Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Prompt builders for the generation and image collaborators.
//!
//! Each builder mixes in a random seed so repeated requests do not return
//! the same content.

use rand::Rng;

/// Instruction sent with every generation request.
pub const SYSTEM_INSTRUCTION: &str = "You generate short, shareable quiz and riddle posts.
Return JSON only. Each record has:
- displayText: \"Question | Hook\", the puzzle followed by a one-line engagement hook.
- explanation: two or three sentences of context explaining why people get it wrong.
- solution: the answer with brief step-by-step reasoning.
- category: one of Logic & Math, Science & Tech, General Knowledge, Language & Literature, Pop Culture, The Arts, Nature & Animals, Psychology.
- styleHint: a two-word visual aesthetic for a background image, such as \"Minimalist Slate\".
Facts must be verifiable.";

/// Extra instruction for batch requests.
pub const BATCH_ADDENDUM: &str = "Avoid well-known internet riddles.";

const VARIETY: [&str; 6] = [
    "obscure",
    "advanced",
    "rare",
    "lateral-thinking",
    "deceptive",
    "mind-bending",
];

fn seed() -> u32 {
    rand::thread_rng().gen_range(0..1_000_000)
}

/// System instruction for batch fetches.
pub fn batch_instruction() -> String {
    format!("{SYSTEM_INSTRUCTION}\n{BATCH_ADDENDUM}")
}

/// The daily mixed feed.
pub fn today(count: u32) -> String {
    format!(
        "Generate {count} varied posts mixing logic puzzles and dilemmas. [Seed: {}]",
        seed()
    )
}

/// Posts for one category; `more` asks for less familiar variations.
pub fn category(category: &str, count: u32, more: bool) -> String {
    let seed = seed();
    let keyword = VARIETY[seed as usize % VARIETY.len()];
    let extra = if more {
        " Do not repeat standard content; prefer the least familiar variations."
    } else {
        ""
    };
    format!("Generate {count} posts for the '{category}' category. Focus on {keyword} logic.{extra} [Seed: {seed}]")
}

/// A fresh mixed batch for pull-to-refresh.
pub fn refresh(count: u32) -> String {
    format!(
        "Generate {count} new, unique challenges mixing math, logic, riddles and would-you-rather dilemmas. [Seed: {}-{}]",
        quizfeed_core::types::now_millis(),
        seed()
    )
}

/// One post built around the user's own request.
pub fn custom(request: &str) -> String {
    format!("Generate 1 post based on this request: \"{}\". Make it unique.", request.trim())
}

/// Description handed to the image collaborator for an item's background.
pub fn image_description(category: &str, style_hint: &str) -> String {
    format!(
        "Social media background graphic for a riddle app. Topic: {category}. Vibe: {style_hint}. Abstract, no text."
    )
}
