// SPDX-FileCopyrightText: 2026 Quizfeed Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Pure view projection over the stored item set.

use std::cmp::Reverse;

use quizfeed_core::{ContentItem, LifecycleStatus};

/// Pseudo-category meaning "no category filter".
pub const ALL_CATEGORIES: &str = "All";

/// Maps a user-facing category choice to a filter; `All` and blank mean none.
pub fn category_filter(label: Option<&str>) -> Option<&str> {
    label
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.eq_ignore_ascii_case(ALL_CATEGORIES))
}

/// Derives the displayed slice of `all`.
///
/// Keeps items whose status equals `status`. The category filter applies to
/// the active view only; the archived view always spans every category.
/// Output is newest first, ties keeping their input order.
pub fn project(
    all: &[ContentItem],
    status: LifecycleStatus,
    category: Option<&str>,
) -> Vec<ContentItem> {
    let category = match status {
        LifecycleStatus::Active => category,
        LifecycleStatus::Archived => None,
    };

    let mut view: Vec<ContentItem> = all
        .iter()
        .filter(|item| item.lifecycle_status == status)
        .filter(|item| category.is_none_or(|c| item.category == c))
        .cloned()
        .collect();
    view.sort_by_key(|item| Reverse(item.created_at));
    view
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn item(id: &str, category: &str, status: LifecycleStatus, created_at: i64) -> ContentItem {
        ContentItem {
            id: id.to_string(),
            prompt: "Q?".to_string(),
            hook: None,
            explanation: String::new(),
            solution: String::new(),
            category: category.to_string(),
            style_hint: String::new(),
            generated_image: None,
            created_at,
            lifecycle_status: status,
        }
    }

    fn ids(view: &[ContentItem]) -> Vec<&str> {
        view.iter().map(|i| i.id.as_str()).collect()
    }

    #[test]
    fn active_view_filters_status_and_category_newest_first() {
        let all = vec![
            item("old", "Logic & Math", LifecycleStatus::Active, 100),
            item("new", "Logic & Math", LifecycleStatus::Active, 300),
            item("other", "Pop Culture", LifecycleStatus::Active, 200),
            item("hidden", "Logic & Math", LifecycleStatus::Archived, 400),
        ];
        assert_eq!(
            ids(&project(&all, LifecycleStatus::Active, Some("Logic & Math"))),
            ["new", "old"]
        );
        assert_eq!(
            ids(&project(&all, LifecycleStatus::Active, None)),
            ["new", "other", "old"]
        );
    }

    #[test]
    fn archived_view_ignores_category_filter() {
        let all = vec![
            item("a", "Logic & Math", LifecycleStatus::Archived, 1),
            item("b", "Pop Culture", LifecycleStatus::Archived, 2),
            item("c", "Pop Culture", LifecycleStatus::Active, 3),
        ];
        assert_eq!(
            ids(&project(&all, LifecycleStatus::Archived, Some("Logic & Math"))),
            ["b", "a"]
        );
    }

    #[test]
    fn ties_keep_input_order() {
        let all = vec![
            item("first", "C", LifecycleStatus::Active, 5),
            item("second", "C", LifecycleStatus::Active, 5),
            item("third", "C", LifecycleStatus::Active, 5),
        ];
        assert_eq!(
            ids(&project(&all, LifecycleStatus::Active, None)),
            ["first", "second", "third"]
        );
    }

    #[test]
    fn after_upsert_scenario_only_b_is_active() {
        let all = vec![
            item("a", "C", LifecycleStatus::Archived, 100),
            item("b", "C", LifecycleStatus::Active, 200),
        ];
        assert_eq!(ids(&project(&all, LifecycleStatus::Active, None)), ["b"]);
    }

    #[test]
    fn category_filter_treats_all_as_none() {
        assert_eq!(category_filter(Some("All")), None);
        assert_eq!(category_filter(Some("  ")), None);
        assert_eq!(category_filter(None), None);
        assert_eq!(category_filter(Some("Psychology")), Some("Psychology"));
    }

    fn arb_item() -> impl Strategy<Value = ContentItem> {
        (
            "[a-z]{1,6}",
            prop::sample::select(vec!["Logic & Math", "Pop Culture", "Psychology"]),
            prop::bool::ANY,
            0i64..50,
        )
            .prop_map(|(id, category, archived, created_at)| {
                let status = if archived {
                    LifecycleStatus::Archived
                } else {
                    LifecycleStatus::Active
                };
                item(&id, category, status, created_at)
            })
    }

    proptest! {
        #[test]
        fn active_category_view_never_leaks(all in prop::collection::vec(arb_item(), 0..40)) {
            let view = project(&all, LifecycleStatus::Active, Some("Logic & Math"));
            for it in &view {
                prop_assert_eq!(it.lifecycle_status, LifecycleStatus::Active);
                prop_assert_eq!(it.category.as_str(), "Logic & Math");
            }
            let expected = all
                .iter()
                .filter(|i| i.is_active() && i.category == "Logic & Math")
                .count();
            prop_assert_eq!(view.len(), expected);
        }

        #[test]
        fn projection_is_sorted_and_repeatable(all in prop::collection::vec(arb_item(), 0..40)) {
            let first = project(&all, LifecycleStatus::Archived, None);
            prop_assert!(first.windows(2).all(|w| w[0].created_at >= w[1].created_at));
            prop_assert!(first.iter().all(|i| !i.is_active()));
            prop_assert_eq!(first, project(&all, LifecycleStatus::Archived, None));
        }
    }
}
