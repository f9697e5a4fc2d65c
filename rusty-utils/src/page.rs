//! Zero-based page math for list-backed menus.

use std::ops::Range;

/// Number of pages needed to show `item_count` items, at least one.
pub fn page_count(item_count: usize, per_page: usize) -> usize {
    item_count.div_ceil(per_page.max(1)).max(1)
}

/// Item range covered by page `index`, or `None` past the last page.
///
/// An empty list still has one (empty) first page.
pub fn page_bounds(item_count: usize, per_page: usize, index: usize) -> Option<Range<usize>> {
    if index >= page_count(item_count, per_page) {
        return None;
    }

    let per_page = per_page.max(1);
    let start = index.saturating_mul(per_page).min(item_count);
    let end = start.saturating_add(per_page).min(item_count);
    Some(start..end)
}

/// Parse a one-based page argument typed by a user into a zero-based index.
///
/// A missing argument means the first page; `0` and non-numbers are rejected.
pub fn parse_page_argument(raw: Option<&str>) -> Option<usize> {
    match raw {
        Some(value) => value
            .trim()
            .parse::<usize>()
            .ok()
            .and_then(|page| page.checked_sub(1)),
        None => Some(0),
    }
}

/// Render items as a markdown bullet list.
pub fn bulleted(items: &[String]) -> String {
    items
        .iter()
        .map(|item| format!("- {item}"))
        .collect::<Vec<_>>()
        .join("\n")
}
