//! Pure page arithmetic backing [`crate::Paginator`]. Pages are 1-based throughout.

use std::ops::Range;

/// Number of pages needed for `item_count` items, `0` when there are no items.
pub fn total_pages(item_count: usize, page_size: usize) -> usize {
    item_count.div_ceil(page_size.max(1))
}

/// Bound `page` into `1..=max(total_pages, 1)`.
pub fn clamp_page(page: usize, total_pages: usize) -> usize {
    page.clamp(1, total_pages.max(1))
}

/// Index range of the items on `page`, truncated to `item_count`.
///
/// Pages past the end (and page `0`) produce an empty range.
pub fn page_window(item_count: usize, page_size: usize, page: usize) -> Range<usize> {
    let page_size = page_size.max(1);
    if page == 0 {
        return 0..0;
    }
    let start = (page - 1).saturating_mul(page_size).min(item_count);
    let end = start.saturating_add(page_size).min(item_count);
    start..end
}
