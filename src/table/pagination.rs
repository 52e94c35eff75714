//! Page arithmetic over the filtered view.
//!
//! Pages are 1-based. A view with zero rows has zero pages, but the current
//! page number never drops below 1.

use std::ops::RangeInclusive;

/// Default number of rows per page.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Number of pages needed for `total` rows.
pub fn page_count(total: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    total.div_ceil(page_size)
}

/// The rows shown on `page`: `[(page - 1) * size, page * size)` clipped to the view.
pub fn page_slice<T>(items: &[T], page: usize, page_size: usize) -> &[T] {
    if page == 0 || page_size == 0 {
        return &[];
    }
    let start = (page - 1).saturating_mul(page_size);
    if start >= items.len() {
        return &[];
    }
    let end = start.saturating_add(page_size).min(items.len());
    &items[start..end]
}

/// Clamp a page number into `[1, max(1, page_count)]`.
pub fn clamp_page(page: usize, total: usize, page_size: usize) -> usize {
    let last = page_count(total, page_size).max(1);
    page.clamp(1, last)
}

/// Page numbers to show in a navigator at most `max_visible` wide.
///
/// The window is centered on the current page where possible. Returns an
/// empty range when there are no pages.
pub fn page_window(current: usize, count: usize, max_visible: usize) -> RangeInclusive<usize> {
    if count == 0 || max_visible == 0 {
        return 1..=0;
    }
    if count <= max_visible {
        return 1..=count;
    }

    let current = current.clamp(1, count);
    let half = max_visible / 2;
    let start = current.saturating_sub(half).max(1);
    let start = start.min(count - max_visible + 1);
    start..=start + max_visible - 1
}
