//! Query match highlighting for table cells.

use std::ops::Range;

use ratatui::text::{Line, Span};

use crate::ui::theme::theme;

/// Lowercase `text`, recording for every byte of the result the byte range
/// of the original character it came from.
fn lowercase_with_origins(text: &str) -> (String, Vec<Range<usize>>) {
    let mut lower = String::with_capacity(text.len());
    let mut origins = Vec::with_capacity(text.len());
    for (start, c) in text.char_indices() {
        let origin = start..start + c.len_utf8();
        for lc in c.to_lowercase() {
            lower.push(lc);
            origins.extend(std::iter::repeat(origin.clone()).take(lc.len_utf8()));
        }
    }
    (lower, origins)
}

/// Highlight case-insensitive occurrences of `query` in `text`.
///
/// Matches are found in the lowercase form and mapped back to whole
/// characters of `text`, so letters whose lowercase form has a different
/// length keep the original casing.
pub fn highlight_text(text: &str, query: &str) -> Line<'static> {
    if query.is_empty() {
        return Line::from(text.to_string());
    }

    let (text_lower, origins) = lowercase_with_origins(text);
    let query_lower = query.to_lowercase();
    if query_lower.is_empty() {
        return Line::from(text.to_string());
    }

    let match_style = theme().match_highlight();
    let mut spans = Vec::new();
    let mut last_end = 0;

    for (start, matched) in text_lower.match_indices(&query_lower) {
        let end = start + matched.len();
        // A match starting inside one character's expansion covers all of it.
        let orig_start = origins[start].start.max(last_end);
        let orig_end = origins[end - 1].end;
        if orig_start >= orig_end {
            continue;
        }
        if orig_start > last_end {
            spans.push(Span::raw(text[last_end..orig_start].to_string()));
        }
        spans.push(Span::styled(text[orig_start..orig_end].to_string(), match_style));
        last_end = orig_end;
    }

    if spans.is_empty() {
        return Line::from(text.to_string());
    }
    if last_end < text.len() {
        spans.push(Span::raw(text[last_end..].to_string()));
    }
    Line::from(spans)
}
