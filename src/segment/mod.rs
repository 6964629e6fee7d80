//! Deterministic transcript segmentation
//!
//! Splits raw text into ordered, bounded-size segments, preferring sentence
//! boundaries, then whitespace, then a hard cut. Pure functions, no I/O.

use crate::{RecapError, Result};

/// A bounded-length contiguous slice of the input transcript.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    /// Byte offset of the trimmed text in the original transcript
    pub start: usize,

    /// Byte offset one past the trimmed text (half-open range)
    pub end: usize,

    /// The trimmed segment text; equals `&transcript[start..end]`
    pub text: String,
}

/// Split a transcript into segments of at most `max_characters` characters,
/// preferring to cut after sentence-ending punctuation, then at whitespace,
/// and only as a last resort mid-token at the hard limit.
///
/// The budget counts characters, not bytes; cuts always land on char
/// boundaries. An empty transcript produces zero segments.
pub fn segment(text: &str, max_characters: usize) -> Result<Vec<Segment>> {
    if max_characters == 0 {
        return Err(RecapError::Config(
            "max_characters must be positive".to_string(),
        ));
    }

    let mut segments = Vec::new();
    let mut start = 0;

    while start < text.len() {
        // None means the remaining suffix fits within the budget.
        let Some(limit) = window_boundary(text, start, max_characters) else {
            push_trimmed(text, start, text.len(), &mut segments);
            break;
        };

        // A cut equal to `start` would make no progress; treat it as
        // not-found and fall through to the next strategy.
        let cut = find_sentence_cut(text, start, limit)
            .or_else(|| find_whitespace_cut(text, start, limit))
            .unwrap_or(limit);

        push_trimmed(text, start, cut, &mut segments);
        start = cut;
    }

    Ok(segments)
}

/// Split a transcript into fixed-size windows by pure arithmetic, with no
/// boundary preference and no trimming. Produces `ceil(chars / max)` chunks.
pub fn segment_fixed(text: &str, max_characters: usize) -> Result<Vec<Segment>> {
    if max_characters == 0 {
        return Err(RecapError::Config(
            "max_characters must be positive".to_string(),
        ));
    }

    let mut segments = Vec::new();
    let mut start = 0;

    while start < text.len() {
        let end = window_boundary(text, start, max_characters).unwrap_or(text.len());
        segments.push(Segment {
            start,
            end,
            text: text[start..end].to_string(),
        });
        start = end;
    }

    Ok(segments)
}

/// Byte offset just past `max_chars` characters from `start`, or None if the
/// remaining suffix holds at most `max_chars` characters.
fn window_boundary(text: &str, start: usize, max_chars: usize) -> Option<usize> {
    let mut seen = 0;
    for (i, _) in text[start..].char_indices() {
        if seen == max_chars {
            return Some(start + i);
        }
        seen += 1;
    }
    None
}

/// Byte offset just past the last sentence end (`.`, `!` or `?` followed by
/// whitespace) inside `[start, limit)`, if one exists beyond `start`.
fn find_sentence_cut(text: &str, start: usize, limit: usize) -> Option<usize> {
    let window = &text[start..limit];
    let mut last = None;

    let mut chars = window.char_indices().peekable();
    while let Some((_, c)) = chars.next() {
        if matches!(c, '.' | '!' | '?') {
            if let Some(&(j, next)) = chars.peek() {
                if next.is_whitespace() {
                    last = Some(start + j + next.len_utf8());
                }
            }
        }
    }

    last.filter(|&cut| cut > start)
}

/// Byte offset of the last whitespace character inside `[start, limit)`, if
/// one exists beyond `start`. The whitespace itself is left to the next
/// segment and trimmed there.
fn find_whitespace_cut(text: &str, start: usize, limit: usize) -> Option<usize> {
    text[start..limit]
        .char_indices()
        .filter(|(_, c)| c.is_whitespace())
        .next_back()
        .map(|(i, _)| start + i)
        .filter(|&cut| cut > start)
}

/// Trim `text[start..end]` and append it as a segment, recording the byte
/// range of the trimmed text. All-whitespace slices are skipped.
fn push_trimmed(text: &str, start: usize, end: usize, out: &mut Vec<Segment>) {
    let slice = &text[start..end];
    let trimmed = slice.trim();
    if trimmed.is_empty() {
        return;
    }

    let lead = slice.len() - slice.trim_start().len();
    let trimmed_start = start + lead;
    out.push(Segment {
        start: trimmed_start,
        end: trimmed_start + trimmed.len(),
        text: trimmed.to_string(),
    });
}
