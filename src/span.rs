//! Character spans over document text.
//!
//! Offsets count Unicode scalar values (chars), not bytes. A segment may
//! carry a mix of plain [`Span`]s and [`ModifiedSpan`]s; the latter appear
//! when the annotation text was produced by a normalization or redaction
//! step and no longer maps one-to-one onto the original text.

use serde::{Deserialize, Serialize};

/// Half-open interval `[start, end)` of char offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    /// True if both spans share at least one char.
    pub fn overlaps(&self, other: &Span) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// True if `other` lies entirely within `self` (boundaries inclusive).
    pub fn contains(&self, other: &Span) -> bool {
        other.start >= self.start && other.end <= self.end
    }

    /// Move the span to the left by `offset` chars.
    ///
    /// Returns `None` if the span starts before `offset`.
    pub fn rebased(&self, offset: usize) -> Option<Span> {
        Some(Span {
            start: self.start.checked_sub(offset)?,
            end: self.end.checked_sub(offset)?,
        })
    }
}

impl std::fmt::Display for Span {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}

/// Span of annotation text that replaced some original spans.
///
/// `length` is the length of the replacement text; `replaced_spans` are the
/// spans of the original text it stands for (possibly none for a pure
/// insertion).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ModifiedSpan {
    pub length: usize,
    pub replaced_spans: Vec<Span>,
}

impl ModifiedSpan {
    pub fn new(length: usize, replaced_spans: Vec<Span>) -> Self {
        Self {
            length,
            replaced_spans,
        }
    }
}

/// Either kind of span.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnySpan {
    Span(Span),
    Modified(ModifiedSpan),
}

impl AnySpan {
    /// Length of the annotation text covered by this span.
    pub fn len(&self) -> usize {
        match self {
            AnySpan::Span(span) => span.len(),
            AnySpan::Modified(modified) => modified.length,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Move every original-text offset to the left by `offset` chars.
    ///
    /// For a modified span every replaced sub-span is moved and the
    /// replacement length is kept.
    pub fn rebased(&self, offset: usize) -> Option<AnySpan> {
        match self {
            AnySpan::Span(span) => span.rebased(offset).map(AnySpan::Span),
            AnySpan::Modified(modified) => {
                let replaced_spans = modified
                    .replaced_spans
                    .iter()
                    .map(|span| span.rebased(offset))
                    .collect::<Option<Vec<_>>>()?;
                Some(AnySpan::Modified(ModifiedSpan {
                    length: modified.length,
                    replaced_spans,
                }))
            }
        }
    }
}

impl From<Span> for AnySpan {
    fn from(span: Span) -> Self {
        AnySpan::Span(span)
    }
}

impl From<ModifiedSpan> for AnySpan {
    fn from(span: ModifiedSpan) -> Self {
        AnySpan::Modified(span)
    }
}

/// Collapse a span list into sorted, non-overlapping original-text spans.
///
/// Modified spans are replaced by the spans they stand for, then
/// overlapping or contiguous spans are merged.
pub fn normalize_spans(spans: &[AnySpan]) -> Vec<Span> {
    let mut flat: Vec<Span> = spans
        .iter()
        .flat_map(|span| match span {
            AnySpan::Span(span) => std::slice::from_ref(span).iter().copied(),
            AnySpan::Modified(modified) => modified.replaced_spans.iter().copied(),
        })
        .collect();
    flat.sort();

    let mut normalized: Vec<Span> = Vec::with_capacity(flat.len());
    for span in flat {
        match normalized.last_mut() {
            Some(last) if span.start <= last.end => {
                last.end = last.end.max(span.end);
            }
            _ => normalized.push(span),
        }
    }
    normalized
}

/// Range `[first.start, last.end)` covered by the normalized spans.
///
/// Returns `None` when nothing remains after normalization.
pub fn envelope(spans: &[AnySpan]) -> Option<Span> {
    let normalized = normalize_spans(spans);
    let first = normalized.first()?;
    let last = normalized.last()?;
    Some(Span::new(first.start, last.end))
}

/// Slice `text` by char offsets.
pub fn char_slice(text: &str, start: usize, end: usize) -> Option<&str> {
    if start > end {
        return None;
    }
    let byte_start = char_to_byte(text, start)?;
    let byte_end = char_to_byte(text, end)?;
    text.get(byte_start..byte_end)
}

fn char_to_byte(text: &str, char_idx: usize) -> Option<usize> {
    if char_idx == 0 {
        return Some(0);
    }
    match text.char_indices().nth(char_idx) {
        Some((byte_idx, _)) => Some(byte_idx),
        None if text.chars().count() == char_idx => Some(text.len()),
        None => None,
    }
}
