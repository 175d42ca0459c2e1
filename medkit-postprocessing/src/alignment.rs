//! Nested-segment alignment: which targets lie inside which sources.
//!
//! Each target is indexed by the envelope of its normalized spans,
//! `[first.start, last.end)`. A target is nested in a source when that
//! envelope lies within the source envelope, boundaries included. A
//! zero-width target `[p, p)` follows the same rule and is nested iff
//! `source.start <= p <= source.end`.

use medkit::{Span, Spanned};

#[derive(Debug, Clone, Copy)]
struct IndexEntry {
    range: Span,
    position: usize,
}

/// Interval index over targets, built once and queried per source.
///
/// Entries are sorted by `(start, end)`; a query binary-searches the first
/// entry starting at or after the query start and scans while entries start
/// before the query end. Overlapping and duplicate intervals are all kept.
#[derive(Debug)]
pub struct NestedSegmentIndex<'a, T> {
    entries: Vec<IndexEntry>,
    targets: Vec<&'a T>,
}

impl<'a, T: Spanned> NestedSegmentIndex<'a, T> {
    /// Index every target that has at least one normalized span.
    pub fn new(targets: impl IntoIterator<Item = &'a T>) -> Self {
        let targets: Vec<&'a T> = targets.into_iter().collect();
        let mut entries: Vec<IndexEntry> = targets
            .iter()
            .enumerate()
            .filter_map(|(position, target)| {
                let spans = target.normalized_spans();
                let first = spans.first()?;
                let last = spans.last()?;
                Some(IndexEntry {
                    range: Span::new(first.start, last.end),
                    position,
                })
            })
            .collect();
        entries.sort_by_key(|entry| (entry.range, entry.position));

        Self { entries, targets }
    }

    /// Input positions of the targets enclosed by `range`, ascending.
    pub fn enclosed_positions(&self, range: Span) -> Vec<usize> {
        let first = self
            .entries
            .partition_point(|entry| entry.range.start < range.start);

        let mut positions: Vec<usize> = self.entries[first..]
            .iter()
            .take_while(|entry| entry.range.start <= range.end)
            .filter(|entry| entry.range.end <= range.end)
            .map(|entry| entry.position)
            .collect();
        positions.sort_unstable();
        positions
    }

    /// Targets enclosed by `range`, in target input order.
    pub fn enclosed_by(&self, range: Span) -> Vec<&'a T> {
        self.enclosed_positions(range)
            .into_iter()
            .map(|position| self.targets[position])
            .collect()
    }

    /// Number of indexed targets (targets without spans are not counted).
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Envelope of a source, or `None` when it has no normalized spans.
fn source_range<S: Spanned>(source: &S) -> Option<Span> {
    let spans = source.normalized_spans();
    Some(Span::new(spans.first()?.start, spans.last()?.end))
}

/// Pair every source with the targets nested inside it.
///
/// Sources come out in input order, each with its (possibly empty) list of
/// targets in target input order. Sources without normalized spans are
/// left out.
pub fn compute_nested_segments<'a, S, T>(
    sources: impl IntoIterator<Item = &'a S>,
    targets: impl IntoIterator<Item = &'a T>,
) -> Vec<(&'a S, Vec<&'a T>)>
where
    S: Spanned + 'a,
    T: Spanned + 'a,
{
    nested_segments_with_ranges(sources, targets)
        .into_iter()
        .map(|(source, _, nested)| (source, nested))
        .collect()
}

/// [`compute_nested_segments`], also returning the envelope each source was
/// queried with.
pub fn nested_segments_with_ranges<'a, S, T>(
    sources: impl IntoIterator<Item = &'a S>,
    targets: impl IntoIterator<Item = &'a T>,
) -> Vec<(&'a S, Span, Vec<&'a T>)>
where
    S: Spanned + 'a,
    T: Spanned + 'a,
{
    let index = NestedSegmentIndex::new(targets);
    sources
        .into_iter()
        .filter_map(|source| {
            let range = source_range(source)?;
            Some((source, range, index.enclosed_by(range)))
        })
        .collect()
}

/// Same pairing as [`compute_nested_segments`], by slice position.
///
/// Useful when the targets have to be mutated afterwards.
pub fn nested_indices<S: Spanned, T: Spanned>(
    sources: &[S],
    targets: &[T],
) -> Vec<(usize, Vec<usize>)> {
    let index = NestedSegmentIndex::new(targets);
    sources
        .iter()
        .enumerate()
        .filter_map(|(position, source)| {
            let range = source_range(source)?;
            Some((position, index.enclosed_positions(range)))
        })
        .collect()
}
