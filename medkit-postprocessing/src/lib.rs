//! Post-processing operations over medkit annotations.
//!
//! - [`compute_nested_segments`] pairs enclosing segments with the segments
//!   nested inside them, backed by [`NestedSegmentIndex`].
//! - [`DocumentSplitter`] turns segments into standalone documents.
//! - [`AttributeDuplicator`] propagates attributes from enclosing segments
//!   to nested ones.
//!
//! Operations take an optional [`medkit::ProvTracer`] to record where each
//! derived item comes from.

mod alignment;
mod attribute_duplicator;
mod document_splitter;
mod errors;

pub use alignment::{
    compute_nested_segments, nested_indices, nested_segments_with_ranges, NestedSegmentIndex,
};
pub use attribute_duplicator::AttributeDuplicator;
pub use document_splitter::DocumentSplitter;
pub use errors::{PostprocessError, PostprocessResult};
