//! Text annotation data model for medical NLP.
//!
//! This crate holds the documents that the `medkit-*` crates operate on:
//! char-offset spans, attributes, segments/entities/relations, text
//! documents, and a provenance tracer recording how derived items were
//! produced.
//!
//! ## Core Types
//!
//! - [`Span`] / [`ModifiedSpan`] / [`AnySpan`] - Positions within a text
//! - [`Attribute`] - Labelled values with fresh-identity copies
//! - [`Segment`] / [`Entity`] / [`Relation`] - Annotations
//! - [`TextDocument`] - Text plus annotations
//! - [`ProvTracer`] - Append-only provenance log
//!
//! ## Example
//!
//! ```
//! use medkit::{Segment, Span, TextAnnotation, TextDocument};
//!
//! let entity = Segment::from_span("ORG", Span::new(4, 10), "medkit");
//! let doc = TextDocument::new("The medkit library")
//!     .with_anns(vec![TextAnnotation::Entity(entity)])
//!     .unwrap();
//!
//! assert_eq!(doc.anns.get_entities(Some("ORG")).len(), 1);
//! assert_eq!(doc.slice_text(Span::new(4, 10)).unwrap(), "medkit");
//! ```

use std::collections::BTreeMap;

mod annotation;
mod attribute;
mod display;
mod document;
mod errors;
mod prov;
mod span;
mod uid;

/// Opaque key-value bag attached to documents and annotations.
pub type Metadata = BTreeMap<String, serde_json::Value>;

pub use annotation::{Entity, Relation, Segment, Spanned, TextAnnotation};
pub use attribute::{Attribute, AttributeContainer, AttributeValue};
pub use display::DocumentDisplay;
pub use document::{AnnotationContainer, TextDocument};
pub use errors::{DocumentError, DocumentResult};
pub use prov::{DataItemKind, OperationDescription, Prov, ProvTracer};
pub use span::{char_slice, envelope, normalize_spans, AnySpan, ModifiedSpan, Span};
pub use uid::Uid;
