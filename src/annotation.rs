//! Text annotations: segments, entities and relations.

use serde::{Deserialize, Serialize};

use crate::{normalize_spans, AnySpan, Attribute, AttributeContainer, DocumentResult, Metadata, Span, Uid};

/// Anything that covers text through a list of spans.
pub trait Spanned {
    fn spans(&self) -> &[AnySpan];

    /// Sorted, non-overlapping original-text spans.
    fn normalized_spans(&self) -> Vec<Span> {
        normalize_spans(self.spans())
    }
}

/// A labelled zone of text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub uid: Uid,
    pub label: String,
    pub spans: Vec<AnySpan>,
    pub text: String,
    #[serde(default)]
    pub attrs: AttributeContainer,
    #[serde(default)]
    pub metadata: Metadata,
}

/// Entities share the segment layout; the annotation container files them
/// separately.
pub type Entity = Segment;

impl Segment {
    pub fn new(label: impl Into<String>, spans: Vec<AnySpan>, text: impl Into<String>) -> Self {
        Self {
            uid: Uid::generate(),
            label: label.into(),
            spans,
            text: text.into(),
            attrs: AttributeContainer::new(),
            metadata: Metadata::new(),
        }
    }

    /// Shorthand for a segment made of one plain span.
    pub fn from_span(label: impl Into<String>, span: Span, text: impl Into<String>) -> Self {
        Self::new(label, vec![AnySpan::Span(span)], text)
    }

    pub fn with_uid(mut self, uid: impl Into<Uid>) -> Self {
        self.uid = uid.into();
        self
    }

    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn with_attr(mut self, attr: Attribute) -> DocumentResult<Self> {
        self.attrs.add(attr)?;
        Ok(self)
    }
}

impl Spanned for Segment {
    fn spans(&self) -> &[AnySpan] {
        &self.spans
    }
}

/// A labelled, directed link between two entities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relation {
    pub uid: Uid,
    pub label: String,
    pub source_id: Uid,
    pub target_id: Uid,
    #[serde(default)]
    pub attrs: AttributeContainer,
    #[serde(default)]
    pub metadata: Metadata,
}

impl Relation {
    pub fn new(label: impl Into<String>, source_id: Uid, target_id: Uid) -> Self {
        Self {
            uid: Uid::generate(),
            label: label.into(),
            source_id,
            target_id,
            attrs: AttributeContainer::new(),
            metadata: Metadata::new(),
        }
    }

    pub fn with_uid(mut self, uid: impl Into<Uid>) -> Self {
        self.uid = uid.into();
        self
    }
}

/// Any annotation stored in a document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TextAnnotation {
    Segment(Segment),
    Entity(Entity),
    Relation(Relation),
}

impl TextAnnotation {
    pub fn uid(&self) -> &Uid {
        match self {
            TextAnnotation::Segment(seg) | TextAnnotation::Entity(seg) => &seg.uid,
            TextAnnotation::Relation(rel) => &rel.uid,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            TextAnnotation::Segment(seg) | TextAnnotation::Entity(seg) => &seg.label,
            TextAnnotation::Relation(rel) => &rel.label,
        }
    }

    pub fn attrs(&self) -> &AttributeContainer {
        match self {
            TextAnnotation::Segment(seg) | TextAnnotation::Entity(seg) => &seg.attrs,
            TextAnnotation::Relation(rel) => &rel.attrs,
        }
    }

    pub fn attrs_mut(&mut self) -> &mut AttributeContainer {
        match self {
            TextAnnotation::Segment(seg) | TextAnnotation::Entity(seg) => &mut seg.attrs,
            TextAnnotation::Relation(rel) => &mut rel.attrs,
        }
    }

    /// Name of the annotation kind, for messages.
    pub fn kind(&self) -> &'static str {
        match self {
            TextAnnotation::Segment(_) => "segment",
            TextAnnotation::Entity(_) => "entity",
            TextAnnotation::Relation(_) => "relation",
        }
    }
}
