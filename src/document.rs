//! Text documents and their annotation store.

use serde::{Deserialize, Serialize};

use crate::{
    char_slice, AttributeContainer, DocumentError, DocumentResult, Entity, Metadata, Relation,
    Segment, Span, TextAnnotation, Uid,
};

/// Annotations of a document, kept in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnnotationContainer {
    anns: Vec<TextAnnotation>,
}

impl AnnotationContainer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an annotation.
    ///
    /// Fails if an annotation with the same uid is already present.
    pub fn add(&mut self, ann: TextAnnotation) -> DocumentResult<()> {
        if self.anns.iter().any(|a| a.uid() == ann.uid()) {
            return Err(DocumentError::DuplicateUid {
                kind: ann.kind(),
                uid: ann.uid().clone(),
            });
        }
        self.anns.push(ann);
        Ok(())
    }

    /// All annotations, filtered by label when given.
    pub fn get(&self, label: Option<&str>) -> Vec<&TextAnnotation> {
        self.anns
            .iter()
            .filter(|ann| label.map_or(true, |l| ann.label() == l))
            .collect()
    }

    pub fn get_by_id(&self, uid: &Uid) -> Option<&TextAnnotation> {
        self.anns.iter().find(|ann| ann.uid() == uid)
    }

    pub fn get_by_id_mut(&mut self, uid: &Uid) -> Option<&mut TextAnnotation> {
        self.anns.iter_mut().find(|ann| ann.uid() == uid)
    }

    /// Segments only (entities excluded), filtered by label when given.
    pub fn get_segments(&self, label: Option<&str>) -> Vec<&Segment> {
        self.anns
            .iter()
            .filter_map(|ann| match ann {
                TextAnnotation::Segment(seg) => Some(seg),
                _ => None,
            })
            .filter(|seg| label.map_or(true, |l| seg.label == l))
            .collect()
    }

    /// Entities, filtered by label when given.
    pub fn get_entities(&self, label: Option<&str>) -> Vec<&Entity> {
        self.anns
            .iter()
            .filter_map(|ann| match ann {
                TextAnnotation::Entity(ent) => Some(ent),
                _ => None,
            })
            .filter(|ent| label.map_or(true, |l| ent.label == l))
            .collect()
    }

    /// Relations, filtered by label when given.
    pub fn get_relations(&self, label: Option<&str>) -> Vec<&Relation> {
        self.anns
            .iter()
            .filter_map(|ann| match ann {
                TextAnnotation::Relation(rel) => Some(rel),
                _ => None,
            })
            .filter(|rel| label.map_or(true, |l| rel.label == l))
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TextAnnotation> {
        self.anns.iter()
    }

    pub fn len(&self) -> usize {
        self.anns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.anns.is_empty()
    }
}

/// A text with its metadata, document-level attributes and annotations.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct TextDocument {
    pub uid: Uid,
    text: String,
    #[serde(default)]
    pub metadata: Metadata,
    #[serde(default)]
    pub attrs: AttributeContainer,
    #[serde(default)]
    pub anns: AnnotationContainer,
}

impl std::fmt::Debug for TextDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextDocument")
            .field("uid", &self.uid)
            .field("text_len", &self.text_len())
            .field("attr_count", &self.attrs.len())
            .field("ann_count", &self.anns.len())
            .finish()
    }
}

impl TextDocument {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            uid: Uid::generate(),
            text: text.into(),
            metadata: Metadata::new(),
            attrs: AttributeContainer::new(),
            anns: AnnotationContainer::new(),
        }
    }

    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// Add several annotations, stopping at the first duplicate uid.
    pub fn with_anns(mut self, anns: impl IntoIterator<Item = TextAnnotation>) -> DocumentResult<Self> {
        for ann in anns {
            self.anns.add(ann)?;
        }
        Ok(self)
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Length of the text in chars.
    pub fn text_len(&self) -> usize {
        self.text.chars().count()
    }

    /// Text covered by `span`.
    pub fn slice_text(&self, span: Span) -> DocumentResult<&str> {
        char_slice(&self.text, span.start, span.end).ok_or(DocumentError::SpanOutOfBounds {
            span,
            text_len: self.text_len(),
        })
    }

    /// Serialize to a RON string.
    pub fn to_ron_string(&self) -> DocumentResult<String> {
        let config = ron::ser::PrettyConfig::new()
            .depth_limit(8)
            .separate_tuple_members(true)
            .enumerate_arrays(false);
        ron::ser::to_string_pretty(self, config).map_err(|e| DocumentError::Serialization {
            message: e.to_string(),
        })
    }

    /// Deserialize from a RON string.
    pub fn from_ron_string(s: &str) -> DocumentResult<Self> {
        ron::from_str(s).map_err(|e| DocumentError::Serialization {
            message: e.to_string(),
        })
    }
}
