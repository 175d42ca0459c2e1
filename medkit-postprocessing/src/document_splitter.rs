//! Split documents into one mini-document per segment.

use std::collections::HashMap;

use medkit::{
    Attribute, AttributeContainer, DataItemKind, Entity, OperationDescription, ProvTracer,
    Relation, Segment, Span, TextAnnotation, TextDocument, Uid,
};

use crate::{nested_segments_with_ranges, PostprocessError, PostprocessResult};

/// Turns every segment with a given label into a standalone document.
///
/// The new document text is the original text under the segment envelope.
/// Entities nested in the segment are copied over with spans rebased on
/// the new text, together with the relations linking two copied entities.
///
/// Label filters left to `None` select everything.
#[derive(Debug, Clone)]
pub struct DocumentSplitter {
    pub uid: Uid,
    pub name: String,
    pub segment_label: String,
    pub entity_labels: Option<Vec<String>>,
    pub attr_labels: Option<Vec<String>>,
    pub relation_labels: Option<Vec<String>>,
}

impl DocumentSplitter {
    pub fn new(segment_label: impl Into<String>) -> Self {
        Self {
            uid: Uid::generate(),
            name: "DocumentSplitter".to_string(),
            segment_label: segment_label.into(),
            entity_labels: None,
            attr_labels: None,
            relation_labels: None,
        }
    }

    pub fn with_entity_labels<L: Into<String>>(mut self, labels: impl IntoIterator<Item = L>) -> Self {
        self.entity_labels = Some(labels.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_attr_labels<L: Into<String>>(mut self, labels: impl IntoIterator<Item = L>) -> Self {
        self.attr_labels = Some(labels.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_relation_labels<L: Into<String>>(mut self, labels: impl IntoIterator<Item = L>) -> Self {
        self.relation_labels = Some(labels.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn description(&self) -> OperationDescription {
        OperationDescription::new(self.uid.clone(), self.name.clone(), "DocumentSplitter").with_config(
            serde_json::json!({
                "segment_label": self.segment_label,
                "entity_labels": self.entity_labels,
                "attr_labels": self.attr_labels,
                "relation_labels": self.relation_labels,
            }),
        )
    }

    /// Split `docs` into mini-documents.
    ///
    /// Output follows document order, then segment order within a document.
    pub fn run(
        &self,
        docs: &[TextDocument],
        mut prov: Option<&mut ProvTracer>,
    ) -> PostprocessResult<Vec<TextDocument>> {
        let desc = self.description();
        let mut segment_docs = Vec::new();

        for doc in docs {
            let segments = doc.anns.get_segments(Some(self.segment_label.as_str()));
            let entities = select_by_labels(self.entity_labels.as_deref(), |label| {
                doc.anns.get_entities(label)
            });
            let relations = select_by_labels(self.relation_labels.as_deref(), |label| {
                doc.anns.get_relations(label)
            });

            let nested =
                nested_segments_with_ranges(segments.iter().copied(), entities.iter().copied());
            tracing::debug!(
                doc = %doc.uid,
                segments = nested.len(),
                "splitting document"
            );

            for (segment, range, nested_entities) in nested {
                let segment_doc =
                    self.segment_doc(doc, segment, range, &nested_entities, &relations, &desc, &mut prov)?;
                segment_docs.push(segment_doc);
            }
        }

        Ok(segment_docs)
    }

    #[allow(clippy::too_many_arguments)]
    fn segment_doc(
        &self,
        doc: &TextDocument,
        segment: &Segment,
        range: Span,
        entities: &[&Entity],
        relations: &[&Relation],
        desc: &OperationDescription,
        prov: &mut Option<&mut ProvTracer>,
    ) -> PostprocessResult<TextDocument> {
        let text = doc.slice_text(range)?;

        let mut metadata = doc.metadata.clone();
        metadata.extend(segment.metadata.iter().map(|(k, v)| (k.clone(), v.clone())));

        let mut segment_doc = TextDocument::new(text).with_metadata(metadata);
        trace(prov, &segment_doc.uid, DataItemKind::Document, desc, &segment.uid);

        self.copy_attrs(&segment.attrs, &mut segment_doc.attrs, desc, prov)?;

        let mut uid_mapping: HashMap<&Uid, Uid> = HashMap::new();
        for ent in entities {
            let spans = ent
                .spans
                .iter()
                .map(|span| span.rebased(range.start))
                .collect::<Option<Vec<_>>>()
                .ok_or_else(|| PostprocessError::SpanOutsideSegment {
                    entity: ent.uid.clone(),
                    segment: segment.uid.clone(),
                })?;

            let mut relocated = Entity::new(ent.label.clone(), spans, ent.text.clone())
                .with_metadata(ent.metadata.clone());
            uid_mapping.insert(&ent.uid, relocated.uid.clone());
            trace(prov, &relocated.uid, DataItemKind::Entity, desc, &ent.uid);

            self.copy_attrs(&ent.attrs, &mut relocated.attrs, desc, prov)?;
            segment_doc.anns.add(TextAnnotation::Entity(relocated))?;
        }

        // only relations between two copied entities survive
        for rel in relations {
            let (Some(source_id), Some(target_id)) =
                (uid_mapping.get(&rel.source_id), uid_mapping.get(&rel.target_id))
            else {
                continue;
            };

            let mut relation = Relation::new(rel.label.clone(), source_id.clone(), target_id.clone());
            relation.metadata = rel.metadata.clone();
            trace(prov, &relation.uid, DataItemKind::Relation, desc, &rel.uid);

            self.copy_attrs(&rel.attrs, &mut relation.attrs, desc, prov)?;
            segment_doc.anns.add(TextAnnotation::Relation(relation))?;
        }

        Ok(segment_doc)
    }

    fn copy_attrs(
        &self,
        from: &AttributeContainer,
        to: &mut AttributeContainer,
        desc: &OperationDescription,
        prov: &mut Option<&mut ProvTracer>,
    ) -> PostprocessResult<()> {
        let attrs: Vec<&Attribute> = select_by_labels(self.attr_labels.as_deref(), |label| from.get(label));
        for attr in attrs {
            let copy = attr.copy();
            trace(prov, &copy.uid, DataItemKind::Attribute, desc, &attr.uid);
            to.add(copy)?;
        }
        Ok(())
    }
}

/// Everything when `labels` is `None`, otherwise the items of each label in
/// label order.
fn select_by_labels<'a, T, F>(labels: Option<&[String]>, get: F) -> Vec<&'a T>
where
    F: Fn(Option<&str>) -> Vec<&'a T>,
{
    match labels {
        None => get(None),
        Some(labels) => labels.iter().flat_map(|label| get(Some(label.as_str()))).collect(),
    }
}

pub(crate) fn trace(
    prov: &mut Option<&mut ProvTracer>,
    item: &Uid,
    kind: DataItemKind,
    desc: &OperationDescription,
    source: &Uid,
) {
    if let Some(tracer) = prov.as_deref_mut() {
        tracer.add_prov(item, kind, desc, &[source]);
    }
}
