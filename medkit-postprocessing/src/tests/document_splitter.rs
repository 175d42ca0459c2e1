use medkit::{
    AnySpan, Attribute, DataItemKind, Entity, Metadata, ModifiedSpan, ProvTracer, Relation,
    Segment, Span, Spanned, TextAnnotation, TextDocument, Uid,
};

use crate::DocumentSplitter;

fn meta(key: &str, value: &str) -> Metadata {
    let mut metadata = Metadata::new();
    metadata.insert(key.to_string(), serde_json::Value::String(value.to_string()));
    metadata
}

fn modified(length: usize, start: usize, end: usize) -> AnySpan {
    AnySpan::Modified(ModifiedSpan::new(length, vec![Span::new(start, end)]))
}

fn sample_doc() -> TextDocument {
    let text = "The medkit library. This is a    large      entity";

    let normal = Segment::from_span("normal_sentence", Span::new(0, 18), "The medkit library")
        .with_metadata(meta("sent_id", "001"))
        .with_attr(Attribute::new("segment_attr", 0))
        .unwrap();
    let modified_sentence = Segment::new(
        "modified_sentence",
        vec![
            Span::new(20, 29).into(),
            modified(1, 29, 33),
            Span::new(33, 38).into(),
            modified(1, 38, 44),
            Span::new(44, 50).into(),
        ],
        "This is a large entity",
    )
    .with_metadata(meta("sent_id", "002"));

    let org = Entity::from_span("ORG", Span::new(4, 10), "medkit")
        .with_uid("e1")
        .with_attr(Attribute::new("entity_attr", 0))
        .unwrap();
    let large = Entity::new(
        "ENTITY",
        vec![Span::new(33, 38).into(), modified(1, 38, 44), Span::new(44, 50).into()],
        "large entity",
    )
    .with_uid("e2");
    let misc = Entity::from_span("MISC", Span::new(20, 24), "This").with_uid("e3");

    TextDocument::new(text)
        .with_metadata(meta("doc_id", "001"))
        .with_anns(vec![
            TextAnnotation::Segment(normal),
            TextAnnotation::Segment(modified_sentence),
            TextAnnotation::Entity(org),
            TextAnnotation::Entity(large),
            TextAnnotation::Entity(misc),
            TextAnnotation::Relation(Relation::new("not_related", Uid::from("e1"), Uid::from("e2"))),
            TextAnnotation::Relation(Relation::new("related", Uid::from("e2"), Uid::from("e3"))),
        ])
        .unwrap()
}

fn no_labels() -> Vec<String> {
    Vec::new()
}

#[test]
fn split_without_attrs() {
    let splitter = DocumentSplitter::new("normal_sentence")
        .with_entity_labels(["ORG"])
        .with_attr_labels(no_labels())
        .with_relation_labels(no_labels());

    let new_docs = splitter.run(&[sample_doc()], None).unwrap();
    assert_eq!(new_docs.len(), 1);

    let new_doc = &new_docs[0];
    assert_eq!(new_doc.text(), "The medkit library");
    assert_eq!(new_doc.metadata.get("sent_id"), Some(&serde_json::json!("001")));
    assert_eq!(new_doc.metadata.get("doc_id"), Some(&serde_json::json!("001")));
    assert_eq!(new_doc.metadata.len(), 2);
    assert!(new_doc.attrs.is_empty());

    let entities = new_doc.anns.get_entities(None);
    assert_eq!(entities.len(), 1);
    assert_eq!(entities[0].spans, vec![AnySpan::Span(Span::new(4, 10))]);
    assert!(entities[0].attrs.is_empty());
    assert_ne!(entities[0].uid, Uid::from("e1"));
}

#[test]
fn split_keeps_attrs_where_they_belong() {
    let splitter = DocumentSplitter::new("normal_sentence")
        .with_entity_labels(["ORG"])
        .with_relation_labels(no_labels());

    let new_docs = splitter.run(&[sample_doc()], None).unwrap();
    let new_doc = &new_docs[0];

    assert_eq!(new_doc.attrs.get(Some("segment_attr")).len(), 1);
    assert!(new_doc.attrs.get(Some("entity_attr")).is_empty());

    let entity = new_doc.anns.get_entities(Some("ORG"))[0];
    assert_eq!(entity.attrs.get(Some("entity_attr")).len(), 1);
    assert!(entity.attrs.get(Some("segment_attr")).is_empty());
}

#[test]
fn split_rebases_modified_spans() {
    let splitter = DocumentSplitter::new("modified_sentence")
        .with_entity_labels(["ENTITY"])
        .with_attr_labels(no_labels())
        .with_relation_labels(no_labels());

    let new_docs = splitter.run(&[sample_doc()], None).unwrap();
    assert_eq!(new_docs.len(), 1);

    let new_doc = &new_docs[0];
    assert_eq!(new_doc.text(), "This is a    large      entity");
    assert_eq!(new_doc.metadata.get("sent_id"), Some(&serde_json::json!("002")));

    let entities = new_doc.anns.get_entities(None);
    assert_eq!(entities.len(), 1);
    assert_eq!(
        entities[0].spans,
        vec![Span::new(13, 18).into(), modified(1, 18, 24), Span::new(24, 30).into()]
    );
    assert_eq!(entities[0].text, "large entity");
}

#[test]
fn split_entities_stay_in_bounds() {
    let new_docs = DocumentSplitter::new("modified_sentence")
        .run(&[sample_doc()], None)
        .unwrap();

    let new_doc = &new_docs[0];
    let text_len = new_doc.text_len();
    for entity in new_doc.anns.get_entities(None) {
        for span in entity.normalized_spans() {
            assert!(span.end <= text_len, "{} out of {}", span, text_len);
        }
    }
    // ORG lies in the other sentence
    assert!(new_doc.anns.get_entities(Some("ORG")).is_empty());
    assert_eq!(new_doc.anns.get_entities(None).len(), 2);
}

#[test]
fn split_remaps_relations() {
    let splitter = DocumentSplitter::new("modified_sentence")
        .with_entity_labels(["ENTITY", "MISC"])
        .with_attr_labels(no_labels())
        .with_relation_labels(["related"]);

    let new_docs = splitter.run(&[sample_doc()], None).unwrap();
    let new_doc = &new_docs[0];

    let relations = new_doc.anns.get_relations(None);
    assert_eq!(relations.len(), 1);

    let entity = new_doc.anns.get_entities(Some("ENTITY"))[0];
    let misc = new_doc.anns.get_entities(Some("MISC"))[0];
    assert_eq!(relations[0].source_id, entity.uid);
    assert_eq!(relations[0].target_id, misc.uid);
}

#[test]
fn split_drops_relations_leaving_the_segment() {
    // "not_related" links e1 (first sentence) to e2 (second sentence)
    let splitter = DocumentSplitter::new("modified_sentence").with_attr_labels(no_labels());

    let new_docs = splitter.run(&[sample_doc()], None).unwrap();
    let labels: Vec<&str> = new_docs[0]
        .anns
        .get_relations(None)
        .iter()
        .map(|rel| rel.label.as_str())
        .collect();

    assert_eq!(labels, vec!["related"]);
}

#[test]
fn split_drops_relations_to_filtered_out_entities() {
    // "related" links e2 (ENTITY) to e3 (MISC), and MISC is not selected
    let splitter = DocumentSplitter::new("modified_sentence")
        .with_entity_labels(["ENTITY"])
        .with_attr_labels(no_labels());

    let new_docs = splitter.run(&[sample_doc()], None).unwrap();
    let new_doc = &new_docs[0];

    assert_eq!(new_doc.anns.get_entities(None).len(), 1);
    assert!(new_doc.anns.get_entities(Some("MISC")).is_empty());
    assert!(new_doc.anns.get_relations(None).is_empty());
}

#[test]
fn split_follows_document_then_segment_order() {
    let first = sample_doc();
    let second = sample_doc();
    let splitter = DocumentSplitter::new("normal_sentence");

    let new_docs = splitter.run(&[first, second], None).unwrap();

    assert_eq!(new_docs.len(), 2);
    assert!(new_docs.iter().all(|doc| doc.text() == "The medkit library"));
    assert_ne!(new_docs[0].uid, new_docs[1].uid);
}

#[test]
fn split_records_provenance() {
    let doc = sample_doc();
    let splitter = DocumentSplitter::new("normal_sentence").with_relation_labels(no_labels());
    let mut tracer = ProvTracer::new();

    let new_docs = splitter.run(std::slice::from_ref(&doc), Some(&mut tracer)).unwrap();
    let new_doc = &new_docs[0];
    let op_uid = splitter.uid.clone();

    let sentence = doc.anns.get_segments(Some("normal_sentence"))[0];
    let doc_prov = tracer.get_prov(&new_doc.uid).unwrap();
    assert_eq!(doc_prov.kind, DataItemKind::Document);
    assert_eq!(doc_prov.op_uid, op_uid);
    assert_eq!(doc_prov.source_ids, vec![sentence.uid.clone()]);

    let segment_attr = sentence.attrs.get(Some("segment_attr"))[0];
    let doc_attr = new_doc.attrs.get(Some("segment_attr"))[0];
    let attr_prov = tracer.get_prov(&doc_attr.uid).unwrap();
    assert_eq!(attr_prov.source_ids, vec![segment_attr.uid.clone()]);

    let entity = new_doc.anns.get_entities(Some("ORG"))[0];
    let entity_prov = tracer.get_prov(&entity.uid).unwrap();
    assert_eq!(entity_prov.kind, DataItemKind::Entity);
    assert_eq!(entity_prov.source_ids, vec![Uid::from("e1")]);

    let entity_attr = entity.attrs.get(Some("entity_attr"))[0];
    assert!(tracer.get_prov(&entity_attr.uid).is_some());

    // one document, one doc attribute, one entity, one entity attribute
    assert_eq!(tracer.len(), 4);
    assert_eq!(
        tracer.get_op_desc(&op_uid).unwrap().class_name,
        "DocumentSplitter"
    );
}

#[test]
fn split_records_relation_provenance() {
    let doc = sample_doc();
    let splitter = DocumentSplitter::new("modified_sentence");
    let mut tracer = ProvTracer::new();

    let new_docs = splitter.run(std::slice::from_ref(&doc), Some(&mut tracer)).unwrap();
    let relation = new_docs[0].anns.get_relations(Some("related"))[0];
    let original = doc.anns.get_relations(Some("related"))[0];

    let prov = tracer.get_prov(&relation.uid).unwrap();
    assert_eq!(prov.kind, DataItemKind::Relation);
    assert_eq!(prov.source_ids, vec![original.uid.clone()]);
    assert_eq!(tracer.records_of_kind(DataItemKind::Entity).count(), 2);
}

#[test]
fn split_without_matching_segments() {
    let new_docs = DocumentSplitter::new("paragraph")
        .run(&[sample_doc()], None)
        .unwrap();
    assert!(new_docs.is_empty());
}
