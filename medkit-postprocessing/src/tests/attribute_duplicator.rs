use std::collections::HashSet;

use medkit::{Attribute, AttributeValue, DataItemKind, ProvTracer, Segment, Span, Uid};

use crate::AttributeDuplicator;

fn sentence(start: usize, end: usize, negated: bool) -> Segment {
    Segment::from_span("sentence", Span::new(start, end), "")
        .with_attr(Attribute::new("negation", negated))
        .unwrap()
        .with_attr(Attribute::new("hypothesis", false))
        .unwrap()
}

fn entity(label: &str, start: usize, end: usize) -> Segment {
    Segment::from_span(label, Span::new(start, end), "").with_uid(label)
}

#[test]
fn duplicate_fans_out_to_every_child() {
    let sources = vec![sentence(0, 30, true), sentence(31, 60, false)];
    let mut targets = vec![
        entity("fever", 5, 10),
        entity("cough", 12, 17),
        entity("rash", 40, 44),
        entity("straddling", 25, 35),
    ];

    AttributeDuplicator::new(["negation"])
        .run(&sources, &mut targets, None)
        .unwrap();

    let negation_of = |seg: &Segment| -> Vec<bool> {
        seg.attrs
            .get(Some("negation"))
            .iter()
            .map(|attr| attr.value == AttributeValue::Bool(true))
            .collect()
    };
    assert_eq!(negation_of(&targets[0]), vec![true]);
    assert_eq!(negation_of(&targets[1]), vec![true]);
    assert_eq!(negation_of(&targets[2]), vec![false]);
    assert!(targets[3].attrs.is_empty());

    // every copy has its own identity
    let source_uid = sources[0].attrs.get(Some("negation"))[0].uid.clone();
    let copies: HashSet<Uid> = targets[..2]
        .iter()
        .map(|seg| seg.attrs.get(Some("negation"))[0].uid.clone())
        .collect();
    assert_eq!(copies.len(), 2);
    assert!(!copies.contains(&source_uid));
}

#[test]
fn duplicate_leaves_sources_untouched() {
    let sources = vec![sentence(0, 30, true)];
    let before = sources.clone();
    let mut targets = vec![entity("fever", 5, 10)];

    AttributeDuplicator::new(["negation", "hypothesis"])
        .run(&sources, &mut targets, None)
        .unwrap();

    assert_eq!(sources, before);
    let labels: Vec<&str> = targets[0]
        .attrs
        .iter()
        .map(|attr| attr.label.as_str())
        .collect();
    assert_eq!(labels, vec!["negation", "hypothesis"]);
}

#[test]
fn duplicate_from_overlapping_sources() {
    let sources = vec![sentence(0, 30, true), sentence(0, 40, false)];
    let mut targets = vec![entity("fever", 5, 10)];

    AttributeDuplicator::new(["negation"])
        .run(&sources, &mut targets, None)
        .unwrap();

    assert_eq!(targets[0].attrs.get(Some("negation")).len(), 2);
}

#[test]
fn duplicate_records_provenance() {
    let sources = vec![sentence(0, 30, true)];
    let mut targets = vec![entity("fever", 5, 10), entity("cough", 12, 17)];
    let duplicator = AttributeDuplicator::new(["negation"]);
    let mut tracer = ProvTracer::new();

    duplicator
        .run(&sources, &mut targets, Some(&mut tracer))
        .unwrap();

    let source_uid = sources[0].attrs.get(Some("negation"))[0].uid.clone();
    assert_eq!(tracer.len(), 2);
    for target in &targets {
        let copy = target.attrs.get(Some("negation"))[0];
        let prov = tracer.get_prov(&copy.uid).unwrap();
        assert_eq!(prov.kind, DataItemKind::Attribute);
        assert_eq!(prov.op_uid, duplicator.uid);
        assert_eq!(prov.source_ids, vec![source_uid.clone()]);
    }
}
