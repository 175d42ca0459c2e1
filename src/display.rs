use std::collections::HashMap;
use std::fmt::Write;

use unicode_width::UnicodeWidthChar;

use crate::{Entity, Spanned, TextDocument, Uid};

/// Convert a zero-based index to a base-26 label: A, B, ..., Z, AA, AB, ..., AZ, BA, ...
/// Similar to Excel column naming.
fn index_to_base26_label(mut n: usize) -> String {
    let mut result = String::new();
    loop {
        let remainder = n % 26;
        result.insert(0, (b'A' + remainder as u8) as char);
        if n < 26 {
            break;
        }
        n = n / 26 - 1;
    }
    result
}

/// Internal representation of an included entity for display.
struct IncludedEntity<'a> {
    entity: &'a Entity,
    relations: Vec<(&'a str, &'a Uid)>,
    show_relations: bool,
}

/// Renders a document text with its entities underlined.
///
/// ```text
/// The medkit library is great
///     ╰────╯[A] ORG
///            ╰─────╯MISC
///              └─describes─>[A]
/// ```
///
/// Line breaks and tabs in the text are shown as single spaces so every
/// entity can be drawn against one line.
pub struct DocumentDisplay<'a> {
    doc: &'a TextDocument,
    include_entities: Vec<IncludedEntity<'a>>,
}

impl<'a> std::fmt::Display for DocumentDisplay<'a> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // char index -> display column, with one extra slot for the end offset
        let mut char_idx_to_col = Vec::new();
        let mut opening_line = String::new();
        let mut col = 0;
        for c in self.doc.text().chars() {
            char_idx_to_col.push(col);
            let c = if c.is_whitespace() { ' ' } else { c };
            opening_line.push(c);
            col += UnicodeWidthChar::width(c).unwrap_or(0);
        }
        char_idx_to_col.push(col);

        f.write_str(&opening_line)?;

        let entity_labels = self.build_entity_labels();
        let col_of = |idx: usize| char_idx_to_col.get(idx).copied().unwrap_or(col);

        for included in self.include_entities.iter() {
            f.write_char('\n')?;

            let pieces = included.entity.normalized_spans();
            let mut cursor = 0;
            for piece in pieces.iter() {
                let start_col = col_of(piece.start);
                let end_col = col_of(piece.end);
                for _ in cursor..start_col {
                    f.write_char(' ')?;
                }

                f.write_char('╰')?;
                for _ in (start_col + 1)..end_col.saturating_sub(1) {
                    f.write_char('─')?;
                }

                let char_len = end_col.saturating_sub(start_col);
                if char_len > 1 {
                    f.write_char('╯')?;
                    cursor = end_col;
                } else {
                    cursor = start_col + 1;
                }
            }

            if let Some(label) = entity_labels.get(&included.entity.uid) {
                write!(f, "{} ", label)?;
            }

            f.write_str(&included.entity.label)?;

            if included.show_relations {
                let start_col = pieces.first().map_or(0, |piece| col_of(piece.start));
                for (relation_label, target) in &included.relations {
                    f.write_char('\n')?;

                    let arrow_indent = start_col + 2;
                    for _ in 0..arrow_indent {
                        f.write_char(' ')?;
                    }

                    let target_str = match entity_labels.get(*target) {
                        Some(target_label) => target_label.clone(),
                        None => format!("[{}]", target),
                    };

                    write!(f, "└─{}─>{}", relation_label, target_str)?;
                }
            }
        }

        Ok(())
    }
}

impl<'a> DocumentDisplay<'a> {
    pub fn new(doc: &'a TextDocument) -> Self {
        DocumentDisplay {
            doc,
            include_entities: Vec::new(),
        }
    }

    /// Build a map from included entities to labels like "[A]", "[B]", etc.
    /// Only entities that are targets of shown relations get labels.
    fn build_entity_labels(&self) -> HashMap<Uid, String> {
        let by_uid: HashMap<&Uid, &Entity> = self
            .include_entities
            .iter()
            .map(|included| (&included.entity.uid, included.entity))
            .collect();

        let mut targets: Vec<&Entity> = self
            .include_entities
            .iter()
            .filter(|included| included.show_relations)
            .flat_map(|included| &included.relations)
            .filter_map(|(_, target)| by_uid.get(*target).copied())
            .collect();

        // Sort deterministically by position, then uid
        targets.sort_by_key(|entity| {
            let first = entity.normalized_spans().first().copied();
            (first.map(|s| (s.start, s.end)), entity.uid.clone())
        });
        targets.dedup_by(|a, b| a.uid == b.uid);

        targets
            .into_iter()
            .enumerate()
            .map(|(i, entity)| {
                let label = format!("[{}]", index_to_base26_label(i));
                (entity.uid.clone(), label)
            })
            .collect()
    }

    pub fn include_entities(&mut self, label: Option<&str>) {
        for entity in self.doc.anns.get_entities(label) {
            self.include_entities.push(IncludedEntity {
                entity,
                relations: Vec::new(),
                show_relations: false,
            });
        }
    }

    /// Include entities along with the relations they are the source of.
    ///
    /// This is similar to [`include_entities`](Self::include_entities) but
    /// also renders relation arrows below each entity.
    pub fn include_entities_with_relations(&mut self, label: Option<&str>) {
        let relations = self.doc.anns.get_relations(None);
        for entity in self.doc.anns.get_entities(label) {
            let outgoing = relations
                .iter()
                .copied()
                .filter(|rel| rel.source_id == entity.uid)
                .map(|rel| (rel.label.as_str(), &rel.target_id))
                .collect();
            self.include_entities.push(IncludedEntity {
                entity,
                relations: outgoing,
                show_relations: true,
            });
        }
    }

    /// Takes self
    pub fn with_entities(mut self, label: Option<&str>) -> Self {
        self.include_entities(label);
        self
    }

    /// Takes self, includes relations
    pub fn with_relations(mut self, label: Option<&str>) -> Self {
        self.include_entities_with_relations(label);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AnySpan, Relation, Segment, Span, TextAnnotation};

    fn doc_with_relation() -> TextDocument {
        let org = Segment::from_span("ORG", Span::new(4, 10), "medkit").with_uid("e1");
        let misc = Segment::from_span("MISC", Span::new(11, 18), "library").with_uid("e2");
        let rel = Relation::new("describes", Uid::from("e2"), Uid::from("e1"));
        TextDocument::new("The medkit library is great")
            .with_anns(vec![
                TextAnnotation::Entity(org),
                TextAnnotation::Entity(misc),
                TextAnnotation::Relation(rel),
            ])
            .unwrap()
    }

    #[test]
    fn test_index_to_base26_label() {
        assert_eq!(index_to_base26_label(0), "A");
        assert_eq!(index_to_base26_label(25), "Z");
        assert_eq!(index_to_base26_label(26), "AA");
        assert_eq!(index_to_base26_label(51), "AZ");
        assert_eq!(index_to_base26_label(701), "ZZ");
        assert_eq!(index_to_base26_label(702), "AAA");
    }

    #[test]
    fn test_display_entities() {
        let doc = doc_with_relation();
        let display = DocumentDisplay::new(&doc).with_entities(None);

        insta::assert_snapshot!(display, @r###"
        The medkit library is great
            ╰────╯ORG
                   ╰─────╯MISC
        "###);
    }

    #[test]
    fn test_display_relations() {
        let doc = doc_with_relation();
        let display = DocumentDisplay::new(&doc).with_relations(None);

        insta::assert_snapshot!(display, @r###"
        The medkit library is great
            ╰────╯[A] ORG
                   ╰─────╯MISC
                     └─describes─>[A]
        "###);
    }

    #[test]
    fn test_display_compound_entity() {
        let entity = Segment::new(
            "DRUG",
            vec![
                AnySpan::Span(Span::new(0, 3)),
                AnySpan::Span(Span::new(8, 12)),
            ],
            "abc ijkl",
        );
        let doc = TextDocument::new("abc efg ijkl")
            .with_anns(vec![TextAnnotation::Entity(entity)])
            .unwrap();
        let rendered = DocumentDisplay::new(&doc).with_entities(Some("DRUG")).to_string();

        assert_eq!(rendered, "abc efg ijkl\n╰─╯     ╰──╯DRUG");
    }
}
