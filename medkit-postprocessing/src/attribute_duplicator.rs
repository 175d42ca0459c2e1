//! Propagate attributes from enclosing segments to nested ones.

use medkit::{DataItemKind, OperationDescription, ProvTracer, Segment, Uid};

use crate::document_splitter::trace;
use crate::{nested_indices, PostprocessResult};

/// Copies selected attributes of each source segment onto every target
/// segment nested inside it.
///
/// Every target receives its own copy, with a fresh uid.
#[derive(Debug, Clone)]
pub struct AttributeDuplicator {
    pub uid: Uid,
    pub attr_labels: Vec<String>,
}

impl AttributeDuplicator {
    pub fn new<L: Into<String>>(attr_labels: impl IntoIterator<Item = L>) -> Self {
        Self {
            uid: Uid::generate(),
            attr_labels: attr_labels.into_iter().map(Into::into).collect(),
        }
    }

    pub fn description(&self) -> OperationDescription {
        OperationDescription::new(self.uid.clone(), "AttributeDuplicator", "AttributeDuplicator")
            .with_config(serde_json::json!({ "attr_labels": self.attr_labels }))
    }

    /// Attach copies of the selected `sources` attributes to nested `targets`.
    ///
    /// A target nested in several sources receives copies from each of them.
    pub fn run(
        &self,
        sources: &[Segment],
        targets: &mut [Segment],
        mut prov: Option<&mut ProvTracer>,
    ) -> PostprocessResult<()> {
        let desc = self.description();
        let nested = nested_indices(sources, targets);

        for (parent_idx, children) in nested {
            let parent = &sources[parent_idx];
            let attrs_to_copy = self
                .attr_labels
                .iter()
                .flat_map(|label| parent.attrs.get(Some(label.as_str())));

            for attr in attrs_to_copy {
                for &child_idx in &children {
                    let copy = attr.copy();
                    trace(&mut prov, &copy.uid, DataItemKind::Attribute, &desc, &attr.uid);
                    targets[child_idx].attrs.add(copy)?;
                }
            }
        }

        Ok(())
    }
}
