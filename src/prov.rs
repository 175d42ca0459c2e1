//! Provenance tracing for derived data items.
//!
//! Operations that derive new documents, annotations or attributes from
//! existing ones can report each derivation to a [`ProvTracer`]. The tracer
//! is passed explicitly to the operation (`Option<&mut ProvTracer>`); when it
//! is `None`, nothing is recorded.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::Uid;

/// Description of the operation that produced a data item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperationDescription {
    pub uid: Uid,
    pub name: String,
    pub class_name: String,
    #[serde(default)]
    pub config: serde_json::Value,
}

impl OperationDescription {
    pub fn new(uid: Uid, name: impl Into<String>, class_name: impl Into<String>) -> Self {
        Self {
            uid,
            name: name.into(),
            class_name: class_name.into(),
            config: serde_json::Value::Null,
        }
    }

    pub fn with_config(mut self, config: serde_json::Value) -> Self {
        self.config = config;
        self
    }
}

/// Kind of the data item a provenance record is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataItemKind {
    Document,
    Segment,
    Entity,
    Relation,
    Attribute,
}

/// One derivation: `data_item` was produced by `op_uid` from `source_ids`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prov {
    pub data_item: Uid,
    pub kind: DataItemKind,
    pub op_uid: Uid,
    pub source_ids: Vec<Uid>,
}

/// Append-only provenance log keyed by derived item.
#[derive(Debug, Clone, Default)]
pub struct ProvTracer {
    records: Vec<Prov>,
    by_item: BTreeMap<Uid, usize>,
    op_descs: BTreeMap<Uid, OperationDescription>,
}

impl ProvTracer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `data_item` was derived from `source_ids` by `op_desc`.
    ///
    /// A data item is recorded once; later records for the same uid are
    /// ignored.
    pub fn add_prov(
        &mut self,
        data_item: &Uid,
        kind: DataItemKind,
        op_desc: &OperationDescription,
        source_ids: &[&Uid],
    ) {
        if self.by_item.contains_key(data_item) {
            tracing::debug!(uid = %data_item, "provenance already recorded, skipping");
            return;
        }
        self.op_descs
            .entry(op_desc.uid.clone())
            .or_insert_with(|| op_desc.clone());
        self.by_item.insert(data_item.clone(), self.records.len());
        self.records.push(Prov {
            data_item: data_item.clone(),
            kind,
            op_uid: op_desc.uid.clone(),
            source_ids: source_ids.iter().map(|&uid| uid.clone()).collect(),
        });
    }

    pub fn get_prov(&self, data_item: &Uid) -> Option<&Prov> {
        self.by_item.get(data_item).map(|&idx| &self.records[idx])
    }

    pub fn get_op_desc(&self, op_uid: &Uid) -> Option<&OperationDescription> {
        self.op_descs.get(op_uid)
    }

    /// All records in insertion order.
    pub fn records(&self) -> &[Prov] {
        &self.records
    }

    /// Records of a given kind, in insertion order.
    pub fn records_of_kind(&self, kind: DataItemKind) -> impl Iterator<Item = &Prov> {
        self.records.iter().filter(move |prov| prov.kind == kind)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
