//! Attributes attached to annotations and documents.

use serde::{Deserialize, Serialize};

use crate::{DocumentError, DocumentResult, Metadata, Uid};

/// Value carried by an [`Attribute`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AttributeValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Json(serde_json::Value),
}

impl AttributeValue {
    /// Short name of the variant, for error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            AttributeValue::Null => "null",
            AttributeValue::Bool(_) => "bool",
            AttributeValue::Int(_) => "int",
            AttributeValue::Float(_) => "float",
            AttributeValue::Str(_) => "str",
            AttributeValue::Json(_) => "json",
        }
    }
}

impl From<bool> for AttributeValue {
    fn from(value: bool) -> Self {
        AttributeValue::Bool(value)
    }
}

impl From<i64> for AttributeValue {
    fn from(value: i64) -> Self {
        AttributeValue::Int(value)
    }
}

impl From<i32> for AttributeValue {
    fn from(value: i32) -> Self {
        AttributeValue::Int(value.into())
    }
}

impl From<f64> for AttributeValue {
    fn from(value: f64) -> Self {
        AttributeValue::Float(value)
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        AttributeValue::Str(value.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        AttributeValue::Str(value)
    }
}

/// A labelled value attached to an annotation or a document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attribute {
    pub uid: Uid,
    pub label: String,
    pub value: AttributeValue,
    #[serde(default)]
    pub metadata: Metadata,
}

impl Attribute {
    pub fn new(label: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        Self {
            uid: Uid::generate(),
            label: label.into(),
            value: value.into(),
            metadata: Metadata::new(),
        }
    }

    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// Deep copy with a fresh identifier.
    ///
    /// The source is left untouched; recording the provenance link back to
    /// it is up to the caller.
    pub fn copy(&self) -> Self {
        Self {
            uid: Uid::generate(),
            label: self.label.clone(),
            value: self.value.clone(),
            metadata: self.metadata.clone(),
        }
    }
}

/// Ordered, additive-only collection of attributes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttributeContainer {
    attrs: Vec<Attribute>,
}

impl AttributeContainer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach an attribute.
    ///
    /// Fails if an attribute with the same uid is already attached.
    pub fn add(&mut self, attr: Attribute) -> DocumentResult<()> {
        if self.attrs.iter().any(|a| a.uid == attr.uid) {
            return Err(DocumentError::DuplicateUid {
                kind: "attribute",
                uid: attr.uid,
            });
        }
        self.attrs.push(attr);
        Ok(())
    }

    /// Attributes in insertion order, filtered by label when given.
    pub fn get(&self, label: Option<&str>) -> Vec<&Attribute> {
        self.attrs
            .iter()
            .filter(|attr| label.map_or(true, |l| attr.label == l))
            .collect()
    }

    pub fn get_by_id(&self, uid: &Uid) -> Option<&Attribute> {
        self.attrs.iter().find(|attr| &attr.uid == uid)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Attribute> {
        self.attrs.iter()
    }

    pub fn len(&self) -> usize {
        self.attrs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attrs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_copy_allocates_fresh_uid() {
        let attr = Attribute::new("negation", true);
        let copy = attr.copy();
        assert_ne!(copy.uid, attr.uid);
        assert_eq!(copy.label, attr.label);
        assert_eq!(copy.value, attr.value);
    }

    #[test]
    fn test_container_rejects_same_uid() {
        let attr = Attribute::new("negation", false);
        let mut container = AttributeContainer::new();
        container.add(attr.clone()).unwrap();
        let err = container.add(attr).unwrap_err();
        assert!(matches!(err, DocumentError::DuplicateUid { kind: "attribute", .. }));
        assert_eq!(container.len(), 1);
    }

    #[test]
    fn test_container_get_by_label_keeps_order() {
        let mut container = AttributeContainer::new();
        container.add(Attribute::new("a", 1)).unwrap();
        container.add(Attribute::new("b", 2)).unwrap();
        container.add(Attribute::new("a", 3)).unwrap();

        let values: Vec<_> = container
            .get(Some("a"))
            .into_iter()
            .map(|attr| attr.value.clone())
            .collect();
        assert_eq!(values, vec![AttributeValue::Int(1), AttributeValue::Int(3)]);
        assert_eq!(container.get(None).len(), 3);
        assert!(container.get(Some("missing")).is_empty());
    }
}
