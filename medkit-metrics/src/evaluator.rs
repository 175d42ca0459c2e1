//! Document-level classification evaluation over one attribute label.

use indexmap::IndexMap;
use medkit::TextDocument;

use crate::{
    classification_report, cohen_kappa, flatten_report, krippendorff_alpha, Average, Label,
    MetricsError, MetricsResult,
};

/// Evaluates the value of the `attr_label` attribute of documents.
///
/// Each document must carry at least one attribute with that label; only
/// the first one is used. Classification reports and kappa reject label
/// sets mixing value types. Document lists are compared position by
/// position, so callers must order them consistently.
#[derive(Debug, Clone)]
pub struct TextClassificationEvaluator {
    pub attr_label: String,
}

impl TextClassificationEvaluator {
    pub fn new(attr_label: impl Into<String>) -> Self {
        Self {
            attr_label: attr_label.into(),
        }
    }

    /// One label per document.
    pub fn extract_attr_values(&self, docs: &[TextDocument]) -> MetricsResult<Vec<Label>> {
        docs.iter()
            .map(|doc| {
                let attrs = doc.attrs.get(Some(self.attr_label.as_str()));
                let first = attrs.first().ok_or_else(|| MetricsError::MissingAttribute {
                    label: self.attr_label.clone(),
                    doc: doc.uid.to_string(),
                })?;
                if attrs.len() > 1 {
                    tracing::warn!(
                        label = %self.attr_label,
                        doc = %doc.uid,
                        "found several attributes with the same label, ignoring all but first"
                    );
                }
                Label::try_from(&first.value).map_err(|found| MetricsError::UnsupportedValue {
                    label: self.attr_label.clone(),
                    found,
                })
            })
            .collect()
    }

    /// Labels of different types may share a display name (`1` and `"1"`),
    /// which would merge their classes once flattened.
    fn check_single_type<'a>(&self, labels: impl IntoIterator<Item = &'a Label>) -> MetricsResult<()> {
        let mut labels = labels.into_iter();
        let Some(first) = labels.next() else {
            return Ok(());
        };
        match labels.find(|label| label.type_name() != first.type_name()) {
            Some(other) => Err(MetricsError::MixedLabelTypes {
                label: self.attr_label.clone(),
                first: first.type_name(),
                second: other.type_name(),
            }),
            None => Ok(()),
        }
    }

    /// Classification scores flattened by [`flatten_report`].
    pub fn compute_classification_report(
        &self,
        true_docs: &[TextDocument],
        predicted_docs: &[TextDocument],
        metrics_by_attr_value: bool,
        average: Average,
    ) -> MetricsResult<IndexMap<String, f64>> {
        let true_tags = self.extract_attr_values(true_docs)?;
        let pred_tags = self.extract_attr_values(predicted_docs)?;
        self.check_single_type(true_tags.iter().chain(&pred_tags))?;

        let report = classification_report(&true_tags, &pred_tags)?;
        Ok(flatten_report(&report, average, metrics_by_attr_value))
    }

    /// `cohen_kappa` and `support` (number of documents).
    pub fn compute_cohen_kappa(
        &self,
        docs_annotator_1: &[TextDocument],
        docs_annotator_2: &[TextDocument],
    ) -> MetricsResult<IndexMap<String, f64>> {
        let tags_1 = self.extract_attr_values(docs_annotator_1)?;
        let tags_2 = self.extract_attr_values(docs_annotator_2)?;
        self.check_single_type(tags_1.iter().chain(&tags_2))?;

        let kappa = cohen_kappa(&tags_1, &tags_2)?;
        Ok(IndexMap::from([
            ("cohen_kappa".to_string(), kappa),
            ("support".to_string(), tags_1.len() as f64),
        ]))
    }

    /// `krippendorff_alpha`, `nb_annotators` and `support` (number of
    /// documents per annotator).
    pub fn compute_krippendorff_alpha(
        &self,
        docs_annotators: &[Vec<TextDocument>],
    ) -> MetricsResult<IndexMap<String, f64>> {
        if docs_annotators.len() < 2 {
            return Err(MetricsError::NotEnoughAnnotators {
                found: docs_annotators.len(),
            });
        }

        let all_annotators = docs_annotators
            .iter()
            .map(|docs| -> MetricsResult<Vec<Option<Label>>> {
                let tags = self.extract_attr_values(docs)?;
                Ok(tags.into_iter().map(Some).collect())
            })
            .collect::<MetricsResult<Vec<_>>>()?;

        let alpha = krippendorff_alpha(&all_annotators)?;
        Ok(IndexMap::from([
            ("krippendorff_alpha".to_string(), alpha),
            ("nb_annotators".to_string(), all_annotators.len() as f64),
            ("support".to_string(), all_annotators[0].len() as f64),
        ]))
    }
}
