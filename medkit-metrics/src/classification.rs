//! Per-class precision, recall and F1 with macro and weighted averages.
//!
//! Undefined ratios (no predicted or no true instance of a class) count as
//! zero.

use std::collections::BTreeMap;
use std::fmt::Display;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::{MetricsError, MetricsResult};

/// Scores of a single class, or an average over classes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ClassMetrics {
    pub precision: f64,
    pub recall: f64,
    #[serde(rename = "f1-score")]
    pub f1_score: f64,
    pub support: usize,
}

impl ClassMetrics {
    /// `(name, value)` pairs using the flattened metric names.
    fn named(&self) -> [(&'static str, f64); 4] {
        [
            ("precision", self.precision),
            ("recall", self.recall),
            ("f1-score", self.f1_score),
            ("support", self.support as f64),
        ]
    }
}

/// Averaging strategy for the global scores.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Average {
    /// Unweighted mean over classes.
    #[default]
    Macro,
    /// Mean weighted by class support.
    Weighted,
}

impl Average {
    pub fn as_str(&self) -> &'static str {
        match self {
            Average::Macro => "macro",
            Average::Weighted => "weighted",
        }
    }
}

/// Classification scores for every label seen in the true or predicted
/// sequence, labels sorted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationReport<T: Ord> {
    pub per_class: BTreeMap<T, ClassMetrics>,
    pub accuracy: f64,
    pub macro_avg: ClassMetrics,
    pub weighted_avg: ClassMetrics,
}

impl<T: Ord> ClassificationReport<T> {
    pub fn average(&self, average: Average) -> &ClassMetrics {
        match average {
            Average::Macro => &self.macro_avg,
            Average::Weighted => &self.weighted_avg,
        }
    }
}

fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 {
        0.0
    } else {
        num as f64 / den as f64
    }
}

/// Build the report comparing `y_true` with `y_pred`.
pub fn classification_report<T>(y_true: &[T], y_pred: &[T]) -> MetricsResult<ClassificationReport<T>>
where
    T: Ord + Clone,
{
    if y_true.len() != y_pred.len() {
        return Err(MetricsError::LengthMismatch {
            expected: y_true.len(),
            found: y_pred.len(),
        });
    }

    // label -> (true positives, predicted, actual)
    let mut counts: BTreeMap<&T, (usize, usize, usize)> = BTreeMap::new();
    let mut correct = 0;
    for (truth, pred) in y_true.iter().zip(y_pred) {
        counts.entry(truth).or_default().2 += 1;
        counts.entry(pred).or_default().1 += 1;
        if truth == pred {
            counts.entry(truth).or_default().0 += 1;
            correct += 1;
        }
    }

    let per_class: BTreeMap<T, ClassMetrics> = counts
        .into_iter()
        .map(|(label, (tp, predicted, actual))| {
            let precision = ratio(tp, predicted);
            let recall = ratio(tp, actual);
            let f1_score = if precision + recall == 0.0 {
                0.0
            } else {
                2.0 * precision * recall / (precision + recall)
            };
            let metrics = ClassMetrics {
                precision,
                recall,
                f1_score,
                support: actual,
            };
            (label.clone(), metrics)
        })
        .collect();

    let total_support = y_true.len();
    let nb_classes = per_class.len();
    let mut macro_avg = ClassMetrics {
        support: total_support,
        ..ClassMetrics::default()
    };
    let mut weighted_avg = macro_avg;
    for metrics in per_class.values() {
        macro_avg.precision += metrics.precision;
        macro_avg.recall += metrics.recall;
        macro_avg.f1_score += metrics.f1_score;

        let weight = metrics.support as f64;
        weighted_avg.precision += metrics.precision * weight;
        weighted_avg.recall += metrics.recall * weight;
        weighted_avg.f1_score += metrics.f1_score * weight;
    }
    if nb_classes > 0 {
        let n = nb_classes as f64;
        macro_avg.precision /= n;
        macro_avg.recall /= n;
        macro_avg.f1_score /= n;
    }
    if total_support > 0 {
        let n = total_support as f64;
        weighted_avg.precision /= n;
        weighted_avg.recall /= n;
        weighted_avg.f1_score /= n;
    }

    Ok(ClassificationReport {
        per_class,
        accuracy: ratio(correct, total_support),
        macro_avg,
        weighted_avg,
    })
}

/// Flatten a report into named scores.
///
/// Keys are `"{average}_{metric}"` for the chosen average, then `"support"`
/// and `"accuracy"`, then `"{label}_{metric}"` for every class when
/// `by_value` is set. Metric names are `precision`, `recall`, `f1-score`
/// and `support`.
pub fn flatten_report<T>(
    report: &ClassificationReport<T>,
    average: Average,
    by_value: bool,
) -> IndexMap<String, f64>
where
    T: Ord + Display,
{
    let mut scores = IndexMap::new();
    let avg = report.average(average);
    for (metric, value) in avg.named() {
        if metric == "support" {
            continue;
        }
        scores.insert(format!("{}_{}", average.as_str(), metric), value);
    }
    scores.insert("support".to_string(), avg.support as f64);
    scores.insert("accuracy".to_string(), report.accuracy);

    if by_value {
        for (label, metrics) in &report.per_class {
            for (metric, value) in metrics.named() {
                scores.insert(format!("{}_{}", label, metric), value);
            }
        }
    }
    scores
}
