//! Cohen's kappa for two annotators.

use std::hash::Hash;

use indexmap::IndexMap;

use crate::{MetricsError, MetricsResult};

/// Cohen's kappa between two equally long label sequences.
///
/// `kappa = (p_o - p_e) / (1 - p_e)` where `p_o` is the observed agreement
/// and `p_e` the agreement expected from each annotator's label frequencies.
///
/// When `p_e == 1` (both annotators always use the same single label) the
/// score is undefined and `NaN` is returned.
pub fn cohen_kappa<T>(labels_1: &[T], labels_2: &[T]) -> MetricsResult<f64>
where
    T: Eq + Hash,
{
    if labels_1.len() != labels_2.len() {
        return Err(MetricsError::LengthMismatch {
            expected: labels_1.len(),
            found: labels_2.len(),
        });
    }

    // label -> (count by annotator 1, count by annotator 2)
    let mut marginals: IndexMap<&T, (u64, u64)> = IndexMap::new();
    let mut agreements = 0u64;
    for (a, b) in labels_1.iter().zip(labels_2) {
        marginals.entry(a).or_default().0 += 1;
        marginals.entry(b).or_default().1 += 1;
        if a == b {
            agreements += 1;
        }
    }

    let n = labels_1.len() as f64;
    let chance: u64 = marginals.values().map(|(c1, c2)| c1 * c2).sum();
    let p_o = agreements as f64 / n;
    let p_e = chance as f64 / (n * n);

    if labels_1.is_empty() || p_e == 1.0 {
        tracing::warn!(
            support = labels_1.len(),
            "cohen's kappa is undefined when agreement by chance is total"
        );
        return Ok(f64::NAN);
    }

    Ok((p_o - p_e) / (1.0 - p_e))
}
