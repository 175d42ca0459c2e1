//! Krippendorff's alpha for nominal data.
//!
//! Reliability data is one row per annotator, one column per unit; `None`
//! marks a unit the annotator left unlabelled. Only the nominal metric is
//! supported: two values either agree or they do not.
//!
//! The computation follows Krippendorff (2011), "Computing Krippendorff's
//! alpha-reliability", pp. 8-10:
//!
//! ```text
//! alpha = 1 - (n - 1) * D_o / D_e
//! ```
//!
//! where `n` counts the values in pairable units (units with at least two
//! values), `D_o` is the observed disagreement and `D_e` the disagreement
//! expected by chance.

use std::hash::Hash;

use indexmap::IndexMap;

use crate::{MetricsError, MetricsResult};

/// Krippendorff's alpha over `annotators` rows.
///
/// 1 means perfect reliability, 0 or lower means no reliability beyond
/// chance. The result does not depend on the order of the rows.
///
/// # Errors
///
/// - [`MetricsError::NotEnoughAnnotators`] with fewer than two rows,
/// - [`MetricsError::LengthMismatch`] when rows differ in length,
/// - [`MetricsError::NotEnoughLabels`] when fewer than two distinct labels
///   appear,
/// - [`MetricsError::NoExpectedDisagreement`] when pairable units carry a
///   single label.
///
/// ```
/// use medkit_metrics::krippendorff_alpha;
///
/// let a = vec![Some("yes"), Some("yes"), Some("no"), Some("no"), Some("yes"), None];
/// let b = vec![None, Some("yes"), Some("no"), Some("yes"), Some("yes"), Some("no")];
/// let c = vec![Some("yes"), Some("no"), Some("no"), Some("yes"), Some("yes"), None];
///
/// let alpha = krippendorff_alpha(&[a, b, c]).unwrap();
/// assert!((alpha - 0.4222).abs() < 1e-4);
/// ```
pub fn krippendorff_alpha<T>(annotators: &[Vec<Option<T>>]) -> MetricsResult<f64>
where
    T: Eq + Hash + Clone,
{
    let first = annotators.first().ok_or(MetricsError::NotEnoughAnnotators { found: 0 })?;
    if annotators.len() < 2 {
        return Err(MetricsError::NotEnoughAnnotators {
            found: annotators.len(),
        });
    }
    let nb_units = first.len();
    if let Some(row) = annotators.iter().find(|row| row.len() != nb_units) {
        return Err(MetricsError::LengthMismatch {
            expected: nb_units,
            found: row.len(),
        });
    }

    let vocabulary: IndexMap<&T, usize> = annotators
        .iter()
        .flatten()
        .flatten()
        .fold(IndexMap::new(), |mut vocabulary, value| {
            let next = vocabulary.len();
            vocabulary.entry(value).or_insert(next);
            vocabulary
        });
    if vocabulary.len() < 2 {
        return Err(MetricsError::NotEnoughLabels {
            found: vocabulary.len(),
        });
    }

    let values_by_unit = count_values_by_unit(annotators, &vocabulary, nb_units);
    let pairable: Vec<&Vec<u64>> = values_by_unit
        .iter()
        .filter(|counts| counts.iter().sum::<u64>() > 1)
        .collect();

    let observed = observed_disagreement(&pairable);
    let expected = expected_disagreement(&pairable, vocabulary.len());
    if expected == 0 {
        return Err(MetricsError::NoExpectedDisagreement {
            labels: vocabulary.len(),
        });
    }

    let total_paired: u64 = pairable.iter().map(|counts| counts.iter().sum::<u64>()).sum();
    tracing::debug!(
        units = nb_units,
        pairable = pairable.len(),
        labels = vocabulary.len(),
        "computing krippendorff alpha"
    );

    Ok(1.0 - (total_paired as f64 - 1.0) * (observed / expected as f64))
}

/// `counts[u][l]`: number of annotators that gave label `l` to unit `u`.
fn count_values_by_unit<T: Eq + Hash>(
    annotators: &[Vec<Option<T>>],
    vocabulary: &IndexMap<&T, usize>,
    nb_units: usize,
) -> Vec<Vec<u64>> {
    let mut counts = vec![vec![0u64; vocabulary.len()]; nb_units];
    for row in annotators {
        for (unit, value) in row.iter().enumerate() {
            if let Some(&label) = value.as_ref().and_then(|value| vocabulary.get(value)) {
                counts[unit][label] += 1;
            }
        }
    }
    counts
}

/// Sum of pairwise products `c_i * c_j` for `i < j`.
fn pairwise_products(counts: impl Iterator<Item = u64>) -> u64 {
    let mut seen = 0;
    let mut products = 0;
    for count in counts {
        products += seen * count;
        seen += count;
    }
    products
}

/// Observed disagreement over units holding at least two distinct labels.
///
/// Each unit contributes an integer numerator divided by `n_u - 1`, so the
/// value does not depend on annotator order.
fn observed_disagreement(pairable: &[&Vec<u64>]) -> f64 {
    pairable
        .iter()
        .filter(|counts| counts.iter().filter(|&&c| c > 0).count() > 1)
        .map(|counts| {
            let n_u: u64 = counts.iter().sum();
            pairwise_products(counts.iter().copied()) as f64 / (n_u - 1) as f64
        })
        .sum()
}

/// Expected disagreement from label totals over pairable units.
fn expected_disagreement(pairable: &[&Vec<u64>], nb_labels: usize) -> u64 {
    let totals = pairable.iter().fold(vec![0u64; nb_labels], |mut totals, counts| {
        for (total, count) in totals.iter_mut().zip(counts.iter()) {
            *total += count;
        }
        totals
    });
    pairwise_products(totals.into_iter())
}
