//! Agreement and classification metrics for medkit annotations.
//!
//! - [`krippendorff_alpha`]: agreement among any number of annotators,
//!   nominal labels, missing values allowed.
//! - [`cohen_kappa`]: agreement between two annotators.
//! - [`classification_report`] / [`flatten_report`]: per-class precision,
//!   recall and F1 with macro and weighted averages.
//! - [`TextClassificationEvaluator`]: the above, applied to one attribute
//!   label of [`medkit::TextDocument`]s.

mod classification;
mod errors;
mod evaluator;
mod irr;
mod kappa;
mod label;

pub use classification::{classification_report, flatten_report, Average, ClassMetrics, ClassificationReport};
pub use errors::{MetricsError, MetricsResult};
pub use evaluator::TextClassificationEvaluator;
pub use irr::krippendorff_alpha;
pub use kappa::cohen_kappa;
pub use label::Label;
