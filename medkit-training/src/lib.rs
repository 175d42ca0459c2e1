//! Generic training loop for medkit components.
//!
//! A component implements [`TrainableComponent`]; the [`Trainer`] drives
//! preprocessing, batching, forward/backward passes, evaluation, learning
//! rate scheduling and checkpointing. Custom metrics come from a
//! [`MetricsComputer`], progress is reported through [`TrainerCallback`]s.
//!
//! Checkpoints are directories named `checkpoint_{epoch}_{timestamp}` under
//! [`TrainerConfig::output_dir`]. Only the best checkpoint among the former
//! bests is kept.

mod batch;
mod callbacks;
mod component;
mod config;
mod errors;
mod metrics;
mod scheduler;
mod trainer;

pub use batch::BatchData;
pub use callbacks::{DefaultPrinterCallback, EpochMetrics, Phase, TrainerCallback};
pub use component::TrainableComponent;
pub use config::{TrainerConfig, CONFIG_NAME};
pub use errors::{TrainingError, TrainingResult};
pub use metrics::{Metrics, MetricsComputer};
pub use scheduler::{LrScheduler, ReduceLrOnPlateau, StepLr, SCHEDULER_NAME};
pub use trainer::Trainer;
