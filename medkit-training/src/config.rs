//! Trainer configuration, stored as TOML next to every checkpoint.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{TrainingError, TrainingResult};

/// File name of the configuration inside a checkpoint directory.
pub const CONFIG_NAME: &str = "trainer_config.toml";

/// Parameters of a training run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainerConfig {
    /// Directory receiving the checkpoints.
    pub output_dir: PathBuf,
    pub learning_rate: f64,
    pub nb_training_epochs: usize,
    pub batch_size: usize,
    /// Seed for the shuffling of training data, random when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    /// Number of steps whose gradients are accumulated before an
    /// optimizer step.
    pub gradient_accumulation_steps: usize,
    /// Also compute custom metrics on training data.
    pub do_metrics_in_training: bool,
    /// Eval metric driving metric-based learning rate schedulers.
    pub metric_to_track_lr: String,
    /// Save a checkpoint every N epochs; 0 saves only after the last one.
    pub checkpoint_period: usize,
    /// Eval metric used to pick the best checkpoint.
    pub checkpoint_metric: String,
    pub minimize_checkpoint_metric: bool,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("output"),
            learning_rate: 1e-5,
            nb_training_epochs: 3,
            batch_size: 1,
            seed: None,
            gradient_accumulation_steps: 1,
            do_metrics_in_training: false,
            metric_to_track_lr: "loss".to_string(),
            checkpoint_period: 1,
            checkpoint_metric: "loss".to_string(),
            minimize_checkpoint_metric: true,
        }
    }
}

impl TrainerConfig {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> TrainingResult<()> {
        let invalid = |message: &str| {
            Err(TrainingError::Config {
                message: message.to_string(),
            })
        };
        if !(self.learning_rate.is_finite() && self.learning_rate > 0.0) {
            return invalid("learning_rate must be a positive number");
        }
        if self.batch_size == 0 {
            return invalid("batch_size must be at least 1");
        }
        if self.gradient_accumulation_steps == 0 {
            return invalid("gradient_accumulation_steps must be at least 1");
        }
        Ok(())
    }

    pub fn from_toml_str(content: &str) -> TrainingResult<Self> {
        let config: Self = toml::from_str(content).map_err(|e| TrainingError::Config {
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> TrainingResult<String> {
        toml::to_string_pretty(self).map_err(|e| TrainingError::Config {
            message: e.to_string(),
        })
    }

    /// Load and validate a configuration file.
    pub fn load(path: &Path) -> TrainingResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| TrainingError::io(path, e))?;
        Self::from_toml_str(&content)
    }

    pub fn save(&self, path: &Path) -> TrainingResult<()> {
        fs::write(path, self.to_toml_string()?).map_err(|e| TrainingError::io(path, e))
    }
}
