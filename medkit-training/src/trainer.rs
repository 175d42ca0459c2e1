//! The training loop.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::config::CONFIG_NAME;
use crate::{
    BatchData, DefaultPrinterCallback, EpochMetrics, LrScheduler, Metrics, MetricsComputer, Phase,
    TrainableComponent, TrainerCallback, TrainerConfig, TrainingError, TrainingResult,
};

/// Best checkpoint so far and its metric value.
struct BestCheckpoint {
    dir: PathBuf,
    metric: f64,
}

/// Fits a [`TrainableComponent`] on training data, evaluating and saving
/// checkpoints after epochs.
///
/// Items are preprocessed once when the trainer is built. Training batches
/// are drawn in a new random order every epoch; evaluation batches keep the
/// data order.
pub struct Trainer<C: TrainableComponent> {
    config: TrainerConfig,
    component: C,
    train_data: Vec<C::Processed>,
    eval_data: Vec<C::Processed>,
    metrics_computer: Option<Box<dyn MetricsComputer>>,
    lr_scheduler: Option<Box<dyn LrScheduler>>,
    callback: Box<dyn TrainerCallback>,
    rng: StdRng,
}

impl<C: TrainableComponent> Trainer<C> {
    pub fn new(
        mut component: C,
        config: TrainerConfig,
        train_data: &[C::Item],
        eval_data: &[C::Item],
    ) -> TrainingResult<Self> {
        config.validate()?;
        if train_data.is_empty() || eval_data.is_empty() {
            return Err(TrainingError::Config {
                message: "training and evaluation data must not be empty".to_string(),
            });
        }
        fs::create_dir_all(&config.output_dir)
            .map_err(|e| TrainingError::io(&config.output_dir, e))?;

        let train_data = train_data
            .iter()
            .map(|item| component.preprocess(item))
            .collect::<TrainingResult<Vec<_>>>()?;
        let eval_data = eval_data
            .iter()
            .map(|item| component.preprocess(item))
            .collect::<TrainingResult<Vec<_>>>()?;

        component.configure_optimizer(config.learning_rate);
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Ok(Self {
            config,
            component,
            train_data,
            eval_data,
            metrics_computer: None,
            lr_scheduler: None,
            callback: Box::new(DefaultPrinterCallback),
            rng,
        })
    }

    /// Compute custom metrics during evaluation, and during training when
    /// `do_metrics_in_training` is set.
    pub fn with_metrics_computer(mut self, metrics_computer: impl MetricsComputer + 'static) -> Self {
        self.metrics_computer = Some(Box::new(metrics_computer));
        self
    }

    /// Adjust the learning rate after each epoch. Without a scheduler the
    /// learning rate stays constant.
    pub fn with_lr_scheduler(mut self, lr_scheduler: impl LrScheduler + 'static) -> Self {
        self.lr_scheduler = Some(Box::new(lr_scheduler));
        self
    }

    /// Replace the default [`DefaultPrinterCallback`].
    pub fn with_callback(mut self, callback: impl TrainerCallback + 'static) -> Self {
        self.callback = Box::new(callback);
        self
    }

    pub fn config(&self) -> &TrainerConfig {
        &self.config
    }

    pub fn component(&self) -> &C {
        &self.component
    }

    pub fn into_component(self) -> C {
        self.component
    }

    /// Run every epoch and return the metrics history.
    pub fn train(&mut self) -> TrainingResult<Vec<EpochMetrics>> {
        self.callback.on_train_begin(&self.config);
        let nb_epochs = self.config.nb_training_epochs;
        let mut history = Vec::with_capacity(nb_epochs);
        let mut best: Option<BestCheckpoint> = None;

        for epoch in 1..=nb_epochs {
            let started = Instant::now();
            self.callback.on_epoch_begin(epoch);

            let train = self.training_epoch()?;
            let eval = self.evaluation_epoch()?;
            self.update_learning_rate(&eval)?;

            let metrics = EpochMetrics { train, eval };
            self.callback.on_epoch_end(&metrics, epoch, started.elapsed());

            let period = self.config.checkpoint_period;
            let is_checkpoint_epoch = epoch == nb_epochs || (period != 0 && epoch % period == 0);
            if is_checkpoint_epoch {
                let checkpoint_dir = self.save(epoch)?;
                best = self.track_best(best, checkpoint_dir, &metrics.eval)?;
            }
            history.push(metrics);
        }

        self.callback.on_train_end();
        Ok(history)
    }

    fn training_epoch(&mut self) -> TrainingResult<Metrics> {
        let mut order: Vec<usize> = (0..self.train_data.len()).collect();
        order.shuffle(&mut self.rng);

        let batch_size = self.config.batch_size;
        let accumulation = self.config.gradient_accumulation_steps;
        let with_metrics = self.config.do_metrics_in_training && self.metrics_computer.is_some();
        let nb_batches = order.len().div_ceil(batch_size);

        let mut total_loss = 0.0;
        let mut data_for_metrics = BatchData::new();
        for (step, indices) in order.chunks(batch_size).enumerate() {
            self.callback.on_step_begin(step, nb_batches, Phase::Train);

            let input_batch = self
                .component
                .collate(indices.iter().map(|&idx| &self.train_data[idx]).collect());
            let (model_output, loss) = self.forward_pass(&input_batch, false)?;

            let loss_scale = 1.0 / accumulation as f64;
            self.component.backward(loss_scale)?;
            if (step + 1) % accumulation == 0 || step + 1 == nb_batches {
                self.component.optimizer_step()?;
            }
            total_loss += loss * loss_scale;

            if with_metrics {
                if let Some(computer) = &self.metrics_computer {
                    data_for_metrics.extend(computer.prepare_batch(&model_output, &input_batch));
                }
            }
            self.callback.on_step_end(step, nb_batches, Phase::Train);
        }

        let mut metrics = Metrics::new();
        metrics.insert("loss".to_string(), total_loss / nb_batches as f64);
        if with_metrics {
            if let Some(computer) = &self.metrics_computer {
                metrics.extend(computer.compute(&data_for_metrics));
            }
        }
        Ok(metrics)
    }

    fn evaluation_epoch(&mut self) -> TrainingResult<Metrics> {
        let batch_size = self.config.batch_size;
        let nb_batches = self.eval_data.len().div_ceil(batch_size);

        let mut total_loss = 0.0;
        let mut data_for_metrics = BatchData::new();
        for step in 0..nb_batches {
            self.callback.on_step_begin(step, nb_batches, Phase::Eval);

            let start = step * batch_size;
            let end = (start + batch_size).min(self.eval_data.len());
            let input_batch = self.component.collate(self.eval_data[start..end].iter().collect());
            let (model_output, loss) = self.forward_pass(&input_batch, true)?;
            total_loss += loss;

            if let Some(computer) = &self.metrics_computer {
                data_for_metrics.extend(computer.prepare_batch(&model_output, &input_batch));
            }
            self.callback.on_step_end(step, nb_batches, Phase::Eval);
        }

        let mut metrics = Metrics::new();
        metrics.insert("loss".to_string(), total_loss / nb_batches as f64);
        if let Some(computer) = &self.metrics_computer {
            metrics.extend(computer.compute(&data_for_metrics));
        }
        Ok(metrics)
    }

    fn forward_pass(&mut self, inputs: &BatchData, eval_mode: bool) -> TrainingResult<(BatchData, f64)> {
        let (model_output, loss) = self.component.forward(inputs, true, eval_mode)?;
        let loss = loss.ok_or(TrainingError::MissingLoss)?;
        Ok((model_output, loss))
    }

    fn update_learning_rate(&mut self, eval_metrics: &Metrics) -> TrainingResult<()> {
        let Some(scheduler) = self.lr_scheduler.as_mut() else {
            return Ok(());
        };

        let metric = if scheduler.requires_metric() {
            let name = &self.config.metric_to_track_lr;
            let value = eval_metrics
                .get(name)
                .copied()
                .ok_or_else(|| TrainingError::MissingMetric { name: name.clone() })?;
            Some(value)
        } else {
            None
        };

        let current = self.component.learning_rate();
        let updated = scheduler.step(current, metric);
        if updated != current {
            tracing::debug!(from = current, to = updated, "learning rate updated");
            self.component.set_learning_rate(updated);
        }
        Ok(())
    }

    /// Write a checkpoint for `epoch` and return its directory.
    ///
    /// A checkpoint holds the trainer configuration, the scheduler state
    /// when there is a scheduler, and whatever the component saves.
    pub fn save(&mut self, epoch: usize) -> TrainingResult<PathBuf> {
        let timestamp = chrono::Utc::now().format("%Y%m%dT%H%M%SZ");
        let name = format!("checkpoint_{:03}_{}", epoch, timestamp);
        let checkpoint_dir = self.config.output_dir.join(name);

        self.callback.on_save(&checkpoint_dir);
        fs::create_dir_all(&checkpoint_dir).map_err(|e| TrainingError::io(&checkpoint_dir, e))?;

        self.config.save(&checkpoint_dir.join(CONFIG_NAME))?;
        if let Some(scheduler) = &self.lr_scheduler {
            scheduler.save(&checkpoint_dir)?;
        }
        self.component.save(&checkpoint_dir)?;

        Ok(checkpoint_dir)
    }

    /// Keep the better of the previous best checkpoint and the last one,
    /// deleting the previous best when it is beaten.
    fn track_best(
        &self,
        best: Option<BestCheckpoint>,
        checkpoint_dir: PathBuf,
        eval_metrics: &Metrics,
    ) -> TrainingResult<Option<BestCheckpoint>> {
        let name = &self.config.checkpoint_metric;
        let metric = eval_metrics
            .get(name)
            .copied()
            .ok_or_else(|| TrainingError::MissingMetric { name: name.clone() })?;

        let Some(best) = best else {
            return Ok(Some(BestCheckpoint {
                dir: checkpoint_dir,
                metric,
            }));
        };

        let improved = if self.config.minimize_checkpoint_metric {
            metric < best.metric
        } else {
            metric > best.metric
        };
        if !improved {
            return Ok(Some(best));
        }

        if best.dir != checkpoint_dir {
            fs::remove_dir_all(&best.dir).map_err(|e| TrainingError::io(&best.dir, e))?;
            tracing::debug!(dir = %best.dir.display(), "removed former best checkpoint");
        }
        Ok(Some(BestCheckpoint {
            dir: checkpoint_dir,
            metric,
        }))
    }
}
