//! The interface a component implements to be trained.

use std::path::Path;

use crate::{BatchData, TrainingResult};

/// A component whose parameters can be fitted by [`Trainer`](crate::Trainer).
///
/// The trainer owns the loop: it preprocesses every item once, collates
/// batches, runs forward passes, scales and backpropagates the loss, and
/// asks the component to step its optimizer. Parameter storage, gradients
/// and the optimizer itself stay inside the component.
pub trait TrainableComponent {
    /// Raw data item, typically a document or an annotation.
    type Item;
    /// Item after preprocessing, ready to be collated.
    type Processed;

    /// Create the optimizer with an initial learning rate.
    fn configure_optimizer(&mut self, learning_rate: f64);

    fn preprocess(&self, item: &Self::Item) -> TrainingResult<Self::Processed>;

    /// Pack preprocessed items into one batch.
    fn collate(&self, items: Vec<&Self::Processed>) -> BatchData;

    /// Run the model on a batch, returning its outputs and, when
    /// `return_loss` is set, the batch loss.
    fn forward(
        &mut self,
        inputs: &BatchData,
        return_loss: bool,
        eval_mode: bool,
    ) -> TrainingResult<(BatchData, Option<f64>)>;

    /// Accumulate gradients of the last training forward pass, with the
    /// loss multiplied by `loss_scale`.
    fn backward(&mut self, loss_scale: f64) -> TrainingResult<()>;

    /// Apply accumulated gradients, then reset them.
    fn optimizer_step(&mut self) -> TrainingResult<()>;

    fn learning_rate(&self) -> f64;

    fn set_learning_rate(&mut self, learning_rate: f64);

    /// Write the component state (parameters and optimizer) into `dir`.
    fn save(&self, dir: &Path) -> TrainingResult<()>;

    /// Restore the component state written by [`save`](Self::save).
    fn load(&mut self, dir: &Path) -> TrainingResult<()>;
}
