//! Mini-batch training loop.

use crate::{
    backend::{Backend, Tensor1D, Tensor2D},
    dataset::{validation_split_index, Dataset, InMemoryDataset},
    error::{RegressionError, Result},
    loss::Loss,
    model::{LayerSnapshot, TrainableModel},
    optimizer::Optimizer,
};
use log::{debug, info};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::marker::PhantomData;

mod evaluate;

pub use evaluate::evaluate;

/// Losses reported at the end of an epoch.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EpochLogs {
    pub loss: f64,
    /// `NaN` when no validation rows were held out.
    pub val_loss: f64,
}

/// Per-epoch losses of one training run.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TrainingHistory {
    pub loss: Vec<f64>,
    pub val_loss: Vec<f64>,
}

impl TrainingHistory {
    pub fn push(&mut self, logs: EpochLogs) {
        self.loss.push(logs.loss);
        self.val_loss.push(logs.val_loss);
    }

    pub fn epochs(&self) -> usize {
        self.loss.len()
    }

    pub fn final_loss(&self) -> Option<f64> {
        self.loss.last().copied()
    }

    pub fn final_val_loss(&self) -> Option<f64> {
        self.val_loss.last().copied()
    }
}

/// Callbacks invoked by [`Trainer::fit`]. Every method defaults to a no-op.
pub trait TrainingHooks {
    /// Before the first batch of `epoch`, with the parameters it starts from.
    fn on_epoch_begin(&mut self, _epoch: usize, _layer: &LayerSnapshot) {}

    /// After the last batch of `epoch`.
    fn on_epoch_end(&mut self, _epoch: usize, _logs: &EpochLogs) {}
}

impl TrainingHooks for () {}

/// Orchestrates the training loop for a `TrainableModel`.
///
/// Combines a loss function and an optimizer. Once built via [`TrainerBuilder`] it
/// is immutable and can be reused across models of the same type.
pub struct Trainer<B, L, O, M, P>
where
    B: Backend,
    L: Loss<B>,
    M: TrainableModel<B, Params = P, Gradients = P>,
    O: Optimizer<B, P>,
{
    pub(crate) batch_size: usize,
    pub(crate) max_epochs: usize,
    pub(crate) validation_split: f64,
    pub(crate) shuffle: bool,
    pub(crate) seed: Option<u64>,
    pub(crate) verbose: bool,
    pub(crate) loss_fn: L,
    pub(crate) optimizer: O,
    _phantom_backend: PhantomData<B>,
    _phantom_model: PhantomData<M>,
}

/// Fluent builder for a [`Trainer`].
///
/// Defaults:
/// - `batch_size`: 32
/// - `max_epochs`: 20
/// - `validation_split`: 0.0
/// - `shuffle`: true, unseeded
/// - `verbose`: true
pub struct TrainerBuilder<B, L, O, M, P>
where
    B: Backend,
    L: Loss<B>,
    M: TrainableModel<B, Params = P, Gradients = P>,
    O: Optimizer<B, P>,
{
    batch_size: usize,
    max_epochs: usize,
    validation_split: f64,
    shuffle: bool,
    seed: Option<u64>,
    verbose: bool,
    loss_fn: L,
    optimizer: O,
    _phantom_backend: PhantomData<B>,
    _phantom_model: PhantomData<M>,
}

impl<B, L, O, M, P> TrainerBuilder<B, L, O, M, P>
where
    B: Backend,
    L: Loss<B>,
    M: TrainableModel<B, Params = P, Gradients = P>,
    O: Optimizer<B, P>,
{
    pub fn new(loss_fn: L, optimizer: O) -> Self {
        Self {
            batch_size: 32,
            max_epochs: 20,
            validation_split: 0.0,
            shuffle: true,
            seed: None,
            verbose: true,
            loss_fn,
            optimizer,
            _phantom_backend: PhantomData,
            _phantom_model: PhantomData,
        }
    }

    pub fn batch_size(mut self, size: usize) -> Self {
        self.batch_size = size;
        self
    }

    pub fn max_epochs(mut self, epochs: usize) -> Self {
        self.max_epochs = epochs;
        self
    }

    /// Fraction of the training rows, taken from the end, held out for validation.
    pub fn validation_split(mut self, fraction: f64) -> Self {
        self.validation_split = fraction;
        self
    }

    /// Reorders the fit rows before every epoch. Validation rows never move.
    pub fn shuffle(mut self, shuffle: bool) -> Self {
        self.shuffle = shuffle;
        self
    }

    /// Fixes the per-epoch shuffle order.
    pub fn shuffle_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    /// Epoch losses go to `info` when `true`, `debug` otherwise.
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn build(self) -> Trainer<B, L, O, M, P> {
        Trainer {
            batch_size: self.batch_size,
            max_epochs: self.max_epochs,
            validation_split: self.validation_split,
            shuffle: self.shuffle,
            seed: self.seed,
            verbose: self.verbose,
            loss_fn: self.loss_fn,
            optimizer: self.optimizer,
            _phantom_backend: PhantomData,
            _phantom_model: PhantomData,
        }
    }
}

impl<B, L, O, M, P> Trainer<B, L, O, M, P>
where
    B: Backend,
    L: Loss<B>,
    M: TrainableModel<B, Params = P, Gradients = P>,
    O: Optimizer<B, P>,
{
    /// Starts the builder, equivalent to [`TrainerBuilder::new`].
    pub fn builder(loss_fn: L, optimizer: O) -> TrainerBuilder<B, L, O, M, P> {
        TrainerBuilder::new(loss_fn, optimizer)
    }
}

impl<B, L, O, M, P> Trainer<B, L, O, M, P>
where
    B: Backend,
    L: Loss<B, Target = Tensor1D<B>, Prediction = Tensor1D<B>>,
    M: TrainableModel<
        B,
        Input = Tensor2D<B>,
        Prediction = L::Prediction,
        Params = P,
        Gradients = P,
    >,
    O: Optimizer<B, P>,
{
    /// Trains `model` on `dataset` for `max_epochs` epochs.
    ///
    /// The trailing `validation_split` fraction of `dataset` is held out and scored
    /// after every epoch; the rest is shuffled (unless disabled) and fitted batch by
    /// batch.
    ///
    /// # Errors
    /// - empty dataset, or nothing left to fit after the validation split
    /// - zero batch size or a validation split outside `[0, 1)`
    /// - a non-finite batch loss (divergence)
    pub fn fit<H>(
        &self,
        mut model: M,
        dataset: &InMemoryDataset<B>,
        hooks: &mut H,
    ) -> Result<(M::Output, TrainingHistory)>
    where
        H: TrainingHooks + ?Sized,
    {
        if dataset.is_empty() {
            return Err(RegressionError::EmptyData(
                "training set is empty".to_string(),
            ));
        }
        if self.batch_size == 0 {
            return Err(RegressionError::InvalidParameter(
                "batch size must be at least 1".to_string(),
            ));
        }

        let split_at = validation_split_index(dataset.len(), self.validation_split)?;
        let (fit_set, val_set) = dataset.split_at(split_at)?;
        if fit_set.is_empty() {
            return Err(RegressionError::EmptyData(format!(
                "validation split {} leaves no rows to fit out of {}",
                self.validation_split,
                dataset.len()
            )));
        }
        info!(
            "training on {} samples, validating on {} ({} epochs, batch size {})",
            fit_set.len(),
            val_set.len(),
            self.max_epochs,
            self.batch_size
        );

        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_rng(&mut rand::rng()),
        };
        let mut order: Vec<usize> = (0..fit_set.len()).collect();

        let mut history = TrainingHistory::default();
        for epoch in 0..self.max_epochs {
            hooks.on_epoch_begin(epoch, &model.snapshot());

            let shuffled;
            let epoch_set = if self.shuffle {
                order.shuffle(&mut rng);
                shuffled = fit_set.select(&order)?;
                &shuffled
            } else {
                &fit_set
            };

            let mut weighted_loss = 0.0;
            for (i, batch_result) in epoch_set.batches(self.batch_size).enumerate() {
                let (batch_x, batch_y) = batch_result?;
                let preds = model.forward(&batch_x);
                let batch_loss = self.loss_fn.loss(&preds, &batch_y).to_f64();
                if !batch_loss.is_finite() {
                    return Err(RegressionError::NumericalError(format!(
                        "loss diverged at epoch {} batch {}",
                        epoch, i
                    )));
                }
                debug!("epoch {} batch {}: loss = {}", epoch, i, batch_loss);
                weighted_loss += batch_loss * batch_y.len() as f64;

                let grad_preds = self.loss_fn.grad_wrt_prediction(&preds, &batch_y);
                let grads = model.backward(&batch_x, &grad_preds);
                let new_params = self.optimizer.step(model.params(), &grads);
                model.update_params(&new_params);
            }

            let logs = EpochLogs {
                loss: weighted_loss / fit_set.len() as f64,
                val_loss: self.validation_loss(&model, &val_set),
            };
            if self.verbose {
                info!(
                    "Epoch {}: loss = {}, val_loss = {}",
                    epoch, logs.loss, logs.val_loss
                );
            } else {
                debug!(
                    "Epoch {}: loss = {}, val_loss = {}",
                    epoch, logs.loss, logs.val_loss
                );
            }
            hooks.on_epoch_end(epoch, &logs);
            history.push(logs);
        }

        Ok((model.into_fitted(), history))
    }

    fn validation_loss(&self, model: &M, val_set: &InMemoryDataset<B>) -> f64 {
        if val_set.is_empty() {
            return f64::NAN;
        }
        let preds = model.forward(val_set.features());
        self.loss_fn.loss(&preds, val_set.labels()).to_f64()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        backend::{CpuBackend, Scalar},
        loss::MSELoss,
        model::{InferenceModel, LinearParams, LinearRegression},
        optimizer::SGD,
    };

    type LinearTrainer = Trainer<
        CpuBackend,
        MSELoss,
        SGD<CpuBackend>,
        LinearRegression<CpuBackend>,
        LinearParams<CpuBackend>,
    >;

    type LinearTrainerBuilder = TrainerBuilder<
        CpuBackend,
        MSELoss,
        SGD<CpuBackend>,
        LinearRegression<CpuBackend>,
        LinearParams<CpuBackend>,
    >;

    fn dataset(x: Vec<f64>, y: Vec<f64>) -> InMemoryDataset<CpuBackend> {
        InMemoryDataset::from_columns(&Tensor1D::new(x), &Tensor1D::new(y)).unwrap()
    }

    #[derive(Default)]
    struct Recorder {
        begins: Vec<(usize, LayerSnapshot)>,
        ends: Vec<(usize, EpochLogs)>,
    }

    impl TrainingHooks for Recorder {
        fn on_epoch_begin(&mut self, epoch: usize, layer: &LayerSnapshot) {
            self.begins.push((epoch, layer.clone()));
        }

        fn on_epoch_end(&mut self, epoch: usize, logs: &EpochLogs) {
            self.ends.push((epoch, *logs));
        }
    }

    #[test]
    fn test_trainer_builder_default_values() {
        let builder = LinearTrainerBuilder::new(MSELoss, SGD::new(0.1));

        assert_eq!(builder.batch_size, 32);
        assert_eq!(builder.max_epochs, 20);
        assert_eq!(builder.validation_split, 0.0);
        assert!(builder.shuffle);
        assert_eq!(builder.seed, None);
        assert!(builder.verbose);
    }

    #[test]
    fn test_trainer_builder_chaining() {
        let trainer: LinearTrainer = Trainer::builder(MSELoss, SGD::new(0.1))
            .batch_size(128)
            .max_epochs(250)
            .validation_split(0.2)
            .shuffle(false)
            .shuffle_seed(Some(3))
            .verbose(false)
            .build();

        assert_eq!(trainer.batch_size, 128);
        assert!(!trainer.shuffle);
        assert_eq!(trainer.seed, Some(3));
        assert_eq!(trainer.max_epochs, 250);
        assert_eq!(trainer.validation_split, 0.2);
        assert!(!trainer.verbose);
    }

    #[test]
    fn test_fit_learns_line() {
        // y = 0.5 x + 0.25
        let x: Vec<f64> = (0..20).map(|i| i as f64 / 19.0).collect();
        let y: Vec<f64> = x.iter().map(|v| 0.5 * v + 0.25).collect();
        let ds = dataset(x, y);

        let trainer: LinearTrainer = Trainer::builder(MSELoss, SGD::new(0.2))
            .batch_size(4)
            .max_epochs(300)
            .verbose(false)
            .build();
        let (fitted, history) = trainer
            .fit(LinearRegression::new(1), &ds, &mut ())
            .unwrap();

        let p = fitted.extract_params();
        assert!((p.weights[0] - 0.5).abs() < 0.01);
        assert!((p.bias - 0.25).abs() < 0.01);
        assert_eq!(history.epochs(), 300);
        assert!(history.final_loss().unwrap() < 1e-4);
    }

    #[test]
    fn test_full_batch_loss_strictly_decreases() {
        let ds = dataset(vec![0.0, 0.25, 0.5, 1.0], vec![0.1, 0.3, 0.6, 0.9]);
        let trainer: LinearTrainer = Trainer::builder(MSELoss, SGD::new(0.1))
            .max_epochs(20)
            .verbose(false)
            .build();
        let (_, history) = trainer
            .fit(LinearRegression::create(1, Some(5)), &ds, &mut ())
            .unwrap();

        for pair in history.loss.windows(2) {
            assert!(pair[1] < pair[0], "{:?}", history.loss);
        }
    }

    #[test]
    fn test_seeded_shuffle_is_reproducible() {
        let x: Vec<f64> = (0..12).map(|i| i as f64 / 11.0).collect();
        let y: Vec<f64> = x.iter().map(|v| 0.7 * v + 0.1).collect();
        let ds = dataset(x, y);

        let fit = |shuffle: bool, seed: Option<u64>| {
            let trainer: LinearTrainer = Trainer::builder(MSELoss, SGD::new(0.1))
                .batch_size(1)
                .max_epochs(3)
                .shuffle(shuffle)
                .shuffle_seed(seed)
                .verbose(false)
                .build();
            let (fitted, history) = trainer
                .fit(LinearRegression::new(1), &ds, &mut ())
                .unwrap();
            (fitted.extract_params(), history)
        };

        let (a, history_a) = fit(true, Some(21));
        let (b, history_b) = fit(true, Some(21));
        assert_eq!(a, b);
        assert_eq!(history_a, history_b);

        // batch size 1 makes the update order visible in the parameters
        let (ordered, _) = fit(false, Some(21));
        assert_ne!(a, ordered);
    }

    #[test]
    fn test_shuffle_keeps_validation_rows() {
        // 10 rows, 0.2 held out: predictions equal x, labels are zero.
        let ds = dataset((0..10).map(|i| i as f64).collect(), vec![0.0; 10]);
        let trainer: LinearTrainer = Trainer::builder(MSELoss, SGD::new(0.0))
            .max_epochs(2)
            .validation_split(0.2)
            .shuffle_seed(Some(8))
            .verbose(false)
            .build();
        let start = LinearParams {
            weights: Tensor1D::new(vec![1.0]),
            bias: Scalar::new(0.0),
        };
        let (_, history) = trainer
            .fit(LinearRegression::from_params(start), &ds, &mut ())
            .unwrap();

        let expected_val = (64.0 + 81.0) / 2.0;
        assert!(history.val_loss.iter().all(|v| (v - expected_val).abs() < 1e-12));
        let expected_loss = (0..8).map(|i| (i * i) as f64).sum::<f64>() / 8.0;
        assert!(history.loss.iter().all(|v| (v - expected_loss).abs() < 1e-9));
    }

    #[test]
    fn test_validation_rows_are_trailing() {
        // 10 rows, 0.2 held out: the last two rows are the validation set.
        let ds = dataset((0..10).map(|i| i as f64).collect(), vec![0.0; 10]);
        let trainer: LinearTrainer = Trainer::builder(MSELoss, SGD::new(0.0))
            .max_epochs(1)
            .validation_split(0.2)
            .verbose(false)
            .build();

        let start = LinearParams {
            weights: Tensor1D::new(vec![1.0]),
            bias: Scalar::new(0.0),
        };
        let (_, history) = trainer
            .fit(LinearRegression::from_params(start), &ds, &mut ())
            .unwrap();

        // predictions equal x; fit rows 0..8, validation rows 8 and 9
        let fit_loss = (0..8).map(|i| (i * i) as f64).sum::<f64>() / 8.0;
        assert!((history.loss[0] - fit_loss).abs() < 1e-9);
        assert!((history.val_loss[0] - (64.0 + 81.0) / 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_validation_is_nan() {
        let ds = dataset(vec![0.0, 1.0], vec![0.0, 1.0]);
        let trainer: LinearTrainer = Trainer::builder(MSELoss, SGD::new(0.1))
            .max_epochs(2)
            .verbose(false)
            .build();
        let (_, history) = trainer.fit(LinearRegression::new(1), &ds, &mut ()).unwrap();
        assert!(history.final_val_loss().unwrap().is_nan());
    }

    #[test]
    fn test_hooks_called_every_epoch() {
        let ds = dataset(vec![0.0, 0.5, 1.0, 0.75], vec![0.0, 0.5, 1.0, 0.75]);
        let trainer: LinearTrainer = Trainer::builder(MSELoss, SGD::new(0.1))
            .max_epochs(3)
            .verbose(false)
            .build();
        let mut recorder = Recorder::default();
        let (_, history) = trainer
            .fit(LinearRegression::new(1), &ds, &mut recorder)
            .unwrap();

        assert_eq!(recorder.begins.len(), 3);
        assert_eq!(recorder.ends.len(), 3);
        assert_eq!(recorder.begins[0].1.weights, vec![0.0]);
        assert_ne!(recorder.begins[1].1, recorder.begins[0].1);
        for (i, (epoch, logs)) in recorder.ends.iter().enumerate() {
            assert_eq!(*epoch, i);
            assert_eq!(logs.loss, history.loss[i]);
        }
    }

    #[test]
    fn test_invalid_configuration() {
        let ds = dataset(vec![0.0, 1.0], vec![0.0, 1.0]);

        let zero_batch: LinearTrainer = Trainer::builder(MSELoss, SGD::new(0.1))
            .batch_size(0)
            .build();
        assert!(matches!(
            zero_batch.fit(LinearRegression::new(1), &ds, &mut ()),
            Err(RegressionError::InvalidParameter(_))
        ));

        let bad_split: LinearTrainer = Trainer::builder(MSELoss, SGD::new(0.1))
            .validation_split(1.0)
            .build();
        assert!(matches!(
            bad_split.fit(LinearRegression::new(1), &ds, &mut ()),
            Err(RegressionError::InvalidParameter(_))
        ));

        // one row, 0.2 held out -> floor(0.8) = 0 rows to fit
        let single = dataset(vec![0.5], vec![0.5]);
        let trainer: LinearTrainer = Trainer::builder(MSELoss, SGD::new(0.1))
            .validation_split(0.2)
            .build();
        assert!(matches!(
            trainer.fit(LinearRegression::new(1), &single, &mut ()),
            Err(RegressionError::EmptyData(_))
        ));
    }

    #[test]
    fn test_divergence_is_reported() {
        let ds = dataset(vec![0.0, 1.0e3, 2.0e3, 3.0e3], vec![0.0, 1.0, 2.0, 3.0]);
        let trainer: LinearTrainer = Trainer::builder(MSELoss, SGD::new(10.0))
            .batch_size(4)
            .max_epochs(200)
            .verbose(false)
            .build();
        assert!(matches!(
            trainer.fit(LinearRegression::new(1), &ds, &mut ()),
            Err(RegressionError::NumericalError(_))
        ));
    }
}
