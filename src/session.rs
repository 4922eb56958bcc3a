//! Prepared data and the current model of one interactive run.
//!
//! A [`Session`] loads, normalizes and splits the dataset once. Training replaces
//! the model wholesale; testing, predicting and saving read it; loading swaps in a
//! model from disk.

use crate::backend::{Backend, CpuBackend, Tensor1D};
use crate::config::PipelineConfig;
use crate::dataset::loader::unzip_samples;
use crate::dataset::{HousingCsvLoader, InMemoryDataset, Sample, Split};
use crate::error::{RegressionError, Result};
use crate::loss::MSELoss;
use crate::model::{
    Fitted, InferenceModel, LayerSnapshot, LinearModel, LinearParams, LinearRegression,
};
use crate::optimizer::SGD;
use crate::preprocessing::{normalize, FittedMinMaxScaler, FittedTransformer, NormalizedTensor};
use crate::serialization::ModelRecord;
use crate::trainer::{evaluate, Trainer, TrainingHistory, TrainingHooks};
use crate::viz::Series;
use log::info;
use std::path::Path;

type LinearTrainer<B> = Trainer<B, MSELoss, SGD<B>, LinearRegression<B>, LinearParams<B>>;

/// The dataset after loading, normalization and the train/test split.
#[derive(Clone, Debug)]
pub struct PreparedData<B: Backend> {
    pub samples: Vec<Sample>,
    pub feature: NormalizedTensor<B>,
    pub label: NormalizedTensor<B>,
    pub split: Split<B>,
}

impl<B: Backend> PreparedData<B> {
    /// Normalizes both columns and halves them. `samples` keep their order.
    pub fn from_samples(samples: Vec<Sample>) -> Result<Self> {
        let (xs, ys) = unzip_samples(&samples);
        let feature = normalize(&Tensor1D::<B>::new(xs))?;
        let label = normalize(&Tensor1D::<B>::new(ys))?;
        let split = Split::new(&feature.tensor, &label.tensor)?;
        Ok(Self {
            samples,
            feature,
            label,
            split,
        })
    }
}

/// A fitted model plus the scalers that map between raw units and model space.
#[derive(Clone, Debug)]
pub struct TrainedModel<B: Backend> {
    pub model: LinearModel<B, Fitted>,
    pub feature_scaler: FittedMinMaxScaler<B>,
    pub label_scaler: FittedMinMaxScaler<B>,
    /// `None` for models loaded from disk.
    pub history: Option<TrainingHistory>,
}

impl<B: Backend> TrainedModel<B> {
    pub fn to_record(&self) -> ModelRecord {
        let layer = self.model.extract_params();
        ModelRecord::new(
            layer.weights,
            layer.bias,
            self.feature_scaler.extract_params(),
            self.label_scaler.extract_params(),
        )
    }

    pub fn from_record(record: ModelRecord) -> Result<Self> {
        if record.weights.len() != 1 {
            return Err(RegressionError::ShapeMismatch {
                expected: "1 weight".to_string(),
                got: format!("{} weights", record.weights.len()),
            });
        }
        Ok(Self {
            model: LinearModel::<B, Fitted>::from_params(LayerSnapshot {
                weights: record.weights,
                bias: record.bias,
            })?,
            feature_scaler: FittedMinMaxScaler::from_params(record.feature_bounds)?,
            label_scaler: FittedMinMaxScaler::from_params(record.label_bounds)?,
            history: None,
        })
    }
}

/// Owns everything the controller acts on.
pub struct Session<B: Backend = CpuBackend> {
    config: PipelineConfig,
    data: PreparedData<B>,
    model: Option<TrainedModel<B>>,
}

impl<B: Backend> Session<B> {
    /// Loads the configured CSV, then normalizes and splits it.
    ///
    /// # Errors
    /// Invalid configuration, and every loader or normalization error. Nothing is
    /// retried.
    pub fn prepare(config: PipelineConfig) -> Result<Self> {
        config.validate()?;
        let samples = HousingCsvLoader::new(&config.data_path)
            .with_columns(&config.feature_column, &config.label_column)
            .with_seed(config.seed)
            .load()?;
        Self::from_samples(config, samples)
    }

    /// Builds a session from already loaded samples, without reshuffling.
    pub fn from_samples(config: PipelineConfig, samples: Vec<Sample>) -> Result<Self> {
        config.validate()?;
        let data = PreparedData::from_samples(samples)?;
        info!(
            "prepared {} training and {} testing samples",
            data.split.train_len(),
            data.split.test_len()
        );
        Ok(Self {
            config,
            data,
            model: None,
        })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn data(&self) -> &PreparedData<B> {
        &self.data
    }

    pub fn model(&self) -> Option<&TrainedModel<B>> {
        self.model.as_ref()
    }

    pub fn has_model(&self) -> bool {
        self.model.is_some()
    }

    /// Raw `(feature, label)` points for plotting.
    pub fn scatter_points(&self) -> Series {
        Series::new(
            "original",
            self.data.samples.iter().map(|s| (s.x, s.y)).collect(),
        )
    }

    /// The untrained model a training run starts from.
    pub fn create_model(&self) -> LinearRegression<B> {
        LinearRegression::create(1, self.config.seed)
    }

    /// Trains a fresh model on the training half and makes it current.
    ///
    /// The previous model is discarded first, so a failed run leaves no model.
    pub fn train<H>(&mut self, hooks: &mut H) -> Result<&TrainingHistory>
    where
        H: TrainingHooks + ?Sized,
    {
        let model = self.create_model();
        self.train_model(model, hooks)
    }

    /// Same as [`train`](Self::train), starting from `model`.
    pub fn train_model<H>(
        &mut self,
        model: LinearRegression<B>,
        hooks: &mut H,
    ) -> Result<&TrainingHistory>
    where
        H: TrainingHooks + ?Sized,
    {
        self.model = None;

        let dataset = InMemoryDataset::from_columns(
            &self.data.split.train_features,
            &self.data.split.train_labels,
        )?;
        let trainer: LinearTrainer<B> =
            Trainer::builder(MSELoss, SGD::new(self.config.learning_rate))
                .batch_size(self.config.batch_size)
                .max_epochs(self.config.epochs)
                .validation_split(self.config.validation_split)
                .shuffle_seed(self.config.seed)
                .build();

        let (model, history) = trainer.fit(model, &dataset, hooks)?;
        info!(
            "training set loss: {:?}, validation set loss: {:?}",
            history.final_loss(),
            history.final_val_loss()
        );

        let feature_scaler = FittedMinMaxScaler::from_params(self.data.feature.bounds())?;
        let label_scaler = FittedMinMaxScaler::from_params(self.data.label.bounds())?;
        let trained = self.model.insert(TrainedModel {
            model,
            feature_scaler,
            label_scaler,
            history: None,
        });
        Ok(trained.history.insert(history))
    }

    /// MSE of the current model on the testing half, in normalized units.
    pub fn test(&self) -> Result<f64> {
        let trained = self.model.as_ref().ok_or(RegressionError::NoModel)?;
        let loss = evaluate(
            &trained.model,
            &self.data.split.test_features,
            &self.data.split.test_labels,
        )?;
        info!("testing set loss: {}", loss);
        Ok(loss)
    }

    /// Predicted price for a living area in square feet.
    pub fn predict(&self, sqft: f64) -> Result<f64> {
        if !sqft.is_finite() {
            return Err(RegressionError::InvalidParameter(format!(
                "cannot predict for {}",
                sqft
            )));
        }
        let trained = self.model.as_ref().ok_or(RegressionError::NoModel)?;
        let x = trained
            .feature_scaler
            .transform(&Tensor1D::new(vec![sqft]))?;
        let y = trained.model.predict_batch(&x.to_column());
        let price = trained.label_scaler.inverse_transform(&y)?;
        price
            .to_vec()
            .first()
            .copied()
            .ok_or_else(|| RegressionError::EmptyData("no prediction produced".into()))
    }

    /// `points` evenly spaced predictions across the observed feature range, in raw units.
    pub fn prediction_line(&self, points: usize) -> Result<Series> {
        let trained = self.model.as_ref().ok_or(RegressionError::NoModel)?;
        let step = if points > 1 {
            1.0 / (points - 1) as f64
        } else {
            0.0
        };
        let xs = Tensor1D::<B>::new((0..points).map(|i| i as f64 * step).collect());
        let ys = trained.model.predict_batch(&xs.to_column());

        let raw_x = trained.feature_scaler.inverse_transform(&xs)?.to_vec();
        let raw_y = trained.label_scaler.inverse_transform(&ys)?.to_vec();
        Ok(Series::new(
            "predicted",
            raw_x.into_iter().zip(raw_y).collect(),
        ))
    }

    /// Writes the current model to `path`.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let trained = self.model.as_ref().ok_or(RegressionError::NoModel)?;
        trained.to_record().save_to_file(&path)?;
        info!("model saved to {}", path.as_ref().display());
        Ok(())
    }

    /// Replaces the current model with the one stored at `path`.
    pub fn load<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let record = ModelRecord::load_from_file(&path)?;
        self.model = Some(TrainedModel::from_record(record)?);
        info!("model loaded from {}", path.as_ref().display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::dataset::loader::prepare_samples;

    /// price = 100 * sqft + 50_000 with sqft stepping by 25 from 500, shuffled.
    fn linear_samples(n: usize) -> Vec<Sample> {
        let mut samples: Vec<Sample> = (0..n)
            .map(|i| {
                let x = 500.0 + 25.0 * i as f64;
                Sample::new(x, 100.0 * x + 50_000.0)
            })
            .collect();
        prepare_samples(&mut samples, Some(3));
        samples
    }

    fn config() -> PipelineConfig {
        PipelineConfig {
            seed: Some(1),
            epochs: 300,
            batch_size: 8,
            ..Default::default()
        }
    }

    #[test]
    fn test_prepare_splits_in_half() {
        let session = Session::<CpuBackend>::from_samples(config(), linear_samples(80)).unwrap();
        assert_eq!(session.data().split.train_len(), 40);
        assert_eq!(session.data().split.test_len(), 40);
        assert_eq!(session.data().feature.min, 500.0);
        assert_eq!(session.scatter_points().points.len(), 80);
        assert!(!session.has_model());
    }

    #[test]
    fn test_operations_need_a_model() {
        let session = Session::<CpuBackend>::from_samples(config(), linear_samples(8)).unwrap();
        assert!(matches!(session.test(), Err(RegressionError::NoModel)));
        assert!(matches!(session.predict(1000.0), Err(RegressionError::NoModel)));
        assert!(matches!(session.save("unused.bin"), Err(RegressionError::NoModel)));
        assert!(matches!(
            session.prediction_line(10),
            Err(RegressionError::NoModel)
        ));
    }

    #[test]
    fn test_constant_feature_fails_fast() {
        let samples = vec![Sample::new(1000.0, 1.0), Sample::new(1000.0, 2.0)];
        assert!(matches!(
            Session::<CpuBackend>::from_samples(config(), samples),
            Err(RegressionError::ConstantColumn { .. })
        ));
    }

    #[test]
    fn test_train_test_predict() {
        let mut session =
            Session::<CpuBackend>::from_samples(config(), linear_samples(80)).unwrap();
        let history = session.train(&mut ()).unwrap();
        assert_eq!(history.epochs(), 300);

        let loss = session.test().unwrap();
        assert!(loss < 0.01, "test loss {}", loss);

        let price = session.predict(1500.0).unwrap();
        let expected = 100.0 * 1500.0 + 50_000.0;
        assert!((price - expected).abs() / expected < 0.05, "{}", price);

        let line = session.prediction_line(5).unwrap();
        assert_eq!(line.points.len(), 5);
        assert!((line.points[0].0 - 500.0).abs() < 1e-6);
        assert!((line.points[4].0 - 2475.0).abs() < 1e-6);

        assert!(session.predict(f64::NAN).is_err());
    }

    #[test]
    fn test_save_and_load_round_trip() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let tmp = tempfile::tempdir()?;
        let path = tmp.path().join("model.bin");

        let mut trained = Session::<CpuBackend>::from_samples(config(), linear_samples(40))?;
        trained.train(&mut ())?;
        trained.save(&path)?;

        let mut fresh = Session::<CpuBackend>::from_samples(config(), linear_samples(40))?;
        fresh.load(&path)?;
        assert!(fresh.model().is_some_and(|m| m.history.is_none()));
        assert_eq!(fresh.predict(1234.0)?, trained.predict(1234.0)?);
        assert_eq!(fresh.test()?, trained.test()?);
        Ok(())
    }

    #[test]
    fn test_four_point_split_and_training() {
        let points = vec![
            Sample::new(1000.0, 200_000.0),
            Sample::new(1500.0, 250_000.0),
            Sample::new(2000.0, 300_000.0),
            Sample::new(2500.0, 350_000.0),
        ];
        let config = PipelineConfig {
            seed: Some(12),
            epochs: 20,
            validation_split: 0.0,
            ..Default::default()
        };
        let mut session = Session::<CpuBackend>::from_samples(config, points).unwrap();

        let split = &session.data().split;
        let third = 500.0 / 1500.0;
        for (got, want) in [
            (split.train_features.to_vec(), [0.0, third]),
            (split.train_labels.to_vec(), [0.0, third]),
            (split.test_features.to_vec(), [2.0 * third, 1.0]),
            (split.test_labels.to_vec(), [2.0 * third, 1.0]),
        ] {
            assert_eq!(got.len(), 2);
            for (g, w) in got.iter().zip(want) {
                assert!((g - w).abs() < 1e-12, "{:?}", got);
            }
        }

        let history = session.train(&mut ()).unwrap().clone();
        assert_eq!(history.epochs(), 20);
        for pair in history.loss.windows(2) {
            assert!(pair[1] < pair[0], "{:?}", history.loss);
        }
        assert!(history.val_loss.iter().all(|v| v.is_nan()));
    }

    #[test]
    fn test_prepare_from_csv() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let tmp = tempfile::tempdir()?;
        let path = tmp.path().join("houses.csv");
        let mut csv = String::from("id,price,sqft_living\n");
        for i in 0..41 {
            let sqft = 700 + 50 * i;
            csv.push_str(&format!("{},{},{}\n", i, 150 * sqft + 40_000, sqft));
        }
        std::fs::write(&path, csv)?;

        let config = PipelineConfig {
            data_path: path,
            ..config()
        };
        let mut session = Session::<CpuBackend>::prepare(config)?;
        assert_eq!(session.data().samples.len(), 40);
        assert_eq!(session.data().split.train_len(), 20);
        assert_eq!(session.data().feature.min, 700.0);
        assert_eq!(session.data().feature.max, 2650.0);

        session.train(&mut ())?;
        assert!(session.test()?.is_finite());
        Ok(())
    }

    #[test]
    fn test_prepare_missing_file() {
        let config = PipelineConfig {
            data_path: "definitely/not/here.csv".into(),
            ..config()
        };
        assert!(matches!(
            Session::<CpuBackend>::prepare(config),
            Err(RegressionError::Io(_))
        ));
    }

    #[test]
    fn test_record_rejects_wrong_width() {
        let record = ModelRecord::new(
            vec![0.1, 0.2],
            0.0,
            crate::preprocessing::MinMaxBounds::new(0.0, 1.0),
            crate::preprocessing::MinMaxBounds::new(0.0, 1.0),
        );
        assert!(matches!(
            TrainedModel::<CpuBackend>::from_record(record),
            Err(RegressionError::ShapeMismatch { .. })
        ));
    }
}
