//! Core traits for preprocessing transformers.
//!
//! - [`Transformer`]: unfitted, learns its parameters from data.
//! - [`FittedTransformer`]: fitted, ready for inference and serialization.

use crate::backend::Backend;
use crate::error::{RegressionError, Result};
use crate::serialization::SerializableParams;

/// Trait for unfitted transformers.
///
/// # Type Parameters
/// - `B`: The backend used for computation.
/// - `Input` / `Output`: data types before and after transformation.
/// - `Params`: Serializable representation of learned parameters.
/// - `Fitted`: The corresponding fitted transformer type.
pub trait Transformer<B: Backend>: Clone {
    type Input;
    type Output;
    type Params: SerializableParams;
    type Fitted: FittedTransformer<
        B,
        Params = Self::Params,
        Input = Self::Input,
        Output = Self::Output,
    >;

    /// Learns parameters from `data`.
    ///
    /// # Errors
    /// Empty data, non-finite values or data the transformer cannot represent.
    fn fit(&self, data: &Self::Input) -> Result<Self::Fitted>;

    /// Fits and transforms in one step.
    fn fit_transform(&self, data: &Self::Input) -> Result<Self::Output> {
        self.fit(data)?.transform(data)
    }
}

/// Trait for fitted transformers.
///
/// `extract_params()` followed by `from_params()` is a round trip.
pub trait FittedTransformer<B: Backend>: Clone {
    type Input;
    type Output;
    type Params: SerializableParams;

    fn transform(&self, data: &Self::Input) -> Result<Self::Output>;

    /// Reverses [`transform`](Self::transform).
    fn inverse_transform(&self, data: &Self::Output) -> Result<Self::Input>;

    fn extract_params(&self) -> Self::Params;

    /// Rebuilds a fitted transformer, validating the parameters.
    fn from_params(params: Self::Params) -> Result<Self>
    where
        Self: Sized;

    fn save_to_file<P: AsRef<std::path::Path>>(&self, path: P) -> Result<()> {
        let bytes = self
            .extract_params()
            .to_bytes()
            .map_err(|e| RegressionError::Serialization(e.to_string()))?;
        std::fs::write(path, bytes)?;
        Ok(())
    }

    fn load_from_file<P: AsRef<std::path::Path>>(path: P) -> Result<Self>
    where
        Self: Sized,
    {
        let bytes = std::fs::read(path)?;
        let params = Self::Params::from_bytes(&bytes)
            .map_err(|e| RegressionError::Serialization(e.to_string()))?;
        Self::from_params(params)
    }
}
