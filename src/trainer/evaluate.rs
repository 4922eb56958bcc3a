use crate::backend::{Backend, Tensor1D, Tensor2D};
use crate::error::{RegressionError, Result};
use crate::loss::{Loss, MSELoss};
use crate::model::InferenceModel;

/// Mean squared error of a fitted model on held-out data. Parameters are not touched.
///
/// # Errors
/// Empty input or a feature/label length mismatch.
pub fn evaluate<B, M>(model: &M, features: &Tensor1D<B>, labels: &Tensor1D<B>) -> Result<f64>
where
    B: Backend,
    M: InferenceModel<B, InputBatch = Tensor2D<B>, OutputBatch = Tensor1D<B>>,
{
    if features.len() != labels.len() {
        return Err(RegressionError::ShapeMismatch {
            expected: format!("{} labels", features.len()),
            got: format!("{} labels", labels.len()),
        });
    }
    if features.is_empty() {
        return Err(RegressionError::EmptyData(
            "cannot evaluate on an empty set".to_string(),
        ));
    }

    let predictions = model.predict_batch(&features.to_column());
    Ok(MSELoss.loss(&predictions, labels).to_f64())
}
