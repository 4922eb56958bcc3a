use crate::backend::{Backend, Scalar, Tensor1D};

/// A differentiable loss function.
///
/// Implementors define the scalar loss (for logging and evaluation) and its gradient
/// with respect to the predictions, which is handed to the model's `backward()`.
pub trait Loss<B: Backend> {
    type Prediction;
    type Target;

    /// Scalar loss value.
    fn loss(&self, prediction: &Self::Prediction, target: &Self::Target) -> Scalar<B>;

    /// ∂L/∂pred.
    fn grad_wrt_prediction(
        &self,
        prediction: &Self::Prediction,
        target: &Self::Target,
    ) -> Self::Prediction;
}

/// Mean Squared Error: `L = (1/n) * Σ(pred_i - target_i)^2`
///
/// Gradient w.r.t. prediction: `∂L/∂pred = 2(pred - target) / n`
///
/// An empty batch has loss `NaN`.
#[derive(Clone, Copy, Debug, Default)]
pub struct MSELoss;

impl<B: Backend> Loss<B> for MSELoss {
    type Prediction = Tensor1D<B>;
    type Target = Tensor1D<B>;

    fn loss(&self, pred: &Self::Prediction, target: &Self::Target) -> Scalar<B> {
        let diff = pred.sub(target);
        diff.mul(&diff).mean()
    }

    fn grad_wrt_prediction(&self, pred: &Self::Prediction, target: &Self::Target) -> Tensor1D<B> {
        let n = Scalar::<B>::new(2.0 / pred.len() as f64);
        pred.sub(target).scale(&n)
    }
}
