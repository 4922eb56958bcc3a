use crate::backend::{Backend, Scalar};
use crate::model::linear::LinearParams;

/// Trait for gradient-based optimizers.
///
/// Training logic (`Trainer`) is decoupled from the parameter update rule, so any
/// model can be paired with any optimizer without dynamic dispatch.
///
/// # Type Parameters
/// * `B` — computation backend implementing [`Backend`]
/// * `P` — model parameters type (e.g., [`LinearParams`])
///
/// # Example
/// ```rust
/// use housing_regression::backend::{CpuBackend, Scalar, Tensor1D};
/// use housing_regression::model::linear::LinearParams;
/// use housing_regression::optimizer::{Optimizer, SGD};
///
/// let params = LinearParams {
///     weights: Tensor1D::<CpuBackend>::new(vec![1.0]),
///     bias: Scalar::new(0.5),
/// };
/// let grads = LinearParams {
///     weights: Tensor1D::<CpuBackend>::new(vec![0.5]),
///     bias: Scalar::new(-0.25),
/// };
/// let updated = SGD::new(0.5).step(&params, &grads);
/// assert_eq!(updated.weights.to_vec(), vec![0.75]);
/// assert_eq!(updated.bias.to_f64(), 0.625);
/// ```
pub trait Optimizer<B: Backend, P> {
    /// `params_new = params - learning_rate * gradients`. Inputs are not mutated.
    fn step(&self, params: &P, gradients: &P) -> P;
}

/// Stochastic Gradient Descent.
///
/// ```text
/// θ ← θ - η · ∇L(θ)
/// ```
///
/// Stateless: no momentum, no adaptive learning rate.
#[derive(Clone, Debug)]
pub struct SGD<B: Backend> {
    lr: Scalar<B>,
}

impl<B: Backend> SGD<B> {
    pub fn new(lr: f64) -> Self {
        Self {
            lr: Scalar::<B>::new(lr),
        }
    }

    pub fn learning_rate(&self) -> f64 {
        self.lr.to_f64()
    }
}

impl<B: Backend> Optimizer<B, LinearParams<B>> for SGD<B> {
    fn step(&self, params: &LinearParams<B>, grads: &LinearParams<B>) -> LinearParams<B> {
        // (-lr) lets the weight update be a single scale + add
        let neg_lr = Scalar::<B>::new(0.0) - self.lr;
        let weights = params.weights.add(&grads.weights.scale(&neg_lr));
        let bias = params.bias - grads.bias * self.lr;

        LinearParams { weights, bias }
    }
}
