/// Marker for a model that is **not yet trained**.
///
/// `Trainer::fit` requires an `Unfitted` model; `predict` is not available on it.
#[derive(Debug, Clone, Copy)]
pub struct Unfitted;

/// Marker for a **trained** model.
///
/// A `Fitted` model holds only inference parameters: no optimizer state, loss
/// function or training hyperparameters.
#[derive(Debug, Clone, Copy)]
pub struct Fitted;
