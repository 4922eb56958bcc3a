//! Scaling transformers.

pub mod minmax;

pub use minmax::{
    denormalize, normalize, FittedMinMaxScaler, MinMaxBounds, MinMaxScaler, NormalizedTensor,
};
