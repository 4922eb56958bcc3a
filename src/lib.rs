//! # housing-regression
//!
//! Single-feature linear regression of house prices on living area, with pluggable
//! tensor backends and a strict separation between training and inference.
//!
//! ## Pipeline
//!
//! 1. [`dataset::HousingCsvLoader`] reads `(sqft_living, price)` pairs, shuffles
//!    them and drops the last row of an odd-length set.
//! 2. [`preprocessing::normalize`] min-max scales each column; the bounds are kept
//!    so predictions can be mapped back to prices.
//! 3. [`dataset::Split`] halves the data into training and testing sets.
//! 4. [`trainer::Trainer`] runs mini-batch SGD on MSE, holding out the trailing
//!    fraction of the training rows for validation.
//! 5. [`session::Session`] ties the stages together and [`controller::Controller`]
//!    exposes them as user actions.
//!
//! ## Quick Start
//!
//! ```rust
//! use housing_regression::config::PipelineConfig;
//! use housing_regression::dataset::Sample;
//! use housing_regression::session::Session;
//!
//! let samples: Vec<Sample> = (0..40)
//!     .map(|i| {
//!         let sqft = 600.0 + 40.0 * i as f64;
//!         Sample::new(sqft, 120.0 * sqft + 30_000.0)
//!     })
//!     .collect();
//!
//! let config = PipelineConfig { seed: Some(7), ..Default::default() };
//! let mut session: Session = Session::from_samples(config, samples).unwrap();
//! session.train(&mut ()).unwrap();
//!
//! let loss = session.test().unwrap();
//! assert!(loss.is_finite());
//! let price = session.predict(1500.0).unwrap();
//! assert!(price.is_finite());
//! ```
//!
//! ## Module Structure
//!
//! - `backend` — Tensor abstractions and computation primitives (`Tensor1D`, `Tensor2D`)
//! - `dataset` — CSV loading, shuffling, splitting and batching
//! - `preprocessing` — Min-max normalization as fit/transform pairs
//! - `model` — Linear model with its training state in the type
//! - `loss` — Mean squared error
//! - `optimizer` — Plain SGD
//! - `trainer` — Mini-batch training loop, validation and evaluation
//! - `serialization` — Model persistence
//! - `viz` — Rendering seam for plots, loss curves and layer summaries
//! - `session`, `controller` — The interactive application

pub mod backend;

/// Application configuration and environment overrides.
pub mod config;

/// User actions, enablement and status reporting.
pub mod controller;

/// Data loading utilities and dataset abstractions.
pub mod dataset;

/// Error type shared by every fallible operation.
pub mod error;

/// Differentiable loss functions for model training.
pub mod loss;

/// Machine learning models with compile-time state safety.
pub mod model;

/// Optimization algorithms for parameter updates.
pub mod optimizer;

/// Data preprocessing transformers.
pub mod preprocessing;

/// Model persistence.
pub mod serialization;

/// Loaded data and the current model of one run.
pub mod session;

/// High-level training loop orchestration.
pub mod trainer;

/// Visualization surfaces.
pub mod viz;

/// Re-export of core backend types for convenient usage.
pub use backend::{Backend, CpuBackend, ScalarOps, Tensor1D, Tensor2D};
pub use error::{RegressionError, Result};
