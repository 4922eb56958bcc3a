//! Action dispatch and status reporting for the terminal front end.
//!
//! The [`Controller`] owns the [`Session`], tracks which actions are enabled and
//! keeps the two status texts (model status, testing status). Every stage reports
//! to a [`Visualizer`] through [`PipelineHooks`].

use crate::backend::Backend;
use crate::error::{RegressionError, Result};
use crate::model::{LayerSnapshot, TrainableModel};
use crate::session::Session;
use crate::trainer::{EpochLogs, TrainingHistory, TrainingHooks};
use crate::viz::{ModelSummary, Series, Visualizer};
use log::{error, info};
use std::collections::BTreeSet;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

const LAYER_NAME: &str = "Layer 1";
const PREDICTION_LINE_POINTS: usize = 100;

/// The six user-facing actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Action {
    ToggleVisor,
    Train,
    Test,
    Load,
    Save,
    Predict,
}

impl Action {
    pub const ALL: [Action; 6] = [
        Action::ToggleVisor,
        Action::Train,
        Action::Test,
        Action::Load,
        Action::Save,
        Action::Predict,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Action::ToggleVisor => "toggle-visor",
            Action::Train => "train",
            Action::Test => "test",
            Action::Load => "load",
            Action::Save => "save",
            Action::Predict => "predict",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Action {
    type Err = RegressionError;

    fn from_str(s: &str) -> Result<Self> {
        Action::ALL
            .into_iter()
            .find(|a| a.name() == s)
            .ok_or_else(|| RegressionError::InvalidParameter(format!("unknown action '{}'", s)))
    }
}

/// Set of currently enabled actions. `toggle-visor` is always enabled.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Controls {
    enabled: BTreeSet<Action>,
}

impl Controls {
    pub fn is_enabled(&self, action: Action) -> bool {
        action == Action::ToggleVisor || self.enabled.contains(&action)
    }

    pub fn enable(&mut self, actions: &[Action]) {
        self.enabled.extend(actions.iter().copied());
    }

    pub fn disable_all(&mut self) {
        self.enabled.clear();
    }

    /// Enabled actions in declaration order.
    pub fn enabled(&self) -> Vec<Action> {
        Action::ALL
            .into_iter()
            .filter(|a| self.is_enabled(*a))
            .collect()
    }

    fn require(&self, action: Action) -> Result<()> {
        if self.is_enabled(action) {
            Ok(())
        } else {
            Err(RegressionError::ActionDisabled(action.name().to_string()))
        }
    }
}

/// Observers of pipeline stages. Every method defaults to a no-op.
pub trait PipelineHooks: TrainingHooks {
    fn on_train_start(&mut self, _summary: &ModelSummary, _layer: &LayerSnapshot) {}

    /// `predicted` is the fitted line across the data range.
    fn on_train_complete(&mut self, _history: &TrainingHistory, _predicted: Option<&Series>) {}

    fn on_test_complete(&mut self, _loss: f64) {}
}

impl<'a> TrainingHooks for dyn Visualizer + 'a {
    fn on_epoch_begin(&mut self, _epoch: usize, layer: &LayerSnapshot) {
        self.layer(LAYER_NAME, layer);
    }

    fn on_epoch_end(&mut self, epoch: usize, logs: &EpochLogs) {
        self.training_curve(epoch, logs);
    }
}

impl<'a> PipelineHooks for dyn Visualizer + 'a {
    fn on_train_start(&mut self, summary: &ModelSummary, layer: &LayerSnapshot) {
        self.model_summary(summary);
        self.layer(LAYER_NAME, layer);
    }

    fn on_train_complete(&mut self, _history: &TrainingHistory, predicted: Option<&Series>) {
        if let Some(line) = predicted {
            self.scatterplot(
                "Predictions",
                std::slice::from_ref(line),
                "Square feet",
                "Price",
            );
        }
    }
}

/// Formats like JavaScript's `Number.prototype.toPrecision`.
///
/// Rounds the exact decimal value of `value`, with ties going away from zero.
pub fn to_precision(value: f64, digits: usize) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    let p = digits.clamp(1, 100);
    let sign = if value < 0.0 { "-" } else { "" };

    let (kept, exp) = if value == 0.0 {
        (vec![0u8; p], 0i32)
    } else {
        // every finite f64 has fewer than 800 significant decimal digits
        let exact = format!("{:.800e}", value.abs());
        let (mantissa, e) = exact.split_once('e').unwrap_or((exact.as_str(), "0"));
        let all: Vec<u8> = mantissa
            .bytes()
            .filter(u8::is_ascii_digit)
            .map(|b| b - b'0')
            .collect();
        let mut kept = all[..p].to_vec();
        let mut exp = e.parse::<i32>().unwrap_or(0);
        if all[p] >= 5 && round_up(&mut kept) {
            kept.insert(0, 1);
            kept.pop();
            exp += 1;
        }
        (kept, exp)
    };

    let text: String = kept.iter().map(|d| char::from(b'0' + d)).collect();
    if exp < -6 || exp >= p as i32 {
        let mut out = format!("{}{}", sign, &text[..1]);
        if p > 1 {
            out.push('.');
            out.push_str(&text[1..]);
        }
        let exp_sign = if exp >= 0 { '+' } else { '-' };
        format!("{}e{}{}", out, exp_sign, exp.abs())
    } else if exp >= 0 {
        let (int, frac) = text.split_at(exp as usize + 1);
        if frac.is_empty() {
            format!("{}{}", sign, int)
        } else {
            format!("{}{}.{}", sign, int, frac)
        }
    } else {
        let zeros = "0".repeat((-exp - 1) as usize);
        format!("{}0.{}{}", sign, zeros, text)
    }
}

/// Adds one unit in the last place. Returns `true` when the carry runs off the
/// front (all nines).
fn round_up(digits: &mut [u8]) -> bool {
    for d in digits.iter_mut().rev() {
        if *d == 9 {
            *d = 0;
        } else {
            *d += 1;
            return false;
        }
    }
    true
}

/// Result of one terminal command.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Text to show the user.
    Message(String),
    Quit,
}

/// Drives the session in response to user actions.
pub struct Controller<B: Backend, V: Visualizer> {
    session: Session<B>,
    controls: Controls,
    visualizer: V,
    model_status: String,
    testing_status: String,
}

impl<B: Backend, V: Visualizer> Controller<B, V> {
    /// Plots the prepared data and enables `train` and `load`.
    pub fn new(session: Session<B>, mut visualizer: V) -> Self {
        let feature = session.config().feature_column.clone();
        visualizer.scatterplot(
            &format!("{} vs House Price", feature),
            &[session.scatter_points()],
            &feature,
            "Price",
        );

        let mut controls = Controls::default();
        controls.enable(&[Action::Train, Action::Load]);
        Self {
            session,
            controls,
            visualizer,
            model_status: "No model trained".to_string(),
            testing_status: String::new(),
        }
    }

    pub fn session(&self) -> &Session<B> {
        &self.session
    }

    pub fn controls(&self) -> &Controls {
        &self.controls
    }

    pub fn visualizer(&self) -> &V {
        &self.visualizer
    }

    pub fn model_status(&self) -> &str {
        &self.model_status
    }

    pub fn testing_status(&self) -> &str {
        &self.testing_status
    }

    fn hooks(&mut self) -> &mut dyn Visualizer {
        &mut self.visualizer
    }

    pub fn toggle_visor(&mut self) {
        self.visualizer.toggle();
    }

    /// Trains a fresh model. All actions are disabled while it runs.
    pub fn train(&mut self) -> Result<()> {
        self.controls.require(Action::Train)?;
        self.controls.disable_all();
        self.model_status = "Training ...".to_string();
        info!("{}", self.model_status);

        let initial = self.session.create_model();
        let layer = initial.snapshot();
        self.hooks()
            .on_train_start(&ModelSummary::linear(LAYER_NAME, &layer), &layer);

        let hooks: &mut dyn Visualizer = &mut self.visualizer;
        let result = self
            .session
            .train_model(initial, hooks)
            .map(|h| h.clone());
        match result {
            Ok(history) => {
                let loss = history.final_loss().unwrap_or(f64::NAN);
                let val_loss = history.final_val_loss().unwrap_or(f64::NAN);
                self.model_status = format!(
                    "Trained (unsaved)\nLoss: {}\nValidation: {}",
                    to_precision(loss, 5),
                    to_precision(val_loss, 5)
                );
                let line = self.session.prediction_line(PREDICTION_LINE_POINTS).ok();
                self.hooks().on_train_complete(&history, line.as_ref());
                self.controls.enable(&[
                    Action::Train,
                    Action::Test,
                    Action::Load,
                    Action::Save,
                    Action::Predict,
                ]);
                Ok(())
            }
            Err(e) => {
                error!("training failed: {}", e);
                self.model_status = format!("Training failed: {}", e);
                self.controls.enable(&[Action::Train, Action::Load]);
                Err(e)
            }
        }
    }

    /// Scores the current model on the testing half.
    pub fn test(&mut self) -> Result<f64> {
        self.controls.require(Action::Test)?;
        let loss = self.session.test()?;
        self.testing_status = format!("Testing set loss: {}", to_precision(loss, 5));
        self.hooks().on_test_complete(loss);
        Ok(loss)
    }

    /// Saves to `path`, or to the configured model path.
    pub fn save(&mut self, path: Option<PathBuf>) -> Result<PathBuf> {
        self.controls.require(Action::Save)?;
        let path = path.unwrap_or_else(|| self.session.config().model_path.clone());
        self.session.save(&path)?;
        self.model_status = "Trained (saved)".to_string();
        Ok(path)
    }

    /// Loads from `path`, or from the configured model path.
    pub fn load(&mut self, path: Option<PathBuf>) -> Result<PathBuf> {
        self.controls.require(Action::Load)?;
        let path = path.unwrap_or_else(|| self.session.config().model_path.clone());
        self.session.load(&path)?;
        self.model_status = "Loaded model".to_string();
        self.testing_status.clear();
        self.controls
            .enable(&[Action::Test, Action::Save, Action::Predict]);
        Ok(path)
    }

    /// Predicted price for a living area.
    pub fn predict(&mut self, sqft: f64) -> Result<f64> {
        self.controls.require(Action::Predict)?;
        self.session.predict(sqft)
    }

    /// Status block shown by the `status` command.
    pub fn status(&self) -> String {
        let enabled: Vec<&str> = self.controls.enabled().iter().map(|a| a.name()).collect();
        let mut out = format!("Model: {}", self.model_status.replace('\n', "\n       "));
        if !self.testing_status.is_empty() {
            out.push_str(&format!("\n{}", self.testing_status));
        }
        out.push_str(&format!(
            "\nVisor: {}\nEnabled: {}",
            if self.visualizer.is_open() { "open" } else { "closed" },
            enabled.join(", ")
        ));
        out
    }

    /// Parses and runs one terminal command line.
    ///
    /// Errors from the underlying action are returned unchanged; the controller
    /// stays usable afterwards.
    pub fn execute(&mut self, line: &str) -> Result<Outcome> {
        let mut words = line.split_whitespace();
        let Some(command) = words.next() else {
            return Ok(Outcome::Message(String::new()));
        };
        let arg = words.next();

        let message = match command {
            "quit" | "exit" => return Ok(Outcome::Quit),
            "help" => help_text(),
            "status" => self.status(),
            other => match other.parse::<Action>()? {
                Action::ToggleVisor => {
                    self.toggle_visor();
                    format!(
                        "Visor {}",
                        if self.visualizer.is_open() { "open" } else { "closed" }
                    )
                }
                Action::Train => {
                    self.train()?;
                    self.model_status.clone()
                }
                Action::Test => {
                    self.test()?;
                    self.testing_status.clone()
                }
                Action::Save => {
                    let path = self.save(arg.map(PathBuf::from))?;
                    format!("Model saved to {}", path.display())
                }
                Action::Load => {
                    let path = self.load(arg.map(PathBuf::from))?;
                    format!("Model loaded from {}", path.display())
                }
                Action::Predict => {
                    let raw = arg.ok_or_else(|| {
                        RegressionError::InvalidParameter("usage: predict <sqft>".to_string())
                    })?;
                    let sqft = raw.parse::<f64>().map_err(|_| {
                        RegressionError::InvalidParameter(format!("not a number: {:?}", raw))
                    })?;
                    let price = self.predict(sqft)?;
                    format!("Predicted price for {} sqft: {:.0}", sqft, price)
                }
            },
        };
        Ok(Outcome::Message(message))
    }
}

fn help_text() -> String {
    [
        "Commands:",
        "  toggle-visor     show or hide training visualizations",
        "  train            train a new model",
        "  test             evaluate the model on the testing set",
        "  load [path]      load a saved model",
        "  save [path]      save the current model",
        "  predict <sqft>   predict a price for a living area",
        "  status           show model status and enabled actions",
        "  help             show this message",
        "  quit             exit",
    ]
    .join("\n")
}
