//! Visualization of data and training progress.
//!
//! [`Visualizer`] is the rendering seam: the pipeline hands it scatter plots, loss
//! curves, layer parameters and model summaries. [`LogVisualizer`] renders them as
//! compact log lines, [`NullVisualizer`] drops them, and [`Visor`] wraps either one
//! behind an open/closed flag.

use crate::model::LayerSnapshot;
use crate::trainer::EpochLogs;
use log::{debug, info};

/// A named set of `(x, y)` points.
#[derive(Clone, Debug, PartialEq)]
pub struct Series {
    pub name: String,
    pub points: Vec<(f64, f64)>,
}

impl Series {
    pub fn new(name: &str, points: Vec<(f64, f64)>) -> Self {
        Self {
            name: name.to_string(),
            points,
        }
    }

    /// `(min, max)` of the x and y coordinates, `None` when empty.
    pub fn extent(&self) -> Option<((f64, f64), (f64, f64))> {
        let first = self.points.first()?;
        let init = ((first.0, first.0), (first.1, first.1));
        Some(self.points.iter().fold(init, |((x0, x1), (y0, y1)), &(x, y)| {
            ((x0.min(x), x1.max(x)), (y0.min(y), y1.max(y)))
        }))
    }
}

/// Shape of a single dense layer model.
#[derive(Clone, Debug, PartialEq)]
pub struct ModelSummary {
    pub layer_name: String,
    pub input_dim: usize,
    pub units: usize,
    pub use_bias: bool,
    pub activation: &'static str,
    pub param_count: usize,
}

impl ModelSummary {
    /// Summary of a linear layer with bias and identity activation.
    pub fn linear(layer_name: &str, layer: &LayerSnapshot) -> Self {
        Self {
            layer_name: layer_name.to_string(),
            input_dim: layer.weights.len(),
            units: 1,
            use_bias: true,
            activation: "linear",
            param_count: layer.param_count(),
        }
    }
}

/// Rendering surface for pipeline state.
pub trait Visualizer {
    fn scatterplot(&mut self, name: &str, series: &[Series], x_label: &str, y_label: &str);

    /// One point of the loss curve.
    fn training_curve(&mut self, epoch: usize, logs: &EpochLogs);

    fn layer(&mut self, name: &str, snapshot: &LayerSnapshot);

    fn model_summary(&mut self, summary: &ModelSummary);

    /// Shows or hides the surface. Surfaces without a hidden state ignore it.
    fn toggle(&mut self) {}

    fn is_open(&self) -> bool {
        true
    }
}

impl<V: Visualizer + ?Sized> Visualizer for Box<V> {
    fn scatterplot(&mut self, name: &str, series: &[Series], x_label: &str, y_label: &str) {
        (**self).scatterplot(name, series, x_label, y_label)
    }

    fn training_curve(&mut self, epoch: usize, logs: &EpochLogs) {
        (**self).training_curve(epoch, logs)
    }

    fn layer(&mut self, name: &str, snapshot: &LayerSnapshot) {
        (**self).layer(name, snapshot)
    }

    fn model_summary(&mut self, summary: &ModelSummary) {
        (**self).model_summary(summary)
    }

    fn toggle(&mut self) {
        (**self).toggle()
    }

    fn is_open(&self) -> bool {
        (**self).is_open()
    }
}

/// Renders through the `log` facade at `info` level.
#[derive(Clone, Debug, Default)]
pub struct LogVisualizer;

impl Visualizer for LogVisualizer {
    fn scatterplot(&mut self, name: &str, series: &[Series], x_label: &str, y_label: &str) {
        info!("[{}]", name);
        for s in series {
            match s.extent() {
                Some(((x0, x1), (y0, y1))) => info!(
                    "  {}: {} points, {} in [{}, {}], {} in [{}, {}]",
                    s.name,
                    s.points.len(),
                    x_label,
                    x0,
                    x1,
                    y_label,
                    y0,
                    y1
                ),
                None => info!("  {}: no points", s.name),
            }
        }
    }

    fn training_curve(&mut self, epoch: usize, logs: &EpochLogs) {
        info!(
            "[Training performance] epoch {}: loss {:.6}, val_loss {:.6}",
            epoch, logs.loss, logs.val_loss
        );
    }

    fn layer(&mut self, name: &str, snapshot: &LayerSnapshot) {
        info!(
            "[{}] weights {:?}, bias {}",
            name, snapshot.weights, snapshot.bias
        );
    }

    fn model_summary(&mut self, summary: &ModelSummary) {
        info!(
            "[Model summary] {}: dense {} -> {}, activation {}, bias {}, {} params",
            summary.layer_name,
            summary.input_dim,
            summary.units,
            summary.activation,
            summary.use_bias,
            summary.param_count
        );
    }
}

/// Discards everything.
#[derive(Clone, Debug, Default)]
pub struct NullVisualizer;

impl Visualizer for NullVisualizer {
    fn scatterplot(&mut self, _: &str, _: &[Series], _: &str, _: &str) {}

    fn training_curve(&mut self, _: usize, _: &EpochLogs) {}

    fn layer(&mut self, _: &str, _: &LayerSnapshot) {}

    fn model_summary(&mut self, _: &ModelSummary) {}
}

/// One render held back while the visor is closed.
#[derive(Clone, Debug)]
enum Pending {
    Scatterplot {
        name: String,
        series: Vec<Series>,
        x_label: String,
        y_label: String,
    },
    TrainingCurve(usize, EpochLogs),
    Layer(String, LayerSnapshot),
    ModelSummary(ModelSummary),
}

/// A visualizer behind an open/closed flag.
///
/// Renders issued while closed are kept and replayed, in order, when the visor
/// opens, so closing it only hides output.
#[derive(Clone, Debug)]
pub struct Visor<V> {
    inner: V,
    open: bool,
    pending: Vec<Pending>,
}

impl<V: Visualizer> Visor<V> {
    pub fn new(inner: V, open: bool) -> Self {
        Self {
            inner,
            open,
            pending: Vec::new(),
        }
    }

    pub fn inner(&self) -> &V {
        &self.inner
    }

    /// Renders waiting for the visor to open.
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    fn render(&mut self, pending: Pending) {
        if self.open {
            draw(&mut self.inner, pending);
        } else {
            debug!("visor closed, holding back {}", kind(&pending));
            self.pending.push(pending);
        }
    }
}

fn kind(pending: &Pending) -> &'static str {
    match pending {
        Pending::Scatterplot { .. } => "scatterplot",
        Pending::TrainingCurve(..) => "training curve",
        Pending::Layer(..) => "layer",
        Pending::ModelSummary(_) => "model summary",
    }
}

fn draw<V: Visualizer + ?Sized>(v: &mut V, pending: Pending) {
    match pending {
        Pending::Scatterplot {
            name,
            series,
            x_label,
            y_label,
        } => v.scatterplot(&name, &series, &x_label, &y_label),
        Pending::TrainingCurve(epoch, logs) => v.training_curve(epoch, &logs),
        Pending::Layer(name, snapshot) => v.layer(&name, &snapshot),
        Pending::ModelSummary(summary) => v.model_summary(&summary),
    }
}

impl<V: Visualizer> Visualizer for Visor<V> {
    fn scatterplot(&mut self, name: &str, series: &[Series], x_label: &str, y_label: &str) {
        self.render(Pending::Scatterplot {
            name: name.to_string(),
            series: series.to_vec(),
            x_label: x_label.to_string(),
            y_label: y_label.to_string(),
        });
    }

    fn training_curve(&mut self, epoch: usize, logs: &EpochLogs) {
        self.render(Pending::TrainingCurve(epoch, *logs));
    }

    fn layer(&mut self, name: &str, snapshot: &LayerSnapshot) {
        self.render(Pending::Layer(name.to_string(), snapshot.clone()));
    }

    fn model_summary(&mut self, summary: &ModelSummary) {
        self.render(Pending::ModelSummary(summary.clone()));
    }

    fn toggle(&mut self) {
        self.open = !self.open;
        info!("visor {}", if self.open { "open" } else { "closed" });
        if self.open {
            for pending in std::mem::take(&mut self.pending) {
                draw(&mut self.inner, pending);
            }
        }
    }

    fn is_open(&self) -> bool {
        self.open
    }
}
