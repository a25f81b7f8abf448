use std::collections::VecDeque;
use serde::{Serialize, Deserialize};

/// Stores training metrics over time
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrainingMetrics {
    /// Loss values per epoch
    pub losses: VecDeque<f64>,

    /// Global L2 norm of the batch gradient per epoch, before clipping
    pub gradient_norms: VecDeque<f64>,

    /// Epochs in which the clipper rescaled the gradient
    pub clip_events: usize,

    /// Epochs recorded in total, including those evicted from the history
    pub epochs: usize,
}

impl TrainingMetrics {
    pub fn new(history_size: usize) -> Self {
        TrainingMetrics {
            losses: VecDeque::with_capacity(history_size),
            gradient_norms: VecDeque::with_capacity(history_size),
            clip_events: 0,
            epochs: 0,
        }
    }
}

/// Summary of a metrics history
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricsSummary {
    pub epochs: usize,
    pub first_loss: Option<f64>,
    pub last_loss: Option<f64>,
    pub min_loss: Option<f64>,
    pub last_gradient_norm: Option<f64>,
    pub clip_events: usize,
}

/// Tracks metrics during training, keeping at most `history_size` entries per series
#[derive(Debug, Clone)]
pub struct MetricsTracker {
    metrics: TrainingMetrics,
    history_size: usize,
}

fn push_bounded(series: &mut VecDeque<f64>, value: f64, history_size: usize) {
    if history_size == 0 {
        return;
    }
    if series.len() >= history_size {
        series.pop_front();
    }
    series.push_back(value);
}

impl MetricsTracker {
    pub fn new(history_size: usize) -> Self {
        MetricsTracker {
            metrics: TrainingMetrics::new(history_size),
            history_size,
        }
    }

    /// Record one epoch: its loss, pre-clip gradient norm and whether clipping fired
    pub fn record_epoch(&mut self, loss: f64, gradient_norm: f64, clipped: bool) {
        self.record_loss(loss);
        push_bounded(&mut self.metrics.gradient_norms, gradient_norm, self.history_size);
        if clipped {
            self.metrics.clip_events += 1;
        }
        self.metrics.epochs += 1;
    }

    /// Record a training loss
    pub fn record_loss(&mut self, loss: f64) {
        push_bounded(&mut self.metrics.losses, loss, self.history_size);
    }

    /// Get a reference to the metrics
    pub fn metrics(&self) -> &TrainingMetrics {
        &self.metrics
    }

    pub fn into_metrics(self) -> TrainingMetrics {
        self.metrics
    }

    pub fn history_size(&self) -> usize {
        self.history_size
    }

    /// Get recent average loss
    pub fn avg_loss(&self, window: usize) -> Option<f64> {
        if self.metrics.losses.is_empty() || window == 0 {
            return None;
        }

        let n = window.min(self.metrics.losses.len());
        let sum: f64 = self.metrics.losses.iter().rev().take(n).sum();
        Some(sum / n as f64)
    }

    pub fn summary(&self) -> MetricsSummary {
        let losses = &self.metrics.losses;
        MetricsSummary {
            epochs: self.metrics.epochs,
            first_loss: losses.front().copied(),
            last_loss: losses.back().copied(),
            min_loss: losses.iter().copied().reduce(f64::min),
            last_gradient_norm: self.metrics.gradient_norms.back().copied(),
            clip_events: self.metrics.clip_events,
        }
    }

    /// Clear all metrics
    pub fn clear(&mut self) {
        self.metrics = TrainingMetrics::new(self.history_size);
    }
}

impl Default for MetricsTracker {
    fn default() -> Self {
        Self::new(1000)
    }
}
