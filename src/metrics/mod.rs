pub mod tracker;
pub mod validation;

pub use tracker::{MetricsSummary, MetricsTracker, TrainingMetrics};
pub use validation::{
    argmax,
    argmax_accuracy,
    mean_absolute_error,
    mean_squared_error,
    sign_accuracy,
    threshold_accuracy,
};
