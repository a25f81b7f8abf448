use std::fmt;

/// Result type for engine operations
pub type Result<T> = std::result::Result<T, EngineError>;

/// Status returned across the C boundary when a call succeeded.
pub const STATUS_OK: i32 = 0;

/// Status returned across the C boundary when a panic was caught.
pub const STATUS_PANIC: i32 = 6;

/// Main error type for the training engine
#[derive(Debug, Clone, PartialEq)]
pub enum EngineError {
    /// X/Y/weights dimensions inconsistent with the declared n, d, k
    ShapeMismatch {
        what: String,
        expected: String,
        actual: String,
    },

    /// Flat buffer length differs from the codec-derived length
    LayoutError {
        expected: usize,
        actual: usize,
    },

    /// The weight buffer became non-finite during training
    NumericDivergence {
        epoch: usize,
        non_finite: usize,
    },

    /// Zero width, too few layers, unknown activation code or bad hyper-parameter
    InvalidArchitecture(String),

    /// A required pointer was null at the C boundary
    NullPointer(&'static str),
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::ShapeMismatch { what, expected, actual } => {
                write!(f, "Shape mismatch for {}: expected {}, got {}", what, expected, actual)
            }
            EngineError::LayoutError { expected, actual } => {
                write!(f, "Layout error: weight buffer must hold {} values, got {}", expected, actual)
            }
            EngineError::NumericDivergence { epoch, non_finite } => {
                write!(f, "Numeric divergence at epoch {}: {} non-finite weights", epoch, non_finite)
            }
            EngineError::InvalidArchitecture(msg) => write!(f, "Invalid architecture: {}", msg),
            EngineError::NullPointer(name) => write!(f, "Null pointer passed for '{}'", name),
        }
    }
}

impl std::error::Error for EngineError {}

// Views are only reshaped from contiguous slices, so this only fires on a broken layout
impl From<ndarray::ShapeError> for EngineError {
    fn from(err: ndarray::ShapeError) -> Self {
        EngineError::ShapeMismatch {
            what: "weight view".to_string(),
            expected: "contiguous row-major slice".to_string(),
            actual: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for EngineError {
    fn from(err: serde_json::Error) -> Self {
        EngineError::InvalidArchitecture(format!("config document: {}", err))
    }
}

// Helper functions for common error patterns
impl EngineError {
    pub fn shape_mismatch<S: Into<String>>(what: S, expected: S, actual: S) -> Self {
        EngineError::ShapeMismatch {
            what: what.into(),
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    pub fn invalid_architecture<S: Into<String>>(reason: S) -> Self {
        EngineError::InvalidArchitecture(reason.into())
    }

    /// Stable non-zero status code for the C boundary.
    pub fn status_code(&self) -> i32 {
        match self {
            EngineError::ShapeMismatch { .. } => 1,
            EngineError::LayoutError { .. } => 2,
            EngineError::NumericDivergence { .. } => 3,
            EngineError::InvalidArchitecture(_) => 4,
            EngineError::NullPointer(_) => 5,
        }
    }
}
