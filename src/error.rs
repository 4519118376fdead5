//! Error types.
//!
//! The engine reports failures as structured values so callers can tell
//! "zero correlation" apart from "could not compute". The binary wraps those
//! into an exit-code-bearing `AppError` at the outermost layer.

use thiserror::Error;

/// All recoverable failures produced by engine computations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    /// Fewer aligned samples than the computation requires.
    #[error("insufficient data: {actual} aligned samples, {required} required")]
    InsufficientData { required: usize, actual: usize },

    /// Zero variance prevents a defined correlation or z-score.
    #[error("degenerate series '{slug}': zero variance over the requested window")]
    DegenerateSeries { slug: String },

    /// Slug not resolvable by the series store.
    #[error("unknown indicator '{0}'")]
    UnknownIndicator(String),

    /// Caller-supplied parameter out of range.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}

impl EngineError {
    pub fn degenerate(slug: impl Into<String>) -> Self {
        Self::DegenerateSeries { slug: slug.into() }
    }
}

/// Binary-level error carrying a process exit code.
#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl From<EngineError> for AppError {
    fn from(err: EngineError) -> Self {
        // Data problems and bad parameters get distinct exit codes so shell
        // scripts can branch on them.
        let code = match &err {
            EngineError::InvalidParameter(_) => 2,
            EngineError::UnknownIndicator(_) => 3,
            EngineError::InsufficientData { .. } | EngineError::DegenerateSeries { .. } => 4,
        };
        Self::new(code, err.to_string())
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}
