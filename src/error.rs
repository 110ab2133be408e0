//! Error types for model setup and integration.

use thiserror::Error;

use crate::types::PrognosticVariable;

/// Errors reported by the dynamical core.
///
/// Setup errors (`Configuration`, `GridSizing`, `DimensionMismatch`, `Parse`,
/// `Io`) are raised while building geometry, boundaries or the integrator.
/// `NumericalInstability` is the only error a time step can produce.
#[derive(Error, Debug)]
pub enum ModelError {
    /// A parameter is outside its valid range.
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    /// Truncation and grid size violate the alias-free Gaussian grid rule.
    #[error("Grid {nlon}x{nlat} cannot resolve truncation T{truncation}: {reason}")]
    GridSizing {
        truncation: usize,
        nlon: usize,
        nlat: usize,
        reason: String,
    },

    /// Supplied data does not match the geometry.
    #[error("Dimension mismatch for {what}: expected {expected}, got {actual}")]
    DimensionMismatch {
        what: String,
        expected: String,
        actual: String,
    },

    /// A prognostic coefficient blew up.
    #[error(
        "Numerical instability at step {step}: {field}{} reached {magnitude:e} (threshold {threshold:e})",
        .level.map(|k| format!(" level {}", k)).unwrap_or_default()
    )]
    NumericalInstability {
        step: usize,
        field: PrognosticVariable,
        level: Option<usize>,
        magnitude: f64,
        threshold: f64,
    },

    /// Configuration text could not be parsed.
    #[error("Failed to parse configuration: {0}")]
    Parse(String),

    /// Configuration file could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ModelError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Create a dimension mismatch error.
    pub fn dimension_mismatch(
        what: impl Into<String>,
        expected: impl ToString,
        actual: impl ToString,
    ) -> Self {
        Self::DimensionMismatch {
            what: what.into(),
            expected: expected.to_string(),
            actual: actual.to_string(),
        }
    }

    /// Whether the error came from a time step rather than from setup.
    pub fn is_instability(&self) -> bool {
        matches!(self, Self::NumericalInstability { .. })
    }
}

impl From<serde_json::Error> for ModelError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err.to_string())
    }
}

/// Result alias used throughout the crate.
pub type ModelResult<T> = Result<T, ModelError>;
