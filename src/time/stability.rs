//! Stability monitoring for spectral prognostic variables.
//!
//! Detects blow-up before a step is committed: any non-finite coefficient,
//! or a coefficient modulus above the per-variable threshold, is fatal.
//! Values above `warning_fraction` of a threshold are reported but allowed.
//!
//! # Example
//!
//! ```
//! use spectral_gcm::spectral::Truncation;
//! use spectral_gcm::state::PrognosticVariables;
//! use spectral_gcm::time::{StabilityMonitor, StabilityThresholds};
//!
//! let vars = PrognosticVariables::<f64>::zeros(Truncation::triangular(5), 2);
//! let mut monitor = StabilityMonitor::new(StabilityThresholds::default());
//!
//! let status = monitor.check(&vars, 1);
//! assert!(status.is_stable);
//! assert!(status.instability().is_none());
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, ModelResult};
use crate::state::PrognosticVariables;
use crate::types::{NumberFormat, PrognosticVariable};

/// Blow-up thresholds on the modulus of spectral coefficients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StabilityThresholds {
    /// Vorticity (1/s).
    pub vorticity: f64,
    /// Divergence (1/s).
    pub divergence: f64,
    /// Temperature (K).
    pub temperature: f64,
    /// Specific humidity (kg/kg).
    pub humidity: f64,
    /// Log surface pressure.
    pub log_surface_pressure: f64,
    /// Fraction of a threshold above which a warning is raised.
    pub warning_fraction: f64,
}

impl Default for StabilityThresholds {
    fn default() -> Self {
        Self {
            vorticity: 1e-2,
            divergence: 1e-2,
            temperature: 2e3,
            humidity: 10.0,
            log_surface_pressure: 50.0,
            warning_fraction: 0.5,
        }
    }
}

impl StabilityThresholds {
    /// Threshold for one variable.
    pub fn max_for(&self, variable: PrognosticVariable) -> f64 {
        match variable {
            PrognosticVariable::Vorticity => self.vorticity,
            PrognosticVariable::Divergence => self.divergence,
            PrognosticVariable::Temperature => self.temperature,
            PrognosticVariable::Humidity => self.humidity,
            PrognosticVariable::LogSurfacePressure => self.log_surface_pressure,
        }
    }

    /// Set the threshold of one variable.
    pub fn with_max(mut self, variable: PrognosticVariable, max: f64) -> Self {
        match variable {
            PrognosticVariable::Vorticity => self.vorticity = max,
            PrognosticVariable::Divergence => self.divergence = max,
            PrognosticVariable::Temperature => self.temperature = max,
            PrognosticVariable::Humidity => self.humidity = max,
            PrognosticVariable::LogSurfacePressure => self.log_surface_pressure = max,
        }
        self
    }

    pub fn with_warning_fraction(mut self, fraction: f64) -> Self {
        self.warning_fraction = fraction;
        self
    }

    /// Thresholds must be positive; the warning fraction lies in `(0, 1]`.
    pub fn validate(&self) -> ModelResult<()> {
        for var in PrognosticVariable::ALL {
            let max = self.max_for(var);
            if !(max > 0.0) {
                return Err(ModelError::config(format!(
                    "stability threshold for {} must be positive, got {}",
                    var, max
                )));
            }
        }
        if !(self.warning_fraction > 0.0 && self.warning_fraction <= 1.0) {
            return Err(ModelError::config(format!(
                "warning_fraction must be in (0, 1], got {}",
                self.warning_fraction
            )));
        }
        Ok(())
    }
}

/// Types of stability warnings.
#[derive(Debug, Clone, PartialEq)]
pub enum StabilityWarning {
    /// NaN or infinite coefficient.
    NonFiniteValue {
        field: PrognosticVariable,
        level: Option<usize>,
    },
    /// Coefficient modulus above the blow-up threshold.
    ExceedsMax {
        field: PrognosticVariable,
        level: Option<usize>,
        value: f64,
        threshold: f64,
    },
    /// Coefficient modulus above the warning fraction of the threshold.
    ApproachingMax {
        field: PrognosticVariable,
        level: Option<usize>,
        value: f64,
        threshold: f64,
    },
}

fn level_suffix(level: &Option<usize>) -> String {
    level.map(|k| format!(" level {}", k)).unwrap_or_default()
}

impl std::fmt::Display for StabilityWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NonFiniteValue { field, level } => {
                write!(f, "Non-finite {}{}", field, level_suffix(level))
            }
            Self::ExceedsMax {
                field,
                level,
                value,
                threshold,
            } => write!(
                f,
                "{}{} exceeds max: {:.3e} > {:.3e}",
                field,
                level_suffix(level),
                value,
                threshold
            ),
            Self::ApproachingMax {
                field,
                level,
                value,
                threshold,
            } => write!(
                f,
                "{}{} approaching max: {:.3e} of {:.3e}",
                field,
                level_suffix(level),
                value,
                threshold
            ),
        }
    }
}

impl StabilityWarning {
    /// Whether the warning aborts the step.
    pub fn is_critical(&self) -> bool {
        !matches!(self, Self::ApproachingMax { .. })
    }
}

/// Result of one stability check.
#[derive(Debug, Clone)]
pub struct StabilityStatus {
    /// Step the checked state belongs to.
    pub step: usize,
    /// Largest coefficient modulus per variable, NaN if non-finite.
    pub maxima: Vec<(PrognosticVariable, f64)>,
    /// Whether the state may be committed.
    pub is_stable: bool,
    pub warnings: Vec<StabilityWarning>,
}

impl StabilityStatus {
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// The first critical warning as a [`ModelError::NumericalInstability`].
    pub fn instability(&self) -> Option<ModelError> {
        self.warnings.iter().find(|w| w.is_critical()).map(|w| match *w {
            StabilityWarning::NonFiniteValue { field, level } => ModelError::NumericalInstability {
                step: self.step,
                field,
                level,
                magnitude: f64::NAN,
                threshold: f64::NAN,
            },
            StabilityWarning::ExceedsMax {
                field,
                level,
                value,
                threshold,
            }
            | StabilityWarning::ApproachingMax {
                field,
                level,
                value,
                threshold,
            } => ModelError::NumericalInstability {
                step: self.step,
                field,
                level,
                magnitude: value,
                threshold,
            },
        })
    }
}

/// Monitor for tracking prognostic stability over a run.
#[derive(Debug, Clone)]
pub struct StabilityMonitor {
    thresholds: StabilityThresholds,
    total_checks: usize,
    total_warnings: usize,
    last_status: Option<StabilityStatus>,
}

impl StabilityMonitor {
    pub fn new(thresholds: StabilityThresholds) -> Self {
        Self {
            thresholds,
            total_checks: 0,
            total_warnings: 0,
            last_status: None,
        }
    }

    pub fn thresholds(&self) -> &StabilityThresholds {
        &self.thresholds
    }

    pub fn total_checks(&self) -> usize {
        self.total_checks
    }

    pub fn total_warnings(&self) -> usize {
        self.total_warnings
    }

    pub fn last_status(&self) -> Option<&StabilityStatus> {
        self.last_status.as_ref()
    }

    /// Check every field of `vars`, labelled as belonging to `step`.
    pub fn check<NF: NumberFormat>(
        &mut self,
        vars: &PrognosticVariables<NF>,
        step: usize,
    ) -> StabilityStatus {
        self.total_checks += 1;

        let mut warnings = Vec::new();
        for (field, level, spectral) in vars.iter_fields() {
            let value = spectral.max_abs().to_f64_lossy();
            let threshold = self.thresholds.max_for(field);
            if !value.is_finite() {
                warnings.push(StabilityWarning::NonFiniteValue { field, level });
            } else if value > threshold {
                warnings.push(StabilityWarning::ExceedsMax {
                    field,
                    level,
                    value,
                    threshold,
                });
            } else if value > self.thresholds.warning_fraction * threshold {
                warnings.push(StabilityWarning::ApproachingMax {
                    field,
                    level,
                    value,
                    threshold,
                });
            }
        }

        let maxima: Vec<_> = PrognosticVariable::ALL
            .into_iter()
            .map(|var| (var, vars.max_abs(var).to_f64_lossy()))
            .collect();
        log::trace!("step {} maxima {:?}", step, maxima);

        for warning in warnings.iter().filter(|w| !w.is_critical()) {
            log::warn!("step {}: {}", step, warning);
        }

        self.total_warnings += warnings.len();
        let status = StabilityStatus {
            step,
            maxima,
            is_stable: !warnings.iter().any(StabilityWarning::is_critical),
            warnings,
        };
        self.last_status = Some(status.clone());
        status
    }

    /// Whether the last check found a critical condition.
    pub fn should_stop(&self) -> bool {
        self.last_status
            .as_ref()
            .map(|s| !s.is_stable)
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spectral::Truncation;
    use num_complex::Complex;

    fn vars() -> PrognosticVariables<f64> {
        PrognosticVariables::zeros(Truncation::triangular(4), 3)
    }

    #[test]
    fn test_default_thresholds_valid() {
        assert!(StabilityThresholds::default().validate().is_ok());
        let bad = StabilityThresholds::default().with_max(PrognosticVariable::Humidity, 0.0);
        assert!(bad.validate().is_err());
        let bad = StabilityThresholds::default().with_warning_fraction(1.5);
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_detect_blow_up() {
        let mut v = vars();
        v.divergence[2][(1, 3)] = Complex::new(1.0, 0.0);
        let mut monitor = StabilityMonitor::new(StabilityThresholds::default());
        let status = monitor.check(&v, 7);
        assert!(!status.is_stable);
        assert!(monitor.should_stop());
        match status.instability() {
            Some(ModelError::NumericalInstability {
                step, field, level, ..
            }) => {
                assert_eq!(step, 7);
                assert_eq!(field, PrognosticVariable::Divergence);
                assert_eq!(level, Some(2));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_detect_nan_surface_pressure() {
        let mut v = vars();
        v.log_surface_pressure[(0, 0)] = Complex::new(f64::NAN, 0.0);
        let mut monitor = StabilityMonitor::new(StabilityThresholds::default());
        let status = monitor.check(&v, 1);
        assert!(matches!(
            status.warnings[0],
            StabilityWarning::NonFiniteValue {
                field: PrognosticVariable::LogSurfacePressure,
                level: None
            }
        ));
        assert!(status.instability().is_some());
    }

    #[test]
    fn test_warning_is_not_fatal() {
        let mut v = vars();
        v.temperature[0][(0, 0)] = Complex::new(1500.0, 0.0);
        let mut monitor = StabilityMonitor::new(StabilityThresholds::default());
        let status = monitor.check(&v, 1);
        assert!(status.is_stable);
        assert!(status.has_warnings());
        assert!(status.instability().is_none());
        assert_eq!(monitor.total_warnings(), 1);
    }
}
