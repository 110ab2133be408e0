//! Prognostic variable tags.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The five prognostic variables advanced by the time integrator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrognosticVariable {
    /// Relative vorticity (1/s).
    Vorticity,
    /// Horizontal divergence (1/s).
    Divergence,
    /// Absolute temperature (K).
    Temperature,
    /// Specific humidity (kg/kg).
    Humidity,
    /// Logarithm of surface pressure in Pa. Single level.
    LogSurfacePressure,
}

impl PrognosticVariable {
    /// All variables in storage order.
    pub const ALL: [PrognosticVariable; 5] = [
        Self::Vorticity,
        Self::Divergence,
        Self::Temperature,
        Self::Humidity,
        Self::LogSurfacePressure,
    ];

    /// Short name used in logs and error messages.
    pub fn name(self) -> &'static str {
        match self {
            Self::Vorticity => "vorticity",
            Self::Divergence => "divergence",
            Self::Temperature => "temperature",
            Self::Humidity => "humidity",
            Self::LogSurfacePressure => "log_surface_pressure",
        }
    }

    /// Whether the variable has one field per vertical level.
    pub fn is_layered(self) -> bool {
        !matches!(self, Self::LogSurfacePressure)
    }

    /// Whether the variable is coupled by gravity waves and solved implicitly.
    pub fn is_semi_implicit(self) -> bool {
        matches!(
            self,
            Self::Divergence | Self::Temperature | Self::LogSurfacePressure
        )
    }
}

impl fmt::Display for PrognosticVariable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layering() {
        let layered = PrognosticVariable::ALL
            .iter()
            .filter(|v| v.is_layered())
            .count();
        assert_eq!(layered, 4);
    }

    #[test]
    fn test_semi_implicit_set() {
        assert!(PrognosticVariable::Divergence.is_semi_implicit());
        assert!(!PrognosticVariable::Vorticity.is_semi_implicit());
        assert!(!PrognosticVariable::Humidity.is_semi_implicit());
    }
}
