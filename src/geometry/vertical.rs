//! σ-coordinate vertical levels.
//!
//! σ = p / p_s runs from 0 at the model top to 1 at the surface. Level
//! index 0 is the top level. Half levels `σ_{k+1/2}` bound the layers,
//! full levels sit at the midpoint of their two half levels.
//!
//! # Example
//!
//! ```
//! use spectral_gcm::geometry::{PowerLawStretching, VerticalCoordinates};
//!
//! let levels = VerticalCoordinates::stretched(10, &PowerLawStretching { exponent: 1.5 }).unwrap();
//! assert_eq!(levels.n_levels(), 10);
//! assert!((levels.thickness().iter().sum::<f64>() - 1.0).abs() < 1e-14);
//! ```

use crate::config::{StretchingConfig, VerticalConfig};
use crate::error::{ModelError, ModelResult};

/// Distribution of σ half levels.
///
/// Implementations return `n + 1` strictly increasing values from 0 to 1.
pub trait Stretching: Send + Sync {
    /// Half levels `σ_{1/2} = 0, …, σ_{n+1/2} = 1`.
    fn half_levels(&self, n_levels: usize) -> Vec<f64>;

    /// Human-readable name for logging.
    fn name(&self) -> &'static str;
}

/// Equal layer thickness.
#[derive(Clone, Copy, Debug, Default)]
pub struct UniformStretching;

impl Stretching for UniformStretching {
    fn half_levels(&self, n_levels: usize) -> Vec<f64> {
        (0..=n_levels)
            .map(|k| k as f64 / n_levels as f64)
            .collect()
    }

    fn name(&self) -> &'static str {
        "uniform"
    }
}

/// `σ_{k+1/2} = (k / n)^exponent`.
///
/// Exponents above 1 thin the upper layers, below 1 the lower ones.
#[derive(Clone, Copy, Debug)]
pub struct PowerLawStretching {
    pub exponent: f64,
}

impl Stretching for PowerLawStretching {
    fn half_levels(&self, n_levels: usize) -> Vec<f64> {
        (0..=n_levels)
            .map(|k| (k as f64 / n_levels as f64).powf(self.exponent))
            .collect()
    }

    fn name(&self) -> &'static str {
        "power-law"
    }
}

/// σ levels and layer thicknesses.
#[derive(Clone, Debug, PartialEq)]
pub struct VerticalCoordinates {
    half: Vec<f64>,
    full: Vec<f64>,
    thickness: Vec<f64>,
}

impl VerticalCoordinates {
    /// Build from explicit half levels.
    ///
    /// Requires at least two values, strictly increasing from exactly 0 to exactly 1.
    pub fn from_half_levels(half: Vec<f64>) -> ModelResult<Self> {
        if half.len() < 2 {
            return Err(ModelError::config("need at least one vertical level"));
        }
        let first = half[0];
        let last = half[half.len() - 1];
        if first != 0.0 || last != 1.0 {
            return Err(ModelError::config(format!(
                "half levels must run from 0 to 1, got {} to {}",
                first, last
            )));
        }
        if let Some(k) = half.windows(2).position(|w| !(w[1] > w[0])) {
            return Err(ModelError::config(format!(
                "half levels must be strictly increasing, violated at index {}",
                k + 1
            )));
        }

        let full = half.windows(2).map(|w| 0.5 * (w[0] + w[1])).collect();
        let thickness = half.windows(2).map(|w| w[1] - w[0]).collect();
        Ok(Self {
            half,
            full,
            thickness,
        })
    }

    /// Build `n_levels` levels from a stretching function.
    pub fn stretched(n_levels: usize, stretching: &dyn Stretching) -> ModelResult<Self> {
        if n_levels == 0 {
            return Err(ModelError::config("need at least one vertical level"));
        }
        let mut half = stretching.half_levels(n_levels);
        // pin the ends against round-off in the stretching function
        half[0] = 0.0;
        half[n_levels] = 1.0;
        Self::from_half_levels(half)
    }

    /// Build from the configuration section.
    pub fn from_config(config: &VerticalConfig) -> ModelResult<Self> {
        match &config.half_levels {
            Some(half) => {
                if half.len() != config.n_levels + 1 {
                    return Err(ModelError::dimension_mismatch(
                        "half_levels",
                        config.n_levels + 1,
                        half.len(),
                    ));
                }
                Self::from_half_levels(half.clone())
            }
            None => match config.stretching {
                StretchingConfig::Uniform => Self::stretched(config.n_levels, &UniformStretching),
                StretchingConfig::PowerLaw { exponent } => {
                    Self::stretched(config.n_levels, &PowerLawStretching { exponent })
                }
            },
        }
    }

    /// Number of full levels.
    #[inline]
    pub fn n_levels(&self) -> usize {
        self.full.len()
    }

    /// Half levels, `n_levels + 1` values.
    pub fn half_levels(&self) -> &[f64] {
        &self.half
    }

    /// Full levels.
    pub fn full_levels(&self) -> &[f64] {
        &self.full
    }

    /// Layer thicknesses Δσ_k, summing to 1.
    pub fn thickness(&self) -> &[f64] {
        &self.thickness
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_HALF_LEVELS;

    #[test]
    fn test_default_levels() {
        let v = VerticalCoordinates::from_half_levels(DEFAULT_HALF_LEVELS.to_vec()).unwrap();
        assert_eq!(v.n_levels(), 8);
        assert!((v.full_levels()[0] - 0.025).abs() < 1e-15);
        assert!((v.full_levels()[7] - 0.95).abs() < 1e-15);
        assert!((v.thickness().iter().sum::<f64>() - 1.0).abs() < 1e-15);
    }

    #[test]
    fn test_uniform() {
        let v = VerticalCoordinates::stretched(4, &UniformStretching).unwrap();
        assert_eq!(v.half_levels(), &[0.0, 0.25, 0.5, 0.75, 1.0]);
        assert!(v.thickness().iter().all(|&d| (d - 0.25).abs() < 1e-15));
    }

    #[test]
    fn test_power_law_refines_top() {
        let v = VerticalCoordinates::stretched(6, &PowerLawStretching { exponent: 2.0 }).unwrap();
        let dz = v.thickness();
        assert!(dz[0] < dz[5]);
    }

    #[test]
    fn test_rejects_non_monotonic() {
        let err = VerticalCoordinates::from_half_levels(vec![0.0, 0.5, 0.4, 1.0]).unwrap_err();
        assert!(matches!(err, ModelError::Configuration(_)));
        assert!(VerticalCoordinates::from_half_levels(vec![0.1, 1.0]).is_err());
        assert!(VerticalCoordinates::from_half_levels(vec![0.0]).is_err());
    }
}
