//! Run configuration.
//!
//! Everything here is fixed for the lifetime of a run. Changing the
//! truncation, grid or level structure means building a new [`Geometry`]
//! and a new prognostic state; the time step alone can be changed through
//! [`TimeIntegrator::set_time_step`].
//!
//! # Example
//!
//! ```
//! use spectral_gcm::config::ModelConfig;
//!
//! let config = ModelConfig::default().with_truncation(21).with_levels(5);
//! config.validate().unwrap();
//!
//! let json = config.to_json().unwrap();
//! let back = ModelConfig::from_json(&json).unwrap();
//! assert_eq!(back.spectral.truncation, 21);
//! ```
//!
//! [`Geometry`]: crate::geometry::Geometry
//! [`TimeIntegrator::set_time_step`]: crate::time::TimeIntegrator::set_time_step

mod constants;

use std::path::Path;

use serde::{Deserialize, Serialize};

pub use constants::{Constants, PhysicalConstants, ReferenceProfile};

use crate::error::{ModelError, ModelResult};
use crate::geometry::{GridSize, VerticalCoordinates};
use crate::time::StabilityThresholds;

/// Half levels of the default 8-level σ grid, top to surface.
pub const DEFAULT_HALF_LEVELS: [f64; 9] = [0.0, 0.05, 0.14, 0.26, 0.42, 0.6, 0.77, 0.9, 1.0];

// =============================================================================
// Sections
// =============================================================================

/// Spectral truncation and grid dimensions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpectralConfig {
    /// Maximum total wavenumber `T`.
    pub truncation: usize,
    /// Number of longitudes. Defaults to the alias-free sizing rule.
    pub nlon: Option<usize>,
    /// Number of Gaussian latitudes. Defaults to `nlon / 2`.
    pub nlat: Option<usize>,
}

impl Default for SpectralConfig {
    fn default() -> Self {
        Self {
            truncation: 31,
            nlon: None,
            nlat: None,
        }
    }
}

impl SpectralConfig {
    /// Resolve and validate the grid size.
    pub fn grid_size(&self) -> ModelResult<GridSize> {
        match (self.nlon, self.nlat) {
            (None, None) => GridSize::for_truncation(self.truncation),
            (nlon, nlat) => {
                let default = GridSize::sizing_rule(self.truncation);
                let nlon = nlon.unwrap_or(default.0);
                let nlat = nlat.unwrap_or(nlon / 2);
                GridSize::new(self.truncation, nlon, nlat)
            }
        }
    }
}

/// How σ half levels are distributed when not given explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StretchingConfig {
    /// Equal spacing in σ.
    Uniform,
    /// `σ = (k/n)^exponent`, refining near the top for exponent > 1.
    PowerLaw { exponent: f64 },
}

impl Default for StretchingConfig {
    fn default() -> Self {
        Self::PowerLaw { exponent: 1.5 }
    }
}

/// Vertical level structure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VerticalConfig {
    /// Number of full levels.
    pub n_levels: usize,
    /// Explicit half levels from σ = 0 (top) to σ = 1 (surface).
    pub half_levels: Option<Vec<f64>>,
    /// Distribution used when `half_levels` is absent.
    pub stretching: StretchingConfig,
}

impl Default for VerticalConfig {
    fn default() -> Self {
        Self {
            n_levels: DEFAULT_HALF_LEVELS.len() - 1,
            half_levels: Some(DEFAULT_HALF_LEVELS.to_vec()),
            stretching: StretchingConfig::default(),
        }
    }
}

impl VerticalConfig {
    /// `n` levels distributed by `stretching`.
    pub fn stretched(n_levels: usize, stretching: StretchingConfig) -> Self {
        Self {
            n_levels,
            half_levels: None,
            stretching,
        }
    }
}

/// Time stepping parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeConfig {
    /// Time step Δt (s).
    pub dt_seconds: f64,
    /// Robert–Asselin filter strength ν.
    pub robert_filter: f64,
    /// Williams filter parameter α (0.5 conserves the mean, 1 is plain Robert–Asselin).
    pub williams_filter: f64,
    /// Implicitness of the gravity-wave terms (0.5 centred, 1 backward).
    pub implicit_alpha: f64,
}

impl Default for TimeConfig {
    fn default() -> Self {
        Self {
            dt_seconds: 1800.0,
            robert_filter: 0.05,
            williams_filter: 0.53,
            implicit_alpha: 0.5,
        }
    }
}

/// Scale-selective implicit horizontal diffusion.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiffusionConfig {
    /// Whether diffusion is applied.
    pub enabled: bool,
    /// Power `p` of the Laplacian (∇^2p).
    pub power: u32,
    /// Damping time scale of the highest wavenumber (hours).
    pub time_scale_hours: f64,
}

impl Default for DiffusionConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            power: 4,
            time_scale_hours: 2.4,
        }
    }
}

// =============================================================================
// Model Configuration
// =============================================================================

/// Complete configuration of a run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    pub spectral: SpectralConfig,
    pub vertical: VerticalConfig,
    pub time: TimeConfig,
    pub diffusion: DiffusionConfig,
    pub physical: PhysicalConstants,
    pub reference: ReferenceProfile,
    pub stability: StabilityThresholds,
}

impl ModelConfig {
    /// Set the spectral truncation, resetting the grid to the sizing rule.
    pub fn with_truncation(mut self, truncation: usize) -> Self {
        self.spectral = SpectralConfig {
            truncation,
            nlon: None,
            nlat: None,
        };
        self
    }

    /// Use an explicit grid size.
    pub fn with_grid(mut self, nlon: usize, nlat: usize) -> Self {
        self.spectral.nlon = Some(nlon);
        self.spectral.nlat = Some(nlat);
        self
    }

    /// Use `n` levels with the configured stretching.
    pub fn with_levels(mut self, n_levels: usize) -> Self {
        self.vertical = VerticalConfig::stretched(n_levels, self.vertical.stretching);
        self
    }

    /// Use explicit σ half levels.
    pub fn with_half_levels(mut self, half_levels: Vec<f64>) -> Self {
        self.vertical.n_levels = half_levels.len().saturating_sub(1);
        self.vertical.half_levels = Some(half_levels);
        self
    }

    /// Set the time step in seconds.
    pub fn with_time_step(mut self, dt_seconds: f64) -> Self {
        self.time.dt_seconds = dt_seconds;
        self
    }

    /// Set the Robert–Asselin–Williams filter coefficients.
    pub fn with_filter(mut self, robert: f64, williams: f64) -> Self {
        self.time.robert_filter = robert;
        self.time.williams_filter = williams;
        self
    }

    /// Enable or disable horizontal diffusion.
    pub fn with_diffusion(mut self, enabled: bool) -> Self {
        self.diffusion.enabled = enabled;
        self
    }

    /// Set the reference temperature profile.
    pub fn with_reference(mut self, reference: ReferenceProfile) -> Self {
        self.reference = reference;
        self
    }

    /// Set the blow-up thresholds.
    pub fn with_stability(mut self, stability: StabilityThresholds) -> Self {
        self.stability = stability;
        self
    }

    /// Validate every section.
    pub fn validate(&self) -> ModelResult<()> {
        self.spectral.grid_size()?;

        let vertical = &self.vertical;
        if vertical.n_levels == 0 {
            return Err(ModelError::config("n_levels must be >= 1"));
        }
        if let Some(half) = &vertical.half_levels {
            if half.len() != vertical.n_levels + 1 {
                return Err(ModelError::dimension_mismatch(
                    "half_levels",
                    vertical.n_levels + 1,
                    half.len(),
                ));
            }
        }
        if let StretchingConfig::PowerLaw { exponent } = vertical.stretching {
            if !(exponent.is_finite() && exponent > 0.0) {
                return Err(ModelError::config(format!(
                    "stretching exponent must be positive, got {}",
                    exponent
                )));
            }
        }
        VerticalCoordinates::from_config(vertical)?;

        let time = &self.time;
        if !(time.dt_seconds.is_finite() && time.dt_seconds > 0.0) {
            return Err(ModelError::config(format!(
                "dt_seconds must be positive, got {}",
                time.dt_seconds
            )));
        }
        if !(0.0..1.0).contains(&time.robert_filter) {
            return Err(ModelError::config(format!(
                "robert_filter must be in [0, 1), got {}",
                time.robert_filter
            )));
        }
        if !(0.5..=1.0).contains(&time.williams_filter) {
            return Err(ModelError::config(format!(
                "williams_filter must be in [0.5, 1], got {}",
                time.williams_filter
            )));
        }
        if !(0.5..=1.0).contains(&time.implicit_alpha) {
            return Err(ModelError::config(format!(
                "implicit_alpha must be in [0.5, 1], got {}",
                time.implicit_alpha
            )));
        }

        let diffusion = &self.diffusion;
        if diffusion.enabled {
            if diffusion.power == 0 {
                return Err(ModelError::config("diffusion power must be >= 1"));
            }
            if !(diffusion.time_scale_hours.is_finite() && diffusion.time_scale_hours > 0.0) {
                return Err(ModelError::config(format!(
                    "diffusion time_scale_hours must be positive, got {}",
                    diffusion.time_scale_hours
                )));
            }
        }

        self.physical.validate()?;
        self.reference.validate()?;
        self.stability.validate()?;
        Ok(())
    }

    /// Parse from JSON. Missing sections take their defaults.
    pub fn from_json(json: &str) -> ModelResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read a JSON configuration file.
    pub fn from_file(path: impl AsRef<Path>) -> ModelResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Serialize to pretty-printed JSON.
    pub fn to_json(&self) -> ModelResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
