//! Physical constants and the reference temperature profile.

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, ModelResult};
use crate::types::NumberFormat;

/// Planetary and thermodynamic constants (SI units, `f64`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicalConstants {
    /// Planet radius (m).
    pub radius: f64,
    /// Angular rotation rate (1/s).
    pub rotation: f64,
    /// Gravitational acceleration (m/s²).
    pub gravity: f64,
    /// Gas constant of dry air (J/kg/K).
    pub r_dry: f64,
    /// Specific heat of dry air at constant pressure (J/kg/K).
    pub cp: f64,
    /// Reference surface pressure (Pa).
    pub p0: f64,
}

impl Default for PhysicalConstants {
    fn default() -> Self {
        Self::earth()
    }
}

impl PhysicalConstants {
    /// Earth values.
    pub fn earth() -> Self {
        Self {
            radius: 6.371e6,
            rotation: 7.292e-5,
            gravity: 9.81,
            r_dry: 287.0,
            cp: 1004.0,
            p0: 1e5,
        }
    }

    /// Set the planet radius.
    pub fn with_radius(mut self, radius: f64) -> Self {
        self.radius = radius;
        self
    }

    /// Set the rotation rate.
    pub fn with_rotation(mut self, rotation: f64) -> Self {
        self.rotation = rotation;
        self
    }

    /// κ = R/cp.
    pub fn kappa(&self) -> f64 {
        self.r_dry / self.cp
    }

    /// Check that every constant is physical.
    pub fn validate(&self) -> ModelResult<()> {
        let positive = [
            ("radius", self.radius),
            ("gravity", self.gravity),
            ("r_dry", self.r_dry),
            ("cp", self.cp),
            ("p0", self.p0),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(ModelError::config(format!(
                    "{} must be positive, got {}",
                    name, value
                )));
            }
        }
        if !self.rotation.is_finite() {
            return Err(ModelError::config(format!(
                "rotation must be finite, got {}",
                self.rotation
            )));
        }
        Ok(())
    }
}

/// Reference temperature profile used to linearise the gravity-wave terms.
///
/// `T_ref(σ) = max(T_strat, T_surf · σ^(R Γ / g))`, a constant lapse rate
/// troposphere capped by an isothermal stratosphere.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReferenceProfile {
    /// Surface temperature (K).
    pub surface_temperature: f64,
    /// Temperature lapse rate (K/m).
    pub lapse_rate: f64,
    /// Stratospheric temperature floor (K).
    pub stratosphere_temperature: f64,
}

impl Default for ReferenceProfile {
    fn default() -> Self {
        Self {
            surface_temperature: 288.0,
            lapse_rate: 6.5e-3,
            stratosphere_temperature: 216.0,
        }
    }
}

impl ReferenceProfile {
    /// An isothermal profile.
    pub fn isothermal(temperature: f64) -> Self {
        Self {
            surface_temperature: temperature,
            lapse_rate: 0.0,
            stratosphere_temperature: temperature,
        }
    }

    /// Reference temperature at full level `sigma`.
    pub fn temperature(&self, sigma: f64, constants: &PhysicalConstants) -> f64 {
        let exponent = constants.r_dry * self.lapse_rate / constants.gravity;
        (self.surface_temperature * sigma.powf(exponent)).max(self.stratosphere_temperature)
    }

    /// Check temperatures are positive and the lapse rate is finite.
    pub fn validate(&self) -> ModelResult<()> {
        if !(self.surface_temperature > 0.0 && self.stratosphere_temperature > 0.0) {
            return Err(ModelError::config(format!(
                "reference temperatures must be positive, got {} and {}",
                self.surface_temperature, self.stratosphere_temperature
            )));
        }
        if !self.lapse_rate.is_finite() || self.lapse_rate < 0.0 {
            return Err(ModelError::config(format!(
                "lapse_rate must be finite and non-negative, got {}",
                self.lapse_rate
            )));
        }
        Ok(())
    }
}

/// Constants converted to the run's number format.
///
/// Built once at setup so hot loops never convert from `f64`.
#[derive(Debug, Clone, Copy)]
pub struct Constants<NF> {
    pub radius: NF,
    pub inv_radius: NF,
    pub rotation: NF,
    pub gravity: NF,
    pub r_dry: NF,
    pub kappa: NF,
}

impl<NF: NumberFormat> Constants<NF> {
    /// Convert physical constants.
    pub fn new(physical: &PhysicalConstants) -> Self {
        Self {
            radius: NF::from_f64_lossy(physical.radius),
            inv_radius: NF::from_f64_lossy(1.0 / physical.radius),
            rotation: NF::from_f64_lossy(physical.rotation),
            gravity: NF::from_f64_lossy(physical.gravity),
            r_dry: NF::from_f64_lossy(physical.r_dry),
            kappa: NF::from_f64_lossy(physical.kappa()),
        }
    }
}
