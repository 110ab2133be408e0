//! Newtonian temperature relaxation and boundary-layer Rayleigh drag.
//!
//! Temperature relaxes toward a zonally symmetric radiative equilibrium
//!
//! ```text
//! T_eq = max(T_min, [T_0 − ΔT_y sin²φ − Δθ_z ln(p/p_0) cos²φ] (p/p_0)^κ)
//! ```
//!
//! at the rate `k_T = k_a + (k_s − k_a) max(0, (σ − σ_b)/(1 − σ_b)) cos⁴φ`.
//! Winds are damped at `k_v = k_f max(0, (σ − σ_b)/(1 − σ_b))`. Defaults
//! follow the Held–Suarez benchmark.

use serde::{Deserialize, Serialize};

use super::tendencies::PhysicsTendencies;
use super::traits::{Parameterization, ParameterizationInfo};
use crate::boundaries::Boundaries;
use crate::dynamics::{GridVariables, TendencyContribution};
use crate::error::{ModelError, ModelResult};
use crate::geometry::Geometry;
use crate::spectral::GridField;
use crate::types::NumberFormat;

const DAY: f64 = 86_400.0;

/// Relaxation parameters. Rates are in 1/s.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NewtonianRelaxation {
    /// Equilibrium surface temperature at the equator (K).
    pub equator_temperature: f64,
    /// Equator-to-pole equilibrium temperature difference (K).
    pub meridional_gradient: f64,
    /// Static stability parameter (K).
    pub vertical_gradient: f64,
    /// Stratospheric floor (K).
    pub minimum_temperature: f64,
    /// Top of the boundary layer in σ.
    pub boundary_layer_top: f64,
    /// Free-atmosphere thermal relaxation rate.
    pub free_rate: f64,
    /// Surface thermal relaxation rate at the equator.
    pub surface_rate: f64,
    /// Surface Rayleigh drag rate.
    pub drag_rate: f64,
}

impl Default for NewtonianRelaxation {
    fn default() -> Self {
        Self {
            equator_temperature: 315.0,
            meridional_gradient: 60.0,
            vertical_gradient: 10.0,
            minimum_temperature: 200.0,
            boundary_layer_top: 0.7,
            free_rate: 1.0 / (40.0 * DAY),
            surface_rate: 1.0 / (4.0 * DAY),
            drag_rate: 1.0 / DAY,
        }
    }
}

impl NewtonianRelaxation {
    /// Held–Suarez parameters.
    pub fn held_suarez() -> Self {
        Self::default()
    }

    pub fn with_equator_temperature(mut self, temperature: f64) -> Self {
        self.equator_temperature = temperature;
        self
    }

    /// Thermal relaxation time scales in days.
    pub fn with_time_scales(mut self, free_days: f64, surface_days: f64) -> Self {
        self.free_rate = 1.0 / (free_days * DAY);
        self.surface_rate = 1.0 / (surface_days * DAY);
        self
    }

    /// Rayleigh drag time scale in days.
    pub fn with_drag_days(mut self, days: f64) -> Self {
        self.drag_rate = 1.0 / (days * DAY);
        self
    }

    pub fn validate(&self) -> ModelResult<()> {
        if !(self.boundary_layer_top > 0.0 && self.boundary_layer_top < 1.0) {
            return Err(ModelError::config(format!(
                "boundary_layer_top must be in (0, 1), got {}",
                self.boundary_layer_top
            )));
        }
        let rates = [self.free_rate, self.surface_rate, self.drag_rate];
        if rates.iter().any(|r| !(r.is_finite() && *r >= 0.0)) {
            return Err(ModelError::config("relaxation rates must be finite and non-negative"));
        }
        if !(self.minimum_temperature > 0.0 && self.equator_temperature > self.minimum_temperature) {
            return Err(ModelError::config(
                "equator_temperature must exceed a positive minimum_temperature",
            ));
        }
        Ok(())
    }

    /// Fraction of the boundary-layer profile at `σ`: 0 above `σ_b`, 1 at the surface.
    fn boundary_layer_weight(&self, sigma: f64) -> f64 {
        ((sigma - self.boundary_layer_top) / (1.0 - self.boundary_layer_top)).max(0.0)
    }

    /// Radiative equilibrium temperature.
    ///
    /// # Arguments
    /// * `latitude` - Latitude in radians
    /// * `pressure` - Pressure in Pa
    /// * `p0` - Reference surface pressure in Pa
    /// * `kappa` - `R / c_p`
    pub fn equilibrium_temperature(&self, latitude: f64, pressure: f64, p0: f64, kappa: f64) -> f64 {
        let (sin, cos) = latitude.sin_cos();
        let ratio = pressure / p0;
        let t = (self.equator_temperature
            - self.meridional_gradient * sin * sin
            - self.vertical_gradient * ratio.ln() * cos * cos)
            * ratio.powf(kappa);
        t.max(self.minimum_temperature)
    }

    /// Thermal relaxation rate `k_T`.
    pub fn thermal_rate(&self, latitude: f64, sigma: f64) -> f64 {
        let cos = latitude.cos();
        self.free_rate
            + (self.surface_rate - self.free_rate) * self.boundary_layer_weight(sigma) * cos.powi(4)
    }

    /// Rayleigh drag rate `k_v`.
    pub fn drag(&self, sigma: f64) -> f64 {
        self.drag_rate * self.boundary_layer_weight(sigma)
    }
}

impl ParameterizationInfo for NewtonianRelaxation {
    fn name(&self) -> &'static str {
        "newtonian-relaxation"
    }

    fn description(&self) -> &str {
        "temperature relaxation to radiative equilibrium with boundary-layer Rayleigh drag"
    }
}

impl<NF: NumberFormat> Parameterization<NF> for NewtonianRelaxation {
    fn compute(
        &self,
        grid: &GridVariables<NF>,
        geometry: &Geometry<NF>,
        _boundaries: &Boundaries<NF>,
        _time: f64,
    ) -> PhysicsTendencies<NF> {
        let (nlon, nlat) = (geometry.nlon(), geometry.nlat());
        let latitudes = geometry.latitudes();
        let physical = geometry.physical();
        let kappa = physical.kappa();
        let cos_lat = geometry.cos_lat();
        let sigma = geometry.vertical().full_levels();
        let surface_pressure = grid.log_surface_pressure.map(|x| x.exp());

        let mut du = Vec::with_capacity(grid.n_levels());
        let mut dv = Vec::with_capacity(grid.n_levels());
        let mut dt = Vec::with_capacity(grid.n_levels());
        for (k, &s) in sigma.iter().enumerate() {
            let drag = NF::from_f64_lossy(self.drag(s));
            let (u, v) = (&grid.u[k], &grid.v[k]);
            du.push(GridField::from_fn(nlon, nlat, |i, j| -drag * u[(i, j)] / cos_lat[j]));
            dv.push(GridField::from_fn(nlon, nlat, |i, j| -drag * v[(i, j)] / cos_lat[j]));

            let temperature = &grid.temperature[k];
            let tendency = GridField::from_fn(nlon, nlat, |i, j| {
                let p = s * surface_pressure[(i, j)].to_f64_lossy();
                let t_eq = self.equilibrium_temperature(latitudes[j], p, physical.p0, kappa);
                let rate = self.thermal_rate(latitudes[j], s);
                NF::from_f64_lossy(-rate * (temperature[(i, j)].to_f64_lossy() - t_eq))
            });
            dt.push(TendencyContribution::Grid(tendency));
        }

        PhysicsTendencies::none()
            .with_momentum(du, dv)
            .with_temperature(dt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_equilibrium_profile() {
        let hs = NewtonianRelaxation::held_suarez();
        let kappa = 287.0 / 1004.0;
        assert_relative_eq!(hs.equilibrium_temperature(0.0, 1e5, 1e5, kappa), 315.0);
        // poles are colder than the equator
        let pole = hs.equilibrium_temperature(1.4, 1e5, 1e5, kappa);
        assert!(pole < 315.0 - 50.0);
        // stratosphere hits the floor
        assert_eq!(hs.equilibrium_temperature(0.3, 5e3, 1e5, kappa), 200.0);
    }

    #[test]
    fn test_rates() {
        let hs = NewtonianRelaxation::default();
        assert_eq!(hs.drag(0.5), 0.0);
        assert_relative_eq!(hs.drag(1.0), 1.0 / DAY);
        assert_relative_eq!(hs.thermal_rate(0.0, 0.3), 1.0 / (40.0 * DAY));
        assert_relative_eq!(hs.thermal_rate(0.0, 1.0), 1.0 / (4.0 * DAY));
    }

    #[test]
    fn test_validate() {
        assert!(NewtonianRelaxation::default().validate().is_ok());
        let bad = NewtonianRelaxation {
            boundary_layer_top: 1.0,
            ..NewtonianRelaxation::default()
        };
        assert!(bad.validate().is_err());
        assert!(NewtonianRelaxation::default()
            .with_time_scales(-1.0, 4.0)
            .validate()
            .is_err());
    }
}
