//! Grid point diagnostics of a prognostic state.

use serde::Serialize;

use crate::geometry::Geometry;
use crate::spectral::{GridField, SpectralTransform};
use crate::state::PrognosticVariables;
use crate::types::NumberFormat;

/// Physical fields on the Gaussian grid.
#[derive(Clone, Debug, PartialEq)]
pub struct GridDiagnostics<NF> {
    /// Zonal wind (m/s) per level.
    pub u: Vec<GridField<NF>>,
    /// Meridional wind (m/s) per level.
    pub v: Vec<GridField<NF>>,
    /// Relative vorticity (1/s) per level.
    pub vorticity: Vec<GridField<NF>>,
    /// Divergence (1/s) per level.
    pub divergence: Vec<GridField<NF>>,
    /// Temperature (K) per level.
    pub temperature: Vec<GridField<NF>>,
    /// Specific humidity (kg/kg) per level.
    pub humidity: Vec<GridField<NF>>,
    /// Surface pressure (Pa).
    pub surface_pressure: GridField<NF>,
}

/// Area- and mass-weighted global summaries.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct GlobalDiagnostics {
    /// Mean temperature (K).
    pub mean_temperature: f64,
    /// Mean surface pressure (Pa).
    pub mean_surface_pressure: f64,
    /// Mean kinetic energy per unit mass (J/kg).
    pub mean_kinetic_energy: f64,
    /// Largest wind speed anywhere (m/s).
    pub max_wind_speed: f64,
}

/// Inverse-transform `vars` into physical grid fields.
///
/// Winds are recovered from `U = u cos φ`. Read-only and deterministic.
pub fn diagnose<NF: NumberFormat>(
    vars: &PrognosticVariables<NF>,
    transform: &SpectralTransform<NF>,
) -> GridDiagnostics<NF> {
    let geometry = transform.geometry();
    let cos_lat = geometry.cos_lat();
    let unweight = |g: &GridField<NF>| {
        GridField::from_fn(g.nlon(), g.nlat(), |i, j| g[(i, j)] / cos_lat[j])
    };

    let (u, v): (Vec<_>, Vec<_>) = vars
        .vorticity
        .iter()
        .zip(&vars.divergence)
        .map(|(z, d)| {
            let (u, v) = transform.velocity_grids(z, d);
            (unweight(&u), unweight(&v))
        })
        .unzip();

    GridDiagnostics {
        u,
        v,
        vorticity: transform.gridded_layers(&vars.vorticity),
        divergence: transform.gridded_layers(&vars.divergence),
        temperature: transform.gridded_layers(&vars.temperature),
        humidity: transform.gridded_layers(&vars.humidity),
        surface_pressure: transform.gridded(&vars.log_surface_pressure).map(|x| x.exp()),
    }
}

impl<NF: NumberFormat> GridDiagnostics<NF> {
    #[inline]
    pub fn n_levels(&self) -> usize {
        self.temperature.len()
    }

    /// Global summaries. Level means are weighted by `Δσ`.
    pub fn global(&self, geometry: &Geometry<NF>) -> GlobalDiagnostics {
        let thickness = geometry.vertical().thickness();
        let mean = |f: &GridField<NF>| area_mean(f, geometry);

        let mut mean_temperature = 0.0;
        let mut mean_kinetic_energy = 0.0;
        let mut max_wind_speed = 0.0_f64;
        for (k, &dk) in thickness.iter().enumerate() {
            mean_temperature += dk * mean(&self.temperature[k]);
            let energy = self.u[k].zip_map(&self.v[k], |a, b| (a * a + b * b) * NF::from_f64_lossy(0.5));
            mean_kinetic_energy += dk * mean(&energy);
            let peak = energy.max_abs().to_f64_lossy();
            max_wind_speed = max_wind_speed.max((2.0 * peak).sqrt());
        }

        GlobalDiagnostics {
            mean_temperature,
            mean_surface_pressure: mean(&self.surface_pressure),
            mean_kinetic_energy,
            max_wind_speed,
        }
    }
}

/// Area-weighted global mean using the Gaussian weights.
pub fn area_mean<NF: NumberFormat>(field: &GridField<NF>, geometry: &Geometry<NF>) -> f64 {
    let weights = geometry.weights();
    let nlon = field.nlon() as f64;
    field
        .rows()
        .zip(weights)
        .map(|(row, &w)| {
            let row_sum: f64 = row.iter().map(|x| x.to_f64_lossy()).sum();
            w.to_f64_lossy() * row_sum / nlon
        })
        .sum::<f64>()
        / 2.0
}
