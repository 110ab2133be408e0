//! Stage 1 of the transform method: spectral state to grid point values.

use crate::spectral::{meridional_derivative, zonal_derivative, GridField, SpectralTransform};
use crate::state::PrognosticVariables;
use crate::types::NumberFormat;

/// Grid values of one level.
#[derive(Clone, Debug)]
struct LevelGrids<NF> {
    u: GridField<NF>,
    v: GridField<NF>,
    vorticity: GridField<NF>,
    divergence: GridField<NF>,
    temperature: GridField<NF>,
    humidity: GridField<NF>,
}

/// Grid point values of the present state.
///
/// Winds are stored `cos φ`-weighted: `u = u cos φ`, `v = v cos φ`.
#[derive(Clone, Debug)]
pub struct GridVariables<NF> {
    pub u: Vec<GridField<NF>>,
    pub v: Vec<GridField<NF>>,
    pub vorticity: Vec<GridField<NF>>,
    pub divergence: Vec<GridField<NF>>,
    pub temperature: Vec<GridField<NF>>,
    pub humidity: Vec<GridField<NF>>,
    pub log_surface_pressure: GridField<NF>,
    /// `∂ ln p_s / ∂λ`.
    pub dlnps_dlon: GridField<NF>,
    /// `(1 − μ²) ∂ ln p_s / ∂μ`.
    pub dlnps_dmu: GridField<NF>,
}

impl<NF: NumberFormat> GridVariables<NF> {
    /// Inverse transforms of every prognostic variable, the winds and the
    /// surface pressure gradient.
    pub fn from_spectral(vars: &PrognosticVariables<NF>, transform: &SpectralTransform<NF>) -> Self {
        let level = |k: usize| {
            let (u, v) = transform.velocity_grids(&vars.vorticity[k], &vars.divergence[k]);
            LevelGrids {
                u,
                v,
                vorticity: transform.gridded(&vars.vorticity[k]),
                divergence: transform.gridded(&vars.divergence[k]),
                temperature: transform.gridded(&vars.temperature[k]),
                humidity: transform.gridded(&vars.humidity[k]),
            }
        };

        #[cfg(feature = "parallel")]
        let levels: Vec<LevelGrids<NF>> = {
            use rayon::prelude::*;
            (0..vars.n_levels()).into_par_iter().map(level).collect()
        };
        #[cfg(not(feature = "parallel"))]
        let levels: Vec<LevelGrids<NF>> = (0..vars.n_levels()).map(level).collect();

        let lnps = &vars.log_surface_pressure;
        let tables = transform.geometry().legendre();
        let mut out = Self {
            u: Vec::with_capacity(levels.len()),
            v: Vec::with_capacity(levels.len()),
            vorticity: Vec::with_capacity(levels.len()),
            divergence: Vec::with_capacity(levels.len()),
            temperature: Vec::with_capacity(levels.len()),
            humidity: Vec::with_capacity(levels.len()),
            log_surface_pressure: transform.gridded(lnps),
            dlnps_dlon: transform.gridded(&zonal_derivative(lnps)),
            dlnps_dmu: transform.gridded(&meridional_derivative(lnps, tables)),
        };
        for level in levels {
            out.u.push(level.u);
            out.v.push(level.v);
            out.vorticity.push(level.vorticity);
            out.divergence.push(level.divergence);
            out.temperature.push(level.temperature);
            out.humidity.push(level.humidity);
        }
        out
    }

    #[inline]
    pub fn n_levels(&self) -> usize {
        self.u.len()
    }
}
