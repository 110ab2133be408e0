//! Stage 2 of the transform method: pointwise products on the grid.
//!
//! With `U = u cos φ`, `V = v cos φ` and `T' = T − T_ref(σ)`:
//!
//! ```text
//! FU = (ζ + f) V − VA(U) − (R T' / a) ∂ln p_s/∂λ
//! FV = −(ζ + f) U − VA(V) − (R T' / a) (1 − μ²) ∂ln p_s/∂μ
//! E  = (U² + V²) / (2 cos²φ)
//! S_T = T' D − VA(T) + κ T ω/p
//! S_q = q D − VA(q)
//! ```
//!
//! The flux divergences `∇·(u T')`, `∇·(u q)` and the curl and divergence
//! of `(FU, FV)` are formed in spectral space by the forward stage.

use super::grid_variables::GridVariables;
use super::vertical::VerticalOperators;
use crate::geometry::Geometry;
use crate::spectral::GridField;
use crate::types::NumberFormat;

/// Grid products of one level.
#[derive(Clone, Debug)]
struct LevelTerms<NF> {
    fu: GridField<NF>,
    fv: GridField<NF>,
    kinetic_energy: GridField<NF>,
    temperature_flux_u: GridField<NF>,
    temperature_flux_v: GridField<NF>,
    temperature_source: GridField<NF>,
    humidity_flux_u: GridField<NF>,
    humidity_flux_v: GridField<NF>,
    humidity_source: GridField<NF>,
}

/// Grid point terms of the primitive equations, ready for the forward transform.
#[derive(Clone, Debug)]
pub struct NonlinearTerms<NF> {
    /// `cos φ`-weighted momentum forcing, zonal.
    pub fu: Vec<GridField<NF>>,
    /// `cos φ`-weighted momentum forcing, meridional.
    pub fv: Vec<GridField<NF>>,
    /// `E = (U² + V²) / (2 cos²φ)`.
    pub kinetic_energy: Vec<GridField<NF>>,
    /// `U T'`.
    pub temperature_flux_u: Vec<GridField<NF>>,
    /// `V T'`.
    pub temperature_flux_v: Vec<GridField<NF>>,
    /// `T' D − VA(T) + κ T ω/p`.
    pub temperature_source: Vec<GridField<NF>>,
    /// `U q`.
    pub humidity_flux_u: Vec<GridField<NF>>,
    /// `V q`.
    pub humidity_flux_v: Vec<GridField<NF>>,
    /// `q D − VA(q)`.
    pub humidity_source: Vec<GridField<NF>>,
    /// `−Σ_k Δσ_k G_k`.
    pub log_surface_pressure_tendency: GridField<NF>,
    /// `σ̇` at interior half levels.
    pub sigma_dot: Vec<GridField<NF>>,
}

impl<NF: NumberFormat> NonlinearTerms<NF> {
    /// Evaluate all grid point products.
    ///
    /// # Arguments
    /// * `grid` - Grid point values of the present state
    /// * `geometry` - Grid and constants
    /// * `vertical` - σ-level operators
    /// * `reference_temperature` - `T_ref` per level
    ///
    /// # Panics
    ///
    /// Panics if `reference_temperature` does not have one value per level.
    pub fn evaluate(
        grid: &GridVariables<NF>,
        geometry: &Geometry<NF>,
        vertical: &VerticalOperators<NF>,
        reference_temperature: &[NF],
    ) -> Self {
        let n = grid.n_levels();
        assert_eq!(reference_temperature.len(), n, "one reference temperature per level");
        let constants = geometry.constants();
        let inv_a = constants.inv_radius;
        let (nlon, nlat) = (geometry.nlon(), geometry.nlat());
        let inv_cos_sq = geometry.inv_cos_sq_lat();
        let coriolis = geometry.coriolis();
        let half = NF::from_f64_lossy(0.5);

        // u·∇ln p_s and G = D + u·∇ln p_s
        let u_grad_lnps: Vec<GridField<NF>> = (0..n)
            .map(|k| {
                let (u, v) = (&grid.u[k], &grid.v[k]);
                GridField::from_fn(nlon, nlat, |i, j| {
                    let adv = u[(i, j)] * grid.dlnps_dlon[(i, j)] + v[(i, j)] * grid.dlnps_dmu[(i, j)];
                    adv * inv_cos_sq[j] * inv_a
                })
            })
            .collect();
        let g: Vec<GridField<NF>> = grid
            .divergence
            .iter()
            .zip(&u_grad_lnps)
            .map(|(d, a)| d.zip_map(a, |x, y| x + y))
            .collect();

        let sigma_dot = vertical.sigma_dot(&g);
        let omega = vertical.omega_over_p(&g, &u_grad_lnps);
        let log_surface_pressure_tendency = vertical.vertical_integral(&g).map(|x| -x);

        let va_u = vertical.vertical_advection(&sigma_dot, &grid.u);
        let va_v = vertical.vertical_advection(&sigma_dot, &grid.v);
        let va_t = vertical.vertical_advection(&sigma_dot, &grid.temperature);
        let va_q = vertical.vertical_advection(&sigma_dot, &grid.humidity);

        let level = |k: usize| {
            let (u, v) = (&grid.u[k], &grid.v[k]);
            let zeta = &grid.vorticity[k];
            let div = &grid.divergence[k];
            let temp = &grid.temperature[k];
            let q = &grid.humidity[k];
            let t_ref = reference_temperature[k];
            let r_over_a = constants.r_dry * inv_a;

            let anomaly = temp.map(|t| t - t_ref);
            let absolute = GridField::from_fn(nlon, nlat, |i, j| zeta[(i, j)] + coriolis[j]);

            let fu = GridField::from_fn(nlon, nlat, |i, j| {
                absolute[(i, j)] * v[(i, j)]
                    - va_u[k][(i, j)]
                    - r_over_a * anomaly[(i, j)] * grid.dlnps_dlon[(i, j)]
            });
            let fv = GridField::from_fn(nlon, nlat, |i, j| {
                -absolute[(i, j)] * u[(i, j)]
                    - va_v[k][(i, j)]
                    - r_over_a * anomaly[(i, j)] * grid.dlnps_dmu[(i, j)]
            });
            let kinetic_energy = GridField::from_fn(nlon, nlat, |i, j| {
                half * (u[(i, j)] * u[(i, j)] + v[(i, j)] * v[(i, j)]) * inv_cos_sq[j]
            });
            let temperature_source = GridField::from_fn(nlon, nlat, |i, j| {
                anomaly[(i, j)] * div[(i, j)] - va_t[k][(i, j)]
                    + constants.kappa * temp[(i, j)] * omega[k][(i, j)]
            });
            let humidity_source = GridField::from_fn(nlon, nlat, |i, j| {
                q[(i, j)] * div[(i, j)] - va_q[k][(i, j)]
            });

            LevelTerms {
                fu,
                fv,
                kinetic_energy,
                temperature_flux_u: u.zip_map(&anomaly, |a, b| a * b),
                temperature_flux_v: v.zip_map(&anomaly, |a, b| a * b),
                temperature_source,
                humidity_flux_u: u.zip_map(q, |a, b| a * b),
                humidity_flux_v: v.zip_map(q, |a, b| a * b),
                humidity_source,
            }
        };

        #[cfg(feature = "parallel")]
        let levels: Vec<LevelTerms<NF>> = {
            use rayon::prelude::*;
            (0..n).into_par_iter().map(level).collect()
        };
        #[cfg(not(feature = "parallel"))]
        let levels: Vec<LevelTerms<NF>> = (0..n).map(level).collect();

        let mut out = Self {
            fu: Vec::with_capacity(n),
            fv: Vec::with_capacity(n),
            kinetic_energy: Vec::with_capacity(n),
            temperature_flux_u: Vec::with_capacity(n),
            temperature_flux_v: Vec::with_capacity(n),
            temperature_source: Vec::with_capacity(n),
            humidity_flux_u: Vec::with_capacity(n),
            humidity_flux_v: Vec::with_capacity(n),
            humidity_source: Vec::with_capacity(n),
            log_surface_pressure_tendency,
            sigma_dot,
        };
        for terms in levels {
            out.fu.push(terms.fu);
            out.fv.push(terms.fv);
            out.kinetic_energy.push(terms.kinetic_energy);
            out.temperature_flux_u.push(terms.temperature_flux_u);
            out.temperature_flux_v.push(terms.temperature_flux_v);
            out.temperature_source.push(terms.temperature_source);
            out.humidity_flux_u.push(terms.humidity_flux_u);
            out.humidity_flux_v.push(terms.humidity_flux_v);
            out.humidity_source.push(terms.humidity_source);
        }
        out
    }

    #[inline]
    pub fn n_levels(&self) -> usize {
        self.fu.len()
    }
}
