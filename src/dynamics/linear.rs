//! Reference profile and the linear gravity-wave operators.
//!
//! The semi-implicit scheme treats the terms linear in divergence about a
//! resting, horizontally uniform reference atmosphere implicitly:
//!
//! - `L_D = −∇²(R G_h T + R T_ref ln p_s)`
//! - `L_T = −τ D`
//! - `L_p = −Δσᵀ D`
//!
//! `G_h` is the hydrostatic integration matrix, so `Φ = Φ_s + R G_h T`.
//! `τ` is obtained by applying the nonlinear temperature tendency to unit
//! divergence vectors at rest, which keeps it consistent with the
//! discretization of [`super::vertical`] by construction.

use super::vertical::VerticalOperators;
use crate::config::{PhysicalConstants, ReferenceProfile};
use crate::geometry::VerticalCoordinates;
use crate::spectral::GridField;

/// Linear vertical operators in `f64`.
///
/// Matrices are row-major `n_levels × n_levels`.
#[derive(Clone, Debug, PartialEq)]
pub struct LinearOperators {
    n_levels: usize,
    r_dry: f64,
    reference_temperature: Vec<f64>,
    thickness: Vec<f64>,
    hydrostatic: Vec<f64>,
    tau: Vec<f64>,
}

impl LinearOperators {
    pub fn new(
        vertical: &VerticalCoordinates,
        physical: &PhysicalConstants,
        reference: &ReferenceProfile,
    ) -> Self {
        let n = vertical.n_levels();
        let reference_temperature: Vec<f64> = vertical
            .full_levels()
            .iter()
            .map(|&s| reference.temperature(s, physical))
            .collect();
        let hydrostatic = hydrostatic_matrix(vertical.full_levels());
        let tau = temperature_matrix(vertical, &reference_temperature, physical.kappa());

        log::debug!(
            "Linear operators on {} levels, T_ref {:.1}..{:.1} K",
            n,
            reference_temperature.first().copied().unwrap_or_default(),
            reference_temperature.last().copied().unwrap_or_default()
        );

        Self {
            n_levels: n,
            r_dry: physical.r_dry,
            reference_temperature,
            thickness: vertical.thickness().to_vec(),
            hydrostatic,
            tau,
        }
    }

    #[inline]
    pub fn n_levels(&self) -> usize {
        self.n_levels
    }

    #[inline]
    pub fn r_dry(&self) -> f64 {
        self.r_dry
    }

    /// `T_ref` on full levels.
    pub fn reference_temperature(&self) -> &[f64] {
        &self.reference_temperature
    }

    /// `Δσ_k`.
    pub fn thickness(&self) -> &[f64] {
        &self.thickness
    }

    /// `G_h`, row-major.
    pub fn hydrostatic(&self) -> &[f64] {
        &self.hydrostatic
    }

    /// `τ`, row-major.
    pub fn tau(&self) -> &[f64] {
        &self.tau
    }

    /// `M = R (G_h τ + T_ref Δσᵀ)`, the vertical coupling of the
    /// gravity-wave equation `∂²D/∂t² = ∇² M D`.
    pub fn gravity_wave_matrix(&self) -> Vec<f64> {
        let n = self.n_levels;
        let mut m = vec![0.0; n * n];
        for k in 0..n {
            for j in 0..n {
                let gh_tau: f64 = (0..n)
                    .map(|r| self.hydrostatic[k * n + r] * self.tau[r * n + j])
                    .sum();
                m[k * n + j] =
                    self.r_dry * (gh_tau + self.reference_temperature[k] * self.thickness[j]);
            }
        }
        m
    }
}

/// `G_h` with `Φ_{N−1} = R T_{N−1} ln(1/σ_{N−1})` and
/// `Φ_k = Φ_{k+1} + R (T_k + T_{k+1})/2 · ln(σ_{k+1}/σ_k)`.
fn hydrostatic_matrix(sigma: &[f64]) -> Vec<f64> {
    let n = sigma.len();
    let mut gh = vec![0.0; n * n];
    gh[n * n - 1] = (1.0 / sigma[n - 1]).ln();
    for k in (0..n.saturating_sub(1)).rev() {
        let (upper, lower) = gh.split_at_mut((k + 1) * n);
        let row = &mut upper[k * n..];
        row.copy_from_slice(&lower[..n]);
        let half_log = 0.5 * (sigma[k + 1] / sigma[k]).ln();
        row[k] += half_log;
        row[k + 1] += half_log;
    }
    gh
}

/// `τ` from the temperature tendency at rest with `G = D = e_j`.
fn temperature_matrix(vertical: &VerticalCoordinates, tref: &[f64], kappa: f64) -> Vec<f64> {
    let n = vertical.n_levels();
    let ops = VerticalOperators::<f64>::new(vertical);
    let reference: Vec<GridField<f64>> = tref.iter().map(|&t| GridField::constant(1, 1, t)).collect();
    let no_advection = vec![GridField::zeros(1, 1); n];

    let mut tau = vec![0.0; n * n];
    for j in 0..n {
        let unit: Vec<GridField<f64>> = (0..n)
            .map(|k| GridField::constant(1, 1, if k == j { 1.0 } else { 0.0 }))
            .collect();
        let sigma_dot = ops.sigma_dot(&unit);
        let va = ops.vertical_advection(&sigma_dot, &reference);
        let omega = ops.omega_over_p(&unit, &no_advection);
        for k in 0..n {
            let tendency = -va[k].data()[0] + kappa * tref[k] * omega[k].data()[0];
            tau[k * n + j] = -tendency;
        }
    }
    tau
}
