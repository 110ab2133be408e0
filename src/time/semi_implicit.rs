//! Semi-implicit treatment of gravity waves.
//!
//! With `ξ = αΔ`, the effective tendencies `δ` of divergence, temperature
//! and log surface pressure satisfy `δ = G + ξ L(δ)`, where
//! `G = tendency − L(present) + L(past)` and `L` are the linear operators of
//! [`crate::dynamics::LinearOperators`]. Eliminating `δT` and `δp` gives one
//! `n_levels × n_levels` system per spectral degree `l`:
//!
//! ```text
//! (I + ξ² c_l M) δD = G_D + ξ c_l R (G_h G_T + T_ref G_p),   c_l = l(l+1)/a²
//! δT = G_T − ξ τ δD
//! δp = G_p − ξ Δσᵀ δD
//! ```
//!
//! The matrices `(I + ξ² c_l M)⁻¹` are inverted in `f64` with an LU
//! factorisation for both step sizes (`Δ = Δt` and `Δ = 2Δt`) whenever the
//! time step changes, then stored in the run's number format.

use faer::{linalg::solvers::Solve, Mat};
use num_complex::Complex;

use super::leapfrog::IntegrationPhase;
use crate::dynamics::LinearOperators;
use crate::error::{ModelError, ModelResult};
use crate::spectral::SpectralField;
use crate::state::PrognosticVariables;
use crate::types::{convert_slice, NumberFormat};

type Coefficient<NF> = Complex<NF>;

/// Precomputed semi-implicit operators for one time step size.
#[derive(Clone, Debug)]
pub struct SemiImplicitSolver<NF> {
    truncation: usize,
    n_levels: usize,
    alpha: f64,
    dt: f64,
    radius: f64,

    r_dry: NF,
    hydrostatic: Vec<NF>,
    tau: Vec<NF>,
    reference_temperature: Vec<NF>,
    thickness: Vec<NF>,
    /// `l(l+1)/a²` per degree.
    degree_factor: Vec<NF>,

    gravity_wave: Vec<f64>,
    /// `(I + ξ² c_l M)⁻¹` per degree, `Δ = Δt`.
    initialization: Vec<Vec<NF>>,
    /// `(I + ξ² c_l M)⁻¹` per degree, `Δ = 2Δt`.
    leapfrog: Vec<Vec<NF>>,
}

impl<NF: NumberFormat> SemiImplicitSolver<NF> {
    /// Build the operators for truncation `T`, planet radius and time step.
    ///
    /// # Arguments
    /// * `linear` - Linear vertical operators
    /// * `truncation` - Spectral truncation `T`
    /// * `radius` - Planet radius (m)
    /// * `dt` - Time step (s)
    /// * `alpha` - Implicitness, 0.5 for centred
    ///
    /// # Errors
    ///
    /// [`ModelError::Configuration`] if `dt` is not positive and finite, or
    /// if an operator is singular.
    pub fn new(
        linear: &LinearOperators,
        truncation: usize,
        radius: f64,
        dt: f64,
        alpha: f64,
    ) -> ModelResult<Self> {
        check_time_step(dt)?;
        let degree_factor: Vec<f64> = (0..=truncation)
            .map(|l| (l * (l + 1)) as f64 / (radius * radius))
            .collect();
        let mut solver = Self {
            truncation,
            n_levels: linear.n_levels(),
            alpha,
            dt,
            radius,
            r_dry: NF::from_f64_lossy(linear.r_dry()),
            hydrostatic: convert_slice(linear.hydrostatic()),
            tau: convert_slice(linear.tau()),
            reference_temperature: convert_slice(linear.reference_temperature()),
            thickness: convert_slice(linear.thickness()),
            degree_factor: convert_slice(&degree_factor),
            gravity_wave: linear.gravity_wave_matrix(),
            initialization: Vec::new(),
            leapfrog: Vec::new(),
        };
        solver.rebuild(dt)?;
        Ok(solver)
    }

    #[inline]
    pub fn time_step(&self) -> f64 {
        self.dt
    }

    #[inline]
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Recompute the inverses for a new time step.
    pub fn set_time_step(&mut self, dt: f64) -> ModelResult<()> {
        check_time_step(dt)?;
        self.rebuild(dt)
    }

    fn rebuild(&mut self, dt: f64) -> ModelResult<()> {
        let initialization = self.invert_all(self.alpha * dt)?;
        let leapfrog = self.invert_all(2.0 * self.alpha * dt)?;
        self.initialization = initialization;
        self.leapfrog = leapfrog;
        self.dt = dt;
        log::debug!(
            "Semi-implicit operators for dt = {} s, alpha = {}, {} degrees x {} levels",
            dt,
            self.alpha,
            self.truncation + 1,
            self.n_levels
        );
        Ok(())
    }

    fn invert_all(&self, xi: f64) -> ModelResult<Vec<Vec<NF>>> {
        let invert = |l: usize| {
            let c = (l * (l + 1)) as f64 / (self.radius * self.radius);
            self.invert(xi * xi * c)
        };

        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;
            (0..=self.truncation).into_par_iter().map(invert).collect()
        }
        #[cfg(not(feature = "parallel"))]
        {
            (0..=self.truncation).map(invert).collect()
        }
    }

    /// `(I + s M)⁻¹`, row-major.
    fn invert(&self, s: f64) -> ModelResult<Vec<NF>> {
        let n = self.n_levels;
        let mut a = Mat::<f64>::zeros(n, n);
        for k in 0..n {
            for j in 0..n {
                a[(k, j)] = s * self.gravity_wave[k * n + j] + if k == j { 1.0 } else { 0.0 };
            }
        }

        let lu = a.as_ref().full_piv_lu();
        let mut inverse = vec![0.0; n * n];
        for j in 0..n {
            let mut rhs = Mat::<f64>::zeros(n, 1);
            rhs[(j, 0)] = 1.0;
            let col = lu.solve(&rhs);
            for k in 0..n {
                inverse[k * n + j] = col[(k, 0)];
            }
        }

        if inverse.iter().any(|x| !x.is_finite()) {
            return Err(ModelError::config(format!(
                "semi-implicit operator is singular for c = {:e}",
                s
            )));
        }
        Ok(convert_slice(&inverse))
    }

    /// `L(vars)`: the linear gravity-wave tendencies. Vorticity and humidity are zero.
    pub fn linear_terms(&self, vars: &PrognosticVariables<NF>) -> PrognosticVariables<NF> {
        let n = self.n_levels;
        let mut out = PrognosticVariables::zeros(vars.truncation(), n);

        for k in 0..n {
            // L_D = c_l R (G_h T + T_ref ln p_s)
            let ld = &mut out.divergence[k];
            for j in 0..n {
                axpy_field(ld, self.r_dry * self.hydrostatic[k * n + j], &vars.temperature[j]);
            }
            axpy_field(
                ld,
                self.r_dry * self.reference_temperature[k],
                &vars.log_surface_pressure,
            );
            ld.scale_by_degree(|l| self.degree_factor[l]);

            // L_T = −τ D
            for j in 0..n {
                axpy_field(&mut out.temperature[k], -self.tau[k * n + j], &vars.divergence[j]);
            }
            // L_p = −Δσᵀ D
            axpy_field(&mut out.log_surface_pressure, -self.thickness[k], &vars.divergence[k]);
        }
        out
    }

    /// Replace the explicit tendencies of divergence, temperature and log
    /// surface pressure in `tendency` by the semi-implicit ones.
    ///
    /// # Panics
    ///
    /// Panics if the level count differs from the operators.
    pub fn solve(
        &self,
        tendency: &mut PrognosticVariables<NF>,
        present: &PrognosticVariables<NF>,
        past: &PrognosticVariables<NF>,
        phase: IntegrationPhase,
    ) {
        assert_eq!(tendency.n_levels(), self.n_levels, "level count mismatch");
        let n = self.n_levels;
        let one = NF::one();

        // G = tendency + L(past − present)
        if phase == IntegrationPhase::Stepping {
            let mut difference = past.clone();
            for (d, p) in difference.divergence.iter_mut().zip(&present.divergence) {
                axpy_field(d, -one, p);
            }
            for (t, p) in difference.temperature.iter_mut().zip(&present.temperature) {
                axpy_field(t, -one, p);
            }
            axpy_field(
                &mut difference.log_surface_pressure,
                -one,
                &present.log_surface_pressure,
            );
            let linear = self.linear_terms(&difference);
            for k in 0..n {
                axpy_field(&mut tendency.divergence[k], one, &linear.divergence[k]);
                axpy_field(&mut tendency.temperature[k], one, &linear.temperature[k]);
            }
            axpy_field(&mut tendency.log_surface_pressure, one, &linear.log_surface_pressure);
        }

        let (xi, inverses) = match phase {
            IntegrationPhase::Initialization => (self.alpha * self.dt, &self.initialization),
            IntegrationPhase::Stepping => (2.0 * self.alpha * self.dt, &self.leapfrog),
        };
        let xi = NF::from_f64_lossy(xi);

        let truncation = tendency.truncation();
        let degrees: Vec<usize> = truncation.iter().map(|idx| idx.n).collect();
        // per position: n values of δD, n values of δT, then δp
        let width = 2 * n + 1;
        let solve_at = |p: usize, out: &mut [Coefficient<NF>]| {
            let l = degrees[p];
            let gd: Vec<_> = tendency.divergence.iter().map(|f| f.coeffs()[p]).collect();
            let gt: Vec<_> = tendency.temperature.iter().map(|f| f.coeffs()[p]).collect();
            let gp = tendency.log_surface_pressure.coeffs()[p];
            self.solve_column(&inverses[l], self.degree_factor[l], xi, &gd, &gt, gp, out);
        };

        let mut solution = vec![Complex::new(NF::zero(), NF::zero()); degrees.len() * width];
        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;
            solution
                .par_chunks_exact_mut(width)
                .enumerate()
                .for_each(|(p, out)| solve_at(p, out));
        }
        #[cfg(not(feature = "parallel"))]
        {
            for (p, out) in solution.chunks_exact_mut(width).enumerate() {
                solve_at(p, out);
            }
        }

        for (p, column) in solution.chunks_exact(width).enumerate() {
            for k in 0..n {
                tendency.divergence[k].coeffs_mut()[p] = column[k];
                tendency.temperature[k].coeffs_mut()[p] = column[n + k];
            }
            tendency.log_surface_pressure.coeffs_mut()[p] = column[2 * n];
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn solve_column(
        &self,
        inverse: &[NF],
        c: NF,
        xi: NF,
        gd: &[Coefficient<NF>],
        gt: &[Coefficient<NF>],
        gp: Coefficient<NF>,
        out: &mut [Coefficient<NF>],
    ) {
        let n = self.n_levels;
        let zero = Complex::new(NF::zero(), NF::zero());
        let xi_c_r = xi * c * self.r_dry;

        let rhs: Vec<Coefficient<NF>> = (0..n)
            .map(|k| {
                let gh_gt = (0..n).fold(zero, |acc, j| acc + gt[j] * self.hydrostatic[k * n + j]);
                gd[k] + (gh_gt + gp * self.reference_temperature[k]) * xi_c_r
            })
            .collect();

        let (dd, rest) = out.split_at_mut(n);
        for (k, d) in dd.iter_mut().enumerate() {
            *d = (0..n).fold(zero, |acc, j| acc + rhs[j] * inverse[k * n + j]);
        }
        let (dt, dp) = rest.split_at_mut(n);
        for (k, t) in dt.iter_mut().enumerate() {
            let tau_d = (0..n).fold(zero, |acc, j| acc + dd[j] * self.tau[k * n + j]);
            *t = gt[k] - tau_d * xi;
        }
        let mass = (0..n).fold(zero, |acc, j| acc + dd[j] * self.thickness[j]);
        dp[0] = gp - mass * xi;
    }
}

fn check_time_step(dt: f64) -> ModelResult<()> {
    if !(dt > 0.0 && dt.is_finite()) {
        return Err(ModelError::config(format!("time step must be positive, got {}", dt)));
    }
    Ok(())
}

/// `y += c x` on spectral fields of the same shape.
fn axpy_field<NF: NumberFormat>(y: &mut SpectralField<NF>, c: NF, x: &SpectralField<NF>) {
    for (a, &b) in y.coeffs_mut().iter_mut().zip(x.coeffs()) {
        *a += b * c;
    }
}
