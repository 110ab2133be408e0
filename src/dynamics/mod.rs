//! Primitive equations in σ coordinates, evaluated with the transform method.
//!
//! Tendencies are computed in three stages that can each be run on their own:
//!
//! 1. [`GridVariables::from_spectral`]: inverse transforms of the state
//! 2. [`NonlinearTerms::evaluate`]: pointwise products on the grid
//! 3. [`DynamicalCore::forward_stage`]: forward transforms, curl and
//!    divergence of the momentum forcing, and the spectral linear terms
//!
//! [`LinearOperators`] holds the part of the equations linear about the
//! reference atmosphere, which the semi-implicit solver treats implicitly.

mod grid_variables;
mod linear;
mod nonlinear;
mod tendencies;
mod vertical;

pub use grid_variables::GridVariables;
pub use linear::LinearOperators;
pub use nonlinear::NonlinearTerms;
pub use tendencies::{add_physics, Tendencies, TendencyContribution};
pub use vertical::VerticalOperators;

use crate::boundaries::Boundaries;
use crate::config::ReferenceProfile;
use crate::spectral::{laplacian, SpectralField, SpectralTransform};
use crate::state::PrognosticVariables;
use crate::time::Integrable;
use crate::types::{convert_slice, NumberFormat};

/// Spectral tendencies of one level.
struct LevelTendencies<NF> {
    vorticity: SpectralField<NF>,
    divergence: SpectralField<NF>,
    temperature: SpectralField<NF>,
    humidity: SpectralField<NF>,
}

/// Dynamical tendencies of the adiabatic, frictionless primitive equations.
#[derive(Clone, Debug)]
pub struct DynamicalCore<NF> {
    transform: SpectralTransform<NF>,
    vertical: VerticalOperators<NF>,
    linear: LinearOperators,
    reference_temperature: Vec<NF>,
    /// `R G_h`, row-major.
    hydrostatic: Vec<NF>,
}

impl<NF: NumberFormat> DynamicalCore<NF> {
    /// Build the vertical and linear operators on the transform's geometry.
    pub fn new(transform: SpectralTransform<NF>, reference: &ReferenceProfile) -> Self {
        let geometry = transform.geometry().clone();
        let physical = geometry.physical();
        let linear = LinearOperators::new(geometry.vertical(), physical, reference);
        let r_gh: Vec<f64> = linear.hydrostatic().iter().map(|g| physical.r_dry * g).collect();
        Self {
            vertical: VerticalOperators::new(geometry.vertical()),
            reference_temperature: convert_slice(linear.reference_temperature()),
            hydrostatic: convert_slice(&r_gh),
            linear,
            transform,
        }
    }

    pub fn transform(&self) -> &SpectralTransform<NF> {
        &self.transform
    }

    pub fn linear(&self) -> &LinearOperators {
        &self.linear
    }

    pub fn vertical(&self) -> &VerticalOperators<NF> {
        &self.vertical
    }

    #[inline]
    pub fn n_levels(&self) -> usize {
        self.vertical.n_levels()
    }

    /// `T_ref` per level.
    pub fn reference_temperature(&self) -> &[NF] {
        &self.reference_temperature
    }

    /// Stage 1.
    pub fn grid_variables(&self, vars: &PrognosticVariables<NF>) -> GridVariables<NF> {
        GridVariables::from_spectral(vars, &self.transform)
    }

    /// Stage 2.
    pub fn nonlinear_terms(&self, grid: &GridVariables<NF>) -> NonlinearTerms<NF> {
        NonlinearTerms::evaluate(
            grid,
            self.transform.geometry(),
            &self.vertical,
            &self.reference_temperature,
        )
    }

    /// Geopotential `Φ_k = Φ_s + R Σ_j G_h[k][j] T_j` in spectral space.
    pub fn geopotential(
        &self,
        temperature: &[SpectralField<NF>],
        surface: &SpectralField<NF>,
        level: usize,
    ) -> SpectralField<NF> {
        let n = self.n_levels();
        let mut phi = surface.clone();
        for (j, t) in temperature.iter().enumerate() {
            let c = self.hydrostatic[level * n + j];
            if c != NF::zero() {
                phi.axpy(c, t);
            }
        }
        phi
    }

    /// Stage 3: spectral tendencies from the grid products.
    ///
    /// # Panics
    ///
    /// Panics if the level counts of `vars`, `terms` and the core differ.
    pub fn forward_stage(
        &self,
        vars: &PrognosticVariables<NF>,
        terms: &NonlinearTerms<NF>,
        boundaries: &Boundaries<NF>,
    ) -> Tendencies<NF> {
        let n = self.n_levels();
        assert_eq!(vars.n_levels(), n, "state level count mismatch");
        assert_eq!(terms.n_levels(), n, "grid term level count mismatch");
        let tr = &self.transform;
        let radius = tr.geometry().radius();
        let r_dry = tr.geometry().constants().r_dry;
        let lnps = &vars.log_surface_pressure;
        let surface = boundaries.geopotential_spectral();

        let level = |k: usize| {
            let (div_f, curl_f) = tr.divergence_curl(&terms.fu[k], &terms.fv[k]);

            // Φ + E + R T_ref ln p_s
            let mut bernoulli = self.geopotential(&vars.temperature, surface, k);
            bernoulli += &tr.spectral(&terms.kinetic_energy[k]);
            bernoulli.axpy(r_dry * self.reference_temperature[k], lnps);
            let mut divergence = div_f;
            divergence -= &laplacian(&bernoulli, radius);

            let mut temperature = tr.spectral(&terms.temperature_source[k]);
            temperature -= &tr.divergence(&terms.temperature_flux_u[k], &terms.temperature_flux_v[k]);

            let mut humidity = tr.spectral(&terms.humidity_source[k]);
            humidity -= &tr.divergence(&terms.humidity_flux_u[k], &terms.humidity_flux_v[k]);

            LevelTendencies {
                vorticity: curl_f,
                divergence,
                temperature,
                humidity,
            }
        };

        #[cfg(feature = "parallel")]
        let levels: Vec<LevelTendencies<NF>> = {
            use rayon::prelude::*;
            (0..n).into_par_iter().map(level).collect()
        };
        #[cfg(not(feature = "parallel"))]
        let levels: Vec<LevelTendencies<NF>> = (0..n).map(level).collect();

        let mut out = Tendencies::zeros(vars.truncation(), n);
        for (k, level) in levels.into_iter().enumerate() {
            out.vorticity[k] = level.vorticity;
            out.divergence[k] = level.divergence;
            out.temperature[k] = level.temperature;
            out.humidity[k] = level.humidity;
        }
        out.log_surface_pressure = tr.spectral(&terms.log_surface_pressure_tendency);
        out
    }

    /// All three stages.
    pub fn tendencies(
        &self,
        vars: &PrognosticVariables<NF>,
        boundaries: &Boundaries<NF>,
    ) -> Tendencies<NF> {
        let grid = self.grid_variables(vars);
        let terms = self.nonlinear_terms(&grid);
        self.forward_stage(vars, &terms, boundaries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ModelConfig;
    use crate::geometry::Geometry;
    use crate::state::InitialConditions;
    use crate::types::PrognosticVariable;
    use approx::assert_relative_eq;
    use num_complex::Complex;
    use std::sync::Arc;

    const T: usize = 15;

    fn core() -> (DynamicalCore<f64>, ModelConfig) {
        let config = ModelConfig::default().with_truncation(T).with_levels(4);
        let transform = SpectralTransform::new(Arc::new(Geometry::from_config(&config).unwrap()));
        (DynamicalCore::new(transform, &config.reference), config)
    }

    #[test]
    fn test_rest_has_no_tendency() {
        let (core, config) = core();
        let vars = InitialConditions::Rest
            .initialize(core.transform(), &config.reference)
            .unwrap();
        let boundaries = Boundaries::aquaplanet(core.transform());
        let tend = core.tendencies(&vars, &boundaries);
        for variable in PrognosticVariable::ALL {
            assert!(
                tend.max_abs(variable) < 1e-12,
                "{} tendency {}",
                variable,
                tend.max_abs(variable)
            );
        }
    }

    #[test]
    fn test_single_harmonic_rossby_wave() {
        let (core, config) = core();
        let mut vars = InitialConditions::Rest
            .initialize(core.transform(), &config.reference)
            .unwrap();
        let (m, n) = (3, 5);
        let zeta = Complex::new(1e-6, 0.0);
        for z in vars.vorticity.iter_mut() {
            z[(m, n)] = zeta;
        }
        let boundaries = Boundaries::aquaplanet(core.transform());
        let tend = core.tendencies(&vars, &boundaries);

        let omega = config.physical.rotation;
        let expected = Complex::new(0.0, 2.0 * omega * m as f64 / (n * (n + 1)) as f64) * zeta;
        for level in &tend.vorticity {
            let got = level[(m, n)];
            assert_relative_eq!(got.re, expected.re, epsilon = 1e-8 * expected.im.abs());
            assert_relative_eq!(got.im, expected.im, max_relative = 1e-8);
            for (idx, c) in level.iter() {
                if (idx.m, idx.n) != (m, n) {
                    assert!(c.norm() < 1e-8 * expected.norm(), "({}, {}) = {}", idx.m, idx.n, c);
                }
            }
        }
    }

    #[test]
    fn test_surface_pressure_follows_column_divergence() {
        let (core, config) = core();
        let mut vars = InitialConditions::Rest
            .initialize(core.transform(), &config.reference)
            .unwrap();
        let d = Complex::new(2e-6, -1e-6);
        for div in vars.divergence.iter_mut() {
            div[(2, 6)] = d;
        }
        let boundaries = Boundaries::aquaplanet(core.transform());
        let tend = core.tendencies(&vars, &boundaries);
        // Σ Δσ = 1
        let got = tend.log_surface_pressure[(2, 6)];
        assert_relative_eq!(got.re, -d.re, max_relative = 1e-10);
        assert_relative_eq!(got.im, -d.im, max_relative = 1e-10);
    }

    #[test]
    fn test_orography_forces_divergence_only() {
        let (core, config) = core();
        let vars = InitialConditions::Rest
            .initialize(core.transform(), &config.reference)
            .unwrap();
        let boundaries =
            Boundaries::from_fn(core.transform(), |lon, lat| 500.0 * lat.cos() * lon.cos()).unwrap();
        let tend = core.tendencies(&vars, &boundaries);
        assert!(tend.max_abs(PrognosticVariable::Divergence) > 1e-12);
        assert!(tend.max_abs(PrognosticVariable::Vorticity) < 1e-18);
        assert!(tend.max_abs(PrognosticVariable::Temperature) < 1e-12);
    }

    #[test]
    fn test_stages_compose() {
        let (core, config) = core();
        let vars = InitialConditions::Perturbed {
            vorticity_amplitude: 1e-5,
            temperature_amplitude: 1.0,
        }
        .initialize(core.transform(), &config.reference)
        .unwrap();
        let boundaries = Boundaries::aquaplanet(core.transform());

        let grid = core.grid_variables(&vars);
        assert_eq!(grid.n_levels(), 4);
        let terms = core.nonlinear_terms(&grid);
        assert_eq!(terms.sigma_dot.len(), 3);
        let staged = core.forward_stage(&vars, &terms, &boundaries);
        assert_eq!(staged, core.tendencies(&vars, &boundaries));
        assert!(staged.is_finite());
    }
}
