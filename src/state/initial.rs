//! Initial conditions.

use num_complex::Complex;
use serde::{Deserialize, Serialize};

use super::prognostic::PrognosticVariables;
use crate::config::ReferenceProfile;
use crate::error::{ModelError, ModelResult};
use crate::spectral::{GridField, SpectralField, SpectralTransform, Truncation};
use crate::types::NumberFormat;

/// Analytic initial states.
///
/// Every variant starts from the reference temperature profile, uniform
/// surface pressure `p0` and zero humidity.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InitialConditions {
    /// Atmosphere at rest.
    Rest,
    /// Rossby–Haurwitz wave, identical on every level:
    /// `ζ = 2ω μ − K (R+1)(R+2) cos^R φ μ cos Rλ` with `ω = K = amplitude`.
    /// Surface pressure is not balanced against the flow.
    RossbyHaurwitz { wavenumber: usize, amplitude: f64 },
    /// Rest plus a few fixed low-order harmonics of vorticity and temperature.
    Perturbed {
        vorticity_amplitude: f64,
        temperature_amplitude: f64,
    },
}

impl Default for InitialConditions {
    fn default() -> Self {
        Self::Rest
    }
}

/// Spectral representation of a horizontally uniform value.
fn uniform<NF: NumberFormat>(truncation: Truncation, value: f64) -> SpectralField<NF> {
    // P̄_0^0 = 1/√2
    let c = NF::from_f64_lossy(value * std::f64::consts::SQRT_2);
    SpectralField::single_mode(truncation, 0, 0, Complex::new(c, NF::zero()))
}

impl InitialConditions {
    /// Build the initial prognostic variables on the transform's geometry.
    pub fn initialize<NF: NumberFormat>(
        &self,
        transform: &SpectralTransform<NF>,
        reference: &ReferenceProfile,
    ) -> ModelResult<PrognosticVariables<NF>> {
        let geometry = transform.geometry();
        let truncation = geometry.scalar_truncation();
        let physical = geometry.physical();
        let mut vars = PrognosticVariables::zeros(truncation, geometry.n_levels());

        for (t, &sigma) in vars
            .temperature
            .iter_mut()
            .zip(geometry.vertical().full_levels())
        {
            *t = uniform(truncation, reference.temperature(sigma, physical));
        }
        vars.log_surface_pressure = uniform(truncation, physical.p0.ln());

        match *self {
            Self::Rest => {}
            Self::RossbyHaurwitz {
                wavenumber,
                amplitude,
            } => {
                if wavenumber == 0 || wavenumber + 1 > truncation.lmax() {
                    return Err(ModelError::config(format!(
                        "Rossby-Haurwitz wavenumber {} not resolved at T{}",
                        wavenumber,
                        truncation.lmax()
                    )));
                }
                let r = wavenumber as f64;
                let lats = geometry.latitudes();
                let lons = geometry.longitudes();
                let grid = GridField::from_fn(geometry.nlon(), geometry.nlat(), |i, j| {
                    let (mu, cos) = (lats[j].sin(), lats[j].cos());
                    let zeta = 2.0 * amplitude * mu
                        - amplitude * (r + 1.0) * (r + 2.0) * cos.powi(wavenumber as i32) * mu
                            * (r * lons[i]).cos();
                    NF::from_f64_lossy(zeta)
                });
                let zeta = transform.spectral(&grid);
                vars.vorticity.iter_mut().for_each(|z| *z = zeta.clone());
            }
            Self::Perturbed {
                vorticity_amplitude,
                temperature_amplitude,
            } => {
                if !(vorticity_amplitude.is_finite() && temperature_amplitude.is_finite()) {
                    return Err(ModelError::config("perturbation amplitudes must be finite"));
                }
                const VORTICITY_MODES: [(usize, usize, f64); 3] =
                    [(1, 2, 1.0), (2, 4, 0.6), (3, 5, 0.3)];
                const TEMPERATURE_MODES: [(usize, usize, f64); 2] = [(1, 1, 1.0), (2, 3, 0.5)];

                for (k, (zeta, temp)) in vars
                    .vorticity
                    .iter_mut()
                    .zip(vars.temperature.iter_mut())
                    .enumerate()
                {
                    let phase = 0.3 * k as f64;
                    for &(m, n, w) in &VORTICITY_MODES {
                        if let Some(c) = zeta.get_mut(m, n) {
                            let z = Complex::from_polar(vorticity_amplitude * w, phase);
                            *c = Complex::new(NF::from_f64_lossy(z.re), NF::from_f64_lossy(z.im));
                        }
                    }
                    for &(m, n, w) in &TEMPERATURE_MODES {
                        if let Some(c) = temp.get_mut(m, n) {
                            let z = Complex::from_polar(temperature_amplitude * w, -phase);
                            *c = Complex::new(NF::from_f64_lossy(z.re), NF::from_f64_lossy(z.im));
                        }
                    }
                }
            }
        }

        log::debug!("Initial conditions: {:?}", self);
        Ok(vars)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ModelConfig;
    use crate::geometry::Geometry;
    use approx::assert_relative_eq;
    use std::sync::Arc;

    fn transform() -> SpectralTransform<f64> {
        let config = ModelConfig::default().with_truncation(10).with_levels(4);
        SpectralTransform::new(Arc::new(Geometry::from_config(&config).unwrap()))
    }

    #[test]
    fn test_rest_is_uniform() {
        let tr = transform();
        let vars = InitialConditions::Rest
            .initialize(&tr, &ReferenceProfile::default())
            .unwrap();
        let lnps = tr.gridded(&vars.log_surface_pressure);
        for &x in lnps.data() {
            assert_relative_eq!(x, 1e5_f64.ln(), max_relative = 1e-12);
        }
        let t_bottom = tr.gridded(&vars.temperature[3]);
        let expected = ReferenceProfile::default()
            .temperature(tr.geometry().vertical().full_levels()[3], tr.geometry().physical());
        assert_relative_eq!(t_bottom.data()[17], expected, max_relative = 1e-12);
        assert_eq!(vars.vorticity[0].max_abs(), 0.0);
    }

    #[test]
    fn test_rossby_haurwitz_modes() {
        let tr = transform();
        let vars = InitialConditions::RossbyHaurwitz {
            wavenumber: 4,
            amplitude: 7.848e-6,
        }
        .initialize(&tr, &ReferenceProfile::default())
        .unwrap();
        let zeta = &vars.vorticity[0];
        assert!(zeta[(0, 1)].norm() > 0.0);
        assert!(zeta[(4, 5)].norm() > 0.0);
        let other: f64 = zeta
            .iter()
            .filter(|(idx, _)| (idx.m, idx.n) != (0, 1) && (idx.m, idx.n) != (4, 5))
            .map(|(_, c)| c.norm())
            .fold(0.0, f64::max);
        assert!(other < 1e-18);
    }

    #[test]
    fn test_rossby_haurwitz_unresolved() {
        let tr = transform();
        let result = InitialConditions::RossbyHaurwitz {
            wavenumber: 10,
            amplitude: 1e-6,
        }
        .initialize(&tr, &ReferenceProfile::default());
        assert!(result.is_err());
    }
}
