//! Spectral tendencies and external contributions to them.

use crate::error::{ModelError, ModelResult};
use crate::physics::PhysicsTendencies;
use crate::spectral::{GridField, SpectralField, SpectralTransform};
use crate::state::PrognosticVariables;
use crate::types::NumberFormat;

/// Time derivatives of every prognostic variable, same layout as the state.
pub type Tendencies<NF> = PrognosticVariables<NF>;

/// A tendency supplied either on the grid or as spectral coefficients.
#[derive(Clone, Debug, PartialEq)]
pub enum TendencyContribution<NF> {
    Grid(GridField<NF>),
    Spectral(SpectralField<NF>),
}

impl<NF: NumberFormat> TendencyContribution<NF> {
    /// Spectral coefficients at the prognostic truncation.
    pub fn to_spectral(&self, transform: &SpectralTransform<NF>) -> ModelResult<SpectralField<NF>> {
        let geometry = transform.geometry();
        match self {
            Self::Grid(grid) => {
                if grid.nlon() != geometry.nlon() || grid.nlat() != geometry.nlat() {
                    return Err(ModelError::dimension_mismatch(
                        "tendency grid",
                        format!("{}x{}", geometry.nlon(), geometry.nlat()),
                        format!("{}x{}", grid.nlon(), grid.nlat()),
                    ));
                }
                Ok(transform.spectral(grid))
            }
            Self::Spectral(field) => {
                let shape = geometry.scalar_truncation();
                if !field.truncation().contains(&shape) {
                    return Err(ModelError::dimension_mismatch(
                        "tendency truncation",
                        shape,
                        field.truncation(),
                    ));
                }
                Ok(field.truncate_to(shape))
            }
        }
    }
}

fn layer_contributions<NF: NumberFormat>(
    contributions: &[TendencyContribution<NF>],
    n_levels: usize,
    transform: &SpectralTransform<NF>,
    what: &str,
) -> ModelResult<Vec<SpectralField<NF>>> {
    if contributions.len() != n_levels {
        return Err(ModelError::dimension_mismatch(what, n_levels, contributions.len()));
    }
    contributions.iter().map(|c| c.to_spectral(transform)).collect()
}

/// Divergence and curl of the `cos φ`-weighted momentum tendency per level.
fn momentum_contributions<NF: NumberFormat>(
    du: &[GridField<NF>],
    dv: &[GridField<NF>],
    n_levels: usize,
    transform: &SpectralTransform<NF>,
) -> ModelResult<Vec<(SpectralField<NF>, SpectralField<NF>)>> {
    if du.len() != n_levels || dv.len() != n_levels {
        return Err(ModelError::dimension_mismatch(
            "momentum tendency levels",
            n_levels,
            du.len().min(dv.len()),
        ));
    }
    let geometry = transform.geometry();
    let cos_lat = geometry.cos_lat();
    let weight = |g: &GridField<NF>| -> ModelResult<GridField<NF>> {
        if g.nlon() != geometry.nlon() || g.nlat() != geometry.nlat() {
            return Err(ModelError::dimension_mismatch(
                "momentum tendency grid",
                format!("{}x{}", geometry.nlon(), geometry.nlat()),
                format!("{}x{}", g.nlon(), g.nlat()),
            ));
        }
        Ok(GridField::from_fn(g.nlon(), g.nlat(), |i, j| g[(i, j)] * cos_lat[j]))
    };
    du.iter()
        .zip(dv)
        .map(|(u, v)| Ok(transform.divergence_curl(&weight(u)?, &weight(v)?)))
        .collect()
}

/// Add parameterized tendencies to the dynamical ones.
///
/// Momentum tendencies `(du/dt, dv/dt)` are weighted by `cos φ` and enter
/// vorticity and divergence through [`SpectralTransform::divergence_curl`].
///
/// # Errors
///
/// [`ModelError::DimensionMismatch`] if a level count, grid size or
/// truncation differs from the model's. Every contribution is checked
/// before any is added, so `tendencies` is unchanged on error.
pub fn add_physics<NF: NumberFormat>(
    tendencies: &mut Tendencies<NF>,
    physics: &PhysicsTendencies<NF>,
    transform: &SpectralTransform<NF>,
) -> ModelResult<()> {
    let n = tendencies.n_levels();

    let momentum = physics
        .momentum()
        .map(|(du, dv)| momentum_contributions(du, dv, n, transform))
        .transpose()?;
    let temperature = physics
        .temperature
        .as_deref()
        .map(|c| layer_contributions(c, n, transform, "temperature tendency levels"))
        .transpose()?;
    let humidity = physics
        .humidity
        .as_deref()
        .map(|c| layer_contributions(c, n, transform, "humidity tendency levels"))
        .transpose()?;
    let lnps = physics
        .log_surface_pressure
        .as_ref()
        .map(|c| c.to_spectral(transform))
        .transpose()?;

    if let Some(levels) = momentum {
        for (k, (div, curl)) in levels.iter().enumerate() {
            tendencies.divergence[k] += div;
            tendencies.vorticity[k] += curl;
        }
    }
    if let Some(levels) = temperature {
        for (t, c) in tendencies.temperature.iter_mut().zip(&levels) {
            *t += c;
        }
    }
    if let Some(levels) = humidity {
        for (q, c) in tendencies.humidity.iter_mut().zip(&levels) {
            *q += c;
        }
    }
    if let Some(field) = lnps {
        tendencies.log_surface_pressure += &field;
    }
    Ok(())
}
