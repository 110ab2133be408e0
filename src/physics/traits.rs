//! Parameterization traits.

use super::tendencies::PhysicsTendencies;
use crate::boundaries::Boundaries;
use crate::dynamics::GridVariables;
use crate::geometry::Geometry;
use crate::types::NumberFormat;

// =============================================================================
// ParameterizationInfo Trait (non-generic, dyn-compatible)
// =============================================================================

/// Non-generic information about a parameterization.
///
/// Separate from [`Parameterization`] so it can be queried without naming
/// the number format.
pub trait ParameterizationInfo: Send + Sync {
    /// Human-readable name for logging.
    fn name(&self) -> &'static str;

    /// Short description of the processes represented.
    fn description(&self) -> &str;
}

// =============================================================================
// Parameterization Trait
// =============================================================================

/// A column process that contributes tendencies from grid point values.
///
/// Parameterizations never see spectral coefficients or the time stepping
/// machinery. They read the present state on the grid and return tendencies,
/// which the model adds to the dynamical ones before the semi-implicit solve.
///
/// # Example Implementation
///
/// ```ignore
/// impl<NF: NumberFormat> Parameterization<NF> for Drag {
///     fn compute(&self, grid: &GridVariables<NF>, geometry: &Geometry<NF>,
///                boundaries: &Boundaries<NF>, time: f64) -> PhysicsTendencies<NF> {
///         let du = grid.u.iter().map(|u| u.map(|x| -x * self.rate)).collect();
///         let dv = grid.v.iter().map(|v| v.map(|x| -x * self.rate)).collect();
///         PhysicsTendencies::none().with_momentum(du, dv)
///     }
/// }
/// ```
pub trait Parameterization<NF: NumberFormat>: ParameterizationInfo {
    /// Tendencies for the present state.
    ///
    /// # Arguments
    /// * `grid` - Grid point values of the present state (winds `cos φ`-weighted)
    /// * `geometry` - Grid and constants
    /// * `boundaries` - Surface boundary data
    /// * `time` - Model time in seconds
    fn compute(
        &self,
        grid: &GridVariables<NF>,
        geometry: &Geometry<NF>,
        boundaries: &Boundaries<NF>,
        time: f64,
    ) -> PhysicsTendencies<NF>;
}

/// No parameterized processes: a purely adiabatic, frictionless model.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NoPhysics;

impl ParameterizationInfo for NoPhysics {
    fn name(&self) -> &'static str {
        "none"
    }

    fn description(&self) -> &str {
        "adiabatic dynamics only"
    }
}

impl<NF: NumberFormat> Parameterization<NF> for NoPhysics {
    fn compute(
        &self,
        _grid: &GridVariables<NF>,
        _geometry: &Geometry<NF>,
        _boundaries: &Boundaries<NF>,
        _time: f64,
    ) -> PhysicsTendencies<NF> {
        PhysicsTendencies::none()
    }
}
