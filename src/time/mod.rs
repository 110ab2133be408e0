//! Time integration.
//!
//! - [`Integrable`], [`TimeScheme`]: the state and scheme abstractions
//! - [`Leapfrog`] with the [`RobertAsselinWilliams`] filter
//! - [`SemiImplicitSolver`]: implicit gravity-wave terms per spectral degree
//! - [`HorizontalDiffusion`]: implicit `∇^{2p}` damping
//! - [`StabilityMonitor`]: blow-up detection before a step is committed
//! - [`TimeIntegrator`]: all of the above driving the prognostic state

mod diffusion;
mod integrator;
mod leapfrog;
mod semi_implicit;
mod stability;
mod stepper;

pub use diffusion::HorizontalDiffusion;
pub use integrator::{Integrable, IntegratorInfo, TimeScheme};
pub use leapfrog::{IntegrationPhase, Leapfrog, LeapfrogLevels, RobertAsselinWilliams};
pub use semi_implicit::SemiImplicitSolver;
pub use stability::{StabilityMonitor, StabilityStatus, StabilityThresholds, StabilityWarning};
pub use stepper::TimeIntegrator;
