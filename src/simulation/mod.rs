//! Thin driver around the dynamical core.
//!
//! [`Model`] ties together:
//! - geometry, spectral transform and boundaries
//! - the dynamical core and a [`crate::physics::Parameterization`]
//! - the semi-implicit leapfrog [`crate::time::TimeIntegrator`]
//!
//! # Example
//! ```ignore
//! use spectral_gcm::physics::NewtonianRelaxation;
//! use spectral_gcm::simulation::Model;
//!
//! let mut model = Model::<f32>::builder(config)
//!     .with_parameterization(NewtonianRelaxation::held_suarez())
//!     .build()?;
//!
//! let result = model.run_with_callback(480, 48, |m| {
//!     log::info!("day {}: {:?}", m.time() / 86400.0, m.global_diagnostics());
//! });
//! ```

mod runner;

pub use runner::{Model, ModelBuilder, SimulationResult};
