//! Parameterized physics.
//!
//! Parameterizations plug into the model through [`Parameterization`]: they
//! receive grid point values of the present state and return
//! [`PhysicsTendencies`], which are added to the dynamical tendencies before
//! time stepping.
//!
//! # Provided
//!
//! - [`NoPhysics`]: adiabatic, frictionless dynamics
//! - [`NewtonianRelaxation`]: Held–Suarez style thermal relaxation and drag
//!
//! # Example
//! ```ignore
//! use spectral_gcm::physics::NewtonianRelaxation;
//!
//! let physics = NewtonianRelaxation::held_suarez().with_drag_days(2.0);
//! let model = Model::builder(config).with_parameterization(physics).build()?;
//! ```

mod relaxation;
mod tendencies;
pub mod traits;

pub use relaxation::NewtonianRelaxation;
pub use tendencies::PhysicsTendencies;
pub use traits::{NoPhysics, Parameterization, ParameterizationInfo};
