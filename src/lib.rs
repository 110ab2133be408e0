//! # spectral-gcm
//!
//! A spectral transform dynamical core for global atmospheric models.
//!
//! This crate provides:
//! - Gaussian grids and normalized associated Legendre tables
//! - The spectral transform (Fourier and Legendre stages) and spectral operators
//! - The primitive equations in σ coordinates, evaluated with the transform method
//! - A semi-implicit leapfrog integrator with Robert–Asselin–Williams filtering,
//!   implicit horizontal diffusion and a stability monitor
//! - A parameterization seam, boundary data and grid diagnostics
//! - A thin driver ([`Model`]) wiring everything together
//!
//! Every array is stored in a number format `NF` chosen per run
//! (`f32`, `f64`, or any type meeting [`NumberFormat`]); constant tables are
//! computed in `f64` and converted once.
//!
//! # Example
//!
//! ```
//! use spectral_gcm::{InitialConditions, Model, ModelConfig};
//!
//! let config = ModelConfig::default().with_truncation(10).with_levels(3);
//! let mut model = Model::<f32>::builder(config)
//!     .with_initial_conditions(InitialConditions::RossbyHaurwitz {
//!         wavenumber: 4,
//!         amplitude: 7.848e-6,
//!     })
//!     .build()
//!     .unwrap();
//!
//! let result = model.run(3);
//! assert!(result.success);
//! ```

pub mod analysis;
pub mod boundaries;
pub mod config;
pub mod dynamics;
pub mod error;
pub mod geometry;
pub mod physics;
pub mod polynomial;
pub mod simulation;
pub mod spectral;
pub mod state;
pub mod time;
pub mod types;

// Re-export main types for convenience
pub use analysis::{diagnose, GlobalDiagnostics, GridDiagnostics};
pub use boundaries::{Boundaries, BoundaryData};
pub use config::{ModelConfig, PhysicalConstants, ReferenceProfile};
pub use dynamics::{DynamicalCore, GridVariables, LinearOperators, NonlinearTerms, Tendencies};
pub use error::{ModelError, ModelResult};
pub use geometry::{Geometry, GridSize, VerticalCoordinates};
pub use physics::{NewtonianRelaxation, NoPhysics, Parameterization, PhysicsTendencies};
pub use simulation::{Model, ModelBuilder, SimulationResult};
pub use spectral::{GridField, SpectralField, SpectralTransform, Truncation};
pub use state::{InitialConditions, PrognosticState, PrognosticVariables};
pub use time::{
    IntegrationPhase, Leapfrog, RobertAsselinWilliams, SemiImplicitSolver, StabilityMonitor,
    TimeIntegrator,
};
pub use types::{NumberFormat, PrognosticVariable};
