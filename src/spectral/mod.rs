//! Spectral fields and the spectral transform.
//!
//! This module provides:
//! - [`Truncation`] and [`SpectralField`]: triangular coefficient storage
//! - [`GridField`]: real fields on the Gaussian grid
//! - The Fourier and Legendre stages and their composition, [`SpectralTransform`]
//! - Spectral derivative operators in [`operators`]
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use num_complex::Complex;
//! use spectral_gcm::config::ModelConfig;
//! use spectral_gcm::geometry::Geometry;
//! use spectral_gcm::spectral::{SpectralField, SpectralTransform};
//!
//! let geometry = Arc::new(Geometry::<f64>::from_config(&ModelConfig::default().with_truncation(10)).unwrap());
//! let transform = SpectralTransform::new(geometry.clone());
//!
//! let field = SpectralField::single_mode(geometry.scalar_truncation(), 2, 5, Complex::new(1.0, 0.5));
//! let grid = transform.gridded(&field);
//! let back = transform.spectral(&grid);
//! assert!(back.max_abs_diff(&field) < 1e-13);
//! ```

mod field;
mod fourier;
mod grid_field;
mod legendre;
pub mod operators;
mod transform;
mod truncation;

pub use field::SpectralField;
pub use fourier::{fourier_forward, fourier_inverse, FourierCoefficients};
pub use grid_field::GridField;
pub use legendre::{legendre_forward, legendre_inverse, LegendreBasis};
pub use operators::{
    inverse_laplacian, laplacian, meridional_derivative, uv_from_vorticity_divergence,
    zonal_derivative,
};
pub use transform::SpectralTransform;
pub use truncation::{SpectralIndex, Truncation};
