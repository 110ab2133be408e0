//! Polynomial evaluation and quadrature nodes.
//!
//! This module provides:
//! - Legendre polynomials and their derivatives
//! - Gauss–Legendre nodes and weights (the Gaussian latitudes)
//! - Normalized associated Legendre functions and their recurrence coefficients
//!
//! Everything is evaluated in `f64` during setup and converted to the
//! run's number format by [`crate::geometry`].

mod associated;
mod legendre;
mod nodes;

pub use associated::{associated_legendre, recurrence_epsilon};
pub use legendre::{legendre, legendre_and_derivative, legendre_pair};
pub use nodes::{gauss_legendre_nodes, gauss_legendre_weights};
