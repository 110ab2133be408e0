//! Trait-based time integration abstraction.
//!
//! - [`Integrable`]: vector-space operations a state must support
//! - [`IntegratorInfo`]: non-generic, dyn-compatible description of a scheme
//! - [`TimeScheme`]: a multistep scheme driving [`LeapfrogLevels`] with a
//!   right-hand-side closure
//!
//! # Example
//!
//! ```
//! use num_complex::Complex;
//! use spectral_gcm::time::{Leapfrog, LeapfrogLevels, TimeScheme};
//!
//! // dF/dt = iF, one unit-amplitude oscillator
//! let scheme = Leapfrog::default();
//! let mut levels = LeapfrogLevels::new(Complex::new(1.0_f64, 0.0));
//! for _ in 0..100 {
//!     scheme.step(&mut levels, 0.01, |f| f * Complex::new(0.0, 1.0));
//! }
//! assert!((levels.present.norm() - 1.0).abs() < 1e-2);
//! ```
//!
//! [`LeapfrogLevels`]: super::LeapfrogLevels

use num_complex::Complex;
use num_traits::Zero;

use super::leapfrog::LeapfrogLevels;
use crate::types::NumberFormat;

// =============================================================================
// Integrable Trait
// =============================================================================

/// Trait for states that can be time-integrated.
///
/// The vector space operations needed by the leapfrog scheme and its filter:
/// - `scale`: `x <- c * x`
/// - `axpy`: `x <- x + c * y`
pub trait Integrable: Clone + Send + Sized {
    /// Scalar the state is built from.
    type Scalar: NumberFormat;

    /// Scale the state by a constant: `self <- c * self`.
    fn scale(&mut self, c: Self::Scalar);

    /// Add a scaled state: `self <- self + c * other`.
    fn axpy(&mut self, c: Self::Scalar, other: &Self);

    /// Zero state of the same shape.
    fn zeros_like(&self) -> Self {
        let mut result = self.clone();
        result.scale(Self::Scalar::zero());
        result
    }
}

impl<NF: NumberFormat> Integrable for Complex<NF> {
    type Scalar = NF;

    fn scale(&mut self, c: NF) {
        *self = Complex::scale(self, c);
    }

    fn axpy(&mut self, c: NF, other: &Self) {
        *self += Complex::scale(other, c);
    }
}

// =============================================================================
// IntegratorInfo Trait (non-generic, dyn-compatible)
// =============================================================================

/// Non-generic information about a time scheme.
pub trait IntegratorInfo: Send + Sync {
    /// Human-readable name for logging.
    fn name(&self) -> &'static str;

    /// Formal order of accuracy per step.
    fn order(&self) -> usize;

    /// Number of time levels held between steps.
    fn n_levels(&self) -> usize;
}

// =============================================================================
// TimeScheme Trait
// =============================================================================

/// A multistep scheme advancing [`LeapfrogLevels`].
///
/// The right-hand side is evaluated once per step at the present level.
pub trait TimeScheme<S: Integrable>: IntegratorInfo {
    /// Advance the levels by one step of `dt`.
    ///
    /// # Arguments
    /// * `levels` - Past/present levels, rotated in place
    /// * `dt` - Time step
    /// * `rhs` - Function computing the tendency at the present level
    fn step<F>(&self, levels: &mut LeapfrogLevels<S>, dt: S::Scalar, rhs: F)
    where
        F: Fn(&S) -> S;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_complex_integrable() {
        let mut z = Complex::new(1.0_f64, 2.0);
        Integrable::scale(&mut z, 2.0);
        assert_eq!(z, Complex::new(2.0, 4.0));
        z.axpy(-1.0, &Complex::new(1.0, 1.0));
        assert_eq!(z, Complex::new(1.0, 3.0));
        assert_eq!(z.zeros_like(), Complex::new(0.0, 0.0));
    }
}
