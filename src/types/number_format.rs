//! Number format abstraction.
//!
//! Every array the model steps forward is stored in a single number
//! format `NF`. Constant tables are computed in `f64` and converted once
//! during setup.

use std::fmt::{Debug, Display};
use std::iter::Sum;

use num_traits::{Float, FloatConst, FromPrimitive, NumAssign};

/// Floating-point format used for all prognostic and grid arrays.
///
/// Blanket-implemented for any type with the required arithmetic, so
/// `f32`, `f64` and custom formats meeting the bounds all work.
///
/// # Example
///
/// ```
/// use spectral_gcm::types::NumberFormat;
///
/// fn half<NF: NumberFormat>(x: NF) -> NF {
///     x * NF::from_f64_lossy(0.5)
/// }
///
/// assert_eq!(half(3.0_f32), 1.5);
/// ```
pub trait NumberFormat:
    Float
    + FloatConst
    + FromPrimitive
    + NumAssign
    + Sum
    + Default
    + Debug
    + Display
    + Send
    + Sync
    + 'static
{
    /// Convert from `f64`, rounding to the nearest representable value.
    ///
    /// Values outside the format's range become infinite rather than failing.
    #[inline]
    fn from_f64_lossy(x: f64) -> Self {
        <Self as FromPrimitive>::from_f64(x).unwrap_or_else(Self::nan)
    }

    /// Convert to `f64`.
    #[inline]
    fn to_f64_lossy(self) -> f64 {
        num_traits::ToPrimitive::to_f64(&self).unwrap_or(f64::NAN)
    }

    /// Convert a count or index to this format.
    #[inline]
    fn from_usize_lossy(n: usize) -> Self {
        Self::from_f64_lossy(n as f64)
    }

    /// Machine epsilon as `f64`, used to scale tolerances.
    #[inline]
    fn epsilon_f64() -> f64 {
        Self::epsilon().to_f64_lossy()
    }
}

impl<T> NumberFormat for T where
    T: Float
        + FloatConst
        + FromPrimitive
        + NumAssign
        + Sum
        + Default
        + Debug
        + Display
        + Send
        + Sync
        + 'static
{
}

/// Convert a slice of `f64` constants to the number format.
pub fn convert_slice<NF: NumberFormat>(values: &[f64]) -> Vec<NF> {
    values.iter().map(|&x| NF::from_f64_lossy(x)).collect()
}
