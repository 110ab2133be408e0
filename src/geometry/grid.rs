//! Gaussian grid sizing.

use crate::error::{ModelError, ModelResult};

/// A validated truncation / grid-size pair.
///
/// The quadratic alias-free rule needs at least `3T + 1` longitudes and
/// `(3T + 1) / 2` Gaussian latitudes so that products of two resolved
/// fields are transformed back without aliasing.
///
/// # Example
///
/// ```
/// use spectral_gcm::geometry::GridSize;
///
/// let grid = GridSize::for_truncation(31).unwrap();
/// assert_eq!((grid.nlon, grid.nlat), (94, 47));
/// assert!(GridSize::new(31, 96, 48).is_ok());
/// assert!(GridSize::new(31, 64, 32).is_err());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GridSize {
    /// Spectral truncation `T`.
    pub truncation: usize,
    /// Number of longitudes.
    pub nlon: usize,
    /// Number of Gaussian latitudes.
    pub nlat: usize,
}

impl GridSize {
    /// `nlon = 2 (⌊3T/2⌋ + 1)`, `nlat = nlon / 2`.
    pub fn sizing_rule(truncation: usize) -> (usize, usize) {
        let nlon = 2 * (3 * truncation / 2 + 1);
        (nlon, nlon / 2)
    }

    /// Grid from the sizing rule.
    pub fn for_truncation(truncation: usize) -> ModelResult<Self> {
        let (nlon, nlat) = Self::sizing_rule(truncation);
        Self::new(truncation, nlon, nlat)
    }

    /// Validate an explicit grid.
    ///
    /// Larger grids than the rule requires are accepted; smaller ones are a
    /// [`ModelError::GridSizing`] error.
    pub fn new(truncation: usize, nlon: usize, nlat: usize) -> ModelResult<Self> {
        let fail = |reason: String| {
            Err(ModelError::GridSizing {
                truncation,
                nlon,
                nlat,
                reason,
            })
        };

        if truncation == 0 {
            return fail("truncation must be at least 1".to_string());
        }
        if nlon % 2 != 0 {
            return fail("number of longitudes must be even".to_string());
        }
        let min_points = 3 * truncation + 1;
        if nlon < min_points {
            return fail(format!("need at least {} longitudes", min_points));
        }
        if 2 * nlat < min_points {
            return fail(format!(
                "need at least {} Gaussian latitudes",
                (min_points + 1) / 2
            ));
        }

        Ok(Self {
            truncation,
            nlon,
            nlat,
        })
    }

    /// Total number of grid points.
    pub fn npoints(&self) -> usize {
        self.nlon * self.nlat
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sizing_rule_values() {
        assert_eq!(GridSize::sizing_rule(21), (64, 32));
        assert_eq!(GridSize::sizing_rule(31), (94, 47));
        assert_eq!(GridSize::sizing_rule(42), (128, 64));
        assert_eq!(GridSize::sizing_rule(63), (190, 95));
    }

    #[test]
    fn test_rule_always_valid() {
        for t in 1..=170 {
            assert!(GridSize::for_truncation(t).is_ok(), "T{} rejected", t);
        }
    }

    #[test]
    fn test_rejects_too_few_latitudes() {
        let err = GridSize::new(21, 64, 31).unwrap_err();
        assert!(matches!(err, ModelError::GridSizing { nlat: 31, .. }));
    }

    #[test]
    fn test_rejects_odd_longitudes_and_zero_truncation() {
        assert!(GridSize::new(5, 33, 16).is_err());
        assert!(GridSize::new(0, 8, 4).is_err());
    }
}
