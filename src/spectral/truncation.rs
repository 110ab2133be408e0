//! Spectral truncation shape and coefficient indexing.
//!
//! Coefficients are stored contiguously by zonal wavenumber `m`; within
//! each `m` the total wavenumber runs `n = m..=lmax`. Entries with `n < m`
//! do not exist in storage.

use std::fmt;

/// A `(m, n)` coefficient position.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SpectralIndex {
    /// Zonal wavenumber.
    pub m: usize,
    /// Total wavenumber.
    pub n: usize,
}

/// Truncation shape: `0 <= m <= mmax`, `m <= n <= lmax`.
///
/// Prognostic fields use the triangular shape `lmax = mmax = T`. Winds
/// weighted by `cos φ` need one more degree and use [`Truncation::vector`].
///
/// # Example
///
/// ```
/// use spectral_gcm::spectral::Truncation;
///
/// let t = Truncation::triangular(31);
/// assert_eq!(t.len(), 32 * 33 / 2);
/// assert_eq!(t.index(0, 0), Some(0));
/// assert_eq!(t.index(3, 2), None);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Truncation {
    lmax: usize,
    mmax: usize,
}

impl Truncation {
    /// Arbitrary shape.
    ///
    /// # Panics
    ///
    /// Panics if `mmax > lmax`.
    pub fn new(lmax: usize, mmax: usize) -> Self {
        assert!(mmax <= lmax, "mmax {} exceeds lmax {}", mmax, lmax);
        Self { lmax, mmax }
    }

    /// Triangular truncation `T`.
    pub fn triangular(t: usize) -> Self {
        Self { lmax: t, mmax: t }
    }

    /// Triangular truncation `T` extended by one degree for vector components.
    pub fn vector(t: usize) -> Self {
        Self { lmax: t + 1, mmax: t }
    }

    /// Maximum total wavenumber.
    #[inline]
    pub fn lmax(&self) -> usize {
        self.lmax
    }

    /// Maximum zonal wavenumber.
    #[inline]
    pub fn mmax(&self) -> usize {
        self.mmax
    }

    /// Number of stored coefficients.
    pub fn len(&self) -> usize {
        self.offset(self.mmax + 1)
    }

    /// Always false: every shape holds at least `(0, 0)`.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Start of the block for order `m`.
    #[inline]
    pub fn offset(&self, m: usize) -> usize {
        m * (2 * self.lmax + 3 - m) / 2
    }

    /// Storage position of `(m, n)`, or `None` if it lies outside the shape.
    #[inline]
    pub fn index(&self, m: usize, n: usize) -> Option<usize> {
        if m <= self.mmax && m <= n && n <= self.lmax {
            Some(self.offset(m) + n - m)
        } else {
            None
        }
    }

    /// Total wavenumbers present for order `m`.
    pub fn degrees(&self, m: usize) -> std::ops::RangeInclusive<usize> {
        m..=self.lmax
    }

    /// Whether `other` fits inside this shape.
    pub fn contains(&self, other: &Truncation) -> bool {
        other.lmax <= self.lmax && other.mmax <= self.mmax
    }

    /// Iterate over every stored position in storage order.
    pub fn iter(&self) -> impl Iterator<Item = SpectralIndex> + '_ {
        (0..=self.mmax).flat_map(move |m| (m..=self.lmax).map(move |n| SpectralIndex { m, n }))
    }
}

impl fmt::Display for Truncation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.lmax == self.mmax {
            write!(f, "T{}", self.lmax)
        } else {
            write!(f, "l{}m{}", self.lmax, self.mmax)
        }
    }
}
