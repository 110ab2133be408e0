//! Spectral coefficient fields.

use std::ops::{AddAssign, Index, IndexMut, SubAssign};

use num_complex::Complex;

use super::truncation::{SpectralIndex, Truncation};
use crate::time::Integrable;
use crate::types::NumberFormat;

/// Complex spherical-harmonic coefficients for one level.
///
/// The truncation shape is fixed at construction. Positions outside it
/// have no storage; [`SpectralField::get`] returns `None` for them and
/// indexing panics.
///
/// # Example
///
/// ```
/// use num_complex::Complex;
/// use spectral_gcm::spectral::{SpectralField, Truncation};
///
/// let mut f = SpectralField::<f64>::zeros(Truncation::triangular(3));
/// f[(1, 2)] = Complex::new(1.0, -0.5);
/// assert_eq!(f.get(1, 2), Some(&Complex::new(1.0, -0.5)));
/// assert!(f.get(2, 1).is_none());
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct SpectralField<NF> {
    truncation: Truncation,
    coeffs: Vec<Complex<NF>>,
}

impl<NF: NumberFormat> SpectralField<NF> {
    /// All-zero field.
    pub fn zeros(truncation: Truncation) -> Self {
        Self {
            truncation,
            coeffs: vec![Complex::new(NF::zero(), NF::zero()); truncation.len()],
        }
    }

    /// Field with `f(m, n)` at every position.
    pub fn from_fn<F>(truncation: Truncation, mut f: F) -> Self
    where
        F: FnMut(usize, usize) -> Complex<NF>,
    {
        let coeffs = truncation.iter().map(|idx| f(idx.m, idx.n)).collect();
        Self { truncation, coeffs }
    }

    /// Field with a single non-zero coefficient.
    ///
    /// # Panics
    ///
    /// Panics if `(m, n)` lies outside `truncation`.
    pub fn single_mode(truncation: Truncation, m: usize, n: usize, value: Complex<NF>) -> Self {
        let mut field = Self::zeros(truncation);
        field[(m, n)] = value;
        field
    }

    #[inline]
    pub fn truncation(&self) -> Truncation {
        self.truncation
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.coeffs.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.coeffs.is_empty()
    }

    /// Coefficient at `(m, n)`.
    #[inline]
    pub fn get(&self, m: usize, n: usize) -> Option<&Complex<NF>> {
        self.truncation.index(m, n).map(|k| &self.coeffs[k])
    }

    /// Mutable coefficient at `(m, n)`.
    #[inline]
    pub fn get_mut(&mut self, m: usize, n: usize) -> Option<&mut Complex<NF>> {
        self.truncation.index(m, n).map(move |k| &mut self.coeffs[k])
    }

    /// Coefficient at `(m, n)`, zero outside the shape.
    #[inline]
    pub fn get_or_zero(&self, m: usize, n: usize) -> Complex<NF> {
        self.get(m, n)
            .copied()
            .unwrap_or_else(|| Complex::new(NF::zero(), NF::zero()))
    }

    /// Coefficients of order `m`, indexed by `n − m`.
    #[inline]
    pub fn order(&self, m: usize) -> &[Complex<NF>] {
        let start = self.truncation.offset(m);
        &self.coeffs[start..start + self.truncation.lmax() + 1 - m]
    }

    /// Mutable coefficients of order `m`, indexed by `n − m`.
    #[inline]
    pub fn order_mut(&mut self, m: usize) -> &mut [Complex<NF>] {
        let start = self.truncation.offset(m);
        let end = start + self.truncation.lmax() + 1 - m;
        &mut self.coeffs[start..end]
    }

    /// Raw storage in truncation order.
    #[inline]
    pub fn coeffs(&self) -> &[Complex<NF>] {
        &self.coeffs
    }

    /// Mutable raw storage in truncation order.
    #[inline]
    pub fn coeffs_mut(&mut self) -> &mut [Complex<NF>] {
        &mut self.coeffs
    }

    /// Iterate over `(position, coefficient)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (SpectralIndex, &Complex<NF>)> + '_ {
        self.truncation.iter().zip(self.coeffs.iter())
    }

    /// Copy into another shape: overlapping coefficients are kept, the rest are zero.
    pub fn truncate_to(&self, truncation: Truncation) -> Self {
        let mut out = Self::zeros(truncation);
        let mmax = truncation.mmax().min(self.truncation.mmax());
        let lmax = truncation.lmax().min(self.truncation.lmax());
        for m in 0..=mmax {
            let count = lmax + 1 - m;
            out.order_mut(m)[..count].copy_from_slice(&self.order(m)[..count]);
        }
        out
    }

    /// Multiply every coefficient of degree `n` by `factor(n)`.
    pub fn scale_by_degree<F>(&mut self, factor: F)
    where
        F: Fn(usize) -> NF,
    {
        let truncation = self.truncation;
        for m in 0..=truncation.mmax() {
            for (c, n) in self.order_mut(m).iter_mut().zip(truncation.degrees(m)) {
                *c *= factor(n);
            }
        }
    }

    /// Set every coefficient to zero.
    pub fn fill_zero(&mut self) {
        self.coeffs
            .iter_mut()
            .for_each(|c| *c = Complex::new(NF::zero(), NF::zero()));
    }

    /// Largest coefficient modulus. NaN if any coefficient is NaN.
    pub fn max_abs(&self) -> NF {
        let mut max = NF::zero();
        for c in &self.coeffs {
            let r = c.norm();
            if r.is_nan() {
                return r;
            }
            max = max.max(r);
        }
        max
    }

    /// Whether every coefficient is finite.
    pub fn is_finite(&self) -> bool {
        self.coeffs.iter().all(|c| c.re.is_finite() && c.im.is_finite())
    }

    /// Largest modulus of `self − other` over the common shape.
    ///
    /// # Panics
    ///
    /// Panics if the truncations differ.
    pub fn max_abs_diff(&self, other: &Self) -> NF {
        assert_eq!(self.truncation, other.truncation, "truncation mismatch");
        self.coeffs
            .iter()
            .zip(&other.coeffs)
            .map(|(a, b)| (a - b).norm())
            .fold(NF::zero(), NF::max)
    }
}

impl<NF: NumberFormat> Index<(usize, usize)> for SpectralField<NF> {
    type Output = Complex<NF>;

    fn index(&self, (m, n): (usize, usize)) -> &Complex<NF> {
        match self.truncation.index(m, n) {
            Some(k) => &self.coeffs[k],
            None => panic!("({}, {}) outside truncation {}", m, n, self.truncation),
        }
    }
}

impl<NF: NumberFormat> IndexMut<(usize, usize)> for SpectralField<NF> {
    fn index_mut(&mut self, (m, n): (usize, usize)) -> &mut Complex<NF> {
        match self.truncation.index(m, n) {
            Some(k) => &mut self.coeffs[k],
            None => panic!("({}, {}) outside truncation {}", m, n, self.truncation),
        }
    }
}

impl<NF: NumberFormat> AddAssign<&SpectralField<NF>> for SpectralField<NF> {
    fn add_assign(&mut self, rhs: &SpectralField<NF>) {
        assert_eq!(self.truncation, rhs.truncation, "truncation mismatch");
        for (a, b) in self.coeffs.iter_mut().zip(&rhs.coeffs) {
            *a += *b;
        }
    }
}

impl<NF: NumberFormat> SubAssign<&SpectralField<NF>> for SpectralField<NF> {
    fn sub_assign(&mut self, rhs: &SpectralField<NF>) {
        assert_eq!(self.truncation, rhs.truncation, "truncation mismatch");
        for (a, b) in self.coeffs.iter_mut().zip(&rhs.coeffs) {
            *a -= *b;
        }
    }
}

impl<NF: NumberFormat> Integrable for SpectralField<NF> {
    type Scalar = NF;

    fn scale(&mut self, c: NF) {
        self.coeffs.iter_mut().for_each(|a| *a *= c);
    }

    fn axpy(&mut self, c: NF, other: &Self) {
        assert_eq!(self.truncation, other.truncation, "truncation mismatch");
        for (a, b) in self.coeffs.iter_mut().zip(&other.coeffs) {
            *a += b.scale(c);
        }
    }

    fn zeros_like(&self) -> Self {
        Self::zeros(self.truncation)
    }
}
