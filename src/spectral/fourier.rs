//! Fourier stage of the transform: longitude ↔ zonal wavenumber.
//!
//! Each latitude row is transformed independently with a truncated
//! discrete Fourier transform against the precomputed trigonometric
//! tables. Only `m <= mmax` is ever needed, so the cost per row is
//! `O(nlon · mmax)`.
//!
//! Forward: `F_m = (1/nlon) Σ_i f_i e^{−imλ_i}`.
//! Inverse: `f_i = Re F_0 + 2 Σ_{m≥1} Re(F_m e^{imλ_i})`.

use num_complex::Complex;

use super::grid_field::GridField;
use crate::geometry::FourierTables;
use crate::types::NumberFormat;

/// Fourier coefficients `F_m(φ_j)` for every latitude.
///
/// Stored row by row: `data[j * (mmax + 1) + m]`.
#[derive(Clone, Debug, PartialEq)]
pub struct FourierCoefficients<NF> {
    nlat: usize,
    mmax: usize,
    data: Vec<Complex<NF>>,
}

impl<NF: NumberFormat> FourierCoefficients<NF> {
    pub fn zeros(nlat: usize, mmax: usize) -> Self {
        Self {
            nlat,
            mmax,
            data: vec![Complex::new(NF::zero(), NF::zero()); nlat * (mmax + 1)],
        }
    }

    #[inline]
    pub fn nlat(&self) -> usize {
        self.nlat
    }

    #[inline]
    pub fn mmax(&self) -> usize {
        self.mmax
    }

    /// Coefficients `F_0..=F_mmax` at latitude `j`.
    #[inline]
    pub fn row(&self, j: usize) -> &[Complex<NF>] {
        let w = self.mmax + 1;
        &self.data[j * w..(j + 1) * w]
    }

    #[inline]
    pub fn row_mut(&mut self, j: usize) -> &mut [Complex<NF>] {
        let w = self.mmax + 1;
        &mut self.data[j * w..(j + 1) * w]
    }

    /// `F_m` at latitude `j`.
    #[inline]
    pub fn get(&self, j: usize, m: usize) -> Complex<NF> {
        self.data[j * (self.mmax + 1) + m]
    }

    pub(crate) fn data_mut(&mut self) -> &mut [Complex<NF>] {
        &mut self.data
    }

    /// Multiply each row by a per-latitude factor.
    pub fn scale_rows(&mut self, factors: &[NF]) {
        let w = self.mmax + 1;
        for (row, &s) in self.data.chunks_exact_mut(w).zip(factors) {
            row.iter_mut().for_each(|c| *c *= s);
        }
    }

    /// Multiply every `F_m` by `i·m`, the longitude derivative.
    pub fn zonal_derivative(&self) -> Self {
        let mut out = self.clone();
        let w = self.mmax + 1;
        for row in out.data.chunks_exact_mut(w) {
            for (m, c) in row.iter_mut().enumerate() {
                let mf = NF::from_usize_lossy(m);
                *c = Complex::new(-c.im * mf, c.re * mf);
            }
        }
        out
    }
}

/// Forward transform of one row.
fn forward_row<NF: NumberFormat>(row: &[NF], tables: &FourierTables<NF>, out: &mut [Complex<NF>]) {
    let inv_nlon = NF::one() / NF::from_usize_lossy(row.len());
    for (m, coeff) in out.iter_mut().enumerate() {
        let cos = tables.cos_row(m);
        let sin = tables.sin_row(m);
        let mut re = NF::zero();
        let mut im = NF::zero();
        for ((&f, &c), &s) in row.iter().zip(cos).zip(sin) {
            re += f * c;
            im -= f * s;
        }
        *coeff = Complex::new(re * inv_nlon, im * inv_nlon);
    }
}

/// Inverse transform of one row. Drops the imaginary part of `F_0`.
fn inverse_row<NF: NumberFormat>(coeffs: &[Complex<NF>], tables: &FourierTables<NF>, out: &mut [NF]) {
    let two = NF::one() + NF::one();
    out.iter_mut().for_each(|x| *x = coeffs[0].re);
    for (m, coeff) in coeffs.iter().enumerate().skip(1) {
        let re = two * coeff.re;
        let im = two * coeff.im;
        let cos = tables.cos_row(m);
        let sin = tables.sin_row(m);
        for ((x, &c), &s) in out.iter_mut().zip(cos).zip(sin) {
            *x += re * c - im * s;
        }
    }
}

/// Forward Fourier transform of every latitude row.
///
/// Wavenumbers above `mmax` are discarded.
///
/// # Panics
///
/// Panics if `mmax` exceeds the table or the grid width differs from it.
pub fn fourier_forward<NF: NumberFormat>(
    grid: &GridField<NF>,
    tables: &FourierTables<NF>,
    mmax: usize,
) -> FourierCoefficients<NF> {
    assert!(mmax <= tables.mmax(), "mmax {} beyond table", mmax);
    assert_eq!(grid.nlon(), tables.nlon(), "grid width does not match tables");
    let mut out = FourierCoefficients::zeros(grid.nlat(), mmax);

    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        out.data
            .par_chunks_exact_mut(mmax + 1)
            .zip(grid.data().par_chunks_exact(grid.nlon()))
            .for_each(|(coeffs, row)| forward_row(row, tables, coeffs));
    }
    #[cfg(not(feature = "parallel"))]
    {
        for (coeffs, row) in out.data.chunks_exact_mut(mmax + 1).zip(grid.rows()) {
            forward_row(row, tables, coeffs);
        }
    }

    out
}

/// Inverse Fourier transform of every latitude row onto `nlon` longitudes.
pub fn fourier_inverse<NF: NumberFormat>(
    coeffs: &FourierCoefficients<NF>,
    tables: &FourierTables<NF>,
) -> GridField<NF> {
    assert!(coeffs.mmax() <= tables.mmax(), "coefficients beyond table");
    let nlon = tables.nlon();
    let mut grid = GridField::zeros(nlon, coeffs.nlat());

    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        grid.data_mut()
            .par_chunks_exact_mut(nlon)
            .zip(coeffs.data.par_chunks_exact(coeffs.mmax + 1))
            .for_each(|(row, c)| inverse_row(c, tables, row));
    }
    #[cfg(not(feature = "parallel"))]
    {
        for (row, c) in grid.rows_mut().zip(coeffs.data.chunks_exact(coeffs.mmax + 1)) {
            inverse_row(c, tables, row);
        }
    }

    grid
}
