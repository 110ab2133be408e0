//! Legendre stage of the transform: latitude ↔ total wavenumber.
//!
//! Forward: `a_n^m = Σ_j w_j F_m(μ_j) P̄_n^m(μ_j)` (Gaussian quadrature).
//! Inverse: `F_m(μ_j) = Σ_n a_n^m P̄_n^m(μ_j)`.
//!
//! The forward stage parallelizes over `m`, the inverse over latitude rows;
//! both write disjoint outputs.

use num_complex::Complex;

use super::field::SpectralField;
use super::fourier::FourierCoefficients;
use super::truncation::Truncation;
use crate::geometry::LegendreTables;
use crate::types::NumberFormat;

/// Which meridional basis a forward projection uses.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LegendreBasis {
    /// `P̄_n^m`.
    Function,
    /// `H_n^m = (1 − μ²) dP̄_n^m/dμ`.
    Derivative,
}

fn project_order<NF: NumberFormat>(
    fourier: &FourierCoefficients<NF>,
    tables: &LegendreTables<NF>,
    weights: &[NF],
    basis: LegendreBasis,
    m: usize,
    n_count: usize,
) -> Vec<Complex<NF>> {
    let mut acc = vec![Complex::new(NF::zero(), NF::zero()); n_count];
    for (j, &w) in weights.iter().enumerate() {
        let fw = fourier.get(j, m).scale(w);
        let table = match basis {
            LegendreBasis::Function => tables.p_order(j, m),
            LegendreBasis::Derivative => tables.h_order(j, m),
        };
        for (a, &p) in acc.iter_mut().zip(&table[..n_count]) {
            *a += fw.scale(p);
        }
    }
    acc
}

/// Project Fourier coefficients onto the Legendre basis.
///
/// Output shape is `truncation`; its `lmax` may be up to `T + 1` for
/// [`LegendreBasis::Function`] and up to `T` for [`LegendreBasis::Derivative`].
///
/// # Panics
///
/// Panics if `truncation` exceeds the tables or the Fourier coefficients.
pub fn legendre_forward<NF: NumberFormat>(
    fourier: &FourierCoefficients<NF>,
    tables: &LegendreTables<NF>,
    weights: &[NF],
    truncation: Truncation,
    basis: LegendreBasis,
) -> SpectralField<NF> {
    let t = tables.truncation();
    let max_degree = match basis {
        LegendreBasis::Function => t + 1,
        LegendreBasis::Derivative => t,
    };
    assert!(truncation.lmax() <= max_degree, "degree beyond Legendre table");
    assert!(truncation.mmax() <= fourier.mmax(), "order beyond Fourier coefficients");
    assert_eq!(weights.len(), fourier.nlat(), "weights do not match latitudes");

    let orders = 0..=truncation.mmax();
    let count = |m: usize| truncation.lmax() + 1 - m;

    #[cfg(feature = "parallel")]
    let blocks: Vec<Vec<Complex<NF>>> = {
        use rayon::prelude::*;
        orders
            .into_par_iter()
            .map(|m| project_order(fourier, tables, weights, basis, m, count(m)))
            .collect()
    };
    #[cfg(not(feature = "parallel"))]
    let blocks: Vec<Vec<Complex<NF>>> = orders
        .map(|m| project_order(fourier, tables, weights, basis, m, count(m)))
        .collect();

    let mut out = SpectralField::zeros(truncation);
    for (m, block) in blocks.into_iter().enumerate() {
        out.order_mut(m).copy_from_slice(&block);
    }
    out
}

fn synthesize_row<NF: NumberFormat>(
    field: &SpectralField<NF>,
    tables: &LegendreTables<NF>,
    j: usize,
    row: &mut [Complex<NF>],
) {
    for (m, out) in row.iter_mut().enumerate() {
        let coeffs = field.order(m);
        let p = tables.p_order(j, m);
        let mut sum = Complex::new(NF::zero(), NF::zero());
        for (a, &pv) in coeffs.iter().zip(p) {
            sum += a.scale(pv);
        }
        *out = sum;
    }
}

/// Evaluate a spectral field at every Gaussian latitude, per zonal wavenumber.
///
/// # Panics
///
/// Panics if the field's `lmax` exceeds `T + 1`.
pub fn legendre_inverse<NF: NumberFormat>(
    field: &SpectralField<NF>,
    tables: &LegendreTables<NF>,
) -> FourierCoefficients<NF> {
    let truncation = field.truncation();
    assert!(
        truncation.lmax() <= tables.truncation() + 1,
        "degree beyond Legendre table"
    );
    let width = truncation.mmax() + 1;
    let mut out = FourierCoefficients::zeros(tables.nlat(), truncation.mmax());

    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        out.data_mut()
            .par_chunks_exact_mut(width)
            .enumerate()
            .for_each(|(j, row)| synthesize_row(field, tables, j, row));
    }
    #[cfg(not(feature = "parallel"))]
    {
        for (j, row) in out.data_mut().chunks_exact_mut(width).enumerate() {
            synthesize_row(field, tables, j, row);
        }
    }

    out
}
