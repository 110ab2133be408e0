//! Precomputed transform tables.
//!
//! All tables are evaluated in `f64` and converted to `NF` once.

use crate::polynomial::{associated_legendre, recurrence_epsilon};
use crate::spectral::Truncation;
use crate::types::NumberFormat;

// =============================================================================
// Legendre Tables
// =============================================================================

/// Associated Legendre functions and their meridional derivatives at every
/// Gaussian latitude.
///
/// - `P̄_n^m(μ_j)` for `m <= T`, `m <= n <= T + 1` (vector truncation layout)
/// - `H_n^m(μ_j) = (1 − μ²) dP̄_n^m/dμ` for `m <= n <= T` (triangular layout)
/// - `ε_n^m` for `n <= T + 2`
#[derive(Clone, Debug)]
pub struct LegendreTables<NF> {
    truncation: usize,
    nlat: usize,
    vector: Truncation,
    scalar: Truncation,
    recurrence: Truncation,
    pnm: Vec<NF>,
    hnm: Vec<NF>,
    epsilon: Vec<NF>,
}

impl<NF: NumberFormat> LegendreTables<NF> {
    /// Tabulate for truncation `T` at the given `μ_j = sin φ_j`.
    pub fn new(truncation: usize, sin_lat: &[f64]) -> Self {
        let vector = Truncation::vector(truncation);
        let scalar = Truncation::triangular(truncation);
        let recurrence = Truncation::new(truncation + 2, truncation);
        let nlat = sin_lat.len();

        let epsilon_f64: Vec<f64> = recurrence
            .iter()
            .map(|idx| recurrence_epsilon(idx.n, idx.m))
            .collect();
        let eps = |n: usize, m: usize| {
            recurrence
                .index(m, n)
                .map(|k| epsilon_f64[k])
                .unwrap_or(0.0)
        };

        let mut pnm = Vec::with_capacity(nlat * vector.len());
        let mut hnm = Vec::with_capacity(nlat * scalar.len());

        for &mu in sin_lat {
            // one degree beyond the vector shape so H has P̄_{n+1} for n = T
            let table = associated_legendre(truncation + 2, truncation, mu);
            for idx in vector.iter() {
                pnm.push(NF::from_f64_lossy(table[idx.m][idx.n - idx.m]));
            }
            for idx in scalar.iter() {
                let (m, n) = (idx.m, idx.n);
                let above = table[m][n + 1 - m];
                let below = if n > m { table[m][n - 1 - m] } else { 0.0 };
                let h = -(n as f64) * eps(n + 1, m) * above + (n + 1) as f64 * eps(n, m) * below;
                hnm.push(NF::from_f64_lossy(h));
            }
        }

        Self {
            truncation,
            nlat,
            vector,
            scalar,
            recurrence,
            pnm,
            hnm,
            epsilon: epsilon_f64.iter().map(|&e| NF::from_f64_lossy(e)).collect(),
        }
    }

    #[inline]
    pub fn truncation(&self) -> usize {
        self.truncation
    }

    #[inline]
    pub fn nlat(&self) -> usize {
        self.nlat
    }

    /// `P̄_n^m(μ_j)` for `n = m..=T+1`.
    #[inline]
    pub fn p_order(&self, j: usize, m: usize) -> &[NF] {
        let base = j * self.vector.len() + self.vector.offset(m);
        &self.pnm[base..base + self.vector.lmax() + 1 - m]
    }

    /// `H_n^m(μ_j)` for `n = m..=T`.
    #[inline]
    pub fn h_order(&self, j: usize, m: usize) -> &[NF] {
        let base = j * self.scalar.len() + self.scalar.offset(m);
        &self.hnm[base..base + self.scalar.lmax() + 1 - m]
    }

    /// `P̄_n^m(μ_j)`, or `None` outside the table.
    pub fn p(&self, j: usize, m: usize, n: usize) -> Option<NF> {
        self.vector
            .index(m, n)
            .map(|k| self.pnm[j * self.vector.len() + k])
    }

    /// `ε_n^m`, zero outside the tabulated range.
    #[inline]
    pub fn epsilon(&self, n: usize, m: usize) -> NF {
        self.recurrence
            .index(m, n)
            .map(|k| self.epsilon[k])
            .unwrap_or_else(NF::zero)
    }
}

// =============================================================================
// Fourier Tables
// =============================================================================

/// `cos(m λ_i)` and `sin(m λ_i)` for `m <= mmax` at every longitude.
#[derive(Clone, Debug)]
pub struct FourierTables<NF> {
    nlon: usize,
    mmax: usize,
    cos: Vec<NF>,
    sin: Vec<NF>,
}

impl<NF: NumberFormat> FourierTables<NF> {
    pub fn new(nlon: usize, mmax: usize) -> Self {
        let mut cos = Vec::with_capacity((mmax + 1) * nlon);
        let mut sin = Vec::with_capacity((mmax + 1) * nlon);
        for m in 0..=mmax {
            for i in 0..nlon {
                // reduce m*i modulo nlon before scaling to keep the angle small
                let phase = 2.0 * std::f64::consts::PI * ((m * i) % nlon) as f64 / nlon as f64;
                cos.push(NF::from_f64_lossy(phase.cos()));
                sin.push(NF::from_f64_lossy(phase.sin()));
            }
        }
        Self {
            nlon,
            mmax,
            cos,
            sin,
        }
    }

    #[inline]
    pub fn nlon(&self) -> usize {
        self.nlon
    }

    #[inline]
    pub fn mmax(&self) -> usize {
        self.mmax
    }

    /// `cos(m λ_i)` for all `i`.
    #[inline]
    pub fn cos_row(&self, m: usize) -> &[NF] {
        &self.cos[m * self.nlon..(m + 1) * self.nlon]
    }

    /// `sin(m λ_i)` for all `i`.
    #[inline]
    pub fn sin_row(&self, m: usize) -> &[NF] {
        &self.sin[m * self.nlon..(m + 1) * self.nlon]
    }
}
