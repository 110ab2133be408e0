//! Spectral derivative operators.
//!
//! Each operator acts on coefficients only; no transform is involved.
//!
//! - [`zonal_derivative`]: `∂/∂λ`, multiplies `a_n^m` by `i·m`
//! - [`meridional_derivative`]: `(1 − μ²) ∂/∂μ`, couples `n ± 1` through `ε_n^m`
//! - [`laplacian`] / [`inverse_laplacian`]: `∇²` on a sphere of radius `a`
//! - [`uv_from_vorticity_divergence`]: `cos φ`-weighted winds from ζ and D

use num_complex::Complex;

use super::field::SpectralField;
use super::truncation::Truncation;
use crate::geometry::LegendreTables;
use crate::time::Integrable;
use crate::types::NumberFormat;

/// `∂/∂λ`: multiply every coefficient by `i·m`.
pub fn zonal_derivative<NF: NumberFormat>(field: &SpectralField<NF>) -> SpectralField<NF> {
    let mut out = field.clone();
    for m in 1..=field.truncation().mmax() {
        let mf = NF::from_usize_lossy(m);
        for c in out.order_mut(m) {
            *c = Complex::new(-c.im * mf, c.re * mf);
        }
    }
    out.order_mut(0)
        .iter_mut()
        .for_each(|c| *c = Complex::new(NF::zero(), NF::zero()));
    out
}

/// `(1 − μ²) ∂/∂μ` in spectral space.
///
/// Uses `(1 − μ²) dP̄_n^m/dμ = −n ε_{n+1}^m P̄_{n+1}^m + (n+1) ε_n^m P̄_{n−1}^m`,
/// so the coefficient of `P̄_k^m` in the result is
/// `−(k−1) ε_k^m a_{k−1} + (k+2) ε_{k+1}^m a_{k+1}`.
///
/// The result has one more degree than the input.
///
/// # Panics
///
/// Panics if the output degree exceeds the recurrence table (`T + 2`).
pub fn meridional_derivative<NF: NumberFormat>(
    field: &SpectralField<NF>,
    tables: &LegendreTables<NF>,
) -> SpectralField<NF> {
    let input = field.truncation();
    let output = Truncation::new(input.lmax() + 1, input.mmax());
    assert!(output.lmax() <= tables.truncation() + 2, "degree beyond recurrence table");

    let mut out = SpectralField::zeros(output);
    for m in 0..=input.mmax() {
        let a = field.order(m);
        let res = out.order_mut(m);
        for (offset, r) in res.iter_mut().enumerate() {
            let k = m + offset;
            let mut value = Complex::new(NF::zero(), NF::zero());
            if offset >= 1 {
                let coef = -NF::from_usize_lossy(k - 1) * tables.epsilon(k, m);
                value += a[offset - 1].scale(coef);
            }
            if offset + 1 < a.len() {
                let coef = NF::from_usize_lossy(k + 2) * tables.epsilon(k + 1, m);
                value += a[offset + 1].scale(coef);
            }
            *r = value;
        }
    }
    out
}

/// `∇²` on a sphere of radius `a`: multiply by `−n(n+1)/a²`.
pub fn laplacian<NF: NumberFormat>(field: &SpectralField<NF>, radius: NF) -> SpectralField<NF> {
    let inv_a2 = NF::one() / (radius * radius);
    let mut out = field.clone();
    out.scale_by_degree(|n| -NF::from_usize_lossy(n * (n + 1)) * inv_a2);
    out
}

/// `∇⁻²`: multiply by `−a²/(n(n+1))`. The global mean (`n = 0`) is set to zero.
pub fn inverse_laplacian<NF: NumberFormat>(
    field: &SpectralField<NF>,
    radius: NF,
) -> SpectralField<NF> {
    let a2 = radius * radius;
    let mut out = field.clone();
    out.scale_by_degree(|n| {
        if n == 0 {
            NF::zero()
        } else {
            -a2 / NF::from_usize_lossy(n * (n + 1))
        }
    });
    out
}

/// Spectral `U = u cos φ` and `V = v cos φ` from vorticity and divergence.
///
/// With streamfunction `ψ = ∇⁻²ζ` and velocity potential `χ = ∇⁻²D`:
/// `U = (∂χ/∂λ − (1 − μ²)∂ψ/∂μ) / a`, `V = (∂ψ/∂λ + (1 − μ²)∂χ/∂μ) / a`.
///
/// Both outputs have the vector truncation `(T + 1, T)` of the input shape.
///
/// # Panics
///
/// Panics if the two inputs have different shapes.
pub fn uv_from_vorticity_divergence<NF: NumberFormat>(
    vorticity: &SpectralField<NF>,
    divergence: &SpectralField<NF>,
    tables: &LegendreTables<NF>,
    radius: NF,
) -> (SpectralField<NF>, SpectralField<NF>) {
    assert_eq!(
        vorticity.truncation(),
        divergence.truncation(),
        "vorticity and divergence shapes differ"
    );
    let inv_a = NF::one() / radius;
    let psi = inverse_laplacian(vorticity, radius);
    let chi = inverse_laplacian(divergence, radius);

    let mut u = zonal_derivative(&chi);
    let mut v = zonal_derivative(&psi);
    let shape = Truncation::new(vorticity.truncation().lmax() + 1, vorticity.truncation().mmax());
    u = u.truncate_to(shape);
    v = v.truncate_to(shape);
    u -= &meridional_derivative(&psi, tables);
    v += &meridional_derivative(&chi, tables);

    u.scale(inv_a);
    v.scale(inv_a);
    (u, v)
}
