//! Gauss–Legendre nodes and weights.
//!
//! The `n` Gauss–Legendre nodes are the roots of `P_n(μ)`. With these as
//! latitudes (μ = sin φ) the weighted sum over latitudes integrates
//! polynomials in μ of degree up to `2n − 1` exactly, which makes the
//! Legendre transform alias-free on a quadratic grid.

use std::f64::consts::PI;

use super::legendre::legendre_and_derivative;

/// Compute the `n` Gauss–Legendre nodes, ordered from +1 (north) to −1 (south).
///
/// Newton iteration on `P_n` starting from `cos(π (j + 3/4) / (n + 1/2))`.
pub fn gauss_legendre_nodes(n: usize) -> Vec<f64> {
    let nf = n as f64;
    (0..n)
        .map(|j| {
            let mut mu = (PI * (j as f64 + 0.75) / (nf + 0.5)).cos();
            for _ in 0..100 {
                let (p, dp) = legendre_and_derivative(n, mu);
                let update = p / dp;
                mu -= update;
                if update.abs() < 1e-15 {
                    break;
                }
            }
            mu
        })
        .collect()
}

/// Gauss–Legendre weights `w_j = 2 / ((1 − μ_j²) P'_n(μ_j)²)`.
///
/// They sum to 2, the length of `[−1, 1]`.
pub fn gauss_legendre_weights(n: usize, nodes: &[f64]) -> Vec<f64> {
    nodes
        .iter()
        .map(|&mu| {
            let (_, dp) = legendre_and_derivative(n, mu);
            2.0 / ((1.0 - mu * mu) * dp * dp)
        })
        .collect()
}
