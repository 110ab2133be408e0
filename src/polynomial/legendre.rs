//! Legendre polynomials P_n(μ).
//!
//! Only needed at setup to locate the Gaussian latitudes, so everything
//! here works in `f64`.

/// Evaluate `P_n(μ)` and `P_{n-1}(μ)` with the Bonnet recurrence
/// `(k+1) P_{k+1} = (2k+1) μ P_k − k P_{k−1}`.
///
/// For `n = 0` the second value is zero.
pub fn legendre_pair(n: usize, mu: f64) -> (f64, f64) {
    let mut p_km1 = 0.0;
    let mut p_k = 1.0;
    for k in 0..n {
        let kf = k as f64;
        let p_kp1 = ((2.0 * kf + 1.0) * mu * p_k - kf * p_km1) / (kf + 1.0);
        p_km1 = p_k;
        p_k = p_kp1;
    }
    (p_k, p_km1)
}

/// Evaluate `P_n(μ)`.
pub fn legendre(n: usize, mu: f64) -> f64 {
    legendre_pair(n, mu).0
}

/// Evaluate `P_n(μ)` and `dP_n/dμ` for `|μ| < 1`.
///
/// Uses `(1 − μ²) P'_n = n (P_{n−1} − μ P_n)`. Gaussian latitudes never
/// reach the poles, so the endpoint limit is not needed.
pub fn legendre_and_derivative(n: usize, mu: f64) -> (f64, f64) {
    let (p_n, p_nm1) = legendre_pair(n, mu);
    let dp_n = n as f64 * (p_nm1 - mu * p_n) / (1.0 - mu * mu);
    (p_n, dp_n)
}
