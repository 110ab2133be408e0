//! Normalized associated Legendre functions P̄_n^m(μ).
//!
//! Normalization: `∫_{-1}^{1} P̄_n^m(μ)² dμ = 1`, without the
//! Condon–Shortley phase. With this choice a spectral coefficient `a_n^m`
//! contributes `2 Re(a_n^m e^{imλ}) P̄_n^m(μ)` to a real field for `m > 0`.

/// Recurrence coefficient `ε_n^m = sqrt((n² − m²) / (4n² − 1))`.
///
/// Zero for `n <= m`, so terms reaching below the diagonal vanish.
pub fn recurrence_epsilon(n: usize, m: usize) -> f64 {
    if n <= m {
        return 0.0;
    }
    let (n, m) = (n as f64, m as f64);
    ((n * n - m * m) / (4.0 * n * n - 1.0)).sqrt()
}

/// Evaluate `P̄_n^m(μ)` for `0 <= m <= mmax`, `m <= n <= lmax`.
///
/// Returned jagged by order: `table[m][n - m]`.
///
/// Sectoral values come from `P̄_m^m = P̄_{m−1}^{m−1} sqrt((2m+1)/(2m)) sqrt(1−μ²)`,
/// then each column runs the stable three-term recurrence in `n`.
///
/// # Panics
///
/// Panics if `mmax > lmax`.
pub fn associated_legendre(lmax: usize, mmax: usize, mu: f64) -> Vec<Vec<f64>> {
    assert!(mmax <= lmax, "mmax {} exceeds lmax {}", mmax, lmax);
    let cos_lat = (1.0 - mu * mu).max(0.0).sqrt();

    let mut table = Vec::with_capacity(mmax + 1);
    let mut sectoral = std::f64::consts::FRAC_1_SQRT_2;
    for m in 0..=mmax {
        if m > 0 {
            let mf = m as f64;
            sectoral *= ((2.0 * mf + 1.0) / (2.0 * mf)).sqrt() * cos_lat;
        }
        let mut column = Vec::with_capacity(lmax - m + 1);
        column.push(sectoral);
        if m < lmax {
            column.push((2.0 * m as f64 + 3.0).sqrt() * mu * sectoral);
        }
        for n in m + 2..=lmax {
            let p1 = column[n - m - 1];
            let p2 = column[n - m - 2];
            let value = (mu * p1 - recurrence_epsilon(n - 1, m) * p2) / recurrence_epsilon(n, m);
            column.push(value);
        }
        table.push(column);
    }
    table
}
