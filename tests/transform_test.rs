//! Spectral transform accuracy on the Gaussian grid.
//!
//! Checks orthonormality of the Legendre tables under Gaussian quadrature,
//! exact round trips for band-limited fields, the low-pass behaviour of the
//! forward transform and the vector transforms.

use std::sync::Arc;

use approx::assert_relative_eq;
use num_complex::Complex;
use spectral_gcm::config::ModelConfig;
use spectral_gcm::error::ModelError;
use spectral_gcm::geometry::{Geometry, GridSize};
use spectral_gcm::polynomial::associated_legendre;
use spectral_gcm::spectral::{
    laplacian, zonal_derivative, GridField, SpectralField, SpectralTransform, Truncation,
};

fn transform<NF: spectral_gcm::NumberFormat>(truncation: usize) -> SpectralTransform<NF> {
    let config = ModelConfig::default().with_truncation(truncation).with_levels(2);
    SpectralTransform::new(Arc::new(Geometry::from_config(&config).unwrap()))
}

/// Deterministic coefficients with real m = 0 modes.
fn sample_field(truncation: Truncation) -> SpectralField<f64> {
    SpectralField::from_fn(truncation, |m, n| {
        let x = ((5 * m + 11 * n + 3) % 13) as f64 / 13.0 - 0.5;
        let y = ((7 * m + 3 * n + 1) % 9) as f64 / 9.0 - 0.5;
        Complex::new(x, if m == 0 { 0.0 } else { y })
    })
}

#[test]
fn test_gaussian_weights_and_orthonormality() {
    let tr = transform::<f64>(12);
    let g = tr.geometry();
    let weights = g.weights();
    assert_relative_eq!(weights.iter().sum::<f64>(), 2.0, epsilon = 1e-14);

    let tables = g.legendre();
    for m in 0..=12 {
        for n1 in m..=12 {
            for n2 in m..=12 {
                let dot: f64 = (0..g.nlat())
                    .map(|j| {
                        weights[j]
                            * tables.p(j, m, n1).unwrap()
                            * tables.p(j, m, n2).unwrap()
                    })
                    .sum();
                let expected = if n1 == n2 { 1.0 } else { 0.0 };
                assert!(
                    (dot - expected).abs() < 1e-12,
                    "<P({},{}), P({},{})> = {}",
                    n1,
                    m,
                    n2,
                    m,
                    dot
                );
            }
        }
    }
}

#[test]
fn test_round_trip_is_exact_for_band_limited_fields() {
    for t in [5, 21, 31] {
        let tr = transform::<f64>(t);
        let field = sample_field(tr.geometry().scalar_truncation());
        let back = tr.spectral(&tr.gridded(&field));
        assert!(back.max_abs_diff(&field) < 1e-12, "T{}: {}", t, back.max_abs_diff(&field));
    }
}

#[test]
fn test_larger_grid_round_trip() {
    let config = ModelConfig::default().with_truncation(31).with_grid(128, 64);
    let tr = SpectralTransform::new(Arc::new(Geometry::<f64>::from_config(&config).unwrap()));
    let field = sample_field(tr.geometry().scalar_truncation());
    assert!(tr.spectral(&tr.gridded(&field)).max_abs_diff(&field) < 1e-12);
}

#[test]
fn test_grid_too_small_rejected() {
    let config = ModelConfig::default().with_truncation(31).with_grid(64, 32);
    match Geometry::<f64>::from_config(&config) {
        Err(ModelError::GridSizing { truncation, nlon, .. }) => {
            assert_eq!(truncation, 31);
            assert_eq!(nlon, 64);
        }
        other => panic!("expected a grid sizing error, got {:?}", other.map(|_| ())),
    }
    assert_eq!(GridSize::sizing_rule(31), (94, 47));
}

#[test]
fn test_product_is_truncated_not_aliased() {
    // the square of a degree-T field has degree 2T; the quadratic grid
    // resolves it, so the forward transform returns the exact projection
    let t = 10;
    let tr = transform::<f64>(t);
    let shape = tr.geometry().scalar_truncation();
    let base = SpectralField::single_mode(shape, 0, t, Complex::new(1.0, 0.0));
    let grid = tr.gridded(&base);
    let square = grid.map(|x| x * x);
    let projected = tr.spectral(&square);

    // P̄_T^0 squared has mean 1/2 over μ ∈ [-1, 1] weighted by P̄_0^0 = 1/√2
    assert_relative_eq!(projected[(0, 0)].re, std::f64::consts::FRAC_1_SQRT_2, epsilon = 1e-12);
    // odd degrees vanish by symmetry
    assert!(projected[(0, 3)].norm() < 1e-12);
}

#[test]
fn test_imaginary_mean_dropped() {
    let tr = transform::<f64>(8);
    let shape = tr.geometry().scalar_truncation();
    let field = SpectralField::single_mode(shape, 0, 2, Complex::new(0.0, 1.0));
    let grid = tr.gridded(&field);
    assert!(grid.max_abs() < 1e-15);
}

#[test]
fn test_divergence_curl_recovers_vorticity_and_divergence() {
    let tr = transform::<f64>(21);
    let shape = tr.geometry().scalar_truncation();
    let scale = 1e-5;
    let mut zeta = sample_field(shape);
    let mut div = sample_field(shape);
    zeta.coeffs_mut().iter_mut().for_each(|c| *c *= scale);
    div.coeffs_mut().iter_mut().for_each(|c| *c *= 0.5 * scale);
    // the global means of ζ and D are zero on a sphere
    zeta[(0, 0)] = Complex::new(0.0, 0.0);
    div[(0, 0)] = Complex::new(0.0, 0.0);

    let (u, v) = tr.velocity_grids(&zeta, &div);
    let (d2, z2) = tr.divergence_curl(&u, &v);
    assert!(d2.max_abs_diff(&div) < 1e-9 * scale);
    assert!(z2.max_abs_diff(&zeta) < 1e-9 * scale);
}

#[test]
fn test_laplacian_eigenvalues() {
    let a = 6.371e6;
    let shape = Truncation::triangular(6);
    let field = SpectralField::single_mode(shape, 2, 5, Complex::new(1.0, 0.0));
    let lap = laplacian(&field, a);
    assert_relative_eq!(lap[(2, 5)].re, -30.0 / (a * a));
}

#[test]
fn test_single_precision_transform() {
    let tr = transform::<f32>(21);
    let shape = tr.geometry().scalar_truncation();
    let field = SpectralField::from_fn(shape, |m, n| {
        Complex::new(((m + n) % 4) as f32 * 0.25, if m == 0 { 0.0 } else { 0.1 })
    });
    let back = tr.spectral(&tr.gridded(&field));
    assert!(back.max_abs_diff(&field) < 1e-5);
}

#[test]
fn test_grid_field_constant_has_only_mean() {
    let tr = transform::<f64>(15);
    let g = tr.geometry();
    let spec = tr.spectral(&GridField::constant(g.nlon(), g.nlat(), 2.0));
    assert_relative_eq!(spec[(0, 0)].re, 2.0 * std::f64::consts::SQRT_2, epsilon = 1e-13);
    let mut rest = spec.clone();
    rest[(0, 0)] = Complex::new(0.0, 0.0);
    assert!(rest.max_abs() < 1e-13);
}

#[test]
fn test_forward_transform_is_linear() {
    let tr = transform::<f64>(21);
    let g = tr.geometry();
    let (nlon, nlat) = (g.nlon(), g.nlat());
    // neither field is band-limited
    let f = GridField::from_fn(nlon, nlat, |i, j| ((i * 7 + j * 3) % 11) as f64 - 5.0);
    let h = GridField::from_fn(nlon, nlat, |i, j| (0.3 * i as f64).sin() * (j as f64).sqrt());
    let (a, b) = (2.5, -0.75);
    let combined = f.zip_map(&h, |x, y| a * x + b * y);

    let (sf, sh) = (tr.spectral(&f), tr.spectral(&h));
    let sc = tr.spectral(&combined);
    for (((_, c), (_, x)), (_, y)) in sc.iter().zip(sf.iter()).zip(sh.iter()) {
        assert!((c - (x * a + y * b)).norm() < 1e-12, "{} vs {}", c, x * a + y * b);
    }
}

#[test]
fn test_zonal_derivative_exact_at_every_grid_point() {
    // f = 2 Re(c e^{imλ}) P̄_n^m(μ), so ∂f/∂λ = −2m (c_re sin mλ + c_im cos mλ) P̄_n^m(μ)
    let t = 15;
    let (m, n) = (4, 9);
    let c = Complex::new(0.7, -0.4);
    let tr = transform::<f64>(t);
    let g = tr.geometry();
    let field = SpectralField::single_mode(g.scalar_truncation(), m, n, c);
    let derivative = tr.gridded(&zonal_derivative(&field));

    let mut max_error: f64 = 0.0;
    for (j, &lat) in g.latitudes().iter().enumerate() {
        let p = associated_legendre(t, t, lat.sin())[m][n - m];
        for (i, &lon) in g.longitudes().iter().enumerate() {
            let phase = m as f64 * lon;
            let expected = -2.0 * m as f64 * (c.re * phase.sin() + c.im * phase.cos()) * p;
            max_error = max_error.max((derivative[(i, j)] - expected).abs());
        }
    }
    assert!(max_error < 1e-12, "max error {:e}", max_error);
}
