//! Time integration tests through the public API.
//!
//! - Leapfrog with the Robert–Asselin–Williams filter on a single oscillator
//! - Semi-implicit gravity waves beyond the explicit stability limit
//! - Stability monitoring and rejected steps

use approx::assert_relative_eq;
use num_complex::Complex;
use spectral_gcm::config::ModelConfig;
use spectral_gcm::geometry::VerticalCoordinates;
use spectral_gcm::spectral::{SpectralField, Truncation};
use spectral_gcm::time::{
    IntegrationPhase, Leapfrog, LeapfrogLevels, RobertAsselinWilliams, SemiImplicitSolver,
    StabilityThresholds, TimeIntegrator, TimeScheme,
};
use spectral_gcm::{LinearOperators, ModelError, PrognosticVariable, PrognosticVariables};

/// `dF/dt = iωF` from `F(0) = 1` for `n_steps` steps.
fn oscillator(scheme: &Leapfrog, omega: f64, dt: f64, n_steps: usize) -> Complex<f64> {
    let mut levels = LeapfrogLevels::new(Complex::new(1.0, 0.0));
    let i_omega = Complex::new(0.0, omega);
    for _ in 0..n_steps {
        scheme.step(&mut levels, dt, |f| f * i_omega);
    }
    levels.present
}

#[test]
fn test_oscillation_amplitude_is_preserved() {
    let scheme = Leapfrog::default();
    let f = oscillator(&scheme, 1.0, 0.01, 1000);
    assert_relative_eq!(f.norm(), 1.0, max_relative = 1e-2);
    // phase after t = 10
    let exact = Complex::from_polar(1.0, 10.0);
    assert!((f - exact).norm() < 1e-2, "{} vs {}", f, exact);
}

#[test]
fn test_oscillation_converges_at_second_order() {
    let scheme = Leapfrog::default();
    let exact = Complex::from_polar(1.0, 1.0);
    let coarse = (oscillator(&scheme, 1.0, 0.01, 100) - exact).norm();
    let fine = (oscillator(&scheme, 1.0, 0.005, 200) - exact).norm();
    let ratio = coarse / fine;
    assert!(ratio > 3.5, "error ratio {}", ratio);
}

#[test]
fn test_unfiltered_leapfrog_is_neutral() {
    let scheme = Leapfrog::new(RobertAsselinWilliams::new(0.0, 0.53));
    let f = oscillator(&scheme, 1.0, 0.1, 500);
    assert_relative_eq!(f.norm(), 1.0, max_relative = 1e-2);
}

#[test]
fn test_classic_robert_filter_damps_more_than_williams() {
    let classic = Leapfrog::new(RobertAsselinWilliams::new(0.2, 1.0));
    let williams = Leapfrog::new(RobertAsselinWilliams::new(0.2, 0.53));
    let a = oscillator(&classic, 1.0, 0.2, 200).norm();
    let b = oscillator(&williams, 1.0, 0.2, 200).norm();
    assert!(a < b, "classic {} williams {}", a, b);
    assert!(a < 1.0);
}

const T: usize = 21;
const N: usize = 6;

fn setup(dt: f64) -> (ModelConfig, LinearOperators) {
    let config = ModelConfig::default()
        .with_truncation(T)
        .with_levels(N)
        .with_time_step(dt)
        .with_diffusion(false);
    let vertical = VerticalCoordinates::from_config(&config.vertical).unwrap();
    let linear = LinearOperators::new(&vertical, &config.physical, &config.reference);
    (config, linear)
}

fn gravity_wave() -> PrognosticVariables<f64> {
    let shape = Truncation::triangular(T);
    let mut vars = PrognosticVariables::zeros(shape, N);
    for (k, d) in vars.divergence.iter_mut().enumerate() {
        *d = SpectralField::from_fn(shape, |m, n| {
            if n >= 15 && m <= 3 {
                Complex::new(1e-6 / (k + 1) as f64, if m == 0 { 0.0 } else { 5e-7 })
            } else {
                Complex::new(0.0, 0.0)
            }
        });
    }
    vars
}

#[test]
fn test_semi_implicit_gravity_waves_stay_bounded() {
    // at T21 the fastest external wave has ω Δt ≈ 7 for Δt = 2 h
    let (config, linear) = setup(7200.0);
    let mut integrator = TimeIntegrator::new(&config, &linear, gravity_wave()).unwrap();
    let initial = integrator.present().max_abs(PrognosticVariable::Divergence);
    for _ in 0..120 {
        let tendency = integrator.semi_implicit().linear_terms(integrator.present());
        integrator.step(&tendency).unwrap();
    }
    let last = integrator.present().max_abs(PrognosticVariable::Divergence);
    assert!(last.is_finite());
    assert!(last < 10.0 * initial, "{} grew from {}", last, initial);
    assert_eq!(integrator.time(), 120.0 * 7200.0);
}

#[test]
fn test_semi_implicit_solution_of_implicit_equations() {
    let (_, linear) = setup(1800.0);
    let solver = SemiImplicitSolver::<f64>::new(&linear, T, 6.371e6, 1800.0, 0.5).unwrap();
    let mut g = gravity_wave();
    for t in g.temperature.iter_mut() {
        t[(2, 17)] = Complex::new(0.3, -0.1);
    }
    g.log_surface_pressure[(1, 16)] = Complex::new(1e-3, 2e-3);

    let mut delta = g.clone();
    solver.solve(&mut delta, &g, &g, IntegrationPhase::Initialization);
    let l = solver.linear_terms(&delta);
    let xi = 0.5 * 1800.0;

    for k in 0..N {
        for (idx, d) in delta.divergence[k].iter() {
            let residual = d - l.divergence[k][(idx.m, idx.n)] * xi - g.divergence[k][(idx.m, idx.n)];
            assert!(residual.norm() < 1e-16, "D residual {} at {:?}", residual, idx);
        }
        for (idx, t) in delta.temperature[k].iter() {
            let residual = t - l.temperature[k][(idx.m, idx.n)] * xi - g.temperature[k][(idx.m, idx.n)];
            assert!(residual.norm() < 1e-12, "T residual {} at {:?}", residual, idx);
        }
    }
}

#[test]
fn test_instability_is_reported_and_rejected() {
    let (config, linear) = setup(1800.0);
    let config = config.with_stability(
        StabilityThresholds::default().with_max(PrognosticVariable::Temperature, 10.0),
    );
    let mut integrator = TimeIntegrator::new(&config, &linear, gravity_wave()).unwrap();
    let mut heating = integrator.zero_tendency();
    heating.temperature[N - 1][(1, 3)] = Complex::new(1.0, 0.0);

    let before = integrator.state().clone();
    match integrator.step(&heating) {
        Err(ModelError::NumericalInstability {
            step,
            field,
            level,
            magnitude,
            threshold,
        }) => {
            assert_eq!(step, 1);
            assert_eq!(field, PrognosticVariable::Temperature);
            assert_eq!(level, Some(N - 1));
            assert!(magnitude > threshold);
        }
        other => panic!("expected instability, got {:?}", other.map(|s| s.step)),
    }
    assert_eq!(integrator.state(), &before);
    assert_eq!(integrator.phase(), IntegrationPhase::Initialization);
}

#[test]
fn test_non_finite_tendency_is_rejected() {
    let (config, linear) = setup(1800.0);
    let mut integrator = TimeIntegrator::new(&config, &linear, gravity_wave()).unwrap();
    let mut bad = integrator.zero_tendency();
    bad.humidity[0][(0, 0)] = Complex::new(f64::NAN, 0.0);
    let err = integrator.step(&bad).unwrap_err();
    assert!(err.is_instability());
    assert_eq!(integrator.step_count(), 0);
}

#[test]
fn test_time_step_change_keeps_integrating() {
    let (config, linear) = setup(1800.0);
    let mut integrator = TimeIntegrator::new(&config, &linear, gravity_wave()).unwrap();
    for _ in 0..3 {
        let tendency = integrator.semi_implicit().linear_terms(integrator.present());
        integrator.step(&tendency).unwrap();
    }
    integrator.set_time_step(900.0).unwrap();
    let tendency = integrator.semi_implicit().linear_terms(integrator.present());
    integrator.step(&tendency).unwrap();
    assert_eq!(integrator.step_count(), 4);
    assert_relative_eq!(integrator.time(), 3.0 * 1800.0 + 900.0);
}
