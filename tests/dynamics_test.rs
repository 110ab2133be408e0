//! Dynamical tendencies through the public API.

use std::sync::Arc;

use approx::assert_relative_eq;
use num_complex::Complex;
use spectral_gcm::dynamics::{add_physics, TendencyContribution};
use spectral_gcm::physics::{Parameterization, ParameterizationInfo, PhysicsTendencies};
use spectral_gcm::spectral::{GridField, SpectralField, Truncation};
use spectral_gcm::{
    Boundaries, DynamicalCore, Geometry, GridVariables, InitialConditions, Model, ModelConfig,
    ModelError, NumberFormat, PrognosticVariable, PrognosticVariables, SpectralTransform,
};

const T: usize = 15;
const LEVELS: usize = 5;

fn config() -> ModelConfig {
    ModelConfig::default().with_truncation(T).with_levels(LEVELS)
}

fn core<NF: NumberFormat>() -> DynamicalCore<NF> {
    let config = config();
    let transform = SpectralTransform::new(Arc::new(Geometry::from_config(&config).unwrap()));
    DynamicalCore::new(transform, &config.reference)
}

fn perturbed<NF: NumberFormat>(core: &DynamicalCore<NF>) -> PrognosticVariables<NF> {
    InitialConditions::Perturbed {
        vorticity_amplitude: 1e-5,
        temperature_amplitude: 1.0,
    }
    .initialize(core.transform(), &config().reference)
    .unwrap()
}

#[test]
fn test_zonal_flow_has_no_vorticity_tendency() {
    let core = core::<f64>();
    let mut vars = InitialConditions::Rest
        .initialize(core.transform(), &config().reference)
        .unwrap();
    // solid-body rotation u = u0 cos φ: ζ = 2 u0 μ / a and μ = P̄_1^0 / √(3/2)
    let u0 = 20.0;
    let radius = core.transform().geometry().radius();
    let zeta = 2.0 * u0 / radius * (2.0f64 / 3.0).sqrt();
    for z in vars.vorticity.iter_mut() {
        z[(0, 1)] = Complex::new(zeta, 0.0);
    }

    let tend = core.tendencies(&vars, &Boundaries::aquaplanet(core.transform()));
    assert!(tend.max_abs(PrognosticVariable::Vorticity) < 1e-18);
    assert!(tend.max_abs(PrognosticVariable::Temperature) < 1e-12);
    assert!(tend.max_abs(PrognosticVariable::LogSurfacePressure) < 1e-18);
    // no balancing pressure gradient, so the Coriolis force drives divergence
    assert!(tend.max_abs(PrognosticVariable::Divergence) > 1e-12);
}

#[test]
fn test_single_and_double_precision_agree() {
    let core64 = core::<f64>();
    let core32 = core::<f32>();
    let t64 = core64.tendencies(&perturbed(&core64), &Boundaries::aquaplanet(core64.transform()));
    let t32 = core32.tendencies(&perturbed(&core32), &Boundaries::aquaplanet(core32.transform()));

    for variable in [PrognosticVariable::Vorticity, PrognosticVariable::Temperature] {
        let scale = t64.max_abs(variable);
        assert!(scale > 0.0, "{} tendency vanished", variable);
        for (a, b) in t64.layers(variable).iter().zip(t32.layers(variable)) {
            for ((_, x), (_, y)) in a.iter().zip(b.iter()) {
                let diff = (x.re - y.re.to_f64_lossy()).abs() + (x.im - y.im.to_f64_lossy()).abs();
                assert!(diff < 1e-3 * scale, "{}: {} vs {}", variable, x, y);
            }
        }
    }
}

#[test]
fn test_linear_drag_damps_vorticity() {
    let core = core::<f64>();
    let vars = perturbed(&core);
    let grid = core.grid_variables(&vars);
    let geometry = core.transform().geometry();
    let cos_lat = geometry.cos_lat();
    let k = 1e-5;
    let drag = |w: &GridField<f64>| GridField::from_fn(w.nlon(), w.nlat(), |i, j| -k * w[(i, j)] / cos_lat[j]);

    let physics = PhysicsTendencies::none()
        .with_momentum(grid.u.iter().map(drag).collect(), grid.v.iter().map(drag).collect());
    let mut tend = PrognosticVariables::zeros(vars.truncation(), LEVELS);
    add_physics(&mut tend, &physics, core.transform()).unwrap();

    for (got, zeta) in tend.vorticity.iter().zip(&vars.vorticity) {
        let scale = zeta.max_abs() * k;
        for ((_, g), (_, z)) in got.iter().zip(zeta.iter()) {
            assert!((g + z * k).norm() < 1e-9 * scale, "{} vs {}", g, -z * k);
        }
    }
    // the perturbation is non-divergent
    assert!(tend.max_abs(PrognosticVariable::Divergence) < 1e-9 * k * 1e-5);
}

#[test]
fn test_spectral_contribution_truncation() {
    let core = core::<f64>();
    let tr = core.transform();

    let wider = SpectralField::single_mode(Truncation::triangular(T + 5), 2, T + 3, Complex::new(1.0, 0.0));
    let truncated = TendencyContribution::Spectral(wider).to_spectral(tr).unwrap();
    assert_eq!(truncated.truncation(), Truncation::triangular(T));
    assert_eq!(truncated.max_abs(), 0.0);

    let narrower = SpectralField::<f64>::zeros(Truncation::triangular(T - 1));
    assert!(matches!(
        TendencyContribution::Spectral(narrower).to_spectral(tr),
        Err(ModelError::DimensionMismatch { .. })
    ));
}

/// Horizontally uniform heating at a fixed rate.
struct UniformHeating {
    rate: f64,
}

impl ParameterizationInfo for UniformHeating {
    fn name(&self) -> &'static str {
        "uniform heating"
    }

    fn description(&self) -> &str {
        "constant heating rate everywhere"
    }
}

impl Parameterization<f64> for UniformHeating {
    fn compute(
        &self,
        grid: &GridVariables<f64>,
        geometry: &Geometry<f64>,
        _boundaries: &Boundaries<f64>,
        _time: f64,
    ) -> PhysicsTendencies<f64> {
        let heating = (0..grid.n_levels())
            .map(|_| TendencyContribution::Grid(GridField::constant(geometry.nlon(), geometry.nlat(), self.rate)))
            .collect();
        PhysicsTendencies::none().with_temperature(heating)
    }
}

#[test]
fn test_parameterized_heating_enters_model_tendencies() {
    let rate = 1.0 / 86400.0;
    let model =
        Model::<f64>::new(config(), None, InitialConditions::Rest, UniformHeating { rate }).unwrap();
    let tend = model.tendencies().unwrap();

    for t in &tend.temperature {
        assert_relative_eq!(t[(0, 0)].re, rate * std::f64::consts::SQRT_2, max_relative = 1e-12);
        let mut rest = t.clone();
        rest[(0, 0)] = Complex::new(0.0, 0.0);
        assert!(rest.max_abs() < 1e-12 * rate);
    }
    assert!(tend.max_abs(PrognosticVariable::Vorticity) < 1e-12);
    assert!(tend.max_abs(PrognosticVariable::Divergence) < 1e-12);
}
