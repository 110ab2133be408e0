//! Model driver.
//!
//! Wires geometry, transform, boundaries, dynamics, parameterizations and the
//! time integrator together and runs them.

use std::sync::Arc;

use serde::Serialize;

use crate::analysis::{diagnose, GlobalDiagnostics, GridDiagnostics};
use crate::boundaries::{Boundaries, BoundaryData};
use crate::config::ModelConfig;
use crate::dynamics::{add_physics, DynamicalCore, Tendencies};
use crate::error::ModelResult;
use crate::geometry::Geometry;
use crate::physics::{NoPhysics, Parameterization};
use crate::spectral::SpectralTransform;
use crate::state::{InitialConditions, PrognosticState};
use crate::time::{StabilityStatus, TimeIntegrator};
use crate::types::NumberFormat;

// =============================================================================
// Simulation Result
// =============================================================================

/// Result of [`Model::run`].
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SimulationResult {
    /// Steps completed during this run.
    pub n_steps: usize,
    /// Model time reached (s).
    pub final_time: f64,
    /// Wall-clock time (s).
    pub wall_time: f64,
    /// Whether every requested step was taken.
    pub success: bool,
    /// The error that stopped the run.
    pub error: Option<String>,
}

impl SimulationResult {
    pub fn success(n_steps: usize, final_time: f64, wall_time: f64) -> Self {
        Self {
            n_steps,
            final_time,
            wall_time,
            success: true,
            error: None,
        }
    }

    pub fn failure(n_steps: usize, final_time: f64, wall_time: f64, error: String) -> Self {
        Self {
            n_steps,
            final_time,
            wall_time,
            success: false,
            error: Some(error),
        }
    }
}

// =============================================================================
// Model Builder
// =============================================================================

/// Builder for [`Model`].
pub struct ModelBuilder<NF> {
    config: ModelConfig,
    boundaries: Option<BoundaryData>,
    initial: InitialConditions,
    physics: Box<dyn Parameterization<NF>>,
}

impl<NF: NumberFormat> ModelBuilder<NF> {
    pub fn new(config: ModelConfig) -> Self {
        Self {
            config,
            boundaries: None,
            initial: InitialConditions::default(),
            physics: Box::new(NoPhysics),
        }
    }

    /// Boundary arrays. Without them the model runs as an aquaplanet.
    pub fn with_boundaries(mut self, data: BoundaryData) -> Self {
        self.boundaries = Some(data);
        self
    }

    pub fn with_initial_conditions(mut self, initial: InitialConditions) -> Self {
        self.initial = initial;
        self
    }

    pub fn with_parameterization<P>(mut self, physics: P) -> Self
    where
        P: Parameterization<NF> + 'static,
    {
        self.physics = Box::new(physics);
        self
    }

    /// Validate the configuration and build every component.
    pub fn build(self) -> ModelResult<Model<NF>> {
        self.config.validate()?;
        let geometry = Arc::new(Geometry::from_config(&self.config)?);
        let transform = SpectralTransform::new(geometry.clone());

        let boundaries = match &self.boundaries {
            Some(data) => Boundaries::new(data, &transform)?,
            None => Boundaries::aquaplanet(&transform),
        };
        let core = DynamicalCore::new(transform.clone(), &self.config.reference);
        let initial = self.initial.initialize(&transform, &self.config.reference)?;
        let integrator = TimeIntegrator::new(&self.config, core.linear(), initial)?;

        log::info!(
            "Model T{} on {}x{}x{}, dt = {} s, physics: {}",
            geometry.truncation(),
            geometry.nlon(),
            geometry.nlat(),
            geometry.n_levels(),
            self.config.time.dt_seconds,
            self.physics.name()
        );
        log::debug!("Configuration: {:?}", self.config);

        Ok(Model {
            config: self.config,
            geometry,
            transform,
            boundaries,
            core,
            physics: self.physics,
            integrator,
        })
    }
}

// =============================================================================
// Model
// =============================================================================

/// A complete model run in number format `NF`.
///
/// # Example
///
/// ```
/// use spectral_gcm::config::ModelConfig;
/// use spectral_gcm::simulation::Model;
/// use spectral_gcm::state::InitialConditions;
///
/// let config = ModelConfig::default().with_truncation(10).with_levels(3);
/// let mut model = Model::<f64>::builder(config)
///     .with_initial_conditions(InitialConditions::Perturbed {
///         vorticity_amplitude: 1e-6,
///         temperature_amplitude: 0.1,
///     })
///     .build()
///     .unwrap();
///
/// let result = model.run(4);
/// assert!(result.success);
/// assert_eq!(model.step_count(), 4);
/// ```
pub struct Model<NF> {
    config: ModelConfig,
    geometry: Arc<Geometry<NF>>,
    transform: SpectralTransform<NF>,
    boundaries: Boundaries<NF>,
    core: DynamicalCore<NF>,
    physics: Box<dyn Parameterization<NF>>,
    integrator: TimeIntegrator<NF>,
}

impl<NF: NumberFormat> Model<NF> {
    pub fn builder(config: ModelConfig) -> ModelBuilder<NF> {
        ModelBuilder::new(config)
    }

    /// Build a model in one call. `None` boundaries give an aquaplanet.
    pub fn new<P>(
        config: ModelConfig,
        boundaries: Option<BoundaryData>,
        initial: InitialConditions,
        physics: P,
    ) -> ModelResult<Self>
    where
        P: Parameterization<NF> + 'static,
    {
        let mut builder = ModelBuilder::new(config)
            .with_initial_conditions(initial)
            .with_parameterization(physics);
        if let Some(data) = boundaries {
            builder = builder.with_boundaries(data);
        }
        builder.build()
    }

    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    pub fn geometry(&self) -> &Arc<Geometry<NF>> {
        &self.geometry
    }

    pub fn transform(&self) -> &SpectralTransform<NF> {
        &self.transform
    }

    pub fn boundaries(&self) -> &Boundaries<NF> {
        &self.boundaries
    }

    pub fn dynamics(&self) -> &DynamicalCore<NF> {
        &self.core
    }

    pub fn integrator(&self) -> &TimeIntegrator<NF> {
        &self.integrator
    }

    pub fn state(&self) -> &PrognosticState<NF> {
        self.integrator.state()
    }

    #[inline]
    pub fn step_count(&self) -> usize {
        self.integrator.step_count()
    }

    /// Model time in seconds.
    #[inline]
    pub fn time(&self) -> f64 {
        self.integrator.time()
    }

    /// Change the time step. The prognostic state is kept.
    pub fn set_time_step(&mut self, dt: f64) -> ModelResult<()> {
        self.integrator.set_time_step(dt)?;
        self.config.time.dt_seconds = dt;
        Ok(())
    }

    /// Dynamical plus parameterized tendencies of the present state.
    pub fn tendencies(&self) -> ModelResult<Tendencies<NF>> {
        let vars = self.integrator.present();
        let grid = self.core.grid_variables(vars);
        let terms = self.core.nonlinear_terms(&grid);
        let mut tendencies = self.core.forward_stage(vars, &terms, &self.boundaries);

        let physics = self
            .physics
            .compute(&grid, &self.geometry, &self.boundaries, self.time());
        if !physics.is_empty() {
            add_physics(&mut tendencies, &physics, &self.transform)?;
        }
        Ok(tendencies)
    }

    /// Advance by one time step.
    ///
    /// # Errors
    ///
    /// [`crate::error::ModelError::NumericalInstability`] if the new state
    /// blows up; the state is then unchanged.
    pub fn step(&mut self) -> ModelResult<StabilityStatus> {
        let tendencies = self.tendencies()?;
        self.integrator.step(&tendencies)
    }

    /// Take `n_steps` steps, stopping at the first error.
    pub fn run(&mut self, n_steps: usize) -> SimulationResult {
        self.run_with_callback(n_steps, 0, |_| {})
    }

    /// Like [`Self::run`], calling `callback` every `interval` steps
    /// (never if `interval` is 0).
    pub fn run_with_callback<F>(&mut self, n_steps: usize, interval: usize, mut callback: F) -> SimulationResult
    where
        F: FnMut(&Self),
    {
        let start = std::time::Instant::now();
        log::info!(
            "Running {} steps from t = {} s ({})",
            n_steps,
            self.time(),
            self.physics.description()
        );

        for n in 0..n_steps {
            if let Err(err) = self.step() {
                let wall_time = start.elapsed().as_secs_f64();
                log::warn!("Run stopped after {} of {} steps: {}", n, n_steps, err);
                return SimulationResult::failure(n, self.time(), wall_time, err.to_string());
            }
            if interval > 0 && (n + 1) % interval == 0 {
                callback(self);
            }
        }

        let wall_time = start.elapsed().as_secs_f64();
        log::info!(
            "Finished {} steps at t = {} s in {:.2} s wall time",
            n_steps,
            self.time(),
            wall_time
        );
        SimulationResult::success(n_steps, self.time(), wall_time)
    }

    /// Grid diagnostics of the present state.
    pub fn diagnose(&self) -> GridDiagnostics<NF> {
        diagnose(self.integrator.present(), &self.transform)
    }

    pub fn global_diagnostics(&self) -> GlobalDiagnostics {
        self.diagnose().global(&self.geometry)
    }
}
