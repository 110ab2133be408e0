//! Semi-implicit leapfrog integrator for the spectral prognostic state.

use super::diffusion::HorizontalDiffusion;
use super::integrator::IntegratorInfo;
use super::leapfrog::{IntegrationPhase, Leapfrog, RobertAsselinWilliams};
use super::semi_implicit::SemiImplicitSolver;
use super::stability::{StabilityMonitor, StabilityStatus};
use crate::config::ModelConfig;
use crate::dynamics::LinearOperators;
use crate::error::{ModelError, ModelResult};
use crate::state::{PrognosticState, PrognosticVariables};
use crate::time::Integrable;
use crate::types::NumberFormat;

/// Owns the prognostic state and advances it one step at a time.
///
/// Per step, with `Δ = Δt` on the initialization step and `2Δt` after:
/// 1. semi-implicit correction of the explicit tendency
/// 2. implicit horizontal diffusion
/// 3. `future = past + Δ δ`
/// 4. Robert–Asselin–Williams filter (leapfrog steps only)
/// 5. stability check of `future`
/// 6. level rotation
///
/// A step that fails the check leaves the state untouched.
#[derive(Clone, Debug)]
pub struct TimeIntegrator<NF> {
    scheme: Leapfrog,
    semi_implicit: SemiImplicitSolver<NF>,
    diffusion: HorizontalDiffusion<NF>,
    monitor: StabilityMonitor,
    state: PrognosticState<NF>,
    dt: f64,
}

impl<NF: NumberFormat> TimeIntegrator<NF> {
    /// Build the integrator around an initial state.
    ///
    /// # Errors
    ///
    /// [`ModelError::DimensionMismatch`] if the state and operators disagree
    /// on the level count, [`ModelError::Configuration`] for a time step that
    /// is not positive and finite.
    pub fn new(
        config: &ModelConfig,
        linear: &LinearOperators,
        initial: PrognosticVariables<NF>,
    ) -> ModelResult<Self> {
        let truncation = initial.truncation().lmax();
        if initial.n_levels() != linear.n_levels() {
            return Err(ModelError::dimension_mismatch(
                "initial state levels",
                linear.n_levels(),
                initial.n_levels(),
            ));
        }
        let dt = config.time.dt_seconds;
        let semi_implicit = SemiImplicitSolver::new(
            linear,
            truncation,
            config.physical.radius,
            dt,
            config.time.implicit_alpha,
        )?;
        let scheme = Leapfrog::new(RobertAsselinWilliams::new(
            config.time.robert_filter,
            config.time.williams_filter,
        ));
        log::debug!(
            "{} integrator, dt = {} s, filter nu = {}, alpha = {}",
            scheme.name(),
            dt,
            config.time.robert_filter,
            config.time.williams_filter
        );

        Ok(Self {
            scheme,
            semi_implicit,
            diffusion: HorizontalDiffusion::new(&config.diffusion, truncation),
            monitor: StabilityMonitor::new(config.stability.clone()),
            state: PrognosticState::new(initial),
            dt,
        })
    }

    #[inline]
    pub fn state(&self) -> &PrognosticState<NF> {
        &self.state
    }

    #[inline]
    pub fn present(&self) -> &PrognosticVariables<NF> {
        self.state.present()
    }

    #[inline]
    pub fn phase(&self) -> IntegrationPhase {
        self.state.phase()
    }

    #[inline]
    pub fn step_count(&self) -> usize {
        self.state.step()
    }

    /// Model time in seconds.
    #[inline]
    pub fn time(&self) -> f64 {
        self.state.time()
    }

    #[inline]
    pub fn time_step(&self) -> f64 {
        self.dt
    }

    pub fn semi_implicit(&self) -> &SemiImplicitSolver<NF> {
        &self.semi_implicit
    }

    pub fn monitor(&self) -> &StabilityMonitor {
        &self.monitor
    }

    /// Change `Δt` and rebuild the semi-implicit operators. The state is kept.
    pub fn set_time_step(&mut self, dt: f64) -> ModelResult<()> {
        self.semi_implicit.set_time_step(dt)?;
        self.dt = dt;
        Ok(())
    }

    /// Effective tendency `δ` for the given state.
    pub fn effective_tendency(
        &self,
        state: &PrognosticState<NF>,
        tendency: &PrognosticVariables<NF>,
    ) -> PrognosticVariables<NF> {
        let phase = state.phase();
        let step = Leapfrog::step_size(phase, NF::from_f64_lossy(self.dt));
        let mut delta = tendency.clone();
        self.semi_implicit
            .solve(&mut delta, state.present(), state.past(), phase);
        self.diffusion.apply(&mut delta, state.past(), step);
        delta
    }

    /// The state one step after `state`. Performs no stability check.
    pub fn advance(
        &self,
        state: &PrognosticState<NF>,
        tendency: &PrognosticVariables<NF>,
    ) -> PrognosticState<NF> {
        if state.phase() == IntegrationPhase::Initialization {
            log::warn!("Taking forward-Euler initialization step of {} s", self.dt);
        }
        let delta = self.effective_tendency(state, tendency);
        let levels = self
            .scheme
            .advance(state.levels(), &delta, NF::from_f64_lossy(self.dt));

        let mut next = state.clone();
        next.commit(levels.past, levels.present, self.dt);
        next
    }

    /// Advance the owned state by one step.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::NumericalInstability`] if the new state is
    /// non-finite or above a stability threshold. The state is then left
    /// as it was before the call.
    pub fn step(&mut self, tendency: &PrognosticVariables<NF>) -> ModelResult<StabilityStatus> {
        if tendency.n_levels() != self.state.present().n_levels()
            || tendency.truncation() != self.state.present().truncation()
        {
            return Err(ModelError::dimension_mismatch(
                "tendency shape",
                format!(
                    "{} levels at {}",
                    self.state.present().n_levels(),
                    self.state.present().truncation()
                ),
                format!("{} levels at {}", tendency.n_levels(), tendency.truncation()),
            ));
        }

        let next = self.advance(&self.state, tendency);
        let status = self.monitor.check(next.present(), next.step());
        if let Some(err) = status.instability() {
            log::warn!("Step {} rejected: {}", next.step(), err);
            return Err(err);
        }
        self.state = next;
        Ok(status)
    }

    /// Zero tendency of the state's shape.
    pub fn zero_tendency(&self) -> PrognosticVariables<NF> {
        self.state.present().zeros_like()
    }
}
