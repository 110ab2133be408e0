//! Prognostic state: leapfrog levels, clock and initial conditions.
//!
//! The state is exclusively owned by the time integrator. Other components
//! see the present level through a shared borrow.

mod initial;
mod prognostic;

pub use initial::InitialConditions;
pub use prognostic::PrognosticVariables;

use crate::time::{IntegrationPhase, LeapfrogLevels};
use crate::types::NumberFormat;

/// Past and present prognostic variables plus the model clock.
#[derive(Clone, Debug, PartialEq)]
pub struct PrognosticState<NF> {
    levels: LeapfrogLevels<PrognosticVariables<NF>>,
    step: usize,
    time: f64,
}

impl<NF: NumberFormat> PrognosticState<NF> {
    /// State at `t = 0` with `past = present = initial`.
    pub fn new(initial: PrognosticVariables<NF>) -> Self {
        Self {
            levels: LeapfrogLevels::new(initial),
            step: 0,
            time: 0.0,
        }
    }

    #[inline]
    pub fn present(&self) -> &PrognosticVariables<NF> {
        &self.levels.present
    }

    #[inline]
    pub fn past(&self) -> &PrognosticVariables<NF> {
        &self.levels.past
    }

    #[inline]
    pub fn levels(&self) -> &LeapfrogLevels<PrognosticVariables<NF>> {
        &self.levels
    }

    #[inline]
    pub fn phase(&self) -> IntegrationPhase {
        self.levels.phase()
    }

    /// Number of completed steps.
    #[inline]
    pub fn step(&self) -> usize {
        self.step
    }

    /// Model time in seconds.
    #[inline]
    pub fn time(&self) -> f64 {
        self.time
    }

    /// Commit a finished step: rotate levels and advance the clock by `dt`.
    pub(crate) fn commit(
        &mut self,
        present: PrognosticVariables<NF>,
        future: PrognosticVariables<NF>,
        dt: f64,
    ) {
        self.levels.rotate(present, future);
        self.step += 1;
        self.time += dt;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spectral::Truncation;
    use num_complex::Complex;

    #[test]
    fn test_commit_rotates() {
        let vars = PrognosticVariables::<f64>::zeros(Truncation::triangular(3), 2);
        let mut state = PrognosticState::new(vars.clone());
        assert_eq!(state.phase(), IntegrationPhase::Initialization);
        assert_eq!(state.past(), state.present());

        let mut future = vars.clone();
        future.log_surface_pressure[(0, 0)] = Complex::new(1.0, 0.0);
        state.commit(vars.clone(), future.clone(), 600.0);

        assert_eq!(state.step(), 1);
        assert_eq!(state.time(), 600.0);
        assert_eq!(state.phase(), IntegrationPhase::Stepping);
        assert_eq!(state.present(), &future);
        assert_eq!(state.past(), &vars);
    }
}
