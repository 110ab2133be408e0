//! Leapfrog time stepping with the Robert–Asselin–Williams filter.
//!
//! The scheme keeps two stored levels, `past` and `present`. Each step
//! builds `future = past + Δ·δ` with `Δ = 2Δt`, filters the middle level
//! and rotates. The very first step has no valid past level and is taken
//! as a forward-Euler step of `Δt` from `past = present`; it is flagged
//! by [`IntegrationPhase::Initialization`] and never filtered.

use num_traits::One;
use serde::{Deserialize, Serialize};

use super::integrator::{Integrable, IntegratorInfo, TimeScheme};
use crate::types::NumberFormat;

/// Which branch of the scheme the next step takes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntegrationPhase {
    /// No step taken yet; the next step is a forward-Euler step of `Δt`.
    Initialization,
    /// Centred leapfrog steps of `2Δt`.
    Stepping,
}

impl IntegrationPhase {
    /// Multiplier of `Δt` in `future = past + Δ·δ`.
    #[inline]
    pub fn step_factor(self) -> usize {
        match self {
            Self::Initialization => 1,
            Self::Stepping => 2,
        }
    }
}

/// Past and present time levels of a leapfrog integration.
#[derive(Clone, Debug, PartialEq)]
pub struct LeapfrogLevels<S> {
    pub past: S,
    pub present: S,
    phase: IntegrationPhase,
}

impl<S: Integrable> LeapfrogLevels<S> {
    /// Levels at `t = 0`: `past = present = initial`.
    pub fn new(initial: S) -> Self {
        Self {
            past: initial.clone(),
            present: initial,
            phase: IntegrationPhase::Initialization,
        }
    }

    #[inline]
    pub fn phase(&self) -> IntegrationPhase {
        self.phase
    }

    /// `past ← present`, `present ← future`.
    pub fn rotate(&mut self, present: S, future: S) {
        self.past = present;
        self.present = future;
        self.phase = IntegrationPhase::Stepping;
    }
}

/// Robert–Asselin filter with the Williams correction.
///
/// With `d = ν/2 (past − 2 present + future)`:
/// `present += α d` and `future −= (1 − α) d`. `α = 1` is the classic
/// Robert–Asselin filter; `α = 0.5` conserves the three-level mean.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RobertAsselinWilliams {
    /// Filter strength `ν`.
    pub robert: f64,
    /// Williams factor `α`.
    pub williams: f64,
}

impl Default for RobertAsselinWilliams {
    fn default() -> Self {
        Self {
            robert: 0.05,
            williams: 0.53,
        }
    }
}

impl RobertAsselinWilliams {
    pub fn new(robert: f64, williams: f64) -> Self {
        Self { robert, williams }
    }

    /// Filter `present` and `future` in place.
    pub fn apply<S: Integrable>(&self, past: &S, present: &mut S, future: &mut S) {
        let one = S::Scalar::one();
        let two = one + one;

        let mut d = past.clone();
        d.axpy(-two, present);
        d.axpy(one, future);
        d.scale(S::Scalar::from_f64_lossy(0.5 * self.robert));

        present.axpy(S::Scalar::from_f64_lossy(self.williams), &d);
        future.axpy(S::Scalar::from_f64_lossy(self.williams - 1.0), &d);
    }
}

/// The filtered leapfrog scheme.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Leapfrog {
    pub filter: RobertAsselinWilliams,
}

impl Leapfrog {
    pub fn new(filter: RobertAsselinWilliams) -> Self {
        Self { filter }
    }

    /// Effective step `Δ` for the given phase.
    #[inline]
    pub fn step_size<NF: NumberFormat>(phase: IntegrationPhase, dt: NF) -> NF {
        dt * NF::from_usize_lossy(phase.step_factor())
    }

    /// Unfiltered `future = past + Δ·tendency`.
    pub fn future<S: Integrable>(&self, levels: &LeapfrogLevels<S>, tendency: &S, dt: S::Scalar) -> S {
        let mut future = levels.past.clone();
        future.axpy(Self::step_size(levels.phase, dt), tendency);
        future
    }

    /// Levels after one step with the given tendency, filtered on
    /// leapfrog steps only. `levels` is left untouched.
    pub fn advance<S: Integrable>(
        &self,
        levels: &LeapfrogLevels<S>,
        tendency: &S,
        dt: S::Scalar,
    ) -> LeapfrogLevels<S> {
        let mut future = self.future(levels, tendency, dt);
        let mut present = levels.present.clone();
        if levels.phase == IntegrationPhase::Stepping {
            self.filter.apply(&levels.past, &mut present, &mut future);
        }
        let mut next = levels.clone();
        next.rotate(present, future);
        next
    }
}

impl IntegratorInfo for Leapfrog {
    fn name(&self) -> &'static str {
        "Leapfrog-RAW"
    }

    fn order(&self) -> usize {
        2
    }

    fn n_levels(&self) -> usize {
        2
    }
}

impl<S: Integrable> TimeScheme<S> for Leapfrog {
    fn step<F>(&self, levels: &mut LeapfrogLevels<S>, dt: S::Scalar, rhs: F)
    where
        F: Fn(&S) -> S,
    {
        let tendency = rhs(&levels.present);
        *levels = self.advance(levels, &tendency, dt);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_complex::Complex;

    fn oscillate(dt: f64, n_steps: usize) -> Complex<f64> {
        let scheme = Leapfrog::default();
        let mut levels = LeapfrogLevels::new(Complex::new(1.0, 0.0));
        for _ in 0..n_steps {
            scheme.step(&mut levels, dt, |f| f * Complex::new(0.0, 1.0));
        }
        levels.present
    }

    #[test]
    fn test_first_step_is_euler() {
        let scheme = Leapfrog::default();
        let levels = LeapfrogLevels::new(Complex::new(1.0_f64, 0.0));
        assert_eq!(levels.phase(), IntegrationPhase::Initialization);

        let next = scheme.advance(&levels, &Complex::new(0.0, 1.0), 0.1);
        assert_eq!(next.phase(), IntegrationPhase::Stepping);
        assert_eq!(next.past, Complex::new(1.0, 0.0));
        assert_eq!(next.present, Complex::new(1.0, 0.1));
        // input untouched
        assert_eq!(levels.phase(), IntegrationPhase::Initialization);
    }

    #[test]
    fn test_oscillation_amplitude() {
        let z = oscillate(0.01, 1000);
        assert!((z.norm() - 1.0).abs() < 0.01, "amplitude {}", z.norm());
    }

    #[test]
    fn test_error_shrinks_with_dt() {
        let exact = Complex::new(1.0_f64.cos(), 1.0_f64.sin());
        let coarse = (oscillate(0.01, 100) - exact).norm();
        let fine = (oscillate(0.005, 200) - exact).norm();
        assert!(coarse / fine > 3.5, "ratio {}", coarse / fine);
    }

    #[test]
    fn test_filter_leaves_linear_trend() {
        let filter = RobertAsselinWilliams::default();
        let past = 1.0_f64;
        let mut present = Complex::new(2.0, 0.0);
        let mut future = Complex::new(3.0, 0.0);
        filter.apply(&Complex::new(past, 0.0), &mut present, &mut future);
        assert_eq!(present, Complex::new(2.0, 0.0));
        assert_eq!(future, Complex::new(3.0, 0.0));
    }

    #[test]
    fn test_filter_damps_computational_mode() {
        let filter = RobertAsselinWilliams::new(0.1, 1.0);
        let mut present = Complex::new(-1.0_f64, 0.0);
        let mut future = Complex::new(1.0, 0.0);
        filter.apply(&Complex::new(1.0, 0.0), &mut present, &mut future);
        assert!((present.re + 0.8).abs() < 1e-15);
        assert_eq!(future, Complex::new(1.0, 0.0));
    }
}
