//! Spectral prognostic variables at one time level.

use crate::spectral::{SpectralField, Truncation};
use crate::time::Integrable;
use crate::types::{NumberFormat, PrognosticVariable};

/// Vorticity, divergence, temperature and humidity per level, plus the
/// single-level logarithm of surface pressure.
///
/// Level 0 is the model top.
#[derive(Clone, Debug, PartialEq)]
pub struct PrognosticVariables<NF> {
    pub vorticity: Vec<SpectralField<NF>>,
    pub divergence: Vec<SpectralField<NF>>,
    pub temperature: Vec<SpectralField<NF>>,
    pub humidity: Vec<SpectralField<NF>>,
    pub log_surface_pressure: SpectralField<NF>,
}

impl<NF: NumberFormat> PrognosticVariables<NF> {
    /// All-zero variables.
    pub fn zeros(truncation: Truncation, n_levels: usize) -> Self {
        let layer = || vec![SpectralField::zeros(truncation); n_levels];
        Self {
            vorticity: layer(),
            divergence: layer(),
            temperature: layer(),
            humidity: layer(),
            log_surface_pressure: SpectralField::zeros(truncation),
        }
    }

    #[inline]
    pub fn n_levels(&self) -> usize {
        self.vorticity.len()
    }

    #[inline]
    pub fn truncation(&self) -> Truncation {
        self.log_surface_pressure.truncation()
    }

    /// Fields of one variable, a single field for log surface pressure.
    pub fn layers(&self, variable: PrognosticVariable) -> &[SpectralField<NF>] {
        match variable {
            PrognosticVariable::Vorticity => &self.vorticity,
            PrognosticVariable::Divergence => &self.divergence,
            PrognosticVariable::Temperature => &self.temperature,
            PrognosticVariable::Humidity => &self.humidity,
            PrognosticVariable::LogSurfacePressure => {
                std::slice::from_ref(&self.log_surface_pressure)
            }
        }
    }

    /// Mutable fields of one variable.
    pub fn layers_mut(&mut self, variable: PrognosticVariable) -> &mut [SpectralField<NF>] {
        match variable {
            PrognosticVariable::Vorticity => &mut self.vorticity,
            PrognosticVariable::Divergence => &mut self.divergence,
            PrognosticVariable::Temperature => &mut self.temperature,
            PrognosticVariable::Humidity => &mut self.humidity,
            PrognosticVariable::LogSurfacePressure => {
                std::slice::from_mut(&mut self.log_surface_pressure)
            }
        }
    }

    /// Every field tagged with its variable and level (`None` for log surface pressure).
    pub fn iter_fields(
        &self,
    ) -> impl Iterator<Item = (PrognosticVariable, Option<usize>, &SpectralField<NF>)> + '_ {
        PrognosticVariable::ALL.into_iter().flat_map(move |var| {
            self.layers(var)
                .iter()
                .enumerate()
                .map(move |(k, f)| (var, var.is_layered().then_some(k), f))
        })
    }

    fn iter_fields_mut(&mut self) -> impl Iterator<Item = &mut SpectralField<NF>> + '_ {
        self.vorticity
            .iter_mut()
            .chain(self.divergence.iter_mut())
            .chain(self.temperature.iter_mut())
            .chain(self.humidity.iter_mut())
            .chain(std::iter::once(&mut self.log_surface_pressure))
    }

    /// Largest coefficient modulus of a variable over all levels.
    pub fn max_abs(&self, variable: PrognosticVariable) -> NF {
        self.layers(variable)
            .iter()
            .map(SpectralField::max_abs)
            .fold(NF::zero(), |acc, x| {
                if acc.is_nan() || x.is_nan() {
                    NF::nan()
                } else {
                    acc.max(x)
                }
            })
    }

    pub fn is_finite(&self) -> bool {
        self.iter_fields().all(|(_, _, f)| f.is_finite())
    }
}

impl<NF: NumberFormat> Integrable for PrognosticVariables<NF> {
    type Scalar = NF;

    fn scale(&mut self, c: NF) {
        self.iter_fields_mut().for_each(|f| f.scale(c));
    }

    fn axpy(&mut self, c: NF, other: &Self) {
        assert_eq!(self.n_levels(), other.n_levels(), "level count mismatch");
        let others = other
            .vorticity
            .iter()
            .chain(&other.divergence)
            .chain(&other.temperature)
            .chain(&other.humidity)
            .chain(std::iter::once(&other.log_surface_pressure));
        for (a, b) in self.iter_fields_mut().zip(others) {
            a.axpy(c, b);
        }
    }

    fn zeros_like(&self) -> Self {
        Self::zeros(self.truncation(), self.n_levels())
    }
}
