//! Tendencies returned by parameterizations.

use crate::dynamics::TendencyContribution;
use crate::spectral::GridField;

/// Optional tendencies of every prognostic quantity.
///
/// Momentum is given as grid `du/dt`, `dv/dt` in m/s² per level (not
/// `cos φ`-weighted). `None` means no contribution.
#[derive(Clone, Debug, PartialEq)]
pub struct PhysicsTendencies<NF> {
    momentum: Option<(Vec<GridField<NF>>, Vec<GridField<NF>>)>,
    /// K/s per level.
    pub temperature: Option<Vec<TendencyContribution<NF>>>,
    /// kg/kg/s per level.
    pub humidity: Option<Vec<TendencyContribution<NF>>>,
    /// 1/s.
    pub log_surface_pressure: Option<TendencyContribution<NF>>,
}

impl<NF> Default for PhysicsTendencies<NF> {
    fn default() -> Self {
        Self::none()
    }
}

impl<NF> PhysicsTendencies<NF> {
    /// No contribution at all.
    pub fn none() -> Self {
        Self {
            momentum: None,
            temperature: None,
            humidity: None,
            log_surface_pressure: None,
        }
    }

    pub fn with_momentum(mut self, du: Vec<GridField<NF>>, dv: Vec<GridField<NF>>) -> Self {
        self.momentum = Some((du, dv));
        self
    }

    pub fn with_temperature(mut self, temperature: Vec<TendencyContribution<NF>>) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_humidity(mut self, humidity: Vec<TendencyContribution<NF>>) -> Self {
        self.humidity = Some(humidity);
        self
    }

    pub fn with_log_surface_pressure(mut self, lnps: TendencyContribution<NF>) -> Self {
        self.log_surface_pressure = Some(lnps);
        self
    }

    /// `(du/dt, dv/dt)` per level.
    pub fn momentum(&self) -> Option<(&[GridField<NF>], &[GridField<NF>])> {
        self.momentum
            .as_ref()
            .map(|(du, dv)| (du.as_slice(), dv.as_slice()))
    }

    pub fn is_empty(&self) -> bool {
        self.momentum.is_none()
            && self.temperature.is_none()
            && self.humidity.is_none()
            && self.log_surface_pressure.is_none()
    }
}
