//! Implicit scale-selective horizontal diffusion.
//!
//! `∂X/∂t = −K_l X` with `K_l = (l(l+1) / (T(T+1)))^p / τ`, applied
//! backward in time to the effective tendency:
//! `δ ← (δ − K_l X_past) / (1 + Δ K_l)`.

use crate::config::DiffusionConfig;
use crate::spectral::SpectralField;
use crate::state::PrognosticVariables;
use crate::types::NumberFormat;

/// Per-degree damping rates for vorticity, divergence, temperature and humidity.
#[derive(Clone, Debug)]
pub struct HorizontalDiffusion<NF> {
    enabled: bool,
    /// `K_l` in 1/s.
    rates: Vec<NF>,
}

impl<NF: NumberFormat> HorizontalDiffusion<NF> {
    /// Rates for truncation `T`.
    ///
    /// # Panics
    ///
    /// Panics if `truncation` is zero.
    pub fn new(config: &DiffusionConfig, truncation: usize) -> Self {
        assert!(truncation > 0, "truncation must be positive");
        let largest = (truncation * (truncation + 1)) as f64;
        let time_scale = config.time_scale_hours * 3600.0;
        let rates = (0..=truncation)
            .map(|l| {
                let ratio = (l * (l + 1)) as f64 / largest;
                NF::from_f64_lossy(ratio.powi(config.power as i32) / time_scale)
            })
            .collect();
        Self {
            enabled: config.enabled,
            rates,
        }
    }

    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// `K_l`.
    pub fn rate(&self, degree: usize) -> NF {
        self.rates[degree]
    }

    fn apply_field(&self, delta: &mut SpectralField<NF>, past: &SpectralField<NF>, step: NF) {
        let truncation = delta.truncation();
        for m in 0..=truncation.mmax() {
            let old = past.order(m);
            for ((d, &x), l) in delta.order_mut(m).iter_mut().zip(old).zip(truncation.degrees(m)) {
                let k = self.rates[l];
                *d = (*d - x * k) / (NF::one() + step * k);
            }
        }
    }

    /// Damp the effective tendency in place. `step` is `Δ` (Δt or 2Δt).
    pub fn apply(
        &self,
        delta: &mut PrognosticVariables<NF>,
        past: &PrognosticVariables<NF>,
        step: NF,
    ) {
        if !self.enabled {
            return;
        }
        let layers = delta
            .vorticity
            .iter_mut()
            .zip(&past.vorticity)
            .chain(delta.divergence.iter_mut().zip(&past.divergence))
            .chain(delta.temperature.iter_mut().zip(&past.temperature))
            .chain(delta.humidity.iter_mut().zip(&past.humidity));
        for (d, x) in layers {
            self.apply_field(d, x, step);
        }
    }
}
