//! Vertical velocity, pressure velocity and vertical advection in σ.
//!
//! All operators act on whole levels of grid fields. With
//! `G_k = D_k + u_k·∇ ln p_s`:
//!
//! - `σ̇_{k+1/2} = σ_{k+1/2} Σ_r Δσ_r G_r − Σ_{r≤k} Δσ_r G_r`, zero at the
//!   model top and the surface
//! - `(ω/p)_k = u_k·∇ln p_s − (Σ_{r<k} Δσ_r G_r + ½ Δσ_k G_k) / σ_k`
//! - `VA_k(X) = [σ̇_{k+1/2}(X_{k+1} − X_k) + σ̇_{k−1/2}(X_k − X_{k−1})] / (2Δσ_k)`

use crate::geometry::VerticalCoordinates;
use crate::spectral::GridField;
use crate::types::{convert_slice, NumberFormat};

/// σ-level constants in the run's number format.
#[derive(Clone, Debug)]
pub struct VerticalOperators<NF> {
    sigma_full: Vec<NF>,
    sigma_half: Vec<NF>,
    thickness: Vec<NF>,
}

impl<NF: NumberFormat> VerticalOperators<NF> {
    pub fn new(vertical: &VerticalCoordinates) -> Self {
        Self {
            sigma_full: convert_slice(vertical.full_levels()),
            sigma_half: convert_slice(vertical.half_levels()),
            thickness: convert_slice(vertical.thickness()),
        }
    }

    #[inline]
    pub fn n_levels(&self) -> usize {
        self.thickness.len()
    }

    #[inline]
    pub fn thickness(&self) -> &[NF] {
        &self.thickness
    }

    /// `Σ_k Δσ_k X_k`.
    pub fn vertical_integral(&self, x: &[GridField<NF>]) -> GridField<NF> {
        let mut sum = GridField::zeros(x[0].nlon(), x[0].nlat());
        for (xk, &dk) in x.iter().zip(&self.thickness) {
            sum.axpy(dk, xk);
        }
        sum
    }

    /// `σ̇` at the interior half levels `k + 1/2`, `k = 0..n−1`.
    ///
    /// # Panics
    ///
    /// Panics if `g` does not have one field per level.
    pub fn sigma_dot(&self, g: &[GridField<NF>]) -> Vec<GridField<NF>> {
        assert_eq!(g.len(), self.n_levels(), "one field per level expected");
        let total = self.vertical_integral(g);
        let mut partial = GridField::zeros(total.nlon(), total.nlat());

        let mut out = Vec::with_capacity(self.n_levels().saturating_sub(1));
        for k in 0..self.n_levels().saturating_sub(1) {
            partial.axpy(self.thickness[k], &g[k]);
            let s = self.sigma_half[k + 1];
            out.push(total.zip_map(&partial, |t, p| s * t - p));
        }
        out
    }

    /// `ω/p` on full levels.
    ///
    /// `u_grad_lnps[k]` is `u_k·∇ ln p_s`.
    pub fn omega_over_p(
        &self,
        g: &[GridField<NF>],
        u_grad_lnps: &[GridField<NF>],
    ) -> Vec<GridField<NF>> {
        assert_eq!(g.len(), self.n_levels(), "one field per level expected");
        let half = NF::from_f64_lossy(0.5);
        let mut partial = GridField::zeros(g[0].nlon(), g[0].nlat());

        let mut out = Vec::with_capacity(self.n_levels());
        for k in 0..self.n_levels() {
            let dk = self.thickness[k];
            let inv_sigma = NF::one() / self.sigma_full[k];
            let mut omega = u_grad_lnps[k].clone();
            omega.axpy(-inv_sigma, &partial);
            omega.axpy(-half * dk * inv_sigma, &g[k]);
            out.push(omega);
            partial.axpy(dk, &g[k]);
        }
        out
    }

    /// Centred vertical advection `VA_k(X)` on full levels.
    pub fn vertical_advection(
        &self,
        sigma_dot: &[GridField<NF>],
        x: &[GridField<NF>],
    ) -> Vec<GridField<NF>> {
        let n = self.n_levels();
        assert_eq!(x.len(), n, "one field per level expected");
        assert_eq!(sigma_dot.len() + 1, n, "σ̇ needs n − 1 interior levels");
        let half = NF::from_f64_lossy(0.5);

        (0..n)
            .map(|k| {
                let mut va = GridField::zeros(x[k].nlon(), x[k].nlat());
                let data = va.data_mut();
                if k + 1 < n {
                    let flux = sigma_dot[k].data();
                    let (below, here) = (x[k + 1].data(), x[k].data());
                    for (i, v) in data.iter_mut().enumerate() {
                        *v += flux[i] * (below[i] - here[i]);
                    }
                }
                if k > 0 {
                    let flux = sigma_dot[k - 1].data();
                    let (here, above) = (x[k].data(), x[k - 1].data());
                    for (i, v) in data.iter_mut().enumerate() {
                        *v += flux[i] * (here[i] - above[i]);
                    }
                }
                let scale = half / self.thickness[k];
                data.iter_mut().for_each(|v| *v *= scale);
                va
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ops() -> VerticalOperators<f64> {
        VerticalOperators::new(
            &VerticalCoordinates::from_half_levels(vec![0.0, 0.2, 0.5, 1.0]).unwrap(),
        )
    }

    fn column(values: &[f64]) -> Vec<GridField<f64>> {
        values.iter().map(|&v| GridField::constant(2, 1, v)).collect()
    }

    #[test]
    fn test_sigma_dot_vanishes_for_uniform_convergence() {
        // G constant with height: σ̇ = σ G − σ G = 0
        let sd = ops().sigma_dot(&column(&[1.0, 1.0, 1.0]));
        assert_eq!(sd.len(), 2);
        assert!(sd.iter().all(|f| f.max_abs() < 1e-15));
    }

    #[test]
    fn test_sigma_dot_single_level() {
        // only the top level diverges
        let sd = ops().sigma_dot(&column(&[1.0, 0.0, 0.0]));
        // total = 0.2, σ̇_{1/2+1} = 0.2·0.2 − 0.2
        assert!((sd[0].data()[0] - (0.04 - 0.2)).abs() < 1e-15);
        assert!((sd[1].data()[0] - (0.5 * 0.2 - 0.2)).abs() < 1e-15);
    }

    #[test]
    fn test_vertical_advection_of_constant_is_zero() {
        let op = ops();
        let sd = op.sigma_dot(&column(&[1.0, -2.0, 0.5]));
        let va = op.vertical_advection(&sd, &column(&[3.0, 3.0, 3.0]));
        assert!(va.iter().all(|f| f.max_abs() < 1e-15));
    }

    #[test]
    fn test_omega_without_divergence_is_advection() {
        let op = ops();
        let adv = column(&[0.1, 0.2, 0.3]);
        let omega = op.omega_over_p(&column(&[0.0, 0.0, 0.0]), &adv);
        for (o, a) in omega.iter().zip(&adv) {
            assert_eq!(o.data()[0], a.data()[0]);
        }
    }
}
