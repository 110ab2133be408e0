//! Spectral transform: grid ↔ spherical-harmonic coefficients.

use std::sync::Arc;

use super::field::SpectralField;
use super::fourier::{fourier_forward, fourier_inverse, FourierCoefficients};
use super::grid_field::GridField;
use super::legendre::{legendre_forward, legendre_inverse, LegendreBasis};
use super::operators::uv_from_vorticity_divergence;
use super::truncation::Truncation;
use crate::geometry::Geometry;
use crate::types::NumberFormat;

/// Forward and inverse spectral transforms on a shared [`Geometry`].
///
/// Holds nothing but the geometry reference, so it is cheap to clone and
/// safe to share across threads.
///
/// Forward transforms are an intentional low-pass filter: anything above
/// the truncation is discarded.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use spectral_gcm::config::ModelConfig;
/// use spectral_gcm::geometry::Geometry;
/// use spectral_gcm::spectral::SpectralTransform;
///
/// let config = ModelConfig::default().with_truncation(15);
/// let geometry = Arc::new(Geometry::<f64>::from_config(&config).unwrap());
/// let transform = SpectralTransform::new(geometry.clone());
///
/// let grid = transform.gridded(&transform.spectral(&transform.zeros_grid()));
/// assert_eq!(grid.nlon(), geometry.nlon());
/// ```
#[derive(Clone, Debug)]
pub struct SpectralTransform<NF> {
    geometry: Arc<Geometry<NF>>,
}

impl<NF: NumberFormat> SpectralTransform<NF> {
    pub fn new(geometry: Arc<Geometry<NF>>) -> Self {
        Self { geometry }
    }

    pub fn geometry(&self) -> &Arc<Geometry<NF>> {
        &self.geometry
    }

    /// All-zero grid field of the geometry's size.
    pub fn zeros_grid(&self) -> GridField<NF> {
        GridField::zeros(self.geometry.nlon(), self.geometry.nlat())
    }

    /// All-zero spectral field of the prognostic shape.
    pub fn zeros_spectral(&self) -> SpectralField<NF> {
        SpectralField::zeros(self.geometry.scalar_truncation())
    }

    fn check_grid(&self, grid: &GridField<NF>) {
        assert!(
            grid.nlon() == self.geometry.nlon() && grid.nlat() == self.geometry.nlat(),
            "grid {}x{} does not match geometry {}x{}",
            grid.nlon(),
            grid.nlat(),
            self.geometry.nlon(),
            self.geometry.nlat()
        );
    }

    // =========================================================================
    // Stages
    // =========================================================================

    /// Fourier stage along every latitude row, `m <= T`.
    pub fn fourier(&self, grid: &GridField<NF>) -> FourierCoefficients<NF> {
        self.check_grid(grid);
        fourier_forward(grid, self.geometry.fourier(), self.geometry.truncation())
    }

    /// Inverse Fourier stage.
    pub fn fourier_inverse(&self, coeffs: &FourierCoefficients<NF>) -> GridField<NF> {
        fourier_inverse(coeffs, self.geometry.fourier())
    }

    /// Legendre stage onto the triangular truncation.
    pub fn legendre(&self, coeffs: &FourierCoefficients<NF>) -> SpectralField<NF> {
        self.legendre_into(coeffs, self.geometry.scalar_truncation(), LegendreBasis::Function)
    }

    /// Legendre stage onto an arbitrary shape and basis.
    pub fn legendre_into(
        &self,
        coeffs: &FourierCoefficients<NF>,
        truncation: Truncation,
        basis: LegendreBasis,
    ) -> SpectralField<NF> {
        legendre_forward(
            coeffs,
            self.geometry.legendre(),
            self.geometry.weights(),
            truncation,
            basis,
        )
    }

    /// Inverse Legendre stage.
    pub fn legendre_inverse(&self, field: &SpectralField<NF>) -> FourierCoefficients<NF> {
        legendre_inverse(field, self.geometry.legendre())
    }

    // =========================================================================
    // Full transforms
    // =========================================================================

    /// Grid → spectral, triangular truncation `T`.
    ///
    /// # Panics
    ///
    /// Panics if the grid does not match the geometry.
    pub fn spectral(&self, grid: &GridField<NF>) -> SpectralField<NF> {
        self.legendre(&self.fourier(grid))
    }

    /// Spectral → grid.
    pub fn gridded(&self, field: &SpectralField<NF>) -> GridField<NF> {
        self.fourier_inverse(&self.legendre_inverse(field))
    }

    /// Forward transform of every level.
    pub fn spectral_layers(&self, grids: &[GridField<NF>]) -> Vec<SpectralField<NF>> {
        grids.iter().map(|g| self.spectral(g)).collect()
    }

    /// Inverse transform of every level.
    pub fn gridded_layers(&self, fields: &[SpectralField<NF>]) -> Vec<GridField<NF>> {
        fields.iter().map(|f| self.gridded(f)).collect()
    }

    // =========================================================================
    // Vector transforms
    // =========================================================================

    /// Fourier coefficients of `X / (a cos²φ)` for a `cos φ`-weighted component.
    fn weighted_fourier(&self, component: &GridField<NF>) -> FourierCoefficients<NF> {
        let mut coeffs = self.fourier(component);
        let inv_a = self.geometry.constants().inv_radius;
        let factors: Vec<NF> = self
            .geometry
            .inv_cos_sq_lat()
            .iter()
            .map(|&s| s * inv_a)
            .collect();
        coeffs.scale_rows(&factors);
        coeffs
    }

    /// Divergence and curl of a vector given by its `cos φ`-weighted
    /// components `U = u cos φ`, `V = v cos φ`.
    ///
    /// `∇·u = (∂U/∂λ + (1−μ²)∂V/∂μ) / (a cos²φ)` and
    /// `k·∇×u = (∂V/∂λ − (1−μ²)∂U/∂μ) / (a cos²φ)`. The meridional
    /// derivative is moved onto the basis functions by integration by parts,
    /// which is exact under Gaussian quadrature.
    pub fn divergence_curl(
        &self,
        u: &GridField<NF>,
        v: &GridField<NF>,
    ) -> (SpectralField<NF>, SpectralField<NF>) {
        let fu = self.weighted_fourier(u);
        let fv = self.weighted_fourier(v);
        let shape = self.geometry.scalar_truncation();

        let div = self.weighted_divergence(&fu, &fv);
        let mut curl = self.legendre_into(&fv.zonal_derivative(), shape, LegendreBasis::Function);
        curl += &self.legendre_into(&fu, shape, LegendreBasis::Derivative);

        (div, curl)
    }

    /// Divergence only. Same as the first output of [`Self::divergence_curl`].
    pub fn divergence(&self, u: &GridField<NF>, v: &GridField<NF>) -> SpectralField<NF> {
        self.weighted_divergence(&self.weighted_fourier(u), &self.weighted_fourier(v))
    }

    /// `(∂U/∂λ + (1−μ²)∂V/∂μ) / (a cos²φ)` from weighted Fourier coefficients.
    fn weighted_divergence(
        &self,
        fu: &FourierCoefficients<NF>,
        fv: &FourierCoefficients<NF>,
    ) -> SpectralField<NF> {
        let shape = self.geometry.scalar_truncation();
        let mut div = self.legendre_into(&fu.zonal_derivative(), shape, LegendreBasis::Function);
        div -= &self.legendre_into(fv, shape, LegendreBasis::Derivative);
        div
    }

    /// Grid `U = u cos φ` and `V = v cos φ` from spectral vorticity and divergence.
    pub fn velocity_grids(
        &self,
        vorticity: &SpectralField<NF>,
        divergence: &SpectralField<NF>,
    ) -> (GridField<NF>, GridField<NF>) {
        let (u, v) = uv_from_vorticity_divergence(
            vorticity,
            divergence,
            self.geometry.legendre(),
            self.geometry.radius(),
        );
        (self.gridded(&u), self.gridded(&v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ModelConfig;
    use num_complex::Complex;

    fn transform(t: usize) -> SpectralTransform<f64> {
        let config = ModelConfig::default().with_truncation(t).with_levels(1);
        SpectralTransform::new(Arc::new(Geometry::from_config(&config).unwrap()))
    }

    #[test]
    fn test_round_trip_random_coefficients() {
        let tr = transform(10);
        let trunc = tr.geometry().scalar_truncation();
        let field = SpectralField::from_fn(trunc, |m, n| {
            let x = ((7 * m + 13 * n) % 11) as f64 / 11.0 - 0.5;
            Complex::new(x, if m == 0 { 0.0 } else { 0.5 * x })
        });
        let back = tr.spectral(&tr.gridded(&field));
        assert!(back.max_abs_diff(&field) < 1e-13);
    }

    #[test]
    fn test_velocity_divergence_curl_consistency() {
        let tr = transform(8);
        let trunc = tr.geometry().scalar_truncation();
        let scale = 1e-5;
        let zeta = SpectralField::from_fn(trunc, |m, n| {
            if n == 0 {
                Complex::new(0.0, 0.0)
            } else {
                Complex::new(scale / (1 + m + n) as f64, if m == 0 { 0.0 } else { scale * 0.3 })
            }
        });
        let div = SpectralField::from_fn(trunc, |m, n| {
            if n == 0 {
                Complex::new(0.0, 0.0)
            } else {
                Complex::new(-scale * 0.2, if m == 0 { 0.0 } else { scale / (2 + n) as f64 })
            }
        });
        let (u, v) = tr.velocity_grids(&zeta, &div);
        let (d2, z2) = tr.divergence_curl(&u, &v);
        assert!(d2.max_abs_diff(&div) < 1e-12 * scale * 1e3);
        assert!(z2.max_abs_diff(&zeta) < 1e-12 * scale * 1e3);
    }

    #[test]
    fn test_divergence_matches_divergence_curl() {
        let tr = transform(6);
        let g = tr.geometry();
        let u = GridField::from_fn(g.nlon(), g.nlat(), |i, j| {
            (0.3 * i as f64).sin() * (1.0 + 0.1 * j as f64)
        });
        let v = GridField::from_fn(g.nlon(), g.nlat(), |i, j| (0.2 * (i + j) as f64).cos());
        let (div, _) = tr.divergence_curl(&u, &v);
        assert_eq!(tr.divergence(&u, &v), div);
    }
}
