//! Grid, vertical levels and transform constants.
//!
//! A [`Geometry`] is built once per run for a truncation, grid size, level
//! structure and number format, and shared read-only (behind an `Arc`) by
//! the transform, the boundaries, the dynamics and the integrator.
//!
//! # Example
//!
//! ```
//! use spectral_gcm::config::ModelConfig;
//! use spectral_gcm::geometry::Geometry;
//!
//! let config = ModelConfig::default().with_truncation(10).with_levels(4);
//! let geometry = Geometry::<f32>::from_config(&config).unwrap();
//! assert_eq!(geometry.nlon(), 32);
//! assert_eq!(geometry.nlat(), 16);
//! assert_eq!(geometry.n_levels(), 4);
//! ```

mod grid;
mod tables;
mod vertical;

pub use grid::GridSize;
pub use tables::{FourierTables, LegendreTables};
pub use vertical::{PowerLawStretching, Stretching, UniformStretching, VerticalCoordinates};

use crate::config::{Constants, ModelConfig, PhysicalConstants};
use crate::error::ModelResult;
use crate::polynomial::{gauss_legendre_nodes, gauss_legendre_weights};
use crate::spectral::Truncation;
use crate::types::{convert_slice, NumberFormat};

/// Immutable grid and transform constants.
#[derive(Clone, Debug)]
pub struct Geometry<NF> {
    grid: GridSize,
    vertical: VerticalCoordinates,
    physical: PhysicalConstants,
    constants: Constants<NF>,

    /// Gaussian latitudes in radians, north to south.
    latitudes: Vec<f64>,
    sin_lat: Vec<NF>,
    cos_lat: Vec<NF>,
    /// 1 / cos² φ.
    inv_cos_sq_lat: Vec<NF>,
    weights: Vec<NF>,
    /// Coriolis parameter f = 2Ω sin φ.
    coriolis: Vec<NF>,
    longitudes: Vec<f64>,

    legendre: LegendreTables<NF>,
    fourier: FourierTables<NF>,
}

impl<NF: NumberFormat> Geometry<NF> {
    /// Build from validated grid, levels and constants.
    pub fn new(
        grid: GridSize,
        vertical: VerticalCoordinates,
        physical: PhysicalConstants,
    ) -> ModelResult<Self> {
        physical.validate()?;
        let t = grid.truncation;

        let mu = gauss_legendre_nodes(grid.nlat);
        let weights = gauss_legendre_weights(grid.nlat, &mu);
        let cos: Vec<f64> = mu.iter().map(|&s| (1.0 - s * s).sqrt()).collect();
        let inv_cos_sq: Vec<f64> = mu.iter().map(|&s| 1.0 / (1.0 - s * s)).collect();
        let coriolis: Vec<f64> = mu.iter().map(|&s| 2.0 * physical.rotation * s).collect();
        let longitudes = (0..grid.nlon)
            .map(|i| 2.0 * std::f64::consts::PI * i as f64 / grid.nlon as f64)
            .collect();

        let geometry = Self {
            grid,
            physical,
            constants: Constants::new(&physical),
            latitudes: mu.iter().map(|s| s.asin()).collect(),
            sin_lat: convert_slice(&mu),
            cos_lat: convert_slice(&cos),
            inv_cos_sq_lat: convert_slice(&inv_cos_sq),
            weights: convert_slice(&weights),
            coriolis: convert_slice(&coriolis),
            longitudes,
            legendre: LegendreTables::new(t, &mu),
            fourier: FourierTables::new(grid.nlon, t),
            vertical,
        };

        log::info!(
            "Geometry T{} on {}x{} Gaussian grid, {} levels",
            t,
            grid.nlon,
            grid.nlat,
            geometry.n_levels()
        );
        Ok(geometry)
    }

    /// Build from a run configuration.
    pub fn from_config(config: &ModelConfig) -> ModelResult<Self> {
        let grid = config.spectral.grid_size()?;
        let vertical = VerticalCoordinates::from_config(&config.vertical)?;
        Self::new(grid, vertical, config.physical)
    }

    // =========================================================================
    // Sizes
    // =========================================================================

    /// Spectral truncation `T`.
    #[inline]
    pub fn truncation(&self) -> usize {
        self.grid.truncation
    }

    /// Triangular truncation shape of prognostic fields.
    #[inline]
    pub fn scalar_truncation(&self) -> Truncation {
        Truncation::triangular(self.grid.truncation)
    }

    /// Shape of `cos φ`-weighted vector components.
    #[inline]
    pub fn vector_truncation(&self) -> Truncation {
        Truncation::vector(self.grid.truncation)
    }

    #[inline]
    pub fn nlon(&self) -> usize {
        self.grid.nlon
    }

    #[inline]
    pub fn nlat(&self) -> usize {
        self.grid.nlat
    }

    #[inline]
    pub fn n_levels(&self) -> usize {
        self.vertical.n_levels()
    }

    #[inline]
    pub fn grid_size(&self) -> GridSize {
        self.grid
    }

    // =========================================================================
    // Coordinates
    // =========================================================================

    /// Gaussian latitudes φ_j in radians.
    pub fn latitudes(&self) -> &[f64] {
        &self.latitudes
    }

    /// Longitudes λ_i in radians.
    pub fn longitudes(&self) -> &[f64] {
        &self.longitudes
    }

    /// μ_j = sin φ_j.
    pub fn sin_lat(&self) -> &[NF] {
        &self.sin_lat
    }

    pub fn cos_lat(&self) -> &[NF] {
        &self.cos_lat
    }

    /// 1 / cos² φ_j.
    pub fn inv_cos_sq_lat(&self) -> &[NF] {
        &self.inv_cos_sq_lat
    }

    /// Gaussian quadrature weights, summing to 2.
    pub fn weights(&self) -> &[NF] {
        &self.weights
    }

    /// f = 2Ω sin φ_j.
    pub fn coriolis(&self) -> &[NF] {
        &self.coriolis
    }

    pub fn vertical(&self) -> &VerticalCoordinates {
        &self.vertical
    }

    // =========================================================================
    // Constants
    // =========================================================================

    pub fn physical(&self) -> &PhysicalConstants {
        &self.physical
    }

    pub fn constants(&self) -> &Constants<NF> {
        &self.constants
    }

    #[inline]
    pub fn radius(&self) -> NF {
        self.constants.radius
    }

    pub fn legendre(&self) -> &LegendreTables<NF> {
        &self.legendre
    }

    pub fn fourier(&self) -> &FourierTables<NF> {
        &self.fourier
    }
}
