//! Surface boundary data: orography, land-sea mask and albedo.
//!
//! Boundary arrays are supplied on the Gaussian grid, validated once, and
//! held read-only for the whole run. The surface geopotential enters the
//! dynamics spectrally, so its grid representation is also kept in the
//! truncated form the dynamics actually sees.

use crate::error::{ModelError, ModelResult};
use crate::spectral::{GridField, SpectralField, SpectralTransform};
use crate::types::NumberFormat;

/// Albedo of open ocean.
pub const OCEAN_ALBEDO: f64 = 0.07;

/// Raw boundary arrays, row-major `nlat × nlon` (north to south).
#[derive(Clone, Debug, PartialEq)]
pub struct BoundaryData {
    /// Surface height in m.
    pub orography: Vec<f64>,
    /// Land fraction in `[0, 1]`.
    pub land_sea_mask: Vec<f64>,
    /// Surface albedo in `[0, 1]`.
    pub albedo: Vec<f64>,
}

impl BoundaryData {
    /// Flat all-ocean surface for a `nlon × nlat` grid.
    pub fn aquaplanet(nlon: usize, nlat: usize) -> Self {
        let n = nlon * nlat;
        Self {
            orography: vec![0.0; n],
            land_sea_mask: vec![0.0; n],
            albedo: vec![OCEAN_ALBEDO; n],
        }
    }
}

/// Validated boundary fields in the run's number format.
#[derive(Clone, Debug)]
pub struct Boundaries<NF> {
    /// Surface geopotential `ϕ0 = g·z_s` (m²/s²).
    geopotential: GridField<NF>,
    /// `ϕ0` after a spectral round trip, as seen by the dynamics.
    geopotential_truncated: GridField<NF>,
    geopotential_spectral: SpectralField<NF>,
    land_sea_mask: GridField<NF>,
    albedo: GridField<NF>,
}

impl<NF: NumberFormat> Boundaries<NF> {
    /// Validate boundary arrays against the transform's grid.
    ///
    /// # Errors
    ///
    /// - [`ModelError::DimensionMismatch`] if an array is not `nlon × nlat`
    /// - [`ModelError::Configuration`] if a value is non-finite or the mask or
    ///   albedo leaves `[0, 1]`
    pub fn new(data: &BoundaryData, transform: &SpectralTransform<NF>) -> ModelResult<Self> {
        let geometry = transform.geometry();
        let (nlon, nlat) = (geometry.nlon(), geometry.nlat());

        let grid = |name: &str, values: &[f64], unit_range: bool| -> ModelResult<GridField<NF>> {
            if values.len() != nlon * nlat {
                return Err(ModelError::dimension_mismatch(
                    name,
                    format!("{} values ({}x{})", nlon * nlat, nlon, nlat),
                    values.len(),
                ));
            }
            if let Some(bad) = values
                .iter()
                .find(|x| !x.is_finite() || (unit_range && !(0.0..=1.0).contains(*x)))
            {
                return Err(ModelError::config(format!("{} contains invalid value {}", name, bad)));
            }
            GridField::from_vec(nlon, nlat, values.iter().map(|&x| NF::from_f64_lossy(x)).collect())
        };

        let orography = grid("orography", &data.orography, false)?;
        let land_sea_mask = grid("land-sea mask", &data.land_sea_mask, true)?;
        let albedo = grid("albedo", &data.albedo, true)?;

        let gravity = geometry.constants().gravity;
        let geopotential = orography.map(|z| z * gravity);
        let geopotential_spectral = transform.spectral(&geopotential);
        let geopotential_truncated = transform.gridded(&geopotential_spectral);

        log::debug!(
            "Boundaries on {}x{}: max orography {:.0} m, land fraction {:.2}",
            nlon,
            nlat,
            data.orography.iter().fold(0.0_f64, |a, &b| a.max(b)),
            data.land_sea_mask.iter().sum::<f64>() / (nlon * nlat) as f64
        );

        Ok(Self {
            geopotential,
            geopotential_truncated,
            geopotential_spectral,
            land_sea_mask,
            albedo,
        })
    }

    /// Flat, all-ocean planet.
    pub fn aquaplanet(transform: &SpectralTransform<NF>) -> Self {
        let geometry = transform.geometry();
        let (nlon, nlat) = (geometry.nlon(), geometry.nlat());
        Self {
            geopotential: GridField::zeros(nlon, nlat),
            geopotential_truncated: GridField::zeros(nlon, nlat),
            geopotential_spectral: transform.zeros_spectral(),
            land_sea_mask: GridField::zeros(nlon, nlat),
            albedo: GridField::constant(nlon, nlat, NF::from_f64_lossy(OCEAN_ALBEDO)),
        }
    }

    /// Ocean planet with analytic orography `f(lon, lat)` in metres
    /// (radians in). Points with positive height are land.
    pub fn from_fn<F>(transform: &SpectralTransform<NF>, orography: F) -> ModelResult<Self>
    where
        F: Fn(f64, f64) -> f64,
    {
        let geometry = transform.geometry();
        let (lons, lats) = (geometry.longitudes(), geometry.latitudes());
        let mut data = BoundaryData::aquaplanet(geometry.nlon(), geometry.nlat());
        for (j, &lat) in lats.iter().enumerate() {
            for (i, &lon) in lons.iter().enumerate() {
                let idx = j * lons.len() + i;
                let z = orography(lon, lat);
                data.orography[idx] = z;
                if z > 0.0 {
                    data.land_sea_mask[idx] = 1.0;
                }
            }
        }
        Self::new(&data, transform)
    }

    pub fn geopotential(&self) -> &GridField<NF> {
        &self.geopotential
    }

    pub fn geopotential_truncated(&self) -> &GridField<NF> {
        &self.geopotential_truncated
    }

    /// Spectral surface geopotential.
    pub fn geopotential_spectral(&self) -> &SpectralField<NF> {
        &self.geopotential_spectral
    }

    pub fn land_sea_mask(&self) -> &GridField<NF> {
        &self.land_sea_mask
    }

    pub fn albedo(&self) -> &GridField<NF> {
        &self.albedo
    }

    /// Whether the surface is flat everywhere.
    pub fn is_flat(&self) -> bool {
        self.geopotential.max_abs() == NF::zero()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ModelConfig;
    use crate::geometry::Geometry;
    use std::sync::Arc;

    fn transform() -> SpectralTransform<f64> {
        let config = ModelConfig::default().with_truncation(10).with_levels(2);
        SpectralTransform::new(Arc::new(Geometry::from_config(&config).unwrap()))
    }

    #[test]
    fn test_aquaplanet() {
        let tr = transform();
        let b = Boundaries::aquaplanet(&tr);
        assert!(b.is_flat());
        assert_eq!(b.albedo().max_abs(), OCEAN_ALBEDO);
        assert_eq!(b.geopotential_spectral().max_abs(), 0.0);
    }

    #[test]
    fn test_geopotential_from_orography() {
        let tr = transform();
        let b = Boundaries::from_fn(&tr, |lon, lat| {
            (1000.0 * lat.cos().powi(2) * (2.0 * lon).cos()).max(0.0)
        })
        .unwrap();
        assert!(!b.is_flat());
        let g = tr.geometry().physical().gravity;
        let max_z = b.geopotential().max_abs() / g;
        assert!(max_z <= 1000.0 + 1e-9);
        assert!(b.land_sea_mask().max_abs() == 1.0);
        // the truncated field differs from the raw one but stays close
        let diff = b.geopotential().max_abs_diff(b.geopotential_truncated());
        assert!(diff > 0.0 && diff < 0.5 * b.geopotential().max_abs());
    }

    #[test]
    fn test_smooth_orography_survives_truncation() {
        let tr = transform();
        let b = Boundaries::from_fn(&tr, |_, lat| 500.0 + 200.0 * lat.sin()).unwrap();
        assert!(b.geopotential().max_abs_diff(b.geopotential_truncated()) < 1e-8);
    }

    #[test]
    fn test_invalid_data_rejected() {
        let tr = transform();
        let (nlon, nlat) = (tr.geometry().nlon(), tr.geometry().nlat());

        let mut data = BoundaryData::aquaplanet(nlon, nlat);
        data.albedo[3] = 1.5;
        assert!(matches!(
            Boundaries::new(&data, &tr),
            Err(ModelError::Configuration(_))
        ));

        let mut data = BoundaryData::aquaplanet(nlon, nlat);
        data.orography.pop();
        assert!(matches!(
            Boundaries::new(&data, &tr),
            Err(ModelError::DimensionMismatch { .. })
        ));
    }
}
