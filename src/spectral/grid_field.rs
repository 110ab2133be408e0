//! Grid-point fields on the Gaussian grid.

use std::ops::{Index, IndexMut};

use crate::error::{ModelError, ModelResult};
use crate::types::NumberFormat;

/// A real field on `nlon × nlat` grid points.
///
/// Stored row by row, one row per latitude (north to south), longitude
/// varying fastest: `data[j * nlon + i]`.
#[derive(Clone, Debug, PartialEq)]
pub struct GridField<NF> {
    nlon: usize,
    nlat: usize,
    data: Vec<NF>,
}

impl<NF: NumberFormat> GridField<NF> {
    /// All-zero field.
    pub fn zeros(nlon: usize, nlat: usize) -> Self {
        Self::constant(nlon, nlat, NF::zero())
    }

    /// Field with the same value everywhere.
    pub fn constant(nlon: usize, nlat: usize, value: NF) -> Self {
        Self {
            nlon,
            nlat,
            data: vec![value; nlon * nlat],
        }
    }

    /// Wrap existing row-major data.
    ///
    /// Fails with [`ModelError::DimensionMismatch`] if `data.len() != nlon * nlat`.
    pub fn from_vec(nlon: usize, nlat: usize, data: Vec<NF>) -> ModelResult<Self> {
        if data.len() != nlon * nlat {
            return Err(ModelError::dimension_mismatch(
                "grid field",
                format!("{} values ({}x{})", nlon * nlat, nlon, nlat),
                data.len(),
            ));
        }
        Ok(Self { nlon, nlat, data })
    }

    /// Field with `f(i, j)` at every point.
    pub fn from_fn<F>(nlon: usize, nlat: usize, mut f: F) -> Self
    where
        F: FnMut(usize, usize) -> NF,
    {
        let mut data = Vec::with_capacity(nlon * nlat);
        for j in 0..nlat {
            for i in 0..nlon {
                data.push(f(i, j));
            }
        }
        Self { nlon, nlat, data }
    }

    #[inline]
    pub fn nlon(&self) -> usize {
        self.nlon
    }

    #[inline]
    pub fn nlat(&self) -> usize {
        self.nlat
    }

    /// One latitude row.
    #[inline]
    pub fn row(&self, j: usize) -> &[NF] {
        &self.data[j * self.nlon..(j + 1) * self.nlon]
    }

    /// One mutable latitude row.
    #[inline]
    pub fn row_mut(&mut self, j: usize) -> &mut [NF] {
        let nlon = self.nlon;
        &mut self.data[j * nlon..(j + 1) * nlon]
    }

    /// Iterate over mutable latitude rows.
    pub fn rows_mut(&mut self) -> std::slice::ChunksExactMut<'_, NF> {
        self.data.chunks_exact_mut(self.nlon)
    }

    /// Iterate over latitude rows.
    pub fn rows(&self) -> std::slice::ChunksExact<'_, NF> {
        self.data.chunks_exact(self.nlon)
    }

    #[inline]
    pub fn data(&self) -> &[NF] {
        &self.data
    }

    #[inline]
    pub fn data_mut(&mut self) -> &mut [NF] {
        &mut self.data
    }

    /// Whether both fields live on the same grid.
    pub fn same_shape(&self, other: &Self) -> bool {
        self.nlon == other.nlon && self.nlat == other.nlat
    }

    /// Apply `f` to every value.
    pub fn map<F>(&self, f: F) -> Self
    where
        F: Fn(NF) -> NF,
    {
        Self {
            nlon: self.nlon,
            nlat: self.nlat,
            data: self.data.iter().map(|&x| f(x)).collect(),
        }
    }

    /// Combine two fields pointwise.
    ///
    /// # Panics
    ///
    /// Panics if the shapes differ.
    pub fn zip_map<F>(&self, other: &Self, f: F) -> Self
    where
        F: Fn(NF, NF) -> NF,
    {
        assert!(self.same_shape(other), "grid shape mismatch");
        Self {
            nlon: self.nlon,
            nlat: self.nlat,
            data: self
                .data
                .iter()
                .zip(&other.data)
                .map(|(&a, &b)| f(a, b))
                .collect(),
        }
    }

    /// `self += c * other`.
    pub fn axpy(&mut self, c: NF, other: &Self) {
        assert!(self.same_shape(other), "grid shape mismatch");
        for (a, &b) in self.data.iter_mut().zip(&other.data) {
            *a += c * b;
        }
    }

    /// Largest absolute value.
    pub fn max_abs(&self) -> NF {
        self.data.iter().fold(NF::zero(), |acc, &x| acc.max(x.abs()))
    }

    /// Whether every value is finite.
    pub fn is_finite(&self) -> bool {
        self.data.iter().all(|x| x.is_finite())
    }

    /// Largest absolute pointwise difference.
    pub fn max_abs_diff(&self, other: &Self) -> NF {
        assert!(self.same_shape(other), "grid shape mismatch");
        self.data
            .iter()
            .zip(&other.data)
            .fold(NF::zero(), |acc, (&a, &b)| acc.max((a - b).abs()))
    }
}

impl<NF> Index<(usize, usize)> for GridField<NF> {
    type Output = NF;

    /// Value at longitude `i`, latitude `j`.
    #[inline]
    fn index(&self, (i, j): (usize, usize)) -> &NF {
        &self.data[j * self.nlon + i]
    }
}

impl<NF> IndexMut<(usize, usize)> for GridField<NF> {
    #[inline]
    fn index_mut(&mut self, (i, j): (usize, usize)) -> &mut NF {
        &mut self.data[j * self.nlon + i]
    }
}
