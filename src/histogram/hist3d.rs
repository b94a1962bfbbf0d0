//! Three-dimensional histogram.

use std::io::{self, Write};

use super::axis::BinAxis;
use super::Accumulator;
use crate::error::Result;

/// A 3-D histogram with under- and overrange bins on every axis.
///
/// Storage is row-major over `(x slot, y slot, z slot)`.
#[derive(Clone, Debug, PartialEq)]
pub struct Histogram3<T: Accumulator> {
    x: BinAxis,
    y: BinAxis,
    z: BinAxis,
    values: Vec<T>,
}

impl<T: Accumulator> Histogram3<T> {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        x_min: f64,
        x_max: f64,
        x_bins: usize,
        y_min: f64,
        y_max: f64,
        y_bins: usize,
        z_min: f64,
        z_max: f64,
        z_bins: usize,
    ) -> Result<Self> {
        Ok(Self::from_axes(
            BinAxis::uniform(x_min, x_max, x_bins)?,
            BinAxis::uniform(y_min, y_max, y_bins)?,
            BinAxis::uniform(z_min, z_max, z_bins)?,
        ))
    }

    /// Histogram over explicit lower edges per axis, each ending at its `max`.
    pub fn with_edges(
        x_bin_mins: &[f64],
        x_max: f64,
        y_bin_mins: &[f64],
        y_max: f64,
        z_bin_mins: &[f64],
        z_max: f64,
    ) -> Result<Self> {
        Ok(Self::from_axes(
            BinAxis::from_edges(x_bin_mins, x_max)?,
            BinAxis::from_edges(y_bin_mins, y_max)?,
            BinAxis::from_edges(z_bin_mins, z_max)?,
        ))
    }

    pub fn from_axes(x: BinAxis, y: BinAxis, z: BinAxis) -> Self {
        let len = x.slot_count() * y.slot_count() * z.slot_count();
        Self { x, y, z, values: vec![T::default(); len] }
    }

    #[inline]
    fn offset(&self, xs: usize, ys: usize, zs: usize) -> usize {
        (xs * self.y.slot_count() + ys) * self.z.slot_count() + zs
    }

    #[inline]
    pub fn accumulate(&mut self, x: f64, y: f64, z: f64, amount: T) {
        let i = self.offset(self.x.slot(x), self.y.slot(y), self.z.slot(z));
        self.values[i] += amount;
    }

    pub fn clear(&mut self) {
        self.values.fill(T::default());
    }

    pub fn snapshot(&self) -> Self {
        self.clone()
    }

    pub fn x_axis(&self) -> &BinAxis {
        &self.x
    }

    pub fn y_axis(&self) -> &BinAxis {
        &self.y
    }

    pub fn z_axis(&self) -> &BinAxis {
        &self.z
    }

    pub fn x_bin_count(&self) -> usize {
        self.x.bin_count()
    }

    pub fn y_bin_count(&self) -> usize {
        self.y.bin_count()
    }

    pub fn z_bin_count(&self) -> usize {
        self.z.bin_count()
    }

    pub fn x_bin(&self, x: f64) -> isize {
        self.x.bin(x)
    }

    pub fn y_bin(&self, y: f64) -> isize {
        self.y.bin(y)
    }

    pub fn z_bin(&self, z: f64) -> isize {
        self.z.bin(z)
    }

    pub fn x_min_value(&self, bin: isize) -> f64 {
        self.x.min_value(bin)
    }

    pub fn x_max_value(&self, bin: isize) -> f64 {
        self.x.max_value(bin)
    }

    pub fn x_mid_value(&self, bin: isize) -> f64 {
        self.x.mid_value(bin)
    }

    pub fn y_min_value(&self, bin: isize) -> f64 {
        self.y.min_value(bin)
    }

    pub fn y_max_value(&self, bin: isize) -> f64 {
        self.y.max_value(bin)
    }

    pub fn y_mid_value(&self, bin: isize) -> f64 {
        self.y.mid_value(bin)
    }

    pub fn z_min_value(&self, bin: isize) -> f64 {
        self.z.min_value(bin)
    }

    pub fn z_max_value(&self, bin: isize) -> f64 {
        self.z.max_value(bin)
    }

    pub fn z_mid_value(&self, bin: isize) -> f64 {
        self.z.mid_value(bin)
    }

    /// Content of bin `(x_bin, y_bin, z_bin)`, each in `-1..=n`.
    pub fn value(&self, x_bin: isize, y_bin: isize, z_bin: isize) -> T {
        self.values[self.offset((x_bin + 1) as usize, (y_bin + 1) as usize, (z_bin + 1) as usize)]
    }

    pub fn total(&self) -> T {
        self.values.iter().copied().sum()
    }

    /// One matrix per real z bin.
    ///
    /// Slice `k` is `(nx + 1) x (ny + 1)`: `[0][0]` holds the lower z edge of
    /// bin `k`, the rest of row 0 the lower y edges, the rest of column 0 the
    /// lower x edges, and `[i][j]` the content of bin `(i - 1, j - 1, k)`.
    /// Sentinel bins are left out.
    pub fn get_array(&self) -> Vec<Vec<Vec<f64>>> {
        let (nx, ny, nz) = (self.x_bin_count(), self.y_bin_count(), self.z_bin_count());
        let mut array = Vec::with_capacity(nz);
        for k in 0..nz {
            let mut slice = vec![vec![0.0; ny + 1]; nx + 1];
            slice[0][0] = self.z.bin_mins()[k];
            slice[0][1..].copy_from_slice(self.y.bin_mins());
            for i in 1..=nx {
                slice[i][0] = self.x.bin_mins()[i - 1];
                for j in 1..=ny {
                    slice[i][j] = self.value(i as isize - 1, j as isize - 1, k as isize).as_f64();
                }
            }
            array.push(slice);
        }
        array
    }

    /// Writes each `get_array` slice as CSV rows, two blank lines between
    /// slices.
    pub fn dump<W: Write>(&self, mut out: W) -> io::Result<()> {
        for slice in self.get_array() {
            for row in slice {
                for v in row {
                    write!(out, "{},", v)?;
                }
                writeln!(out)?;
            }
            writeln!(out)?;
            writeln!(out)?;
        }
        out.flush()
    }
}

impl Histogram3<u64> {
    #[inline]
    pub fn add(&mut self, x: f64, y: f64, z: f64) {
        self.accumulate(x, y, z, 1);
    }

    pub fn counts(&self, x_bin: isize, y_bin: isize, z_bin: isize) -> u64 {
        self.value(x_bin, y_bin, z_bin)
    }

    pub fn total_count(&self) -> u64 {
        self.total()
    }
}

impl Histogram3<f64> {
    #[inline]
    pub fn add(&mut self, x: f64, y: f64, z: f64, weight: f64) {
        self.accumulate(x, y, z, weight);
    }

    pub fn sum(&self, x_bin: isize, y_bin: isize, z_bin: isize) -> f64 {
        self.value(x_bin, y_bin, z_bin)
    }

    pub fn total_sum(&self) -> f64 {
        self.total()
    }
}

#[cfg(test)]
mod tests {
    use crate::histogram::{Histogram3D, HistogramWeighted3D};

    fn sample() -> Histogram3D {
        Histogram3D::new(0.0, 5.0, 5, 100.0, 150.0, 10, -2.0, 2.0, 4).unwrap()
    }

    #[test]
    fn add_and_count() {
        let mut h = sample();
        h.add(1.0, 125.0, 0.5);
        assert_eq!(h.counts(1, 5, 2), 1);
        assert_eq!(h.total_count(), 1);
        h.add(1.0, 125.0, 10.0);
        assert_eq!(h.counts(1, 5, 4), 1);
    }

    #[test]
    fn array_layout() {
        let mut h = sample();
        h.add(1.0, 125.0, 0.5);
        h.add(-1.0, 125.0, 0.5);
        let array = h.get_array();
        assert_eq!(array.len(), 4);
        assert_eq!(array[0].len(), 6);
        assert_eq!(array[0][0].len(), 11);
        assert_eq!(array[2][0][0], 0.0);
        assert_eq!(array[2][0][1], 100.0);
        assert_eq!(array[2][0][10], 145.0);
        assert_eq!(array[2][2][0], 1.0);
        assert_eq!(array[2][2][6], 1.0);
        let interior: f64 = array.iter().flat_map(|s| s[1..].iter().flat_map(|r| r[1..].iter())).sum();
        assert_eq!(interior, 1.0);
    }

    #[test]
    fn explicit_edges_per_axis() {
        let mut h = Histogram3D::with_edges(&[0.0, 1.0, 4.0], 10.0, &[-1.0, 0.0], 1.0, &[0.0], 2.0).unwrap();
        assert_eq!((h.x_bin_count(), h.y_bin_count(), h.z_bin_count()), (3, 2, 1));
        assert_eq!(h.x_bin(4.0), 2);
        assert_eq!(h.x_bin(10.0), 3);
        assert_eq!(h.y_bin(-0.5), 0);
        assert_eq!(h.z_bin(-0.1), -1);
        assert_eq!(h.x_min_value(1), 1.0);
        assert_eq!(h.x_max_value(1), 4.0);
        assert_eq!(h.x_mid_value(2), 7.0);
        assert_eq!(h.y_max_value(1), 1.0);
        assert_eq!(h.z_mid_value(0), 1.0);
        assert_eq!(h.z_min_value(-1), f64::NEG_INFINITY);
        assert_eq!(h.y_max_value(2), f64::INFINITY);

        h.add(2.0, 0.5, 1.5);
        assert_eq!(h.counts(1, 1, 0), 1);
        assert!(Histogram3D::with_edges(&[0.0, 3.0], 2.0, &[0.0], 1.0, &[0.0], 1.0).is_err());
    }

    #[test]
    fn weighted_clone_is_deep() {
        let mut h = HistogramWeighted3D::new(0.0, 1.0, 1, 0.0, 1.0, 1, 0.0, 1.0, 1).unwrap();
        h.add(0.5, 0.5, 0.5, 2.5);
        let copy = h.snapshot();
        h.add(0.5, 0.5, 0.5, 1.0);
        assert_eq!(copy.sum(0, 0, 0), 2.5);
        assert_eq!(h.sum(0, 0, 0), 3.5);
    }

    #[test]
    fn dump_separates_slices() {
        let h = Histogram3D::new(0.0, 1.0, 1, 0.0, 1.0, 1, 0.0, 2.0, 2).unwrap();
        let mut out = Vec::new();
        h.dump(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text, "0,0,\n0,0,\n\n\n1,0,\n0,0,\n\n\n");
    }
}
