//! Two-dimensional histogram with x/y projections.

use std::io::{self, Write};

use super::axis::BinAxis;
use super::hist1d::Histogram1;
use super::Accumulator;
use crate::error::Result;

/// A 2-D histogram; each axis has its own under- and overrange bins.
///
/// Storage is row-major over `(x slot, y slot)`, `(nx + 2) * (ny + 2)` values.
#[derive(Clone, Debug, PartialEq)]
pub struct Histogram2<T: Accumulator> {
    x: BinAxis,
    y: BinAxis,
    values: Vec<T>,
}

impl<T: Accumulator> Histogram2<T> {
    /// Equal-width bins along both axes.
    pub fn new(
        x_min: f64,
        x_max: f64,
        x_bins: usize,
        y_min: f64,
        y_max: f64,
        y_bins: usize,
    ) -> Result<Self> {
        Ok(Self::from_axes(
            BinAxis::uniform(x_min, x_max, x_bins)?,
            BinAxis::uniform(y_min, y_max, y_bins)?,
        ))
    }

    /// Explicit lower edges and maxima along both axes.
    pub fn with_edges(x_bin_mins: &[f64], x_max: f64, y_bin_mins: &[f64], y_max: f64) -> Result<Self> {
        Ok(Self::from_axes(
            BinAxis::from_edges(x_bin_mins, x_max)?,
            BinAxis::from_edges(y_bin_mins, y_max)?,
        ))
    }

    pub fn from_axes(x: BinAxis, y: BinAxis) -> Self {
        let values = vec![T::default(); x.slot_count() * y.slot_count()];
        Self { x, y, values }
    }

    #[inline]
    fn offset(&self, x_slot: usize, y_slot: usize) -> usize {
        x_slot * self.y.slot_count() + y_slot
    }

    /// Adds `amount` to the bin containing `(x, y)`.
    #[inline]
    pub fn accumulate(&mut self, x: f64, y: f64, amount: T) {
        let i = self.offset(self.x.slot(x), self.y.slot(y));
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

    /// Lower x edges followed by the x maximum.
    pub fn x_edges(&self) -> &[f64] {
        self.x.edges()
    }

    pub fn y_edges(&self) -> &[f64] {
        self.y.edges()
    }

    pub fn x_bin(&self, x: f64) -> isize {
        self.x.bin(x)
    }

    pub fn y_bin(&self, y: f64) -> isize {
        self.y.bin(y)
    }

    pub fn x_bin_count(&self) -> usize {
        self.x.bin_count()
    }

    pub fn y_bin_count(&self) -> usize {
        self.y.bin_count()
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

    /// Content of bin `(x_bin, y_bin)`, each in `-1..=n`.
    pub fn value(&self, x_bin: isize, y_bin: isize) -> T {
        self.values[self.offset((x_bin + 1) as usize, (y_bin + 1) as usize)]
    }

    /// Sum over every bin, sentinels included.
    pub fn total(&self) -> T {
        self.values.iter().copied().sum()
    }

    /// Contents as `[x slot][y slot]`, sentinels included.
    pub fn values_array(&self) -> Vec<Vec<T>> {
        self.values
            .chunks(self.y.slot_count())
            .map(|row| row.to_vec())
            .collect()
    }

    /// Distribution along x, summed over every y slot.
    ///
    /// Each slot's content is replayed at its lower x edge into a fresh
    /// histogram sharing the x edges, so sentinels project onto sentinels.
    pub fn x_projection(&self) -> Histogram1<T> {
        let mut h = Histogram1::from_axis(self.x.clone());
        for x_bin in -1..=self.x_bin_count() as isize {
            let at = self.x.min_value(x_bin);
            for y_bin in -1..=self.y_bin_count() as isize {
                h.accumulate(at, self.value(x_bin, y_bin));
            }
        }
        h
    }

    /// Distribution along y, summed over every x slot.
    pub fn y_projection(&self) -> Histogram1<T> {
        let mut h = Histogram1::from_axis(self.y.clone());
        for y_bin in -1..=self.y_bin_count() as isize {
            let at = self.y.min_value(y_bin);
            for x_bin in -1..=self.x_bin_count() as isize {
                h.accumulate(at, self.value(x_bin, y_bin));
            }
        }
        h
    }

    /// Writes a CSV table: a header of y lower edges, then one row per x bin
    /// starting with its lower edge. Sentinel rows and columns are included.
    pub fn dump<W: Write>(&self, mut out: W) -> io::Result<()> {
        write!(out, ",")?;
        for y_bin in -1..=self.y_bin_count() as isize {
            write!(out, "{},", self.y.min_value(y_bin))?;
        }
        writeln!(out)?;

        for x_bin in -1..=self.x_bin_count() as isize {
            write!(out, "{},", self.x.min_value(x_bin))?;
            for y_bin in -1..=self.y_bin_count() as isize {
                write!(out, "{},", self.value(x_bin, y_bin))?;
            }
            writeln!(out)?;
        }
        out.flush()
    }
}

impl Histogram2<u64> {
    #[inline]
    pub fn add(&mut self, x: f64, y: f64) {
        self.accumulate(x, y, 1);
    }

    pub fn counts(&self, x_bin: isize, y_bin: isize) -> u64 {
        self.value(x_bin, y_bin)
    }

    pub fn total_count(&self) -> u64 {
        self.total()
    }
}

impl Histogram2<f64> {
    #[inline]
    pub fn add(&mut self, x: f64, y: f64, weight: f64) {
        self.accumulate(x, y, weight);
    }

    pub fn sum(&self, x_bin: isize, y_bin: isize) -> f64 {
        self.value(x_bin, y_bin)
    }

    pub fn total_sum(&self) -> f64 {
        self.total()
    }
}
