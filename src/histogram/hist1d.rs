//! One-dimensional histogram.

use std::io::{self, Write};

use super::axis::BinAxis;
use super::Accumulator;
use crate::error::Result;

/// A 1-D histogram with under- and overrange bins.
///
/// `Histogram1<u64>` counts events, `Histogram1<f64>` sums weights.
#[derive(Clone, Debug, PartialEq)]
pub struct Histogram1<T: Accumulator> {
    axis: BinAxis,
    values: Vec<T>,
}

impl<T: Accumulator> Histogram1<T> {
    /// `n_bins` equal-width bins over `[min, max)`.
    pub fn new(min: f64, max: f64, n_bins: usize) -> Result<Self> {
        Ok(Self::from_axis(BinAxis::uniform(min, max, n_bins)?))
    }

    /// Bins with the given lower edges; `max` closes the top bin.
    pub fn with_edges(bin_mins: &[f64], max: f64) -> Result<Self> {
        Ok(Self::from_axis(BinAxis::from_edges(bin_mins, max)?))
    }

    /// An empty histogram over `axis`.
    pub fn from_axis(axis: BinAxis) -> Self {
        let values = vec![T::default(); axis.slot_count()];
        Self { axis, values }
    }

    /// Adds `amount` to the bin containing `x`.
    #[inline]
    pub fn accumulate(&mut self, x: f64, amount: T) {
        let slot = self.axis.slot(x);
        self.values[slot] += amount;
    }

    /// Zeroes every bin without reallocating.
    pub fn clear(&mut self) {
        self.values.fill(T::default());
    }

    /// Deep copy of the current state.
    pub fn snapshot(&self) -> Self {
        self.clone()
    }

    pub fn axis(&self) -> &BinAxis {
        &self.axis
    }

    pub fn bin(&self, x: f64) -> isize {
        self.axis.bin(x)
    }

    pub fn bin_count(&self) -> usize {
        self.axis.bin_count()
    }

    pub fn min_value(&self, bin: isize) -> f64 {
        self.axis.min_value(bin)
    }

    pub fn max_value(&self, bin: isize) -> f64 {
        self.axis.max_value(bin)
    }

    pub fn mid_value(&self, bin: isize) -> f64 {
        self.axis.mid_value(bin)
    }

    /// Content of `bin`, in `-1..=n`.
    pub fn value(&self, bin: isize) -> T {
        self.values[(bin + 1) as usize]
    }

    /// Content of the underrange bin.
    pub fn underrange(&self) -> T {
        self.values[0]
    }

    /// Content of the overrange bin.
    pub fn overrange(&self) -> T {
        self.values[self.values.len() - 1]
    }

    /// Sum over every bin, sentinels included.
    pub fn total(&self) -> T {
        self.values.iter().copied().sum()
    }

    /// Raw storage, underrange first and overrange last.
    pub fn values(&self) -> &[T] {
        &self.values
    }

    /// `(lower edge, content)` for each real bin.
    pub fn get_array(&self) -> Vec<(f64, T)> {
        self.axis
            .bin_mins()
            .iter()
            .zip(&self.values[1..self.values.len() - 1])
            .map(|(&min, &v)| (min, v))
            .collect()
    }

    /// Writes one `min,value` line per bin, from underrange to overrange.
    pub fn dump<W: Write>(&self, mut out: W) -> io::Result<()> {
        for bin in -1..=self.bin_count() as isize {
            writeln!(out, "{},{}", self.min_value(bin), self.value(bin))?;
        }
        out.flush()
    }
}

impl Histogram1<u64> {
    /// Counts one event at `x`.
    #[inline]
    pub fn add(&mut self, x: f64) {
        self.accumulate(x, 1);
    }

    pub fn counts(&self, bin: isize) -> u64 {
        self.value(bin)
    }

    pub fn total_count(&self) -> u64 {
        self.total()
    }
}

impl Histogram1<f64> {
    /// Adds `weight` to the bin containing `x`.
    #[inline]
    pub fn add(&mut self, x: f64, weight: f64) {
        self.accumulate(x, weight);
    }

    pub fn sum(&self, bin: isize) -> f64 {
        self.value(bin)
    }

    pub fn total_sum(&self) -> f64 {
        self.total()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::histogram::{Histogram1D, HistogramWeighted1D};

    #[test]
    fn counts_land_in_expected_bins() {
        let mut h = Histogram1D::new(0.0, 10.0, 10).unwrap();
        h.add(-0.5);
        h.add(0.0);
        h.add(9.999);
        h.add(10.0);
        h.add(42.0);
        assert_eq!(h.underrange(), 1);
        assert_eq!(h.counts(0), 1);
        assert_eq!(h.counts(9), 1);
        assert_eq!(h.overrange(), 2);
        assert_eq!(h.total_count(), 5);
    }

    #[test]
    fn weighted_sums_accumulate() {
        let mut h = HistogramWeighted1D::new(0.0, 4.0, 4).unwrap();
        h.add(1.5, 0.25);
        h.add(1.2, 0.5);
        h.add(-3.0, 2.0);
        assert_eq!(h.sum(1), 0.75);
        assert_eq!(h.underrange(), 2.0);
        assert_eq!(h.total_sum(), 2.75);
    }

    #[test]
    fn clear_is_idempotent() {
        let mut h = Histogram1D::new(0.0, 1.0, 2).unwrap();
        h.add(0.2);
        h.clear();
        assert_eq!(h.total_count(), 0);
        h.clear();
        assert_eq!(h.total_count(), 0);
        assert_eq!(h.values().len(), 4);
    }

    #[test]
    fn snapshot_is_independent() {
        let mut h = Histogram1D::new(0.0, 1.0, 2).unwrap();
        h.add(0.2);
        let mut copy = h.snapshot();
        copy.add(0.7);
        assert_eq!(h.total_count(), 1);
        assert_eq!(copy.total_count(), 2);
        h.clear();
        assert_eq!(copy.counts(0), 1);
    }

    #[test]
    fn get_array_skips_sentinels() {
        let mut h = HistogramWeighted1D::new(0.0, 3.0, 3).unwrap();
        h.add(2.5, 4.0);
        h.add(7.0, 1.0);
        assert_eq!(h.get_array(), vec![(0.0, 0.0), (1.0, 0.0), (2.0, 4.0)]);
    }

    #[test]
    fn dump_writes_one_line_per_slot() {
        let mut h = Histogram1D::new(0.0, 2.0, 2).unwrap();
        h.add(1.0);
        let mut out = Vec::new();
        h.dump(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines, vec!["-inf,0", "0,0", "1,1", "2,0"]);
    }
}
