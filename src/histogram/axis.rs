//! One histogram dimension: sorted lower edges plus an explicit maximum.

use std::cmp::Ordering;

use crate::error::{Error, Result};

/// Returns `n` equally spaced lower bin edges covering `[min, max)`.
///
/// Fails if `min >= max` or `n < 1`.
pub fn make_bins(min: f64, max: f64, n: usize) -> Result<Vec<f64>> {
    if !(min < max) {
        return Err(Error::invalid(format!("min must be below max: {} >= {}", min, max)));
    }
    if n < 1 {
        return Err(Error::invalid(format!("bins < 1: {}", n)));
    }
    let delta = (max - min) / n as f64;
    Ok((0..n).map(|i| min + i as f64 * delta).collect())
}

/// Bin edges of one axis.
///
/// Holds `n + 1` strictly ascending values. The first `n` are the lower edges
/// of the real bins, the last is the exclusive upper bound of the top bin.
/// Bins are inclusive-lower, exclusive-upper: `edges[i] <= v < edges[i + 1]`
/// falls in bin `i`, `v < edges[0]` in the underrange bin `-1` and
/// `v >= edges[n]` in the overrange bin `n`.
#[derive(Clone, Debug, PartialEq)]
pub struct BinAxis {
    edges: Vec<f64>,
}

impl BinAxis {
    /// `n` equal-width bins over `[min, max)`.
    pub fn uniform(min: f64, max: f64, n: usize) -> Result<Self> {
        Self::from_edges(&make_bins(min, max, n)?, max)
    }

    /// Build an axis from explicit lower edges and the upper bound of the
    /// top bin. The edges are copied and sorted; `max` must exceed all of them.
    pub fn from_edges(bin_mins: &[f64], max: f64) -> Result<Self> {
        if bin_mins.is_empty() {
            return Err(Error::invalid("at least one bin edge is required"));
        }
        if max.is_nan() || bin_mins.iter().any(|e| e.is_nan()) {
            return Err(Error::invalid("bin edges must not be NaN"));
        }

        let mut edges = Vec::with_capacity(bin_mins.len() + 1);
        edges.extend_from_slice(bin_mins);
        edges.push(max);
        edges.sort_by(|a, b| a.total_cmp(b));

        if edges[edges.len() - 1] != max || edges[edges.len() - 2] == max {
            return Err(Error::invalid(format!(
                "max ({}) is not larger than all bin minima",
                max
            )));
        }
        if edges.windows(2).any(|w| w[0] >= w[1]) {
            return Err(Error::invalid("bin edges must be strictly ascending"));
        }
        Ok(Self { edges })
    }

    /// Bin index of `value`, in `-1..=n`.
    ///
    /// An exact hit on an edge returns the bin that edge opens. NaN lands in
    /// the overrange bin.
    #[inline]
    pub fn bin(&self, value: f64) -> isize {
        let search = self
            .edges
            .binary_search_by(|e| e.partial_cmp(&value).unwrap_or(Ordering::Less));
        match search {
            Ok(i) => i as isize,
            Err(insertion) => insertion as isize - 1,
        }
    }

    /// Storage slot of `value`: `bin(value) + 1`, in `0..n + 2`.
    #[inline]
    pub(crate) fn slot(&self, value: f64) -> usize {
        (self.bin(value) + 1) as usize
    }

    /// Number of real bins (sentinels excluded).
    pub fn bin_count(&self) -> usize {
        self.edges.len() - 1
    }

    /// Number of storage slots, sentinels included.
    pub(crate) fn slot_count(&self) -> usize {
        self.edges.len() + 1
    }

    /// Lower limit of `bin`; `-inf` for the underrange bin.
    ///
    /// # Panics
    ///
    /// If `bin > n`.
    pub fn min_value(&self, bin: isize) -> f64 {
        if bin > -1 {
            self.edges[bin as usize]
        } else {
            f64::NEG_INFINITY
        }
    }

    /// Upper limit of `bin` (excluded from it); `+inf` for the overrange bin.
    pub fn max_value(&self, bin: isize) -> f64 {
        let next = bin + 1;
        if next >= 0 && (next as usize) < self.edges.len() {
            self.edges[next as usize]
        } else {
            f64::INFINITY
        }
    }

    /// Midpoint between the lower and upper limit of `bin`.
    pub fn mid_value(&self, bin: isize) -> f64 {
        (self.min_value(bin) + self.max_value(bin)) / 2.0
    }

    /// All `n + 1` edges, the maximum included.
    pub fn edges(&self) -> &[f64] {
        &self.edges
    }

    /// The `n` lower edges of the real bins.
    pub fn bin_mins(&self) -> &[f64] {
        &self.edges[..self.edges.len() - 1]
    }

    /// Exclusive upper bound of the top real bin.
    pub fn max(&self) -> f64 {
        self.edges[self.edges.len() - 1]
    }
}
