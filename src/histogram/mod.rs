//! Histogram engine: bin axes, accumulators and the 1-D/2-D/3-D histograms.
//!
//! Every axis carries two sentinel bins: `-1` collects values below the first
//! edge and `n` collects values at or above the declared maximum. Storage for
//! an axis with `n` real bins therefore has `n + 2` slots, and a value's slot
//! is `bin(value) + 1`.
//!
//! Histograms are plain owned values. `Clone` (or the `snapshot` alias) is a
//! deep copy: a snapshot never observes later writes to the original.

pub mod axis;
pub mod hist1d;
pub mod hist2d;
pub mod hist3d;
pub mod radial;

pub use axis::{make_bins, BinAxis};
pub use hist1d::Histogram1;
pub use hist2d::Histogram2;
pub use hist3d::Histogram3;
pub use radial::{calculate_bin_mins, equal_area_edges, equal_width_edges, RadialBinPolicy};

use std::fmt;
use std::iter::Sum;
use std::ops::AddAssign;

/// Value stored in a histogram bin.
///
/// Implemented for `u64` (event counts) and `f64` (weighted sums).
pub trait Accumulator:
    Copy + Default + PartialEq + AddAssign + Sum + fmt::Display + fmt::Debug + Send + Sync + 'static
{
    fn as_f64(self) -> f64;
}

impl Accumulator for u64 {
    #[inline]
    fn as_f64(self) -> f64 {
        self as f64
    }
}

impl Accumulator for f64 {
    #[inline]
    fn as_f64(self) -> f64 {
        self
    }
}

/// 1-D histogram of event counts.
pub type Histogram1D = Histogram1<u64>;
/// 1-D histogram of weighted sums.
pub type HistogramWeighted1D = Histogram1<f64>;
/// 2-D histogram of event counts.
pub type Histogram2D = Histogram2<u64>;
/// 2-D histogram of weighted sums.
pub type HistogramWeighted2D = Histogram2<f64>;
/// 3-D histogram of event counts.
pub type Histogram3D = Histogram3<u64>;
/// 3-D histogram of weighted sums.
pub type HistogramWeighted3D = Histogram3<f64>;
