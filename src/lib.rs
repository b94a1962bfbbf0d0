//! # probe-voxel
//!
//! Region geometry and histogram accumulation for electron-probe Monte Carlo
//! simulations.
//!
//! A trajectory engine (not part of this crate) steps electrons through a
//! [`RegionTree`]. At each step it asks which region holds a point
//! ([`RegionTree::containing_region`]) and where a step first crosses into
//! another region ([`RegionTree::find_segment_exit`]). Voxel grids
//! ([`CuboidRegion`]) resolve both queries in constant time per cell.
//!
//! Step outcomes are emitted as [`Event`]s on an [`EventBus`]; listeners in
//! [`listener`] bin them into the histograms of [`histogram`].

pub mod config;
pub mod error;
pub mod event;
pub mod geometry;
pub mod histogram;
pub mod listener;
pub mod math;

pub use error::{Error, Result};
pub use event::{ElectronState, Event, EventBus, XRay, XRayTransition};
pub use geometry::{
    BasicMaterialModel, Block, CuboidRegion, Everywhere, GridSpec, HalfSpace, Material, ModelHandle, Region,
    RegionId, RegionTree, ScatterModel, SegmentExit, Shape, Sphere,
};
pub use histogram::{
    make_bins, Accumulator, BinAxis, Histogram1, Histogram1D, Histogram2, Histogram2D, Histogram3, Histogram3D,
    HistogramWeighted1D, HistogramWeighted2D, HistogramWeighted3D, RadialBinPolicy,
};
pub use listener::{Detector, Listener, ReferencePlane, SetupContext};
pub use math::Vector3;
