//! Serializable descriptions of samples and detectors.
//!
//! Specs are plain data. `build` turns them into runtime objects and reports
//! bad values as [`Error::InvalidArgument`](crate::Error::InvalidArgument).

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::geometry::{BasicMaterialModel, GridSpec, Material, RegionId, RegionTree};
use crate::histogram::{BinAxis, RadialBinPolicy};
use crate::listener::{
    BseEnergyHyperMapListener, BseRadialDetector, BseRadialEnergyListener, BseRadialListener, Detector,
    Listener, PhotonEmissionMapListener, PhotonRadialListener, TimeListener, TrajectoryListener,
};
use crate::math::Vector3;

fn default_normal() -> [f64; 3] {
    [0.0, 0.0, 1.0]
}

/// Radial binning: `bins` bins over `[0, rmax)`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RadialSpec {
    pub rmax: f64,
    pub bins: usize,
    #[serde(default)]
    pub policy: RadialBinPolicy,
}

impl RadialSpec {
    pub fn edges(&self) -> Result<Vec<f64>> {
        self.policy.edges(self.rmax, self.bins)
    }

    pub fn axis(&self) -> Result<BinAxis> {
        BinAxis::from_edges(&self.edges()?, self.rmax)
    }
}

/// Material of a single voxel.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VoxelMaterialSpec {
    pub i: usize,
    pub j: usize,
    pub k: usize,
    pub material: Material,
}

/// A voxel grid with its materials.
///
/// `fill` is applied to every voxel first, then the per-voxel entries.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MaterialSpec {
    pub grid: GridSpec,
    #[serde(default)]
    pub surrounding: Option<Material>,
    #[serde(default)]
    pub fill: Option<Material>,
    #[serde(default)]
    pub voxels: Vec<VoxelMaterialSpec>,
}

impl MaterialSpec {
    /// Adds the grid under `parent` and assigns its materials.
    pub fn build(&self, tree: &mut RegionTree, parent: RegionId) -> Result<RegionId> {
        let grid = tree.add_cuboid_region(parent, &self.grid)?;
        if let Some(m) = &self.surrounding {
            tree.update_surrounding_material(grid, BasicMaterialModel::shared(m.clone()))?;
        }
        if let Some(m) = &self.fill {
            tree.update_all_cuboid_materials(grid, BasicMaterialModel::shared(m.clone()))?;
        }
        for v in &self.voxels {
            tree.update_cuboid_material(grid, v.i, v.j, v.k, BasicMaterialModel::shared(v.material.clone()))?;
        }
        debug!("built grid {:?} with {} explicit voxel materials", grid, self.voxels.len());
        Ok(grid)
    }
}

/// Any detector the crate can build.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DetectorSpec {
    BseRadial {
        channels: usize,
    },
    BseRadialDistribution {
        #[serde(default)]
        center: [f64; 3],
        #[serde(default = "default_normal")]
        normal: [f64; 3],
        radial: RadialSpec,
    },
    BseRadialEnergy {
        #[serde(default)]
        center: [f64; 3],
        #[serde(default = "default_normal")]
        normal: [f64; 3],
        radial: RadialSpec,
        e_min: f64,
        e_max: f64,
        e_bins: usize,
    },
    BseEnergyHyperMap {
        width: usize,
        height: usize,
        #[serde(default)]
        x0: f64,
        #[serde(default)]
        y0: f64,
        dx: f64,
        dy: f64,
        e_min: f64,
        e_max: f64,
        e_bins: usize,
    },
    PhotonRadial {
        #[serde(default)]
        center: [f64; 3],
        #[serde(default = "default_normal")]
        normal: [f64; 3],
        radial: RadialSpec,
    },
    PhotonEmissionMap {
        x: (f64, f64, usize),
        y: (f64, f64, usize),
        z: (f64, f64, usize),
    },
    Trajectory {
        #[serde(default)]
        secondary: bool,
    },
    Time,
}

/// A detector built from a [`DetectorSpec`].
#[derive(Debug)]
pub enum BuiltDetector {
    BseRadial(BseRadialDetector),
    BseRadialDistribution(BseRadialListener),
    BseRadialEnergy(BseRadialEnergyListener),
    BseEnergyHyperMap(BseEnergyHyperMapListener),
    PhotonRadial(PhotonRadialListener),
    PhotonEmissionMap(PhotonEmissionMapListener),
    Trajectory(TrajectoryListener),
    Time(TimeListener),
}

impl BuiltDetector {
    /// Lifecycle view: `setup` once before the first event, `reset` between runs.
    pub fn as_detector(&mut self) -> &mut dyn Detector {
        match self {
            BuiltDetector::BseRadial(d) => d,
            BuiltDetector::BseRadialDistribution(d) => d,
            BuiltDetector::BseRadialEnergy(d) => d,
            BuiltDetector::BseEnergyHyperMap(d) => d,
            BuiltDetector::PhotonRadial(d) => d,
            BuiltDetector::PhotonEmissionMap(d) => d,
            BuiltDetector::Trajectory(d) => d,
            BuiltDetector::Time(d) => d,
        }
    }

    pub fn as_listener(&mut self) -> &mut dyn Listener {
        match self {
            BuiltDetector::BseRadial(d) => d,
            BuiltDetector::BseRadialDistribution(d) => d,
            BuiltDetector::BseRadialEnergy(d) => d,
            BuiltDetector::BseEnergyHyperMap(d) => d,
            BuiltDetector::PhotonRadial(d) => d,
            BuiltDetector::PhotonEmissionMap(d) => d,
            BuiltDetector::Trajectory(d) => d,
            BuiltDetector::Time(d) => d,
        }
    }
}

impl DetectorSpec {
    pub fn build(&self, name: &str) -> Result<BuiltDetector> {
        let v = |a: &[f64; 3]| Vector3::new(a[0], a[1], a[2]);
        Ok(match self {
            DetectorSpec::BseRadial { channels } => BuiltDetector::BseRadial(BseRadialDetector::new(name, *channels)?),
            DetectorSpec::BseRadialDistribution { center, normal, radial } => BuiltDetector::BseRadialDistribution(
                BseRadialListener::new(v(center), v(normal), radial.rmax, radial.bins, radial.policy)?,
            ),
            DetectorSpec::BseRadialEnergy { center, normal, radial, e_min, e_max, e_bins } => {
                BuiltDetector::BseRadialEnergy(BseRadialEnergyListener::new(
                    v(center),
                    v(normal),
                    *e_min,
                    *e_max,
                    *e_bins,
                    radial.rmax,
                    radial.bins,
                    radial.policy,
                )?)
            }
            DetectorSpec::BseEnergyHyperMap { width, height, x0, y0, dx, dy, e_min, e_max, e_bins } => {
                BuiltDetector::BseEnergyHyperMap(BseEnergyHyperMapListener::new(
                    *width, *height, *x0, *y0, *dx, *dy, *e_min, *e_max, *e_bins,
                )?)
            }
            DetectorSpec::PhotonRadial { center, normal, radial } => BuiltDetector::PhotonRadial(
                PhotonRadialListener::new(v(center), v(normal), radial.rmax, radial.bins, radial.policy)?,
            ),
            DetectorSpec::PhotonEmissionMap { x, y, z } => BuiltDetector::PhotonEmissionMap(
                PhotonEmissionMapListener::new(x.0, x.1, x.2, y.0, y.1, y.2, z.0, z.1, z.2)?,
            ),
            DetectorSpec::Trajectory { secondary } => BuiltDetector::Trajectory(TrajectoryListener::new(*secondary)),
            DetectorSpec::Time => BuiltDetector::Time(TimeListener::new()),
        })
    }
}
