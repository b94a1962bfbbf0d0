//! Region geometry: shapes, materials, the region tree and voxel grids.

pub mod cuboid;
pub mod material;
pub mod region;
pub mod shape;

pub use cuboid::{CuboidRegion, GridSpec};
pub use material::{BasicMaterialModel, Material, ModelHandle, ScatterModel};
pub use region::{Region, RegionId, RegionTree, SegmentExit};
pub use shape::{Block, Everywhere, HalfSpace, Shape, Sphere};
