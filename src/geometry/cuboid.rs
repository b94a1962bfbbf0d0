//! Uniform voxel grid: point-to-voxel resolution and boundary crossing.
//!
//! The grid covers `[x0,x1] x [y0,y1] x [z0,z1]` with `nx * ny * nz` equal
//! cells. Each cell is a leaf region in the [`RegionTree`](super::RegionTree)
//! arena with its own material. A point outside the cells resolves by these
//! rules:
//!
//! - `i` or `j` out of range, or `k < 0`: the grid region itself, i.e. the
//!   surrounding material;
//! - `k >= nz`: vacuum.

use serde::{Deserialize, Serialize};

use super::region::RegionId;
use super::shape::Block;
use crate::error::{Error, Result};
use crate::math::Vector3;

/// Extents and subdivision of a voxel grid.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GridSpec {
    pub x0: f64,
    pub x1: f64,
    pub nx: usize,
    pub y0: f64,
    pub y1: f64,
    pub ny: usize,
    pub z0: f64,
    /// Top of the grid; the sample surface. Defaults to `0`.
    #[serde(default)]
    pub z1: f64,
    pub nz: usize,
}

impl GridSpec {
    #[allow(clippy::too_many_arguments)]
    pub fn new(x0: f64, x1: f64, nx: usize, y0: f64, y1: f64, ny: usize, z0: f64, z1: f64, nz: usize) -> Self {
        Self { x0, x1, nx, y0, y1, ny, z0, z1, nz }
    }

    /// Grid whose top face is the `z = 0` surface.
    pub fn substrate(x0: f64, x1: f64, nx: usize, y0: f64, y1: f64, ny: usize, z0: f64, nz: usize) -> Self {
        Self::new(x0, x1, nx, y0, y1, ny, z0, 0.0, nz)
    }
}

/// Where a grid index triple resolves to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Cell {
    Voxel([usize; 3]),
    Surrounding,
    Vacuum,
}

/// Geometry of a voxel grid region.
#[derive(Clone, Debug)]
pub struct CuboidRegion {
    lower: Vector3,
    upper: Vector3,
    cell: Vector3,
    dims: [usize; 3],
    pub(crate) voxels: Vec<RegionId>,
}

fn check_axis(name: char, lo: f64, hi: f64, n: usize) -> Result<()> {
    if !(hi > lo) {
        return Err(Error::invalid(format!("{name}1 must be greater than {name}0")));
    }
    if n < 1 {
        return Err(Error::invalid(format!("n{name} must be greater or equal to 1")));
    }
    Ok(())
}

impl CuboidRegion {
    pub(crate) fn new(spec: &GridSpec) -> Result<Self> {
        check_axis('x', spec.x0, spec.x1, spec.nx)?;
        check_axis('y', spec.y0, spec.y1, spec.ny)?;
        check_axis('z', spec.z0, spec.z1, spec.nz)?;

        let lower = Vector3::new(spec.x0, spec.y0, spec.z0);
        let upper = Vector3::new(spec.x1, spec.y1, spec.z1);
        let dims = [spec.nx, spec.ny, spec.nz];
        let cell = Vector3::new(
            (spec.x1 - spec.x0) / spec.nx as f64,
            (spec.y1 - spec.y0) / spec.ny as f64,
            (spec.z1 - spec.z0) / spec.nz as f64,
        );
        Ok(Self { lower, upper, cell, dims, voxels: Vec::with_capacity(spec.nx * spec.ny * spec.nz) })
    }

    /// `[nx, ny, nz]`.
    pub fn dims(&self) -> [usize; 3] {
        self.dims
    }

    pub fn lower(&self) -> Vector3 {
        self.lower
    }

    pub fn upper(&self) -> Vector3 {
        self.upper
    }

    pub fn cell_size(&self) -> Vector3 {
        self.cell
    }

    pub fn voxel_count(&self) -> usize {
        self.dims[0] * self.dims[1] * self.dims[2]
    }

    /// Linear position of voxel `(i, j, k)`: `i` outermost, `k` innermost.
    #[inline]
    pub fn linear_index(&self, [i, j, k]: [usize; 3]) -> usize {
        (i * self.dims[1] + j) * self.dims[2] + k
    }

    /// Inverse of [`linear_index`](Self::linear_index).
    pub fn unlinear_index(&self, idx: usize) -> [usize; 3] {
        let k = idx % self.dims[2];
        let j = (idx / self.dims[2]) % self.dims[1];
        let i = idx / (self.dims[1] * self.dims[2]);
        [i, j, k]
    }

    /// Region of voxel `(i, j, k)`, or `None` if out of range.
    pub fn voxel(&self, i: usize, j: usize, k: usize) -> Option<RegionId> {
        if i < self.dims[0] && j < self.dims[1] && k < self.dims[2] {
            self.voxels.get(self.linear_index([i, j, k])).copied()
        } else {
            None
        }
    }

    pub fn voxel_bounds(&self, ijk: [usize; 3]) -> Block {
        let min = Vector3::new(
            self.lower.x + ijk[0] as f64 * self.cell.x,
            self.lower.y + ijk[1] as f64 * self.cell.y,
            self.lower.z + ijk[2] as f64 * self.cell.z,
        );
        Block::new(min, min + self.cell)
    }

    pub fn voxel_center(&self, ijk: [usize; 3]) -> Vector3 {
        Vector3::new(
            self.lower.x + (ijk[0] as f64 + 0.5) * self.cell.x,
            self.lower.y + (ijk[1] as f64 + 0.5) * self.cell.y,
            self.lower.z + (ijk[2] as f64 + 0.5) * self.cell.z,
        )
    }

    /// Grid indices of `p`, unbounded: `floor((p - lower) / cell)`.
    #[inline]
    pub(crate) fn indices(&self, p: &Vector3) -> [i64; 3] {
        [
            ((p.x - self.lower.x) / self.cell.x).floor() as i64,
            ((p.y - self.lower.y) / self.cell.y).floor() as i64,
            ((p.z - self.lower.z) / self.cell.z).floor() as i64,
        ]
    }

    #[inline]
    pub(crate) fn cell(&self, [i, j, k]: [i64; 3]) -> Cell {
        let [nx, ny, nz] = self.dims;
        if i < 0 || i >= nx as i64 || j < 0 || j >= ny as i64 || k < 0 {
            Cell::Surrounding
        } else if k >= nz as i64 {
            Cell::Vacuum
        } else {
            Cell::Voxel([i as usize, j as usize, k as usize])
        }
    }

    /// Where the segment `p0 -> p1`, starting inside voxel `ijk`, leaves it.
    ///
    /// Per axis the face ahead of the motion gives `t = (face - p0) / v`; an
    /// axis without motion never limits (`t = 1`). The smallest `t` is the
    /// exit. The destination steps one cell along every axis whose face was
    /// reached.
    #[inline]
    pub(crate) fn exit_voxel(&self, ijk: [usize; 3], p0: &Vector3, p1: &Vector3) -> (Vector3, Cell) {
        let v = p1 - p0;
        let mut t = [1.0_f64; 3];
        for a in 0..3 {
            if v[a] != 0.0 {
                let lo = self.lower[a] + ijk[a] as f64 * self.cell[a];
                let face = if v[a] > 0.0 { lo + self.cell[a] } else { lo };
                t[a] = (face - p0[a]) / v[a];
            }
        }
        let t_min = t[0].min(t[1]).min(t[2]);

        let mut next = [ijk[0] as i64, ijk[1] as i64, ijk[2] as i64];
        for a in 0..3 {
            if v[a] != 0.0 && t[a] == t_min {
                next[a] += if v[a] > 0.0 { 1 } else { -1 };
            }
        }
        (p0 + v * t_min, self.cell(next))
    }

    /// Where the segment `p0 -> p1`, starting outside every voxel, enters the
    /// grid box. `None` if it does not reach the box within `[0, 1]`.
    pub(crate) fn entry(&self, p0: &Vector3, p1: &Vector3) -> Option<(Vector3, Cell)> {
        let v = p1 - p0;
        let mut t_enter = f64::NEG_INFINITY;
        let mut t_leave = f64::INFINITY;
        let mut axis = None;
        for a in 0..3 {
            if v[a] == 0.0 {
                if p0[a] < self.lower[a] || p0[a] >= self.upper[a] {
                    return None;
                }
                continue;
            }
            let (near, far) = if v[a] > 0.0 {
                (self.lower[a], self.upper[a])
            } else {
                (self.upper[a], self.lower[a])
            };
            let tn = (near - p0[a]) / v[a];
            if tn > t_enter {
                t_enter = tn;
                axis = Some(a);
            }
            t_leave = t_leave.min((far - p0[a]) / v[a]);
        }
        let axis = axis?;
        if t_enter < 0.0 || t_enter > 1.0 || t_enter >= t_leave {
            return None;
        }

        let position = p0 + v * t_enter;
        let floor = self.indices(&position);
        let mut ijk = [0usize; 3];
        for a in 0..3 {
            let last = self.dims[a] - 1;
            ijk[a] = if a == axis {
                if v[a] > 0.0 { 0 } else { last }
            } else {
                floor[a].clamp(0, last as i64) as usize
            };
        }
        Some((position, Cell::Voxel(ijk)))
    }
}
