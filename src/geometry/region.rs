//! Arena-backed region tree.
//!
//! Every region lives in the `RegionTree` and is addressed by a `RegionId`.
//! Parents own their children through index lists; the `parent` field is a
//! plain back-reference, so the tree has no ownership cycles and walking up
//! to the root is O(depth).

use log::debug;
use rayon::prelude::*;

use super::cuboid::{Cell, CuboidRegion, GridSpec};
use super::material::{BasicMaterialModel, ModelHandle};
use super::shape::{HalfSpace, Shape};
use crate::error::{Error, Result};
use crate::math::{z_axis, Vector3, TOLERANCE};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RegionId(pub usize);

#[derive(Debug)]
pub(crate) enum RegionKind {
    Plain,
    Grid(CuboidRegion),
    Voxel { grid: RegionId, ijk: [usize; 3] },
}

/// A volume with a single scatter model.
#[derive(Debug)]
pub struct Region {
    shape: Box<dyn Shape>,
    model: ModelHandle,
    parent: Option<RegionId>,
    children: Vec<RegionId>,
    index: Option<usize>,
    kind: RegionKind,
}

impl Region {
    pub fn shape(&self) -> &dyn Shape {
        self.shape.as_ref()
    }

    pub fn scatter_model(&self) -> &ModelHandle {
        &self.model
    }

    pub fn parent(&self) -> Option<RegionId> {
        self.parent
    }

    pub fn children(&self) -> &[RegionId] {
        &self.children
    }

    /// Index of an indexed region: `0` for a voxel grid, `1..` for its
    /// voxels, `None` for plain regions.
    pub fn index(&self) -> Option<usize> {
        self.index
    }

    pub fn is_voxel(&self) -> bool {
        matches!(self.kind, RegionKind::Voxel { .. })
    }
}

/// Result of [`RegionTree::find_segment_exit`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SegmentExit {
    /// End of the step: the first boundary crossing, or the requested end
    /// point if no boundary lies in between.
    pub position: Vector3,
    /// Region on the far side of that boundary; `None` is vacuum.
    pub region: Option<RegionId>,
}

/// Where a point was resolved and which region's rules resolved it.
#[derive(Clone, Copy, Debug, PartialEq)]
enum Located {
    Outside,
    In { region: RegionId, scope: RegionId },
    GridVacuum { grid: RegionId },
}

impl Located {
    fn region(self) -> Option<RegionId> {
        match self {
            Located::In { region, .. } => Some(region),
            _ => None,
        }
    }
}

/// Containment tree of regions, rooted at the chamber.
#[derive(Debug)]
pub struct RegionTree {
    regions: Vec<Region>,
}

impl RegionTree {
    /// Creates a tree whose root (the chamber) has the given shape and model.
    pub fn new(chamber: Box<dyn Shape>, model: ModelHandle) -> Self {
        let root = Region {
            shape: chamber,
            model,
            parent: None,
            children: Vec::new(),
            index: None,
            kind: RegionKind::Plain,
        };
        Self { regions: vec![root] }
    }

    pub fn root(&self) -> RegionId {
        RegionId(0)
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    // --- Building ---

    fn push(&mut self, region: Region) -> RegionId {
        let id = RegionId(self.regions.len());
        self.regions.push(region);
        id
    }

    fn check_parent(&self, parent: RegionId) -> Result<()> {
        match self.regions.get(parent.0).map(|r| &r.kind) {
            None => Err(Error::precondition(format!("unknown region {}", parent.0))),
            Some(RegionKind::Plain) => Ok(()),
            Some(_) => Err(Error::precondition("voxel grids and voxels cannot have sub-regions")),
        }
    }

    /// Adds a plain region inside `parent`. Siblings are tried in insertion
    /// order, so the first child containing a point wins.
    pub fn add_region(&mut self, parent: RegionId, shape: Box<dyn Shape>, model: ModelHandle) -> Result<RegionId> {
        self.add_indexed_region(parent, shape, model, None)
    }

    pub fn add_indexed_region(
        &mut self,
        parent: RegionId,
        shape: Box<dyn Shape>,
        model: ModelHandle,
        index: Option<usize>,
    ) -> Result<RegionId> {
        self.check_parent(parent)?;
        let id = self.push(Region {
            shape,
            model,
            parent: Some(parent),
            children: Vec::new(),
            index,
            kind: RegionKind::Plain,
        });
        self.regions[parent.0].children.push(id);
        Ok(id)
    }

    /// Adds a voxel grid inside `parent`.
    ///
    /// The grid region occupies the half-space below its top face `z1`; its
    /// own model is the surrounding material. All voxels start with one shared
    /// null material and are numbered `1..=nx*ny*nz` in `(i, j, k)` order.
    pub fn add_cuboid_region(&mut self, parent: RegionId, spec: &GridSpec) -> Result<RegionId> {
        self.check_parent(parent)?;
        let mut grid = CuboidRegion::new(spec)?;

        let grid_id = RegionId(self.regions.len());
        let null = BasicMaterialModel::null();
        let first_voxel = grid_id.0 + 1;
        let count = grid.voxel_count();
        grid.voxels = (first_voxel..first_voxel + count).map(RegionId).collect();
        let voxel_regions: Vec<Region> = (0..count)
            .map(|idx| {
                let ijk = grid.unlinear_index(idx);
                Region {
                    shape: Box::new(grid.voxel_bounds(ijk)),
                    model: null.clone(),
                    parent: Some(grid_id),
                    children: Vec::new(),
                    index: Some(idx + 1),
                    kind: RegionKind::Voxel { grid: grid_id, ijk },
                }
            })
            .collect();

        debug!(
            "voxel grid {:?}: {}x{}x{} cells of {:?}",
            grid_id,
            spec.nx,
            spec.ny,
            spec.nz,
            grid.cell_size()
        );

        let children = grid.voxels.clone();
        self.push(Region {
            shape: Box::new(HalfSpace::new(z_axis(), Vector3::new(0.0, 0.0, spec.z1))),
            model: BasicMaterialModel::null(),
            parent: Some(parent),
            children,
            index: Some(0),
            kind: RegionKind::Grid(grid),
        });
        self.regions.extend(voxel_regions);
        self.regions[parent.0].children.push(grid_id);
        Ok(grid_id)
    }

    // --- Access ---

    pub fn region(&self, id: RegionId) -> &Region {
        &self.regions[id.0]
    }

    pub fn parent(&self, id: RegionId) -> Option<RegionId> {
        self.regions[id.0].parent
    }

    pub fn children(&self, id: RegionId) -> &[RegionId] {
        &self.regions[id.0].children
    }

    pub fn scatter_model(&self, id: RegionId) -> &ModelHandle {
        &self.regions[id.0].model
    }

    pub fn index(&self, id: RegionId) -> Option<usize> {
        self.regions[id.0].index
    }

    /// Chain of ancestors from `id` (exclusive) up to the root (inclusive).
    pub fn ancestors(&self, id: RegionId) -> Vec<RegionId> {
        let mut out = Vec::new();
        let mut current = self.parent(id);
        while let Some(p) = current {
            out.push(p);
            current = self.parent(p);
        }
        out
    }

    /// Grid geometry of a voxel grid region.
    pub fn cuboid(&self, grid: RegionId) -> Option<&CuboidRegion> {
        match &self.regions.get(grid.0)?.kind {
            RegionKind::Grid(g) => Some(g),
            _ => None,
        }
    }

    fn require_cuboid(&self, grid: RegionId) -> Result<&CuboidRegion> {
        self.cuboid(grid)
            .ok_or_else(|| Error::precondition(format!("region {} is not a voxel grid", grid.0)))
    }

    /// Region of voxel `(i, j, k)` of `grid`.
    pub fn voxel(&self, grid: RegionId, i: usize, j: usize, k: usize) -> Result<RegionId> {
        let g = self.require_cuboid(grid)?;
        g.voxel(i, j, k).ok_or_else(|| {
            Error::precondition(format!("voxel ({i}, {j}, {k}) outside grid {:?}", g.dims()))
        })
    }

    /// `(i, j, k)` of a voxel region.
    pub fn voxel_indices(&self, id: RegionId) -> Option<[usize; 3]> {
        match self.regions.get(id.0)?.kind {
            RegionKind::Voxel { ijk, .. } => Some(ijk),
            _ => None,
        }
    }

    // --- Material updates (configuration time) ---

    pub fn update_cuboid_material(
        &mut self,
        grid: RegionId,
        i: usize,
        j: usize,
        k: usize,
        model: ModelHandle,
    ) -> Result<()> {
        let voxel = self.voxel(grid, i, j, k)?;
        self.regions[voxel.0].model = model;
        Ok(())
    }

    pub fn update_all_cuboid_materials(&mut self, grid: RegionId, model: ModelHandle) -> Result<()> {
        let voxels = self.require_cuboid(grid)?.voxels.clone();
        for v in voxels {
            self.regions[v.0].model = model.clone();
        }
        Ok(())
    }

    /// Sets the material around the voxels (beside and below the grid).
    pub fn update_surrounding_material(&mut self, grid: RegionId, model: ModelHandle) -> Result<()> {
        self.require_cuboid(grid)?;
        self.regions[grid.0].model = model;
        Ok(())
    }

    /// Assigns voxel materials from a function of the voxel centre.
    ///
    /// `f` is evaluated for every voxel in parallel; `None` leaves a voxel
    /// unchanged. Returns the number of voxels updated.
    pub fn assign_materials_with<F>(&mut self, grid: RegionId, f: F) -> Result<usize>
    where
        F: Fn(Vector3) -> Option<ModelHandle> + Sync,
    {
        let g = self.require_cuboid(grid)?;
        let picks: Vec<Option<ModelHandle>> = (0..g.voxel_count())
            .into_par_iter()
            .map(|idx| f(g.voxel_center(g.unlinear_index(idx))))
            .collect();
        let voxels = g.voxels.clone();

        let mut updated = 0;
        for (v, pick) in voxels.into_iter().zip(picks) {
            if let Some(model) = pick {
                self.regions[v.0].model = model;
                updated += 1;
            }
        }
        debug!("assigned {} of {} voxel materials in grid {:?}", updated, self.regions[grid.0].children.len(), grid);
        Ok(updated)
    }

    // --- Queries ---

    fn locate(&self, p: &Vector3) -> Located {
        let root = self.root();
        if !self.regions[root.0].shape.contains(p) {
            return Located::Outside;
        }
        let mut current = root;
        loop {
            let region = &self.regions[current.0];
            if let RegionKind::Grid(grid) = &region.kind {
                return match grid.cell(grid.indices(p)) {
                    Cell::Voxel(ijk) => Located::In { region: grid.voxels[grid.linear_index(ijk)], scope: current },
                    Cell::Surrounding => Located::In { region: current, scope: current },
                    Cell::Vacuum => Located::GridVacuum { grid: current },
                };
            }
            let next = region
                .children
                .iter()
                .copied()
                .find(|c| self.regions[c.0].shape.contains(p));
            match next {
                Some(child) => current = child,
                None => return Located::In { region: current, scope: current },
            }
        }
    }

    /// Most specific region containing `point`; `None` is vacuum.
    pub fn containing_region(&self, point: &Vector3) -> Option<RegionId> {
        self.locate(point).region()
    }

    fn resolve_cell(&self, grid_id: RegionId, cell: Cell) -> Option<RegionId> {
        match (cell, &self.regions[grid_id.0].kind) {
            (Cell::Voxel(ijk), RegionKind::Grid(g)) => Some(g.voxels[g.linear_index(ijk)]),
            (Cell::Surrounding, _) => Some(grid_id),
            _ => None,
        }
    }

    /// Clamps the step `p0 -> p1` to the first region boundary it crosses.
    ///
    /// Returns `p1` unchanged when the step crosses no boundary. The returned
    /// position sits exactly on the boundary; the caller nudges past it
    /// before the next query.
    pub fn find_segment_exit(&self, p0: &Vector3, p1: &Vector3) -> SegmentExit {
        match self.locate(p0) {
            Located::In { region, scope } => match &self.regions[scope.0].kind {
                RegionKind::Grid(grid) => match self.regions[region.0].kind {
                    RegionKind::Voxel { ijk, .. } => {
                        // Voxels are convex: ending in the same cell crosses nothing.
                        if grid.cell(grid.indices(p1)) == Cell::Voxel(ijk) {
                            return SegmentExit { position: *p1, region: Some(region) };
                        }
                        let (position, cell) = grid.exit_voxel(ijk, p0, p1);
                        SegmentExit { position, region: self.resolve_cell(scope, cell) }
                    }
                    _ => self.grid_outside_exit(scope, grid, p0, p1),
                },
                _ => self.shaped_exit(region, p0, p1),
            },
            Located::GridVacuum { grid } => match &self.regions[grid.0].kind {
                RegionKind::Grid(g) => self.grid_outside_exit(grid, g, p0, p1),
                _ => self.unclamped(p1),
            },
            Located::Outside => {
                let t = self.regions[0].shape.first_intersection(p0, p1);
                if t <= 1.0 {
                    SegmentExit { position: lerp(p0, p1, t), region: Some(self.root()) }
                } else {
                    self.unclamped(p1)
                }
            }
        }
    }

    fn unclamped(&self, p1: &Vector3) -> SegmentExit {
        SegmentExit { position: *p1, region: self.containing_region(p1) }
    }

    /// Step starting in a grid's surrounding material or in its vacuum.
    ///
    /// The surrounding material wraps the voxels, so even a step that ends in
    /// it again may pass through the grid on the way.
    fn grid_outside_exit(
        &self,
        grid_id: RegionId,
        grid: &CuboidRegion,
        p0: &Vector3,
        p1: &Vector3,
    ) -> SegmentExit {
        if let Some((position, cell)) = grid.entry(p0, p1) {
            return SegmentExit { position, region: self.resolve_cell(grid_id, cell) };
        }
        let t = self.regions[grid_id.0].shape.first_intersection(p0, p1);
        if t <= 1.0 {
            return SegmentExit {
                position: lerp(p0, p1, t),
                region: self.regions[grid_id.0].parent,
            };
        }
        self.unclamped(p1)
    }

    /// Step starting in a plain region: the nearer of leaving its shape
    /// (towards the parent) and entering a child's shape.
    fn shaped_exit(&self, id: RegionId, p0: &Vector3, p1: &Vector3) -> SegmentExit {
        let region = &self.regions[id.0];
        let mut t = region.shape.first_intersection(p0, p1);
        let mut next = region.parent;
        for &child in &region.children {
            let tc = self.regions[child.0].shape.first_intersection(p0, p1);
            if tc < t {
                t = tc;
                next = Some(child);
            }
        }
        if t > 1.0 {
            return self.unclamped(p1);
        }
        let position = lerp(p0, p1, t);

        // Landing on a grid's top face inside its footprint enters a voxel.
        if let Some(child) = next.filter(|n| Some(*n) != region.parent) {
            if let RegionKind::Grid(g) = &self.regions[child.0].kind {
                if let Some((hit, cell)) = g.entry(p0, p1) {
                    if (hit - position).norm() <= TOLERANCE {
                        return SegmentExit { position: hit, region: self.resolve_cell(child, cell) };
                    }
                }
            }
        }
        SegmentExit { position, region: next }
    }
}

#[inline]
fn lerp(p0: &Vector3, p1: &Vector3, t: f64) -> Vector3 {
    p0 + (p1 - p0) * t
}
