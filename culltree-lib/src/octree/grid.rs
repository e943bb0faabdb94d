use glam::{IVec3, Vec3};

use crate::math::{bounds::Aabb, sphere::Sphere};

use super::coords::NodeCoords;

/// The implicit grid of a loose octree: a cube of `world_size` around `center`, subdivided up to
/// `max_depth` times.
///
/// Every cell at depth `d` has a spacing of `world_size / 2^d`. Cells are "loose", so the region
/// that counts as the inside of a cell extends by half a spacing beyond its regular bounds on every
/// side, which gives every cell twice the extent of its regular counterpart.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LooseGrid {
    world_size: f32,
    center: Vec3,
    max_depth: u8,
}

impl LooseGrid {
    /// Constructs a new [`LooseGrid`].
    ///
    /// `max_depth` must not exceed [`NodeCoords::MAX_DEPTH`], which is validated by the octree
    /// config before a grid is ever created.
    pub fn new(world_size: f32, center: Vec3, max_depth: u8) -> Self {
        debug_assert!(max_depth <= NodeCoords::MAX_DEPTH);
        Self {
            world_size,
            center,
            max_depth,
        }
    }

    pub fn world_size(self) -> f32 {
        self.world_size
    }

    pub fn center(self) -> Vec3 {
        self.center
    }

    pub fn max_depth(self) -> u8 {
        self.max_depth
    }

    /// The edge length of a regular cell at the given `depth`.
    pub fn node_spacing(self, depth: u8) -> f32 {
        self.world_size / NodeCoords::cells_per_axis(depth) as f32
    }

    /// The center of the cell at `coords` in world space.
    pub fn node_center(self, coords: NodeCoords) -> Vec3 {
        let spacing = self.node_spacing(coords.depth());
        spacing * (coords.index().as_vec3() + 0.5) - self.world_size * 0.5 + self.center
    }

    /// The loose bounds of the cell at `coords`.
    pub fn loose_bounds(self, coords: NodeCoords) -> Aabb {
        Aabb::cube(self.node_center(coords), self.node_spacing(coords.depth()))
    }

    /// The deepest level at which a sphere with the given `radius` fits into a single loose cell,
    /// regardless of where it is placed within that cell.
    ///
    /// Negative if the sphere is too big for even the root.
    pub fn calc_depth(self, radius: f32) -> i32 {
        let depth = ((self.world_size / radius).log2() - 1.0).floor() as i32;
        depth.min(self.max_depth.into())
    }

    /// The per-axis index of the cell with the given `spacing` that contains `point`.
    ///
    /// Points outside of the world result in indices outside of `0..2^depth`.
    pub fn calc_indices(self, point: Vec3, spacing: f32) -> IVec3 {
        ((point - self.center + self.world_size * 0.5) / spacing)
            .floor()
            .as_ivec3()
    }

    /// Whether the bounding box of `sphere` lies entirely within the loose bounds of `coords`.
    pub fn fits_inside(self, sphere: Sphere, coords: NodeCoords) -> bool {
        self.loose_bounds(coords).encloses(sphere.to_aabb())
    }

    /// Finds the cell a `sphere` should be stored in.
    ///
    /// Starts at the depth given by [`Self::calc_depth`] and then checks whether the cell one level
    /// deeper can hold the sphere as well. Deeper levels are never considered.
    ///
    /// Returns [`None`] if the sphere does not fit into the world or is malformed.
    pub fn node_coords(self, sphere: Sphere) -> Option<NodeCoords> {
        let radius = sphere.radius();
        if !(radius >= 0.0) || !sphere.center().is_finite() {
            return None;
        }

        let depth = self.calc_depth(radius);
        let depth_u8 = u8::try_from(depth).ok()?;
        let candidate = NodeCoords::from_signed(
            depth,
            self.calc_indices(sphere.center(), self.node_spacing(depth_u8)),
        )?;

        if depth_u8 < self.max_depth {
            let deeper = NodeCoords::from_signed(
                depth + 1,
                self.calc_indices(sphere.center(), self.node_spacing(depth_u8 + 1)),
            );
            if let Some(deeper) = deeper.filter(|&deeper| self.fits_inside(sphere, deeper)) {
                return Some(deeper);
            }
        }

        Some(candidate)
    }
}
