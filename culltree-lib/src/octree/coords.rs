use glam::{IVec3, UVec3};

use crate::math_enums::Corner3;

/// Identifies a single cell within the implicit, power-of-two subdivided cube of a loose octree.
///
/// A cell is addressed by its depth and a global index along each axis. At depth `d` there are
/// `2^d` cells along each axis, so every index lies in `0..2^d`. [`NodeCoords::ROOT`] is the single
/// cell at depth zero.
///
/// This invariant is upheld by all constructors, so it never has to be checked again.
#[derive(Clone, Copy, Debug, Default, Hash, PartialEq, Eq)]
pub struct NodeCoords {
    depth: u8,
    index: UVec3,
}

impl NodeCoords {
    /// The coordinates of the root node.
    pub const ROOT: Self = Self {
        depth: 0,
        index: UVec3::ZERO,
    };

    /// The maximum possible depth is 30.
    ///
    /// This keeps `2^depth` representable as an [`i32`], which the signed index calculations rely
    /// on.
    pub const MAX_DEPTH: u8 = 30;

    /// Constructs new [`NodeCoords`], returning [`None`] if `depth` exceeds [`Self::MAX_DEPTH`] or
    /// `index` lies outside `0..2^depth` on any axis.
    pub fn new(depth: u8, index: UVec3) -> Option<Self> {
        (depth <= Self::MAX_DEPTH && index.cmplt(UVec3::splat(Self::cells_per_axis(depth))).all())
            .then_some(Self { depth, index })
    }

    /// Same as [`Self::new`], but accepts signed values, which is what grid calculations produce.
    pub fn from_signed(depth: i32, index: IVec3) -> Option<Self> {
        let depth = u8::try_from(depth).ok()?;
        if index.cmpge(IVec3::ZERO).all() {
            Self::new(depth, index.as_uvec3())
        } else {
            None
        }
    }

    /// The number of cells along each axis at the given `depth`.
    ///
    /// # Panics
    ///
    /// Panics if `depth` exceeds [`Self::MAX_DEPTH`].
    pub fn cells_per_axis(depth: u8) -> u32 {
        assert!(depth <= Self::MAX_DEPTH, "depth should not exceed max depth");
        1 << depth
    }

    pub fn depth(self) -> u8 {
        self.depth
    }

    pub fn index(self) -> UVec3 {
        self.index
    }

    pub fn is_root(self) -> bool {
        self.depth == 0
    }

    /// Whether these coordinates can be stored in an octree of the given `max_depth`.
    pub fn is_valid(self, max_depth: u8) -> bool {
        self.depth <= max_depth
    }

    /// Returns the parent coordinates together with the corner these coordinates occupy in it.
    ///
    /// Returns [`None`] for the root.
    pub fn parent(self) -> Option<(Self, Corner3)> {
        let depth = self.depth.checked_sub(1)?;
        Some((
            Self {
                depth,
                index: self.index / 2,
            },
            Corner3::from_cell_index(self.index),
        ))
    }

    /// Returns the coordinates of the child at the given `corner`.
    ///
    /// # Panics
    ///
    /// Panics if the maximum depth would be exceeded. Octrees limit their own depth long before
    /// that, so hitting this is a bug in the caller.
    pub fn child(self, corner: Corner3) -> Self {
        assert!(
            self.depth < Self::MAX_DEPTH,
            "node coordinates should not exceed max depth"
        );
        Self {
            depth: self.depth + 1,
            index: self.index * 2 + corner.offset(),
        }
    }
}
