use enum_map::Enum;
use enumset::{EnumSet, EnumSetType};
use glam::UVec3;

/// A corner of a 3D cube, which doubles as the local octant of a child node.
///
/// The discriminant has the X offset in bit 0, Y in bit 1 and Z in bit 2, so iterating corners in
/// order walks X fastest.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord, Enum, EnumSetType)]
#[enumset(no_super_impls)]
pub enum Corner3 {
    X0Y0Z0,
    X1Y0Z0,
    X0Y1Z0,
    X1Y1Z0,
    X0Y0Z1,
    X1Y0Z1,
    X0Y1Z1,
    X1Y1Z1,
}

impl Corner3 {
    /// All corners in discriminant order.
    pub const ALL: [Self; 8] = [
        Self::X0Y0Z0,
        Self::X1Y0Z0,
        Self::X0Y1Z0,
        Self::X1Y1Z0,
        Self::X0Y0Z1,
        Self::X1Y0Z1,
        Self::X0Y1Z1,
        Self::X1Y1Z1,
    ];

    /// Returns the corner that a grid cell with the given global `index` occupies within its parent
    /// cell.
    ///
    /// Only the lowest bit of each axis is relevant.
    pub fn from_cell_index(index: UVec3) -> Self {
        let bits = (index.x & 1) | (index.y & 1) << 1 | (index.z & 1) << 2;
        Self::ALL[bits as usize]
    }

    /// The offset of this corner from [`Corner3::X0Y0Z0`], each axis either `0` or `1`.
    pub fn offset(self) -> UVec3 {
        let bits = self as u32;
        UVec3::new(bits & 1, bits >> 1 & 1, bits >> 2 & 1)
    }
}

impl From<Corner3> for UVec3 {
    fn from(corner: Corner3) -> Self {
        corner.offset()
    }
}

/// A set of corners; used as the occupancy mask of an octree node's child slots.
pub type Corners3 = EnumSet<Corner3>;
