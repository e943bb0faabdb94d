use thiserror::Error;

use crate::{math::sphere::Sphere, octree::StorageType};

#[derive(Clone, Copy, Debug, PartialEq, Error)]
pub enum OctreeError {
    #[error("world size must be positive and finite, got {0}")]
    InvalidWorldSize(f32),
    #[error("max depth {depth} exceeds the limit of {limit} for {storage:?} storage")]
    MaxDepthTooLarge {
        depth: u8,
        limit: u8,
        storage: StorageType,
    },
    #[error("bounding sphere {0:?} does not fit into the octree")]
    OutOfBounds(Sphere),
    #[error("geometry is already part of the octree")]
    AlreadyInserted,
    #[error("cannot fit an octree around zero geometries")]
    NoGeometries,
}
