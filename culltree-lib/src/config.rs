use log::warn;
use serde::{Deserialize, Serialize};

use crate::{
    error::OctreeError,
    octree::{storage::ArrayStorage, StorageType},
};

/// Settings of a [`LooseOctree`](crate::octree::LooseOctree) that stay fixed for its lifetime.
///
/// All fields are optional when deserializing:
///
/// ```
/// # use culltree_lib::{config::OctreeConfig, octree::StorageType};
/// let config: OctreeConfig = serde_json::from_str(r#"{ "storage": "full_array" }"#).unwrap();
/// assert_eq!(config.storage, StorageType::FullArray);
/// assert_eq!(config.max_depth, 5);
/// ```
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OctreeConfig {
    /// The deepest level nodes can be created at.
    pub max_depth: u8,
    pub storage: StorageType,
    /// Whether queries and updates count their work.
    pub collect_statistics: bool,
    /// Whether queries record the bounds of all nodes that contributed geometry.
    pub collect_debug_info: bool,
}

impl Default for OctreeConfig {
    fn default() -> Self {
        Self {
            max_depth: 5,
            storage: StorageType::default(),
            collect_statistics: false,
            collect_debug_info: false,
        }
    }
}

impl OctreeConfig {
    /// Checks whether the storage can address `max_depth` levels.
    ///
    /// Very deep array storage is accepted, but logs a warning since it preallocates every slot.
    pub fn validate(&self) -> Result<(), OctreeError> {
        let limit = self.storage.max_depth_limit();
        if self.max_depth > limit {
            return Err(OctreeError::MaxDepthTooLarge {
                depth: self.max_depth,
                limit,
                storage: self.storage,
            });
        }

        if self.storage == StorageType::FullArray
            && self.max_depth > ArrayStorage::<()>::WARN_DEPTH
        {
            warn!(
                "full array storage with depth {} preallocates {} node slots",
                self.max_depth,
                ArrayStorage::<()>::slot_count(self.max_depth)
            );
        }
        Ok(())
    }
}
