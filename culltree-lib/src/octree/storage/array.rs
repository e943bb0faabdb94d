use std::mem::size_of;

use super::NodeStorage;
use crate::octree::{coords::NodeCoords, node::Node};

/// Stores nodes in one flat array that has a slot for every possible node up to the max depth.
///
/// Levels are laid out one after another, each in row-major order with X varying fastest. Lookups
/// are a single index calculation, but the number of slots grows by a factor of eight per level.
#[derive(Clone, Debug)]
pub struct ArrayStorage<G> {
    max_depth: u8,
    slots: Vec<Option<Box<Node<G>>>>,
    node_count: usize,
}

impl<G> ArrayStorage<G> {
    /// The deepest level that can be addressed at all.
    pub const MAX_DEPTH: u8 = 9;
    /// Depths beyond this allocate a lot of memory and are only accepted with a warning by the
    /// config.
    pub const WARN_DEPTH: u8 = 7;

    /// Allocates all slots up to `max_depth` and places the root into the first one.
    ///
    /// # Panics
    ///
    /// Panics if `max_depth` exceeds [`Self::MAX_DEPTH`].
    pub fn new(max_depth: u8) -> Self {
        assert!(
            max_depth <= Self::MAX_DEPTH,
            "array storage depth should not exceed {}",
            Self::MAX_DEPTH
        );

        let mut slots = Vec::new();
        slots.resize_with(Self::slot_count(max_depth), || None);
        slots[0] = Some(Box::default());

        Self {
            max_depth,
            slots,
            node_count: 1,
        }
    }

    /// The number of slots for all levels up to and including `max_depth`.
    pub fn slot_count(max_depth: u8) -> usize {
        Self::level_offset(max_depth + 1)
    }

    /// The number of slots of all levels above `depth`, i.e. `(8^depth - 1) / 7`.
    fn level_offset(depth: u8) -> usize {
        ((1 << (3 * usize::from(depth))) - 1) / 7
    }

    fn address(coords: NodeCoords) -> usize {
        let div = NodeCoords::cells_per_axis(coords.depth()) as usize;
        let [x, y, z] = coords.index().to_array().map(|value| value as usize);
        Self::level_offset(coords.depth()) + z * div * div + y * div + x
    }

    fn slot(&self, coords: NodeCoords) -> Option<&Option<Box<Node<G>>>> {
        if coords.is_valid(self.max_depth) {
            self.slots.get(Self::address(coords))
        } else {
            None
        }
    }

    fn slot_mut(&mut self, coords: NodeCoords) -> &mut Option<Box<Node<G>>> {
        assert!(
            coords.is_valid(self.max_depth),
            "node coordinates should not exceed max depth"
        );
        &mut self.slots[Self::address(coords)]
    }
}

impl<G> NodeStorage<G> for ArrayStorage<G> {
    fn max_depth(&self) -> u8 {
        self.max_depth
    }

    fn node(&self, coords: NodeCoords) -> Option<&Node<G>> {
        self.slot(coords)?.as_deref()
    }

    fn node_mut(&mut self, coords: NodeCoords) -> Option<&mut Node<G>> {
        if coords.is_valid(self.max_depth) {
            self.slot_mut(coords).as_deref_mut()
        } else {
            None
        }
    }

    fn insert_slot(&mut self, coords: NodeCoords, node: Node<G>) {
        let slot = self.slot_mut(coords);
        assert!(slot.is_none(), "slot should be empty");
        *slot = Some(Box::new(node));
        self.node_count += 1;
    }

    fn take_slot(&mut self, coords: NodeCoords) -> Option<Node<G>> {
        let node = self.slot_mut(coords).take()?;
        self.node_count -= 1;
        Some(*node)
    }

    fn node_count(&self) -> usize {
        self.node_count
    }

    fn current_size(&self) -> usize {
        size_of::<Self>()
            + self.slots.len() * size_of::<Option<Box<Node<G>>>>()
            + self.node_count * size_of::<Node<G>>()
    }
}
