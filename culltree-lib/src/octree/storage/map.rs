use std::mem::size_of;

use rustc_hash::FxHashMap;

use super::NodeStorage;
use crate::octree::{coords::NodeCoords, node::Node};

/// Stores only the nodes that exist in a hash map keyed by their coordinates.
///
/// Memory is proportional to the number of nodes, so this works for any depth.
#[derive(Clone, Debug)]
pub struct MapStorage<G> {
    max_depth: u8,
    nodes: FxHashMap<NodeCoords, Node<G>>,
}

impl<G> MapStorage<G> {
    /// Constructs a new [`MapStorage`] that only contains the root.
    pub fn new(max_depth: u8) -> Self {
        let mut nodes = FxHashMap::default();
        nodes.insert(NodeCoords::ROOT, Node::default());
        Self { max_depth, nodes }
    }
}

impl<G> NodeStorage<G> for MapStorage<G> {
    fn max_depth(&self) -> u8 {
        self.max_depth
    }

    fn node(&self, coords: NodeCoords) -> Option<&Node<G>> {
        self.nodes.get(&coords)
    }

    fn node_mut(&mut self, coords: NodeCoords) -> Option<&mut Node<G>> {
        self.nodes.get_mut(&coords)
    }

    fn insert_slot(&mut self, coords: NodeCoords, node: Node<G>) {
        assert!(
            coords.is_valid(self.max_depth),
            "node coordinates should not exceed max depth"
        );
        let previous = self.nodes.insert(coords, node);
        assert!(previous.is_none(), "slot should be empty");
    }

    fn take_slot(&mut self, coords: NodeCoords) -> Option<Node<G>> {
        self.nodes.remove(&coords)
    }

    fn node_count(&self) -> usize {
        self.nodes.len()
    }

    fn current_size(&self) -> usize {
        size_of::<Self>() + self.nodes.len() * size_of::<(NodeCoords, Node<G>)>()
    }
}

#[cfg(test)]
mod tests {
    use glam::UVec3;

    use super::*;

    #[test]
    fn insert_and_take() {
        let mut storage = MapStorage::<u32>::new(20);
        let coords = NodeCoords::new(20, UVec3::splat(123_456)).unwrap();
        storage.insert_slot(coords, Node::default());
        assert!(storage.node(coords).is_some());
        assert_eq!(storage.node_count(), 2);
        assert!(storage.take_slot(coords).is_some());
        assert!(storage.take_slot(coords).is_none());
        assert_eq!(storage.node_count(), 1);
    }

    #[test]
    #[should_panic(expected = "slot should be empty")]
    fn double_insert() {
        let mut storage = MapStorage::<u32>::new(2);
        storage.insert_slot(NodeCoords::ROOT, Node::default());
    }

    #[test]
    fn size_tracks_population() {
        let mut storage = MapStorage::<u32>::new(3);
        let empty = storage.current_size();
        let coords = NodeCoords::new(3, UVec3::new(1, 2, 3)).unwrap();
        storage.insert_slot(coords, Node::default());
        assert!(storage.current_size() > empty);
        storage.take_slot(coords);
        assert_eq!(storage.current_size(), empty);
    }
}
