pub mod array;
pub mod map;

use std::mem;

use super::{coords::NodeCoords, node::Node, StorageType};

pub use self::{array::ArrayStorage, map::MapStorage};

/// Holds the nodes of a loose octree addressed by their [`NodeCoords`].
///
/// Implementors only provide a handful of slot primitives. Creating and removing nodes, including
/// keeping the child slots of parents in sync, is built on top of those.
///
/// The root node always exists.
pub trait NodeStorage<G> {
    /// The deepest level that can be stored.
    fn max_depth(&self) -> u8;

    fn node(&self, coords: NodeCoords) -> Option<&Node<G>>;

    fn node_mut(&mut self, coords: NodeCoords) -> Option<&mut Node<G>>;

    /// Places a node into a currently empty slot.
    fn insert_slot(&mut self, coords: NodeCoords, node: Node<G>);

    /// Takes the node out of its slot, leaving it empty.
    fn take_slot(&mut self, coords: NodeCoords) -> Option<Node<G>>;

    /// The number of nodes currently stored, including the root.
    fn node_count(&self) -> usize;

    /// An estimate of the memory used by this storage in bytes.
    fn current_size(&self) -> usize;

    #[cfg(test)]
    fn root_node(&self) -> &Node<G> {
        self.node(NodeCoords::ROOT)
            .expect("root node should always exist")
    }

    fn root_node_mut(&mut self) -> &mut Node<G> {
        self.node_mut(NodeCoords::ROOT)
            .expect("root node should always exist")
    }

    fn exists(&self, coords: NodeCoords) -> bool {
        self.node(coords).is_some()
    }

    /// Returns the node at `coords`, creating it along with any missing ancestors.
    ///
    /// # Panics
    ///
    /// Panics if `coords` exceed [`Self::max_depth`].
    fn get_node(&mut self, coords: NodeCoords) -> &mut Node<G> {
        assert!(
            coords.is_valid(self.max_depth()),
            "node coordinates should not exceed max depth"
        );

        if !self.exists(coords) {
            self.insert_slot(coords, Node::default());
            if let Some((parent, corner)) = coords.parent() {
                let children = self.get_node(parent).children_mut();
                assert!(
                    !children.contains(corner),
                    "child slot of a missing node should be empty"
                );
                children.insert(corner);
            }
        }

        self.node_mut(coords)
            .expect("node should exist after creation")
    }

    /// Removes the node at `coords` along with all of its descendants.
    ///
    /// Afterwards, ancestors that became empty are removed as well. The root itself is never
    /// removed; removing it only drops its geometries and children.
    fn remove_node(&mut self, coords: NodeCoords) {
        if self.exists(coords) {
            self.remove_descendants(coords);
            self.remove_empty_ancestors(coords);
        }
    }

    fn remove_descendants(&mut self, coords: NodeCoords) {
        let Some(node) = self.node_mut(coords) else {
            return;
        };
        let children = mem::take(node.children_mut());
        for corner in children {
            self.remove_descendants(coords.child(corner));
        }

        if coords.is_root() {
            self.root_node_mut().clear_geometries();
        } else {
            self.take_slot(coords);
        }
    }

    fn remove_empty_ancestors(&mut self, coords: NodeCoords) {
        let Some((parent, corner)) = coords.parent() else {
            return;
        };
        let parent_node = self
            .node_mut(parent)
            .expect("parent of a stored node should exist");
        parent_node.children_mut().remove(corner);

        if parent_node.is_empty() && !parent.is_root() {
            self.take_slot(parent);
            self.remove_empty_ancestors(parent);
        }
    }
}

/// One of the available storage backends, selected at runtime through [`StorageType`].
#[derive(Clone, Debug)]
pub enum Storage<G> {
    FullArray(ArrayStorage<G>),
    SparseMap(MapStorage<G>),
}

impl<G> Storage<G> {
    /// Creates an empty storage that only contains the root.
    ///
    /// The `max_depth` must already be validated against [`StorageType::max_depth_limit`].
    pub fn new(storage_type: StorageType, max_depth: u8) -> Self {
        match storage_type {
            StorageType::FullArray => Self::FullArray(ArrayStorage::new(max_depth)),
            StorageType::SparseMap => Self::SparseMap(MapStorage::new(max_depth)),
        }
    }

    pub fn storage_type(&self) -> StorageType {
        match self {
            Self::FullArray(_) => StorageType::FullArray,
            Self::SparseMap(_) => StorageType::SparseMap,
        }
    }
}

macro_rules! dispatch {
    ( $self:ident.$method:ident( $( $arg:expr ),* ) ) => {
        match $self {
            Self::FullArray(storage) => storage.$method( $( $arg ),* ),
            Self::SparseMap(storage) => storage.$method( $( $arg ),* ),
        }
    };
}

impl<G> NodeStorage<G> for Storage<G> {
    fn max_depth(&self) -> u8 {
        dispatch!(self.max_depth())
    }

    fn node(&self, coords: NodeCoords) -> Option<&Node<G>> {
        dispatch!(self.node(coords))
    }

    fn node_mut(&mut self, coords: NodeCoords) -> Option<&mut Node<G>> {
        dispatch!(self.node_mut(coords))
    }

    fn insert_slot(&mut self, coords: NodeCoords, node: Node<G>) {
        dispatch!(self.insert_slot(coords, node))
    }

    fn take_slot(&mut self, coords: NodeCoords) -> Option<Node<G>> {
        dispatch!(self.take_slot(coords))
    }

    fn node_count(&self) -> usize {
        dispatch!(self.node_count())
    }

    fn current_size(&self) -> usize {
        dispatch!(self.current_size())
    }
}
