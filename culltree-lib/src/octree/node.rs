use derive_where::derive_where;

use crate::math_enums::{Corner3, Corners3};

/// A single cell of a loose octree that is backed by storage.
///
/// Child nodes are not owned directly; the node only tracks which of its eight child slots are
/// occupied, while the nodes themselves live in the storage, addressed by their coordinates.
#[derive(Clone, Debug)]
#[derive_where(Default)]
pub struct Node<G> {
    geometries: Vec<G>,
    children: Corners3,
}

impl<G> Node<G> {
    pub fn geometries(&self) -> &[G] {
        &self.geometries
    }

    pub fn children(&self) -> Corners3 {
        self.children
    }

    pub fn has_child(&self, corner: Corner3) -> bool {
        self.children.contains(corner)
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// Neither holds any geometry nor has any children.
    pub fn is_empty(&self) -> bool {
        self.geometries.is_empty() && self.children.is_empty()
    }

    pub(crate) fn children_mut(&mut self) -> &mut Corners3 {
        &mut self.children
    }

    pub(crate) fn push(&mut self, geometry: G) {
        self.geometries.push(geometry);
    }

    /// Removes the first occurrence of `geometry` while keeping the order of the remaining ones.
    pub(crate) fn remove(&mut self, geometry: &G) -> bool
    where
        G: PartialEq,
    {
        if let Some(index) = self.geometries.iter().position(|other| other == geometry) {
            self.geometries.remove(index);
            true
        } else {
            false
        }
    }

    pub(crate) fn clear_geometries(&mut self) {
        self.geometries.clear();
    }
}
