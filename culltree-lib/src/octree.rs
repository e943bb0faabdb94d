pub mod coords;
pub mod grid;
pub mod node;
pub mod query;
pub(crate) mod storage;

use std::{
    collections::hash_map::Entry,
    fmt,
    hash::{Hash, Hasher},
    ops::Deref,
    ptr,
};

use derive_where::derive_where;
use glam::Vec3;
use itertools::Itertools;
use log::{debug, error, trace, warn};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use self::{
    coords::NodeCoords,
    grid::LooseGrid,
    query::{DebugQueryResult, Statistics},
    storage::{ArrayStorage, NodeStorage, Storage},
};
use crate::{config::OctreeConfig, error::OctreeError, math::sphere::Sphere};

/// Anything that can be stored in a [`LooseOctree`].
///
/// Implemented by the handles that the octree stores, so these should be cheap to clone and compare.
/// The octree never takes ownership of the actual scene objects.
pub trait Geometry {
    /// The world space bounding sphere.
    fn bounding_sphere(&self) -> Sphere;

    /// Whether the bounding sphere changed since the last [`LooseOctree::update`].
    ///
    /// Acknowledging changes is up to the owner of the geometry.
    fn has_changed(&self) -> bool;

    /// The render bucket this geometry is sorted into by queries.
    fn bucket(&self) -> usize {
        0
    }
}

impl<T: Geometry + ?Sized> Geometry for &T {
    fn bounding_sphere(&self) -> Sphere {
        T::bounding_sphere(self)
    }

    fn has_changed(&self) -> bool {
        T::has_changed(self)
    }

    fn bucket(&self) -> usize {
        T::bucket(self)
    }
}

/// A non-owning handle to a geometry that compares and hashes by address.
///
/// Two handles are equal only if they point at the very same object, so geometries with equal
/// values can still be stored side by side.
#[derive_where(Clone, Copy)]
pub struct GeometryRef<'a, T: ?Sized>(&'a T);

impl<'a, T: ?Sized> GeometryRef<'a, T> {
    pub fn new(geometry: &'a T) -> Self {
        Self(geometry)
    }

    pub fn get(self) -> &'a T {
        self.0
    }
}

impl<T: ?Sized> Deref for GeometryRef<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        self.0
    }
}

impl<T: ?Sized> PartialEq for GeometryRef<'_, T> {
    fn eq(&self, other: &Self) -> bool {
        ptr::eq(self.0, other.0)
    }
}

impl<T: ?Sized> Eq for GeometryRef<'_, T> {}

impl<T: ?Sized> Hash for GeometryRef<'_, T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        ptr::hash(self.0, state);
    }
}

impl<T: fmt::Debug + ?Sized> fmt::Debug for GeometryRef<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("GeometryRef")
            .field(&(self.0 as *const T))
            .field(&self.0)
            .finish()
    }
}

impl<T: Geometry + ?Sized> Geometry for GeometryRef<'_, T> {
    fn bounding_sphere(&self) -> Sphere {
        self.0.bounding_sphere()
    }

    fn has_changed(&self) -> bool {
        self.0.has_changed()
    }

    fn bucket(&self) -> usize {
        self.0.bucket()
    }
}

/// Selects how the nodes of a [`LooseOctree`] are stored.
#[derive(Clone, Copy, Debug, Default, Hash, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageType {
    /// Preallocates a slot for every possible node; only feasible for small depths.
    FullArray,
    /// Only stores nodes that exist in a hash map.
    #[default]
    SparseMap,
}

impl StorageType {
    /// The deepest `max_depth` this storage can be created with.
    pub fn max_depth_limit(self) -> u8 {
        match self {
            Self::FullArray => ArrayStorage::<()>::MAX_DEPTH,
            Self::SparseMap => NodeCoords::MAX_DEPTH,
        }
    }
}

/// Relative margin added around the world sphere by [`LooseOctree::fit`] and
/// [`LooseOctree::rebuild`].
const WORLD_PADDING: f32 = 1e-3;

/// World size used when all geometries collapse into a single point.
const MIN_WORLD_SIZE: f32 = 1e-3;

/// A loose octree that sorts geometries by their bounding spheres for fast frustum culling.
///
/// Every geometry is stored in exactly one node, chosen in constant time from the size and center
/// of its bounding sphere. Since cells are loose, a geometry never has to be split across nodes.
/// Nodes only exist while they, or any of their descendants, hold geometry.
///
/// Geometries are referred to by handles of type `G`, such as [`GeometryRef`]. The octree keeps a
/// lookup from handle to node, so [`Self::update`] can move geometries whose bounding spheres
/// changed without searching the tree.
#[derive(Debug)]
pub struct LooseOctree<G> {
    grid: LooseGrid,
    config: OctreeConfig,
    storage: Storage<G>,
    node_lookup: FxHashMap<G, NodeCoords>,
    statistics: Statistics,
    debug_info: DebugQueryResult,
}

impl<G> LooseOctree<G> {
    /// Constructs an empty [`LooseOctree`] spanning a cube with an edge length of `world_size`
    /// around `center`.
    pub fn new(world_size: f32, center: Vec3, config: OctreeConfig) -> Result<Self, OctreeError> {
        if !(world_size > 0.0 && world_size.is_finite()) {
            return Err(OctreeError::InvalidWorldSize(world_size));
        }
        config.validate()?;

        Ok(Self {
            grid: LooseGrid::new(world_size, center, config.max_depth),
            config,
            storage: Storage::new(config.storage, config.max_depth),
            node_lookup: FxHashMap::default(),
            statistics: Statistics::default(),
            debug_info: DebugQueryResult::new(),
        })
    }

    pub fn world_size(&self) -> f32 {
        self.grid.world_size()
    }

    pub fn center(&self) -> Vec3 {
        self.grid.center()
    }

    pub fn max_depth(&self) -> u8 {
        self.grid.max_depth()
    }

    pub fn storage_type(&self) -> StorageType {
        self.storage.storage_type()
    }

    pub fn config(&self) -> OctreeConfig {
        self.config
    }

    pub fn grid(&self) -> LooseGrid {
        self.grid
    }

    /// The number of tracked geometries.
    pub fn len(&self) -> usize {
        self.node_lookup.len()
    }

    pub fn is_empty(&self) -> bool {
        self.node_lookup.is_empty()
    }

    /// The number of nodes that currently exist, including the root.
    pub fn node_count(&self) -> usize {
        self.storage.node_count()
    }

    /// Iterates all tracked geometries in no particular order.
    pub fn geometries(&self) -> impl Iterator<Item = &G> {
        self.node_lookup.keys()
    }

    /// Returns [`None`] unless statistics are collected.
    pub fn statistics(&self) -> Option<&Statistics> {
        self.config.collect_statistics.then_some(&self.statistics)
    }

    pub fn reset_statistics(&mut self) {
        self.statistics = Statistics::default();
    }

    pub fn has_debug_info(&self) -> bool {
        self.config.collect_debug_info
    }

    /// The loose bounds of every node that contributed geometry to the last query.
    ///
    /// Returns [`None`] unless debug info is collected.
    pub fn debug_info(&self) -> Option<&DebugQueryResult> {
        self.config.collect_debug_info.then_some(&self.debug_info)
    }

    /// The coordinates of the node a geometry with the given bounding `sphere` would be stored in.
    ///
    /// Returns [`None`] if the sphere does not fit into the octree.
    pub fn get_node_coords(&self, sphere: Sphere) -> Option<NodeCoords> {
        self.grid.node_coords(sphere)
    }
}

impl<G: Geometry + Clone + Eq + Hash> LooseOctree<G> {
    /// Constructs a new [`LooseOctree`] that tightly encloses all `geometries` and inserts them.
    ///
    /// The world is the cube around the union of all bounding spheres, padded slightly so that
    /// geometries touching its boundary still fit. Fails if any geometry cannot be inserted,
    /// including when the same geometry is passed twice.
    pub fn fit(
        config: OctreeConfig,
        geometries: impl IntoIterator<Item = G>,
    ) -> Result<Self, OctreeError> {
        let geometries = geometries.into_iter().collect_vec();
        let world_sphere = geometries
            .iter()
            .map(Geometry::bounding_sphere)
            .reduce(Sphere::unite)
            .ok_or(OctreeError::NoGeometries)?;
        Self::around(world_sphere, config, geometries)
    }

    /// Grows the octree to enclose all of its geometries again.
    ///
    /// Meant to be called once [`Self::update`] reported that a geometry escaped. The current world
    /// is kept as part of the new one, so the octree never shrinks.
    ///
    /// If any geometry cannot be placed in the new octree, the error is returned and `self` is
    /// left untouched.
    pub fn rebuild(&mut self) -> Result<(), OctreeError> {
        let world_sphere = self
            .node_lookup
            .keys()
            .map(Geometry::bounding_sphere)
            .fold(
                Sphere::new(self.world_size() * 0.5, self.center()),
                Sphere::unite,
            );
        let geometries = self.node_lookup.keys().cloned().collect_vec();

        let statistics = self.statistics;
        *self = Self::around(world_sphere, self.config, geometries)?;
        self.statistics = statistics;

        debug!(
            "rebuilt octree with world size {} around {} holding {} geometries",
            self.world_size(),
            self.center(),
            self.len()
        );
        Ok(())
    }

    fn around(
        world_sphere: Sphere,
        config: OctreeConfig,
        geometries: Vec<G>,
    ) -> Result<Self, OctreeError> {
        // geometries touching the world sphere would otherwise land one cell past the grid
        let world_size = (world_sphere.radius() * 2.0 * (1.0 + WORLD_PADDING)).max(MIN_WORLD_SIZE);
        let mut octree = Self::new(world_size, world_sphere.center(), config)?;
        for geometry in geometries {
            octree.insert(geometry)?;
        }
        Ok(octree)
    }

    /// Inserts a new geometry, returning the coordinates of the node it ended up in.
    ///
    /// Geometries that do not fit into the octree, or are already part of it, are rejected.
    pub fn insert(&mut self, geometry: G) -> Result<NodeCoords, OctreeError> {
        let sphere = geometry.bounding_sphere();
        let Some(coords) = self.grid.node_coords(sphere) else {
            error!("skipping geometry with bounding sphere {sphere:?}, it does not fit into the octree");
            return Err(OctreeError::OutOfBounds(sphere));
        };

        match self.node_lookup.entry(geometry) {
            Entry::Occupied(_) => {
                error!("skipping geometry with bounding sphere {sphere:?}, it was already inserted");
                Err(OctreeError::AlreadyInserted)
            }
            Entry::Vacant(entry) => {
                self.storage.get_node(coords).push(entry.key().clone());
                entry.insert(coords);
                Ok(coords)
            }
        }
    }

    /// Removes a geometry, returning `false` if it was not part of the octree.
    ///
    /// Nodes that become empty are removed, along with any ancestors that become empty as a result.
    pub fn remove(&mut self, geometry: &G) -> bool {
        let Some(coords) = self.node_lookup.remove(geometry) else {
            return false;
        };

        let node = self
            .storage
            .node_mut(coords)
            .expect("tracked geometry should have a node");
        let removed = node.remove(geometry);
        assert!(removed, "node should contain the tracked geometry");
        if node.is_empty() {
            self.storage.remove_node(coords);
        }
        true
    }

    /// Whether the geometry is part of the octree.
    pub fn contains(&self, geometry: &G) -> bool {
        self.node_lookup.contains_key(geometry)
    }

    /// The coordinates of the node the geometry is currently stored in.
    pub fn node_coords_of(&self, geometry: &G) -> Option<NodeCoords> {
        self.node_lookup.get(geometry).copied()
    }

    /// Moves all changed geometries into the nodes that match their new bounding spheres.
    ///
    /// Returns `false` as soon as a geometry no longer fits into the octree, in which case the
    /// octree has to be [rebuilt](Self::rebuild). Geometries visited up to that point have already
    /// been moved.
    pub fn update(&mut self) -> bool {
        let Self {
            grid,
            config,
            storage,
            node_lookup,
            statistics,
            ..
        } = self;

        for (geometry, coords) in node_lookup.iter_mut() {
            if !geometry.has_changed() {
                continue;
            }

            let sphere = geometry.bounding_sphere();
            let Some(new_coords) = grid.node_coords(sphere) else {
                warn!("geometry with bounding sphere {sphere:?} escaped the octree");
                return false;
            };
            if new_coords == *coords {
                continue;
            }

            let old_node = storage
                .node_mut(*coords)
                .expect("tracked geometry should have a node");
            old_node.remove(geometry);
            if old_node.is_empty() {
                storage.remove_node(*coords);
            }
            storage.get_node(new_coords).push(geometry.clone());

            trace!("moved geometry from {coords:?} to {new_coords:?}");
            *coords = new_coords;
            if config.collect_statistics {
                statistics.nodes_reinserted += 1;
            }
        }

        true
    }

    /// Removes all geometries and nodes; only the empty root remains.
    pub fn clear(&mut self) {
        self.storage.remove_node(NodeCoords::ROOT);
        self.node_lookup.clear();
    }

    /// Checks the internal structure and panics on the first inconsistency.
    ///
    /// - Every node reachable from the root exists and, except for the root, is not empty.
    /// - No node exists that is unreachable from the root.
    /// - Every tracked geometry is stored exactly once, in the node its lookup entry points to.
    pub fn assert_consistent(&self) {
        let mut reachable = 0;
        let mut stored = 0;
        let mut pending = vec![NodeCoords::ROOT];

        while let Some(coords) = pending.pop() {
            let Some(node) = self.storage.node(coords) else {
                panic!("child slot points to missing node {coords:?}");
            };
            assert!(
                coords.is_root() || !node.is_empty(),
                "empty node {coords:?} should have been removed"
            );
            assert!(
                node.geometries().iter().all_unique(),
                "node {coords:?} holds the same geometry twice"
            );
            for geometry in node.geometries() {
                assert_eq!(
                    self.node_lookup.get(geometry),
                    Some(&coords),
                    "geometry in node {coords:?} has a stale lookup entry"
                );
            }

            reachable += 1;
            stored += node.geometries().len();
            pending.extend(node.children().iter().map(|corner| coords.child(corner)));
        }

        assert_eq!(
            reachable,
            self.storage.node_count(),
            "storage holds nodes that are unreachable from the root"
        );
        assert_eq!(
            stored,
            self.node_lookup.len(),
            "lookup tracks geometries that are not stored in any node"
        );
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use glam::UVec3;

    use super::*;
    use crate::change_tracking::Tracked;

    #[derive(Debug)]
    pub(crate) struct Ball {
        pub(crate) sphere: Tracked<Sphere>,
        pub(crate) bucket: usize,
    }

    impl Ball {
        pub(crate) fn new(radius: f32, center: Vec3) -> Self {
            Self {
                sphere: Tracked::new(Sphere::new(radius, center)),
                bucket: 0,
            }
        }
    }

    impl Geometry for Ball {
        fn bounding_sphere(&self) -> Sphere {
            self.sphere.get()
        }

        fn has_changed(&self) -> bool {
            self.sphere.changed()
        }

        fn bucket(&self) -> usize {
            self.bucket
        }
    }

    fn config(storage: StorageType) -> OctreeConfig {
        OctreeConfig {
            max_depth: 4,
            storage,
            collect_statistics: true,
            collect_debug_info: false,
        }
    }

    fn octrees<'a>() -> [LooseOctree<GeometryRef<'a, Ball>>; 2] {
        [StorageType::FullArray, StorageType::SparseMap]
            .map(|storage| LooseOctree::new(100.0, Vec3::ZERO, config(storage)).unwrap())
    }

    #[test]
    fn rejects_invalid_world_size() {
        for world_size in [0.0, -1.0, f32::INFINITY, f32::NAN] {
            let result = LooseOctree::<GeometryRef<Ball>>::new(
                world_size,
                Vec3::ZERO,
                OctreeConfig::default(),
            );
            assert!(matches!(result, Err(OctreeError::InvalidWorldSize(_))));
        }
    }

    #[test]
    fn rejects_too_deep_array() {
        let config = OctreeConfig {
            max_depth: 10,
            storage: StorageType::FullArray,
            ..Default::default()
        };
        let result = LooseOctree::<GeometryRef<Ball>>::new(1.0, Vec3::ZERO, config);
        assert_eq!(
            result.err(),
            Some(OctreeError::MaxDepthTooLarge {
                depth: 10,
                limit: 9,
                storage: StorageType::FullArray
            })
        );
    }

    #[test]
    fn insert_unit_sphere_at_origin() {
        let ball = Ball::new(1.0, Vec3::ZERO);
        for mut octree in octrees() {
            let coords = octree.insert(GeometryRef::new(&ball)).unwrap();
            assert_eq!(coords, NodeCoords::new(4, UVec3::splat(8)).unwrap());
            assert_eq!(octree.node_coords_of(&GeometryRef::new(&ball)), Some(coords));
            assert_eq!(octree.node_count(), 5);
            octree.assert_consistent();
        }
    }

    #[test]
    fn insert_rejects_duplicates_and_outsiders() {
        let ball = Ball::new(1.0, Vec3::ZERO);
        let outsider = Ball::new(1.0, Vec3::new(0.0, 0.0, 70.0));
        for mut octree in octrees() {
            octree.insert(GeometryRef::new(&ball)).unwrap();
            assert_eq!(
                octree.insert(GeometryRef::new(&ball)),
                Err(OctreeError::AlreadyInserted)
            );
            assert_eq!(
                octree.insert(GeometryRef::new(&outsider)),
                Err(OctreeError::OutOfBounds(outsider.bounding_sphere()))
            );
            assert_eq!(octree.len(), 1);
            octree.assert_consistent();
        }
    }

    #[test]
    fn equal_values_are_distinct_geometries() {
        let a = Ball::new(1.0, Vec3::ONE);
        let b = Ball::new(1.0, Vec3::ONE);
        for mut octree in octrees() {
            octree.insert(GeometryRef::new(&a)).unwrap();
            octree.insert(GeometryRef::new(&b)).unwrap();
            assert_eq!(octree.len(), 2);
            assert!(octree.remove(&GeometryRef::new(&a)));
            assert!(octree.contains(&GeometryRef::new(&b)));
            octree.assert_consistent();
        }
    }

    #[test]
    fn remove_cleans_up_nodes() {
        let small = Ball::new(1.0, Vec3::new(20.0, 20.0, 20.0));
        let big = Ball::new(20.0, Vec3::new(-10.0, 0.0, 0.0));
        for mut octree in octrees() {
            octree.insert(GeometryRef::new(&small)).unwrap();
            octree.insert(GeometryRef::new(&big)).unwrap();

            assert!(octree.remove(&GeometryRef::new(&small)));
            assert!(!octree.remove(&GeometryRef::new(&small)));
            octree.assert_consistent();

            assert!(octree.remove(&GeometryRef::new(&big)));
            assert_eq!(octree.node_count(), 1);
            assert!(octree.is_empty());
            octree.assert_consistent();
        }
    }

    #[test]
    fn remove_keeps_parent_with_descendants() {
        // stored at depth 1, with a deeper geometry inside the same octant
        let parent = Ball::new(20.0, Vec3::new(-25.0, -25.0, -25.0));
        let child = Ball::new(1.0, Vec3::new(-30.0, -30.0, -30.0));
        for mut octree in octrees() {
            let parent_coords = octree.insert(GeometryRef::new(&parent)).unwrap();
            let child_coords = octree.insert(GeometryRef::new(&child)).unwrap();
            assert_eq!(parent_coords.depth(), 1);
            assert_eq!(child_coords.depth(), 4);

            assert!(octree.remove(&GeometryRef::new(&parent)));
            assert_eq!(octree.node_coords_of(&GeometryRef::new(&child)), Some(child_coords));
            assert_eq!(octree.node_count(), 5);
            octree.assert_consistent();
        }
    }

    #[test]
    fn update_without_changes() {
        let ball = Ball::new(1.0, Vec3::ZERO);
        for mut octree in octrees() {
            octree.insert(GeometryRef::new(&ball)).unwrap();
            let nodes = octree.node_count();

            assert!(octree.update());

            assert_eq!(octree.node_count(), nodes);
            assert_eq!(octree.statistics().unwrap().nodes_reinserted, 0);
            octree.assert_consistent();
        }
    }

    #[test]
    fn update_moves_changed_geometry() {
        let ball = Ball::new(1.0, Vec3::ZERO);
        for mut octree in octrees() {
            octree.insert(GeometryRef::new(&ball)).unwrap();

            ball.sphere.set(Sphere::new(1.0, Vec3::new(-40.0, 40.0, 10.0)));
            assert!(octree.update());
            ball.sphere.acknowledge();

            let coords = octree.node_coords_of(&GeometryRef::new(&ball)).unwrap();
            assert_eq!(coords, NodeCoords::new(4, UVec3::new(1, 14, 9)).unwrap());
            assert_eq!(octree.node_count(), 5);
            assert_eq!(octree.statistics().unwrap().nodes_reinserted, 1);
            octree.assert_consistent();

            ball.sphere.set(Sphere::new(1.0, Vec3::ZERO));
            ball.sphere.acknowledge();
        }
    }

    #[test]
    fn update_reports_escape() {
        let ball = Ball::new(1.0, Vec3::ZERO);
        for mut octree in octrees() {
            octree.insert(GeometryRef::new(&ball)).unwrap();

            ball.sphere.set(Sphere::new(1.0, Vec3::new(80.0, 0.0, 0.0)));
            assert!(!octree.update());
            octree.assert_consistent();

            octree.rebuild().unwrap();
            assert!(octree.world_size() > 100.0);
            assert!(octree.contains(&GeometryRef::new(&ball)));
            octree.assert_consistent();
            ball.sphere.reset();
        }
    }

    #[test]
    fn clear_keeps_root() {
        let balls = [
            Ball::new(1.0, Vec3::ZERO),
            Ball::new(30.0, Vec3::ZERO),
            Ball::new(2.0, Vec3::splat(-30.0)),
        ];
        for mut octree in octrees() {
            for ball in &balls {
                octree.insert(GeometryRef::new(ball)).unwrap();
            }
            octree.clear();
            assert!(octree.is_empty());
            assert_eq!(octree.node_count(), 1);
            octree.assert_consistent();
        }
    }

    #[test]
    fn fit_encloses_all_geometries() {
        let balls = [
            Ball::new(1.0, Vec3::new(100.0, 0.0, 0.0)),
            Ball::new(3.0, Vec3::new(-20.0, 5.0, 0.0)),
            Ball::new(0.5, Vec3::new(40.0, -30.0, 12.0)),
        ];
        let octree = LooseOctree::fit(
            config(StorageType::SparseMap),
            balls.iter().map(GeometryRef::new),
        )
        .unwrap();
        assert_eq!(octree.len(), 3);
        octree.assert_consistent();

        let empty = LooseOctree::<GeometryRef<Ball>>::fit(OctreeConfig::default(), []);
        assert_eq!(empty.err(), Some(OctreeError::NoGeometries));
    }

    #[test]
    fn fit_keeps_geometries_on_the_world_boundary() {
        let points = [
            Ball::new(0.0, Vec3::new(-10.0, 0.0, 0.0)),
            Ball::new(0.0, Vec3::new(10.0, 0.0, 0.0)),
        ];
        for storage in [StorageType::FullArray, StorageType::SparseMap] {
            let octree =
                LooseOctree::fit(config(storage), points.iter().map(GeometryRef::new)).unwrap();
            assert_eq!(octree.len(), 2);
            assert!(octree.world_size() > 20.0);
            for point in &points {
                let coords = octree.node_coords_of(&GeometryRef::new(point)).unwrap();
                assert_eq!(coords.depth(), octree.max_depth());
            }
            octree.assert_consistent();
        }

        let single = Ball::new(0.0, Vec3::splat(3.0));
        let octree = LooseOctree::fit(
            config(StorageType::SparseMap),
            [GeometryRef::new(&single)],
        )
        .unwrap();
        assert!(octree.contains(&GeometryRef::new(&single)));
    }

    #[test]
    fn fit_rejects_duplicates() {
        let ball = Ball::new(1.0, Vec3::ZERO);
        let result = LooseOctree::fit(
            config(StorageType::SparseMap),
            [GeometryRef::new(&ball), GeometryRef::new(&ball)],
        );
        assert_eq!(result.err(), Some(OctreeError::AlreadyInserted));
    }

    #[test]
    fn failed_rebuild_keeps_every_geometry() {
        let balls = [Ball::new(1.0, Vec3::ZERO), Ball::new(2.0, Vec3::splat(20.0))];
        for mut octree in octrees() {
            for ball in &balls {
                octree.insert(GeometryRef::new(ball)).unwrap();
            }

            balls[1].sphere.set(Sphere::new(f32::NAN, Vec3::ZERO));
            assert!(!octree.update());
            assert!(matches!(
                octree.rebuild(),
                Err(OctreeError::InvalidWorldSize(size)) if size.is_nan()
            ));

            assert_eq!(octree.len(), 2);
            assert_eq!(octree.world_size(), 100.0);
            assert!(balls
                .iter()
                .all(|ball| octree.contains(&GeometryRef::new(ball))));
            octree.assert_consistent();

            balls[1].sphere.reset();
            assert!(octree.update());
        }
    }
}
