use std::{hash::Hash, slice};

use arrayvec::ArrayVec;
use derive_where::derive_where;

use super::{coords::NodeCoords, storage::NodeStorage, Geometry, LooseOctree};
use crate::{
    math::{bounds::Aabb, frustum::Frustum, Intersection},
    math_enums::Corner3,
};

/// Counters describing the work done by a [`LooseOctree`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Statistics {
    /// Geometries returned by the last query.
    pub objects_visible: usize,
    /// Nodes visited by the last query, including the root.
    pub nodes_queried: usize,
    /// Nodes whose loose bounds the last query tested against the frustum.
    pub nodes_tested: usize,
    /// Geometries moved to a different node by updates since the last reset.
    pub nodes_reinserted: usize,
    /// Estimated memory used by the node storage after the last query, in bytes.
    pub storage_size: usize,
}

/// The loose bounds of all nodes that contributed geometry to a query.
pub type DebugQueryResult = Vec<Aabb>;

/// Visible geometries of a query, sorted into buckets by [`Geometry::bucket`].
#[derive(Clone, Debug, PartialEq, Eq)]
#[derive_where(Default)]
pub struct QueryResult<G> {
    buckets: Vec<Vec<G>>,
}

impl<G> QueryResult<G> {
    /// Constructs an empty [`QueryResult`] with the given number of buckets.
    pub fn with_buckets(bucket_count: usize) -> Self {
        let mut result = Self::default();
        result.resize(bucket_count);
        result
    }

    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Changes the number of buckets, dropping the contents of removed ones.
    pub fn resize(&mut self, bucket_count: usize) {
        self.buckets.resize_with(bucket_count, Vec::new);
    }

    /// Empties all buckets while keeping the bucket count.
    pub fn clear(&mut self) {
        for bucket in &mut self.buckets {
            bucket.clear();
        }
    }

    /// Returns the geometries in the given bucket, which is empty if it does not exist.
    pub fn bucket(&self, bucket: usize) -> &[G] {
        self.buckets.get(bucket).map_or(&[], Vec::as_slice)
    }

    pub fn buckets(&self) -> &[Vec<G>] {
        &self.buckets
    }

    /// The total number of geometries across all buckets.
    pub fn len(&self) -> usize {
        self.buckets.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.iter().all(Vec::is_empty)
    }

    /// Iterates all geometries, bucket by bucket.
    pub fn iter(&self) -> impl Iterator<Item = &G> {
        self.buckets.iter().flatten()
    }

    /// Adds a geometry to a bucket, growing the bucket count if necessary.
    pub(crate) fn push(&mut self, bucket: usize, geometry: G) {
        if bucket >= self.buckets.len() {
            self.resize(bucket + 1);
        }
        self.buckets[bucket].push(geometry);
    }
}

impl<'a, G> IntoIterator for &'a QueryResult<G> {
    type Item = &'a G;
    type IntoIter = std::iter::Flatten<slice::Iter<'a, Vec<G>>>;

    fn into_iter(self) -> Self::IntoIter {
        self.buckets.iter().flatten()
    }
}

/// How much of a node is visible to a frustum.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub enum Visibility {
    NotVisible,
    PartlyVisible,
    FullyVisible,
}

impl From<Intersection> for Visibility {
    fn from(intersection: Intersection) -> Self {
        match intersection {
            Intersection::Outside => Self::NotVisible,
            Intersection::Intersecting => Self::PartlyVisible,
            Intersection::Inside => Self::FullyVisible,
        }
    }
}

/// Each visited node pushes at most eight children after popping itself.
const QUERY_STACK_CAPACITY: usize = 7 * NodeCoords::MAX_DEPTH as usize + 8;

impl<G: Geometry + Clone + Eq + Hash> LooseOctree<G> {
    /// How much of the loose bounds of the node at `coords` the `frustum` can see.
    pub fn node_visibility(&self, coords: NodeCoords, frustum: &Frustum) -> Visibility {
        frustum.intersect_aabb(self.grid.loose_bounds(coords)).into()
    }

    /// Collects all geometries whose bounds are at least partially inside the `frustum`.
    ///
    /// `result` is cleared first. Nodes are visited depth first, children in [`Corner3`] order, so
    /// the order within each bucket is deterministic. Once a node is fully visible, its descendants
    /// are not tested against the frustum anymore, but each geometry still is.
    pub fn query(&mut self, frustum: &Frustum, result: &mut QueryResult<G>) {
        result.clear();

        let Self {
            grid,
            config,
            storage,
            statistics,
            debug_info,
            ..
        } = self;

        if config.collect_statistics {
            statistics.objects_visible = 0;
            statistics.nodes_queried = 0;
            statistics.nodes_tested = 0;
        }
        if config.collect_debug_info {
            debug_info.clear();
        }

        let mut stack = ArrayVec::<_, QUERY_STACK_CAPACITY>::new();
        stack.push((NodeCoords::ROOT, None));

        while let Some((coords, inherited)) = stack.pop() {
            if config.collect_statistics {
                statistics.nodes_queried += 1;
            }

            let visibility = inherited.unwrap_or_else(|| {
                if config.collect_statistics {
                    statistics.nodes_tested += 1;
                }
                Visibility::from(frustum.intersect_aabb(grid.loose_bounds(coords)))
            });
            if visibility == Visibility::NotVisible {
                continue;
            }

            let node = storage
                .node(coords)
                .expect("child slot should point to an existing node");

            let mut any_visible = false;
            for geometry in node.geometries() {
                let bounds = geometry.bounding_sphere().to_aabb();
                if frustum.intersect_aabb(bounds) != Intersection::Outside {
                    result.push(geometry.bucket(), geometry.clone());
                    any_visible = true;
                    if config.collect_statistics {
                        statistics.objects_visible += 1;
                    }
                }
            }
            if any_visible && config.collect_debug_info {
                debug_info.push(grid.loose_bounds(coords));
            }

            let inherited = (visibility == Visibility::FullyVisible).then_some(visibility);
            let children: ArrayVec<Corner3, 8> = node.children().iter().collect();
            for corner in children.into_iter().rev() {
                stack.push((coords.child(corner), inherited));
            }
        }

        if config.collect_statistics {
            statistics.storage_size = storage.current_size();
        }
    }
}
