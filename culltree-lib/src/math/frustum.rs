use enum_map::{enum_map, Enum, EnumMap};
use glam::{Mat4, Vec4};

use super::{bounds::Aabb, Intersection};

/// One of the six planes bounding a [`Frustum`].
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord, Enum)]
pub enum FrustumPlane {
    Left,
    Right,
    Bottom,
    Top,
    Near,
    Far,
}

/// A view frustum represented by six planes in Hesse normal form.
///
/// All plane normals point outward, so a point is on the inner side of a plane if its homogeneous
/// dot product with the plane is negative. This matches [`Aabb::intersect_plane`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Frustum {
    planes: EnumMap<FrustumPlane, Vec4>,
}

impl Frustum {
    /// Extracts the planes from a combined `projection * view` matrix.
    ///
    /// Expects OpenGL clip space conventions, i.e. depth in `[-1, 1]` as produced by e.g.
    /// [`Mat4::perspective_rh_gl`].
    pub fn from_view_projection(view_projection: &Mat4) -> Self {
        let [r0, r1, r2, r3] = [0, 1, 2, 3].map(|index| view_projection.row(index));

        Self::from_planes(enum_map! {
            FrustumPlane::Left => -(r3 + r0),
            FrustumPlane::Right => -(r3 - r0),
            FrustumPlane::Bottom => -(r3 + r1),
            FrustumPlane::Top => -(r3 - r1),
            FrustumPlane::Near => -(r3 + r2),
            FrustumPlane::Far => -(r3 - r2),
        })
    }

    /// Constructs a [`Frustum`] from arbitrary planes with outward facing normals.
    ///
    /// The planes are normalized so that their normals have unit length.
    pub fn from_planes(planes: EnumMap<FrustumPlane, Vec4>) -> Self {
        Self {
            planes: planes.map(|_, plane| plane / plane.truncate().length()),
        }
    }

    /// Returns the normalized plane in Hesse normal form.
    pub fn plane(&self, plane: FrustumPlane) -> Vec4 {
        self.planes[plane]
    }

    pub fn planes(&self) -> &EnumMap<FrustumPlane, Vec4> {
        &self.planes
    }

    /// Tests an [`Aabb`] against all six planes.
    ///
    /// Stops at the first plane that has the box fully outside. Otherwise the box is
    /// [`Intersection::Intersecting`] if any plane cuts through it and [`Intersection::Inside`] if
    /// none does.
    pub fn intersect_aabb(&self, aabb: Aabb) -> Intersection {
        let mut intersecting = false;
        for &plane in self.planes.values() {
            match aabb.intersect_plane(plane) {
                Intersection::Outside => return Intersection::Outside,
                Intersection::Intersecting => intersecting = true,
                Intersection::Inside => {}
            }
        }

        if intersecting {
            Intersection::Intersecting
        } else {
            Intersection::Inside
        }
    }
}
