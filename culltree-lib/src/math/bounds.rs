use glam::{Vec3, Vec4};

use super::{sphere::Sphere, Intersection};

/// Floating point axis-aligned bounds in 3D-space.
///
/// Stored as a center and the positive half-diagonal, which is the representation the plane test
/// works with directly.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Aabb {
    center: Vec3,
    half_diagonal: Vec3,
}

impl Aabb {
    /// Constructs [`Aabb`] from its `min` and `max` corners.
    ///
    /// Swapped corners along an axis result in a negative half-diagonal, which the plane test does
    /// not account for, so callers are expected to pass ordered corners.
    pub fn from_min_max(min: Vec3, max: Vec3) -> Self {
        Self {
            center: (max + min) * 0.5,
            half_diagonal: (max - min) * 0.5,
        }
    }

    /// Constructs [`Aabb`] with the given `half_extent` on every axis around `center`.
    pub fn cube(center: Vec3, half_extent: f32) -> Self {
        Self {
            center,
            half_diagonal: Vec3::splat(half_extent),
        }
    }

    /// The tightest [`Aabb`] around a [`Sphere`].
    pub fn from_sphere(sphere: Sphere) -> Self {
        Self::cube(sphere.center(), sphere.radius())
    }

    pub fn center(self) -> Vec3 {
        self.center
    }

    pub fn half_diagonal(self) -> Vec3 {
        self.half_diagonal
    }

    /// The inclusive lower corner.
    pub fn min(self) -> Vec3 {
        self.center - self.half_diagonal
    }

    /// The inclusive upper corner.
    pub fn max(self) -> Vec3 {
        self.center + self.half_diagonal
    }

    /// The smallest [`Aabb`] that encloses both `a` and `b`.
    pub fn unite(a: Self, b: Self) -> Self {
        Self::from_min_max(a.min().min(b.min()), a.max().max(b.max()))
    }

    /// Whether `other` lies entirely within these bounds.
    ///
    /// Inclusive, so touching faces still count as enclosed.
    pub fn encloses(self, other: Self) -> bool {
        self.min().cmple(other.min()).all() && other.max().cmple(self.max()).all()
    }

    /// Tests the bounds against a plane `(nx, ny, nz, d)` in Hesse normal form.
    ///
    /// A point `p` lies on the inner side if `dot((p, 1), plane)` is negative, i.e. plane normals
    /// point outward.
    pub fn intersect_plane(self, plane: Vec4) -> Intersection {
        let extent = self.half_diagonal.dot(plane.truncate().abs());
        let distance = self.center.extend(1.0).dot(plane);

        if distance - extent > 0.0 {
            Intersection::Outside
        } else if distance + extent < 0.0 {
            Intersection::Inside
        } else {
            Intersection::Intersecting
        }
    }
}
