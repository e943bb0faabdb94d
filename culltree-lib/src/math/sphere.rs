use glam::{Mat4, Vec3};

use super::bounds::Aabb;

/// A bounding sphere with a center and a radius.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Sphere {
    radius: f32,
    center: Vec3,
}

impl Sphere {
    pub const fn new(radius: f32, center: Vec3) -> Self {
        Self { radius, center }
    }

    pub const fn radius(self) -> f32 {
        self.radius
    }

    pub const fn center(self) -> Vec3 {
        self.center
    }

    /// The smallest sphere that contains both `a` and `b`.
    ///
    /// If the larger sphere already contains the smaller one, the larger one is returned unchanged.
    /// Otherwise the result touches both spheres from the outside.
    pub fn unite(a: Self, b: Self) -> Self {
        let (bigger, smaller) = if a.radius > b.radius { (a, b) } else { (b, a) };

        let center_diff = smaller.center - bigger.center;
        let distance = center_diff.length();

        if distance + smaller.radius <= bigger.radius {
            return bigger;
        }

        let radius = 0.5 * (distance + smaller.radius + bigger.radius);
        let factor = 0.5 * (smaller.radius + distance - bigger.radius) / distance;

        Self::new(radius, bigger.center + factor * center_diff)
    }

    /// Moves the sphere from model space into the space described by `model`.
    ///
    /// Only uniform scaling is supported; the new radius is measured along the transformed Z axis.
    pub fn transformed(self, model: &Mat4) -> Self {
        let center = model.transform_point3(self.center);
        let surface = model.transform_point3(self.center + Vec3::new(0.0, 0.0, self.radius));
        Self::new((surface - center).length(), center)
    }

    /// Whether `point` lies inside or on the sphere.
    pub fn contains(self, point: Vec3) -> bool {
        self.center.distance_squared(point) <= self.radius * self.radius
    }

    /// The tightest [`Aabb`] around this sphere.
    pub fn to_aabb(self) -> Aabb {
        Aabb::from_sphere(self)
    }
}
