#![allow(dead_code)]

use culltree_lib::{
    change_tracking::Tracked,
    math::{frustum::Frustum, sphere::Sphere},
    octree::{Geometry, GeometryRef},
};
use glam::{Mat4, Vec3};
use rand::{rngs::StdRng, Rng, SeedableRng};

pub type Handle<'a> = GeometryRef<'a, SceneObject>;

/// A scene object whose bounding sphere can be moved around.
#[derive(Debug)]
pub struct SceneObject {
    pub sphere: Tracked<Sphere>,
    pub bucket: usize,
}

impl SceneObject {
    pub fn new(radius: f32, center: Vec3) -> Self {
        Self {
            sphere: Tracked::new(Sphere::new(radius, center)),
            bucket: 0,
        }
    }

    pub fn handle(&self) -> Handle<'_> {
        GeometryRef::new(self)
    }

    pub fn move_to(&self, center: Vec3) {
        self.sphere.set(Sphere::new(self.sphere.get().radius(), center));
    }
}

impl Geometry for SceneObject {
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

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn rng() -> StdRng {
    StdRng::seed_from_u64(0x0C7_7EE)
}

pub fn random_point(rng: &mut StdRng, extent: f32) -> Vec3 {
    Vec3::new(
        rng.random_range(-extent..extent),
        rng.random_range(-extent..extent),
        rng.random_range(-extent..extent),
    )
}

/// Objects of mixed sizes scattered within `extent` of the origin.
pub fn random_objects(rng: &mut StdRng, count: usize, extent: f32) -> Vec<SceneObject> {
    (0..count)
        .map(|index| {
            let radius = if index % 10 == 0 {
                rng.random_range(5.0..15.0)
            } else {
                rng.random_range(0.1..2.0)
            };
            let mut object = SceneObject::new(radius, random_point(rng, extent));
            object.bucket = index % 3;
            object
        })
        .collect()
}

/// A perspective frustum at `eye` looking at `target`.
pub fn camera_frustum(eye: Vec3, target: Vec3) -> Frustum {
    let projection = Mat4::perspective_rh_gl(60f32.to_radians(), 16.0 / 9.0, 0.5, 80.0);
    let view = Mat4::look_at_rh(eye, target, Vec3::Y);
    Frustum::from_view_projection(&(projection * view))
}
