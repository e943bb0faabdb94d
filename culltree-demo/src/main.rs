use std::{cell::Cell, env, error::Error, f32::consts::TAU, fs};

use culltree_lib::{
    change_tracking::Tracked,
    config::OctreeConfig,
    math::{frustum::Frustum, sphere::Sphere},
    octree::{query::QueryResult, Geometry, GeometryRef, LooseOctree},
};
use glam::{Mat4, Vec3};
use itertools::Itertools;
use log::{debug, info};
use rand::{rngs::StdRng, Rng, SeedableRng};

const OBJECT_COUNT: usize = 2000;
const BUCKET_COUNT: usize = 4;
const FRAME_COUNT: u32 = 240;
const TIME_STEP: f32 = 1.0 / 60.0;
const SCENE_EXTENT: f32 = 200.0;

/// A moving object with a bounding sphere in model space.
struct SceneObject {
    model_sphere: Sphere,
    position: Cell<Vec3>,
    velocity: Vec3,
    bucket: usize,
    world_sphere: Tracked<Sphere>,
}

impl SceneObject {
    fn random(rng: &mut StdRng) -> Self {
        let position = random_vec3(rng, SCENE_EXTENT);
        let model_sphere = Sphere::new(rng.random_range(0.5..4.0), Vec3::ZERO);
        let speed = if rng.random_bool(0.1) { 20.0 } else { 0.0 };
        Self {
            model_sphere,
            position: Cell::new(position),
            velocity: random_vec3(rng, speed),
            bucket: rng.random_range(0..BUCKET_COUNT),
            world_sphere: Tracked::new(
                model_sphere.transformed(&Mat4::from_translation(position)),
            ),
        }
    }

    fn animate(&self, time_step: f32) {
        if self.velocity == Vec3::ZERO {
            return;
        }
        let position = self.position.get() + self.velocity * time_step;
        self.position.set(position);
        self.world_sphere
            .set(self.model_sphere.transformed(&Mat4::from_translation(position)));
    }
}

impl Geometry for SceneObject {
    fn bounding_sphere(&self) -> Sphere {
        self.world_sphere.get()
    }

    fn has_changed(&self) -> bool {
        self.world_sphere.changed()
    }

    fn bucket(&self) -> usize {
        self.bucket
    }
}

fn random_vec3(rng: &mut StdRng, extent: f32) -> Vec3 {
    if extent == 0.0 {
        return Vec3::ZERO;
    }
    Vec3::new(
        rng.random_range(-extent..extent),
        rng.random_range(-extent..extent),
        rng.random_range(-extent..extent),
    )
}

/// Reads the config from the JSON file given as the first argument, if any.
fn load_config() -> Result<OctreeConfig, Box<dyn Error>> {
    let Some(path) = env::args().nth(1) else {
        return Ok(OctreeConfig {
            collect_statistics: true,
            ..Default::default()
        });
    };
    let config: OctreeConfig = serde_json::from_str(&fs::read_to_string(&path)?)?;
    config.validate()?;
    info!("loaded {config:?} from {path}");
    Ok(config)
}

/// A camera circling the scene while looking at its center.
fn orbit_frustum(frame: u32) -> Frustum {
    let angle = TAU * frame as f32 / FRAME_COUNT as f32;
    let eye = Vec3::new(angle.cos(), 0.3, angle.sin()) * SCENE_EXTENT * 1.5;
    let view = Mat4::look_at_rh(eye, Vec3::ZERO, Vec3::Y);
    let projection = Mat4::perspective_rh_gl(60f32.to_radians(), 16.0 / 9.0, 1.0, 1000.0);
    Frustum::from_view_projection(&(projection * view))
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let config = load_config()?;
    let mut rng = StdRng::seed_from_u64(42);
    let objects = (0..OBJECT_COUNT)
        .map(|_| SceneObject::random(&mut rng))
        .collect_vec();

    let mut octree = LooseOctree::fit(config, objects.iter().map(GeometryRef::new))?;
    info!(
        "octree with world size {:.1} around {} holds {} objects in {} nodes",
        octree.world_size(),
        octree.center(),
        octree.len(),
        octree.node_count()
    );

    let mut result = QueryResult::with_buckets(BUCKET_COUNT);
    let mut rebuilds = 0;

    for frame in 0..FRAME_COUNT {
        for object in &objects {
            object.animate(TIME_STEP);
        }
        if !octree.update() {
            octree.rebuild()?;
            rebuilds += 1;
        }
        for object in &objects {
            object.world_sphere.acknowledge();
        }

        octree.query(&orbit_frustum(frame), &mut result);

        if let Some(statistics) = octree.statistics() {
            debug!("frame {frame}: {statistics:?}");
        }
        if frame % 60 == 0 {
            info!(
                "frame {frame}: {} of {} objects visible, per bucket [{}]",
                result.len(),
                objects.len(),
                result.buckets().iter().map(Vec::len).join(", ")
            );
        }
    }

    info!(
        "finished {FRAME_COUNT} frames with {rebuilds} rebuilds, final world size {:.1}",
        octree.world_size()
    );
    if let Some(statistics) = octree.statistics() {
        info!(
            "{} reinsertions, storage uses {} bytes",
            statistics.nodes_reinserted, statistics.storage_size
        );
    }
    if let Some(debug_info) = octree.debug_info() {
        info!("last query touched {} non-empty nodes", debug_info.len());
    }

    Ok(())
}
