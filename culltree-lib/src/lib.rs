//! A loose octree for sorting renderable geometry by bounding sphere and culling it against a view
//! frustum.

pub mod change_tracking;
pub mod config;
pub mod error;
pub mod math;
pub mod math_enums;
pub mod octree;
