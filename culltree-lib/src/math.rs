pub mod bounds;
pub mod frustum;
pub mod sphere;

/// The outcome of testing a volume against a plane or a set of planes.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub enum Intersection {
    /// The volume lies entirely on the outer side.
    Outside,
    /// The volume lies entirely on the inner side.
    Inside,
    /// The volume straddles the boundary.
    Intersecting,
}
