//! Shapes supported by collide3d.

pub use self::ball::Ball;
pub use self::capsule::Capsule;
pub use self::collision_geometry::{CollisionGeometry, GeometryData, NodeKind};
pub use self::cone::Cone;
pub use self::convex::ConvexHull;
pub use self::cuboid::Cuboid;
pub use self::cylinder::Cylinder;
pub use self::ellipsoid::Ellipsoid;
pub use self::half_space::HalfSpace;
pub use self::plane::Plane;
pub use self::support_map::SupportMap;
pub use self::triangle::Triangle;

mod ball;
mod capsule;
mod collision_geometry;
mod cone;
mod convex;
mod cuboid;
mod cylinder;
mod ellipsoid;
mod half_space;
mod plane;
mod support_map;
mod triangle;

use crate::bounding_volume::Aabb;

/// A convex collision primitive, tagged by its concrete variant.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub enum Shape {
    /// A box with arbitrary half-extents.
    Cuboid(Cuboid),
    /// A sphere.
    Ball(Ball),
    /// An axis-aligned ellipsoid.
    Ellipsoid(Ellipsoid),
    /// A capsule aligned with the local `y` axis.
    Capsule(Capsule),
    /// A cone aligned with the local `y` axis, apex up.
    Cone(Cone),
    /// A cylinder aligned with the local `y` axis.
    Cylinder(Cylinder),
    /// The convex hull of a point cloud.
    ConvexHull(ConvexHull),
    /// An infinite plane.
    Plane(Plane),
    /// An infinite half-space.
    HalfSpace(HalfSpace),
}

impl Shape {
    /// The `NodeKind` tag matching this shape variant.
    pub fn kind(&self) -> NodeKind {
        match self {
            Shape::Cuboid(_) => NodeKind::Cuboid,
            Shape::Ball(_) => NodeKind::Ball,
            Shape::Ellipsoid(_) => NodeKind::Ellipsoid,
            Shape::Capsule(_) => NodeKind::Capsule,
            Shape::Cone(_) => NodeKind::Cone,
            Shape::Cylinder(_) => NodeKind::Cylinder,
            Shape::ConvexHull(_) => NodeKind::Convex,
            Shape::Plane(_) => NodeKind::Plane,
            Shape::HalfSpace(_) => NodeKind::HalfSpace,
        }
    }

    /// The support-map representation of this shape, if it is bounded.
    ///
    /// Planes and half-spaces are unbounded and have no support map; the
    /// narrow phase handles them with dedicated closed forms.
    pub fn support_map(&self) -> Option<&dyn SupportMap> {
        match self {
            Shape::Cuboid(s) => Some(s),
            Shape::Ball(s) => Some(s),
            Shape::Ellipsoid(s) => Some(s),
            Shape::Capsule(s) => Some(s),
            Shape::Cone(s) => Some(s),
            Shape::Cylinder(s) => Some(s),
            Shape::ConvexHull(s) => Some(s),
            Shape::Plane(_) | Shape::HalfSpace(_) => None,
        }
    }

    /// The axis-aligned bounding box of this shape in its local frame.
    pub fn local_aabb(&self) -> Aabb {
        match self {
            Shape::Cuboid(s) => s.local_aabb(),
            Shape::Ball(s) => s.local_aabb(),
            Shape::Ellipsoid(s) => s.local_aabb(),
            Shape::Capsule(s) => s.local_aabb(),
            Shape::Cone(s) => s.local_aabb(),
            Shape::Cylinder(s) => s.local_aabb(),
            Shape::ConvexHull(s) => s.local_aabb(),
            Shape::Plane(_) | Shape::HalfSpace(_) => Aabb::new_infinite(),
        }
    }
}
