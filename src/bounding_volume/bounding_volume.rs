use crate::bounding_volume::{Aabb, Obb};
use crate::math::{Isometry, Point, Real};
use crate::shape::Cuboid;

/// Trait of bounding volumes.
///
/// Bounding volumes are coarse approximations of shapes. They are used as
/// the nodes of bounding-volume hierarchies to cheaply rule out
/// intersections between whole groups of primitives.
pub trait BoundingVolume: Clone + core::fmt::Debug {
    /// The center of this bounding volume.
    fn center(&self) -> Point<Real>;

    /// A measure of the extent of this bounding volume, used to decide
    /// which side of a traversal to descend first.
    fn size(&self) -> Real;

    /// Checks whether this bounding volume intersects `other`, both being
    /// expressed in the same frame.
    fn intersects(&self, other: &Self) -> bool;

    /// Checks whether this bounding volume contains the given point.
    fn contains_point(&self, pt: &Point<Real>) -> bool;

    /// The smallest bounding volume of this type enclosing both `self` and
    /// `other`.
    fn merged(&self, other: &Self) -> Self;

    /// Enlarges this bounding volume so it also encloses `other`.
    #[inline]
    fn merge(&mut self, other: &Self) {
        *self = self.merged(other);
    }

    /// An axis-aligned box enclosing this bounding volume, in the frame the
    /// volume is expressed in.
    fn local_aabb(&self) -> Aabb;

    /// A cuboid shape equivalent to the box part of this bounding volume,
    /// with the transform placing it in the volume's frame.
    fn to_cuboid(&self) -> (Isometry<Real>, Cuboid);
}

/// Trait of bounding volumes that can be tested for overlap across two
/// distinct frames without converting to world-space boxes.
///
/// Hierarchies built from these volumes use the oriented traversal
/// variants: the relative transform between the two operands is composed
/// once at initialization, and every per-node test runs in one operand's
/// local frame.
pub trait OrientedBv: BoundingVolume {
    /// This bounding volume, expressed in the frame `m` maps to.
    fn transformed(&self, m: &Isometry<Real>) -> Self;

    /// Checks whether this bounding volume intersects an oriented box
    /// expressed in the same frame.
    fn intersects_obb(&self, obb: &Obb) -> bool;
}
