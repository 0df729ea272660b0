//! Traits for support mapping based shapes.

use crate::math::{Isometry, Point, Real, Vector};

/// Traits of convex shapes representable by a support mapping function.
///
/// A support function is a function associating a vector to the furthest
/// point of a shape in this direction.
pub trait SupportMap {
    /// The furthest point of the shape in the direction `dir`, in the
    /// shape's local frame.
    fn local_support_point(&self, dir: &Vector<Real>) -> Point<Real>;

    /// The furthest point of the shape transformed by `transform`, in the
    /// direction `dir` expressed in the world frame.
    fn support_point(&self, transform: &Isometry<Real>, dir: &Vector<Real>) -> Point<Real> {
        let local_dir = transform.inverse_transform_vector(dir);
        transform * self.local_support_point(&local_dir)
    }
}
