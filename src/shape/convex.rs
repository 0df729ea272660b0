use crate::bounding_volume::Aabb;
use crate::math::{Point, Real, Vector};
use crate::shape::SupportMap;

/// The convex hull of a set of points.
///
/// The hull is represented by its vertices only; the support mapping does
/// not require face or adjacency information.
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
#[derive(PartialEq, Debug, Clone)]
pub struct ConvexHull {
    points: Vec<Point<Real>>,
}

impl ConvexHull {
    /// Creates a convex hull from the given point cloud.
    ///
    /// Returns `None` if `points` is empty. Interior points are harmless:
    /// they never win the support-point selection.
    pub fn from_points(points: Vec<Point<Real>>) -> Option<ConvexHull> {
        if points.is_empty() {
            None
        } else {
            Some(ConvexHull { points })
        }
    }

    /// The vertices of this convex hull.
    #[inline]
    pub fn points(&self) -> &[Point<Real>] {
        &self.points
    }

    /// The axis-aligned bounding box of this hull in its local frame.
    #[inline]
    pub fn local_aabb(&self) -> Aabb {
        Aabb::from_points(&self.points)
    }
}

impl SupportMap for ConvexHull {
    #[inline]
    fn local_support_point(&self, dir: &Vector<Real>) -> Point<Real> {
        let mut best = self.points[0];
        let mut best_dot = best.coords.dot(dir);

        for pt in &self.points[1..] {
            let dot = pt.coords.dot(dir);
            if dot > best_dot {
                best = *pt;
                best_dot = dot;
            }
        }

        best
    }
}
