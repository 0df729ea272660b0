//! Rectangle swept sphere.

use crate::bounding_volume::{Aabb, BoundingVolume, Obb, OrientedBv};
use crate::math::{Isometry, Matrix, Point, Real, Vector, DIM};
use crate::shape::Cuboid;

/// A rectangle-swept-sphere bounding volume: the set of points within
/// `radius` of an oriented rectangle.
///
/// The rectangle lies in the plane of the first two axes; the third axis
/// is its normal.
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
#[derive(Debug, PartialEq, Copy, Clone)]
pub struct Rss {
    /// The center of the rectangle.
    pub center: Point<Real>,
    /// The orientation of the rectangle; each column is one local axis.
    pub axes: Matrix<Real>,
    /// The half-lengths of the rectangle along the first two axes.
    pub half_lengths: [Real; 2],
    /// The radius of the sphere swept along the rectangle.
    pub radius: Real,
}

impl Rss {
    /// Fits a rectangle-swept-sphere with the given axes to a set of points.
    ///
    /// The rectangle spans the extent of the points along the first two
    /// axes; the swept radius covers their extent along the normal.
    pub fn from_axes_and_points(axes: Matrix<Real>, pts: &[Point<Real>]) -> Rss {
        let mut mins = Vector::repeat(Real::MAX);
        let mut maxs = Vector::repeat(-Real::MAX);

        for pt in pts {
            for i in 0..DIM {
                let dot = axes.column(i).dot(&pt.coords);
                mins[i] = mins[i].min(dot);
                maxs[i] = maxs[i].max(dot);
            }
        }

        let mid = (maxs + mins) * 0.5;

        Rss {
            center: Point::from(axes * mid),
            axes,
            half_lengths: [(maxs.x - mins.x) * 0.5, (maxs.y - mins.y) * 0.5],
            radius: (maxs.z - mins.z) * 0.5,
        }
    }

    /// The smallest oriented box enclosing this volume.
    #[inline]
    pub fn to_obb(&self) -> Obb {
        Obb {
            center: self.center,
            axes: self.axes,
            half_extents: Vector::new(
                self.half_lengths[0] + self.radius,
                self.half_lengths[1] + self.radius,
                self.radius,
            ),
        }
    }
}

impl BoundingVolume for Rss {
    #[inline]
    fn center(&self) -> Point<Real> {
        self.center
    }

    #[inline]
    fn size(&self) -> Real {
        self.half_lengths[0] * self.half_lengths[0]
            + self.half_lengths[1] * self.half_lengths[1]
            + self.radius * self.radius
    }

    // Overlap through the enclosing box. Conservative: never reports two
    // intersecting volumes as disjoint.
    #[inline]
    fn intersects(&self, other: &Rss) -> bool {
        self.to_obb().intersects(&other.to_obb())
    }

    fn contains_point(&self, pt: &Point<Real>) -> bool {
        let local = self.axes.transpose() * (pt - self.center);
        let eps = 1.0e-4;

        let dx = (local.x.abs() - self.half_lengths[0]).max(0.0);
        let dy = (local.y.abs() - self.half_lengths[1]).max(0.0);
        let dz = local.z;

        dx * dx + dy * dy + dz * dz <= (self.radius + eps) * (self.radius + eps)
    }

    fn merged(&self, other: &Rss) -> Rss {
        let axes = if self.size() >= other.size() {
            self.axes
        } else {
            other.axes
        };

        let mut pts = [Point::origin(); 16];
        pts[..8].copy_from_slice(&self.to_obb().corners());
        pts[8..].copy_from_slice(&other.to_obb().corners());

        Rss::from_axes_and_points(axes, &pts)
    }

    #[inline]
    fn local_aabb(&self) -> Aabb {
        self.to_obb().local_aabb()
    }

    #[inline]
    fn to_cuboid(&self) -> (Isometry<Real>, Cuboid) {
        self.to_obb().to_cuboid()
    }
}

impl OrientedBv for Rss {
    #[inline]
    fn transformed(&self, m: &Isometry<Real>) -> Self {
        Rss {
            center: m * self.center,
            axes: m.rotation.to_rotation_matrix().into_inner() * self.axes,
            half_lengths: self.half_lengths,
            radius: self.radius,
        }
    }

    #[inline]
    fn intersects_obb(&self, obb: &Obb) -> bool {
        self.to_obb().intersects(obb)
    }
}
