//! Oriented bounding box.

use crate::bounding_volume::{Aabb, BoundingVolume, OrientedBv};
use crate::math::{Isometry, Matrix, Point, Real, Rotation, Translation, Vector, DIM};
use crate::shape::Cuboid;

/// An oriented bounding box.
///
/// The box is described by its center, an orthonormal axis matrix (one
/// axis per column) and its half-extents along those axes.
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
#[derive(Debug, PartialEq, Copy, Clone)]
pub struct Obb {
    /// The center of the box.
    pub center: Point<Real>,
    /// The orientation of the box; each column is one local axis.
    pub axes: Matrix<Real>,
    /// The half-extents of the box along its axes.
    pub half_extents: Vector<Real>,
}

impl Obb {
    /// Creates an oriented box equivalent to the given axis-aligned box.
    #[inline]
    pub fn from_aabb(aabb: &Aabb) -> Obb {
        Obb {
            center: aabb.center(),
            axes: Matrix::identity(),
            half_extents: aabb.half_extents(),
        }
    }

    /// Fits an oriented box with the given axes to a set of points.
    pub fn from_axes_and_points(axes: Matrix<Real>, pts: &[Point<Real>]) -> Obb {
        let mut mins = Vector::repeat(Real::MAX);
        let mut maxs = Vector::repeat(-Real::MAX);

        for pt in pts {
            for i in 0..DIM {
                let dot = axes.column(i).dot(&pt.coords);
                mins[i] = mins[i].min(dot);
                maxs[i] = maxs[i].max(dot);
            }
        }

        Obb {
            center: Point::from(axes * ((maxs + mins) * 0.5)),
            axes,
            half_extents: (maxs - mins) * 0.5,
        }
    }

    /// The eight corners of this box.
    pub fn corners(&self) -> [Point<Real>; 8] {
        let he = self.half_extents;
        let x = self.axes.column(0) * he.x;
        let y = self.axes.column(1) * he.y;
        let z = self.axes.column(2) * he.z;
        let c = self.center;

        [
            c - x - y - z,
            c + x - y - z,
            c + x + y - z,
            c - x + y - z,
            c - x - y + z,
            c + x - y + z,
            c + x + y + z,
            c - x + y + z,
        ]
    }
}

/// Separating-axis disjointness test between two oriented boxes.
///
/// `rot` and `trans` express box `b` in the frame of box `a`; `he_a` and
/// `he_b` are the half-extents. Uses the 15 candidate axes of the classic
/// test, with a small margin making the result conservative under floating
/// rounding.
pub fn obb_disjoint(
    rot: &Matrix<Real>,
    trans: &Vector<Real>,
    he_a: &Vector<Real>,
    he_b: &Vector<Real>,
) -> bool {
    let eps = 1.0e-6;
    let abs_rot = rot.abs().add_scalar(eps);

    // Axes of a.
    for i in 0..3 {
        let ra = he_a[i];
        let rb = abs_rot[(i, 0)] * he_b[0] + abs_rot[(i, 1)] * he_b[1] + abs_rot[(i, 2)] * he_b[2];
        if trans[i].abs() > ra + rb {
            return true;
        }
    }

    // Axes of b.
    for j in 0..3 {
        let ra = abs_rot[(0, j)] * he_a[0] + abs_rot[(1, j)] * he_a[1] + abs_rot[(2, j)] * he_a[2];
        let rb = he_b[j];
        let t = trans[0] * rot[(0, j)] + trans[1] * rot[(1, j)] + trans[2] * rot[(2, j)];
        if t.abs() > ra + rb {
            return true;
        }
    }

    // Cross products of one axis of each box.
    for i in 0..3 {
        let (i1, i2) = ((i + 1) % 3, (i + 2) % 3);
        for j in 0..3 {
            let (j1, j2) = ((j + 1) % 3, (j + 2) % 3);

            let ra = he_a[i1] * abs_rot[(i2, j)] + he_a[i2] * abs_rot[(i1, j)];
            let rb = he_b[j1] * abs_rot[(i, j2)] + he_b[j2] * abs_rot[(i, j1)];
            let t = trans[i2] * rot[(i1, j)] - trans[i1] * rot[(i2, j)];
            if t.abs() > ra + rb {
                return true;
            }
        }
    }

    false
}

impl BoundingVolume for Obb {
    #[inline]
    fn center(&self) -> Point<Real> {
        self.center
    }

    #[inline]
    fn size(&self) -> Real {
        self.half_extents.norm_squared()
    }

    fn intersects(&self, other: &Obb) -> bool {
        let rot = self.axes.transpose() * other.axes;
        let trans = self.axes.transpose() * (other.center - self.center);
        !obb_disjoint(&rot, &trans, &self.half_extents, &other.half_extents)
    }

    fn contains_point(&self, pt: &Point<Real>) -> bool {
        let local = self.axes.transpose() * (pt - self.center);
        let eps = 1.0e-4;

        for i in 0..DIM {
            if local[i].abs() > self.half_extents[i] + eps {
                return false;
            }
        }

        true
    }

    fn merged(&self, other: &Obb) -> Obb {
        // Keeps the axes of the larger operand and refits around the
        // corners of both.
        let axes = if self.size() >= other.size() {
            self.axes
        } else {
            other.axes
        };

        let mut pts = [Point::origin(); 16];
        pts[..8].copy_from_slice(&self.corners());
        pts[8..].copy_from_slice(&other.corners());

        Obb::from_axes_and_points(axes, &pts)
    }

    #[inline]
    fn local_aabb(&self) -> Aabb {
        Aabb::from_points(&self.corners())
    }

    #[inline]
    fn to_cuboid(&self) -> (Isometry<Real>, Cuboid) {
        let rot = Rotation::from_rotation_matrix(&na::Rotation3::from_matrix_unchecked(self.axes));
        let iso = Translation::from(self.center.coords) * rot;
        (iso, Cuboid::new(self.half_extents))
    }
}

impl OrientedBv for Obb {
    #[inline]
    fn transformed(&self, m: &Isometry<Real>) -> Self {
        Obb {
            center: m * self.center,
            axes: m.rotation.to_rotation_matrix().into_inner() * self.axes,
            half_extents: self.half_extents,
        }
    }

    #[inline]
    fn intersects_obb(&self, obb: &Obb) -> bool {
        self.intersects(obb)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn rotated_boxes_overlap() {
        let a = Obb::from_aabb(&Aabb::new(
            Point::new(-1.0, -1.0, -1.0),
            Point::new(1.0, 1.0, 1.0),
        ));
        let m = Isometry::new(Vector::new(1.5, 0.0, 0.0), Vector::z() * 0.78);
        let b = a.transformed(&m);

        assert!(a.intersects(&b));
    }

    #[test]
    fn distant_boxes_are_disjoint() {
        let a = Obb::from_aabb(&Aabb::new(
            Point::new(-1.0, -1.0, -1.0),
            Point::new(1.0, 1.0, 1.0),
        ));
        let m = Isometry::new(Vector::new(5.0, 0.0, 0.0), Vector::z() * 0.78);
        let b = a.transformed(&m);

        assert!(!a.intersects(&b));
    }
}
