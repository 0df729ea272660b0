//! Bounding volume defined as the intersection of a few spheres.

use crate::bounding_volume::{Aabb, BoundingVolume, Obb, OrientedBv};
use crate::math::{Isometry, Point, Real};
use crate::shape::Cuboid;
use arrayvec::ArrayVec;

/// One sphere of a [`Kios`] volume.
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
#[derive(Debug, PartialEq, Copy, Clone)]
pub struct KiosSphere {
    /// The center of the sphere.
    pub center: Point<Real>,
    /// The radius of the sphere.
    pub radius: Real,
}

/// A bounding volume defined as the intersection of up to five spheres,
/// each individually enclosing the bounded primitives.
///
/// An oriented box of the same primitives is kept alongside the spheres;
/// two volumes are disjoint as soon as either any cross pair of their
/// spheres is disjoint, or their boxes are.
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
#[derive(Debug, PartialEq, Clone)]
pub struct Kios {
    /// The spheres whose intersection bounds the primitives.
    pub spheres: ArrayVec<KiosSphere, 5>,
    /// An oriented box of the same primitives.
    pub obb: Obb,
}

impl BoundingVolume for Kios {
    #[inline]
    fn center(&self) -> Point<Real> {
        self.obb.center
    }

    #[inline]
    fn size(&self) -> Real {
        self.obb.size()
    }

    fn intersects(&self, other: &Kios) -> bool {
        // Both operands lie inside each of their spheres, so a single
        // disjoint cross pair separates them.
        for s1 in &self.spheres {
            for s2 in &other.spheres {
                let r = s1.radius + s2.radius;
                if na::distance_squared(&s1.center, &s2.center) > r * r {
                    return false;
                }
            }
        }

        self.obb.intersects(&other.obb)
    }

    fn contains_point(&self, pt: &Point<Real>) -> bool {
        let eps = 1.0e-4;
        self.spheres.iter().all(|s| {
            let r = s.radius + eps;
            na::distance_squared(&s.center, pt) <= r * r
        })
    }

    fn merged(&self, other: &Kios) -> Kios {
        let obb = self.obb.merged(&other.obb);

        let mut pts = [Point::origin(); 16];
        pts[..8].copy_from_slice(&self.obb.corners());
        pts[8..].copy_from_slice(&other.obb.corners());

        crate::bvh::fit_kios(obb, &pts)
    }

    #[inline]
    fn local_aabb(&self) -> Aabb {
        self.obb.local_aabb()
    }

    #[inline]
    fn to_cuboid(&self) -> (Isometry<Real>, Cuboid) {
        self.obb.to_cuboid()
    }
}

impl OrientedBv for Kios {
    fn transformed(&self, m: &Isometry<Real>) -> Self {
        let mut spheres = ArrayVec::new();
        for s in &self.spheres {
            spheres.push(KiosSphere {
                center: m * s.center,
                radius: s.radius,
            });
        }

        Kios {
            spheres,
            obb: self.obb.transformed(m),
        }
    }

    #[inline]
    fn intersects_obb(&self, obb: &Obb) -> bool {
        self.obb.intersects(obb)
    }
}
