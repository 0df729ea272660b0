//! Bounding volume pairing an oriented box with a swept sphere.

use crate::bounding_volume::{Aabb, BoundingVolume, Obb, OrientedBv, Rss};
use crate::math::{Isometry, Point, Real};
use crate::shape::Cuboid;

/// An OBB and an RSS fitted to the same primitives.
///
/// Overlap tests go through the box; the swept sphere is kept for distance
/// queries layered on top of this crate.
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
#[derive(Debug, PartialEq, Copy, Clone)]
pub struct ObbRss {
    /// The oriented box part.
    pub obb: Obb,
    /// The swept-sphere part.
    pub rss: Rss,
}

impl BoundingVolume for ObbRss {
    #[inline]
    fn center(&self) -> Point<Real> {
        self.obb.center
    }

    #[inline]
    fn size(&self) -> Real {
        self.obb.size()
    }

    #[inline]
    fn intersects(&self, other: &ObbRss) -> bool {
        self.obb.intersects(&other.obb)
    }

    #[inline]
    fn contains_point(&self, pt: &Point<Real>) -> bool {
        self.obb.contains_point(pt)
    }

    #[inline]
    fn merged(&self, other: &ObbRss) -> ObbRss {
        ObbRss {
            obb: self.obb.merged(&other.obb),
            rss: self.rss.merged(&other.rss),
        }
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

impl OrientedBv for ObbRss {
    #[inline]
    fn transformed(&self, m: &Isometry<Real>) -> Self {
        ObbRss {
            obb: self.obb.transformed(m),
            rss: self.rss.transformed(m),
        }
    }

    #[inline]
    fn intersects_obb(&self, obb: &Obb) -> bool {
        self.obb.intersects(obb)
    }
}
