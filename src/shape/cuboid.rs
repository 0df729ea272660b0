use crate::bounding_volume::Aabb;
use crate::math::{Point, Real, Vector};
use crate::shape::SupportMap;

/// A cuboid shape delimited by its half-extents along each coordinate axis.
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
#[derive(PartialEq, Debug, Copy, Clone)]
#[repr(C)]
pub struct Cuboid {
    /// The half-extents of the cuboid.
    pub half_extents: Vector<Real>,
}

impl Cuboid {
    /// Creates a new cuboid from its half-extents.
    #[inline]
    pub fn new(half_extents: Vector<Real>) -> Cuboid {
        Cuboid { half_extents }
    }

    /// The axis-aligned bounding box of this cuboid in its local frame.
    #[inline]
    pub fn local_aabb(&self) -> Aabb {
        Aabb::new(Point::from(-self.half_extents), Point::from(self.half_extents))
    }
}

impl SupportMap for Cuboid {
    #[inline]
    fn local_support_point(&self, dir: &Vector<Real>) -> Point<Real> {
        let mut res = self.half_extents;

        for i in 0..3 {
            if dir[i] < 0.0 {
                res[i] = -res[i];
            }
        }

        Point::from(res)
    }
}
