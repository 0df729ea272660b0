use crate::bounding_volume::Aabb;
use crate::math::{Point, Real, Vector, DEFAULT_EPSILON};
use crate::shape::SupportMap;

/// An ellipsoid aligned with the local coordinate axes.
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
#[derive(PartialEq, Debug, Copy, Clone)]
#[repr(C)]
pub struct Ellipsoid {
    /// The radii along each local coordinate axis.
    pub radii: Vector<Real>,
}

impl Ellipsoid {
    /// Creates a new ellipsoid from its three radii.
    #[inline]
    pub fn new(radii: Vector<Real>) -> Ellipsoid {
        Ellipsoid { radii }
    }

    /// The axis-aligned bounding box of this ellipsoid in its local frame.
    #[inline]
    pub fn local_aabb(&self) -> Aabb {
        Aabb::new(Point::from(-self.radii), Point::from(self.radii))
    }
}

impl SupportMap for Ellipsoid {
    #[inline]
    fn local_support_point(&self, dir: &Vector<Real>) -> Point<Real> {
        let scaled = self.radii.component_mul(dir);
        let norm = scaled.norm();

        if norm > DEFAULT_EPSILON {
            Point::from(self.radii.component_mul(&scaled) / norm)
        } else {
            Point::new(self.radii.x, 0.0, 0.0)
        }
    }
}
