use crate::bounding_volume::Aabb;
use crate::math::{Point, Real, Vector, DEFAULT_EPSILON};
use crate::shape::SupportMap;

/// A capsule aligned with the local `y` axis.
///
/// The capsule is the Minkowski sum of the segment
/// `[(0, -half_height, 0), (0, half_height, 0)]` and a ball of radius
/// `radius`.
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
#[derive(PartialEq, Debug, Copy, Clone)]
#[repr(C)]
pub struct Capsule {
    /// Half of the distance between the centers of the capsule's caps.
    pub half_height: Real,
    /// The radius of the capsule.
    pub radius: Real,
}

impl Capsule {
    /// Creates a new capsule from its axis half-length and radius.
    #[inline]
    pub fn new(half_height: Real, radius: Real) -> Capsule {
        Capsule {
            half_height,
            radius,
        }
    }

    /// The axis-aligned bounding box of this capsule in its local frame.
    #[inline]
    pub fn local_aabb(&self) -> Aabb {
        let he = Vector::new(
            self.radius,
            self.half_height + self.radius,
            self.radius,
        );
        Aabb::new(Point::from(-he), Point::from(he))
    }
}

impl SupportMap for Capsule {
    #[inline]
    fn local_support_point(&self, dir: &Vector<Real>) -> Point<Real> {
        let mut res = Vector::zeros();
        res.y = if dir.y >= 0.0 {
            self.half_height
        } else {
            -self.half_height
        };

        let sqn = dir.norm_squared();
        if sqn > DEFAULT_EPSILON {
            res += dir * (self.radius / sqn.sqrt());
        } else {
            res.x += self.radius;
        }

        Point::from(res)
    }
}
