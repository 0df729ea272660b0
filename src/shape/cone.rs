use crate::bounding_volume::Aabb;
use crate::math::{Point, Real, Vector, DEFAULT_EPSILON};
use crate::shape::SupportMap;

/// A cone aligned with the local `y` axis, apex pointing up.
///
/// The circular base lies at `y = -half_height`, the apex at
/// `y = half_height`.
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
#[derive(PartialEq, Debug, Copy, Clone)]
#[repr(C)]
pub struct Cone {
    /// Half of the total height of the cone.
    pub half_height: Real,
    /// The radius of the cone's base.
    pub radius: Real,
}

impl Cone {
    /// Creates a new cone from its axis half-length and base radius.
    #[inline]
    pub fn new(half_height: Real, radius: Real) -> Cone {
        Cone {
            half_height,
            radius,
        }
    }

    /// The axis-aligned bounding box of this cone in its local frame.
    #[inline]
    pub fn local_aabb(&self) -> Aabb {
        let he = Vector::new(self.radius, self.half_height, self.radius);
        Aabb::new(Point::from(-he), Point::from(he))
    }
}

impl SupportMap for Cone {
    fn local_support_point(&self, dir: &Vector<Real>) -> Point<Real> {
        let apex = Point::new(0.0, self.half_height, 0.0);

        let sigma_sq = dir.x * dir.x + dir.z * dir.z;
        let rim = if sigma_sq > DEFAULT_EPSILON {
            let sigma = sigma_sq.sqrt();
            Point::new(
                dir.x * self.radius / sigma,
                -self.half_height,
                dir.z * self.radius / sigma,
            )
        } else {
            Point::new(0.0, -self.half_height, 0.0)
        };

        if apex.coords.dot(dir) >= rim.coords.dot(dir) {
            apex
        } else {
            rim
        }
    }
}
