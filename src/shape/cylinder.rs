use crate::bounding_volume::Aabb;
use crate::math::{Point, Real, Vector, DEFAULT_EPSILON};
use crate::shape::SupportMap;

/// A cylinder aligned with the local `y` axis.
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
#[derive(PartialEq, Debug, Copy, Clone)]
#[repr(C)]
pub struct Cylinder {
    /// Half of the height of the cylinder.
    pub half_height: Real,
    /// The radius of the cylinder.
    pub radius: Real,
}

impl Cylinder {
    /// Creates a new cylinder from its axis half-length and radius.
    #[inline]
    pub fn new(half_height: Real, radius: Real) -> Cylinder {
        Cylinder {
            half_height,
            radius,
        }
    }

    /// The axis-aligned bounding box of this cylinder in its local frame.
    #[inline]
    pub fn local_aabb(&self) -> Aabb {
        let he = Vector::new(self.radius, self.half_height, self.radius);
        Aabb::new(Point::from(-he), Point::from(he))
    }
}

impl SupportMap for Cylinder {
    #[inline]
    fn local_support_point(&self, dir: &Vector<Real>) -> Point<Real> {
        let mut res = Vector::zeros();

        let sigma_sq = dir.x * dir.x + dir.z * dir.z;
        if sigma_sq > DEFAULT_EPSILON {
            let sigma = sigma_sq.sqrt();
            res.x = dir.x * self.radius / sigma;
            res.z = dir.z * self.radius / sigma;
        }

        res.y = if dir.y >= 0.0 {
            self.half_height
        } else {
            -self.half_height
        };

        Point::from(res)
    }
}
