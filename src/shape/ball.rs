use crate::bounding_volume::Aabb;
use crate::math::{Point, Real, Vector, DEFAULT_EPSILON};
use crate::shape::SupportMap;

/// A Ball shape.
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
#[derive(PartialEq, Debug, Copy, Clone)]
#[repr(C)]
pub struct Ball {
    /// The radius of the ball.
    pub radius: Real,
}

impl Ball {
    /// Creates a new ball with the given radius.
    #[inline]
    pub fn new(radius: Real) -> Ball {
        Ball { radius }
    }

    /// The axis-aligned bounding box of this ball in its local frame.
    #[inline]
    pub fn local_aabb(&self) -> Aabb {
        let he = Vector::repeat(self.radius);
        Aabb::new(Point::from(-he), Point::from(he))
    }
}

impl SupportMap for Ball {
    #[inline]
    fn local_support_point(&self, dir: &Vector<Real>) -> Point<Real> {
        let sqn = dir.norm_squared();
        if sqn > DEFAULT_EPSILON {
            Point::from(dir * (self.radius / sqn.sqrt()))
        } else {
            Point::new(self.radius, 0.0, 0.0)
        }
    }
}
