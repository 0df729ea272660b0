use crate::math::{Point, Real, UnitVector, Vector};
use crate::shape::SupportMap;
use na::Unit;

/// A triangle shape.
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
#[derive(PartialEq, Debug, Copy, Clone)]
#[repr(C)]
pub struct Triangle {
    /// The triangle's first point.
    pub a: Point<Real>,
    /// The triangle's second point.
    pub b: Point<Real>,
    /// The triangle's third point.
    pub c: Point<Real>,
}

impl Triangle {
    /// Creates a triangle from three points.
    #[inline]
    pub fn new(a: Point<Real>, b: Point<Real>, c: Point<Real>) -> Triangle {
        Triangle { a, b, c }
    }

    /// The normal of this triangle, following the `a`, `b`, `c` winding.
    ///
    /// Returns `None` if the triangle is degenerate.
    #[inline]
    pub fn normal(&self) -> Option<UnitVector<Real>> {
        Unit::try_new(self.scaled_normal(), crate::math::DEFAULT_EPSILON)
    }

    /// The non-normalized counterclockwise normal of this triangle.
    #[inline]
    pub fn scaled_normal(&self) -> Vector<Real> {
        (self.b - self.a).cross(&(self.c - self.a))
    }

    /// The centroid of this triangle.
    #[inline]
    pub fn center(&self) -> Point<Real> {
        Point::from((self.a.coords + self.b.coords + self.c.coords) / 3.0)
    }
}

impl SupportMap for Triangle {
    #[inline]
    fn local_support_point(&self, dir: &Vector<Real>) -> Point<Real> {
        let da = self.a.coords.dot(dir);
        let db = self.b.coords.dot(dir);
        let dc = self.c.coords.dot(dir);

        if da > db {
            if da > dc {
                self.a
            } else {
                self.c
            }
        } else if db > dc {
            self.b
        } else {
            self.c
        }
    }
}
