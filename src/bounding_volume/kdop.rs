//! Discrete-oriented polytopes.

use crate::bounding_volume::{Aabb, BoundingVolume};
use crate::math::{Isometry, Point, Real};
use crate::shape::Cuboid;

/// A discrete-oriented polytope with `N / 2` fixed slab directions.
///
/// `dists[i]` is the smallest projection of the bounded primitives onto
/// direction `i`, `dists[i + N / 2]` the largest. The first three
/// directions are the coordinate axes, so the first and middle three
/// entries give the volume's AABB directly.
#[derive(Debug, PartialEq, Copy, Clone)]
pub struct Kdop<const N: usize> {
    /// The lower and upper slab bounds.
    pub dists: [Real; N],
}

/// A 16-DOP: slabs along 8 fixed directions.
pub type Kdop16 = Kdop<16>;
/// An 18-DOP: slabs along 9 fixed directions.
pub type Kdop18 = Kdop<18>;
/// A 24-DOP: slabs along 12 fixed directions.
pub type Kdop24 = Kdop<24>;

const DIRECTIONS_8: [[Real; 3]; 8] = [
    [1.0, 0.0, 0.0],
    [0.0, 1.0, 0.0],
    [0.0, 0.0, 1.0],
    [1.0, 1.0, 0.0],
    [1.0, 0.0, 1.0],
    [0.0, 1.0, 1.0],
    [1.0, -1.0, 0.0],
    [1.0, 0.0, -1.0],
];

const DIRECTIONS_9: [[Real; 3]; 9] = [
    [1.0, 0.0, 0.0],
    [0.0, 1.0, 0.0],
    [0.0, 0.0, 1.0],
    [1.0, 1.0, 0.0],
    [1.0, 0.0, 1.0],
    [0.0, 1.0, 1.0],
    [1.0, -1.0, 0.0],
    [1.0, 0.0, -1.0],
    [0.0, 1.0, -1.0],
];

const DIRECTIONS_12: [[Real; 3]; 12] = [
    [1.0, 0.0, 0.0],
    [0.0, 1.0, 0.0],
    [0.0, 0.0, 1.0],
    [1.0, 1.0, 0.0],
    [1.0, 0.0, 1.0],
    [0.0, 1.0, 1.0],
    [1.0, -1.0, 0.0],
    [1.0, 0.0, -1.0],
    [0.0, 1.0, -1.0],
    [1.0, 1.0, 1.0],
    [1.0, 1.0, -1.0],
    [1.0, -1.0, 1.0],
];

impl<const N: usize> Kdop<N> {
    /// The slab directions of this DOP. Directions are not normalized; the
    /// fitter and the overlap test use the same set, which is all slab
    /// arithmetic requires.
    pub fn directions() -> &'static [[Real; 3]] {
        match N {
            16 => &DIRECTIONS_8,
            18 => &DIRECTIONS_9,
            24 => &DIRECTIONS_12,
            _ => panic!("only 16-, 18- and 24-DOPs are supported"),
        }
    }

    /// Creates a DOP with inverted slabs, to be grown with `take_point`.
    pub fn new_invalid() -> Self {
        let mut dists = [0.0; N];
        for i in 0..N / 2 {
            dists[i] = Real::MAX;
            dists[i + N / 2] = -Real::MAX;
        }
        Kdop { dists }
    }

    /// Enlarges this DOP so it also contains the point `pt`.
    pub fn take_point(&mut self, pt: Point<Real>) {
        for (i, dir) in Self::directions().iter().enumerate() {
            let d = pt.x * dir[0] + pt.y * dir[1] + pt.z * dir[2];
            self.dists[i] = self.dists[i].min(d);
            self.dists[i + N / 2] = self.dists[i + N / 2].max(d);
        }
    }
}

impl<const N: usize> BoundingVolume for Kdop<N> {
    #[inline]
    fn center(&self) -> Point<Real> {
        self.local_aabb().center()
    }

    #[inline]
    fn size(&self) -> Real {
        self.local_aabb().extents().norm_squared()
    }

    fn intersects(&self, other: &Kdop<N>) -> bool {
        for i in 0..N / 2 {
            if self.dists[i] > other.dists[i + N / 2] || other.dists[i] > self.dists[i + N / 2] {
                return false;
            }
        }

        true
    }

    fn contains_point(&self, pt: &Point<Real>) -> bool {
        for (i, dir) in Self::directions().iter().enumerate() {
            let d = pt.x * dir[0] + pt.y * dir[1] + pt.z * dir[2];
            if d < self.dists[i] || d > self.dists[i + N / 2] {
                return false;
            }
        }

        true
    }

    fn merged(&self, other: &Kdop<N>) -> Kdop<N> {
        let mut dists = self.dists;
        for i in 0..N / 2 {
            dists[i] = dists[i].min(other.dists[i]);
            dists[i + N / 2] = dists[i + N / 2].max(other.dists[i + N / 2]);
        }
        Kdop { dists }
    }

    #[inline]
    fn local_aabb(&self) -> Aabb {
        let half = N / 2;
        Aabb::new(
            Point::new(self.dists[0], self.dists[1], self.dists[2]),
            Point::new(self.dists[half], self.dists[half + 1], self.dists[half + 2]),
        )
    }

    #[inline]
    fn to_cuboid(&self) -> (Isometry<Real>, Cuboid) {
        self.local_aabb().to_cuboid()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::bounding_volume::BoundingVolume;

    #[test]
    fn fitted_dop_contains_its_points() {
        let pts = [
            Point::new(0.0, 0.0, 0.0),
            Point::new(1.0, 2.0, -1.0),
            Point::new(-0.5, 0.3, 4.0),
        ];

        let mut dop = Kdop24::new_invalid();
        for pt in &pts {
            dop.take_point(*pt);
        }

        for pt in &pts {
            assert!(dop.contains_point(pt));
        }
    }

    #[test]
    fn separated_slabs_do_not_intersect() {
        let mut a = Kdop16::new_invalid();
        a.take_point(Point::new(0.0, 0.0, 0.0));
        a.take_point(Point::new(1.0, 1.0, 1.0));

        let mut b = Kdop16::new_invalid();
        b.take_point(Point::new(3.0, 3.0, 3.0));
        b.take_point(Point::new(4.0, 4.0, 4.0));

        assert!(!a.intersects(&b));
        assert!(a.intersects(&a.merged(&b)));
        assert!(b.intersects(&a.merged(&b)));
    }
}
