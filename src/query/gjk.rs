//! The Gilbert–Johnson–Keerthi intersection test.

use crate::math::{Isometry, Point, Real, Vector};
use crate::shape::SupportMap;

/// Numerical tolerance of the GJK loop. Supports landing within this
/// margin of the current separating direction are counted as hits, so
/// exactly-touching pairs report an intersection.
pub const GJK_TOL: Real = 1.0e-6;

const MAX_ITERATIONS: usize = 64;

/// A support point of the configuration-space obstacle, with the witness
/// points it came from on each shape.
#[derive(Copy, Clone, Debug)]
pub struct CsoPoint {
    /// The support point of the Minkowski difference.
    pub point: Vector<Real>,
    /// The witness on the first shape, in world space.
    pub sup1: Point<Real>,
    /// The witness on the second shape, in world space.
    pub sup2: Point<Real>,
}

/// Computes the support point of the Minkowski difference of the two
/// shapes in the given direction.
pub fn cso_support(
    sm1: &dyn SupportMap,
    tf1: &Isometry<Real>,
    sm2: &dyn SupportMap,
    tf2: &Isometry<Real>,
    dir: &Vector<Real>,
) -> CsoPoint {
    let sup1 = sm1.support_point(tf1, dir);
    let sup2 = sm2.support_point(tf2, &-dir);

    CsoPoint {
        point: sup1 - sup2,
        sup1,
        sup2,
    }
}

/// The outcome of the boolean GJK test.
pub enum GjkResult {
    /// The shapes intersect; the final simplex is returned for a possible
    /// penetration-depth pass.
    Intersection(Vec<CsoPoint>),
    /// The shapes do not intersect.
    Disjoint,
}

/// Tests whether two support-mapped shapes intersect.
///
/// `init_dir` warm-starts the search and receives the last search
/// direction back, so coherent queries converge in very few iterations.
pub fn intersection_test(
    sm1: &dyn SupportMap,
    tf1: &Isometry<Real>,
    sm2: &dyn SupportMap,
    tf2: &Isometry<Real>,
    init_dir: &mut Vector<Real>,
) -> GjkResult {
    let mut dir = if init_dir.norm_squared() > GJK_TOL {
        *init_dir
    } else {
        Vector::x()
    };

    let mut simplex: Vec<CsoPoint> = Vec::with_capacity(4);
    simplex.push(cso_support(sm1, tf1, sm2, tf2, &dir));
    dir = -simplex[0].point;

    for _ in 0..MAX_ITERATIONS {
        if dir.norm_squared() <= GJK_TOL {
            // The simplex touches the origin.
            *init_dir = -simplex.last().unwrap().point;
            return GjkResult::Intersection(simplex);
        }

        let support = cso_support(sm1, tf1, sm2, tf2, &dir);
        if support.point.dot(&dir) < -GJK_TOL {
            *init_dir = dir;
            return GjkResult::Disjoint;
        }

        simplex.push(support);
        if do_simplex(&mut simplex, &mut dir) {
            *init_dir = dir;
            return GjkResult::Intersection(simplex);
        }
    }

    log::debug!("GJK did not converge within its iteration budget; reporting no intersection.");
    *init_dir = dir;
    GjkResult::Disjoint
}

/// Updates the simplex to the lowest-dimensional feature closest to the
/// origin and points `dir` from it toward the origin. Returns `true` when
/// the simplex encloses the origin.
fn do_simplex(simplex: &mut Vec<CsoPoint>, dir: &mut Vector<Real>) -> bool {
    match simplex.len() {
        2 => do_line(simplex, dir),
        3 => do_triangle(simplex, dir),
        4 => do_tetrahedron(simplex, dir),
        _ => unreachable!("the simplex always has 2 to 4 vertices here"),
    }
}

fn do_line(simplex: &mut Vec<CsoPoint>, dir: &mut Vector<Real>) -> bool {
    let a = simplex[1].point;
    let b = simplex[0].point;
    let ab = b - a;
    let ao = -a;

    if ab.dot(&ao) > 0.0 {
        *dir = ab.cross(&ao).cross(&ab);
        if dir.norm_squared() <= GJK_TOL * GJK_TOL {
            // Origin on the segment.
            return true;
        }
    } else {
        let last = simplex[1];
        simplex.clear();
        simplex.push(last);
        *dir = ao;
    }

    false
}

fn do_triangle(simplex: &mut Vec<CsoPoint>, dir: &mut Vector<Real>) -> bool {
    let a = simplex[2].point;
    let b = simplex[1].point;
    let c = simplex[0].point;
    let ab = b - a;
    let ac = c - a;
    let ao = -a;
    let abc = ab.cross(&ac);

    if abc.cross(&ac).dot(&ao) > 0.0 {
        if ac.dot(&ao) > 0.0 {
            let (pa, pc) = (simplex[2], simplex[0]);
            simplex.clear();
            simplex.push(pc);
            simplex.push(pa);
            *dir = ac.cross(&ao).cross(&ac);
        } else {
            let (pa, pb) = (simplex[2], simplex[1]);
            simplex.clear();
            simplex.push(pb);
            simplex.push(pa);
            return do_line(simplex, dir);
        }
    } else if ab.cross(&abc).dot(&ao) > 0.0 {
        let (pa, pb) = (simplex[2], simplex[1]);
        simplex.clear();
        simplex.push(pb);
        simplex.push(pa);
        return do_line(simplex, dir);
    } else {
        let d = abc.dot(&ao);
        if d > GJK_TOL {
            *dir = abc;
        } else if d < -GJK_TOL {
            simplex.swap(0, 1);
            *dir = -abc;
        } else {
            // Origin in the triangle's plane, inside the triangle.
            return true;
        }
    }

    false
}

fn do_tetrahedron(simplex: &mut Vec<CsoPoint>, dir: &mut Vector<Real>) -> bool {
    let a = simplex[3].point;
    let b = simplex[2].point;
    let c = simplex[1].point;
    let d = simplex[0].point;
    let ao = -a;

    let ab = b - a;
    let ac = c - a;
    let ad = d - a;

    let abc = ab.cross(&ac);
    let acd = ac.cross(&ad);
    let adb = ad.cross(&ab);

    if abc.dot(&ao) > 0.0 {
        let (pa, pb, pc) = (simplex[3], simplex[2], simplex[1]);
        simplex.clear();
        simplex.push(pc);
        simplex.push(pb);
        simplex.push(pa);
        return do_triangle(simplex, dir);
    }

    if acd.dot(&ao) > 0.0 {
        let (pa, pc, pd) = (simplex[3], simplex[1], simplex[0]);
        simplex.clear();
        simplex.push(pd);
        simplex.push(pc);
        simplex.push(pa);
        return do_triangle(simplex, dir);
    }

    if adb.dot(&ao) > 0.0 {
        let (pa, pd, pb) = (simplex[3], simplex[0], simplex[2]);
        simplex.clear();
        simplex.push(pb);
        simplex.push(pd);
        simplex.push(pa);
        return do_triangle(simplex, dir);
    }

    true
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::shape::Ball;

    #[test]
    fn overlapping_balls_intersect() {
        let b1 = Ball::new(1.0);
        let b2 = Ball::new(1.0);
        let tf1 = Isometry::identity();
        let tf2 = Isometry::translation(1.5, 0.0, 0.0);

        let mut dir = Vector::x();
        assert!(matches!(
            intersection_test(&b1, &tf1, &b2, &tf2, &mut dir),
            GjkResult::Intersection(_)
        ));
    }

    #[test]
    fn distant_balls_are_disjoint() {
        let b1 = Ball::new(1.0);
        let b2 = Ball::new(1.0);
        let tf1 = Isometry::identity();
        let tf2 = Isometry::translation(5.0, 0.0, 0.0);

        let mut dir = Vector::x();
        assert!(matches!(
            intersection_test(&b1, &tf1, &b2, &tf2, &mut dir),
            GjkResult::Disjoint
        ));
    }
}
