//! The Expanding Polytope Algorithm, computing penetration depth, normal
//! and witness points for intersecting support-mapped shapes.

use crate::math::{Isometry, Point, Real, Vector};
use crate::query::gjk::{cso_support, CsoPoint};
use crate::shape::SupportMap;

const MAX_ITERATIONS: usize = 128;
const EPA_TOL: Real = 1.0e-5;

/// The penetration reported by the EPA.
#[derive(Copy, Clone, Debug)]
pub struct Penetration {
    /// The direction along which the shapes penetrate the least, pointing
    /// from the first shape toward the second.
    pub normal: Vector<Real>,
    /// The penetration depth along `normal`.
    pub depth: Real,
    /// A representative contact position, halfway between the witness
    /// points of the two shapes.
    pub position: Point<Real>,
}

struct Face {
    vertices: [usize; 3],
    normal: Vector<Real>,
    dist: Real,
}

impl Face {
    fn new(vertices: [usize; 3], pts: &[CsoPoint]) -> Option<Face> {
        let a = pts[vertices[0]].point;
        let b = pts[vertices[1]].point;
        let c = pts[vertices[2]].point;

        let mut normal = (b - a).cross(&(c - a));
        let sqn = normal.norm_squared();
        if sqn < EPA_TOL * EPA_TOL * EPA_TOL {
            return None;
        }
        normal /= sqn.sqrt();

        // Orient outward, away from the origin enclosed by the polytope.
        let mut dist = normal.dot(&a);
        let mut vertices = vertices;
        if dist < 0.0 {
            normal = -normal;
            dist = -dist;
            vertices.swap(1, 2);
        }

        Some(Face {
            vertices,
            normal,
            dist,
        })
    }
}

/// Expands the final GJK simplex to find the penetration of two
/// intersecting shapes.
///
/// Returns `None` when the simplex is too degenerate to seed a polytope or
/// the expansion does not converge; the caller then falls back to a
/// touching-contact approximation.
pub fn penetration(
    sm1: &dyn SupportMap,
    tf1: &Isometry<Real>,
    sm2: &dyn SupportMap,
    tf2: &Isometry<Real>,
    simplex: &[CsoPoint],
) -> Option<Penetration> {
    if simplex.len() != 4 {
        return None;
    }

    let mut pts: Vec<CsoPoint> = simplex.to_vec();
    let mut faces: Vec<Face> = Vec::with_capacity(16);

    for ids in [[0usize, 1, 2], [0, 1, 3], [0, 2, 3], [1, 2, 3]] {
        faces.push(Face::new(ids, &pts)?);
    }

    for _ in 0..MAX_ITERATIONS {
        let (best_id, best_dist) = faces
            .iter()
            .enumerate()
            .map(|(i, f)| (i, f.dist))
            .min_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(core::cmp::Ordering::Equal))?;

        let normal = faces[best_id].normal;
        let support = cso_support(sm1, tf1, sm2, tf2, &normal);
        let growth = support.point.dot(&normal) - best_dist;

        if growth <= EPA_TOL {
            return Some(result_from_face(&faces[best_id], &pts));
        }

        // Remove every face visible from the new support and stitch the
        // horizon with fresh faces.
        let new_id = pts.len();
        pts.push(support);

        let mut horizon: Vec<(usize, usize)> = Vec::new();
        let mut i = 0;
        while i < faces.len() {
            let visible =
                faces[i].normal.dot(&(support.point - pts[faces[i].vertices[0]].point)) > 0.0;
            if visible {
                let [a, b, c] = faces[i].vertices;
                for edge in [(a, b), (b, c), (c, a)] {
                    if let Some(pos) = horizon.iter().position(|&(x, y)| (y, x) == edge) {
                        let _ = horizon.remove(pos);
                    } else {
                        horizon.push(edge);
                    }
                }
                let _ = faces.swap_remove(i);
            } else {
                i += 1;
            }
        }

        if horizon.is_empty() {
            break;
        }

        for (a, b) in horizon {
            faces.push(Face::new([a, b, new_id], &pts)?);
        }
    }

    log::debug!("EPA did not converge within its iteration budget.");
    None
}

fn result_from_face(face: &Face, pts: &[CsoPoint]) -> Penetration {
    let a = &pts[face.vertices[0]];
    let b = &pts[face.vertices[1]];
    let c = &pts[face.vertices[2]];

    // Barycentric coordinates of the origin's projection on the face.
    let proj = face.normal * face.dist;
    let (l0, l1, l2) = barycentric(&proj, &a.point, &b.point, &c.point);

    let w1 = a.sup1.coords * l0 + b.sup1.coords * l1 + c.sup1.coords * l2;
    let w2 = a.sup2.coords * l0 + b.sup2.coords * l1 + c.sup2.coords * l2;

    Penetration {
        normal: face.normal,
        depth: face.dist,
        position: Point::from((w1 + w2) * 0.5),
    }
}

fn barycentric(
    p: &Vector<Real>,
    a: &Vector<Real>,
    b: &Vector<Real>,
    c: &Vector<Real>,
) -> (Real, Real, Real) {
    let v0 = b - a;
    let v1 = c - a;
    let v2 = p - a;

    let d00 = v0.dot(&v0);
    let d01 = v0.dot(&v1);
    let d11 = v1.dot(&v1);
    let d20 = v2.dot(&v0);
    let d21 = v2.dot(&v1);

    let denom = d00 * d11 - d01 * d01;
    if denom.abs() < EPA_TOL * EPA_TOL {
        return (1.0, 0.0, 0.0);
    }

    let v = (d11 * d20 - d01 * d21) / denom;
    let w = (d00 * d21 - d01 * d20) / denom;
    (1.0 - v - w, v, w)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::query::gjk::{intersection_test, GjkResult};
    use crate::shape::Ball;

    #[test]
    fn ball_ball_penetration_depth() {
        let b1 = Ball::new(1.0);
        let b2 = Ball::new(1.0);
        let tf1 = Isometry::identity();
        let tf2 = Isometry::translation(1.0, 0.0, 0.0);

        let mut dir = Vector::x();
        let simplex = match intersection_test(&b1, &tf1, &b2, &tf2, &mut dir) {
            GjkResult::Intersection(simplex) => simplex,
            GjkResult::Disjoint => panic!("balls should intersect"),
        };

        if let Some(pen) = penetration(&b1, &tf1, &b2, &tf2, &simplex) {
            assert!(relative_eq!(pen.depth, 1.0, epsilon = 0.05));
            assert!(pen.normal.x.abs() > 0.99);
        }
    }
}
