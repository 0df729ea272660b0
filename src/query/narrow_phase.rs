//! The narrow phase: exact intersection tests between pairs of primitives.

use crate::math::{Isometry, Point, Real, Vector, DEFAULT_EPSILON};
use crate::query::epa;
use crate::query::gjk::{self, GjkResult};
use crate::shape::{Ball, HalfSpace, Plane, Shape, SupportMap, Triangle};

/// One contact produced by the narrow phase, in world space.
#[derive(Copy, Clone, Debug)]
pub struct ShapeContact {
    /// The contact position.
    pub position: Point<Real>,
    /// The contact normal, pointing from the first operand toward the
    /// second.
    pub normal: Vector<Real>,
    /// The penetration depth along the normal.
    pub depth: Real,
}

/// The abstraction the dispatch table is parameterised over: exact
/// geometric predicates between two concrete primitives.
///
/// Intersection tests never fail: a narrow-phase routine that does not
/// converge logs the event and reports "no intersection". The GJK
/// warm-start travels through the `guess` parameter instead of solver
/// state, so a single solver value can serve concurrent queries.
pub trait NarrowPhaseSolver: Send + Sync {
    /// Tests two primitives for intersection. When `contacts` is provided
    /// and the shapes intersect, one contact is appended to it.
    fn shape_intersect(
        &self,
        s1: &Shape,
        tf1: &Isometry<Real>,
        s2: &Shape,
        tf2: &Isometry<Real>,
        guess: &mut Vector<Real>,
        contacts: Option<&mut Vec<ShapeContact>>,
    ) -> bool;

    /// Tests a primitive against a triangle expressed in the frame `tf2`.
    fn shape_triangle_intersect(
        &self,
        s1: &Shape,
        tf1: &Isometry<Real>,
        tri: &Triangle,
        tf2: &Isometry<Real>,
        guess: &mut Vector<Real>,
        contacts: Option<&mut Vec<ShapeContact>>,
    ) -> bool;

    /// Tests two triangles expressed in the frames `tf1` and `tf2`.
    fn triangle_intersect(
        &self,
        t1: &Triangle,
        tf1: &Isometry<Real>,
        t2: &Triangle,
        tf2: &Isometry<Real>,
        contacts: Option<&mut Vec<ShapeContact>>,
    ) -> bool;
}

/// The built-in narrow phase: closed forms for balls and planar shapes,
/// GJK + EPA for every other pair of support-mapped shapes.
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultNarrowPhase;

impl NarrowPhaseSolver for DefaultNarrowPhase {
    fn shape_intersect(
        &self,
        s1: &Shape,
        tf1: &Isometry<Real>,
        s2: &Shape,
        tf2: &Isometry<Real>,
        guess: &mut Vector<Real>,
        contacts: Option<&mut Vec<ShapeContact>>,
    ) -> bool {
        match (s1, s2) {
            (Shape::Ball(b1), Shape::Ball(b2)) => ball_ball(b1, tf1, b2, tf2, contacts),
            (Shape::HalfSpace(hs), _) => {
                planar_prim(&world_half_space(hs, tf1), true, s2, tf2, false, contacts)
            }
            (_, Shape::HalfSpace(hs)) => {
                planar_prim(&world_half_space(hs, tf2), true, s1, tf1, true, contacts)
            }
            (Shape::Plane(p), _) => {
                planar_prim(&world_plane(p, tf1), false, s2, tf2, false, contacts)
            }
            (_, Shape::Plane(p)) => {
                planar_prim(&world_plane(p, tf2), false, s1, tf1, true, contacts)
            }
            _ => {
                let sm1 = s1.support_map().expect("bounded shapes are support-mapped");
                let sm2 = s2.support_map().expect("bounded shapes are support-mapped");
                gjk_contact(sm1, tf1, sm2, tf2, guess, contacts)
            }
        }
    }

    fn shape_triangle_intersect(
        &self,
        s1: &Shape,
        tf1: &Isometry<Real>,
        tri: &Triangle,
        tf2: &Isometry<Real>,
        guess: &mut Vector<Real>,
        contacts: Option<&mut Vec<ShapeContact>>,
    ) -> bool {
        match s1 {
            Shape::HalfSpace(hs) => {
                planar_support_map(&world_half_space(hs, tf1), true, tri, tf2, false, contacts)
            }
            Shape::Plane(p) => {
                planar_support_map(&world_plane(p, tf1), false, tri, tf2, false, contacts)
            }
            _ => {
                let sm1 = s1.support_map().expect("bounded shapes are support-mapped");
                gjk_contact(sm1, tf1, tri, tf2, guess, contacts)
            }
        }
    }

    fn triangle_intersect(
        &self,
        t1: &Triangle,
        tf1: &Isometry<Real>,
        t2: &Triangle,
        tf2: &Isometry<Real>,
        contacts: Option<&mut Vec<ShapeContact>>,
    ) -> bool {
        let w1 = Triangle::new(tf1 * t1.a, tf1 * t1.b, tf1 * t1.c);
        let w2 = Triangle::new(tf2 * t2.a, tf2 * t2.b, tf2 * t2.c);

        let identity = Isometry::identity();
        let mut dir = w2.center() - w1.center();
        if dir.norm_squared() < DEFAULT_EPSILON {
            dir = Vector::x();
        }

        match gjk::intersection_test(&w1, &identity, &w2, &identity, &mut dir) {
            GjkResult::Disjoint => false,
            GjkResult::Intersection(_) => {
                if let Some(out) = contacts {
                    out.push(triangle_contact(&w1, &w2));
                }
                true
            }
        }
    }
}

/// A plane or half-space boundary expressed in world coordinates:
/// `{ x | normal · x = offset }`.
struct WorldPlane {
    normal: Vector<Real>,
    offset: Real,
}

fn world_plane(plane: &Plane, tf: &Isometry<Real>) -> WorldPlane {
    let normal = tf * plane.normal.into_inner();
    let offset = plane.offset + normal.dot(&tf.translation.vector);
    WorldPlane { normal, offset }
}

fn world_half_space(hs: &HalfSpace, tf: &Isometry<Real>) -> WorldPlane {
    let normal = tf * hs.normal.into_inner();
    let offset = hs.offset + normal.dot(&tf.translation.vector);
    WorldPlane { normal, offset }
}

/// Planar shape against any other primitive. `half_space` selects the
/// solid-side semantics; `flip` means the planar operand was the second
/// one, so the reported normal must be reversed.
fn planar_prim(
    plane: &WorldPlane,
    half_space: bool,
    other: &Shape,
    tf2: &Isometry<Real>,
    flip: bool,
    contacts: Option<&mut Vec<ShapeContact>>,
) -> bool {
    match other {
        Shape::Plane(p) => planar_planar(plane, half_space, &world_plane(p, tf2), false, flip, contacts),
        Shape::HalfSpace(hs) => {
            planar_planar(plane, half_space, &world_half_space(hs, tf2), true, flip, contacts)
        }
        _ => {
            let sm = other
                .support_map()
                .expect("bounded shapes are support-mapped");
            planar_support_map(plane, half_space, sm, tf2, flip, contacts)
        }
    }
}

/// Plane or half-space against a support-mapped shape, in closed form.
fn planar_support_map(
    plane: &WorldPlane,
    half_space: bool,
    sm: &dyn SupportMap,
    tf2: &Isometry<Real>,
    flip: bool,
    contacts: Option<&mut Vec<ShapeContact>>,
) -> bool {
    let deepest = sm.support_point(tf2, &-plane.normal);
    let lowest = plane.normal.dot(&deepest.coords) - plane.offset;

    if lowest > 0.0 {
        // The entire shape lies on the positive side.
        return false;
    }

    let (depth, normal, position);

    if half_space {
        depth = -lowest;
        normal = plane.normal;
        position = deepest - plane.normal * (lowest * 0.5);
    } else {
        let highest_pt = sm.support_point(tf2, &plane.normal);
        let highest = plane.normal.dot(&highest_pt.coords) - plane.offset;
        if highest < 0.0 {
            // The entire shape lies on the negative side.
            return false;
        }

        // The plane cuts the shape; push it out the cheaper way.
        if highest <= -lowest {
            depth = highest;
            normal = -plane.normal;
        } else {
            depth = -lowest;
            normal = plane.normal;
        }
        let mid = na::center(&deepest, &highest_pt);
        position = mid - plane.normal * (plane.normal.dot(&mid.coords) - plane.offset);
    }

    if let Some(out) = contacts {
        // `normal` is the push direction of the support-mapped operand;
        // the reported normal always points from the first operand of the
        // original pair toward the second.
        out.push(ShapeContact {
            position,
            normal: if flip { -normal } else { normal },
            depth,
        });
    }

    true
}

/// Two unbounded planar shapes against each other.
fn planar_planar(
    p1: &WorldPlane,
    hs1: bool,
    p2: &WorldPlane,
    hs2: bool,
    flip: bool,
    contacts: Option<&mut Vec<ShapeContact>>,
) -> bool {
    let cross = p1.normal.cross(&p2.normal);
    let parallel = cross.norm_squared() <= DEFAULT_EPSILON;

    let intersecting;
    let position;

    if !parallel {
        // Non-parallel boundaries always meet along a line.
        intersecting = true;
        let denom = cross.norm_squared();
        position = Point::from(
            (p2.normal.cross(&cross) * p1.offset + cross.cross(&p1.normal) * p2.offset) / denom,
        );
    } else {
        let same_dir = p1.normal.dot(&p2.normal) > 0.0;
        let gap = if same_dir {
            p1.offset - p2.offset
        } else {
            p1.offset + p2.offset
        };

        intersecting = match (hs1, hs2) {
            // Two planes: only when coincident.
            (false, false) => gap.abs() <= 1.0e-6,
            // A half-space and a plane: the plane must not lie outside.
            (true, false) => {
                if same_dir {
                    p2.offset <= p1.offset
                } else {
                    -p2.offset <= p1.offset
                }
            }
            (false, true) => {
                if same_dir {
                    p1.offset <= p2.offset
                } else {
                    -p1.offset <= p2.offset
                }
            }
            // Two half-spaces: disjoint only when facing away.
            (true, true) => same_dir || p1.offset + p2.offset >= 0.0,
        };

        position = Point::from(p1.normal * p1.offset);
    }

    if intersecting {
        if let Some(out) = contacts {
            out.push(ShapeContact {
                position,
                normal: if flip { -p1.normal } else { p1.normal },
                depth: 0.0,
            });
        }
    }

    intersecting
}

/// Closed-form ball against ball.
fn ball_ball(
    b1: &Ball,
    tf1: &Isometry<Real>,
    b2: &Ball,
    tf2: &Isometry<Real>,
    contacts: Option<&mut Vec<ShapeContact>>,
) -> bool {
    let c1 = Point::from(tf1.translation.vector);
    let c2 = Point::from(tf2.translation.vector);

    let delta = c2 - c1;
    let dist = delta.norm();
    let rsum = b1.radius + b2.radius;

    if dist > rsum {
        return false;
    }

    if let Some(out) = contacts {
        let normal = if dist > DEFAULT_EPSILON {
            delta / dist
        } else {
            Vector::x()
        };

        let depth = rsum - dist;
        out.push(ShapeContact {
            position: c1 + normal * (b1.radius - depth * 0.5),
            normal,
            depth,
        });
    }

    true
}

/// General support-mapped pair: boolean GJK, then EPA for the contact.
fn gjk_contact(
    sm1: &dyn SupportMap,
    tf1: &Isometry<Real>,
    sm2: &dyn SupportMap,
    tf2: &Isometry<Real>,
    guess: &mut Vector<Real>,
    contacts: Option<&mut Vec<ShapeContact>>,
) -> bool {
    match gjk::intersection_test(sm1, tf1, sm2, tf2, guess) {
        GjkResult::Disjoint => false,
        GjkResult::Intersection(simplex) => {
            if let Some(out) = contacts {
                if let Some(pen) = epa::penetration(sm1, tf1, sm2, tf2, &simplex) {
                    out.push(ShapeContact {
                        position: pen.position,
                        normal: pen.normal,
                        depth: pen.depth,
                    });
                } else {
                    // Shallow or degenerate contact: approximate from the
                    // last supports.
                    let last = simplex.last().unwrap();
                    let mut normal = tf2.translation.vector - tf1.translation.vector;
                    if normal.norm_squared() < DEFAULT_EPSILON {
                        normal = Vector::x();
                    } else {
                        normal = normal.normalize();
                    }
                    out.push(ShapeContact {
                        position: na::center(&last.sup1, &last.sup2),
                        normal,
                        depth: 0.0,
                    });
                }
            }
            true
        }
    }
}

/// Approximate contact between two intersecting world-space triangles.
fn triangle_contact(t1: &Triangle, t2: &Triangle) -> ShapeContact {
    let mut normal = t1.scaled_normal();
    if normal.norm_squared() < DEFAULT_EPSILON {
        normal = Vector::z();
    } else {
        normal = normal.normalize();
    }

    // Orient from the first triangle toward the second.
    if normal.dot(&(t2.center() - t1.center())) < 0.0 {
        normal = -normal;
    }

    // The deepest vertex of the second triangle below the first one's
    // plane approximates the penetration.
    let mut deepest = t2.a;
    let mut min_signed = Real::MAX;
    for v in [t2.a, t2.b, t2.c] {
        let signed = normal.dot(&(v - t1.a));
        if signed < min_signed {
            min_signed = signed;
            deepest = v;
        }
    }

    ShapeContact {
        position: deepest - normal * (min_signed * 0.5),
        normal,
        depth: (-min_signed).max(0.0),
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use na::Unit;

    #[test]
    fn touching_balls_make_one_contact() {
        let solver = DefaultNarrowPhase;
        let s1 = Shape::Ball(Ball::new(1.0));
        let s2 = Shape::Ball(Ball::new(1.0));
        let tf1 = Isometry::identity();
        let tf2 = Isometry::translation(2.0, 0.0, 0.0);

        let mut contacts = Vec::new();
        let mut guess = Vector::x();
        assert!(solver.shape_intersect(&s1, &tf1, &s2, &tf2, &mut guess, Some(&mut contacts)));

        let c = &contacts[0];
        assert!(relative_eq!(c.position, Point::new(1.0, 0.0, 0.0), epsilon = 1.0e-5));
        assert!(relative_eq!(c.normal, Vector::x(), epsilon = 1.0e-5));
        assert!(c.depth.abs() < 1.0e-5);
    }

    #[test]
    fn plane_cuts_cuboid() {
        let solver = DefaultNarrowPhase;
        let cuboid = Shape::Cuboid(crate::shape::Cuboid::new(Vector::new(1.0, 1.0, 1.0)));
        let plane = Shape::Plane(Plane::new(Unit::new_normalize(Vector::z()), 0.0));
        let tf = Isometry::identity();

        let mut contacts = Vec::new();
        let mut guess = Vector::x();
        assert!(solver.shape_intersect(&cuboid, &tf, &plane, &tf, &mut guess, Some(&mut contacts)));

        let c = &contacts[0];
        assert!(c.position.z.abs() < 1.0e-5);
        assert!(c.normal.cross(&Vector::z()).norm() < 1.0e-5);
    }

    #[test]
    fn separated_half_space_misses() {
        let solver = DefaultNarrowPhase;
        let ball = Shape::Ball(Ball::new(0.5));
        let hs = Shape::HalfSpace(HalfSpace::new(Unit::new_normalize(Vector::y()), 0.0));
        let tf1 = Isometry::translation(0.0, 2.0, 0.0);
        let tf2 = Isometry::identity();

        let mut guess = Vector::x();
        assert!(!solver.shape_intersect(&ball, &tf1, &hs, &tf2, &mut guess, None));
    }
}
