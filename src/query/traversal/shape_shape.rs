use crate::math::{Isometry, Real, Vector};
use crate::query::narrow_phase::NarrowPhaseSolver;
use crate::query::traversal::{add_narrow_contacts, add_overlap_cost, CollisionTraversalNode};
use crate::query::{CollisionRequest, CollisionResult};
use crate::shape::{CollisionGeometry, Shape};

/// Traversal node for a pair of convex primitives.
///
/// Both sides are trivially leaves: the driver performs a single leaf test
/// delegating to the narrow phase.
pub struct ShapeCollisionNode<'a, S: NarrowPhaseSolver> {
    pub(crate) g1: &'a CollisionGeometry,
    pub(crate) s1: &'a Shape,
    pub(crate) tf1: &'a Isometry<Real>,
    pub(crate) g2: &'a CollisionGeometry,
    pub(crate) s2: &'a Shape,
    pub(crate) tf2: &'a Isometry<Real>,
    pub(crate) solver: &'a S,
    pub(crate) request: &'a CollisionRequest,
    pub(crate) result: &'a mut CollisionResult,
    /// The GJK warm start, threaded through the node rather than the
    /// solver so concurrent queries keep independent warm starts.
    pub(crate) guess: Vector<Real>,
}

impl<'a, S: NarrowPhaseSolver> ShapeCollisionNode<'a, S> {
    pub(crate) fn new(
        g1: &'a CollisionGeometry,
        tf1: &'a Isometry<Real>,
        g2: &'a CollisionGeometry,
        tf2: &'a Isometry<Real>,
        solver: &'a S,
        request: &'a CollisionRequest,
        result: &'a mut CollisionResult,
        guess: Vector<Real>,
    ) -> Self {
        let s1 = g1.as_shape().expect("operand 1 is not a shape");
        let s2 = g2.as_shape().expect("operand 2 is not a shape");
        ShapeCollisionNode {
            g1,
            s1,
            tf1,
            g2,
            s2,
            tf2,
            solver,
            request,
            result,
            guess,
        }
    }
}

impl<'a, S: NarrowPhaseSolver> CollisionTraversalNode for ShapeCollisionNode<'a, S> {
    #[inline]
    fn bv_disjoint(&self, _: usize, _: usize) -> bool {
        false
    }

    #[inline]
    fn is_leaf1(&self, _: usize) -> bool {
        true
    }

    #[inline]
    fn is_leaf2(&self, _: usize) -> bool {
        true
    }

    #[inline]
    fn first_over_second(&self, _: usize, _: usize) -> bool {
        true
    }

    fn children1(&self, _: usize) -> (usize, usize) {
        unreachable!("a shape has no hierarchy to descend")
    }

    fn children2(&self, _: usize) -> (usize, usize) {
        unreachable!("a shape has no hierarchy to descend")
    }

    fn leaf_test(&mut self, _: usize, _: usize) {
        let mut contacts = Vec::new();
        let sink = self.request.enable_contact.then_some(&mut contacts);

        let hit = self.solver.shape_intersect(
            self.s1, self.tf1, self.s2, self.tf2, &mut self.guess, sink,
        );

        if hit {
            if contacts.is_empty() {
                // Contact data was not requested; record the hit alone.
                contacts.push(crate::query::narrow_phase::ShapeContact {
                    position: na::Point3::origin(),
                    normal: Vector::zeros(),
                    depth: 0.0,
                });
            }
            add_narrow_contacts(
                self.request,
                self.result,
                self.g1.kind(),
                self.g2.kind(),
                None,
                None,
                &contacts,
                false,
            );
        }

        if self.request.enable_cost {
            add_overlap_cost(
                self.request,
                self.result,
                &self.g1.world_aabb(self.tf1),
                &self.g2.world_aabb(self.tf2),
                self.g1.cost_density * self.g2.cost_density,
            );
        }
    }

    #[inline]
    fn can_stop(&self) -> bool {
        self.request.is_satisfied(self.result)
    }
}
