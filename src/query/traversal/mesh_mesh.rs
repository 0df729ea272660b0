use crate::bounding_volume::{BoundingVolume, OrientedBv};
use crate::bvh::BvhModel;
use crate::math::{Isometry, Real, Vector};
use crate::query::narrow_phase::NarrowPhaseSolver;
use crate::query::traversal::node::descend_first;
use crate::query::traversal::{add_narrow_contacts, add_overlap_cost, CollisionTraversalNode};
use crate::query::{CollisionRequest, CollisionResult};
use crate::shape::CollisionGeometry;

/// State shared by the generic and oriented mesh-vs-mesh traversals.
pub(crate) struct MeshMeshBase<'a, BV, S: NarrowPhaseSolver> {
    pub(crate) g1: &'a CollisionGeometry,
    pub(crate) model1: &'a BvhModel<BV>,
    pub(crate) tf1: &'a Isometry<Real>,
    pub(crate) g2: &'a CollisionGeometry,
    pub(crate) model2: &'a BvhModel<BV>,
    pub(crate) tf2: &'a Isometry<Real>,
    pub(crate) solver: &'a S,
    pub(crate) request: &'a CollisionRequest,
    pub(crate) result: &'a mut CollisionResult,
}

impl<'a, BV: BoundingVolume, S: NarrowPhaseSolver> MeshMeshBase<'a, BV, S> {
    fn leaf_test(&mut self, i: usize, j: usize) {
        let node1 = self.model1.node(i);
        let node2 = self.model2.node(j);

        for &prim1 in self.model1.leaf_primitives(node1) {
            for &prim2 in self.model2.leaf_primitives(node2) {
                if self.request.is_satisfied(self.result) {
                    return;
                }

                let tri1 = self.model1.triangle(prim1 as usize);
                let tri2 = self.model2.triangle(prim2 as usize);

                let mut contacts = Vec::new();
                let sink = self.request.enable_contact.then_some(&mut contacts);

                let hit =
                    self.solver
                        .triangle_intersect(&tri1, self.tf1, &tri2, self.tf2, sink);

                if hit {
                    if contacts.is_empty() {
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
                        Some(prim1),
                        Some(prim2),
                        &contacts,
                        false,
                    );
                }

                if self.request.enable_cost {
                    add_overlap_cost(
                        self.request,
                        self.result,
                        &self
                            .model1
                            .triangle_aabb(prim1 as usize)
                            .transform_by(self.tf1),
                        &self
                            .model2
                            .triangle_aabb(prim2 as usize)
                            .transform_by(self.tf2),
                        self.g1.cost_density * self.g2.cost_density,
                    );
                }
            }
        }
    }

    #[inline]
    fn can_stop(&self) -> bool {
        self.request.is_satisfied(self.result)
    }

    #[inline]
    fn first_over_second(&self, i: usize, j: usize) -> bool {
        let n1 = self.model1.node(i);
        let n2 = self.model2.node(j);
        descend_first(n1.is_leaf(), n2.is_leaf(), n1.bv.size(), n2.bv.size())
    }
}

/// Mesh-vs-mesh traversal comparing world-space boxes, used by
/// hierarchies without an oriented overlap test (AABB, k-DOP).
pub struct MeshCollisionNode<'a, BV, S: NarrowPhaseSolver> {
    pub(crate) base: MeshMeshBase<'a, BV, S>,
}

impl<'a, BV: BoundingVolume, S: NarrowPhaseSolver> CollisionTraversalNode
    for MeshCollisionNode<'a, BV, S>
{
    fn bv_disjoint(&self, i: usize, j: usize) -> bool {
        let a1 = self
            .base
            .model1
            .node(i)
            .bv
            .local_aabb()
            .transform_by(self.base.tf1);
        let a2 = self
            .base
            .model2
            .node(j)
            .bv
            .local_aabb()
            .transform_by(self.base.tf2);
        !a1.intersects(&a2)
    }

    #[inline]
    fn is_leaf1(&self, i: usize) -> bool {
        self.base.model1.node(i).is_leaf()
    }

    #[inline]
    fn is_leaf2(&self, j: usize) -> bool {
        self.base.model2.node(j).is_leaf()
    }

    #[inline]
    fn first_over_second(&self, i: usize, j: usize) -> bool {
        self.base.first_over_second(i, j)
    }

    #[inline]
    fn children1(&self, i: usize) -> (usize, usize) {
        self.base.model1.node(i).children()
    }

    #[inline]
    fn children2(&self, j: usize) -> (usize, usize) {
        self.base.model2.node(j).children()
    }

    #[inline]
    fn leaf_test(&mut self, i: usize, j: usize) {
        self.base.leaf_test(i, j);
    }

    #[inline]
    fn can_stop(&self) -> bool {
        self.base.can_stop()
    }
}

/// Mesh-vs-mesh traversal for oriented hierarchies (OBB, kIOS, OBBRSS).
///
/// The relative transform between the two models is composed once; each
/// pruning test expresses one volume in the other model's frame.
pub struct MeshCollisionNodeOriented<'a, BV, S: NarrowPhaseSolver> {
    pub(crate) base: MeshMeshBase<'a, BV, S>,
    pos12: Isometry<Real>,
}

impl<'a, BV: OrientedBv, S: NarrowPhaseSolver> MeshCollisionNodeOriented<'a, BV, S> {
    pub(crate) fn new(base: MeshMeshBase<'a, BV, S>) -> Self {
        let pos12 = base.tf1.inv_mul(base.tf2);
        MeshCollisionNodeOriented { base, pos12 }
    }
}

impl<'a, BV: OrientedBv, S: NarrowPhaseSolver> CollisionTraversalNode
    for MeshCollisionNodeOriented<'a, BV, S>
{
    fn bv_disjoint(&self, i: usize, j: usize) -> bool {
        let bv1 = &self.base.model1.node(i).bv;
        let bv2 = self.base.model2.node(j).bv.transformed(&self.pos12);
        !bv1.intersects(&bv2)
    }

    #[inline]
    fn is_leaf1(&self, i: usize) -> bool {
        self.base.model1.node(i).is_leaf()
    }

    #[inline]
    fn is_leaf2(&self, j: usize) -> bool {
        self.base.model2.node(j).is_leaf()
    }

    #[inline]
    fn first_over_second(&self, i: usize, j: usize) -> bool {
        self.base.first_over_second(i, j)
    }

    #[inline]
    fn children1(&self, i: usize) -> (usize, usize) {
        self.base.model1.node(i).children()
    }

    #[inline]
    fn children2(&self, j: usize) -> (usize, usize) {
        self.base.model2.node(j).children()
    }

    #[inline]
    fn leaf_test(&mut self, i: usize, j: usize) {
        self.base.leaf_test(i, j);
    }

    #[inline]
    fn can_stop(&self) -> bool {
        self.base.can_stop()
    }
}
