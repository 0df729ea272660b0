use crate::bounding_volume::{Aabb, BoundingVolume, Obb, OrientedBv};
use crate::bvh::BvhModel;
use crate::math::{Isometry, Real, Vector};
use crate::query::narrow_phase::NarrowPhaseSolver;
use crate::query::traversal::{add_narrow_contacts, add_overlap_cost, CollisionTraversalNode};
use crate::query::{CollisionRequest, CollisionResult};
use crate::shape::{CollisionGeometry, Shape};

/// State shared by the generic and oriented mesh-vs-shape traversals.
///
/// The mesh is always the hierarchy side; `swapped` records whether the
/// original pair had the shape first, so reported contacts can be flipped
/// back into the caller's operand order.
pub(crate) struct MeshShapeBase<'a, BV, S: NarrowPhaseSolver> {
    pub(crate) mesh_g: &'a CollisionGeometry,
    pub(crate) model: &'a BvhModel<BV>,
    pub(crate) tf1: &'a Isometry<Real>,
    pub(crate) shape_g: &'a CollisionGeometry,
    pub(crate) shape: &'a Shape,
    pub(crate) tf2: &'a Isometry<Real>,
    pub(crate) swapped: bool,
    pub(crate) solver: &'a S,
    pub(crate) request: &'a CollisionRequest,
    pub(crate) result: &'a mut CollisionResult,
    pub(crate) guess: Vector<Real>,
}

impl<'a, BV: BoundingVolume, S: NarrowPhaseSolver> MeshShapeBase<'a, BV, S> {
    fn leaf_test(&mut self, i: usize) {
        let node = self.model.node(i);

        for &prim in self.model.leaf_primitives(node) {
            if self.request.is_satisfied(self.result) {
                return;
            }

            let tri = self.model.triangle(prim as usize);
            let mut contacts = Vec::new();
            let sink = self.request.enable_contact.then_some(&mut contacts);

            // The narrow phase reports normals pointing from the shape
            // toward the triangle; un-swapped pairs have the mesh first.
            let hit = self.solver.shape_triangle_intersect(
                self.shape,
                self.tf2,
                &tri,
                self.tf1,
                &mut self.guess,
                sink,
            );

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
                    self.shape_g.kind(),
                    self.mesh_g.kind(),
                    None,
                    Some(prim),
                    &contacts,
                    !self.swapped,
                );
            }

            if self.request.enable_cost {
                add_overlap_cost(
                    self.request,
                    self.result,
                    &self
                        .model
                        .triangle_aabb(prim as usize)
                        .transform_by(self.tf1),
                    &self.shape_g.world_aabb(self.tf2),
                    self.mesh_g.cost_density * self.shape_g.cost_density,
                );
            }
        }
    }

    #[inline]
    fn can_stop(&self) -> bool {
        self.request.is_satisfied(self.result)
    }
}

/// Mesh-vs-shape traversal for hierarchies whose volumes stay axis-aligned
/// in their own frame (AABB, k-DOP).
///
/// Pruning compares the world-space boxes of both sides; this transforms
/// one box per visited node but never touches the vertex data.
pub struct MeshShapeCollisionNode<'a, BV, S: NarrowPhaseSolver> {
    pub(crate) base: MeshShapeBase<'a, BV, S>,
    shape_world_aabb: Aabb,
}

impl<'a, BV: BoundingVolume, S: NarrowPhaseSolver> MeshShapeCollisionNode<'a, BV, S> {
    pub(crate) fn new(base: MeshShapeBase<'a, BV, S>) -> Self {
        let shape_world_aabb = base.shape_g.world_aabb(base.tf2);
        MeshShapeCollisionNode {
            base,
            shape_world_aabb,
        }
    }

    pub(crate) fn into_guess(self) -> Vector<Real> {
        self.base.guess
    }
}

impl<'a, BV: BoundingVolume, S: NarrowPhaseSolver> CollisionTraversalNode
    for MeshShapeCollisionNode<'a, BV, S>
{
    fn bv_disjoint(&self, i: usize, _: usize) -> bool {
        let node_aabb = self
            .base
            .model
            .node(i)
            .bv
            .local_aabb()
            .transform_by(self.base.tf1);
        !node_aabb.intersects(&self.shape_world_aabb)
    }

    #[inline]
    fn is_leaf1(&self, i: usize) -> bool {
        self.base.model.node(i).is_leaf()
    }

    #[inline]
    fn is_leaf2(&self, _: usize) -> bool {
        true
    }

    #[inline]
    fn first_over_second(&self, _: usize, _: usize) -> bool {
        true
    }

    #[inline]
    fn children1(&self, i: usize) -> (usize, usize) {
        self.base.model.node(i).children()
    }

    fn children2(&self, _: usize) -> (usize, usize) {
        unreachable!("a shape has no hierarchy to descend")
    }

    #[inline]
    fn leaf_test(&mut self, i: usize, _: usize) {
        self.base.leaf_test(i);
    }

    #[inline]
    fn can_stop(&self) -> bool {
        self.base.can_stop()
    }
}

/// Mesh-vs-shape traversal for oriented hierarchies (OBB, RSS, kIOS,
/// OBBRSS).
///
/// The shape's box is expressed in the mesh's local frame once at
/// initialization; every per-node test then runs without composing
/// transforms.
pub struct MeshShapeCollisionNodeOriented<'a, BV, S: NarrowPhaseSolver> {
    pub(crate) base: MeshShapeBase<'a, BV, S>,
    shape_local_obb: Obb,
}

impl<'a, BV: OrientedBv, S: NarrowPhaseSolver> MeshShapeCollisionNodeOriented<'a, BV, S> {
    pub(crate) fn new(base: MeshShapeBase<'a, BV, S>) -> Self {
        let pos12 = base.tf1.inv_mul(base.tf2);
        let shape_local_obb = Obb::from_aabb(base.shape_g.local_aabb()).transformed(&pos12);
        MeshShapeCollisionNodeOriented {
            base,
            shape_local_obb,
        }
    }

    pub(crate) fn into_guess(self) -> Vector<Real> {
        self.base.guess
    }
}

impl<'a, BV: OrientedBv, S: NarrowPhaseSolver> CollisionTraversalNode
    for MeshShapeCollisionNodeOriented<'a, BV, S>
{
    #[inline]
    fn bv_disjoint(&self, i: usize, _: usize) -> bool {
        !self
            .base
            .model
            .node(i)
            .bv
            .intersects_obb(&self.shape_local_obb)
    }

    #[inline]
    fn is_leaf1(&self, i: usize) -> bool {
        self.base.model.node(i).is_leaf()
    }

    #[inline]
    fn is_leaf2(&self, _: usize) -> bool {
        true
    }

    #[inline]
    fn first_over_second(&self, _: usize, _: usize) -> bool {
        true
    }

    #[inline]
    fn children1(&self, i: usize) -> (usize, usize) {
        self.base.model.node(i).children()
    }

    fn children2(&self, _: usize) -> (usize, usize) {
        unreachable!("a shape has no hierarchy to descend")
    }

    #[inline]
    fn leaf_test(&mut self, i: usize, _: usize) {
        self.base.leaf_test(i);
    }

    #[inline]
    fn can_stop(&self) -> bool {
        self.base.can_stop()
    }
}
