//! Octree traversals: octree vs. shape, mesh and octree.
//!
//! The dispatch-level traversal nodes for octree pairs are trivial: their
//! `bv_disjoint` is `false` at the root-equivalent entry and the single
//! leaf test hands the whole walk to the [`OcTreeSolver`], which descends
//! the octree(s) recursively while honoring the occupancy thresholds of
//! the owning geometry.

use crate::bounding_volume::{Aabb, BoundingVolume};
use crate::bvh::BvhModel;
use crate::math::{Isometry, Real, Vector};
use crate::octree::{OcTree, OcTreeNode};
use crate::query::narrow_phase::NarrowPhaseSolver;
use crate::query::traversal::{add_narrow_contacts, add_overlap_cost, CollisionTraversalNode};
use crate::query::{CollisionRequest, CollisionResult};
use crate::shape::{CollisionGeometry, NodeKind, Shape};

#[inline]
fn occupied(geom: &CollisionGeometry, node: &OcTreeNode) -> bool {
    node.value() >= geom.threshold_occupied
}

#[inline]
fn free(geom: &CollisionGeometry, node: &OcTreeNode) -> bool {
    node.value() <= geom.threshold_free
}

/// Wraps a narrow-phase solver with the octree walks used by the octree
/// traversal nodes.
pub struct OcTreeSolver<'a, S: NarrowPhaseSolver> {
    solver: &'a S,
}

impl<'a, S: NarrowPhaseSolver> OcTreeSolver<'a, S> {
    /// Creates an octree solver forwarding leaf pairs to `solver`.
    pub fn new(solver: &'a S) -> Self {
        OcTreeSolver { solver }
    }

    /// Walks the octree against a convex primitive. `swapped` flips the
    /// operand order of the reported contacts.
    pub fn octree_shape_intersect(
        &self,
        tree_g: &CollisionGeometry,
        tree: &OcTree,
        tf1: &Isometry<Real>,
        shape_g: &CollisionGeometry,
        shape: &Shape,
        tf2: &Isometry<Real>,
        swapped: bool,
        request: &CollisionRequest,
        result: &mut CollisionResult,
        guess: &mut Vector<Real>,
    ) {
        let mut walk = OcTreeShapeWalk {
            solver: self.solver,
            tree_g,
            tf1,
            shape_g,
            shape,
            tf2,
            shape_world_aabb: shape_g.world_aabb(tf2),
            swapped,
            request,
            result,
            guess,
        };
        walk.recurse(tree.root(), *tree.root_aabb());
    }

    /// Walks the octree against a triangle-mesh hierarchy.
    pub fn octree_mesh_intersect<BV: BoundingVolume>(
        &self,
        tree_g: &CollisionGeometry,
        tree: &OcTree,
        tf1: &Isometry<Real>,
        mesh_g: &CollisionGeometry,
        model: &BvhModel<BV>,
        tf2: &Isometry<Real>,
        swapped: bool,
        request: &CollisionRequest,
        result: &mut CollisionResult,
        guess: &mut Vector<Real>,
    ) {
        let mut walk = OcTreeMeshWalk {
            solver: self.solver,
            tree_g,
            tf1,
            mesh_g,
            model,
            tf2,
            swapped,
            request,
            result,
            guess,
        };
        walk.recurse(tree.root(), *tree.root_aabb(), 0);
    }

    /// Walks two octrees against each other.
    pub fn octree_intersect(
        &self,
        g1: &CollisionGeometry,
        tree1: &OcTree,
        tf1: &Isometry<Real>,
        g2: &CollisionGeometry,
        tree2: &OcTree,
        tf2: &Isometry<Real>,
        request: &CollisionRequest,
        result: &mut CollisionResult,
        guess: &mut Vector<Real>,
    ) {
        let mut walk = OcTreeOcTreeWalk {
            solver: self.solver,
            g1,
            tf1,
            g2,
            tf2,
            request,
            result,
            guess,
        };
        walk.recurse(tree1.root(), *tree1.root_aabb(), tree2.root(), *tree2.root_aabb());
    }
}

struct OcTreeShapeWalk<'a, S: NarrowPhaseSolver> {
    solver: &'a S,
    tree_g: &'a CollisionGeometry,
    tf1: &'a Isometry<Real>,
    shape_g: &'a CollisionGeometry,
    shape: &'a Shape,
    tf2: &'a Isometry<Real>,
    shape_world_aabb: Aabb,
    swapped: bool,
    request: &'a CollisionRequest,
    result: &'a mut CollisionResult,
    guess: &'a mut Vector<Real>,
}

impl<'a, S: NarrowPhaseSolver> OcTreeShapeWalk<'a, S> {
    fn recurse(&mut self, node: &OcTreeNode, aabb: Aabb) {
        if free(self.tree_g, node) || self.request.is_satisfied(self.result) {
            return;
        }

        let world = aabb.transform_by(self.tf1);
        if !world.intersects(&self.shape_world_aabb) {
            return;
        }

        if node.is_leaf() {
            if occupied(self.tree_g, node) {
                let (iso, cuboid) = aabb.to_cuboid();
                let box_tf = self.tf1 * iso;
                let voxel = Shape::Cuboid(cuboid);

                let mut contacts = Vec::new();
                let sink = self.request.enable_contact.then_some(&mut contacts);
                let hit = self.solver.shape_intersect(
                    &voxel, &box_tf, self.shape, self.tf2, self.guess, sink,
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
                        NodeKind::OcTree,
                        self.shape_g.kind(),
                        None,
                        None,
                        &contacts,
                        self.swapped,
                    );
                }
            }

            // Every overlapping non-free cell contributes to the cost.
            if self.request.enable_cost {
                add_overlap_cost(
                    self.request,
                    self.result,
                    &world,
                    &self.shape_world_aabb,
                    self.tree_g.cost_density * self.shape_g.cost_density,
                );
            }
        } else {
            let children = aabb.split_at_center();
            for (i, child_aabb) in children.iter().enumerate() {
                if let Some(child) = node.child(i) {
                    self.recurse(child, *child_aabb);
                }
            }
        }
    }
}

struct OcTreeMeshWalk<'a, BV, S: NarrowPhaseSolver> {
    solver: &'a S,
    tree_g: &'a CollisionGeometry,
    tf1: &'a Isometry<Real>,
    mesh_g: &'a CollisionGeometry,
    model: &'a BvhModel<BV>,
    tf2: &'a Isometry<Real>,
    swapped: bool,
    request: &'a CollisionRequest,
    result: &'a mut CollisionResult,
    guess: &'a mut Vector<Real>,
}

impl<'a, BV: BoundingVolume, S: NarrowPhaseSolver> OcTreeMeshWalk<'a, BV, S> {
    fn recurse(&mut self, onode: &OcTreeNode, oaabb: Aabb, mesh_id: usize) {
        if free(self.tree_g, onode) || self.request.is_satisfied(self.result) {
            return;
        }

        let mesh_node = self.model.node(mesh_id);
        let oworld = oaabb.transform_by(self.tf1);
        let mesh_world = mesh_node.bv.local_aabb().transform_by(self.tf2);
        if !oworld.intersects(&mesh_world) {
            return;
        }

        let oct_leaf = onode.is_leaf();
        let mesh_leaf = mesh_node.is_leaf();

        if oct_leaf && mesh_leaf {
            self.leaf_pair(onode, &oaabb, &oworld, mesh_id);
            return;
        }

        let descend_octree = super::node::descend_first(
            oct_leaf,
            mesh_leaf,
            oaabb.extents().norm_squared(),
            mesh_node.bv.size(),
        );

        if descend_octree {
            let children = oaabb.split_at_center();
            for (i, child_aabb) in children.iter().enumerate() {
                if let Some(child) = onode.child(i) {
                    self.recurse(child, *child_aabb, mesh_id);
                }
            }
        } else {
            let (left, right) = mesh_node.children();
            self.recurse(onode, oaabb, left);
            self.recurse(onode, oaabb, right);
        }
    }

    fn leaf_pair(&mut self, onode: &OcTreeNode, oaabb: &Aabb, oworld: &Aabb, mesh_id: usize) {
        let mesh_node = self.model.node(mesh_id);
        let solid = occupied(self.tree_g, onode);

        let (iso, cuboid) = oaabb.to_cuboid();
        let box_tf = self.tf1 * iso;
        let voxel = Shape::Cuboid(cuboid);

        for &prim in self.model.leaf_primitives(mesh_node) {
            if self.request.is_satisfied(self.result) {
                return;
            }

            if solid {
                let tri = self.model.triangle(prim as usize);
                let mut contacts = Vec::new();
                let sink = self.request.enable_contact.then_some(&mut contacts);

                let hit = self.solver.shape_triangle_intersect(
                    &voxel, &box_tf, &tri, self.tf2, self.guess, sink,
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
                        NodeKind::OcTree,
                        self.mesh_g.kind(),
                        None,
                        Some(prim),
                        &contacts,
                        self.swapped,
                    );
                }
            }

            if self.request.enable_cost {
                add_overlap_cost(
                    self.request,
                    self.result,
                    oworld,
                    &self
                        .model
                        .triangle_aabb(prim as usize)
                        .transform_by(self.tf2),
                    self.tree_g.cost_density * self.mesh_g.cost_density,
                );
            }
        }
    }
}

struct OcTreeOcTreeWalk<'a, S: NarrowPhaseSolver> {
    solver: &'a S,
    g1: &'a CollisionGeometry,
    tf1: &'a Isometry<Real>,
    g2: &'a CollisionGeometry,
    tf2: &'a Isometry<Real>,
    request: &'a CollisionRequest,
    result: &'a mut CollisionResult,
    guess: &'a mut Vector<Real>,
}

impl<'a, S: NarrowPhaseSolver> OcTreeOcTreeWalk<'a, S> {
    fn recurse(&mut self, n1: &OcTreeNode, a1: Aabb, n2: &OcTreeNode, a2: Aabb) {
        if free(self.g1, n1) || free(self.g2, n2) || self.request.is_satisfied(self.result) {
            return;
        }

        let w1 = a1.transform_by(self.tf1);
        let w2 = a2.transform_by(self.tf2);
        if !w1.intersects(&w2) {
            return;
        }

        let leaf1 = n1.is_leaf();
        let leaf2 = n2.is_leaf();

        if leaf1 && leaf2 {
            if occupied(self.g1, n1) && occupied(self.g2, n2) {
                let (iso1, cuboid1) = a1.to_cuboid();
                let (iso2, cuboid2) = a2.to_cuboid();
                let v1 = Shape::Cuboid(cuboid1);
                let v2 = Shape::Cuboid(cuboid2);

                let mut contacts = Vec::new();
                let sink = self.request.enable_contact.then_some(&mut contacts);
                let hit = self.solver.shape_intersect(
                    &v1,
                    &(self.tf1 * iso1),
                    &v2,
                    &(self.tf2 * iso2),
                    self.guess,
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
                        NodeKind::OcTree,
                        NodeKind::OcTree,
                        None,
                        None,
                        &contacts,
                        false,
                    );
                }
            }

            if self.request.enable_cost {
                add_overlap_cost(
                    self.request,
                    self.result,
                    &w1,
                    &w2,
                    self.g1.cost_density * self.g2.cost_density,
                );
            }

            return;
        }

        if super::node::descend_first(
            leaf1,
            leaf2,
            a1.extents().norm_squared(),
            a2.extents().norm_squared(),
        ) {
            let children = a1.split_at_center();
            for (i, child_aabb) in children.iter().enumerate() {
                if let Some(child) = n1.child(i) {
                    self.recurse(child, *child_aabb, n2, a2);
                }
            }
        } else {
            let children = a2.split_at_center();
            for (i, child_aabb) in children.iter().enumerate() {
                if let Some(child) = n2.child(i) {
                    self.recurse(n1, a1, child, *child_aabb);
                }
            }
        }
    }
}

macro_rules! trivial_traversal_impl(
    ($node: ident $(, $bv: ident)?) => {
        impl<'a $(, $bv: BoundingVolume)?, S: NarrowPhaseSolver> CollisionTraversalNode
            for $node<'a $(, $bv)?, S>
        {
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
                unreachable!("octree traversal nodes have no explicit hierarchy")
            }

            fn children2(&self, _: usize) -> (usize, usize) {
                unreachable!("octree traversal nodes have no explicit hierarchy")
            }

            #[inline]
            fn leaf_test(&mut self, _: usize, _: usize) {
                self.run();
            }

            #[inline]
            fn can_stop(&self) -> bool {
                self.request.is_satisfied(self.result)
            }
        }
    }
);

/// Traversal node for an octree-vs-shape pair.
pub struct OcTreeShapeCollisionNode<'a, S: NarrowPhaseSolver> {
    pub(crate) tree_g: &'a CollisionGeometry,
    pub(crate) tree: &'a OcTree,
    pub(crate) tf1: &'a Isometry<Real>,
    pub(crate) shape_g: &'a CollisionGeometry,
    pub(crate) shape: &'a Shape,
    pub(crate) tf2: &'a Isometry<Real>,
    pub(crate) otsolver: OcTreeSolver<'a, S>,
    pub(crate) request: &'a CollisionRequest,
    pub(crate) result: &'a mut CollisionResult,
    pub(crate) guess: Vector<Real>,
}

impl<'a, S: NarrowPhaseSolver> OcTreeShapeCollisionNode<'a, S> {
    fn run(&mut self) {
        self.otsolver.octree_shape_intersect(
            self.tree_g,
            self.tree,
            self.tf1,
            self.shape_g,
            self.shape,
            self.tf2,
            false,
            self.request,
            self.result,
            &mut self.guess,
        );
    }
}

trivial_traversal_impl!(OcTreeShapeCollisionNode);

/// Traversal node for a shape-vs-octree pair.
pub struct ShapeOcTreeCollisionNode<'a, S: NarrowPhaseSolver> {
    pub(crate) shape_g: &'a CollisionGeometry,
    pub(crate) shape: &'a Shape,
    pub(crate) tf1: &'a Isometry<Real>,
    pub(crate) tree_g: &'a CollisionGeometry,
    pub(crate) tree: &'a OcTree,
    pub(crate) tf2: &'a Isometry<Real>,
    pub(crate) otsolver: OcTreeSolver<'a, S>,
    pub(crate) request: &'a CollisionRequest,
    pub(crate) result: &'a mut CollisionResult,
    pub(crate) guess: Vector<Real>,
}

impl<'a, S: NarrowPhaseSolver> ShapeOcTreeCollisionNode<'a, S> {
    fn run(&mut self) {
        self.otsolver.octree_shape_intersect(
            self.tree_g,
            self.tree,
            self.tf2,
            self.shape_g,
            self.shape,
            self.tf1,
            true,
            self.request,
            self.result,
            &mut self.guess,
        );
    }
}

trivial_traversal_impl!(ShapeOcTreeCollisionNode);

/// Traversal node for an octree-vs-mesh pair.
pub struct OcTreeMeshCollisionNode<'a, BV, S: NarrowPhaseSolver> {
    pub(crate) tree_g: &'a CollisionGeometry,
    pub(crate) tree: &'a OcTree,
    pub(crate) tf1: &'a Isometry<Real>,
    pub(crate) mesh_g: &'a CollisionGeometry,
    pub(crate) model: &'a BvhModel<BV>,
    pub(crate) tf2: &'a Isometry<Real>,
    pub(crate) otsolver: OcTreeSolver<'a, S>,
    pub(crate) request: &'a CollisionRequest,
    pub(crate) result: &'a mut CollisionResult,
    pub(crate) guess: Vector<Real>,
}

impl<'a, BV: BoundingVolume, S: NarrowPhaseSolver> OcTreeMeshCollisionNode<'a, BV, S> {
    fn run(&mut self) {
        self.otsolver.octree_mesh_intersect(
            self.tree_g,
            self.tree,
            self.tf1,
            self.mesh_g,
            self.model,
            self.tf2,
            false,
            self.request,
            self.result,
            &mut self.guess,
        );
    }
}

trivial_traversal_impl!(OcTreeMeshCollisionNode, BV);

/// Traversal node for a mesh-vs-octree pair.
pub struct MeshOcTreeCollisionNode<'a, BV, S: NarrowPhaseSolver> {
    pub(crate) mesh_g: &'a CollisionGeometry,
    pub(crate) model: &'a BvhModel<BV>,
    pub(crate) tf1: &'a Isometry<Real>,
    pub(crate) tree_g: &'a CollisionGeometry,
    pub(crate) tree: &'a OcTree,
    pub(crate) tf2: &'a Isometry<Real>,
    pub(crate) otsolver: OcTreeSolver<'a, S>,
    pub(crate) request: &'a CollisionRequest,
    pub(crate) result: &'a mut CollisionResult,
    pub(crate) guess: Vector<Real>,
}

impl<'a, BV: BoundingVolume, S: NarrowPhaseSolver> MeshOcTreeCollisionNode<'a, BV, S> {
    fn run(&mut self) {
        self.otsolver.octree_mesh_intersect(
            self.tree_g,
            self.tree,
            self.tf2,
            self.mesh_g,
            self.model,
            self.tf1,
            true,
            self.request,
            self.result,
            &mut self.guess,
        );
    }
}

trivial_traversal_impl!(MeshOcTreeCollisionNode, BV);

/// Traversal node for a pair of octrees.
pub struct OcTreeCollisionNode<'a, S: NarrowPhaseSolver> {
    pub(crate) g1: &'a CollisionGeometry,
    pub(crate) tree1: &'a OcTree,
    pub(crate) tf1: &'a Isometry<Real>,
    pub(crate) g2: &'a CollisionGeometry,
    pub(crate) tree2: &'a OcTree,
    pub(crate) tf2: &'a Isometry<Real>,
    pub(crate) otsolver: OcTreeSolver<'a, S>,
    pub(crate) request: &'a CollisionRequest,
    pub(crate) result: &'a mut CollisionResult,
    pub(crate) guess: Vector<Real>,
}

impl<'a, S: NarrowPhaseSolver> OcTreeCollisionNode<'a, S> {
    fn run(&mut self) {
        self.otsolver.octree_intersect(
            self.g1,
            self.tree1,
            self.tf1,
            self.g2,
            self.tree2,
            self.tf2,
            self.request,
            self.result,
            &mut self.guess,
        );
    }
}

trivial_traversal_impl!(OcTreeCollisionNode);
