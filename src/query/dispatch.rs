//! The collision dispatch matrix.
//!
//! A square table indexed by the [`NodeKind`] tags of the two operands;
//! each populated cell is a traversal builder for that family of pairs.
//! Dispatch is O(1) and new pairs can be registered without touching call
//! sites.

use std::sync::OnceLock;

use crate::bounding_volume::{
    Aabb, BoundingVolume, Kdop16, Kdop18, Kdop24, Kios, Obb, ObbRss, OrientedBv, Rss,
};
use crate::bvh::{BvhModel, FitBv, ModelType};
use crate::math::{Isometry, Real, Vector};
use crate::query::narrow_phase::{DefaultNarrowPhase, NarrowPhaseSolver};
use crate::query::traversal::{
    self, MeshCollisionNode, MeshMeshBase, MeshShapeBase, MeshShapeCollisionNode,
    MeshShapeCollisionNodeOriented,
};
use crate::query::{CollisionError, CollisionRequest, CollisionResult};
use crate::shape::{CollisionGeometry, GeometryData, NodeKind, Shape};

#[cfg(feature = "octree")]
use crate::query::traversal::{
    MeshOcTreeCollisionNode, OcTreeCollisionNode, OcTreeMeshCollisionNode, OcTreeShapeCollisionNode,
    OcTreeSolver, ShapeOcTreeCollisionNode,
};

/// The signature of one dispatch cell: runs the pair's traversal and
/// returns the number of contacts accumulated in `result`.
pub type CollisionFn<S> = fn(
    &CollisionGeometry,
    &Isometry<Real>,
    &CollisionGeometry,
    &Isometry<Real>,
    &S,
    &CollisionRequest,
    &mut CollisionResult,
) -> Result<usize, CollisionError>;

/// Extraction of a typed mesh model out of a geometry operand.
trait MeshBv: FitBv {
    fn model_of(geom: &CollisionGeometry) -> Option<&BvhModel<Self>>;
}

macro_rules! impl_mesh_bv(
    ($($bv: ty, $variant: ident;)*) => {$(
        impl MeshBv for $bv {
            fn model_of(geom: &CollisionGeometry) -> Option<&BvhModel<Self>> {
                match geom.data() {
                    GeometryData::$variant(m) => Some(m),
                    _ => None,
                }
            }
        }
    )*}
);

impl_mesh_bv!(
    Aabb, MeshAabb;
    Obb, MeshObb;
    Rss, MeshRss;
    Kdop16, MeshKdop16;
    Kdop18, MeshKdop18;
    Kdop24, MeshKdop24;
    Kios, MeshKios;
    ObbRss, MeshObbRss;
);

/// The dispatch matrix: one optional traversal builder per ordered pair of
/// node kinds, parameterised over the narrow-phase backend.
pub struct CollisionMatrix<S: NarrowPhaseSolver> {
    table: [[Option<CollisionFn<S>>; NodeKind::COUNT]; NodeKind::COUNT],
}

impl<S: NarrowPhaseSolver> Default for CollisionMatrix<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: NarrowPhaseSolver> CollisionMatrix<S> {
    /// Builds the matrix with every supported pair populated.
    pub fn new() -> Self {
        let mut matrix = CollisionMatrix {
            table: [[None; NodeKind::COUNT]; NodeKind::COUNT],
        };

        for &k1 in &NodeKind::SHAPES {
            for &k2 in &NodeKind::SHAPES {
                matrix.set(k1, k2, shape_shape_collide::<S>);
            }
        }

        macro_rules! mesh_cells_generic(
            ($bv: ty, $kind: expr) => {
                for &sk in &NodeKind::SHAPES {
                    matrix.set($kind, sk, mesh_shape_collide::<S, $bv, false>);
                    matrix.set(sk, $kind, mesh_shape_collide::<S, $bv, true>);
                }
                matrix.set($kind, $kind, mesh_mesh_collide::<S, $bv>);
            }
        );

        macro_rules! mesh_cells_oriented(
            ($bv: ty, $kind: expr) => {
                for &sk in &NodeKind::SHAPES {
                    matrix.set($kind, sk, mesh_shape_collide_oriented::<S, $bv, false>);
                    matrix.set(sk, $kind, mesh_shape_collide_oriented::<S, $bv, true>);
                }
                matrix.set($kind, $kind, mesh_mesh_collide_oriented::<S, $bv>);
            }
        );

        // Axis-aligned hierarchies have no oriented overlap test and use
        // the generic (world-box) traversal.
        mesh_cells_generic!(Aabb, NodeKind::MeshAabb);
        mesh_cells_generic!(Kdop16, NodeKind::MeshKdop16);
        mesh_cells_generic!(Kdop18, NodeKind::MeshKdop18);
        mesh_cells_generic!(Kdop24, NodeKind::MeshKdop24);

        mesh_cells_oriented!(Obb, NodeKind::MeshObb);
        mesh_cells_oriented!(Rss, NodeKind::MeshRss);
        mesh_cells_oriented!(Kios, NodeKind::MeshKios);
        mesh_cells_oriented!(ObbRss, NodeKind::MeshObbRss);

        #[cfg(feature = "octree")]
        {
            for &sk in &NodeKind::SHAPES {
                matrix.set(NodeKind::OcTree, sk, octree_shape_collide::<S, false>);
                matrix.set(sk, NodeKind::OcTree, octree_shape_collide::<S, true>);
            }

            matrix.set(NodeKind::OcTree, NodeKind::OcTree, octree_octree_collide::<S>);

            macro_rules! octree_mesh_cells(
                ($bv: ty, $kind: expr) => {
                    matrix.set(NodeKind::OcTree, $kind, octree_mesh_collide::<S, $bv, false>);
                    matrix.set($kind, NodeKind::OcTree, octree_mesh_collide::<S, $bv, true>);
                }
            );

            octree_mesh_cells!(Aabb, NodeKind::MeshAabb);
            octree_mesh_cells!(Obb, NodeKind::MeshObb);
            octree_mesh_cells!(Rss, NodeKind::MeshRss);
            octree_mesh_cells!(Kdop16, NodeKind::MeshKdop16);
            octree_mesh_cells!(Kdop18, NodeKind::MeshKdop18);
            octree_mesh_cells!(Kdop24, NodeKind::MeshKdop24);
            octree_mesh_cells!(Kios, NodeKind::MeshKios);
            octree_mesh_cells!(ObbRss, NodeKind::MeshObbRss);
        }

        matrix
    }

    fn set(&mut self, k1: NodeKind, k2: NodeKind, f: CollisionFn<S>) {
        self.table[k1 as usize][k2 as usize] = Some(f);
    }

    /// Whether the given ordered pair has a populated cell.
    pub fn has_entry(&self, k1: NodeKind, k2: NodeKind) -> bool {
        self.table[k1 as usize][k2 as usize].is_some()
    }

    /// Dispatches the pair to its traversal builder, accumulating into
    /// `result`. Returns the total number of contacts in `result`.
    pub fn collide(
        &self,
        g1: &CollisionGeometry,
        tf1: &Isometry<Real>,
        g2: &CollisionGeometry,
        tf2: &Isometry<Real>,
        solver: &S,
        request: &CollisionRequest,
        result: &mut CollisionResult,
    ) -> Result<usize, CollisionError> {
        let kind1 = g1.kind();
        let kind2 = g2.kind();

        match self.table[kind1 as usize][kind2 as usize] {
            Some(cell) => cell(g1, tf1, g2, tf2, solver, request, result),
            None => Err(CollisionError::Unsupported { kind1, kind2 }),
        }
    }
}

/// Performs a collision query between two geometries, using the built-in
/// narrow phase.
///
/// This is the main entry point of the crate: the pair is routed through
/// the dispatch matrix to the specialised traversal for its two
/// [`NodeKind`]s.
pub fn collide(
    g1: &CollisionGeometry,
    tf1: &Isometry<Real>,
    g2: &CollisionGeometry,
    tf2: &Isometry<Real>,
    request: &CollisionRequest,
) -> Result<CollisionResult, CollisionError> {
    static MATRIX: OnceLock<CollisionMatrix<DefaultNarrowPhase>> = OnceLock::new();
    let matrix = MATRIX.get_or_init(CollisionMatrix::new);

    let mut result = CollisionResult::with_capacity(request.num_max_contacts);
    result.cached_gjk_guess = request.cached_gjk_guess;
    let _ = matrix.collide(g1, tf1, g2, tf2, &DefaultNarrowPhase, request, &mut result)?;
    Ok(result)
}

/// How the current request wants cost sources computed.
#[derive(Copy, Clone, PartialEq, Eq)]
enum CostMode {
    Off,
    Approximate,
    Exact,
}

impl CostMode {
    fn of(request: &CollisionRequest) -> Self {
        if !request.enable_cost {
            CostMode::Off
        } else if request.use_approximate_cost {
            CostMode::Approximate
        } else {
            CostMode::Exact
        }
    }
}

#[inline]
fn initial_guess(request: &CollisionRequest) -> Vector<Real> {
    if request.enable_cached_gjk_guess {
        request.cached_gjk_guess
    } else {
        Vector::x()
    }
}

#[inline]
fn store_guess(request: &CollisionRequest, result: &mut CollisionResult, guess: Vector<Real>) {
    if request.enable_cached_gjk_guess {
        result.cached_gjk_guess = guess;
    }
}

/// The contact-suppressing request of the approximate-cost second pass:
/// the contact cap equals what was already found, so only cost sources can
/// still accumulate.
fn only_cost_request(request: &CollisionRequest, result: &CollisionResult) -> CollisionRequest {
    CollisionRequest {
        num_max_contacts: result.num_contacts(),
        enable_contact: false,
        num_max_cost_sources: request.num_max_cost_sources,
        enable_cost: true,
        use_approximate_cost: false,
        enable_cached_gjk_guess: request.enable_cached_gjk_guess,
        cached_gjk_guess: request.cached_gjk_guess,
    }
}

/// Builds the box standing in for a mesh or octree during the
/// approximate-cost pass, inheriting the source geometry's cost scalars.
fn cost_approximation_box(
    source: &CollisionGeometry,
    bv_iso: Isometry<Real>,
    cuboid: crate::shape::Cuboid,
    tf: &Isometry<Real>,
) -> (CollisionGeometry, Isometry<Real>) {
    let mut box_g = CollisionGeometry::from(Shape::Cuboid(cuboid));
    box_g.cost_density = source.cost_density;
    box_g.threshold_occupied = source.threshold_occupied;
    box_g.threshold_free = source.threshold_free;
    (box_g, tf * bv_iso)
}

fn ensure_triangle_model<BV>(model: &BvhModel<BV>) -> Result<(), CollisionError> {
    if model.model_type() != ModelType::Triangles {
        return Err(CollisionError::InvalidGeometry {
            reason: "point-cloud models cannot produce contacts".to_string(),
        });
    }
    Ok(())
}

fn shape_shape_collide<S: NarrowPhaseSolver>(
    g1: &CollisionGeometry,
    tf1: &Isometry<Real>,
    g2: &CollisionGeometry,
    tf2: &Isometry<Real>,
    solver: &S,
    request: &CollisionRequest,
    result: &mut CollisionResult,
) -> Result<usize, CollisionError> {
    if request.is_satisfied(result) {
        return Ok(result.num_contacts());
    }

    let guess = initial_guess(request);
    let mut node = traversal::ShapeCollisionNode::new(
        g1, tf1, g2, tf2, solver, request, result, guess,
    );
    traversal::collide(&mut node);
    let guess = node.guess;

    store_guess(request, result, guess);
    Ok(result.num_contacts())
}

macro_rules! mesh_shape_cell(
    ($name: ident, $bound: ident, $node: ident) => {
        fn $name<S: NarrowPhaseSolver, BV: $bound, const SWAPPED: bool>(
            o1: &CollisionGeometry,
            tf1: &Isometry<Real>,
            o2: &CollisionGeometry,
            tf2: &Isometry<Real>,
            solver: &S,
            request: &CollisionRequest,
            result: &mut CollisionResult,
        ) -> Result<usize, CollisionError>
        where
            BV: MeshBv,
        {
            if request.is_satisfied(result) {
                return Ok(result.num_contacts());
            }

            let (mesh_g, mesh_tf, shape_g, shape_tf) = if SWAPPED {
                (o2, tf2, o1, tf1)
            } else {
                (o1, tf1, o2, tf2)
            };

            let model = BV::model_of(mesh_g).expect("dispatch cell does not match the mesh variant");
            ensure_triangle_model(model)?;
            let shape = shape_g.as_shape().expect("dispatch cell does not match the shape variant");

            let run = |request: &CollisionRequest, result: &mut CollisionResult| {
                let base = MeshShapeBase {
                    mesh_g,
                    model,
                    tf1: mesh_tf,
                    shape_g,
                    shape,
                    tf2: shape_tf,
                    swapped: SWAPPED,
                    solver,
                    request,
                    result,
                    guess: initial_guess(request),
                };
                let mut node = $node::new(base);
                traversal::collide(&mut node);
                node.into_guess()
            };

            match CostMode::of(request) {
                CostMode::Off | CostMode::Exact => {
                    let guess = run(request, result);
                    store_guess(request, result, guess);
                }
                CostMode::Approximate => {
                    let mut no_cost_request = request.clone();
                    no_cost_request.enable_cost = false;
                    let guess = run(&no_cost_request, result);
                    store_guess(request, result, guess);

                    let (bv_iso, cuboid) = model.root_bv().to_cuboid();
                    let (box_g, box_tf) =
                        cost_approximation_box(mesh_g, bv_iso, cuboid, mesh_tf);

                    let only_cost = only_cost_request(request, result);
                    let _ = if SWAPPED {
                        shape_shape_collide::<S>(
                            shape_g, shape_tf, &box_g, &box_tf, solver, &only_cost, result,
                        )?
                    } else {
                        shape_shape_collide::<S>(
                            &box_g, &box_tf, shape_g, shape_tf, solver, &only_cost, result,
                        )?
                    };
                }
            }

            Ok(result.num_contacts())
        }
    }
);

mesh_shape_cell!(mesh_shape_collide, BoundingVolume, MeshShapeCollisionNode);
mesh_shape_cell!(
    mesh_shape_collide_oriented,
    OrientedBv,
    MeshShapeCollisionNodeOriented
);

fn mesh_mesh_collide<S: NarrowPhaseSolver, BV: MeshBv>(
    g1: &CollisionGeometry,
    tf1: &Isometry<Real>,
    g2: &CollisionGeometry,
    tf2: &Isometry<Real>,
    solver: &S,
    request: &CollisionRequest,
    result: &mut CollisionResult,
) -> Result<usize, CollisionError> {
    if request.is_satisfied(result) {
        return Ok(result.num_contacts());
    }

    let model1 = BV::model_of(g1).expect("dispatch cell does not match the mesh variant");
    let model2 = BV::model_of(g2).expect("dispatch cell does not match the mesh variant");
    ensure_triangle_model(model1)?;
    ensure_triangle_model(model2)?;

    let base = MeshMeshBase {
        g1,
        model1,
        tf1,
        g2,
        model2,
        tf2,
        solver,
        request,
        result,
    };
    let mut node = MeshCollisionNode { base };
    traversal::collide(&mut node);

    Ok(result.num_contacts())
}

fn mesh_mesh_collide_oriented<S: NarrowPhaseSolver, BV: MeshBv + OrientedBv>(
    g1: &CollisionGeometry,
    tf1: &Isometry<Real>,
    g2: &CollisionGeometry,
    tf2: &Isometry<Real>,
    solver: &S,
    request: &CollisionRequest,
    result: &mut CollisionResult,
) -> Result<usize, CollisionError> {
    if request.is_satisfied(result) {
        return Ok(result.num_contacts());
    }

    let model1 = BV::model_of(g1).expect("dispatch cell does not match the mesh variant");
    let model2 = BV::model_of(g2).expect("dispatch cell does not match the mesh variant");
    ensure_triangle_model(model1)?;
    ensure_triangle_model(model2)?;

    let base = MeshMeshBase {
        g1,
        model1,
        tf1,
        g2,
        model2,
        tf2,
        solver,
        request,
        result,
    };
    let mut node = crate::query::traversal::MeshCollisionNodeOriented::new(base);
    traversal::collide(&mut node);

    Ok(result.num_contacts())
}

#[cfg(feature = "octree")]
fn octree_shape_collide<S: NarrowPhaseSolver, const SWAPPED: bool>(
    o1: &CollisionGeometry,
    tf1: &Isometry<Real>,
    o2: &CollisionGeometry,
    tf2: &Isometry<Real>,
    solver: &S,
    request: &CollisionRequest,
    result: &mut CollisionResult,
) -> Result<usize, CollisionError> {
    if request.is_satisfied(result) {
        return Ok(result.num_contacts());
    }

    let (tree_g, tree_tf, shape_g, shape_tf) = if SWAPPED {
        (o2, tf2, o1, tf1)
    } else {
        (o1, tf1, o2, tf2)
    };

    let tree = tree_g
        .as_octree()
        .expect("dispatch cell does not match the octree variant");
    let shape = shape_g
        .as_shape()
        .expect("dispatch cell does not match the shape variant");

    let guess = if SWAPPED {
        let mut node = ShapeOcTreeCollisionNode {
            shape_g,
            shape,
            tf1: shape_tf,
            tree_g,
            tree,
            tf2: tree_tf,
            otsolver: OcTreeSolver::new(solver),
            request,
            result,
            guess: initial_guess(request),
        };
        traversal::collide(&mut node);
        node.guess
    } else {
        let mut node = OcTreeShapeCollisionNode {
            tree_g,
            tree,
            tf1: tree_tf,
            shape_g,
            shape,
            tf2: shape_tf,
            otsolver: OcTreeSolver::new(solver),
            request,
            result,
            guess: initial_guess(request),
        };
        traversal::collide(&mut node);
        node.guess
    };

    store_guess(request, result, guess);
    Ok(result.num_contacts())
}

#[cfg(feature = "octree")]
fn octree_mesh_collide<S: NarrowPhaseSolver, BV: MeshBv, const SWAPPED: bool>(
    o1: &CollisionGeometry,
    tf1: &Isometry<Real>,
    o2: &CollisionGeometry,
    tf2: &Isometry<Real>,
    solver: &S,
    request: &CollisionRequest,
    result: &mut CollisionResult,
) -> Result<usize, CollisionError> {
    if request.is_satisfied(result) {
        return Ok(result.num_contacts());
    }

    let (tree_g, tree_tf, mesh_g, mesh_tf) = if SWAPPED {
        (o2, tf2, o1, tf1)
    } else {
        (o1, tf1, o2, tf2)
    };

    let tree = tree_g
        .as_octree()
        .expect("dispatch cell does not match the octree variant");
    let model = BV::model_of(mesh_g).expect("dispatch cell does not match the mesh variant");
    ensure_triangle_model(model)?;

    let run = |request: &CollisionRequest, result: &mut CollisionResult| {
        if SWAPPED {
            let mut node = MeshOcTreeCollisionNode {
                mesh_g,
                model,
                tf1: mesh_tf,
                tree_g,
                tree,
                tf2: tree_tf,
                otsolver: OcTreeSolver::new(solver),
                request,
                result,
                guess: initial_guess(request),
            };
            traversal::collide(&mut node);
            node.guess
        } else {
            let mut node = OcTreeMeshCollisionNode {
                tree_g,
                tree,
                tf1: tree_tf,
                mesh_g,
                model,
                tf2: mesh_tf,
                otsolver: OcTreeSolver::new(solver),
                request,
                result,
                guess: initial_guess(request),
            };
            traversal::collide(&mut node);
            node.guess
        }
    };

    match CostMode::of(request) {
        CostMode::Off | CostMode::Exact => {
            let guess = run(request, result);
            store_guess(request, result, guess);
        }
        CostMode::Approximate => {
            let mut no_cost_request = request.clone();
            no_cost_request.enable_cost = false;
            let guess = run(&no_cost_request, result);
            store_guess(request, result, guess);

            let (bv_iso, cuboid) = model.root_bv().to_cuboid();
            let (box_g, box_tf) = cost_approximation_box(mesh_g, bv_iso, cuboid, mesh_tf);

            let only_cost = only_cost_request(request, result);
            let _ = if SWAPPED {
                octree_shape_collide::<S, true>(
                    &box_g, &box_tf, tree_g, tree_tf, solver, &only_cost, result,
                )?
            } else {
                octree_shape_collide::<S, false>(
                    tree_g, tree_tf, &box_g, &box_tf, solver, &only_cost, result,
                )?
            };
        }
    }

    Ok(result.num_contacts())
}

#[cfg(feature = "octree")]
fn octree_octree_collide<S: NarrowPhaseSolver>(
    g1: &CollisionGeometry,
    tf1: &Isometry<Real>,
    g2: &CollisionGeometry,
    tf2: &Isometry<Real>,
    solver: &S,
    request: &CollisionRequest,
    result: &mut CollisionResult,
) -> Result<usize, CollisionError> {
    if request.is_satisfied(result) {
        return Ok(result.num_contacts());
    }

    let tree1 = g1
        .as_octree()
        .expect("dispatch cell does not match the octree variant");
    let tree2 = g2
        .as_octree()
        .expect("dispatch cell does not match the octree variant");

    let mut node = OcTreeCollisionNode {
        g1,
        tree1,
        tf1,
        g2,
        tree2,
        tf2,
        otsolver: OcTreeSolver::new(solver),
        request,
        result,
        guess: initial_guess(request),
    };
    traversal::collide(&mut node);
    let guess = node.guess;

    store_guess(request, result, guess);
    Ok(result.num_contacts())
}
