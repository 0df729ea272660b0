//! Traversal nodes pairing two geometries, and the recursive driver
//! descending their hierarchies simultaneously.

pub use self::mesh_mesh::{MeshCollisionNode, MeshCollisionNodeOriented};
pub(crate) use self::mesh_mesh::MeshMeshBase;
pub use self::mesh_shape::{MeshShapeCollisionNode, MeshShapeCollisionNodeOriented};
pub(crate) use self::mesh_shape::MeshShapeBase;
pub use self::node::{collide, CollisionTraversalNode};
#[cfg(feature = "octree")]
pub use self::octree::{
    MeshOcTreeCollisionNode, OcTreeCollisionNode, OcTreeMeshCollisionNode,
    OcTreeShapeCollisionNode, OcTreeSolver, ShapeOcTreeCollisionNode,
};
pub use self::shape_shape::ShapeCollisionNode;

mod mesh_mesh;
mod mesh_shape;
mod node;
#[cfg(feature = "octree")]
mod octree;
mod shape_shape;

use crate::bounding_volume::Aabb;
use crate::math::{Point, Vector};
use crate::query::narrow_phase::ShapeContact;
use crate::query::{CollisionRequest, CollisionResult, Contact, CostSource};
use crate::shape::NodeKind;

/// Converts narrow-phase contacts into [`Contact`] records, honoring the
/// contact cap and the `enable_contact` flag. `swapped` reverses the
/// operand order of every record.
pub(crate) fn add_narrow_contacts(
    request: &CollisionRequest,
    result: &mut CollisionResult,
    kind1: NodeKind,
    kind2: NodeKind,
    primitive1: Option<u32>,
    primitive2: Option<u32>,
    contacts: &[ShapeContact],
    swapped: bool,
) {
    for c in contacts {
        if result.num_contacts() >= request.num_max_contacts {
            break;
        }

        let contact = if request.enable_contact {
            Contact {
                kind1,
                kind2,
                primitive1,
                primitive2,
                position: c.position,
                normal: c.normal,
                penetration_depth: c.depth,
            }
        } else {
            // Only the number of contacts is requested.
            Contact {
                kind1,
                kind2,
                primitive1,
                primitive2,
                position: Point::origin(),
                normal: Vector::zeros(),
                penetration_depth: 0.0,
            }
        };

        result.add_contact(if swapped { contact.flipped() } else { contact });
    }
}

/// Records the overlap of two world-space boxes as a cost source.
pub(crate) fn add_overlap_cost(
    request: &CollisionRequest,
    result: &mut CollisionResult,
    aabb1: &Aabb,
    aabb2: &Aabb,
    cost_density: crate::math::Real,
) {
    if let Some(overlap) = aabb1.intersection(aabb2) {
        result.add_cost_source(
            CostSource::new(overlap, cost_density),
            request.num_max_cost_sources,
        );
    }
}
