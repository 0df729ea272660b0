use crate::math::{Real, Vector};
use crate::query::CollisionResult;

/// Configuration of a collision query.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct CollisionRequest {
    /// The traversal stops once this many contacts were found.
    pub num_max_contacts: usize,
    /// Whether contact positions, normals and penetration depths are
    /// computed; otherwise only the number of contacts is meaningful.
    pub enable_contact: bool,
    /// At most this many cost sources are kept, largest total cost first.
    pub num_max_cost_sources: usize,
    /// Whether cost sources are computed.
    pub enable_cost: bool,
    /// Whether mesh and octree cost contributions are approximated by a
    /// single box built from the operand's root bounding volume.
    pub use_approximate_cost: bool,
    /// Whether the narrow phase is warm-started with `cached_gjk_guess`.
    pub enable_cached_gjk_guess: bool,
    /// The warm-start direction handed to the narrow phase. The updated
    /// guess is returned through [`CollisionResult::cached_gjk_guess`].
    pub cached_gjk_guess: Vector<Real>,
}

impl Default for CollisionRequest {
    fn default() -> Self {
        CollisionRequest {
            num_max_contacts: 1,
            enable_contact: false,
            num_max_cost_sources: 1,
            enable_cost: false,
            use_approximate_cost: true,
            enable_cached_gjk_guess: false,
            cached_gjk_guess: Vector::x(),
        }
    }
}

impl CollisionRequest {
    /// Checks whether `result` already contains everything this request
    /// asked for, so any remaining traversal can terminate early.
    pub fn is_satisfied(&self, result: &CollisionResult) -> bool {
        !self.enable_cost
            && result.is_collision()
            && self.num_max_contacts <= result.num_contacts()
    }
}
