use crate::shape::NodeKind;

/// Errors that can be produced by a collision query.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CollisionError {
    /// The dispatch matrix has no entry for this pair of geometries.
    #[error("collision query not supported between {kind1:?} and {kind2:?}")]
    Unsupported {
        /// The kind of the first operand.
        kind1: NodeKind,
        /// The kind of the second operand.
        kind2: NodeKind,
    },
    /// One of the operands is malformed.
    #[error("invalid geometry: {reason}")]
    InvalidGeometry {
        /// What is wrong with the geometry.
        reason: String,
    },
}
