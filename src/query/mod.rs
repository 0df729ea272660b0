//! Collision queries between pairs of geometries.
//!
//! The entry point is [`collide()`]: it looks the operand pair up in the
//! [`CollisionMatrix`], builds the specialised traversal node for the two
//! [`crate::shape::NodeKind`]s, and runs the recursive driver. Custom
//! narrow-phase backends implement [`NarrowPhaseSolver`] and go through
//! [`CollisionMatrix::collide`] directly.

pub use self::dispatch::{collide, CollisionFn, CollisionMatrix};
pub use self::error::CollisionError;
pub use self::narrow_phase::{DefaultNarrowPhase, NarrowPhaseSolver, ShapeContact};
pub use self::request::CollisionRequest;
pub use self::result::{CollisionResult, Contact, CostSource};

mod dispatch;
pub mod epa;
mod error;
pub mod gjk;
mod narrow_phase;
mod request;
mod result;
pub mod traversal;
