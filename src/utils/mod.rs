//! Various unsorted geometrical and logical operators.

pub use self::isometry_ops::IsometryOps;

mod isometry_ops;
