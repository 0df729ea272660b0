/*!
collide3d
=========

**collide3d** is a 3-dimensional collision detection library written with
the rust programming language.

It reports intersections (and optionally contact points, penetration depths
and cost sources) between convex shapes, triangle meshes organised under
bounding-volume hierarchies, and sparse occupancy octrees.

*/

#![deny(non_camel_case_types)]
#![deny(unused_parens)]
#![deny(non_upper_case_globals)]
#![warn(missing_docs)]
#![warn(unused_imports)]
#![allow(missing_copy_implementations)]
#![allow(clippy::too_many_arguments)] // Dispatch entry points mirror the matrix cell signature.
#![allow(clippy::type_complexity)]

#[cfg(all(feature = "f32", feature = "f64"))]
std::compile_error!("The `f32` and `f64` features cannot be enabled at the same time.");
#[cfg(not(any(feature = "f32", feature = "f64")))]
std::compile_error!("Exactly one of the `f32` and `f64` features must be enabled.");

#[cfg(feature = "serde-serialize")]
#[macro_use]
extern crate serde;
#[cfg_attr(test, macro_use)]
extern crate approx;

pub extern crate na;

pub mod bounding_volume;
pub mod bvh;
#[cfg(feature = "octree")]
pub mod octree;
pub mod query;
pub mod shape;
pub mod utils;

mod real {
    /// The scalar type used throughout this crate.
    #[cfg(feature = "f64")]
    pub use f64 as Real;

    /// The scalar type used throughout this crate.
    #[cfg(feature = "f32")]
    pub use f32 as Real;
}

/// Aliases for the mathematical types used throughout this crate.
pub mod math {
    pub use super::real::*;
    use na::UnitQuaternion;
    pub use na::{Isometry3, Matrix3, Point3, Translation3, UnitVector3, Vector3};

    /// The default tolerance used for geometric operations.
    pub const DEFAULT_EPSILON: Real = Real::EPSILON;

    /// The dimension of the space.
    pub const DIM: usize = 3;

    /// The point type.
    pub use Point3 as Point;

    /// The vector type.
    pub use Vector3 as Vector;

    /// The unit vector type.
    pub use UnitVector3 as UnitVector;

    /// The matrix type.
    pub use Matrix3 as Matrix;

    /// The transformation type.
    pub use Isometry3 as Isometry;

    /// The rotation type.
    pub type Rotation<N> = UnitQuaternion<N>;

    /// The translation type.
    pub use Translation3 as Translation;
}
