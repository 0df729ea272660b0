//! Half-space shape delimited by an infinite plane.

use crate::math::{Real, UnitVector, Vector};
use na::Unit;

/// A half-space `{ x | normal · x ≤ offset }`.
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
#[derive(PartialEq, Debug, Copy, Clone)]
#[repr(C)]
pub struct HalfSpace {
    /// The half-space planar boundary's outward normal.
    pub normal: UnitVector<Real>,
    /// The signed distance of the boundary from the origin along the normal.
    pub offset: Real,
}

impl HalfSpace {
    /// Builds a new half-space from its boundary normal and offset.
    #[inline]
    pub fn new(normal: UnitVector<Real>, offset: Real) -> HalfSpace {
        HalfSpace { normal, offset }
    }

    /// Builds a new half-space from an unnormalized normal and offset.
    #[inline]
    pub fn from_vector(normal: Vector<Real>, offset: Real) -> HalfSpace {
        HalfSpace {
            normal: Unit::new_normalize(normal),
            offset,
        }
    }
}
