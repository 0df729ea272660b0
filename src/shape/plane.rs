use crate::math::{Real, UnitVector, Vector};
use na::Unit;

/// An infinite plane `{ x | normal · x = offset }`.
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
#[derive(PartialEq, Debug, Copy, Clone)]
#[repr(C)]
pub struct Plane {
    /// The plane's normal.
    pub normal: UnitVector<Real>,
    /// The signed distance of the plane from the origin along its normal.
    pub offset: Real,
}

impl Plane {
    /// Builds a new plane from its normal and offset.
    #[inline]
    pub fn new(normal: UnitVector<Real>, offset: Real) -> Plane {
        Plane { normal, offset }
    }

    /// Builds a new plane from an unnormalized normal and offset.
    #[inline]
    pub fn from_vector(normal: Vector<Real>, offset: Real) -> Plane {
        Plane {
            normal: Unit::new_normalize(normal),
            offset,
        }
    }
}
