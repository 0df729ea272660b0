//! Bounding-volume hierarchies over triangle meshes and point clouds.

pub use self::bvh_model::{BvhModel, BvhNode, ModelType};
pub use self::fitter::{fit_kios, BvFitter, FitBv};

mod bvh_model;
mod fitter;
