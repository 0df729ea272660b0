//! Bounding volumes.

#[doc(inline)]
pub use self::aabb::Aabb;
#[doc(inline)]
pub use self::bounding_volume::{BoundingVolume, OrientedBv};
pub use self::kdop::{Kdop, Kdop16, Kdop18, Kdop24};
pub use self::kios::{Kios, KiosSphere};
pub use self::obb::Obb;
pub use self::obbrss::ObbRss;
pub use self::rss::Rss;

#[doc(hidden)]
pub mod aabb;
#[doc(hidden)]
pub mod bounding_volume;
mod kdop;
mod kios;
mod obb;
mod obbrss;
mod rss;
