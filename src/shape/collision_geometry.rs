use crate::bounding_volume::{Aabb, BoundingVolume, Kdop16, Kdop18, Kdop24, Kios, Obb, ObbRss, Rss};
use crate::bvh::BvhModel;
use crate::math::{Isometry, Real};
#[cfg(feature = "octree")]
use crate::octree::OcTree;
use crate::shape::Shape;

/// Tag identifying what a [`CollisionGeometry`] is.
///
/// The `Mesh*` variants denote triangle-mesh models organised under the
/// corresponding bounding-volume type.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub enum NodeKind {
    /// A cuboid shape.
    Cuboid = 0,
    /// A ball shape.
    Ball,
    /// An ellipsoid shape.
    Ellipsoid,
    /// A capsule shape.
    Capsule,
    /// A cone shape.
    Cone,
    /// A cylinder shape.
    Cylinder,
    /// A convex hull shape.
    Convex,
    /// An infinite plane.
    Plane,
    /// An infinite half-space.
    HalfSpace,
    /// A sparse occupancy octree.
    OcTree,
    /// A triangle mesh under an AABB hierarchy.
    MeshAabb,
    /// A triangle mesh under an OBB hierarchy.
    MeshObb,
    /// A triangle mesh under an RSS hierarchy.
    MeshRss,
    /// A triangle mesh under a 16-DOP hierarchy.
    MeshKdop16,
    /// A triangle mesh under an 18-DOP hierarchy.
    MeshKdop18,
    /// A triangle mesh under a 24-DOP hierarchy.
    MeshKdop24,
    /// A triangle mesh under a kIOS hierarchy.
    MeshKios,
    /// A triangle mesh under an OBBRSS hierarchy.
    MeshObbRss,
}

impl NodeKind {
    /// The number of node kinds; also the dimension of the dispatch matrix.
    pub const COUNT: usize = 18;

    /// All kinds denoting convex collision primitives.
    pub const SHAPES: [NodeKind; 9] = [
        NodeKind::Cuboid,
        NodeKind::Ball,
        NodeKind::Ellipsoid,
        NodeKind::Capsule,
        NodeKind::Cone,
        NodeKind::Cylinder,
        NodeKind::Convex,
        NodeKind::Plane,
        NodeKind::HalfSpace,
    ];

    /// Does this kind denote a convex collision primitive?
    #[inline]
    pub fn is_shape(self) -> bool {
        (self as usize) < 9
    }

    /// Does this kind denote a triangle-mesh model?
    #[inline]
    pub fn is_mesh(self) -> bool {
        (self as usize) >= NodeKind::MeshAabb as usize
    }
}

/// The concrete data of a [`CollisionGeometry`].
#[derive(Clone, Debug)]
pub enum GeometryData {
    /// A convex collision primitive.
    Shape(Shape),
    /// A sparse occupancy octree.
    #[cfg(feature = "octree")]
    OcTree(OcTree),
    /// A triangle mesh under an AABB hierarchy.
    MeshAabb(BvhModel<Aabb>),
    /// A triangle mesh under an OBB hierarchy.
    MeshObb(BvhModel<Obb>),
    /// A triangle mesh under an RSS hierarchy.
    MeshRss(BvhModel<Rss>),
    /// A triangle mesh under a 16-DOP hierarchy.
    MeshKdop16(BvhModel<Kdop16>),
    /// A triangle mesh under an 18-DOP hierarchy.
    MeshKdop18(BvhModel<Kdop18>),
    /// A triangle mesh under a 24-DOP hierarchy.
    MeshKdop24(BvhModel<Kdop24>),
    /// A triangle mesh under a kIOS hierarchy.
    MeshKios(BvhModel<Kios>),
    /// A triangle mesh under an OBBRSS hierarchy.
    MeshObbRss(BvhModel<ObbRss>),
}

impl GeometryData {
    fn kind(&self) -> NodeKind {
        match self {
            GeometryData::Shape(s) => s.kind(),
            #[cfg(feature = "octree")]
            GeometryData::OcTree(_) => NodeKind::OcTree,
            GeometryData::MeshAabb(_) => NodeKind::MeshAabb,
            GeometryData::MeshObb(_) => NodeKind::MeshObb,
            GeometryData::MeshRss(_) => NodeKind::MeshRss,
            GeometryData::MeshKdop16(_) => NodeKind::MeshKdop16,
            GeometryData::MeshKdop18(_) => NodeKind::MeshKdop18,
            GeometryData::MeshKdop24(_) => NodeKind::MeshKdop24,
            GeometryData::MeshKios(_) => NodeKind::MeshKios,
            GeometryData::MeshObbRss(_) => NodeKind::MeshObbRss,
        }
    }

    fn local_aabb(&self) -> Aabb {
        match self {
            GeometryData::Shape(s) => s.local_aabb(),
            #[cfg(feature = "octree")]
            GeometryData::OcTree(t) => *t.root_aabb(),
            GeometryData::MeshAabb(m) => m.root_bv().local_aabb(),
            GeometryData::MeshObb(m) => m.root_bv().local_aabb(),
            GeometryData::MeshRss(m) => m.root_bv().local_aabb(),
            GeometryData::MeshKdop16(m) => m.root_bv().local_aabb(),
            GeometryData::MeshKdop18(m) => m.root_bv().local_aabb(),
            GeometryData::MeshKdop24(m) => m.root_bv().local_aabb(),
            GeometryData::MeshKios(m) => m.root_bv().local_aabb(),
            GeometryData::MeshObbRss(m) => m.root_bv().local_aabb(),
        }
    }
}

/// A geometry usable as a collision operand, tagged by a [`NodeKind`].
///
/// On top of the geometric data, this carries the three scalars used for
/// cost and occupancy semantics, and caches the geometry's bounding box in
/// its local frame. The cached box always reflects the current data since
/// the geometry can only be replaced wholesale through [`Self::new`].
#[derive(Clone, Debug)]
pub struct CollisionGeometry {
    data: GeometryData,
    local_aabb: Aabb,
    /// The cost density of the space occupied by this geometry.
    pub cost_density: Real,
    /// Occupancy values at or above this threshold are considered solid.
    pub threshold_occupied: Real,
    /// Occupancy values at or below this threshold are considered empty.
    pub threshold_free: Real,
}

impl CollisionGeometry {
    /// Wraps the given geometric data with default cost scalars.
    pub fn new(data: GeometryData) -> CollisionGeometry {
        let local_aabb = data.local_aabb();
        CollisionGeometry {
            data,
            local_aabb,
            cost_density: 1.0,
            threshold_occupied: 1.0,
            threshold_free: 0.0,
        }
    }

    /// Sets the cost density, builder style.
    pub fn with_cost_density(mut self, cost_density: Real) -> Self {
        self.cost_density = cost_density;
        self
    }

    /// The tag identifying the concrete variant of this geometry.
    #[inline]
    pub fn kind(&self) -> NodeKind {
        self.data.kind()
    }

    /// The concrete geometric data.
    #[inline]
    pub fn data(&self) -> &GeometryData {
        &self.data
    }

    /// The cached bounding box of this geometry in its local frame.
    #[inline]
    pub fn local_aabb(&self) -> &Aabb {
        &self.local_aabb
    }

    /// The bounding box of this geometry transformed by `pos`.
    #[inline]
    pub fn world_aabb(&self, pos: &Isometry<Real>) -> Aabb {
        self.local_aabb.transform_by(pos)
    }

    /// The shape variant, if this geometry is a convex primitive.
    #[inline]
    pub fn as_shape(&self) -> Option<&Shape> {
        match &self.data {
            GeometryData::Shape(s) => Some(s),
            _ => None,
        }
    }

    /// The octree variant, if this geometry is an octree.
    #[cfg(feature = "octree")]
    #[inline]
    pub fn as_octree(&self) -> Option<&OcTree> {
        match &self.data {
            GeometryData::OcTree(t) => Some(t),
            _ => None,
        }
    }
}

impl From<Shape> for CollisionGeometry {
    fn from(shape: Shape) -> Self {
        CollisionGeometry::new(GeometryData::Shape(shape))
    }
}

#[cfg(feature = "octree")]
impl From<OcTree> for CollisionGeometry {
    fn from(tree: OcTree) -> Self {
        CollisionGeometry::new(GeometryData::OcTree(tree))
    }
}

macro_rules! impl_from_mesh(
    ($($bv: ty, $variant: ident;)*) => {$(
        impl From<BvhModel<$bv>> for CollisionGeometry {
            fn from(model: BvhModel<$bv>) -> Self {
                CollisionGeometry::new(GeometryData::$variant(model))
            }
        }
    )*}
);

impl_from_mesh!(
    Aabb, MeshAabb;
    Obb, MeshObb;
    Rss, MeshRss;
    Kdop16, MeshKdop16;
    Kdop18, MeshKdop18;
    Kdop24, MeshKdop24;
    Kios, MeshKios;
    ObbRss, MeshObbRss;
);
