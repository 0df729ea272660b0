//! Sparse volumetric occupancy octree.

use crate::bounding_volume::Aabb;
use crate::math::Real;

/// One node of an [`OcTree`].
///
/// Every node carries an occupancy value. Internal nodes split their cell
/// into eight octants; absent children denote unknown space and are never
/// visited.
#[derive(Clone, Debug)]
pub struct OcTreeNode {
    value: Real,
    children: Option<Box<[Option<OcTreeNode>; 8]>>,
}

impl OcTreeNode {
    /// Creates a leaf carrying the given occupancy value.
    pub fn leaf(value: Real) -> OcTreeNode {
        OcTreeNode {
            value,
            children: None,
        }
    }

    /// Creates an internal node from up to eight children.
    ///
    /// The node's own occupancy is the maximum of its children's, so a
    /// solid descendant is never hidden behind a low-valued ancestor.
    pub fn internal(children: [Option<OcTreeNode>; 8]) -> OcTreeNode {
        let value = children
            .iter()
            .flatten()
            .map(|c| c.value)
            .fold(0.0 as Real, Real::max);

        OcTreeNode {
            value,
            children: Some(Box::new(children)),
        }
    }

    /// The occupancy value of this node.
    #[inline]
    pub fn value(&self) -> Real {
        self.value
    }

    /// Is this node a leaf?
    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.children.is_none()
    }

    /// The `i`-th child octant of this node, if present.
    ///
    /// Octants are numbered like [`Aabb::split_at_center`] orders its
    /// results.
    #[inline]
    pub fn child(&self, i: usize) -> Option<&OcTreeNode> {
        self.children.as_ref().and_then(|c| c[i].as_ref())
    }
}

/// A sparse occupancy octree.
///
/// Traversals treat nodes whose value reaches the owning geometry's
/// `threshold_occupied` as solid, and nodes at or below `threshold_free`
/// as empty. Child cells are derived geometrically by splitting the parent
/// cell at its center, so only the root box is stored.
#[derive(Clone, Debug)]
pub struct OcTree {
    root: OcTreeNode,
    root_aabb: Aabb,
}

impl OcTree {
    /// Creates an octree from its root cell and root node.
    pub fn new(root_aabb: Aabb, root: OcTreeNode) -> OcTree {
        OcTree { root, root_aabb }
    }

    /// The root node of this octree.
    #[inline]
    pub fn root(&self) -> &OcTreeNode {
        &self.root
    }

    /// The cell covered by the root node.
    #[inline]
    pub fn root_aabb(&self) -> &Aabb {
        &self.root_aabb
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::math::Point;

    #[test]
    fn internal_value_is_max_of_children() {
        let mut children: [Option<OcTreeNode>; 8] = Default::default();
        children[0] = Some(OcTreeNode::leaf(0.2));
        children[3] = Some(OcTreeNode::leaf(0.9));

        let root = OcTreeNode::internal(children);
        assert_eq!(root.value(), 0.9);
        assert!(root.child(3).is_some());
        assert!(root.child(1).is_none());
    }

    #[test]
    fn octant_boxes_tile_the_root_cell() {
        let aabb = Aabb::new(Point::new(0.0, 0.0, 0.0), Point::new(2.0, 2.0, 2.0));
        let octants = aabb.split_at_center();

        let total: Real = octants.iter().map(|a| a.volume()).sum();
        assert!(relative_eq!(total, aabb.volume(), epsilon = 1.0e-5));
    }
}
