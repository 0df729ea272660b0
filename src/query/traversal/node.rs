use crate::math::Real;

/// The protocol every pairwise traversal node implements.
///
/// A traversal node is a short-lived visitor owning references to the two
/// operands, their transforms, the narrow-phase solver and the
/// request/result of one `collide` call. The driver never inspects the
/// operands directly; all pruning, descent and leaf work goes through
/// these operations.
pub trait CollisionTraversalNode {
    /// Returns `true` when the bounding volumes at node indices `(i, j)`
    /// are disjoint, so the subtrees below them can be pruned.
    ///
    /// This must be conservative with respect to the transformed volumes:
    /// a pair whose descendants could intersect is never reported
    /// disjoint.
    fn bv_disjoint(&self, i: usize, j: usize) -> bool;

    /// Is node `i` of the first operand a leaf?
    fn is_leaf1(&self, i: usize) -> bool;

    /// Is node `j` of the second operand a leaf?
    fn is_leaf2(&self, j: usize) -> bool;

    /// Chooses which operand to descend at `(i, j)`; `true` descends the
    /// first.
    fn first_over_second(&self, i: usize, j: usize) -> bool;

    /// The children of internal node `i` of the first operand.
    fn children1(&self, i: usize) -> (usize, usize);

    /// The children of internal node `j` of the second operand.
    fn children2(&self, j: usize) -> (usize, usize);

    /// Runs the narrow phase on the leaf pair `(i, j)`.
    fn leaf_test(&mut self, i: usize, j: usize);

    /// Whether the traversal may terminate early; consulted between
    /// subtree visits.
    fn can_stop(&self) -> bool;
}

/// Chooses the side to descend: a leaf is never descended, and between two
/// internal nodes the larger volume goes first.
#[inline]
pub(crate) fn descend_first(leaf1: bool, leaf2: bool, size1: Real, size2: Real) -> bool {
    leaf2 || (!leaf1 && size1 > size2)
}

/// Runs the recursive simultaneous descent over the two hierarchies of a
/// traversal node, starting at the roots.
///
/// Contacts are appended in the order the leaf tests produce them;
/// same-depth siblings are always visited left before right, so a given
/// input always produces the same result.
pub fn collide<N: CollisionTraversalNode + ?Sized>(node: &mut N) {
    collide_recurse(node, 0, 0);
}

fn collide_recurse<N: CollisionTraversalNode + ?Sized>(node: &mut N, i: usize, j: usize) {
    if node.bv_disjoint(i, j) {
        return;
    }

    if node.is_leaf1(i) && node.is_leaf2(j) {
        node.leaf_test(i, j);
        return;
    }

    if node.can_stop() {
        return;
    }

    if node.first_over_second(i, j) {
        let (left, right) = node.children1(i);
        collide_recurse(node, left, j);
        collide_recurse(node, right, j);
    } else {
        let (left, right) = node.children2(j);
        collide_recurse(node, i, left);
        collide_recurse(node, i, right);
    }
}
