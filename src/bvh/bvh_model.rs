//! Bounding-volume hierarchy over a triangle mesh or point cloud.

use crate::bounding_volume::Aabb;
use crate::bvh::{BvFitter, FitBv};
use crate::math::{Point, Real};
use crate::query::CollisionError;
use crate::shape::Triangle;

/// The kind of primitives indexed by a [`BvhModel`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub enum ModelType {
    /// The model indexes triangles.
    Triangles,
    /// The model indexes isolated points.
    PointCloud,
}

/// One node of a [`BvhModel`].
///
/// Internal nodes store the index of their first child; the second child
/// is always at `first + 1`. Leaves store a range into the model's
/// primitive-index permutation.
#[derive(Copy, Clone, Debug)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct BvhNode<BV> {
    /// The bounding volume enclosing every primitive below this node.
    pub bv: BV,
    first: u32,
    num_primitives: u32,
    leaf: bool,
}

impl<BV> BvhNode<BV> {
    /// Is this node a leaf?
    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.leaf
    }

    /// The indices of the two children of this internal node.
    #[inline]
    pub fn children(&self) -> (usize, usize) {
        (self.first as usize, self.first as usize + 1)
    }

    /// The number of primitives below this node.
    #[inline]
    pub fn num_primitives(&self) -> usize {
        self.num_primitives as usize
    }

    /// The range of this leaf into the primitive-index permutation.
    #[inline]
    pub fn primitive_range(&self) -> core::ops::Range<usize> {
        let start = self.first as usize;
        start..start + self.num_primitives as usize
    }
}

/// A triangle mesh or point cloud organised under a bounding-volume
/// hierarchy.
///
/// The hierarchy is stored as a contiguous array of nodes with integer
/// child indices; `bvs[0]` is the root. Models are immutable once built,
/// so every invariant checked at construction holds for the model's whole
/// lifetime.
#[derive(Clone, Debug)]
pub struct BvhModel<BV> {
    vertices: Vec<Point<Real>>,
    prev_vertices: Option<Vec<Point<Real>>>,
    tri_indices: Option<Vec<[u32; 3]>>,
    model_type: ModelType,
    bvs: Vec<BvhNode<BV>>,
    primitive_indices: Vec<u32>,
}

impl<BV: FitBv> BvhModel<BV> {
    /// Builds a hierarchy over a triangle mesh.
    pub fn from_triangles(
        vertices: Vec<Point<Real>>,
        tri_indices: Vec<[u32; 3]>,
    ) -> Result<Self, CollisionError> {
        Self::build(vertices, None, Some(tri_indices), ModelType::Triangles)
    }

    /// Builds a hierarchy over a deformable triangle mesh.
    ///
    /// Every leaf volume encloses both the current and the previous
    /// position of its primitives, so a hierarchy fitted once remains valid
    /// for both frames.
    pub fn from_deformable_triangles(
        vertices: Vec<Point<Real>>,
        prev_vertices: Vec<Point<Real>>,
        tri_indices: Vec<[u32; 3]>,
    ) -> Result<Self, CollisionError> {
        Self::build(
            vertices,
            Some(prev_vertices),
            Some(tri_indices),
            ModelType::Triangles,
        )
    }

    /// Builds a hierarchy over a point cloud.
    pub fn from_points(vertices: Vec<Point<Real>>) -> Result<Self, CollisionError> {
        Self::build(vertices, None, None, ModelType::PointCloud)
    }

    fn build(
        vertices: Vec<Point<Real>>,
        prev_vertices: Option<Vec<Point<Real>>>,
        tri_indices: Option<Vec<[u32; 3]>>,
        model_type: ModelType,
    ) -> Result<Self, CollisionError> {
        if vertices.is_empty() {
            return Err(CollisionError::InvalidGeometry {
                reason: "model has no vertices".to_string(),
            });
        }

        if let Some(prev) = &prev_vertices {
            if prev.len() != vertices.len() {
                return Err(CollisionError::InvalidGeometry {
                    reason: "previous-frame vertices do not match the current vertex count"
                        .to_string(),
                });
            }
        }

        let num_primitives = match (&tri_indices, model_type) {
            (Some(tris), ModelType::Triangles) => {
                if tris.is_empty() {
                    return Err(CollisionError::InvalidGeometry {
                        reason: "triangle model has no triangles".to_string(),
                    });
                }
                for tri in tris {
                    for &vid in tri {
                        if vid as usize >= vertices.len() {
                            return Err(CollisionError::InvalidGeometry {
                                reason: format!(
                                    "triangle references out-of-range vertex {}",
                                    vid
                                ),
                            });
                        }
                    }
                }
                tris.len()
            }
            (None, ModelType::PointCloud) => vertices.len(),
            _ => {
                return Err(CollisionError::InvalidGeometry {
                    reason: "model type does not match the provided indices".to_string(),
                })
            }
        };

        // Split positions: triangle centroids or the points themselves.
        let centers: Vec<Point<Real>> = match (&tri_indices, model_type) {
            (Some(tris), ModelType::Triangles) => tris
                .iter()
                .map(|idx| {
                    Triangle::new(
                        vertices[idx[0] as usize],
                        vertices[idx[1] as usize],
                        vertices[idx[2] as usize],
                    )
                    .center()
                })
                .collect(),
            _ => vertices.clone(),
        };

        let fitter = BvFitter::new(
            &vertices,
            prev_vertices.as_deref(),
            tri_indices.as_deref(),
            model_type,
        );

        let mut primitive_indices: Vec<u32> = (0..num_primitives as u32).collect();
        let mut bvs = Vec::with_capacity(2 * num_primitives - 1);

        let root_bv = fitter.fit(&primitive_indices);
        bvs.push(BvhNode {
            bv: root_bv,
            first: 0,
            num_primitives: num_primitives as u32,
            leaf: true,
        });
        subdivide(
            &fitter,
            &centers,
            &mut primitive_indices,
            &mut bvs,
            0,
            0,
            num_primitives,
        );

        Ok(BvhModel {
            vertices,
            prev_vertices,
            tri_indices,
            model_type,
            bvs,
            primitive_indices,
        })
    }
}

impl<BV> BvhModel<BV> {
    /// The vertices of this model.
    #[inline]
    pub fn vertices(&self) -> &[Point<Real>] {
        &self.vertices
    }

    /// The previous-frame vertices of this model, if it is deformable.
    #[inline]
    pub fn prev_vertices(&self) -> Option<&[Point<Real>]> {
        self.prev_vertices.as_deref()
    }

    /// The triangle indices of this model, absent for point clouds.
    #[inline]
    pub fn tri_indices(&self) -> Option<&[[u32; 3]]> {
        self.tri_indices.as_deref()
    }

    /// The kind of primitives indexed by this model.
    #[inline]
    pub fn model_type(&self) -> ModelType {
        self.model_type
    }

    /// The number of nodes of the hierarchy.
    #[inline]
    pub fn num_nodes(&self) -> usize {
        self.bvs.len()
    }

    /// The `i`-th node of the hierarchy; node `0` is the root.
    #[inline]
    pub fn node(&self, i: usize) -> &BvhNode<BV> {
        &self.bvs[i]
    }

    /// The bounding volume of the root node.
    #[inline]
    pub fn root_bv(&self) -> &BV {
        &self.bvs[0].bv
    }

    /// The primitive ids assigned to the given leaf.
    #[inline]
    pub fn leaf_primitives(&self, node: &BvhNode<BV>) -> &[u32] {
        &self.primitive_indices[node.primitive_range()]
    }

    /// The `i`-th triangle of this model, in its local frame.
    ///
    /// Panics if the model is not a triangle model.
    #[inline]
    pub fn triangle(&self, i: usize) -> Triangle {
        let idx = &self.tri_indices.as_ref().expect("not a triangle model")[i];
        Triangle::new(
            self.vertices[idx[0] as usize],
            self.vertices[idx[1] as usize],
            self.vertices[idx[2] as usize],
        )
    }

    /// The axis-aligned bounding box of the `i`-th triangle.
    #[inline]
    pub fn triangle_aabb(&self, i: usize) -> Aabb {
        let tri = self.triangle(i);
        Aabb::from_points([&tri.a, &tri.b, &tri.c])
    }
}

/// Recursive top-down construction: splits the primitive range along the
/// longest axis of the split-position set, at its mean, falling back to a
/// median split when all positions project to one side.
fn subdivide<BV: FitBv>(
    fitter: &BvFitter<'_>,
    centers: &[Point<Real>],
    primitive_indices: &mut [u32],
    bvs: &mut Vec<BvhNode<BV>>,
    node: usize,
    start: usize,
    end: usize,
) {
    let count = end - start;
    if count == 1 {
        bvs[node].leaf = true;
        bvs[node].first = start as u32;
        return;
    }

    let mut center_aabb = Aabb::new_invalid();
    for &prim in &primitive_indices[start..end] {
        center_aabb.take_point(centers[prim as usize]);
    }

    let extents = center_aabb.extents();
    let axis = if extents.x >= extents.y && extents.x >= extents.z {
        0
    } else if extents.y >= extents.z {
        1
    } else {
        2
    };
    let threshold = center_aabb.center()[axis];

    // In-place partition of the permutation slice.
    let mut mid = start;
    for i in start..end {
        if centers[primitive_indices[i] as usize][axis] < threshold {
            primitive_indices.swap(i, mid);
            mid += 1;
        }
    }

    if mid == start || mid == end {
        mid = start + count / 2;
    }

    let left_bv = fitter.fit(&primitive_indices[start..mid]);
    let right_bv = fitter.fit(&primitive_indices[mid..end]);

    let first_child = bvs.len();
    bvs[node].leaf = false;
    bvs[node].first = first_child as u32;

    bvs.push(BvhNode {
        bv: left_bv,
        first: 0,
        num_primitives: (mid - start) as u32,
        leaf: true,
    });
    bvs.push(BvhNode {
        bv: right_bv,
        first: 0,
        num_primitives: (end - mid) as u32,
        leaf: true,
    });

    subdivide(fitter, centers, primitive_indices, bvs, first_child, start, mid);
    subdivide(
        fitter,
        centers,
        primitive_indices,
        bvs,
        first_child + 1,
        mid,
        end,
    );
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::bounding_volume::{Aabb, BoundingVolume, Obb};

    fn cube_mesh() -> (Vec<Point<Real>>, Vec<[u32; 3]>) {
        let vertices = vec![
            Point::new(-1.0, -1.0, -1.0),
            Point::new(1.0, -1.0, -1.0),
            Point::new(1.0, 1.0, -1.0),
            Point::new(-1.0, 1.0, -1.0),
            Point::new(-1.0, -1.0, 1.0),
            Point::new(1.0, -1.0, 1.0),
            Point::new(1.0, 1.0, 1.0),
            Point::new(-1.0, 1.0, 1.0),
        ];
        let indices = vec![
            [0, 1, 2],
            [0, 2, 3],
            [4, 6, 5],
            [4, 7, 6],
            [0, 4, 5],
            [0, 5, 1],
            [3, 2, 6],
            [3, 6, 7],
            [0, 3, 7],
            [0, 7, 4],
            [1, 5, 6],
            [1, 6, 2],
        ];
        (vertices, indices)
    }

    fn check_node_soundness<BV: FitBv>(model: &BvhModel<BV>, node_id: usize) {
        let node = model.node(node_id);

        if node.is_leaf() {
            for &prim in model.leaf_primitives(node) {
                let tri = model.triangle(prim as usize);
                assert!(node.bv.contains_point(&tri.a));
                assert!(node.bv.contains_point(&tri.b));
                assert!(node.bv.contains_point(&tri.c));
            }
        } else {
            let (left, right) = node.children();
            for child in [left, right] {
                for &prim in collect_primitives(model, child).iter() {
                    let tri = model.triangle(prim as usize);
                    assert!(node.bv.contains_point(&tri.a));
                    assert!(node.bv.contains_point(&tri.b));
                    assert!(node.bv.contains_point(&tri.c));
                }
                check_node_soundness(model, child);
            }
        }
    }

    fn collect_primitives<BV: FitBv>(model: &BvhModel<BV>, node_id: usize) -> Vec<u32> {
        let node = model.node(node_id);
        if node.is_leaf() {
            model.leaf_primitives(node).to_vec()
        } else {
            let (left, right) = node.children();
            let mut out = collect_primitives(model, left);
            out.extend(collect_primitives(model, right));
            out
        }
    }

    #[test]
    fn aabb_hierarchy_is_sound() {
        let (vertices, indices) = cube_mesh();
        let model: BvhModel<Aabb> = BvhModel::from_triangles(vertices, indices).unwrap();
        check_node_soundness(&model, 0);
    }

    #[test]
    fn obb_hierarchy_is_sound() {
        let (vertices, indices) = cube_mesh();
        let model: BvhModel<Obb> = BvhModel::from_triangles(vertices, indices).unwrap();
        check_node_soundness(&model, 0);
    }

    #[test]
    fn every_primitive_is_reachable() {
        let (vertices, indices) = cube_mesh();
        let num_tris = indices.len();
        let model: BvhModel<Aabb> = BvhModel::from_triangles(vertices, indices).unwrap();

        let mut prims = collect_primitives(&model, 0);
        prims.sort_unstable();
        let expected: Vec<u32> = (0..num_tris as u32).collect();
        assert_eq!(prims, expected);
    }

    #[test]
    fn out_of_range_index_is_rejected() {
        let vertices = vec![Point::new(0.0, 0.0, 0.0), Point::new(1.0, 0.0, 0.0)];
        let indices = vec![[0, 1, 7]];
        assert!(BvhModel::<Aabb>::from_triangles(vertices, indices).is_err());
    }
}
