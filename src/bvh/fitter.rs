//! Fitting of bounding volumes to primitive subsets.

use crate::bounding_volume::{
    Aabb, BoundingVolume, Kdop, Kios, KiosSphere, Obb, ObbRss, Rss,
};
use crate::bvh::ModelType;
use crate::math::{Matrix, Point, Real, Vector};
use arrayvec::ArrayVec;

/// Trait of bounding volumes that can be fitted to a point set.
pub trait FitBv: BoundingVolume {
    /// Fits a volume of this type to the given points.
    ///
    /// This is a pure function of its input; the same points always produce
    /// the same volume.
    fn fit_points(pts: &[Point<Real>]) -> Self;
}

/// Principal axes of a point set, from the eigenvectors of its covariance
/// matrix, ordered by decreasing eigenvalue and made right-handed.
fn principal_axes(pts: &[Point<Real>]) -> Matrix<Real> {
    let normalizer: Real = 1.0 / (pts.len() as Real);

    let mut mean = Vector::zeros();
    for pt in pts {
        mean += pt.coords * normalizer;
    }

    let mut cov: Matrix<Real> = Matrix::zeros();
    for pt in pts {
        let centered = pt.coords - mean;
        cov += centered * centered.transpose();
    }
    cov *= normalizer;

    let eig = cov.symmetric_eigen();

    let mut order = [0usize, 1, 2];
    order.sort_by(|&a, &b| {
        eig.eigenvalues[b]
            .partial_cmp(&eig.eigenvalues[a])
            .unwrap_or(core::cmp::Ordering::Equal)
    });

    let mut axes = Matrix::zeros();
    for (i, &src) in order.iter().enumerate() {
        axes.set_column(i, &eig.eigenvectors.column(src).into_owned());
    }

    if axes.determinant() < 0.0 {
        let flipped = -axes.column(2).into_owned();
        axes.set_column(2, &flipped);
    }

    axes
}

impl FitBv for Aabb {
    fn fit_points(pts: &[Point<Real>]) -> Self {
        Aabb::from_points(pts)
    }
}

impl FitBv for Obb {
    fn fit_points(pts: &[Point<Real>]) -> Self {
        Obb::from_axes_and_points(principal_axes(pts), pts)
    }
}

impl FitBv for Rss {
    fn fit_points(pts: &[Point<Real>]) -> Self {
        Rss::from_axes_and_points(principal_axes(pts), pts)
    }
}

impl FitBv for ObbRss {
    fn fit_points(pts: &[Point<Real>]) -> Self {
        let axes = principal_axes(pts);
        ObbRss {
            obb: Obb::from_axes_and_points(axes, pts),
            rss: Rss::from_axes_and_points(axes, pts),
        }
    }
}

impl FitBv for Kios {
    fn fit_points(pts: &[Point<Real>]) -> Self {
        fit_kios(Obb::from_axes_and_points(principal_axes(pts), pts), pts)
    }
}

impl<const N: usize> FitBv for Kdop<N> {
    fn fit_points(pts: &[Point<Real>]) -> Self {
        let mut dop = Kdop::new_invalid();
        for pt in pts {
            dop.take_point(*pt);
        }
        dop
    }
}

/// Builds the sphere set of a [`Kios`] around a fitted box.
///
/// One sphere is centered on the box; four more are shifted along the two
/// major axes. Every sphere individually encloses all the points, so the
/// intersection of the set does too.
pub fn fit_kios(obb: Obb, pts: &[Point<Real>]) -> Kios {
    let radius_about = |center: Point<Real>| -> Real {
        let mut max_sq: Real = 0.0;
        for pt in pts {
            max_sq = max_sq.max(na::distance_squared(&center, pt));
        }
        max_sq.sqrt()
    };

    let c0 = obb.center;
    let r0 = radius_about(c0);

    let mut spheres: ArrayVec<KiosSphere, 5> = ArrayVec::new();
    spheres.push(KiosSphere {
        center: c0,
        radius: r0,
    });

    let shift = r0 * 0.5;
    for axis in 0..2 {
        let dir = obb.axes.column(axis).into_owned() * shift;
        for sign in [1.0 as Real, -1.0] {
            let center = c0 + dir * sign;
            spheres.push(KiosSphere {
                center,
                radius: radius_about(center),
            });
        }
    }

    Kios { spheres, obb }
}

/// Fits bounding volumes to subsets of a model's primitives.
///
/// The fitter borrows the model's vertex and index data once; each call to
/// [`Self::fit`] then computes the volume of the referenced primitives.
/// When previous-frame positions are present, the fitted volume encloses
/// the union of the current and previous positions.
pub struct BvFitter<'a> {
    vertices: &'a [Point<Real>],
    prev_vertices: Option<&'a [Point<Real>]>,
    tri_indices: Option<&'a [[u32; 3]]>,
    model_type: ModelType,
}

impl<'a> BvFitter<'a> {
    /// Prepares a fitter over the given primitive data.
    pub fn new(
        vertices: &'a [Point<Real>],
        prev_vertices: Option<&'a [Point<Real>]>,
        tri_indices: Option<&'a [[u32; 3]]>,
        model_type: ModelType,
    ) -> Self {
        BvFitter {
            vertices,
            prev_vertices,
            tri_indices,
            model_type,
        }
    }

    /// Computes a bounding volume enclosing the primitives listed in
    /// `primitive_indices`.
    pub fn fit<BV: FitBv>(&self, primitive_indices: &[u32]) -> BV {
        let mut pts = Vec::new();

        match self.model_type {
            ModelType::Triangles => {
                let tris = self.tri_indices.expect("triangle model without indices");
                for &prim in primitive_indices {
                    for &vid in &tris[prim as usize] {
                        pts.push(self.vertices[vid as usize]);
                        if let Some(prev) = self.prev_vertices {
                            pts.push(prev[vid as usize]);
                        }
                    }
                }
            }
            ModelType::PointCloud => {
                for &prim in primitive_indices {
                    pts.push(self.vertices[prim as usize]);
                    if let Some(prev) = self.prev_vertices {
                        pts.push(prev[prim as usize]);
                    }
                }
            }
        }

        BV::fit_points(&pts)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::math::Vector;

    fn sample_points() -> Vec<Point<Real>> {
        vec![
            Point::new(0.0, 0.0, 0.0),
            Point::new(1.0, 0.2, -0.3),
            Point::new(2.0, 0.4, 0.1),
            Point::new(3.0, 0.1, 0.4),
            Point::new(-1.0, -0.2, 0.2),
        ]
    }

    #[test]
    fn fitted_volumes_contain_their_points() {
        let pts = sample_points();

        let aabb = Aabb::fit_points(&pts);
        let obb = Obb::fit_points(&pts);
        let rss = Rss::fit_points(&pts);
        let kios = Kios::fit_points(&pts);
        let dop = Kdop::<18>::fit_points(&pts);

        for pt in &pts {
            assert!(aabb.contains_point(pt));
            assert!(obb.contains_point(pt));
            assert!(rss.contains_point(pt));
            assert!(kios.contains_point(pt));
            assert!(dop.contains_point(pt));
        }
    }

    #[test]
    fn principal_axes_are_orthonormal() {
        let pts = sample_points();
        let axes = principal_axes(&pts);
        let identity = axes.transpose() * axes;

        assert!(relative_eq!(identity, Matrix::identity(), epsilon = 1.0e-4));
        assert!(axes.determinant() > 0.0);
    }

    #[test]
    fn deformable_fit_covers_both_frames() {
        let vertices = sample_points();
        let prev: Vec<_> = vertices
            .iter()
            .map(|p| p + Vector::new(0.0, 1.0, 0.0))
            .collect();
        let tris: Vec<[u32; 3]> = vec![[0, 1, 2], [2, 3, 4]];

        let fitter = BvFitter::new(&vertices, Some(&prev), Some(&tris), ModelType::Triangles);
        let aabb: Aabb = fitter.fit(&[0, 1]);

        for tri in &tris {
            for &vid in tri {
                assert!(aabb.contains_point(&vertices[vid as usize]));
                assert!(aabb.contains_point(&prev[vid as usize]));
            }
        }
    }
}
