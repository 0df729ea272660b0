use collide3d::bounding_volume::{Obb, Rss};
use collide3d::bvh::BvhModel;
use collide3d::math::Real;
use collide3d::query::{collide, CollisionError, CollisionMatrix, CollisionRequest, DefaultNarrowPhase};
use collide3d::shape::{CollisionGeometry, NodeKind};
use na::{Isometry3, Point3};

fn triangle_mesh_data() -> (Vec<Point3<Real>>, Vec<[u32; 3]>) {
    (
        vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ],
        vec![[0, 1, 2]],
    )
}

#[test]
fn mixed_bv_mesh_pair_is_unsupported() {
    let (vertices, indices) = triangle_mesh_data();
    let obb_mesh =
        CollisionGeometry::from(BvhModel::<Obb>::from_triangles(vertices.clone(), indices.clone()).unwrap());
    let rss_mesh =
        CollisionGeometry::from(BvhModel::<Rss>::from_triangles(vertices, indices).unwrap());
    let tf = Isometry3::identity();

    let err = collide(&obb_mesh, &tf, &rss_mesh, &tf, &CollisionRequest::default()).unwrap_err();
    assert_eq!(
        err,
        CollisionError::Unsupported {
            kind1: NodeKind::MeshObb,
            kind2: NodeKind::MeshRss,
        }
    );
}

#[test]
fn matrix_reports_populated_and_empty_cells() {
    let matrix: CollisionMatrix<DefaultNarrowPhase> = CollisionMatrix::new();

    assert!(matrix.has_entry(NodeKind::Ball, NodeKind::Cuboid));
    assert!(matrix.has_entry(NodeKind::MeshObb, NodeKind::Ball));
    assert!(matrix.has_entry(NodeKind::Ball, NodeKind::MeshObb));
    assert!(matrix.has_entry(NodeKind::MeshObb, NodeKind::MeshObb));

    // Mixed-BV mesh pairs have no specialised traversal.
    assert!(!matrix.has_entry(NodeKind::MeshObb, NodeKind::MeshRss));
    assert!(!matrix.has_entry(NodeKind::MeshAabb, NodeKind::MeshKdop16));

    #[cfg(feature = "octree")]
    {
        assert!(matrix.has_entry(NodeKind::OcTree, NodeKind::Ball));
        assert!(matrix.has_entry(NodeKind::OcTree, NodeKind::OcTree));
        assert!(matrix.has_entry(NodeKind::MeshAabb, NodeKind::OcTree));
    }

    #[cfg(not(feature = "octree"))]
    {
        assert!(!matrix.has_entry(NodeKind::OcTree, NodeKind::Ball));
        assert!(!matrix.has_entry(NodeKind::OcTree, NodeKind::OcTree));
    }
}

#[test]
fn point_cloud_models_are_rejected() {
    use collide3d::bounding_volume::Aabb;
    use collide3d::shape::{Ball, Shape};

    let cloud: BvhModel<Aabb> = BvhModel::from_points(vec![
        Point3::new(0.0, 0.0, 0.0),
        Point3::new(1.0, 0.0, 0.0),
        Point3::new(0.0, 1.0, 0.0),
    ])
    .unwrap();
    let cloud_g = CollisionGeometry::from(cloud);
    let ball = CollisionGeometry::from(Shape::Ball(Ball::new(1.0)));
    let tf = Isometry3::identity();

    let err = collide(&cloud_g, &tf, &ball, &tf, &CollisionRequest::default()).unwrap_err();
    assert!(matches!(err, CollisionError::InvalidGeometry { .. }));
}
