use approx::relative_eq;
use collide3d::bounding_volume::Aabb;
use collide3d::bvh::BvhModel;
use collide3d::math::Real;
use collide3d::query::{collide, CollisionRequest};
use collide3d::shape::{Ball, CollisionGeometry, Shape};
use na::{Isometry3, Point3};

/// A small cube mesh with half-extents 0.2, fully inside the unit ball.
fn small_cube_mesh() -> CollisionGeometry {
    let s = 0.2 as Real;
    let vertices = vec![
        Point3::new(-s, -s, -s),
        Point3::new(s, -s, -s),
        Point3::new(s, s, -s),
        Point3::new(-s, s, -s),
        Point3::new(-s, -s, s),
        Point3::new(s, -s, s),
        Point3::new(s, s, s),
        Point3::new(-s, s, s),
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
    CollisionGeometry::from(BvhModel::<Aabb>::from_triangles(vertices, indices).unwrap())
        .with_cost_density(2.0)
}

#[test]
fn approximate_cost_reports_the_root_bv_box() {
    let mesh = small_cube_mesh();
    let ball = CollisionGeometry::from(Shape::Ball(Ball::new(1.0)));
    let tf = Isometry3::identity();

    let request = CollisionRequest {
        enable_contact: true,
        num_max_contacts: 4,
        enable_cost: true,
        use_approximate_cost: true,
        num_max_cost_sources: 1,
        ..Default::default()
    };

    let result = collide(&mesh, &tf, &ball, &tf, &request).unwrap();

    assert_eq!(result.cost_sources().len(), 1);
    let cost = &result.cost_sources()[0];

    // The cost region is the world-space box of the mesh's root volume,
    // with the mesh's cost density.
    let root_aabb = mesh.world_aabb(&tf);
    assert!(relative_eq!(cost.aabb.mins, root_aabb.mins, epsilon = 1.0e-4));
    assert!(relative_eq!(cost.aabb.maxs, root_aabb.maxs, epsilon = 1.0e-4));
    assert!(relative_eq!(cost.cost_density, 2.0, epsilon = 1.0e-6));
    assert!(relative_eq!(
        cost.total_cost,
        2.0 * root_aabb.volume(),
        epsilon = 1.0e-4
    ));
}

#[test]
fn exact_cost_accumulates_triangle_overlaps() {
    let mesh = small_cube_mesh();
    let ball = CollisionGeometry::from(Shape::Ball(Ball::new(1.0)));
    let tf = Isometry3::identity();

    let request = CollisionRequest {
        enable_cost: true,
        use_approximate_cost: false,
        num_max_cost_sources: 4,
        ..Default::default()
    };

    let result = collide(&mesh, &tf, &ball, &tf, &request).unwrap();
    assert!(!result.cost_sources().is_empty());
    assert!(result.cost_sources().len() <= 4);
}

#[test]
fn cost_disabled_produces_no_cost_sources() {
    let mesh = small_cube_mesh();
    let ball = CollisionGeometry::from(Shape::Ball(Ball::new(1.0)));
    let tf = Isometry3::identity();

    let result = collide(&mesh, &tf, &ball, &tf, &CollisionRequest::default()).unwrap();
    assert!(result.cost_sources().is_empty());
}
