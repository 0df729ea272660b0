use collide3d::bounding_volume::{Aabb, Obb};
use collide3d::bvh::BvhModel;
use collide3d::math::Real;
use collide3d::query::{collide, CollisionRequest};
use collide3d::shape::CollisionGeometry;
use na::{Isometry3, Point3};

fn cube_mesh_data() -> (Vec<Point3<Real>>, Vec<[u32; 3]>) {
    let vertices = vec![
        Point3::new(-1.0, -1.0, -1.0),
        Point3::new(1.0, -1.0, -1.0),
        Point3::new(1.0, 1.0, -1.0),
        Point3::new(-1.0, 1.0, -1.0),
        Point3::new(-1.0, -1.0, 1.0),
        Point3::new(1.0, -1.0, 1.0),
        Point3::new(1.0, 1.0, 1.0),
        Point3::new(-1.0, 1.0, 1.0),
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

fn cube_aabb_model() -> CollisionGeometry {
    let (vertices, indices) = cube_mesh_data();
    CollisionGeometry::from(BvhModel::<Aabb>::from_triangles(vertices, indices).unwrap())
}

fn cube_obb_model() -> CollisionGeometry {
    let (vertices, indices) = cube_mesh_data();
    CollisionGeometry::from(BvhModel::<Obb>::from_triangles(vertices, indices).unwrap())
}

#[test]
fn distant_meshes_are_pruned_at_the_root() {
    let g1 = cube_aabb_model();
    let g2 = cube_aabb_model();
    let tf1 = Isometry3::translation(10.0, 0.0, 0.0);
    let tf2 = Isometry3::translation(-10.0, 0.0, 0.0);

    let request = CollisionRequest {
        enable_contact: true,
        ..Default::default()
    };
    let result = collide(&g1, &tf1, &g2, &tf2, &request).unwrap();

    assert!(!result.is_collision());
    assert_eq!(result.num_contacts(), 0);
}

#[test]
fn overlapping_meshes_collide() {
    let g1 = cube_aabb_model();
    let g2 = cube_aabb_model();
    let tf1 = Isometry3::identity();
    let tf2 = Isometry3::translation(1.5, 0.0, 0.0);

    let request = CollisionRequest {
        enable_contact: true,
        num_max_contacts: 16,
        ..Default::default()
    };
    let result = collide(&g1, &tf1, &g2, &tf2, &request).unwrap();

    assert!(result.is_collision());
    for contact in result.contacts() {
        assert!(contact.primitive1.is_some());
        assert!(contact.primitive2.is_some());
    }
}

#[test]
fn oriented_hierarchies_agree_with_generic_ones() {
    let generic1 = cube_aabb_model();
    let generic2 = cube_aabb_model();
    let oriented1 = cube_obb_model();
    let oriented2 = cube_obb_model();

    let request = CollisionRequest::default();

    for dx in [0.0 as Real, 0.5, 1.5, 1.99, 2.5, 10.0] {
        let tf1 = Isometry3::identity();
        let tf2 = Isometry3::translation(dx, 0.0, 0.0);

        let generic = collide(&generic1, &tf1, &generic2, &tf2, &request).unwrap();
        let oriented = collide(&oriented1, &tf1, &oriented2, &tf2, &request).unwrap();
        assert_eq!(generic.is_collision(), oriented.is_collision(), "dx = {}", dx);
    }
}

#[test]
fn early_termination_reports_a_prefix() {
    let g1 = cube_aabb_model();
    let g2 = cube_aabb_model();
    let tf1 = Isometry3::identity();
    let tf2 = Isometry3::translation(0.5, 0.25, 0.0);

    let unbounded = CollisionRequest {
        enable_contact: true,
        num_max_contacts: 1_000,
        ..Default::default()
    };
    let all = collide(&g1, &tf1, &g2, &tf2, &unbounded).unwrap();
    assert!(all.num_contacts() > 3);

    let bounded = CollisionRequest {
        enable_contact: true,
        num_max_contacts: 3,
        ..Default::default()
    };
    let prefix = collide(&g1, &tf1, &g2, &tf2, &bounded).unwrap();

    assert_eq!(prefix.num_contacts(), 3);
    for (a, b) in prefix.contacts().iter().zip(all.contacts()) {
        assert_eq!(a, b);
    }
}

#[test]
fn mesh_vs_shape_collides() {
    use collide3d::shape::{Ball, Shape};

    let mesh = cube_aabb_model();
    let ball = CollisionGeometry::from(Shape::Ball(Ball::new(0.5)));
    let tf1 = Isometry3::identity();

    let request = CollisionRequest {
        enable_contact: true,
        ..Default::default()
    };

    // The ball pokes through the +x face of the cube.
    let touching = collide(&mesh, &tf1, &ball, &Isometry3::translation(1.2, 0.0, 0.0), &request)
        .unwrap();
    assert!(touching.is_collision());
    assert!(touching.contacts()[0].primitive1.is_some());

    let distant = collide(&mesh, &tf1, &ball, &Isometry3::translation(5.0, 0.0, 0.0), &request)
        .unwrap();
    assert!(!distant.is_collision());

    // The symmetric entry accepts the shape first.
    let swapped = collide(&ball, &Isometry3::translation(1.2, 0.0, 0.0), &mesh, &tf1, &request)
        .unwrap();
    assert!(swapped.is_collision());
    assert!(swapped.contacts()[0].primitive2.is_some());
}
