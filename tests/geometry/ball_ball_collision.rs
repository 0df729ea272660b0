use approx::relative_eq;
use collide3d::query::{collide, CollisionRequest};
use collide3d::shape::{Ball, CollisionGeometry, Shape};
use na::{Isometry3, Point3, Vector3};

fn contact_request() -> CollisionRequest {
    CollisionRequest {
        enable_contact: true,
        ..Default::default()
    }
}

#[test]
fn touching_unit_spheres() {
    let g1 = CollisionGeometry::from(Shape::Ball(Ball::new(1.0)));
    let g2 = CollisionGeometry::from(Shape::Ball(Ball::new(1.0)));
    let tf1 = Isometry3::identity();
    let tf2 = Isometry3::translation(2.0, 0.0, 0.0);

    let result = collide(&g1, &tf1, &g2, &tf2, &contact_request()).unwrap();

    assert!(result.is_collision());
    assert_eq!(result.num_contacts(), 1);

    let contact = &result.contacts()[0];
    assert!(relative_eq!(
        contact.position,
        Point3::new(1.0, 0.0, 0.0),
        epsilon = 1.0e-4
    ));
    assert!(contact.normal.x.abs() > 0.999);
    assert!(contact.normal.y.abs() < 1.0e-4);
    assert!(contact.normal.z.abs() < 1.0e-4);
    assert!(contact.penetration_depth.abs() < 1.0e-4);
}

#[test]
fn separated_spheres_do_not_collide() {
    let g1 = CollisionGeometry::from(Shape::Ball(Ball::new(1.0)));
    let g2 = CollisionGeometry::from(Shape::Ball(Ball::new(1.0)));
    let tf1 = Isometry3::identity();
    let tf2 = Isometry3::translation(2.1, 0.0, 0.0);

    let result = collide(&g1, &tf1, &g2, &tf2, &contact_request()).unwrap();
    assert!(!result.is_collision());
}

#[test]
fn intersection_bit_is_symmetric() {
    let g1 = CollisionGeometry::from(Shape::Ball(Ball::new(1.0)));
    let g2 = CollisionGeometry::from(Shape::Ball(Ball::new(0.5)));
    let tf1 = Isometry3::translation(0.2, -0.1, 0.4);
    let tf2 = Isometry3::translation(1.0, 0.3, 0.1);

    let r12 = collide(&g1, &tf1, &g2, &tf2, &contact_request()).unwrap();
    let r21 = collide(&g2, &tf2, &g1, &tf1, &contact_request()).unwrap();

    assert_eq!(r12.is_collision(), r21.is_collision());

    // The contact normals of the two orders are opposite.
    let n12 = r12.contacts()[0].normal;
    let n21 = r21.contacts()[0].normal;
    assert!(relative_eq!(n12, -n21, epsilon = 1.0e-4));
}

#[test]
fn intersection_bit_is_transform_invariant() {
    let g1 = CollisionGeometry::from(Shape::Ball(Ball::new(1.0)));
    let g2 = CollisionGeometry::from(Shape::Ball(Ball::new(0.75)));
    let tf1 = Isometry3::translation(0.0, 0.0, 0.0);
    let tf2 = Isometry3::translation(1.6, 0.0, 0.0);

    let rigid = Isometry3::new(Vector3::new(3.0, -2.0, 0.5), Vector3::y() * 1.1);

    let plain = collide(&g1, &tf1, &g2, &tf2, &contact_request()).unwrap();
    let moved = collide(&g1, &(rigid * tf1), &g2, &(rigid * tf2), &contact_request()).unwrap();

    assert_eq!(plain.is_collision(), moved.is_collision());
}

#[test]
fn cached_guess_round_trips() {
    let g1 = CollisionGeometry::from(Shape::Ball(Ball::new(1.0)));
    let g2 = CollisionGeometry::from(Shape::Ball(Ball::new(1.0)));
    let tf1 = Isometry3::identity();
    let tf2 = Isometry3::translation(1.5, 0.0, 0.0);

    let request = CollisionRequest {
        enable_contact: true,
        enable_cached_gjk_guess: true,
        cached_gjk_guess: Vector3::new(1.0, 0.2, 0.0),
        ..Default::default()
    };

    let result = collide(&g1, &tf1, &g2, &tf2, &request).unwrap();
    assert!(result.is_collision());
    assert!(result.cached_gjk_guess.norm() > 0.0);
}
