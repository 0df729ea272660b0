use collide3d::query::{collide, CollisionRequest};
use collide3d::shape::{CollisionGeometry, Cuboid, Plane, Shape};
use na::{Isometry3, Unit, Vector3};

#[test]
fn cuboid_straddles_plane() {
    let cuboid = CollisionGeometry::from(Shape::Cuboid(Cuboid::new(Vector3::new(1.0, 1.0, 1.0))));
    let plane = CollisionGeometry::from(Shape::Plane(Plane::new(
        Unit::new_normalize(Vector3::z()),
        0.0,
    )));
    let tf = Isometry3::identity();

    let request = CollisionRequest {
        enable_contact: true,
        ..Default::default()
    };
    let result = collide(&cuboid, &tf, &plane, &tf, &request).unwrap();

    assert!(result.is_collision());
    let contact = &result.contacts()[0];

    // The contact lies on the plane and the normal is parallel to it.
    assert!(contact.position.z.abs() < 1.0e-4);
    assert!(contact.normal.cross(&Vector3::z()).norm() < 1.0e-4);
}

#[test]
fn plane_far_below_cuboid_misses() {
    let cuboid = CollisionGeometry::from(Shape::Cuboid(Cuboid::new(Vector3::new(1.0, 1.0, 1.0))));
    let plane = CollisionGeometry::from(Shape::Plane(Plane::new(
        Unit::new_normalize(Vector3::z()),
        -5.0,
    )));
    let tf = Isometry3::identity();

    let result = collide(&cuboid, &tf, &plane, &tf, &CollisionRequest::default()).unwrap();
    assert!(!result.is_collision());
}

#[test]
fn half_space_swallows_distant_cuboid() {
    use collide3d::shape::HalfSpace;

    let cuboid = CollisionGeometry::from(Shape::Cuboid(Cuboid::new(Vector3::new(1.0, 1.0, 1.0))));
    let hs = CollisionGeometry::from(Shape::HalfSpace(HalfSpace::new(
        Unit::new_normalize(Vector3::z()),
        0.0,
    )));
    let below = Isometry3::translation(0.0, 0.0, -4.0);
    let tf = Isometry3::identity();

    // Fully inside the half-space: a deep contact.
    let request = CollisionRequest {
        enable_contact: true,
        ..Default::default()
    };
    let result = collide(&cuboid, &below, &hs, &tf, &request).unwrap();
    assert!(result.is_collision());
    assert!(result.contacts()[0].penetration_depth > 2.0);
}
