use collide3d::bounding_volume::Aabb;
use collide3d::bvh::BvhModel;
use collide3d::math::Real;
use collide3d::octree::{OcTree, OcTreeNode};
use collide3d::query::{collide, CollisionRequest};
use collide3d::shape::{Ball, CollisionGeometry, Shape};
use na::{Isometry3, Point3};

fn unit_tetrahedron() -> CollisionGeometry {
    let vertices: Vec<Point3<Real>> = vec![
        Point3::new(0.0, 0.0, 0.0),
        Point3::new(1.0, 0.0, 0.0),
        Point3::new(0.0, 1.0, 0.0),
        Point3::new(0.0, 0.0, 1.0),
    ];
    let indices = vec![[0, 2, 1], [0, 1, 3], [0, 3, 2], [1, 2, 3]];
    CollisionGeometry::from(BvhModel::<Aabb>::from_triangles(vertices, indices).unwrap())
}

/// A single occupied voxel centered at (0.5, 0.5, 0.5) with size 0.5.
fn single_voxel() -> CollisionGeometry {
    let aabb = Aabb::new(Point3::new(0.25, 0.25, 0.25), Point3::new(0.75, 0.75, 0.75));
    CollisionGeometry::from(OcTree::new(aabb, OcTreeNode::leaf(1.0)))
}

#[test]
fn tetrahedron_hits_occupied_voxel() {
    let mesh = unit_tetrahedron();
    let tree = single_voxel();
    let tf = Isometry3::identity();

    let request = CollisionRequest {
        enable_contact: true,
        num_max_contacts: 8,
        ..Default::default()
    };
    let result = collide(&mesh, &tf, &tree, &tf, &request).unwrap();

    assert!(result.is_collision());
    let contact = &result.contacts()[0];
    // The mesh side of the pair reports the triangle index.
    let prim = contact.primitive1.expect("mesh contact carries its triangle");
    assert!((prim as usize) < 4);
    assert!(contact.primitive2.is_none());
}

#[test]
fn octree_mesh_is_symmetric_to_mesh_octree() {
    let mesh = unit_tetrahedron();
    let tree = single_voxel();
    let tf = Isometry3::identity();
    let request = CollisionRequest::default();

    let a = collide(&mesh, &tf, &tree, &tf, &request).unwrap();
    let b = collide(&tree, &tf, &mesh, &tf, &request).unwrap();
    assert_eq!(a.is_collision(), b.is_collision());
}

#[test]
fn free_leaves_never_collide() {
    let mesh = unit_tetrahedron();
    let aabb = Aabb::new(Point3::new(0.25, 0.25, 0.25), Point3::new(0.75, 0.75, 0.75));
    let tree = CollisionGeometry::from(OcTree::new(aabb, OcTreeNode::leaf(0.0)));
    let tf = Isometry3::identity();

    let result = collide(&mesh, &tf, &tree, &tf, &CollisionRequest::default()).unwrap();
    assert!(!result.is_collision());
}

#[test]
fn ball_against_subdivided_octree() {
    // Only one octant of the cell [0, 2]^3 is occupied.
    let mut children: [Option<OcTreeNode>; 8] = Default::default();
    children[0] = Some(OcTreeNode::leaf(1.0));

    let aabb = Aabb::new(Point3::new(0.0, 0.0, 0.0), Point3::new(2.0, 2.0, 2.0));
    let tree = CollisionGeometry::from(OcTree::new(aabb, OcTreeNode::internal(children)));
    let ball = CollisionGeometry::from(Shape::Ball(Ball::new(0.4)));

    let request = CollisionRequest {
        enable_contact: true,
        ..Default::default()
    };

    // Inside the occupied octant [0, 1]^3.
    let hit = collide(
        &tree,
        &Isometry3::identity(),
        &ball,
        &Isometry3::translation(0.5, 0.5, 0.5),
        &request,
    )
    .unwrap();
    assert!(hit.is_collision());

    // Inside an absent octant.
    let miss = collide(
        &tree,
        &Isometry3::identity(),
        &ball,
        &Isometry3::translation(1.5, 1.5, 1.5),
        &request,
    )
    .unwrap();
    assert!(!miss.is_collision());
}

#[test]
fn octree_octree_collision() {
    let voxel1 = single_voxel();
    let voxel2 = single_voxel();

    let touching = collide(
        &voxel1,
        &Isometry3::identity(),
        &voxel2,
        &Isometry3::translation(0.25, 0.0, 0.0),
        &CollisionRequest::default(),
    )
    .unwrap();
    assert!(touching.is_collision());

    let distant = collide(
        &voxel1,
        &Isometry3::identity(),
        &voxel2,
        &Isometry3::translation(3.0, 0.0, 0.0),
        &CollisionRequest::default(),
    )
    .unwrap();
    assert!(!distant.is_collision());
}
