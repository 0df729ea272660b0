use collide3d::bounding_volume::{Aabb, BoundingVolume, Kdop18, Kios, Obb, ObbRss, Rss};
use collide3d::bvh::{BvhModel, FitBv};
use collide3d::math::Real;
use na::{Point3, Vector3};

fn torus_like_mesh() -> (Vec<Point3<Real>>, Vec<[u32; 3]>) {
    // A ring of quads around the y axis, split into triangles.
    let mut vertices = Vec::new();
    let mut indices = Vec::new();
    let n = 12u32;

    for i in 0..n {
        let angle = (i as Real) / (n as Real) * core::f64::consts::TAU as Real;
        let (sin, cos) = angle.sin_cos();
        vertices.push(Point3::new(cos * 2.0, -0.3, sin * 2.0));
        vertices.push(Point3::new(cos * 2.0, 0.3, sin * 2.0));
    }

    for i in 0..n {
        let a = 2 * i;
        let b = 2 * i + 1;
        let c = (2 * (i + 1)) % (2 * n);
        let d = (2 * (i + 1) + 1) % (2 * n);
        indices.push([a, b, c]);
        indices.push([b, d, c]);
    }

    (vertices, indices)
}

fn check_hierarchy<BV: FitBv>(model: &BvhModel<BV>, node_id: usize) {
    let node = model.node(node_id);

    // Every vertex of every primitive reachable from this node lies
    // inside its volume.
    for &prim in reachable_primitives(model, node_id).iter() {
        let tri = model.triangle(prim as usize);
        for pt in [&tri.a, &tri.b, &tri.c] {
            assert!(
                node.bv.contains_point(pt),
                "node {} does not enclose a vertex of primitive {}",
                node_id,
                prim
            );
        }
    }

    if !node.is_leaf() {
        let (left, right) = node.children();
        check_hierarchy(model, left);
        check_hierarchy(model, right);
    }
}

fn reachable_primitives<BV: FitBv>(model: &BvhModel<BV>, node_id: usize) -> Vec<u32> {
    let node = model.node(node_id);
    if node.is_leaf() {
        model.leaf_primitives(node).to_vec()
    } else {
        let (left, right) = node.children();
        let mut out = reachable_primitives(model, left);
        out.extend(reachable_primitives(model, right));
        out
    }
}

#[test]
fn aabb_hierarchy_soundness() {
    let (vertices, indices) = torus_like_mesh();
    let model: BvhModel<Aabb> = BvhModel::from_triangles(vertices, indices).unwrap();
    check_hierarchy(&model, 0);
}

#[test]
fn obb_hierarchy_soundness() {
    let (vertices, indices) = torus_like_mesh();
    let model: BvhModel<Obb> = BvhModel::from_triangles(vertices, indices).unwrap();
    check_hierarchy(&model, 0);
}

#[test]
fn rss_hierarchy_soundness() {
    let (vertices, indices) = torus_like_mesh();
    let model: BvhModel<Rss> = BvhModel::from_triangles(vertices, indices).unwrap();
    check_hierarchy(&model, 0);
}

#[test]
fn kios_hierarchy_soundness() {
    let (vertices, indices) = torus_like_mesh();
    let model: BvhModel<Kios> = BvhModel::from_triangles(vertices, indices).unwrap();
    check_hierarchy(&model, 0);
}

#[test]
fn obbrss_hierarchy_soundness() {
    let (vertices, indices) = torus_like_mesh();
    let model: BvhModel<ObbRss> = BvhModel::from_triangles(vertices, indices).unwrap();
    check_hierarchy(&model, 0);
}

#[test]
fn kdop_hierarchy_soundness() {
    let (vertices, indices) = torus_like_mesh();
    let model: BvhModel<Kdop18> = BvhModel::from_triangles(vertices, indices).unwrap();
    check_hierarchy(&model, 0);
}

#[test]
fn deformable_leaves_cover_both_frames() {
    let (vertices, indices) = torus_like_mesh();
    let prev: Vec<Point3<Real>> = vertices
        .iter()
        .map(|p| p + Vector3::new(0.1, 0.4, -0.2))
        .collect();

    let model: BvhModel<Aabb> =
        BvhModel::from_deformable_triangles(vertices.clone(), prev.clone(), indices.clone())
            .unwrap();

    for node_id in 0..model.num_nodes() {
        let node = model.node(node_id);
        if !node.is_leaf() {
            continue;
        }

        for &prim in model.leaf_primitives(node) {
            for &vid in &indices[prim as usize] {
                assert!(node.bv.contains_point(&vertices[vid as usize]));
                assert!(node.bv.contains_point(&prev[vid as usize]));
            }
        }
    }
}
