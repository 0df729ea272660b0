mod approximate_cost;
mod ball_ball_collision;
mod bvh_soundness;
mod cuboid_plane_collision;
mod mesh_octree_collision;
mod trimesh_trimesh_collision;
mod unsupported_pair;
