//! Services the generator consumes from the host scene.
//!
//! The host owns the physics world and the mesh data; the generator only
//! reads them through [`CollisionQuery`] and [`MeshSource`]. [`BoxWorld`]
//! and [`StaticMesh`] are small in-memory implementations for batch tools
//! and tests.

mod box_world;
mod static_mesh;

pub use box_world::{BoxWorld, WorldBox};
pub use static_mesh::StaticMesh;

use crate::math::{Point3, Vector3};
use crate::scene::{NodeId, SceneStore};

/// Result of a successful raycast.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// World-space hit position.
    pub point: Point3,
    /// Distance along the ray.
    pub distance: f64,
    /// Node owning the collider that was hit.
    pub node: NodeId,
}

/// Read-only access to the scene's static collision world.
pub trait CollisionQuery {
    /// Nodes owning colliders that overlap an axis-aligned box.
    fn overlap_box(&self, center: &Point3, half_extents: &Vector3) -> Vec<NodeId>;

    /// Casts a ray and returns the nearest hit on a layer in `layer_mask`.
    ///
    /// `direction` need not be normalized; `max_distance` is measured in
    /// world units along the normalized direction.
    fn raycast(
        &self,
        origin: &Point3,
        direction: &Vector3,
        max_distance: f64,
        layer_mask: u32,
    ) -> Option<RayHit>;

    /// Returns `true` if a cube of half-extent `half_extent` at `point`
    /// overlaps any collider. With `restrict_to`, only colliders owned by
    /// that node or its descendants count.
    fn overlaps_at(
        &self,
        scene: &SceneStore,
        point: &Point3,
        half_extent: f64,
        restrict_to: Option<NodeId>,
    ) -> bool {
        let hits = self.overlap_box(point, &Vector3::repeat(half_extent));
        match restrict_to {
            None => !hits.is_empty(),
            Some(root) => hits.iter().any(|n| scene.is_descendant_of(*n, root)),
        }
    }
}

/// A mesh vertex resolved to world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeshVertex {
    /// World-space position.
    pub position: Point3,
    /// Node owning the mesh.
    pub owner: NodeId,
}

/// Read-only access to mesh vertices below a scene node.
pub trait MeshSource {
    /// World-space vertices of every mesh owned by `root` or its
    /// descendants, in a stable order, truncated to `max` entries.
    fn vertices_of(&self, scene: &SceneStore, root: NodeId, max: usize) -> Vec<MeshVertex>;
}

/// Snaps `point` to the nearest mesh vertex below `root`.
///
/// Ties keep the first vertex found. Returns `None` when there are no
/// vertices.
#[must_use]
pub fn nearest_vertex<M: MeshSource + ?Sized>(
    scene: &SceneStore,
    mesh: &M,
    root: NodeId,
    point: &Point3,
    max: usize,
) -> Option<Point3> {
    let mut best = None;
    let mut best_distance = f64::INFINITY;
    for vertex in mesh.vertices_of(scene, root, max) {
        let d = nalgebra::distance(&vertex.position, point);
        if d < best_distance {
            best = Some(vertex.position);
            best_distance = d;
        }
    }
    best
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::Isometry3;

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z)
    }

    #[test]
    fn restricted_overlap_ignores_foreign_colliders() {
        let mut scene = SceneStore::new();
        let surface = scene.spawn("ledge", None, Isometry3::identity()).unwrap();
        let mesh = scene.spawn("mesh", Some(surface), Isometry3::identity()).unwrap();
        let wall = scene.spawn("wall", None, Isometry3::identity()).unwrap();

        let mut world = BoxWorld::new();
        world.add_box(wall, p(0.0, 0.0, 0.0), p(1.0, 1.0, 1.0));

        let probe = p(0.5, 0.5, 0.5);
        assert!(world.overlaps_at(&scene, &probe, 0.05, None));
        assert!(!world.overlaps_at(&scene, &probe, 0.05, Some(surface)));

        world.add_box(mesh, p(0.0, 0.0, 0.0), p(1.0, 1.0, 1.0));
        assert!(world.overlaps_at(&scene, &probe, 0.05, Some(surface)));
    }

    #[test]
    fn nearest_vertex_snaps_to_closest() {
        let mut scene = SceneStore::new();
        let root = scene.spawn("root", None, Isometry3::identity()).unwrap();
        let mut mesh = StaticMesh::new();
        mesh.add_mesh(root, vec![p(0.0, 0.0, 0.0), p(1.0, 0.0, 0.0), p(2.0, 0.0, 0.0)]);

        let snapped = nearest_vertex(&scene, &mesh, root, &p(1.2, 0.3, 0.0), usize::MAX);
        assert_eq!(snapped, Some(p(1.0, 0.0, 0.0)));

        let empty = StaticMesh::new();
        assert_eq!(nearest_vertex(&scene, &empty, root, &p(0.0, 0.0, 0.0), usize::MAX), None);
    }
}
