use crate::math::Point3;
use crate::scene::{NodeId, SceneStore};

use super::{MeshSource, MeshVertex};

/// Vertex lists attached to scene nodes, stored in each node's local frame.
///
/// World positions follow the node's current world pose, so rotating a
/// surface root moves its vertices with it.
#[derive(Debug, Clone, Default)]
pub struct StaticMesh {
    meshes: Vec<(NodeId, Vec<Point3>)>,
}

impl StaticMesh {
    /// Creates an empty mesh source.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Attaches local-space vertices to `owner`.
    pub fn add_mesh(&mut self, owner: NodeId, vertices: Vec<Point3>) {
        self.meshes.push((owner, vertices));
    }
}

impl MeshSource for StaticMesh {
    fn vertices_of(&self, scene: &SceneStore, root: NodeId, max: usize) -> Vec<MeshVertex> {
        let mut out = Vec::new();
        for (owner, vertices) in &self.meshes {
            if !scene.is_descendant_of(*owner, root) {
                continue;
            }
            let Ok(pose) = scene.world_pose(*owner) else {
                tracing::debug!(?owner, "skipping mesh with a missing node");
                continue;
            };
            for v in vertices {
                if out.len() >= max {
                    return out;
                }
                out.push(MeshVertex {
                    position: pose.transform_point(v),
                    owner: *owner,
                });
            }
        }
        out
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::{Isometry3, Vector3};
    use approx::assert_relative_eq;

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z)
    }

    #[test]
    fn vertices_are_transformed_to_world() {
        let mut scene = SceneStore::new();
        let root = scene
            .spawn("root", None, Isometry3::translation(0.0, 1.0, 0.0))
            .unwrap();
        let child = scene
            .spawn("child", Some(root), Isometry3::translation(2.0, 0.0, 0.0))
            .unwrap();
        let mut mesh = StaticMesh::new();
        mesh.add_mesh(child, vec![p(0.5, 0.0, 0.0)]);

        let verts = mesh.vertices_of(&scene, root, usize::MAX);
        assert_eq!(verts.len(), 1);
        assert_relative_eq!(verts[0].position, p(2.5, 1.0, 0.0));
        assert_eq!(verts[0].owner, child);
    }

    #[test]
    fn only_meshes_below_root_are_returned() {
        let mut scene = SceneStore::new();
        let root = scene.spawn("root", None, Isometry3::identity()).unwrap();
        let other = scene.spawn("other", None, Isometry3::identity()).unwrap();
        let mut mesh = StaticMesh::new();
        mesh.add_mesh(other, vec![p(0.0, 0.0, 0.0)]);
        mesh.add_mesh(root, vec![p(1.0, 0.0, 0.0)]);

        let verts = mesh.vertices_of(&scene, root, usize::MAX);
        assert_eq!(verts.len(), 1);
        assert_relative_eq!(verts[0].position.coords, Vector3::x());
    }

    #[test]
    fn vertex_count_is_bounded() {
        let mut scene = SceneStore::new();
        let root = scene.spawn("root", None, Isometry3::identity()).unwrap();
        let mut mesh = StaticMesh::new();
        mesh.add_mesh(root, (0..10).map(|i| p(f64::from(i), 0.0, 0.0)).collect());
        assert_eq!(mesh.vertices_of(&scene, root, 4).len(), 4);
    }
}
