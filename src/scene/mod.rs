pub mod collider;
pub mod node;
pub mod spline;
pub mod surface;

pub use collider::{ColliderData, ColliderId, ColliderShape, GRINDABLE_LAYER};
pub use node::{NodeData, NodeId};
pub use spline::{SplineData, SplineId, SurfaceType};
pub use surface::{SurfaceData, SurfaceId};

use crate::error::SceneError;
use crate::math::{Isometry3, Point3, UnitQuaternion, Vector3};
use slotmap::SlotMap;

/// Central arena that owns the transform hierarchy and all grind entities.
///
/// Entities reference each other via typed IDs (generational indices).
/// Ownership is explicit: a surface owns its splines, a spline owns its
/// point nodes and colliders, and teardown always removes children before
/// their owner.
#[derive(Debug, Default)]
pub struct SceneStore {
    nodes: SlotMap<NodeId, NodeData>,
    surfaces: SlotMap<SurfaceId, SurfaceData>,
    splines: SlotMap<SplineId, SplineData>,
    colliders: SlotMap<ColliderId, ColliderData>,
}

impl SceneStore {
    /// Creates a new, empty scene store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // --- Node operations ---

    /// Creates a node under `parent` (or as a root) with a local pose.
    ///
    /// # Errors
    ///
    /// Returns an error if `parent` is not in the store.
    pub fn spawn(
        &mut self,
        name: impl Into<String>,
        parent: Option<NodeId>,
        local: Isometry3,
    ) -> Result<NodeId, SceneError> {
        if let Some(parent) = parent {
            self.node(parent)?;
        }
        let mut data = NodeData::new(name);
        data.parent = parent;
        data.local = local;
        let id = self.nodes.insert(data);
        if let Some(parent) = parent {
            self.node_mut(parent)?.children.push(id);
        }
        Ok(id)
    }

    /// Creates a node under `parent` whose world position is `position`.
    ///
    /// The node's world rotation matches its parent's.
    ///
    /// # Errors
    ///
    /// Returns an error if `parent` is not in the store.
    pub fn spawn_at(
        &mut self,
        name: impl Into<String>,
        parent: Option<NodeId>,
        position: &Point3,
    ) -> Result<NodeId, SceneError> {
        let local_position = match parent {
            Some(parent) => self.world_pose(parent)?.inverse_transform_point(position),
            None => *position,
        };
        self.spawn(
            name,
            parent,
            Isometry3::translation(local_position.x, local_position.y, local_position.z),
        )
    }

    /// Returns a reference to the node data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the store.
    pub fn node(&self, id: NodeId) -> Result<&NodeData, SceneError> {
        self.nodes.get(id).ok_or(SceneError::EntityNotFound("node"))
    }

    /// Returns a mutable reference to the node data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the store.
    pub fn node_mut(&mut self, id: NodeId) -> Result<&mut NodeData, SceneError> {
        self.nodes
            .get_mut(id)
            .ok_or(SceneError::EntityNotFound("node"))
    }

    /// Returns `true` if the node is still alive.
    #[must_use]
    pub fn contains_node(&self, id: NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Number of live nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Resolves the world pose of a node by walking up its parents.
    ///
    /// # Errors
    ///
    /// Returns an error if the node or one of its ancestors is missing.
    pub fn world_pose(&self, id: NodeId) -> Result<Isometry3, SceneError> {
        let mut pose = Isometry3::identity();
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            let node = self.node(current)?;
            pose = node.local * pose;
            cursor = node.parent;
        }
        Ok(pose)
    }

    /// Moves a node so its world pose equals `pose`.
    ///
    /// # Errors
    ///
    /// Returns an error if the node or its parent chain is missing.
    pub fn set_world_pose(&mut self, id: NodeId, pose: Isometry3) -> Result<(), SceneError> {
        let parent_pose = match self.node(id)?.parent {
            Some(parent) => self.world_pose(parent)?,
            None => Isometry3::identity(),
        };
        self.node_mut(id)?.local = parent_pose.inverse() * pose;
        Ok(())
    }

    /// Returns the world rotation of a node.
    ///
    /// # Errors
    ///
    /// Returns an error if the node or its parent chain is missing.
    pub fn world_rotation(&self, id: NodeId) -> Result<UnitQuaternion, SceneError> {
        Ok(self.world_pose(id)?.rotation)
    }

    /// Sets the world rotation of a node, keeping its world position.
    ///
    /// # Errors
    ///
    /// Returns an error if the node or its parent chain is missing.
    pub fn set_world_rotation(
        &mut self,
        id: NodeId,
        rotation: UnitQuaternion,
    ) -> Result<(), SceneError> {
        let mut pose = self.world_pose(id)?;
        pose.rotation = rotation;
        self.set_world_pose(id, pose)
    }

    /// World-space position of a node.
    ///
    /// # Errors
    ///
    /// Returns an error if the node or its parent chain is missing.
    pub fn world_position(&self, id: NodeId) -> Result<Point3, SceneError> {
        let pose = self.world_pose(id)?;
        Ok(Point3::from(pose.translation.vector))
    }

    /// World-space up axis of a node.
    ///
    /// # Errors
    ///
    /// Returns an error if the node or its parent chain is missing.
    pub fn world_up(&self, id: NodeId) -> Result<Vector3, SceneError> {
        Ok(self.world_rotation(id)? * Vector3::y())
    }

    /// Returns `true` if `id` is `ancestor` or lies anywhere below it.
    #[must_use]
    pub fn is_descendant_of(&self, id: NodeId, ancestor: NodeId) -> bool {
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            if current == ancestor {
                return true;
            }
            cursor = self.nodes.get(current).and_then(|n| n.parent);
        }
        false
    }

    /// Removes a node and its whole subtree, detaching it from its parent.
    ///
    /// # Errors
    ///
    /// Returns an error if the node is not in the store.
    pub fn despawn(&mut self, id: NodeId) -> Result<(), SceneError> {
        let parent = self.node(id)?.parent;
        if let Some(parent) = parent.and_then(|p| self.nodes.get_mut(p)) {
            parent.children.retain(|c| *c != id);
        }

        let mut stack = vec![id];
        let mut order = Vec::new();
        while let Some(current) = stack.pop() {
            if let Some(node) = self.nodes.get(current) {
                stack.extend(node.children.iter().copied());
                order.push(current);
            }
        }
        // Children first, owner last.
        for node in order.into_iter().rev() {
            self.nodes.remove(node);
        }
        Ok(())
    }

    // --- Surface operations ---

    /// Creates a surface with its own root node.
    ///
    /// # Errors
    ///
    /// Returns an error if `parent` is not in the store.
    pub fn create_surface(
        &mut self,
        name: impl Into<String>,
        parent: Option<NodeId>,
        local: Isometry3,
    ) -> Result<SurfaceId, SceneError> {
        let node = self.spawn(name, parent, local)?;
        Ok(self.surfaces.insert(SurfaceData::new(node)))
    }

    /// Returns a reference to the surface data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the store.
    pub fn surface(&self, id: SurfaceId) -> Result<&SurfaceData, SceneError> {
        self.surfaces
            .get(id)
            .ok_or(SceneError::EntityNotFound("surface"))
    }

    /// Returns a mutable reference to the surface data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the store.
    pub fn surface_mut(&mut self, id: SurfaceId) -> Result<&mut SurfaceData, SceneError> {
        self.surfaces
            .get_mut(id)
            .ok_or(SceneError::EntityNotFound("surface"))
    }

    /// Unlocks a surface left busy by a generation run that was dropped
    /// before finishing, putting back the rotation the run reset. Splines
    /// the run already added stay on the surface.
    ///
    /// Returns `false` if the surface was not busy.
    ///
    /// # Errors
    ///
    /// Returns an error if the surface or its root node is missing.
    pub fn release_surface(&mut self, id: SurfaceId) -> Result<bool, SceneError> {
        let surface = self.surface_mut(id)?;
        if !surface.busy {
            return Ok(false);
        }
        surface.busy = false;
        let node = surface.node;
        if let Some(rotation) = surface.held_rotation.take() {
            self.set_world_rotation(node, rotation)?;
        }
        tracing::debug!(?id, "released busy surface");
        Ok(true)
    }

    // --- Spline operations ---

    /// Inserts a spline and, if it names a surface, registers it there.
    ///
    /// # Errors
    ///
    /// Returns an error if the spline's surface is not in the store.
    pub fn add_spline(&mut self, mut data: SplineData) -> Result<SplineId, SceneError> {
        if let Some(surface) = data.surface {
            self.surface(surface)?;
        }
        data.normalize();
        let name = data.display_name();
        self.node_mut(data.node)?.name = name;
        let surface = data.surface;
        let id = self.splines.insert(data);
        if let Some(surface) = surface {
            self.surface_mut(surface)?.splines.push(id);
        }
        Ok(id)
    }

    /// Returns a reference to the spline data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the store.
    pub fn spline(&self, id: SplineId) -> Result<&SplineData, SceneError> {
        self.splines
            .get(id)
            .ok_or(SceneError::EntityNotFound("spline"))
    }

    /// Returns a mutable reference to the spline data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the store.
    pub fn spline_mut(&mut self, id: SplineId) -> Result<&mut SplineData, SceneError> {
        self.splines
            .get_mut(id)
            .ok_or(SceneError::EntityNotFound("spline"))
    }

    /// Number of live splines.
    #[must_use]
    pub fn spline_count(&self) -> usize {
        self.splines.len()
    }

    /// Point nodes of a spline, in path order.
    ///
    /// When the points container is the spline node itself, children that
    /// hold the spline's colliders are skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if the spline or its point container is missing.
    pub fn spline_point_nodes(&self, id: SplineId) -> Result<Vec<NodeId>, SceneError> {
        let spline = self.spline(id)?;
        let children = &self.node(spline.points_container)?.children;
        if spline.points_container != spline.node {
            return Ok(children.clone());
        }
        let excluded: Vec<NodeId> = spline
            .colliders
            .iter()
            .filter_map(|c| self.colliders.get(*c))
            .map(|c| c.node)
            .chain(spline.collider_container)
            .collect();
        Ok(children
            .iter()
            .copied()
            .filter(|n| !excluded.contains(n))
            .collect())
    }

    /// Number of points on a spline.
    ///
    /// # Errors
    ///
    /// Returns an error if the spline or its point container is missing.
    pub fn point_count(&self, id: SplineId) -> Result<usize, SceneError> {
        Ok(self.spline_point_nodes(id)?.len())
    }

    /// World positions of a spline's points, in path order.
    ///
    /// # Errors
    ///
    /// Returns an error if the spline or any point node is missing.
    pub fn spline_points(&self, id: SplineId) -> Result<Vec<Point3>, SceneError> {
        self.spline_point_nodes(id)?
            .into_iter()
            .map(|node| self.world_position(node))
            .collect()
    }

    /// Tears down a spline: its colliders first, then its node subtree
    /// (points and containers), then its entry on the owning surface.
    ///
    /// # Errors
    ///
    /// Returns an error if the spline is not in the store.
    pub fn destroy_spline(&mut self, id: SplineId) -> Result<(), SceneError> {
        self.destroy_colliders(id)?;
        let spline = self
            .splines
            .remove(id)
            .ok_or(SceneError::EntityNotFound("spline"))?;
        if let Some(surface) = spline.surface.and_then(|s| self.surfaces.get_mut(s)) {
            surface.splines.retain(|s| *s != id);
        }
        if self.contains_node(spline.node) {
            self.despawn(spline.node)?;
        }
        Ok(())
    }

    // --- Collider operations ---

    /// Inserts a collider and registers it with its spline.
    ///
    /// # Errors
    ///
    /// Returns an error if the collider's spline is not in the store.
    pub fn add_collider(&mut self, data: ColliderData) -> Result<ColliderId, SceneError> {
        let spline = data.spline;
        self.spline(spline)?;
        let id = self.colliders.insert(data);
        self.spline_mut(spline)?.colliders.push(id);
        Ok(id)
    }

    /// Returns a reference to the collider data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the store.
    pub fn collider(&self, id: ColliderId) -> Result<&ColliderData, SceneError> {
        self.colliders
            .get(id)
            .ok_or(SceneError::EntityNotFound("collider"))
    }

    /// Number of live colliders.
    #[must_use]
    pub fn collider_count(&self) -> usize {
        self.colliders.len()
    }

    /// Destroys every collider owned by a spline. Entries whose collider or
    /// node has already gone are skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if the spline is not in the store.
    pub fn destroy_colliders(&mut self, spline: SplineId) -> Result<(), SceneError> {
        let owned = std::mem::take(&mut self.spline_mut(spline)?.colliders);
        for id in owned {
            let Some(collider) = self.colliders.remove(id) else {
                tracing::debug!(?id, "collider already destroyed");
                continue;
            };
            if self.contains_node(collider.node) {
                self.despawn(collider.node)?;
            }
        }
        Ok(())
    }
}
