use crate::math::Isometry3;

slotmap::new_key_type! {
    /// Unique identifier for a transform node in the scene store.
    pub struct NodeId;
}

/// A named transform in the scene hierarchy.
///
/// The pose is stored relative to the parent; world poses are resolved by
/// [`SceneStore::world_pose`](super::SceneStore::world_pose).
#[derive(Debug, Clone)]
pub struct NodeData {
    /// Display name.
    pub name: String,
    /// Parent node, `None` for scene roots.
    pub parent: Option<NodeId>,
    /// Ordered children.
    pub children: Vec<NodeId>,
    /// Pose relative to the parent.
    pub local: Isometry3,
}

impl NodeData {
    /// Creates an unparented node at the origin.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parent: None,
            children: Vec::new(),
            local: Isometry3::identity(),
        }
    }
}
