pub mod authoring;
pub mod colliders;
pub mod generation;

use crate::error::Result;
use crate::math::UnitQuaternion;
use crate::scene::{NodeId, SceneStore};

/// Saved world rotation of a surface root that was reset to identity.
#[derive(Debug, Clone, Copy)]
pub(crate) struct RotationGuard {
    node: NodeId,
    rotation: UnitQuaternion,
}

impl RotationGuard {
    /// Records the node's world rotation and resets it to identity.
    pub(crate) fn normalize(store: &mut SceneStore, node: NodeId) -> Result<Self> {
        let rotation = store.world_rotation(node)?;
        store.set_world_rotation(node, UnitQuaternion::identity())?;
        Ok(Self { node, rotation })
    }

    pub(crate) fn rotation(&self) -> UnitQuaternion {
        self.rotation
    }

    /// Puts the recorded rotation back.
    pub(crate) fn restore(self, store: &mut SceneStore) -> Result<()> {
        store.set_world_rotation(self.node, self.rotation)?;
        Ok(())
    }
}
