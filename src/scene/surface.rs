use crate::math::UnitQuaternion;
use crate::settings::ColliderGenerationSettings;

use super::node::NodeId;
use super::spline::{SplineId, SurfaceType};

slotmap::new_key_type! {
    /// Unique identifier for a grind surface in the scene store.
    pub struct SurfaceId;
}

/// A designer-authored object (e.g. one ledge) and the splines found on it.
///
/// The defaults are copied into each spline created on the surface.
#[derive(Debug, Clone)]
pub struct SurfaceData {
    /// Root node of the surface; meshes and splines live below it.
    pub node: NodeId,
    /// Owned splines, in creation order.
    pub splines: Vec<SplineId>,
    /// Default surface type for new splines.
    pub surface_type: SurfaceType,
    /// Default roundness for new splines.
    pub is_round: bool,
    /// Default collider settings for new splines.
    pub collider_settings: ColliderGenerationSettings,
    pub(crate) busy: bool,
    /// World rotation saved by the run holding the surface.
    pub(crate) held_rotation: Option<UnitQuaternion>,
}

impl SurfaceData {
    /// Creates an empty surface rooted at `node`.
    #[must_use]
    pub fn new(node: NodeId) -> Self {
        Self {
            node,
            splines: Vec::new(),
            surface_type: SurfaceType::default(),
            is_round: false,
            collider_settings: ColliderGenerationSettings::default(),
            busy: false,
            held_rotation: None,
        }
    }

    /// Returns `true` while a generation run holds the surface.
    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.busy
    }
}
