use std::fmt;

use crate::settings::{ColliderGenerationSettings, ColliderKind};

use super::collider::ColliderId;
use super::node::NodeId;
use super::surface::SurfaceId;

slotmap::new_key_type! {
    /// Unique identifier for a grind spline in the scene store.
    pub struct SplineId;
}

/// Material of a grindable path, read by the map importer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SurfaceType {
    #[default]
    Concrete,
    Metal,
}

impl fmt::Display for SurfaceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Concrete => f.write_str("Concrete"),
            Self::Metal => f.write_str("Metal"),
        }
    }
}

/// Data associated with a grind spline.
///
/// Points are child nodes of `points_container`, which is either the
/// spline's own node or a dedicated child. Their order is the path order.
#[derive(Debug, Clone)]
pub struct SplineData {
    /// The spline's own node.
    pub node: NodeId,
    /// Owning surface, if any.
    pub surface: Option<SurfaceId>,
    /// Parent of the point nodes.
    pub points_container: NodeId,
    /// Parent for synthesized colliders; the spline node when `None`.
    pub collider_container: Option<NodeId>,
    /// Material tag.
    pub surface_type: SurfaceType,
    /// Round grinds (rails, pipes) always use capsule colliders.
    pub is_round: bool,
    /// Collider settings copied in at creation.
    pub settings: ColliderGenerationSettings,
    /// Colliders owned by this spline, one per segment.
    pub colliders: Vec<ColliderId>,
}

impl SplineData {
    /// Creates a spline whose points live directly under its own node.
    #[must_use]
    pub fn new(node: NodeId) -> Self {
        Self {
            node,
            surface: None,
            points_container: node,
            collider_container: None,
            surface_type: SurfaceType::default(),
            is_round: false,
            settings: ColliderGenerationSettings::default(),
            colliders: Vec::new(),
        }
    }

    /// Name used for the spline node: `GrindSpline_Grind_{type}[_Round]`.
    #[must_use]
    pub fn display_name(&self) -> String {
        let round = if self.is_round { "_Round" } else { "" };
        format!("GrindSpline_Grind_{}{round}", self.surface_type)
    }

    /// Collider tag for this spline's surface type.
    #[must_use]
    pub fn collider_tag(&self) -> String {
        format!("Grind_{}", self.surface_type)
    }

    /// Node that synthesized colliders are parented under.
    #[must_use]
    pub fn collider_parent(&self) -> NodeId {
        self.collider_container.unwrap_or(self.node)
    }

    /// Enforces settings implied by the spline's flags.
    pub fn normalize(&mut self) {
        if self.is_round && self.settings.kind == ColliderKind::Box {
            self.settings.kind = ColliderKind::Capsule;
        }
    }
}
