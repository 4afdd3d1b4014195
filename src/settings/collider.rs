use serde::{Deserialize, Serialize};

/// Shape of the colliders synthesized along a spline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColliderKind {
    /// Oriented box, optionally inset to sit flush with a ledge edge.
    #[default]
    Box,
    /// Capsule centered on the segment, used for round rails.
    Capsule,
}

/// Per-spline collider generation settings.
///
/// This is a plain value: it is copied into every spline at creation time,
/// so editing a surface's defaults later does not touch existing splines.
/// Zero or negative dimensions are not rejected and produce degenerate
/// colliders.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColliderGenerationSettings {
    /// Collider shape.
    pub kind: ColliderKind,
    /// Capsule radius.
    pub radius: f64,
    /// Box width (lateral extent).
    pub width: f64,
    /// Box depth (vertical extent).
    pub depth: f64,
    /// Inset box colliders so they sit flush with an edge instead of
    /// being centered on the spline.
    pub is_edge: bool,
    /// Probe the scene to decide which side of the spline the edge lies on.
    pub auto_detect_edge_alignment: bool,
    /// Layer filter for the edge-alignment probe.
    pub layer_mask: u32,
    /// Flip the inset side when auto-detection is off.
    pub flip_edge: bool,
}

impl Default for ColliderGenerationSettings {
    fn default() -> Self {
        Self {
            kind: ColliderKind::Box,
            radius: 0.1,
            width: 0.1,
            depth: 0.05,
            is_edge: false,
            auto_detect_edge_alignment: false,
            layer_mask: 1,
            flip_edge: false,
        }
    }
}

impl ColliderGenerationSettings {
    /// Capsule settings with the given radius.
    #[must_use]
    pub fn capsule(radius: f64) -> Self {
        Self {
            kind: ColliderKind::Capsule,
            radius,
            ..Self::default()
        }
    }

    /// Box settings with the given width and depth.
    #[must_use]
    pub fn boxed(width: f64, depth: f64) -> Self {
        Self {
            kind: ColliderKind::Box,
            width,
            depth,
            ..Self::default()
        }
    }

    /// Marks the box as an edge collider with the given alignment policy.
    #[must_use]
    pub fn with_edge(mut self, auto_detect: bool, flip: bool) -> Self {
        self.is_edge = true;
        self.auto_detect_edge_alignment = auto_detect;
        self.flip_edge = flip;
        self
    }
}
