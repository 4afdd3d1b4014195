use crate::math::Vector3;

use super::node::NodeId;
use super::spline::SplineId;

slotmap::new_key_type! {
    /// Unique identifier for a synthesized collider in the scene store.
    pub struct ColliderId;
}

/// Collision layer every synthesized grind collider is assigned to.
pub const GRINDABLE_LAYER: u32 = 12;

/// Collider geometry in the collider node's local frame.
///
/// Capsules and boxes both run along local +Z.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColliderShape {
    /// Capsule whose `height` includes both hemispherical caps.
    Capsule { radius: f64, height: f64 },
    /// Box with full extents `(width, depth, length)`.
    Box { size: Vector3 },
}

/// Data associated with a synthesized collider.
#[derive(Debug, Clone)]
pub struct ColliderData {
    /// Transform node carrying the collider pose.
    pub node: NodeId,
    /// Spline that owns this collider.
    pub spline: SplineId,
    /// Collider geometry.
    pub shape: ColliderShape,
    /// Surface tag, e.g. `Grind_Concrete`.
    pub tag: String,
    /// Collision layer index.
    pub layer: u32,
}
