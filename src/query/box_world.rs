use crate::math::{Point3, Vector3, TOLERANCE};
use crate::scene::NodeId;

use super::{CollisionQuery, RayHit};

/// An axis-aligned box collider owned by a scene node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldBox {
    /// Node owning the collider.
    pub owner: NodeId,
    /// Minimum corner.
    pub min: Point3,
    /// Maximum corner.
    pub max: Point3,
    /// Collision layer index.
    pub layer: u32,
}

impl WorldBox {
    /// Returns `true` if this box overlaps (or touches) the given box.
    #[must_use]
    pub fn intersects(&self, min: &Point3, max: &Point3) -> bool {
        (0..3).all(|i| self.min[i] <= max[i] && self.max[i] >= min[i])
    }

    /// Slab test; returns the entry distance along a normalized ray.
    ///
    /// Rays starting inside the box do not hit it.
    #[must_use]
    pub fn ray_entry(&self, origin: &Point3, direction: &Vector3) -> Option<f64> {
        let mut t_min = f64::NEG_INFINITY;
        let mut t_max = f64::INFINITY;
        for i in 0..3 {
            if direction[i].abs() < TOLERANCE {
                if origin[i] < self.min[i] || origin[i] > self.max[i] {
                    return None;
                }
                continue;
            }
            let inv = 1.0 / direction[i];
            let t0 = (self.min[i] - origin[i]) * inv;
            let t1 = (self.max[i] - origin[i]) * inv;
            t_min = t_min.max(t0.min(t1));
            t_max = t_max.min(t0.max(t1));
        }
        (t_min <= t_max && t_min >= 0.0).then_some(t_min)
    }
}

/// A static collision world made of axis-aligned boxes.
#[derive(Debug, Clone, Default)]
pub struct BoxWorld {
    boxes: Vec<WorldBox>,
}

impl BoxWorld {
    /// Creates an empty world.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a box on the default layer (0).
    pub fn add_box(&mut self, owner: NodeId, min: Point3, max: Point3) {
        self.add_box_on_layer(owner, min, max, 0);
    }

    /// Adds a box on a specific layer.
    pub fn add_box_on_layer(&mut self, owner: NodeId, min: Point3, max: Point3, layer: u32) {
        self.boxes.push(WorldBox {
            owner,
            min,
            max,
            layer,
        });
    }
}

impl CollisionQuery for BoxWorld {
    fn overlap_box(&self, center: &Point3, half_extents: &Vector3) -> Vec<NodeId> {
        let min = center - half_extents;
        let max = center + half_extents;
        self.boxes
            .iter()
            .filter(|b| b.intersects(&min, &max))
            .map(|b| b.owner)
            .collect()
    }

    fn raycast(
        &self,
        origin: &Point3,
        direction: &Vector3,
        max_distance: f64,
        layer_mask: u32,
    ) -> Option<RayHit> {
        let len = direction.norm();
        if len < TOLERANCE {
            return None;
        }
        let dir = direction / len;
        self.boxes
            .iter()
            .filter(|b| layer_bit(b.layer) & layer_mask != 0)
            .filter_map(|b| b.ray_entry(origin, &dir).map(|t| (t, b.owner)))
            .filter(|(t, _)| *t <= max_distance)
            .min_by(|a, b| a.0.total_cmp(&b.0))
            .map(|(t, node)| RayHit {
                point: origin + dir * t,
                distance: t,
                node,
            })
    }
}

fn layer_bit(layer: u32) -> u32 {
    1_u32.checked_shl(layer).unwrap_or(0)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::Isometry3;
    use crate::scene::SceneStore;
    use approx::assert_relative_eq;

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z)
    }

    fn owner() -> NodeId {
        let mut scene = SceneStore::new();
        scene.spawn("owner", None, Isometry3::identity()).unwrap()
    }

    #[test]
    fn touching_boxes_overlap() {
        let mut world = BoxWorld::new();
        world.add_box(owner(), p(0.0, 0.0, 0.0), p(1.0, 1.0, 1.0));
        let hits = world.overlap_box(&p(1.05, 0.5, 0.5), &Vector3::repeat(0.05));
        assert_eq!(hits.len(), 1);
        let misses = world.overlap_box(&p(1.2, 0.5, 0.5), &Vector3::repeat(0.05));
        assert!(misses.is_empty());
    }

    #[test]
    fn raycast_returns_nearest_hit() {
        let node = owner();
        let mut world = BoxWorld::new();
        world.add_box(node, p(-1.0, -2.0, -1.0), p(1.0, -1.0, 1.0));
        world.add_box(node, p(-1.0, -5.0, -1.0), p(1.0, -4.0, 1.0));

        let hit = world
            .raycast(&p(0.0, 0.0, 0.0), &-Vector3::y(), f64::INFINITY, 1)
            .unwrap();
        assert_relative_eq!(hit.distance, 1.0);
        assert_relative_eq!(hit.point, p(0.0, -1.0, 0.0));
    }

    #[test]
    fn raycast_respects_layer_mask_and_distance() {
        let node = owner();
        let mut world = BoxWorld::new();
        world.add_box_on_layer(node, p(-1.0, -2.0, -1.0), p(1.0, -1.0, 1.0), 3);

        assert!(world.raycast(&p(0.0, 0.0, 0.0), &-Vector3::y(), 10.0, 1).is_none());
        assert!(world.raycast(&p(0.0, 0.0, 0.0), &-Vector3::y(), 10.0, 1 << 3).is_some());
        assert!(world.raycast(&p(0.0, 0.0, 0.0), &-Vector3::y(), 0.5, 1 << 3).is_none());
    }

    #[test]
    fn ray_starting_inside_does_not_hit() {
        let mut world = BoxWorld::new();
        world.add_box(owner(), p(-1.0, -1.0, -1.0), p(1.0, 1.0, 1.0));
        assert!(world.raycast(&p(0.0, 0.0, 0.0), &Vector3::x(), 10.0, 1).is_none());
    }
}
