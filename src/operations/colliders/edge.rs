use crate::math::pose::right;
use crate::math::{Isometry3, Point3, Vector3};
use crate::query::CollisionQuery;
use crate::scene::{NodeId, SceneStore};
use crate::settings::ColliderGenerationSettings;

/// Side of the spline an edge box collider is pushed towards.
///
/// With auto-detection a ray is cast down next to the collider, offset by
/// its width to the right and lifted by one unit along the surface up axis.
/// A miss, or a hit on the spline's own surface, keeps the collider's
/// right side; any other hit flips it. Without auto-detection the
/// `flip_edge` flag decides.
pub(crate) fn inset_direction<Q: CollisionQuery + ?Sized>(
    store: &SceneStore,
    query: &Q,
    settings: &ColliderGenerationSettings,
    pose: &Isometry3,
    surface_up: &Vector3,
    surface_root: Option<NodeId>,
) -> Vector3 {
    let right = right(pose);

    if !settings.auto_detect_edge_alignment {
        return if settings.flip_edge { -right } else { right };
    }

    let origin = Point3::from(pose.translation.vector) + right * settings.width + surface_up;
    match query.raycast(&origin, &-surface_up, f64::INFINITY, settings.layer_mask) {
        None => right,
        Some(hit) if surface_root.is_some_and(|root| store.is_descendant_of(hit.node, root)) => {
            right
        }
        Some(_) => -right,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::pose::look_at;
    use crate::query::BoxWorld;
    use approx::assert_relative_eq;

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z)
    }

    #[test]
    fn manual_alignment_follows_flip_flag() {
        let store = SceneStore::new();
        let pose = look_at(&p(0.0, 0.0, 0.0), &p(0.0, 0.0, -1.0));
        let settings = ColliderGenerationSettings::boxed(0.2, 0.1).with_edge(false, false);
        let dir = inset_direction(&store, &BoxWorld::new(), &settings, &pose, &Vector3::y(), None);
        assert_relative_eq!(dir, right(&pose));

        let flipped = ColliderGenerationSettings::boxed(0.2, 0.1).with_edge(false, true);
        let dir = inset_direction(&store, &BoxWorld::new(), &flipped, &pose, &Vector3::y(), None);
        assert_relative_eq!(dir, -right(&pose));
    }

    #[test]
    fn auto_alignment_flips_on_foreign_geometry() {
        let mut store = SceneStore::new();
        let surface = store.spawn("ledge", None, Isometry3::identity()).unwrap();
        let ground = store.spawn("ground", None, Isometry3::identity()).unwrap();
        let pose = look_at(&p(0.0, 0.0, 0.0), &p(0.0, 0.0, -1.0));
        let side = right(&pose);
        let settings = ColliderGenerationSettings::boxed(0.2, 0.1).with_edge(true, false);

        let empty = BoxWorld::new();
        let dir = inset_direction(&store, &empty, &settings, &pose, &Vector3::y(), Some(surface));
        assert_relative_eq!(dir, side);

        // Something other than the surface sits below the right-hand probe.
        let probe = Point3::from(side * 0.2);
        let (low, high) = (Vector3::new(-0.5, -2.0, -0.5), Vector3::new(0.5, -1.0, 0.5));
        let mut world = BoxWorld::new();
        world.add_box(ground, probe + low, probe + high);
        let dir = inset_direction(&store, &world, &settings, &pose, &Vector3::y(), Some(surface));
        assert_relative_eq!(dir, -side);

        // The same box owned by the surface keeps the right-hand side.
        let mut own = BoxWorld::new();
        own.add_box(surface, probe + low, probe + high);
        let dir = inset_direction(&store, &own, &settings, &pose, &Vector3::y(), Some(surface));
        assert_relative_eq!(dir, side);
    }
}
