mod edge;

use crate::error::Result;
use crate::math::pose::look_at;
use crate::math::{Isometry3, Point3, Vector3};
use crate::query::CollisionQuery;
use crate::scene::{
    ColliderData, ColliderId, ColliderShape, NodeId, SceneStore, SplineId, SurfaceId,
    GRINDABLE_LAYER,
};
use crate::settings::{ColliderGenerationSettings, ColliderKind};

use super::RotationGuard;

/// Replaces a spline's colliders with one collider per segment.
///
/// Previously owned colliders are destroyed first, so running the
/// operation twice on an unchanged spline yields the same set. Each
/// collider is centered on its segment with local +Z facing the segment's
/// first point, tagged with the spline's surface type and placed on
/// [`GRINDABLE_LAYER`].
///
/// Capsules are lowered by their radius so their top sits on the spline.
/// Edge boxes are pushed sideways by half their width (see
/// `inset_direction`) and lowered by half their depth.
pub struct SynthesizeColliders {
    spline: SplineId,
    settings: Option<ColliderGenerationSettings>,
}

impl SynthesizeColliders {
    /// Creates a new `SynthesizeColliders` operation using the spline's own settings.
    #[must_use]
    pub fn new(spline: SplineId) -> Self {
        Self {
            spline,
            settings: None,
        }
    }

    /// Uses the given settings instead of the spline's own.
    #[must_use]
    pub fn with_settings(mut self, settings: Option<ColliderGenerationSettings>) -> Self {
        self.settings = settings;
        self
    }

    /// Executes the synthesis, returning the new colliders in segment order.
    ///
    /// A spline with fewer than two points, or whose collider container no
    /// longer exists, ends up with no colliders.
    ///
    /// # Errors
    ///
    /// Returns an error if the spline or its point nodes are missing.
    pub fn execute<Q: CollisionQuery + ?Sized>(
        &self,
        store: &mut SceneStore,
        query: &Q,
    ) -> Result<Vec<ColliderId>> {
        store.destroy_colliders(self.spline)?;

        let spline = store.spline(self.spline)?;
        let settings = self.settings.unwrap_or(spline.settings);
        let parent = spline.collider_parent();
        let tag = spline.collider_tag();
        let spline_node = spline.node;
        let surface = spline.surface;

        let points = store.spline_points(self.spline)?;
        if points.len() < 2 {
            return Ok(Vec::new());
        }
        if !store.contains_node(parent) {
            tracing::warn!(spline = ?self.spline, "collider container is missing, skipping");
            return Ok(Vec::new());
        }

        let surface_up = surface_up(store, surface, parent)?;
        let surface_root = store.node(spline_node)?.parent;

        let mut created = Vec::with_capacity(points.len() - 1);
        for pair in points.windows(2) {
            let (shape, pose) = segment_collider(
                store,
                query,
                &settings,
                &pair[0],
                &pair[1],
                &surface_up,
                surface_root,
            );
            let node = store.spawn("Grind Cols", Some(parent), Isometry3::identity())?;
            store.set_world_pose(node, pose)?;
            let id = store.add_collider(ColliderData {
                node,
                spline: self.spline,
                shape,
                tag: tag.clone(),
                layer: GRINDABLE_LAYER,
            })?;
            created.push(id);
        }

        tracing::debug!(spline = ?self.spline, colliders = created.len(), "synthesized colliders");
        Ok(created)
    }
}

/// Up axis used for vertical offsets: the owning surface's, or the
/// collider parent's for free-standing splines.
fn surface_up(store: &SceneStore, surface: Option<SurfaceId>, parent: NodeId) -> Result<Vector3> {
    let node = match surface.and_then(|s| store.surface(s).ok()) {
        Some(surface) => surface.node,
        None => parent,
    };
    Ok(store.world_up(node)?)
}

fn segment_collider<Q: CollisionQuery + ?Sized>(
    store: &SceneStore,
    query: &Q,
    settings: &ColliderGenerationSettings,
    a: &Point3,
    b: &Point3,
    surface_up: &Vector3,
    surface_root: Option<NodeId>,
) -> (ColliderShape, Isometry3) {
    let length = nalgebra::distance(a, b);
    let mut pose = look_at(&nalgebra::center(a, b), a);

    match settings.kind {
        ColliderKind::Capsule => {
            pose.translation.vector -= surface_up * settings.radius;
            let shape = ColliderShape::Capsule {
                radius: settings.radius,
                height: length + 2.0 * settings.radius,
            };
            (shape, pose)
        }
        ColliderKind::Box => {
            if settings.is_edge {
                let inset =
                    edge::inset_direction(store, query, settings, &pose, surface_up, surface_root);
                pose.translation.vector += inset * (settings.width / 2.0);
                pose.translation.vector -= surface_up * (settings.depth / 2.0);
            }
            let shape = ColliderShape::Box {
                size: Vector3::new(settings.width, settings.depth, length),
            };
            (shape, pose)
        }
    }
}

/// Regenerates the colliders of every spline on a surface.
///
/// The surface is rotated to identity for the duration so all geometry is
/// built in a consistent frame, then restored.
pub struct RegenerateSurfaceColliders {
    surface: SurfaceId,
    settings: Option<ColliderGenerationSettings>,
}

impl RegenerateSurfaceColliders {
    /// Creates a new `RegenerateSurfaceColliders` operation.
    #[must_use]
    pub fn new(surface: SurfaceId) -> Self {
        Self {
            surface,
            settings: None,
        }
    }

    /// Uses the given settings for every spline instead of their own.
    #[must_use]
    pub fn with_settings(mut self, settings: Option<ColliderGenerationSettings>) -> Self {
        self.settings = settings;
        self
    }

    /// Executes the regeneration, returning the total number of colliders.
    ///
    /// # Errors
    ///
    /// Returns an error if the surface or one of its splines is missing.
    pub fn execute<Q: CollisionQuery + ?Sized>(
        &self,
        store: &mut SceneStore,
        query: &Q,
    ) -> Result<usize> {
        let root = store.surface(self.surface)?.node;
        let guard = RotationGuard::normalize(store, root)?;

        let splines = store.surface(self.surface)?.splines.clone();
        let mut total = 0;
        let mut outcome = Ok(());
        for spline in splines {
            match SynthesizeColliders::new(spline)
                .with_settings(self.settings)
                .execute(store, query)
            {
                Ok(created) => total += created.len(),
                Err(err) => {
                    outcome = Err(err);
                    break;
                }
            }
        }

        guard.restore(store)?;
        outcome.map(|()| total)
    }
}
