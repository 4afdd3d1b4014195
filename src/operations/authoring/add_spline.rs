use crate::error::Result;
use crate::math::{Isometry3, Point3};
use crate::scene::{SceneStore, SplineData, SplineId, SurfaceId};
use crate::settings::ColliderGenerationSettings;

/// Creates an empty spline on a surface, using the surface's defaults.
///
/// The spline node is parented under the surface root and gets a child
/// `Points` container for its point nodes.
pub struct AddSpline {
    surface: SurfaceId,
    position: Option<Point3>,
    settings: Option<ColliderGenerationSettings>,
}

impl AddSpline {
    /// Creates a new `AddSpline` operation.
    #[must_use]
    pub fn new(surface: SurfaceId) -> Self {
        Self {
            surface,
            position: None,
            settings: None,
        }
    }

    /// Places the spline node at a world position instead of the surface origin.
    #[must_use]
    pub fn at(mut self, position: Point3) -> Self {
        self.position = Some(position);
        self
    }

    /// Overrides the surface's default collider settings.
    #[must_use]
    pub fn with_settings(mut self, settings: Option<ColliderGenerationSettings>) -> Self {
        self.settings = settings;
        self
    }

    /// Executes the operation, creating the spline in the scene store.
    ///
    /// # Errors
    ///
    /// Returns an error if the surface or its root node is missing.
    pub fn execute(&self, store: &mut SceneStore) -> Result<SplineId> {
        let surface = store.surface(self.surface)?;
        let root = surface.node;
        let surface_type = surface.surface_type;
        let is_round = surface.is_round;
        let settings = self.settings.unwrap_or(surface.collider_settings);

        let node = match &self.position {
            Some(position) => store.spawn_at("GrindSpline", Some(root), position)?,
            None => store.spawn("GrindSpline", Some(root), Isometry3::identity())?,
        };
        let points = store.spawn("Points", Some(node), Isometry3::identity())?;

        let mut data = SplineData::new(node);
        data.surface = Some(self.surface);
        data.points_container = points;
        data.surface_type = surface_type;
        data.is_round = is_round;
        data.settings = settings;

        Ok(store.add_spline(data)?)
    }
}
