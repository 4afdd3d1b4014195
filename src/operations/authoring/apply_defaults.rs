use crate::error::Result;
use crate::scene::{SceneStore, SurfaceId};

/// Re-applies a surface's default type, roundness and collider settings to
/// all of its existing splines.
///
/// Defaults are otherwise only copied when a spline is created.
pub struct ApplySurfaceDefaults {
    surface: SurfaceId,
}

impl ApplySurfaceDefaults {
    /// Creates a new `ApplySurfaceDefaults` operation.
    #[must_use]
    pub fn new(surface: SurfaceId) -> Self {
        Self { surface }
    }

    /// Executes the operation, returning how many splines were updated.
    ///
    /// # Errors
    ///
    /// Returns an error if the surface, a spline, or a spline node is missing.
    pub fn execute(&self, store: &mut SceneStore) -> Result<usize> {
        let surface = store.surface(self.surface)?;
        let splines = surface.splines.clone();
        let (surface_type, is_round, settings) =
            (surface.surface_type, surface.is_round, surface.collider_settings);

        for &spline in &splines {
            let data = store.spline_mut(spline)?;
            data.surface_type = surface_type;
            data.is_round = is_round;
            data.settings = settings;
            data.normalize();
            let (node, name) = (data.node, data.display_name());
            store.node_mut(node)?.name = name;
        }
        Ok(splines.len())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::Isometry3;
    use crate::operations::authoring::AddSpline;
    use crate::scene::SurfaceType;
    use crate::settings::ColliderKind;

    #[test]
    fn defaults_are_not_retroactive_until_applied() {
        let mut store = SceneStore::new();
        let surface = store.create_surface("rail", None, Isometry3::identity()).unwrap();
        let spline = AddSpline::new(surface).execute(&mut store).unwrap();

        {
            let s = store.surface_mut(surface).unwrap();
            s.surface_type = SurfaceType::Metal;
            s.is_round = true;
        }
        assert_eq!(store.spline(spline).unwrap().surface_type, SurfaceType::Concrete);

        assert_eq!(ApplySurfaceDefaults::new(surface).execute(&mut store).unwrap(), 1);
        let data = store.spline(spline).unwrap();
        assert_eq!(data.surface_type, SurfaceType::Metal);
        assert_eq!(data.settings.kind, ColliderKind::Capsule);
        assert_eq!(store.node(data.node).unwrap().name, "GrindSpline_Grind_Metal_Round");
    }
}
