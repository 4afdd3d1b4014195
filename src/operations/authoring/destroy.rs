use crate::error::Result;
use crate::scene::{SceneStore, SplineId, SurfaceId};

/// Deletes one spline together with its points and colliders.
pub struct DestroySpline {
    spline: SplineId,
}

impl DestroySpline {
    /// Creates a new `DestroySpline` operation.
    #[must_use]
    pub fn new(spline: SplineId) -> Self {
        Self { spline }
    }

    /// Executes the teardown.
    ///
    /// # Errors
    ///
    /// Returns an error if the spline is not in the store.
    pub fn execute(&self, store: &mut SceneStore) -> Result<()> {
        store.destroy_spline(self.spline)?;
        Ok(())
    }
}

/// Deletes every spline on a surface, leaving it empty and ready for a
/// fresh generation run.
///
/// The call is treated as authorization: nothing is confirmed and nothing
/// can be undone.
pub struct DestroySplines {
    surface: SurfaceId,
}

impl DestroySplines {
    /// Creates a new `DestroySplines` operation.
    #[must_use]
    pub fn new(surface: SurfaceId) -> Self {
        Self { surface }
    }

    /// Executes the teardown, returning how many splines were destroyed.
    ///
    /// # Errors
    ///
    /// Returns an error if the surface is not in the store.
    pub fn execute(&self, store: &mut SceneStore) -> Result<usize> {
        let splines = std::mem::take(&mut store.surface_mut(self.surface)?.splines);
        let mut destroyed = 0;
        for spline in splines {
            if store.spline(spline).is_err() {
                tracing::debug!(?spline, "skipping spline that no longer exists");
                continue;
            }
            store.destroy_spline(spline)?;
            destroyed += 1;
        }
        tracing::debug!(destroyed, "destroyed surface splines");
        Ok(destroyed)
    }
}
