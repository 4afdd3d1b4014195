use crate::error::{Result, SceneError};
use crate::scene::{SceneStore, SplineId};

use super::RenamePoints;

/// Removes one point from a spline and renumbers the rest.
///
/// Colliders are left as they are; regenerate them afterwards.
pub struct RemovePoint {
    spline: SplineId,
    index: usize,
}

impl RemovePoint {
    /// Creates a new `RemovePoint` operation.
    #[must_use]
    pub fn new(spline: SplineId, index: usize) -> Self {
        Self { spline, index }
    }

    /// Executes the removal.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::PointOutOfRange`] if `index` is past the end of
    /// the spline, or an error if the spline is missing.
    pub fn execute(&self, store: &mut SceneStore) -> Result<()> {
        let nodes = store.spline_point_nodes(self.spline)?;
        let node = *nodes.get(self.index).ok_or(SceneError::PointOutOfRange {
            index: self.index,
            len: nodes.len(),
        })?;
        store.despawn(node)?;
        RenamePoints::new(self.spline).execute(store)
    }
}
