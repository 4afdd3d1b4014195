use crate::error::Result;
use crate::scene::{SceneStore, SplineId};

/// Renames a spline's point nodes to `Point (1)`, `Point (2)`, ... in path order.
pub struct RenamePoints {
    spline: SplineId,
}

impl RenamePoints {
    /// Creates a new `RenamePoints` operation.
    #[must_use]
    pub fn new(spline: SplineId) -> Self {
        Self { spline }
    }

    /// Executes the renaming.
    ///
    /// # Errors
    ///
    /// Returns an error if the spline or one of its point nodes is missing.
    pub fn execute(&self, store: &mut SceneStore) -> Result<()> {
        for (i, node) in store.spline_point_nodes(self.spline)?.into_iter().enumerate() {
            store.node_mut(node)?.name = format!("Point ({})", i + 1);
        }
        Ok(())
    }
}
