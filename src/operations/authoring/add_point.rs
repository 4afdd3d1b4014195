use crate::error::Result;
use crate::math::{Point3, Vector3};
use crate::scene::{NodeId, SceneStore, SplineId};

/// Appends a point node to a spline.
///
/// Without an explicit position the point is placed at the container
/// origin for an empty spline, or one unit along world +Z from the last
/// point otherwise.
pub struct AddPoint {
    spline: SplineId,
    position: Option<Point3>,
}

impl AddPoint {
    /// Appends a point at a world position.
    #[must_use]
    pub fn at(spline: SplineId, position: Point3) -> Self {
        Self {
            spline,
            position: Some(position),
        }
    }

    /// Appends a point extrapolated from the current end of the spline.
    #[must_use]
    pub fn extend(spline: SplineId) -> Self {
        Self {
            spline,
            position: None,
        }
    }

    /// Executes the operation, returning the new point node.
    ///
    /// # Errors
    ///
    /// Returns an error if the spline or its point container is missing.
    pub fn execute(&self, store: &mut SceneStore) -> Result<NodeId> {
        let container = store.spline(self.spline)?.points_container;
        let nodes = store.spline_point_nodes(self.spline)?;

        let position = match (self.position, nodes.last()) {
            (Some(position), _) => position,
            (None, Some(last)) => store.world_position(*last)? + Vector3::z(),
            (None, None) => store.world_position(container)?,
        };

        let name = format!("Point ({})", nodes.len() + 1);
        Ok(store.spawn_at(name, Some(container), &position)?)
    }
}
