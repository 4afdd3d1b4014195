use crate::math::{same_point, Point3};

/// An insertion-ordered set of points with tolerance-based identity.
#[derive(Debug, Clone)]
pub struct PointSet {
    points: Vec<Point3>,
    epsilon: f64,
}

impl PointSet {
    /// Creates an empty set; points closer than `epsilon` are the same point.
    #[must_use]
    pub fn new(epsilon: f64) -> Self {
        Self {
            points: Vec::new(),
            epsilon,
        }
    }

    /// Returns `true` if a point within epsilon is present.
    #[must_use]
    pub fn contains(&self, point: &Point3) -> bool {
        self.position(point).is_some()
    }

    /// Appends a point unless an equal one is present. Returns whether it
    /// was inserted.
    pub fn insert(&mut self, point: Point3) -> bool {
        if self.contains(&point) {
            return false;
        }
        self.points.push(point);
        true
    }

    /// Removes the first equal point, keeping the order of the rest.
    pub fn remove(&mut self, point: &Point3) -> bool {
        match self.position(point) {
            Some(index) => {
                self.points.remove(index);
                true
            }
            None => false,
        }
    }

    /// Removes and returns the first point.
    pub fn pop_front(&mut self) -> Option<Point3> {
        (!self.points.is_empty()).then(|| self.points.remove(0))
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Points in insertion order.
    #[must_use]
    pub fn as_slice(&self) -> &[Point3] {
        &self.points
    }

    fn position(&self, point: &Point3) -> Option<usize> {
        self.points
            .iter()
            .position(|p| same_point(p, point, self.epsilon))
    }
}

/// Working sets of one generation run.
///
/// Created fresh for each run and dropped with it; nothing here outlives
/// the surface it was built for.
#[derive(Debug, Clone)]
pub struct GenerationState {
    /// Candidates not yet placed on any spline, best score first.
    pub unused: PointSet,
    /// Points that terminate at least one spline.
    pub endpoints: PointSet,
    /// Points that reached their reuse limit.
    pub blocked: PointSet,
    /// Points of the spline currently being built, in path order.
    pub active: PointSet,
}

impl GenerationState {
    /// Creates empty working sets sharing one identity tolerance.
    #[must_use]
    pub fn new(epsilon: f64) -> Self {
        Self {
            unused: PointSet::new(epsilon),
            endpoints: PointSet::new(epsilon),
            blocked: PointSet::new(epsilon),
            active: PointSet::new(epsilon),
        }
    }

    /// Records that a spline terminates at `point`. A point that already
    /// terminates another spline becomes blocked.
    pub fn mark_endpoint(&mut self, point: Point3) {
        if !self.endpoints.insert(point) {
            self.blocked.insert(point);
        }
    }
}
