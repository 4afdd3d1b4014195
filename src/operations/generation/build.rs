use crate::error::Result;
use crate::math::angle::{slope_degrees, turn_degrees};
use crate::math::{same_point, Point3};
use crate::operations::authoring::{AddPoint, AddSpline};
use crate::query::CollisionQuery;
use crate::scene::{SceneStore, SplineId, SurfaceId};
use crate::settings::{ColliderGenerationSettings, GenerationTuning, MidpointTest};

use super::state::{GenerationState, PointSet};

/// Builds splines on a surface by greedy nearest-neighbour traversal of the
/// candidate pool held in a [`GenerationState`].
///
/// Each spline starts at the best remaining candidate and keeps stepping to
/// the nearest point that satisfies the slope, turn and midpoint limits and
/// that does not retrace a segment some spline already covers. When a
/// spline cannot be extended, its last point is recorded as an endpoint (or
/// blocked if it already was one) and a new spline is started wherever a
/// novel segment is still possible.
pub struct BuildPaths<'a> {
    surface: SurfaceId,
    tuning: &'a GenerationTuning,
    settings: Option<ColliderGenerationSettings>,
}

impl<'a> BuildPaths<'a> {
    /// Creates a new `BuildPaths` operation.
    #[must_use]
    pub fn new(surface: SurfaceId, tuning: &'a GenerationTuning) -> Self {
        Self {
            surface,
            tuning,
            settings: None,
        }
    }

    /// Collider settings copied into every new spline instead of the
    /// surface defaults.
    #[must_use]
    pub fn with_settings(mut self, settings: Option<ColliderGenerationSettings>) -> Self {
        self.settings = settings;
        self
    }

    /// Executes the traversal, returning the splines it created in order.
    ///
    /// Splines may end up with a single point; pruning them is left to the
    /// caller.
    ///
    /// # Errors
    ///
    /// Returns an error if the surface or one of its splines is missing.
    pub fn execute<Q: CollisionQuery + ?Sized>(
        &self,
        store: &mut SceneStore,
        query: &Q,
        state: &mut GenerationState,
    ) -> Result<Vec<SplineId>> {
        let mut created = Vec::new();

        let Some(seed) = state.unused.pop_front() else {
            return Ok(created);
        };
        state.endpoints.insert(seed);
        let mut spline = self.open_spline(store, state, seed)?;
        created.push(spline);

        loop {
            let search = self.search_set(state);
            if search.is_empty() {
                break;
            }

            let connected = self.surface_paths(store)?;
            let points = state.active.as_slice();
            let Some(current) = points.last().copied() else {
                break;
            };
            let previous = points.len().checked_sub(2).map(|i| points[i]);

            let next =
                self.next_point(store, query, &connected, &search, &current, previous.as_ref());
            if let Some(next) = next {
                state.unused.remove(&next);
                AddPoint::at(spline, next).execute(store)?;
                state.active.insert(next);
                continue;
            }

            tracing::debug!(
                ?spline,
                x = current.x,
                y = current.y,
                z = current.z,
                "spline reached a dead end"
            );
            state.mark_endpoint(current);

            // Points of the closed spline cannot start the next one, but they
            // still count as the far end of an uncovered segment.
            let starts = self.search_set(state);
            let partners = self.partner_set(state);
            let connected = self.surface_paths(store)?;
            let Some(start) = self.find_start(&connected, &starts, &partners) else {
                break;
            };

            state.unused.remove(&start);
            state.mark_endpoint(start);
            state.active.clear();
            spline = self.open_spline(store, state, start)?;
            created.push(spline);
        }

        Ok(created)
    }

    fn open_spline(
        &self,
        store: &mut SceneStore,
        state: &mut GenerationState,
        start: Point3,
    ) -> Result<SplineId> {
        let spline = AddSpline::new(self.surface)
            .at(start)
            .with_settings(self.settings)
            .execute(store)?;
        AddPoint::at(spline, start).execute(store)?;
        state.active.insert(start);
        tracing::debug!(?spline, x = start.x, y = start.y, z = start.z, "started spline");
        Ok(spline)
    }

    /// Unused candidates and endpoints, minus blocked points and points too
    /// close to a blocked point.
    fn partner_set(&self, state: &GenerationState) -> PointSet {
        let mut partners = PointSet::new(self.tuning.identity_epsilon());
        let clear_of_blocked = |p: &Point3| {
            state
                .blocked
                .as_slice()
                .iter()
                .all(|b| nalgebra::distance(p, b) > self.tuning.min_vertex_distance)
        };
        for p in state.unused.as_slice().iter().chain(state.endpoints.as_slice()) {
            if clear_of_blocked(p) && !state.blocked.contains(p) {
                partners.insert(*p);
            }
        }
        partners
    }

    /// The partner set without the points of the active spline.
    fn search_set(&self, state: &GenerationState) -> PointSet {
        let mut search = self.partner_set(state);
        for p in state.active.as_slice() {
            search.remove(p);
        }
        search
    }

    /// World points of every spline currently on the surface.
    fn surface_paths(&self, store: &SceneStore) -> Result<Vec<Vec<Point3>>> {
        let splines = store.surface(self.surface)?.splines.clone();
        let mut paths = Vec::with_capacity(splines.len());
        for spline in splines {
            paths.push(store.spline_points(spline)?);
        }
        Ok(paths)
    }

    /// Returns `true` if some spline already contains both points.
    fn connected(&self, paths: &[Vec<Point3>], a: &Point3, b: &Point3) -> bool {
        let eps = self.tuning.identity_epsilon();
        paths.iter().any(|path| {
            path.iter().any(|p| same_point(p, a, eps)) && path.iter().any(|p| same_point(p, b, eps))
        })
    }

    fn next_point<Q: CollisionQuery + ?Sized>(
        &self,
        store: &SceneStore,
        query: &Q,
        paths: &[Vec<Point3>],
        search: &PointSet,
        current: &Point3,
        previous: Option<&Point3>,
    ) -> Option<Point3> {
        let eps = self.tuning.identity_epsilon();
        let mut best = None;
        let mut best_distance = f64::INFINITY;

        for other in search.as_slice() {
            if same_point(other, current, eps) || self.connected(paths, current, other) {
                continue;
            }
            if slope_degrees(current, other) > self.tuning.max_slope {
                continue;
            }
            let turn = previous.map_or(0.0, |prev| turn_degrees(prev, current, other));
            if turn > self.tuning.max_horizontal_angle {
                continue;
            }
            if !self.midpoint_passes(store, query, current, other) {
                continue;
            }
            let d = nalgebra::distance(current, other);
            // Strict comparison: the first point found wins ties.
            if d < best_distance {
                best = Some(*other);
                best_distance = d;
            }
        }
        best
    }

    fn midpoint_passes<Q: CollisionQuery + ?Sized>(
        &self,
        store: &SceneStore,
        query: &Q,
        a: &Point3,
        b: &Point3,
    ) -> bool {
        let midpoint = nalgebra::center(a, b);
        let touches = query.overlaps_at(store, &midpoint, self.tuning.point_test_radius, None);
        match self.tuning.midpoint_test {
            MidpointTest::Clear => !touches,
            MidpointTest::Contact => touches,
        }
    }

    /// First start candidate from which a segment no spline covers can still
    /// be drawn to some partner.
    fn find_start(
        &self,
        paths: &[Vec<Point3>],
        starts: &PointSet,
        partners: &PointSet,
    ) -> Option<Point3> {
        let eps = self.tuning.identity_epsilon();
        starts
            .as_slice()
            .iter()
            .find(|p| {
                partners
                    .as_slice()
                    .iter()
                    .any(|other| !same_point(p, other, eps) && !self.connected(paths, p, other))
            })
            .copied()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::Isometry3;
    use crate::query::BoxWorld;

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z)
    }

    fn surface(store: &mut SceneStore) -> SurfaceId {
        store.create_surface("ledge", None, Isometry3::identity()).unwrap()
    }

    fn state_with(tuning: &GenerationTuning, points: &[Point3]) -> GenerationState {
        let mut state = GenerationState::new(tuning.identity_epsilon());
        for pt in points {
            state.unused.insert(*pt);
        }
        state
    }

    fn paths(store: &SceneStore, splines: &[SplineId]) -> Vec<Vec<Point3>> {
        splines.iter().map(|s| store.spline_points(*s).unwrap()).collect()
    }

    #[test]
    fn empty_pool_builds_nothing() {
        let mut store = SceneStore::new();
        let surface = surface(&mut store);
        let tuning = GenerationTuning::default();
        let mut state = state_with(&tuning, &[]);
        let out = BuildPaths::new(surface, &tuning)
            .execute(&mut store, &BoxWorld::new(), &mut state)
            .unwrap();
        assert!(out.is_empty());
        assert_eq!(store.spline_count(), 0);
    }

    #[test]
    fn walks_nearest_points_in_order() {
        let mut store = SceneStore::new();
        let surface = surface(&mut store);
        let tuning = GenerationTuning::default();
        let mut state = state_with(
            &tuning,
            &[p(0.0, 0.0, 0.0), p(1.0, 0.0, 0.0), p(0.5, 0.0, 0.0), p(1.5, 0.0, 0.0)],
        );
        let out = BuildPaths::new(surface, &tuning)
            .execute(&mut store, &BoxWorld::new(), &mut state)
            .unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(
            paths(&store, &out)[0],
            vec![p(0.0, 0.0, 0.0), p(0.5, 0.0, 0.0), p(1.0, 0.0, 0.0), p(1.5, 0.0, 0.0)]
        );
    }

    #[test]
    fn steep_segments_are_rejected() {
        let mut store = SceneStore::new();
        let surface = surface(&mut store);
        let tuning = GenerationTuning::default();
        // 0 -> 1 rises at ~63 degrees, above the 60 degree limit.
        let mut state = state_with(&tuning, &[p(0.0, 0.0, 0.0), p(0.5, 1.0, 0.0)]);
        let out = BuildPaths::new(surface, &tuning)
            .execute(&mut store, &BoxWorld::new(), &mut state)
            .unwrap();
        let points = paths(&store, &out);
        assert!(points.iter().all(|path| path.len() < 2));
    }

    #[test]
    fn sharp_turns_split_the_path() {
        let mut store = SceneStore::new();
        let surface = surface(&mut store);
        let tuning = GenerationTuning::default();
        let mut state = state_with(
            &tuning,
            &[
                p(0.0, 0.0, 0.0),
                p(1.0, 0.0, 0.0),
                p(2.0, 0.0, 0.0),
                p(2.0, 0.0, 1.0),
                p(2.0, 0.0, 2.0),
            ],
        );
        let out = BuildPaths::new(surface, &tuning)
            .execute(&mut store, &BoxWorld::new(), &mut state)
            .unwrap();
        let points = paths(&store, &out);
        // After the corner, restarts may bridge to points of closed splines.
        assert_eq!(
            points,
            vec![
                vec![p(0.0, 0.0, 0.0), p(1.0, 0.0, 0.0), p(2.0, 0.0, 0.0)],
                vec![p(2.0, 0.0, 1.0), p(2.0, 0.0, 2.0)],
                vec![p(0.0, 0.0, 0.0), p(2.0, 0.0, 1.0)],
                vec![p(2.0, 0.0, 0.0), p(2.0, 0.0, 2.0)],
            ]
        );
        assert!(state.unused.is_empty());
    }

    #[test]
    fn corner_return_leg_reaches_the_closed_spline() {
        let mut store = SceneStore::new();
        let surface = surface(&mut store);
        // Keeps the first point from bridging straight to the corner vertex.
        let post = store.spawn("post", None, Isometry3::identity()).unwrap();
        let mut world = BoxWorld::new();
        world.add_box(post, p(0.9, -0.5, 0.2), p(1.1, 0.5, 0.3));

        let tuning = GenerationTuning::default();
        let corner = p(2.0, 0.0, 0.5);
        let mut state = state_with(
            &tuning,
            &[
                p(0.0, 0.0, 0.0),
                p(0.5, 0.0, 0.0),
                p(1.0, 0.0, 0.0),
                p(1.5, 0.0, 0.0),
                p(2.0, 0.0, 0.0),
                corner,
            ],
        );
        let out = BuildPaths::new(surface, &tuning)
            .execute(&mut store, &world, &mut state)
            .unwrap();
        let points: Vec<_> = paths(&store, &out)
            .into_iter()
            .filter(|path| path.len() >= 2)
            .collect();
        assert_eq!(
            points,
            vec![
                vec![
                    p(0.0, 0.0, 0.0),
                    p(0.5, 0.0, 0.0),
                    p(1.0, 0.0, 0.0),
                    p(1.5, 0.0, 0.0),
                    p(2.0, 0.0, 0.0),
                ],
                vec![corner, p(2.0, 0.0, 0.0)],
            ]
        );
    }

    #[test]
    fn points_near_a_blocked_point_are_never_used() {
        let mut store = SceneStore::new();
        let surface = surface(&mut store);
        let tuning = GenerationTuning::default();
        let near = p(1.53, 0.0, 0.0);
        let mut state = state_with(
            &tuning,
            &[p(0.0, 0.0, 0.0), p(0.5, 0.0, 0.0), p(1.0, 0.0, 0.0), near],
        );
        // Ending twice on the same point blocks it.
        state.mark_endpoint(p(1.5, 0.0, 0.0));
        state.mark_endpoint(p(1.5, 0.0, 0.0));
        assert!(state.blocked.contains(&p(1.5, 0.0, 0.0)));

        let out = BuildPaths::new(surface, &tuning)
            .execute(&mut store, &BoxWorld::new(), &mut state)
            .unwrap();
        let points = paths(&store, &out);
        assert_eq!(
            points,
            vec![vec![p(0.0, 0.0, 0.0), p(0.5, 0.0, 0.0), p(1.0, 0.0, 0.0)]]
        );
        assert!(state.unused.contains(&near));
    }

    #[test]
    fn blocked_midpoint_prevents_segment() {
        let mut store = SceneStore::new();
        let surface = surface(&mut store);
        let blocker = store.spawn("post", None, Isometry3::identity()).unwrap();
        let mut world = BoxWorld::new();
        world.add_box(blocker, p(0.45, -0.5, -0.5), p(0.55, 0.5, 0.5));

        let tuning = GenerationTuning::default();
        let mut state = state_with(&tuning, &[p(0.0, 0.0, 0.0), p(1.0, 0.0, 0.0)]);
        let out = BuildPaths::new(surface, &tuning)
            .execute(&mut store, &world, &mut state)
            .unwrap();
        assert!(paths(&store, &out).iter().all(|path| path.len() < 2));
    }

    #[test]
    fn contact_midpoint_requires_geometry() {
        let mut store = SceneStore::new();
        let surface = surface(&mut store);
        let root = store.surface(surface).unwrap().node;
        let mut world = BoxWorld::new();
        world.add_box(root, p(-1.0, -1.0, 0.0), p(2.0, 0.0, 1.0));

        let tuning = GenerationTuning {
            midpoint_test: MidpointTest::Contact,
            ..GenerationTuning::default()
        };
        let mut state = state_with(
            &tuning,
            &[p(0.0, 0.0, 0.0), p(1.0, 0.0, 0.0), p(1.0, 0.0, -3.0)],
        );
        let out = BuildPaths::new(surface, &tuning)
            .execute(&mut store, &world, &mut state)
            .unwrap();
        let points = paths(&store, &out);
        assert_eq!(points[0], vec![p(0.0, 0.0, 0.0), p(1.0, 0.0, 0.0)]);
        assert!(points.iter().all(|path| !path.contains(&p(1.0, 0.0, -3.0)) || path.len() == 1));
    }

    #[test]
    fn working_sets_track_endpoints() {
        let mut store = SceneStore::new();
        let surface = surface(&mut store);
        let tuning = GenerationTuning::default();
        let mut state = state_with(
            &tuning,
            &[p(0.0, 0.0, 0.0), p(1.0, 0.0, 0.0), p(2.0, 0.0, 0.0)],
        );
        BuildPaths::new(surface, &tuning)
            .execute(&mut store, &BoxWorld::new(), &mut state)
            .unwrap();
        assert!(state.unused.is_empty());
        assert!(state.endpoints.contains(&p(0.0, 0.0, 0.0)));
        assert!(state.blocked.is_empty());
    }
}
