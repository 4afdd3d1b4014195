use crate::error::Result;
use crate::math::angle::horizontal_directions;
use crate::math::{up, Point3, Vector3};
use crate::query::{CollisionQuery, MeshSource};
use crate::scene::{NodeId, SceneStore, SurfaceId};
use crate::settings::GenerationTuning;

use super::state::PointSet;

/// A mesh vertex that passed open-space probing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CandidateVertex {
    /// World-space position.
    pub position: Point3,
    /// Number of open horizontal directions, 1 to 8.
    pub score: u8,
}

/// Filters a surface's mesh vertices down to scored open-space candidates.
///
/// A vertex qualifies when the space just above it is free and at least one
/// of the eight horizontal directions around it is free. Its score is the
/// number of free horizontal directions. The result is deduplicated by
/// position and ordered by descending score, ties in scan order.
pub struct ScanCandidates<'a> {
    surface: SurfaceId,
    tuning: &'a GenerationTuning,
}

impl<'a> ScanCandidates<'a> {
    /// Creates a new `ScanCandidates` query.
    #[must_use]
    pub fn new(surface: SurfaceId, tuning: &'a GenerationTuning) -> Self {
        Self { surface, tuning }
    }

    /// Executes the scan.
    ///
    /// An empty result is not an error; the caller decides how to handle a
    /// surface without candidates.
    ///
    /// # Errors
    ///
    /// Returns an error if the surface is not in the store.
    pub fn execute<M, Q>(
        &self,
        store: &SceneStore,
        mesh: &M,
        query: &Q,
    ) -> Result<Vec<CandidateVertex>>
    where
        M: MeshSource + ?Sized,
        Q: CollisionQuery + ?Sized,
    {
        let root = store.surface(self.surface)?.node;
        let restrict_to = self.tuning.restrict_to_self_colliders.then_some(root);
        let directions = horizontal_directions();

        let mut seen = PointSet::new(self.tuning.identity_epsilon());
        let mut candidates = Vec::new();
        let mut scanned = 0_usize;

        for vertex in mesh.vertices_of(store, root, self.tuning.max_vertices) {
            scanned += 1;
            let score = self.score(store, query, restrict_to, &vertex.position, &directions);
            let Some(score) = score else {
                continue;
            };
            if seen.insert(vertex.position) {
                candidates.push(CandidateVertex {
                    position: vertex.position,
                    score,
                });
            }
        }

        // Stable sort: equal scores keep scan order.
        candidates.sort_by(|a, b| b.score.cmp(&a.score));

        tracing::info!(
            scanned,
            candidates = candidates.len(),
            "found potential grind vertices"
        );
        Ok(candidates)
    }

    fn score<Q: CollisionQuery + ?Sized>(
        &self,
        store: &SceneStore,
        query: &Q,
        restrict_to: Option<NodeId>,
        vertex: &Point3,
        directions: &[Vector3],
    ) -> Option<u8> {
        let is_open = |dir: &Vector3| {
            let probe = vertex + dir * self.tuning.point_test_offset;
            !query.overlaps_at(store, &probe, self.tuning.point_test_radius, restrict_to)
        };

        if !is_open(&up()) {
            return None;
        }
        let open = directions.iter().filter(|dir| is_open(dir)).count();
        u8::try_from(open).ok().filter(|score| *score > 0)
    }
}
