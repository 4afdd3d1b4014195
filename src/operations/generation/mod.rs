mod build;
mod scan;
mod state;

pub use build::BuildPaths;
pub use scan::{CandidateVertex, ScanCandidates};
pub use state::{GenerationState, PointSet};

use crate::error::{GenerationError, GrindError, Result};
use crate::operations::colliders::SynthesizeColliders;
use crate::query::{CollisionQuery, MeshSource};
use crate::scene::{SceneStore, SplineId, SurfaceId};
use crate::settings::{ColliderGenerationSettings, GenerationTuning};

use super::RotationGuard;

/// Phases of a generation run, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Lock the surface and reset its rotation to identity.
    Normalize,
    /// Score mesh vertices into candidates.
    Scan,
    /// Trace splines through the candidates.
    Build,
    /// Drop splines with fewer than two points.
    Prune,
    /// Generate colliders for every spline on the surface.
    Synthesize,
    /// Put the rotation back and release the surface.
    Restore,
    /// Nothing left to do.
    Done,
}

/// Outcome of a single [`GenerateSplines::step`].
#[derive(Debug, Clone, PartialEq)]
pub enum Progress {
    /// The run continues with the given phase.
    Running(Phase),
    /// The run is complete.
    Finished(GenerationReport),
}

/// Summary of a completed generation run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationReport {
    /// Number of candidate vertices found by the scan.
    pub candidates: usize,
    /// Splines created by the run that survived pruning, in creation order.
    pub splines: Vec<SplineId>,
    /// Number of splines removed for having fewer than two points.
    pub pruned: usize,
    /// Number of colliders synthesized on the surface.
    pub colliders: usize,
}

/// Discovers grind splines on a surface and builds their colliders.
///
/// The run is an explicit phase sequencer: each call to [`step`](Self::step)
/// executes one [`Phase`] so a host can report progress between phases, and
/// [`run`](Self::run) drives it to the end. All working sets live in the
/// operation itself and are dropped with it.
///
/// While a run is alive its surface is marked busy and a second run on the
/// same surface fails with [`GenerationError::SurfaceBusy`]. A failing phase
/// rolls the run back before returning its error.
///
/// A run must be driven to [`Phase::Done`] or cancelled. Dropping it between
/// phases leaves the surface busy and its root rotated to identity until
/// [`SceneStore::release_surface`] unlocks it.
pub struct GenerateSplines {
    surface: SurfaceId,
    tuning: GenerationTuning,
    settings: Option<ColliderGenerationSettings>,
    phase: Phase,
    state: GenerationState,
    guard: Option<RotationGuard>,
    locked: bool,
    existing: Vec<SplineId>,
    created: Vec<SplineId>,
    report: GenerationReport,
}

impl GenerateSplines {
    /// Creates a new `GenerateSplines` run. The tuning is copied and stays
    /// fixed for the lifetime of the run.
    #[must_use]
    pub fn new(surface: SurfaceId, tuning: &GenerationTuning) -> Self {
        Self {
            surface,
            tuning: tuning.clone(),
            settings: None,
            phase: Phase::Normalize,
            state: GenerationState::new(tuning.identity_epsilon()),
            guard: None,
            locked: false,
            existing: Vec::new(),
            created: Vec::new(),
            report: GenerationReport::default(),
        }
    }

    /// Collider settings for new splines and for synthesis, instead of the
    /// surface defaults.
    #[must_use]
    pub fn with_settings(mut self, settings: Option<ColliderGenerationSettings>) -> Self {
        self.settings = settings;
        self
    }

    /// The phase the next call to [`step`](Self::step) will execute.
    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Executes the current phase.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError::Finished`] once the run is done,
    /// [`GenerationError::SurfaceBusy`] if another run holds the surface,
    /// a config error for invalid tuning, or a scene error if the surface
    /// hierarchy is inconsistent.
    pub fn step<M, Q>(&mut self, store: &mut SceneStore, mesh: &M, query: &Q) -> Result<Progress>
    where
        M: MeshSource + ?Sized,
        Q: CollisionQuery + ?Sized,
    {
        let next = match self.execute_phase(store, mesh, query) {
            Ok(next) => next,
            Err(GrindError::Generation(err)) => return Err(err.into()),
            Err(err) => {
                tracing::warn!(
                    phase = ?self.phase,
                    error = %err,
                    "generation failed, rolling back"
                );
                self.rollback(store)?;
                return Err(err);
            }
        };

        tracing::debug!(
            surface = ?self.surface,
            from = ?self.phase,
            to = ?next,
            "generation phase complete"
        );
        self.phase = next;
        if next == Phase::Done {
            Ok(Progress::Finished(self.report.clone()))
        } else {
            Ok(Progress::Running(next))
        }
    }

    /// Drives the run to completion.
    ///
    /// # Errors
    ///
    /// Returns the first error raised by [`step`](Self::step).
    pub fn run<M, Q>(
        &mut self,
        store: &mut SceneStore,
        mesh: &M,
        query: &Q,
    ) -> Result<GenerationReport>
    where
        M: MeshSource + ?Sized,
        Q: CollisionQuery + ?Sized,
    {
        loop {
            if let Progress::Finished(report) = self.step(store, mesh, query)? {
                return Ok(report);
            }
        }
    }

    /// Abandons the run between phases.
    ///
    /// Every spline created by the run is destroyed with its colliders, the
    /// surface rotation is restored and the surface is released. Colliders
    /// regenerated on splines that existed before the run are not restored.
    /// Cancelling a finished run does nothing.
    ///
    /// # Errors
    ///
    /// Returns an error if the surface root can no longer be resolved.
    pub fn cancel(&mut self, store: &mut SceneStore) -> Result<()> {
        if self.phase == Phase::Done {
            return Ok(());
        }
        tracing::info!(surface = ?self.surface, phase = ?self.phase, "generation cancelled");
        self.rollback(store)
    }

    fn execute_phase<M, Q>(
        &mut self,
        store: &mut SceneStore,
        mesh: &M,
        query: &Q,
    ) -> Result<Phase>
    where
        M: MeshSource + ?Sized,
        Q: CollisionQuery + ?Sized,
    {
        match self.phase {
            Phase::Normalize => self.normalize(store),
            Phase::Scan => self.scan(store, mesh, query),
            Phase::Build => {
                self.created = BuildPaths::new(self.surface, &self.tuning)
                    .with_settings(self.settings)
                    .execute(store, query, &mut self.state)?;
                Ok(Phase::Prune)
            }
            Phase::Prune => self.prune(store),
            Phase::Synthesize => self.synthesize(store, query),
            Phase::Restore => {
                self.release(store)?;
                tracing::info!(
                    splines = self.report.splines.len(),
                    pruned = self.report.pruned,
                    colliders = self.report.colliders,
                    "generation finished"
                );
                Ok(Phase::Done)
            }
            Phase::Done => Err(GenerationError::Finished.into()),
        }
    }

    fn normalize(&mut self, store: &mut SceneStore) -> Result<Phase> {
        self.tuning.validate()?;

        let surface = store.surface_mut(self.surface)?;
        if surface.busy {
            return Err(GenerationError::SurfaceBusy.into());
        }
        surface.busy = true;
        self.locked = true;
        self.existing.clone_from(&surface.splines);
        let root = surface.node;

        let guard = RotationGuard::normalize(store, root)?;
        store.surface_mut(self.surface)?.held_rotation = Some(guard.rotation());
        self.guard = Some(guard);
        Ok(Phase::Scan)
    }

    fn scan<M, Q>(&mut self, store: &SceneStore, mesh: &M, query: &Q) -> Result<Phase>
    where
        M: MeshSource + ?Sized,
        Q: CollisionQuery + ?Sized,
    {
        let candidates =
            ScanCandidates::new(self.surface, &self.tuning).execute(store, mesh, query)?;
        self.report.candidates = candidates.len();
        if candidates.is_empty() {
            tracing::warn!(
                surface = ?self.surface,
                "no grindable vertices found, skipping surface"
            );
            return Ok(Phase::Restore);
        }
        for candidate in candidates {
            self.state.unused.insert(candidate.position);
        }
        Ok(Phase::Build)
    }

    fn prune(&mut self, store: &mut SceneStore) -> Result<Phase> {
        let splines = store.surface(self.surface)?.splines.clone();
        for spline in splines {
            if store.point_count(spline)? < 2 {
                store.destroy_spline(spline)?;
                self.report.pruned += 1;
            }
        }
        self.created.retain(|spline| store.spline(*spline).is_ok());
        self.report.splines.clone_from(&self.created);
        Ok(Phase::Synthesize)
    }

    fn synthesize<Q: CollisionQuery + ?Sized>(
        &mut self,
        store: &mut SceneStore,
        query: &Q,
    ) -> Result<Phase> {
        let splines = store.surface(self.surface)?.splines.clone();
        for spline in splines {
            let created = SynthesizeColliders::new(spline)
                .with_settings(self.settings)
                .execute(store, query)?;
            self.report.colliders += created.len();
        }
        Ok(Phase::Restore)
    }

    /// Restores the rotation and clears the busy flag, if this run set them.
    fn release(&mut self, store: &mut SceneStore) -> Result<()> {
        if let Some(guard) = self.guard.take() {
            guard.restore(store)?;
        }
        if std::mem::take(&mut self.locked) {
            let surface = store.surface_mut(self.surface)?;
            surface.busy = false;
            surface.held_rotation = None;
        }
        Ok(())
    }

    /// Destroys every spline the run added to the surface, including those
    /// opened by a build that failed part way, then releases the surface.
    fn rollback(&mut self, store: &mut SceneStore) -> Result<()> {
        let splines = if self.locked {
            store
                .surface(self.surface)
                .map(|surface| surface.splines.clone())
                .unwrap_or_default()
        } else {
            Vec::new()
        };
        for spline in splines {
            if !self.existing.contains(&spline) {
                store.destroy_spline(spline)?;
            }
        }
        self.created.clear();
        self.phase = Phase::Done;
        self.report = GenerationReport::default();
        self.release(store)
    }
}
