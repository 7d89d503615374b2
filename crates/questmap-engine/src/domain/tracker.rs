//! Zone progression: per-zone completion and the active-zone derivation.

use std::sync::Arc;

use questmap_core::error::GameError;
use questmap_core::rules::PassThreshold;
use questmap_core::zone::{Zone, ZoneCatalog};
use serde::Serialize;
use tracing::info;

use super::session::QuizSession;

/// Drops cached question sets. Implemented by the question cache.
pub trait CacheInvalidation: Send + Sync {
    /// Drops every cached set for `zone_id`, whatever its question count.
    fn invalidate(&self, zone_id: u32);

    /// Drops every cached set.
    fn invalidate_all(&self);
}

/// Completion status of one zone.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ZoneProgress {
    /// Set once the zone's quiz is passed; cleared only by a reset.
    pub completed: bool,
}

/// Result of evaluating a finished quiz.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ZoneOutcome {
    /// The evaluated zone.
    pub zone_id: u32,
    /// Whether the zone is now complete.
    pub passed: bool,
    /// Correct answers given.
    pub correct: usize,
    /// Correct answers required.
    pub required: usize,
    /// Questions asked.
    pub total: usize,
}

/// Single source of truth for zone completion.
///
/// The active zone is derived from the progress list on every call rather
/// than stored, so it cannot drift from the completion flags.
#[derive(Debug, Clone)]
pub struct ZoneTracker {
    catalog: Arc<ZoneCatalog>,
    progress: Vec<ZoneProgress>,
}

impl ZoneTracker {
    /// Creates a tracker with every zone incomplete.
    #[must_use]
    pub fn new(catalog: Arc<ZoneCatalog>) -> Self {
        let progress = vec![ZoneProgress::default(); catalog.len()];
        Self { catalog, progress }
    }

    /// Lowest zone id that is not yet completed, or `None` when all are.
    #[must_use]
    pub fn active_zone_id(&self) -> Option<u32> {
        self.progress
            .iter()
            .position(|zone| !zone.completed)
            .and_then(|position| u32::try_from(position).ok())
    }

    /// The full configuration of the active zone.
    #[must_use]
    pub fn active_zone(&self) -> Option<&Zone> {
        self.active_zone_id().and_then(|id| self.catalog.get(id))
    }

    /// Evaluates a finished session for `zone_id`. On a pass the zone is
    /// marked completed and its cached question sets are dropped.
    ///
    /// # Errors
    ///
    /// Returns `GameError::StaleZoneEvaluation` if `zone_id` is not the
    /// active zone or the session belongs to a different zone. No state
    /// changes in that case.
    pub fn evaluate_and_record(
        &mut self,
        zone_id: u32,
        session: &QuizSession,
        threshold: PassThreshold,
        cache: &dyn CacheInvalidation,
    ) -> Result<ZoneOutcome, GameError> {
        let active = self.active_zone_id();
        if active != Some(zone_id) || session.zone_id() != zone_id {
            return Err(GameError::StaleZoneEvaluation { zone_id, active });
        }

        let outcome = ZoneOutcome {
            zone_id,
            passed: session.passed(threshold),
            correct: session.correct_count(),
            required: session.questions_needed(threshold),
            total: session.total(),
        };

        if outcome.passed {
            self.progress[zone_id as usize].completed = true;
            cache.invalidate(zone_id);
        }
        info!(
            zone_id,
            passed = outcome.passed,
            correct = outcome.correct,
            required = outcome.required,
            "zone evaluated"
        );
        Ok(outcome)
    }

    /// True iff `zone_id` is the last zone in the catalog.
    #[must_use]
    pub fn is_final_zone(&self, zone_id: u32) -> bool {
        zone_id == self.catalog.final_zone_id()
    }

    /// Marks every zone incomplete. Cache and session are left to the caller.
    pub fn reset(&mut self) {
        self.progress.fill(ZoneProgress::default());
    }

    /// Whether `zone_id` has been completed. Unknown ids are never completed.
    #[must_use]
    pub fn is_completed(&self, zone_id: u32) -> bool {
        self.progress
            .get(zone_id as usize)
            .is_some_and(|zone| zone.completed)
    }

    /// Number of completed zones.
    #[must_use]
    pub fn completed_count(&self) -> usize {
        self.progress.iter().filter(|zone| zone.completed).count()
    }

    /// Progress of every zone, indexed by zone id.
    #[must_use]
    pub fn progress(&self) -> &[ZoneProgress] {
        &self.progress
    }

    /// The zone catalog.
    #[must_use]
    pub fn catalog(&self) -> &ZoneCatalog {
        &self.catalog
    }
}
