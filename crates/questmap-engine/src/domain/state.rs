//! Game state: phase, progression, the active quiz and the event journal.
//!
//! Every action takes the current state by `&mut self` and either moves it to
//! the next valid state or fails without changing it.

use std::sync::Arc;

use questmap_core::error::GameError;
use questmap_core::event::{Clock, EventMetadata};
use questmap_core::question::Question;
use questmap_core::rules::GameRules;
use questmap_core::zone::{Zone, ZoneCatalog};
use serde::Serialize;
use tracing::{debug, info, warn};

use super::events::{GameEvent, GameEventKind};
use super::session::{AnswerOutcome, QuizSession};
use super::tracker::{CacheInvalidation, ZoneOutcome, ZoneTracker};

/// Top-level screen of the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GamePhase {
    /// Title screen; nothing has been played yet.
    Splash,
    /// Zones are being played.
    Playing,
    /// The final zone has been passed.
    Finished,
}

impl GamePhase {
    /// Upper-case name, as shown to presentation.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Splash => "SPLASH",
            Self::Playing => "PLAYING",
            Self::Finished => "FINISHED",
        }
    }
}

/// A question fetch requested by [`GameState::begin_zone_load`], tagged with
/// the generation it was issued under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZoneLoad {
    /// The zone to load.
    pub zone: Zone,
    /// Number of questions to request.
    pub count: u32,
    /// Reset generation at the time of the request.
    pub generation: u64,
}

/// Summary of a quiz that just started.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct QuizStarted {
    /// The zone being played.
    pub zone_id: u32,
    /// Number of questions loaded.
    pub question_count: usize,
    /// Correct answers needed to pass.
    pub questions_needed: usize,
}

/// The whole mutable state of one game.
#[derive(Debug, Clone)]
pub struct GameState {
    tracker: ZoneTracker,
    session: Option<QuizSession>,
    phase: GamePhase,
    score: u32,
    generation: u64,
    rules: GameRules,
    journal: Vec<GameEvent>,
}

impl GameState {
    /// A fresh game on the splash screen.
    #[must_use]
    pub fn new(catalog: Arc<ZoneCatalog>, rules: GameRules) -> Self {
        Self {
            tracker: ZoneTracker::new(catalog),
            session: None,
            phase: GamePhase::Splash,
            score: 0,
            generation: 0,
            rules,
            journal: Vec::new(),
        }
    }

    /// Leaves the splash screen.
    ///
    /// # Errors
    ///
    /// Returns `GameError::InvalidPhase` unless the phase is `Splash`.
    pub fn start_game(&mut self, clock: &dyn Clock) -> Result<(), GameError> {
        if self.phase != GamePhase::Splash {
            return Err(self.invalid_phase("start_game"));
        }
        self.enter_playing(clock);
        Ok(())
    }

    /// Describes the fetch needed to start the active zone's quiz.
    ///
    /// Starting a zone from the splash screen is allowed and starts the game
    /// once the questions arrive.
    ///
    /// # Errors
    ///
    /// Returns `GameError::InvalidPhase` once the game is finished, or
    /// `GameError::NoActiveZone` if every zone is complete.
    pub fn begin_zone_load(&self) -> Result<ZoneLoad, GameError> {
        if self.phase == GamePhase::Finished {
            return Err(self.invalid_phase("start_active_zone"));
        }
        let zone = self.tracker.active_zone().ok_or(GameError::NoActiveZone)?;
        Ok(ZoneLoad {
            zone: zone.clone(),
            count: zone.question_count,
            generation: self.generation,
        })
    }

    /// Starts a quiz with the questions fetched for `load`, replacing any
    /// quiz already in progress.
    ///
    /// # Errors
    ///
    /// Returns `GameError::FetchSuperseded` if the game was reset, finished,
    /// or moved to another zone while the fetch was in flight, and
    /// `GameError::EmptyQuestionSet` if `questions` is empty. State is
    /// unchanged in both cases.
    pub fn apply_loaded(
        &mut self,
        load: &ZoneLoad,
        questions: Arc<[Question]>,
        clock: &dyn Clock,
    ) -> Result<QuizStarted, GameError> {
        if load.generation != self.generation
            || self.phase == GamePhase::Finished
            || self.tracker.active_zone_id() != Some(load.zone.id)
        {
            warn!(
                zone_id = load.zone.id,
                generation = load.generation,
                current_generation = self.generation,
                "discarding stale question fetch"
            );
            return Err(GameError::FetchSuperseded);
        }

        let session = QuizSession::start(load.zone.id, questions)?;
        if self.phase == GamePhase::Splash {
            self.enter_playing(clock);
        }

        let started = QuizStarted {
            zone_id: session.zone_id(),
            question_count: session.total(),
            questions_needed: session.questions_needed(self.rules.pass_threshold),
        };
        if let Some(previous) = self.session.replace(session) {
            debug!(zone_id = previous.zone_id(), "replacing unfinished quiz");
        }
        info!(
            zone_id = started.zone_id,
            question_count = started.question_count,
            "quiz started"
        );
        self.record(
            GameEventKind::ZoneStarted {
                zone_id: started.zone_id,
                question_count: started.question_count,
            },
            clock,
        );
        Ok(started)
    }

    /// Scores `choice` against the current question and updates the score.
    ///
    /// # Errors
    ///
    /// Returns `GameError::NoActiveQuiz` without a quiz, or
    /// `GameError::ChoiceOutOfRange` for an invalid choice.
    pub fn submit_answer(
        &mut self,
        choice: usize,
        clock: &dyn Clock,
    ) -> Result<AnswerOutcome, GameError> {
        let session = self.session.as_mut().ok_or(GameError::NoActiveQuiz)?;
        let zone_id = session.zone_id();
        let question_index = session.current_index();
        let outcome = session.submit_answer(choice)?;

        let correct = match outcome {
            AnswerOutcome::AlreadyAnswered => return Ok(outcome),
            AnswerOutcome::Correct => {
                self.score = self.score.saturating_add(self.rules.points_per_correct);
                true
            }
            AnswerOutcome::Incorrect { .. } => {
                self.score = self.score.saturating_sub(self.rules.points_per_incorrect);
                false
            }
        };
        debug!(zone_id, question_index, correct, score = self.score, "answer recorded");
        self.record(
            GameEventKind::AnswerRecorded {
                zone_id,
                question_index,
                correct,
            },
            clock,
        );
        Ok(outcome)
    }

    /// Moves to the next question. Returns `false` if the current question
    /// is unanswered or the quiz has no questions left.
    ///
    /// # Errors
    ///
    /// Returns `GameError::NoActiveQuiz` without a quiz.
    pub fn next_question(&mut self) -> Result<bool, GameError> {
        let session = self.session.as_mut().ok_or(GameError::NoActiveQuiz)?;
        Ok(session.advance())
    }

    /// Evaluates the finished quiz, records the outcome and clears the quiz.
    ///
    /// Passing the final zone finishes the game. Otherwise the phase stays
    /// `Playing` and the next zone becomes active on a pass.
    ///
    /// # Errors
    ///
    /// Returns `GameError::NoActiveQuiz` without a quiz,
    /// `GameError::QuizIncomplete` while questions remain unanswered and
    /// `GameError::StaleZoneEvaluation` if the tracker rejects the quiz's
    /// zone. The quiz, score and journal are unchanged on any error.
    pub fn finish_quiz(
        &mut self,
        cache: &dyn CacheInvalidation,
        clock: &dyn Clock,
    ) -> Result<ZoneOutcome, GameError> {
        let session = match &self.session {
            None => return Err(GameError::NoActiveQuiz),
            Some(session) if !session.all_answered() => return Err(GameError::QuizIncomplete),
            Some(session) => session,
        };

        let zone_id = session.zone_id();
        let outcome =
            self.tracker
                .evaluate_and_record(zone_id, session, self.rules.pass_threshold, cache)?;
        self.session = None;
        self.record(
            GameEventKind::ZoneEvaluated {
                zone_id,
                correct: outcome.correct,
                required: outcome.required,
                passed: outcome.passed,
            },
            clock,
        );

        if outcome.passed && self.tracker.is_final_zone(zone_id) {
            self.phase = GamePhase::Finished;
            info!(score = self.score, "final zone passed, game finished");
            self.record(GameEventKind::GameFinished { score: self.score }, clock);
        }
        Ok(outcome)
    }

    /// Closes the quiz without evaluating it. Progress and cached questions
    /// are untouched, so a retry sees the same set.
    ///
    /// # Errors
    ///
    /// Returns `GameError::NoActiveQuiz` without a quiz.
    pub fn abandon_quiz(&mut self, clock: &dyn Clock) -> Result<(), GameError> {
        let session = self.session.take().ok_or(GameError::NoActiveQuiz)?;
        info!(zone_id = session.zone_id(), "quiz abandoned");
        self.record(
            GameEventKind::QuizAbandoned {
                zone_id: session.zone_id(),
            },
            clock,
        );
        Ok(())
    }

    /// Starts over: clears progression, every cached question set and the
    /// active quiz, then returns to the splash screen.
    ///
    /// Bumps the generation so fetches issued before the reset are discarded.
    pub fn reset(&mut self, cache: &dyn CacheInvalidation, clock: &dyn Clock) {
        self.tracker.reset();
        cache.invalidate_all();
        self.session = None;
        self.phase = GamePhase::Splash;
        self.generation = self.generation.wrapping_add(1);
        self.score = 0;
        info!(generation = self.generation, "game reset");
        self.record(GameEventKind::GameReset, clock);
    }

    /// Current phase.
    #[must_use]
    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    /// Running score.
    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    /// Number of resets so far.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Scoring rules.
    #[must_use]
    pub fn rules(&self) -> &GameRules {
        &self.rules
    }

    /// Zone progression.
    #[must_use]
    pub fn tracker(&self) -> &ZoneTracker {
        &self.tracker
    }

    /// The active quiz, if any.
    #[must_use]
    pub fn session(&self) -> Option<&QuizSession> {
        self.session.as_ref()
    }

    /// Every event recorded since the game was created, oldest first.
    #[must_use]
    pub fn journal(&self) -> &[GameEvent] {
        &self.journal
    }

    fn enter_playing(&mut self, clock: &dyn Clock) {
        self.phase = GamePhase::Playing;
        info!("game started");
        self.record(GameEventKind::GameStarted, clock);
    }

    fn invalid_phase(&self, action: &'static str) -> GameError {
        GameError::InvalidPhase {
            action,
            phase: self.phase.as_str(),
        }
    }

    fn record(&mut self, kind: GameEventKind, clock: &dyn Clock) {
        let sequence_number = self.journal.len() as u64 + 1;
        self.journal.push(GameEvent {
            metadata: EventMetadata::next(kind.event_type(), sequence_number, clock),
            kind,
        });
    }
}
