//! The game facade: the only mutation path exposed to presentation.
//!
//! Synchronous actions run under one lock on the game state. Starting a zone
//! releases the lock while questions are fetched and re-checks the reset
//! generation before applying them.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use questmap_core::error::GameError;
use questmap_core::event::Clock;
use questmap_core::rules::GameRules;
use questmap_core::source::QuestionSource;
use questmap_core::zone::ZoneCatalog;
use tracing::{info, instrument, warn};

use super::cache::QuestionCache;
use super::view::GameView;
use crate::domain::events::GameEvent;
use crate::domain::session::AnswerOutcome;
use crate::domain::state::{GameState, QuizStarted};
use crate::domain::tracker::ZoneOutcome;

/// One game, shared by every caller.
pub struct Game {
    state: Mutex<GameState>,
    cache: QuestionCache,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for Game {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Game")
            .field("state", &*self.state())
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}

impl Game {
    /// Creates a game on the splash screen.
    #[must_use]
    pub fn new(
        catalog: Arc<ZoneCatalog>,
        rules: GameRules,
        source: Arc<dyn QuestionSource>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        info!(
            zones = catalog.len(),
            pass_threshold = rules.pass_threshold.fraction(),
            "game created"
        );
        Self {
            state: Mutex::new(GameState::new(catalog, rules)),
            cache: QuestionCache::new(source),
            clock,
        }
    }

    /// Leaves the splash screen.
    ///
    /// # Errors
    ///
    /// See [`GameState::start_game`].
    pub fn start_game(&self) -> Result<(), GameError> {
        self.state().start_game(self.clock.as_ref())
    }

    /// Fetches the active zone's questions through the cache and starts a
    /// quiz with them.
    ///
    /// # Errors
    ///
    /// Returns the state errors of [`GameState::begin_zone_load`] and
    /// [`GameState::apply_loaded`], or `GameError::SourceUnavailable` /
    /// `GameError::MalformedResponse` when the fetch fails. A failure leaves
    /// the game as it was.
    #[instrument(skip(self))]
    pub async fn start_active_zone(&self) -> Result<QuizStarted, GameError> {
        let load = self.state().begin_zone_load()?;
        let questions = match self.cache.get_or_fetch(&load.zone, load.count).await {
            Ok(questions) => questions,
            Err(error) => {
                warn!(zone_id = load.zone.id, %error, "could not load zone questions");
                return Err(error.into());
            }
        };
        self.state()
            .apply_loaded(&load, questions, self.clock.as_ref())
    }

    /// Scores an answer to the current question.
    ///
    /// # Errors
    ///
    /// See [`GameState::submit_answer`].
    pub fn submit_answer(&self, choice: usize) -> Result<AnswerOutcome, GameError> {
        self.state().submit_answer(choice, self.clock.as_ref())
    }

    /// Moves to the next question.
    ///
    /// # Errors
    ///
    /// See [`GameState::next_question`].
    pub fn next_question(&self) -> Result<bool, GameError> {
        self.state().next_question()
    }

    /// Evaluates the finished quiz.
    ///
    /// # Errors
    ///
    /// See [`GameState::finish_quiz`].
    pub fn finish_quiz(&self) -> Result<ZoneOutcome, GameError> {
        self.state().finish_quiz(&self.cache, self.clock.as_ref())
    }

    /// Closes the quiz without evaluating it.
    ///
    /// # Errors
    ///
    /// See [`GameState::abandon_quiz`].
    pub fn abandon_quiz(&self) -> Result<(), GameError> {
        self.state().abandon_quiz(self.clock.as_ref())
    }

    /// Starts over from the splash screen.
    pub fn reset_game(&self) {
        self.state().reset(&self.cache, self.clock.as_ref());
    }

    /// Read-only snapshot of the game.
    #[must_use]
    pub fn view(&self) -> GameView {
        GameView::from_state(&self.state())
    }

    /// Copy of the event journal.
    #[must_use]
    pub fn events(&self) -> Vec<GameEvent> {
        self.state().journal().to_vec()
    }

    /// The question cache.
    #[must_use]
    pub fn cache(&self) -> &QuestionCache {
        &self.cache
    }

    fn state(&self) -> MutexGuard<'_, GameState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use questmap_core::error::SourceError;
    use questmap_test_support::{
        FixedClock, GatedQuestionSource, ScriptedQuestionSource, catalog, questions,
    };

    use crate::domain::state::GamePhase;

    fn game(source: Arc<dyn QuestionSource>) -> Game {
        Game::new(
            Arc::new(catalog(&[4, 4, 4])),
            GameRules::default(),
            source,
            Arc::new(FixedClock::at_test_epoch()),
        )
    }

    /// Answers the whole active quiz with `correct` right answers.
    fn play(game: &Game, correct: usize) {
        let quiz = game.view().quiz.unwrap();
        for i in 0..quiz.total {
            // Fixture questions have their answer at `index % 4`.
            let right = i % 4;
            let choice = if i < correct { right } else { (right + 1) % 4 };
            game.submit_answer(choice).unwrap();
            game.next_question().unwrap();
        }
    }

    #[tokio::test]
    async fn test_three_of_four_passes_zone_zero() {
        // Arrange
        let source = Arc::new(ScriptedQuestionSource::always(questions(4)));
        let game = game(source.clone());
        game.start_game().unwrap();
        game.start_active_zone().await.unwrap();
        play(&game, 3);

        // Act
        let outcome = game.finish_quiz().unwrap();

        // Assert
        assert!(outcome.passed);
        assert_eq!(outcome.required, 3);
        let view = game.view();
        assert_eq!(view.active_zone_id, Some(1));
        assert!(view.zone_progress[&0].completed);
        assert!(!view.is_quiz_active);
        assert!(!game.cache().contains(0, 4));
    }

    #[tokio::test]
    async fn test_failed_zone_retry_reuses_cached_set() {
        // Arrange
        let source = Arc::new(ScriptedQuestionSource::always(questions(4)));
        let game = game(source.clone());
        game.start_active_zone().await.unwrap();
        let first_set = game.view().quiz.unwrap().questions;
        play(&game, 2);

        // Act
        let outcome = game.finish_quiz().unwrap();
        game.start_active_zone().await.unwrap();

        // Assert
        assert!(!outcome.passed);
        let view = game.view();
        assert_eq!(view.active_zone_id, Some(0));
        let retry_prompts: Vec<_> = view.quiz.unwrap().questions.into_iter().map(|q| q.prompt).collect();
        let first_prompts: Vec<_> = first_set.into_iter().map(|q| q.prompt).collect();
        assert_eq!(retry_prompts, first_prompts);
        assert_eq!(source.calls(), 1);
    }

    #[tokio::test]
    async fn test_passing_every_zone_finishes_game() {
        // Arrange
        let source = Arc::new(ScriptedQuestionSource::always(questions(4)));
        let game = game(source.clone());
        game.start_game().unwrap();

        // Act
        for _ in 0..3 {
            game.start_active_zone().await.unwrap();
            play(&game, 4);
            game.finish_quiz().unwrap();
        }

        // Assert
        let view = game.view();
        assert_eq!(view.phase, GamePhase::Finished);
        assert_eq!(view.active_zone_id, None);
        assert_eq!(view.completed_zones, 3);
        assert_eq!(source.requests(), vec![(0, 4), (1, 4), (2, 4)]);
        assert!(matches!(
            game.start_active_zone().await,
            Err(GameError::InvalidPhase { .. })
        ));
    }

    #[tokio::test]
    async fn test_fetch_failure_leaves_state_untouched_and_retry_fetches_again() {
        // Arrange
        let source = Arc::new(ScriptedQuestionSource::sequence(vec![
            Err(SourceError::Unavailable("connection refused".to_owned())),
            Ok(questions(4)),
        ]));
        let game = game(source.clone());
        game.start_game().unwrap();

        // Act
        let failed = game.start_active_zone().await;

        // Assert
        assert!(matches!(failed, Err(GameError::SourceUnavailable(_))));
        let view = game.view();
        assert_eq!(view.phase, GamePhase::Playing);
        assert!(!view.is_quiz_active);
        assert!(game.cache().is_empty());

        game.start_active_zone().await.unwrap();
        assert_eq!(source.calls(), 2);
    }

    #[tokio::test]
    async fn test_empty_fetch_is_surfaced_as_empty_question_set() {
        let source = Arc::new(ScriptedQuestionSource::always(Vec::new()));
        let game = game(source);

        let result = game.start_active_zone().await;

        assert_eq!(result, Err(GameError::EmptyQuestionSet { zone_id: 0 }));
        assert_eq!(game.view().phase, GamePhase::Splash);
    }

    #[tokio::test]
    async fn test_reset_during_fetch_discards_result() {
        // Arrange
        let source = Arc::new(GatedQuestionSource::new(Ok(questions(4))));
        let game = game(source.clone());
        game.start_game().unwrap();

        // Act
        let (result, ()) = tokio::join!(game.start_active_zone(), async {
            source.wait_for_fetch().await;
            game.reset_game();
            source.open();
        });

        // Assert
        assert_eq!(result, Err(GameError::FetchSuperseded));
        let view = game.view();
        assert_eq!(view.phase, GamePhase::Splash);
        assert!(!view.is_quiz_active);
        assert!(game.cache().is_empty());
    }

    #[tokio::test]
    async fn test_concurrent_zone_starts_issue_one_fetch() {
        // Arrange
        let source = Arc::new(GatedQuestionSource::new(Ok(questions(4))));
        let game = game(source.clone());
        game.start_game().unwrap();

        // Act
        let (first, second) = tokio::join!(game.start_active_zone(), async {
            source.wait_for_fetch().await;
            let second = game.start_active_zone();
            source.open();
            second.await
        });

        // Assert
        assert!(first.is_ok());
        assert!(second.is_ok());
        assert_eq!(source.calls(), 1);
        assert!(game.view().is_quiz_active);
    }

    #[tokio::test]
    async fn test_reset_then_start_matches_first_start() {
        // Arrange
        let source = Arc::new(ScriptedQuestionSource::always(questions(4)));
        let game = game(source.clone());
        game.start_active_zone().await.unwrap();
        play(&game, 4);
        game.finish_quiz().unwrap();
        game.start_active_zone().await.unwrap();
        game.submit_answer(0).unwrap();

        // Act
        game.reset_game();
        let started = game.start_active_zone().await.unwrap();

        // Assert
        let view = game.view();
        assert_eq!(started.zone_id, 0);
        assert_eq!(view.phase, GamePhase::Playing);
        assert_eq!(view.completed_zones, 0);
        assert_eq!(view.score, 0);
        assert_eq!(view.quiz.unwrap().current_question_index, 0);
        // Reset dropped the zone 0 set, so it was fetched again.
        assert_eq!(source.requests(), vec![(0, 4), (1, 4), (0, 4)]);
    }

    #[tokio::test]
    async fn test_abandon_keeps_cached_set_for_retry() {
        let source = Arc::new(ScriptedQuestionSource::always(questions(4)));
        let game = game(source.clone());
        game.start_active_zone().await.unwrap();

        game.abandon_quiz().unwrap();
        game.start_active_zone().await.unwrap();

        assert_eq!(source.calls(), 1);
        assert!(game.view().is_quiz_active);
    }

    #[tokio::test]
    async fn test_events_record_each_action() {
        let source = Arc::new(ScriptedQuestionSource::always(questions(4)));
        let game = game(source);
        game.start_game().unwrap();
        game.start_active_zone().await.unwrap();
        game.submit_answer(0).unwrap();
        game.reset_game();

        let types: Vec<_> = game
            .events()
            .iter()
            .map(|e| e.metadata.event_type.clone())
            .collect();

        assert_eq!(
            types,
            vec![
                "game.started",
                "game.zone_started",
                "game.answer_recorded",
                "game.reset"
            ]
        );
    }
}
