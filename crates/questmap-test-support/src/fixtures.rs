//! Fixed clock, question and catalog fixtures.

use chrono::{DateTime, TimeZone, Utc};
use questmap_core::event::Clock;
use questmap_core::question::Question;
use questmap_core::zone::{Difficulty, Zone, ZoneCatalog};

/// A clock that always returns a fixed point in time.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl FixedClock {
    /// 2026-01-15T10:00:00Z, the timestamp used across the test suite.
    ///
    /// # Panics
    ///
    /// Never; the date is valid.
    #[must_use]
    pub fn at_test_epoch() -> Self {
        Self(Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap())
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// A four-choice question whose correct answer sits at `correct_index`.
///
/// # Panics
///
/// Panics if `correct_index >= 4`.
#[must_use]
pub fn question(prompt: &str, correct_index: usize) -> Question {
    let choices = (0..4).map(|i| format!("{prompt} / choice {i}")).collect();
    Question::new(prompt, choices, correct_index).expect("fixture question is valid")
}

/// `count` distinct questions with correct answers cycling through 0..4.
#[must_use]
pub fn questions(count: usize) -> Vec<Question> {
    (0..count)
        .map(|i| question(&format!("Question {i}"), i % 4))
        .collect()
}

/// A catalog of `sizes.len()` zones where zone `i` asks `sizes[i]` questions.
///
/// # Panics
///
/// Panics if `sizes` is empty or contains a zero.
#[must_use]
pub fn catalog(sizes: &[u32]) -> ZoneCatalog {
    let zones = sizes
        .iter()
        .zip(0u32..)
        .map(|(&question_count, id)| Zone {
            id,
            name: format!("Zone {id}"),
            subtitle: format!("Subtitle {id}"),
            category_id: 9 + id,
            difficulty: Difficulty::Easy,
            question_count,
        })
        .collect();
    ZoneCatalog::new(zones).expect("fixture catalog is valid")
}
