//! Global scoring rules.

use serde::Serialize;

use crate::error::GameError;

const BASIS_POINTS: u64 = 10_000;

/// Fraction of questions a player must answer correctly to pass a zone.
///
/// Stored in basis points so the ceiling in [`PassThreshold::questions_needed`]
/// is exact integer arithmetic (`0.7 * 10` must need 7, not 8). Only fractions
/// with at most four decimal places are accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PassThreshold(u32);

impl PassThreshold {
    /// Builds a threshold from a fraction in `(0, 1]`.
    ///
    /// # Errors
    ///
    /// Returns `GameError::InvalidConfig` for values outside `(0, 1]`, NaN, or
    /// fractions finer than a basis point (e.g. `2/3`), whose ceiling would
    /// otherwise be taken against a rounded value.
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::float_cmp
    )]
    pub fn from_fraction(fraction: f64) -> Result<Self, GameError> {
        if !(fraction > 0.0 && fraction <= 1.0) {
            return Err(GameError::InvalidConfig(format!(
                "pass threshold must be in (0, 1], got {fraction}"
            )));
        }
        let basis_points = (fraction * 10_000.0).round() as u32;
        if basis_points == 0 || f64::from(basis_points) / 10_000.0 != fraction {
            return Err(GameError::InvalidConfig(format!(
                "pass threshold must have at most four decimal places, got {fraction}"
            )));
        }
        Ok(Self(basis_points))
    }

    /// The threshold as a fraction.
    #[must_use]
    pub fn fraction(self) -> f64 {
        f64::from(self.0) / 10_000.0
    }

    /// `ceil(total * threshold)`: the fewest correct answers that pass.
    #[must_use]
    pub fn questions_needed(self, total: usize) -> usize {
        let total = total as u64;
        let needed = (total * u64::from(self.0)).div_ceil(BASIS_POINTS);
        usize::try_from(needed).unwrap_or(usize::MAX)
    }

    /// Whether `correct` out of `total` meets the threshold.
    #[must_use]
    pub fn is_met(self, correct: usize, total: usize) -> bool {
        correct >= self.questions_needed(total)
    }
}

impl Default for PassThreshold {
    fn default() -> Self {
        Self(6_000)
    }
}

/// Scoring configuration shared by every zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GameRules {
    /// Required fraction of correct answers.
    pub pass_threshold: PassThreshold,
    /// Points awarded per correct answer.
    pub points_per_correct: u32,
    /// Points deducted per incorrect answer. The score never drops below zero.
    pub points_per_incorrect: u32,
}

impl Default for GameRules {
    fn default() -> Self {
        Self {
            pass_threshold: PassThreshold::default(),
            points_per_correct: 100,
            points_per_incorrect: 0,
        }
    }
}
