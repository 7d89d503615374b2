//! Question source abstraction.

use async_trait::async_trait;

use crate::error::SourceError;
use crate::question::Question;
use crate::zone::Zone;

/// A provider of normalized questions for a zone.
///
/// Implementations return at most `count` questions, shuffled and decoded.
/// Failures are reported as errors and never as an empty success.
#[async_trait]
pub trait QuestionSource: Send + Sync {
    /// Fetches up to `count` questions matching the zone's category and difficulty.
    async fn fetch(&self, zone: &Zone, count: u32) -> Result<Vec<Question>, SourceError>;
}
