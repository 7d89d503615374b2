//! HTTP client for the Open Trivia Database.

use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use questmap_core::error::SourceError;
use questmap_core::question::Question;
use questmap_core::rng::{DeterministicRng, StdGameRng};
use questmap_core::source::QuestionSource;
use questmap_core::zone::Zone;
use tracing::{debug, instrument, warn};

use crate::response::ApiResponse;

/// Public Open Trivia Database endpoint.
pub const DEFAULT_BASE_URL: &str = "https://opentdb.com";

/// Default whole-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Connection settings for [`OpenTriviaSource`].
#[derive(Debug, Clone)]
pub struct OpenTriviaConfig {
    /// Scheme and host, without a trailing `/api.php`.
    pub base_url: String,
    /// Whole-request timeout; expiry is reported as `SourceError::Unavailable`.
    pub timeout: Duration,
}

impl Default for OpenTriviaConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Question source backed by the Open Trivia Database `api.php` endpoint.
pub struct OpenTriviaSource {
    client: reqwest::Client,
    base_url: String,
    rng: Mutex<Box<dyn DeterministicRng>>,
}

impl std::fmt::Debug for OpenTriviaSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenTriviaSource")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl OpenTriviaSource {
    /// Creates a source that shuffles answers with an entropy-seeded RNG.
    ///
    /// # Errors
    ///
    /// Returns `SourceError::Unavailable` if the HTTP client cannot be built.
    pub fn new(config: &OpenTriviaConfig) -> Result<Self, SourceError> {
        Self::with_rng(config, Box::new(StdGameRng::from_entropy()))
    }

    /// Creates a source with an injected RNG.
    ///
    /// # Errors
    ///
    /// Returns `SourceError::Unavailable` if the HTTP client cannot be built.
    pub fn with_rng(
        config: &OpenTriviaConfig,
        rng: Box<dyn DeterministicRng>,
    ) -> Result<Self, SourceError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| SourceError::Unavailable(format!("cannot build HTTP client: {e}")))?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_owned(),
            rng: Mutex::new(rng),
        })
    }

    /// Builds the `api.php` URL for a zone.
    #[must_use]
    pub fn request_url(&self, zone: &Zone, count: u32) -> String {
        format!(
            "{}/api.php?amount={count}&category={}&type=multiple&difficulty={}&encode=url3986",
            self.base_url, zone.category_id, zone.difficulty
        )
    }
}

#[async_trait]
impl QuestionSource for OpenTriviaSource {
    #[instrument(skip(self, zone), fields(zone_id = zone.id))]
    async fn fetch(&self, zone: &Zone, count: u32) -> Result<Vec<Question>, SourceError> {
        let url = self.request_url(zone, count);
        debug!(%url, "requesting questions");

        let response = self.client.get(&url).send().await.map_err(|e| {
            warn!(error = %e, "question request failed");
            SourceError::Unavailable(e.to_string())
        })?;

        let status = response.status();
        if !status.is_success() {
            warn!(%status, "question provider returned an error status");
            return Err(SourceError::Unavailable(format!(
                "provider returned HTTP {status}"
            )));
        }

        let body = response.bytes().await.map_err(|e| {
            warn!(error = %e, "reading question response failed");
            SourceError::Unavailable(e.to_string())
        })?;
        let parsed: ApiResponse = serde_json::from_slice(&body)
            .map_err(|e| SourceError::Malformed(format!("unexpected response shape: {e}")))?;

        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        let questions = parsed.into_questions(count as usize, &mut **rng)?;
        debug!(returned = questions.len(), "questions normalized");
        Ok(questions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use questmap_core::zone::Difficulty;
    use questmap_test_support::LowestPickRng;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn zone() -> Zone {
        Zone {
            id: 0,
            name: "Circuit Shallows".to_owned(),
            subtitle: "Where the machines hum".to_owned(),
            category_id: 18,
            difficulty: Difficulty::Easy,
            question_count: 2,
        }
    }

    fn source_for(server: &MockServer, timeout: Duration) -> OpenTriviaSource {
        let config = OpenTriviaConfig {
            base_url: server.uri(),
            timeout,
        };
        OpenTriviaSource::with_rng(&config, Box::new(LowestPickRng)).unwrap()
    }

    #[test]
    fn test_request_url_carries_zone_parameters() {
        let config = OpenTriviaConfig {
            base_url: "https://trivia.example/".to_owned(),
            timeout: DEFAULT_TIMEOUT,
        };
        let source = OpenTriviaSource::with_rng(&config, Box::new(LowestPickRng)).unwrap();

        assert_eq!(
            source.request_url(&zone(), 4),
            "https://trivia.example/api.php?amount=4&category=18&type=multiple&difficulty=easy&encode=url3986"
        );
    }

    #[tokio::test]
    async fn test_fetch_returns_decoded_questions() {
        // Arrange
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api.php"))
            .and(query_param("amount", "2"))
            .and(query_param("category", "18"))
            .and(query_param("difficulty", "easy"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "response_code": 0,
                "results": [
                    {
                        "type": "multiple",
                        "difficulty": "easy",
                        "category": "Science%3A%20Computers",
                        "question": "What%20is%20RAM%3F",
                        "correct_answer": "Memory",
                        "incorrect_answers": ["Storage", "Processor", "Display"]
                    },
                    {
                        "type": "multiple",
                        "difficulty": "easy",
                        "category": "Science%3A%20Computers",
                        "question": "HTML%20is%20a%20...",
                        "correct_answer": "Markup%20language",
                        "incorrect_answers": ["Database", "Compiler", "Protocol"]
                    }
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;
        let source = source_for(&server, DEFAULT_TIMEOUT);

        // Act
        let questions = source.fetch(&zone(), 2).await.unwrap();

        // Assert
        assert_eq!(questions.len(), 2);
        assert_eq!(questions[0].prompt(), "What is RAM?");
        assert_eq!(questions[0].correct_answer(), "Memory");
        assert_eq!(questions[0].choices().len(), 4);
        assert_eq!(questions[1].correct_answer(), "Markup language");
    }

    #[tokio::test]
    async fn test_fetch_maps_server_error_to_unavailable() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api.php"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;
        let source = source_for(&server, DEFAULT_TIMEOUT);

        let result = source.fetch(&zone(), 2).await;

        assert!(matches!(result, Err(SourceError::Unavailable(_))));
    }

    #[tokio::test]
    async fn test_fetch_maps_timeout_to_unavailable() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api.php"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"response_code": 0, "results": []}))
                    .set_delay(Duration::from_millis(500)),
            )
            .mount(&server)
            .await;
        let source = source_for(&server, Duration::from_millis(50));

        let result = source.fetch(&zone(), 2).await;

        assert!(matches!(result, Err(SourceError::Unavailable(_))));
    }

    #[tokio::test]
    async fn test_fetch_maps_wrong_shape_to_malformed() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api.php"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "response_code": 0,
                "results": [{ "question": "Q" }]
            })))
            .mount(&server)
            .await;
        let source = source_for(&server, DEFAULT_TIMEOUT);

        let result = source.fetch(&zone(), 2).await;

        assert!(matches!(result, Err(SourceError::Malformed(_))));
    }

    #[tokio::test]
    async fn test_fetch_maps_non_json_body_to_malformed() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api.php"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
            .mount(&server)
            .await;
        let source = source_for(&server, DEFAULT_TIMEOUT);

        let result = source.fetch(&zone(), 2).await;

        assert!(matches!(result, Err(SourceError::Malformed(_))));
    }

    #[tokio::test]
    async fn test_fetch_maps_unreachable_host_to_unavailable() {
        let config = OpenTriviaConfig {
            base_url: "http://127.0.0.1:9".to_owned(),
            timeout: Duration::from_secs(2),
        };
        let source = OpenTriviaSource::with_rng(&config, Box::new(LowestPickRng)).unwrap();

        let result = source.fetch(&zone(), 2).await;

        assert!(matches!(result, Err(SourceError::Unavailable(_))));
    }
}
