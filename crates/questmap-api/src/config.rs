//! Server configuration read from the environment.

use std::fmt::Display;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use questmap_core::rules::{GameRules, PassThreshold};
use questmap_core::zone::ZoneCatalog;
use questmap_trivia::OpenTriviaConfig;
use questmap_trivia::client::DEFAULT_BASE_URL;

use crate::error::AppError;

/// Everything the server needs at startup.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Interface to bind.
    pub host: String,
    /// Port to bind.
    pub port: u16,
    /// Open Trivia Database connection settings.
    pub trivia: OpenTriviaConfig,
    /// Scoring rules.
    pub rules: GameRules,
    /// YAML zone catalog; the built-in catalog is used when unset.
    pub zones_path: Option<PathBuf>,
}

impl ServerConfig {
    /// Reads `HOST`, `PORT`, `TRIVIA_BASE_URL`, `TRIVIA_TIMEOUT_SECS`,
    /// `PASS_THRESHOLD`, `POINTS_PER_CORRECT`, `POINTS_PER_INCORRECT` and
    /// `QUESTMAP_ZONES`.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if a variable is set to an invalid value.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like [`from_env`](Self::from_env), reading variables through `lookup`.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if a variable is set to an invalid value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let host = lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_owned());
        let port = parse_or(&lookup, "PORT", 3000_u16)?;
        let base_url = lookup("TRIVIA_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_owned());
        let timeout_secs = parse_or(&lookup, "TRIVIA_TIMEOUT_SECS", 10_u64)?;
        if timeout_secs == 0 {
            return Err(AppError::Config(
                "TRIVIA_TIMEOUT_SECS must be positive".to_owned(),
            ));
        }

        let defaults = GameRules::default();
        let fraction = parse_or(&lookup, "PASS_THRESHOLD", defaults.pass_threshold.fraction())?;
        let pass_threshold = PassThreshold::from_fraction(fraction)
            .map_err(|e| AppError::Config(format!("PASS_THRESHOLD: {e}")))?;
        let rules = GameRules {
            pass_threshold,
            points_per_correct: parse_or(&lookup, "POINTS_PER_CORRECT", defaults.points_per_correct)?,
            points_per_incorrect: parse_or(
                &lookup,
                "POINTS_PER_INCORRECT",
                defaults.points_per_incorrect,
            )?,
        };

        Ok(Self {
            host,
            port,
            trivia: OpenTriviaConfig {
                base_url,
                timeout: Duration::from_secs(timeout_secs),
            },
            rules,
            zones_path: lookup("QUESTMAP_ZONES").map(PathBuf::from),
        })
    }

    /// The address to listen on.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if `host:port` is not a socket address.
    pub fn socket_addr(&self) -> Result<SocketAddr, AppError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| AppError::Config(format!("invalid HOST:PORT combination: {e}")))
    }

    /// Loads the zone catalog from `zones_path`, or the built-in one.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if the file cannot be read or fails
    /// validation.
    pub fn load_catalog(&self) -> Result<ZoneCatalog, AppError> {
        match &self.zones_path {
            Some(path) => ZoneCatalog::load(path).map_err(|e| AppError::Config(e.to_string())),
            None => Ok(ZoneCatalog::default()),
        }
    }
}

fn parse_or<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> Result<T, AppError>
where
    T: FromStr,
    T::Err: Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| AppError::Config(format!("{key} has invalid value {raw:?}: {e}"))),
        None => Ok(default),
    }
}
