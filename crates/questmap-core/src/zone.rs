//! Zone configuration and the ordered zone catalog.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::GameError;

/// Question difficulty understood by trivia providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    /// Easy questions.
    Easy,
    /// Medium questions.
    Medium,
    /// Hard questions.
    Hard,
}

impl Difficulty {
    /// Provider query value.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Static configuration for one zone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Zone {
    /// Ordinal, unique within the catalog.
    pub id: u32,
    /// Display name.
    pub name: String,
    /// Tagline.
    pub subtitle: String,
    /// Provider category identifier.
    pub category_id: u32,
    /// Provider difficulty.
    pub difficulty: Difficulty,
    /// Number of questions asked in this zone.
    pub question_count: u32,
}

/// Immutable, ordered list of zones fixed at startup.
///
/// Ids are contiguous from zero, so a zone's id is also its position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ZoneCatalog {
    zones: Vec<Zone>,
}

#[derive(Deserialize)]
struct CatalogFile {
    zones: Vec<Zone>,
}

impl ZoneCatalog {
    /// Builds a catalog, checking that it is non-empty, that ids run
    /// `0, 1, 2, ...` in order and that every zone asks at least one question.
    ///
    /// # Errors
    ///
    /// Returns `GameError::InvalidConfig` describing the first violation.
    pub fn new(zones: Vec<Zone>) -> Result<Self, GameError> {
        if zones.is_empty() {
            return Err(GameError::InvalidConfig(
                "zone catalog must contain at least one zone".to_owned(),
            ));
        }
        for (position, zone) in zones.iter().enumerate() {
            if zone.id as usize != position {
                return Err(GameError::InvalidConfig(format!(
                    "zone at position {position} has id {}; ids must be contiguous from 0",
                    zone.id
                )));
            }
            if zone.question_count == 0 {
                return Err(GameError::InvalidConfig(format!(
                    "zone {} must ask at least one question",
                    zone.id
                )));
            }
        }
        Ok(Self { zones })
    }

    /// Parses a YAML document of the form `zones: [...]`.
    ///
    /// # Errors
    ///
    /// Returns `GameError::InvalidConfig` if the YAML is invalid or the
    /// catalog fails validation.
    pub fn from_yaml(source: &str) -> Result<Self, GameError> {
        let file: CatalogFile = serde_yaml::from_str(source)
            .map_err(|e| GameError::InvalidConfig(format!("zone catalog is not valid YAML: {e}")))?;
        Self::new(file.zones)
    }

    /// Reads and parses a YAML catalog from disk.
    ///
    /// # Errors
    ///
    /// Returns `GameError::InvalidConfig` if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, GameError> {
        let source = std::fs::read_to_string(path).map_err(|e| {
            GameError::InvalidConfig(format!("cannot read zone catalog {}: {e}", path.display()))
        })?;
        Self::from_yaml(&source)
    }

    /// Looks up a zone by id.
    #[must_use]
    pub fn get(&self, id: u32) -> Option<&Zone> {
        self.zones.get(id as usize)
    }

    /// All zones in catalog order.
    #[must_use]
    pub fn zones(&self) -> &[Zone] {
        &self.zones
    }

    /// Number of zones.
    #[must_use]
    pub fn len(&self) -> usize {
        self.zones.len()
    }

    /// Always false for a validated catalog.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    /// Id of the last zone in catalog order.
    #[must_use]
    pub fn final_zone_id(&self) -> u32 {
        self.zones.last().map_or(0, |zone| zone.id)
    }
}

impl Default for ZoneCatalog {
    fn default() -> Self {
        let zone = |id, name: &str, subtitle: &str, category_id, difficulty, question_count| Zone {
            id,
            name: name.to_owned(),
            subtitle: subtitle.to_owned(),
            category_id,
            difficulty,
            question_count,
        };
        Self {
            zones: vec![
                zone(0, "Circuit Shallows", "Where the machines hum", 18, Difficulty::Easy, 4),
                zone(1, "Archive Ridge", "Echoes of the past", 23, Difficulty::Medium, 7),
                zone(2, "Starfall Summit", "The sky keeps its secrets", 17, Difficulty::Hard, 10),
            ],
        }
    }
}
