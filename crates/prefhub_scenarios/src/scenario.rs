//! Scenario loading.
//!
//! A scenario file is a JSON document mapping test names to test
//! definitions. Each test names the game the server prepared for it and
//! lists scenarios, each an ordered list of scripted moves:
//!
//! ```json
//! {
//!   "tests": {
//!     "test0": {
//!       "description": "South plays misere",
//!       "game": "test-game-0",
//!       "scenarios": [{
//!         "name": "misere",
//!         "description": "Bid, discard, lead",
//!         "moves": [
//!           {"action": "bid", "player": "playerSouth", "contract": "Misere"},
//!           {"action": "takePrikup", "player": "playerSouth", "discard": ["SEVEN_DIAMONDS", "EIGHT_CLUBS"]},
//!           {"action": "playCard", "player": "playerWest", "card": "NINE_SPADES"}
//!         ]
//!       }]
//!     }
//!   }
//! }
//! ```
//!
//! Moves are kept as written ([`MoveSpec`]) and only resolved into typed
//! moves when they are about to run, so a bad move fails its scenario at
//! that point rather than the whole file.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Error type for scenario file operations.
#[derive(Error, Debug)]
pub enum ScenarioError {
    /// File not found.
    #[error("Scenarios file not found: {0}")]
    FileNotFound(String),
    /// Failed to read file.
    #[error("Failed to read scenarios file: {0}")]
    ReadError(#[from] std::io::Error),
    /// Failed to parse JSON.
    #[error("Failed to parse scenarios: {0}")]
    ParseError(#[from] serde_json::Error),
}

/// On-disk layout of a scenario file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScenarioFile {
    /// Test definitions by name.
    #[serde(default)]
    pub tests: BTreeMap<String, TestDefinition>,
}

/// A named test: one prepared game and the scenarios played against it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestDefinition {
    /// Human-readable description.
    #[serde(default)]
    pub description: String,
    /// Game id the server created for this test.
    pub game: String,
    /// Hands the server deals in scenario mode.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deck: Option<DeckSetup>,
    /// Scenarios in execution order.
    #[serde(default)]
    pub scenarios: Vec<Scenario>,
}

/// Card tokens the server seeds each hand and the prikup with.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeckSetup {
    /// West's hand.
    #[serde(default)]
    pub player_west: Vec<String>,
    /// East's hand.
    #[serde(default)]
    pub player_east: Vec<String>,
    /// South's hand.
    #[serde(default)]
    pub player_south: Vec<String>,
    /// The two face-down cards.
    #[serde(default)]
    pub prikup: Vec<String>,
}

impl DeckSetup {
    /// Every card list with a label, in a fixed order.
    pub fn hands(&self) -> [(&'static str, &[String]); 4] {
        [
            ("playerWest", self.player_west.as_slice()),
            ("playerEast", self.player_east.as_slice()),
            ("playerSouth", self.player_south.as_slice()),
            ("prikup", self.prikup.as_slice()),
        ]
    }
}

/// An ordered sequence of moves.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario {
    /// Scenario name.
    pub name: String,
    /// Human-readable description.
    #[serde(default)]
    pub description: String,
    /// Moves in turn order.
    #[serde(default)]
    pub moves: Vec<MoveSpec>,
}

/// A move exactly as written in the file.
///
/// A missing `action` or `player` loads as an empty string and is rejected
/// when the move is resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveSpec {
    /// Action tag (`bid`, `takePrikup`, `playCard`).
    #[serde(default)]
    pub action: String,
    /// Acting player (`playerSouth`, ...).
    #[serde(default)]
    pub player: String,
    /// Action-specific fields.
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

/// Loaded test definitions, indexed by name.
#[derive(Debug, Clone, Default)]
pub struct ScenarioStore {
    source: Option<PathBuf>,
    tests: BTreeMap<String, TestDefinition>,
}

impl ScenarioStore {
    /// Load a scenario file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ScenarioError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ScenarioError::FileNotFound(path.display().to_string()));
        }
        let contents = std::fs::read_to_string(path)?;
        let mut store = Self::from_json_str(&contents)?;
        store.source = Some(path.to_path_buf());
        tracing::debug!(path = %path.display(), tests = store.len(), "Loaded scenarios");
        Ok(store)
    }

    /// Load from a JSON string (useful for embedded scenarios).
    pub fn from_json_str(json: &str) -> Result<Self, ScenarioError> {
        let file: ScenarioFile = serde_json::from_str(json)?;
        Ok(Self::from(file))
    }

    /// File the store was loaded from, if any.
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// Look up a test by name.
    pub fn test(&self, name: &str) -> Option<&TestDefinition> {
        self.tests.get(name)
    }

    /// All tests, sorted by name.
    pub fn tests(&self) -> impl Iterator<Item = (&str, &TestDefinition)> {
        self.tests.iter().map(|(name, test)| (name.as_str(), test))
    }

    /// All test names, sorted.
    pub fn test_names(&self) -> Vec<&str> {
        self.tests.keys().map(String::as_str).collect()
    }

    /// Number of tests.
    pub fn len(&self) -> usize {
        self.tests.len()
    }

    /// Whether the store holds no tests.
    pub fn is_empty(&self) -> bool {
        self.tests.is_empty()
    }
}

impl From<ScenarioFile> for ScenarioStore {
    fn from(file: ScenarioFile) -> Self {
        Self {
            source: None,
            tests: file.tests,
        }
    }
}
