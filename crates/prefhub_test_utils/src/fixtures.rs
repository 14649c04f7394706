//! Test fixtures and helpers.
//!
//! Scenario documents and on-disk token storage laid out the way a
//! scenario-mode server leaves them.

use std::fs;
use std::path::{Path, PathBuf};

use prefhub_core::PlayerSeat;
use tempfile::TempDir;

/// Name of the token file inside a run directory.
pub const TOKEN_FILE_NAME: &str = "test-tokens.json";

/// Game id used by `test0`.
pub const TEST0_GAME_ID: &str = "test-game-0";

/// Scenario document covering the common shapes.
///
/// - `test0`: one scenario, bid / take prikup / play card
/// - `test1`: two scenarios run back to back
/// - `empty`: no scenarios at all
/// - `unknown-action`: a valid bid followed by an unsupported action
pub const SCENARIOS_JSON: &str = r#"{
  "tests": {
    "test0": {
      "description": "South plays misere, West leads",
      "game": "test-game-0",
      "deck": {
        "playerWest": ["NINE_SPADES", "TEN_SPADES"],
        "playerEast": ["ACE_HEARTS", "KING_HEARTS"],
        "playerSouth": ["SEVEN_CLUBS", "SEVEN_HEARTS"],
        "prikup": ["SEVEN_DIAMONDS", "EIGHT_CLUBS"]
      },
      "scenarios": [
        {
          "name": "misere",
          "description": "Bid misere, discard, first lead",
          "moves": [
            {"action": "bid", "player": "playerSouth", "contract": "Misere"},
            {"action": "takePrikup", "player": "playerSouth", "discard": ["SEVEN_DIAMONDS", "EIGHT_CLUBS"]},
            {"action": "playCard", "player": "playerWest", "card": "NINE_SPADES"}
          ]
        }
      ]
    },
    "test1": {
      "description": "Two scenarios against the same game",
      "game": "test-game-1",
      "scenarios": [
        {
          "name": "bidding",
          "description": "Everyone bids",
          "moves": [
            {"action": "bid", "player": "playerSouth", "contract": "SIX_SPADES"},
            {"action": "bid", "player": "playerWest", "contract": "PASS"},
            {"action": "bid", "player": "playerEast", "contract": "PASS"}
          ]
        },
        {
          "name": "first-trick",
          "description": "Exchange and one trick",
          "moves": [
            {"action": "takePrikup", "player": "playerSouth", "discard": ["SEVEN_HEARTS", "EIGHT_HEARTS"]},
            {"action": "playCard", "player": "playerWest", "card": "ACE_SPADES"},
            {"action": "playCard", "player": "playerEast", "card": "SEVEN_SPADES"},
            {"action": "playCard", "player": "playerSouth", "card": "KING_SPADES"}
          ]
        }
      ]
    },
    "empty": {
      "description": "Nothing scripted yet",
      "game": "test-game-empty"
    },
    "unknown-action": {
      "description": "Second move uses an unsupported action",
      "game": "test-game-2",
      "scenarios": [
        {
          "name": "bad-action",
          "description": "Shuffle is not a move",
          "moves": [
            {"action": "bid", "player": "playerSouth", "contract": "PASS"},
            {"action": "shuffle", "player": "playerSouth"},
            {"action": "bid", "player": "playerWest", "contract": "PASS"}
          ]
        }
      ]
    }
  }
}"#;

/// Token the fixtures issue for a seat.
#[must_use]
pub fn token_for(seat: PlayerSeat) -> String {
    format!("test-token-{}-5f2c9a1e", seat.short_name().to_lowercase())
}

/// Token file contents for the given seats.
#[must_use]
pub fn tokens_json(seats: &[PlayerSeat]) -> String {
    let map: serde_json::Map<String, serde_json::Value> = seats
        .iter()
        .map(|seat| (seat.key().to_string(), token_for(*seat).into()))
        .collect();
    serde_json::Value::Object(map).to_string()
}

/// Write [`SCENARIOS_JSON`] into `dir` and return its path.
pub fn write_scenarios_file(dir: &Path) -> PathBuf {
    let path = dir.join("test-scenarios.json");
    fs::write(&path, SCENARIOS_JSON).expect("write scenarios fixture");
    path
}

/// A temporary scenario-storage root with run directories inside.
pub struct TokenStorage {
    dir: TempDir,
}

impl TokenStorage {
    /// Create an empty storage root.
    #[must_use]
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        fs::create_dir(dir.path().join("game-data-scenarios")).expect("create storage root");
        Self { dir }
    }

    /// Storage root that holds the run directories.
    #[must_use]
    pub fn root(&self) -> PathBuf {
        self.dir.path().join("game-data-scenarios")
    }

    /// Scratch directory next to the root, for other fixture files.
    #[must_use]
    pub fn scratch(&self) -> &Path {
        self.dir.path()
    }

    /// Add a run directory with a token file for `seats`.
    pub fn add_run(&self, name: &str, seats: &[PlayerSeat]) -> PathBuf {
        let run = self.add_empty_run(name);
        fs::write(run.join(TOKEN_FILE_NAME), tokens_json(seats)).expect("write token file");
        run
    }

    /// Add a run directory with every seat present.
    pub fn add_full_run(&self, name: &str) -> PathBuf {
        self.add_run(name, &PlayerSeat::ALL)
    }

    /// Add a run directory with no token file.
    pub fn add_empty_run(&self, name: &str) -> PathBuf {
        let run = self.root().join(name);
        fs::create_dir_all(&run).expect("create run dir");
        run
    }
}

impl Default for TokenStorage {
    fn default() -> Self {
        Self::new()
    }
}
