//! Error types for provisioning and scenario execution.

use std::path::PathBuf;

use prefhub_client::ClientError;
use prefhub_core::PlayerSeat;
use thiserror::Error;

/// Failure to obtain a session for every seat. Raised before any move runs.
#[derive(Debug, Error)]
pub enum ProvisionError {
    /// The storage root has no run directories.
    #[error("No scenario storage directory found in {}. Is the server running in scenario mode?", .root.display())]
    NoScenarioStorageFound {
        /// Storage root that was searched.
        root: PathBuf,
    },

    /// The selected run directory has no token file.
    #[error("Token file not found: {}", .path.display())]
    TokenFileMissing {
        /// Expected token file path.
        path: PathBuf,
    },

    /// The token map has no entry for a seat.
    #[error("No session token for {0}")]
    MissingPlayerToken(PlayerSeat),

    /// Reading the storage directory or token file failed.
    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        /// Path being read.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The token file is not a JSON object of strings.
    #[error("Failed to parse token file {}: {source}", .path.display())]
    Parse {
        /// Token file path.
        path: PathBuf,
        /// JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// A client could not be built for a session.
    #[error("Failed to set up client for {seat}: {source}")]
    Client {
        /// Seat the client was for.
        seat: PlayerSeat,
        /// Client error.
        #[source]
        source: ClientError,
    },
}

/// Why a single move failed.
#[derive(Debug, Error)]
pub enum MoveError {
    /// The action tag is not a known move.
    #[error("Unknown action: {0}")]
    UnknownAction(String),

    /// The player is not one of the seats.
    #[error("Unknown player: {0}")]
    UnknownPlayer(String),

    /// The move is missing a field or has one of the wrong type.
    #[error("Invalid {action} move: {source}")]
    InvalidMove {
        /// Action tag.
        action: String,
        /// Decoding error.
        #[source]
        source: serde_json::Error,
    },

    /// No client was provisioned for the acting seat.
    #[error("No session for {0}")]
    NoSession(PlayerSeat),

    /// The server call failed.
    #[error(transparent)]
    Client(#[from] ClientError),
}

/// A move that failed, with enough context to find it in the file.
#[derive(Debug, Error)]
#[error("Move {number} ({player} - {action}) failed: {source}")]
pub struct MoveFailure {
    /// 1-based position of the move in its scenario.
    pub number: usize,
    /// Player as written in the file.
    pub player: String,
    /// Action tag as written in the file.
    pub action: String,
    /// Cause.
    #[source]
    pub source: MoveError,
}

/// Failure of a whole test run.
#[derive(Debug, Error)]
pub enum ExecutionError {
    /// No test with this name in the loaded definitions.
    #[error("Test '{0}' not found in scenarios")]
    TestNotFound(String),

    /// Sessions could not be provisioned.
    #[error(transparent)]
    Provision(#[from] ProvisionError),

    /// A scenario stopped at a failing move.
    #[error("Scenario '{scenario}' failed: {failure}")]
    ScenarioFailed {
        /// Scenario name.
        scenario: String,
        /// The failing move.
        #[source]
        failure: MoveFailure,
    },
}

/// Final state could not be read after a scenario passed.
///
/// Logged as a warning; never fails the scenario.
#[derive(Debug, Error)]
#[error("Could not verify final state of game '{game_id}': {source}")]
pub struct StateVerificationWarning {
    /// Game that was queried.
    pub game_id: String,
    /// Cause.
    #[source]
    pub source: ClientError,
}
