//! Runner configuration and default file locations.

use std::path::PathBuf;
use std::time::Duration;

use prefhub_core::PlayerSeat;

/// Name of the token file the server writes into each run directory.
pub const DEFAULT_TOKEN_FILE: &str = "test-tokens.json";

/// Pause after every successful move.
pub const DEFAULT_MOVE_DELAY: Duration = Duration::from_millis(100);

/// Environment variable overriding the scenario file location.
pub const SCENARIOS_FILE_ENV: &str = "PREFHUB_SCENARIOS_FILE";

/// Environment variable overriding the scenario storage root.
pub const STORAGE_ROOT_ENV: &str = "PREFHUB_SCENARIO_STORAGE";

/// How the executor paces moves and verifies outcomes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutorConfig {
    /// Delay between moves, giving the server time to settle.
    pub move_delay: Duration,
    /// Seat whose client reads the final game state.
    pub observer: PlayerSeat,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            move_delay: DEFAULT_MOVE_DELAY,
            observer: PlayerSeat::South,
        }
    }
}

impl ExecutorConfig {
    /// Set the delay between moves.
    #[must_use]
    pub fn with_move_delay(mut self, delay: Duration) -> Self {
        self.move_delay = delay;
        self
    }

    /// Set the seat used for final-state verification.
    #[must_use]
    pub fn with_observer(mut self, seat: PlayerSeat) -> Self {
        self.observer = seat;
        self
    }
}

/// Resolve the default scenario file.
///
/// Checks `PREFHUB_SCENARIOS_FILE` first, then the server's resource
/// directory relative to the working directory and its parent.
pub fn default_scenarios_file() -> Option<PathBuf> {
    first_existing(
        SCENARIOS_FILE_ENV,
        &[
            "prefhub-server/src/main/resources/test-scenarios.json",
            "../prefhub-server/src/main/resources/test-scenarios.json",
        ],
    )
}

/// Resolve the default scenario storage root.
///
/// Checks `PREFHUB_SCENARIO_STORAGE` first, then `game-data-scenarios` in
/// the working directory and its parent.
pub fn default_storage_root() -> Option<PathBuf> {
    first_existing(
        STORAGE_ROOT_ENV,
        &["game-data-scenarios", "../game-data-scenarios"],
    )
}

fn first_existing(env_var: &str, candidates: &[&str]) -> Option<PathBuf> {
    if let Ok(value) = std::env::var(env_var) {
        let path = PathBuf::from(value);
        if path.exists() {
            return Some(path);
        }
        tracing::debug!(var = env_var, path = %path.display(), "Override path does not exist");
    }

    candidates
        .iter()
        .map(PathBuf::from)
        .find(|path| path.exists())
}
