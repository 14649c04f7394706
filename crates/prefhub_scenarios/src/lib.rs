//! Scenario-driven integration tests for the PrefHub game server.
//!
//! The server, started in scenario mode, prepares games with fixed decks and
//! pre-authenticated players. This crate replays scripted moves against such
//! a game, each move through the session of the player who makes it, and
//! reports whether the script ran to completion.
//!
//! - **Regression checks**: Replay a known hand after server changes
//! - **Rule debugging**: Stop at the exact move the server rejects
//! - **Script linting**: Validate scenario files without a server
//!
//! # Flow
//!
//! 1. [`scenario`]: load test definitions from JSON
//! 2. [`provision`]: read session tokens, bind one client per seat
//! 3. [`executor`]: play each scenario's moves in order, verify the outcome
//!
//! # Example
//!
//! ```bash
//! # Run one test against a local server
//! cargo run -p prefhub_scenarios -- run test0
//!
//! # List tests in a scenario file
//! cargo run -p prefhub_scenarios -- --scenarios test-scenarios.json list
//!
//! # Check a scenario file offline
//! cargo run -p prefhub_scenarios -- validate
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

pub mod config;
pub mod error;
pub mod executor;
pub mod moves;
pub mod provision;
pub mod scenario;
pub mod validate;

pub use config::{default_scenarios_file, default_storage_root, ExecutorConfig};
pub use error::{ExecutionError, MoveError, MoveFailure, ProvisionError, StateVerificationWarning};
pub use executor::{run_scenario, RunState, ScenarioExecutor, ScenarioReport, TestReport};
pub use moves::{Move, MoveAction};
pub use provision::{
    discover_token_artifact, load_tokens, provision_clients, ClientMap, StorageDirTokenSource,
    TokenArtifact, TokenMap, TokenSource,
};
pub use scenario::{Scenario, ScenarioError, ScenarioStore, TestDefinition};
pub use validate::{validate_store, ValidationIssue};
