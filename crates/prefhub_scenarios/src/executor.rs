//! Scenario execution.
//!
//! A test run provisions one client per seat, then plays each scenario's
//! moves in order, each through the client of the seat that makes it.
//! The first failing move ends its scenario and the test; later moves are
//! never sent.

use std::thread;

use prefhub_client::{ClientFactory, GameApi};
use prefhub_core::PlayerSeat;
use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::config::ExecutorConfig;
use crate::error::{ExecutionError, MoveError, MoveFailure, StateVerificationWarning};
use crate::moves::{Move, MoveAction};
use crate::provision::{provision_clients, ClientMap, TokenSource};
use crate::scenario::{Scenario, ScenarioStore};

/// Where a test run is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunState {
    /// Nothing has happened yet.
    NotStarted,
    /// Every seat has a bound client.
    ClientsProvisioned,
    /// The named scenario is running.
    ScenarioInProgress(String),
    /// Every scenario passed.
    Completed,
    /// The run stopped on an error.
    Failed,
}

/// Outcome of one scenario.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScenarioReport {
    /// Scenario name.
    pub name: String,
    /// Moves sent to the server.
    pub moves_dispatched: usize,
    /// Phase read back after the last move, if it could be read.
    pub final_phase: Option<String>,
    /// Whether the final phase was `GAME_OVER`.
    pub game_over: bool,
    /// Verification problem, if any.
    pub warning: Option<String>,
}

/// Outcome of a passed test.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TestReport {
    /// Test name.
    pub test_name: String,
    /// Game the test ran against.
    pub game_id: String,
    /// One report per scenario, in order.
    pub scenarios: Vec<ScenarioReport>,
}

impl TestReport {
    /// Save the report as pretty-printed JSON.
    pub fn save(&self, path: &std::path::Path) -> std::io::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        std::fs::write(path, json)
    }
}

/// Runs named tests from a [`ScenarioStore`].
pub struct ScenarioExecutor<T, F> {
    store: ScenarioStore,
    tokens: T,
    factory: F,
    config: ExecutorConfig,
    state: RunState,
}

impl<T: TokenSource, F: ClientFactory> ScenarioExecutor<T, F> {
    /// Create an executor.
    pub fn new(store: ScenarioStore, tokens: T, factory: F, config: ExecutorConfig) -> Self {
        Self {
            store,
            tokens,
            factory,
            config,
            state: RunState::NotStarted,
        }
    }

    /// Current run state.
    pub fn state(&self) -> &RunState {
        &self.state
    }

    /// Loaded test definitions.
    pub fn store(&self) -> &ScenarioStore {
        &self.store
    }

    /// Run a test and log the outcome. Returns whether it passed.
    pub fn run_test(&mut self, name: &str) -> bool {
        match self.execute_test(name) {
            Ok(report) => {
                info!(
                    test = %report.test_name,
                    scenarios = report.scenarios.len(),
                    "Test passed"
                );
                true
            }
            Err(e) => {
                error!(test = name, error = %e, "Test failed");
                false
            }
        }
    }

    /// Run a test, returning its report or the error that stopped it.
    pub fn execute_test(&mut self, name: &str) -> Result<TestReport, ExecutionError> {
        self.state = RunState::NotStarted;
        let result = self.execute_inner(name);
        self.state = match result {
            Ok(_) => RunState::Completed,
            Err(_) => RunState::Failed,
        };
        result
    }

    fn execute_inner(&mut self, name: &str) -> Result<TestReport, ExecutionError> {
        let test = self
            .store
            .test(name)
            .cloned()
            .ok_or_else(|| ExecutionError::TestNotFound(name.to_string()))?;

        info!(test = name, game = %test.game, "Running test: {}", test.description);

        let tokens = self.tokens.load_tokens()?;
        let clients = provision_clients(&tokens, &self.factory)?;
        self.state = RunState::ClientsProvisioned;

        let mut report = TestReport {
            test_name: name.to_string(),
            game_id: test.game.clone(),
            scenarios: Vec::with_capacity(test.scenarios.len()),
        };

        if test.scenarios.is_empty() {
            warn!(test = name, "No scenarios defined");
            return Ok(report);
        }

        for scenario in &test.scenarios {
            self.state = RunState::ScenarioInProgress(scenario.name.clone());
            let outcome = run_scenario(&clients, &test.game, scenario, &self.config).map_err(
                |failure| ExecutionError::ScenarioFailed {
                    scenario: scenario.name.clone(),
                    failure,
                },
            )?;
            report.scenarios.push(outcome);
        }

        Ok(report)
    }
}

/// Play one scenario's moves in order, then read back the game state.
///
/// Stops at the first move that fails to resolve or is rejected. A failed
/// state read afterwards only produces a warning.
pub fn run_scenario<C: GameApi>(
    clients: &ClientMap<C>,
    game_id: &str,
    scenario: &Scenario,
    config: &ExecutorConfig,
) -> Result<ScenarioReport, MoveFailure> {
    info!(
        scenario = %scenario.name,
        moves = scenario.moves.len(),
        "Running scenario: {}",
        scenario.description
    );

    for (index, spec) in scenario.moves.iter().enumerate() {
        let number = index + 1;
        let fail = |source| MoveFailure {
            number,
            player: spec.player.clone(),
            action: spec.action.clone(),
            source,
        };

        let mv = Move::try_from(spec).map_err(fail)?;
        info!(move_number = number, player = %mv.player, "{}", mv.action);

        let client = clients
            .get(&mv.player)
            .ok_or(MoveError::NoSession(mv.player))
            .map_err(fail)?;
        dispatch(client, game_id, &mv.action).map_err(|e| fail(MoveError::from(e)))?;

        if !config.move_delay.is_zero() {
            thread::sleep(config.move_delay);
        }
    }

    let mut report = ScenarioReport {
        name: scenario.name.clone(),
        moves_dispatched: scenario.moves.len(),
        final_phase: None,
        game_over: false,
        warning: None,
    };
    verify_final_state(clients, game_id, config.observer, &mut report);
    Ok(report)
}

fn dispatch<C: GameApi>(
    client: &C,
    game_id: &str,
    action: &MoveAction,
) -> prefhub_client::Result<()> {
    let state = match action {
        MoveAction::Bid { contract } => client.place_bid(game_id, contract)?,
        MoveAction::TakePrikup { discard } => client.take_prikup(game_id, discard)?,
        MoveAction::PlayCard { card } => client.play_card(game_id, card)?,
    };
    debug!(player = client.username(), phase = state.phase_name(), "Move accepted");
    Ok(())
}

fn verify_final_state<C: GameApi>(
    clients: &ClientMap<C>,
    game_id: &str,
    observer: PlayerSeat,
    report: &mut ScenarioReport,
) {
    let Some(client) = clients.get(&observer) else {
        warn!(seat = %observer, "No observer session; skipping final state check");
        report.warning = Some(format!("No session for observer {observer}"));
        return;
    };

    match client.get_game_state(game_id) {
        Ok(state) => {
            report.final_phase = state.phase.clone();
            report.game_over = state.is_game_over();
            if report.game_over {
                info!(scenario = %report.name, "Game completed successfully");
            } else {
                debug!(scenario = %report.name, phase = state.phase_name(), "Final phase");
            }
        }
        Err(source) => {
            let warning = StateVerificationWarning {
                game_id: game_id.to_string(),
                source,
            };
            warn!("{warning}");
            report.warning = Some(warning.to_string());
        }
    }
}
