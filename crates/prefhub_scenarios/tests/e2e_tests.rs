//! End-to-end runs: real HTTP client, mock server, token files on disk.

use std::time::Duration;

use prefhub_client::protocol::{BID_PATH, EXCHANGE_PATH, GAME_STATE_PATH, PLAY_PATH};
use prefhub_client::ClientConfig;
use prefhub_core::PlayerSeat;
use prefhub_scenarios::{
    ExecutionError, ExecutorConfig, MoveError, ProvisionError, RunState, ScenarioExecutor,
    ScenarioStore, StorageDirTokenSource,
};
use prefhub_test_utils::fixtures::{token_for, TokenStorage, SCENARIOS_JSON, TEST0_GAME_ID};
use prefhub_test_utils::mock_server::{MockBehavior, MockGameServer};
use serde_json::json;

fn executor(
    server: &MockGameServer,
    storage: &TokenStorage,
) -> ScenarioExecutor<StorageDirTokenSource, ClientConfig> {
    ScenarioExecutor::new(
        ScenarioStore::from_json_str(SCENARIOS_JSON).unwrap(),
        StorageDirTokenSource::new(storage.root()),
        ClientConfig::new(server.base_url()).with_timeout(Duration::from_secs(5)),
        ExecutorConfig::default().with_move_delay(Duration::ZERO),
    )
}

#[test]
fn test_test0_runs_to_game_over() {
    let server = MockGameServer::start();
    let storage = TokenStorage::new();
    storage.add_full_run("run-1");

    let mut exec = executor(&server, &storage);
    let report = exec.execute_test("test0").unwrap();
    assert_eq!(exec.state(), &RunState::Completed);
    assert!(report.scenarios[0].game_over);

    assert_eq!(
        server.paths(),
        vec![BID_PATH, EXCHANGE_PATH, PLAY_PATH, GAME_STATE_PATH]
    );

    let requests = server.requests();
    let south = token_for(PlayerSeat::South);
    let west = token_for(PlayerSeat::West);
    assert_eq!(requests[0].bearer.as_deref(), Some(south.as_str()));
    assert_eq!(
        requests[0].body,
        json!({"gameId": TEST0_GAME_ID, "contract": "Misere"})
    );
    assert_eq!(requests[1].bearer.as_deref(), Some(south.as_str()));
    assert_eq!(
        requests[1].body["cards"],
        json!([
            {"suit": "DIAMONDS", "rank": "SEVEN"},
            {"suit": "CLUBS", "rank": "EIGHT"}
        ])
    );
    assert_eq!(requests[2].bearer.as_deref(), Some(west.as_str()));
    assert_eq!(
        requests[2].body["card"],
        json!({"suit": "SPADES", "rank": "NINE"})
    );
    assert_eq!(requests[3].bearer.as_deref(), Some(south.as_str()));
}

#[test]
fn test_rejected_exchange_stops_before_play() {
    let server = MockGameServer::with_behavior(
        MockBehavior::default().fail(EXCHANGE_PATH, 400, "Invalid discard"),
    );
    let storage = TokenStorage::new();
    storage.add_full_run("run-1");

    let mut exec = executor(&server, &storage);
    assert!(!exec.run_test("test0"));
    assert_eq!(exec.state(), &RunState::Failed);

    assert_eq!(server.paths(), vec![BID_PATH, EXCHANGE_PATH]);
    assert!(server.requests_to(PLAY_PATH).is_empty());
}

#[test]
fn test_failure_names_the_move() {
    let server = MockGameServer::with_behavior(
        MockBehavior::default().fail(EXCHANGE_PATH, 400, "Invalid discard"),
    );
    let storage = TokenStorage::new();
    storage.add_full_run("run-1");

    let err = executor(&server, &storage)
        .execute_test("test0")
        .unwrap_err();
    let failure = match err {
        ExecutionError::ScenarioFailed { failure, .. } => failure,
        other => panic!("unexpected error: {other}"),
    };
    assert_eq!(failure.number, 2);
    assert_eq!(failure.player, "playerSouth");
    assert!(matches!(failure.source, MoveError::Client(_)));
    assert!(failure.to_string().contains("400 - Invalid discard"));
}

#[test]
fn test_newest_run_directory_used() {
    let server = MockGameServer::start();
    let storage = TokenStorage::new();
    storage.add_run("run-old", &[PlayerSeat::West]);
    std::thread::sleep(Duration::from_millis(50));
    storage.add_full_run("run-new");

    assert!(executor(&server, &storage).run_test("test0"));
}

#[test]
fn test_missing_seat_sends_no_requests() {
    let server = MockGameServer::start();
    let storage = TokenStorage::new();
    storage.add_run("run-1", &[PlayerSeat::West, PlayerSeat::South]);

    let err = executor(&server, &storage)
        .execute_test("test0")
        .unwrap_err();
    assert!(matches!(
        err,
        ExecutionError::Provision(ProvisionError::MissingPlayerToken(PlayerSeat::East))
    ));
    assert!(server.requests().is_empty());
}

#[test]
fn test_no_run_directory() {
    let server = MockGameServer::start();
    let storage = TokenStorage::new();

    let err = executor(&server, &storage)
        .execute_test("test0")
        .unwrap_err();
    assert!(matches!(
        err,
        ExecutionError::Provision(ProvisionError::NoScenarioStorageFound { .. })
    ));
}

#[test]
fn test_state_failure_is_only_a_warning() {
    let server = MockGameServer::with_behavior(
        MockBehavior::default().fail(GAME_STATE_PATH, 500, "boom"),
    );
    let storage = TokenStorage::new();
    storage.add_full_run("run-1");

    let report = executor(&server, &storage).execute_test("test0").unwrap();
    assert!(report.scenarios[0].warning.is_some());
    assert_eq!(report.scenarios[0].moves_dispatched, 3);
}
