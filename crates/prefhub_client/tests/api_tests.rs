//! Client behaviour against an in-process mock server.
//!
//! Checks what goes over the wire: paths, bearer tokens and request bodies.

use prefhub_client::protocol::{
    BID_PATH, CREATE_GAME_PATH, EXCHANGE_PATH, GAME_STATE_PATH, JOIN_GAME_PATH, LIST_GAMES_PATH,
    LOGIN_PATH, LOGOUT_PATH, NEXT_ROUND_PATH, PLAY_PATH, REGISTER_PATH,
};
use prefhub_client::{
    register, ClientConfig, ClientError, GameApi, GameClient, Session, DEFAULT_RULE_ID,
};
use prefhub_test_utils::mock_server::{MockBehavior, MockGameServer};
use serde_json::json;

fn bound(server: &MockGameServer, token: &str, username: &str) -> GameClient {
    let config = ClientConfig::new(server.base_url());
    GameClient::bind_session(&config, Session::new(token, username)).unwrap()
}

// ==========================================================================
// Authentication
// ==========================================================================

#[test]
fn test_login_binds_returned_token() {
    let server = MockGameServer::start();
    let config = ClientConfig::new(server.base_url());

    let client = GameClient::login(&config, "playerSouth", "secret").unwrap();
    assert_eq!(client.token().as_str(), "mock-session-token-0001");
    assert_eq!(client.session().username, "playerSouth");

    client.get_game_state("g1").unwrap();
    let login = &server.requests_to(LOGIN_PATH)[0];
    assert_eq!(login.bearer, None);
    assert_eq!(
        login.body,
        json!({"username": "playerSouth", "password": "secret"})
    );
    assert_eq!(
        server.requests_to(GAME_STATE_PATH)[0].bearer.as_deref(),
        Some("mock-session-token-0001")
    );
}

#[test]
fn test_rejected_login_is_auth_error() {
    let server = MockGameServer::with_behavior(
        MockBehavior::default().fail(LOGIN_PATH, 401, "Bad credentials"),
    );
    let config = ClientConfig::new(server.base_url());

    let err = GameClient::login(&config, "playerWest", "wrong").unwrap_err();
    match err {
        ClientError::Auth {
            username,
            status,
            body,
        } => {
            assert_eq!(username, "playerWest");
            assert_eq!(status, 401);
            assert_eq!(body, "Bad credentials");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_register_and_logout() {
    let server = MockGameServer::start();
    let config = ClientConfig::new(server.base_url());

    register(&config, "newbie", "pw").unwrap();
    let client = bound(&server, "tok-1", "newbie");
    client.logout().unwrap();

    assert_eq!(server.paths(), vec![REGISTER_PATH, LOGOUT_PATH]);
    assert_eq!(
        server.requests_to(LOGOUT_PATH)[0].bearer.as_deref(),
        Some("tok-1")
    );
}

// ==========================================================================
// Game operations
// ==========================================================================

#[test]
fn test_create_and_join_game() {
    let server = MockGameServer::start();
    let host = bound(&server, "south-token", "playerSouth");
    let guest = bound(&server, "west-token", "playerWest");

    let created = host.create_game("g7", DEFAULT_RULE_ID).unwrap();
    assert_eq!(created.game_id.as_deref(), Some("g7"));
    let joined = guest.join_game("g7").unwrap();
    assert_eq!(joined.game_id.as_deref(), Some("g7"));

    assert_eq!(server.paths(), vec![CREATE_GAME_PATH, JOIN_GAME_PATH]);
    let create = &server.requests_to(CREATE_GAME_PATH)[0];
    assert_eq!(create.bearer.as_deref(), Some("south-token"));
    assert_eq!(create.body, json!({"gameId": "g7", "ruleId": "sochinka"}));
    let join = &server.requests_to(JOIN_GAME_PATH)[0];
    assert_eq!(join.bearer.as_deref(), Some("west-token"));
    assert_eq!(join.body, json!({"gameId": "g7"}));
}

#[test]
fn test_rejected_join_is_http_error() {
    let server = MockGameServer::with_behavior(
        MockBehavior::default().fail(JOIN_GAME_PATH, 409, "Game is full"),
    );
    let client = bound(&server, "t", "playerEast");

    match client.join_game("g7").unwrap_err() {
        ClientError::Http {
            endpoint,
            status,
            body,
        } => {
            assert_eq!(endpoint, JOIN_GAME_PATH);
            assert_eq!(status, 409);
            assert_eq!(body, "Game is full");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_each_client_sends_its_own_token() {
    let server = MockGameServer::start();
    let south = bound(&server, "south-token", "playerSouth");
    let west = bound(&server, "west-token", "playerWest");

    south.place_bid("g1", "Misere").unwrap();
    west.play_card("g1", "NINE_SPADES").unwrap();

    let requests = server.requests();
    assert_eq!(requests[0].path, BID_PATH);
    assert_eq!(requests[0].bearer.as_deref(), Some("south-token"));
    assert_eq!(requests[1].path, PLAY_PATH);
    assert_eq!(requests[1].bearer.as_deref(), Some("west-token"));
}

#[test]
fn test_request_bodies() {
    let server = MockGameServer::start();
    let client = bound(&server, "t", "playerSouth");

    client.place_bid("g1", "Misere").unwrap();
    client
        .take_prikup("g1", &["SEVEN_DIAMONDS", "EIGHT_CLUBS"])
        .unwrap();
    client.play_card("g1", "ACE_HEARTS").unwrap();

    assert_eq!(
        server.requests_to(BID_PATH)[0].body,
        json!({"gameId": "g1", "contract": "Misere"})
    );
    assert_eq!(
        server.requests_to(EXCHANGE_PATH)[0].body,
        json!({
            "gameId": "g1",
            "cards": [
                {"suit": "DIAMONDS", "rank": "SEVEN"},
                {"suit": "CLUBS", "rank": "EIGHT"}
            ]
        })
    );
    assert_eq!(
        server.requests_to(PLAY_PATH)[0].body,
        json!({"gameId": "g1", "card": {"suit": "HEARTS", "rank": "ACE"}})
    );
}

#[test]
fn test_state_query_carries_game_id() {
    let server = MockGameServer::with_behavior(MockBehavior::default().final_phase("BIDDING"));
    let client = bound(&server, "t", "playerSouth");

    let state = GameApi::get_game_state(&client, "test-game-0").unwrap();
    assert_eq!(state.phase.as_deref(), Some("BIDDING"));
    assert!(!state.is_game_over());
    assert_eq!(
        server.requests_to(GAME_STATE_PATH)[0].query.as_deref(),
        Some("gameId=test-game-0")
    );
}

#[test]
fn test_game_over_reported() {
    let server = MockGameServer::start();
    let client = bound(&server, "t", "playerSouth");
    assert!(client.get_game_state("g").unwrap().is_game_over());
}

#[test]
fn test_message_only_reply_accepted() {
    let server = MockGameServer::start();
    let client = bound(&server, "t", "playerSouth");

    let state = client.place_bid("g1", "PASS").unwrap();
    assert_eq!(state.phase, None);
    assert_eq!(state.extra["message"], "Bid placed successfully");
}

#[test]
fn test_rejected_move_is_http_error() {
    let server = MockGameServer::with_behavior(
        MockBehavior::default().fail(EXCHANGE_PATH, 400, "Invalid discard"),
    );
    let client = bound(&server, "t", "playerSouth");

    let err = client
        .take_prikup("g1", &["SEVEN_DIAMONDS", "EIGHT_CLUBS"])
        .unwrap_err();
    assert_eq!(err.status(), Some(400));
    assert_eq!(
        err.to_string(),
        format!("400 - Invalid discard ({EXCHANGE_PATH})")
    );
}

#[test]
fn test_malformed_card_sends_nothing() {
    let server = MockGameServer::start();
    let client = bound(&server, "t", "playerWest");

    let err = client.play_card("g1", "NINE-SPADES").unwrap_err();
    assert!(matches!(err, ClientError::CardFormat(_)));
    let err = client
        .take_prikup("g1", &["SEVEN_DIAMONDS", "EIGHT"])
        .unwrap_err();
    assert!(matches!(err, ClientError::CardFormat(_)));

    assert!(server.requests().is_empty());
}

#[test]
fn test_list_games_and_next_round() {
    let server = MockGameServer::start();
    let client = bound(&server, "t", "playerSouth");

    assert_eq!(client.list_games().unwrap(), json!([]));
    let state = client.next_round("g1").unwrap();
    assert_eq!(state.game_id.as_deref(), Some("g1"));
    assert_eq!(server.paths(), vec![LIST_GAMES_PATH, NEXT_ROUND_PATH]);
}

#[test]
fn test_unreachable_server_is_transport_error() {
    let config = ClientConfig::new("http://127.0.0.1:9");
    let client = GameClient::bind_session(&config, Session::new("t", "playerSouth")).unwrap();
    let err = client.get_game_state("g1").unwrap_err();
    assert!(matches!(err, ClientError::Transport { .. }));
}
