//! Blocking HTTP client for the game server.

use std::time::Duration;

use prefhub_core::Card;
use reqwest::blocking::{Client, RequestBuilder};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info};

use crate::api::{ClientFactory, GameApi};
use crate::error::{ClientError, Result};
use crate::protocol::{
    BidRequest, CreateGameRequest, Credentials, ExchangeRequest, GameRef, GameState,
    LoginResponse, PlayCardRequest, BID_PATH, CREATE_GAME_PATH, EXCHANGE_PATH, GAME_STATE_PATH,
    JOIN_GAME_PATH, LIST_GAMES_PATH, LOGIN_PATH, LOGOUT_PATH, NEXT_ROUND_PATH, PLAY_PATH,
    REGISTER_PATH,
};
use crate::session::{Session, SessionToken};

/// Server address used when none is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8090";

/// Rule set used by `create_game` callers that have no preference.
pub const DEFAULT_RULE_ID: &str = "sochinka";

/// Placeholder endpoint name for errors raised while building the transport.
const CLIENT_SETUP: &str = "<client setup>";

/// Connection settings shared by every client of a run.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the server, without a trailing slash.
    pub base_url: String,
    /// Per-request timeout. `None` keeps the transport default.
    pub timeout: Option<Duration>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: None,
        }
    }
}

impl ClientConfig {
    /// Config for a specific server.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            ..Default::default()
        }
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn build_http(&self) -> Result<Client> {
        let mut builder = Client::builder();
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        builder.build().map_err(|source| ClientError::Transport {
            endpoint: CLIENT_SETUP,
            source,
        })
    }
}

impl ClientFactory for ClientConfig {
    type Client = GameClient;

    fn connect(&self, session: Session) -> Result<GameClient> {
        GameClient::bind_session(self, session)
    }
}

/// Register a new user. Does not log in.
pub fn register(config: &ClientConfig, username: &str, password: &str) -> Result<()> {
    let http = config.build_http()?;
    let request = http
        .post(config.url(REGISTER_PATH))
        .json(&Credentials { username, password });
    let (status, body) = send(REGISTER_PATH, request)?;
    if !status.is_success() {
        return Err(ClientError::Http {
            endpoint: REGISTER_PATH,
            status: status.as_u16(),
            body,
        });
    }
    info!(username, "Registered user");
    Ok(())
}

/// A client acting for one authenticated user.
///
/// One request is in flight at a time and failed calls are returned as-is.
#[derive(Debug)]
pub struct GameClient {
    http: Client,
    config: ClientConfig,
    session: Session,
}

impl GameClient {
    /// Log in and return a client bound to the new session.
    pub fn login(config: &ClientConfig, username: &str, password: &str) -> Result<Self> {
        let http = config.build_http()?;
        let request = http
            .post(config.url(LOGIN_PATH))
            .json(&Credentials { username, password });
        let (status, body) = send(LOGIN_PATH, request)?;
        if !status.is_success() {
            return Err(ClientError::Auth {
                username: username.to_string(),
                status: status.as_u16(),
                body,
            });
        }

        let login: LoginResponse =
            serde_json::from_str(&body).map_err(|source| ClientError::Decode {
                endpoint: LOGIN_PATH,
                source,
            })?;
        let session = Session::new(login.token, username);
        info!(username, token = %session.token.preview(), "Logged in");

        Ok(Self {
            http,
            config: config.clone(),
            session,
        })
    }

    /// Bind a client to a token issued out-of-band. No request is made.
    pub fn bind_session(config: &ClientConfig, session: Session) -> Result<Self> {
        debug!(username = %session.username, token = %session.token.preview(), "Bound session");
        Ok(Self {
            http: config.build_http()?,
            config: config.clone(),
            session,
        })
    }

    /// The session this client acts for.
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Bearer token of the session.
    pub fn token(&self) -> &SessionToken {
        &self.session.token
    }

    /// End the session on the server.
    pub fn logout(self) -> Result<()> {
        self.post(LOGOUT_PATH, &serde_json::json!({}))?;
        info!(username = %self.session.username, "Logged out");
        Ok(())
    }

    /// Create a game with the given rule set.
    pub fn create_game(&self, game_id: &str, rule_id: &str) -> Result<GameState> {
        self.post(CREATE_GAME_PATH, &CreateGameRequest { game_id, rule_id })
    }

    /// Join an existing game.
    pub fn join_game(&self, game_id: &str) -> Result<GameState> {
        self.post(JOIN_GAME_PATH, &GameRef { game_id })
    }

    /// List games visible to this user.
    pub fn list_games(&self) -> Result<Value> {
        let request = self.authorized(self.http.get(self.config.url(LIST_GAMES_PATH)));
        let body = self.expect_success(LIST_GAMES_PATH, request)?;
        if body.trim().is_empty() {
            return Ok(Value::Array(Vec::new()));
        }
        serde_json::from_str(&body).map_err(|source| ClientError::Decode {
            endpoint: LIST_GAMES_PATH,
            source,
        })
    }

    /// Fetch the current game state.
    pub fn get_game_state(&self, game_id: &str) -> Result<GameState> {
        let request = self.authorized(
            self.http
                .get(self.config.url(GAME_STATE_PATH))
                .query(&[("gameId", game_id)]),
        );
        let body = self.expect_success(GAME_STATE_PATH, request)?;
        decode_state(GAME_STATE_PATH, &body)
    }

    /// Place a bid. The contract name is passed through unchanged.
    pub fn place_bid(&self, game_id: &str, contract: &str) -> Result<GameState> {
        self.post(BID_PATH, &BidRequest { game_id, contract })
    }

    /// Take the prikup and discard `discard`.
    ///
    /// Every token is parsed before the request is built.
    pub fn take_prikup<S: AsRef<str>>(&self, game_id: &str, discard: &[S]) -> Result<GameState> {
        let cards = Card::parse_tokens(discard)?;
        self.post(EXCHANGE_PATH, &ExchangeRequest { game_id, cards })
    }

    /// Play a single card.
    pub fn play_card(&self, game_id: &str, card: &str) -> Result<GameState> {
        let card = Card::parse_token(card)?;
        self.post(PLAY_PATH, &PlayCardRequest { game_id, card })
    }

    /// Advance to the next round after a round completes.
    pub fn next_round(&self, game_id: &str) -> Result<GameState> {
        self.post(NEXT_ROUND_PATH, &GameRef { game_id })
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request.bearer_auth(self.session.token.as_str())
    }

    fn post<B: Serialize>(&self, endpoint: &'static str, body: &B) -> Result<GameState> {
        let request = self.authorized(self.http.post(self.config.url(endpoint)).json(body));
        let body = self.expect_success(endpoint, request)?;
        decode_state(endpoint, &body)
    }

    fn expect_success(&self, endpoint: &'static str, request: RequestBuilder) -> Result<String> {
        let (status, body) = send(endpoint, request)?;
        debug!(
            username = %self.session.username,
            endpoint,
            status = status.as_u16(),
            "API call"
        );
        if !status.is_success() {
            return Err(ClientError::Http {
                endpoint,
                status: status.as_u16(),
                body,
            });
        }
        Ok(body)
    }
}

impl GameApi for GameClient {
    fn username(&self) -> &str {
        &self.session.username
    }

    fn get_game_state(&self, game_id: &str) -> Result<GameState> {
        GameClient::get_game_state(self, game_id)
    }

    fn place_bid(&self, game_id: &str, contract: &str) -> Result<GameState> {
        GameClient::place_bid(self, game_id, contract)
    }

    fn take_prikup(&self, game_id: &str, discard: &[String]) -> Result<GameState> {
        GameClient::take_prikup(self, game_id, discard)
    }

    fn play_card(&self, game_id: &str, card: &str) -> Result<GameState> {
        GameClient::play_card(self, game_id, card)
    }
}

fn send(endpoint: &'static str, request: RequestBuilder) -> Result<(reqwest::StatusCode, String)> {
    let response = request
        .send()
        .map_err(|source| ClientError::Transport { endpoint, source })?;
    let status = response.status();
    let body = response
        .text()
        .map_err(|source| ClientError::Transport { endpoint, source })?;
    Ok((status, body))
}

fn decode_state(endpoint: &'static str, body: &str) -> Result<GameState> {
    if body.trim().is_empty() {
        return Ok(GameState::default());
    }
    serde_json::from_str(body).map_err(|source| ClientError::Decode { endpoint, source })
}
