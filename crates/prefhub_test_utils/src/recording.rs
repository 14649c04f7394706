//! Client doubles that record calls instead of talking to a server.
//!
//! Every [`RecordingClient`] produced by one [`RecordingFactory`] writes to
//! the same call log, so a test sees the interleaving across players.

use std::cell::RefCell;
use std::rc::Rc;

use prefhub_client::protocol::{BID_PATH, EXCHANGE_PATH, GAME_STATE_PATH, PLAY_PATH};
use prefhub_client::{ClientError, ClientFactory, GameApi, GameState, Session};
use prefhub_core::Card;

/// What a recorded call did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedAction {
    /// `get_game_state`
    GetState,
    /// `place_bid`
    Bid(String),
    /// `take_prikup`
    TakePrikup(Vec<String>),
    /// `play_card`
    PlayCard(String),
}

/// One call made through a [`RecordingClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    /// Username of the client that made the call.
    pub username: String,
    /// Token of the client that made the call.
    pub token: String,
    /// Game the call was made against.
    pub game_id: String,
    /// The call itself.
    pub action: RecordedAction,
}

#[derive(Debug, Default)]
struct Script {
    calls: Vec<RecordedCall>,
    connected: Vec<String>,
    fail_move: Option<(usize, u16, String)>,
    fail_state_query: bool,
    phase: Option<String>,
}

/// Factory handing out [`RecordingClient`]s that share one call log.
#[derive(Debug, Clone, Default)]
pub struct RecordingFactory {
    script: Rc<RefCell<Script>>,
}

impl RecordingFactory {
    /// Factory whose clients accept every call.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail the `index`-th move call (0-based, state queries not counted)
    /// with an HTTP error.
    #[must_use]
    pub fn failing_move(self, index: usize, status: u16, body: &str) -> Self {
        self.script.borrow_mut().fail_move = Some((index, status, body.to_string()));
        self
    }

    /// Make state queries fail with HTTP 500.
    #[must_use]
    pub fn failing_state_query(self) -> Self {
        self.script.borrow_mut().fail_state_query = true;
        self
    }

    /// Phase returned by state queries (none by default).
    #[must_use]
    pub fn with_phase(self, phase: &str) -> Self {
        self.script.borrow_mut().phase = Some(phase.to_string());
        self
    }

    /// Every call recorded so far.
    #[must_use]
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.script.borrow().calls.clone()
    }

    /// Recorded move calls (state queries left out).
    #[must_use]
    pub fn moves(&self) -> Vec<RecordedCall> {
        self.calls()
            .into_iter()
            .filter(|c| c.action != RecordedAction::GetState)
            .collect()
    }

    /// Usernames of the sessions clients were built for, in order.
    #[must_use]
    pub fn connected(&self) -> Vec<String> {
        self.script.borrow().connected.clone()
    }
}

impl ClientFactory for RecordingFactory {
    type Client = RecordingClient;

    fn connect(&self, session: Session) -> prefhub_client::Result<RecordingClient> {
        self.script
            .borrow_mut()
            .connected
            .push(session.username.clone());
        Ok(RecordingClient {
            session,
            script: Rc::clone(&self.script),
        })
    }
}

/// A [`GameApi`] that records calls into its factory's log.
#[derive(Debug)]
pub struct RecordingClient {
    session: Session,
    script: Rc<RefCell<Script>>,
}

impl RecordingClient {
    fn record_move(
        &self,
        endpoint: &'static str,
        game_id: &str,
        action: RecordedAction,
    ) -> prefhub_client::Result<GameState> {
        let mut script = self.script.borrow_mut();
        let index = script
            .calls
            .iter()
            .filter(|c| c.action != RecordedAction::GetState)
            .count();
        script.calls.push(RecordedCall {
            username: self.session.username.clone(),
            token: self.session.token.as_str().to_string(),
            game_id: game_id.to_string(),
            action,
        });

        match &script.fail_move {
            Some((fail_at, status, body)) if *fail_at == index => Err(ClientError::Http {
                endpoint,
                status: *status,
                body: body.clone(),
            }),
            _ => Ok(GameState {
                game_id: Some(game_id.to_string()),
                ..GameState::default()
            }),
        }
    }
}

impl GameApi for RecordingClient {
    fn username(&self) -> &str {
        &self.session.username
    }

    fn get_game_state(&self, game_id: &str) -> prefhub_client::Result<GameState> {
        let mut script = self.script.borrow_mut();
        script.calls.push(RecordedCall {
            username: self.session.username.clone(),
            token: self.session.token.as_str().to_string(),
            game_id: game_id.to_string(),
            action: RecordedAction::GetState,
        });
        if script.fail_state_query {
            return Err(ClientError::Http {
                endpoint: GAME_STATE_PATH,
                status: 500,
                body: "state unavailable".to_string(),
            });
        }
        Ok(GameState {
            game_id: Some(game_id.to_string()),
            phase: script.phase.clone(),
            ..GameState::default()
        })
    }

    fn place_bid(&self, game_id: &str, contract: &str) -> prefhub_client::Result<GameState> {
        self.record_move(BID_PATH, game_id, RecordedAction::Bid(contract.to_string()))
    }

    fn take_prikup(&self, game_id: &str, discard: &[String]) -> prefhub_client::Result<GameState> {
        Card::parse_tokens(discard)?;
        self.record_move(
            EXCHANGE_PATH,
            game_id,
            RecordedAction::TakePrikup(discard.to_vec()),
        )
    }

    fn play_card(&self, game_id: &str, card: &str) -> prefhub_client::Result<GameState> {
        Card::parse_token(card)?;
        self.record_move(PLAY_PATH, game_id, RecordedAction::PlayCard(card.to_string()))
    }
}
