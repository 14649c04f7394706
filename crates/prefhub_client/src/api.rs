//! Seams between the scenario harness and the HTTP client.
//!
//! The harness drives games through [`GameApi`] and obtains one client per
//! session from a [`ClientFactory`], so it can run against test doubles as
//! well as a live server.

use crate::error::Result;
use crate::protocol::GameState;
use crate::session::Session;

/// Game actions a scripted player performs.
pub trait GameApi {
    /// Username of the session the client acts for.
    fn username(&self) -> &str;

    /// Fetch the current game state.
    fn get_game_state(&self, game_id: &str) -> Result<GameState>;

    /// Place a bid for a contract.
    fn place_bid(&self, game_id: &str, contract: &str) -> Result<GameState>;

    /// Take the prikup and discard the given card tokens.
    fn take_prikup(&self, game_id: &str, discard: &[String]) -> Result<GameState>;

    /// Play the card named by a token.
    fn play_card(&self, game_id: &str, card: &str) -> Result<GameState>;
}

/// Builds a client bound to an existing session.
pub trait ClientFactory {
    /// Client type produced.
    type Client: GameApi;

    /// Bind a client to `session`.
    fn connect(&self, session: Session) -> Result<Self::Client>;
}
