//! Wire types for the PrefHub HTTP API.
//!
//! All bodies are JSON with camelCase field names:
//!
//! ```text
//! POST /api/auth/login      {"username":"playerSouth","password":"..."}  -> {"token":"..."}
//! POST /api/games/bid       {"gameId":"g1","contract":"MISER"}
//! POST /api/games/exchange  {"gameId":"g1","cards":[{"suit":"DIAMONDS","rank":"SEVEN"}]}
//! POST /api/games/play      {"gameId":"g1","card":{"suit":"SPADES","rank":"NINE"}}
//! GET  /api/games/state?gameId=g1                                        -> {"phase":"PLAYING",...}
//! ```

use prefhub_core::Card;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// ============================================================================
// Endpoints
// ============================================================================

/// `POST` register a new user.
pub const REGISTER_PATH: &str = "/api/auth/register";
/// `POST` log in and obtain a session token.
pub const LOGIN_PATH: &str = "/api/auth/login";
/// `POST` invalidate the current session.
pub const LOGOUT_PATH: &str = "/api/auth/logout";
/// `POST` create a game.
pub const CREATE_GAME_PATH: &str = "/api/games/create";
/// `POST` join a game.
pub const JOIN_GAME_PATH: &str = "/api/games/join";
/// `GET` list games.
pub const LIST_GAMES_PATH: &str = "/api/games/list";
/// `GET` current game state (query parameter `gameId`).
pub const GAME_STATE_PATH: &str = "/api/games/state";
/// `POST` place a bid.
pub const BID_PATH: &str = "/api/games/bid";
/// `POST` take the prikup and discard.
pub const EXCHANGE_PATH: &str = "/api/games/exchange";
/// `POST` play a card.
pub const PLAY_PATH: &str = "/api/games/play";
/// `POST` start the next round.
pub const NEXT_ROUND_PATH: &str = "/api/games/next-round";

/// Phase reported once a scripted game has been played out.
pub const GAME_OVER_PHASE: &str = "GAME_OVER";

// ============================================================================
// Requests
// ============================================================================

/// Login / register body.
#[derive(Debug, Serialize)]
pub struct Credentials<'a> {
    /// Username.
    pub username: &'a str,
    /// Password.
    pub password: &'a str,
}

/// Body of `create`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateGameRequest<'a> {
    /// Game identifier.
    pub game_id: &'a str,
    /// Rule set identifier.
    pub rule_id: &'a str,
}

/// Body of calls that only name a game (`join`, `next-round`).
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameRef<'a> {
    /// Game identifier.
    pub game_id: &'a str,
}

/// Body of `bid`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BidRequest<'a> {
    /// Game identifier.
    pub game_id: &'a str,
    /// Contract name, passed through to the server verbatim.
    pub contract: &'a str,
}

/// Body of `exchange`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExchangeRequest<'a> {
    /// Game identifier.
    pub game_id: &'a str,
    /// Cards to discard.
    pub cards: Vec<Card>,
}

/// Body of `play`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayCardRequest<'a> {
    /// Game identifier.
    pub game_id: &'a str,
    /// Card to play.
    pub card: Card,
}

// ============================================================================
// Responses
// ============================================================================

/// Successful login.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    /// Session token for the `Authorization: Bearer` header.
    pub token: String,
}

/// Server view of a game.
///
/// Only the fields the harness inspects are typed; everything else the
/// server sends is kept in [`GameState::extra`]. Action endpoints that
/// answer with a bare `{"message": ..}` decode to a state with no phase.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    /// Game identifier, when the server includes it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub game_id: Option<String>,
    /// Current phase (`BIDDING`, `PLAYING`, `GAME_OVER`, ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phase: Option<String>,
    /// Remaining fields, verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl GameState {
    /// Phase name, or `"unknown"` when the server did not report one.
    #[must_use]
    pub fn phase_name(&self) -> &str {
        self.phase.as_deref().unwrap_or("unknown")
    }

    /// Whether the game has been played to the end.
    #[must_use]
    pub fn is_game_over(&self) -> bool {
        self.phase.as_deref() == Some(GAME_OVER_PHASE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prefhub_core::{Rank, Suit};

    #[test]
    fn test_exchange_request_shape() {
        let req = ExchangeRequest {
            game_id: "g1",
            cards: vec![
                Card::new(Rank::Seven, Suit::Diamonds),
                Card::new(Rank::Eight, Suit::Clubs),
            ],
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "gameId": "g1",
                "cards": [
                    {"suit": "DIAMONDS", "rank": "SEVEN"},
                    {"suit": "CLUBS", "rank": "EIGHT"}
                ]
            })
        );
    }

    #[test]
    fn test_game_state_keeps_unknown_fields() {
        let state: GameState = serde_json::from_str(
            r#"{"gameId":"g1","phase":"GAME_OVER","currentPlayerIndex":2}"#,
        )
        .unwrap();
        assert!(state.is_game_over());
        assert_eq!(state.game_id.as_deref(), Some("g1"));
        assert_eq!(state.extra["currentPlayerIndex"], 2);
    }

    #[test]
    fn test_message_only_response_has_no_phase() {
        let state: GameState =
            serde_json::from_str(r#"{"message":"Bid placed successfully"}"#).unwrap();
        assert_eq!(state.phase_name(), "unknown");
        assert!(!state.is_game_over());
    }
}
