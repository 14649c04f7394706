//! Typed scripted moves.

use std::fmt;

use prefhub_core::PlayerSeat;
use serde::Deserialize;
use serde_json::Value;

use crate::error::MoveError;
use crate::scenario::MoveSpec;

/// What a player does. Tags match the `action` field in scenario files.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum MoveAction {
    /// Declare a contract.
    Bid {
        /// Contract name, passed through to the server.
        contract: String,
    },
    /// Take the prikup and discard the given cards.
    TakePrikup {
        /// Card tokens to discard.
        discard: Vec<String>,
    },
    /// Play a card.
    PlayCard {
        /// Card token.
        card: String,
    },
}

impl MoveAction {
    /// Every accepted action tag.
    pub const TAGS: [&'static str; 3] = ["bid", "takePrikup", "playCard"];

    /// Action tag, as written in scenario files.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Bid { .. } => "bid",
            Self::TakePrikup { .. } => "takePrikup",
            Self::PlayCard { .. } => "playCard",
        }
    }
}

impl fmt::Display for MoveAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bid { contract } => write!(f, "Bidding: {contract}"),
            Self::TakePrikup { discard } => {
                write!(f, "Taking prikup, discarding: {}", discard.join(", "))
            }
            Self::PlayCard { card } => write!(f, "Playing card: {card}"),
        }
    }
}

/// A move with its acting seat resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Move {
    /// Seat making the move.
    pub player: PlayerSeat,
    /// What the seat does.
    pub action: MoveAction,
}

impl TryFrom<&MoveSpec> for Move {
    type Error = MoveError;

    fn try_from(spec: &MoveSpec) -> Result<Self, Self::Error> {
        if !MoveAction::TAGS.contains(&spec.action.as_str()) {
            return Err(MoveError::UnknownAction(spec.action.clone()));
        }
        let player = spec
            .player
            .parse::<PlayerSeat>()
            .map_err(|e| MoveError::UnknownPlayer(e.0))?;

        let mut fields = spec.fields.clone();
        fields.insert("action".to_string(), Value::String(spec.action.clone()));
        let action = serde_json::from_value(Value::Object(fields)).map_err(|source| {
            MoveError::InvalidMove {
                action: spec.action.clone(),
                source,
            }
        })?;

        Ok(Self { player, action })
    }
}
