//! Error types for card and seat parsing.

use thiserror::Error;

/// A card token that is not of the form `RANK_SUIT`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CardFormatError {
    /// The token does not split into exactly two non-empty parts.
    #[error("Invalid card format: '{0}' (expected RANK_SUIT, e.g. SEVEN_DIAMONDS)")]
    Shape(String),

    /// The rank part is not a known rank name.
    #[error("Invalid card format: '{token}' has unknown rank '{rank}'")]
    UnknownRank {
        /// Full token as given.
        token: String,
        /// Offending rank part.
        rank: String,
    },

    /// The suit part is not a known suit name.
    #[error("Invalid card format: '{token}' has unknown suit '{suit}'")]
    UnknownSuit {
        /// Full token as given.
        token: String,
        /// Offending suit part.
        suit: String,
    },
}

/// A player name that is not one of the table seats.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown player: '{0}' (expected playerWest, playerEast or playerSouth)")]
pub struct SeatParseError(pub String);
