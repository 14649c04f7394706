//! Playing cards of the 32-card preference deck.
//!
//! Scenario files and session scripts name cards with a single wire token
//! `RANK_SUIT` (`SEVEN_DIAMONDS`, `ACE_SPADES`), while the server's game
//! endpoints expect a structured `{"suit": .., "rank": ..}` object. [`Card`]
//! is the structured form; [`Card::parse_token`] and [`Card::token`] convert
//! between the two.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CardFormatError;

/// Separator between the rank and suit parts of a wire token.
pub const TOKEN_SEPARATOR: char = '_';

/// Card rank, lowest to highest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Rank {
    /// 7
    Seven,
    /// 8
    Eight,
    /// 9
    Nine,
    /// 10
    Ten,
    /// Jack
    Jack,
    /// Queen
    Queen,
    /// King
    King,
    /// Ace
    Ace,
}

impl Rank {
    /// All ranks in ascending order.
    pub const ALL: [Rank; 8] = [
        Rank::Seven,
        Rank::Eight,
        Rank::Nine,
        Rank::Ten,
        Rank::Jack,
        Rank::Queen,
        Rank::King,
        Rank::Ace,
    ];

    /// Wire name, as used in tokens and JSON.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Rank::Seven => "SEVEN",
            Rank::Eight => "EIGHT",
            Rank::Nine => "NINE",
            Rank::Ten => "TEN",
            Rank::Jack => "JACK",
            Rank::Queen => "QUEEN",
            Rank::King => "KING",
            Rank::Ace => "ACE",
        }
    }

    /// Look up a rank by its exact wire name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|rank| rank.name() == name)
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Card suit, in the server's trump order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Suit {
    /// ♠
    Spades,
    /// ♣
    Clubs,
    /// ♦
    Diamonds,
    /// ♥
    Hearts,
}

impl Suit {
    /// All suits.
    pub const ALL: [Suit; 4] = [Suit::Spades, Suit::Clubs, Suit::Diamonds, Suit::Hearts];

    /// Wire name, as used in tokens and JSON.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Suit::Spades => "SPADES",
            Suit::Clubs => "CLUBS",
            Suit::Diamonds => "DIAMONDS",
            Suit::Hearts => "HEARTS",
        }
    }

    /// Look up a suit by its exact wire name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|suit| suit.name() == name)
    }
}

impl fmt::Display for Suit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single card. Serializes as `{"suit": "...", "rank": "..."}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Card {
    /// Suit of the card.
    pub suit: Suit,
    /// Rank of the card.
    pub rank: Rank,
}

impl Card {
    /// Create a new card.
    #[must_use]
    pub const fn new(rank: Rank, suit: Suit) -> Self {
        Self { suit, rank }
    }

    /// Parse a `RANK_SUIT` wire token.
    ///
    /// The token must split on `_` into exactly two non-empty parts, the
    /// first a rank name and the second a suit name.
    pub fn parse_token(token: &str) -> Result<Self, CardFormatError> {
        let mut parts = token.split(TOKEN_SEPARATOR);
        let (Some(rank), Some(suit), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(CardFormatError::Shape(token.to_string()));
        };
        if rank.is_empty() || suit.is_empty() {
            return Err(CardFormatError::Shape(token.to_string()));
        }

        let rank = Rank::from_name(rank).ok_or_else(|| CardFormatError::UnknownRank {
            token: token.to_string(),
            rank: rank.to_string(),
        })?;
        let suit = Suit::from_name(suit).ok_or_else(|| CardFormatError::UnknownSuit {
            token: token.to_string(),
            suit: suit.to_string(),
        })?;

        Ok(Self { suit, rank })
    }

    /// Parse a list of tokens, failing on the first malformed one.
    pub fn parse_tokens<S: AsRef<str>>(tokens: &[S]) -> Result<Vec<Self>, CardFormatError> {
        tokens.iter().map(|t| Self::parse_token(t.as_ref())).collect()
    }

    /// Encode back into the `RANK_SUIT` wire token.
    #[must_use]
    pub fn token(&self) -> String {
        format!("{}{}{}", self.rank.name(), TOKEN_SEPARATOR, self.suit.name())
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.rank, TOKEN_SEPARATOR, self.suit)
    }
}

impl FromStr for Card {
    type Err = CardFormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_token(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_token() {
        let card = Card::parse_token("SEVEN_DIAMONDS").unwrap();
        assert_eq!(card, Card::new(Rank::Seven, Suit::Diamonds));
        assert_eq!(card.token(), "SEVEN_DIAMONDS");
    }

    #[test]
    fn test_parse_rejects_missing_separator() {
        assert_eq!(
            Card::parse_token("ACESPADES"),
            Err(CardFormatError::Shape("ACESPADES".to_string()))
        );
    }

    #[test]
    fn test_parse_rejects_extra_separator() {
        assert!(matches!(
            Card::parse_token("ACE_OF_SPADES"),
            Err(CardFormatError::Shape(_))
        ));
    }

    #[test]
    fn test_parse_rejects_empty_parts() {
        assert!(matches!(Card::parse_token("_SPADES"), Err(CardFormatError::Shape(_))));
        assert!(matches!(Card::parse_token("ACE_"), Err(CardFormatError::Shape(_))));
        assert!(matches!(Card::parse_token(""), Err(CardFormatError::Shape(_))));
    }

    #[test]
    fn test_parse_rejects_unknown_names() {
        assert!(matches!(
            Card::parse_token("SIX_SPADES"),
            Err(CardFormatError::UnknownRank { rank, .. }) if rank == "SIX"
        ));
        assert!(matches!(
            Card::parse_token("ACE_STARS"),
            Err(CardFormatError::UnknownSuit { suit, .. }) if suit == "STARS"
        ));
        // Names are case sensitive on the wire.
        assert!(Card::parse_token("ace_spades").is_err());
    }

    #[test]
    fn test_parse_tokens_stops_at_first_bad_card() {
        let err = Card::parse_tokens(&["SEVEN_DIAMONDS", "BAD", "EIGHT_CLUBS"]).unwrap_err();
        assert_eq!(err, CardFormatError::Shape("BAD".to_string()));
    }

    #[test]
    fn test_card_serializes_as_suit_rank_object() {
        let json = serde_json::to_string(&Card::new(Rank::Nine, Suit::Spades)).unwrap();
        assert_eq!(json, r#"{"suit":"SPADES","rank":"NINE"}"#);
    }

    #[test]
    fn test_rank_order() {
        assert!(Rank::Seven < Rank::Ten);
        assert!(Rank::King < Rank::Ace);
    }
}
