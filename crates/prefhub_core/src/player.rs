//! Table seats.
//!
//! In scenario mode the server seats three fixed players. Their usernames
//! double as keys in the token file and as the `player` field of scripted
//! moves.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SeatParseError;

/// One of the three seats at a scenario-mode table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PlayerSeat {
    /// West seat (`playerWest`).
    #[serde(rename = "playerWest", alias = "West", alias = "west")]
    West,
    /// East seat (`playerEast`).
    #[serde(rename = "playerEast", alias = "East", alias = "east")]
    East,
    /// South seat (`playerSouth`), the dealer in scenario mode.
    #[serde(rename = "playerSouth", alias = "South", alias = "south")]
    South,
}

impl PlayerSeat {
    /// Every seat, in provisioning order.
    pub const ALL: [PlayerSeat; 3] = [PlayerSeat::West, PlayerSeat::East, PlayerSeat::South];

    /// Username / token-file key of the seat.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            PlayerSeat::West => "playerWest",
            PlayerSeat::East => "playerEast",
            PlayerSeat::South => "playerSouth",
        }
    }

    /// Short seat name.
    #[must_use]
    pub const fn short_name(self) -> &'static str {
        match self {
            PlayerSeat::West => "West",
            PlayerSeat::East => "East",
            PlayerSeat::South => "South",
        }
    }
}

impl fmt::Display for PlayerSeat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for PlayerSeat {
    type Err = SeatParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|seat| s == seat.key() || s.eq_ignore_ascii_case(seat.short_name()))
            .ok_or_else(|| SeatParseError(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_keys_and_short_names() {
        assert_eq!("playerWest".parse(), Ok(PlayerSeat::West));
        assert_eq!("East".parse(), Ok(PlayerSeat::East));
        assert_eq!("south".parse(), Ok(PlayerSeat::South));
    }

    #[test]
    fn test_parse_unknown_seat() {
        assert_eq!(
            "playerNorth".parse::<PlayerSeat>(),
            Err(SeatParseError("playerNorth".to_string()))
        );
    }

    #[test]
    fn test_serde_uses_keys() {
        let json = serde_json::to_string(&PlayerSeat::South).unwrap();
        assert_eq!(json, r#""playerSouth""#);
        let seat: PlayerSeat = serde_json::from_str(r#""West""#).unwrap();
        assert_eq!(seat, PlayerSeat::West);
    }

    #[test]
    fn test_key_round_trips_through_from_str() {
        for seat in PlayerSeat::ALL {
            assert_eq!(seat.key().parse(), Ok(seat));
        }
    }
}
