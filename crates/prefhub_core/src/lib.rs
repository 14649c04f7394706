//! # PrefHub Core
//!
//! Value types shared by the PrefHub API client and the scenario harness.
//!
//! This crate contains **only** plain data and parsing:
//! - No network access
//! - No filesystem access
//!
//! ## Crate Structure
//!
//! - [`card`] - Ranks, suits and the `RANK_SUIT` wire token
//! - [`player`] - The three table seats of a scenario-mode game
//! - [`error`] - Parse errors for cards and seats

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

pub mod card;
pub mod error;
pub mod player;

pub use card::{Card, Rank, Suit};
pub use error::{CardFormatError, SeatParseError};
pub use player::PlayerSeat;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::card::{Card, Rank, Suit};
    pub use crate::error::{CardFormatError, SeatParseError};
    pub use crate::player::PlayerSeat;
}
