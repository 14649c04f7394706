//! # PrefHub Client
//!
//! Typed, blocking access to the PrefHub game server's HTTP API.
//!
//! A [`GameClient`] is always bound to exactly one session: either obtained
//! through [`GameClient::login`], or attached to a token that was issued
//! out-of-band with [`GameClient::bind_session`]. The credential never
//! changes for the lifetime of the client.
//!
//! Card arguments are given as `RANK_SUIT` wire tokens and converted to
//! structured cards before anything is sent; a malformed token fails the
//! call without touching the network.
//!
//! ```no_run
//! use prefhub_client::{ClientConfig, GameClient};
//!
//! let config = ClientConfig::default();
//! let client = GameClient::login(&config, "playerSouth", "secret")?;
//! client.place_bid("game-1", "MISER")?;
//! client.take_prikup("game-1", &["SEVEN_DIAMONDS", "EIGHT_CLUBS"])?;
//! # Ok::<(), prefhub_client::ClientError>(())
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

pub mod api;
pub mod client;
pub mod error;
pub mod protocol;
pub mod session;

pub use api::{ClientFactory, GameApi};
pub use client::{register, ClientConfig, GameClient, DEFAULT_BASE_URL, DEFAULT_RULE_ID};
pub use error::{ClientError, Result};
pub use protocol::{GameState, GAME_OVER_PHASE};
pub use session::{Session, SessionToken};
