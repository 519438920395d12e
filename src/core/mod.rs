//! Core engine types: players, state, events, RNG, configuration.
//!
//! These are the building blocks every rule component works against. Rule
//! constants come from `GameConfig` rather than being hardcoded in the rules.

pub mod config;
pub mod event;
pub mod player;
pub mod rng;
pub mod state;

pub use config::{GameConfig, MAX_PLAYERS, MIN_PLAYERS};
pub use event::{GameEvent, JailReason, ReleaseReason};
pub use player::{JailStatus, Money, Party, Player, PlayerId, PlayerMap};
pub use rng::GameRng;
pub use state::GameState;
