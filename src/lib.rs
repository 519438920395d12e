//! # rust-monopoly
//!
//! A rules engine for a 2-8 player property-trading board game.
//!
//! ## Design Principles
//!
//! 1. **Decisions Are Injected**: the engine never reads a terminal. Every
//!    player choice goes through a `DecisionProvider`, so the same rules run
//!    under a console, a test script or an AI.
//!
//! 2. **Deterministic Replays**: dice and card shuffles come from seeded
//!    streams, and scripted dice replay a fixed sequence.
//!
//! 3. **One Ownership Path**: a square's owner and the owner's holdings only
//!    change through `GameState::transfer_square`.
//!
//! ## Modules
//!
//! - `core`: players, state, events, RNG, configuration
//! - `board`: square variants and the 40-square layout
//! - `cards`: card effects and the two piles
//! - `dice`: fair and scripted dice
//! - `input`: the decision provider and scripted answers
//! - `rules`: turns, rent, settlements, auctions, jail, holdings
//! - `session`: the round loop, observers and snapshots
//! - `console`: terminal collaborators

pub mod board;
pub mod cards;
pub mod console;
pub mod core;
pub mod dice;
pub mod error;
pub mod input;
pub mod rules;
pub mod session;

// Re-export commonly used types
pub use crate::core::{
    GameConfig, GameEvent, GameRng, GameState, JailStatus, Money, Party, Player, PlayerId,
    PlayerMap,
};

pub use crate::board::{Board, ColorGroup, Square, SquareId, SquareKind};

pub use crate::cards::{Card, CardEffect, Deck, DeckKind, Decks};

pub use crate::dice::{DiceSource, RandomDice, Roll, ScriptedDice};

pub use crate::input::{Answer, Candidate, DecisionProvider, Prompt, ScriptedDecisions};

pub use crate::rules::{
    AuctionResolver, CardResolver, Holdings, JailStateMachine, RentCalculator, Settlement,
    TradeOffer, TransactionResolver, TurnEngine,
};

pub use crate::session::{GameOutcome, Session, SessionBuilder, SessionObserver, Snapshot};

pub use crate::error::{ActionError, GameError, Result};
