//! Cards and the two card piles.
//!
//! - `Card` / `CardEffect`: the closed set of effects a card can carry
//! - `Deck`: a cyclic pile, randomized once and then replayed
//! - `Decks`: the chance and community chest piles together

mod card;
mod deck;
pub mod standard;

pub use card::{Card, CardEffect, DeckKind, NearestKind};
pub use deck::{Deck, Decks};
