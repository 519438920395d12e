//! Card definitions.
//!
//! The effect set is closed. The two effects the engine does not model
//! (nearest-square movement and repair assessments) are still variants so that
//! every `match` over [`CardEffect`] stays exhaustive and resolves them to an
//! explicit no-op.

use derive_more::Display;
use serde::{Deserialize, Serialize};

use crate::board::SquareId;
use crate::core::Money;

/// The two card piles.
#[derive(Clone, Copy, Debug, Display, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeckKind {
    /// Chance.
    Chance,
    /// Community chest.
    #[display("Community Chest")]
    CommunityChest,
}

/// Target of a move-to-nearest card.
#[derive(Clone, Copy, Debug, Display, PartialEq, Eq, Serialize, Deserialize)]
pub enum NearestKind {
    Railroad,
    Utility,
}

/// What a card does when drawn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CardEffect {
    /// Positive: the bank pays the drawer. Negative: the drawer pays the bank.
    BankMoney(Money),

    /// Positive: every other player pays the drawer this much.
    /// Negative: the drawer pays every other player the absolute amount.
    PlayerMoney(Money),

    /// Move this many squares; negative moves backwards.
    Move(i32),

    /// Move forward to an absolute square.
    MoveTo(SquareId),

    /// Keep a get-out-of-jail-free token.
    GetOutOfJailFree,

    /// Go directly to jail.
    GoToJail,

    /// Not modeled: resolves as a no-op.
    MoveNearest(NearestKind),

    /// Not modeled: resolves as a no-op.
    StreetRepairs {
        /// Assessment per house.
        per_house: Money,
        /// Assessment per hotel.
        per_hotel: Money,
    },
}

/// A card: the text shown to players plus its effect.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    /// Printed text.
    pub text: String,
    /// Effect applied on draw.
    pub effect: CardEffect,
}

impl Card {
    /// Create a card.
    pub fn new(text: impl Into<String>, effect: CardEffect) -> Self {
        Self {
            text: text.into(),
            effect,
        }
    }
}
