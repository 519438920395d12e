//! Game events.
//!
//! Every state change worth observing is appended to the event log on
//! [`GameState`](super::GameState). The log is append-only and never read back
//! by the engine itself; tests and observers use it to see what happened
//! without scraping console text.

use serde::{Deserialize, Serialize};

use super::player::{Money, Party, PlayerId};
use crate::board::SquareId;
use crate::cards::{CardEffect, DeckKind};

/// Why a player left jail.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReleaseReason {
    /// Rolled a double.
    Doubles,
    /// Paid the release fee.
    PaidFee,
    /// Spent a get-out-of-jail-free token.
    Token,
}

/// Why a player entered jail.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum JailReason {
    /// Landed on the send-to-jail square.
    Square,
    /// Drew a go-to-jail card.
    Card,
    /// Third double in one turn.
    TripleDoubles,
}

/// A thing that happened.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Dice rolled.
    Rolled {
        player: PlayerId,
        first: u8,
        second: u8,
    },

    /// Token moved.
    Moved {
        player: PlayerId,
        from: SquareId,
        to: SquareId,
    },

    /// A forward move wrapped past Go.
    PassedGo { player: PlayerId, bonus: Money },

    /// Token came to rest and the square is being resolved.
    Landed { player: PlayerId, square: SquareId },

    /// Square bought from the bank at list price.
    Purchased {
        player: PlayerId,
        square: SquareId,
        price: Money,
    },

    /// Auction bid accepted.
    AuctionBid {
        player: PlayerId,
        square: SquareId,
        amount: Money,
    },

    /// Auction bid refused (below the minimum or beyond the bidder's cash).
    BidRejected {
        player: PlayerId,
        square: SquareId,
        amount: Money,
        minimum: Money,
    },

    /// Auction closed with a winner.
    AuctionWon {
        player: PlayerId,
        square: SquareId,
        price: Money,
    },

    /// Auction closed with no bids.
    AuctionUnsold { square: SquareId },

    /// Rent settled.
    RentPaid {
        payer: PlayerId,
        owner: PlayerId,
        square: SquareId,
        amount: Money,
    },

    /// Tax settled.
    TaxPaid {
        player: PlayerId,
        square: SquareId,
        amount: Money,
    },

    /// Card drawn.
    CardDrawn {
        player: PlayerId,
        deck: DeckKind,
        effect: CardEffect,
    },

    /// Player incarcerated.
    Jailed { player: PlayerId, reason: JailReason },

    /// Player released from jail.
    Released {
        player: PlayerId,
        reason: ReleaseReason,
    },

    /// Deed mortgaged.
    Mortgaged {
        player: PlayerId,
        square: SquareId,
        value: Money,
    },

    /// Mortgage lifted.
    Unmortgaged {
        player: PlayerId,
        square: SquareId,
        cost: Money,
    },

    /// Houses added to a property.
    HousesBuilt {
        player: PlayerId,
        square: SquareId,
        count: u8,
    },

    /// Houses sold back to the bank.
    HousesSold {
        player: PlayerId,
        square: SquareId,
        count: u8,
        proceeds: Money,
    },

    /// Trade completed between two players.
    Traded {
        proposer: PlayerId,
        partner: PlayerId,
        /// Positive: partner paid proposer.
        cash: Money,
        given: Vec<SquareId>,
        received: Vec<SquareId>,
    },

    /// A settled obligation. `creditor` is the bank for taxes and fees.
    Paid {
        debtor: PlayerId,
        creditor: Party,
        amount: Money,
    },

    /// Player went bankrupt and left the turn queue.
    Bankrupt { player: PlayerId, creditor: Party },
}

impl GameEvent {
    /// The player the event is primarily about, if any.
    #[must_use]
    pub fn player(&self) -> Option<PlayerId> {
        use GameEvent::*;

        match self {
            Rolled { player, .. }
            | Moved { player, .. }
            | PassedGo { player, .. }
            | Landed { player, .. }
            | Purchased { player, .. }
            | AuctionBid { player, .. }
            | BidRejected { player, .. }
            | AuctionWon { player, .. }
            | TaxPaid { player, .. }
            | CardDrawn { player, .. }
            | Jailed { player, .. }
            | Released { player, .. }
            | Mortgaged { player, .. }
            | Unmortgaged { player, .. }
            | HousesBuilt { player, .. }
            | HousesSold { player, .. }
            | Bankrupt { player, .. } => Some(*player),
            RentPaid { payer, .. } => Some(*payer),
            Traded { proposer, .. } => Some(*proposer),
            Paid { debtor, .. } => Some(*debtor),
            AuctionUnsold { .. } => None,
        }
    }
}
