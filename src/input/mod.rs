//! The decision provider: every question the engine asks a player.
//!
//! The engine never parses text. It asks a typed question with a stated
//! domain and gets back a value inside that domain. Re-prompting on bad input
//! is the provider's job; a provider that gives up (closed stdin, exhausted
//! script) returns a fatal [`GameError`](crate::error::GameError).
//!
//! Two providers ship with the crate:
//! - [`ScriptedDecisions`]: replays canned [`Answer`]s, for tests and replays
//! - [`ConsoleDecisions`](crate::console::ConsoleDecisions): line-based
//!   terminal input

mod scripted;

pub use scripted::{Answer, ScriptedDecisions};

use std::ops::RangeInclusive;

use derive_more::Display;

use crate::board::SquareId;
use crate::core::{Money, PlayerId};
use crate::error::Result;

/// One option the provider may pick, with its display label.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Candidate<T> {
    /// Value handed back to the engine.
    pub id: T,
    /// Text shown to the player.
    pub label: String,
}

impl<T> Candidate<T> {
    /// Pair a value with a label.
    pub fn new(id: T, label: impl Into<String>) -> Self {
        Self {
            id,
            label: label.into(),
        }
    }
}

/// What the engine is asking. The `Display` text is the question shown to a
/// human.
#[derive(Clone, Debug, Display, PartialEq, Eq)]
pub enum Prompt {
    #[display("{player}, buy {square} for ${price}?")]
    BuyProperty {
        player: String,
        square: String,
        price: Money,
    },

    #[display("Auctioning {square}. Would anyone like to bid? Minimum bid: ${minimum}")]
    OfferBid { square: String, minimum: Money },

    #[display("Who is bidding?")]
    ChooseBidder,

    #[display("{player}, enter your bid (minimum ${minimum})")]
    EnterBid { player: String, minimum: Money },

    #[display("{player}, pay 10% (${percentage}) or ${flat}?")]
    IncomeTax {
        player: String,
        percentage: Money,
        flat: Money,
    },

    #[display("{player}, you are in jail. What would you like to do?")]
    JailOptions { player: String },

    #[display("{player}, you need ${outstanding} more. How will you raise it?")]
    LiquidationMethod { player: String, outstanding: Money },

    #[display("{player}, which square would you like to mortgage?")]
    SelectMortgage { player: String },

    #[display("{player}, which square would you like to unmortgage?")]
    SelectUnmortgage { player: String },

    #[display("{player}, on which property would you like to build?")]
    SelectBuild { player: String },

    #[display("{player}, on which property would you like to sell houses?")]
    SelectSell { player: String },

    #[display("How many houses on {square}?")]
    HouseCount { square: String },

    #[display("{player}, would you like to take any additional actions?")]
    TurnAction { player: String },

    #[display("{player}, with whom would you like to trade?")]
    TradePartner { player: String },

    #[display("Cash from {partner} to {player}? (negative if you pay them)")]
    TradeCash { player: String, partner: String },

    #[display("{player}, which square will you give?")]
    TradeGive { player: String },

    #[display("{player}, which square will you receive from {partner}?")]
    TradeReceive { player: String, partner: String },

    #[display("{partner}, do you accept the trade from {player}?")]
    AcceptTrade { player: String, partner: String },

    #[display("{player}, add a square you will give?")]
    GiveMore { player: String },

    #[display("{player}, add a square you want from {partner}?")]
    ReceiveMore { player: String, partner: String },

    #[display("Name for {seat}?")]
    PlayerName { seat: PlayerId },
}

/// Source of every player decision.
///
/// All calls block until an answer is available. Answers are guaranteed to
/// lie in the stated domain: `ask_int` within `domain`, `ask_choice` below
/// `labels.len()`, `ask_player`/`ask_square` one of the candidates' ids.
pub trait DecisionProvider {
    /// Yes or no.
    fn ask_yes_no(&mut self, prompt: &Prompt) -> Result<bool>;

    /// An integer within `domain`.
    fn ask_int(&mut self, prompt: &Prompt, domain: RangeInclusive<Money>) -> Result<Money>;

    /// Index into `labels`. `labels` is never empty.
    fn ask_choice(&mut self, prompt: &Prompt, labels: &[&str]) -> Result<usize>;

    /// One of `candidates`. Never called with an empty slice.
    fn ask_player(&mut self, prompt: &Prompt, candidates: &[Candidate<PlayerId>])
        -> Result<PlayerId>;

    /// One of `candidates`. Never called with an empty slice.
    fn ask_square(&mut self, prompt: &Prompt, candidates: &[Candidate<SquareId>])
        -> Result<SquareId>;

    /// Free text.
    fn ask_text(&mut self, prompt: &Prompt) -> Result<String>;
}

impl<D: DecisionProvider + ?Sized> DecisionProvider for Box<D> {
    fn ask_yes_no(&mut self, prompt: &Prompt) -> Result<bool> {
        (**self).ask_yes_no(prompt)
    }

    fn ask_int(&mut self, prompt: &Prompt, domain: RangeInclusive<Money>) -> Result<Money> {
        (**self).ask_int(prompt, domain)
    }

    fn ask_choice(&mut self, prompt: &Prompt, labels: &[&str]) -> Result<usize> {
        (**self).ask_choice(prompt, labels)
    }

    fn ask_player(
        &mut self,
        prompt: &Prompt,
        candidates: &[Candidate<PlayerId>],
    ) -> Result<PlayerId> {
        (**self).ask_player(prompt, candidates)
    }

    fn ask_square(
        &mut self,
        prompt: &Prompt,
        candidates: &[Candidate<SquareId>],
    ) -> Result<SquareId> {
        (**self).ask_square(prompt, candidates)
    }

    fn ask_text(&mut self, prompt: &Prompt) -> Result<String> {
        (**self).ask_text(prompt)
    }
}
