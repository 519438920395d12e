//! Cyclic card piles.
//!
//! A deck is a fixed multiset of cards whose order is randomized once when the
//! session starts. Draws walk that order and start over from the top when it
//! runs out, so the sequence repeats with period `len()`.

use super::card::{Card, DeckKind};
use super::standard;
use crate::core::GameRng;

/// One card pile.
#[derive(Clone, Debug)]
pub struct Deck {
    kind: DeckKind,
    cards: Vec<Card>,
    next: usize,
}

impl Deck {
    /// A deck that deals `cards` in the given order.
    #[must_use]
    pub fn new(kind: DeckKind, cards: Vec<Card>) -> Self {
        Self {
            kind,
            cards,
            next: 0,
        }
    }

    /// A deck dealt in an order drawn from `rng`.
    #[must_use]
    pub fn shuffled(kind: DeckKind, mut cards: Vec<Card>, rng: &mut GameRng) -> Self {
        rng.shuffle(&mut cards);
        Self::new(kind, cards)
    }

    /// Which pile this is.
    #[must_use]
    pub fn kind(&self) -> DeckKind {
        self.kind
    }

    /// Cards in the pile.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Whether the pile has no cards at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Deal the next card, cycling back to the top after the last one.
    ///
    /// Returns `None` only for an empty pile.
    pub fn draw(&mut self) -> Option<Card> {
        if self.cards.is_empty() {
            return None;
        }
        if self.next >= self.cards.len() {
            self.next = 0;
        }
        let card = self.cards[self.next].clone();
        self.next += 1;
        Some(card)
    }
}

/// Both card piles.
#[derive(Clone, Debug)]
pub struct Decks {
    chance: Deck,
    community_chest: Deck,
}

impl Decks {
    /// Pair up two piles.
    #[must_use]
    pub fn new(chance: Deck, community_chest: Deck) -> Self {
        Self {
            chance,
            community_chest,
        }
    }

    /// The standard piles, each shuffled on its own stream derived from `rng`.
    #[must_use]
    pub fn standard(rng: &GameRng) -> Self {
        let mut chance_rng = rng.for_context("chance");
        let mut chest_rng = rng.for_context("community-chest");

        Self::new(
            Deck::shuffled(DeckKind::Chance, standard::chance_cards(), &mut chance_rng),
            Deck::shuffled(
                DeckKind::CommunityChest,
                standard::community_chest_cards(),
                &mut chest_rng,
            ),
        )
    }

    /// Two empty piles; every draw is a no-op.
    #[must_use]
    pub fn empty() -> Self {
        Self::new(
            Deck::new(DeckKind::Chance, Vec::new()),
            Deck::new(DeckKind::CommunityChest, Vec::new()),
        )
    }

    /// The pile of `kind`.
    pub fn get_mut(&mut self, kind: DeckKind) -> &mut Deck {
        match kind {
            DeckKind::Chance => &mut self.chance,
            DeckKind::CommunityChest => &mut self.community_chest,
        }
    }

    /// Deal from the pile of `kind`.
    pub fn draw(&mut self, kind: DeckKind) -> Option<Card> {
        self.get_mut(kind).draw()
    }
}
