//! Game state.
//!
//! ## GameState
//!
//! Everything a session mutates:
//! - Configuration (read-only after setup)
//! - The board, including ownership back-references, houses and mortgages
//! - Players and the live turn queue
//! - Both card piles
//! - The append-only event log
//!
//! ## Ownership
//!
//! A player's `owned` list is the forward reference and a deed's `owner` is
//! the back-reference. [`GameState::transfer_square`] is the only code path
//! that changes either, so the two cannot drift apart.

use im::Vector;
use tracing::debug;

use super::config::GameConfig;
use super::event::GameEvent;
use super::player::{Money, Party, Player, PlayerId, PlayerMap};
use crate::board::{Board, Square, SquareId, MAX_HOUSES};
use crate::cards::{Card, DeckKind, Decks};
use crate::error::{ActionError, ActionResult, GameError, Result};

/// Complete mutable state of one session.
///
/// Uses an `im` vector for the event log so cloning a state (for snapshots or
/// what-if checks in tests) stays cheap.
#[derive(Clone, Debug)]
pub struct GameState {
    config: GameConfig,
    board: Board,
    players: PlayerMap<Player>,
    /// Seats still in the game, in turn order.
    turn_order: Vec<PlayerId>,
    decks: Decks,
    events: Vector<GameEvent>,
    round: u32,
}

impl GameState {
    /// Seat one player per name, each with the configured starting cash.
    ///
    /// Fails if the config is invalid or the name count disagrees with it.
    pub fn new(config: GameConfig, names: &[String], board: Board, decks: Decks) -> Result<Self> {
        config.validate()?;
        if names.len() != config.player_count {
            return Err(GameError::InvalidPlayerCount { count: names.len() });
        }

        let cash = config.starting_cash;
        let players = PlayerMap::new(config.player_count, |id| {
            Player::new(id, names[id.index()].clone(), cash)
        });
        let turn_order = players.player_ids().collect();

        Ok(Self {
            config,
            board,
            players,
            turn_order,
            decks,
            events: Vector::new(),
            round: 0,
        })
    }

    /// Standard board and empty card piles, with players named "Player N".
    ///
    /// Handy for tests that stage a position by hand.
    pub fn with_defaults(config: GameConfig) -> Result<Self> {
        let names: Vec<String> = PlayerId::all(config.player_count)
            .map(|id| id.to_string())
            .collect();
        Self::new(config, &names, Board::standard(), Decks::empty())
    }

    // === Configuration & board ===

    /// Rule constants.
    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// The board.
    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// One square.
    #[must_use]
    pub fn square(&self, id: SquareId) -> &Square {
        self.board.square(id)
    }

    // === Players ===

    /// Number of seats, including bankrupt ones.
    #[must_use]
    pub fn player_count(&self) -> usize {
        self.players.player_count()
    }

    /// One player.
    #[must_use]
    pub fn player(&self, id: PlayerId) -> &Player {
        &self.players[id]
    }

    /// One player, mutably.
    pub fn player_mut(&mut self, id: PlayerId) -> &mut Player {
        &mut self.players[id]
    }

    /// All seats, bankrupt ones included.
    pub fn players(&self) -> impl Iterator<Item = &Player> {
        self.players.iter().map(|(_, p)| p)
    }

    /// Live turn queue.
    #[must_use]
    pub fn turn_order(&self) -> &[PlayerId] {
        &self.turn_order
    }

    /// Replace the turn queue (used to rotate the starting player).
    ///
    /// Must be a permutation of the current queue.
    pub fn set_turn_order(&mut self, order: Vec<PlayerId>) -> Result<()> {
        let mut proposed = order.clone();
        let mut current = self.turn_order.clone();
        proposed.sort();
        current.sort();
        if proposed != current {
            return Err(GameError::inconsistent(
                "new turn order is not a permutation of the live queue",
            ));
        }
        self.turn_order = order;
        Ok(())
    }

    /// Whether the seat is still in the game.
    #[must_use]
    pub fn is_active(&self, id: PlayerId) -> bool {
        self.turn_order.contains(&id)
    }

    /// Players still in the game.
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.turn_order.len()
    }

    /// Drop a bankrupt seat from the queue. Its `Player` record stays.
    pub fn remove_from_queue(&mut self, id: PlayerId) {
        self.turn_order.retain(|&p| p != id);
        debug!(player = %id, remaining = self.turn_order.len(), "removed from turn queue");
    }

    /// Credit a counterparty. The bank absorbs the payment.
    pub fn credit(&mut self, party: Party, amount: Money) {
        if let Party::Player(id) = party {
            self.players[id].adjust_cash(amount);
        }
    }

    // === Ownership ===

    /// Move a deed to `new_owner` (or back to the bank with `None`), updating
    /// both the old and the new owner's `owned` list.
    pub fn transfer_square(
        &mut self,
        square: SquareId,
        new_owner: Option<PlayerId>,
    ) -> ActionResult<()> {
        let deed = self
            .board
            .square_mut(square)
            .deed_mut()
            .ok_or(ActionError::NotOwnable { square })?;

        let previous = deed.owner();
        deed.set_owner(new_owner);

        if let Some(old) = previous {
            self.players[old].remove_owned(square);
        }
        if let Some(new) = new_owner {
            self.players[new].add_owned(square);
        }

        debug!(%square, ?previous, ?new_owner, "transferred deed");
        Ok(())
    }

    /// Set a deed's mortgage flag.
    pub(crate) fn set_mortgaged(&mut self, square: SquareId, mortgaged: bool) -> ActionResult<()> {
        self.board
            .square_mut(square)
            .deed_mut()
            .ok_or(ActionError::NotOwnable { square })?
            .set_mortgaged(mortgaged);
        Ok(())
    }

    /// Set a property's house count.
    pub(crate) fn set_houses(&mut self, square: SquareId, houses: u8) -> ActionResult<()> {
        if houses > MAX_HOUSES {
            return Err(ActionError::HouseLimit {
                square,
                requested: houses,
            });
        }
        self.board
            .square_mut(square)
            .property_mut()
            .ok_or(ActionError::NotAProperty { square })?
            .set_houses(houses);
        Ok(())
    }

    // === Valuation ===

    /// Cash plus list price of every deed plus the build cost of every house.
    ///
    /// Base for the percentage income-tax option.
    #[must_use]
    pub fn total_assets(&self, id: PlayerId) -> Money {
        let player = &self.players[id];
        let holdings: Money = player
            .owned()
            .iter()
            .map(|&sq| {
                let square = self.board.square(sq);
                let deed = square.deed().map_or(0, |d| d.cost);
                let houses = square
                    .property()
                    .map_or(0, |p| Money::from(p.houses()) * p.house_cost);
                deed + houses
            })
            .sum();
        player.cash() + holdings
    }

    /// Cash plus everything the player could still raise: the mortgage value
    /// of each unmortgaged deed and half the build cost of each house.
    #[must_use]
    pub fn liquidation_value(&self, id: PlayerId) -> Money {
        let player = &self.players[id];
        let raisable: Money = player
            .owned()
            .iter()
            .map(|&sq| {
                let square = self.board.square(sq);
                let mortgage = match square.deed() {
                    Some(deed) if !deed.is_mortgaged() => deed.mortgage_value,
                    _ => 0,
                };
                let houses = square
                    .property()
                    .map_or(0, |p| Money::from(p.houses()) * p.house_sale_value());
                mortgage + houses
            })
            .sum();
        player.cash() + raisable
    }

    // === Cards ===

    /// Draw from a pile. `None` only when the pile is empty.
    pub fn draw_card(&mut self, kind: DeckKind) -> Option<Card> {
        self.decks.draw(kind)
    }

    // === Rounds & events ===

    /// Completed rounds.
    #[must_use]
    pub fn round(&self) -> u32 {
        self.round
    }

    /// Mark a round complete.
    pub fn advance_round(&mut self) {
        self.round += 1;
    }

    /// Append to the event log.
    pub fn record(&mut self, event: GameEvent) {
        self.events.push_back(event);
    }

    /// The event log, oldest first.
    #[must_use]
    pub fn events(&self) -> &Vector<GameEvent> {
        &self.events
    }

    /// Check that every owner back-reference matches a forward reference and
    /// vice versa, and that improved properties sit in a monopoly.
    pub fn check_invariants(&self) -> Result<()> {
        for square in self.board.iter() {
            if let Some(owner) = square.owner() {
                if !self.players[owner].owns(square.id) {
                    return Err(GameError::inconsistent(format!(
                        "{} names {owner} as owner but is not in their holdings",
                        square.id
                    )));
                }
            }
            if let Some(property) = square.property() {
                if property.houses() > 0 {
                    let monopoly = square
                        .owner()
                        .is_some_and(|owner| self.board.is_monopoly(property.group, owner));
                    if !monopoly {
                        return Err(GameError::inconsistent(format!(
                            "{} has houses outside a monopoly",
                            square.id
                        )));
                    }
                }
            }
        }

        for (id, player) in self.players.iter() {
            for &sq in player.owned() {
                if self.board.square(sq).owner() != Some(id) {
                    return Err(GameError::inconsistent(format!(
                        "{id} holds {sq} but the deed disagrees"
                    )));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(players: usize) -> GameState {
        GameState::with_defaults(GameConfig::new(players)).unwrap()
    }

    #[test]
    fn test_new_state() {
        let state = state(3);

        assert_eq!(state.player_count(), 3);
        assert_eq!(state.active_count(), 3);
        assert_eq!(state.player(PlayerId::new(2)).name, "Player 2");
        assert_eq!(state.player(PlayerId::new(0)).cash(), 1500);
        assert!(state.events().is_empty());
    }

    #[test]
    fn test_name_count_must_match() {
        let names = vec!["Ada".to_string()];
        let result = GameState::new(GameConfig::new(2), &names, Board::standard(), Decks::empty());
        assert_eq!(result.err(), Some(GameError::InvalidPlayerCount { count: 1 }));
    }

    #[test]
    fn test_transfer_keeps_both_sides_in_step() {
        let mut state = state(2);
        let p0 = PlayerId::new(0);
        let p1 = PlayerId::new(1);
        let boardwalk = SquareId::new(39);

        state.transfer_square(boardwalk, Some(p0)).unwrap();
        assert_eq!(state.square(boardwalk).owner(), Some(p0));
        assert!(state.player(p0).owns(boardwalk));

        state.transfer_square(boardwalk, Some(p1)).unwrap();
        assert!(!state.player(p0).owns(boardwalk));
        assert!(state.player(p1).owns(boardwalk));

        state.transfer_square(boardwalk, None).unwrap();
        assert_eq!(state.square(boardwalk).owner(), None);
        assert!(state.player(p1).owned().is_empty());
        assert!(state.check_invariants().is_ok());
    }

    #[test]
    fn test_transfer_rejects_unownable_square() {
        let mut state = state(2);
        assert!(state
            .transfer_square(SquareId::GO, Some(PlayerId::new(0)))
            .is_err());
    }

    #[test]
    fn test_remove_from_queue() {
        let mut state = state(3);
        state.remove_from_queue(PlayerId::new(1));

        assert_eq!(state.turn_order(), &[PlayerId::new(0), PlayerId::new(2)]);
        assert!(!state.is_active(PlayerId::new(1)));
        // The record survives.
        assert_eq!(state.player(PlayerId::new(1)).cash(), 1500);
    }

    #[test]
    fn test_set_turn_order_must_be_permutation() {
        let mut state = state(3);
        let rotated = vec![PlayerId::new(2), PlayerId::new(0), PlayerId::new(1)];
        assert!(state.set_turn_order(rotated.clone()).is_ok());
        assert_eq!(state.turn_order(), rotated.as_slice());

        assert!(state
            .set_turn_order(vec![PlayerId::new(0), PlayerId::new(0), PlayerId::new(1)])
            .is_err());
    }

    #[test]
    fn test_valuations() {
        let mut state = state(2);
        let p0 = PlayerId::new(0);

        // Brown monopoly with two houses on Baltic, Reading mortgaged.
        state.transfer_square(SquareId::new(1), Some(p0)).unwrap();
        state.transfer_square(SquareId::new(3), Some(p0)).unwrap();
        state.transfer_square(SquareId::new(5), Some(p0)).unwrap();
        state.set_houses(SquareId::new(3), 2).unwrap();
        state.set_mortgaged(SquareId::new(5), true).unwrap();

        // 1500 + 60 + 60 + 200 + 2 * 50
        assert_eq!(state.total_assets(p0), 1920);
        // 1500 + 30 + 30 + 0 + 2 * 25
        assert_eq!(state.liquidation_value(p0), 1610);
        assert!(state.check_invariants().is_ok());
    }

    #[test]
    fn test_houses_outside_monopoly_break_invariants() {
        let mut state = state(2);
        state
            .transfer_square(SquareId::new(1), Some(PlayerId::new(0)))
            .unwrap();
        state.set_houses(SquareId::new(1), 1).unwrap();
        assert!(state.check_invariants().is_err());
    }

    #[test]
    fn test_credit_bank_is_a_sink() {
        let mut state = state(2);
        state.credit(Party::Bank, 500);
        state.credit(Party::Player(PlayerId::new(1)), 25);
        assert_eq!(state.player(PlayerId::new(1)).cash(), 1525);
        assert_eq!(state.player(PlayerId::new(0)).cash(), 1500);
    }

    #[test]
    fn test_record_events() {
        let mut state = state(2);
        state.record(GameEvent::AuctionUnsold {
            square: SquareId::new(12),
        });
        state.advance_round();

        assert_eq!(state.events().len(), 1);
        assert_eq!(state.round(), 1);
    }
}
