//! Houses, mortgages and trades.
//!
//! Every operation validates its preconditions against the current state and
//! returns an [`ActionError`] without touching anything when one fails. The
//! caller decides what to do with a refusal; the post-turn menu logs it and
//! asks again.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::board::{SquareId, MAX_HOUSES};
use crate::core::{GameEvent, GameState, Money, PlayerId};
use crate::error::{ActionError, ActionResult};

/// A proposed exchange between two players.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeOffer {
    /// Positive: the partner pays the proposer. Negative: the proposer pays.
    pub cash: Money,
    /// Squares moving from proposer to partner.
    pub give: Vec<SquareId>,
    /// Squares moving from partner to proposer.
    pub receive: Vec<SquareId>,
}

/// Rule checks and mutations for a player's holdings.
pub struct Holdings;

impl Holdings {
    // === Candidates ===

    /// Squares `player` could mortgage right now.
    #[must_use]
    pub fn mortgageable(state: &GameState, player: PlayerId) -> Vec<SquareId> {
        Self::owned_where(state, player, |sq| {
            Self::check_mortgage(state, player, sq).is_ok()
        })
    }

    /// Squares `player` could lift a mortgage from, ignoring cash.
    #[must_use]
    pub fn unmortgageable(state: &GameState, player: PlayerId) -> Vec<SquareId> {
        Self::owned_where(state, player, |sq| state.square(sq).is_mortgaged())
    }

    /// Properties `player` could add at least one house to, ignoring cash.
    #[must_use]
    pub fn buildable(state: &GameState, player: PlayerId) -> Vec<SquareId> {
        Self::owned_where(state, player, |sq| {
            matches!(
                Self::check_build(state, player, sq, 1),
                Ok(_) | Err(ActionError::InsufficientFunds { .. })
            )
        })
    }

    /// Properties carrying houses.
    #[must_use]
    pub fn sellable(state: &GameState, player: PlayerId) -> Vec<SquareId> {
        Self::owned_where(state, player, |sq| state.square(sq).houses() > 0)
    }

    /// Squares that may change hands in a trade.
    #[must_use]
    pub fn tradeable(state: &GameState, player: PlayerId) -> Vec<SquareId> {
        Self::owned_where(state, player, |sq| Self::check_tradeable(state, sq).is_ok())
    }

    fn owned_where(
        state: &GameState,
        player: PlayerId,
        keep: impl Fn(SquareId) -> bool,
    ) -> Vec<SquareId> {
        state
            .player(player)
            .owned()
            .iter()
            .copied()
            .filter(|&sq| keep(sq))
            .collect()
    }

    // === Precondition checks ===

    /// Mortgage value `player` would raise by mortgaging `square`.
    pub fn check_mortgage(state: &GameState, player: PlayerId, square: SquareId) -> ActionResult<Money> {
        let sq = state.square(square);
        let deed = sq.deed().ok_or(ActionError::NotOwnable { square })?;
        if deed.owner() != Some(player) {
            return Err(ActionError::NotOwner { square });
        }
        if deed.is_mortgaged() {
            return Err(ActionError::AlreadyMortgaged { square });
        }
        if sq.houses() > 0 {
            return Err(ActionError::HasHouses { square });
        }
        Ok(deed.mortgage_value)
    }

    fn check_unmortgage(state: &GameState, player: PlayerId, square: SquareId) -> ActionResult<Money> {
        let deed = state
            .square(square)
            .deed()
            .ok_or(ActionError::NotOwnable { square })?;
        if deed.owner() != Some(player) {
            return Err(ActionError::NotOwner { square });
        }
        if !deed.is_mortgaged() {
            return Err(ActionError::NotMortgaged { square });
        }
        let cost = state.config().unmortgage_cost(deed.mortgage_value);
        let available = state.player(player).cash();
        if available < cost {
            return Err(ActionError::InsufficientFunds {
                needed: cost,
                available,
            });
        }
        Ok(cost)
    }

    /// Cost of adding `count` houses.
    fn check_build(
        state: &GameState,
        player: PlayerId,
        square: SquareId,
        count: u8,
    ) -> ActionResult<Money> {
        let sq = state.square(square);
        let property = sq.property().ok_or(ActionError::NotAProperty { square })?;
        if property.deed.owner() != Some(player) {
            return Err(ActionError::NotOwner { square });
        }
        if count == 0 {
            return Err(ActionError::InvalidCount { count: 0 });
        }

        let board = state.board();
        let group_mortgaged = board
            .group_members(property.group)
            .iter()
            .any(|&member| board.square(member).is_mortgaged());
        if !board.is_monopoly(property.group, player) || group_mortgaged {
            return Err(ActionError::NoMonopoly { square });
        }

        if property.houses().saturating_add(count) > MAX_HOUSES {
            return Err(ActionError::HouseLimit {
                square,
                requested: count,
            });
        }

        let cost = property.house_cost * Money::from(count);
        let available = state.player(player).cash();
        if available < cost {
            return Err(ActionError::InsufficientFunds {
                needed: cost,
                available,
            });
        }
        Ok(cost)
    }

    /// Proceeds from selling `count` houses.
    fn check_sell(
        state: &GameState,
        player: PlayerId,
        square: SquareId,
        count: u8,
    ) -> ActionResult<Money> {
        let property = state
            .square(square)
            .property()
            .ok_or(ActionError::NotAProperty { square })?;
        if property.deed.owner() != Some(player) {
            return Err(ActionError::NotOwner { square });
        }
        if property.houses() == 0 {
            return Err(ActionError::NoHouses { square });
        }
        if count == 0 || count > property.houses() {
            return Err(ActionError::InvalidCount {
                count: i64::from(count),
            });
        }
        Ok(property.house_sale_value() * Money::from(count))
    }

    fn check_tradeable(state: &GameState, square: SquareId) -> ActionResult<()> {
        let sq = state.square(square);
        if !sq.is_ownable() {
            return Err(ActionError::NotOwnable { square });
        }
        if let Some(property) = sq.property() {
            if state.board().group_has_houses(property.group) {
                return Err(ActionError::GroupImproved { square });
            }
        }
        Ok(())
    }

    // === Raising money without touching cash ===

    /// Mortgage `square` and return its value without crediting it.
    ///
    /// Liquidation applies the value against a debt directly.
    pub(crate) fn raise_by_mortgage(
        state: &mut GameState,
        player: PlayerId,
        square: SquareId,
    ) -> ActionResult<Money> {
        let value = Self::check_mortgage(state, player, square)?;
        state.set_mortgaged(square, true)?;
        state.record(GameEvent::Mortgaged {
            player,
            square,
            value,
        });
        debug!(%player, %square, value, "mortgaged");
        Ok(value)
    }

    /// Sell `count` houses and return the proceeds without crediting them.
    pub(crate) fn raise_by_selling(
        state: &mut GameState,
        player: PlayerId,
        square: SquareId,
        count: u8,
    ) -> ActionResult<Money> {
        let proceeds = Self::check_sell(state, player, square, count)?;
        let remaining = state.square(square).houses() - count;
        state.set_houses(square, remaining)?;
        state.record(GameEvent::HousesSold {
            player,
            square,
            count,
            proceeds,
        });
        debug!(%player, %square, count, proceeds, "sold houses");
        Ok(proceeds)
    }

    // === Post-turn actions ===

    /// Mortgage `square`, crediting its value as cash.
    pub fn mortgage(state: &mut GameState, player: PlayerId, square: SquareId) -> ActionResult<Money> {
        let value = Self::raise_by_mortgage(state, player, square)?;
        state.player_mut(player).adjust_cash(value);
        Ok(value)
    }

    /// Lift the mortgage on `square`, paying the mortgage value plus any
    /// configured interest.
    pub fn unmortgage(state: &mut GameState, player: PlayerId, square: SquareId) -> ActionResult<Money> {
        let cost = Self::check_unmortgage(state, player, square)?;
        state.set_mortgaged(square, false)?;
        state.player_mut(player).adjust_cash(-cost);
        state.record(GameEvent::Unmortgaged {
            player,
            square,
            cost,
        });
        debug!(%player, %square, cost, "unmortgaged");
        Ok(cost)
    }

    /// Add `count` houses to `square`. Returns the price paid.
    pub fn build_houses(
        state: &mut GameState,
        player: PlayerId,
        square: SquareId,
        count: u8,
    ) -> ActionResult<Money> {
        let cost = Self::check_build(state, player, square, count)?;
        let houses = state.square(square).houses() + count;
        state.set_houses(square, houses)?;
        state.player_mut(player).adjust_cash(-cost);
        state.record(GameEvent::HousesBuilt {
            player,
            square,
            count,
        });
        debug!(%player, %square, count, cost, "built houses");
        Ok(cost)
    }

    /// Sell `count` houses off `square` at half the build cost each.
    pub fn sell_houses(
        state: &mut GameState,
        player: PlayerId,
        square: SquareId,
        count: u8,
    ) -> ActionResult<Money> {
        let proceeds = Self::raise_by_selling(state, player, square, count)?;
        state.player_mut(player).adjust_cash(proceeds);
        Ok(proceeds)
    }

    /// Carry out an accepted trade. All-or-nothing: any failed check leaves
    /// both players untouched.
    pub fn trade(
        state: &mut GameState,
        proposer: PlayerId,
        partner: PlayerId,
        offer: &TradeOffer,
    ) -> ActionResult<()> {
        for &square in &offer.give {
            Self::check_tradeable(state, square)?;
            if state.square(square).owner() != Some(proposer) {
                return Err(ActionError::NotOwner { square });
            }
        }
        for &square in &offer.receive {
            Self::check_tradeable(state, square)?;
            if state.square(square).owner() != Some(partner) {
                return Err(ActionError::NotOwner { square });
            }
        }

        let (payer, amount) = if offer.cash >= 0 {
            (partner, offer.cash)
        } else {
            (proposer, -offer.cash)
        };
        let available = state.player(payer).cash();
        if available < amount {
            return Err(ActionError::InsufficientFunds {
                needed: amount,
                available,
            });
        }

        state.player_mut(proposer).adjust_cash(offer.cash);
        state.player_mut(partner).adjust_cash(-offer.cash);
        for &square in &offer.give {
            state.transfer_square(square, Some(partner))?;
        }
        for &square in &offer.receive {
            state.transfer_square(square, Some(proposer))?;
        }

        state.record(GameEvent::Traded {
            proposer,
            partner,
            cash: offer.cash,
            given: offer.give.clone(),
            received: offer.receive.clone(),
        });
        info!(%proposer, %partner, cash = offer.cash, "trade completed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::GameConfig;

    const P0: PlayerId = PlayerId(0);
    const P1: PlayerId = PlayerId(1);
    const MEDITERRANEAN: SquareId = SquareId(1);
    const BALTIC: SquareId = SquareId(3);
    const READING: SquareId = SquareId(5);

    fn brown_monopoly() -> GameState {
        let mut state = GameState::with_defaults(GameConfig::new(2)).unwrap();
        state.transfer_square(MEDITERRANEAN, Some(P0)).unwrap();
        state.transfer_square(BALTIC, Some(P0)).unwrap();
        state
    }

    #[test]
    fn test_build_requires_monopoly() {
        let mut state = GameState::with_defaults(GameConfig::new(2)).unwrap();
        state.transfer_square(BALTIC, Some(P0)).unwrap();

        assert_eq!(
            Holdings::build_houses(&mut state, P0, BALTIC, 1),
            Err(ActionError::NoMonopoly { square: BALTIC })
        );
        assert_eq!(state.square(BALTIC).houses(), 0);
    }

    #[test]
    fn test_build_and_sell() {
        let mut state = brown_monopoly();

        assert_eq!(Holdings::build_houses(&mut state, P0, BALTIC, 3), Ok(150));
        assert_eq!(state.square(BALTIC).houses(), 3);
        assert_eq!(state.player(P0).cash(), 1350);

        assert_eq!(
            Holdings::build_houses(&mut state, P0, BALTIC, 3),
            Err(ActionError::HouseLimit {
                square: BALTIC,
                requested: 3
            })
        );

        assert_eq!(Holdings::sell_houses(&mut state, P0, BALTIC, 2), Ok(50));
        assert_eq!(state.square(BALTIC).houses(), 1);
        assert_eq!(state.player(P0).cash(), 1400);

        assert_eq!(
            Holdings::sell_houses(&mut state, P0, MEDITERRANEAN, 1),
            Err(ActionError::NoHouses {
                square: MEDITERRANEAN
            })
        );
    }

    #[test]
    fn test_build_blocked_by_mortgaged_group_member() {
        let mut state = brown_monopoly();
        Holdings::mortgage(&mut state, P0, MEDITERRANEAN).unwrap();

        assert_eq!(
            Holdings::build_houses(&mut state, P0, BALTIC, 1),
            Err(ActionError::NoMonopoly { square: BALTIC })
        );
    }

    #[test]
    fn test_build_needs_cash() {
        let mut state = brown_monopoly();
        state.player_mut(P0).adjust_cash(-1460);

        assert_eq!(
            Holdings::build_houses(&mut state, P0, BALTIC, 1),
            Err(ActionError::InsufficientFunds {
                needed: 50,
                available: 40
            })
        );
        // Still listed: only cash is missing.
        assert_eq!(Holdings::buildable(&state, P0), vec![MEDITERRANEAN, BALTIC]);
    }

    #[test]
    fn test_mortgage_cycle() {
        let mut state = brown_monopoly();

        assert_eq!(Holdings::mortgage(&mut state, P0, BALTIC), Ok(30));
        assert!(state.square(BALTIC).is_mortgaged());
        assert_eq!(state.player(P0).cash(), 1530);

        assert_eq!(
            Holdings::mortgage(&mut state, P0, BALTIC),
            Err(ActionError::AlreadyMortgaged { square: BALTIC })
        );
        assert_eq!(Holdings::unmortgageable(&state, P0), vec![BALTIC]);

        assert_eq!(Holdings::unmortgage(&mut state, P0, BALTIC), Ok(30));
        assert!(!state.square(BALTIC).is_mortgaged());
        assert_eq!(state.player(P0).cash(), 1500);

        assert_eq!(
            Holdings::unmortgage(&mut state, P0, BALTIC),
            Err(ActionError::NotMortgaged { square: BALTIC })
        );
    }

    #[test]
    fn test_cannot_mortgage_improved_or_foreign_squares() {
        let mut state = brown_monopoly();
        Holdings::build_houses(&mut state, P0, BALTIC, 1).unwrap();

        assert_eq!(
            Holdings::mortgage(&mut state, P0, BALTIC),
            Err(ActionError::HasHouses { square: BALTIC })
        );
        assert_eq!(
            Holdings::mortgage(&mut state, P1, MEDITERRANEAN),
            Err(ActionError::NotOwner {
                square: MEDITERRANEAN
            })
        );
        assert_eq!(Holdings::mortgageable(&state, P0), vec![MEDITERRANEAN]);
    }

    #[test]
    fn test_unmortgage_interest() {
        let config = GameConfig::new(2).with_unmortgage_interest(10);
        let mut state = GameState::with_defaults(config).unwrap();
        state.transfer_square(READING, Some(P0)).unwrap();

        Holdings::mortgage(&mut state, P0, READING).unwrap();
        assert_eq!(Holdings::unmortgage(&mut state, P0, READING), Ok(110));
        assert_eq!(state.player(P0).cash(), 1490);
    }

    #[test]
    fn test_trade_swaps_squares_and_cash() {
        let mut state = brown_monopoly();
        state.transfer_square(READING, Some(P1)).unwrap();

        let offer = TradeOffer {
            cash: -100,
            give: vec![MEDITERRANEAN],
            receive: vec![READING],
        };
        Holdings::trade(&mut state, P0, P1, &offer).unwrap();

        assert_eq!(state.square(MEDITERRANEAN).owner(), Some(P1));
        assert_eq!(state.square(READING).owner(), Some(P0));
        assert_eq!(state.player(P0).cash(), 1400);
        assert_eq!(state.player(P1).cash(), 1600);
        assert!(state.check_invariants().is_ok());
    }

    #[test]
    fn test_trade_rejects_improved_group() {
        let mut state = brown_monopoly();
        Holdings::build_houses(&mut state, P0, BALTIC, 1).unwrap();

        let offer = TradeOffer {
            give: vec![MEDITERRANEAN],
            ..TradeOffer::default()
        };
        assert_eq!(
            Holdings::trade(&mut state, P0, P1, &offer),
            Err(ActionError::GroupImproved {
                square: MEDITERRANEAN
            })
        );
        assert_eq!(state.square(MEDITERRANEAN).owner(), Some(P0));
        assert!(Holdings::tradeable(&state, P0).is_empty());
    }

    #[test]
    fn test_trade_rejects_unaffordable_cash() {
        let mut state = brown_monopoly();
        state.player_mut(P1).adjust_cash(-1450);

        let offer = TradeOffer {
            cash: 60,
            give: vec![BALTIC],
            receive: Vec::new(),
        };
        assert_eq!(
            Holdings::trade(&mut state, P0, P1, &offer),
            Err(ActionError::InsufficientFunds {
                needed: 60,
                available: 50
            })
        );
        assert_eq!(state.square(BALTIC).owner(), Some(P0));
    }
}
