//! Settling debts.
//!
//! ## Outcomes
//!
//! - **Paid**: the debtor had the cash.
//! - **Liquidated**: the debtor was short but could raise the difference by
//!   mortgaging and selling houses. Cash on hand goes first, then each
//!   proceeds amount is applied straight against what is still outstanding.
//!   Overshoot comes back to the debtor as cash.
//! - **Bankrupt**: cash plus everything raisable falls short. Nothing is paid
//!   in part; every asset moves to the creditor and the debtor leaves the
//!   turn queue.

use tracing::{debug, info, instrument, warn};

use super::holdings::Holdings;
use crate::board::SquareId;
use crate::core::{GameEvent, GameState, JailStatus, Money, Party, PlayerId};
use crate::error::{GameError, Result};
use crate::input::{Candidate, DecisionProvider, Prompt};

/// How a settlement ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Settlement {
    /// Paid from cash.
    Paid,
    /// Paid after liquidating; `surplus` was credited back to the debtor.
    Liquidated { surplus: Money },
    /// The debtor is out of the game.
    Bankrupt,
}

impl Settlement {
    /// Whether the debtor went bankrupt.
    #[must_use]
    pub fn is_bankrupt(self) -> bool {
        matches!(self, Settlement::Bankrupt)
    }
}

const MORTGAGE: &str = "Mortgage";
const SELL_HOUSES: &str = "Sell houses";

/// Settles obligations between a player and a counterparty.
pub struct TransactionResolver;

impl TransactionResolver {
    /// Move `amount` from `debtor` to `creditor`, liquidating or bankrupting
    /// the debtor as needed. The creditor receives exactly `amount` unless
    /// the debtor goes bankrupt, in which case it receives everything the
    /// debtor had.
    #[instrument(skip(state, decisions))]
    pub fn settle(
        state: &mut GameState,
        decisions: &mut dyn DecisionProvider,
        debtor: PlayerId,
        creditor: Party,
        amount: Money,
    ) -> Result<Settlement> {
        if amount < 0 {
            return Err(GameError::inconsistent(format!(
                "negative obligation {amount}"
            )));
        }
        if creditor == Party::Player(debtor) {
            return Err(GameError::inconsistent(format!("{debtor} owes themself")));
        }

        let cash = state.player(debtor).cash();
        if cash >= amount {
            state.player_mut(debtor).adjust_cash(-amount);
            state.credit(creditor, amount);
            state.record(GameEvent::Paid {
                debtor,
                creditor,
                amount,
            });
            return Ok(Settlement::Paid);
        }

        if state.liquidation_value(debtor) < amount {
            Self::declare_bankrupt(state, debtor, creditor)?;
            return Ok(Settlement::Bankrupt);
        }

        let surplus = Self::liquidate(state, decisions, debtor, amount)?;
        state.credit(creditor, amount);
        state.record(GameEvent::Paid {
            debtor,
            creditor,
            amount,
        });
        Ok(Settlement::Liquidated { surplus })
    }

    /// Raise `amount` by liquidating assets. Returns the surplus credited back.
    fn liquidate(
        state: &mut GameState,
        decisions: &mut dyn DecisionProvider,
        debtor: PlayerId,
        amount: Money,
    ) -> Result<Money> {
        let mut outstanding = amount - state.player_mut(debtor).take_all_cash();
        debug!(%debtor, outstanding, "liquidating");

        while outstanding > 0 {
            let mortgageable = Holdings::mortgageable(state, debtor);
            let sellable = Holdings::sellable(state, debtor);

            let mut methods = Vec::with_capacity(2);
            if !mortgageable.is_empty() {
                methods.push(MORTGAGE);
            }
            if !sellable.is_empty() {
                methods.push(SELL_HOUSES);
            }
            if methods.is_empty() {
                return Err(GameError::inconsistent(format!(
                    "{debtor} still owes {outstanding} with nothing left to liquidate"
                )));
            }

            let name = state.player(debtor).name.clone();
            let prompt = Prompt::LiquidationMethod {
                player: name.clone(),
                outstanding,
            };
            let index = decisions.ask_choice(&prompt, &methods)?;
            let method = *methods.get(index).ok_or_else(|| GameError::AnswerOutOfDomain {
                answer: index.to_string(),
                domain: methods.join("/"),
            })?;

            let raised = if method == MORTGAGE {
                let square = decisions.ask_square(
                    &Prompt::SelectMortgage { player: name },
                    &square_candidates(state, &mortgageable),
                )?;
                Holdings::raise_by_mortgage(state, debtor, square)
            } else {
                let square = decisions.ask_square(
                    &Prompt::SelectSell { player: name },
                    &square_candidates(state, &sellable),
                )?;
                let houses = state.square(square).houses();
                let count = decisions.ask_int(
                    &Prompt::HouseCount {
                        square: state.square(square).name.clone(),
                    },
                    1..=Money::from(houses.max(1)),
                )?;
                let count = u8::try_from(count).unwrap_or(u8::MAX);
                Holdings::raise_by_selling(state, debtor, square, count)
            };

            match raised {
                Ok(proceeds) => outstanding -= proceeds,
                Err(refused) => warn!(%debtor, %refused, "liquidation step refused"),
            }
        }

        let surplus = -outstanding;
        state.player_mut(debtor).adjust_cash(surplus);
        debug!(%debtor, surplus, "liquidation complete");
        Ok(surplus)
    }

    /// Hand everything the debtor has to the creditor and drop the debtor
    /// from the turn queue.
    ///
    /// Squares owed to a player keep their houses and mortgages. Squares owed
    /// to the bank go back on the market: unowned, unmortgaged and bare.
    #[instrument(skip(state))]
    pub fn declare_bankrupt(state: &mut GameState, debtor: PlayerId, creditor: Party) -> Result<()> {
        let squares = state.player(debtor).owned().to_vec();
        let tokens = state.player_mut(debtor).take_jail_free_cards();
        let cash = state.player_mut(debtor).take_all_cash().max(0);

        match creditor {
            Party::Player(heir) => {
                for &square in &squares {
                    state.transfer_square(square, Some(heir))?;
                }
                for _ in 0..tokens {
                    state.player_mut(heir).add_jail_free_card();
                }
                state.credit(creditor, cash);
            }
            Party::Bank => {
                for &square in &squares {
                    state.transfer_square(square, None)?;
                    state.set_mortgaged(square, false)?;
                    if state.square(square).property().is_some() {
                        state.set_houses(square, 0)?;
                    }
                }
            }
        }

        state.player_mut(debtor).set_jail(JailStatus::Free);
        state.remove_from_queue(debtor);
        state.record(GameEvent::Bankrupt {
            player: debtor,
            creditor,
        });
        info!(
            %debtor,
            ?creditor,
            squares = squares.len(),
            cash,
            tokens,
            "bankrupt"
        );
        Ok(())
    }
}

/// Label each square with its name.
pub(crate) fn square_candidates(state: &GameState, squares: &[SquareId]) -> Vec<Candidate<SquareId>> {
    squares
        .iter()
        .map(|&sq| Candidate::new(sq, state.square(sq).name.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::GameConfig;
    use crate::input::ScriptedDecisions;

    const DEBTOR: PlayerId = PlayerId(0);
    const CREDITOR: PlayerId = PlayerId(1);
    // Pennsylvania Railroad: mortgage value 100.
    const RAILROAD: SquareId = SquareId(15);

    fn state_with_cash(cash: Money) -> GameState {
        let mut state = GameState::with_defaults(GameConfig::new(3)).unwrap();
        let adjust = cash - state.player(DEBTOR).cash();
        state.player_mut(DEBTOR).adjust_cash(adjust);
        state
    }

    #[test]
    fn test_plain_payment() {
        let mut state = state_with_cash(300);
        let mut decisions = ScriptedDecisions::new();

        let outcome =
            TransactionResolver::settle(&mut state, &mut decisions, DEBTOR, CREDITOR.into(), 120)
                .unwrap();

        assert_eq!(outcome, Settlement::Paid);
        assert_eq!(state.player(DEBTOR).cash(), 180);
        assert_eq!(state.player(CREDITOR).cash(), 1620);
    }

    #[test]
    fn test_bank_absorbs_payment() {
        let mut state = state_with_cash(300);
        let mut decisions = ScriptedDecisions::new();

        TransactionResolver::settle(&mut state, &mut decisions, DEBTOR, Party::Bank, 200).unwrap();

        assert_eq!(state.player(DEBTOR).cash(), 100);
        assert_eq!(state.player(CREDITOR).cash(), 1500);
    }

    #[test]
    fn test_liquidation_applies_proceeds_against_outstanding() {
        let mut state = state_with_cash(50);
        state.transfer_square(RAILROAD, Some(DEBTOR)).unwrap();
        let mut decisions = ScriptedDecisions::new().label(MORTGAGE).square(RAILROAD);

        let outcome =
            TransactionResolver::settle(&mut state, &mut decisions, DEBTOR, CREDITOR.into(), 120)
                .unwrap();

        // 120 owed, 50 cash, 100 raised: 30 comes back.
        assert_eq!(outcome, Settlement::Liquidated { surplus: 30 });
        assert!(state.square(RAILROAD).is_mortgaged());
        assert_eq!(state.player(DEBTOR).cash(), 30);
        assert_eq!(state.player(CREDITOR).cash(), 1620);
        assert_eq!(decisions.remaining(), 0);
    }

    #[test]
    fn test_liquidation_by_selling_houses() {
        let mut state = state_with_cash(1000);
        // Dark blue monopoly with houses on both.
        state.transfer_square(SquareId::new(37), Some(DEBTOR)).unwrap();
        state.transfer_square(SquareId::new(39), Some(DEBTOR)).unwrap();
        Holdings::build_houses(&mut state, DEBTOR, SquareId::new(37), 1).unwrap();
        Holdings::build_houses(&mut state, DEBTOR, SquareId::new(39), 4).unwrap();
        let cash = state.player(DEBTOR).cash();
        assert_eq!(cash, 0);

        // Owes 250: sell 3 houses on Boardwalk (300), surplus 50.
        let mut decisions = ScriptedDecisions::new()
            .label(SELL_HOUSES)
            .square(SquareId::new(39))
            .int(3);

        let outcome =
            TransactionResolver::settle(&mut state, &mut decisions, DEBTOR, Party::Bank, 250)
                .unwrap();

        assert_eq!(outcome, Settlement::Liquidated { surplus: 50 });
        assert_eq!(state.square(SquareId::new(39)).houses(), 1);
        assert_eq!(state.player(DEBTOR).cash(), 50);
    }

    #[test]
    fn test_bankruptcy_to_player_transfers_everything() {
        let mut state = state_with_cash(20);
        state.transfer_square(RAILROAD, Some(DEBTOR)).unwrap();
        state.player_mut(DEBTOR).add_jail_free_card();
        let mut decisions = ScriptedDecisions::new();

        let outcome =
            TransactionResolver::settle(&mut state, &mut decisions, DEBTOR, CREDITOR.into(), 150)
                .unwrap();

        assert_eq!(outcome, Settlement::Bankrupt);
        assert!(!state.is_active(DEBTOR));
        assert_eq!(state.square(RAILROAD).owner(), Some(CREDITOR));
        assert_eq!(state.player(CREDITOR).cash(), 1520);
        assert_eq!(state.player(CREDITOR).jail_free_cards(), 1);
        assert_eq!(state.player(DEBTOR).cash(), 0);
        assert!(state.player(DEBTOR).owned().is_empty());
        assert!(state.check_invariants().is_ok());
    }

    #[test]
    fn test_bankruptcy_to_bank_resets_squares() {
        let mut state = state_with_cash(1000);
        state.transfer_square(SquareId::new(1), Some(DEBTOR)).unwrap();
        state.transfer_square(SquareId::new(3), Some(DEBTOR)).unwrap();
        state.transfer_square(RAILROAD, Some(DEBTOR)).unwrap();
        Holdings::build_houses(&mut state, DEBTOR, SquareId::new(3), 2).unwrap();
        Holdings::mortgage(&mut state, DEBTOR, RAILROAD).unwrap();

        TransactionResolver::declare_bankrupt(&mut state, DEBTOR, Party::Bank).unwrap();

        for sq in [1, 3, 15].map(SquareId::new) {
            assert_eq!(state.square(sq).owner(), None);
            assert!(!state.square(sq).is_mortgaged());
            assert_eq!(state.square(sq).houses(), 0);
        }
        assert_eq!(state.turn_order(), &[CREDITOR, PlayerId::new(2)]);
    }

    #[test]
    fn test_rejects_negative_amounts() {
        let mut state = state_with_cash(100);
        let mut decisions = ScriptedDecisions::new();
        assert!(TransactionResolver::settle(
            &mut state,
            &mut decisions,
            DEBTOR,
            Party::Bank,
            -5
        )
        .is_err());
    }
}
