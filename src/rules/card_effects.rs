//! Applying drawn cards.

use tracing::{debug, info};

use super::jail::JailStateMachine;
use super::transaction::TransactionResolver;
use super::turn::TurnEngine;
use crate::cards::{CardEffect, DeckKind};
use crate::core::{GameEvent, GameState, JailReason, Party, PlayerId};
use crate::error::Result;
use crate::input::DecisionProvider;

/// Draws cards and carries out their effects.
pub struct CardResolver;

impl CardResolver {
    /// Draw the top card of `deck` for `player` and apply it. An empty pile
    /// does nothing.
    pub fn draw_and_apply(
        state: &mut GameState,
        decisions: &mut dyn DecisionProvider,
        player: PlayerId,
        deck: DeckKind,
    ) -> Result<()> {
        let Some(card) = state.draw_card(deck) else {
            debug!(%deck, "empty pile, nothing drawn");
            return Ok(());
        };

        info!(%player, %deck, text = %card.text, "card drawn");
        state.record(GameEvent::CardDrawn {
            player,
            deck,
            effect: card.effect,
        });
        Self::apply(state, decisions, player, card.effect)
    }

    /// Apply one effect.
    ///
    /// Movement cards only relocate the player: the square they end on is
    /// not bought, taxed or charged rent.
    pub fn apply(
        state: &mut GameState,
        decisions: &mut dyn DecisionProvider,
        player: PlayerId,
        effect: CardEffect,
    ) -> Result<()> {
        match effect {
            CardEffect::BankMoney(amount) if amount >= 0 => {
                state.player_mut(player).adjust_cash(amount);
            }
            CardEffect::BankMoney(amount) => {
                TransactionResolver::settle(state, decisions, player, Party::Bank, -amount)?;
            }
            CardEffect::PlayerMoney(amount) => {
                let others: Vec<PlayerId> = state
                    .turn_order()
                    .iter()
                    .copied()
                    .filter(|&p| p != player)
                    .collect();

                for other in others {
                    if !state.is_active(player) {
                        break;
                    }
                    if !state.is_active(other) {
                        continue;
                    }
                    if amount >= 0 {
                        TransactionResolver::settle(state, decisions, other, player.into(), amount)?;
                    } else {
                        TransactionResolver::settle(state, decisions, player, other.into(), -amount)?;
                    }
                }
            }
            CardEffect::Move(steps) => {
                TurnEngine::advance(state, player, steps);
            }
            CardEffect::MoveTo(target) => {
                let steps = state.player(player).position().distance_to(target);
                TurnEngine::advance(state, player, steps);
            }
            CardEffect::GetOutOfJailFree => {
                state.player_mut(player).add_jail_free_card();
            }
            CardEffect::GoToJail => {
                JailStateMachine::incarcerate(state, player, JailReason::Card);
            }
            CardEffect::MoveNearest(_) | CardEffect::StreetRepairs { .. } => {
                debug!(?effect, "card effect not modeled");
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::SquareId;
    use crate::cards::{Card, Deck, Decks, NearestKind};
    use crate::core::GameConfig;
    use crate::input::ScriptedDecisions;

    const P0: PlayerId = PlayerId(0);
    const P1: PlayerId = PlayerId(1);
    const P2: PlayerId = PlayerId(2);

    fn state() -> GameState {
        GameState::with_defaults(GameConfig::new(3)).unwrap()
    }

    fn apply(state: &mut GameState, effect: CardEffect) {
        let mut decisions = ScriptedDecisions::new();
        CardResolver::apply(state, &mut decisions, P0, effect).unwrap();
    }

    #[test]
    fn test_bank_money() {
        let mut state = state();
        apply(&mut state, CardEffect::BankMoney(200));
        assert_eq!(state.player(P0).cash(), 1700);

        apply(&mut state, CardEffect::BankMoney(-50));
        assert_eq!(state.player(P0).cash(), 1650);
    }

    #[test]
    fn test_player_money_collects_from_each_other_player() {
        let mut state = state();
        apply(&mut state, CardEffect::PlayerMoney(10));

        assert_eq!(state.player(P0).cash(), 1520);
        assert_eq!(state.player(P1).cash(), 1490);
        assert_eq!(state.player(P2).cash(), 1490);
    }

    #[test]
    fn test_player_money_pays_each_other_player() {
        let mut state = state();
        state.remove_from_queue(P2);
        apply(&mut state, CardEffect::PlayerMoney(-50));

        assert_eq!(state.player(P0).cash(), 1450);
        assert_eq!(state.player(P1).cash(), 1550);
        // Out of the game: not paid.
        assert_eq!(state.player(P2).cash(), 1500);
    }

    #[test]
    fn test_move_to_does_not_charge_rent() {
        let mut state = state();
        state.transfer_square(SquareId::new(39), Some(P1)).unwrap();
        state.player_mut(P0).set_position(SquareId::new(36));

        apply(&mut state, CardEffect::MoveTo(SquareId::new(39)));

        assert_eq!(state.player(P0).position(), SquareId::new(39));
        assert_eq!(state.player(P0).cash(), 1500);
        assert_eq!(state.player(P1).cash(), 1500);
        assert!(!state
            .events()
            .iter()
            .any(|e| matches!(e, GameEvent::RentPaid { .. } | GameEvent::Landed { .. })));
    }

    #[test]
    fn test_move_backwards_onto_tax_pays_nothing() {
        let mut state = state();
        state.player_mut(P0).set_position(SquareId::new(7));

        apply(&mut state, CardEffect::Move(-3));

        assert_eq!(state.player(P0).position(), SquareId::new(4));
        assert_eq!(state.player(P0).cash(), 1500);
    }

    #[test]
    fn test_jail_card_and_token() {
        let mut state = state();
        apply(&mut state, CardEffect::GetOutOfJailFree);
        assert_eq!(state.player(P0).jail_free_cards(), 1);

        apply(&mut state, CardEffect::GoToJail);
        assert!(state.player(P0).in_jail());
        assert_eq!(state.player(P0).position(), SquareId::JAIL);
    }

    #[test]
    fn test_unmodeled_effects_do_nothing() {
        let mut state = state();
        let before = state.player(P0).clone();

        apply(&mut state, CardEffect::MoveNearest(NearestKind::Railroad));
        apply(
            &mut state,
            CardEffect::StreetRepairs {
                per_house: 25,
                per_hotel: 100,
            },
        );

        assert_eq!(state.player(P0), &before);
    }

    #[test]
    fn test_draw_from_empty_pile_is_a_no_op() {
        let mut state = state();
        let mut decisions = ScriptedDecisions::new();
        CardResolver::draw_and_apply(&mut state, &mut decisions, P0, DeckKind::Chance).unwrap();
        assert!(state.events().is_empty());
    }

    #[test]
    fn test_draw_applies_top_card() {
        let decks = Decks::new(
            Deck::new(
                DeckKind::Chance,
                vec![Card::new("Collect $75", CardEffect::BankMoney(75))],
            ),
            Deck::new(DeckKind::CommunityChest, Vec::new()),
        );
        let names = vec!["Ada".to_string(), "Grace".to_string()];
        let mut state = GameState::new(
            GameConfig::new(2),
            &names,
            crate::board::Board::standard(),
            decks,
        )
        .unwrap();
        let mut decisions = ScriptedDecisions::new();

        CardResolver::draw_and_apply(&mut state, &mut decisions, P0, DeckKind::Chance).unwrap();
        CardResolver::draw_and_apply(&mut state, &mut decisions, P0, DeckKind::Chance).unwrap();

        // The pile cycles.
        assert_eq!(state.player(P0).cash(), 1650);
    }
}
