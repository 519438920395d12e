//! One player's turn.
//!
//! ## Movement phase
//!
//! Up to three rolls. A double earns another roll; the third double in a row
//! goes straight to jail without moving. An incarcerated player who rolls a
//! double walks out but does not move on that roll, and the movement phase
//! ends. A non-double in jail spends an attempt.
//!
//! ## Post-turn phase
//!
//! If the player is still in the game, a menu of holdings actions repeats
//! until they choose to finish.

use tracing::{debug, info, instrument, warn};

use super::auction::AuctionResolver;
use super::card_effects::CardResolver;
use super::holdings::{Holdings, TradeOffer};
use super::jail::{JailOutcome, JailStateMachine};
use super::rent::RentCalculator;
use super::transaction::{square_candidates, TransactionResolver};
use crate::board::{JailKind, SquareId, SquareKind, Tax, MAX_HOUSES};
use crate::core::{GameEvent, GameState, JailReason, Money, Party, PlayerId, ReleaseReason};
use crate::dice::DiceSource;
use crate::error::{ActionError, GameError, Result};
use crate::input::{Candidate, DecisionProvider, Prompt};

/// Rolls allowed in one turn; the last double of this many goes to jail.
pub const MAX_ROLLS_PER_TURN: u8 = 3;

/// Post-turn menu entries.
pub const TURN_ACTIONS: [&str; 6] = [
    "Buy houses",
    "Sell houses",
    "Mortgage",
    "Unmortgage",
    "Trade",
    "Done",
];

/// Drives a single turn.
pub struct TurnEngine;

impl TurnEngine {
    /// Play `player`'s whole turn: movement, then post-turn actions.
    ///
    /// Does nothing for a player no longer in the turn queue.
    #[instrument(skip(state, dice, decisions))]
    pub fn play_turn(
        state: &mut GameState,
        dice: &mut dyn DiceSource,
        decisions: &mut dyn DecisionProvider,
        player: PlayerId,
    ) -> Result<()> {
        if !state.is_active(player) {
            return Ok(());
        }
        info!(name = %state.player(player).name, "turn start");

        Self::movement_phase(state, dice, decisions, player)?;

        if state.is_active(player) {
            Self::post_turn_actions(state, decisions, player)?;
        }
        Ok(())
    }

    /// Roll, move and resolve landings until the turn's rolls are spent.
    pub fn movement_phase(
        state: &mut GameState,
        dice: &mut dyn DiceSource,
        decisions: &mut dyn DecisionProvider,
        player: PlayerId,
    ) -> Result<()> {
        JailStateMachine::offer_early_release(state, decisions, player)?;

        let mut doubles = 0;
        for _ in 0..MAX_ROLLS_PER_TURN {
            let roll = dice.roll()?;
            let (first, second) = roll.faces();
            state.record(GameEvent::Rolled {
                player,
                first,
                second,
            });
            debug!(%player, %roll, "rolled");

            if state.player(player).in_jail() {
                if roll.is_double() {
                    JailStateMachine::release(state, player, ReleaseReason::Doubles);
                } else {
                    match JailStateMachine::failed_attempt(state, decisions, player)? {
                        JailOutcome::Stays => debug!(%player, "no double, stays in jail"),
                        JailOutcome::Released => info!(%player, "released after the last attempt"),
                        JailOutcome::Bankrupt => warn!(%player, "bankrupt paying the jail fee"),
                    }
                }
                return Ok(());
            }

            if roll.is_double() {
                doubles += 1;
                if doubles == MAX_ROLLS_PER_TURN {
                    JailStateMachine::incarcerate(state, player, JailReason::TripleDoubles);
                    return Ok(());
                }
            }

            Self::advance(state, player, i32::from(roll.value()));
            Self::resolve_landing(state, decisions, player, roll.value())?;

            if !roll.is_double() || !state.is_active(player) || state.player(player).in_jail() {
                return Ok(());
            }
        }
        Ok(())
    }

    /// Move `player` by `steps` (negative moves backwards). Passing Go going
    /// forwards credits the configured bonus.
    pub fn advance(state: &mut GameState, player: PlayerId, steps: i32) -> SquareId {
        let from = state.player(player).position();
        let (to, wrapped) = from.advance(steps);
        state.player_mut(player).set_position(to);
        state.record(GameEvent::Moved { player, from, to });

        let bonus = state.config().pass_go_bonus;
        if wrapped && bonus > 0 {
            state.player_mut(player).adjust_cash(bonus);
            state.record(GameEvent::PassedGo { player, bonus });
            debug!(%player, bonus, "passed go");
        }
        to
    }

    /// Resolve the square `player` is standing on.
    pub fn resolve_landing(
        state: &mut GameState,
        decisions: &mut dyn DecisionProvider,
        player: PlayerId,
        roll_value: u8,
    ) -> Result<()> {
        let position = state.player(player).position();
        state.record(GameEvent::Landed {
            player,
            square: position,
        });
        let square = state.square(position);
        debug!(%player, square = %square.name, "landed");

        match square.kind.clone() {
            SquareKind::Property(_) | SquareKind::Railroad(_) | SquareKind::Utility(_) => {
                match square.owner() {
                    None => Self::offer_purchase(state, decisions, player, position),
                    Some(owner) if owner == player => Ok(()),
                    Some(_) if square.is_mortgaged() => {
                        debug!(square = %square.name, "mortgaged, no rent");
                        Ok(())
                    }
                    Some(owner) => Self::charge_rent(state, decisions, player, owner, position, roll_value),
                }
            }
            SquareKind::Tax(tax) => Self::pay_tax(state, decisions, player, position, tax),
            SquareKind::CardDraw(deck) => {
                CardResolver::draw_and_apply(state, decisions, player, deck)
            }
            SquareKind::Jail(JailKind::SendToJail) => {
                JailStateMachine::incarcerate(state, player, JailReason::Square);
                Ok(())
            }
            SquareKind::Jail(JailKind::Visiting) | SquareKind::Neutral => Ok(()),
        }
    }

    fn offer_purchase(
        state: &mut GameState,
        decisions: &mut dyn DecisionProvider,
        player: PlayerId,
        square: SquareId,
    ) -> Result<()> {
        let price = state
            .square(square)
            .deed()
            .map(|deed| deed.cost)
            .ok_or_else(|| GameError::inconsistent(format!("{square} has no deed")))?;

        if state.liquidation_value(player) < price {
            info!(%player, %square, price, "cannot afford, going to auction");
            AuctionResolver::run(state, decisions, square)?;
            return Ok(());
        }

        let prompt = Prompt::BuyProperty {
            player: state.player(player).name.clone(),
            square: state.square(square).name.clone(),
            price,
        };
        if !decisions.ask_yes_no(&prompt)? {
            AuctionResolver::run(state, decisions, square)?;
            return Ok(());
        }

        let settlement = TransactionResolver::settle(state, decisions, player, Party::Bank, price)?;
        if settlement.is_bankrupt() {
            return Ok(());
        }
        state.transfer_square(square, Some(player))?;
        state.record(GameEvent::Purchased {
            player,
            square,
            price,
        });
        info!(%player, %square, price, "purchased");
        Ok(())
    }

    fn charge_rent(
        state: &mut GameState,
        decisions: &mut dyn DecisionProvider,
        payer: PlayerId,
        owner: PlayerId,
        square: SquareId,
        roll_value: u8,
    ) -> Result<()> {
        let amount = RentCalculator::rent(state.board(), square, roll_value);
        debug!(%payer, %owner, %square, amount, "rent due");

        let settlement = TransactionResolver::settle(state, decisions, payer, owner.into(), amount)?;
        if !settlement.is_bankrupt() {
            state.record(GameEvent::RentPaid {
                payer,
                owner,
                square,
                amount,
            });
        }
        Ok(())
    }

    fn pay_tax(
        state: &mut GameState,
        decisions: &mut dyn DecisionProvider,
        player: PlayerId,
        square: SquareId,
        tax: Tax,
    ) -> Result<()> {
        let amount = match (tax.percent, tax.percentage_of(state.total_assets(player))) {
            (Some(percent), Some(percentage)) => {
                let labels = [format!("{percent}%"), format!("${}", tax.amount)];
                let labels: Vec<&str> = labels.iter().map(String::as_str).collect();
                let prompt = Prompt::IncomeTax {
                    player: state.player(player).name.clone(),
                    percentage,
                    flat: tax.amount,
                };
                match decisions.ask_choice(&prompt, &labels)? {
                    0 => percentage,
                    _ => tax.amount,
                }
            }
            _ => tax.amount,
        };

        let settlement = TransactionResolver::settle(state, decisions, player, Party::Bank, amount)?;
        if !settlement.is_bankrupt() {
            state.record(GameEvent::TaxPaid {
                player,
                square,
                amount,
            });
        }
        Ok(())
    }

    /// Offer the holdings menu until the player picks "Done".
    pub fn post_turn_actions(
        state: &mut GameState,
        decisions: &mut dyn DecisionProvider,
        player: PlayerId,
    ) -> Result<()> {
        loop {
            let name = state.player(player).name.clone();
            let choice = decisions.ask_choice(&Prompt::TurnAction { player: name.clone() }, &TURN_ACTIONS)?;

            let refused = match TURN_ACTIONS.get(choice).copied() {
                Some("Buy houses") => {
                    let candidates = Holdings::buildable(state, player);
                    match Self::pick_square(state, decisions, &candidates, Prompt::SelectBuild { player: name })? {
                        Some(square) => {
                            let room = MAX_HOUSES - state.square(square).houses();
                            let count = Self::ask_house_count(state, decisions, square, room)?;
                            Holdings::build_houses(state, player, square, count).err()
                        }
                        None => None,
                    }
                }
                Some("Sell houses") => {
                    let candidates = Holdings::sellable(state, player);
                    match Self::pick_square(state, decisions, &candidates, Prompt::SelectSell { player: name })? {
                        Some(square) => {
                            let houses = state.square(square).houses();
                            let count = Self::ask_house_count(state, decisions, square, houses)?;
                            Holdings::sell_houses(state, player, square, count).err()
                        }
                        None => None,
                    }
                }
                Some("Mortgage") => {
                    let candidates = Holdings::mortgageable(state, player);
                    Self::pick_square(state, decisions, &candidates, Prompt::SelectMortgage { player: name })?
                        .and_then(|square| Holdings::mortgage(state, player, square).err())
                }
                Some("Unmortgage") => {
                    let candidates = Holdings::unmortgageable(state, player);
                    Self::pick_square(state, decisions, &candidates, Prompt::SelectUnmortgage { player: name })?
                        .and_then(|square| Holdings::unmortgage(state, player, square).err())
                }
                Some("Trade") => Self::negotiate_trade(state, decisions, player)?,
                Some(_) => return Ok(()),
                None => {
                    return Err(GameError::AnswerOutOfDomain {
                        answer: choice.to_string(),
                        domain: TURN_ACTIONS.join("/"),
                    })
                }
            };

            if let Some(refused) = refused {
                warn!(%player, %refused, "action refused");
            }
        }
    }

    /// Ask for one of `candidates`, or `None` (with a warning) if there are
    /// none.
    fn pick_square(
        state: &GameState,
        decisions: &mut dyn DecisionProvider,
        candidates: &[SquareId],
        prompt: Prompt,
    ) -> Result<Option<SquareId>> {
        if candidates.is_empty() {
            warn!(%prompt, "no eligible squares");
            return Ok(None);
        }
        let square = decisions.ask_square(&prompt, &square_candidates(state, candidates))?;
        Ok(Some(square))
    }

    fn ask_house_count(
        state: &GameState,
        decisions: &mut dyn DecisionProvider,
        square: SquareId,
        max: u8,
    ) -> Result<u8> {
        let prompt = Prompt::HouseCount {
            square: state.square(square).name.clone(),
        };
        let count = decisions.ask_int(&prompt, 1..=Money::from(max.max(1)))?;
        u8::try_from(count).map_err(|_| GameError::AnswerOutOfDomain {
            answer: count.to_string(),
            domain: format!("1..={max}"),
        })
    }

    /// Assemble a trade offer with a partner and carry it out if they accept.
    /// Returns the refusal if the accepted offer breaks a rule.
    fn negotiate_trade(
        state: &mut GameState,
        decisions: &mut dyn DecisionProvider,
        player: PlayerId,
    ) -> Result<Option<ActionError>> {
        let partners: Vec<Candidate<PlayerId>> = state
            .turn_order()
            .iter()
            .copied()
            .filter(|&p| p != player)
            .map(|p| Candidate::new(p, state.player(p).name.clone()))
            .collect();
        if partners.is_empty() {
            warn!(%player, "nobody to trade with");
            return Ok(None);
        }

        let name = state.player(player).name.clone();
        let partner = decisions.ask_player(&Prompt::TradePartner { player: name.clone() }, &partners)?;
        let partner_name = state.player(partner).name.clone();

        let cash = decisions.ask_int(
            &Prompt::TradeCash {
                player: name.clone(),
                partner: partner_name.clone(),
            },
            -state.player(player).cash()..=state.player(partner).cash(),
        )?;
        let mut offer = TradeOffer {
            cash,
            ..TradeOffer::default()
        };

        loop {
            let remaining: Vec<SquareId> = Holdings::tradeable(state, player)
                .into_iter()
                .filter(|sq| !offer.give.contains(sq))
                .collect();
            if remaining.is_empty()
                || !decisions.ask_yes_no(&Prompt::GiveMore { player: name.clone() })?
            {
                break;
            }
            let square = decisions.ask_square(
                &Prompt::TradeGive { player: name.clone() },
                &square_candidates(state, &remaining),
            )?;
            offer.give.push(square);
        }

        loop {
            let remaining: Vec<SquareId> = Holdings::tradeable(state, partner)
                .into_iter()
                .filter(|sq| !offer.receive.contains(sq))
                .collect();
            let more = Prompt::ReceiveMore {
                player: name.clone(),
                partner: partner_name.clone(),
            };
            if remaining.is_empty() || !decisions.ask_yes_no(&more)? {
                break;
            }
            let square = decisions.ask_square(
                &Prompt::TradeReceive {
                    player: name.clone(),
                    partner: partner_name.clone(),
                },
                &square_candidates(state, &remaining),
            )?;
            offer.receive.push(square);
        }

        let accept = Prompt::AcceptTrade {
            player: name,
            partner: partner_name,
        };
        if !decisions.ask_yes_no(&accept)? {
            info!(%player, %partner, "trade declined");
            return Ok(None);
        }
        Ok(Holdings::trade(state, player, partner, &offer).err())
    }
}
