//! Jail entry and exit.
//!
//! ```text
//! FREE ──(go-to-jail square | jail card | third double)──▶ INCARCERATED(n)
//! INCARCERATED(n) ──(double | token | fee)──▶ FREE
//! INCARCERATED(n>0) ──(non-double)──▶ INCARCERATED(n-1)
//! INCARCERATED(0) ──(non-double)──▶ FREE via token, fee or liquidation,
//!                                   or bankrupt to the bank
//! ```

use tracing::{debug, info, instrument};

use super::transaction::TransactionResolver;
use crate::board::SquareId;
use crate::core::{GameEvent, GameState, JailReason, JailStatus, Party, PlayerId, ReleaseReason};
use crate::error::{GameError, Result};
use crate::input::{DecisionProvider, Prompt};

/// Result of a failed doubles attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum JailOutcome {
    /// Still in jail.
    Stays,
    /// Released after exhausting every attempt.
    Released,
    /// Could not pay the fee.
    Bankrupt,
}

const ROLL: &str = "Roll for doubles";
const PAY_FEE: &str = "Pay the fee";
const USE_TOKEN: &str = "Use a Get Out of Jail Free card";

/// Jail transitions.
pub struct JailStateMachine;

impl JailStateMachine {
    /// Send a player to jail: onto the jail square, with the configured
    /// number of attempts. Nothing on the way is resolved.
    #[instrument(skip(state))]
    pub fn incarcerate(state: &mut GameState, player: PlayerId, reason: JailReason) {
        let attempts = state.config().jail_attempts;
        let p = state.player_mut(player);
        p.set_position(SquareId::JAIL);
        p.set_jail(JailStatus::Incarcerated {
            attempts_remaining: attempts,
        });
        state.record(GameEvent::Jailed { player, reason });
        info!(%player, ?reason, "sent to jail");
    }

    /// Free a player.
    pub fn release(state: &mut GameState, player: PlayerId, reason: ReleaseReason) {
        state.player_mut(player).set_jail(JailStatus::Free);
        state.record(GameEvent::Released { player, reason });
        info!(%player, ?reason, "released from jail");
    }

    /// Record a non-double roll while incarcerated. With attempts left the
    /// counter drops by one; with none left release is forced.
    pub fn failed_attempt(
        state: &mut GameState,
        decisions: &mut dyn DecisionProvider,
        player: PlayerId,
    ) -> Result<JailOutcome> {
        let JailStatus::Incarcerated { attempts_remaining } = state.player(player).jail() else {
            return Err(GameError::inconsistent(format!(
                "{player} rolled for doubles while not in jail"
            )));
        };

        if attempts_remaining > 0 {
            state.player_mut(player).set_jail(JailStatus::Incarcerated {
                attempts_remaining: attempts_remaining - 1,
            });
            debug!(%player, attempts_remaining = attempts_remaining - 1, "stays in jail");
            return Ok(JailOutcome::Stays);
        }

        Self::force_release(state, decisions, player)
    }

    /// Leave jail after the last failed attempt: a token if one is held,
    /// otherwise the fee, liquidating if cash is short.
    fn force_release(
        state: &mut GameState,
        decisions: &mut dyn DecisionProvider,
        player: PlayerId,
    ) -> Result<JailOutcome> {
        if state.player_mut(player).use_jail_free_card() {
            Self::release(state, player, ReleaseReason::Token);
            return Ok(JailOutcome::Released);
        }

        let fee = state.config().jail_fee;
        let settlement = TransactionResolver::settle(state, decisions, player, Party::Bank, fee)?;
        if settlement.is_bankrupt() {
            return Ok(JailOutcome::Bankrupt);
        }
        Self::release(state, player, ReleaseReason::PaidFee);
        Ok(JailOutcome::Released)
    }

    /// Before rolling, offer an incarcerated player the ways out they can
    /// afford right now. Returns true if they left jail.
    ///
    /// Not asked when rolling is the only option.
    pub fn offer_early_release(
        state: &mut GameState,
        decisions: &mut dyn DecisionProvider,
        player: PlayerId,
    ) -> Result<bool> {
        let fee = state.config().jail_fee;
        let p = state.player(player);
        if !p.in_jail() {
            return Ok(false);
        }

        let mut options = vec![ROLL];
        if p.cash() >= fee {
            options.push(PAY_FEE);
        }
        if p.jail_free_cards() > 0 {
            options.push(USE_TOKEN);
        }
        if options.len() == 1 {
            return Ok(false);
        }

        let prompt = Prompt::JailOptions {
            player: p.name.clone(),
        };
        let index = decisions.ask_choice(&prompt, &options)?;
        match options.get(index).copied() {
            Some(PAY_FEE) => {
                state.player_mut(player).adjust_cash(-fee);
                state.record(GameEvent::Paid {
                    debtor: player,
                    creditor: Party::Bank,
                    amount: fee,
                });
                Self::release(state, player, ReleaseReason::PaidFee);
                Ok(true)
            }
            Some(USE_TOKEN) => {
                state.player_mut(player).use_jail_free_card();
                Self::release(state, player, ReleaseReason::Token);
                Ok(true)
            }
            Some(_) => Ok(false),
            None => Err(GameError::AnswerOutOfDomain {
                answer: index.to_string(),
                domain: options.join("/"),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::GameConfig;
    use crate::input::ScriptedDecisions;

    const P0: PlayerId = PlayerId(0);

    fn jailed() -> GameState {
        let mut state = GameState::with_defaults(GameConfig::new(2)).unwrap();
        state.player_mut(P0).set_position(SquareId::new(30));
        JailStateMachine::incarcerate(&mut state, P0, JailReason::Square);
        state
    }

    #[test]
    fn test_incarcerate() {
        let state = jailed();
        assert_eq!(state.player(P0).position(), SquareId::JAIL);
        assert_eq!(
            state.player(P0).jail(),
            JailStatus::Incarcerated {
                attempts_remaining: 2
            }
        );
    }

    #[test]
    fn test_attempts_count_down_then_fee_is_forced() {
        let mut state = jailed();
        let mut decisions = ScriptedDecisions::new();

        for _ in 0..2 {
            assert_eq!(
                JailStateMachine::failed_attempt(&mut state, &mut decisions, P0).unwrap(),
                JailOutcome::Stays
            );
        }
        assert_eq!(
            JailStateMachine::failed_attempt(&mut state, &mut decisions, P0).unwrap(),
            JailOutcome::Released
        );
        assert!(!state.player(P0).in_jail());
        assert_eq!(state.player(P0).cash(), 1450);
    }

    #[test]
    fn test_forced_release_prefers_token() {
        let mut state = jailed();
        state.player_mut(P0).add_jail_free_card();
        state.player_mut(P0).set_jail(JailStatus::Incarcerated {
            attempts_remaining: 0,
        });
        let mut decisions = ScriptedDecisions::new();

        JailStateMachine::failed_attempt(&mut state, &mut decisions, P0).unwrap();

        assert_eq!(state.player(P0).jail_free_cards(), 0);
        assert_eq!(state.player(P0).cash(), 1500);
    }

    #[test]
    fn test_forced_release_can_bankrupt() {
        let mut state = jailed();
        state.player_mut(P0).adjust_cash(-1470);
        state.player_mut(P0).set_jail(JailStatus::Incarcerated {
            attempts_remaining: 0,
        });
        let mut decisions = ScriptedDecisions::new();

        assert_eq!(
            JailStateMachine::failed_attempt(&mut state, &mut decisions, P0).unwrap(),
            JailOutcome::Bankrupt
        );
        assert!(!state.is_active(P0));
    }

    #[test]
    fn test_early_release_by_fee() {
        let mut state = jailed();
        let mut decisions = ScriptedDecisions::new().label(PAY_FEE);

        assert!(JailStateMachine::offer_early_release(&mut state, &mut decisions, P0).unwrap());
        assert!(!state.player(P0).in_jail());
        assert_eq!(state.player(P0).cash(), 1450);
    }

    #[test]
    fn test_early_release_declined() {
        let mut state = jailed();
        let mut decisions = ScriptedDecisions::new().label(ROLL);

        assert!(!JailStateMachine::offer_early_release(&mut state, &mut decisions, P0).unwrap());
        assert!(state.player(P0).in_jail());
    }

    #[test]
    fn test_no_offer_when_only_rolling_is_possible() {
        let mut state = jailed();
        state.player_mut(P0).adjust_cash(-1480);
        let mut decisions = ScriptedDecisions::new();

        assert!(!JailStateMachine::offer_early_release(&mut state, &mut decisions, P0).unwrap());
    }
}
