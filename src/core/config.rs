//! Session configuration.
//!
//! The rule constants live here rather than in the engine so that house-rule
//! variants (a Go salary, mortgage interest) are a config change.

use serde::{Deserialize, Serialize};

use super::player::Money;
use crate::error::{GameError, Result};

/// Fewest players a session accepts.
pub const MIN_PLAYERS: usize = 2;
/// Most players a session accepts.
pub const MAX_PLAYERS: usize = 8;

/// Complete game configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Number of players (2-8).
    pub player_count: usize,

    /// Cash each player starts with.
    pub starting_cash: Money,

    /// Fee paid to leave jail.
    pub jail_fee: Money,

    /// Failed doubles attempts allowed after entering jail before the fee is
    /// forced.
    pub jail_attempts: u8,

    /// Step between the winning bid and the next minimum bid.
    pub bid_increment: Money,

    /// Credited when a forward move wraps past Go. Zero disables it.
    pub pass_go_bonus: Money,

    /// Surcharge, in percent of the mortgage value, to lift a mortgage.
    pub unmortgage_interest_percent: u8,

    /// Master seed. Dice and each deck use streams derived from it.
    pub seed: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            player_count: MIN_PLAYERS,
            starting_cash: 1500,
            jail_fee: 50,
            jail_attempts: 2,
            bid_increment: 10,
            pass_go_bonus: 0,
            unmortgage_interest_percent: 0,
            seed: 0,
        }
    }
}

impl GameConfig {
    /// Create a configuration for `player_count` players with default rules.
    pub fn new(player_count: usize) -> Self {
        Self {
            player_count,
            ..Self::default()
        }
    }

    /// Set the starting cash.
    #[must_use]
    pub fn with_starting_cash(mut self, cash: Money) -> Self {
        self.starting_cash = cash;
        self
    }

    /// Set the jail release fee.
    #[must_use]
    pub fn with_jail_fee(mut self, fee: Money) -> Self {
        self.jail_fee = fee;
        self
    }

    /// Set the Go bonus.
    #[must_use]
    pub fn with_pass_go_bonus(mut self, bonus: Money) -> Self {
        self.pass_go_bonus = bonus;
        self
    }

    /// Set the mortgage interest.
    #[must_use]
    pub fn with_unmortgage_interest(mut self, percent: u8) -> Self {
        self.unmortgage_interest_percent = percent;
        self
    }

    /// Set the master seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Reject configurations the engine cannot run.
    pub fn validate(&self) -> Result<()> {
        if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&self.player_count) {
            return Err(GameError::InvalidPlayerCount {
                count: self.player_count,
            });
        }
        if self.starting_cash < 0 || self.jail_fee < 0 || self.bid_increment <= 0 {
            return Err(GameError::inconsistent(
                "cash amounts must be non-negative and the bid increment positive",
            ));
        }
        Ok(())
    }

    /// Cost of lifting a mortgage worth `mortgage_value`.
    #[must_use]
    pub fn unmortgage_cost(&self, mortgage_value: Money) -> Money {
        mortgage_value + mortgage_value * Money::from(self.unmortgage_interest_percent) / 100
    }
}
