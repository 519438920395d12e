//! Read-only views of the table handed to observers.

use serde::{Deserialize, Serialize};

use crate::board::SquareId;
use crate::core::{GameState, Money, PlayerId};
use crate::error::{GameError, Result};

/// One seat at the table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerSnapshot {
    pub id: PlayerId,
    pub name: String,
    pub cash: Money,
    pub position: SquareId,
    /// Name of the square at `position`.
    pub square: String,
    pub in_jail: bool,
    pub jail_free_cards: u32,
    /// Names of owned squares, in acquisition order.
    pub owned: Vec<String>,
    /// Still in the turn queue.
    pub active: bool,
}

/// Every seat, after a given number of completed rounds.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub round: u32,
    pub players: Vec<PlayerSnapshot>,
}

impl Snapshot {
    /// Capture the current table.
    #[must_use]
    pub fn capture(state: &GameState) -> Self {
        let players = state
            .players()
            .map(|player| PlayerSnapshot {
                id: player.id,
                name: player.name.clone(),
                cash: player.cash(),
                position: player.position(),
                square: state.square(player.position()).name.clone(),
                in_jail: player.in_jail(),
                jail_free_cards: player.jail_free_cards(),
                owned: player
                    .owned()
                    .iter()
                    .map(|&sq| state.square(sq).name.clone())
                    .collect(),
                active: state.is_active(player.id),
            })
            .collect();

        Self {
            round: state.round(),
            players,
        }
    }

    /// The seat with `id`.
    pub fn player(&self, id: PlayerId) -> Result<&PlayerSnapshot> {
        self.players
            .iter()
            .find(|p| p.id == id)
            .ok_or_else(|| GameError::inconsistent(format!("{id} missing from snapshot")))
    }

    /// Seats still in the game.
    pub fn active(&self) -> impl Iterator<Item = &PlayerSnapshot> {
        self.players.iter().filter(|p| p.active)
    }
}
