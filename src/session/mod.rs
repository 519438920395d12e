//! The session loop.
//!
//! A [`Session`] owns the game state and its collaborators and plays rounds
//! over the live turn queue until a single player remains. Observers see a
//! [`Snapshot`] after every round, at the end, and when a fatal error stops
//! play.
//!
//! ```
//! use rust_monopoly::dice::ScriptedDice;
//! use rust_monopoly::input::ScriptedDecisions;
//! use rust_monopoly::session::SessionBuilder;
//!
//! let session = SessionBuilder::new(2)
//!     .dice(ScriptedDice::from_pairs(&[(1, 2)]).unwrap())
//!     .decisions(ScriptedDecisions::new())
//!     .build()
//!     .unwrap();
//! assert_eq!(session.state().active_count(), 2);
//! ```

mod snapshot;

pub use snapshot::{PlayerSnapshot, Snapshot};

use tracing::{debug, error, info, instrument};

use crate::board::Board;
use crate::cards::Decks;
use crate::core::{GameConfig, GameEvent, GameRng, GameState, PlayerId};
use crate::dice::{DiceSource, RandomDice};
use crate::error::{GameError, Result};
use crate::input::DecisionProvider;
use crate::rules::TurnEngine;

/// Watches a session from the outside. Every hook defaults to doing nothing.
pub trait SessionObserver {
    /// Every active player has taken one turn.
    fn round_completed(&mut self, _snapshot: &Snapshot) -> Result<()> {
        Ok(())
    }

    /// One player is left.
    fn game_over(&mut self, _winner: &PlayerSnapshot, _snapshot: &Snapshot) -> Result<()> {
        Ok(())
    }

    /// Play stopped on a fatal error. `snapshot` is the state at that point.
    fn aborted(&mut self, _snapshot: &Snapshot, _error: &GameError) -> Result<()> {
        Ok(())
    }
}

/// Observer that ignores everything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullObserver;

impl SessionObserver for NullObserver {}

/// How a finished session ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GameOutcome {
    /// Last player standing.
    pub winner: PlayerId,
    /// Completed rounds, the last partial round included.
    pub rounds: u32,
}

/// Assembles a [`Session`].
///
/// Anything left unset falls back to a default: seat names "Player N", the
/// standard decks shuffled from the config seed, fair dice on the same seed
/// and no observer. The decision provider has no default.
pub struct SessionBuilder {
    config: GameConfig,
    names: Option<Vec<String>>,
    board: Option<Board>,
    decks: Option<Decks>,
    dice: Option<Box<dyn DiceSource>>,
    decisions: Option<Box<dyn DecisionProvider>>,
    observer: Option<Box<dyn SessionObserver>>,
    roll_for_order: bool,
}

impl SessionBuilder {
    /// A builder for `player_count` players under the default rules.
    pub fn new(player_count: usize) -> Self {
        Self::with_config(GameConfig::new(player_count))
    }

    /// A builder for an explicit configuration.
    pub fn with_config(config: GameConfig) -> Self {
        Self {
            config,
            names: None,
            board: None,
            decks: None,
            dice: None,
            decisions: None,
            observer: None,
            roll_for_order: false,
        }
    }

    pub fn names(mut self, names: Vec<String>) -> Self {
        self.names = Some(names);
        self
    }

    pub fn board(mut self, board: Board) -> Self {
        self.board = Some(board);
        self
    }

    pub fn decks(mut self, decks: Decks) -> Self {
        self.decks = Some(decks);
        self
    }

    pub fn dice(mut self, dice: impl DiceSource + 'static) -> Self {
        self.dice = Some(Box::new(dice));
        self
    }

    pub fn decisions(mut self, decisions: impl DecisionProvider + 'static) -> Self {
        self.decisions = Some(Box::new(decisions));
        self
    }

    pub fn observer(mut self, observer: impl SessionObserver + 'static) -> Self {
        self.observer = Some(Box::new(observer));
        self
    }

    /// Decide the first player by rolling before play starts.
    pub fn roll_for_order(mut self, enabled: bool) -> Self {
        self.roll_for_order = enabled;
        self
    }

    /// Validate the setup and seat the players.
    pub fn build(self) -> Result<Session> {
        self.config.validate()?;
        let decisions = self
            .decisions
            .ok_or_else(|| GameError::inconsistent("session built without a decision provider"))?;

        let rng = GameRng::new(self.config.seed);
        let names = self.names.unwrap_or_else(|| {
            PlayerId::all(self.config.player_count)
                .map(|id| id.to_string())
                .collect()
        });
        let board = self.board.unwrap_or_else(Board::standard);
        let decks = self.decks.unwrap_or_else(|| Decks::standard(&rng));
        let dice = self
            .dice
            .unwrap_or_else(|| Box::new(RandomDice::new(rng.for_context("dice"))));
        let observer = self.observer.unwrap_or_else(|| Box::new(NullObserver));

        let state = GameState::new(self.config, &names, board, decks)?;
        let mut session = Session {
            state,
            dice,
            decisions,
            observer,
        };
        if self.roll_for_order {
            session.roll_for_order()?;
        }
        Ok(session)
    }
}

/// A game in progress.
pub struct Session {
    state: GameState,
    dice: Box<dyn DiceSource>,
    decisions: Box<dyn DecisionProvider>,
    observer: Box<dyn SessionObserver>,
}

impl Session {
    /// Current game state.
    #[must_use]
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Mutable access to the state, for setting up positions before play.
    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    /// Snapshot of the table right now.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::capture(&self.state)
    }

    /// Every player rolls; the highest total leads. Ties at the top roll
    /// again among themselves. Seating order is otherwise kept.
    fn roll_for_order(&mut self) -> Result<()> {
        let mut contenders = self.state.turn_order().to_vec();

        while contenders.len() > 1 {
            let mut rolls = Vec::with_capacity(contenders.len());
            for &player in &contenders {
                let roll = self.dice.roll()?;
                let (first, second) = roll.faces();
                self.state.record(GameEvent::Rolled {
                    player,
                    first,
                    second,
                });
                debug!(%player, %roll, "rolled for order");
                rolls.push((player, roll.value()));
            }

            let best = rolls.iter().map(|&(_, value)| value).max().unwrap_or(0);
            contenders = rolls
                .into_iter()
                .filter(|&(_, value)| value == best)
                .map(|(player, _)| player)
                .collect();
        }

        let Some(&first) = contenders.first() else {
            return Err(GameError::inconsistent("no players to order"));
        };
        let mut order = self.state.turn_order().to_vec();
        if let Some(lead) = order.iter().position(|&p| p == first) {
            order.rotate_left(lead);
        }
        info!(%first, "goes first");
        self.state.set_turn_order(order)
    }

    /// Play until one player remains.
    ///
    /// A fatal error stops play at once. The observer sees the state as it
    /// stood, nothing is rolled back, and the error is returned.
    #[instrument(skip(self), fields(players = self.state.player_count()))]
    pub fn run(&mut self) -> Result<GameOutcome> {
        match self.play_rounds() {
            Ok(outcome) => Ok(outcome),
            Err(err) => {
                error!(%err, round = self.state.round(), "session aborted");
                let snapshot = self.snapshot();
                self.observer.aborted(&snapshot, &err)?;
                Err(err)
            }
        }
    }

    fn play_rounds(&mut self) -> Result<GameOutcome> {
        while self.state.active_count() > 1 {
            let order = self.state.turn_order().to_vec();
            for player in order {
                if !self.state.is_active(player) {
                    continue;
                }
                TurnEngine::play_turn(
                    &mut self.state,
                    self.dice.as_mut(),
                    self.decisions.as_mut(),
                    player,
                )?;
                if self.state.active_count() <= 1 {
                    break;
                }
            }

            self.state.advance_round();
            self.state.check_invariants()?;
            let snapshot = self.snapshot();
            debug!(round = snapshot.round, active = self.state.active_count(), "round complete");
            self.observer.round_completed(&snapshot)?;
        }

        let winner = *self
            .state
            .turn_order()
            .first()
            .ok_or_else(|| GameError::inconsistent("every player went bankrupt"))?;
        let snapshot = self.snapshot();
        info!(%winner, rounds = snapshot.round, "game over");
        self.observer.game_over(snapshot.player(winner)?, &snapshot)?;

        Ok(GameOutcome {
            winner,
            rounds: self.state.round(),
        })
    }
}
