//! Dice sources.
//!
//! The turn engine only sees [`DiceSource`]. Two implementations:
//!
//! - [`RandomDice`]: two independent fair d6 from a seeded [`GameRng`]
//! - [`ScriptedDice`]: replays a fixed sequence and fails with
//!   [`GameError::DiceExhausted`] once the script runs out

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::GameRng;
use crate::error::{GameError, Result};

/// The outcome of rolling two dice.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Roll {
    first: u8,
    second: u8,
}

impl Roll {
    /// A roll of two faces, each 1-6.
    pub fn new(first: u8, second: u8) -> Result<Self> {
        if !(1..=6).contains(&first) || !(1..=6).contains(&second) {
            return Err(GameError::InvalidDice { first, second });
        }
        Ok(Self { first, second })
    }

    /// The two faces.
    #[must_use]
    pub fn faces(self) -> (u8, u8) {
        (self.first, self.second)
    }

    /// Total, 2-12.
    #[must_use]
    pub fn value(self) -> u8 {
        self.first + self.second
    }

    /// Both dice show the same face.
    #[must_use]
    pub fn is_double(self) -> bool {
        self.first == self.second
    }
}

impl std::fmt::Display for Roll {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({}+{})", self.value(), self.first, self.second)?;
        if self.is_double() {
            write!(f, " double")?;
        }
        Ok(())
    }
}

/// Anything that can produce a two-die roll.
pub trait DiceSource {
    /// Roll both dice.
    fn roll(&mut self) -> Result<Roll>;
}

/// Uniform fair dice.
#[derive(Clone, Debug)]
pub struct RandomDice {
    rng: GameRng,
}

impl RandomDice {
    /// Dice drawing from `rng`.
    #[must_use]
    pub fn new(rng: GameRng) -> Self {
        Self { rng }
    }

    /// Dice on the "dice" stream of `seed`.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self::new(GameRng::new(seed).for_context("dice"))
    }
}

impl DiceSource for RandomDice {
    fn roll(&mut self) -> Result<Roll> {
        let first = self.rng.roll_die();
        let second = self.rng.roll_die();
        Roll::new(first, second)
    }
}

/// Replays a pre-supplied sequence of rolls.
#[derive(Clone, Debug, Default)]
pub struct ScriptedDice {
    rolls: VecDeque<Roll>,
    served: usize,
}

impl ScriptedDice {
    /// Script from already-validated rolls.
    #[must_use]
    pub fn new(rolls: impl IntoIterator<Item = Roll>) -> Self {
        Self {
            rolls: rolls.into_iter().collect(),
            served: 0,
        }
    }

    /// Script from face pairs.
    pub fn from_pairs(pairs: &[(u8, u8)]) -> Result<Self> {
        let rolls = pairs
            .iter()
            .map(|&(a, b)| Roll::new(a, b))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::new(rolls))
    }

    /// Parse a script: whitespace-separated face pairs, one pair per line or
    /// all on one line, `#` starting a comment.
    ///
    /// ```
    /// use rust_monopoly::dice::ScriptedDice;
    ///
    /// let dice = ScriptedDice::parse("3 4\n6 6 # doubles\n").unwrap();
    /// assert_eq!(dice.remaining(), 2);
    /// ```
    pub fn parse(script: &str) -> Result<Self> {
        let mut faces = Vec::new();
        for line in script.lines() {
            let content = line.split('#').next().unwrap_or_default();
            for token in content.split(|c: char| c.is_whitespace() || c == ',') {
                if token.is_empty() {
                    continue;
                }
                let face = token.parse::<u8>().map_err(|_| GameError::AnswerOutOfDomain {
                    answer: token.to_string(),
                    domain: "die face 1..=6".to_string(),
                })?;
                faces.push(face);
            }
        }

        if faces.len() % 2 != 0 {
            return Err(GameError::inconsistent("dice script has an odd number of faces"));
        }

        let pairs: Vec<(u8, u8)> = faces.chunks(2).map(|pair| (pair[0], pair[1])).collect();
        Self::from_pairs(&pairs)
    }

    /// Rolls not yet served.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.rolls.len()
    }
}

impl DiceSource for ScriptedDice {
    fn roll(&mut self) -> Result<Roll> {
        let roll = self
            .rolls
            .pop_front()
            .ok_or(GameError::DiceExhausted { rolls: self.served })?;
        self.served += 1;
        debug!(%roll, remaining = self.rolls.len(), "scripted roll");
        Ok(roll)
    }
}
