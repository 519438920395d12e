//! Canned answers.

use std::collections::VecDeque;
use std::ops::RangeInclusive;

use tracing::trace;

use super::{Candidate, DecisionProvider, Prompt};
use crate::board::SquareId;
use crate::core::{Money, PlayerId};
use crate::error::{GameError, Result};

/// One canned answer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Answer {
    YesNo(bool),
    Int(Money),
    /// Index into the offered labels.
    Choice(usize),
    /// Label text, matched case-insensitively against the offered labels.
    Label(String),
    Player(PlayerId),
    Square(SquareId),
    Text(String),
}

impl Answer {
    fn kind(&self) -> &'static str {
        match self {
            Answer::YesNo(_) => "yes/no",
            Answer::Int(_) => "integer",
            Answer::Choice(_) | Answer::Label(_) => "choice",
            Answer::Player(_) => "player",
            Answer::Square(_) => "square",
            Answer::Text(_) => "text",
        }
    }
}

/// A decision provider that replays answers in order.
///
/// Each question consumes exactly one answer. An answer of the wrong kind or
/// outside the question's domain is a fatal error rather than a re-prompt,
/// so a mistyped script fails loudly.
///
/// ```
/// use rust_monopoly::input::{DecisionProvider, Prompt, ScriptedDecisions};
///
/// let mut script = ScriptedDecisions::new().no().int(40);
/// assert!(!script.ask_yes_no(&Prompt::ChooseBidder).unwrap());
/// assert_eq!(script.ask_int(&Prompt::ChooseBidder, 0..=100).unwrap(), 40);
/// assert!(script.ask_yes_no(&Prompt::ChooseBidder).is_err());
/// ```
#[derive(Clone, Debug, Default)]
pub struct ScriptedDecisions {
    answers: VecDeque<Answer>,
}

impl ScriptedDecisions {
    /// An empty script.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A script from a list of answers.
    #[must_use]
    pub fn from_answers(answers: impl IntoIterator<Item = Answer>) -> Self {
        Self {
            answers: answers.into_iter().collect(),
        }
    }

    /// Append an answer.
    #[must_use]
    pub fn then(mut self, answer: Answer) -> Self {
        self.answers.push_back(answer);
        self
    }

    #[must_use]
    pub fn yes(self) -> Self {
        self.then(Answer::YesNo(true))
    }

    #[must_use]
    pub fn no(self) -> Self {
        self.then(Answer::YesNo(false))
    }

    #[must_use]
    pub fn int(self, value: Money) -> Self {
        self.then(Answer::Int(value))
    }

    #[must_use]
    pub fn choice(self, index: usize) -> Self {
        self.then(Answer::Choice(index))
    }

    #[must_use]
    pub fn label(self, label: impl Into<String>) -> Self {
        self.then(Answer::Label(label.into()))
    }

    #[must_use]
    pub fn player(self, id: PlayerId) -> Self {
        self.then(Answer::Player(id))
    }

    #[must_use]
    pub fn square(self, id: SquareId) -> Self {
        self.then(Answer::Square(id))
    }

    #[must_use]
    pub fn text(self, text: impl Into<String>) -> Self {
        self.then(Answer::Text(text.into()))
    }

    /// Answers not yet consumed.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.answers.len()
    }

    fn next(&mut self, prompt: &Prompt) -> Result<Answer> {
        let answer = self.answers.pop_front().ok_or(GameError::InputExhausted)?;
        trace!(%prompt, ?answer, "scripted answer");
        Ok(answer)
    }

    fn pick<T: Copy + PartialEq + std::fmt::Debug>(
        id: T,
        candidates: &[Candidate<T>],
    ) -> Result<T> {
        if candidates.iter().any(|c| c.id == id) {
            Ok(id)
        } else {
            Err(GameError::AnswerOutOfDomain {
                answer: format!("{id:?}"),
                domain: format!("{:?}", candidates.iter().map(|c| c.id).collect::<Vec<_>>()),
            })
        }
    }
}

fn unexpected(expected: &'static str, found: &Answer) -> GameError {
    GameError::UnexpectedAnswer {
        expected,
        found: found.kind().to_string(),
    }
}

impl DecisionProvider for ScriptedDecisions {
    fn ask_yes_no(&mut self, prompt: &Prompt) -> Result<bool> {
        match self.next(prompt)? {
            Answer::YesNo(value) => Ok(value),
            other => Err(unexpected("yes/no", &other)),
        }
    }

    fn ask_int(&mut self, prompt: &Prompt, domain: RangeInclusive<Money>) -> Result<Money> {
        match self.next(prompt)? {
            Answer::Int(value) if domain.contains(&value) => Ok(value),
            Answer::Int(value) => Err(GameError::AnswerOutOfDomain {
                answer: value.to_string(),
                domain: format!("{}..={}", domain.start(), domain.end()),
            }),
            other => Err(unexpected("integer", &other)),
        }
    }

    fn ask_choice(&mut self, prompt: &Prompt, labels: &[&str]) -> Result<usize> {
        let out_of_domain = |answer: String| GameError::AnswerOutOfDomain {
            answer,
            domain: labels.join("/"),
        };

        match self.next(prompt)? {
            Answer::Choice(index) if index < labels.len() => Ok(index),
            Answer::Choice(index) => Err(out_of_domain(index.to_string())),
            Answer::Label(text) => labels
                .iter()
                .position(|l| l.eq_ignore_ascii_case(&text))
                .ok_or_else(|| out_of_domain(text)),
            other => Err(unexpected("choice", &other)),
        }
    }

    fn ask_player(
        &mut self,
        prompt: &Prompt,
        candidates: &[Candidate<PlayerId>],
    ) -> Result<PlayerId> {
        match self.next(prompt)? {
            Answer::Player(id) => Self::pick(id, candidates),
            other => Err(unexpected("player", &other)),
        }
    }

    fn ask_square(
        &mut self,
        prompt: &Prompt,
        candidates: &[Candidate<SquareId>],
    ) -> Result<SquareId> {
        match self.next(prompt)? {
            Answer::Square(id) => Self::pick(id, candidates),
            other => Err(unexpected("square", &other)),
        }
    }

    fn ask_text(&mut self, prompt: &Prompt) -> Result<String> {
        match self.next(prompt)? {
            Answer::Text(text) => Ok(text),
            other => Err(unexpected("text", &other)),
        }
    }
}
