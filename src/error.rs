//! Error types.
//!
//! Two families:
//!
//! - [`GameError`]: fatal failures. Any of these aborts the session after the
//!   latest snapshot has been emitted. No rollback is attempted.
//! - [`ActionError`]: an illegal action request (mortgaging a mortgaged deed,
//!   selling houses that don't exist). Returned by the component that owns the
//!   precondition; the caller re-asks the decision provider. State is untouched.

use derive_more::{Display, Error};

use crate::board::SquareId;

/// Fatal, session-aborting failure.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum GameError {
    /// A scripted dice sequence ran out before the session ended.
    #[display("scripted dice exhausted after {rolls} rolls")]
    DiceExhausted {
        /// Rolls served before running out.
        rolls: usize,
    },

    /// The decision provider has no more answers (script exhausted or EOF).
    #[display("decision input exhausted")]
    InputExhausted,

    /// A scripted answer was of the wrong kind for the question asked.
    #[display("expected a {expected} answer, got {found}")]
    UnexpectedAnswer {
        /// Kind of answer the engine asked for.
        expected: &'static str,
        /// Kind of answer the script supplied.
        found: String,
    },

    /// A collaborator returned a value outside the domain it was given.
    #[display("answer {answer} outside the allowed domain {domain}")]
    AnswerOutOfDomain {
        /// The offending answer.
        answer: String,
        /// The domain the engine asked for.
        domain: String,
    },

    /// Session configured with too few or too many players.
    #[display("player count {count} outside 2..=8")]
    InvalidPlayerCount {
        /// Requested number of players.
        count: usize,
    },

    /// A die face outside 1..=6.
    #[display("invalid dice ({first}, {second})")]
    InvalidDice {
        /// First die.
        first: u8,
        /// Second die.
        second: u8,
    },

    /// An internal invariant did not hold.
    #[display("inconsistent state: {detail}")]
    Inconsistent {
        /// What went wrong.
        detail: String,
    },

    /// Reading from or writing to a console collaborator failed.
    #[display("i/o failure: {detail}")]
    Io {
        /// Underlying error text.
        detail: String,
    },
}

impl GameError {
    /// Build an [`GameError::Inconsistent`] from anything printable.
    pub fn inconsistent(detail: impl Into<String>) -> Self {
        Self::Inconsistent {
            detail: detail.into(),
        }
    }
}

impl From<std::io::Error> for GameError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            detail: err.to_string(),
        }
    }
}

impl From<ActionError> for GameError {
    /// An action the engine itself requested was refused: the engine's own
    /// bookkeeping is wrong.
    fn from(err: ActionError) -> Self {
        Self::inconsistent(err.to_string())
    }
}

/// Result alias for fallible engine operations.
pub type Result<T> = std::result::Result<T, GameError>;

/// Result alias for action requests that may break a rule.
pub type ActionResult<T> = std::result::Result<T, ActionError>;

/// An action request that breaks a rule. Never mutates state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error)]
pub enum ActionError {
    /// The acting player does not own the square.
    #[display("{square} is not owned by the acting player")]
    NotOwner {
        /// Square named in the request.
        square: SquareId,
    },

    /// Houses only go on color-group properties.
    #[display("{square} is not a property")]
    NotAProperty {
        /// Square named in the request.
        square: SquareId,
    },

    /// Square is not a railroad, utility or property.
    #[display("{square} cannot be owned")]
    NotOwnable {
        /// Square named in the request.
        square: SquareId,
    },

    /// Mortgaging a square that is already mortgaged.
    #[display("{square} is already mortgaged")]
    AlreadyMortgaged {
        /// Square named in the request.
        square: SquareId,
    },

    /// Lifting a mortgage that does not exist.
    #[display("{square} is not mortgaged")]
    NotMortgaged {
        /// Square named in the request.
        square: SquareId,
    },

    /// Mortgage or trade of an improved property.
    #[display("{square} has houses")]
    HasHouses {
        /// Square named in the request.
        square: SquareId,
    },

    /// A square in the color group carries houses, so none may be traded.
    #[display("the color group of {square} is improved")]
    GroupImproved {
        /// Square named in the request.
        square: SquareId,
    },

    /// Selling houses from a bare property.
    #[display("{square} has no houses")]
    NoHouses {
        /// Square named in the request.
        square: SquareId,
    },

    /// Building without owning the whole color group, or on a group with a
    /// mortgaged member.
    #[display("{square} is not part of a buildable monopoly")]
    NoMonopoly {
        /// Square named in the request.
        square: SquareId,
    },

    /// Building past the hotel.
    #[display("{square} cannot hold {requested} more houses")]
    HouseLimit {
        /// Square named in the request.
        square: SquareId,
        /// Houses requested.
        requested: u8,
    },

    /// Not enough cash on hand.
    #[display("needs {needed}, has {available}")]
    InsufficientFunds {
        /// Cash the action costs.
        needed: i64,
        /// Cash available.
        available: i64,
    },

    /// A count of zero, or a count beyond what is available.
    #[display("invalid count {count}")]
    InvalidCount {
        /// Count requested.
        count: i64,
    },
}
