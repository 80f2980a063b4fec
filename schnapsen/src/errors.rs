//! The error taxonomy (spec.md §7).

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::deck::Card;

/// A component-local failure raised while mutating a [`crate::state::Hand`].
#[derive(Debug, thiserror::Error, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum HandError {
    #[error("hand already has its maximum of {max_size} cards")]
    Full { max_size: usize },
    #[error("card {card} is not in the hand")]
    CardNotHeld { card: Card },
}

/// A component-local failure raised while mutating a [`crate::state::Talon`].
#[derive(Debug, thiserror::Error, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum TalonError {
    #[error("requested {requested} cards but only {available} remain on the talon")]
    UnderSupplied { requested: usize, available: usize },
    #[error("trump exchange requires at least 2 cards on the talon, found {available}")]
    TooFewForExchange { available: usize },
    #[error("trump exchange card {card} is not a jack")]
    NotAJack { card: Card },
    #[error("trump exchange jack {card} does not match the talon's trump suit")]
    WrongSuit { card: Card },
}

/// The four fatal-to-the-game error categories from spec.md §7.
#[derive(Debug, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum EngineError {
    /// An agent returned a move outside its legal-move set, or one
    /// referencing cards it does not hold. Fatal; the engine aborts and
    /// identifies the offender.
    #[error("agent protocol violation by {offender}: {reason}")]
    AgentProtocolViolation { offender: String, reason: String },

    /// An internal consistency check failed: the follower reached 66 first,
    /// a talon draw was requested when under-supplied, a trump exchange was
    /// attempted with an invalid card, etc. Indicates an engine bug, not a
    /// misbehaving agent.
    #[error("engine invariant violated: {0}")]
    InvariantViolation(String),

    /// A non-existent model file, malformed trace line, or unknown variant
    /// name. Surfaces to the caller; the engine core itself is untouched.
    #[error("configuration error: {0}")]
    ConfigurationError(String),

    /// `valid_moves` (or any other decision-only accessor) was called on a
    /// terminal (winner/loser) perspective.
    #[error("cannot query valid moves on a terminal perspective")]
    TerminalStateAccess,
}

impl From<HandError> for EngineError {
    fn from(err: HandError) -> Self {
        EngineError::InvariantViolation(err.to_string())
    }
}

impl From<TalonError> for EngineError {
    fn from(err: TalonError) -> Self {
        EngineError::InvariantViolation(err.to_string())
    }
}
