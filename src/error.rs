use crate::card::CardId;

use thiserror::Error;

/// Why a card cannot be picked up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidDragKind {
    FaceDown,
    Unowned,
    /// Below the top of a Stock, Discard or Foundation pile.
    Buried,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("Cannot drag {card}: {kind:?}")]
    InvalidDrag { card: CardId, kind: InvalidDragKind },
    #[error("Invalid deck: {0}")]
    InvalidDeck(String),
}

pub type EngineResult<T> = std::result::Result<T, EngineError>;
