//! This crate provides the rules engine for single-player Klondike Solitaire:
//! piles and their acceptance rules, dealing, drag-and-drop moves, stock
//! cycling, undo, hint search and win detection.
//!
//! Rendering and input handling are left to the caller, which drives an
//! [`Engine`] through its gesture methods and reads back piles and cards.
pub mod board;
pub mod card;
pub mod config;
pub mod engine;
pub mod error;
pub mod history;
pub mod move_;
pub mod pile;

pub use crate::card::{Card, CardId, Color, Position, Rank, Suit};
pub use crate::config::Config;
pub use crate::engine::{DraggedRun, Engine, Hint, MoveOutcome, StockClick};
pub use crate::error::{EngineError, InvalidDragKind};
pub use crate::history::HistoryManager;
pub use crate::move_::Move;
pub use crate::pile::{Pile, PileId, PileKind};

#[cfg(test)]
pub(crate) fn init_test_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .without_time()
        .try_init()
        .ok();
}
