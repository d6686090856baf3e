use crate::card::{Card, CardId, Position};

use anyhow::{Context, Result, bail};
use smallvec::SmallVec;
use std::fmt;
use std::str::FromStr;
use tracing::trace;

pub const TOTAL_TABLEAUS: usize = 7;
pub const TOTAL_FOUNDATIONS: usize = 4;
pub const TOTAL_PILES: usize = TOTAL_TABLEAUS + TOTAL_FOUNDATIONS + 2;
pub const TALON_SIZE: usize = 24;
pub const RUN_SIZE: usize = 13;

pub type Run = SmallVec<[Card; RUN_SIZE]>;
pub type FaceStates = SmallVec<[bool; TALON_SIZE]>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PileKind {
    Tableau,
    Foundation,
    Stock,
    Discard,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PileId {
    Tableau(usize),
    Stock,
    Discard,
    Foundation(usize),
}

impl PileId {
    /// Every pile in the fixed order used for dealing, hint search and storage.
    pub const ALL: [PileId; TOTAL_PILES] = [
        PileId::Tableau(0),
        PileId::Tableau(1),
        PileId::Tableau(2),
        PileId::Tableau(3),
        PileId::Tableau(4),
        PileId::Tableau(5),
        PileId::Tableau(6),
        PileId::Stock,
        PileId::Discard,
        PileId::Foundation(0),
        PileId::Foundation(1),
        PileId::Foundation(2),
        PileId::Foundation(3),
    ];

    /// Slot in [`PileId::ALL`]. Only meaningful when [`PileId::is_valid`] holds.
    pub(crate) fn index(self) -> usize {
        match self {
            PileId::Tableau(i) => i,
            PileId::Stock => TOTAL_TABLEAUS,
            PileId::Discard => TOTAL_TABLEAUS + 1,
            PileId::Foundation(i) => TOTAL_TABLEAUS + 2 + i,
        }
    }

    pub fn kind(self) -> PileKind {
        match self {
            PileId::Tableau(_) => PileKind::Tableau,
            PileId::Stock => PileKind::Stock,
            PileId::Discard => PileKind::Discard,
            PileId::Foundation(_) => PileKind::Foundation,
        }
    }

    pub fn is_valid(self) -> bool {
        match self {
            PileId::Tableau(i) => i < TOTAL_TABLEAUS,
            PileId::Foundation(i) => i < TOTAL_FOUNDATIONS,
            PileId::Stock | PileId::Discard => true,
        }
    }
}

impl fmt::Display for PileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PileId::Tableau(i) => write!(f, "Tableau{}", i + 1),
            PileId::Stock => write!(f, "Stock"),
            PileId::Discard => write!(f, "Discard"),
            PileId::Foundation(i) => write!(f, "Foundation{}", i + 1),
        }
    }
}

impl FromStr for PileId {
    type Err = anyhow::Error;

    /// Parses the short names `S`, `D`, `T1`..`T7` and `F1`..`F4`.
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim().to_ascii_uppercase();
        let pile = match s.as_str() {
            "S" => PileId::Stock,
            "D" => PileId::Discard,
            _ => {
                let index = |digits: &str| -> Result<usize> {
                    let num = digits
                        .parse::<usize>()
                        .with_context(|| format!("Invalid pile index: {digits}"))?;
                    num.checked_sub(1)
                        .with_context(|| format!("Invalid pile index: {digits}"))
                };
                if let Some(rest) = s.strip_prefix('T') {
                    PileId::Tableau(index(rest)?)
                } else if let Some(rest) = s.strip_prefix('F') {
                    PileId::Foundation(index(rest)?)
                } else {
                    bail!("Invalid pile identifier: {}", s)
                }
            }
        };
        if !pile.is_valid() {
            bail!("Pile out of range: {}", s);
        }
        Ok(pile)
    }
}

/// An ordered sequence of cards. Index 0 is the bottom, the last card is the top.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pile {
    id: PileId,
    anchor: Position,
    step: i32,
    cards: SmallVec<[Card; TALON_SIZE]>,
    pub highlight: bool,
}

impl Pile {
    pub fn new(id: PileId, anchor: Position, step: i32) -> Self {
        Self {
            id,
            anchor,
            step,
            cards: SmallVec::new(),
            highlight: false,
        }
    }

    pub fn id(&self) -> PileId {
        self.id
    }

    pub fn kind(&self) -> PileKind {
        self.id.kind()
    }

    pub fn anchor(&self) -> Position {
        self.anchor
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub(crate) fn cards_mut(&mut self) -> &mut [Card] {
        &mut self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn peek_top(&self) -> Option<&Card> {
        self.cards.last()
    }

    pub(crate) fn peek_top_mut(&mut self) -> Option<&mut Card> {
        self.cards.last_mut()
    }

    pub fn position_of(&self, id: CardId) -> Option<usize> {
        self.cards.iter().position(|card| card.id() == id)
    }

    /// Whether `card` may be placed on top of this pile during play.
    pub fn can_accept(&self, card: CardId) -> bool {
        match self.kind() {
            PileKind::Stock | PileKind::Discard => false,
            PileKind::Foundation => match self.peek_top() {
                None => card.is_ace(),
                Some(top) => {
                    top.suit() == card.suit && top.rank().next() == Some(card.rank)
                }
            },
            PileKind::Tableau => match self.peek_top() {
                None => card.is_king(),
                Some(top) => {
                    top.color() != card.color() && top.rank().prev() == Some(card.rank)
                }
            },
        }
    }

    /// Where the next card would sit: Stock is flat, every other kind cascades.
    pub fn next_insert_position(&self) -> Position {
        match self.kind() {
            PileKind::Stock => self.anchor,
            _ => self.anchor.offset(0, self.step * self.cards.len() as i32),
        }
    }

    /// Puts `card` on top. Discard and Foundation cards are always turned face up;
    /// Tableau and Stock keep whatever face the caller gave them.
    pub fn append(&mut self, mut card: Card) {
        match self.kind() {
            PileKind::Discard | PileKind::Foundation => {
                card.position = self.anchor;
                card.face_up = true;
            }
            PileKind::Tableau | PileKind::Stock => {
                card.position = self.next_insert_position();
            }
        }
        card.set_pile(Some(self.id));
        trace!("Adding card {card} to {} at {:?}", self.id, card.position);
        self.cards.push(card);
    }

    /// Removes the card by identity. Absent cards are not an error.
    pub fn remove(&mut self, id: CardId) -> Option<Card> {
        let index = self.position_of(id)?;
        let mut card = self.cards.remove(index);
        card.set_pile(None);
        trace!("Removing card {card} from {}", self.id);
        Some(card)
    }

    /// Removes every listed card that is a member, keeping the order of `ids`.
    pub fn remove_run(&mut self, ids: &[CardId]) -> SmallVec<[Card; TALON_SIZE]> {
        ids.iter().filter_map(|&id| self.remove(id)).collect()
    }

    /// Detaches the cards from `index` to the top.
    pub(crate) fn split_off(&mut self, index: usize) -> Run {
        let index = index.min(self.cards.len());
        self.cards
            .drain(index..)
            .map(|mut card| {
                card.set_pile(None);
                card
            })
            .collect()
    }

    pub(crate) fn pop(&mut self) -> Option<Card> {
        let mut card = self.cards.pop()?;
        card.set_pile(None);
        Some(card)
    }

    pub(crate) fn clear(&mut self) {
        self.cards.clear();
        self.highlight = false;
    }
}
