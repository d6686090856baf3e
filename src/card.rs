use crate::pile::PileId;

use anyhow::{Context, Result, bail};
use std::fmt;
use std::str::FromStr;

pub const MAX_RANK: u8 = 13;
pub const MAX_SUIT: u8 = 4;
pub const MAX_CARD: u8 = MAX_SUIT * MAX_RANK;

const SUITS: [char; 4] = ['♥', '♦', '♣', '♠'];
const SUIT_LETTERS: [char; 4] = ['H', 'D', 'C', 'S'];
const RANKS: [char; 13] = [
    'A', '2', '3', '4', '5', '6', '7', '8', '9', 'T', 'J', 'Q', 'K',
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Suit {
    Hearts,
    Diamonds,
    Clubs,
    Spades,
}

impl Suit {
    pub const ALL: [Suit; MAX_SUIT as usize] =
        [Suit::Hearts, Suit::Diamonds, Suit::Clubs, Suit::Spades];

    pub fn color(self) -> Color {
        match self {
            Suit::Hearts | Suit::Diamonds => Color::Red,
            Suit::Clubs | Suit::Spades => Color::Black,
        }
    }

    pub fn symbol(self) -> char {
        SUITS[self as usize]
    }

    /// Accepts both the card symbol (`♠`) and its ASCII letter (`S`/`s`).
    pub fn from_symbol(c: char) -> Option<Self> {
        let c_upper = c.to_ascii_uppercase();
        SUITS
            .iter()
            .position(|&s| s == c)
            .or_else(|| SUIT_LETTERS.iter().position(|&s| s == c_upper))
            .map(|idx| Self::ALL[idx])
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Rank {
    Ace = 1,
    Two,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Nine,
    Ten,
    Jack,
    Queen,
    King,
}

impl Rank {
    pub const ALL: [Rank; MAX_RANK as usize] = [
        Rank::Ace,
        Rank::Two,
        Rank::Three,
        Rank::Four,
        Rank::Five,
        Rank::Six,
        Rank::Seven,
        Rank::Eight,
        Rank::Nine,
        Rank::Ten,
        Rank::Jack,
        Rank::Queen,
        Rank::King,
    ];

    /// Numeric value, Ace = 1 through King = 13.
    pub fn value(self) -> u8 {
        self as u8
    }

    pub fn from_value(value: u8) -> Option<Self> {
        match value {
            1..=MAX_RANK => Some(Self::ALL[(value - 1) as usize]),
            _ => None,
        }
    }

    /// The rank directly above this one, `None` for the King.
    pub fn next(self) -> Option<Self> {
        Self::from_value(self.value() + 1)
    }

    /// The rank directly below this one, `None` for the Ace.
    pub fn prev(self) -> Option<Self> {
        Self::from_value(self.value() - 1)
    }

    pub fn symbol(self) -> char {
        RANKS[(self.value() - 1) as usize]
    }

    pub fn from_symbol(c: char) -> Option<Self> {
        let c = c.to_ascii_uppercase();
        RANKS
            .iter()
            .position(|&r| r == c)
            .map(|idx| Self::ALL[idx])
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    Red,
    Black,
}

/// The immutable identity of a card. Exactly one card per identity exists in a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CardId {
    pub rank: Rank,
    pub suit: Suit,
}

impl CardId {
    pub fn new(rank: Rank, suit: Suit) -> Self {
        Self { rank, suit }
    }

    /// The 52 identities of a standard deck, suit-major, Ace to King.
    pub fn deck() -> Vec<CardId> {
        Suit::ALL
            .iter()
            .flat_map(|&suit| Rank::ALL.iter().map(move |&rank| CardId::new(rank, suit)))
            .collect()
    }

    pub fn color(&self) -> Color {
        self.suit.color()
    }

    pub fn is_ace(&self) -> bool {
        self.rank == Rank::Ace
    }

    pub fn is_king(&self) -> bool {
        self.rank == Rank::King
    }

    pub fn parse(rank: char, suit: char) -> Result<Self> {
        let r = Rank::from_symbol(rank)
            .with_context(|| format!("Invalid rank at card {rank}{suit}"))?;
        let s = Suit::from_symbol(suit)
            .with_context(|| format!("Invalid suit at card {rank}{suit}"))?;
        Ok(CardId::new(r, s))
    }
}

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.rank.symbol(), self.suit.symbol())
    }
}

impl FromStr for CardId {
    type Err = anyhow::Error;

    /// Parses `A♠`, `as`, `TH` or `10h`.
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let normalized = match s.strip_prefix("10") {
            Some(rest) => format!("T{rest}"),
            None => s.to_string(),
        };
        let chars: Vec<char> = normalized.chars().collect();
        match chars.as_slice() {
            [] => bail!("Empty card"),
            [rank, suit] => CardId::parse(*rank, *suit),
            _ => bail!("Invalid card '{s}'"),
        }
    }
}

/// Presentation anchor of a card or pile, in layout units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

/// A card together with its presentation state.
///
/// `pile` is a non-owning back-reference kept in sync by [`crate::pile::Pile`];
/// the pile's card sequence is the only owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Card {
    id: CardId,
    pub face_up: bool,
    pub position: Position,
    pub highlight: bool,
    pile: Option<PileId>,
}

impl Card {
    pub fn new(id: CardId) -> Self {
        Self {
            id,
            face_up: false,
            position: Position::default(),
            highlight: false,
            pile: None,
        }
    }

    pub fn id(&self) -> CardId {
        self.id
    }

    pub fn rank(&self) -> Rank {
        self.id.rank
    }

    pub fn suit(&self) -> Suit {
        self.id.suit
    }

    pub fn color(&self) -> Color {
        self.id.color()
    }

    pub fn pile(&self) -> Option<PileId> {
        self.pile
    }

    pub(crate) fn set_pile(&mut self, pile: Option<PileId>) {
        self.pile = pile;
    }

    pub fn set_face_up(&mut self, face_up: bool) {
        self.face_up = face_up;
    }

    pub fn is_playable(&self) -> bool {
        self.face_up
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.id.fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deck_is_complete() {
        let deck = CardId::deck();
        assert_eq!(deck.len(), MAX_CARD as usize);
        let mut sorted = deck.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(sorted.len(), MAX_CARD as usize);
        assert_eq!(deck[0], CardId::new(Rank::Ace, Suit::Hearts));
        assert_eq!(deck[51], CardId::new(Rank::King, Suit::Spades));
    }

    #[test]
    fn test_colors() {
        assert_eq!(Suit::Hearts.color(), Color::Red);
        assert_eq!(Suit::Diamonds.color(), Color::Red);
        assert_eq!(Suit::Clubs.color(), Color::Black);
        assert_eq!(Suit::Spades.color(), Color::Black);
    }

    #[test]
    fn test_rank_neighbours() {
        assert_eq!(Rank::Ace.value(), 1);
        assert_eq!(Rank::King.value(), 13);
        assert_eq!(Rank::Ace.prev(), None);
        assert_eq!(Rank::King.next(), None);
        assert_eq!(Rank::Nine.next(), Some(Rank::Ten));
        assert_eq!(Rank::Jack.prev(), Some(Rank::Ten));
    }

    #[test]
    fn test_parse_card() {
        let ace = CardId::new(Rank::Ace, Suit::Spades);
        assert_eq!("A♠".parse::<CardId>().unwrap(), ace);
        assert_eq!("as".parse::<CardId>().unwrap(), ace);
        assert_eq!(
            "10h".parse::<CardId>().unwrap(),
            CardId::new(Rank::Ten, Suit::Hearts)
        );
        assert_eq!(
            "Td".parse::<CardId>().unwrap(),
            CardId::new(Rank::Ten, Suit::Diamonds)
        );
        assert!("".parse::<CardId>().is_err());
        assert!("ZS".parse::<CardId>().is_err());
        assert!("A♠♠".parse::<CardId>().is_err());
        assert_eq!(ace.to_string(), "A♠");
    }

    #[test]
    fn test_new_card_is_face_down_and_unowned() {
        let mut card = Card::new(CardId::new(Rank::Queen, Suit::Hearts));
        assert!(!card.face_up);
        assert!(!card.is_playable());
        assert_eq!(card.pile(), None);
        card.set_face_up(true);
        assert!(card.is_playable());
        assert_eq!(card.color(), Color::Red);
    }
}
