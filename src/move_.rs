use crate::card::{Card, CardId, Position};
use crate::pile::{FaceStates, PileId, TALON_SIZE};

use smallvec::SmallVec;
use std::fmt;

/// Everything needed to reverse one committed transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Move {
    cards: SmallVec<[CardId; TALON_SIZE]>,
    source: PileId,
    destination: PileId,
    original_positions: SmallVec<[Position; TALON_SIZE]>,
    face_up_states: FaceStates,
    last_remaining_face_up: Option<bool>,
    source_face_up: FaceStates,
    destination_face_up: FaceStates,
}

impl Move {
    /// Captures a move before it is applied.
    ///
    /// `moved` holds the cards as they were in the source, `remaining` the cards
    /// the source keeps, and `destination_cards` the destination's current content.
    pub fn new(
        moved: &[Card],
        source: PileId,
        remaining: &[Card],
        destination: PileId,
        destination_cards: &[Card],
    ) -> Self {
        Self {
            cards: moved.iter().map(Card::id).collect(),
            source,
            destination,
            original_positions: moved.iter().map(|card| card.position).collect(),
            face_up_states: moved.iter().map(|card| card.face_up).collect(),
            last_remaining_face_up: remaining.last().map(|card| card.face_up),
            source_face_up: remaining
                .iter()
                .chain(moved.iter())
                .map(|card| card.face_up)
                .collect(),
            destination_face_up: destination_cards.iter().map(|card| card.face_up).collect(),
        }
    }

    pub fn cards(&self) -> &[CardId] {
        &self.cards
    }

    pub fn source(&self) -> PileId {
        self.source
    }

    pub fn destination(&self) -> PileId {
        self.destination
    }

    pub fn original_positions(&self) -> &[Position] {
        &self.original_positions
    }

    pub fn face_up_states(&self) -> &[bool] {
        &self.face_up_states
    }

    /// Face of the card exposed on the source by this move, `None` if the source emptied.
    pub fn last_remaining_face_up(&self) -> Option<bool> {
        self.last_remaining_face_up
    }

    pub fn source_face_up(&self) -> &[bool] {
        &self.source_face_up
    }

    pub fn destination_face_up(&self) -> &[bool] {
        &self.destination_face_up
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names = self
            .cards
            .iter()
            .map(|card| card.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        write!(f, "Move {names} from {} to {}", self.source, self.destination)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(s: &str, face_up: bool, y: i32) -> Card {
        let mut card = Card::new(s.parse().unwrap());
        card.face_up = face_up;
        card.position = Position::new(0, y);
        card
    }

    #[test]
    fn test_snapshot() {
        let remaining = [card("9C", false, 0), card("KD", false, 30)];
        let moved = [card("QS", true, 60), card("JH", true, 90)];
        let destination = [card("KH", true, 0)];
        let mov = Move::new(
            &moved,
            PileId::Tableau(2),
            &remaining,
            PileId::Tableau(5),
            &destination,
        );

        assert_eq!(mov.cards().len(), 2);
        assert_eq!(
            mov.original_positions(),
            &[Position::new(0, 60), Position::new(0, 90)]
        );
        assert_eq!(mov.face_up_states(), &[true, true]);
        assert_eq!(mov.last_remaining_face_up(), Some(false));
        assert_eq!(mov.source_face_up(), &[false, false, true, true]);
        assert_eq!(mov.destination_face_up(), &[true]);
        assert_eq!(mov.to_string(), "Move Q♠, J♥ from Tableau3 to Tableau6");
    }

    #[test]
    fn test_source_emptied() {
        let moved = [card("KS", true, 0)];
        let mov = Move::new(&moved, PileId::Tableau(0), &[], PileId::Tableau(1), &[]);
        assert_eq!(mov.last_remaining_face_up(), None);
        assert!(mov.destination_face_up().is_empty());
    }
}
