use crate::card::Position;
use crate::pile::PileId;

pub const CARD_WIDTH: i32 = 100;
pub const CARD_HEIGHT: i32 = 150;
pub const PILE_SPACING: i32 = 50;
pub const CASCADE_STEP: i32 = 30;

/// Layout and behaviour knobs for an [`crate::Engine`].
///
/// Positions are purely presentational; the rules never look at them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub card_width: i32,
    pub pile_spacing: i32,
    pub tableau_origin: Position,
    pub stock_origin: Position,
    pub foundation_origin: Position,
    /// Vertical distance between consecutive cards of a cascading pile.
    pub cascade_step: i32,
    /// Let the hint search propose moves onto empty piles (e.g. a King onto an
    /// empty tableau). Off by default, which never suggests such moves.
    pub hint_empty_destinations: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            card_width: CARD_WIDTH,
            pile_spacing: PILE_SPACING,
            tableau_origin: Position::new(200, CARD_HEIGHT + 100),
            stock_origin: Position::new(200, PILE_SPACING),
            foundation_origin: Position::new(650, PILE_SPACING),
            cascade_step: CASCADE_STEP,
            hint_empty_destinations: false,
        }
    }
}

impl Config {
    /// Horizontal distance between neighbouring piles in a row.
    pub fn column_step(&self) -> i32 {
        self.card_width + self.pile_spacing
    }

    pub fn anchor(&self, pile: PileId) -> Position {
        let step = self.column_step();
        match pile {
            PileId::Tableau(i) => self.tableau_origin.offset(step * i as i32, 0),
            PileId::Stock => self.stock_origin,
            PileId::Discard => self.stock_origin.offset(step, 0),
            PileId::Foundation(i) => self.foundation_origin.offset(step * i as i32, 0),
        }
    }
}
