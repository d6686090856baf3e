use crate::move_::Move;

/// LIFO journal of committed moves. There is no redo: an undone move is dropped.
#[derive(Debug, Clone, Default)]
pub struct HistoryManager {
    history: Vec<Move>,
}

impl HistoryManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_move(&mut self, mov: Move) {
        self.history.push(mov);
    }

    pub fn undo_move(&mut self) -> Option<Move> {
        self.history.pop()
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    pub fn last(&self) -> Option<&Move> {
        self.history.last()
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::Card;
    use crate::pile::PileId;

    fn draw_move(s: &str) -> Move {
        let card = Card::new(s.parse().unwrap());
        Move::new(&[card], PileId::Stock, &[], PileId::Discard, &[])
    }

    #[test]
    fn test_lifo() {
        let mut history = HistoryManager::new();
        assert!(history.undo_move().is_none());

        history.record_move(draw_move("AS"));
        history.record_move(draw_move("2H"));
        assert_eq!(history.len(), 2);
        assert_eq!(history.last().map(|m| m.cards()[0].to_string()), Some("2♥".into()));

        let undone = history.undo_move().unwrap();
        assert_eq!(undone.cards()[0].to_string(), "2♥");
        assert_eq!(history.len(), 1);

        history.clear_history();
        assert!(history.is_empty());
        assert!(history.undo_move().is_none());
    }
}
