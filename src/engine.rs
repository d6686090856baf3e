//! The game orchestrator: owns every pile, validates gestures, and keeps the
//! undo history.

use crate::card::{Card, CardId, MAX_CARD, MAX_RANK, Position};
use crate::config::Config;
use crate::error::{EngineError, EngineResult, InvalidDragKind};
use crate::history::HistoryManager;
use crate::move_::Move;
use crate::pile::{Pile, PileId, PileKind, Run, TOTAL_PILES, TOTAL_TABLEAUS};

use rand::{SeedableRng, rngs::StdRng, seq::SliceRandom};
use rustc_hash::FxHashSet;
use smallvec::SmallVec;
use tracing::{debug, info};

pub const DRAW_FROM_STOCK_HINT: &str = "No other moves available. Try clicking the stock stack.";

/// Cards picked up from a pile. While a run exists its cards belong to no
/// pile, so it must be handed back through [`Engine::commit_move`] or
/// [`Engine::cancel_drag`]. Dropping it loses the cards.
#[must_use = "a dragged run must be committed or cancelled"]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DraggedRun {
    source: PileId,
    cards: Run,
    original_positions: SmallVec<[Position; 13]>,
}

impl DraggedRun {
    pub fn source(&self) -> PileId {
        self.source
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// Moves the whole run on screen. Faces stay under the engine's control.
    pub fn translate(&mut self, dx: i32, dy: i32) {
        for card in self.cards.iter_mut() {
            card.position = card.position.offset(dx, dy);
        }
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// The bottom card of the run, the only one checked against a destination.
    pub fn first(&self) -> Option<&Card> {
        self.cards.first()
    }

    fn restored_cards(&self) -> impl Iterator<Item = Card> + '_ {
        self.cards
            .iter()
            .zip(self.original_positions.iter())
            .map(|(&card, &position)| {
                let mut card = card;
                card.position = position;
                card
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveOutcome {
    pub accepted: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockClick {
    Drew(CardId),
    Recycled(usize),
    Empty,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hint {
    Move { card: CardId, destination: PileId },
    DrawFromStock,
}

impl Hint {
    pub fn text(&self) -> Option<&'static str> {
        match self {
            Hint::Move { .. } => None,
            Hint::DrawFromStock => Some(DRAW_FROM_STOCK_HINT),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Engine {
    config: Config,
    piles: [Pile; TOTAL_PILES],
    history: HistoryManager,
    rng: StdRng,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl Engine {
    /// A freshly shuffled and dealt game.
    pub fn new(config: Config) -> Self {
        let mut engine = Self::empty(config, StdRng::from_os_rng());
        engine.reset_all();
        engine
    }

    /// A deterministic game: the same seed always produces the same deal.
    pub fn from_seed(config: Config, seed: u64) -> Self {
        let mut engine = Self::empty(config, StdRng::seed_from_u64(seed));
        engine.reset_all();
        engine
    }

    /// An engine with all 13 piles empty, used to build arbitrary layouts.
    pub(crate) fn empty(config: Config, rng: StdRng) -> Self {
        let piles = std::array::from_fn(|i| {
            let id = PileId::ALL[i];
            Pile::new(id, config.anchor(id), config.cascade_step)
        });
        Self {
            config,
            piles,
            history: HistoryManager::new(),
            rng,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn piles(&self) -> &[Pile] {
        &self.piles
    }

    /// The pile named by `id`, or `None` for an out-of-range tableau or
    /// foundation index.
    pub fn pile(&self, id: PileId) -> Option<&Pile> {
        id.is_valid().then(|| self.pile_at(id))
    }

    fn pile_at(&self, id: PileId) -> &Pile {
        &self.piles[id.index()]
    }

    pub(crate) fn pile_mut(&mut self, id: PileId) -> &mut Pile {
        &mut self.piles[id.index()]
    }

    pub fn history(&self) -> &HistoryManager {
        &self.history
    }

    pub fn move_count(&self) -> usize {
        self.history.len()
    }

    pub fn can_undo(&self) -> bool {
        !self.history.is_empty()
    }

    /// Finds the pile and index holding `id`.
    pub fn locate(&self, id: CardId) -> Option<(PileId, usize)> {
        self.piles
            .iter()
            .find_map(|pile| pile.position_of(id).map(|index| (pile.id(), index)))
    }

    pub fn card(&self, id: CardId) -> Option<&Card> {
        let (pile, index) = self.locate(id)?;
        self.pile_at(pile).cards().get(index)
    }

    /// Deals `shuffled` after checking it is exactly the 52 distinct cards.
    pub fn deal_new_game(&mut self, shuffled: &[CardId]) -> EngineResult<()> {
        validate_deck(shuffled)?;
        self.deal(shuffled);
        self.history.clear_history();
        Ok(())
    }

    /// Reshuffles a fresh deck, deals it and forgets the history.
    pub fn reset_all(&mut self) {
        let mut deck = CardId::deck();
        deck.shuffle(&mut self.rng);
        self.deal(&deck);
        self.history.clear_history();
        info!("New game dealt");
    }

    fn deal(&mut self, shuffled: &[CardId]) {
        for pile in self.piles.iter_mut() {
            pile.clear();
        }

        let mut cards = shuffled.iter().copied();
        for i in 0..TOTAL_TABLEAUS {
            let tableau = &mut self.piles[PileId::Tableau(i).index()];
            for j in 0..=i {
                let Some(id) = cards.next() else {
                    return;
                };
                let mut card = Card::new(id);
                card.face_up = j == i;
                tableau.append(card);
            }
        }

        let stock = self.pile_mut(PileId::Stock);
        for id in cards {
            stock.append(Card::new(id));
        }
        debug!("Dealt {} cards to the stock", self.pile_at(PileId::Stock).len());
    }

    /// The card and everything stacked on it, without detaching anything.
    pub fn movable_run(&self, id: CardId) -> EngineResult<&[Card]> {
        let (source, index) = self.check_drag(id)?;
        Ok(&self.pile_at(source).cards()[index..])
    }

    fn check_drag(&self, id: CardId) -> EngineResult<(PileId, usize)> {
        let invalid = |kind| EngineError::InvalidDrag { card: id, kind };
        let (source, index) = self
            .locate(id)
            .ok_or_else(|| invalid(InvalidDragKind::Unowned))?;
        let pile = self.pile_at(source);
        let card = &pile.cards()[index];
        if !card.is_playable() {
            return Err(invalid(InvalidDragKind::FaceDown));
        }
        if card.pile() != Some(source) {
            return Err(invalid(InvalidDragKind::Unowned));
        }
        if pile.kind() != PileKind::Tableau && index + 1 != pile.len() {
            return Err(invalid(InvalidDragKind::Buried));
        }
        Ok((source, index))
    }

    /// Picks up `id` and every card on top of it.
    pub fn begin_drag(&mut self, id: CardId) -> EngineResult<DraggedRun> {
        let (source, index) = self.check_drag(id)?;
        let cards = self.pile_mut(source).split_off(index);
        debug!("Dragging {} card(s) from {source}", cards.len());
        Ok(DraggedRun {
            source,
            original_positions: cards.iter().map(|card| card.position).collect(),
            cards,
        })
    }

    /// Puts a dragged run back where it came from, untouched.
    pub fn cancel_drag(&mut self, run: DraggedRun) {
        let source = run.source;
        for card in run.restored_cards() {
            let pile = self.pile_mut(source);
            pile.append(card);
            if let Some(top) = pile.peek_top_mut() {
                top.position = card.position;
            }
        }
    }

    /// Drops `run` on `destination`.
    ///
    /// Only the bottom card of the run is checked. A rejected run snaps back to
    /// its source and nothing is recorded.
    pub fn commit_move(&mut self, run: DraggedRun, destination: PileId) -> MoveOutcome {
        let Some(first) = run.first().map(Card::id) else {
            return MoveOutcome { accepted: false };
        };
        let source = run.source;
        let legal = destination.is_valid()
            && destination != source
            && self.pile_at(destination).can_accept(first)
            && (destination.kind() != PileKind::Foundation || run.len() == 1);
        if !legal {
            debug!("Rejected {first} onto {destination}, returning to {source}");
            self.cancel_drag(run);
            return MoveOutcome { accepted: false };
        }

        let moved: Run = run.restored_cards().collect();
        let mov = Move::new(
            &moved,
            source,
            self.pile_at(source).cards(),
            destination,
            self.pile_at(destination).cards(),
        );

        for card in run.cards {
            self.pile_mut(destination).append(card);
        }
        if let Some(top) = self.pile_mut(source).peek_top_mut() {
            top.face_up = true;
        }
        debug!("{mov}");
        self.history.record_move(mov);
        MoveOutcome { accepted: true }
    }

    /// Draws the top stock card, or turns the discard pile back into the stock.
    pub fn stock_click(&mut self) -> StockClick {
        let stock = self.pile_at(PileId::Stock);
        let discard = self.pile_at(PileId::Discard);

        if let Some(&top) = stock.peek_top() {
            let remaining = &stock.cards()[..stock.len() - 1];
            let mov = Move::new(
                &[top],
                PileId::Stock,
                remaining,
                PileId::Discard,
                discard.cards(),
            );
            self.history.record_move(mov);

            if let Some(mut card) = self.pile_mut(PileId::Stock).pop() {
                card.face_up = true;
                self.pile_mut(PileId::Discard).append(card);
            }
            debug!("Drew {} from the stock", top.id());
            return StockClick::Drew(top.id());
        }

        if discard.is_empty() {
            debug!("Stock and discard are both empty");
            return StockClick::Empty;
        }

        let mov = Move::new(
            discard.cards(),
            PileId::Discard,
            &[],
            PileId::Stock,
            stock.cards(),
        );
        self.history.record_move(mov);

        let mut count = 0;
        while let Some(mut card) = self.pile_mut(PileId::Discard).pop() {
            card.face_up = false;
            self.pile_mut(PileId::Stock).append(card);
            count += 1;
        }
        debug!("Recycled {count} cards from the discard pile");
        StockClick::Recycled(count)
    }

    /// Reverts the most recent move. Returns `false` when there is nothing to undo.
    pub fn undo_last_move(&mut self) -> bool {
        let Some(mov) = self.history.undo_move() else {
            debug!("No moves to undo");
            return false;
        };
        debug!("Undoing {mov}");

        let source = mov.source();
        let destination = mov.destination();
        let removed = self.pile_mut(destination).remove_run(mov.cards());
        let pile = self.pile_mut(source);
        // remove_run keeps the recorded order, so `removed` lines up with the snapshot
        for ((card, &position), &face_up) in removed
            .into_iter()
            .zip(mov.original_positions())
            .zip(mov.face_up_states())
        {
            pile.append(card);
            if let Some(top) = pile.peek_top_mut() {
                top.position = position;
                top.face_up = face_up;
            }
        }

        let moved_count = mov.cards().len();
        let len = pile.len();
        if let Some(face_up) = mov.last_remaining_face_up()
            && len > moved_count
        {
            pile.cards_mut()[len - moved_count - 1].face_up = face_up;
        }
        restore_faces(pile, mov.source_face_up());
        restore_faces(self.pile_mut(destination), mov.destination_face_up());

        self.enforce_face_invariants();
        true
    }

    /// Stock cards are face down; discard and foundation cards are face up.
    fn enforce_face_invariants(&mut self) {
        for pile in self.piles.iter_mut() {
            let face_up = match pile.kind() {
                PileKind::Stock => false,
                PileKind::Discard | PileKind::Foundation => true,
                PileKind::Tableau => continue,
            };
            for card in pile.cards_mut() {
                card.face_up = face_up;
            }
        }
    }

    pub fn clear_highlights(&mut self) {
        for pile in self.piles.iter_mut() {
            pile.highlight = false;
            for card in pile.cards_mut() {
                card.highlight = false;
            }
        }
    }

    /// Highlights the first single-card move found in fixed pile order, or the
    /// stock when there is none. Not a search for the best move.
    pub fn show_hint(&mut self) -> Hint {
        self.clear_highlights();

        let Some((source, index, destination)) = self.find_hint() else {
            let stock = self.pile_mut(PileId::Stock);
            stock.highlight = true;
            if let Some(top) = stock.peek_top_mut() {
                top.highlight = true;
            }
            debug!("No moves found, suggesting the stock");
            return Hint::DrawFromStock;
        };

        let card = &mut self.pile_mut(source).cards_mut()[index];
        card.highlight = true;
        let card = card.id();
        let dest = self.pile_mut(destination);
        match dest.peek_top_mut() {
            Some(top) => top.highlight = true,
            None => dest.highlight = true,
        }
        debug!("Hint found: {card} can be moved to {destination}");
        Hint::Move { card, destination }
    }

    fn find_hint(&self) -> Option<(PileId, usize, PileId)> {
        for pile in self.piles.iter() {
            if pile.kind() == PileKind::Foundation {
                continue;
            }
            for (index, card) in pile.cards().iter().enumerate() {
                if !card.face_up {
                    continue;
                }
                for target in self.piles.iter() {
                    if target.id() == pile.id()
                        || (target.is_empty() && !self.config.hint_empty_destinations)
                    {
                        continue;
                    }
                    if target.can_accept(card.id()) {
                        return Some((pile.id(), index, target.id()));
                    }
                }
            }
        }
        None
    }

    /// True once every foundation holds a full suit.
    pub fn check_win(&self) -> bool {
        self.piles
            .iter()
            .filter(|pile| pile.kind() == PileKind::Foundation)
            .all(|pile| pile.len() == MAX_RANK as usize)
    }

    /// Checks conservation of the 52 cards and every per-pile invariant.
    pub fn is_valid(&self) -> bool {
        let mut seen = FxHashSet::default();
        for pile in self.piles.iter() {
            for card in pile.cards() {
                if !seen.insert(card.id()) || card.pile() != Some(pile.id()) {
                    return false;
                }
            }
            let cards = pile.cards();
            let ok = match pile.kind() {
                PileKind::Stock => cards.iter().all(|c| !c.face_up),
                PileKind::Discard => cards.iter().all(|c| c.face_up),
                PileKind::Foundation => {
                    cards.iter().all(|c| c.face_up)
                        && cards.first().is_none_or(|c| c.id().is_ace())
                        && cards.windows(2).all(|w| {
                            w[1].suit() == w[0].suit() && w[0].rank().next() == Some(w[1].rank())
                        })
                }
                PileKind::Tableau => cards
                    .iter()
                    .skip_while(|c| !c.face_up)
                    .collect::<Vec<_>>()
                    .windows(2)
                    .all(|w| {
                        w[1].face_up
                            && w[1].color() != w[0].color()
                            && w[0].rank().prev() == Some(w[1].rank())
                    }),
            };
            if !ok {
                return false;
            }
        }
        seen.len() == MAX_CARD as usize
    }
}

fn restore_faces(pile: &mut Pile, snapshot: &[bool]) {
    if pile.len() != snapshot.len() {
        return;
    }
    for (card, &face_up) in pile.cards_mut().iter_mut().zip(snapshot) {
        card.face_up = face_up;
    }
}

fn validate_deck(cards: &[CardId]) -> EngineResult<()> {
    if cards.len() != MAX_CARD as usize {
        return Err(EngineError::InvalidDeck(format!(
            "expected {MAX_CARD} cards, got {}",
            cards.len()
        )));
    }
    let mut seen = FxHashSet::default();
    for &card in cards {
        if !seen.insert(card) {
            return Err(EngineError::InvalidDeck(format!("duplicate card {card}")));
        }
    }
    Ok(())
}
