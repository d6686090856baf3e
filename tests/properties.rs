use klondike_engine::{CardId, Config, Engine, Hint, PileId, PileKind, StockClick};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Gesture {
    Draw,
    Undo,
    Drag { pile: usize, card: usize, dest: usize },
    Hint,
}

fn gesture() -> impl Strategy<Value = Gesture> {
    prop_oneof![
        Just(Gesture::Draw),
        Just(Gesture::Undo),
        (0..13usize, 0..20usize, 0..13usize)
            .prop_map(|(pile, card, dest)| Gesture::Drag { pile, card, dest }),
        Just(Gesture::Hint),
    ]
}

fn drag(engine: &mut Engine, pile: usize, card: usize, dest: usize) -> Option<bool> {
    let cards = engine.piles()[pile].cards();
    if cards.is_empty() {
        return None;
    }
    let id = cards[card % cards.len()].id();
    let run = engine.begin_drag(id).ok()?;
    Some(engine.commit_move(run, PileId::ALL[dest]).accepted)
}

fn apply(engine: &mut Engine, gesture: &Gesture) {
    match *gesture {
        Gesture::Draw => {
            engine.stock_click();
        }
        Gesture::Undo => {
            engine.undo_last_move();
        }
        Gesture::Drag { pile, card, dest } => {
            drag(engine, pile, card, dest);
        }
        Gesture::Hint => {
            if let Hint::Move { card, destination } = engine.show_hint()
                && let Ok(run) = engine.begin_drag(card)
            {
                engine.commit_move(run, destination);
            }
            engine.clear_highlights();
        }
    }
}

fn stock_ids(engine: &Engine) -> Vec<CardId> {
    engine
        .pile(PileId::Stock)
        .map(|pile| pile.cards())
        .unwrap_or_default()
        .iter()
        .map(|c| c.id())
        .collect()
}

proptest! {
    #[test]
    fn invariants_hold_for_any_gestures(
        seed in any::<u64>(),
        gestures in prop::collection::vec(gesture(), 0..150),
    ) {
        let mut engine = Engine::from_seed(Config::default(), seed);
        prop_assert!(engine.is_valid());
        for gesture in &gestures {
            apply(&mut engine, gesture);
            prop_assert!(engine.is_valid(), "after {:?}:\n{}", gesture, engine.pretty_print());
            for pile in engine.piles().iter().filter(|p| p.kind() == PileKind::Foundation) {
                prop_assert!(pile.len() <= 13);
            }
        }
    }

    #[test]
    fn undo_is_left_inverse_of_commit(
        seed in any::<u64>(),
        prefix in prop::collection::vec(gesture(), 0..80),
        pile in 0..13usize,
        card in 0..20usize,
        dest in 0..13usize,
    ) {
        let mut engine = Engine::from_seed(Config::default(), seed);
        for gesture in &prefix {
            apply(&mut engine, gesture);
        }
        let before = engine.piles().to_vec();
        let moves = engine.move_count();

        match drag(&mut engine, pile, card, dest) {
            Some(true) => {
                prop_assert_eq!(engine.move_count(), moves + 1);
                prop_assert!(engine.undo_last_move());
            }
            _ => prop_assert_eq!(engine.move_count(), moves),
        }
        prop_assert_eq!(engine.piles(), &before[..]);
    }

    #[test]
    fn undo_reverts_stock_click(
        seed in any::<u64>(),
        prefix in prop::collection::vec(gesture(), 0..80),
    ) {
        let mut engine = Engine::from_seed(Config::default(), seed);
        for gesture in &prefix {
            apply(&mut engine, gesture);
        }
        let before = engine.piles().to_vec();
        if engine.stock_click() != StockClick::Empty {
            prop_assert!(engine.undo_last_move());
        }
        prop_assert_eq!(engine.piles(), &before[..]);
    }

    #[test]
    fn undoing_everything_returns_to_the_deal(
        seed in any::<u64>(),
        gestures in prop::collection::vec(gesture(), 0..150),
    ) {
        let mut engine = Engine::from_seed(Config::default(), seed);
        let dealt = engine.piles().to_vec();
        for gesture in &gestures {
            apply(&mut engine, gesture);
        }
        while engine.undo_last_move() {}
        prop_assert_eq!(engine.move_count(), 0);
        prop_assert_eq!(engine.piles(), &dealt[..]);
    }

    #[test]
    fn stock_round_trip_preserves_order(seed in any::<u64>()) {
        let mut engine = Engine::from_seed(Config::default(), seed);
        let original = stock_ids(&engine);
        for _ in 0..original.len() {
            prop_assert!(matches!(engine.stock_click(), StockClick::Drew(_)));
        }
        prop_assert_eq!(engine.stock_click(), StockClick::Recycled(original.len()));
        prop_assert_eq!(stock_ids(&engine), original);
        prop_assert!(engine.pile(PileId::Stock).unwrap().cards().iter().all(|c| !c.face_up));
        prop_assert!(engine.pile(PileId::Discard).unwrap().is_empty());
    }
}

#[test]
fn win_is_detected_only_with_full_foundations() {
    let mut engine = Engine::from_seed(Config::default(), 5);
    assert!(!engine.check_win());

    let suits = ['♥', '♦', '♣', '♠'];
    let mut layout = String::new();
    for (i, suit) in suits.iter().enumerate() {
        layout.push_str(&format!("Foundation{}: ", i + 1));
        for rank in "A23456789TJQK".chars() {
            layout.push(rank);
            layout.push(*suit);
        }
        layout.push('\n');
    }
    engine = Engine::parse(&layout, Config::default()).unwrap();
    assert!(engine.is_valid());
    assert!(engine.check_win());

    let run = engine.begin_drag("K♣".parse().unwrap()).unwrap();
    assert!(engine.commit_move(run, PileId::Tableau(3)).accepted);
    assert!(!engine.check_win());
    assert!(engine.undo_last_move());
    assert!(engine.check_win());
}
