//! Text layout of a game, in the form
//!
//! ```text
//! Stock: 3♣2♥A♠
//! Discard: 7♦Q♥
//! Foundation1: A♠2♠
//! Tableau1: 5♦9♣|8♥7♠
//! ```
//!
//! Cards are listed bottom to top. In a tableau, cards before `|` are face down.
//! Empty piles are omitted.

use crate::card::{Card, CardId};
use crate::config::Config;
use crate::engine::Engine;
use crate::pile::{PileId, TOTAL_FOUNDATIONS, TOTAL_TABLEAUS};

use anyhow::{Context, Result, bail};
use rand::{SeedableRng, rngs::StdRng};

impl Engine {
    /// Builds a game from its text layout. The 52-card invariant is not
    /// enforced here so partial layouts can be described; see [`Engine::is_valid`].
    pub fn parse(content: &str, config: Config) -> Result<Self> {
        let mut engine = Engine::empty(config, StdRng::from_os_rng());

        for line in content
            .split('\n')
            .map(|v| v.trim())
            .filter(|l| !l.is_empty())
        {
            let line_context = || format!("Failed to parse at '{line}'");
            if let Some(rest) = line.strip_prefix("Stock:") {
                let cards = parse_cards(rest.trim()).with_context(line_context)?;
                engine.place(PileId::Stock, cards, false).with_context(line_context)?;
            } else if let Some(rest) = line.strip_prefix("Discard:") {
                let cards = parse_cards(rest.trim()).with_context(line_context)?;
                engine.place(PileId::Discard, cards, true).with_context(line_context)?;
            } else if let Some(rest) = line.strip_prefix("Foundation") {
                let (idx, cards_str) = parse_index(rest, TOTAL_FOUNDATIONS)
                    .context("Invalid foundation index")
                    .with_context(line_context)?;
                let cards = parse_cards(cards_str).with_context(line_context)?;
                engine
                    .place(PileId::Foundation(idx), cards, true)
                    .with_context(line_context)?;
            } else if let Some(rest) = line.strip_prefix("Tableau") {
                let (idx, cards_str) = parse_index(rest, TOTAL_TABLEAUS)
                    .context("Invalid tableau index")
                    .with_context(line_context)?;
                let (before, after) = match cards_str.find('|') {
                    Some(split_idx) => {
                        let (b, a) = cards_str.split_at(split_idx);
                        (b, &a[1..])
                    }
                    None => (cards_str, ""),
                };
                let face_down = parse_cards(before.trim()).with_context(line_context)?;
                let face_up = parse_cards(after.trim()).with_context(line_context)?;
                let pile = PileId::Tableau(idx);
                engine.place(pile, face_down, false).with_context(line_context)?;
                engine.place(pile, face_up, true).with_context(line_context)?;
            } else {
                bail!("Unknown line '{line}'");
            }
        }

        Ok(engine)
    }

    fn place(&mut self, pile: PileId, cards: Vec<CardId>, face_up: bool) -> Result<()> {
        for id in cards {
            if let Some((other, _)) = self.locate(id) {
                bail!("Card {id} already placed in {other}");
            }
            let mut card = Card::new(id);
            card.face_up = face_up;
            self.pile_mut(pile).append(card);
        }
        Ok(())
    }

    pub fn pretty_print(&self) -> String {
        let mut lines = Vec::new();
        for pile in self.piles() {
            if pile.is_empty() {
                continue;
            }
            let mut line = format!("{}: ", pile.id());
            if let PileId::Tableau(_) = pile.id() {
                let face_down = pile.cards().iter().take_while(|c| !c.face_up).count();
                for (j, card) in pile.cards().iter().enumerate() {
                    if j == face_down {
                        line.push('|');
                    }
                    line.push_str(&card.to_string());
                }
                if face_down == pile.len() {
                    line.push('|');
                }
            } else {
                for card in pile.cards() {
                    line.push_str(&card.to_string());
                }
            }
            lines.push(line);
        }
        lines.join("\n")
    }
}

fn parse_index(rest: &str, count: usize) -> Result<(usize, &str)> {
    let mut parts = rest.splitn(2, ':');
    let idx = parts
        .next()
        .unwrap_or("")
        .trim()
        .parse::<usize>()?;
    if idx == 0 || idx > count {
        bail!("Index {idx} out of range 1..={count}");
    }
    Ok((idx - 1, parts.next().unwrap_or("").trim()))
}

fn parse_cards(s: &str) -> Result<Vec<CardId>> {
    let mut cards = Vec::new();
    let mut chars = s.chars().peekable();
    while let Some(&c1) = chars.peek() {
        if c1.is_whitespace() || c1 == '|' {
            chars.next();
            continue;
        }
        let rank = c1;
        chars.next();
        let suit = match chars.next() {
            Some(s) => s,
            None => bail!("Incomplete card '{rank}'"),
        };
        cards.push(CardId::parse(rank, suit)?);
    }
    Ok(cards)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_board() {
        const BOARD_STR: &str = r#"Tableau1: |5♣
Tableau2: J♥|6♠
Tableau3: T♠5♥|Q♠J♦
Tableau5: 7♣|
Stock: 5♦2♥8♦
Discard: 7♦Q♥
Foundation1: A♣2♣
Foundation3: A♠"#;

        let engine = Engine::parse(BOARD_STR, Config::default()).unwrap();
        assert_eq!(BOARD_STR, engine.pretty_print());
        assert!(!engine.is_valid());

        let tableau = engine.pile(PileId::Tableau(2)).unwrap();
        assert_eq!(tableau.len(), 4);
        assert!(!tableau.cards()[1].face_up);
        assert!(tableau.cards()[2].face_up);
        assert!(engine.pile(PileId::Stock).unwrap().cards().iter().all(|c| !c.face_up));
        assert!(engine.pile(PileId::Discard).unwrap().cards().iter().all(|c| c.face_up));
        assert_eq!(engine.move_count(), 0);
    }

    #[test]
    fn test_parse_errors() {
        assert!(Engine::parse("Tableau8: K♠", Config::default()).is_err());
        assert!(Engine::parse("Foundation0: A♠", Config::default()).is_err());
        assert!(Engine::parse("Stock: A♠A♠", Config::default()).is_err());
        assert!(Engine::parse("Stock: A", Config::default()).is_err());
        assert!(Engine::parse("Waste: A♠", Config::default()).is_err());
    }

    #[test]
    fn test_dealt_game_round_trips() {
        let engine = Engine::from_seed(Config::default(), 670334786);
        let reparsed = Engine::parse(&engine.pretty_print(), Config::default()).unwrap();
        assert!(reparsed.is_valid());
        assert_eq!(reparsed.piles(), engine.piles());
    }
}
