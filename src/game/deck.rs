use rand::rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::game::cards::{create_initial_deck, Card};

/// Draw pile plus discard pile. The top of the draw pile is the end of
/// the vector; the top of the discard pile is the most recent discard.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Deck {
    draw_pile: Vec<Card>,
    discard_pile: Vec<Card>,
}

impl Deck {
    /// An empty deck. The real card set is only built once all players
    /// have locked in their characters, via `initialize`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Populates the draw pile from the fixed card catalog and shuffles it.
    pub fn initialize(&mut self) {
        self.draw_pile = create_initial_deck();
        self.discard_pile.clear();
        self.shuffle();
    }

    pub fn shuffle(&mut self) {
        let mut random_generator = rng();
        self.draw_pile.shuffle(&mut random_generator);
    }

    /// Draws one card, reshuffling the discard pile into the draw pile
    /// when the draw pile runs dry. Returns `None` only when both piles
    /// are empty; drawing fewer cards than asked for is not an error.
    pub fn draw_card(&mut self) -> Option<Card> {
        if self.draw_pile.is_empty() {
            self.reshuffle_discard();
        }
        self.draw_pile.pop()
    }

    pub fn draw_cards(&mut self, count: usize) -> Vec<Card> {
        let mut drawn = Vec::new();
        for _ in 0..count {
            if let Some(card) = self.draw_card() {
                drawn.push(card);
            } else {
                break;
            }
        }
        drawn
    }

    pub fn discard_card(&mut self, card: Card) {
        self.discard_pile.push(card);
    }

    // Reshuffle excludes nothing: every discarded card returns to play.
    fn reshuffle_discard(&mut self) {
        if !self.discard_pile.is_empty() {
            self.draw_pile.append(&mut self.discard_pile);
            self.shuffle();
        }
    }

    pub fn top_discard(&self) -> Option<&Card> {
        self.discard_pile.last()
    }

    pub fn cards_remaining(&self) -> usize {
        self.draw_pile.len()
    }

    pub fn discard_pile_size(&self) -> usize {
        self.discard_pile.len()
    }

    pub fn total_size(&self) -> usize {
        self.draw_pile.len() + self.discard_pile.len()
    }
}
