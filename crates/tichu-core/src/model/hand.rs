use crate::model::card::Card;
use std::vec::Vec;

#[derive(Debug, Clone, Default)]
pub struct Hand {
    cards: Vec<Card>,
}

impl Hand {
    pub fn new() -> Self {
        Self { cards: Vec::new() }
    }

    pub fn with_cards(cards: Vec<Card>) -> Self {
        let mut hand = Self { cards };
        hand.sort();
        hand
    }

    pub fn add(&mut self, card: Card) {
        self.cards.push(card);
        self.sort();
    }

    pub fn remove(&mut self, card: Card) -> bool {
        if let Some(index) = self.cards.iter().position(|&c| c == card) {
            self.cards.remove(index);
            true
        } else {
            false
        }
    }

    /// Removes a whole selection or nothing. Fails without mutating when the
    /// selection names a card twice or a card the hand does not hold; play
    /// submission relies on that so a rejection never costs cards.
    pub fn remove_all(&mut self, selection: &[Card]) -> bool {
        let mut wanted: Vec<Card> = selection.to_vec();
        wanted.sort_unstable();
        if wanted.windows(2).any(|pair| pair[0] == pair[1]) {
            return false;
        }
        if !wanted.iter().all(|&card| self.contains(card)) {
            return false;
        }
        for card in wanted {
            self.remove(card);
        }
        true
    }

    pub fn contains(&self, card: Card) -> bool {
        self.cards.contains(&card)
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Card> {
        self.cards.iter()
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    fn sort(&mut self) {
        self.cards.sort_unstable();
    }
}
