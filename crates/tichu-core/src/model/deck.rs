use crate::model::card::Card;
use crate::model::rank::Rank;
use crate::model::suit::Suit;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

/// The 56-card Tichu deck: thirteen suited ranks in four suits plus the
/// four specials.
#[derive(Debug, Clone)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    pub const SIZE: usize = 56;

    pub fn standard() -> Self {
        let mut cards = Vec::with_capacity(Self::SIZE);
        for suit in Suit::ALL.iter().copied() {
            for rank in Rank::STANDARD.iter().copied() {
                cards.push(Card::suited(rank, suit));
            }
        }
        cards.push(Card::DOG);
        cards.push(Card::MAHJONG);
        cards.push(Card::PHOENIX);
        cards.push(Card::DRAGON);
        Self { cards }
    }

    pub fn shuffled<R: rand::Rng + ?Sized>(rng: &mut R) -> Self {
        let mut deck = Self::standard();
        deck.shuffle_in_place(rng);
        deck
    }

    pub fn shuffled_with_seed(seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        Self::shuffled(&mut rng)
    }

    pub fn shuffle_in_place<R: rand::Rng + ?Sized>(&mut self, rng: &mut R) {
        self.cards.shuffle(rng);
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }
}

#[cfg(test)]
mod tests {
    use super::Deck;
    use crate::model::card::Card;

    #[test]
    fn standard_deck_has_56_unique_cards() {
        let deck = Deck::standard();
        assert_eq!(deck.cards().len(), Deck::SIZE);
        let mut sorted: Vec<_> = deck.cards().to_vec();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(sorted.len(), Deck::SIZE);
    }

    #[test]
    fn standard_deck_contains_all_four_specials() {
        let deck = Deck::standard();
        for special in [Card::DOG, Card::MAHJONG, Card::PHOENIX, Card::DRAGON] {
            assert!(deck.cards().contains(&special));
        }
    }

    #[test]
    fn deck_points_total_one_hundred() {
        let total: i32 = Deck::standard()
            .cards()
            .iter()
            .map(|card| card.point_value())
            .sum();
        assert_eq!(total, 100);
    }

    #[test]
    fn shuffle_with_seed_is_deterministic() {
        let deck_a = Deck::shuffled_with_seed(42);
        let deck_b = Deck::shuffled_with_seed(42);
        assert_eq!(deck_a.cards(), deck_b.cards());
    }

    #[test]
    fn shuffle_with_different_seeds_differs() {
        let deck_a = Deck::shuffled_with_seed(1);
        let deck_b = Deck::shuffled_with_seed(2);
        assert_ne!(deck_a.cards(), deck_b.cards());
    }
}
