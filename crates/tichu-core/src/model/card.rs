use crate::model::rank::Rank;
use crate::model::suit::Suit;
use core::fmt;

/// A single card. Suit is present exactly for the 52 standard cards; the
/// four specials carry none. Ordering is rank-major, which is the order the
/// play rules care about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Card {
    rank: Rank,
    suit: Option<Suit>,
}

impl Card {
    pub const DOG: Card = Card {
        rank: Rank::Dog,
        suit: None,
    };
    pub const MAHJONG: Card = Card {
        rank: Rank::Mahjong,
        suit: None,
    };
    pub const PHOENIX: Card = Card {
        rank: Rank::Phoenix,
        suit: None,
    };
    pub const DRAGON: Card = Card {
        rank: Rank::Dragon,
        suit: None,
    };

    /// Builds a suited card. Panics on a special rank, which never carries
    /// a suit.
    pub const fn suited(rank: Rank, suit: Suit) -> Self {
        assert!(rank.is_standard());
        Self {
            rank,
            suit: Some(suit),
        }
    }

    pub const fn rank(self) -> Rank {
        self.rank
    }

    pub const fn suit(self) -> Option<Suit> {
        self.suit
    }

    pub const fn is_special(self) -> bool {
        self.suit.is_none()
    }

    /// Signed card points: fives 5, tens and kings 10, Phoenix -25,
    /// Dragon +25. The full deck totals exactly 100.
    pub const fn point_value(self) -> i32 {
        match self.rank {
            Rank::Five => 5,
            Rank::Ten | Rank::King => 10,
            Rank::Phoenix => -25,
            Rank::Dragon => 25,
            _ => 0,
        }
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.suit {
            Some(suit) => write!(f, "{}{}", self.rank, suit),
            None => write!(f, "{}", self.rank),
        }
    }
}
