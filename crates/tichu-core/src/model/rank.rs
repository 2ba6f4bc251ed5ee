use core::fmt;

/// Rank order of the 56-card deck. The Phoenix counts as rank 1.5, so it
/// sits between the Mahjong and the Two; declaration order encodes that
/// without fractional values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd)]
#[repr(u8)]
pub enum Rank {
    Dog,
    Mahjong,
    Phoenix,
    Two,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Nine,
    Ten,
    Jack,
    Queen,
    King,
    Ace,
    Dragon,
}

impl Rank {
    pub const ORDERED: [Rank; 17] = [
        Rank::Dog,
        Rank::Mahjong,
        Rank::Phoenix,
        Rank::Two,
        Rank::Three,
        Rank::Four,
        Rank::Five,
        Rank::Six,
        Rank::Seven,
        Rank::Eight,
        Rank::Nine,
        Rank::Ten,
        Rank::Jack,
        Rank::Queen,
        Rank::King,
        Rank::Ace,
        Rank::Dragon,
    ];

    /// The thirteen suited ranks, ascending.
    pub const STANDARD: [Rank; 13] = [
        Rank::Two,
        Rank::Three,
        Rank::Four,
        Rank::Five,
        Rank::Six,
        Rank::Seven,
        Rank::Eight,
        Rank::Nine,
        Rank::Ten,
        Rank::Jack,
        Rank::Queen,
        Rank::King,
        Rank::Ace,
    ];

    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Rank::Dog),
            1 => Some(Rank::Mahjong),
            2 => Some(Rank::Phoenix),
            3 => Some(Rank::Two),
            4 => Some(Rank::Three),
            5 => Some(Rank::Four),
            6 => Some(Rank::Five),
            7 => Some(Rank::Six),
            8 => Some(Rank::Seven),
            9 => Some(Rank::Eight),
            10 => Some(Rank::Nine),
            11 => Some(Rank::Ten),
            12 => Some(Rank::Jack),
            13 => Some(Rank::Queen),
            14 => Some(Rank::King),
            15 => Some(Rank::Ace),
            16 => Some(Rank::Dragon),
            _ => None,
        }
    }

    pub const fn index(self) -> usize {
        self as usize
    }

    /// Whether cards of this rank carry a suit.
    pub const fn is_standard(self) -> bool {
        !matches!(
            self,
            Rank::Dog | Rank::Mahjong | Rank::Phoenix | Rank::Dragon
        )
    }

    /// The rank exactly one above this one. The Phoenix has no successor and
    /// is nobody's successor, so no run can ever contain it.
    pub const fn successor(self) -> Option<Self> {
        match self {
            Rank::Dog => Some(Rank::Mahjong),
            Rank::Mahjong => Some(Rank::Two),
            Rank::Phoenix => None,
            Rank::Two => Some(Rank::Three),
            Rank::Three => Some(Rank::Four),
            Rank::Four => Some(Rank::Five),
            Rank::Five => Some(Rank::Six),
            Rank::Six => Some(Rank::Seven),
            Rank::Seven => Some(Rank::Eight),
            Rank::Eight => Some(Rank::Nine),
            Rank::Nine => Some(Rank::Ten),
            Rank::Ten => Some(Rank::Jack),
            Rank::Jack => Some(Rank::Queen),
            Rank::Queen => Some(Rank::King),
            Rank::King => Some(Rank::Ace),
            Rank::Ace => Some(Rank::Dragon),
            Rank::Dragon => None,
        }
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Rank::Dog => "Dog",
            Rank::Mahjong => "Mahjong",
            Rank::Phoenix => "Phoenix",
            Rank::Two => "2",
            Rank::Three => "3",
            Rank::Four => "4",
            Rank::Five => "5",
            Rank::Six => "6",
            Rank::Seven => "7",
            Rank::Eight => "8",
            Rank::Nine => "9",
            Rank::Ten => "10",
            Rank::Jack => "J",
            Rank::Queen => "Q",
            Rank::King => "K",
            Rank::Ace => "A",
            Rank::Dragon => "Dragon",
        };
        f.write_str(text)
    }
}
