use crate::model::card::Card;
use crate::model::rank::Rank;
use core::fmt;

/// The shape of a play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlayKind {
    Dog,
    Single,
    Pair,
    ThreeOfAKind,
    ConsecutivePairs,
    FullHouse,
    Straight,
    BombOfAKind,
    BombRun,
}

impl PlayKind {
    pub const fn is_bomb(self) -> bool {
        matches!(self, PlayKind::BombOfAKind | PlayKind::BombRun)
    }
}

impl fmt::Display for PlayKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            PlayKind::Dog => "dog",
            PlayKind::Single => "single",
            PlayKind::Pair => "pair",
            PlayKind::ThreeOfAKind => "three of a kind",
            PlayKind::ConsecutivePairs => "consecutive pairs",
            PlayKind::FullHouse => "full house",
            PlayKind::Straight => "straight",
            PlayKind::BombOfAKind => "bomb",
            PlayKind::BombRun => "straight bomb",
        };
        f.write_str(text)
    }
}

/// Why a selection does not form a valid instance of its nominal shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComboError {
    Empty,
    MixedRanks { kind: PlayKind },
    RunTooShort { len: usize },
    BrokenRun,
    NotConsecutivePairs,
    NotAFullHouse,
    MixedSuits,
}

impl fmt::Display for ComboError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComboError::Empty => write!(f, "empty selection"),
            ComboError::MixedRanks { kind } => {
                write!(f, "cards of a {kind} must all share one rank")
            }
            ComboError::RunTooShort { len } => {
                write!(f, "a straight needs at least five cards, got {len}")
            }
            ComboError::BrokenRun => write!(f, "straight ranks must step up by exactly one"),
            ComboError::NotConsecutivePairs => {
                write!(f, "consecutive pairs must be rank pairs stepping up by one")
            }
            ComboError::NotAFullHouse => {
                write!(f, "a full house is three of one rank and two of another")
            }
            ComboError::MixedSuits => write!(f, "a straight bomb must be a single suit"),
        }
    }
}

impl std::error::Error for ComboError {}

/// Signalled when a candidate cannot be compared against the leader at all:
/// different shape or different card count, with no bomb override in play.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KindMismatch {
    pub leader: PlayKind,
    pub leader_size: usize,
    pub candidate: PlayKind,
    pub candidate_size: usize,
}

impl fmt::Display for KindMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "a {} of {} cards cannot answer a {} of {} cards",
            self.candidate, self.candidate_size, self.leader, self.leader_size
        )
    }
}

impl std::error::Error for KindMismatch {}

/// A classified, structurally valid play. Cards are held rank-sorted;
/// the shape is fixed at construction and never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Combo {
    cards: Vec<Card>,
    kind: PlayKind,
}

impl Combo {
    pub fn new(cards: Vec<Card>) -> Result<Self, ComboError> {
        let mut cards = cards;
        cards.sort_unstable();
        let kind = classify_sorted(&cards).ok_or(ComboError::Empty)?;
        validate_sorted(kind, &cards)?;
        Ok(Self { cards, kind })
    }

    /// Determines the nominal shape from card count and surface features.
    /// Pure and order-independent; whether the cards actually form the shape
    /// is [`Combo::validate`]'s job.
    pub fn classify(cards: &[Card]) -> Option<PlayKind> {
        let mut sorted = cards.to_vec();
        sorted.sort_unstable();
        classify_sorted(&sorted)
    }

    /// Checks that `cards` form a valid instance of `kind`.
    pub fn validate(kind: PlayKind, cards: &[Card]) -> Result<(), ComboError> {
        let mut sorted = cards.to_vec();
        sorted.sort_unstable();
        validate_sorted(kind, &sorted)
    }

    pub fn kind(&self) -> PlayKind {
        self.kind
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn size(&self) -> usize {
        self.cards.len()
    }

    pub fn is_bomb(&self) -> bool {
        self.kind.is_bomb()
    }

    pub fn into_cards(self) -> Vec<Card> {
        self.cards
    }

    /// The rank that stands for the whole combination in comparisons: the
    /// triple of a full house, otherwise the highest card.
    pub fn lead_rank(&self) -> Rank {
        match self.kind {
            // the middle card of a sorted full house always sits in the triple
            PlayKind::FullHouse => self.cards[2].rank(),
            _ => self.cards[self.cards.len() - 1].rank(),
        }
    }

    /// Whether this play may supersede `leader` as the trick's best play.
    /// Bombs beat any non-bomb outright; everything else is comparable only
    /// at matching shape and size, by lead rank.
    pub fn beats(&self, leader: &Combo) -> Result<bool, KindMismatch> {
        if self.is_bomb() {
            if !leader.is_bomb() {
                return Ok(true);
            }
            return Ok(self.outranks_bomb(leader));
        }
        if leader.is_bomb() || self.kind != leader.kind || self.size() != leader.size() {
            return Err(KindMismatch {
                leader: leader.kind,
                leader_size: leader.size(),
                candidate: self.kind,
                candidate_size: self.size(),
            });
        }
        Ok(self.lead_rank() > leader.lead_rank())
    }

    fn outranks_bomb(&self, leader: &Combo) -> bool {
        match (self.kind, leader.kind) {
            (PlayKind::BombRun, PlayKind::BombOfAKind) => true,
            (PlayKind::BombOfAKind, PlayKind::BombRun) => false,
            _ if self.size() != leader.size() => self.size() > leader.size(),
            _ => self.lead_rank() > leader.lead_rank(),
        }
    }
}

impl fmt::Display for Combo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)?;
        f.write_str(" [")?;
        for (i, card) in self.cards.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{card}")?;
        }
        f.write_str("]")
    }
}

fn classify_sorted(cards: &[Card]) -> Option<PlayKind> {
    let first = *cards.first()?;
    let kind = match cards.len() {
        1 if first.rank() == Rank::Dog => PlayKind::Dog,
        1 => PlayKind::Single,
        2 => PlayKind::Pair,
        3 => PlayKind::ThreeOfAKind,
        4 if uniform_rank(cards) => PlayKind::BombOfAKind,
        4 => PlayKind::ConsecutivePairs,
        5 if has_repeated_rank(cards) => PlayKind::FullHouse,
        len if len % 2 == 0 && is_pair_ladder(cards) => PlayKind::ConsecutivePairs,
        _ if uniform_suit(cards) => PlayKind::BombRun,
        _ => PlayKind::Straight,
    };
    Some(kind)
}

fn validate_sorted(kind: PlayKind, cards: &[Card]) -> Result<(), ComboError> {
    match kind {
        PlayKind::Dog | PlayKind::Single => Ok(()),
        PlayKind::Pair | PlayKind::ThreeOfAKind | PlayKind::BombOfAKind => {
            if uniform_rank(cards) {
                Ok(())
            } else {
                Err(ComboError::MixedRanks { kind })
            }
        }
        PlayKind::Straight => validate_run(cards),
        PlayKind::BombRun => {
            validate_run(cards)?;
            if uniform_suit(cards) {
                Ok(())
            } else {
                Err(ComboError::MixedSuits)
            }
        }
        PlayKind::FullHouse => {
            if is_full_house(cards) {
                Ok(())
            } else {
                Err(ComboError::NotAFullHouse)
            }
        }
        PlayKind::ConsecutivePairs => {
            if is_pair_ladder(cards) {
                Ok(())
            } else {
                Err(ComboError::NotConsecutivePairs)
            }
        }
    }
}

fn validate_run(cards: &[Card]) -> Result<(), ComboError> {
    if cards.len() < 5 {
        return Err(ComboError::RunTooShort { len: cards.len() });
    }
    if is_run(cards) {
        Ok(())
    } else {
        Err(ComboError::BrokenRun)
    }
}

fn uniform_rank(cards: &[Card]) -> bool {
    cards
        .iter()
        .all(|card| Some(card.rank()) == cards.first().map(|c| c.rank()))
}

fn uniform_suit(cards: &[Card]) -> bool {
    match cards.first().and_then(|card| card.suit()) {
        Some(suit) => cards.iter().all(|card| card.suit() == Some(suit)),
        None => false,
    }
}

fn has_repeated_rank(cards: &[Card]) -> bool {
    cards
        .windows(2)
        .any(|pair| pair[0].rank() == pair[1].rank())
}

fn is_run(cards: &[Card]) -> bool {
    cards
        .windows(2)
        .all(|pair| pair[0].rank().successor() == Some(pair[1].rank()))
}

/// Rank-equal pairs whose ranks climb by exactly one per pair.
fn is_pair_ladder(cards: &[Card]) -> bool {
    if cards.len() < 4 || cards.len() % 2 != 0 {
        return false;
    }
    let mut previous: Option<Rank> = None;
    for pair in cards.chunks_exact(2) {
        if pair[0].rank() != pair[1].rank() {
            return false;
        }
        if let Some(prev) = previous {
            if prev.successor() != Some(pair[0].rank()) {
                return false;
            }
        }
        previous = Some(pair[0].rank());
    }
    true
}

/// Exactly three of one rank plus two of another. The sorted prefix of the
/// first rank must be two or three cards long and the remainder uniform.
fn is_full_house(cards: &[Card]) -> bool {
    if cards.len() != 5 {
        return false;
    }
    let split = cards
        .iter()
        .take_while(|card| card.rank() == cards[0].rank())
        .count();
    matches!(split, 2 | 3) && uniform_rank(&cards[split..])
}
