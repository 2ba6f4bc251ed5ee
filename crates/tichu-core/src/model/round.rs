use crate::model::card::Card;
use crate::model::combo::{Combo, ComboError, KindMismatch};
use crate::model::deck::Deck;
use crate::model::hand::Hand;
use crate::model::rank::Rank;
use crate::model::seat::{Seat, Team};
use crate::model::trick::{PassOutcome, Trick, TrickError};
use std::{array, fmt, vec::Vec};

/// One deal-to-hand-end cycle: the staged deal with its grand tichu window,
/// the trick rotation, finish order, taken piles and the round settlement.
#[derive(Debug, Clone)]
pub struct RoundState {
    hands: [Hand; 4],
    undealt: Vec<Card>,
    current_trick: Trick,
    tricks_completed: usize,
    taken: [Vec<Card>; 4],
    finish_order: Vec<Seat>,
    starting_seat: Seat,
    phase: RoundPhase,
    calls: [TichuCall; 4],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundPhase {
    /// First eight cards are out; grand tichu declarations are open.
    Dealing,
    Playing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TichuCall {
    #[default]
    None,
    Tichu,
    GrandTichu,
}

impl TichuCall {
    pub const fn stake(self) -> i32 {
        match self {
            TichuCall::None => 0,
            TichuCall::Tichu => 100,
            TichuCall::GrandTichu => 200,
        }
    }
}

/// Per-seat card points and declaration stakes for a finished round. A call
/// counts as made only if the calling seat was the first to go out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundSettlement {
    pub card_points: [i32; 4],
    pub call_bonuses: [i32; 4],
}

impl RoundSettlement {
    pub fn team_totals(&self) -> [i32; 2] {
        let mut totals = [0i32; 2];
        for seat in Seat::LOOP {
            totals[seat.team().index()] +=
                self.card_points[seat.index()] + self.call_bonuses[seat.index()];
        }
        totals
    }
}

impl RoundState {
    pub const HAND_SIZE: usize = 14;
    const FIRST_DEAL: usize = 8;

    /// Deals the first eight cards to each seat and opens the grand tichu
    /// window. `finish_deal` hands out the rest and starts play.
    pub fn deal(deck: &Deck) -> Self {
        let mut hands: [Hand; 4] = array::from_fn(|_| Hand::new());
        let mut undealt = Vec::with_capacity(Deck::SIZE - 4 * Self::FIRST_DEAL);
        for (index, card) in deck.cards().iter().enumerate() {
            if index < 4 * Self::FIRST_DEAL {
                hands[index % 4].add(*card);
            } else {
                undealt.push(*card);
            }
        }
        Self {
            hands,
            undealt,
            current_trick: Trick::new(Seat::North),
            tricks_completed: 0,
            taken: array::from_fn(|_| Vec::new()),
            finish_order: Vec::new(),
            starting_seat: Seat::North,
            phase: RoundPhase::Dealing,
            calls: [TichuCall::None; 4],
        }
    }

    /// Deals a full hand at once for flows that skip the grand tichu window.
    pub fn deal_all(deck: &Deck) -> Self {
        let mut round = Self::deal(deck);
        round
            .finish_deal()
            .expect("a fresh deal is in the dealing phase");
        round
    }

    /// Builds a mid-round position directly from explicit hands; `leader`
    /// leads a fresh trick and the taken piles start empty.
    pub fn from_hands(hands: [Hand; 4], leader: Seat) -> Self {
        Self {
            hands,
            undealt: Vec::new(),
            current_trick: Trick::new(leader),
            tricks_completed: 0,
            taken: array::from_fn(|_| Vec::new()),
            finish_order: Vec::new(),
            starting_seat: leader,
            phase: RoundPhase::Playing,
            calls: [TichuCall::None; 4],
        }
    }

    /// Closes the grand tichu window, deals the remaining six cards per seat
    /// and hands the opening lead to the Mahjong holder.
    pub fn finish_deal(&mut self) -> Result<(), CallError> {
        if self.phase != RoundPhase::Dealing {
            return Err(CallError::DealAlreadyFinished);
        }
        let undealt = std::mem::take(&mut self.undealt);
        for (index, card) in undealt.into_iter().enumerate() {
            self.hands[index % 4].add(card);
        }
        let leader = Seat::LOOP
            .iter()
            .copied()
            .find(|seat| self.hands[seat.index()].contains(Card::MAHJONG))
            .unwrap_or(self.starting_seat);
        self.starting_seat = leader;
        self.current_trick = Trick::new(leader);
        self.phase = RoundPhase::Playing;
        Ok(())
    }

    pub fn phase(&self) -> RoundPhase {
        self.phase
    }

    pub fn hand(&self, seat: Seat) -> &Hand {
        &self.hands[seat.index()]
    }

    pub fn current_trick(&self) -> &Trick {
        &self.current_trick
    }

    pub fn tricks_completed(&self) -> usize {
        self.tricks_completed
    }

    pub fn starting_seat(&self) -> Seat {
        self.starting_seat
    }

    pub fn taken(&self, seat: Seat) -> &[Card] {
        &self.taken[seat.index()]
    }

    pub fn finish_order(&self) -> &[Seat] {
        &self.finish_order
    }

    pub fn call(&self, seat: Seat) -> TichuCall {
        self.calls[seat.index()]
    }

    pub fn undealt_count(&self) -> usize {
        self.undealt.len()
    }

    /// Declares a grand tichu; only open before `finish_deal`.
    pub fn call_grand_tichu(&mut self, seat: Seat) -> Result<(), CallError> {
        if self.phase != RoundPhase::Dealing {
            return Err(CallError::DealAlreadyFinished);
        }
        self.declare(seat, TichuCall::GrandTichu)
    }

    /// Declares a tichu; allowed while the seat still holds its full hand.
    pub fn call_tichu(&mut self, seat: Seat) -> Result<(), CallError> {
        let held = self.hands[seat.index()].len();
        if held != Self::HAND_SIZE {
            return Err(CallError::HandNotComplete { seat, held });
        }
        self.declare(seat, TichuCall::Tichu)
    }

    fn declare(&mut self, seat: Seat, call: TichuCall) -> Result<(), CallError> {
        if self.calls[seat.index()] != TichuCall::None {
            return Err(CallError::AlreadyCalled(seat));
        }
        self.calls[seat.index()] = call;
        Ok(())
    }

    /// Submits a selection from `seat`'s hand as a candidate play. All checks
    /// run before any card moves, so a rejection never touches the hand.
    pub fn submit_play(&mut self, seat: Seat, cards: Vec<Card>) -> Result<PlayOutcome, PlayError> {
        if self.phase != RoundPhase::Playing {
            return Err(PlayError::NotInPlayPhase);
        }
        let expected = self.current_trick.turn();
        if expected != seat {
            return Err(PlayError::OutOfTurn {
                expected,
                actual: seat,
            });
        }
        self.check_selection(seat, &cards)?;
        let combo = Combo::new(cards).map_err(PlayError::Malformed)?;
        if let Some(lead) = self.current_trick.best() {
            match combo.beats(&lead.combo) {
                Ok(true) => {}
                Ok(false) => {
                    return Err(PlayError::TooLow {
                        candidate: combo.lead_rank(),
                        leader: lead.combo.lead_rank(),
                    });
                }
                Err(mismatch) => return Err(PlayError::Mismatch(mismatch)),
            }
        }

        let _ = self.hands[seat.index()].remove_all(combo.cards());
        self.current_trick
            .play(seat, combo)
            .map_err(PlayError::Trick)?;

        if self.hands[seat.index()].is_empty() {
            self.finish_order.push(seat);
            Ok(PlayOutcome::WentOut)
        } else {
            Ok(PlayOutcome::Played)
        }
    }

    /// Passes for `seat`. The third consecutive pass resolves the trick:
    /// the winner collects its cards and leads the next one, or, if nobody
    /// played at all, the seat now on turn leads.
    pub fn submit_pass(&mut self, seat: Seat) -> Result<PassOutcome, PlayError> {
        if self.phase != RoundPhase::Playing {
            return Err(PlayError::NotInPlayPhase);
        }
        let outcome = self.current_trick.pass(seat).map_err(PlayError::Trick)?;
        if self.current_trick.is_resolved() {
            self.complete_trick();
        }
        Ok(outcome)
    }

    /// Whether the hand-end condition holds: three seats out, or one
    /// partnership entirely out.
    pub fn is_over(&self) -> bool {
        let out = Seat::LOOP
            .iter()
            .filter(|seat| self.hands[seat.index()].is_empty())
            .count();
        if out >= 3 {
            return true;
        }
        Team::BOTH.iter().any(|team| {
            team.seats()
                .iter()
                .all(|seat| self.hands[seat.index()].is_empty())
        })
    }

    /// Tallies the round as it stands. Cards still held or sitting in an
    /// open trick score for nobody.
    pub fn settlement(&self) -> RoundSettlement {
        let mut card_points = [0i32; 4];
        for seat in Seat::LOOP {
            card_points[seat.index()] = self.taken[seat.index()]
                .iter()
                .map(|card| card.point_value())
                .sum();
        }
        let first_out = self.finish_order.first().copied();
        let mut call_bonuses = [0i32; 4];
        for seat in Seat::LOOP {
            let call = self.calls[seat.index()];
            if call != TichuCall::None {
                let made = first_out == Some(seat);
                call_bonuses[seat.index()] = if made { call.stake() } else { -call.stake() };
            }
        }
        RoundSettlement {
            card_points,
            call_bonuses,
        }
    }

    fn check_selection(&self, seat: Seat, cards: &[Card]) -> Result<(), PlayError> {
        let mut sorted = cards.to_vec();
        sorted.sort_unstable();
        if let Some(pair) = sorted.windows(2).find(|pair| pair[0] == pair[1]) {
            return Err(PlayError::DuplicateCard(pair[0]));
        }
        if let Some(missing) = sorted
            .iter()
            .copied()
            .find(|&card| !self.hands[seat.index()].contains(card))
        {
            return Err(PlayError::CardNotInHand(missing));
        }
        Ok(())
    }

    fn complete_trick(&mut self) {
        // at resolution the turn pointer already rests on the next leader:
        // the winner after a won trick, the seat after the third passer
        // when the trick was voided
        let next_leader = self.current_trick.turn();
        let finished = std::mem::replace(&mut self.current_trick, Trick::new(next_leader));
        if let Some(winner) = finished.winner() {
            self.taken[winner.index()].extend(finished.into_cards());
        }
        self.tricks_completed += 1;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayOutcome {
    Played,
    /// The play emptied the seat's hand.
    WentOut,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayError {
    NotInPlayPhase,
    OutOfTurn { expected: Seat, actual: Seat },
    CardNotInHand(Card),
    DuplicateCard(Card),
    Malformed(ComboError),
    Mismatch(KindMismatch),
    TooLow { candidate: Rank, leader: Rank },
    Trick(TrickError),
}

impl fmt::Display for PlayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlayError::NotInPlayPhase => write!(f, "round is not in the play phase"),
            PlayError::OutOfTurn { expected, actual } => {
                write!(f, "expected {expected} to act next but got {actual}")
            }
            PlayError::CardNotInHand(card) => write!(f, "{card} is not in hand"),
            PlayError::DuplicateCard(card) => write!(f, "{card} was selected twice"),
            PlayError::Malformed(reason) => write!(f, "{reason}"),
            PlayError::Mismatch(mismatch) => write!(f, "{mismatch}"),
            PlayError::TooLow { candidate, leader } => {
                write!(f, "lead rank {candidate} does not beat the current {leader}")
            }
            PlayError::Trick(error) => write!(f, "{error}"),
        }
    }
}

impl std::error::Error for PlayError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallError {
    DealAlreadyFinished,
    AlreadyCalled(Seat),
    HandNotComplete { seat: Seat, held: usize },
}

impl fmt::Display for CallError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CallError::DealAlreadyFinished => write!(f, "the deal has already been completed"),
            CallError::AlreadyCalled(seat) => {
                write!(f, "{seat} has already declared this round")
            }
            CallError::HandNotComplete { seat, held } => {
                write!(
                    f,
                    "{seat} holds {held} cards, a tichu call needs the full 14"
                )
            }
        }
    }
}

impl std::error::Error for CallError {}
