use crate::model::card::Card;
use crate::model::combo::Combo;
use crate::model::seat::Seat;
use std::fmt;

/// One trick. Turn rotates over all four seats on every play and pass; the
/// third consecutive pass ends the trick and the last accepted play wins it.
/// Whether a play is allowed to supersede the best one is the round
/// controller's check; the trick enforces turn order and liveness only.
#[derive(Debug, Clone)]
pub struct Trick {
    leader: Seat,
    turn: Seat,
    best: Option<LeadPlay>,
    pile: Vec<Card>,
    passes: u8,
}

/// The current best play and the seat that owns it.
#[derive(Debug, Clone)]
pub struct LeadPlay {
    pub seat: Seat,
    pub combo: Combo,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrickError {
    TrickResolved,
    OutOfTurn { expected: Seat, actual: Seat },
}

impl fmt::Display for TrickError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrickError::TrickResolved => write!(f, "trick already resolved"),
            TrickError::OutOfTurn { expected, actual } => {
                write!(f, "expected {expected} to act next but got {actual}")
            }
        }
    }
}

impl std::error::Error for TrickError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassOutcome {
    /// The trick continues with the next seat.
    TrickOpen,
    /// Third consecutive pass; the owner of the best play collects.
    TrickWon(Seat),
    /// Third pass before anyone played; nobody collects anything.
    TrickVoided,
}

impl Trick {
    pub const PASS_LIMIT: u8 = 3;

    pub fn new(leader: Seat) -> Self {
        Self {
            leader,
            turn: leader,
            best: None,
            pile: Vec::new(),
            passes: 0,
        }
    }

    pub fn leader(&self) -> Seat {
        self.leader
    }

    pub fn turn(&self) -> Seat {
        self.turn
    }

    pub fn best(&self) -> Option<&LeadPlay> {
        self.best.as_ref()
    }

    pub fn passes(&self) -> u8 {
        self.passes
    }

    pub fn is_resolved(&self) -> bool {
        self.passes >= Self::PASS_LIMIT
    }

    /// Cards accumulated so far, superseded plays plus the current best.
    pub fn card_count(&self) -> usize {
        let best = self.best.as_ref().map_or(0, |lead| lead.combo.size());
        self.pile.len() + best
    }

    pub fn play(&mut self, seat: Seat, combo: Combo) -> Result<(), TrickError> {
        self.ensure_turn(seat)?;
        if let Some(superseded) = self.best.take() {
            self.pile.extend(superseded.combo.into_cards());
        }
        self.best = Some(LeadPlay { seat, combo });
        self.passes = 0;
        self.turn = seat.next();
        Ok(())
    }

    pub fn pass(&mut self, seat: Seat) -> Result<PassOutcome, TrickError> {
        self.ensure_turn(seat)?;
        self.passes += 1;
        self.turn = seat.next();
        if !self.is_resolved() {
            return Ok(PassOutcome::TrickOpen);
        }
        // three passes after a play put the turn back on the play's owner,
        // so the winner is also the seat due to lead next
        match &self.best {
            Some(lead) => Ok(PassOutcome::TrickWon(lead.seat)),
            None => Ok(PassOutcome::TrickVoided),
        }
    }

    pub fn winner(&self) -> Option<Seat> {
        if self.is_resolved() {
            self.best.as_ref().map(|lead| lead.seat)
        } else {
            None
        }
    }

    /// Everything played into this trick; awarding is the caller's job.
    pub fn into_cards(self) -> Vec<Card> {
        let mut cards = self.pile;
        if let Some(lead) = self.best {
            cards.extend(lead.combo.into_cards());
        }
        cards
    }

    fn ensure_turn(&self, seat: Seat) -> Result<(), TrickError> {
        if self.is_resolved() {
            return Err(TrickError::TrickResolved);
        }
        if self.turn != seat {
            return Err(TrickError::OutOfTurn {
                expected: self.turn,
                actual: seat,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{PassOutcome, Trick, TrickError};
    use crate::model::card::Card;
    use crate::model::combo::Combo;
    use crate::model::rank::Rank;
    use crate::model::seat::Seat;
    use crate::model::suit::Suit;

    fn single(rank: Rank, suit: Suit) -> Combo {
        Combo::new(vec![Card::suited(rank, suit)]).unwrap()
    }

    #[test]
    fn actions_follow_turn_order() {
        let mut trick = Trick::new(Seat::North);
        assert!(matches!(
            trick.play(Seat::South, single(Rank::Four, Suit::Clubs)),
            Err(TrickError::OutOfTurn {
                expected: Seat::North,
                actual: Seat::South,
            })
        ));
        assert!(trick.play(Seat::North, single(Rank::Four, Suit::Clubs)).is_ok());
        assert_eq!(trick.turn(), Seat::East);
    }

    #[test]
    fn pass_counter_resets_on_an_accepted_play() {
        let mut trick = Trick::new(Seat::North);
        trick.play(Seat::North, single(Rank::Four, Suit::Clubs)).unwrap();
        assert_eq!(trick.pass(Seat::East).unwrap(), PassOutcome::TrickOpen);
        assert_eq!(trick.pass(Seat::South).unwrap(), PassOutcome::TrickOpen);
        assert_eq!(trick.passes(), 2);
        trick.play(Seat::West, single(Rank::Nine, Suit::Clubs)).unwrap();
        assert_eq!(trick.passes(), 0);
        assert!(!trick.is_resolved());
    }

    #[test]
    fn three_passes_award_the_last_play() {
        let mut trick = Trick::new(Seat::North);
        trick.play(Seat::North, single(Rank::Four, Suit::Clubs)).unwrap();
        trick.pass(Seat::East).unwrap();
        trick.pass(Seat::South).unwrap();
        assert_eq!(
            trick.pass(Seat::West).unwrap(),
            PassOutcome::TrickWon(Seat::North)
        );
        assert_eq!(trick.winner(), Some(Seat::North));
        // the winner is due to lead the next trick
        assert_eq!(trick.turn(), Seat::North);
    }

    #[test]
    fn three_passes_with_no_play_void_the_trick() {
        let mut trick = Trick::new(Seat::North);
        trick.pass(Seat::North).unwrap();
        trick.pass(Seat::East).unwrap();
        assert_eq!(trick.pass(Seat::South).unwrap(), PassOutcome::TrickVoided);
        assert_eq!(trick.winner(), None);
        assert_eq!(trick.turn(), Seat::West);
        assert!(trick.into_cards().is_empty());
    }

    #[test]
    fn resolved_trick_rejects_further_actions() {
        let mut trick = Trick::new(Seat::North);
        trick.play(Seat::North, single(Rank::Four, Suit::Clubs)).unwrap();
        trick.pass(Seat::East).unwrap();
        trick.pass(Seat::South).unwrap();
        trick.pass(Seat::West).unwrap();
        assert_eq!(trick.pass(Seat::North), Err(TrickError::TrickResolved));
        assert_eq!(
            trick.play(Seat::North, single(Rank::Five, Suit::Clubs)),
            Err(TrickError::TrickResolved)
        );
    }

    #[test]
    fn superseded_plays_stay_in_the_pile() {
        let mut trick = Trick::new(Seat::North);
        trick.play(Seat::North, single(Rank::Four, Suit::Clubs)).unwrap();
        trick.play(Seat::East, single(Rank::Nine, Suit::Hearts)).unwrap();
        assert_eq!(trick.card_count(), 2);
        trick.pass(Seat::South).unwrap();
        trick.pass(Seat::West).unwrap();
        assert_eq!(
            trick.pass(Seat::North).unwrap(),
            PassOutcome::TrickWon(Seat::East)
        );
        let mut cards = trick.into_cards();
        cards.sort_unstable();
        assert_eq!(
            cards,
            vec![
                Card::suited(Rank::Four, Suit::Clubs),
                Card::suited(Rank::Nine, Suit::Hearts),
            ]
        );
    }
}
