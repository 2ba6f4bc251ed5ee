use crate::model::deck::Deck;
use crate::model::round::{RoundPhase, RoundState};
use crate::model::score::ScoreBoard;
use crate::model::seat::Team;
use rand::SeedableRng;
use rand::rngs::StdRng;

/// A match: a sequence of rounds settled into one scoreboard, with every
/// deal drawn from a single seeded rng so a seed reproduces the match.
#[derive(Debug, Clone)]
pub struct MatchState {
    scores: ScoreBoard,
    round_number: u32,
    current_round: RoundState,
    rng: StdRng,
    seed: u64,
}

impl MatchState {
    /// The first partnership at or past this total while ahead takes the
    /// match.
    pub const TARGET: i32 = 1000;

    pub fn new() -> Self {
        let seed: u64 = rand::random();
        Self::with_seed_and_round(seed, 1)
    }

    pub fn with_seed(seed: u64) -> Self {
        Self::with_seed_and_round(seed, 1)
    }

    /// Rebuilds the deal for `round_number` by replaying the shuffles the
    /// seeded rng handed to the earlier rounds.
    pub fn with_seed_and_round(seed: u64, round_number: u32) -> Self {
        let normalized_round = round_number.max(1);
        let mut rng = StdRng::seed_from_u64(seed);

        for _ in 1..normalized_round {
            let _ = Deck::shuffled(&mut rng);
        }

        let deck = Deck::shuffled(&mut rng);
        let current_round = RoundState::deal(&deck);

        Self {
            scores: ScoreBoard::new(),
            round_number: normalized_round,
            current_round,
            rng,
            seed,
        }
    }

    pub fn from_snapshot(snapshot: &crate::game::serialization::MatchSnapshot) -> Self {
        let mut state = Self::with_seed_and_round(snapshot.seed, snapshot.round_number);
        state.scores_mut().set_totals(snapshot.scores);
        state
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn scores(&self) -> &ScoreBoard {
        &self.scores
    }

    pub fn scores_mut(&mut self) -> &mut ScoreBoard {
        &mut self.scores
    }

    pub fn round(&self) -> &RoundState {
        &self.current_round
    }

    pub fn round_mut(&mut self) -> &mut RoundState {
        &mut self.current_round
    }

    pub fn round_number(&self) -> u32 {
        self.round_number
    }

    pub fn is_round_complete(&self) -> bool {
        matches!(self.current_round.phase(), RoundPhase::Playing) && self.current_round.is_over()
    }

    /// Settles the current round into the match totals and deals the next
    /// one, which opens in its grand tichu window.
    pub fn finish_round_and_start_next(&mut self) {
        let totals = self.current_round.settlement().team_totals();
        self.scores.apply_round(totals);

        self.round_number += 1;
        let deck = Deck::shuffled(&mut self.rng);
        self.current_round = RoundState::deal(&deck);
    }

    pub fn match_winner(&self) -> Option<Team> {
        self.scores.winner(Self::TARGET)
    }
}

impl Default for MatchState {
    fn default() -> Self {
        Self::new()
    }
}
