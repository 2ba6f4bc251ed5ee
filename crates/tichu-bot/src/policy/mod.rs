mod heuristic;

pub use heuristic::HeuristicPolicy;

use tichu_core::model::card::Card;
use tichu_core::model::hand::Hand;
use tichu_core::model::round::RoundState;
use tichu_core::model::score::ScoreBoard;
use tichu_core::model::seat::Seat;

/// Context handed to policies for decision-making.
pub struct PolicyContext<'a> {
    pub seat: Seat,
    pub hand: &'a Hand,
    pub round: &'a RoundState,
    pub scores: &'a ScoreBoard,
}

/// What a policy wants to do with its turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Pass,
    Play(Vec<Card>),
    /// Declare a tichu, then get asked again for the actual turn.
    CallTichu,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BotDifficulty {
    Easy,
    #[default]
    Normal,
}

/// Unified interface for seat controllers, heuristic or otherwise.
pub trait Policy: Send {
    /// Choose a play or a pass for the seat currently on turn.
    fn decide(&mut self, ctx: &PolicyContext) -> Action;

    /// Whether to declare a grand tichu on the first eight cards.
    fn wants_grand_tichu(&mut self, _ctx: &PolicyContext) -> bool {
        false
    }

    /// Whether to declare a tichu while the full hand is still intact.
    fn wants_tichu(&mut self, _ctx: &PolicyContext) -> bool {
        false
    }
}
