use super::{Action, BotDifficulty, Policy, PolicyContext};
use crate::moves;
use std::cmp::Reverse;
use tichu_core::model::combo::Combo;
use tichu_core::model::rank::Rank;
use tracing::{Level, event};

/// Rule-of-thumb seat controller. Easy grabs the first legal candidate;
/// normal sheds wide on the lead, beats cheaply, holds under its partner
/// and spends bombs only where they pay.
pub struct HeuristicPolicy {
    difficulty: BotDifficulty,
}

impl HeuristicPolicy {
    pub fn new(difficulty: BotDifficulty) -> Self {
        Self { difficulty }
    }

    pub fn easy() -> Self {
        Self::new(BotDifficulty::Easy)
    }

    pub fn normal() -> Self {
        Self::new(BotDifficulty::Normal)
    }

    fn pick<'a>(&self, ctx: &PolicyContext, candidates: &'a [Combo]) -> Option<&'a Combo> {
        let best = ctx.round.current_trick().best();
        let partner_owns = best
            .map(|play| play.seat == ctx.seat.partner())
            .unwrap_or(false);
        let (bombs, plain): (Vec<&Combo>, Vec<&Combo>) =
            candidates.iter().partition(|combo| combo.is_bomb());

        if best.is_none() {
            return plain
                .into_iter()
                .max_by_key(|combo| (combo.size(), Reverse(combo.lead_rank())))
                .or_else(|| {
                    bombs
                        .into_iter()
                        .min_by_key(|combo| (combo.size(), combo.lead_rank()))
                });
        }
        if partner_owns {
            // only go over the partner to finish the hand
            return plain
                .into_iter()
                .find(|combo| combo.size() == ctx.hand.len());
        }
        plain
            .into_iter()
            .min_by_key(|combo| combo.lead_rank())
            .or_else(|| {
                if bomb_worth_spending(ctx) {
                    bombs
                        .into_iter()
                        .min_by_key(|combo| (combo.size(), combo.lead_rank()))
                } else {
                    None
                }
            })
    }
}

impl Policy for HeuristicPolicy {
    fn decide(&mut self, ctx: &PolicyContext) -> Action {
        let candidates = match ctx.round.current_trick().best() {
            Some(play) => moves::responses(ctx.hand, &play.combo),
            None => moves::leads(ctx.hand),
        };
        if candidates.is_empty() {
            log_decision(ctx, self.difficulty, 0, &Action::Pass, "no_candidates");
            return Action::Pass;
        }

        let chosen = match self.difficulty {
            BotDifficulty::Easy => Some(&candidates[0]),
            BotDifficulty::Normal => self.pick(ctx, &candidates),
        };
        let reason = match (self.difficulty, chosen.is_some()) {
            (BotDifficulty::Easy, _) => "easy_first_candidate",
            (_, true) => "heuristic_play",
            (_, false) => "heuristic_hold",
        };
        let action = match chosen {
            Some(combo) => Action::Play(combo.cards().to_vec()),
            None => Action::Pass,
        };
        log_decision(ctx, self.difficulty, candidates.len(), &action, reason);
        action
    }

    fn wants_grand_tichu(&mut self, ctx: &PolicyContext) -> bool {
        if self.difficulty == BotDifficulty::Easy {
            return false;
        }
        let high = ctx
            .hand
            .iter()
            .filter(|card| matches!(card.rank(), Rank::Dragon | Rank::Phoenix | Rank::Ace))
            .count();
        high >= 3
    }

    fn wants_tichu(&mut self, ctx: &PolicyContext) -> bool {
        if self.difficulty == BotDifficulty::Easy {
            return false;
        }
        let high = ctx
            .hand
            .iter()
            .filter(|card| {
                matches!(
                    card.rank(),
                    Rank::Dragon | Rank::Phoenix | Rank::Ace | Rank::King
                )
            })
            .count();
        high + 2 * moves::bombs(ctx.hand).len() >= 6
    }
}

/// A bomb goes on an opponent's trick only when the trick is fat or the
/// hand is close enough to done that holding it wins nothing.
fn bomb_worth_spending(ctx: &PolicyContext) -> bool {
    ctx.round.current_trick().card_count() >= 6 || ctx.hand.len() <= 8
}

fn log_decision(
    ctx: &PolicyContext,
    difficulty: BotDifficulty,
    candidates: usize,
    action: &Action,
    reason: &str,
) {
    if !tracing::enabled!(Level::DEBUG) {
        return;
    }

    let chosen = match action {
        Action::Pass => "pass".to_string(),
        Action::CallTichu => "call_tichu".to_string(),
        Action::Play(cards) => cards
            .iter()
            .map(|card| card.to_string())
            .collect::<Vec<_>>()
            .join(","),
    };

    event!(
        target: "tichu_bot::play",
        Level::DEBUG,
        seat = %ctx.seat,
        difficulty = ?difficulty,
        hand_size = ctx.hand.len(),
        candidates,
        chosen = %chosen,
        reason,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use tichu_core::model::card::Card;
    use tichu_core::model::hand::Hand;
    use tichu_core::model::round::RoundState;
    use tichu_core::model::score::ScoreBoard;
    use tichu_core::model::seat::Seat;
    use tichu_core::model::suit::Suit;

    fn suited(rank: Rank, suit: Suit) -> Card {
        Card::suited(rank, suit)
    }

    fn build_round(hands: [Vec<Card>; 4], leader: Seat) -> RoundState {
        RoundState::from_hands(hands.map(Hand::with_cards), leader)
    }

    fn with_ctx<R>(round: &RoundState, seat: Seat, run: impl FnOnce(&PolicyContext) -> R) -> R {
        let scores = ScoreBoard::new();
        let ctx = PolicyContext {
            seat,
            hand: round.hand(seat),
            round,
            scores: &scores,
        };
        run(&ctx)
    }

    fn filler() -> Vec<Card> {
        vec![suited(Rank::Queen, Suit::Hearts)]
    }

    #[test]
    fn easy_leads_its_lowest_single() {
        let round = build_round(
            [
                vec![suited(Rank::Nine, Suit::Diamonds), suited(Rank::Three, Suit::Clubs)],
                filler(),
                filler(),
                filler(),
            ],
            Seat::North,
        );
        let mut policy = HeuristicPolicy::easy();
        let action = with_ctx(&round, Seat::North, |ctx| policy.decide(ctx));
        assert_eq!(action, Action::Play(vec![suited(Rank::Three, Suit::Clubs)]));
    }

    #[test]
    fn normal_leads_its_widest_shed() {
        let round = build_round(
            [
                vec![
                    suited(Rank::Nine, Suit::Clubs),
                    suited(Rank::Nine, Suit::Diamonds),
                    suited(Rank::Three, Suit::Spades),
                ],
                filler(),
                filler(),
                filler(),
            ],
            Seat::North,
        );
        let mut policy = HeuristicPolicy::normal();
        let action = with_ctx(&round, Seat::North, |ctx| policy.decide(ctx));
        match action {
            Action::Play(cards) => {
                assert_eq!(cards.len(), 2);
                assert!(cards.iter().all(|card| card.rank() == Rank::Nine));
            }
            other => panic!("the leader should shed, got {other:?}"),
        }
    }

    #[test]
    fn normal_beats_as_cheaply_as_it_can() {
        let mut round = build_round(
            [
                vec![suited(Rank::Six, Suit::Clubs), suited(Rank::King, Suit::Clubs)],
                filler(),
                filler(),
                vec![suited(Rank::Five, Suit::Clubs), suited(Rank::Two, Suit::Clubs)],
            ],
            Seat::West,
        );
        round
            .submit_play(Seat::West, vec![suited(Rank::Five, Suit::Clubs)])
            .unwrap();

        let mut policy = HeuristicPolicy::normal();
        let action = with_ctx(&round, Seat::North, |ctx| policy.decide(ctx));
        assert_eq!(action, Action::Play(vec![suited(Rank::Six, Suit::Clubs)]));
    }

    #[test]
    fn normal_holds_under_its_partner() {
        let mut round = build_round(
            [
                vec![suited(Rank::King, Suit::Clubs), suited(Rank::Four, Suit::Diamonds)],
                filler(),
                vec![suited(Rank::Nine, Suit::Clubs), suited(Rank::Two, Suit::Clubs)],
                filler(),
            ],
            Seat::South,
        );
        round
            .submit_play(Seat::South, vec![suited(Rank::Nine, Suit::Clubs)])
            .unwrap();
        round.submit_pass(Seat::West).unwrap();

        let mut policy = HeuristicPolicy::normal();
        let action = with_ctx(&round, Seat::North, |ctx| policy.decide(ctx));
        assert_eq!(action, Action::Pass);

        let mut eager = HeuristicPolicy::easy();
        let easy_action = with_ctx(&round, Seat::North, |ctx| eager.decide(ctx));
        assert_eq!(
            easy_action,
            Action::Play(vec![suited(Rank::King, Suit::Clubs)])
        );
    }

    #[test]
    fn normal_goes_out_over_its_partner() {
        let mut round = build_round(
            [
                vec![suited(Rank::King, Suit::Clubs)],
                filler(),
                vec![suited(Rank::Nine, Suit::Clubs), suited(Rank::Two, Suit::Clubs)],
                filler(),
            ],
            Seat::South,
        );
        round
            .submit_play(Seat::South, vec![suited(Rank::Nine, Suit::Clubs)])
            .unwrap();
        round.submit_pass(Seat::West).unwrap();

        let mut policy = HeuristicPolicy::normal();
        let action = with_ctx(&round, Seat::North, |ctx| policy.decide(ctx));
        assert_eq!(action, Action::Play(vec![suited(Rank::King, Suit::Clubs)]));
    }

    #[test]
    fn bombs_wait_for_a_trick_worth_taking() {
        let quad: Vec<Card> = Suit::ALL
            .iter()
            .map(|&suit| suited(Rank::Two, suit))
            .collect();
        let mut thin_hand = quad.clone();
        thin_hand.extend([
            suited(Rank::Three, Suit::Clubs),
            suited(Rank::Four, Suit::Diamonds),
            suited(Rank::Five, Suit::Spades),
            suited(Rank::Six, Suit::Hearts),
            suited(Rank::Seven, Suit::Clubs),
            suited(Rank::Eight, Suit::Diamonds),
        ]);
        let mut round = build_round(
            [
                thin_hand,
                filler(),
                filler(),
                vec![suited(Rank::Ace, Suit::Clubs), suited(Rank::King, Suit::Diamonds)],
            ],
            Seat::West,
        );
        round
            .submit_play(Seat::West, vec![suited(Rank::Ace, Suit::Clubs)])
            .unwrap();

        // a ten card hand over a one card trick: keep the bomb
        let mut policy = HeuristicPolicy::normal();
        let action = with_ctx(&round, Seat::North, |ctx| policy.decide(ctx));
        assert_eq!(action, Action::Pass);
    }

    #[test]
    fn bombs_land_on_a_fat_opponent_trick() {
        let quad: Vec<Card> = Suit::ALL
            .iter()
            .map(|&suit| suited(Rank::Two, suit))
            .collect();
        let straight = vec![
            suited(Rank::Four, Suit::Clubs),
            suited(Rank::Five, Suit::Diamonds),
            suited(Rank::Six, Suit::Spades),
            suited(Rank::Seven, Suit::Hearts),
            suited(Rank::Eight, Suit::Clubs),
            suited(Rank::Nine, Suit::Diamonds),
        ];
        let mut hand = quad.clone();
        hand.push(suited(Rank::Jack, Suit::Hearts));
        let mut round = build_round(
            [hand, filler(), filler(), straight.clone()],
            Seat::West,
        );
        round.submit_play(Seat::West, straight).unwrap();

        let mut policy = HeuristicPolicy::normal();
        let action = with_ctx(&round, Seat::North, |ctx| policy.decide(ctx));
        assert_eq!(action, Action::Play(quad));
    }

    #[test]
    fn grand_tichu_wants_a_loaded_first_eight() {
        let loaded = build_round(
            [
                vec![
                    Card::DRAGON,
                    Card::PHOENIX,
                    suited(Rank::Ace, Suit::Clubs),
                    suited(Rank::King, Suit::Diamonds),
                    suited(Rank::Four, Suit::Spades),
                    suited(Rank::Five, Suit::Hearts),
                    suited(Rank::Six, Suit::Clubs),
                    suited(Rank::Seven, Suit::Diamonds),
                ],
                filler(),
                filler(),
                filler(),
            ],
            Seat::North,
        );
        let mut policy = HeuristicPolicy::normal();
        assert!(with_ctx(&loaded, Seat::North, |ctx| policy.wants_grand_tichu(ctx)));

        let mut easy = HeuristicPolicy::easy();
        assert!(!with_ctx(&loaded, Seat::North, |ctx| easy.wants_grand_tichu(ctx)));

        let weak = build_round(
            [
                vec![
                    suited(Rank::Two, Suit::Clubs),
                    suited(Rank::Five, Suit::Diamonds),
                    suited(Rank::Eight, Suit::Spades),
                    suited(Rank::Jack, Suit::Hearts),
                ],
                filler(),
                filler(),
                filler(),
            ],
            Seat::North,
        );
        assert!(!with_ctx(&weak, Seat::North, |ctx| policy.wants_grand_tichu(ctx)));
    }

    #[test]
    fn tichu_wants_height_or_bombs() {
        let tall = build_round(
            [
                vec![
                    Card::DRAGON,
                    Card::PHOENIX,
                    suited(Rank::Ace, Suit::Clubs),
                    suited(Rank::Ace, Suit::Diamonds),
                    suited(Rank::King, Suit::Spades),
                    suited(Rank::King, Suit::Hearts),
                    suited(Rank::Three, Suit::Clubs),
                ],
                filler(),
                filler(),
                filler(),
            ],
            Seat::North,
        );
        let mut policy = HeuristicPolicy::normal();
        assert!(with_ctx(&tall, Seat::North, |ctx| policy.wants_tichu(ctx)));

        let flat = build_round(
            [
                vec![
                    suited(Rank::Three, Suit::Clubs),
                    suited(Rank::Six, Suit::Diamonds),
                    suited(Rank::Nine, Suit::Spades),
                    suited(Rank::Queen, Suit::Clubs),
                ],
                filler(),
                filler(),
                filler(),
            ],
            Seat::North,
        );
        assert!(!with_ctx(&flat, Seat::North, |ctx| policy.wants_tichu(ctx)));
    }
}
