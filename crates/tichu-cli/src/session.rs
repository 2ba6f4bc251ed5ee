use thiserror::Error;
use tichu_bot::{Action, Policy, PolicyContext};
use tichu_core::game::match_state::MatchState;
use tichu_core::model::round::TichuCall;
use tichu_core::model::seat::{Seat, Team};
use tracing::{Level, event};

const MAX_ROUNDS: usize = 500;
const MAX_STEPS_PER_ROUND: usize = 10_000;

/// A seat controller: a display name plus the policy that decides for it.
pub struct SeatDriver {
    pub name: String,
    pub policy: Box<dyn Policy>,
}

impl SeatDriver {
    pub fn new(name: impl Into<String>, policy: Box<dyn Policy>) -> Self {
        Self {
            name: name.into(),
            policy,
        }
    }
}

/// Drives one match from the first deal to the winning score, asking each
/// seat's policy for declarations and plays as its turn comes up.
pub struct MatchSession {
    state: MatchState,
    seats: [SeatDriver; 4],
    target: i32,
}

/// What one settled round contributed to the match.
#[derive(Debug, Clone)]
pub struct RoundRecord {
    pub round_number: u32,
    pub team_points: [i32; 2],
    pub running_totals: [i32; 2],
    pub first_out: Option<Seat>,
    pub calls: [TichuCall; 4],
    pub tricks: usize,
}

#[derive(Debug)]
pub struct MatchOutcome {
    pub seed: u64,
    pub rounds: Vec<RoundRecord>,
    pub final_scores: [i32; 2],
    pub winner: Team,
}

impl MatchSession {
    pub fn new(seed: u64, target: i32, seats: [SeatDriver; 4]) -> Self {
        Self {
            state: MatchState::with_seed(seed),
            seats,
            target,
        }
    }

    pub fn state(&self) -> &MatchState {
        &self.state
    }

    pub fn seat_name(&self, seat: Seat) -> &str {
        &self.seats[seat.index()].name
    }

    /// Play rounds until one partnership stands at or past the target with
    /// a lead. Ties at the target keep the match going.
    pub fn run(&mut self) -> Result<MatchOutcome, SessionError> {
        let mut rounds = Vec::new();
        let winner = loop {
            if let Some(winner) = self.state.scores().winner(self.target) {
                break winner;
            }
            if rounds.len() >= MAX_ROUNDS {
                return Err(SessionError::RoundLimit { limit: MAX_ROUNDS });
            }
            rounds.push(self.play_round()?);
        };

        Ok(MatchOutcome {
            seed: self.state.seed(),
            rounds,
            final_scores: *self.state.scores().standings(),
            winner,
        })
    }

    fn play_round(&mut self) -> Result<RoundRecord, SessionError> {
        let round_number = self.state.round_number();
        self.run_declarations()?;
        self.run_tricks(round_number)?;

        let round = self.state.round();
        let team_points = round.settlement().team_totals();
        let first_out = round.finish_order().first().copied();
        let calls = Seat::LOOP.map(|seat| round.call(seat));
        let tricks = round.tricks_completed();

        self.state.finish_round_and_start_next();
        let running_totals = *self.state.scores().standings();

        if tracing::enabled!(Level::INFO) {
            event!(
                target: "tichu_cli::round",
                Level::INFO,
                round = round_number,
                north_south = team_points[0],
                east_west = team_points[1],
                total_north_south = running_totals[0],
                total_east_west = running_totals[1],
                tricks = tricks as u32,
            );
        }

        Ok(RoundRecord {
            round_number,
            team_points,
            running_totals,
            first_out,
            calls,
            tricks,
        })
    }

    /// Offers the grand tichu window on the eight-card deal, completes the
    /// deal, then offers plain tichu calls on the full hands.
    fn run_declarations(&mut self) -> Result<(), SessionError> {
        let state = &mut self.state;
        let seats = &mut self.seats;

        for seat in Seat::LOOP {
            let wants = {
                let round = state.round();
                let ctx = PolicyContext {
                    seat,
                    hand: round.hand(seat),
                    round,
                    scores: state.scores(),
                };
                seats[seat.index()].policy.wants_grand_tichu(&ctx)
            };
            if wants && state.round_mut().call_grand_tichu(seat).is_ok() {
                log_call(seat, "grand_tichu");
            }
        }

        state
            .round_mut()
            .finish_deal()
            .map_err(|err| SessionError::game(format!("deal completion failed: {err}")))?;

        for seat in Seat::LOOP {
            if state.round().call(seat) != TichuCall::None {
                continue;
            }
            let wants = {
                let round = state.round();
                let ctx = PolicyContext {
                    seat,
                    hand: round.hand(seat),
                    round,
                    scores: state.scores(),
                };
                seats[seat.index()].policy.wants_tichu(&ctx)
            };
            if wants && state.round_mut().call_tichu(seat).is_ok() {
                log_call(seat, "tichu");
            }
        }

        Ok(())
    }

    fn run_tricks(&mut self, round_number: u32) -> Result<(), SessionError> {
        let state = &mut self.state;
        let seats = &mut self.seats;

        let mut steps = 0usize;
        while !state.round().is_over() {
            steps += 1;
            if steps > MAX_STEPS_PER_ROUND {
                return Err(SessionError::Stalled {
                    round: round_number,
                    steps: MAX_STEPS_PER_ROUND,
                });
            }

            let seat = state.round().current_trick().turn();

            // seats that have gone out keep the rotation moving
            if state.round().hand(seat).is_empty() {
                state.round_mut().submit_pass(seat).map_err(|err| {
                    SessionError::game(format!("forced pass failed for {seat}: {err}"))
                })?;
                continue;
            }

            let action = {
                let round = state.round();
                let ctx = PolicyContext {
                    seat,
                    hand: round.hand(seat),
                    round,
                    scores: state.scores(),
                };
                seats[seat.index()].policy.decide(&ctx)
            };

            match action {
                Action::Play(cards) => {
                    if let Err(err) = state.round_mut().submit_play(seat, cards) {
                        if tracing::enabled!(Level::WARN) {
                            event!(
                                target: "tichu_cli::play",
                                Level::WARN,
                                seat = %seat,
                                error = %err,
                                "play rejected, passing instead"
                            );
                        }
                        state.round_mut().submit_pass(seat).map_err(|pass_err| {
                            SessionError::game(format!(
                                "pass after a rejected play failed for {seat}: {pass_err}"
                            ))
                        })?;
                    }
                }
                Action::Pass => {
                    state
                        .round_mut()
                        .submit_pass(seat)
                        .map_err(|err| SessionError::game(format!("pass failed for {seat}: {err}")))?;
                }
                // a declaration does not spend the turn; ask the seat again
                Action::CallTichu => match state.round_mut().call_tichu(seat) {
                    Ok(()) => log_call(seat, "tichu"),
                    Err(err) => {
                        if tracing::enabled!(Level::WARN) {
                            event!(
                                target: "tichu_cli::call",
                                Level::WARN,
                                seat = %seat,
                                error = %err,
                                "tichu call refused"
                            );
                        }
                    }
                },
            }
        }

        Ok(())
    }
}

fn log_call(seat: Seat, call: &'static str) {
    if tracing::enabled!(Level::INFO) {
        event!(target: "tichu_cli::call", Level::INFO, seat = %seat, call);
    }
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("round {round} stalled after {steps} steps")]
    Stalled { round: u32, steps: usize },
    #[error("match ran past the {limit} round limit")]
    RoundLimit { limit: usize },
    #[error("game execution failed: {message}")]
    Game { message: String },
}

impl SessionError {
    fn game(message: String) -> Self {
        SessionError::Game { message }
    }
}
