use std::io::{self, BufRead, BufReader, Stdin, Stdout, Write};

use tichu_bot::{Action, Policy, PolicyContext};
use tichu_core::model::card::Card;
use tichu_core::model::combo::Combo;
use tichu_core::model::round::{RoundState, TichuCall};

/// Terminal front end for one seat. Reads commands from `input`, renders to
/// `output` and only hands the session selections that already passed the
/// shape and beat checks, so the table never sees a silent forced pass.
pub struct InteractivePolicy<R, W> {
    input: R,
    output: W,
}

impl InteractivePolicy<BufReader<Stdin>, Stdout> {
    pub fn stdio() -> Self {
        Self::new(BufReader::new(io::stdin()), io::stdout())
    }
}

impl<R: BufRead + Send, W: Write + Send> InteractivePolicy<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn read_line(&mut self) -> Option<String> {
        let mut line = String::new();
        match self.input.read_line(&mut line) {
            Ok(0) | Err(_) => None,
            Ok(_) => Some(line.trim().to_string()),
        }
    }

    fn say(&mut self, text: &str) {
        let _ = writeln!(self.output, "{text}");
    }

    fn prompt(&mut self, text: &str) -> Option<String> {
        let _ = write!(self.output, "{text}");
        let _ = self.output.flush();
        self.read_line()
    }

    fn confirm(&mut self, question: &str) -> bool {
        match self.prompt(question) {
            Some(answer) => matches!(answer.to_ascii_lowercase().as_str(), "y" | "yes"),
            None => false,
        }
    }

    fn render(&mut self, ctx: &PolicyContext) {
        let standings = ctx.scores.standings();
        self.say(&format!(
            "\nScores: North/South {}, East/West {}",
            standings[0], standings[1]
        ));
        self.show_trick(ctx);
        self.say(&format!("Your hand: {}", format_hand(ctx.hand.cards())));
    }

    fn show_trick(&mut self, ctx: &PolicyContext) {
        match ctx.round.current_trick().best() {
            Some(lead) => {
                let to_beat = format_cards(lead.combo.cards());
                self.say(&format!(
                    "To beat: {} ({}) from {}",
                    to_beat,
                    lead.combo.kind(),
                    lead.seat
                ));
            }
            None => self.say("You lead this trick."),
        }
    }

    fn print_help(&mut self) {
        self.say("Commands:");
        self.say("  <index> [<index>...]   play the cards at those hand positions");
        self.say("  pass                   pass on the current trick");
        self.say("  tichu                  declare a tichu, then take your turn");
        self.say("  hand                   show your hand again");
        self.say("  last                   show the play to beat");
        self.say("  help                   show this message");
    }

    fn selection_from(&mut self, ctx: &PolicyContext, tokens: &[&str]) -> Option<Vec<Card>> {
        let held = ctx.hand.cards();
        let mut picked = Vec::with_capacity(tokens.len());
        for token in tokens {
            let Ok(index) = token.parse::<usize>() else {
                self.say(&format!("'{token}' is not a card index"));
                return None;
            };
            let Some(&card) = held.get(index) else {
                self.say(&format!(
                    "index {index} is out of range, the hand holds {} cards",
                    held.len()
                ));
                return None;
            };
            if picked.contains(&card) {
                self.say(&format!("{card} was selected twice"));
                return None;
            }
            picked.push(card);
        }
        Some(picked)
    }

    /// Runs the same checks the round will, so a typo costs a reprompt
    /// instead of a forced pass.
    fn vet(&mut self, ctx: &PolicyContext, selection: Vec<Card>) -> Option<Vec<Card>> {
        let combo = match Combo::new(selection) {
            Ok(combo) => combo,
            Err(reason) => {
                self.say(&format!("That is not a playable shape: {reason}"));
                return None;
            }
        };
        if let Some(lead) = ctx.round.current_trick().best() {
            match combo.beats(&lead.combo) {
                Ok(true) => {}
                Ok(false) => {
                    self.say(&format!(
                        "{} does not beat the current {}",
                        combo.lead_rank(),
                        lead.combo.lead_rank()
                    ));
                    return None;
                }
                Err(mismatch) => {
                    self.say(&format!("{mismatch}"));
                    return None;
                }
            }
        }
        Some(combo.into_cards())
    }
}

impl<R: BufRead + Send, W: Write + Send> Policy for InteractivePolicy<R, W> {
    fn decide(&mut self, ctx: &PolicyContext) -> Action {
        self.render(ctx);
        loop {
            let Some(line) = self.prompt("> ") else {
                // input is gone; keep the match moving
                return Action::Pass;
            };
            let line = line.replace(',', " ");
            let tokens: Vec<&str> = line.split_whitespace().collect();
            match tokens.as_slice() {
                [] => continue,
                ["pass"] | ["p"] => return Action::Pass,
                ["tichu"] => {
                    if ctx.round.call(ctx.seat) != TichuCall::None {
                        self.say("You have already declared this round.");
                    } else if ctx.hand.len() != RoundState::HAND_SIZE {
                        self.say("A tichu call needs your untouched hand of 14.");
                    } else {
                        return Action::CallTichu;
                    }
                }
                ["hand"] => {
                    let hand = format_hand(ctx.hand.cards());
                    self.say(&format!("Your hand: {hand}"));
                }
                ["last"] => self.show_trick(ctx),
                ["help"] | ["?"] => self.print_help(),
                _ => {
                    let indexes = if tokens[0] == "play" {
                        &tokens[1..]
                    } else {
                        &tokens[..]
                    };
                    let Some(selection) = self.selection_from(ctx, indexes) else {
                        continue;
                    };
                    if let Some(cards) = self.vet(ctx, selection) {
                        return Action::Play(cards);
                    }
                }
            }
        }
    }

    fn wants_grand_tichu(&mut self, ctx: &PolicyContext) -> bool {
        let first_eight = format_cards(ctx.hand.cards());
        self.say(&format!("\nYour first eight: {first_eight}"));
        self.confirm("Call a grand tichu for 200? [y/N] ")
    }

    fn wants_tichu(&mut self, ctx: &PolicyContext) -> bool {
        let hand = format_cards(ctx.hand.cards());
        self.say(&format!("\nYour hand: {hand}"));
        self.confirm("Call a tichu for 100? [y/N] ")
    }
}

fn format_hand(cards: &[Card]) -> String {
    cards
        .iter()
        .enumerate()
        .map(|(index, card)| format!("{index}:{card}"))
        .collect::<Vec<_>>()
        .join(" ")
}

fn format_cards(cards: &[Card]) -> String {
    cards
        .iter()
        .map(Card::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::InteractivePolicy;
    use std::io::Cursor;
    use tichu_bot::{Action, Policy, PolicyContext};
    use tichu_core::model::card::Card;
    use tichu_core::model::hand::Hand;
    use tichu_core::model::rank::Rank;
    use tichu_core::model::round::RoundState;
    use tichu_core::model::score::ScoreBoard;
    use tichu_core::model::seat::Seat;
    use tichu_core::model::suit::Suit;

    fn scripted(input: &str) -> InteractivePolicy<Cursor<Vec<u8>>, Vec<u8>> {
        InteractivePolicy::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    fn transcript(policy: &InteractivePolicy<Cursor<Vec<u8>>, Vec<u8>>) -> String {
        String::from_utf8(policy.output.clone()).expect("utf8 output")
    }

    fn open_round() -> RoundState {
        RoundState::from_hands(
            [
                Hand::with_cards(vec![
                    Card::suited(Rank::Five, Suit::Clubs),
                    Card::suited(Rank::Five, Suit::Diamonds),
                    Card::suited(Rank::Nine, Suit::Hearts),
                ]),
                Hand::with_cards(vec![Card::suited(Rank::Ten, Suit::Clubs)]),
                Hand::with_cards(vec![Card::suited(Rank::Jack, Suit::Clubs)]),
                Hand::with_cards(vec![Card::suited(Rank::Queen, Suit::Clubs)]),
            ],
            Seat::North,
        )
    }

    fn decide_with(round: &RoundState, seat: Seat, input: &str) -> (Action, String) {
        let scores = ScoreBoard::new();
        let ctx = PolicyContext {
            seat,
            hand: round.hand(seat),
            round,
            scores: &scores,
        };
        let mut policy = scripted(input);
        let action = policy.decide(&ctx);
        (action, transcript(&policy))
    }

    #[test]
    fn indexes_become_a_play() {
        let round = open_round();
        let (action, output) = decide_with(&round, Seat::North, "0 1\n");

        let expected = vec![
            Card::suited(Rank::Five, Suit::Clubs),
            Card::suited(Rank::Five, Suit::Diamonds),
        ];
        assert_eq!(action, Action::Play(expected));
        assert!(output.contains("Your hand: 0:5C 1:5D 2:9H"));
        assert!(output.contains("You lead this trick."));
    }

    #[test]
    fn the_play_prefix_is_optional_noise() {
        let round = open_round();
        let (action, _) = decide_with(&round, Seat::North, "play 2\n");
        assert_eq!(
            action,
            Action::Play(vec![Card::suited(Rank::Nine, Suit::Hearts)])
        );
    }

    #[test]
    fn commas_separate_indexes_too() {
        let round = open_round();
        let (action, _) = decide_with(&round, Seat::North, "0,1\n");
        assert_eq!(
            action,
            Action::Play(vec![
                Card::suited(Rank::Five, Suit::Clubs),
                Card::suited(Rank::Five, Suit::Diamonds),
            ])
        );
    }

    #[test]
    fn the_tichu_command_needs_a_full_hand() {
        let round = open_round();
        let (action, output) = decide_with(&round, Seat::North, "tichu\npass\n");
        assert_eq!(action, Action::Pass);
        assert!(output.contains("needs your untouched hand"));
    }

    #[test]
    fn a_full_hand_may_declare() {
        let mut cards = vec![Card::MAHJONG];
        for (i, &rank) in Rank::STANDARD.iter().enumerate() {
            cards.push(Card::suited(rank, Suit::ALL[i % 4]));
        }
        let round = RoundState::from_hands(
            [
                Hand::with_cards(cards),
                Hand::with_cards(vec![Card::suited(Rank::Four, Suit::Hearts)]),
                Hand::with_cards(vec![Card::suited(Rank::Five, Suit::Hearts)]),
                Hand::with_cards(vec![Card::suited(Rank::Six, Suit::Hearts)]),
            ],
            Seat::North,
        );
        let (action, _) = decide_with(&round, Seat::North, "tichu\n");
        assert_eq!(action, Action::CallTichu);
    }

    #[test]
    fn last_replays_the_trick_state() {
        let round = open_round();
        let (action, output) = decide_with(&round, Seat::North, "last\npass\n");
        assert_eq!(action, Action::Pass);
        let leads = output.matches("You lead this trick.").count();
        assert_eq!(leads, 2, "render and the last command both show the trick");
    }

    #[test]
    fn bad_selections_reprompt_instead_of_passing() {
        let round = open_round();
        let (action, output) = decide_with(&round, Seat::North, "9\n0 2\npass\n");

        assert_eq!(action, Action::Pass);
        assert!(output.contains("index 9 is out of range"));
        assert!(output.contains("That is not a playable shape"));
    }

    #[test]
    fn a_response_sees_the_play_to_beat() {
        let mut round = open_round();
        round
            .submit_play(Seat::North, vec![Card::suited(Rank::Nine, Suit::Hearts)])
            .expect("nine leads");

        let scores = ScoreBoard::new();
        let ctx = PolicyContext {
            seat: Seat::East,
            hand: round.hand(Seat::East),
            round: &round,
            scores: &scores,
        };
        let mut policy = scripted("0\n");
        let action = policy.decide(&ctx);

        assert_eq!(
            action,
            Action::Play(vec![Card::suited(Rank::Ten, Suit::Clubs)])
        );
        let output = transcript(&policy);
        assert!(output.contains("To beat: 9H (single) from North"));
    }

    #[test]
    fn exhausted_input_passes() {
        let round = open_round();
        let (action, _) = decide_with(&round, Seat::North, "");
        assert_eq!(action, Action::Pass);
    }

    #[test]
    fn confirmations_only_accept_a_yes() {
        let round = open_round();
        let scores = ScoreBoard::new();
        let ctx = PolicyContext {
            seat: Seat::North,
            hand: round.hand(Seat::North),
            round: &round,
            scores: &scores,
        };

        let mut agreeing = scripted("y\n");
        assert!(agreeing.wants_tichu(&ctx));

        let mut declining = scripted("\n");
        assert!(!declining.wants_tichu(&ctx));

        let mut silent = scripted("");
        assert!(!silent.wants_grand_tichu(&ctx));
    }
}
