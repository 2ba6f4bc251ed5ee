use super::match_state::MatchState;
use serde::{Deserialize, Serialize};

/// Enough to rebuild a match between rounds: the seed replays every deal, so
/// only the totals and the round counter need to travel.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MatchSnapshot {
    pub seed: u64,
    pub round_number: u32,
    pub scores: [i32; 2],
}

impl MatchSnapshot {
    pub fn capture(state: &MatchState) -> Self {
        MatchSnapshot {
            seed: state.seed(),
            round_number: state.round_number(),
            scores: *state.scores().standings(),
        }
    }

    pub fn restore(self) -> MatchState {
        MatchState::from_snapshot(&self)
    }

    pub fn to_json(state: &MatchState) -> serde_json::Result<String> {
        let snapshot = Self::capture(state);
        serde_json::to_string_pretty(&snapshot)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::MatchSnapshot;
    use crate::game::match_state::MatchState;
    use crate::model::seat::Seat;

    #[test]
    fn snapshot_serializes_to_json() {
        let state = MatchState::with_seed(99);
        let json = MatchSnapshot::to_json(&state).unwrap();
        assert!(json.contains("\"seed\": 99"));
        assert!(json.contains("\"round_number\": 1"));
    }

    #[test]
    fn snapshot_roundtrip_restores_the_match() {
        let mut state = MatchState::with_seed(123);
        state.scores_mut().set_totals([65, -40]);
        state.finish_round_and_start_next();

        let snapshot = MatchSnapshot::capture(&state);
        let restored = snapshot.clone().restore();

        assert_eq!(restored.seed(), 123);
        assert_eq!(restored.round_number(), snapshot.round_number);
        assert_eq!(restored.scores().standings(), &snapshot.scores);
        for seat in Seat::LOOP {
            assert_eq!(
                restored.round().hand(seat).cards(),
                state.round().hand(seat).cards()
            );
        }
    }

    #[test]
    fn snapshot_from_json_ignores_unknown_fields() {
        let stored = r#"{
            "seed": 7,
            "round_number": 2,
            "scores": [120, -35],
            "tricks": []
        }"#;

        let snapshot = MatchSnapshot::from_json(stored).unwrap();
        assert_eq!(snapshot.seed, 7);
        assert_eq!(snapshot.round_number, 2);
        assert_eq!(snapshot.scores, [120, -35]);
    }
}
