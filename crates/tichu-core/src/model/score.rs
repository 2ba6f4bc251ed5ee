use crate::model::seat::Team;

/// Running match totals for the two partnerships. Failed tichu calls can
/// push a total below zero, so scores are signed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreBoard {
    totals: [i32; 2],
}

impl ScoreBoard {
    pub const fn new() -> Self {
        Self { totals: [0; 2] }
    }

    pub fn add(&mut self, team: Team, points: i32) {
        self.totals[team.index()] += points;
    }

    pub fn set_totals(&mut self, totals: [i32; 2]) {
        self.totals = totals;
    }

    pub fn score(&self, team: Team) -> i32 {
        self.totals[team.index()]
    }

    pub fn standings(&self) -> &[i32; 2] {
        &self.totals
    }

    /// Folds one round's team totals into the match.
    pub fn apply_round(&mut self, totals: [i32; 2]) {
        for team in Team::BOTH {
            self.add(team, totals[team.index()]);
        }
    }

    /// The team in front, or `None` while the match is level.
    pub fn leading_team(&self) -> Option<Team> {
        match self.totals[0].cmp(&self.totals[1]) {
            std::cmp::Ordering::Greater => Some(Team::NorthSouth),
            std::cmp::Ordering::Less => Some(Team::EastWest),
            std::cmp::Ordering::Equal => None,
        }
    }

    /// The team that has won a match played to `target`, if any. A tie at or
    /// beyond the target decides nothing and play continues.
    pub fn winner(&self, target: i32) -> Option<Team> {
        let leader = self.leading_team()?;
        if self.score(leader) >= target {
            Some(leader)
        } else {
            None
        }
    }
}

impl Default for ScoreBoard {
    fn default() -> Self {
        Self::new()
    }
}
