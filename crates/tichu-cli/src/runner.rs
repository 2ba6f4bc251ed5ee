use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use rand::{RngCore, SeedableRng, rngs::StdRng};
use serde::Serialize;
use thiserror::Error;
use tichu_bot::{HeuristicPolicy, Policy};
use tichu_core::model::seat::{Seat, Team};

use crate::config::{ResolvedOutputs, SeatAgent, SimulationConfig};
use crate::session::{MatchOutcome, MatchSession, SeatDriver, SessionError};

/// Runs a batch of bot matches and streams one JSONL row per settled round.
pub struct SimulationRunner {
    config: SimulationConfig,
    outputs: ResolvedOutputs,
}

/// Summary details returned after a run.
pub struct RunSummary {
    pub matches_played: usize,
    pub rounds_played: usize,
    pub rows_written: usize,
    pub wins: [usize; 2],
    pub jsonl_path: PathBuf,
    pub summary_path: PathBuf,
}

impl SimulationRunner {
    pub fn new(config: SimulationConfig, outputs: ResolvedOutputs) -> Self {
        Self { config, outputs }
    }

    /// Execute the configured matches, streaming JSONL rows to disk.
    pub fn run(&self) -> Result<RunSummary, RunnerError> {
        ensure_parent(self.outputs.jsonl.parent())?;
        ensure_parent(self.outputs.summary_md.parent())?;

        let mut writer = BufWriter::new(File::create(&self.outputs.jsonl)?);
        let mut rng = StdRng::seed_from_u64(self.config.matches.seed.unwrap_or(0));
        let mut rows_written = 0usize;
        let mut rounds_played = 0usize;
        let mut wins = [0usize; 2];

        for match_index in 0..self.config.matches.count {
            let seed = rng.next_u64();
            let mut session =
                MatchSession::new(seed, self.config.matches.target, self.build_seats());
            let outcome = session
                .run()
                .map_err(|source| RunnerError::Session {
                    match_index,
                    source,
                })?;

            wins[outcome.winner.index()] += 1;
            rounds_played += outcome.rounds.len();
            rows_written +=
                write_match_rows(&mut writer, &self.config.run_id, match_index, &outcome)?;
        }

        writer.flush()?;
        self.write_summary(rounds_played, wins)?;

        Ok(RunSummary {
            matches_played: self.config.matches.count,
            rounds_played,
            rows_written,
            wins,
            jsonl_path: self.outputs.jsonl.clone(),
            summary_path: self.outputs.summary_md.clone(),
        })
    }

    fn build_seats(&self) -> [SeatDriver; 4] {
        Seat::LOOP.map(|seat| {
            let agent = self.config.seats.agent(seat);
            SeatDriver::new(agent.as_str(), spawn_policy(agent))
        })
    }

    fn write_summary(&self, rounds_played: usize, wins: [usize; 2]) -> Result<(), RunnerError> {
        let matches = self.config.matches.count.max(1);

        let mut doc = String::new();
        doc.push_str("# Simulation Summary\n\n");
        doc.push_str(&format!("- Run: `{}`\n", self.config.run_id));
        doc.push_str(&format!("- Matches: {}\n", self.config.matches.count));
        doc.push_str(&format!("- Rounds: {rounds_played}\n"));
        doc.push_str(&format!(
            "- Target: {} points\n\n",
            self.config.matches.target
        ));

        doc.push_str("| Team | Seats | Agents | Wins | Win % |\n");
        doc.push_str("|------|-------|--------|------|-------|\n");
        for team in Team::BOTH {
            let [first, second] = team.seats();
            let agents = format!(
                "{} / {}",
                self.config.seats.agent(first).as_str(),
                self.config.seats.agent(second).as_str()
            );
            let win_pct = wins[team.index()] as f64 * 100.0 / matches as f64;
            doc.push_str(&format!(
                "| {team} | {} {} | {agents} | {} | {win_pct:.1} |\n",
                seat_label(first),
                seat_label(second),
                wins[team.index()]
            ));
        }

        fs::write(&self.outputs.summary_md, doc)?;
        Ok(())
    }
}

fn ensure_parent(path: Option<&Path>) -> Result<(), RunnerError> {
    if let Some(dir) = path.filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    Ok(())
}

fn spawn_policy(agent: SeatAgent) -> Box<dyn Policy> {
    match agent {
        SeatAgent::Easy => Box::new(HeuristicPolicy::easy()),
        SeatAgent::Normal => Box::new(HeuristicPolicy::normal()),
    }
}

fn seat_label(seat: Seat) -> &'static str {
    match seat {
        Seat::North => "north",
        Seat::East => "east",
        Seat::South => "south",
        Seat::West => "west",
    }
}

fn write_match_rows(
    writer: &mut BufWriter<File>,
    run_id: &str,
    match_index: usize,
    outcome: &MatchOutcome,
) -> Result<usize, RunnerError> {
    let match_id = format!("M{match_index:04}");

    let mut rows_written = 0usize;
    for record in &outcome.rounds {
        let row = RoundLogRow {
            run_id: run_id.to_string(),
            match_id: match_id.clone(),
            match_index,
            seed: outcome.seed,
            round: record.round_number,
            north_south_points: record.team_points[0],
            east_west_points: record.team_points[1],
            north_south_total: record.running_totals[0],
            east_west_total: record.running_totals[1],
            first_out: record.first_out.map(|seat| seat_label(seat).to_string()),
            tricks: record.tricks,
        };

        serde_json::to_writer(&mut *writer, &row)?;
        writer.write_all(b"\n")?;
        rows_written += 1;
    }

    Ok(rows_written)
}

#[derive(Serialize)]
struct RoundLogRow {
    run_id: String,
    match_id: String,
    match_index: usize,
    seed: u64,
    round: u32,
    north_south_points: i32,
    east_west_points: i32,
    north_south_total: i32,
    east_west_total: i32,
    first_out: Option<String>,
    tricks: usize,
}

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
    #[error("failed to serialize log row: {source}")]
    Serialize {
        #[from]
        source: serde_json::Error,
    },
    #[error("match {match_index} failed: {source}")]
    Session {
        match_index: usize,
        source: SessionError,
    },
}

#[cfg(test)]
mod tests {
    use super::SimulationRunner;
    use crate::config::{
        LoggingConfig, MatchesConfig, OutputsConfig, SeatsConfig, SimulationConfig,
    };
    use std::fs;
    use std::path::Path;
    use tempfile::tempdir;

    fn config_in(dir: &Path) -> SimulationConfig {
        SimulationConfig {
            run_id: "runner_test".to_string(),
            matches: MatchesConfig {
                count: 2,
                seed: Some(9),
                target: 150,
            },
            seats: SeatsConfig::default(),
            outputs: OutputsConfig {
                jsonl: dir.join("rounds.jsonl").to_string_lossy().into_owned(),
                summary_md: dir.join("summary.md").to_string_lossy().into_owned(),
            },
            logging: LoggingConfig::default(),
        }
    }

    #[test]
    fn run_streams_rows_and_writes_the_summary() {
        let dir = tempdir().expect("tempdir");
        let config = config_in(dir.path());
        let outputs = config.resolved_outputs();
        let summary = SimulationRunner::new(config, outputs)
            .run()
            .expect("run succeeds");

        assert_eq!(summary.matches_played, 2);
        assert_eq!(summary.wins[0] + summary.wins[1], 2);
        assert_eq!(summary.rows_written, summary.rounds_played);

        let raw = fs::read_to_string(&summary.jsonl_path).expect("jsonl output");
        let lines: Vec<&str> = raw.lines().collect();
        assert_eq!(lines.len(), summary.rows_written);
        for line in lines {
            let row: serde_json::Value = serde_json::from_str(line).expect("row parses");
            assert_eq!(row["run_id"], "runner_test");
            assert!(row["round"].as_u64().is_some());
            assert!(row["tricks"].as_u64().is_some());
        }

        let markdown = fs::read_to_string(&summary.summary_path).expect("summary output");
        assert!(markdown.contains("# Simulation Summary"));
        assert!(markdown.contains("| Team |"));
        assert!(markdown.contains("North/South"));
    }

    #[test]
    fn seeded_runs_reproduce_their_rows() {
        let first_dir = tempdir().expect("tempdir");
        let second_dir = tempdir().expect("tempdir");

        let first_config = config_in(first_dir.path());
        let first_outputs = first_config.resolved_outputs();
        let second_config = config_in(second_dir.path());
        let second_outputs = second_config.resolved_outputs();

        let first = SimulationRunner::new(first_config, first_outputs)
            .run()
            .expect("first run");
        let second = SimulationRunner::new(second_config, second_outputs)
            .run()
            .expect("second run");

        let first_rows = fs::read_to_string(&first.jsonl_path).expect("first jsonl");
        let second_rows = fs::read_to_string(&second.jsonl_path).expect("second jsonl");
        assert_eq!(first_rows, second_rows);
    }
}
