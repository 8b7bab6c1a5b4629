//! The driver's commands, kept free of argument parsing and printing.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use classical_engine::{mate_distance, ClassicalEngine};
use tablebase::{SolveStats, Tablebase, TbRecord, Wdl};
use tinyhouse_core::{perft, perft_divide, Engine, Move, Position, SearchLimits, SearchResult};
use tracing::info;

use crate::config::SearchConfig;

pub fn parse_position(notation: &str) -> Result<Position> {
    Position::from_notation(notation).with_context(|| format!("bad position '{notation}'"))
}

#[derive(Debug, Clone)]
pub struct SolveOptions {
    pub start: String,
    pub out: PathBuf,
    pub stats: Option<PathBuf>,
}

/// Solves from `opts.start`, writes the table sorted by key and, if asked,
/// the statistics as JSON.
pub fn solve(opts: &SolveOptions) -> Result<SolveStats> {
    let start = parse_position(&opts.start)?;
    let solution = tablebase::solve(&start).context("solve failed")?;
    let stats = solution.stats().clone();

    let mut records = solution.into_records();
    tablebase::sort_records(&mut records);
    tablebase::write(&opts.out, &records)
        .with_context(|| format!("failed to write {}", opts.out.display()))?;
    info!(path = %opts.out.display(), records = records.len(), "tablebase saved");

    if let Some(path) = &opts.stats {
        let json = serde_json::to_string_pretty(&stats)?;
        std::fs::write(path, json)
            .with_context(|| format!("failed to write {}", path.display()))?;
    }
    Ok(stats)
}

/// A tablebase answer for one position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeReport {
    pub position: String,
    pub record: Option<TbRecord>,
    /// The stored move, present only when legal in the probed position.
    pub best: Option<Move>,
}

impl fmt::Display for ProbeReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(rec) = self.record else {
            return write!(f, "{}: not in tablebase", self.position);
        };
        let result = match rec.wdl {
            Wdl::Win => "win",
            Wdl::Draw => "draw",
            Wdl::Loss => "loss",
        };
        write!(f, "{}: {result}", self.position)?;
        if rec.wdl != Wdl::Draw {
            write!(f, " in {} plies", rec.dtm)?;
        }
        if let Some(mv) = self.best {
            write!(f, ", best {mv}")?;
        }
        Ok(())
    }
}

pub fn probe(tb_path: &Path, notation: &str) -> Result<ProbeReport> {
    let pos = parse_position(notation)?;
    let tb = Tablebase::load(tb_path)
        .with_context(|| format!("failed to load {}", tb_path.display()))?;
    Ok(ProbeReport {
        position: pos.to_notation(),
        record: tb.probe_position(&pos).copied(),
        best: tb.best_move(&pos),
    })
}

pub fn limits_for(search: &SearchConfig) -> SearchLimits {
    match search.move_time_ms {
        0 => SearchLimits::depth(search.depth),
        ms => SearchLimits::depth_and_time(search.depth, Duration::from_millis(ms)),
    }
}

pub fn best_move(notation: &str, search: &SearchConfig) -> Result<SearchResult> {
    let pos = parse_position(notation)?;
    let mut engine = ClassicalEngine::with_tt_entries(search.tt_entries);
    let result = engine.search(&pos, limits_for(search));
    info!(
        engine = engine.name(),
        depth = result.depth,
        nodes = result.nodes,
        score = result.score,
        "search finished"
    );
    Ok(result)
}

/// Score text: plies to a forced result, centipawns otherwise.
pub fn describe_score(score: i32) -> String {
    match mate_distance(score) {
        Some(plies) if score > 0 => format!("win in {plies} plies"),
        Some(plies) => format!("loss in {plies} plies"),
        None => format!("cp {score}"),
    }
}

pub struct PerftReport {
    pub nodes: u64,
    pub divide: Vec<(Move, u64)>,
}

pub fn run_perft(notation: &str, depth: u8) -> Result<PerftReport> {
    let mut pos = parse_position(notation)?;
    if depth == 0 {
        return Ok(PerftReport {
            nodes: perft(&mut pos, 0),
            divide: Vec::new(),
        });
    }
    let divide = perft_divide(&mut pos, depth);
    let nodes = divide.iter().map(|(_, n)| n).sum();
    Ok(PerftReport { nodes, divide })
}

#[cfg(test)]
#[path = "commands_tests.rs"]
mod commands_tests;
