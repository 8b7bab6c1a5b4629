//! Retrograde labeling of the game graph.
//!
//! Terminals seed a FIFO queue: checkmate is a loss for the side to move and
//! stalemate a win. A node with a losing child is a win one ply further from
//! the end; a node whose children are all wins for the opponent is a loss,
//! one ply beyond its deepest child. Whatever is left unlabeled can avoid
//! losing forever and is a draw.

use std::collections::VecDeque;
use std::time::Instant;

use serde::Serialize;
use tinyhouse_core::{Move, Position};
use tracing::info;

use crate::error::Result;
use crate::graph::{Graph, NodeId, Status};

/// Game result from the side to move's perspective, as stored on disk.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[repr(u8)]
pub enum Wdl {
    Loss = 0,
    Draw = 1,
    Win = 2,
}

impl Wdl {
    pub fn from_u8(v: u8) -> Option<Wdl> {
        match v {
            0 => Some(Wdl::Loss),
            1 => Some(Wdl::Draw),
            2 => Some(Wdl::Win),
            _ => None,
        }
    }

    pub fn flip(self) -> Wdl {
        match self {
            Wdl::Loss => Wdl::Win,
            Wdl::Draw => Wdl::Draw,
            Wdl::Win => Wdl::Loss,
        }
    }
}

/// One solved position.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TbRecord {
    pub key: u64,
    pub wdl: Wdl,
    /// Plies to the end of the game; 0 for terminals and draws.
    pub dtm: u16,
    /// Shortest win, longest defence; `None` for draws and terminals.
    pub best: Option<Move>,
}

/// Totals reported by [`solve`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SolveStats {
    pub nodes: u64,
    pub edges: u64,
    pub terminals: u64,
    pub checkmates: u64,
    pub stalemates: u64,
    pub wins: u64,
    pub losses: u64,
    pub draws: u64,
    pub max_dtm: u16,
    pub elapsed_ms: u64,
}

/// A labeled graph with one record per node, in node id order.
#[derive(Debug)]
pub struct Solution {
    graph: Graph,
    records: Vec<TbRecord>,
    stats: SolveStats,
}

impl Solution {
    pub fn records(&self) -> &[TbRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<TbRecord> {
        self.records
    }

    pub fn stats(&self) -> &SolveStats {
        &self.stats
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn record(&self, key: u64) -> Option<&TbRecord> {
        let id = self.graph.id_of(key)?;
        self.records.get(id as usize)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Solves every position reachable from `start`.
pub fn solve(start: &Position) -> Result<Solution> {
    let started = Instant::now();
    info!(start = %start, "solving");
    let graph = Graph::build(start)?;
    let mut solution = label(graph);
    solution.stats.elapsed_ms = started.elapsed().as_millis() as u64;

    let s = &solution.stats;
    info!(
        nodes = s.nodes,
        wins = s.wins,
        losses = s.losses,
        draws = s.draws,
        max_dtm = s.max_dtm,
        elapsed_ms = s.elapsed_ms,
        "solve complete"
    );
    Ok(solution)
}

/// Retrograde propagation over a built graph.
pub fn label(mut graph: Graph) -> Solution {
    let started = Instant::now();
    let mut stats = SolveStats {
        nodes: graph.len() as u64,
        edges: graph.edges(),
        ..SolveStats::default()
    };

    let nodes = graph.nodes_mut();
    let mut queue: VecDeque<NodeId> = VecDeque::new();

    for (id, node) in nodes.iter_mut().enumerate() {
        if node.is_terminal() {
            node.status = if node.in_check {
                stats.checkmates += 1;
                Status::Loss
            } else {
                stats.stalemates += 1;
                Status::Win
            };
            node.dtm = 0;
            queue.push_back(id as NodeId);
        }
    }
    stats.terminals = queue.len() as u64;

    while let Some(v) = queue.pop_front() {
        let child_status = nodes[v as usize].status;
        let child_dtm = nodes[v as usize].dtm;

        for i in 0..nodes[v as usize].preds.len() {
            let (p, mv) = nodes[v as usize].preds[i];
            let parent = &mut nodes[p as usize];
            if parent.status != Status::Unknown {
                continue;
            }

            match child_status {
                Status::Loss => {
                    parent.status = Status::Win;
                    parent.dtm = child_dtm.saturating_add(1);
                    parent.best = Some(mv);
                    queue.push_back(p);
                }
                Status::Win => {
                    parent.remaining -= 1;
                    let deepest = match parent.deepest {
                        Some((d, m)) if d >= child_dtm => (d, m),
                        _ => (child_dtm, mv),
                    };
                    parent.deepest = Some(deepest);
                    if parent.remaining == 0 {
                        let (d, best) = deepest;
                        parent.status = Status::Loss;
                        parent.dtm = d.saturating_add(1);
                        parent.best = Some(best);
                        queue.push_back(p);
                    }
                }
                Status::Unknown | Status::Draw => unreachable!("only decided nodes are queued"),
            }
        }
    }

    let mut records = Vec::with_capacity(nodes.len());
    for node in nodes.iter_mut() {
        let wdl = match node.status {
            Status::Win => {
                stats.wins += 1;
                Wdl::Win
            }
            Status::Loss => {
                stats.losses += 1;
                Wdl::Loss
            }
            Status::Unknown | Status::Draw => {
                node.status = Status::Draw;
                node.dtm = 0;
                node.best = None;
                stats.draws += 1;
                Wdl::Draw
            }
        };
        stats.max_dtm = stats.max_dtm.max(node.dtm);
        records.push(TbRecord {
            key: node.key,
            wdl,
            dtm: node.dtm,
            best: node.best,
        });
    }

    stats.elapsed_ms = started.elapsed().as_millis() as u64;
    Solution {
        graph,
        records,
        stats,
    }
}
