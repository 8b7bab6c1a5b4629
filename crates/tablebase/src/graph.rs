//! Game graph of every position reachable from a start position.
//!
//! Nodes live in a dense arena indexed by [`NodeId`] and are deduplicated by
//! Zobrist key. Edges are stored backwards only: each node keeps the list of
//! `(parent, move)` pairs leading to it, which is all retrograde labeling
//! needs.

use std::collections::{HashMap, VecDeque};
use std::time::Instant;

use tinyhouse_core::{legal_moves_into, Move, Position};
use tracing::{debug, info};

use crate::error::Result;

pub type NodeId = u32;

const PROGRESS_INTERVAL: usize = 1 << 20;

/// Game-theoretic status of a node from the side to move's view.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Status {
    Unknown,
    Win,
    Loss,
    Draw,
}

#[derive(Clone, Debug)]
pub struct Node {
    pub key: u64,
    pub status: Status,
    /// Plies to the end of the game under optimal play.
    pub dtm: u16,
    pub best: Option<Move>,
    pub outdegree: u32,
    /// Children not yet proven to be wins for the opponent.
    pub remaining: u32,
    /// Deepest winning child seen so far, with the move reaching it.
    pub deepest: Option<(u16, Move)>,
    /// True for terminals where the side to move is checkmated.
    pub in_check: bool,
    pub preds: Vec<(NodeId, Move)>,
}

impl Node {
    fn new(key: u64) -> Self {
        Node {
            key,
            status: Status::Unknown,
            dtm: 0,
            best: None,
            outdegree: 0,
            remaining: 0,
            deepest: None,
            in_check: false,
            preds: Vec::new(),
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.outdegree == 0
    }
}

/// Arena of reachable positions.
#[derive(Debug)]
pub struct Graph {
    nodes: Vec<Node>,
    index: HashMap<u64, NodeId>,
    edges: u64,
}

impl Graph {
    /// Breadth-first enumeration of all positions reachable from `start`.
    ///
    /// The start position is validated first. Positions are treated as
    /// history-free: the key alone identifies a node.
    pub fn build(start: &Position) -> Result<Graph> {
        start.validate()?;

        let started = Instant::now();
        let mut graph = Graph {
            nodes: Vec::new(),
            index: HashMap::new(),
            edges: 0,
        };

        let mut root = start.clone();
        root.clear_history();
        let root_id = graph.insert(root.key());

        let mut frontier: VecDeque<(NodeId, Position)> = VecDeque::new();
        frontier.push_back((root_id, root));
        let mut moves = Vec::with_capacity(64);
        let mut next_report = PROGRESS_INTERVAL;

        while let Some((id, mut pos)) = frontier.pop_front() {
            legal_moves_into(&mut pos, &mut moves);

            let node = &mut graph.nodes[id as usize];
            node.outdegree = moves.len() as u32;
            node.remaining = node.outdegree;
            if moves.is_empty() {
                node.in_check = pos.in_check();
                continue;
            }
            graph.edges += moves.len() as u64;

            for &mv in &moves {
                let undo = pos.make_move(mv);
                let key = pos.key();
                let child = match graph.index.get(&key) {
                    Some(&child) => child,
                    None => {
                        let child = graph.insert(key);
                        let mut next = pos.clone();
                        next.clear_history();
                        frontier.push_back((child, next));
                        child
                    }
                };
                graph.nodes[child as usize].preds.push((id, mv));
                pos.unmake_move(mv, undo);
            }

            if graph.nodes.len() >= next_report {
                next_report += PROGRESS_INTERVAL;
                debug!(
                    nodes = graph.nodes.len(),
                    frontier = frontier.len(),
                    "graph construction progress"
                );
            }
        }

        info!(
            nodes = graph.nodes.len(),
            edges = graph.edges,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "game graph built"
        );
        Ok(graph)
    }

    fn insert(&mut self, key: u64) -> NodeId {
        let id = self.nodes.len() as NodeId;
        self.nodes.push(Node::new(key));
        self.index.insert(key, id);
        id
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of (parent, move) edges.
    pub fn edges(&self) -> u64 {
        self.edges
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id as usize]
    }

    pub(crate) fn nodes_mut(&mut self) -> &mut [Node] {
        &mut self.nodes
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn id_of(&self, key: u64) -> Option<NodeId> {
        self.index.get(&key).copied()
    }

    /// Children of the node for `pos`, in move generation order.
    ///
    /// Returns `None` when `pos` is not part of the graph.
    pub fn children(&self, pos: &Position) -> Option<Vec<(Move, NodeId)>> {
        self.id_of(pos.key())?;
        let mut tmp = pos.clone();
        let mut moves = Vec::with_capacity(64);
        legal_moves_into(&mut tmp, &mut moves);

        let mut out = Vec::with_capacity(moves.len());
        for mv in moves {
            let undo = tmp.make_move(mv);
            let child = self.id_of(tmp.key());
            tmp.unmake_move(mv, undo);
            out.push((mv, child?));
        }
        Some(out)
    }
}
