//! Negamax search with alpha-beta pruning and a transposition table

use tinyhouse_core::eval::evaluate;
use tinyhouse_core::{legal_moves_into, Move, Position, TimeControl};

use crate::tt::{Bound, Entry, TranspositionTable};

/// Score of a position where the side to move is mated right now.
pub const MATE: i32 = 30_000;
/// Larger than any reachable score.
pub const INFINITY: i32 = 32_000;
/// Deepest ply a mate score can encode.
pub const MAX_PLY: i32 = 256;

/// True for scores that encode a forced game end (checkmate or stalemate).
#[inline]
pub fn is_mate_score(score: i32) -> bool {
    score.abs() >= MATE - MAX_PLY
}

/// Plies until the game ends for a mate score.
pub fn mate_distance(score: i32) -> Option<i32> {
    is_mate_score(score).then(|| MATE - score.abs())
}

fn score_to_tt(score: i32, ply: i32) -> i32 {
    if score >= MATE - MAX_PLY {
        score + ply
    } else if score <= -(MATE - MAX_PLY) {
        score - ply
    } else {
        score
    }
}

fn score_from_tt(score: i32, ply: i32) -> i32 {
    if score >= MATE - MAX_PLY {
        score - ply
    } else if score <= -(MATE - MAX_PLY) {
        score + ply
    } else {
        score
    }
}

/// Result from pick_best_move indicating whether search completed or was stopped.
pub struct SearchOutcome {
    /// Best move found (if any legal moves exist)
    pub best_move: Option<(Move, i32)>,
    /// True if search was stopped early due to time
    pub stopped: bool,
}

/// Mutable state threaded through one search.
struct Searcher<'a> {
    tt: &'a mut TranspositionTable,
    tc: &'a mut TimeControl,
    nodes: &'a mut u64,
    stopped: bool,
    /// Count of repetition draws scored so far. Results that depend on one
    /// are path dependent and stay out of the table.
    repetitions: u64,
}

/// Searches `pos` to `depth` with a fresh table and no time limit.
///
/// Returns `None` when the side to move has no legal move.
pub fn search_best_move(pos: &Position, depth: u8) -> Option<(Move, i32)> {
    let mut tt = TranspositionTable::default();
    let mut tc = TimeControl::new(None);
    let mut nodes = 0;
    pick_best_move(pos, depth, &mut tt, &mut nodes, &mut tc).best_move
}

/// Searches the position and returns the best move with its score.
///
/// # Arguments
/// * `pos` - The position to search; never modified
/// * `depth` - Maximum search depth in plies
/// * `tt` - Transposition table, reused across iterations
/// * `nodes` - Counter for nodes searched (for statistics)
/// * `tc` - Time control for aborting search when time expires
pub fn pick_best_move(
    pos: &Position,
    depth: u8,
    tt: &mut TranspositionTable,
    nodes: &mut u64,
    tc: &mut TimeControl,
) -> SearchOutcome {
    let mut tmp = pos.clone();
    let mut moves = Vec::with_capacity(64);
    legal_moves_into(&mut tmp, &mut moves);

    if moves.is_empty() {
        return SearchOutcome {
            best_move: None,
            stopped: false,
        };
    }

    let tt_move = tt.probe(tmp.key()).and_then(|e| e.best);
    order_moves(&mut moves, tt_move);

    let mut searcher = Searcher {
        tt,
        tc,
        nodes,
        stopped: false,
        repetitions: 0,
    };

    let mut best = moves[0];
    let mut best_score = -INFINITY;
    let mut alpha = -INFINITY;
    let beta = INFINITY;

    for mv in moves {
        let undo = tmp.make_move(mv);
        *searcher.nodes += 1;
        let score = -searcher.negamax(&mut tmp, depth.saturating_sub(1), -beta, -alpha, 1);
        tmp.unmake_move(mv, undo);

        if searcher.stopped {
            break;
        }

        if score > best_score {
            best_score = score;
            best = mv;
        }
        if score > alpha {
            alpha = score;
        }
    }

    if best_score == -INFINITY {
        // Stopped before the first root move finished
        return SearchOutcome {
            best_move: Some((best, 0)),
            stopped: true,
        };
    }

    if !searcher.stopped && searcher.repetitions == 0 {
        searcher.tt.store(Entry {
            key: tmp.key(),
            depth,
            score: score_to_tt(best_score, 0),
            best: Some(best),
            bound: Bound::Exact,
        });
    }

    SearchOutcome {
        best_move: Some((best, best_score)),
        stopped: searcher.stopped,
    }
}

fn order_moves(moves: &mut [Move], tt_move: Option<Move>) {
    if let Some(tt_move) = tt_move {
        if let Some(i) = moves.iter().position(|&m| m == tt_move) {
            moves.swap(0, i);
        }
    }
}

impl Searcher<'_> {
    /// Recursive negamax search with alpha-beta pruning.
    fn negamax(&mut self, pos: &mut Position, depth: u8, mut alpha: i32, beta: i32, ply: i32) -> i32 {
        if self.stopped {
            return 0;
        }
        if self.tc.should_check_time(*self.nodes) && self.tc.check_time() {
            self.stopped = true;
            return 0;
        }

        if pos.is_draw(ply as u32) {
            self.repetitions += 1;
            return 0;
        }

        let mut moves = Vec::with_capacity(64);
        legal_moves_into(pos, &mut moves);

        if moves.is_empty() {
            return if pos.in_check() {
                -MATE + ply // Checkmate
            } else {
                MATE - ply // Stalemate: the stalemated side wins
            };
        }

        if depth == 0 {
            return evaluate(pos);
        }

        let key = pos.key();
        let mut tt_move = None;
        if let Some(entry) = self.tt.probe(key) {
            tt_move = entry.best;
            if entry.depth >= depth {
                let score = score_from_tt(entry.score, ply);
                match entry.bound {
                    Bound::Exact => return score,
                    Bound::Lower if score >= beta => return score,
                    Bound::Upper if score <= alpha => return score,
                    _ => {}
                }
            }
        }
        order_moves(&mut moves, tt_move);

        let alpha_orig = alpha;
        let repetitions_before = self.repetitions;
        let mut best = -INFINITY;
        let mut best_move = None;

        for mv in moves {
            let undo = pos.make_move(mv);
            *self.nodes += 1;
            let score = -self.negamax(pos, depth - 1, -beta, -alpha, ply + 1);
            pos.unmake_move(mv, undo);

            if self.stopped {
                return best.max(alpha_orig);
            }

            if score > best {
                best = score;
                best_move = Some(mv);
            }
            if best > alpha {
                alpha = best;
            }
            if alpha >= beta {
                break; // Beta cutoff
            }
        }

        if self.repetitions == repetitions_before {
            let bound = if best <= alpha_orig {
                Bound::Upper
            } else if best >= beta {
                Bound::Lower
            } else {
                Bound::Exact
            };
            self.tt.store(Entry {
                key,
                depth,
                score: score_to_tt(best, ply),
                best: best_move,
                bound,
            });
        }

        best
    }
}

#[cfg(test)]
#[path = "search_tests.rs"]
mod search_tests;
