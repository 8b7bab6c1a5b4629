use std::path::Path;

use tinyhouse_core::{legal_moves, Move, Position};

use crate::codec;
use crate::error::Result;
use crate::retro::TbRecord;

/// Solved records sorted by key for lookup by binary search.
///
/// Keys are only meaningful for positions hashed with the default context.
#[derive(Debug, Clone, Default)]
pub struct Tablebase {
    records: Vec<TbRecord>,
}

impl Tablebase {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::from_records(codec::read(path)?))
    }

    pub fn from_records(mut records: Vec<TbRecord>) -> Self {
        codec::sort_records(&mut records);
        Self { records }
    }

    pub fn probe(&self, key: u64) -> Option<&TbRecord> {
        self.records
            .binary_search_by_key(&key, |r| r.key)
            .ok()
            .map(|i| &self.records[i])
    }

    pub fn probe_position(&self, pos: &Position) -> Option<&TbRecord> {
        self.probe(pos.key())
    }

    /// The stored best move, if it is legal in `pos`.
    pub fn best_move(&self, pos: &Position) -> Option<Move> {
        let mv = self.probe_position(pos)?.best?;
        legal_moves(pos).contains(&mv).then_some(mv)
    }

    pub fn records(&self) -> &[TbRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
