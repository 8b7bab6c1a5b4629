//! Transposition table keyed by the position's Zobrist key.

use tinyhouse_core::Move;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Bound {
    Exact,
    /// Score is at least this (fail high).
    Lower,
    /// Score is at most this (fail low).
    Upper,
}

#[derive(Clone, Copy, Debug)]
pub struct Entry {
    pub key: u64,
    pub depth: u8,
    /// Mate scores are stored relative to the node, not the root.
    pub score: i32,
    pub best: Option<Move>,
    pub bound: Bound,
}

const WAYS: usize = 4;

#[derive(Default, Clone, Copy)]
struct Bucket {
    slots: [Option<Entry>; WAYS],
}

/// Fixed-size table of 4-way buckets, power-of-two bucket count.
pub struct TranspositionTable {
    buckets: Vec<Bucket>,
    mask: usize,
}

impl TranspositionTable {
    /// Table holding at least `entries` entries (rounded up to a power of two).
    pub fn new(entries: usize) -> Self {
        let buckets = (entries.max(WAYS) / WAYS).next_power_of_two();
        Self {
            buckets: vec![Bucket::default(); buckets],
            mask: buckets - 1,
        }
    }

    #[inline]
    fn bucket_index(&self, key: u64) -> usize {
        let mixed = key ^ (key >> 32);
        (mixed as usize) & self.mask
    }

    pub fn probe(&self, key: u64) -> Option<Entry> {
        let bucket = &self.buckets[self.bucket_index(key)];
        bucket.slots.iter().flatten().find(|e| e.key == key).copied()
    }

    /// Depth-preferred replacement: a same-key entry is only overwritten by
    /// an equal or deeper one, otherwise an empty slot or the shallowest
    /// entry in the bucket is taken.
    pub fn store(&mut self, entry: Entry) {
        let idx = self.bucket_index(entry.key);
        let bucket = &mut self.buckets[idx];

        for slot in bucket.slots.iter_mut() {
            if let Some(cur) = *slot {
                if cur.key == entry.key {
                    if entry.depth >= cur.depth {
                        *slot = Some(entry);
                    }
                    return;
                }
            }
        }

        if let Some(slot) = bucket.slots.iter_mut().find(|s| s.is_none()) {
            *slot = Some(entry);
            return;
        }

        let mut victim = 0;
        let mut shallowest = u8::MAX;
        for (i, slot) in bucket.slots.iter().enumerate() {
            if let Some(cur) = slot {
                if cur.depth < shallowest {
                    shallowest = cur.depth;
                    victim = i;
                }
            }
        }
        bucket.slots[victim] = Some(entry);
    }

    pub fn clear(&mut self) {
        self.buckets.fill(Bucket::default());
    }

    /// Number of occupied slots.
    pub fn len(&self) -> usize {
        self.buckets
            .iter()
            .map(|b| b.slots.iter().filter(|s| s.is_some()).count())
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.buckets.len() * WAYS
    }
}

impl Default for TranspositionTable {
    fn default() -> Self {
        Self::new(crate::DEFAULT_TT_ENTRIES)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(key: u64, depth: u8, score: i32) -> Entry {
        Entry {
            key,
            depth,
            score,
            best: None,
            bound: Bound::Exact,
        }
    }

    #[test]
    fn test_capacity_rounds_to_power_of_two() {
        let tt = TranspositionTable::new(1000);
        assert_eq!(tt.capacity(), 1024);
        assert!(tt.is_empty());
    }

    #[test]
    fn test_store_and_probe() {
        let mut tt = TranspositionTable::new(64);
        tt.store(entry(42, 3, 17));
        let e = tt.probe(42).unwrap();
        assert_eq!(e.score, 17);
        assert_eq!(e.depth, 3);
        assert!(tt.probe(43).is_none());
    }

    #[test]
    fn test_shallower_entry_does_not_replace() {
        let mut tt = TranspositionTable::new(64);
        tt.store(entry(7, 5, 1));
        tt.store(entry(7, 2, 2));
        assert_eq!(tt.probe(7).unwrap().score, 1);
        tt.store(entry(7, 5, 3));
        assert_eq!(tt.probe(7).unwrap().score, 3);
        assert_eq!(tt.len(), 1);
    }

    #[test]
    fn test_full_bucket_evicts_shallowest() {
        // A single bucket: every key collides
        let mut tt = TranspositionTable::new(WAYS);
        for (i, depth) in [4u8, 1, 6, 3].into_iter().enumerate() {
            tt.store(entry(i as u64 + 1, depth, 0));
        }
        tt.store(entry(99, 2, 0));
        assert!(tt.probe(2).is_none(), "depth-1 entry should be evicted");
        assert!(tt.probe(99).is_some());
        assert_eq!(tt.len(), WAYS);

        tt.clear();
        assert!(tt.is_empty());
    }
}
