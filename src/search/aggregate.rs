//! Merging root statistics of independent workers.
//!
//! Every worker grows its own tree, so nodes from different workers have
//! nothing in common but the move that leads to them. Statistics are
//! therefore merged by move, never by node.

use super::node::NodeStats;
use log::debug;
use std::collections::BTreeMap;
use std::fmt::Debug;

/// Combined `(wins, plays)` per root move, ordered by move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveTable<M: Ord> {
    entries: BTreeMap<M, NodeStats>,
}

impl<M: Ord> Default for MoveTable<M> {
    fn default() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }
}

impl<M: Ord + Copy + Debug> MoveTable<M> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `stats` to whatever is already recorded for `mv`.
    pub fn add(&mut self, mv: M, stats: NodeStats) {
        let entry = self.entries.entry(mv).or_default();
        entry.wins += stats.wins;
        entry.plays += stats.plays;
    }

    pub fn get(&self, mv: &M) -> Option<NodeStats> {
        self.entries.get(mv).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (M, NodeStats)> + '_ {
        self.entries.iter().map(|(mv, stats)| (*mv, *stats))
    }

    /// Sum of plays over all moves.
    pub fn total_plays(&self) -> u64 {
        self.entries.values().map(|s| s.plays).sum()
    }

    /// The move with the highest combined win ratio. On ties the smallest
    /// move wins; moves without plays are skipped.
    pub fn best_move(&self) -> Option<M> {
        let mut best = None;
        let mut best_ratio = -1.0;
        for (mv, stats) in &self.entries {
            if stats.plays == 0 {
                continue;
            }
            let ratio = stats.win_ratio();
            if ratio > best_ratio {
                best = Some(*mv);
                best_ratio = ratio;
            }
        }
        best
    }
}

/// Sums the root tables of all workers move by move.
///
/// A move a worker never tried simply contributes nothing from that worker.
pub fn merge_root_stats<'a, M, I>(tables: I) -> MoveTable<M>
where
    M: Ord + Copy + Debug + 'a,
    I: IntoIterator<Item = &'a [(M, NodeStats)]>,
{
    let mut merged = MoveTable::new();
    for table in tables {
        for &(mv, stats) in table {
            merged.add(mv, stats);
        }
    }
    for (mv, stats) in merged.iter() {
        debug!(
            "merged {:?}: {}/{} ({:.3})",
            mv,
            stats.wins,
            stats.plays,
            stats.win_ratio()
        );
    }
    merged
}
