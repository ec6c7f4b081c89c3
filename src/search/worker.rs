//! A single search worker: one private tree, one private random stream.

use super::config::SearchConfig;
use super::node::{simulate, NodeStats, SearchTree};
use crate::{GameError, GameState};
use log::debug;
use rand_xoshiro::Xoshiro256PlusPlus;
use std::time::{Duration, Instant};

/// Returns the random stream of worker `index`.
///
/// Each worker starts `index + 1` jumps (2^128 draws each) past `base`, so
/// streams never overlap with each other or with `base` itself.
pub fn worker_rng(base: &Xoshiro256PlusPlus, index: usize) -> Xoshiro256PlusPlus {
    let mut rng = base.clone();
    for _ in 0..=index {
        rng.jump();
    }
    rng
}

/// What a worker hands back once its budget is spent.
#[derive(Debug, Clone)]
pub struct WorkerReport<M> {
    pub index: usize,
    /// Iterations completed (the full budget unless a deadline hit first).
    pub iterations: u32,
    /// Plays recorded at the root.
    pub root_plays: u64,
    /// Nodes in the worker's tree when it finished.
    pub node_count: usize,
    /// Statistics of every move tried at the root.
    pub root_stats: Vec<(M, NodeStats)>,
    pub elapsed: Duration,
}

/// Runs select, expand, simulate and backpropagate against its own copy of
/// the starting position until the iteration budget is used up.
pub struct Worker<'a, S: GameState> {
    index: usize,
    start: &'a S,
    iterations: u32,
    exploration: f64,
    deadline: Option<Instant>,
    rng: Xoshiro256PlusPlus,
}

impl<'a, S: GameState> Worker<'a, S> {
    pub fn new(index: usize, start: &'a S, config: &SearchConfig, rng: Xoshiro256PlusPlus) -> Self {
        Self {
            index,
            start,
            iterations: config.iterations_per_worker,
            exploration: config.exploration_constant,
            deadline: None,
            rng,
        }
    }

    /// Stops starting new iterations once `deadline` has passed.
    pub fn with_deadline(mut self, deadline: Option<Instant>) -> Self {
        self.deadline = deadline;
        self
    }

    /// Spends the budget and reports the root statistics. The tree is
    /// dropped on return.
    pub fn run(mut self) -> Result<WorkerReport<S::Move>, GameError> {
        let started = Instant::now();
        let mut tree = SearchTree::new(self.start.get_current_player());
        let mut completed = 0;

        while completed < self.iterations {
            if self.deadline.is_some_and(|deadline| Instant::now() >= deadline) {
                debug!(
                    "worker {} hit the deadline after {}/{} iterations",
                    self.index, completed, self.iterations
                );
                break;
            }
            self.iterate(&mut tree)?;
            completed += 1;
        }

        let report = WorkerReport {
            index: self.index,
            iterations: completed,
            root_plays: tree.get(tree.root()).stats().plays,
            node_count: tree.len(),
            root_stats: tree.root_stats(),
            elapsed: started.elapsed(),
        };
        debug!(
            "worker {} done: {} iterations, {} nodes, {:?}",
            report.index, report.iterations, report.node_count, report.elapsed
        );
        Ok(report)
    }

    fn iterate(&mut self, tree: &mut SearchTree<S::Move>) -> Result<(), GameError> {
        let mut state = self.start.clone();
        let selected = tree.select_to_expand(tree.root(), &mut state, self.exploration)?;
        let expanded = tree.expand(selected, &mut state, &mut self.rng)?;
        let winner = simulate(&mut state, &mut self.rng)?;
        tree.backpropagate(expanded, winner);
        Ok(())
    }
}
