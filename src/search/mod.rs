//! # Parallel Monte Carlo Tree Search
//!
//! A decision round runs `worker_count` independent workers on a rayon
//! thread pool. Each worker clones the caller's position, grows its own
//! tree with its own random stream and never talks to the others. After the
//! pool has joined, the root statistics are merged by move on the calling
//! thread and the best move is selected.
//!
//! ```text
//!            ┌──────────┐
//!  state ──► │ Worker 0 │──┐
//!    │       └──────────┘  │   ┌───────────┐   ┌──────────┐
//!    ├─────► │ Worker 1 │──┼──►│ Aggregate │──►│ Selector │──► move
//!    │       └──────────┘  │   └───────────┘   └──────────┘
//!    └─────► │ Worker P │──┘
//!            └──────────┘
//! ```

pub mod aggregate;
pub mod config;
pub mod node;
pub mod selector;
pub mod worker;

pub use aggregate::{merge_root_stats, MoveTable};
pub use config::SearchConfig;
pub use node::{NodeId, NodeStats, SearchNode, SearchTree};
pub use worker::{Worker, WorkerReport};

use crate::{GameError, GameState, SearchError};
use log::info;
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use std::time::{Duration, Instant};

/// Summary of one decision round.
#[derive(Debug, Clone)]
pub struct SearchStatistics<M: Ord> {
    /// Root statistics of all workers, merged by move.
    pub merged: MoveTable<M>,
    /// One report per worker, in worker order. Empty when the search was
    /// skipped on an empty board.
    pub workers: Vec<WorkerReport<M>>,
    /// Nodes created across all trees.
    pub total_nodes: usize,
    /// Root plays summed across all trees.
    pub root_visits: u64,
    pub elapsed: Duration,
}

impl<M: Ord> SearchStatistics<M> {
    fn skipped(elapsed: Duration) -> Self {
        Self {
            merged: MoveTable::default(),
            workers: Vec::new(),
            total_nodes: 0,
            root_visits: 0,
            elapsed,
        }
    }
}

/// The main MCTS engine.
#[derive(Debug)]
pub struct MCTS {
    config: SearchConfig,
    /// The rayon thread pool the workers run on.
    pool: ThreadPool,
}

impl MCTS {
    /// Creates a new MCTS engine with one pool thread per worker.
    pub fn new(config: SearchConfig) -> Result<Self, SearchError> {
        config.validate()?;
        let pool = ThreadPoolBuilder::new()
            .num_threads(config.worker_count)
            .thread_name(|i| format!("mcts-worker-{}", i))
            .build()?;
        Ok(MCTS { config, pool })
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Picks a move for the player to move in `state`.
    ///
    /// `state` is only read; every worker searches its own clones.
    pub fn search<S: GameState>(
        &self,
        state: &S,
    ) -> Result<(S::Move, SearchStatistics<S::Move>), SearchError> {
        if state.is_won() {
            return Err(SearchError::GameOver);
        }
        if !state.has_empty_cell() {
            return Err(SearchError::NoLegalMove);
        }

        let started = Instant::now();
        let mut rng = self.base_rng();

        if selector::is_opening(state) {
            let mv = selector::random_move(state, &mut rng)?;
            info!("opening move {:?}, search skipped", mv);
            return Ok((mv, SearchStatistics::skipped(started.elapsed())));
        }

        let deadline = self.config.time_limit.map(|limit| started + limit);
        let base = &rng;
        let config = &self.config;
        let reports = self.pool.install(|| {
            (0..config.worker_count)
                .into_par_iter()
                .map(|index| {
                    Worker::new(index, state, config, worker::worker_rng(base, index))
                        .with_deadline(deadline)
                        .run()
                })
                .collect::<Result<Vec<_>, GameError>>()
        })?;

        let merged = merge_root_stats(reports.iter().map(|r| r.root_stats.as_slice()));
        let mv = selector::select_move(&merged, state, &mut rng)?;

        let stats = SearchStatistics {
            total_nodes: reports.iter().map(|r| r.node_count).sum(),
            root_visits: reports.iter().map(|r| r.root_plays).sum(),
            workers: reports,
            merged,
            elapsed: started.elapsed(),
        };
        info!(
            "chose {:?} after {} playouts on {} workers in {:?}",
            mv,
            stats.root_visits,
            stats.workers.len(),
            stats.elapsed
        );
        Ok((mv, stats))
    }

    /// Like [`MCTS::search`], returning only the move.
    pub fn choose_move<S: GameState>(&self, state: &S) -> Result<S::Move, SearchError> {
        self.search(state).map(|(mv, _)| mv)
    }

    fn base_rng(&self) -> Xoshiro256PlusPlus {
        match self.config.seed {
            Some(seed) => Xoshiro256PlusPlus::seed_from_u64(seed),
            None => Xoshiro256PlusPlus::from_rng(&mut rand::rng()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::connect4::{Connect4State, Rules};
    use assert_matches::assert_matches;

    #[test]
    fn test_new_rejects_bad_config() {
        assert_matches!(
            MCTS::new(SearchConfig::default().with_workers(0)),
            Err(SearchError::InvalidConfiguration(_))
        );
    }

    #[test]
    fn test_search_reports_every_worker() {
        let mut state = Connect4State::new(Rules::default()).unwrap();
        state.apply(0).unwrap();
        let config = SearchConfig::default()
            .with_workers(3)
            .with_iterations(120)
            .with_seed(5);
        let engine = MCTS::new(config).unwrap();
        let (mv, stats) = engine.search(&state).unwrap();

        assert!(state.is_legal(mv.0));
        assert_eq!(stats.workers.len(), 3);
        assert_eq!(stats.root_visits, 360);
        assert_eq!(stats.merged.total_plays(), 360);
        assert!(stats.total_nodes >= 3);
        for (i, report) in stats.workers.iter().enumerate() {
            assert_eq!(report.index, i);
            assert_eq!(report.root_plays, 120);
        }
    }

    #[test]
    fn test_search_on_won_position() {
        let mut state = Connect4State::new(Rules::new(3, 3, 1, true)).unwrap();
        state.apply(1).unwrap();
        let engine = MCTS::new(SearchConfig::default()).unwrap();
        assert_matches!(engine.search(&state), Err(SearchError::GameOver));
    }
}
