//! Search configuration parameters.

use crate::SearchError;
use std::time::Duration;

/// Exploration constant of the UCB1 score; it sits under the square root,
/// so it is the square of the usual confidence factor.
pub const DEFAULT_EXPLORATION: f64 = 1.96;

/// Configuration for one parallel search round.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchConfig {
    /// Number of independent workers (and trees) per decision.
    pub worker_count: usize,

    /// Iterations each worker runs before reporting.
    pub iterations_per_worker: u32,

    /// Exploration constant `C` in `wins/plays + sqrt(C * ln(N) / plays)`.
    pub exploration_constant: f64,

    /// Optional wall-clock budget. Workers stop starting new iterations
    /// once it has elapsed; an iteration already running always finishes.
    pub time_limit: Option<Duration>,

    /// Fixed seed for reproducible searches. `None` draws fresh entropy
    /// every round.
    pub seed: Option<u64>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            worker_count: 2,
            iterations_per_worker: 1000,
            exploration_constant: DEFAULT_EXPLORATION,
            time_limit: None,
            seed: None,
        }
    }
}

impl SearchConfig {
    /// Builder pattern: set the number of workers.
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.worker_count = workers;
        self
    }

    /// Builder pattern: set the iteration budget of each worker.
    pub fn with_iterations(mut self, iterations: u32) -> Self {
        self.iterations_per_worker = iterations;
        self
    }

    /// Builder pattern: set the exploration constant.
    pub fn with_exploration(mut self, c: f64) -> Self {
        self.exploration_constant = c;
        self
    }

    /// Builder pattern: set a wall-clock limit.
    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = Some(limit);
        self
    }

    /// Builder pattern: fix the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Rejects settings under which a search cannot run.
    pub fn validate(&self) -> Result<(), SearchError> {
        if self.worker_count == 0 {
            return Err(SearchError::InvalidConfiguration(
                "worker count must be at least 1".to_string(),
            ));
        }
        if self.iterations_per_worker == 0 {
            return Err(SearchError::InvalidConfiguration(
                "iterations per worker must be at least 1".to_string(),
            ));
        }
        if !self.exploration_constant.is_finite() || self.exploration_constant < 0.0 {
            return Err(SearchError::InvalidConfiguration(format!(
                "exploration constant must be a finite non-negative number, got {}",
                self.exploration_constant
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_default_config() {
        let config = SearchConfig::default();
        assert_eq!(config.worker_count, 2);
        assert_eq!(config.iterations_per_worker, 1000);
        assert!((config.exploration_constant - 1.96).abs() < 1e-12);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder() {
        let config = SearchConfig::default()
            .with_workers(8)
            .with_iterations(50)
            .with_seed(7)
            .with_time_limit(Duration::from_millis(20));
        assert_eq!(config.worker_count, 8);
        assert_eq!(config.iterations_per_worker, 50);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.time_limit, Some(Duration::from_millis(20)));
    }

    #[test]
    fn test_validate_rejects_empty_budgets() {
        assert_matches!(
            SearchConfig::default().with_workers(0).validate(),
            Err(SearchError::InvalidConfiguration(_))
        );
        assert_matches!(
            SearchConfig::default().with_iterations(0).validate(),
            Err(SearchError::InvalidConfiguration(_))
        );
        assert_matches!(
            SearchConfig::default().with_exploration(f64::NAN).validate(),
            Err(SearchError::InvalidConfiguration(_))
        );
    }
}
