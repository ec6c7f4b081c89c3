use anyhow::Result;
use clap::Parser;
use mcts::game_controller::GameController;
use mcts::games::connect4::Rules;
use mcts::logging::setup_logging;
use mcts::search::{SearchConfig, MCTS};
use mcts::Player;
use std::time::{Duration, Instant};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Board height (default: 6)
    #[arg(long, default_value_t = 6)]
    rows: usize,

    /// Board width (default: 7)
    #[arg(long, default_value_t = 7)]
    columns: usize,

    /// Pieces in a row needed to win (default: 4)
    #[arg(long, default_value_t = 4)]
    win_length: usize,

    /// Only count horizontal and vertical lines
    #[arg(long)]
    no_diagonal: bool,

    /// Number of workers (default: number of logical CPUs)
    #[arg(long)]
    workers: Option<usize>,

    /// Iterations per worker per move (default: 2000)
    #[arg(long, default_value_t = 2000)]
    iterations: u32,

    /// Self-play rounds to run (default: 3)
    #[arg(long, default_value_t = 3)]
    rounds: usize,

    /// Log level when RUST_LOG is not set
    #[arg(long, default_value = "warn")]
    log_level: String,
}

#[derive(Default)]
struct Totals {
    searches: usize,
    nodes: usize,
    playouts: u64,
    search_time: Duration,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let _logger = setup_logging(&args.log_level)?;
    let workers = args.workers.unwrap_or_else(num_cpus::get);
    let rules = Rules::new(
        args.rows,
        args.columns,
        args.win_length,
        !args.no_diagonal,
    );
    rules.validate()?;

    println!("Parallel Connect-Four MCTS - Benchmark Tool");
    println!("===========================================");
    println!(
        "Board: {}x{} (connect {}, diagonals {})",
        args.columns,
        args.rows,
        args.win_length,
        if args.no_diagonal { "off" } else { "on" }
    );
    println!("Workers: {}", workers);
    println!("Iterations per worker: {}", args.iterations);
    println!("Rounds: {}", args.rounds);
    println!("-------------------------------------------");

    #[cfg(debug_assertions)]
    println!(
        "WARNING: Running in debug mode. Performance will be significantly lower.\n\
         Use --release for accurate benchmarks.\n"
    );

    let engine = MCTS::new(
        SearchConfig::default()
            .with_workers(workers)
            .with_iterations(args.iterations),
    )?;
    let mut totals = Totals::default();
    let start = Instant::now();

    for round in 0..args.rounds {
        let mut controller = GameController::new(rules, Player::A)?;
        while !controller.status().is_game_over() {
            let (mv, stats) = engine.search(&controller.snapshot())?;
            if !stats.workers.is_empty() {
                totals.searches += 1;
                totals.nodes += stats.total_nodes;
                totals.playouts += stats.root_visits;
                totals.search_time += stats.elapsed;
            }
            controller.try_make_move(mv.0)?;
        }
        println!(
            "Round {}: {:?} after {} moves",
            round + 1,
            controller.status(),
            controller.history().len()
        );
    }

    print_stats(&totals, start.elapsed());
    Ok(())
}

fn print_stats(totals: &Totals, wall: Duration) {
    let secs = totals.search_time.as_secs_f64().max(f64::EPSILON);
    let nps = totals.nodes as f64 / secs;
    let sps = totals.playouts as f64 / secs;

    println!("Results:");
    println!("  Searches: {}", totals.searches);
    println!("  Total Nodes: {}", totals.nodes);
    println!("  Search Time: {:.3}s", secs);
    println!("  Wall Time: {:.3}s", wall.as_secs_f64());
    println!("  NPS: {:.0} nodes/sec", nps);
    println!("  SPS: {:.0} sims/sec", sps);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_board_rule_flags() {
        let args = Args::try_parse_from([
            "benchmark",
            "--rows",
            "5",
            "--no-diagonal",
            "--rounds",
            "2",
        ])
        .unwrap();
        assert_eq!(args.rows, 5);
        assert_eq!(args.rounds, 2);
        assert!(args.no_diagonal);

        let defaults = Args::try_parse_from(["benchmark"]).unwrap();
        assert_eq!(defaults.rounds, 3);
        assert!(!defaults.no_diagonal);
        assert!(Args::try_parse_from(["benchmark", "--games", "2"]).is_err());
    }
}
