//! # Connect Four against the parallel MCTS
//!
//! Text-mode game between a human and the engine. The human plays `X` and
//! types a column number; the engine plays `O`. Who moves first is random
//! unless `--human-first` or `--machine-first` is given.
//!
//! ## Usage
//! Run with `cargo run --release --bin play -- --workers 4 --iterations 5000`.

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use log::info;
use mcts::game_controller::{GameController, GameStatus};
use mcts::games::connect4::{Connect4Move, Connect4State, Rules};
use mcts::logging::setup_logging;
use mcts::search::{SearchConfig, MCTS};
use mcts::Player;
use std::io::{self, BufRead, Write};
use std::time::Duration;

const HUMAN: Player = Player::A;

#[derive(Parser, Debug)]
#[command(author, version, about = "Play Connect Four against a parallel MCTS", long_about = None)]
struct Args {
    /// Board height
    #[arg(short, long, default_value_t = 4)]
    rows: usize,

    /// Board width
    #[arg(short, long, default_value_t = 4)]
    columns: usize,

    /// Pieces in a row needed to win
    #[arg(short = 'l', long, default_value_t = 4)]
    win_length: usize,

    /// Only vertical and horizontal lines count
    #[arg(long, action = clap::ArgAction::SetTrue)]
    no_diagonal: bool,

    /// Independent search trees per move
    #[arg(short = 'w', long, default_value_t = 2)]
    workers: usize,

    /// Iterations per search tree
    #[arg(short = 'i', long, default_value_t = 1000)]
    iterations: u32,

    /// Exploration constant of the UCB1 score
    #[arg(short = 'e', long, default_value_t = mcts::search::config::DEFAULT_EXPLORATION)]
    exploration: f64,

    /// Stop starting new iterations after this many milliseconds
    #[arg(long)]
    time_limit_ms: Option<u64>,

    /// Seed the engine for reproducible games
    #[arg(long)]
    seed: Option<u64>,

    #[arg(long, action = clap::ArgAction::SetTrue, conflicts_with = "machine_first")]
    human_first: bool,

    #[arg(long, action = clap::ArgAction::SetTrue)]
    machine_first: bool,

    /// Log level when RUST_LOG is not set
    #[arg(long, default_value = "warn")]
    log_level: String,
}

impl Args {
    fn rules(&self) -> Rules {
        Rules::new(self.rows, self.columns, self.win_length, !self.no_diagonal)
    }

    fn search_config(&self) -> SearchConfig {
        let mut config = SearchConfig::default()
            .with_workers(self.workers)
            .with_iterations(self.iterations)
            .with_exploration(self.exploration);
        if let Some(ms) = self.time_limit_ms {
            config = config.with_time_limit(Duration::from_millis(ms));
        }
        if let Some(seed) = self.seed {
            config = config.with_seed(seed);
        }
        config
    }

    fn first_player(&self) -> Player {
        if self.human_first {
            HUMAN
        } else if self.machine_first {
            HUMAN.opponent()
        } else if rand::random::<bool>() {
            HUMAN
        } else {
            HUMAN.opponent()
        }
    }
}

fn print_board(state: &Connect4State) {
    let rules = state.rules();
    println!();
    for row in (0..rules.rows).rev() {
        let cells: Vec<String> = (0..rules.columns)
            .map(|column| match state.cell(column, row) {
                Some(Player::A) => "X".blue().bold().to_string(),
                Some(Player::B) => "O".red().bold().to_string(),
                None => ".".dimmed().to_string(),
            })
            .collect();
        println!(" {}", cells.join(" "));
    }
    let footer: Vec<String> = (0..rules.columns).map(|c| (c % 10).to_string()).collect();
    println!(" {}", footer.join(" "));
    println!();
}

/// Prompts until a number is entered. `None` means stdin was closed.
fn read_column<I>(lines: &mut I, columns: usize) -> Result<Option<usize>>
where
    I: Iterator<Item = io::Result<String>>,
{
    loop {
        print!("Your move (0-{}): ", columns.saturating_sub(1));
        io::stdout().flush().context("flushing prompt")?;
        let Some(line) = lines.next() else {
            return Ok(None);
        };
        let line = line.context("reading move")?;
        match line.parse::<Connect4Move>() {
            Ok(mv) => return Ok(Some(mv.0)),
            Err(e) => println!("{}", format!("Not a column number: {}", e).yellow()),
        }
    }
}

fn announce(status: GameStatus) {
    match status {
        GameStatus::Win(player) if player == HUMAN => println!("{}", "You Won!".green().bold()),
        GameStatus::Win(_) => println!("{}", "You Lose!".red().bold()),
        GameStatus::Draw => println!("{}", "Draw!".yellow().bold()),
        GameStatus::InProgress => {}
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    let _logger = setup_logging(&args.log_level).context("starting logger")?;

    let mut controller = GameController::new(args.rules(), args.first_player())?;
    let engine = MCTS::new(args.search_config())?;
    info!("rules {:?}, search {:?}", controller.state().rules(), engine.config());

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        print_board(controller.state());
        let status = controller.status();
        if status.is_game_over() {
            announce(status);
            return Ok(());
        }

        let column = if controller.current_player() == HUMAN {
            match read_column(&mut lines, controller.state().rules().columns)? {
                Some(column) => column,
                None => return Ok(()),
            }
        } else {
            let (mv, stats) = engine.search(&controller.snapshot())?;
            println!(
                "Machine plays column {} ({} playouts, {} nodes, {:.2?})",
                mv, stats.root_visits, stats.total_nodes, stats.elapsed
            );
            mv.0
        };

        if let Err(e) = controller.try_make_move(column) {
            println!("{}", e.to_string().red());
        }
    }
}
