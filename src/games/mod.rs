//! # Game Implementations Module
//!
//! Games the engine can search. Each game implements the `GameState` trait
//! so the parallel MCTS can drive it without knowing its rules.
//!
//! ## Supported Games
//! - **Connect 4**: gravity-based N-in-a-row on a configurable grid, with
//!   diagonal lines optionally disabled

pub mod connect4;
