//! Tinyhouse driver
//!
//! Solves Tinyhouse from a start position into a tablebase file, probes
//! solved tables, and runs the alpha-beta engine or perft on single
//! positions.
//!
//! # Usage
//!
//! ```bash
//! # Solve the full game, settings from tinyhouse.toml if present
//! cargo run --release -p tinyhouse_cli -- solve --out tinyhouse.tb
//!
//! # Look up a position
//! cargo run -p tinyhouse_cli -- probe --tb tinyhouse.tb "k3/2F1/WK2/4 w 1"
//! ```

pub mod commands;
pub mod config;

pub use commands::*;
pub use config::*;
